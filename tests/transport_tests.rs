//! Tests for the stream transport against real sockets and scripted streams.

use lambdatronic_rs::error::LambdaError;
use lambdatronic_rs::protocol::frame::encode;
use lambdatronic_rs::{
    connect, open_session, Command, ConnectionConfig, ProtocolEngine, StreamTransport, Transport,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn name_frame(name: &str) -> Vec<u8> {
    let mut payload = vec![0x49, 0x00, 0x01, 0x00, 0x00];
    payload.extend_from_slice(name.as_bytes());
    encode(Command::new(0x4D, 0x41), &payload).unwrap()
}

#[tokio::test]
async fn test_connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = connect(&ConnectionConfig::new("127.0.0.1", port)).await;
    match result {
        Err(LambdaError::ConnectError { target, .. }) => {
            assert_eq!(target, format!("127.0.0.1:{port}"));
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("connected to a closed port"),
    }
}

#[tokio::test]
async fn test_session_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let device = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&name_frame("Kesseltemp")).await.unwrap();

        let mut ack = [0u8; 6];
        socket.read_exact(&mut ack).await.unwrap();
        (socket, ack)
    });

    let mut engine = open_session(&ConnectionConfig::new("127.0.0.1", port))
        .await
        .unwrap();

    let mut processed = false;
    for _ in 0..20 {
        if engine.poll_once().await.unwrap() {
            processed = true;
            break;
        }
    }
    assert!(processed);
    assert_eq!(engine.catalog().names()[0].name, "Kesseltemp");

    let (socket, ack) = device.await.unwrap();
    assert_eq!(ack.to_vec(), encode(Command::new(0x4D, 0x41), &[0x01]).unwrap());

    // link still open but idle: the poll times out quietly
    assert!(!engine.poll_once().await.unwrap());

    // once the bridge hangs up the session is over
    drop(socket);
    assert!(matches!(
        engine.poll_once().await,
        Err(LambdaError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_scripted_stream() {
    let ack = encode(Command::new(0x4D, 0x41), &[0x01]).unwrap();
    let stream = tokio_test::io::Builder::new()
        .read(&name_frame("Abgastemp."))
        .write(&ack)
        .build();
    let mut engine = ProtocolEngine::new(StreamTransport::new(stream, Duration::from_millis(50)));

    assert!(engine.poll_once().await.unwrap());
    assert_eq!(engine.catalog().len(), 1);

    // script exhausted: the peer is gone
    assert!(matches!(
        engine.poll_once().await,
        Err(LambdaError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_read_exact_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let device = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[0x4D, 0x32]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        socket.write_all(&[0x07]).await.unwrap();
        socket
    });

    let config = ConnectionConfig {
        read_timeout: Duration::from_millis(50),
        ..ConnectionConfig::new("127.0.0.1", port)
    };
    let mut transport = connect(&config).await.unwrap();

    assert!(matches!(
        transport.read_exact(3).await,
        Err(LambdaError::Timeout)
    ));

    let mut header = None;
    for _ in 0..10 {
        match transport.read_exact(3).await {
            Ok(bytes) => {
                header = Some(bytes);
                break;
            }
            Err(LambdaError::Timeout) => continue,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(header, Some(vec![0x4D, 0x32, 0x07]));
    drop(device.await.unwrap());
}
