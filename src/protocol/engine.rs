//! # Lambdatronic Protocol Engine
//!
//! This module drives one session with the controller: login, the receive state
//! machine, acknowledgements, and dispatch of received frames into the parameter
//! catalog and the value/clock snapshots.
//!
//! After login the controller streams one name record and one format record per
//! parameter, then its date/time. Only once that date/time frame has arrived is
//! the catalog complete enough to interpret measurement frames.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lambdatronic_rs::{connect, ConnectionConfig, LoginMode, ProtocolEngine};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), lambdatronic_rs::LambdaError> {
//! let transport = connect(&ConnectionConfig::new("192.168.1.147", 23)).await?;
//! let mut engine = ProtocolEngine::new(transport);
//! engine.bootstrap(LoginMode::Service, Duration::from_secs(120)).await?;
//!
//! loop {
//!     engine.drain().await?;
//!     println!("{:?}", engine.values().get("Kesseltemp"));
//!     tokio::time::sleep(Duration::from_secs(1)).await;
//! }
//! # }
//! ```

use crate::constants::{FRAME_HEADER_LEN, STATUS_PAYLOAD};
use crate::error::LambdaError;
use crate::payload::catalog::{ParameterCatalog, ParameterFormat, ParameterName};
use crate::payload::datetime::{decode_date_time, ClockSnapshot};
use crate::payload::measurement::{decode_measurements, ValueSnapshot};
use crate::protocol::command::{Command, LoginMode, Selector};
use crate::protocol::frame::{body_len, decode, encode, Frame};
use crate::transport::Transport;
use crate::util::logging::{log_frame_hex, LogThrottle};
use chrono::Utc;
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Receive progress carried between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    AwaitingHeader,
    /// Header consumed, payload and checksum still outstanding.
    AwaitingBody([u8; FRAME_HEADER_LEN]),
}

/// Per-session frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub frames_received: u64,
    pub acks_received: u64,
    pub acks_sent: u64,
    pub checksum_failures: u64,
    pub measurement_frames: u64,
    pub catalog_records: u64,
    /// Frames of an unknown class or selector, acknowledged and dropped.
    pub ignored_frames: u64,
}

/// One session with a controller.
pub struct ProtocolEngine<T: Transport> {
    transport: T,
    catalog: ParameterCatalog,
    values: ValueSnapshot,
    clock: ClockSnapshot,
    initialized: bool,
    rx_state: RxState,
    stats: EngineStats,
    checksum_warnings: LogThrottle,
}

impl<T: Transport> ProtocolEngine<T> {
    pub fn new(transport: T) -> Self {
        ProtocolEngine {
            transport,
            catalog: ParameterCatalog::new(),
            values: ValueSnapshot::default(),
            clock: ClockSnapshot::default(),
            initialized: false,
            rx_state: RxState::AwaitingHeader,
            stats: EngineStats::default(),
            checksum_warnings: LogThrottle::new(60_000, 5),
        }
    }

    /// Sends the login frame for `mode`.
    pub async fn send_login(&mut self, mode: LoginMode) -> Result<(), LambdaError> {
        debug!("Logging in ({mode})");
        self.send(Command::LOGIN, &mode.payload()).await
    }

    /// Asks the controller to start streaming measurements.
    pub async fn request_status(&mut self) -> Result<(), LambdaError> {
        self.send(Command::STATUS, &STATUS_PAYLOAD).await
    }

    /// Performs one receive/dispatch cycle.
    ///
    /// Returns `true` if a non-ACK frame was processed, `false` if nothing complete
    /// was available, the frame was a bare ACK, or it failed its checksum. Only
    /// fatal errors are returned.
    pub async fn poll_once(&mut self) -> Result<bool, LambdaError> {
        let frame = match self.receive_frame().await {
            Ok(frame) => frame,
            Err(LambdaError::Timeout) => {
                if let RxState::AwaitingBody(header) = self.rx_state {
                    trace!("Waiting for rest of frame {:02x?}", header);
                }
                return Ok(false);
            }
            Err(e @ LambdaError::ChecksumInvalid { .. }) => {
                self.stats.checksum_failures += 1;
                if self.checksum_warnings.allow() {
                    warn!("Dropping frame: {e}");
                } else {
                    trace!(
                        "Dropping frame: {e} ({} checksum failures this window)",
                        self.checksum_warnings.count()
                    );
                }
                return Ok(false);
            }
            Err(e) if !e.is_fatal() => {
                warn!("Dropping frame: {e}");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        self.stats.frames_received += 1;
        if frame.is_ack() {
            self.stats.acks_received += 1;
            return Ok(false);
        }

        // The controller expects the ACK before anything else happens.
        self.send_frame(&Frame::ack(frame.command)).await?;
        self.stats.acks_sent += 1;

        self.dispatch(&frame)?;
        Ok(true)
    }

    /// Polls until no complete frame is left. Returns how many frames were processed.
    pub async fn drain(&mut self) -> Result<usize, LambdaError> {
        let mut processed = 0;
        while self.poll_once().await? {
            processed += 1;
        }
        Ok(processed)
    }

    /// Logs in, waits for the catalog handshake to finish and requests status.
    pub async fn bootstrap(
        &mut self,
        mode: LoginMode,
        deadline: Duration,
    ) -> Result<(), LambdaError> {
        self.send_login(mode).await?;

        let expires = Instant::now() + deadline;
        while !self.initialized {
            if Instant::now() >= expires {
                return Err(LambdaError::HandshakeTimeout);
            }
            if !self.poll_once().await? {
                tokio::task::yield_now().await;
            }
        }

        let unformatted = self
            .catalog
            .entries()
            .filter(|(_, _, format)| format.is_none())
            .count();
        info!(
            "Catalog ready: {} parameters, {} without format",
            self.catalog.len(),
            unformatted
        );
        self.request_status().await
    }

    /// True once a date/time frame has been processed in this session.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn values(&self) -> &ValueSnapshot {
        &self.values
    }

    pub fn clock(&self) -> &ClockSnapshot {
        &self.clock
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Starts a new session on `transport`, discarding everything learned so far.
    pub fn reconnect(&mut self, transport: T) {
        self.transport = transport;
        self.reset();
    }

    /// Forgets catalog, snapshots and receive progress.
    pub fn reset(&mut self) {
        self.catalog.reset();
        self.values = ValueSnapshot::default();
        self.clock = ClockSnapshot::default();
        self.initialized = false;
        self.rx_state = RxState::AwaitingHeader;
        self.stats = EngineStats::default();
        self.checksum_warnings.reset();
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    async fn send(&mut self, command: Command, payload: &[u8]) -> Result<(), LambdaError> {
        let bytes = encode(command, payload)?;
        self.write(&bytes).await
    }

    async fn send_frame(&mut self, frame: &Frame) -> Result<(), LambdaError> {
        let bytes = frame.encode()?;
        self.write(&bytes).await
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), LambdaError> {
        log_frame_hex("TX", bytes);
        self.transport.write_all(bytes).await
    }

    async fn receive_frame(&mut self) -> Result<Frame, LambdaError> {
        let header = match self.rx_state {
            RxState::AwaitingBody(header) => header,
            RxState::AwaitingHeader => {
                let bytes = self.transport.read_exact(FRAME_HEADER_LEN).await?;
                let header: [u8; FRAME_HEADER_LEN] =
                    bytes
                        .as_slice()
                        .try_into()
                        .map_err(|_| LambdaError::FrameTruncated {
                            expected: FRAME_HEADER_LEN,
                            actual: bytes.len(),
                        })?;
                self.rx_state = RxState::AwaitingBody(header);
                header
            }
        };

        let body = self.transport.read_exact(body_len(&header)).await?;
        self.rx_state = RxState::AwaitingHeader;

        let mut raw = Vec::with_capacity(header.len() + body.len());
        raw.extend_from_slice(&header);
        raw.extend_from_slice(&body);
        log_frame_hex("RX", &raw);
        decode(&raw)
    }

    fn dispatch(&mut self, frame: &Frame) -> Result<(), LambdaError> {
        let command = frame.command;
        if !command.is_device() {
            warn!("Unknown command: {command}");
            self.stats.ignored_frames += 1;
            return Ok(());
        }

        match Selector::from(command.selector()) {
            Selector::Measurements => {
                let values = decode_measurements(&frame.payload, &self.catalog)?;
                self.stats.measurement_frames += 1;
                self.values = ValueSnapshot {
                    values,
                    last_updated: Some(Utc::now()),
                };
            }
            Selector::DateTime => {
                if !self.initialized {
                    info!(
                        "Handshake complete after {} parameter names",
                        self.catalog.len()
                    );
                }
                self.initialized = true;
                if let Some(device_time) = decode_date_time(&frame.payload) {
                    self.clock = ClockSnapshot {
                        device_time: Some(device_time),
                        last_updated: Some(Utc::now()),
                    };
                }
            }
            Selector::ErrorMessage => {
                debug!("Device error message ({} bytes) discarded", frame.payload.len());
            }
            Selector::ParameterName => {
                let name = ParameterName::parse(&frame.payload)?;
                trace!(
                    "Parameter #{} index {} {:?} '{}'",
                    self.catalog.len(),
                    name.index,
                    name.kind,
                    name.name
                );
                self.catalog.record_name(name);
                self.stats.catalog_records += 1;
            }
            Selector::DisplayText => {
                trace!("Display text discarded");
            }
            Selector::ParameterFormat => {
                let (index, format) = ParameterFormat::parse(&frame.payload)?;
                trace!("Format for index {index}: {format:?}");
                self.catalog.record_format(index, format);
                self.stats.catalog_records += 1;
            }
            Selector::Unsupported(selector) => {
                debug!("Command 0x{selector:02X} currently not supported");
                self.stats.ignored_frames += 1;
            }
        }
        Ok(())
    }
}
