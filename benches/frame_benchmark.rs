use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lambdatronic_rs::payload::{decode_measurements, ParameterCatalog, ParameterFormat, ParameterName};
use lambdatronic_rs::protocol::frame::{decode, encode};
use lambdatronic_rs::Command;

const PARAMETERS: u16 = 64;

fn measurement_frame() -> Vec<u8> {
    let payload: Vec<u8> = (0..PARAMETERS)
        .flat_map(|i| (i as i16 * 7).to_be_bytes())
        .collect();
    encode(Command::new(0x4D, 0x31), &payload).unwrap()
}

fn catalog() -> ParameterCatalog {
    let mut catalog = ParameterCatalog::new();
    for i in 0..PARAMETERS {
        let mut record = vec![0x49];
        record.extend_from_slice(&i.to_be_bytes());
        record.extend_from_slice(&[0x00, 0x00]);
        record.extend_from_slice(format!("Param{i:02}").as_bytes());
        catalog.record_name(ParameterName::parse(&record).unwrap());

        let mut format = i.to_be_bytes().to_vec();
        format.extend_from_slice(&[0xF8, 0x01, 0x00, 0x0A, 0x00, 0x00]);
        let (index, format) = ParameterFormat::parse(&format).unwrap();
        catalog.record_format(index, format);
    }
    catalog
}

fn benchmark_decode_frame(c: &mut Criterion) {
    let data = measurement_frame();

    c.bench_function("decode_frame", |b| {
        b.iter(|| {
            let _ = black_box(decode(black_box(&data)));
        })
    });
}

fn benchmark_decode_measurements(c: &mut Criterion) {
    let catalog = catalog();
    let frame = decode(&measurement_frame()).unwrap();

    c.bench_function("decode_measurements", |b| {
        b.iter(|| {
            let _ = black_box(decode_measurements(black_box(&frame.payload), &catalog));
        })
    });
}

criterion_group!(benches, benchmark_decode_frame, benchmark_decode_measurements);
criterion_main!(benches);
