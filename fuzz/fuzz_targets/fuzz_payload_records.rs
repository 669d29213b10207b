#![no_main]

use libfuzzer_sys::fuzz_target;
use lambdatronic_rs::payload::{
    decode_date_time, decode_measurements, ParameterCatalog, ParameterFormat, ParameterName,
};

fuzz_target!(|data: &[u8]| {
    let _ = decode_date_time(data);

    let mut catalog = ParameterCatalog::new();
    if let Ok(name) = ParameterName::parse(data) {
        catalog.record_name(name);
    }
    if data.len() >= 8 {
        if let Ok((index, format)) = ParameterFormat::parse(&data[..8]) {
            catalog.record_format(index, format);
        }
    }
    let _ = decode_measurements(data, &catalog);
});
