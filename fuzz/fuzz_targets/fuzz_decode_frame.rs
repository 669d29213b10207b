#![no_main]

use libfuzzer_sys::fuzz_target;
use lambdatronic_rs::protocol::frame::{body_len, decode};

fuzz_target!(|data: &[u8]| {
    // The decoder must reject anything malformed without panicking
    let _ = decode(data);

    // Feed the body length back into the header the way the receive loop would
    if data.len() >= 3 {
        let header = [data[0], data[1], data[2]];
        let wanted = 3 + body_len(&header);
        if data.len() >= wanted {
            let _ = decode(&data[..wanted]);
        }
    }

    // A flipped trailer must never decode
    if data.len() > 5 {
        let mut corrupted = data.to_vec();
        if let Some(last) = corrupted.last_mut() {
            *last = last.wrapping_add(1);
            let _ = decode(&corrupted);
        }
    }
});
