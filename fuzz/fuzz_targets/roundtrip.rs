#![no_main]
use arith::{BitReader, BitWriter, Decoder, Encoder};
use libfuzzer_sys::fuzz_target;

const EOF: usize = 256;

fuzz_target!(|data: Vec<u8>| {
    let mut enc = Encoder::<_, 16>::new(257, BitWriter::new()).unwrap();
    for &b in &data {
        enc.encode(b as usize).unwrap();
    }
    enc.encode(EOF).unwrap();
    enc.flush().unwrap();
    let bytes = enc.into_writer().finish();

    let mut dec = Decoder::<_, 16>::new(257, BitReader::new(&bytes)).unwrap();
    let mut out = Vec::with_capacity(data.len());
    loop {
        let s = dec.decode().unwrap();
        if s == EOF {
            break;
        }
        out.push(s as u8);
    }
    assert_eq!(data, out);
});
