use arith::{BitReader, BitWriter, Decoder, Encoder};

fn main() {
    let input: Vec<usize> = (0..10_000).map(|i| (i * i + i / 5) % 256).collect();

    for _ in 0..1000 {
        let mut encoder = Encoder::<_, 16>::new(256, BitWriter::new()).unwrap();
        for &s in &input {
            encoder.encode(s).unwrap();
        }
        encoder.flush().unwrap();
        let bytes = encoder.into_writer().finish();

        let mut decoder = Decoder::<_, 16>::new(256, BitReader::new(&bytes)).unwrap();
        for _ in 0..input.len() {
            decoder.decode().unwrap();
        }
    }
}
