// demos/stream_pipeline.rs
//
// Demonstrates chained stream adapters: a reader that re-encodes a Base64
// document as Base32 on the fly, and a writer pipeline producing chunked
// MIME output, each hop driving its own codec context.

use std::io::{Cursor, Read, Write};

use basen_codec::{Base32, Base64, CodecReader, CodecWriter};

fn main() {
    let document = b"The quick brown fox jumps over the lazy dog";

    // Reader pipeline: raw bytes -> Base64 text -> raw bytes -> Base32 text
    let base64_text = CodecReader::encoder(Cursor::new(document.to_vec()), Base64::standard());
    let raw_again = CodecReader::decoder(base64_text, Base64::standard());
    let mut base32_text = CodecReader::encoder(raw_again, Base32::standard());

    let mut transcoded = String::new();
    base32_text
        .read_to_string(&mut transcoded)
        .expect("transcode pipeline");
    println!("base32: {}", transcoded);

    // Writer pipeline: chunked MIME output into an in-memory sink.
    let mut writer = CodecWriter::encoder(Vec::new(), Base64::mime());
    for chunk in document.chunks(7) {
        writer.write_all(chunk).expect("write chunk");
    }
    let sink = writer.finish().expect("finish writer");
    print!("mime:\n{}", String::from_utf8_lossy(&sink));
}
