// demos/basenc.rs
//
// Minimal basenc-style command line front end: encode or decode stdin to
// stdout with a selectable codec.
//
// Usage: basenc [--base64|--base64url|--base32|--base32hex|--base16|--base58]
//               [--decode] [--wrap COLS]

use std::io::{self, Read, Write};
use std::process;

use basen_codec::{
    Base16, Base32, Base32Variant, Base58, Base64, Base64Variant, BaseNCodec, CodecConfig,
};

enum Encoding {
    Base64,
    Base64Url,
    Base32,
    Base32Hex,
    Base16,
    Base58,
}

fn main() {
    let mut encoding = Encoding::Base64;
    let mut decode = false;
    let mut wrap = 0usize;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base64" => encoding = Encoding::Base64,
            "--base64url" => encoding = Encoding::Base64Url,
            "--base32" => encoding = Encoding::Base32,
            "--base32hex" => encoding = Encoding::Base32Hex,
            "--base16" => encoding = Encoding::Base16,
            "--base58" => encoding = Encoding::Base58,
            "--decode" | "-d" => decode = true,
            "--wrap" | "-w" => {
                let value = args.next().unwrap_or_default();
                wrap = value.parse().unwrap_or_else(|_| {
                    eprintln!("basenc: invalid wrap size: '{}'", value);
                    process::exit(1);
                });
            }
            other => {
                eprintln!("basenc: unrecognized option '{}'", other);
                process::exit(1);
            }
        }
    }

    let mut input = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut input) {
        eprintln!("basenc: read error: {}", err);
        process::exit(1);
    }

    let config = CodecConfig::default()
        .with_line_length(wrap)
        .with_line_separator(b"\n");
    let codec: Box<dyn BaseNCodec> = match encoding {
        Encoding::Base64 => Box::new(Base64::new(Base64Variant::Standard, config).unwrap()),
        Encoding::Base64Url => Box::new(Base64::new(Base64Variant::UrlSafe, config).unwrap()),
        Encoding::Base32 => Box::new(Base32::new(Base32Variant::Standard, config).unwrap()),
        Encoding::Base32Hex => Box::new(Base32::new(Base32Variant::Hex, config).unwrap()),
        Encoding::Base16 => Box::new(Base16::upper()),
        Encoding::Base58 => Box::new(Base58::new()),
    };

    let output = if decode {
        // tolerate the newline most shells append
        let trimmed: Vec<u8> = input
            .into_iter()
            .filter(|&b| b != b'\n' && b != b'\r')
            .collect();
        match codec.decode(&trimmed) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("basenc: {}", err);
                process::exit(1);
            }
        }
    } else {
        codec.encode(&input)
    };

    io::stdout().write_all(&output).expect("write to stdout");
    if !decode && wrap == 0 && !output.is_empty() {
        println!();
    }
}
