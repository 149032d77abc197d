//! # Base-N Codec Library
//!
//! A family of binary-to-text codecs (Base64, Base32, Base16/Hex, Base58)
//! built on a shared, resumable encoding/decoding engine. Arbitrary byte
//! sequences become restricted-alphabet text and back, either in one shot
//! or incrementally, one chunk at a time.
//!
//! This library is organized into several modules:
//! - `utils`: Error handling and the crate-wide `Result` alias
//! - `engine`: The shared codec engine — context state, configuration,
//!   and the abstract `BaseNCodec` contract
//! - `codecs`: The concrete alphabet codecs (Base64, Base32, Base16, Base58)
//! - `stream`: Reader/writer adapters that feed bytes through a codec
//!   incrementally over `std::io` streams

// Re-export commonly used types at the crate root
pub use utils::error::{CodecError, Result};

// Core modules
pub mod utils {
    pub mod error;
}

pub mod engine {
    pub mod codec;
    pub mod config;
    pub mod context;
}

pub mod codecs {
    pub mod base16;
    pub mod base32;
    pub mod base58;
    pub mod base64;
}

pub mod stream {
    pub mod reader;
    pub mod writer;
}

// Public API exports
pub use engine::codec::{BaseNCodec, ConfigError, DecodeError};
pub use engine::config::{CodecConfig, DecodingPolicy};
pub use engine::context::CodecContext;

pub use codecs::base16::{Base16, Base16Variant};
pub use codecs::base32::{Base32, Base32Variant};
pub use codecs::base58::Base58;
pub use codecs::base64::{Base64, Base64Variant};

pub use stream::reader::CodecReader;
pub use stream::writer::CodecWriter;

// Constants
pub const CODEC_VERSION: &str = "0.9.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(CODEC_VERSION, "0.9.0");
    }

    #[test]
    fn test_root_reexports() {
        let codec = Base64::standard();
        assert_eq!(codec.encode_to_string(b"Hello World"), "SGVsbG8gV29ybGQ=");
    }
}
