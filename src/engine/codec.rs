// src/engine/codec.rs

//! The abstract Base-N codec engine.
//!
//! `BaseNCodec` is the shared contract behind every alphabet codec. The
//! concrete codecs supply the bit-packing step functions
//! (`encode_update` / `decode_update`) and the end-of-input flush
//! (`encode_eof` / `decode_eof`); the engine supplies the one-shot entry
//! points that drive a [`CodecContext`] to completion, the encoded-length
//! arithmetic, line chunking, and alphabet-membership pre-validation.
//!
//! Codecs are immutable after construction and may be shared read-only
//! across threads, each thread driving its own context.

use log::debug;
use thiserror::Error;

use crate::engine::config::{CodecConfig, DecodingPolicy};
use crate::engine::context::CodecContext;

/// Errors produced while decoding malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("byte {byte:#04x} at offset {offset} is not in the alphabet")]
    InvalidByte { byte: u8, offset: usize },
    #[error("strict decoding: the {bits} discarded trailing bits are not all zero")]
    NonZeroTrailingBits { bits: u32 },
    #[error(
        "strict decoding: {count} trailing symbol(s) cannot be produced by a conformant encoder"
    )]
    ImpossibleTrailingLength { count: usize },
}

/// Errors produced while constructing a codec or pre-validating a result size.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line separator byte {byte:#04x} collides with the alphabet or padding")]
    SeparatorInAlphabet { byte: u8 },
    #[error("encoded result ({required} bytes) would exceed the maximum of {max} bytes")]
    ResultTooLarge { required: u64, max: u64 },
}

/// Shared contract for the Base-N alphabet codecs.
pub trait BaseNCodec {
    /// The immutable configuration this codec was constructed with.
    fn config(&self) -> &CodecConfig;

    /// Unencoded bytes per full block (3 for Base64, 5 for Base32, ...).
    fn decoded_block_size(&self) -> usize;

    /// Encoded symbols per full block (4 for Base64, 8 for Base32, ...).
    fn encoded_block_size(&self) -> usize;

    /// Whether `byte` is a symbol of this codec's alphabet. Agrees with the
    /// decode table: true exactly when the table maps `byte` to a value.
    fn is_in_alphabet(&self, byte: u8) -> bool;

    /// The padding byte, for codecs that pad.
    fn pad_byte(&self) -> Option<u8> {
        None
    }

    /// Feeds unencoded bytes into an in-flight encode session.
    ///
    /// No-op once `eof` is set on the context.
    fn encode_update(&self, ctx: &mut CodecContext, input: &[u8]);

    /// Signals end-of-input to an encode session, flushing the final
    /// partial block, padding, and trailing line separator. Idempotent.
    fn encode_eof(&self, ctx: &mut CodecContext);

    /// Feeds encoded symbols into an in-flight decode session.
    ///
    /// Byte offsets in errors are relative to this call's `input`.
    /// No-op once `eof` is set on the context.
    fn decode_update(&self, ctx: &mut CodecContext, input: &[u8]) -> Result<(), DecodeError>;

    /// Signals end-of-input to a decode session, resolving the trailing
    /// group under the configured decoding policy. Idempotent.
    fn decode_eof(&self, ctx: &mut CodecContext) -> Result<(), DecodeError>;

    /// One-shot encode. Empty input yields empty output without creating
    /// a context.
    fn encode(&self, input: &[u8]) -> Vec<u8> {
        if input.is_empty() {
            return Vec::new();
        }
        let mut ctx = CodecContext::new();
        self.encode_update(&mut ctx, input);
        self.encode_eof(&mut ctx);
        let out = ctx.take_output();
        debug!("encoded {} bytes into {} symbols", input.len(), out.len());
        out
    }

    /// One-shot encode to an owned `String`. The engine only ever emits
    /// ASCII, so the conversion is lossless.
    fn encode_to_string(&self, input: &[u8]) -> String {
        String::from_utf8_lossy(&self.encode(input)).into_owned()
    }

    /// One-shot encode with a caller-specified ceiling on the result size,
    /// checked via [`get_encoded_length`](Self::get_encoded_length) before
    /// any encoding work is done.
    fn encode_checked(&self, input: &[u8], max_result_len: u64) -> Result<Vec<u8>, ConfigError> {
        let required = self.get_encoded_length(input.len());
        if required > max_result_len {
            return Err(ConfigError::ResultTooLarge {
                required,
                max: max_result_len,
            });
        }
        Ok(self.encode(input))
    }

    /// One-shot decode. Empty input yields empty output without creating
    /// a context.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, DecodeError> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let mut ctx = CodecContext::new();
        self.decode_update(&mut ctx, input)?;
        self.decode_eof(&mut ctx)?;
        let out = ctx.take_output();
        debug!("decoded {} symbols into {} bytes", input.len(), out.len());
        Ok(out)
    }

    /// One-shot decode from text.
    fn decode_str(&self, input: &str) -> Result<Vec<u8>, DecodeError> {
        self.decode(input.as_bytes())
    }

    /// Size of the encoded output for `input_len` unencoded bytes,
    /// including padding and chunk separators, without encoding anything.
    fn get_encoded_length(&self, input_len: usize) -> u64 {
        let blocks = (input_len as u64).div_ceil(self.decoded_block_size() as u64);
        let mut len = blocks * self.encoded_block_size() as u64;
        let config = self.config();
        if config.is_chunked() && len > 0 {
            len += len.div_ceil(config.line_length as u64) * config.line_separator.len() as u64;
        }
        len
    }

    /// Pre-validates untrusted text against this codec's alphabet.
    ///
    /// With `allow_whitespace_pad` set, ASCII whitespace and the padding
    /// byte are tolerated in addition to the alphabet proper.
    fn is_valid_text(&self, text: &[u8], allow_whitespace_pad: bool) -> bool {
        text.iter().all(|&b| {
            self.is_in_alphabet(b)
                || (allow_whitespace_pad && (is_whitespace(b) || Some(b) == self.pad_byte()))
        })
    }
}

/// ASCII whitespace tolerated by the lenient membership check.
#[inline]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Inserts the line separator once a full line of symbols has been emitted.
/// Called by codecs after every full encoded block.
pub(crate) fn wrap_line_if_due(config: &CodecConfig, ctx: &mut CodecContext, symbols: usize) {
    ctx.current_line_pos += symbols;
    if config.is_chunked() && ctx.current_line_pos >= config.line_length {
        ctx.ensure_buffer_size(config.line_separator.len());
        ctx.emit_slice(&config.line_separator);
        ctx.current_line_pos = 0;
    }
}

/// Terminates the final, possibly short line with exactly one separator.
/// Called by codecs from `encode_eof`.
pub(crate) fn wrap_final_line(config: &CodecConfig, ctx: &mut CodecContext) {
    if config.is_chunked() && ctx.current_line_pos > 0 {
        ctx.ensure_buffer_size(config.line_separator.len());
        ctx.emit_slice(&config.line_separator);
        ctx.current_line_pos = 0;
    }
}

/// Rounds a configured line length down to a whole number of encoded
/// blocks, so separators never split a block.
pub(crate) fn round_line_length(line_length: usize, encoded_block_size: usize) -> usize {
    (line_length / encoded_block_size) * encoded_block_size
}

/// Rejects a line separator that contains alphabet or padding bytes;
/// such a separator could not be skipped unambiguously while decoding.
pub(crate) fn check_separator(
    separator: &[u8],
    in_alphabet: impl Fn(u8) -> bool,
    pad: Option<u8>,
) -> Result<(), ConfigError> {
    for &byte in separator {
        if in_alphabet(byte) || Some(byte) == pad {
            return Err(ConfigError::SeparatorInAlphabet { byte });
        }
    }
    Ok(())
}

/// Strict-policy check (a): the low-order bits a lenient decoder would
/// silently discard must all be zero.
pub(crate) fn check_discarded_bits(
    policy: DecodingPolicy,
    work_area: u64,
    discarded_bits: u32,
) -> Result<(), DecodeError> {
    if policy == DecodingPolicy::Strict && discarded_bits > 0 {
        let mask = (1u64 << discarded_bits) - 1;
        if work_area & mask != 0 {
            return Err(DecodeError::NonZeroTrailingBits {
                bits: discarded_bits,
            });
        }
    }
    Ok(())
}

/// Strict-policy check (b): the trailing symbol count itself must be one a
/// conformant encoder can emit.
pub(crate) fn check_trailing_count(
    policy: DecodingPolicy,
    count: usize,
) -> Result<(), DecodeError> {
    if policy == DecodingPolicy::Strict {
        return Err(DecodeError::ImpossibleTrailingLength { count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_line_length() {
        assert_eq!(round_line_length(76, 4), 76);
        assert_eq!(round_line_length(77, 4), 76);
        assert_eq!(round_line_length(79, 4), 76);
        assert_eq!(round_line_length(76, 8), 72);
        assert_eq!(round_line_length(3, 4), 0);
    }

    #[test]
    fn test_check_separator() {
        let in_alphabet = |b: u8| b.is_ascii_alphanumeric();
        assert!(check_separator(b"\r\n", in_alphabet, Some(b'=')).is_ok());
        assert_eq!(
            check_separator(b"A\n", in_alphabet, Some(b'=')),
            Err(ConfigError::SeparatorInAlphabet { byte: b'A' })
        );
        assert_eq!(
            check_separator(b"=", in_alphabet, Some(b'=')),
            Err(ConfigError::SeparatorInAlphabet { byte: b'=' })
        );
    }

    #[test]
    fn test_check_discarded_bits() {
        assert!(check_discarded_bits(DecodingPolicy::Lenient, 0b1111, 4).is_ok());
        assert!(check_discarded_bits(DecodingPolicy::Strict, 0b10000, 4).is_ok());
        assert_eq!(
            check_discarded_bits(DecodingPolicy::Strict, 0b0100, 4),
            Err(DecodeError::NonZeroTrailingBits { bits: 4 })
        );
    }

    #[test]
    fn test_check_trailing_count() {
        assert!(check_trailing_count(DecodingPolicy::Lenient, 1).is_ok());
        assert_eq!(
            check_trailing_count(DecodingPolicy::Strict, 1),
            Err(DecodeError::ImpossibleTrailingLength { count: 1 })
        );
    }
}
