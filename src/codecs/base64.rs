// src/codecs/base64.rs

//! RFC 2045 / RFC 4648 Base64.
//!
//! Block size is 3 unencoded bytes to 4 encoded symbols, 6 bits per
//! symbol. Two encode tables exist (standard `+/` and URL-safe `-_`) but
//! one merged decode table recognizes both at once, so decoding is
//! alphabet-agnostic regardless of which table produced the input.

use crate::engine::codec::{
    check_discarded_bits, check_separator, check_trailing_count, round_line_length,
    wrap_final_line, wrap_line_if_due, BaseNCodec, ConfigError, DecodeError,
};
use crate::engine::config::CodecConfig;
use crate::engine::context::CodecContext;

/// 3 unencoded bytes per block.
const UNENCODED_BLOCK_SIZE: usize = 3;
/// 4 encoded symbols per block.
const ENCODED_BLOCK_SIZE: usize = 4;
/// Padding byte.
const PAD: u8 = b'=';

const MASK_6BITS: u32 = 0x3f;
const MASK_8BITS: u32 = 0xff;

/// RFC 4648 §4 alphabet: `A-Z a-z 0-9 + /`.
const STANDARD_ENCODE_TABLE: [u8; 64] =
    *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// RFC 4648 §5 alphabet: `A-Z a-z 0-9 - _`.
const URL_SAFE_ENCODE_TABLE: [u8; 64] =
    *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Sentinel for bytes outside the alphabet.
const INVALID: i8 = -1;

/// Merged decode table: inverts the standard table and additionally maps
/// the URL-safe `-` and `_` to 62 and 63.
const DECODE_TABLE: [i8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[STANDARD_ENCODE_TABLE[i] as usize] = i as i8;
        i += 1;
    }
    table[b'-' as usize] = 62;
    table[b'_' as usize] = 63;
    table
};

/// Which encode table a [`Base64`] instance writes with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base64Variant {
    /// `+` / `/`, `=` padding (RFC 4648 §4).
    Standard,
    /// `-` / `_`, padding suppressed (RFC 4648 §5).
    UrlSafe,
}

/// Base64 codec. Immutable after construction; shareable across threads,
/// each driving its own [`CodecContext`].
#[derive(Clone, Debug)]
pub struct Base64 {
    variant: Base64Variant,
    config: CodecConfig, // line_length already rounded to a block multiple
}

impl Base64 {
    /// Standard alphabet, `=` padding, unchunked.
    pub fn standard() -> Self {
        Self {
            variant: Base64Variant::Standard,
            config: CodecConfig::default(),
        }
    }

    /// Standard alphabet with RFC 2045 chunking: 76 symbols per line,
    /// CRLF separators.
    pub fn mime() -> Self {
        let mut config = CodecConfig::mime();
        config.line_length = round_line_length(config.line_length, ENCODED_BLOCK_SIZE);
        Self {
            variant: Base64Variant::Standard,
            config,
        }
    }

    /// URL-safe alphabet, no padding, unchunked.
    pub fn url_safe() -> Self {
        Self {
            variant: Base64Variant::UrlSafe,
            config: CodecConfig::default(),
        }
    }

    /// Builds a codec from an explicit configuration, validating that the
    /// line separator does not collide with the alphabet or padding.
    pub fn new(variant: Base64Variant, mut config: CodecConfig) -> Result<Self, ConfigError> {
        config.line_length = round_line_length(config.line_length, ENCODED_BLOCK_SIZE);
        if config.is_chunked() {
            check_separator(
                &config.line_separator,
                |b| DECODE_TABLE[b as usize] != INVALID,
                Some(PAD),
            )?;
        }
        Ok(Self { variant, config })
    }

    #[inline]
    fn encode_table(&self) -> &'static [u8; 64] {
        match self.variant {
            Base64Variant::Standard => &STANDARD_ENCODE_TABLE,
            Base64Variant::UrlSafe => &URL_SAFE_ENCODE_TABLE,
        }
    }

    /// True when this variant emits `=` padding.
    #[inline]
    fn pads(&self) -> bool {
        self.variant == Base64Variant::Standard
    }

    /// Resolves the trailing symbol group once end-of-input is known.
    fn finish_decode(&self, ctx: &mut CodecContext) -> Result<(), DecodeError> {
        match ctx.modulus {
            0 => {}
            // A lone symbol carries 6 bits; no conformant encoder emits it.
            1 => check_trailing_count(self.config.policy, 1)?,
            2 => {
                // 12 bits = 8 + 4 discarded
                check_discarded_bits(self.config.policy, ctx.narrow_work_area as u64, 4)?;
                ctx.ensure_buffer_size(1);
                ctx.emit(((ctx.narrow_work_area >> 4) & MASK_8BITS) as u8);
            }
            3 => {
                // 18 bits = 8 + 8 + 2 discarded
                check_discarded_bits(self.config.policy, ctx.narrow_work_area as u64, 2)?;
                ctx.ensure_buffer_size(2);
                ctx.emit(((ctx.narrow_work_area >> 10) & MASK_8BITS) as u8);
                ctx.emit(((ctx.narrow_work_area >> 2) & MASK_8BITS) as u8);
            }
            _ => unreachable!("modulus is kept below the encoded block size"),
        }
        ctx.modulus = 0;
        Ok(())
    }
}

impl BaseNCodec for Base64 {
    fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn decoded_block_size(&self) -> usize {
        UNENCODED_BLOCK_SIZE
    }

    fn encoded_block_size(&self) -> usize {
        ENCODED_BLOCK_SIZE
    }

    fn is_in_alphabet(&self, byte: u8) -> bool {
        DECODE_TABLE[byte as usize] != INVALID
    }

    fn pad_byte(&self) -> Option<u8> {
        Some(PAD)
    }

    fn encode_update(&self, ctx: &mut CodecContext, input: &[u8]) {
        if ctx.eof {
            return;
        }
        let table = self.encode_table();
        for &byte in input {
            ctx.narrow_work_area = (ctx.narrow_work_area << 8) | byte as u32;
            ctx.modulus = (ctx.modulus + 1) % UNENCODED_BLOCK_SIZE;
            if ctx.modulus == 0 {
                ctx.ensure_buffer_size(ENCODED_BLOCK_SIZE);
                let w = ctx.narrow_work_area;
                ctx.emit(table[((w >> 18) & MASK_6BITS) as usize]);
                ctx.emit(table[((w >> 12) & MASK_6BITS) as usize]);
                ctx.emit(table[((w >> 6) & MASK_6BITS) as usize]);
                ctx.emit(table[(w & MASK_6BITS) as usize]);
                wrap_line_if_due(&self.config, ctx, ENCODED_BLOCK_SIZE);
            }
        }
    }

    fn encode_eof(&self, ctx: &mut CodecContext) {
        if ctx.eof {
            return;
        }
        ctx.eof = true;
        let table = self.encode_table();
        let mut emitted = 0usize;
        match ctx.modulus {
            0 => {}
            1 => {
                // 8 leftover bits: two symbols, pad to a full block
                ctx.ensure_buffer_size(ENCODED_BLOCK_SIZE);
                let w = ctx.narrow_work_area;
                ctx.emit(table[((w >> 2) & MASK_6BITS) as usize]);
                ctx.emit(table[((w << 4) & MASK_6BITS) as usize]);
                emitted = 2;
                if self.pads() {
                    ctx.emit(PAD);
                    ctx.emit(PAD);
                    emitted = 4;
                }
            }
            2 => {
                // 16 leftover bits: three symbols, one pad
                ctx.ensure_buffer_size(ENCODED_BLOCK_SIZE);
                let w = ctx.narrow_work_area;
                ctx.emit(table[((w >> 10) & MASK_6BITS) as usize]);
                ctx.emit(table[((w >> 4) & MASK_6BITS) as usize]);
                ctx.emit(table[((w << 2) & MASK_6BITS) as usize]);
                emitted = 3;
                if self.pads() {
                    ctx.emit(PAD);
                    emitted = 4;
                }
            }
            _ => unreachable!("modulus is kept below the unencoded block size"),
        }
        ctx.modulus = 0;
        ctx.current_line_pos += emitted;
        wrap_final_line(&self.config, ctx);
    }

    fn decode_update(&self, ctx: &mut CodecContext, input: &[u8]) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        for &byte in input {
            if byte == PAD {
                // Padding terminates the stream; its absence is not an error.
                ctx.eof = true;
                break;
            }
            let value = DECODE_TABLE[byte as usize];
            if value == INVALID {
                // Foreign bytes (whitespace, separators) are skipped here;
                // only the trailing group is policy-checked.
                continue;
            }
            ctx.modulus = (ctx.modulus + 1) % ENCODED_BLOCK_SIZE;
            ctx.narrow_work_area = (ctx.narrow_work_area << 6) | value as u32;
            if ctx.modulus == 0 {
                ctx.ensure_buffer_size(UNENCODED_BLOCK_SIZE);
                let w = ctx.narrow_work_area;
                ctx.emit(((w >> 16) & MASK_8BITS) as u8);
                ctx.emit(((w >> 8) & MASK_8BITS) as u8);
                ctx.emit((w & MASK_8BITS) as u8);
            }
        }
        if ctx.eof {
            // First '=' seen mid-stream: flush the trailing group now.
            self.finish_decode(ctx)?;
        }
        Ok(())
    }

    fn decode_eof(&self, ctx: &mut CodecContext) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        ctx.eof = true;
        self.finish_decode(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::DecodingPolicy;

    #[test]
    fn test_rfc4648_vectors() {
        let codec = Base64::standard();
        assert_eq!(codec.encode_to_string(b""), "");
        assert_eq!(codec.encode_to_string(b"f"), "Zg==");
        assert_eq!(codec.encode_to_string(b"fo"), "Zm8=");
        assert_eq!(codec.encode_to_string(b"foo"), "Zm9v");
        assert_eq!(codec.encode_to_string(b"foob"), "Zm9vYg==");
        assert_eq!(codec.encode_to_string(b"fooba"), "Zm9vYmE=");
        assert_eq!(codec.encode_to_string(b"foobar"), "Zm9vYmFy");
        assert_eq!(codec.encode_to_string(b"Hello World"), "SGVsbG8gV29ybGQ=");
    }

    #[test]
    fn test_decode_vectors() {
        let codec = Base64::standard();
        assert_eq!(codec.decode_str("QQ==").unwrap(), b"A");
        assert_eq!(codec.decode_str("Zm9vYmFy").unwrap(), b"foobar");
        // padding is optional
        assert_eq!(codec.decode_str("Zm9vYg").unwrap(), b"foob");
    }

    #[test]
    fn test_decode_is_alphabet_agnostic() {
        // URL-safe and standard symbols decode through the same table.
        let codec = Base64::standard();
        assert_eq!(codec.decode_str("-_-_").unwrap(), [0xfb, 0xff, 0xbf]);
        assert_eq!(codec.decode_str("+/+/").unwrap(), [0xfb, 0xff, 0xbf]);
    }

    #[test]
    fn test_url_safe_suppresses_padding() {
        let codec = Base64::url_safe();
        assert_eq!(codec.encode_to_string(b"f"), "Zg");
        assert_eq!(codec.encode_to_string(&[0xfb, 0xff, 0xbf]), "-_-_");
    }

    #[test]
    fn test_pad_terminates_decoding() {
        let codec = Base64::standard();
        // everything after the first '=' is ignored
        assert_eq!(codec.decode_str("Zg==Zm9v").unwrap(), b"f");
    }

    #[test]
    fn test_decode_skips_foreign_bytes() {
        let codec = Base64::standard();
        assert_eq!(codec.decode_str("Zm9v\r\nYmFy").unwrap(), b"foobar");
        assert_eq!(codec.decode_str(" Z m 9 v ").unwrap(), b"foo");
    }

    #[test]
    fn test_strict_rejects_nonzero_trailing_bits() {
        let strict = Base64::new(
            Base64Variant::Standard,
            CodecConfig::default().with_policy(DecodingPolicy::Strict),
        )
        .unwrap();
        // "Zh" ends with non-zero discarded bits ('h' = 33 = 0b100001)
        assert_eq!(
            strict.decode_str("Zh"),
            Err(DecodeError::NonZeroTrailingBits { bits: 4 })
        );
        // "Zg" is what a conformant encoder emits for "f"
        assert_eq!(strict.decode_str("Zg").unwrap(), b"f");
        // lenient accepts both, truncating to the same bytes
        let lenient = Base64::standard();
        assert_eq!(lenient.decode_str("Zh").unwrap(), b"f");
    }

    #[test]
    fn test_strict_rejects_lone_trailing_symbol() {
        let strict = Base64::new(
            Base64Variant::Standard,
            CodecConfig::default().with_policy(DecodingPolicy::Strict),
        )
        .unwrap();
        assert_eq!(
            strict.decode_str("Zm9vQ"),
            Err(DecodeError::ImpossibleTrailingLength { count: 1 })
        );
        // lenient discards the lone symbol
        assert_eq!(Base64::standard().decode_str("Zm9vQ").unwrap(), b"foo");
    }

    #[test]
    fn test_mime_chunking() {
        let codec = Base64::mime();
        let input = vec![0u8; 57]; // exactly one 76-symbol line
        let encoded = codec.encode(&input);
        assert_eq!(encoded.len(), 78);
        assert!(encoded.ends_with(b"\r\n"));
        assert_eq!(&encoded[..76], vec![b'A'; 76].as_slice());
        // a short final line still gets exactly one trailing separator
        let encoded = codec.encode(&vec![0u8; 58]);
        assert!(encoded.ends_with(b"AA==\r\n"));
        assert_eq!(encoded.iter().filter(|&&b| b == b'\n').count(), 2);
    }

    #[test]
    fn test_separator_validation() {
        let err = Base64::new(
            Base64Variant::Standard,
            CodecConfig::default()
                .with_line_length(76)
                .with_line_separator(b"A\n"),
        );
        assert_eq!(
            err.err(),
            Some(ConfigError::SeparatorInAlphabet { byte: b'A' })
        );
    }

    #[test]
    fn test_get_encoded_length() {
        let codec = Base64::standard();
        assert_eq!(codec.get_encoded_length(0), 0);
        assert_eq!(codec.get_encoded_length(1), 4);
        assert_eq!(codec.get_encoded_length(3), 4);
        assert_eq!(codec.get_encoded_length(11), 16);
        let mime = Base64::mime();
        assert_eq!(mime.get_encoded_length(57), 78);
        assert_eq!(mime.get_encoded_length(58), 84);
        assert_eq!(mime.encode(&vec![0u8; 58]).len() as u64, 84);
    }

    #[test]
    fn test_is_in_alphabet() {
        let codec = Base64::standard();
        assert!(codec.is_in_alphabet(b'A'));
        assert!(codec.is_in_alphabet(b'/'));
        assert!(codec.is_in_alphabet(b'-')); // merged table accepts URL-safe
        assert!(!codec.is_in_alphabet(b'='));
        assert!(!codec.is_in_alphabet(b' '));
        assert!(codec.is_valid_text(b"Zm9v Yg==", true));
        assert!(!codec.is_valid_text(b"Zm9v Yg==", false));
    }

    #[test]
    fn test_eof_is_terminal() {
        let codec = Base64::standard();
        let mut ctx = CodecContext::new();
        codec.encode_update(&mut ctx, b"f");
        codec.encode_eof(&mut ctx);
        let first = ctx.take_output();
        assert_eq!(first, b"Zg==");
        // all further operations are no-ops
        codec.encode_update(&mut ctx, b"oo");
        codec.encode_eof(&mut ctx);
        assert_eq!(ctx.available(), 0);
    }
}
