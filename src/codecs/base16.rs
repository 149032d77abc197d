// src/codecs/base16.rs

//! RFC 4648 §8 Base16 (Hex).
//!
//! Block size is 1 unencoded byte to 2 encoded symbols, 4 bits per
//! symbol. No padding, no chunking, and no tolerance for foreign bytes:
//! unlike Base64/Base32, a byte outside the alphabet is a hard decode
//! error, not something to skip. The upper- and lower-case alphabets are
//! distinct variants with separate decode tables; they are never merged.

use crate::engine::codec::{
    check_trailing_count, BaseNCodec, ConfigError, DecodeError,
};
use crate::engine::config::CodecConfig;
use crate::engine::context::CodecContext;

/// 1 unencoded byte per block.
const UNENCODED_BLOCK_SIZE: usize = 1;
/// 2 encoded symbols per block.
const ENCODED_BLOCK_SIZE: usize = 2;

const MASK_4BITS: u32 = 0x0f;
const MASK_8BITS: u32 = 0xff;

const UPPER_ENCODE_TABLE: [u8; 16] = *b"0123456789ABCDEF";
const LOWER_ENCODE_TABLE: [u8; 16] = *b"0123456789abcdef";

/// Sentinel for bytes outside the alphabet.
const INVALID: i8 = -1;

const fn invert(encode_table: &[u8; 16]) -> [i8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 16 {
        table[encode_table[i] as usize] = i as i8;
        i += 1;
    }
    table
}

const UPPER_DECODE_TABLE: [i8; 256] = invert(&UPPER_ENCODE_TABLE);
const LOWER_DECODE_TABLE: [i8; 256] = invert(&LOWER_ENCODE_TABLE);

/// Case variant of a [`Base16`] codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base16Variant {
    /// `0-9 A-F` (the RFC 4648 canonical form).
    Upper,
    /// `0-9 a-f`.
    Lower,
}

/// Base16 codec. Immutable after construction; shareable across threads,
/// each driving its own [`CodecContext`].
#[derive(Clone, Debug)]
pub struct Base16 {
    variant: Base16Variant,
    config: CodecConfig, // line_length forced to 0: Base16 never chunks
}

impl Base16 {
    /// Upper-case alphabet, lenient policy.
    pub fn upper() -> Self {
        Self {
            variant: Base16Variant::Upper,
            config: CodecConfig::default(),
        }
    }

    /// Lower-case alphabet, lenient policy.
    pub fn lower() -> Self {
        Self {
            variant: Base16Variant::Lower,
            config: CodecConfig::default(),
        }
    }

    /// Builds a codec from an explicit configuration. Only the decoding
    /// policy is honored; Base16 output is never chunked.
    pub fn new(variant: Base16Variant, mut config: CodecConfig) -> Result<Self, ConfigError> {
        config.line_length = 0;
        Ok(Self { variant, config })
    }

    #[inline]
    fn encode_table(&self) -> &'static [u8; 16] {
        match self.variant {
            Base16Variant::Upper => &UPPER_ENCODE_TABLE,
            Base16Variant::Lower => &LOWER_ENCODE_TABLE,
        }
    }

    #[inline]
    fn decode_table(&self) -> &'static [i8; 256] {
        match self.variant {
            Base16Variant::Upper => &UPPER_DECODE_TABLE,
            Base16Variant::Lower => &LOWER_DECODE_TABLE,
        }
    }
}

impl BaseNCodec for Base16 {
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
        self.decode_table()[byte as usize] != INVALID
    }

    fn encode_update(&self, ctx: &mut CodecContext, input: &[u8]) {
        if ctx.eof {
            return;
        }
        let table = self.encode_table();
        ctx.ensure_buffer_size(input.len() * ENCODED_BLOCK_SIZE);
        for &byte in input {
            ctx.emit(table[(byte >> 4) as usize]);
            ctx.emit(table[(byte & MASK_4BITS as u8) as usize]);
        }
    }

    fn encode_eof(&self, ctx: &mut CodecContext) {
        // Every input byte maps to a whole symbol pair; nothing is in flight.
        ctx.eof = true;
    }

    fn decode_update(&self, ctx: &mut CodecContext, input: &[u8]) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        let table = self.decode_table();
        for (offset, &byte) in input.iter().enumerate() {
            let value = table[byte as usize];
            if value == INVALID {
                // Base16 does not skip stray characters.
                return Err(DecodeError::InvalidByte { byte, offset });
            }
            ctx.modulus = (ctx.modulus + 1) % ENCODED_BLOCK_SIZE;
            ctx.narrow_work_area = (ctx.narrow_work_area << 4) | value as u32;
            if ctx.modulus == 0 {
                ctx.ensure_buffer_size(1);
                ctx.emit((ctx.narrow_work_area & MASK_8BITS) as u8);
            }
        }
        Ok(())
    }

    /// Odd-length input leaves a half byte in flight at end of input. The
    /// lenient policy discards it; only the strict policy rejects it with
    /// [`DecodeError::ImpossibleTrailingLength`].
    fn decode_eof(&self, ctx: &mut CodecContext) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        ctx.eof = true;
        if ctx.modulus != 0 {
            // Odd number of hex digits: a half byte is in flight.
            check_trailing_count(self.config.policy, 1)?;
            ctx.modulus = 0;
        }
        Ok(())
    }
}
