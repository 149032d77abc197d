// src/codecs/base32.rs

//! RFC 4648 Base32 and Base32-Hex.
//!
//! Block size is 5 unencoded bytes to 8 encoded symbols, 5 bits per
//! symbol, accumulated in a 40-bit working window. The two alphabets keep
//! separate decode tables; unlike Base64 they are never merged.
//!
//! Trailing groups of 2, 4, 5 or 7 symbols are the only ones a conformant
//! encoder can produce. Lenient decoding nevertheless accepts 3- and
//! 6-symbol groups for backward compatibility with sloppy encoders; strict
//! decoding rejects them along with the always-impossible single symbol.

use crate::engine::codec::{
    check_discarded_bits, check_separator, check_trailing_count, round_line_length,
    wrap_final_line, wrap_line_if_due, BaseNCodec, ConfigError, DecodeError,
};
use crate::engine::config::CodecConfig;
use crate::engine::context::CodecContext;

/// 5 unencoded bytes per block.
const UNENCODED_BLOCK_SIZE: usize = 5;
/// 8 encoded symbols per block.
const ENCODED_BLOCK_SIZE: usize = 8;
/// Padding byte.
const PAD: u8 = b'=';

const MASK_5BITS: u64 = 0x1f;
const MASK_8BITS: u64 = 0xff;

/// RFC 4648 §6 alphabet: `A-Z 2-7`.
const STANDARD_ENCODE_TABLE: [u8; 32] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// RFC 4648 §7 "extended hex" alphabet: `0-9 A-V`.
const HEX_ENCODE_TABLE: [u8; 32] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

/// Sentinel for bytes outside the alphabet.
const INVALID: i8 = -1;

const fn invert(encode_table: &[u8; 32]) -> [i8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 32 {
        table[encode_table[i] as usize] = i as i8;
        i += 1;
    }
    table
}

const STANDARD_DECODE_TABLE: [i8; 256] = invert(&STANDARD_ENCODE_TABLE);
const HEX_DECODE_TABLE: [i8; 256] = invert(&HEX_ENCODE_TABLE);

/// Which RFC 4648 alphabet a [`Base32`] instance uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base32Variant {
    /// `A-Z 2-7` (RFC 4648 §6).
    Standard,
    /// `0-9 A-V` (RFC 4648 §7).
    Hex,
}

/// Base32 codec. Immutable after construction; shareable across threads,
/// each driving its own [`CodecContext`].
#[derive(Clone, Debug)]
pub struct Base32 {
    variant: Base32Variant,
    config: CodecConfig, // line_length already rounded to a block multiple
}

impl Base32 {
    /// Standard alphabet, `=` padding, unchunked.
    pub fn standard() -> Self {
        Self {
            variant: Base32Variant::Standard,
            config: CodecConfig::default(),
        }
    }

    /// Extended-hex alphabet, `=` padding, unchunked.
    pub fn hex() -> Self {
        Self {
            variant: Base32Variant::Hex,
            config: CodecConfig::default(),
        }
    }

    /// Builds a codec from an explicit configuration, validating that the
    /// line separator does not collide with the alphabet or padding.
    pub fn new(variant: Base32Variant, mut config: CodecConfig) -> Result<Self, ConfigError> {
        config.line_length = round_line_length(config.line_length, ENCODED_BLOCK_SIZE);
        if config.is_chunked() {
            let decode_table = match variant {
                Base32Variant::Standard => &STANDARD_DECODE_TABLE,
                Base32Variant::Hex => &HEX_DECODE_TABLE,
            };
            check_separator(
                &config.line_separator,
                |b| decode_table[b as usize] != INVALID,
                Some(PAD),
            )?;
        }
        Ok(Self { variant, config })
    }

    #[inline]
    fn encode_table(&self) -> &'static [u8; 32] {
        match self.variant {
            Base32Variant::Standard => &STANDARD_ENCODE_TABLE,
            Base32Variant::Hex => &HEX_ENCODE_TABLE,
        }
    }

    #[inline]
    fn decode_table(&self) -> &'static [i8; 256] {
        match self.variant {
            Base32Variant::Standard => &STANDARD_DECODE_TABLE,
            Base32Variant::Hex => &HEX_DECODE_TABLE,
        }
    }

    /// Resolves the trailing symbol group once end-of-input is known.
    ///
    /// Trailing counts 3 and 6 cannot come from a conformant encoder, yet
    /// lenient mode still decodes them (15 bits -> 1 byte, 30 bits -> 3
    /// bytes). This is a deliberate backward-compatibility quirk, not an
    /// oversight; strict mode rejects them.
    fn finish_decode(&self, ctx: &mut CodecContext) -> Result<(), DecodeError> {
        let policy = self.config.policy;
        let w = ctx.wide_work_area;
        match ctx.modulus {
            0 => {}
            1 => {
                // 5 bits: impossible from any encoder, nothing to compose
                check_trailing_count(policy, 1)?;
            }
            2 => {
                // 10 bits = 8 + 2 discarded
                check_discarded_bits(policy, w, 2)?;
                ctx.ensure_buffer_size(1);
                ctx.emit(((w >> 2) & MASK_8BITS) as u8);
            }
            3 => {
                // 15 bits = 8 + 7 discarded; impossible, decoded leniently
                check_trailing_count(policy, 3)?;
                ctx.ensure_buffer_size(1);
                ctx.emit(((w >> 7) & MASK_8BITS) as u8);
            }
            4 => {
                // 20 bits = 16 + 4 discarded
                check_discarded_bits(policy, w, 4)?;
                ctx.ensure_buffer_size(2);
                ctx.emit(((w >> 12) & MASK_8BITS) as u8);
                ctx.emit(((w >> 4) & MASK_8BITS) as u8);
            }
            5 => {
                // 25 bits = 24 + 1 discarded
                check_discarded_bits(policy, w, 1)?;
                ctx.ensure_buffer_size(3);
                ctx.emit(((w >> 17) & MASK_8BITS) as u8);
                ctx.emit(((w >> 9) & MASK_8BITS) as u8);
                ctx.emit(((w >> 1) & MASK_8BITS) as u8);
            }
            6 => {
                // 30 bits = 24 + 6 discarded; impossible, decoded leniently
                check_trailing_count(policy, 6)?;
                ctx.ensure_buffer_size(3);
                ctx.emit(((w >> 22) & MASK_8BITS) as u8);
                ctx.emit(((w >> 14) & MASK_8BITS) as u8);
                ctx.emit(((w >> 6) & MASK_8BITS) as u8);
            }
            7 => {
                // 35 bits = 32 + 3 discarded
                check_discarded_bits(policy, w, 3)?;
                ctx.ensure_buffer_size(4);
                ctx.emit(((w >> 27) & MASK_8BITS) as u8);
                ctx.emit(((w >> 19) & MASK_8BITS) as u8);
                ctx.emit(((w >> 11) & MASK_8BITS) as u8);
                ctx.emit(((w >> 3) & MASK_8BITS) as u8);
            }
            _ => unreachable!("modulus is kept below the encoded block size"),
        }
        ctx.modulus = 0;
        Ok(())
    }
}

impl BaseNCodec for Base32 {
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

    fn pad_byte(&self) -> Option<u8> {
        Some(PAD)
    }

    fn encode_update(&self, ctx: &mut CodecContext, input: &[u8]) {
        if ctx.eof {
            return;
        }
        let table = self.encode_table();
        for &byte in input {
            ctx.wide_work_area = (ctx.wide_work_area << 8) | byte as u64;
            ctx.modulus = (ctx.modulus + 1) % UNENCODED_BLOCK_SIZE;
            if ctx.modulus == 0 {
                ctx.ensure_buffer_size(ENCODED_BLOCK_SIZE);
                let w = ctx.wide_work_area;
                ctx.emit(table[((w >> 35) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 30) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 25) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 20) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 15) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 10) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 5) & MASK_5BITS) as usize]);
                ctx.emit(table[(w & MASK_5BITS) as usize]);
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
        let w = ctx.wide_work_area;
        let mut emitted = 0usize;
        ctx.ensure_buffer_size(ENCODED_BLOCK_SIZE);
        match ctx.modulus {
            0 => {}
            1 => {
                // 8 leftover bits: 2 symbols, 6 pads
                ctx.emit(table[((w >> 3) & MASK_5BITS) as usize]);
                ctx.emit(table[((w << 2) & MASK_5BITS) as usize]);
                emitted = 2;
            }
            2 => {
                // 16 leftover bits: 4 symbols, 4 pads
                ctx.emit(table[((w >> 11) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 6) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 1) & MASK_5BITS) as usize]);
                ctx.emit(table[((w << 4) & MASK_5BITS) as usize]);
                emitted = 4;
            }
            3 => {
                // 24 leftover bits: 5 symbols, 3 pads
                ctx.emit(table[((w >> 19) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 14) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 9) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 4) & MASK_5BITS) as usize]);
                ctx.emit(table[((w << 1) & MASK_5BITS) as usize]);
                emitted = 5;
            }
            4 => {
                // 32 leftover bits: 7 symbols, 1 pad
                ctx.emit(table[((w >> 27) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 22) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 17) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 12) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 7) & MASK_5BITS) as usize]);
                ctx.emit(table[((w >> 2) & MASK_5BITS) as usize]);
                ctx.emit(table[((w << 3) & MASK_5BITS) as usize]);
                emitted = 7;
            }
            _ => unreachable!("modulus is kept below the unencoded block size"),
        }
        if emitted > 0 {
            while emitted < ENCODED_BLOCK_SIZE {
                ctx.emit(PAD);
                emitted += 1;
            }
        }
        ctx.modulus = 0;
        ctx.current_line_pos += emitted;
        wrap_final_line(&self.config, ctx);
    }

    fn decode_update(&self, ctx: &mut CodecContext, input: &[u8]) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        let table = self.decode_table();
        for &byte in input {
            if byte == PAD {
                // Padding terminates the stream; its absence is not an error.
                ctx.eof = true;
                break;
            }
            let value = table[byte as usize];
            if value == INVALID {
                // Foreign bytes (whitespace, separators) are skipped here;
                // only the trailing group is policy-checked.
                continue;
            }
            ctx.modulus = (ctx.modulus + 1) % ENCODED_BLOCK_SIZE;
            ctx.wide_work_area = (ctx.wide_work_area << 5) | value as u64;
            if ctx.modulus == 0 {
                ctx.ensure_buffer_size(UNENCODED_BLOCK_SIZE);
                let w = ctx.wide_work_area;
                ctx.emit(((w >> 32) & MASK_8BITS) as u8);
                ctx.emit(((w >> 24) & MASK_8BITS) as u8);
                ctx.emit(((w >> 16) & MASK_8BITS) as u8);
                ctx.emit(((w >> 8) & MASK_8BITS) as u8);
                ctx.emit((w & MASK_8BITS) as u8);
            }
        }
        if ctx.eof {
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
