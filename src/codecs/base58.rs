// src/codecs/base58.rs

//! Bitcoin-style Base58.
//!
//! There is no fixed bits-per-symbol ratio here: the whole input is
//! treated as one arbitrary-precision big-endian integer and converted to
//! radix 58, with leading zero bytes preserved as leading `'1'` symbols
//! (and back again on decode). Because the conversion is whole-value, the
//! codec cannot emit anything until end-of-input is signaled; incremental
//! calls only accumulate raw bytes in the context they were handed. The
//! accumulation lives in a field of that context, so nothing can leak
//! across independent sessions.

use crate::engine::codec::{BaseNCodec, DecodeError};
use crate::engine::config::CodecConfig;
use crate::engine::context::CodecContext;

/// The Bitcoin alphabet: `0`, `O`, `I` and `l` are omitted.
const ENCODE_TABLE: [u8; 58] =
    *b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The radix-58 "zero" symbol.
const ZERO_SYMBOL: u8 = b'1';

/// Sentinel for bytes outside the alphabet.
const INVALID: i8 = -1;

const DECODE_TABLE: [i8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 58 {
        table[ENCODE_TABLE[i] as usize] = i as i8;
        i += 1;
    }
    table
};

/// Base58 codec. Immutable after construction; shareable across threads,
/// each driving its own [`CodecContext`].
#[derive(Clone, Debug)]
pub struct Base58 {
    config: CodecConfig, // policy is irrelevant here; output is never chunked
}

impl Default for Base58 {
    fn default() -> Self {
        Self::new()
    }
}

impl Base58 {
    pub fn new() -> Self {
        Self {
            config: CodecConfig::default(),
        }
    }
}

impl BaseNCodec for Base58 {
    fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Nominal only: Base58 has no fixed block structure.
    fn decoded_block_size(&self) -> usize {
        1
    }

    /// Nominal only: Base58 has no fixed block structure.
    fn encoded_block_size(&self) -> usize {
        1
    }

    fn is_in_alphabet(&self, byte: u8) -> bool {
        DECODE_TABLE[byte as usize] != INVALID
    }

    fn encode_update(&self, ctx: &mut CodecContext, input: &[u8]) {
        if ctx.eof {
            return;
        }
        // Whole-value conversion: nothing can be emitted yet.
        ctx.raw.extend_from_slice(input);
    }

    fn encode_eof(&self, ctx: &mut CodecContext) {
        if ctx.eof {
            return;
        }
        ctx.eof = true;
        let raw = std::mem::take(&mut ctx.raw);
        let zeros = raw.iter().take_while(|&&b| b == 0).count();

        // Repeated divmod of the big-endian value by 58; digits fall out
        // least significant first.
        let mut num: Vec<u8> = raw[zeros..].to_vec();
        let mut digits: Vec<u8> = Vec::with_capacity(num.len() * 138 / 100 + 1);
        while !num.is_empty() {
            let mut remainder = 0u32;
            let mut quotient = Vec::with_capacity(num.len());
            for &byte in &num {
                let acc = (remainder << 8) | byte as u32;
                let q = acc / 58;
                remainder = acc % 58;
                if !quotient.is_empty() || q != 0 {
                    quotient.push(q as u8);
                }
            }
            digits.push(ENCODE_TABLE[remainder as usize]);
            num = quotient;
        }

        ctx.ensure_buffer_size(zeros + digits.len());
        for _ in 0..zeros {
            ctx.emit(ZERO_SYMBOL);
        }
        for &digit in digits.iter().rev() {
            ctx.emit(digit);
        }
    }

    fn decode_update(&self, ctx: &mut CodecContext, input: &[u8]) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        for (offset, &byte) in input.iter().enumerate() {
            if DECODE_TABLE[byte as usize] == INVALID {
                return Err(DecodeError::InvalidByte { byte, offset });
            }
            ctx.raw.push(byte);
        }
        Ok(())
    }

    fn decode_eof(&self, ctx: &mut CodecContext) -> Result<(), DecodeError> {
        if ctx.eof {
            return Ok(());
        }
        ctx.eof = true;
        let raw = std::mem::take(&mut ctx.raw);
        let zeros = raw.iter().take_while(|&&b| b == ZERO_SYMBOL).count();

        // Multiply-accumulate into a little-endian base-256 integer.
        let mut bytes: Vec<u8> = Vec::with_capacity(raw.len() * 733 / 1000 + 1);
        for &symbol in &raw[zeros..] {
            let mut carry = DECODE_TABLE[symbol as usize] as u32;
            for byte in bytes.iter_mut() {
                let acc = (*byte as u32) * 58 + carry;
                *byte = (acc & 0xff) as u8;
                carry = acc >> 8;
            }
            while carry > 0 {
                bytes.push((carry & 0xff) as u8);
                carry >>= 8;
            }
        }

        ctx.ensure_buffer_size(zeros + bytes.len());
        for _ in 0..zeros {
            ctx.emit(0);
        }
        for &byte in bytes.iter().rev() {
            ctx.emit(byte);
        }
        Ok(())
    }

    /// Worst-case upper bound: the encoded form grows by at most
    /// log(256)/log(58) ≈ 1.37 symbols per byte.
    fn get_encoded_length(&self, input_len: usize) -> u64 {
        (input_len as u64 * 138).div_ceil(100)
    }
}
