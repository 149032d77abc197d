// src/engine/context.rs

//! Mutable, single-use codec state.
//!
//! A `CodecContext` is owned by exactly one encode-or-decode session. It is
//! created empty, mutated only by the engine/codec pair driving it, and
//! discarded once `eof` is set and all buffered output has been read. It is
//! never reused across independent logical streams and is not thread-safe.

/// Initial output buffer capacity.
const DEFAULT_BUFFER_SIZE: usize = 128;

/// Hard ceiling on the output buffer; a request beyond this is a fatal
/// allocation error, not a recoverable one.
const MAX_BUFFER_SIZE: usize = isize::MAX as usize;

/// Resumable state shared by all Base-N codecs.
///
/// Between calls, only the low `modulus * bits_per_symbol` bits of the
/// active work area are meaningful. The write cursor is `buffer.len()`;
/// `read_pos <= buffer.len()` always holds.
#[derive(Debug, Default)]
pub struct CodecContext {
    pub(crate) narrow_work_area: u32, // bit accumulator for 4- and 6-bit codecs
    pub(crate) wide_work_area: u64,   // bit accumulator for the 40-bit Base32 window
    pub(crate) modulus: usize,        // bytes/symbols accumulated toward the next full block
    pub(crate) buffer: Vec<u8>,       // completed output, not yet read by the caller
    pub(crate) read_pos: usize,       // read cursor into `buffer`
    pub(crate) current_line_pos: usize, // symbols emitted since the last line separator
    pub(crate) eof: bool,             // terminal latch; all operations become no-ops
    pub(crate) raw: Vec<u8>,          // whole-input accumulation (Base58 only)
}

impl CodecContext {
    /// Creates an empty context for a fresh encode or decode session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether end-of-input has been signaled on this context.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Number of completed output bytes waiting to be read.
    #[inline]
    pub fn available(&self) -> usize {
        self.buffer.len() - self.read_pos
    }

    /// Grows the output buffer so that `extra` more bytes can be written.
    ///
    /// Capacity doubles, never drops below the requested minimum, and is
    /// clamped to the platform maximum. An unsatisfiable request aborts
    /// via panic; callers cannot recover from it.
    pub(crate) fn ensure_buffer_size(&mut self, extra: usize) {
        let required = match self.buffer.len().checked_add(extra) {
            Some(r) if r <= MAX_BUFFER_SIZE => r,
            _ => panic!("codec output buffer exceeds maximum size"),
        };
        if required > self.buffer.capacity() {
            let doubled = self
                .buffer
                .capacity()
                .max(DEFAULT_BUFFER_SIZE)
                .saturating_mul(2);
            let target = doubled.max(required).min(MAX_BUFFER_SIZE);
            self.buffer.reserve_exact(target - self.buffer.len());
        }
    }

    /// Appends one completed output byte.
    #[inline]
    pub(crate) fn emit(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// Appends a completed output run (line separators, padding).
    #[inline]
    pub(crate) fn emit_slice(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Copies up to `out.len()` completed bytes into `out`, advancing the
    /// read cursor. Returns the number of bytes copied. Once the buffer is
    /// fully drained its storage is reclaimed.
    pub fn read_output(&mut self, out: &mut [u8]) -> usize {
        let n = self.available().min(out.len());
        out[..n].copy_from_slice(&self.buffer[self.read_pos..self.read_pos + n]);
        self.read_pos += n;
        if self.read_pos == self.buffer.len() {
            self.buffer.clear();
            self.read_pos = 0;
        }
        n
    }

    /// Takes all completed output at once, leaving the buffer empty.
    pub fn take_output(&mut self) -> Vec<u8> {
        let mut out = std::mem::take(&mut self.buffer);
        if self.read_pos > 0 {
            out.drain(..self.read_pos);
            self.read_pos = 0;
        }
        out
    }
}
