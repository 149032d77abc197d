// src/stream/writer.rs

//! Push-based stream adapter.
//!
//! `CodecWriter` wraps a downstream sink and forwards the encoded or
//! decoded form of everything written to it. The adapter must be closed
//! with [`CodecWriter::finish`] to flush the final partial block, padding
//! and trailing separator; an adapter that is merely dropped yields
//! truncated output.

use std::io::{self, Write};

use log::debug;

use crate::engine::codec::BaseNCodec;
use crate::engine::context::CodecContext;
use crate::stream::reader::{decode_to_io, Direction};
use crate::utils::error::Result;

/// A `Write` adapter that encodes or decodes bytes into a downstream sink.
pub struct CodecWriter<W: Write, C: BaseNCodec> {
    downstream: W,
    codec: C,
    ctx: CodecContext,
    direction: Direction,
}

impl<W: Write, C: BaseNCodec> CodecWriter<W, C> {
    /// Wraps `downstream` so that written bytes arrive encoded by `codec`.
    pub fn encoder(downstream: W, codec: C) -> Self {
        Self::new(downstream, codec, Direction::Encode)
    }

    /// Wraps `downstream` so that written bytes arrive decoded by `codec`.
    pub fn decoder(downstream: W, codec: C) -> Self {
        Self::new(downstream, codec, Direction::Decode)
    }

    fn new(downstream: W, codec: C, direction: Direction) -> Self {
        Self {
            downstream,
            codec,
            ctx: CodecContext::new(),
            direction,
        }
    }

    /// Signals end-of-input, flushes everything the codec still holds and
    /// returns the downstream sink. Must be called; dropping the adapter
    /// without it truncates the output at the last full block.
    pub fn finish(mut self) -> Result<W> {
        match self.direction {
            Direction::Encode => self.codec.encode_eof(&mut self.ctx),
            Direction::Decode => self.codec.decode_eof(&mut self.ctx)?,
        }
        self.drain()?;
        self.downstream.flush()?;
        debug!("codec writer closed");
        Ok(self.downstream)
    }

    fn drain(&mut self) -> io::Result<()> {
        if self.ctx.available() > 0 {
            let out = self.ctx.take_output();
            self.downstream.write_all(&out)?;
        }
        Ok(())
    }
}

impl<W: Write, C: BaseNCodec> Write for CodecWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.direction {
            Direction::Encode => self.codec.encode_update(&mut self.ctx, buf),
            Direction::Decode => self
                .codec
                .decode_update(&mut self.ctx, buf)
                .map_err(decode_to_io)?,
        }
        self.drain()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.downstream.flush()
    }
}
