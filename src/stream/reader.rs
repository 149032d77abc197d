// src/stream/reader.rs

//! Pull-based stream adapter.
//!
//! `CodecReader` wraps an upstream byte source and exposes the encoded or
//! decoded form of its bytes through `std::io::Read`. Each pull requests
//! bytes from upstream, feeds them through the codec/context pair, and
//! returns whatever completed output is available. End-of-input is
//! signaled to the context exactly once, when upstream is exhausted.
//!
//! Adapters may be chained (an encoder feeding a decoder feeding another
//! encoder, and so on); every hop owns an independent context.

use std::io::{self, Read};

use log::debug;

use crate::engine::codec::{BaseNCodec, DecodeError};
use crate::engine::context::CodecContext;

/// Bytes pulled from upstream per refill.
const CHUNK_SIZE: usize = 4096;

/// Which way an adapter pushes bytes through its codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Encode,
    Decode,
}

/// A `Read` adapter that encodes or decodes bytes from an upstream source.
pub struct CodecReader<R: Read, C: BaseNCodec> {
    upstream: R,
    codec: C,
    ctx: CodecContext,
    direction: Direction,
    eof_signaled: bool,
    chunk: [u8; CHUNK_SIZE],
}

impl<R: Read, C: BaseNCodec> CodecReader<R, C> {
    /// Wraps `upstream` so that reads return its bytes encoded by `codec`.
    pub fn encoder(upstream: R, codec: C) -> Self {
        Self::new(upstream, codec, Direction::Encode)
    }

    /// Wraps `upstream` so that reads return its bytes decoded by `codec`.
    pub fn decoder(upstream: R, codec: C) -> Self {
        Self::new(upstream, codec, Direction::Decode)
    }

    fn new(upstream: R, codec: C, direction: Direction) -> Self {
        Self {
            upstream,
            codec,
            ctx: CodecContext::new(),
            direction,
            eof_signaled: false,
            chunk: [0; CHUNK_SIZE],
        }
    }

    /// Consumes the adapter, returning the upstream source.
    pub fn into_inner(self) -> R {
        self.upstream
    }

    fn feed(&mut self, len: usize) -> io::Result<()> {
        match self.direction {
            Direction::Encode => {
                self.codec.encode_update(&mut self.ctx, &self.chunk[..len]);
                Ok(())
            }
            Direction::Decode => self
                .codec
                .decode_update(&mut self.ctx, &self.chunk[..len])
                .map_err(decode_to_io),
        }
    }

    fn signal_eof(&mut self) -> io::Result<()> {
        debug!("upstream exhausted, signaling end-of-input to the context");
        self.eof_signaled = true;
        match self.direction {
            Direction::Encode => {
                self.codec.encode_eof(&mut self.ctx);
                Ok(())
            }
            Direction::Decode => self.codec.decode_eof(&mut self.ctx).map_err(decode_to_io),
        }
    }
}

impl<R: Read, C: BaseNCodec> Read for CodecReader<R, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.ctx.read_output(buf);
            if n > 0 {
                return Ok(n);
            }
            if self.eof_signaled || self.ctx.is_eof() {
                return Ok(0);
            }
            let got = self.upstream.read(&mut self.chunk)?;
            if got == 0 {
                self.signal_eof()?;
            } else {
                self.feed(got)?;
            }
        }
    }
}

pub(crate) fn decode_to_io(err: DecodeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
