// src/engine/config.rs

//! Immutable codec configuration.
//!
//! A `CodecConfig` is built once with consuming `with_*` methods, validated
//! by the codec constructor it is handed to, and never mutated afterwards.
//! There is no global state: every codec instance owns its configuration.

/// Governs how a trailing, structurally-incomplete final group is handled
/// at end-of-input while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodingPolicy {
    /// Compose whatever complete bytes are possible and silently discard
    /// the leftover bits.
    #[default]
    Lenient,
    /// Reject input whose trailing group could not have been produced by a
    /// conformant encoder: non-zero discarded bits or an impossible
    /// trailing-symbol count.
    Strict,
}

/// Shared configuration accepted by every codec constructor.
///
/// All fields are optional; `CodecConfig::default()` selects the unchunked,
/// lenient behavior of the one-shot API.
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Encoded symbols per output line; 0 disables chunking. Codecs round
    /// this down to a multiple of their encoded block size.
    pub line_length: usize,
    /// Separator bytes inserted between lines when chunking is enabled.
    pub line_separator: Vec<u8>,
    /// Trailing-group handling while decoding.
    pub policy: DecodingPolicy,
}

/// Default line length for MIME-style chunked Base64 output (RFC 2045).
pub const MIME_LINE_LENGTH: usize = 76;

/// Default line separator for chunked output (RFC 2045).
pub const MIME_LINE_SEPARATOR: &[u8] = b"\r\n";

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            line_length: 0,
            line_separator: MIME_LINE_SEPARATOR.to_vec(),
            policy: DecodingPolicy::Lenient,
        }
    }
}

impl CodecConfig {
    /// Configuration for MIME-style chunked output: 76 symbols per line,
    /// CRLF separators.
    pub fn mime() -> Self {
        Self::default().with_line_length(MIME_LINE_LENGTH)
    }

    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    pub fn with_line_separator(mut self, separator: &[u8]) -> Self {
        self.line_separator = separator.to_vec();
        self
    }

    pub fn with_policy(mut self, policy: DecodingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// True when chunked output is requested.
    #[inline]
    pub fn is_chunked(&self) -> bool {
        self.line_length > 0 && !self.line_separator.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unchunked_lenient() {
        let config = CodecConfig::default();
        assert_eq!(config.line_length, 0);
        assert!(!config.is_chunked());
        assert_eq!(config.policy, DecodingPolicy::Lenient);
    }

    #[test]
    fn test_mime_preset() {
        let config = CodecConfig::mime();
        assert_eq!(config.line_length, MIME_LINE_LENGTH);
        assert_eq!(config.line_separator, b"\r\n");
        assert!(config.is_chunked());
    }

    #[test]
    fn test_builder_chain() {
        let config = CodecConfig::default()
            .with_line_length(64)
            .with_line_separator(b"\n")
            .with_policy(DecodingPolicy::Strict);
        assert_eq!(config.line_length, 64);
        assert_eq!(config.line_separator, b"\n");
        assert_eq!(config.policy, DecodingPolicy::Strict);
    }
}
