//! Errors raised while preparing the delay engine.
//!
//! Nothing on the audio path returns an error. Everything that can go wrong
//! is caught here, before the first block, when the host hands us a sample
//! rate and block size.

use thiserror::Error;

/// Why [`DelayEngine::prepare()`](crate::dsp::engine::DelayEngine::prepare)
/// refused a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// Sample rate was zero, negative, or not a number.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// The host promised blocks of zero samples.
    #[error("maximum block size must be at least one sample")]
    InvalidBlockSize,

    /// The longest delay plus one block would overrun the ring.
    #[error(
        "a {max_delay_samples}-sample delay plus a {max_block}-sample block \
         does not fit in a {ring_len}-sample delay line"
    )]
    MaxDelayExceedsRing {
        /// Longest supported delay, in samples.
        max_delay_samples: usize,
        /// Largest block the host will send.
        max_block: usize,
        /// Allocated ring length.
        ring_len: usize,
    },
}
