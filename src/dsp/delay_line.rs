//! # Delay Line (Multi-Channel Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back after a
//! specified time delay. This is the fundamental building block of every
//! echo effect.
//!
//! ## Block-Based Ring Buffer
//!
//! Imagine a circular tape loop with one row of tape per audio channel. A
//! "write head" records incoming audio onto the tape, and a "read head"
//! plays it back from a position further behind. The distance between the
//! two heads is the delay time.
//!
//! Unlike a sample-at-a-time delay line, this one moves a whole block per
//! step:
//!
//! 1. Write the block at `write_pos` (wrapping past the end if needed).
//! 2. Read a block starting at `(write_pos - delay_in_samples)`.
//! 3. After every channel has been processed, advance `write_pos` by the
//!    block length.
//!
//! All channels share one write position, so the rows stay in lockstep.
//!
//! ## Sizing
//!
//! The ring holds `2 * (sample_rate + max_block)` samples. The longest
//! delay is 2 seconds (`2 * sample_rate` samples), so reading a full block
//! that far back still ends before the block currently being written:
//!
//! ```text
//! 2 * sample_rate + max_block  <  2 * (sample_rate + max_block)
//! ```

use super::ramp::{read_wrapped, write_wrapped, Blend, GainRamp};

/// A ring buffer per audio channel, sharing a single write cursor.
///
/// The rows are allocated once, in [`DelayLine::new()`], when the sample
/// rate and maximum block size are known. Nothing in the processing path
/// allocates.
pub struct DelayLine {
    /// One ring per channel. All values start at 0.0 (silence).
    channels: Vec<Vec<f32>>,

    /// Where the current block will be written. Shared by every channel
    /// and only moved by [`advance()`](Self::advance).
    write_pos: usize,

    /// Cached ring length, identical for every row.
    buffer_len: usize,
}

impl DelayLine {
    /// Ring length for a session running at `sample_rate` with blocks of at
    /// most `max_block` samples.
    ///
    /// At 44.1 kHz and 512-sample blocks that is 89 224 samples per channel,
    /// about 350 KB. Fractional rates round up so the longest delay still
    /// fits after it is rounded to whole samples.
    pub fn required_len(sample_rate: f32, max_block: usize) -> usize {
        2 * (sample_rate.ceil() as usize + max_block)
    }

    /// Create `num_channels` rings of `buffer_len` samples each.
    pub fn new(num_channels: usize, buffer_len: usize) -> Self {
        Self {
            channels: vec![vec![0.0; buffer_len]; num_channels],
            write_pos: 0,
            buffer_len,
        }
    }

    /// An empty delay line with no channels, used before the first prepare.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn len(&self) -> usize {
        self.buffer_len
    }

    pub fn is_empty(&self) -> bool {
        self.buffer_len == 0 || self.channels.is_empty()
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Ring index `delay_samples` behind the write cursor.
    ///
    /// We add `buffer_len` before subtracting to stay in unsigned range,
    /// then wrap with modulo:
    ///
    /// ```text
    /// read_pos = (buffer_len + write_pos - delay) % buffer_len
    /// ```
    ///
    /// `delay_samples` must not exceed `buffer_len`.
    pub fn read_pos(&self, delay_samples: usize) -> usize {
        nih_plug::nih_debug_assert!(delay_samples <= self.buffer_len);
        (self.buffer_len + self.write_pos - delay_samples) % self.buffer_len
    }

    /// Overwrite the ring at the write cursor with `input`, ramped.
    pub fn fill(&mut self, channel: usize, input: &[f32], ramp: GainRamp) {
        let write_pos = self.write_pos;
        write_wrapped(
            &mut self.channels[channel],
            write_pos,
            input,
            ramp,
            Blend::Replace,
        );
    }

    /// Mix `input` on top of the ring at the write cursor, ramped.
    pub fn add(&mut self, channel: usize, input: &[f32], ramp: GainRamp) {
        let write_pos = self.write_pos;
        write_wrapped(
            &mut self.channels[channel],
            write_pos,
            input,
            ramp,
            Blend::Add,
        );
    }

    /// Copy `out.len()` samples starting `delay_samples` behind the write
    /// cursor into `out`, ramped.
    pub fn read_into(&self, channel: usize, delay_samples: usize, out: &mut [f32], ramp: GainRamp) {
        read_wrapped(
            &self.channels[channel],
            self.read_pos(delay_samples),
            out,
            ramp,
        );
    }

    /// Move the write cursor forward by one block.
    ///
    /// Call this once per block, after every channel is done. The modulo
    /// keeps the cursor inside `[0, buffer_len)`.
    pub fn advance(&mut self, block_len: usize) {
        if self.buffer_len == 0 {
            return;
        }
        self.write_pos = (self.write_pos + block_len) % self.buffer_len;
    }

    /// Clear every ring to silence and reset the write position.
    ///
    /// Called during plugin `reset()` (when the user stops playback)
    /// to prevent stale audio from bleeding into the next play session.
    pub fn clear(&mut self) {
        for row in &mut self.channels {
            row.fill(0.0);
        }
        self.write_pos = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const UNITY: GainRamp = GainRamp::flat(1.0);

    /// Verify the sizing formula for a common configuration.
    #[test]
    fn test_required_len() {
        assert_eq!(DelayLine::required_len(44100.0, 512), 89_224);
        assert_eq!(DelayLine::required_len(48000.0, 1024), 98_048);
        assert_eq!(DelayLine::required_len(44100.5, 1), 88_204);
    }

    /// Verify basic write-then-read one block later.
    #[test]
    fn test_fill_and_read_one_block_back() {
        let mut dl = DelayLine::new(1, 16);

        dl.fill(0, &[0.75, 0.5], UNITY);
        dl.advance(2);

        let mut out = [0.0; 2];
        dl.read_into(0, 2, &mut out, UNITY);
        assert_eq!(out, [0.75, 0.5]);
    }

    /// Verify the read position wraps behind position 0.
    #[test]
    fn test_read_pos_wraps_backwards() {
        let mut dl = DelayLine::new(1, 100);
        dl.advance(5);

        // (100 + 5 - 10) % 100 = 95, ten steps behind position 5.
        assert_eq!(dl.read_pos(10), 95);
        assert_eq!(dl.read_pos(0), 5);
    }

    /// Verify the write cursor wraps past the end of the ring.
    #[test]
    fn test_advance_wraps() {
        let mut dl = DelayLine::new(2, 10);
        dl.advance(6);
        dl.advance(6);
        assert_eq!(dl.write_pos(), 2);
    }

    /// Channels share a cursor but never share samples.
    #[test]
    fn test_channels_are_independent() {
        let mut dl = DelayLine::new(2, 8);
        dl.fill(0, &[1.0, 1.0], UNITY);
        dl.fill(1, &[-1.0, -1.0], UNITY);
        dl.advance(2);

        let mut left = [0.0; 2];
        let mut right = [0.0; 2];
        dl.read_into(0, 2, &mut left, UNITY);
        dl.read_into(1, 2, &mut right, UNITY);
        assert_eq!(left, [1.0, 1.0]);
        assert_eq!(right, [-1.0, -1.0]);
    }

    /// `add()` mixes on top of what `fill()` wrote.
    #[test]
    fn test_add_after_fill() {
        let mut dl = DelayLine::new(1, 8);
        dl.fill(0, &[1.0, 2.0], GainRamp::flat(0.5));
        dl.add(0, &[1.0, 2.0], GainRamp::flat(0.25));
        dl.advance(2);

        let mut out = [0.0; 2];
        dl.read_into(0, 2, &mut out, UNITY);
        assert!((out[0] - 0.75).abs() < 1e-6, "Expected 0.75, got {}", out[0]);
        assert!((out[1] - 1.5).abs() < 1e-6, "Expected 1.5, got {}", out[1]);
    }

    /// A block written across the ring end comes back in order.
    #[test]
    fn test_block_across_ring_end() {
        let mut dl = DelayLine::new(1, 5);
        dl.advance(3);
        dl.fill(0, &[1.0, 2.0, 3.0, 4.0], UNITY);
        dl.advance(4);
        assert_eq!(dl.write_pos(), 2);

        let mut out = [0.0; 4];
        dl.read_into(0, 4, &mut out, UNITY);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    /// Verify that clearing resets everything to silence.
    #[test]
    fn test_clear() {
        let mut dl = DelayLine::new(1, 10);

        dl.fill(0, &[0.5], UNITY);
        dl.advance(1);
        dl.clear();

        assert_eq!(dl.write_pos(), 0);
        let mut out = [1.0; 10];
        dl.read_into(0, 0, &mut out, UNITY);
        assert!(
            out.iter().all(|s| *s == 0.0),
            "Expected silence after clear, got {out:?}"
        );
    }

    /// An empty delay line reports itself as such and ignores advances.
    #[test]
    fn test_empty() {
        let mut dl = DelayLine::empty();
        assert!(dl.is_empty());
        dl.advance(64);
        assert_eq!(dl.write_pos(), 0);
    }
}
