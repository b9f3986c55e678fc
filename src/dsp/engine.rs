//! # Delay Engine
//!
//! Owns the delay line and the output accumulator and turns one block of
//! input into one block of output. The plugin shell calls
//! [`prepare()`](DelayEngine::prepare) when the host announces its sample
//! rate and block size, then [`process_block()`](DelayEngine::process_block)
//! for every block of audio.
//!
//! ## The Block Algorithm
//!
//! For each channel, in order:
//!
//! 1. **Fill**: write the input into the ring at the write cursor, scaled
//!    by the delay mix amount.
//! 2. **Read**: copy the block that sits `delay_samples` behind the write
//!    cursor into the accumulator, scaled by the wet level.
//! 3. **Feedback**: add the *dry input* on top of what step 1 wrote,
//!    scaled by the feedback amount.
//! 4. **Mix**: add the dry input into the accumulator, scaled by the dry
//!    level, then write the accumulator to the output scaled by the output
//!    gain.
//!
//! Once every channel is done the write cursor moves forward one block.
//!
//! ```text
//! input ──┬─────────────────────────────── × dry ──────►(+)── × gain ──► output
//!         │                                               ▲
//!         ├── × delay_mix ──►[ ring ]── × wet ────────────┘
//!         │                     ▲
//!         └── × feedback ───────┘
//! ```
//!
//! Note that feedback re-injects the input, not the delayed signal. Each
//! sample passes through the ring once, so nothing can build up no matter
//! how long the input runs.
//!
//! Every gain glides from its value at the previous block to its current
//! value (see [`GainRamp`]), so moving a knob never produces a click.

use nih_plug::{nih_debug_assert, nih_log};

use super::delay_line::DelayLine;
use super::ramp::{apply_ramped, Blend, GainRamp};
use super::settings::{DelaySettings, DELAY_TIME_MS_RANGE};
use crate::error::PrepareError;

/// The five gain ramps applied during one block.
#[derive(Debug, Clone, Copy)]
struct BlockRamps {
    delay_mix: GainRamp,
    wet: GainRamp,
    feedback: GainRamp,
    dry: GainRamp,
    output_gain: GainRamp,
}

impl BlockRamps {
    fn new(from: &DelaySettings, to: &DelaySettings, len: usize) -> Self {
        Self {
            delay_mix: GainRamp::new(from.delay_mix, to.delay_mix, len),
            wet: GainRamp::new(from.wet, to.wet, len),
            feedback: GainRamp::new(from.feedback, to.feedback, len),
            dry: GainRamp::new(from.dry, to.dry, len),
            output_gain: GainRamp::new(from.output_gain, to.output_gain, len),
        }
    }

    fn skip(&self, offset: usize) -> Self {
        Self {
            delay_mix: self.delay_mix.skip(offset),
            wet: self.wet.skip(offset),
            feedback: self.feedback.skip(offset),
            dry: self.dry.skip(offset),
            output_gain: self.output_gain.skip(offset),
        }
    }
}

/// A single-tap delay with feedback and dry/wet/output mixing.
///
/// Until [`prepare()`](Self::prepare) succeeds the engine passes audio
/// through untouched.
pub struct DelayEngine {
    /// Sample rate of the current session, in Hz.
    sample_rate: f32,

    /// Largest number of samples handled in one go. Longer host blocks are
    /// split into chunks of this size.
    max_block: usize,

    /// One ring per channel, sized so the longest delay never catches up
    /// with the block being written.
    delay_line: DelayLine,

    /// Scratch space where the wet signal is assembled before the final
    /// blend. One row of `max_block` samples per channel.
    accumulator: Vec<Vec<f32>>,

    /// Settings the previous block ended on. Ramps start here. `None`
    /// right after prepare or reset, when there's nothing to glide from.
    previous: Option<DelaySettings>,
}

impl Default for DelayEngine {
    fn default() -> Self {
        Self {
            // Placeholder until the host tells us the real rate.
            sample_rate: 44100.0,
            max_block: 0,
            delay_line: DelayLine::empty(),
            accumulator: Vec::new(),
            previous: None,
        }
    }
}

impl DelayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the delay line and accumulator for a new session.
    ///
    /// Must be called before the first block and again whenever the sample
    /// rate or maximum block size changes. Resets the write cursor and any
    /// stored audio. With `num_channels == 0` the engine stays a
    /// pass-through.
    ///
    /// On error the engine is left unprepared.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block: usize,
        num_channels: usize,
    ) -> Result<(), PrepareError> {
        self.release();

        if !sample_rate.is_finite() || sample_rate < 1.0 {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        if max_block == 0 {
            return Err(PrepareError::InvalidBlockSize);
        }

        let ring_len = DelayLine::required_len(sample_rate, max_block);

        // The read span for the longest delay has to end before the span
        // being written, or a block would read its own input.
        let longest = DelaySettings {
            delay_time_ms: DELAY_TIME_MS_RANGE.1,
            ..DelaySettings::default()
        };
        let max_delay_samples = longest.delay_samples(sample_rate);
        if max_delay_samples + max_block >= ring_len {
            return Err(PrepareError::MaxDelayExceedsRing {
                max_delay_samples,
                max_block,
                ring_len,
            });
        }

        self.sample_rate = sample_rate;
        self.max_block = max_block;
        self.delay_line = DelayLine::new(num_channels, ring_len);
        self.accumulator = vec![vec![0.0; max_block]; num_channels];

        nih_log!(
            "Delay engine prepared: {num_channels} channel(s) at {sample_rate} Hz, \
             {ring_len}-sample delay line, blocks up to {max_block} samples"
        );

        Ok(())
    }

    /// Drop all buffers and go back to pass-through.
    fn release(&mut self) {
        self.max_block = 0;
        self.delay_line = DelayLine::empty();
        self.accumulator = Vec::new();
        self.previous = None;
    }

    /// Whether a block would actually be processed.
    pub fn is_prepared(&self) -> bool {
        self.max_block > 0 && !self.delay_line.is_empty()
    }

    pub fn delay_line_len(&self) -> usize {
        self.delay_line.len()
    }

    pub fn write_pos(&self) -> usize {
        self.delay_line.write_pos()
    }

    /// Silence all stored audio without reallocating.
    ///
    /// Called when playback stops so old echoes don't play back when the
    /// transport starts again.
    pub fn reset(&mut self) {
        self.delay_line.clear();
        for row in &mut self.accumulator {
            row.fill(0.0);
        }
        self.previous = None;
    }

    /// How long the effect keeps sounding after the input goes silent.
    ///
    /// Each input sample comes back exactly once, one delay time later, so
    /// the tail is one delay time.
    pub fn tail_samples(&self, settings: &DelaySettings) -> u32 {
        if !self.is_prepared() {
            return 0;
        }
        settings.delay_samples(self.sample_rate) as u32
    }

    /// Process one block of audio in place.
    ///
    /// `buffer` holds one slice per channel, all the same length. Channels
    /// beyond the prepared count pass through untouched. Blocks longer than
    /// the prepared maximum are split into chunks.
    pub fn process_block(&mut self, buffer: &mut [&mut [f32]], settings: &DelaySettings) {
        if !self.is_prepared() {
            return;
        }

        let num_samples = buffer.iter().map(|ch| ch.len()).min().unwrap_or(0);
        if num_samples == 0 {
            return;
        }

        let from = self.previous.unwrap_or(*settings);
        let ramps = BlockRamps::new(&from, settings, num_samples);
        let delay_samples = settings.delay_samples(self.sample_rate);

        let mut offset = 0;
        while offset < num_samples {
            let len = (num_samples - offset).min(self.max_block);
            self.process_chunk(buffer, offset, len, delay_samples, &ramps.skip(offset));
            offset += len;
        }

        self.previous = Some(*settings);
    }

    fn process_chunk(
        &mut self,
        buffer: &mut [&mut [f32]],
        offset: usize,
        len: usize,
        delay_samples: usize,
        ramps: &BlockRamps,
    ) {
        nih_debug_assert!(len <= self.max_block);
        nih_debug_assert!(delay_samples + len < self.delay_line.len());

        let num_channels = self.delay_line.num_channels();
        for (channel, samples) in buffer.iter_mut().take(num_channels).enumerate() {
            let io = &mut samples[offset..offset + len];
            let acc = &mut self.accumulator[channel][..len];

            // 1. Fill
            self.delay_line.fill(channel, io, ramps.delay_mix);

            // 2. Read
            self.delay_line.read_into(channel, delay_samples, acc, ramps.wet);

            // 3. Feedback, from the dry input
            self.delay_line.add(channel, io, ramps.feedback);

            // 4. Mix
            apply_ramped(acc, io, ramps.dry, Blend::Add);
            apply_ramped(io, acc, ramps.output_gain, Blend::Replace);
        }

        self.delay_line.advance(len);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
