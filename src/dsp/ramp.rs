//! # Gain Ramps and Wrapped Copies
//!
//! Every time the delay engine moves audio in or out of its ring buffer it
//! does the same thing: take a run of samples, scale each one by a gain that
//! glides linearly from one value to another, and either overwrite or add to
//! the destination. When the run crosses the end of the ring it has to be
//! split in two:
//!
//! ```text
//!  ring:  [ ......... | ####### ]      offset = 9, len = 12, ring = 16
//!           ^^^^^       ^^^^^^^
//!           part 2      part 1
//!           [0, 5)      [9, 16)
//! ```
//!
//! This module implements that once, so the fill, read and feedback steps
//! can't drift apart.
//!
//! ## Why ramp at all?
//!
//! If the wet level jumps from 0.2 to 0.8 between two blocks, multiplying
//! the whole next block by 0.8 produces a step in the waveform, which you
//! hear as a click. Gliding from 0.2 to 0.8 across the block spreads the
//! change out so each sample moves by only `0.6 / block_len`.

/// A gain that changes linearly across a run of samples.
///
/// The gain for sample `i` is `start + step * i`. With
/// `step = (end - start) / len`, the last sample of a block lands one
/// increment short of `end`, and the next block picks up exactly at `end`,
/// so consecutive blocks join without a seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    start: f32,
    step: f32,
}

impl GainRamp {
    /// Ramp from `start` to `end` over `len` samples.
    pub fn new(start: f32, end: f32, len: usize) -> Self {
        if len == 0 || start == end {
            return Self::flat(end);
        }

        Self {
            start,
            step: (end - start) / len as f32,
        }
    }

    /// A constant gain. `gain_at()` returns exactly `gain` for every sample.
    pub const fn flat(gain: f32) -> Self {
        Self {
            start: gain,
            step: 0.0,
        }
    }

    /// The gain applied to the `index`-th sample of the run.
    #[inline]
    pub fn gain_at(&self, index: usize) -> f32 {
        self.start + self.step * index as f32
    }

    /// The per-sample increment.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// The same ramp, starting `offset` samples later.
    ///
    /// Used when a run is split (at the ring boundary, or into chunks) so
    /// the second half continues where the first half stopped instead of
    /// restarting the glide.
    #[inline]
    pub fn skip(&self, offset: usize) -> Self {
        Self {
            start: self.gain_at(offset),
            step: self.step,
        }
    }
}

/// What to do with the destination sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// `dst = src * gain`
    Replace,
    /// `dst += src * gain`
    Add,
}

/// Scale `src` by `ramp` into `dst`, element by element.
///
/// `dst` and `src` must be the same length.
#[inline]
pub fn apply_ramped(dst: &mut [f32], src: &[f32], ramp: GainRamp, blend: Blend) {
    nih_plug::nih_debug_assert_eq!(dst.len(), src.len());

    let pairs = dst.iter_mut().zip(src).enumerate();
    match blend {
        Blend::Replace => {
            for (i, (d, s)) in pairs {
                *d = *s * ramp.gain_at(i);
            }
        }
        Blend::Add => {
            for (i, (d, s)) in pairs {
                *d += *s * ramp.gain_at(i);
            }
        }
    }
}

/// How many of `len` samples starting at `offset` fit before the end of a
/// ring of `ring_len` samples. The remaining `len - first` samples wrap to
/// index 0.
#[inline]
fn first_span(ring_len: usize, offset: usize, len: usize) -> usize {
    len.min(ring_len - offset)
}

/// Write `src` into `ring` starting at `offset`, wrapping past the end.
pub fn write_wrapped(ring: &mut [f32], offset: usize, src: &[f32], ramp: GainRamp, blend: Blend) {
    nih_plug::nih_debug_assert!(offset < ring.len());
    nih_plug::nih_debug_assert!(src.len() <= ring.len());

    let first = first_span(ring.len(), offset, src.len());
    let (head, tail) = src.split_at(first);

    apply_ramped(&mut ring[offset..offset + first], head, ramp, blend);
    if !tail.is_empty() {
        apply_ramped(&mut ring[..tail.len()], tail, ramp.skip(first), blend);
    }
}

/// Read `dst.len()` samples out of `ring` starting at `offset`, wrapping
/// past the end. Always overwrites `dst`.
pub fn read_wrapped(ring: &[f32], offset: usize, dst: &mut [f32], ramp: GainRamp) {
    nih_plug::nih_debug_assert!(offset < ring.len());
    nih_plug::nih_debug_assert!(dst.len() <= ring.len());

    let first = first_span(ring.len(), offset, dst.len());
    let (head, tail) = dst.split_at_mut(first);

    apply_ramped(head, &ring[offset..offset + first], ramp, Blend::Replace);
    if !tail.is_empty() {
        let rest = tail.len();
        apply_ramped(tail, &ring[..rest], ramp.skip(first), Blend::Replace);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
