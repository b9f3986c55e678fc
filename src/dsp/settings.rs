//! # Delay Settings
//!
//! The engine never owns its parameters. Some control surface (the DAW's
//! automation via [`PluginParams`](crate::params::PluginParams), or a
//! standalone UI thread via [`SharedSettings`]) writes them, and the audio
//! thread takes a [`DelaySettings`] snapshot at the start of each block.
//!
//! ## Lock-free hand-off
//!
//! Each field is an independent atomic scalar. A block may see feedback from
//! before a UI edit and wet level from after it; that's fine because no two
//! fields have to agree with each other. What matters is that the audio
//! thread never waits on a lock the UI thread might be holding.

use std::sync::atomic::Ordering;

use atomic_float::AtomicF32;

/// Feedback amount range. Capped well below 1.0.
pub const FEEDBACK_RANGE: (f32, f32) = (0.0, 0.8);
/// How much of the input is written into the delay line.
pub const DELAY_MIX_RANGE: (f32, f32) = (0.0, 1.0);
/// Delay time in milliseconds.
pub const DELAY_TIME_MS_RANGE: (f32, f32) = (20.0, 2000.0);
/// Conventional range of the dry, wet and output gain levels.
pub const LEVEL_RANGE: (f32, f32) = (0.0, 1.0);

/// One block's worth of parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySettings {
    /// How much dry input is added back into the delay line.
    pub feedback: f32,
    /// How much of the input is written into the delay line.
    pub delay_mix: f32,
    /// Distance between the write and read cursors, in milliseconds.
    pub delay_time_ms: f32,
    /// Level of the unprocessed input in the output.
    pub dry: f32,
    /// Level of the delayed signal in the output.
    pub wet: f32,
    /// Final gain applied after dry and wet are summed.
    pub output_gain: f32,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            feedback: 0.4,
            delay_mix: 0.5,
            delay_time_ms: 500.0,
            dry: 1.0,
            wet: 1.0,
            output_gain: 1.0,
        }
    }
}

impl DelaySettings {
    /// Delay time converted to whole samples:
    ///
    /// ```text
    /// delay_samples = round(sample_rate * delay_ms / 1000)
    /// ```
    ///
    /// The delay time is clamped to its range first, so the result never
    /// exceeds two seconds' worth of samples.
    pub fn delay_samples(&self, sample_rate: f32) -> usize {
        let (min, max) = DELAY_TIME_MS_RANGE;
        let delay_ms = self.delay_time_ms.clamp(min, max);
        (sample_rate * delay_ms / 1000.0).round() as usize
    }
}

/// Anything the engine can poll for a settings snapshot once per block.
pub trait SettingsSource {
    fn snapshot(&self) -> DelaySettings;
}

/// Lock-free parameter storage for hosts that don't bring their own.
///
/// The control thread calls the setters, the audio thread calls
/// [`snapshot()`](SettingsSource::snapshot). Loads and stores are relaxed:
/// each field is eventually consistent on its own.
#[derive(Debug)]
pub struct SharedSettings {
    feedback: AtomicF32,
    delay_mix: AtomicF32,
    delay_time_ms: AtomicF32,
    dry: AtomicF32,
    wet: AtomicF32,
    output_gain: AtomicF32,
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self::new(DelaySettings::default())
    }
}

impl SharedSettings {
    pub fn new(initial: DelaySettings) -> Self {
        let shared = Self {
            feedback: AtomicF32::new(0.0),
            delay_mix: AtomicF32::new(0.0),
            delay_time_ms: AtomicF32::new(0.0),
            dry: AtomicF32::new(0.0),
            wet: AtomicF32::new(0.0),
            output_gain: AtomicF32::new(0.0),
        };
        shared.store(&initial);
        shared
    }

    /// Store every field. Range-restricted fields are clamped.
    pub fn store(&self, settings: &DelaySettings) {
        self.set_feedback(settings.feedback);
        self.set_delay_mix(settings.delay_mix);
        self.set_delay_time_ms(settings.delay_time_ms);
        self.set_dry(settings.dry);
        self.set_wet(settings.wet);
        self.set_output_gain(settings.output_gain);
    }

    pub fn set_feedback(&self, value: f32) {
        let (min, max) = FEEDBACK_RANGE;
        self.feedback.store(value.clamp(min, max), Ordering::Relaxed);
    }

    pub fn set_delay_mix(&self, value: f32) {
        let (min, max) = DELAY_MIX_RANGE;
        self.delay_mix.store(value.clamp(min, max), Ordering::Relaxed);
    }

    pub fn set_delay_time_ms(&self, value: f32) {
        let (min, max) = DELAY_TIME_MS_RANGE;
        self.delay_time_ms.store(value.clamp(min, max), Ordering::Relaxed);
    }

    // Levels are not range-restricted; the conventional [0, 1] is a UI
    // concern.
    pub fn set_dry(&self, value: f32) {
        self.dry.store(value, Ordering::Relaxed);
    }

    pub fn set_wet(&self, value: f32) {
        self.wet.store(value, Ordering::Relaxed);
    }

    pub fn set_output_gain(&self, value: f32) {
        self.output_gain.store(value, Ordering::Relaxed);
    }
}

impl SettingsSource for SharedSettings {
    fn snapshot(&self) -> DelaySettings {
        DelaySettings {
            feedback: self.feedback.load(Ordering::Relaxed),
            delay_mix: self.delay_mix.load(Ordering::Relaxed),
            delay_time_ms: self.delay_time_ms.load(Ordering::Relaxed),
            dry: self.dry.load(Ordering::Relaxed),
            wet: self.wet.load(Ordering::Relaxed),
            output_gain: self.output_gain.load(Ordering::Relaxed),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
