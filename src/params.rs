//! # Plugin Parameters
//!
//! Parameters are the knobs and sliders the user sees in the DAW. Each
//! parameter has:
//!
//! - A **unique string ID** (`#[id = "..."]`) that the host uses to
//!   save and recall presets. Once published, never change these IDs
//!   or existing presets will break.
//! - A **human-readable name** shown in the DAW's UI.
//! - A **range** (min, max, and optional skew).
//! - A **default value**.
//!
//! ## No Parameter Smoothing Here
//!
//! Unlike most nih-plug plugins, these parameters have no smoother. The
//! delay engine reads each value once per block and ramps linearly from
//! the previous block's value itself (see `dsp::ramp`). Smoothing here as
//! well would just make the knobs feel sluggish.

use nih_plug::prelude::*;

use crate::dsp::settings::{
    DelaySettings, SettingsSource, DELAY_MIX_RANGE, DELAY_TIME_MS_RANGE, FEEDBACK_RANGE,
    LEVEL_RANGE,
};

/// All user-facing parameters for the Loveless Echo plugin.
///
/// The `#[derive(Params)]` macro registers these with the host. Values
/// are stored atomically by nih-plug, so the audio thread can read them
/// without locking while the host writes automation.
#[derive(Params)]
pub struct PluginParams {
    /// **Feedback**: how much of the input is written into the delay line
    /// a second time, making the echo louder than the delay amount alone.
    ///
    /// Capped at 80% so the delay line can never accumulate energy.
    #[id = "fdbk"]
    pub feedback: FloatParam,

    /// **Delay Amount**: how much of the input is written into the delay
    /// line in the first place.
    #[id = "dmix"]
    pub delay_mix: FloatParam,

    /// **Delay Time**: distance between the original and the echo.
    ///
    /// Range: 20 ms to 2000 ms, in whole milliseconds. Skewed so that
    /// short slapback times get more knob travel.
    #[id = "delay"]
    pub delay_time: FloatParam,

    /// **Dry**: level of the unprocessed input in the output.
    #[id = "dry"]
    pub dry: FloatParam,

    /// **Wet**: level of the echo in the output.
    #[id = "wet"]
    pub wet: FloatParam,

    /// **Output Gain**: applied after dry and wet are summed.
    #[id = "gain"]
    pub output_gain: FloatParam,
}

fn percentage_param(name: &str, default: f32, (min, max): (f32, f32)) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min, max })
        .with_unit("%")
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage())
}

impl Default for PluginParams {
    fn default() -> Self {
        let defaults = DelaySettings::default();
        let (delay_min, delay_max) = DELAY_TIME_MS_RANGE;

        Self {
            feedback: percentage_param("Feedback", defaults.feedback, FEEDBACK_RANGE),
            delay_mix: percentage_param("Delay Amount", defaults.delay_mix, DELAY_MIX_RANGE),

            delay_time: FloatParam::new(
                "Delay Time",
                defaults.delay_time_ms,
                FloatRange::Skewed {
                    min: delay_min,
                    max: delay_max,
                    factor: FloatRange::skew_factor(-1.0),
                },
            )
            .with_unit(" ms")
            .with_step_size(1.0),

            dry: percentage_param("Dry", defaults.dry, LEVEL_RANGE),
            wet: percentage_param("Wet", defaults.wet, LEVEL_RANGE),
            output_gain: percentage_param("Output Gain", defaults.output_gain, LEVEL_RANGE),
        }
    }
}

impl SettingsSource for PluginParams {
    fn snapshot(&self) -> DelaySettings {
        DelaySettings {
            feedback: self.feedback.value(),
            delay_mix: self.delay_mix.value(),
            delay_time_ms: self.delay_time.value(),
            dry: self.dry.value(),
            wet: self.wet.value(),
            output_gain: self.output_gain.value(),
        }
    }
}
