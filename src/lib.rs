//! # Loveless Echo — A Single-Tap Block Delay (AU/VST3/CLAP)
//!
//! A digital echo built with [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! Outputs Audio Unit (AUv2), VST3, and CLAP formats from a single
//! codebase. Where Loveless Delay works one sample at a time, this one moves
//! whole blocks in and out of its ring buffer and ramps every gain across
//! the block.
//!
//! ## Signal Flow
//!
//! ```text
//! Input ──┬───────────────────────────────────── × dry ────┐
//!         │                                                │
//!         ├── × delay amount ──►(+)──► [Ring Buffer] ── × wet ──►(+)── × gain ──► Output
//!         │                      ▲      (one row per
//!         │                      │       channel)
//!         └── × feedback ────────┘
//! ```
//!
//! All of the DSP lives in [`dsp`]. This file is the thin shell that talks
//! to the host: it allocates the engine when the sample rate and block size
//! are known and hands it a parameter snapshot every block.

pub mod dsp;
pub mod error;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use dsp::engine::DelayEngine;
use dsp::settings::SettingsSource;
use nih_plug::prelude::*;
use params::PluginParams;

/// The main plugin struct.
///
/// Parameters (`PluginParams`) are shared with the host via `Arc` and can
/// be read from any thread. The engine (delay line, accumulator, write
/// cursor) is owned exclusively by the audio thread and only touched in
/// `initialize()`, `reset()` and `process()`.
struct LovelessEcho {
    params: Arc<PluginParams>,

    /// Unprepared (pass-through) until `initialize()` runs.
    engine: DelayEngine,
}

impl Default for LovelessEcho {
    fn default() -> Self {
        Self {
            params: Arc::new(PluginParams::default()),
            engine: DelayEngine::new(),
        }
    }
}

impl Plugin for LovelessEcho {
    const NAME: &'static str = "Loveless Echo";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Mono or stereo, input matching output. Stereo first since most DAW
    // tracks are stereo.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // The engine reads parameters once per block and ramps across it, so
    // there is nothing to gain from splitting blocks at automation points.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin is first loaded, or when the sample rate,
    /// block size or channel layout changes. This is the only place the
    /// engine allocates.
    ///
    /// Returning `false` tells the host we can't run with this
    /// configuration.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get() as usize)
            .unwrap_or(0);

        match self.engine.prepare(
            buffer_config.sample_rate,
            buffer_config.max_buffer_size as usize,
            num_channels,
        ) {
            Ok(()) => true,
            Err(err) => {
                nih_error!("Cannot initialize Loveless Echo: {err}");
                false
            }
        }
    }

    /// Called when playback stops or the plugin is bypassed. Clears the
    /// delay line so old echoes don't play when the transport restarts.
    fn reset(&mut self) {
        self.engine.reset();
    }

    /// Process one block of audio in place.
    ///
    /// Parameters are polled once, at the start of the block. The engine
    /// never allocates, locks or fails in here; if it isn't prepared the
    /// audio simply passes through.
    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let settings = self.params.snapshot();

        self.engine.process_block(buffer.as_slice(), &settings);

        // Keep the host calling process() after the input stops, or the
        // last echo would be cut off.
        ProcessStatus::Tail(self.engine.tail_samples(&settings))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for LovelessEcho {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-echo";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A single-tap block delay with ramped dry/wet mixing");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Delay,
    ];
}

impl Vst3Plugin for LovelessEcho {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssEcho___v001";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Delay];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────

nih_export_clap!(LovelessEcho);
nih_export_vst3!(LovelessEcho);

// AUv2 entry point for Logic Pro, wrapping the CLAP build.
clap_wrapper::export_auv2!();
