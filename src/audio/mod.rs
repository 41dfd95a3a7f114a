use std::collections::HashMap;
use std::path::Path;

use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::{
        static_sound::{StaticSoundData, StaticSoundSettings},
        PlaybackRate,
    },
    Volume,
};
use tracing::warn;

/// Configuration for playing a cue with variation.
#[derive(Debug, Clone, Copy)]
pub struct SoundConfig {
    /// Linear amplitude, 1.0 = as recorded.
    pub volume: f32,
    pub pitch: f32,
    /// Random pitch variation range (e.g. 0.1 = +/- 10%)
    pub pitch_variation: f32,
    /// Random volume variation range
    pub volume_variation: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { volume: 1.0, pitch: 1.0, pitch_variation: 0.05, volume_variation: 0.05 }
    }
}

/// Fire-and-forget cue player. Degrades to a silent no-op when no audio
/// device exists, so headless runs and tests behave identically minus sound.
pub struct AudioContext {
    /// `None` when audio hardware is unavailable (headless / CI / no audio device).
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
    variation_seed: u64,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(error = %e, "audio manager unavailable, cues disabled");
                None
            }
        };
        Self { manager, sounds: HashMap::new(), variation_seed: 0 }
    }

    /// A context that never touches audio hardware. Used by tests and
    /// headless simulation.
    pub fn disabled() -> Self {
        Self { manager: None, sounds: HashMap::new(), variation_seed: 0 }
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Load a cue (WAV, OGG, etc.) into memory. A missing or corrupt file is
    /// a logged no-op; the cue just stays silent.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) {
        match StaticSoundData::from_file(path.as_ref()) {
            Ok(sound) => {
                self.sounds.insert(name.to_string(), sound);
            }
            Err(e) => {
                warn!(name, path = %path.as_ref().display(), error = %e, "failed to load cue");
            }
        }
    }

    /// Play a cue once. Unknown names are silent no-ops.
    pub fn play(&mut self, name: &str, config: SoundConfig) {
        let Some(manager) = self.manager.as_mut() else { return };
        let Some(data) = self.sounds.get(name) else { return };

        // Advance seed independently for each random variable to avoid LCG correlation.
        self.variation_seed = self.variation_seed.wrapping_add(1);
        let p_offset = (pseudo_rand(self.variation_seed) - 0.5) * 2.0 * config.pitch_variation;
        self.variation_seed = self.variation_seed.wrapping_add(1);
        let v_offset = (pseudo_rand(self.variation_seed) - 0.5) * 2.0 * config.volume_variation;

        let mut settings = StaticSoundSettings::new();
        settings.playback_rate = PlaybackRate::Factor((config.pitch + p_offset) as f64).into();
        settings.volume =
            Volume::Amplitude((config.volume + v_offset).clamp(0.0, 2.0) as f64).into();

        if let Err(e) = manager.play(data.clone().with_settings(settings)) {
            warn!(name, error = %e, "failed to play cue");
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

fn pseudo_rand(seed: u64) -> f32 {
    let x = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (x >> 33) as f32 / u32::MAX as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_context_plays_silently() {
        let mut audio = AudioContext::disabled();
        assert!(!audio.is_available());
        // Must not panic even for cues that were never loaded.
        audio.play("dialogue", SoundConfig::default());
    }

    #[test]
    fn pseudo_rand_stays_in_unit_range() {
        for seed in 0..1000 {
            let v = pseudo_rand(seed);
            assert!((0.0..=1.0).contains(&v), "seed {seed} -> {v}");
        }
    }
}
