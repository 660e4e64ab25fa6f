//! Sound cues
//!
//! Every cue is a single synthesized sine tone. Playback itself belongs to
//! whatever `AudioSink` the host plugs in; failures never reach the table.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Chip lands on the felt
    ChipPlace,
    /// Wheel starts turning
    SpinStart,
    /// Ball hits a pocket separator
    BallClick,
    /// Spin paid out
    Win,
    /// Spin paid out big
    BigWin,
}

/// Sine tone parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    /// 0.0 - 1.0
    pub volume: f32,
}

/// Linear fade in and out, avoids clicks
const ENVELOPE_SECS: f32 = 0.01;

impl Tone {
    /// Mono 16-bit PCM at `sample_rate`
    pub fn samples(&self, sample_rate: u32) -> Vec<i16> {
        let count = (sample_rate as f32 * self.duration_secs) as usize;
        let ramp = ((sample_rate as f32 * ENVELOPE_SECS) as usize).clamp(1, count.max(1));
        let step = std::f32::consts::TAU * self.frequency_hz / sample_rate as f32;
        (0..count)
            .map(|i| {
                let envelope = if i < ramp {
                    i as f32 / ramp as f32
                } else if i >= count - ramp {
                    (count - 1 - i) as f32 / ramp as f32
                } else {
                    1.0
                };
                let sample = (i as f32 * step).sin() * self.volume * envelope;
                (sample * i16::MAX as f32) as i16
            })
            .collect()
    }
}

impl SoundEffect {
    pub fn tone(&self) -> Tone {
        let (frequency_hz, duration_secs, volume) = match self {
            SoundEffect::ChipPlace => (800.0, 0.05, 0.2),
            SoundEffect::SpinStart => (400.0, 0.1, 0.15),
            SoundEffect::BallClick => (600.0, 0.08, 0.25),
            SoundEffect::Win => (523.0, 0.15, 0.3),
            SoundEffect::BigWin => (659.0, 0.3, 0.4),
        };
        Tone {
            frequency_hz,
            duration_secs,
            volume,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::ChipPlace => "chip_place",
            SoundEffect::SpinStart => "spin_start",
            SoundEffect::BallClick => "ball_click",
            SoundEffect::Win => "win",
            SoundEffect::BigWin => "big_win",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio device available")]
    Unavailable,

    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Fire-and-forget playback backend
pub trait AudioSink {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError>;
}

/// Sink that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _tone: Tone) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Volume and mute in front of a sink
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentAudio))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a cue; errors are logged and dropped
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.master_volume <= 0.0 {
            return;
        }
        let mut tone = effect.tone();
        tone.volume *= self.master_volume;
        if let Err(e) = self.sink.play(tone) {
            log::debug!("Sound {} dropped: {}", effect.as_str(), e);
        }
    }
}
