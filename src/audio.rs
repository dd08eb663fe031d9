//! Sound cue plumbing
//!
//! The simulation only names cues. Whatever synthesizes them sits behind
//! [`AudioSink`]; a missing or muted backend never affects gameplay.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Weapon volley fired
    Shoot,
    /// Projectile struck an enemy or the boss
    Hit,
    /// Enemy destroyed
    Explosion,
    /// Player gained a level
    LevelUp,
    /// Player died
    GameOver,
    /// Boss encounter started
    BossAlert,
    /// Boss destroyed
    Victory,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Hit => "hit",
            SoundEffect::Explosion => "explosion",
            SoundEffect::LevelUp => "level-up",
            SoundEffect::GameOver => "game-over",
            SoundEffect::BossAlert => "boss-alert",
            SoundEffect::Victory => "victory",
        }
    }
}

/// Something that can play a cue at a given volume
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that drops every cue (headless runs, uninitialized audio)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink = NullAudio> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<NullAudio> {
    fn default() -> Self {
        Self::new(NullAudio)
    }
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play every sound cue found in a batch of simulation events
    pub fn play_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if let GameEvent::Sound(effect) = event {
                self.play(*effect);
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
