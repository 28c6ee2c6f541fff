//! Sound effects
//!
//! The simulation reports `GameEvent`s; this module maps them onto a small
//! set of effects and hands them to a backend. The terminal backend rings
//! the bell. Without a backend every call is a no-op.

use std::io::Write;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Hit, kill or crash
    Explosion,
    /// Coin picked up
    CoinPickup,
}

impl SoundEffect {
    /// Effect for a simulation event, if it makes a sound
    pub fn from_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::Explosion | GameEvent::TurretDestroyed | GameEvent::Lost => {
                Some(SoundEffect::Explosion)
            }
            GameEvent::CoinCollected => Some(SoundEffect::CoinPickup),
            GameEvent::MedikitCollected | GameEvent::Won => None,
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Rings the terminal bell for loud effects
///
/// A bell per shot would be unbearable, so only effects above a volume
/// floor ring, and shots never do.
#[derive(Debug, Default)]
pub struct BellBackend;

impl AudioBackend for BellBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        if effect == SoundEffect::Shoot || volume < 0.2 {
            return;
        }
        let mut err = std::io::stderr();
        if err.write_all(b"\x07").and_then(|_| err.flush()).is_err() {
            log::debug!("Bell unavailable");
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager without a backend
    pub fn silent() -> Self {
        Self {
            backend: None,
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

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
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
        if let Some(backend) = self.backend.as_mut() {
            backend.play(effect, vol);
        }
    }

    /// Play whatever the given events call for
    ///
    /// Several identical effects in one frame collapse into one.
    pub fn play_events(&mut self, events: &[GameEvent]) {
        let mut played: Vec<SoundEffect> = Vec::new();
        for effect in events.iter().filter_map(|e| SoundEffect::from_event(*e)) {
            if !played.contains(&effect) {
                played.push(effect);
                self.play(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    fn recording() -> (AudioManager, Rc<RefCell<Vec<(SoundEffect, f32)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (AudioManager::new(Box::new(Recorder(log.clone()))), log)
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::from_event(GameEvent::Shot), Some(SoundEffect::Shoot));
        assert_eq!(
            SoundEffect::from_event(GameEvent::TurretDestroyed),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(
            SoundEffect::from_event(GameEvent::CoinCollected),
            Some(SoundEffect::CoinPickup)
        );
        assert_eq!(SoundEffect::from_event(GameEvent::Won), None);
    }

    #[test]
    fn test_volume_reaches_backend() {
        let (mut audio, log) = recording();
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Explosion);
        assert_eq!(log.borrow().as_slice(), &[(SoundEffect::Explosion, 0.5)]);
    }

    #[test]
    fn test_muted_is_silent() {
        let (mut audio, log) = recording();
        audio.set_muted(true);
        audio.play(SoundEffect::Shoot);
        assert!(log.borrow().is_empty());
        audio.toggle_mute();
        assert!(!audio.is_muted());
    }

    #[test]
    fn test_events_deduplicated() {
        let (mut audio, log) = recording();
        audio.play_events(&[
            GameEvent::Explosion,
            GameEvent::TurretDestroyed,
            GameEvent::Shot,
            GameEvent::Won,
        ]);
        let effects: Vec<SoundEffect> = log.borrow().iter().map(|(e, _)| *e).collect();
        assert_eq!(effects, vec![SoundEffect::Explosion, SoundEffect::Shoot]);
    }

    #[test]
    fn test_silent_manager_is_noop() {
        let mut audio = AudioManager::silent();
        audio.play(SoundEffect::CoinPickup);
        audio.play_events(&[GameEvent::Lost]);
    }
}
