use macroquad::audio::{PlaySoundParams, Sound, load_sound, play_sound, play_sound_once, stop_sound};
use macroquad::logging::warn;
use std::collections::HashMap;

use hero_platformer::event::GameEvent;
use hero_platformer::helpers::asset_path;

const BGM: &str = "bgm";

/// Sound name and file under `assets/audio`.
const SOUND_FILES: [(&str, &str); 6] = [
    ("jump", "jump.wav"),
    ("coin", "coin.wav"),
    ("stomp", "stomp.wav"),
    ("key", "key.wav"),
    ("door", "door.wav"),
    (BGM, "bgm.ogg"),
];

pub struct SoundSystem {
    sounds: HashMap<String, Sound>,
}

impl SoundSystem {
    pub fn empty() -> Self {
        Self {
            sounds: HashMap::new(),
        }
    }

    /// Loads every known sound from `dir`. Missing files are skipped; the game
    /// simply stays silent for them.
    pub async fn load_from(dir: &str) -> Self {
        let mut system = Self::empty();
        for (name, file) in SOUND_FILES {
            let path = asset_path(&format!("{dir}/{file}"));
            match load_sound(&path).await {
                Ok(sound) => {
                    system.sounds.insert(name.to_string(), sound);
                }
                Err(err) => warn!("sound '{}' not loaded from {}: {}", name, path, err),
            }
        }
        system
    }

    pub fn play(&self, name: &str) {
        if let Some(sound) = self.sounds.get(name) {
            play_sound_once(sound);
        }
    }

    pub fn play_looped(&self, name: &str) {
        if let Some(sound) = self.sounds.get(name) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: true,
                    volume: 1.0,
                },
            );
        }
    }

    pub fn stop(&self, name: &str) {
        if let Some(sound) = self.sounds.get(name) {
            stop_sound(sound);
        }
    }

    pub fn handle(&self, event: GameEvent) {
        match event {
            GameEvent::Jump => self.play("jump"),
            GameEvent::CoinPickup => self.play("coin"),
            GameEvent::Stomp => self.play("stomp"),
            GameEvent::KeyPickup => self.play("key"),
            GameEvent::DoorOpened => self.play("door"),
            GameEvent::LevelStarted { .. } => self.play_looped(BGM),
            GameEvent::LevelEnded { .. } => self.stop(BGM),
            GameEvent::SpiderKilled | GameEvent::HeroDied => {}
        }
    }
}
