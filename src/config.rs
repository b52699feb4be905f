use macroquad::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug)]
pub enum ConfigLoadError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Yaml(err) => write!(f, "yaml error: {err}"),
            Self::Invalid(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

impl From<std::io::Error> for ConfigLoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigLoadError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

/// Tunables for the whole game. Every field has a default matching the
/// shipped game, so `config.yaml` only needs to list what it overrides.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub hero: HeroConfig,
    pub spider: SpiderConfig,
    pub sizes: SpriteSizes,
    pub timings: Timings,
    /// Pixel size of each platform image, keyed by the `image` name used in level files.
    pub platform_images: HashMap<String, [f32; 2]>,
    pub decoration_frames: usize,
    /// Level files in play order, relative to the asset root.
    pub levels: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub speed: f32,
    pub jump_speed: f32,
    pub bounce_speed: f32,
    pub jump_hold_ms: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SpiderConfig {
    pub speed: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SpriteSizes {
    pub hero: [f32; 2],
    pub spider: [f32; 2],
    pub coin: [f32; 2],
    pub key: [f32; 2],
    pub door: [f32; 2],
    pub decoration: [f32; 2],
    pub enemy_wall: [f32; 2],
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub slide_ms: u32,
    pub fade_ms: u32,
    pub flash_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let platform_images = [
            ("ground", [960.0, 54.0]),
            ("grass:8x1", [336.0, 42.0]),
            ("grass:6x1", [252.0, 42.0]),
            ("grass:4x1", [168.0, 42.0]),
            ("grass:2x1", [84.0, 42.0]),
            ("grass:1x1", [42.0, 42.0]),
        ]
        .into_iter()
        .map(|(name, size)| (name.to_string(), size))
        .collect();

        Self {
            world: WorldConfig::default(),
            hero: HeroConfig::default(),
            spider: SpiderConfig::default(),
            sizes: SpriteSizes::default(),
            timings: Timings::default(),
            platform_images,
            decoration_frames: 7,
            levels: vec![
                "data/level00.json".to_string(),
                "data/level01.json".to_string(),
            ],
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            gravity: 1200.0,
        }
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            jump_speed: 400.0,
            bounce_speed: 200.0,
            jump_hold_ms: 200,
        }
    }
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self { speed: 100.0 }
    }
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self {
            hero: [36.0, 42.0],
            spider: [42.0, 32.0],
            coin: [22.0, 22.0],
            key: [30.0, 30.0],
            door: [42.0, 66.0],
            decoration: [42.0, 42.0],
            enemy_wall: [8.0, 64.0],
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            slide_ms: 500,
            fade_ms: 500,
            flash_ms: 500,
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        let config: GameConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("hero.speed", self.hero.speed),
            ("hero.jump_speed", self.hero.jump_speed),
            ("hero.bounce_speed", self.hero.bounce_speed),
            ("spider.speed", self.spider.speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigLoadError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.world.gravity < 0.0 {
            return Err(ConfigLoadError::Invalid("world.gravity must not be negative".to_string()));
        }

        let sizes = [
            ("sizes.hero", self.sizes.hero),
            ("sizes.spider", self.sizes.spider),
            ("sizes.coin", self.sizes.coin),
            ("sizes.key", self.sizes.key),
            ("sizes.door", self.sizes.door),
            ("sizes.decoration", self.sizes.decoration),
            ("sizes.enemy_wall", self.sizes.enemy_wall),
        ];
        for (name, [w, h]) in sizes
            .into_iter()
            .chain(self.platform_images.iter().map(|(name, size)| (name.as_str(), *size)))
        {
            if !(w > 0.0 && h > 0.0) {
                return Err(ConfigLoadError::Invalid(format!(
                    "{name} has non-positive size {w}x{h}"
                )));
            }
        }

        if self.levels.is_empty() {
            return Err(ConfigLoadError::Invalid("at least one level is required".to_string()));
        }
        if self.decoration_frames == 0 {
            return Err(ConfigLoadError::Invalid(
                "decoration_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn world_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world.width, self.world.height)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn platform_size(&self, image: &str) -> Option<Vec2> {
        self.platform_images.get(image).map(|[w, h]| vec2(*w, *h))
    }
}

pub fn size_of(raw: [f32; 2]) -> Vec2 {
    vec2(raw[0], raw[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GameConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.world.gravity, 1200.0);
        assert_eq!(config.hero.speed, 200.0);
        assert_eq!(config.hero.jump_hold_ms, 200);
        assert_eq!(config.spider.speed, 100.0);
        assert_eq!(config.level_count(), 2);
        assert_eq!(config.platform_size("grass:4x1"), Some(vec2(168.0, 42.0)));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = GameConfig::from_yaml_str("hero:\n  speed: 250\n").unwrap();
        assert_eq!(config.hero.speed, 250.0);
        assert_eq!(config.hero.jump_speed, 400.0);
    }

    #[test]
    fn rejects_empty_level_list() {
        let err = GameConfig::from_yaml_str("levels: []\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_speed() {
        let err = GameConfig::from_yaml_str("spider:\n  speed: 0\n").unwrap_err();
        assert!(err.to_string().contains("spider.speed"));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = GameConfig::from_yaml_str("hero: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Yaml(_)));
    }
}
