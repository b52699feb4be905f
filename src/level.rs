use macroquad::logging::debug;
use macroquad::prelude::*;
use serde::Deserialize;

use crate::config::{GameConfig, size_of};
use crate::entity::{Coin, Decoration, Door, EnemyWall, Key, Platform, Spider, WallSide};
use crate::hero::Hero;

#[derive(Debug)]
pub enum LevelLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnknownPlatformImage(String),
    DecorationFrameOutOfRange { frame: usize, frames: usize },
    OutOfBounds { what: &'static str, x: f32, y: f32 },
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::UnknownPlatformImage(image) => write!(f, "unknown platform image '{image}'"),
            Self::DecorationFrameOutOfRange { frame, frames } => {
                write!(f, "decoration frame {frame} out of range (sheet has {frames})")
            }
            Self::OutOfBounds { what, x, y } => {
                write!(f, "{what} at ({x}, {y}) lies outside the world")
            }
        }
    }
}

impl std::error::Error for LevelLoadError {}

impl From<std::io::Error> for LevelLoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LevelLoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn vec(self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlatformFile {
    pub x: f32,
    pub y: f32,
    pub image: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DecorationFile {
    pub x: f32,
    pub y: f32,
    pub frame: usize,
}

/// A level as stored on disk. Read-only; `instantiate` turns it into live
/// entities for one play-through.
#[derive(Clone, Debug, Deserialize)]
pub struct LevelData {
    pub platforms: Vec<PlatformFile>,
    #[serde(default)]
    pub decoration: Vec<DecorationFile>,
    #[serde(default)]
    pub coins: Vec<Point>,
    pub key: Point,
    pub door: Point,
    pub hero: Point,
    #[serde(default)]
    pub spiders: Vec<Point>,
}

impl LevelData {
    pub fn from_json_str(raw: &str) -> Result<Self, LevelLoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, LevelLoadError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Rejects data that would leave entities in an undefined state.
    pub fn validate(&self, config: &GameConfig) -> Result<(), LevelLoadError> {
        for platform in &self.platforms {
            if config.platform_size(&platform.image).is_none() {
                return Err(LevelLoadError::UnknownPlatformImage(platform.image.clone()));
            }
        }
        for deco in &self.decoration {
            if deco.frame >= config.decoration_frames {
                return Err(LevelLoadError::DecorationFrameOutOfRange {
                    frame: deco.frame,
                    frames: config.decoration_frames,
                });
            }
        }

        let bounds = config.world_bounds();
        let inside = |what: &'static str, p: Point| {
            if p.x.is_finite() && p.y.is_finite() && bounds.contains(p.vec()) {
                Ok(())
            } else {
                Err(LevelLoadError::OutOfBounds { what, x: p.x, y: p.y })
            }
        };
        inside("hero", self.hero)?;
        inside("door", self.door)?;
        inside("key", self.key)?;
        for coin in &self.coins {
            inside("coin", *coin)?;
        }
        for spider in &self.spiders {
            inside("spider", *spider)?;
        }
        for platform in &self.platforms {
            inside("platform", Point { x: platform.x, y: platform.y })?;
        }
        Ok(())
    }

    pub fn instantiate(&self, config: &GameConfig) -> Result<World, LevelLoadError> {
        self.validate(config)?;
        let sizes = &config.sizes;

        let mut platforms = Vec::with_capacity(self.platforms.len());
        let mut enemy_walls = Vec::with_capacity(self.platforms.len() * 2);
        let wall_size = size_of(sizes.enemy_wall);
        for file in &self.platforms {
            let size = config
                .platform_size(&file.image)
                .ok_or_else(|| LevelLoadError::UnknownPlatformImage(file.image.clone()))?;
            let rect = Rect::new(file.x, file.y, size.x, size.y);
            enemy_walls.push(EnemyWall::beside(vec2(rect.x, rect.y), wall_size, WallSide::Left));
            enemy_walls.push(EnemyWall::beside(
                vec2(rect.x + rect.w, rect.y),
                wall_size,
                WallSide::Right,
            ));
            platforms.push(Platform {
                rect,
                image: file.image.clone(),
            });
        }

        let deco_size = size_of(sizes.decoration);
        let decorations = self
            .decoration
            .iter()
            .map(|deco| Decoration {
                rect: Rect::new(deco.x, deco.y, deco_size.x, deco_size.y),
                frame: deco.frame,
            })
            .collect();

        let coins = self
            .coins
            .iter()
            .map(|p| Coin::new(p.vec(), size_of(sizes.coin)))
            .collect();
        let spiders = self
            .spiders
            .iter()
            .map(|p| Spider::new(p.vec(), size_of(sizes.spider), config.spider.speed))
            .collect();

        let world = World {
            hero: Hero::new(self.hero.vec(), size_of(sizes.hero), &config.hero),
            spiders,
            coins,
            key: Key::new(self.key.vec(), size_of(sizes.key)),
            door: Door::new(self.door.vec(), size_of(sizes.door)),
            platforms,
            enemy_walls,
            decorations,
            bounds: config.world_bounds(),
        };
        debug!(
            "instantiated level: {} platforms, {} coins, {} spiders",
            world.platforms.len(),
            world.coins.len(),
            world.spiders.len()
        );
        Ok(world)
    }
}

/// Live entities of one level instance.
pub struct World {
    pub hero: Hero,
    pub spiders: Vec<Spider>,
    pub coins: Vec<Coin>,
    pub key: Key,
    pub door: Door,
    pub platforms: Vec<Platform>,
    pub enemy_walls: Vec<EnemyWall>,
    pub decorations: Vec<Decoration>,
    pub bounds: Rect,
}

impl World {
    pub fn platform_rects(&self) -> Vec<Rect> {
        self.platforms.iter().map(|p| p.rect).collect()
    }

    /// Everything a spider treats as solid: platforms and enemy walls.
    pub fn spider_solids(&self) -> Vec<Rect> {
        self.platforms
            .iter()
            .map(|p| p.rect)
            .chain(self.enemy_walls.iter().map(|w| w.rect))
            .collect()
    }
}
