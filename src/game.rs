use macroquad::logging::info;

use crate::config::{ConfigLoadError, GameConfig};
use crate::event::{EventQueue, GameEvent};
use crate::input::InputSource;
use crate::level::{LevelData, LevelLoadError};
use crate::session::{GameSession, LevelPayload, SceneRequest};

#[derive(Debug)]
pub enum GameError {
    Config(ConfigLoadError),
    Level { index: usize, source: LevelLoadError },
    LevelCountMismatch { configured: usize, loaded: usize },
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Level { index, source } => write!(f, "level {index}: {source}"),
            Self::LevelCountMismatch { configured, loaded } => {
                write!(f, "{configured} levels configured but {loaded} loaded")
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Level { source, .. } => Some(source),
            Self::LevelCountMismatch { .. } => None,
        }
    }
}

impl From<ConfigLoadError> for GameError {
    fn from(err: ConfigLoadError) -> Self {
        Self::Config(err)
    }
}

/// Playable index for a requested level: anything past the last level wraps
/// back around to the first.
pub fn wrap_level_index(requested: usize, level_count: usize) -> usize {
    requested % level_count.max(1)
}

/// Owns the level list and the running session, and swaps in a fresh session
/// whenever the current one asks to restart or advance.
pub struct Game {
    config: GameConfig,
    levels: Vec<LevelData>,
    session: GameSession,
    events: EventQueue<GameEvent>,
}

impl Game {
    /// Validates every level up front, then starts the first one.
    pub fn new(config: GameConfig, levels: Vec<LevelData>) -> Result<Self, GameError> {
        config.validate()?;
        if levels.len() != config.level_count() {
            return Err(GameError::LevelCountMismatch {
                configured: config.level_count(),
                loaded: levels.len(),
            });
        }
        for (index, level) in levels.iter().enumerate() {
            level
                .validate(&config)
                .map_err(|source| GameError::Level { index, source })?;
        }

        let session = Self::load(&config, &levels, 0)?;
        let mut events = EventQueue::new();
        events.send(GameEvent::LevelStarted { level: 0 });
        Ok(Self {
            config,
            levels,
            session,
            events,
        })
    }

    fn load(
        config: &GameConfig,
        levels: &[LevelData],
        level: usize,
    ) -> Result<GameSession, GameError> {
        let world = levels[level]
            .instantiate(config)
            .map_err(|source| GameError::Level { index: level, source })?;
        info!("level {} loaded", level);
        Ok(GameSession::new(level, world, config))
    }

    /// Replaces the running session with a fresh instance of `payload.level`,
    /// reduced modulo the level count.
    pub fn start(&mut self, payload: LevelPayload) -> Result<(), GameError> {
        let level = wrap_level_index(payload.level, self.level_count());
        self.session = Self::load(&self.config, &self.levels, level)?;
        self.events.send(GameEvent::LevelStarted { level });
        Ok(())
    }

    pub fn restart(&mut self, payload: LevelPayload) -> Result<(), GameError> {
        self.start(payload)
    }

    pub fn advance(&mut self, payload: LevelPayload) -> Result<(), GameError> {
        let level = wrap_level_index(payload.level, self.level_count());
        if level != payload.level {
            info!("all levels complete, wrapping to level {}", level);
        }
        self.start(payload)
    }

    pub fn tick(&mut self, input: &impl InputSource, dt: f32) -> Result<(), GameError> {
        self.session.tick(input, dt);
        self.events.extend(self.session.drain_events());
        match self.session.take_request() {
            Some(SceneRequest::Restart(payload)) => self.restart(payload),
            Some(SceneRequest::Advance(payload)) => self.advance(payload),
            None => Ok(()),
        }
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn current_level(&self) -> usize {
        self.session.run().level
    }
}
