use macroquad::logging::info;

use crate::collision::{Outcome, resolve_overlaps};
use crate::config::GameConfig;
use crate::event::{EventQueue, GameEvent};
use crate::input::{ControlMapper, InputSource};
use crate::level::World;
use crate::physics::{constrain_to_bounds, integrate, resolve_solid};
use crate::r#trait::{Animatable, Physical};

/// Per-level score state. Rebuilt from scratch on every (re)start; only the
/// level index is carried forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunState {
    pub level: usize,
    pub coin_count: u32,
    pub has_key: bool,
}

impl RunState {
    pub fn new(level: usize) -> Self {
        Self {
            level,
            coin_count: 0,
            has_key: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPayload {
    pub level: usize,
}

/// What the session asks its owner to do once it is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    Restart(LevelPayload),
    Advance(LevelPayload),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStage {
    SlidingToDoor,
    FadingOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Dying,
    Transitioning(TransitionStage),
    /// A scene request has been issued; the session no longer ticks.
    Finished,
}

#[derive(Clone, Copy, Debug)]
pub struct Timer {
    elapsed: f32,
    duration: f32,
}

impl Timer {
    pub fn from_ms(ms: u32) -> Self {
        Self {
            elapsed: 0.0,
            duration: ms as f32 / 1000.0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// 0..=1; a zero-length timer is immediately complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Slide {
    from_x: f32,
    to_x: f32,
    timer: Timer,
}

/// One play-through of one level: owns the live entities, the score state and
/// the phase machine. Replaced wholesale on restart or advance.
pub struct GameSession {
    world: World,
    run: RunState,
    phase: Phase,
    mapper: ControlMapper,
    gravity: f32,
    fade_ms: u32,
    slide_ms: u32,
    flash: Timer,
    slide: Option<Slide>,
    fade_out: Option<Timer>,
    events: EventQueue<GameEvent>,
    request: Option<SceneRequest>,
}

impl GameSession {
    pub fn new(level: usize, world: World, config: &GameConfig) -> Self {
        Self {
            world,
            run: RunState::new(level),
            phase: Phase::Playing,
            mapper: ControlMapper::new(config.hero.jump_hold_ms),
            gravity: config.world.gravity,
            fade_ms: config.timings.fade_ms,
            slide_ms: config.timings.slide_ms,
            flash: Timer::from_ms(config.timings.flash_ms),
            slide: None,
            fade_out: None,
            events: EventQueue::new(),
            request: None,
        }
    }

    /// Runs one frame: input, physics, overlap rules, patrols, animation, then
    /// whatever the current phase is waiting on.
    pub fn tick(&mut self, input: &impl InputSource, dt: f32) {
        if self.phase == Phase::Finished {
            return;
        }
        self.flash.tick(dt);

        self.mapper.apply(&mut self.world.hero, input, &mut self.events);
        self.step_physics(dt);

        if self.phase == Phase::Playing {
            match resolve_overlaps(&mut self.world, &mut self.run, &mut self.events) {
                Some(Outcome::HeroDied) => {
                    info!("hero died on level {}", self.run.level);
                    self.phase = Phase::Dying;
                }
                Some(Outcome::DoorReached) => {
                    info!(
                        "door reached on level {} with {} coins",
                        self.run.level, self.run.coin_count
                    );
                    self.start_slide();
                }
                None => {}
            }
        }

        for spider in self.world.spiders.iter_mut() {
            spider.patrol();
        }

        self.update_animations(dt);
        self.advance_phase(dt);
    }

    fn step_physics(&mut self, dt: f32) {
        let bounds = self.world.bounds;

        let platforms = self.world.platform_rects();
        let hero = self.world.hero.body_mut();
        integrate(hero, self.gravity, dt);
        resolve_solid(hero, &platforms);
        constrain_to_bounds(hero, bounds);

        let solids = self.world.spider_solids();
        for spider in self.world.spiders.iter_mut() {
            let body = spider.body_mut();
            integrate(body, self.gravity, dt);
            resolve_solid(body, &solids);
            constrain_to_bounds(body, bounds);
        }
    }

    fn update_animations(&mut self, dt: f32) {
        let hero = &mut self.world.hero;
        if hero.exists() {
            hero.update_animation(dt);
            if hero.death_finished() {
                hero.kill();
            }
        }

        for spider in self.world.spiders.iter_mut() {
            spider.update_animation(dt);
        }
        self.world.spiders.retain(|spider| !spider.is_gone());

        for coin in self.world.coins.iter_mut() {
            coin.update_animation(dt);
        }
    }

    fn start_slide(&mut self) {
        self.slide = Some(Slide {
            from_x: self.world.hero.center().x,
            to_x: self.world.door.center().x,
            timer: Timer::from_ms(self.slide_ms),
        });
        self.phase = Phase::Transitioning(TransitionStage::SlidingToDoor);
    }

    fn advance_phase(&mut self, dt: f32) {
        match self.phase {
            Phase::Playing | Phase::Finished => {}
            Phase::Dying => {
                if !self.world.hero.exists() {
                    self.finish(SceneRequest::Restart(LevelPayload { level: self.run.level }));
                }
            }
            Phase::Transitioning(TransitionStage::SlidingToDoor) => {
                let Some(slide) = self.slide.as_mut() else {
                    return;
                };
                slide.timer.tick(dt);
                let t = slide.timer.progress();
                let x = slide.from_x + (slide.to_x - slide.from_x) * t;
                let done = slide.timer.is_done();

                let hero = &mut self.world.hero;
                let mut center = hero.center();
                center.x = x;
                hero.body_mut().set_center(center);
                hero.set_alpha(1.0 - t);

                if done {
                    self.slide = None;
                    self.fade_out = Some(Timer::from_ms(self.fade_ms));
                    self.phase = Phase::Transitioning(TransitionStage::FadingOut);
                }
            }
            Phase::Transitioning(TransitionStage::FadingOut) => {
                let Some(fade) = self.fade_out.as_mut() else {
                    return;
                };
                fade.tick(dt);
                if fade.is_done() {
                    self.finish(SceneRequest::Advance(LevelPayload { level: self.run.level + 1 }));
                }
            }
        }
    }

    fn finish(&mut self, request: SceneRequest) {
        self.phase = Phase::Finished;
        self.request = Some(request);
        self.events.send(GameEvent::LevelEnded { level: self.run.level });
    }

    pub fn take_request(&mut self) -> Option<SceneRequest> {
        self.request.take()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain()
    }

    /// Opacity of the black overlay: fading in after load, fading out before
    /// the next level.
    pub fn screen_fade(&self) -> f32 {
        let fade_out = self.fade_out.map(|t| t.progress()).unwrap_or(0.0);
        let flash = 1.0 - self.flash.progress();
        if self.phase == Phase::Finished {
            return 1.0;
        }
        fade_out.max(flash)
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}
