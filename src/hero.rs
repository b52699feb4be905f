use macroquad::prelude::*;

use crate::animation::{Animator, Clip};
use crate::config::HeroConfig;
use crate::physics::Body;
use crate::r#trait::{Animatable, Physical, Renderable, SpriteFrame};

pub const HERO_SHEET: &str = "hero";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroAnimation {
    Stop,
    Run,
    Jump,
    Fall,
    Die,
}

impl HeroAnimation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
            Self::Die => "die",
        }
    }

    /// First matching rule wins.
    pub fn select(alive: bool, frozen: bool, velocity: Vec2, touching_down: bool) -> Self {
        if !alive {
            Self::Die
        } else if frozen {
            Self::Stop
        } else if velocity.y < 0.0 {
            Self::Jump
        } else if !touching_down {
            Self::Fall
        } else if velocity.x != 0.0 {
            Self::Run
        } else {
            Self::Stop
        }
    }
}

fn hero_clips() -> Vec<Clip> {
    vec![
        Clip::still("stop", 0),
        Clip::new("run", &[1, 2], 8.0, true),
        Clip::still("jump", 3),
        Clip::still("fall", 4),
        Clip::new("die", &[5, 6, 5, 6, 5, 6, 5, 6], 12.0, false),
    ]
}

pub struct Hero {
    body: Body,
    speed: f32,
    jump_speed: f32,
    bounce_speed: f32,
    facing: Facing,
    frozen: bool,
    boosting: bool,
    alive: bool,
    exists: bool,
    alpha: f32,
    animator: Animator,
}

impl Hero {
    /// Spawns the hero centred on `pos`.
    pub fn new(pos: Vec2, size: Vec2, tuning: &HeroConfig) -> Self {
        let mut body = Body::anchored(pos, size, vec2(0.5, 0.5));
        body.collide_world_bounds = true;
        Self {
            body,
            speed: tuning.speed,
            jump_speed: tuning.jump_speed,
            bounce_speed: tuning.bounce_speed,
            facing: Facing::Right,
            frozen: false,
            boosting: false,
            alive: true,
            exists: true,
            alpha: 1.0,
            animator: Animator::new(hero_clips()),
        }
    }

    /// `direction` is -1, 0 or 1; anything else is reduced to its sign.
    pub fn move_dir(&mut self, direction: i32) {
        if self.frozen {
            return;
        }
        let direction = direction.signum();
        self.body.velocity.x = direction as f32 * self.speed;
        match direction {
            -1 => self.facing = Facing::Left,
            1 => self.facing = Facing::Right,
            _ => {}
        }
    }

    /// Applies the jump impulse when grounded, or keeps re-applying it while a
    /// boost is running. Returns true only when a new jump started.
    pub fn jump(&mut self) -> bool {
        let can_jump = self.body.touching.down && self.alive && !self.frozen;
        if can_jump || self.boosting {
            self.body.velocity.y = -self.jump_speed;
            self.boosting = true;
        }
        can_jump
    }

    pub fn stop_jump_boost(&mut self) {
        self.boosting = false;
    }

    pub fn bounce(&mut self) {
        self.body.velocity.y = -self.bounce_speed;
    }

    pub fn freeze(&mut self) {
        self.body.enabled = false;
        self.frozen = true;
    }

    pub fn die(&mut self) {
        self.body.enabled = false;
        self.alive = false;
        self.animator.play(HeroAnimation::Die.name());
    }

    /// Removes the hero from the simulation once its death has played out.
    pub fn kill(&mut self) {
        self.exists = false;
    }

    pub fn animation(&self) -> HeroAnimation {
        HeroAnimation::select(
            self.alive,
            self.frozen,
            self.body.velocity,
            self.body.touching.down,
        )
    }

    pub fn death_finished(&self) -> bool {
        !self.alive
            && self.animator.current_name() == Some(HeroAnimation::Die.name())
            && self.animator.is_finished()
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_boosting(&self) -> bool {
        self.boosting
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }
}

impl Physical for Hero {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Animatable for Hero {
    fn animator(&self) -> &Animator {
        &self.animator
    }

    fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    fn animation_name(&self) -> &'static str {
        self.animation().name()
    }
}

impl Renderable for Hero {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        if !self.exists {
            return None;
        }
        Some(SpriteFrame {
            sheet: HERO_SHEET,
            frame: self.animator.frame(),
            dest: self.body.rect(),
            flip_x: self.facing == Facing::Left,
            alpha: self.alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Hero {
        Hero::new(vec2(100.0, 100.0), vec2(36.0, 42.0), &HeroConfig::default())
    }

    fn grounded_hero() -> Hero {
        let mut hero = hero();
        hero.body_mut().touching.down = true;
        hero
    }

    #[test]
    fn animation_priority_order() {
        use HeroAnimation::*;
        assert_eq!(HeroAnimation::select(false, true, vec2(0.0, -5.0), true), Die);
        assert_eq!(HeroAnimation::select(true, true, vec2(200.0, -5.0), false), Stop);
        assert_eq!(HeroAnimation::select(true, false, vec2(200.0, -5.0), true), Jump);
        assert_eq!(HeroAnimation::select(true, false, vec2(0.0, 0.0), false), Fall);
        assert_eq!(HeroAnimation::select(true, false, vec2(0.0, 30.0), false), Fall);
        assert_eq!(HeroAnimation::select(true, false, vec2(-200.0, 0.0), true), Run);
        assert_eq!(HeroAnimation::select(true, false, vec2(0.0, 0.0), true), Stop);
    }

    #[test]
    fn move_sets_velocity_and_facing() {
        let mut hero = hero();
        hero.move_dir(-1);
        assert_eq!(hero.velocity().x, -200.0);
        assert_eq!(hero.facing(), Facing::Left);
        hero.move_dir(0);
        assert_eq!(hero.velocity().x, 0.0);
        assert_eq!(hero.facing(), Facing::Left);
        hero.move_dir(1);
        assert_eq!(hero.velocity().x, 200.0);
        assert_eq!(hero.facing(), Facing::Right);
    }

    #[test]
    fn frozen_hero_ignores_move() {
        let mut hero = hero();
        hero.move_dir(1);
        hero.freeze();
        hero.move_dir(-1);
        assert_eq!(hero.velocity().x, 200.0);
        assert!(!hero.body().enabled);
    }

    #[test]
    fn jump_needs_ground() {
        let mut hero = hero();
        assert!(!hero.jump());
        assert_eq!(hero.velocity().y, 0.0);

        let mut hero = grounded_hero();
        assert!(hero.jump());
        assert_eq!(hero.velocity().y, -400.0);
        assert!(hero.is_boosting());
    }

    #[test]
    fn boost_reapplies_impulse_without_reporting_a_new_jump() {
        let mut hero = grounded_hero();
        assert!(hero.jump());
        hero.body_mut().touching.down = false;
        hero.body_mut().velocity.y = -300.0;
        assert!(!hero.jump());
        assert_eq!(hero.velocity().y, -400.0);

        hero.stop_jump_boost();
        hero.body_mut().velocity.y = -300.0;
        assert!(!hero.jump());
        assert_eq!(hero.velocity().y, -300.0);
    }

    #[test]
    fn dead_or_frozen_hero_cannot_start_a_jump() {
        let mut hero = grounded_hero();
        hero.die();
        assert!(!hero.jump());

        let mut hero = grounded_hero();
        hero.freeze();
        assert!(!hero.jump());
    }

    #[test]
    fn bounce_is_unconditional() {
        let mut hero = hero();
        hero.body_mut().velocity.y = 50.0;
        hero.bounce();
        assert_eq!(hero.velocity().y, -200.0);
    }

    #[test]
    fn death_clip_runs_once_then_reports_finished() {
        let mut hero = grounded_hero();
        hero.die();
        assert_eq!(hero.animation(), HeroAnimation::Die);
        for _ in 0..30 {
            hero.update_animation(1.0 / 60.0);
        }
        assert!(!hero.death_finished());
        for _ in 0..20 {
            hero.update_animation(1.0 / 60.0);
        }
        assert!(hero.death_finished());
    }

    #[test]
    fn same_state_does_not_restart_clip() {
        let mut hero = grounded_hero();
        hero.move_dir(1);
        hero.update_animation(0.0);
        assert_eq!(hero.animator().current_name(), Some("run"));
        hero.update_animation(0.125);
        assert_eq!(hero.animator().frame(), 2);
        hero.update_animation(0.0);
        assert_eq!(hero.animator().frame(), 2);
    }
}
