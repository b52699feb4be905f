use macroquad::prelude::*;

use crate::animation::{Animator, Clip};
use crate::physics::Body;
use crate::r#trait::{Animatable, Physical, Renderable, SpriteFrame};

pub const SPIDER_SHEET: &str = "spider";
pub const COIN_SHEET: &str = "coin";
pub const KEY_SHEET: &str = "key";
pub const DOOR_SHEET: &str = "door";
pub const DECORATION_SHEET: &str = "decoration";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpiderAnimation {
    Crawl,
    Die,
}

impl SpiderAnimation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Crawl => "crawl",
            Self::Die => "die",
        }
    }
}

fn spider_clips() -> Vec<Clip> {
    vec![
        Clip::new("crawl", &[0, 1, 2], 8.0, true),
        Clip::new("die", &[0, 4, 0, 4, 0, 4, 3, 3, 3, 3, 3, 3], 12.0, false),
    ]
}

/// Patrolling enemy. Gravity-exempt; walks at a constant speed and turns
/// around whenever it meets a wall or the edge of the world.
pub struct Spider {
    body: Body,
    patrol_speed: f32,
    alive: bool,
    animator: Animator,
}

impl Spider {
    pub fn new(pos: Vec2, size: Vec2, patrol_speed: f32) -> Self {
        let mut body = Body::anchored(pos, size, vec2(0.5, 0.5)).floating();
        body.collide_world_bounds = true;
        body.velocity.x = patrol_speed;
        let mut animator = Animator::new(spider_clips());
        animator.play(SpiderAnimation::Crawl.name());
        Self {
            body,
            patrol_speed,
            alive: true,
            animator,
        }
    }

    /// Flips direction after solid resolution has flagged a side contact.
    pub fn patrol(&mut self) {
        if !self.alive {
            return;
        }
        let body = &mut self.body;
        if body.touching.right || body.blocked.right {
            body.velocity.x = -self.patrol_speed;
        } else if body.touching.left || body.blocked.left {
            body.velocity.x = self.patrol_speed;
        }
    }

    pub fn die(&mut self) {
        self.body.enabled = false;
        self.alive = false;
        self.animator.play(SpiderAnimation::Die.name());
    }

    pub fn animation(&self) -> SpiderAnimation {
        if self.alive {
            SpiderAnimation::Crawl
        } else {
            SpiderAnimation::Die
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Dead and done playing its death clip; ready to be dropped.
    pub fn is_gone(&self) -> bool {
        !self.alive && self.animator.is_finished()
    }
}

impl Physical for Spider {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Animatable for Spider {
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

impl Renderable for Spider {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        Some(SpriteFrame {
            sheet: SPIDER_SHEET,
            frame: self.animator.frame(),
            dest: self.body.rect(),
            flip_x: false,
            alpha: 1.0,
        })
    }
}

pub struct Coin {
    body: Body,
    collected: bool,
    animator: Animator,
}

impl Coin {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        let mut animator = Animator::new(vec![Clip::new("rotate", &[0, 1, 2, 3], 6.0, true)]);
        animator.play("rotate");
        Self {
            body: Body::anchored(pos, size, vec2(0.5, 0.5)).floating(),
            collected: false,
            animator,
        }
    }

    /// Marks the coin collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.body.enabled = false;
        true
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

impl Physical for Coin {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Animatable for Coin {
    fn animator(&self) -> &Animator {
        &self.animator
    }

    fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    fn animation_name(&self) -> &'static str {
        "rotate"
    }
}

impl Renderable for Coin {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        if self.collected {
            return None;
        }
        Some(SpriteFrame {
            sheet: COIN_SHEET,
            frame: self.animator.frame(),
            dest: self.body.rect(),
            flip_x: false,
            alpha: 1.0,
        })
    }
}

pub struct Key {
    body: Body,
    collected: bool,
}

impl Key {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::anchored(pos, size, vec2(0.5, 0.5)).floating(),
            collected: false,
        }
    }

    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.body.enabled = false;
        true
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

impl Physical for Key {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Renderable for Key {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        if self.collected {
            return None;
        }
        Some(SpriteFrame {
            sheet: KEY_SHEET,
            frame: 0,
            dest: self.body.rect(),
            flip_x: false,
            alpha: 1.0,
        })
    }
}

pub struct Door {
    body: Body,
    opened: bool,
}

impl Door {
    /// `pos` is the bottom-centre of the door.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::anchored(pos, size, vec2(0.5, 1.0)).floating(),
            opened: false,
        }
    }

    pub fn open(&mut self) {
        self.opened = true;
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }
}

impl Physical for Door {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Renderable for Door {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        Some(SpriteFrame {
            sheet: DOOR_SHEET,
            frame: if self.opened { 1 } else { 0 },
            dest: self.body.rect(),
            flip_x: false,
            alpha: 1.0,
        })
    }
}

/// Static solid ground, drawn with its named image.
pub struct Platform {
    pub rect: Rect,
    pub image: String,
}

impl Renderable for Platform {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        Some(SpriteFrame {
            sheet: &self.image,
            frame: 0,
            dest: self.rect,
            flip_x: false,
            alpha: 1.0,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Invisible solid that only spiders collide with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyWall {
    pub rect: Rect,
}

impl EnemyWall {
    /// Sits on top of the platform edge at `corner`: a left wall hangs to the
    /// left of the corner, a right wall to the right of it.
    pub fn beside(corner: Vec2, size: Vec2, side: WallSide) -> Self {
        let anchor = match side {
            WallSide::Left => vec2(1.0, 1.0),
            WallSide::Right => vec2(0.0, 1.0),
        };
        let origin = corner - size * anchor;
        Self {
            rect: Rect::new(origin.x, origin.y, size.x, size.y),
        }
    }
}

pub struct Decoration {
    pub rect: Rect,
    pub frame: usize,
}

impl Renderable for Decoration {
    fn sprite(&self) -> Option<SpriteFrame<'_>> {
        Some(SpriteFrame {
            sheet: DECORATION_SHEET,
            frame: self.frame,
            dest: self.rect,
            flip_x: false,
            alpha: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{constrain_to_bounds, integrate, resolve_solid};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn spider_reverses_on_side_contact() {
        let mut spider = Spider::new(vec2(100.0, 100.0), vec2(42.0, 32.0), 100.0);
        spider.body_mut().touching.right = true;
        spider.patrol();
        assert_eq!(spider.body().velocity.x, -100.0);

        spider.body_mut().touching.right = false;
        spider.body_mut().blocked.left = true;
        spider.patrol();
        assert_eq!(spider.body().velocity.x, 100.0);
    }

    #[test]
    fn spider_patrol_between_walls_keeps_speed_and_turns_once_per_contact() {
        let platform = Rect::new(0.0, 200.0, 300.0, 40.0);
        let size = vec2(8.0, 64.0);
        let solids = [
            platform,
            EnemyWall::beside(vec2(platform.x, platform.y), size, WallSide::Left).rect,
            EnemyWall::beside(vec2(platform.x + platform.w, platform.y), size, WallSide::Right)
                .rect,
        ];
        let bounds = Rect::new(-100.0, -100.0, 600.0, 600.0);
        let mut spider = Spider::new(vec2(150.0, 184.0), vec2(42.0, 32.0), 100.0);

        let mut contacts = 0;
        for tick in 0..(60 * 12) {
            let before = spider.body().velocity.x;
            integrate(spider.body_mut(), 1200.0, DT);
            resolve_solid(spider.body_mut(), &solids);
            constrain_to_bounds(spider.body_mut(), bounds);
            let body = spider.body();
            let contact = body.touching.left
                || body.touching.right
                || body.blocked.left
                || body.blocked.right;
            spider.patrol();

            let after = spider.body().velocity.x;
            assert_eq!(after.abs(), 100.0);
            let flipped = after.signum() != before.signum();
            assert_eq!(flipped, contact, "tick {tick}: flipped = {flipped}, contact = {contact}");
            if contact {
                contacts += 1;
            }
            assert!(spider.body().position.x >= 0.0);
            assert!(spider.body().position.x + 42.0 <= 300.0);
        }
        // 258 px of travel each way at 100 px/s over 12 s.
        assert!(contacts >= 4, "contacts = {contacts}");
    }

    #[test]
    fn spider_ignores_gravity() {
        let mut spider = Spider::new(vec2(100.0, 100.0), vec2(42.0, 32.0), 100.0);
        integrate(spider.body_mut(), 1200.0, DT);
        assert_eq!(spider.body().velocity.y, 0.0);
        assert_eq!(spider.body().center().y, 100.0);
    }

    #[test]
    fn dead_spider_stops_patrolling_and_finishes() {
        let mut spider = Spider::new(vec2(0.0, 0.0), vec2(42.0, 32.0), 100.0);
        spider.die();
        assert!(!spider.body().enabled);
        spider.body_mut().touching.right = true;
        spider.patrol();
        assert_eq!(spider.body().velocity.x, 100.0);
        assert!(!spider.is_gone());
        spider.update_animation(1.0);
        assert!(spider.is_gone());
    }

    #[test]
    fn coin_collects_once() {
        let mut coin = Coin::new(vec2(10.0, 10.0), vec2(22.0, 22.0));
        assert!(coin.collect());
        assert!(!coin.collect());
        assert!(coin.sprite().is_none());
    }

    #[test]
    fn door_is_bottom_centre_anchored() {
        let door = Door::new(vec2(100.0, 500.0), vec2(42.0, 66.0));
        let rect = door.body().rect();
        assert_eq!(rect.x, 79.0);
        assert_eq!(rect.y, 434.0);
        assert_eq!(door.sprite().map(|s| s.frame), Some(0));
    }

    #[test]
    fn enemy_walls_flank_the_platform_top() {
        let size = vec2(8.0, 64.0);
        let left = EnemyWall::beside(vec2(100.0, 300.0), size, WallSide::Left);
        let right = EnemyWall::beside(vec2(268.0, 300.0), size, WallSide::Right);
        assert_eq!(left.rect, Rect::new(92.0, 236.0, 8.0, 64.0));
        assert_eq!(right.rect, Rect::new(268.0, 236.0, 8.0, 64.0));
    }
}
