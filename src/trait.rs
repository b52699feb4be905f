use macroquad::prelude::*;

use crate::animation::Animator;
use crate::physics::Body;

/// Something with a physics body.
pub trait Physical {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn center(&self) -> Vec2 {
        self.body().center()
    }
}

/// Something whose clip is derived from its current state.
pub trait Animatable {
    fn animator(&self) -> &Animator;
    fn animator_mut(&mut self) -> &mut Animator;

    /// Clip the entity should be showing given its current state.
    fn animation_name(&self) -> &'static str;

    /// Advances the running clip, then switches to the clip the current
    /// state asks for. Asking for the running clip does nothing.
    fn update_animation(&mut self, dt: f32) {
        self.animator_mut().update(dt);
        let name = self.animation_name();
        self.animator_mut().play(name);
    }
}

/// What the renderer needs to draw one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrame<'a> {
    pub sheet: &'a str,
    pub frame: usize,
    pub dest: Rect,
    pub flip_x: bool,
    pub alpha: f32,
}

pub trait Renderable {
    /// `None` when the entity is not visible.
    fn sprite(&self) -> Option<SpriteFrame<'_>>;
}
