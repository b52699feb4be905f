//! Arcade-style physics: axis-aligned bodies, gravity, solid separation
//! against static geometry and plain overlap tests.
//!
//! Bodies are integrated first, then pushed out of every solid they ended
//! up inside. The axis a body is pushed along is the one it was separated
//! on before this step; a body that was clear on both axes (a corner hit)
//! or on neither (spawned inside) is pushed along the axis of least
//! penetration.

use macroquad::prelude::*;

const CONTACT_EPSILON: f32 = 0.01;

/// Which faces of a body are in contact with something this step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sides {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

#[derive(Clone, Debug)]
pub struct Body {
    /// Top-left corner.
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub enabled: bool,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    /// Contacts against other bodies, reset every step.
    pub touching: Sides,
    /// Contacts against the world bounds, reset every step.
    pub blocked: Sides,
    previous: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            enabled: true,
            allow_gravity: true,
            collide_world_bounds: false,
            touching: Sides::default(),
            blocked: Sides::default(),
            previous: position,
        }
    }

    /// A body placed so that `anchor` (0..1 on each axis, relative to its size)
    /// sits on `point`.
    pub fn anchored(point: Vec2, size: Vec2, anchor: Vec2) -> Self {
        Self::new(point - size * anchor, size)
    }

    pub fn floating(self) -> Self {
        Self {
            allow_gravity: false,
            ..self
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.position = center - self.size * 0.5;
    }

    fn previous_rect(&self) -> Rect {
        Rect::new(self.previous.x, self.previous.y, self.size.x, self.size.y)
    }
}

/// Strict AABB intersection; rectangles that only share an edge do not intersect.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Advances a body by one step: clears contact flags, applies gravity and
/// moves it by its velocity. Disabled bodies are left alone.
pub fn integrate(body: &mut Body, gravity: f32, dt: f32) {
    if !body.enabled {
        return;
    }
    body.touching = Sides::default();
    body.blocked = Sides::default();
    body.previous = body.position;
    if body.allow_gravity {
        body.velocity.y += gravity * dt;
    }
    body.position += body.velocity * dt;
}

/// Pushes `body` out of every solid it intersects, setting `touching` on the
/// contact side and zeroing the velocity component that points into the
/// surface. Returns whether any solid was hit.
pub fn resolve_solid(body: &mut Body, solids: &[Rect]) -> bool {
    if !body.enabled {
        return false;
    }

    let mut hit = false;
    for solid in solids {
        let rect = body.rect();
        if !intersects(&rect, solid) {
            continue;
        }
        hit = true;

        let prev = body.previous_rect();
        let was_above = prev.y + prev.h <= solid.y + CONTACT_EPSILON;
        let was_below = prev.y >= solid.y + solid.h - CONTACT_EPSILON;
        let was_left = prev.x + prev.w <= solid.x + CONTACT_EPSILON;
        let was_right = prev.x >= solid.x + solid.w - CONTACT_EPSILON;
        let clear_y = was_above || was_below;
        let clear_x = was_left || was_right;

        let left = (solid.x + solid.w) - rect.x;
        let right = (rect.x + rect.w) - solid.x;
        let top = (solid.y + solid.h) - rect.y;
        let bottom = (rect.y + rect.h) - solid.y;

        let axis = match (clear_x, clear_y) {
            (true, false) => Axis::X,
            (false, true) => Axis::Y,
            _ => {
                if left.min(right) < top.min(bottom) {
                    Axis::X
                } else {
                    Axis::Y
                }
            }
        };

        match axis {
            Axis::Y => {
                let push_up = if clear_y { was_above } else { bottom <= top };
                if push_up {
                    body.position.y = solid.y - body.size.y;
                    body.touching.down = true;
                    body.velocity.y = body.velocity.y.min(0.0);
                } else {
                    body.position.y = solid.y + solid.h;
                    body.touching.up = true;
                    body.velocity.y = body.velocity.y.max(0.0);
                }
            }
            Axis::X => {
                let push_left = if clear_x { was_left } else { right <= left };
                if push_left {
                    body.position.x = solid.x - body.size.x;
                    body.touching.right = true;
                    body.velocity.x = body.velocity.x.min(0.0);
                } else {
                    body.position.x = solid.x + solid.w;
                    body.touching.left = true;
                    body.velocity.x = body.velocity.x.max(0.0);
                }
            }
        }
    }
    hit
}

/// Keeps a body inside `bounds`, flagging `blocked` on the side it hit.
pub fn constrain_to_bounds(body: &mut Body, bounds: Rect) {
    if !body.enabled || !body.collide_world_bounds {
        return;
    }
    if body.position.x < bounds.x {
        body.position.x = bounds.x;
        body.blocked.left = true;
        body.velocity.x = body.velocity.x.max(0.0);
    } else if body.position.x + body.size.x > bounds.x + bounds.w {
        body.position.x = bounds.x + bounds.w - body.size.x;
        body.blocked.right = true;
        body.velocity.x = body.velocity.x.min(0.0);
    }
    if body.position.y < bounds.y {
        body.position.y = bounds.y;
        body.blocked.up = true;
        body.velocity.y = body.velocity.y.max(0.0);
    } else if body.position.y + body.size.y > bounds.y + bounds.h {
        body.position.y = bounds.y + bounds.h - body.size.y;
        body.blocked.down = true;
        body.velocity.y = body.velocity.y.min(0.0);
    }
}

/// Non-solid intersection test. Disabled bodies never overlap anything.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.enabled && b.enabled && intersects(&a.rect(), &b.rect())
}
