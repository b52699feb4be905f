use macroquad::prelude::*;

use crate::event::{EventQueue, GameEvent};
use crate::hero::Hero;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Jump,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Left, Control::Right, Control::Jump];

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Jump => 2,
        }
    }

    pub fn key(self) -> KeyCode {
        match self {
            Self::Left => KeyCode::Left,
            Self::Right => KeyCode::Right,
            Self::Jump => KeyCode::Up,
        }
    }
}

pub trait InputSource {
    fn is_down(&self, control: Control) -> bool;

    /// True while `control` is down and was pressed less than `threshold_ms` ago.
    fn held_for(&self, control: Control, threshold_ms: u32) -> bool;
}

/// Input state for one frame: for each control, how long it has been held,
/// or `None` when it is up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    held: [Option<f32>; 3],
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same snapshot with `control` freshly pressed.
    pub fn press(mut self, control: Control) -> Self {
        self.held[control.index()] = Some(0.0);
        self
    }

    pub fn release(&mut self, control: Control) {
        self.held[control.index()] = None;
    }

    pub fn set_held(&mut self, control: Control, seconds: Option<f32>) {
        self.held[control.index()] = seconds;
    }

    /// Ages every held control by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for held in self.held.iter_mut().flatten() {
            *held += dt;
        }
    }
}

impl InputSource for InputSnapshot {
    fn is_down(&self, control: Control) -> bool {
        self.held[control.index()].is_some()
    }

    fn held_for(&self, control: Control, threshold_ms: u32) -> bool {
        self.held[control.index()]
            .map(|seconds| seconds * 1000.0 < threshold_ms as f32)
            .unwrap_or(false)
    }
}

/// Reads the keyboard once per frame into an [`InputSnapshot`].
#[derive(Default)]
pub struct MacroquadInput {
    pressed_at: [Option<f64>; 3],
}

impl MacroquadInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self) -> InputSnapshot {
        let now = get_time();
        let mut snapshot = InputSnapshot::new();
        for control in Control::ALL {
            let slot = &mut self.pressed_at[control.index()];
            if is_key_down(control.key()) {
                let start = *slot.get_or_insert(now);
                snapshot.set_held(control, Some((now - start) as f32));
            } else {
                *slot = None;
            }
        }
        snapshot
    }
}

/// Turns controls into hero commands.
pub struct ControlMapper {
    jump_hold_ms: u32,
}

impl ControlMapper {
    pub fn new(jump_hold_ms: u32) -> Self {
        Self { jump_hold_ms }
    }

    pub fn apply(
        &self,
        hero: &mut Hero,
        input: &impl InputSource,
        events: &mut EventQueue<GameEvent>,
    ) {
        if input.is_down(Control::Left) {
            hero.move_dir(-1);
        } else if input.is_down(Control::Right) {
            hero.move_dir(1);
        } else {
            hero.move_dir(0);
        }

        if input.held_for(Control::Jump, self.jump_hold_ms) {
            if hero.jump() {
                events.send(GameEvent::Jump);
            }
        } else {
            hero.stop_jump_boost();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeroConfig;
    use crate::r#trait::Physical;

    fn grounded_hero() -> Hero {
        let mut hero = Hero::new(vec2(100.0, 100.0), vec2(36.0, 42.0), &HeroConfig::default());
        hero.body_mut().touching.down = true;
        hero
    }

    #[test]
    fn held_for_respects_window() {
        let mut input = InputSnapshot::new().press(Control::Jump);
        assert!(input.held_for(Control::Jump, 200));
        input.advance(0.15);
        assert!(input.held_for(Control::Jump, 200));
        input.advance(0.1);
        assert!(!input.held_for(Control::Jump, 200));
        assert!(input.is_down(Control::Jump));
        input.release(Control::Jump);
        assert!(!input.is_down(Control::Jump));
    }

    #[test]
    fn left_wins_over_right() {
        let mapper = ControlMapper::new(200);
        let mut hero = grounded_hero();
        let mut events = EventQueue::new();
        let input = InputSnapshot::new().press(Control::Left).press(Control::Right);
        mapper.apply(&mut hero, &input, &mut events);
        assert_eq!(hero.velocity().x, -200.0);
    }

    #[test]
    fn no_direction_stops_hero() {
        let mapper = ControlMapper::new(200);
        let mut hero = grounded_hero();
        hero.move_dir(1);
        let mut events = EventQueue::new();
        mapper.apply(&mut hero, &InputSnapshot::new(), &mut events);
        assert_eq!(hero.velocity().x, 0.0);
    }

    #[test]
    fn jump_event_fires_once_per_jump() {
        let mapper = ControlMapper::new(200);
        let mut hero = grounded_hero();
        let mut events = EventQueue::new();
        let mut input = InputSnapshot::new().press(Control::Jump);

        mapper.apply(&mut hero, &input, &mut events);
        hero.body_mut().touching.down = false;
        for _ in 0..5 {
            input.advance(1.0 / 60.0);
            mapper.apply(&mut hero, &input, &mut events);
            assert_eq!(hero.velocity().y, -400.0);
        }
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Jump).count(), 1);
    }

    #[test]
    fn boost_ends_when_hold_window_expires() {
        let mapper = ControlMapper::new(200);
        let mut hero = grounded_hero();
        let mut events = EventQueue::new();
        let mut input = InputSnapshot::new().press(Control::Jump);
        mapper.apply(&mut hero, &input, &mut events);
        assert!(hero.is_boosting());

        hero.body_mut().touching.down = false;
        input.advance(0.25);
        mapper.apply(&mut hero, &input, &mut events);
        assert!(!hero.is_boosting());
    }
}
