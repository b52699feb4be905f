//! Overlap rules between the hero and everything it can touch without
//! colliding. Runs after solid collision has settled this tick's contact
//! flags, and checks pairs in a fixed order: coins, spiders, key, door.

use crate::event::{EventQueue, GameEvent};
use crate::level::World;
use crate::physics::overlaps;
use crate::r#trait::Physical;
use crate::session::RunState;

/// A rule that ends normal play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    HeroDied,
    DoorReached,
}

pub fn resolve_overlaps(
    world: &mut World,
    run: &mut RunState,
    events: &mut EventQueue<GameEvent>,
) -> Option<Outcome> {
    hero_vs_coins(world, run, events);
    let died = hero_vs_spiders(world, events);
    hero_vs_key(world, run, events);
    let door = hero_vs_door(world, run, events);
    died.or(door)
}

fn hero_vs_coins(world: &mut World, run: &mut RunState, events: &mut EventQueue<GameEvent>) {
    let hero = &world.hero;
    for coin in world.coins.iter_mut() {
        if overlaps(hero.body(), coin.body()) && coin.collect() {
            run.coin_count += 1;
            events.send(GameEvent::CoinPickup);
        }
    }
    world.coins.retain(|coin| !coin.is_collected());
}

/// Falling onto a spider stomps it; any other contact kills the hero. Only
/// the hero's vertical velocity decides which.
fn hero_vs_spiders(world: &mut World, events: &mut EventQueue<GameEvent>) -> Option<Outcome> {
    let hero = &mut world.hero;
    for spider in world.spiders.iter_mut() {
        if !overlaps(hero.body(), spider.body()) {
            continue;
        }
        events.send(GameEvent::Stomp);
        if hero.velocity().y > 0.0 {
            hero.bounce();
            spider.die();
            events.send(GameEvent::SpiderKilled);
        } else {
            hero.die();
            events.send(GameEvent::HeroDied);
            return Some(Outcome::HeroDied);
        }
    }
    None
}

fn hero_vs_key(world: &mut World, run: &mut RunState, events: &mut EventQueue<GameEvent>) {
    if overlaps(world.hero.body(), world.key.body()) && world.key.collect() {
        run.has_key = true;
        events.send(GameEvent::KeyPickup);
    }
}

/// The door only reacts to a hero carrying the key and standing on ground.
fn hero_vs_door(
    world: &mut World,
    run: &RunState,
    events: &mut EventQueue<GameEvent>,
) -> Option<Outcome> {
    let hero = &mut world.hero;
    let door = &mut world.door;
    if !(run.has_key && hero.body().touching.down) {
        return None;
    }
    if !overlaps(hero.body(), door.body()) {
        return None;
    }
    door.open();
    hero.freeze();
    events.send(GameEvent::DoorOpened);
    Some(Outcome::DoorReached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::{Coin, Spider};
    use crate::level::LevelData;
    use macroquad::prelude::*;

    const LEVEL: &str = r#"{
        "platforms": [{"image": "ground", "x": 0, "y": 546}],
        "key": {"x": 800, "y": 300},
        "door": {"x": 600, "y": 546},
        "hero": {"x": 100, "y": 525}
    }"#;

    fn world() -> World {
        LevelData::from_json_str(LEVEL)
            .unwrap()
            .instantiate(&GameConfig::default())
            .unwrap()
    }

    fn spider_on_hero(world: &mut World) {
        let at = world.hero.center();
        world.spiders.push(Spider::new(at, vec2(42.0, 32.0), 100.0));
    }

    fn move_hero_to(world: &mut World, center: Vec2) {
        world.hero.body_mut().set_center(center);
    }

    #[test]
    fn coin_pickup_counts_once() {
        let mut world = world();
        let at = world.hero.center();
        world.coins.push(Coin::new(at, vec2(22.0, 22.0)));
        world.coins.push(Coin::new(at + vec2(5.0, 0.0), vec2(22.0, 22.0)));
        world.coins.push(Coin::new(vec2(900.0, 100.0), vec2(22.0, 22.0)));
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();

        resolve_overlaps(&mut world, &mut run, &mut events);
        assert_eq!(run.coin_count, 2);
        assert_eq!(world.coins.len(), 1);

        resolve_overlaps(&mut world, &mut run, &mut events);
        assert_eq!(run.coin_count, 2);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::CoinPickup).count(), 2);
    }

    #[test]
    fn falling_hero_stomps_spider() {
        let mut world = world();
        spider_on_hero(&mut world);
        world.hero.body_mut().velocity.y = 50.0;
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();

        assert_eq!(resolve_overlaps(&mut world, &mut run, &mut events), None);
        assert!(world.hero.is_alive());
        assert_eq!(world.hero.velocity().y, -200.0);
        assert!(!world.spiders[0].is_alive());
        assert!(events.iter().any(|e| *e == GameEvent::Stomp));
    }

    #[test]
    fn rising_hero_dies_on_spider() {
        let mut world = world();
        spider_on_hero(&mut world);
        world.hero.body_mut().velocity.y = -50.0;
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();

        assert_eq!(
            resolve_overlaps(&mut world, &mut run, &mut events),
            Some(Outcome::HeroDied)
        );
        assert!(!world.hero.is_alive());
        assert!(world.spiders[0].is_alive());
    }

    #[test]
    fn horizontal_approach_does_not_matter() {
        let mut world = world();
        spider_on_hero(&mut world);
        world.hero.body_mut().velocity = vec2(200.0, 0.0);
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();
        assert_eq!(
            resolve_overlaps(&mut world, &mut run, &mut events),
            Some(Outcome::HeroDied)
        );
    }

    #[test]
    fn dead_hero_collects_nothing() {
        let mut world = world();
        spider_on_hero(&mut world);
        let at = world.hero.center();
        world.coins.push(Coin::new(at, vec2(22.0, 22.0)));
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();
        world.hero.die();
        resolve_overlaps(&mut world, &mut run, &mut events);
        assert_eq!(run.coin_count, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn key_pickup_sets_flag() {
        let mut world = world();
        move_hero_to(&mut world, vec2(800.0, 300.0));
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();
        resolve_overlaps(&mut world, &mut run, &mut events);
        assert!(run.has_key);
        assert!(world.key.is_collected());
        assert_eq!(events.iter().filter(|e| **e == GameEvent::KeyPickup).count(), 1);
    }

    #[test]
    fn door_needs_key() {
        let mut world = world();
        move_hero_to(&mut world, vec2(600.0, 525.0));
        world.hero.body_mut().touching.down = true;
        let mut run = RunState::new(0);
        let mut events = EventQueue::new();
        assert_eq!(resolve_overlaps(&mut world, &mut run, &mut events), None);
        assert!(!world.door.is_open());
    }

    #[test]
    fn door_needs_ground_contact() {
        let mut world = world();
        move_hero_to(&mut world, vec2(600.0, 525.0));
        world.hero.body_mut().touching.down = false;
        let mut run = RunState::new(0);
        run.has_key = true;
        let mut events = EventQueue::new();
        assert_eq!(resolve_overlaps(&mut world, &mut run, &mut events), None);
        assert!(!world.door.is_open());
    }

    #[test]
    fn door_with_key_on_ground_triggers_once() {
        let mut world = world();
        move_hero_to(&mut world, vec2(600.0, 525.0));
        world.hero.body_mut().touching.down = true;
        let mut run = RunState::new(0);
        run.has_key = true;
        let mut events = EventQueue::new();

        assert_eq!(
            resolve_overlaps(&mut world, &mut run, &mut events),
            Some(Outcome::DoorReached)
        );
        assert!(world.door.is_open());
        assert!(world.hero.is_frozen());
        assert_eq!(resolve_overlaps(&mut world, &mut run, &mut events), None);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::DoorOpened).count(), 1);
    }
}
