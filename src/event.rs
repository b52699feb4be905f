//! Things that happened during a tick that something outside the simulation
//! (audio, music, logging) may want to react to. The core never reads them back.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    CoinPickup,
    Stomp,
    SpiderKilled,
    HeroDied,
    KeyPickup,
    DoorOpened,
    LevelStarted { level: usize },
    LevelEnded { level: usize },
}

/// Events are collected during the frame and drained by whoever owns the queue.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for EventQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}
