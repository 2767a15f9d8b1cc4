//! Notifications for the UI collaborator
//!
//! Events are queued while a tick runs and handed to subscribers in one
//! batch at the end of it, so no handler ever runs while the world is
//! half-updated.

use crate::powerup::PowerUpKind;
use glam::Vec3;
use horde_core::Id;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something the UI may want to show
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AgentKilled {
        agent: Id,
        position: Vec3,
        headshot: bool,
        /// Kills on this level, including this one
        kills: u32,
    },
    AgentRemoved {
        agent: Id,
    },
    PlayerDamaged {
        amount: f32,
        remaining: f32,
    },
    PlayerDied,
    AmmoChanged {
        ammo: u32,
        magazine: u32,
    },
    PowerUpCollected {
        kind: PowerUpKind,
    },
    LevelTimeExpired {
        level: u32,
    },
    LevelAdvanced {
        level: u32,
        kills_to_win: u32,
    },
}

/// Subscriber ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Event queue plus its subscribers
#[derive(Default)]
pub struct GameHooks {
    queue: Vec<GameEvent>,
    handlers: Vec<(SubscriberId, Handler)>,
    next_id: u64,
}

impl GameHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next dispatch
    pub fn publish(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    /// Receive every event
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Receive `(agent, position)` for every kill
    pub fn on_agent_killed<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(Id, Vec3) + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::AgentKilled { agent, position, .. } = event {
                handler(*agent, *position);
            }
        })
    }

    /// Receive `(amount, remaining)` whenever the player loses life
    pub fn on_player_damaged<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(f32, f32) + 'static,
    {
        self.subscribe(move |event| {
            if let GameEvent::PlayerDamaged { amount, remaining } = event {
                handler(*amount, *remaining);
            }
        })
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        self.handlers.len() != before
    }

    /// Deliver queued events in publish order, returning them
    pub fn dispatch(&mut self) -> Vec<GameEvent> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            for (_, handler) in &mut self.handlers {
                handler(event);
            }
        }
        events
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Drop queued events without delivering them
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl fmt::Debug for GameHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameHooks")
            .field("queued", &self.queue.len())
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
