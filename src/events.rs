use bevy_ecs::prelude::*;

/// Things that happened in the game, published for the renderer and audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    TargetSpawned(Entity),
    TargetHit { target: Entity, points: u32 },
    TargetMissed(Entity),
    TargetRemoved(Entity),
    LevelUp(u32),
    Paused,
    Resumed,
    GameOver { score: u32, new_record: bool },
    Menu,
}

// Queue of events since the last drain
#[derive(Resource, Debug, Default)]
pub struct GameEvents {
    queue: Vec<GameEvent>,
}

impl GameEvents {
    pub fn push(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }

    #[must_use]
    pub fn pending(&self) -> &[GameEvent] {
        &self.queue
    }
}
