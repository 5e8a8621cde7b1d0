/// Events emitted during a simulation tick.
/// The embedding layer consumes these for sound, effects, and scoring.
use crate::sim::level::ItemKind;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum TickEvent {
    /// A new stage's tiles and actors became current (edge, door, or
    /// initial load).
    StageTransition { level: u8, stage: u8 },
    /// A door accepted the open press and started a transition.
    DoorOpened { target_level: u8, target_stage: u8 },
    EnemySpawned { slot: usize, x: u8, y: u8 },
    /// An enemy left the world, either by finishing a death animation
    /// or by drifting too far from the player.
    EnemyDespawned { slot: usize },
    /// An enemy touched the player (the enemy starts its red spark).
    PlayerHit { slot: usize },
    /// The fall-out clamp fired and put the player back at the top.
    PlayerRespawned,
    ItemCollected { kind: ItemKind },
}
