/// Simulation layer: the tick loop and the mutable world it drives.
///
/// `world::WorldState` owns everything that changes over time; each
/// call to `step::step` advances it by exactly one tick and reports
/// what happened as `event::TickEvent`s. The remaining modules are the
/// subsystems the tick visits in order.
pub mod actors;
pub mod doors;
pub mod event;
pub mod level;
pub mod step;
pub mod world;
