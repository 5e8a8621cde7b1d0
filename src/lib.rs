//! Cometeer simulation core.
//!
//! A deterministic, tick-quantized reimplementation of a late-80s
//! side-scrolling platformer engine. Everything in this crate runs
//! synchronously inside [`sim::step::step`], invoked once per fixed tick by
//! an external driver (~18.2 Hz in the reference system). Rendering, asset
//! file parsing, input devices, and audio are collaborator concerns: the
//! driver feeds a [`domain::entity::FrameInput`] in, reads
//! [`sim::world::WorldState`] out, and reacts to the returned
//! [`sim::event::TickEvent`]s.
//!
//! Positions are in *game units* (2 units = 1 tile). The physics reproduces
//! the original machine code bit-exactly: integer velocity shifts, clamp
//! ordering, and per-tick probe order all match, so the same inputs produce
//! the same positions and state transitions.

pub mod config;
pub mod domain;
pub mod sim;
