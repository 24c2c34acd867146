//! SALVO controller and headless runner.
//!
//! This crate drives a `GameEngine` from a dedicated controller thread and
//! exposes a handle that input producers and renderers share with it.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use salvo_core as core;
pub use salvo_sim as sim;

pub use game_loop::Controller;
pub use state::ControllerHandle;
