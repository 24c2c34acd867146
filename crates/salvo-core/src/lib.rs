//! Core types and definitions for SALVO.
//!
//! This crate defines the vocabulary shared across all other crates:
//! constants, enums, player input, render snapshots, and game events.
//! It has no dependency on any runtime or threading framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
