//! # Connect Four engine
//!
//! Decision engine for a Connect Four opponent: win detection across the four
//! line orientations, legal move generation, disc drops, and move selection by
//! depth-limited minimax with alpha-beta pruning.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, line scanning, game state machine
//! - [`ai`]: Heuristic evaluation, alpha-beta search, agents
//! - [`service`]: Validated request/response operations for a transport layer
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod service;
