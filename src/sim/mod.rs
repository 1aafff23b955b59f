//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (settled tokens in insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Contact, classify_contact, first_contact, merge_tokens};
pub use state::{
    GameEvent, GamePhase, GameState, RenderSnapshot, Token, TokenKind, TokenView,
    radius_for_level,
};
pub use tick::{TickInput, resolve_collisions, step_play, tick};
