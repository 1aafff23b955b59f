//! Collision detection and merge rules
//!
//! Tokens are plain circles. The active token is tested against the settled
//! list in insertion order and only the first overlap counts, so the outcome
//! of a frame is reproducible from the settled order alone.

use super::state::Token;
use crate::consts::MAX_LEVEL;
use crate::error::SimError;

/// What the active token does to the first settled token it touches
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Equal levels: the merged token replaces the active token
    Merge(Token),
    /// Equal levels already at the top tier: both are discarded
    MaxLevelMerge,
    /// Different levels: the active token settles where it is
    Stack,
}

/// Index of the first settled token the active token overlaps
pub fn first_contact(active: &Token, settled: &[Token]) -> Option<usize> {
    settled.iter().position(|token| active.collides(token))
}

/// Merge two tokens into the next tier at their midpoint.
///
/// Returns `Ok(None)` when the next tier would be past the last level.
pub fn merge_tokens(a: &Token, b: &Token) -> Result<Option<Token>, SimError> {
    let next = a.level().min(b.level()) + 1;
    if usize::from(next) >= MAX_LEVEL {
        return Ok(None);
    }
    let mid = (a.pos + b.pos) / 2.0;
    Token::new(mid, next).map(Some)
}

/// Decide the outcome of `active` touching `other`
pub fn classify_contact(active: &Token, other: &Token) -> Result<Contact, SimError> {
    if active.level() != other.level() {
        return Ok(Contact::Stack);
    }
    Ok(match merge_tokens(active, other)? {
        Some(merged) => Contact::Merge(merged),
        None => Contact::MaxLevelMerge,
    })
}
