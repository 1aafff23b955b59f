//! Game state and core simulation types
//!
//! Everything a frame step mutates lives in [`GameState`]; presentation
//! layers read it back through [`RenderSnapshot`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::highscores::HighScores;

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start input
    #[default]
    Menu,
    /// Active gameplay
    Play,
    /// Stack reached the top
    GameOver,
}

/// Fruit drawn for each level, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Orange,
    Kiwi,
    Feijoa,
    Pomegranate,
    Pineapple,
    Watermelon,
    Passionfruit,
    Dragonfruit,
}

impl TokenKind {
    pub const ALL: [TokenKind; MAX_LEVEL] = [
        TokenKind::Orange,
        TokenKind::Kiwi,
        TokenKind::Feijoa,
        TokenKind::Pomegranate,
        TokenKind::Pineapple,
        TokenKind::Watermelon,
        TokenKind::Passionfruit,
        TokenKind::Dragonfruit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Orange => "orange",
            TokenKind::Kiwi => "kiwi",
            TokenKind::Feijoa => "feijoa",
            TokenKind::Pomegranate => "pomegranate",
            TokenKind::Pineapple => "pineapple",
            TokenKind::Watermelon => "watermelon",
            TokenKind::Passionfruit => "passionfruit",
            TokenKind::Dragonfruit => "dragonfruit",
        }
    }
}

/// Radius for a level, `None` when the level is out of range
#[inline]
pub fn radius_for_level(level: u8) -> Option<f32> {
    TOKEN_RADII.get(usize::from(level)).copied()
}

/// Wire form of a [`Token`], validated on the way in
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawToken {
    pos: Vec2,
    #[serde(default)]
    vel_y: f32,
    level: u8,
}

impl TryFrom<RawToken> for Token {
    type Error = SimError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        let mut token = Token::new(raw.pos, raw.level)?;
        token.vel_y = raw.vel_y;
        Ok(token)
    }
}

/// A fruit token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct Token {
    /// Centre position (y grows downward)
    pub pos: Vec2,
    /// Vertical velocity (pixels per frame)
    pub vel_y: f32,
    level: u8,
}

impl Token {
    /// Create a resting token. Rejects levels outside `[0, MAX_LEVEL)`.
    pub fn new(pos: Vec2, level: u8) -> Result<Self, SimError> {
        if usize::from(level) >= MAX_LEVEL {
            return Err(SimError::InvalidLevel {
                level,
                max: MAX_LEVEL,
            });
        }
        Ok(Self {
            pos,
            vel_y: 0.0,
            level,
        })
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        TokenKind::ALL[usize::from(self.level)]
    }

    /// Collision radius derived from the level
    #[inline]
    pub fn radius(&self) -> f32 {
        TOKEN_RADII[usize::from(self.level)]
    }

    /// Bounding box height
    #[inline]
    pub fn height(&self) -> f32 {
        self.radius() * 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.radius()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.radius()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius()
    }

    /// Keep the bounding box inside the play field horizontally
    pub fn clamp_to_field(&mut self) {
        let r = self.radius();
        self.pos.x = self.pos.x.clamp(r, WIDTH - r);
    }

    /// Integrate gravity over `dt` (semi-implicit Euler)
    pub fn update(&mut self, dt: f32) {
        self.vel_y += GRAVITY * dt;
        self.pos.y += self.vel_y;
    }

    /// Circle overlap test (touching edges do not count)
    pub fn collides(&self, other: &Token) -> bool {
        self.pos.distance(other.pos) < self.radius() + other.radius()
    }
}

/// Things that happened during a tick, cleared when the next tick starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Menu -> Play
    Started,
    /// Active token hit the floor
    Landed { level: u8, x: f32 },
    /// Two equal tokens merged into `level`
    Merged { level: u8, pos: Vec2 },
    /// Two top-level tokens met; both were discarded
    MaxLevelMerge,
    /// Active token rested on a token of a different level
    Stacked { level: u8, on_level: u8 },
    /// Play -> GameOver
    GameOver { score: u64 },
    /// Any phase -> Menu
    Reset,
    /// A new best score was set
    NewHighScore { score: u64 },
    /// Quit was requested
    Quit,
}

/// Token as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenView {
    pub pos: Vec2,
    pub level: u8,
    pub radius: f32,
    pub kind: TokenKind,
}

impl From<&Token> for TokenView {
    fn from(token: &Token) -> Self {
        Self {
            pos: token.pos,
            level: token.level(),
            radius: token.radius(),
            kind: token.kind(),
        }
    }
}

/// Read-only view of a frame, taken between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub highscore: u64,
    pub frame: u64,
    pub active: Option<TokenView>,
    pub settled: Vec<TokenView>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the spawn RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Merges scored in the current run
    pub score: u64,
    /// Best score and finished runs (process lifetime only)
    pub highscores: HighScores,
    /// Token under player control (only during Play)
    pub active: Option<Token>,
    /// Tokens resting in the play field, in insertion order
    pub settled: Vec<Token>,
    /// Frames ticked since creation
    pub frame: u64,
    /// Frame the current run started on
    pub run_start_frame: u64,
    /// Highest level seen in the current run
    pub peak_level: u8,
    /// Cleared once quit is requested
    pub running: bool,
    /// Events from the most recent tick (not gameplay-affecting)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the menu with the given spawn seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            highscores: HighScores::new(),
            active: None,
            settled: Vec::new(),
            frame: 0,
            run_start_frame: 0,
            peak_level: 0,
            running: true,
            events: Vec::new(),
        }
    }

    /// Roll a fresh token at the spawn point
    pub fn spawn_token(&mut self) -> Result<Token, SimError> {
        let level = self.rng.random_range(0..=SPAWN_MAX_LEVEL);
        self.peak_level = self.peak_level.max(level);
        Token::new(Vec2::new(WIDTH / 2.0, SPAWN_Y), level)
    }

    /// Current best score
    pub fn highscore(&self) -> u64 {
        self.highscores.best()
    }

    /// Take the events emitted by the last tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            score: self.score,
            highscore: self.highscore(),
            frame: self.frame,
            active: self.active.as_ref().map(TokenView::from),
            settled: self.settled.iter().map(TokenView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_radius_strictly_increasing() {
        for pair in TOKEN_RADII.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(TokenKind::ALL.len(), MAX_LEVEL);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let err = Token::new(Vec2::ZERO, MAX_LEVEL as u8).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidLevel {
                level: MAX_LEVEL as u8,
                max: MAX_LEVEL
            }
        );
        assert!(Token::new(Vec2::ZERO, u8::MAX).is_err());
        assert!(Token::new(Vec2::ZERO, (MAX_LEVEL - 1) as u8).is_ok());
    }

    #[test]
    fn test_update_integrates_gravity() {
        let mut token = Token::new(Vec2::new(400.0, 50.0), 0).unwrap();
        token.update(0.5);
        assert!((token.vel_y - GRAVITY * 0.5).abs() < 1e-6);
        assert!((token.pos.y - (50.0 + GRAVITY * 0.5)).abs() < 1e-5);
        assert_eq!(token.pos.x, 400.0);

        // Velocity keeps accumulating, no terminal cap
        token.update(0.5);
        assert!((token.vel_y - GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_collides_uses_level_radius() {
        let small = Token::new(Vec2::new(0.0, 0.0), 0).unwrap();
        let touching = Token::new(Vec2::new(60.0, 0.0), 0).unwrap();
        assert!(!small.collides(&touching));

        // Same distance, bigger neighbour overlaps
        let big = Token::new(Vec2::new(60.0, 0.0), 3).unwrap();
        assert!(small.collides(&big));
        assert!(big.collides(&small));
    }

    #[test]
    fn test_spawn_is_deterministic_and_small() {
        let mut a = GameState::new(7);
        let mut b = GameState::new(7);
        for _ in 0..32 {
            let ta = a.spawn_token().unwrap();
            let tb = b.spawn_token().unwrap();
            assert_eq!(ta, tb);
            assert!(ta.level() <= SPAWN_MAX_LEVEL);
            assert_eq!(ta.pos, Vec2::new(WIDTH / 2.0, SPAWN_Y));
            assert_eq!(ta.vel_y, 0.0);
        }
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(1);
        state.settled.push(Token::new(Vec2::new(100.0, 500.0), 2).unwrap());
        state.score = 4;

        let snap = state.snapshot();
        assert_eq!(snap.phase, GamePhase::Menu);
        assert_eq!(snap.score, 4);
        assert!(snap.active.is_none());
        assert_eq!(snap.settled.len(), 1);
        assert_eq!(snap.settled[0].kind, TokenKind::Feijoa);
        assert_eq!(snap.settled[0].radius, TOKEN_RADII[2]);

        let json = serde_json::to_string(&snap).unwrap();
        let back: RenderSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_deserialize_rejects_bad_level() {
        let err = serde_json::from_str::<Token>(r#"{"pos":[0.0,0.0],"vel_y":0.0,"level":200}"#)
            .unwrap_err();
        assert!(err.to_string().contains("token level 200 out of range"));

        let token: Token = serde_json::from_str(r#"{"pos":[10.0,20.0],"vel_y":1.5,"level":3}"#)
            .unwrap();
        assert_eq!(token.level(), 3);
        assert_eq!(token.vel_y, 1.5);
        assert_eq!(token.radius(), TOKEN_RADII[3]);

        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(serde_json::from_str::<Token>(&json).unwrap(), token);
    }

    #[test]
    fn test_clamp_to_field() {
        let mut token = Token::new(Vec2::new(-5.0, 100.0), 1).unwrap();
        token.clamp_to_field();
        assert_eq!(token.left(), 0.0);

        let mut token = Token::new(Vec2::new(WIDTH + 5.0, 100.0), 1).unwrap();
        token.clamp_to_field();
        assert_eq!(token.right(), WIDTH);

        let mut inside = Token::new(Vec2::new(400.0, 100.0), 1).unwrap();
        inside.clamp_to_field();
        assert_eq!(inside.pos.x, 400.0);
    }

    proptest! {
        #[test]
        fn prop_radius_matches_table(level in 0u8..MAX_LEVEL as u8) {
            let token = Token::new(Vec2::ZERO, level).unwrap();
            prop_assert_eq!(Some(token.radius()), radius_for_level(level));
            prop_assert_eq!(token.height(), token.radius() * 2.0);
        }
    }
}
