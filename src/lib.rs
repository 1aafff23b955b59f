//! Fruit Merge - a falling fruit merge game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tokens, gravity, merges, game flow)
//! - `highscores`: In-memory best score and run board
//! - `settings`: Headless runner settings
//! - `autopilot`: Scripted player used by the runner and long-run tests

pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use autopilot::Autopilot;
pub use error::SimError;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play-field dimensions (pixels, y grows downward)
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Floor boundary: a token settles once its bottom edge reaches this line
    pub const FLOOR_Y: f32 = HEIGHT;
    /// Top boundary margin used by the game-over check
    pub const TOP_MARGIN: f32 = 0.0;

    /// Gravity acceleration. Velocity is kept in pixels per frame, so this is
    /// pixels per frame per second.
    pub const GRAVITY: f32 = 5.0;
    /// Horizontal move speed (pixels/s)
    pub const MOVE_SPEED: f32 = 300.0;

    /// Target frame rate of the presentation loop
    pub const TARGET_FPS: u32 = 60;
    /// Frame delta at the target frame rate
    pub const FRAME_DT: f32 = 1.0 / TARGET_FPS as f32;

    /// Spawn point height; spawns are horizontally centred
    pub const SPAWN_Y: f32 = 50.0;
    /// Spawned tokens pick a level in `0..=SPAWN_MAX_LEVEL`
    pub const SPAWN_MAX_LEVEL: u8 = 1;

    /// Token radius per level (strictly increasing)
    pub const TOKEN_RADII: [f32; 8] = [30.0, 36.0, 43.0, 51.0, 60.0, 70.0, 81.0, 93.0];
    /// Number of distinct token levels
    pub const MAX_LEVEL: usize = TOKEN_RADII.len();
}
