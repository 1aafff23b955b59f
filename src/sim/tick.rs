//! Frame step
//!
//! One call to [`tick`] is one frame: phase logic, the play-phase physics
//! step, terminal checks and highscore bookkeeping.

use super::collision::{Contact, classify_contact, first_contact};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::error::SimError;

/// Raw input for a single frame.
///
/// Inputs are level-triggered: a held key acts on every frame it is seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Start a run from the menu
    pub start: bool,
    /// Return to the menu from any phase
    pub reset: bool,
    pub quit: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    state.events.clear();

    if input.quit && state.running {
        log::info!("Quit requested at frame {}", state.frame);
        state.running = false;
        state.events.push(GameEvent::Quit);
    }

    match state.phase {
        GamePhase::Menu => {
            state.score = 0;
            if input.start {
                start_run(state)?;
            }
        }
        GamePhase::Play => step_play(state, input, dt)?,
        GamePhase::GameOver => observe_highscore(state),
    }

    if input.reset {
        enter_menu(state);
    }

    observe_highscore(state);
    state.frame += 1;
    log::trace!(
        "frame {} phase {:?} score {} settled {}",
        state.frame,
        state.phase,
        state.score,
        state.settled.len()
    );
    Ok(())
}

/// Menu -> Play: clear the field and spawn the first token
fn start_run(state: &mut GameState) -> Result<(), SimError> {
    state.settled.clear();
    state.score = 0;
    state.peak_level = 0;
    state.run_start_frame = state.frame;
    let first = state.spawn_token()?;
    state.active = Some(first);
    state.phase = GamePhase::Play;
    state.events.push(GameEvent::Started);
    log::info!("Run started at frame {} (seed {})", state.frame, state.seed);
    Ok(())
}

/// Any phase -> Menu, recording the finished run
fn enter_menu(state: &mut GameState) {
    observe_highscore(state);
    if state.phase != GamePhase::Menu {
        let frames = state.frame.saturating_sub(state.run_start_frame);
        if let Some(rank) = state
            .highscores
            .add_run(state.score, state.peak_level, frames)
        {
            log::info!("Run scored {} (rank {})", state.score, rank);
        }
        state.events.push(GameEvent::Reset);
        log::info!("Back to menu from {:?}", state.phase);
    }
    state.score = 0;
    state.active = None;
    state.phase = GamePhase::Menu;
}

fn observe_highscore(state: &mut GameState) {
    if state.highscores.observe(state.score) {
        log::info!("New highscore: {}", state.score);
        state.events.push(GameEvent::NewHighScore { score: state.score });
    }
}

/// Play-phase physics: move, fall, land or collide, then check the top
pub fn step_play(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    let Some(mut active) = state.active.take() else {
        return Err(SimError::MissingActiveToken { phase: state.phase });
    };

    let mut dx = 0.0;
    if input.move_left {
        dx -= MOVE_SPEED * dt;
    }
    if input.move_right {
        dx += MOVE_SPEED * dt;
    }
    active.pos.x += dx;
    active.clamp_to_field();

    active.update(dt);

    if active.bottom() >= FLOOR_Y {
        // Landing and merging never happen in the same frame
        active.pos.y = FLOOR_Y - active.radius();
        active.vel_y = 0.0;
        log::debug!("{} landed at x={:.1}", active.kind().as_str(), active.pos.x);
        state.events.push(GameEvent::Landed {
            level: active.level(),
            x: active.pos.x,
        });
        state.settled.push(active);
        let next = state.spawn_token()?;
        state.active = Some(next);
    } else {
        state.active = Some(active);
        resolve_collisions(state)?;
    }

    check_game_over(state);
    Ok(())
}

/// Resolve the active token against the first settled token it overlaps.
///
/// Returns the contact that was applied, or `None` when nothing overlaps
/// (in which case the state is left untouched).
pub fn resolve_collisions(state: &mut GameState) -> Result<Option<Contact>, SimError> {
    let Some(active) = state.active else {
        return Err(SimError::MissingActiveToken { phase: state.phase });
    };
    let Some(index) = first_contact(&active, &state.settled) else {
        return Ok(None);
    };

    let other = state.settled[index];
    let contact = classify_contact(&active, &other)?;
    match contact {
        Contact::Merge(mut merged) => {
            merged.clamp_to_field();
            state.score += 1;
            state.settled.remove(index);
            state.peak_level = state.peak_level.max(merged.level());
            log::debug!(
                "merged two {} into {}",
                other.kind().as_str(),
                merged.kind().as_str()
            );
            state.events.push(GameEvent::Merged {
                level: merged.level(),
                pos: merged.pos,
            });
            state.active = Some(merged);
        }
        Contact::MaxLevelMerge => {
            state.score += 1;
            state.settled.remove(index);
            log::debug!("two {} met at the top tier", other.kind().as_str());
            state.events.push(GameEvent::MaxLevelMerge);
            let next = state.spawn_token()?;
            state.active = Some(next);
        }
        Contact::Stack => {
            log::debug!(
                "{} stacked on {}",
                active.kind().as_str(),
                other.kind().as_str()
            );
            state.events.push(GameEvent::Stacked {
                level: active.level(),
                on_level: other.level(),
            });
            state.settled.push(active);
            let next = state.spawn_token()?;
            state.active = Some(next);
        }
    }
    Ok(Some(contact))
}

/// Play -> GameOver once any settled token reaches the top band
fn check_game_over(state: &mut GameState) {
    let topped_out = state
        .settled
        .iter()
        .any(|token| token.pos.y <= TOP_MARGIN + token.height());
    if topped_out {
        state.phase = GamePhase::GameOver;
        state.active = None;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
    }
}
