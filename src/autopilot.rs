//! Scripted player
//!
//! Reads a [`RenderSnapshot`] and returns the keys a simple player would
//! hold. Used by the headless runner and by long-run tests.

use crate::consts::WIDTH;
use crate::settings::AutopilotStyle;
use crate::sim::{GamePhase, RenderSnapshot, TickInput, TokenView};

/// Number of columns the merge style spreads unmatched tokens across
const LANES: usize = 4;

#[derive(Debug, Clone)]
pub struct Autopilot {
    pub style: AutopilotStyle,
    /// Horizontal distance treated as "on target"
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(AutopilotStyle::default())
    }
}

impl Autopilot {
    pub fn new(style: AutopilotStyle) -> Self {
        Self {
            style,
            dead_zone: 4.0,
        }
    }

    pub fn next_input(&self, snapshot: &RenderSnapshot) -> TickInput {
        match snapshot.phase {
            GamePhase::Menu => TickInput {
                start: true,
                ..Default::default()
            },
            GamePhase::GameOver => TickInput {
                reset: true,
                ..Default::default()
            },
            GamePhase::Play => {
                let Some(active) = snapshot.active.as_ref() else {
                    return TickInput::default();
                };
                match self.target_x(active, &snapshot.settled) {
                    Some(target) => self.steer(active.pos.x, target),
                    None => TickInput::default(),
                }
            }
        }
    }

    /// Where the active token should be dropped
    pub fn target_x(&self, active: &TokenView, settled: &[TokenView]) -> Option<f32> {
        match self.style {
            AutopilotStyle::Drop => None,
            AutopilotStyle::Merge => {
                let matching = settled
                    .iter()
                    .filter(|t| t.level == active.level)
                    .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
                Some(match matching {
                    Some(token) => token.pos.x,
                    None => quietest_lane(settled),
                })
            }
        }
    }

    fn steer(&self, x: f32, target: f32) -> TickInput {
        let delta = target - x;
        TickInput {
            move_left: delta < -self.dead_zone,
            move_right: delta > self.dead_zone,
            ..Default::default()
        }
    }
}

/// Centre of the lane holding the fewest settled tokens (leftmost on ties)
fn quietest_lane(settled: &[TokenView]) -> f32 {
    let lane_width = WIDTH / LANES as f32;
    let mut counts = [0usize; LANES];
    for token in settled {
        let lane = ((token.pos.x / lane_width) as usize).min(LANES - 1);
        counts[lane] += 1;
    }
    let lane = counts
        .iter()
        .enumerate()
        .min_by_key(|(_, count)| **count)
        .map(|(i, _)| i)
        .unwrap_or(0);
    lane_width * (lane as f32 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{GameState, Token, tick};
    use glam::Vec2;

    fn view(x: f32, y: f32, level: u8) -> TokenView {
        TokenView::from(&Token::new(Vec2::new(x, y), level).unwrap())
    }

    fn snapshot(phase: GamePhase, active: Option<TokenView>, settled: Vec<TokenView>) -> RenderSnapshot {
        RenderSnapshot {
            phase,
            score: 0,
            highscore: 0,
            frame: 0,
            active,
            settled,
        }
    }

    #[test]
    fn test_menu_and_game_over_keys() {
        let pilot = Autopilot::default();
        assert!(pilot.next_input(&snapshot(GamePhase::Menu, None, vec![])).start);
        assert!(pilot.next_input(&snapshot(GamePhase::GameOver, None, vec![])).reset);
    }

    #[test]
    fn test_steers_toward_highest_match() {
        let pilot = Autopilot::new(AutopilotStyle::Merge);
        let settled = vec![view(700.0, 560.0, 0), view(100.0, 500.0, 0), view(400.0, 400.0, 1)];
        let snap = snapshot(GamePhase::Play, Some(view(400.0, 50.0, 0)), settled);

        let input = pilot.next_input(&snap);
        assert!(input.move_left);
        assert!(!input.move_right);
    }

    #[test]
    fn test_holds_still_inside_dead_zone() {
        let pilot = Autopilot::new(AutopilotStyle::Merge);
        let snap = snapshot(
            GamePhase::Play,
            Some(view(402.0, 50.0, 1)),
            vec![view(400.0, 560.0, 1)],
        );
        assert_eq!(pilot.next_input(&snap), TickInput::default());
    }

    #[test]
    fn test_unmatched_token_goes_to_quietest_lane() {
        let pilot = Autopilot::new(AutopilotStyle::Merge);
        let settled = vec![view(50.0, 560.0, 2), view(300.0, 560.0, 3)];
        let target = pilot.target_x(&view(400.0, 50.0, 0), &settled);
        assert_eq!(target, Some(500.0));
    }

    #[test]
    fn test_drop_style_never_moves() {
        let pilot = Autopilot::new(AutopilotStyle::Drop);
        let snap = snapshot(
            GamePhase::Play,
            Some(view(400.0, 50.0, 0)),
            vec![view(100.0, 560.0, 0)],
        );
        assert_eq!(pilot.next_input(&snap), TickInput::default());
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        for style in [AutopilotStyle::Drop, AutopilotStyle::Merge] {
            let pilot = Autopilot::new(style);
            let mut state = GameState::new(2024);
            let mut best = 0;
            let mut finished = false;

            for _ in 0..20_000 {
                let snap = state.snapshot();
                if snap.phase == GamePhase::GameOver {
                    finished = true;
                    break;
                }
                tick(&mut state, &pilot.next_input(&snap), FRAME_DT).unwrap();

                assert!(state.highscore() >= best);
                best = state.highscore();
                assert_eq!(state.active.is_some(), state.phase == GamePhase::Play);
                for token in state.settled.iter().chain(state.active.iter()) {
                    assert!(usize::from(token.level()) < MAX_LEVEL);
                    assert!(token.pos.x >= 0.0 && token.pos.x <= WIDTH);
                }
                for token in &state.settled {
                    assert!(token.bottom() <= FLOOR_Y);
                }
            }

            if style == AutopilotStyle::Drop {
                // A single column tops out quickly
                assert!(finished);
            }
        }
    }
}
