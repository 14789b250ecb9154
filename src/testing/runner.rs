//! Test execution engine
//!
//! Frame N is the match after N physics steps. Inputs listed for frame N are
//! applied right after step N, and state checks for frame N see those inputs.

use std::collections::BTreeMap;

use crate::game::PenaltyMatch;

use super::assertions::{AssertionError, CapturedEvent, check_sequence, check_state};
use super::parser::{FrameInput, TestDefinition};

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Apply one frame input. Returns whether the match took its shot and dive.
fn apply_input(game: &mut PenaltyMatch, input: &FrameInput) -> Result<bool, String> {
    if input.new_game {
        game.new_game();
    }
    if input.restart {
        game.restart_level();
    }
    let mut accepted = true;
    if let Some(shot) = input.shot_input() {
        accepted &= game.shoot(shot);
    }
    if let Some(dive) = input.dive_input()? {
        accepted &= game.dive(dive);
    }
    Ok(accepted)
}

fn input_verdict(refused: bool) -> &'static str {
    if refused { "refused" } else { "accepted" }
}

/// Run a single test and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let mut game = PenaltyMatch::new(test.setup.match_settings());
    let dt = game.step_secs();
    let last_frame = test.last_frame();

    let mut inputs: BTreeMap<u64, Vec<&FrameInput>> = BTreeMap::new();
    for input in &test.input {
        inputs.entry(input.frame).or_default().push(input);
    }
    let mut state_checks = test.expect.state.clone();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;

    let mut captured = Vec::new();
    game.start();

    for frame in 0..=last_frame {
        if frame > 0 {
            game.tick(dt);
        }
        for input in inputs.get(&frame).into_iter().flatten() {
            match apply_input(&mut game, input) {
                Err(message) => return TestResult::Error { message },
                Ok(accepted) if accepted == input.refused => {
                    let actual = input_verdict(!accepted);
                    return TestResult::Fail {
                        error: AssertionError {
                            message: format!("Frame {}: input was {}", frame, actual),
                            expected: input_verdict(input.refused).to_string(),
                            actual: format!("{} in phase {}", actual, game.phase().name()),
                        },
                    };
                }
                Ok(_) => {}
            }
        }
        captured.extend(game.drain_events().iter().map(CapturedEvent::from_bus_event));

        while next_check < state_checks.len() && state_checks[next_check].after_frame == frame {
            if let Err(error) = check_state(&state_checks[next_check], &game.snapshot()) {
                return TestResult::Fail {
                    error: AssertionError {
                        message: format!("After frame {}: {}", frame, error.message),
                        ..error
                    },
                };
            }
            next_check += 1;
        }
    }

    match check_sequence(&test.expect.sequence, &captured) {
        Ok(()) => TestResult::Pass { frames: last_frame },
        Err(error) => TestResult::Fail { error },
    }
}
