//! Assertion checking for test expectations

use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::BusEvent;
use crate::game::{MatchSnapshot, Phase};

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event_type: String,
}

impl CapturedEvent {
    pub fn from_bus_event(event: &BusEvent) -> Self {
        Self {
            frame: event.step,
            event_type: event.event.name().to_string(),
        }
    }
}

/// Check if captured events match expected sequence
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        // Find matching event starting from current position
        let found = captured[captured_idx..]
            .iter()
            .enumerate()
            .find(|(_, cap)| cap.event_type == exp.event);

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.frame_min
                    && cap.frame < min
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                        expected: format!("frame >= {}", min),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                if let Some(max) = exp.frame_max
                    && cap.frame > max
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                        expected: format!("frame <= {}", max),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                captured_idx += offset + 1;
            }
            None => {
                return Err(AssertionError {
                    message: format!("Event #{} '{}' not found", i + 1, exp.event),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..]
                            .iter()
                            .map(|e| &e.event_type)
                            .collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "==", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

fn failed(check: &str, expected: impl ToString, actual: impl ToString) -> AssertionError {
    AssertionError {
        message: format!("Check failed: {}", check),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

/// Compare a named value as text; only equality operators make sense
fn check_name(check: &str, actual: &str, operator: &str, expected: &str) -> Result<(), AssertionError> {
    let expected = expected.trim_matches('"');
    let equal = actual.eq_ignore_ascii_case(expected);
    let pass = match operator {
        "=" | "==" => equal,
        "!=" => !equal,
        _ => {
            return Err(AssertionError {
                message: format!("Operator '{}' not supported: {}", operator, check),
                expected: "=, == or !=".to_string(),
                actual: operator.to_string(),
            });
        }
    };
    if pass {
        Ok(())
    } else {
        Err(failed(check, format!("{} {}", operator, expected), actual))
    }
}

fn check_int(check: &str, actual: i64, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: i64 = expected_str.parse().map_err(|_| AssertionError {
        message: format!("Invalid value in {}", check),
        expected: "integer".to_string(),
        actual: expected_str.to_string(),
    })?;
    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "!=" => actual != value,
        _ => actual == value,
    };
    if pass {
        Ok(())
    } else {
        Err(failed(check, format!("{} {}", operator, value), actual))
    }
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" | "==" => (actual - value).abs() < 0.1,
        "!=" => (actual - value).abs() >= 0.1,
        _ => true,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.2})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}

fn axis(path: &str, position: [f32; 3], field: Option<&str>) -> Result<f32, AssertionError> {
    match field {
        Some("x") => Ok(position[0]),
        Some("y") => Ok(position[1]),
        Some("z") => Ok(position[2]),
        _ => Err(AssertionError {
            message: format!("Unknown field '{}'", path),
            expected: "x, y or z".to_string(),
            actual: path.to_string(),
        }),
    }
}

/// Check state assertions against a match snapshot
pub fn check_state(assertion: &StateAssertion, snapshot: &MatchSnapshot) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'field = value' or 'ball.x > value'".to_string(),
            actual: check.clone(),
        })?;

        let mut parts = path.split('.');
        let root = parts.next().unwrap_or_default();
        let field = parts.next();

        match root {
            "phase" => {
                if Phase::from_name(expected_value.trim_matches('"')).is_none() {
                    return Err(AssertionError {
                        message: format!("Unknown phase in {}", check),
                        expected: "Ready, Shooting, Saving, Celebrating, LevelComplete or GameOver"
                            .to_string(),
                        actual: expected_value.to_string(),
                    });
                }
                check_name(check, snapshot.phase.name(), operator, expected_value)?;
            }
            "outcome" | "last_outcome" => {
                let actual = snapshot.last_outcome.map(|o| o.name()).unwrap_or("none");
                check_name(check, actual, operator, expected_value)?;
            }
            "game_over" => {
                let actual = snapshot
                    .game_over
                    .map(|r| format!("{:?}", r))
                    .unwrap_or_else(|| "none".to_string());
                check_name(check, &actual, operator, expected_value)?;
            }
            "ball_moving" => {
                check_name(check, &snapshot.ball_moving.to_string(), operator, expected_value)?;
            }
            "keeper_diving" => {
                check_name(check, &snapshot.keeper_diving.to_string(), operator, expected_value)?;
            }
            "ball" => {
                let actual = axis(path, snapshot.ball_position, field)?;
                check_float_comparison(path, actual, operator, expected_value)?;
            }
            "keeper" => {
                let actual = axis(path, snapshot.keeper_position, field)?;
                check_float_comparison(path, actual, operator, expected_value)?;
            }
            name => match snapshot.counter(name) {
                Some(actual) => check_int(check, actual, operator, expected_value)?,
                None => {
                    return Err(AssertionError {
                        message: format!("Unknown field '{}'", name),
                        expected: "phase, outcome, game_over, ball.*, keeper.* or a counter"
                            .to_string(),
                        actual: check.clone(),
                    });
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PenaltyMatch;
    use crate::settings::MatchSettings;

    fn expected(event: &str, frame_min: Option<u64>, frame_max: Option<u64>) -> ExpectedEvent {
        ExpectedEvent {
            event: event.to_string(),
            frame_min,
            frame_max,
        }
    }

    fn captured(frame: u64, event: &str) -> CapturedEvent {
        CapturedEvent {
            frame,
            event_type: event.to_string(),
        }
    }

    fn state(checks: &[&str]) -> StateAssertion {
        StateAssertion {
            after_frame: 0,
            checks: checks.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_sequence_in_order_with_windows() {
        let events = vec![
            captured(0, "MatchStart"),
            captured(10, "ShotTaken"),
            captured(28, "KeeperDive"),
            captured(60, "Goal"),
        ];
        let ok = [expected("ShotTaken", Some(10), Some(10)), expected("Goal", Some(40), None)];
        assert!(check_sequence(&ok, &events).is_ok());

        let late = [expected("KeeperDive", None, Some(20))];
        let err = check_sequence(&late, &events).unwrap_err();
        assert!(err.message.contains("too late"));

        // Order matters
        let reversed = [expected("Goal", None, None), expected("ShotTaken", None, None)];
        assert!(check_sequence(&reversed, &events).is_err());
    }

    #[test]
    fn test_parse_check_operators() {
        assert_eq!(parse_check("phase == Ready"), Some(("phase", "==", "Ready")));
        assert_eq!(parse_check("level = 2"), Some(("level", "=", "2")));
        assert_eq!(parse_check("ball.z <= -2.0"), Some(("ball.z", "<=", "-2.0")));
        assert_eq!(parse_check("no operator"), None);
    }

    #[test]
    fn test_state_checks_against_snapshot() {
        let mut game = PenaltyMatch::new(MatchSettings::default().with_seed(1));
        game.start();
        let snapshot = game.snapshot();

        let ok = state(&[
            "phase == Ready",
            "phase != GameOver",
            "level = 1",
            "shots < 5",
            "outcome = none",
            "game_over = none",
            "ball_moving = false",
            "ball.z > 10.0",
        ]);
        assert!(check_state(&ok, &snapshot).is_ok());

        assert!(check_state(&state(&["level = 2"]), &snapshot).is_err());
        assert!(check_state(&state(&["phase == Kicking"]), &snapshot).is_err());
        assert!(check_state(&state(&["goals_conceded = 0"]), &snapshot).is_err());
        assert!(check_state(&state(&["ball.w = 0"]), &snapshot).is_err());
    }
}
