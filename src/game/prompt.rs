//! Instruction and score strings for whatever draws the match

use crate::game::state::{GameOverReason, MatchState, Phase};
use crate::settings::GameMode;

const AIM_HINT: &str = "Use arrow keys to aim, SPACE to shoot.";

/// What the UI would show under the scoreboard
pub fn prompt_text(
    mode: GameMode,
    state: &MatchState,
    countdown: Option<u32>,
    level_intro: bool,
) -> String {
    let level = state.current_level;
    match state.phase {
        Phase::Ready => match (mode, countdown) {
            (GameMode::Save, Some(n)) if n > 0 => {
                format!("Get ready to save! Shot coming in {}...", n)
            }
            (GameMode::Save, _) => "Use arrow keys to dive and save!".to_string(),
            (GameMode::Shoot, _) if state.shots_taken == 0 => format!(
                "Level {}: Score {} goals to advance. {}",
                level, state.level_goals_required, AIM_HINT
            ),
            (GameMode::Shoot, _) => format!(
                "Level {}: Need {} more goal(s). {}",
                level,
                state.goals_needed(),
                AIM_HINT
            ),
        },
        Phase::Shooting => "Shot away!".to_string(),
        Phase::Saving => "Use arrow keys to dive and save!".to_string(),
        Phase::Celebrating => "GOAL! Well done!".to_string(),
        Phase::LevelComplete if level_intro => format!(
            "Level {}: Score {} goals to advance",
            level, state.level_goals_required
        ),
        Phase::LevelComplete => format!(
            "Level {} Complete! Advancing to Level {}",
            level,
            level + 1
        ),
        Phase::GameOver => match state.game_over {
            Some(GameOverReason::AllLevelsComplete) => format!(
                "Congratulations! You completed all {} levels!",
                state.max_level
            ),
            _ => format!(
                "Level Failed! You needed {} more goal(s) to advance. Try again!",
                state.goals_needed()
            ),
        },
    }
}

/// "3 Total | Level: 1/3 | Shots: 2/5"
pub fn score_line(state: &MatchState) -> String {
    format!(
        "{} Total | Level: {}/{} | Shots: {}/{}",
        state.score,
        state.level_goals,
        state.level_goals_required,
        state.shots_taken,
        state.max_shots
    )
}

pub fn level_line(state: &MatchState) -> String {
    format!("Level: {}/{}", state.current_level, state.max_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_prompt() {
        let state = MatchState::default();
        assert_eq!(
            prompt_text(GameMode::Save, &state, Some(2), false),
            "Get ready to save! Shot coming in 2..."
        );
    }

    #[test]
    fn test_shoot_prompts_track_progress() {
        let mut state = MatchState::default();
        assert!(prompt_text(GameMode::Shoot, &state, None, false).starts_with("Level 1: Score 3 goals"));
        state.shots_taken = 2;
        state.level_goals = 1;
        assert!(prompt_text(GameMode::Shoot, &state, None, false).starts_with("Level 1: Need 2 more"));
        assert_eq!(score_line(&state), "0 Total | Level: 1/3 | Shots: 2/5");
        assert_eq!(level_line(&state), "Level: 1/100");
    }

    #[test]
    fn test_game_over_prompts() {
        let mut state = MatchState {
            phase: Phase::GameOver,
            game_over: Some(GameOverReason::LevelFailed),
            level_goals: 1,
            ..Default::default()
        };
        assert_eq!(
            prompt_text(GameMode::Shoot, &state, None, false),
            "Level Failed! You needed 2 more goal(s) to advance. Try again!"
        );
        state.game_over = Some(GameOverReason::AllLevelsComplete);
        assert_eq!(
            prompt_text(GameMode::Shoot, &state, None, false),
            "Congratulations! You completed all 100 levels!"
        );
    }
}
