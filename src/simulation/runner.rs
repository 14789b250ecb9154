//! Headless simulation runner

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::ConfigError;
use crate::game::PenaltyMatch;
use crate::plugin::{ActiveMatch, PendingInputs, apply_pending_inputs, log_match_events};
use crate::settings::GameMode;
use crate::tuning::{PhysicsTweaks, load_physics_tweaks};

use super::app_builder::HeadlessAppBuilder;
use super::bots::{BotProfile, KeeperBot, ShooterBot};
use super::config::{SWEEP_DIFFICULTIES, SimConfig, SimMode};
use super::metrics::{EndReason, MatchResult, SimMetrics, SimSummary};
use super::parallel::{MatchConfig, init_parallel, match_configs, run_matches_parallel};

/// Mixed into the match seed so bot and match rolls are independent
const BOT_SEED_SALT: u64 = 0x5EED_B075;

/// Resource to control simulation
#[derive(Resource)]
pub struct SimControl {
    pub config: SimConfig,
    pub should_exit: bool,
    pub current_seed: u64,
    pub end_reason: Option<EndReason>,
    step_limit: u64,
}

impl SimControl {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let step_limit = config.step_limit();
        Self {
            config,
            should_exit: false,
            current_seed: seed,
            end_reason: None,
            step_limit,
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.end_reason = Some(reason);
        self.should_exit = true;
    }
}

/// The bots playing the human side
#[derive(Resource)]
pub struct SimBots {
    pub profile: BotProfile,
    pub shooter: ShooterBot,
    pub keeper: KeeperBot,
    rng: StdRng,
}

impl SimBots {
    pub fn new(profile: BotProfile, seed: u64) -> Self {
        Self {
            profile,
            shooter: ShooterBot::default(),
            keeper: KeeperBot::default(),
            rng: StdRng::seed_from_u64(seed ^ BOT_SEED_SALT),
        }
    }

    /// Bots seeded from the match they play, so the match seed alone
    /// replays the whole run
    pub fn for_match(profile: BotProfile, game: &PenaltyMatch) -> Self {
        Self::new(profile, game.seed())
    }
}

/// Everything a run writes out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub config: SimConfig,
    pub summary: SimSummary,
    pub matches: Vec<MatchResult>,
}

/// Run a single match and return the result
pub fn run_match(config: &SimConfig, seed: u64, tweaks: &PhysicsTweaks) -> MatchResult {
    let mut builder =
        HeadlessAppBuilder::new(config.match_settings(seed)).with_tweaks(tweaks.clone());
    if config.parallel > 0 {
        builder = builder.with_minimal_threads();
    }
    if config.log_events {
        builder = builder.with_event_log();
    }
    let mut app = builder.build();

    app.insert_resource(SimControl::new(config.clone(), seed))
        .insert_resource(SimMetrics::new())
        .insert_resource(SimBots::new(config.bot.clone(), seed))
        .add_systems(FixedUpdate, drive_bots.before(apply_pending_inputs))
        .add_systems(
            Update,
            (collect_metrics, sim_check_end_conditions)
                .chain()
                .before(log_match_events),
        );

    // Startup update plus one update per fixed step, with slack
    let max_updates = config.step_limit() + 2;
    let mut updates = 0;
    while !app.world().resource::<SimControl>().should_exit && updates < max_updates {
        app.update();
        updates += 1;
    }

    let world = app.world();
    let game = &world.resource::<ActiveMatch>().0;
    let metrics = world.resource::<SimMetrics>();
    let end_reason = world
        .resource::<SimControl>()
        .end_reason
        .unwrap_or(EndReason::TimeLimit);

    MatchResult {
        seed,
        mode: config.game_mode,
        difficulty: game.settings().difficulty,
        score: game.state().score,
        shots: metrics.shots,
        goals: metrics.goals,
        saves: metrics.saves,
        misses: metrics.misses,
        keeper_dives: metrics.keeper_dives,
        levels_completed: metrics.levels_completed,
        final_level: game.state().current_level,
        end_reason,
        duration: game.elapsed_secs() as f32,
        steps: game.step_count(),
        avg_power: if metrics.shots > 0 {
            metrics.power_sum / metrics.shots as f32
        } else {
            0.0
        },
    }
}

/// Bots write their inputs ahead of the match step
pub fn drive_bots(
    time: Res<Time>,
    active: Res<ActiveMatch>,
    mut bots: ResMut<SimBots>,
    mut pending: ResMut<PendingInputs>,
) {
    let dt = time.delta_secs();
    let game = &active.0;
    let SimBots {
        profile,
        shooter,
        keeper,
        rng,
    } = &mut *bots;

    match game.mode() {
        GameMode::Shoot => {
            if let Some(shot) = shooter.step(profile, game.phase(), dt, rng) {
                pending.queue_shot(shot);
            }
        }
        GameMode::Save => {
            if let Some(dive) = keeper.step(profile, game.phase(), game.ball(), dt, rng) {
                pending.queue_dive(dive);
            }
        }
    }
}

/// Count this frame's events before the logger drains them
fn collect_metrics(active: Res<ActiveMatch>, mut metrics: ResMut<SimMetrics>) {
    for e in active.0.events().peek() {
        metrics.record(&e.event);
    }
}

fn sim_check_end_conditions(active: Res<ActiveMatch>, mut control: ResMut<SimControl>) {
    if control.should_exit {
        return;
    }
    let game = &active.0;
    if let Some(reason) = game.state().game_over {
        control.finish(reason.into());
    } else if game.state().current_level > control.config.max_level {
        control.finish(EndReason::LevelLimit);
    } else if game.step_count() >= control.step_limit {
        control.finish(EndReason::TimeLimit);
    }
}

fn run_batch(config: &SimConfig, jobs: &[MatchConfig], tweaks: &PhysicsTweaks) -> Vec<MatchResult> {
    if config.parallel > 0 {
        if !config.quiet {
            println!("Running {} matches on {} threads...", jobs.len(), config.parallel);
        }
        init_parallel(config.parallel);
        return run_matches_parallel(jobs, tweaks);
    }

    let mut results = Vec::with_capacity(jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        if !config.quiet {
            print!("\rMatch {}/{}...", i + 1, jobs.len());
            std::io::stdout().flush().ok();
        }
        results.push(run_match(&job.config, job.seed, tweaks));
    }
    if !config.quiet {
        println!("\rCompleted {} matches.", jobs.len());
    }
    results
}

/// Run the configured simulation and write the report
pub fn run_simulation(config: SimConfig) -> Result<SimReport, ConfigError> {
    let tweaks = load_physics_tweaks();
    let base_seed = config.seed.unwrap_or_else(rand::random);

    let results = match &config.mode {
        SimMode::Single => {
            if !config.quiet {
                println!(
                    "Running single match: {} mode, difficulty {} (seed: {})",
                    config.game_mode.name(),
                    config.difficulty,
                    base_seed
                );
            }
            vec![run_match(&config, base_seed, &tweaks)]
        }
        SimMode::MultiMatch { count } => {
            if !config.quiet {
                println!(
                    "Running {} matches: {} mode, difficulty {} (base seed: {})",
                    count,
                    config.game_mode.name(),
                    config.difficulty,
                    base_seed
                );
            }
            run_batch(&config, &match_configs(&config, *count, base_seed), &tweaks)
        }
        SimMode::DifficultySweep {
            matches_per_difficulty,
        } => {
            if !config.quiet {
                println!(
                    "Running difficulty sweep: {} matches at each of {:?}",
                    matches_per_difficulty, SWEEP_DIFFICULTIES
                );
            }
            let mut jobs = Vec::new();
            for difficulty in SWEEP_DIFFICULTIES {
                let sweep_config = SimConfig {
                    difficulty,
                    ..config.clone()
                };
                let offset = base_seed.wrapping_add(jobs.len() as u64);
                jobs.extend(match_configs(&sweep_config, *matches_per_difficulty, offset));
            }
            run_batch(&config, &jobs, &tweaks)
        }
    };

    let report = SimReport {
        summary: SimSummary::from_results(&results),
        matches: results,
        config,
    };
    if !report.config.quiet {
        println!("\n{}", report.summary.format_table());
    }
    output_report(&report)?;
    Ok(report)
}

fn output_report(report: &SimReport) -> Result<(), ConfigError> {
    match &report.config.output_file {
        Some(output_file) => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|e| ConfigError::json(output_file, e))?;
            std::fs::write(output_file, json).map_err(|source| ConfigError::Write {
                path: output_file.into(),
                source,
            })?;
            if !report.config.quiet {
                println!("Results written to {}", output_file);
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&report.summary)
                .map_err(|e| ConfigError::json("stdout", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOverReason;
    use crate::settings::MatchSettings;

    #[test]
    fn test_shoot_match_runs_to_an_end() {
        let config = SimConfig {
            difficulty: 60,
            duration_limit: 30.0,
            ..Default::default()
        };
        let result = run_match(&config, 11, &PhysicsTweaks::default());
        assert_eq!(result.seed, 11);
        assert!(result.shots >= 1);
        assert!(result.goals + result.saves + result.misses <= result.shots);
        assert!(result.duration <= 30.1, "duration={}", result.duration);
        assert_eq!(result.score, result.goals);
        if result.end_reason == EndReason::TimeLimit {
            assert!(result.steps >= 1800);
        }
    }

    #[test]
    fn test_unseeded_match_replays_from_its_seed() {
        let play = |settings: MatchSettings| {
            let mut app = HeadlessAppBuilder::new(settings).build();
            let bots = SimBots::for_match(
                BotProfile::default(),
                &app.world().resource::<ActiveMatch>().0,
            );
            app.insert_resource(bots)
                .add_systems(FixedUpdate, drive_bots.before(apply_pending_inputs));
            for _ in 0..900 {
                app.update();
            }
            let game = &app.world().resource::<ActiveMatch>().0;
            (game.seed(), game.snapshot())
        };

        let (seed, first) = play(MatchSettings::new(GameMode::Shoot, 40));
        assert!(first.score + first.shots_taken >= 1, "bot never shot");
        let (_, replay) = play(MatchSettings::new(GameMode::Shoot, 40).with_seed(seed));
        assert_eq!(first, replay);
    }

    #[test]
    fn test_save_match_bot_dives() {
        let config = SimConfig {
            game_mode: GameMode::Save,
            difficulty: 30,
            duration_limit: 12.0,
            bot: BotProfile {
                keeper_reaction_ms: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = run_match(&config, 5, &PhysicsTweaks::default());
        assert_eq!(result.mode, GameMode::Save);
        // First automatic shot fires three seconds in
        assert!(result.shots >= 1);
        assert!(result.keeper_dives >= 1);
    }

    #[test]
    fn test_end_conditions() {
        let mut control = SimControl::new(
            SimConfig {
                max_level: 1,
                ..Default::default()
            },
            0,
        );
        control.finish(GameOverReason::LevelFailed.into());
        assert!(control.should_exit);
        assert_eq!(control.end_reason, Some(EndReason::LevelFailed));
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = SimConfig {
            duration_limit: 10.0,
            ..Default::default()
        };
        let tweaks = PhysicsTweaks::default();
        assert_eq!(run_match(&config, 3, &tweaks), run_match(&config, 3, &tweaks));
    }
}
