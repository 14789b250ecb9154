//! The penalty match: turn cycle, level progression and deferred tasks
//!
//! Everything runs on a fixed physics step. `tick` is one step; `update`
//! feeds variable frame times through an accumulator. Deferred work (keeper
//! reaction, celebration, level transition, save-mode countdown) lives on
//! the match scheduler so a reset can drop it wholesale.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ball::Ball;
use crate::constants::*;
use crate::countdown::{CountdownStep, ShotCountdown};
use crate::events::{BusEvent, EventBus, GameEvent};
use crate::game::prompt::prompt_text;
use crate::game::snapshot::MatchSnapshot;
use crate::game::state::{
    GameOverReason, MatchState, Phase, keeper_difficulty, reaction_time_ms, read_shot_direction,
};
use crate::goalkeeper::{DiveDecision, Goalkeeper};
use crate::scoring::{GoalBounds, ShotOutcome, ShotTracker};
use crate::settings::{GameMode, MatchSettings};
use crate::shooting::{DiveInput, ShotInput, auto_shot};
use crate::timers::Scheduler;
use crate::tuning::PhysicsTweaks;

/// Work the match defers to its scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchTask {
    /// AI keeper commits to its read of the player's shot
    KeeperReaction { shot_direction: Vec2 },
    /// One second of the save-mode countdown
    CountdownTick,
    /// Goal celebration over, count the shot
    CelebrationOver,
    /// Move to the next level and reset its counters
    AdvanceLevel,
    /// Level intro over, first shot of the new level
    BeginLevel,
}

pub struct PenaltyMatch {
    settings: MatchSettings,
    tweaks: PhysicsTweaks,
    ball: Ball,
    keeper: Goalkeeper,
    state: MatchState,
    bounds: GoalBounds,
    tracker: ShotTracker,
    countdown: ShotCountdown,
    scheduler: Scheduler<MatchTask>,
    bus: EventBus,
    rng: StdRng,
    seed: u64,
    /// Unsimulated frame time, always below one step after `update`
    accumulator: f32,
    steps: u64,
    elapsed: f64,
    last_outcome: Option<ShotOutcome>,
    /// Between the level advance and the first shot of the new level
    level_intro: bool,
    started: bool,
    disposed: bool,
}

impl PenaltyMatch {
    pub fn new(settings: MatchSettings) -> Self {
        Self::with_tweaks(settings, PhysicsTweaks::default())
    }

    pub fn with_tweaks(settings: MatchSettings, tweaks: PhysicsTweaks) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or_else(rand::random);
        let keeper = Goalkeeper::new(
            keeper_difficulty(settings.difficulty, 1),
            settings.mode.keeper_control(),
        );
        Self {
            tracker: ShotTracker::new(settings.save_policy),
            settings,
            tweaks,
            ball: Ball::default(),
            keeper,
            state: MatchState::default(),
            bounds: GoalBounds::default(),
            countdown: ShotCountdown::default(),
            scheduler: Scheduler::new(),
            bus: EventBus::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            accumulator: 0.0,
            steps: 0,
            elapsed: 0.0,
            last_outcome: None,
            level_intro: false,
            started: false,
            disposed: false,
        }
    }

    // === Accessors ===

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn mode(&self) -> GameMode {
        self.settings.mode
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn keeper(&self) -> &Goalkeeper {
        &self.keeper
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn bounds(&self) -> &GoalBounds {
        &self.bounds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn last_outcome(&self) -> Option<ShotOutcome> {
        self.last_outcome
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown.display_number()
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<BusEvent> {
        self.bus.drain()
    }

    pub fn step_secs(&self) -> f32 {
        self.settings.step_secs()
    }

    // === Operations ===

    /// Kick off the first shot: shoot mode waits for input, save mode starts
    /// the countdown
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        self.bus.emit(GameEvent::MatchStart {
            mode: self.settings.mode,
            difficulty: self.settings.difficulty,
            country: self.settings.country.clone(),
            seed: self.seed,
        });
        info!(
            "Match started: mode={} difficulty={} seed={}",
            self.settings.mode.name(),
            self.settings.difficulty,
            self.seed
        );
        self.started = true;
        self.level_intro = false;
        self.prepare_next_shot();
    }

    /// Player shot (shoot mode, Ready only). Returns whether it was taken.
    pub fn shoot(&mut self, shot: ShotInput) -> bool {
        if self.disposed
            || !self.started
            || self.settings.mode != GameMode::Shoot
            || self.state.phase != Phase::Ready
        {
            return false;
        }
        let shot = ShotInput::new(shot.direction, shot.power);

        self.tracker.begin();
        self.last_outcome = None;
        self.set_phase(Phase::Shooting);
        self.ball.kick(
            shot.direction,
            shot.power,
            self.settings.difficulty,
            &self.tweaks,
            &mut self.rng,
        );
        self.bus.emit(GameEvent::ShotTaken {
            direction: (shot.direction.x, shot.direction.y),
            power: shot.power,
            automatic: false,
        });

        let reaction_ms = reaction_time_ms(self.state.current_level);
        self.scheduler.schedule(
            reaction_ms as f32 / 1000.0,
            MatchTask::KeeperReaction {
                shot_direction: shot.direction,
            },
        );
        true
    }

    /// Player dive (save mode, shot in flight, keeper idle). Returns whether
    /// the keeper dove.
    pub fn dive(&mut self, input: DiveInput) -> bool {
        if self.disposed
            || self.settings.mode != GameMode::Save
            || self.state.phase != Phase::Saving
        {
            return false;
        }
        match self.keeper.dive(input.direction(), &mut self.rng) {
            Some(decision) => {
                self.emit_dive(decision);
                true
            }
            None => false,
        }
    }

    /// Feed a frame's elapsed time; runs whole fixed steps and keeps the
    /// remainder. Returns the number of steps run.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        if self.disposed || !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        let step = self.step_secs();
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= step && steps < MAX_STEPS_PER_FRAME {
            self.tick(step);
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            debug!("Frame too long, dropping {:.3}s of simulation", self.accumulator);
            self.accumulator %= step;
        }
        steps
    }

    /// One physics step of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.disposed {
            return;
        }
        let dt = dt.max(0.0);
        self.steps += 1;
        self.elapsed += dt as f64;
        self.bus.update_time(self.elapsed, self.steps);

        self.scheduler.advance_clock(dt);
        while let Some(task) = self.scheduler.pop_due() {
            self.run_task(task);
        }

        self.ball.advance(dt, &self.tweaks);
        self.keeper.update(dt, &mut self.rng);
        if self.ball.is_moving && !self.keeper.is_diving {
            self.keeper.track_ball(self.ball.position);
        }

        if self.state.phase.is_shot_active() {
            self.resolve_shot();
        }
    }

    /// Fresh attempt at the current level. Total score is kept.
    pub fn restart_level(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.bump_epoch();
        self.state.reset_level_counters();
        self.keeper
            .set_difficulty(keeper_difficulty(self.settings.difficulty, self.state.current_level));
        self.level_intro = false;
        self.bus.emit(GameEvent::RestartLevel {
            level: self.state.current_level,
        });
        info!("Restarting level {}", self.state.current_level);
        self.started = true;
        self.prepare_next_shot();
    }

    /// Back to level 1 with everything zeroed
    pub fn new_game(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.bump_epoch();
        self.state = MatchState::default();
        self.keeper
            .set_difficulty(keeper_difficulty(self.settings.difficulty, 1));
        self.level_intro = false;
        self.bus.emit(GameEvent::NewGame);
        info!("New game");
        self.started = true;
        self.prepare_next_shot();
    }

    /// Cancel everything. Every later call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.bump_epoch();
        self.countdown.cancel();
        self.accumulator = 0.0;
        self.bus.emit(GameEvent::Disposed);
        self.disposed = true;
        info!("Match disposed after {} steps", self.steps);
    }

    pub fn prompt(&self) -> String {
        prompt_text(
            self.settings.mode,
            &self.state,
            self.countdown.display_number(),
            self.level_intro,
        )
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            score: self.state.score,
            shots_taken: self.state.shots_taken,
            max_shots: self.state.max_shots,
            level: self.state.current_level,
            max_level: self.state.max_level,
            level_goals: self.state.level_goals,
            level_goals_required: self.state.level_goals_required,
            phase: self.state.phase,
            game_over: self.state.game_over,
            last_outcome: self.last_outcome,
            countdown: self.countdown.display_number(),
            prompt: self.prompt(),
            ball_position: self.ball.position.to_array(),
            ball_moving: self.ball.is_moving,
            keeper_position: self.keeper.position.to_array(),
            keeper_diving: self.keeper.is_diving,
            keeper_difficulty: self.keeper.difficulty,
            step: self.steps,
            elapsed_secs: self.elapsed,
        }
    }

    // === Internals ===

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        debug!("Phase {} -> {}", from.name(), to.name());
        self.bus.emit(GameEvent::PhaseChange { from, to });
    }

    fn emit_dive(&mut self, decision: DiveDecision) {
        self.bus.emit(GameEvent::KeeperDive {
            direction: (decision.direction.x, decision.direction.y),
            target: (decision.target.x, decision.target.y, decision.target.z),
            player_controlled: self.keeper.is_player_controlled(),
        });
    }

    fn run_task(&mut self, task: MatchTask) {
        match task {
            MatchTask::KeeperReaction { shot_direction } => {
                let read = read_shot_direction(shot_direction, self.state.current_level, &mut self.rng);
                if let Some(decision) = self.keeper.dive(read, &mut self.rng) {
                    self.emit_dive(decision);
                }
            }
            MatchTask::CountdownTick => match self.countdown.tick() {
                Some(CountdownStep::Show(remaining)) => {
                    self.bus.emit(GameEvent::Countdown { remaining });
                    self.scheduler
                        .schedule(COUNTDOWN_INTERVAL_SECS, MatchTask::CountdownTick);
                }
                Some(CountdownStep::Fire) => {
                    self.bus.emit(GameEvent::Countdown { remaining: 0 });
                    self.take_auto_shot();
                }
                None => {}
            },
            MatchTask::CelebrationOver => self.shot_complete(true),
            MatchTask::AdvanceLevel => self.advance_level(),
            MatchTask::BeginLevel => {
                self.level_intro = false;
                self.prepare_next_shot();
            }
        }
    }

    fn take_auto_shot(&mut self) {
        if self.state.phase != Phase::Ready {
            return;
        }
        let shot = auto_shot(self.state.current_level, self.settings.difficulty, &mut self.rng);

        self.tracker.begin();
        self.last_outcome = None;
        self.set_phase(Phase::Saving);
        self.ball.kick(
            shot.direction,
            shot.power,
            self.settings.difficulty,
            &self.tweaks,
            &mut self.rng,
        );
        self.bus.emit(GameEvent::ShotTaken {
            direction: (shot.direction.x, shot.direction.y),
            power: shot.power,
            automatic: true,
        });
    }

    fn resolve_shot(&mut self) {
        // Save reach uses the match's base difficulty, not the keeper's
        let outcome = self.tracker.observe(
            &self.ball,
            &self.bounds,
            self.keeper.position,
            self.settings.difficulty,
        );
        if !outcome.is_terminal() {
            return;
        }

        self.last_outcome = Some(outcome);
        let p = self.ball.position;
        self.bus.emit(GameEvent::ShotResolved {
            outcome,
            ball: (p.x, p.y, p.z),
        });
        info!("Shot {}: {}", self.state.shots_taken + 1, outcome.name());

        match outcome {
            ShotOutcome::Goal => {
                self.state.score += 1;
                self.state.level_goals += 1;
                self.bus.emit(GameEvent::Goal {
                    score: self.state.score,
                    level_goals: self.state.level_goals,
                });
                self.set_phase(Phase::Celebrating);
                self.scheduler
                    .schedule(CELEBRATION_SECS, MatchTask::CelebrationOver);
            }
            _ => self.shot_complete(false),
        }
    }

    fn shot_complete(&mut self, was_goal: bool) {
        self.state.shots_taken += 1;
        debug!(
            "Shot complete (goal={}): {}/{} goals, {}/{} shots",
            was_goal,
            self.state.level_goals,
            self.state.level_goals_required,
            self.state.shots_taken,
            self.state.max_shots
        );

        if self.state.level_target_reached() {
            self.set_phase(Phase::LevelComplete);
            self.bus.emit(GameEvent::LevelComplete {
                level: self.state.current_level,
            });
            if self.state.is_final_level() {
                self.game_over(GameOverReason::AllLevelsComplete);
            } else {
                info!("Level {} complete", self.state.current_level);
                self.scheduler
                    .schedule(LEVEL_ADVANCE_SECS, MatchTask::AdvanceLevel);
            }
        } else if self.state.out_of_shots() {
            self.game_over(GameOverReason::LevelFailed);
        } else {
            self.prepare_next_shot();
        }
    }

    fn advance_level(&mut self) {
        self.state.current_level = (self.state.current_level + 1).min(self.state.max_level);
        self.state.reset_level_counters();
        let difficulty = keeper_difficulty(self.settings.difficulty, self.state.current_level);
        self.keeper.set_difficulty(difficulty);
        self.ball.reset();
        self.keeper.reset();
        self.level_intro = true;
        self.bus.emit(GameEvent::LevelAdvance {
            level: self.state.current_level,
            keeper_difficulty: difficulty,
        });
        info!(
            "Advancing to level {} (keeper difficulty {})",
            self.state.current_level, difficulty
        );
        self.scheduler.schedule(LEVEL_INTRO_SECS, MatchTask::BeginLevel);
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.state.game_over = Some(reason);
        self.set_phase(Phase::GameOver);
        self.bus.emit(GameEvent::GameOver {
            reason,
            score: self.state.score,
            level: self.state.current_level,
        });
        info!(
            "Game over ({:?}) at level {} with {} goals",
            reason, self.state.current_level, self.state.score
        );
    }

    /// Ball back on the spot, keeper idle, phase Ready. Tasks from the
    /// previous shot are dropped.
    fn prepare_next_shot(&mut self) {
        self.scheduler.bump_epoch();
        self.countdown.cancel();
        self.ball.reset();
        self.keeper.reset();
        self.tracker.begin();
        self.state.game_over = None;
        self.set_phase(Phase::Ready);

        if self.settings.mode == GameMode::Save {
            self.countdown.start();
            self.bus.emit(GameEvent::Countdown {
                remaining: COUNTDOWN_START,
            });
            self.scheduler
                .schedule(COUNTDOWN_INTERVAL_SECS, MatchTask::CountdownTick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn shoot_match(difficulty: u32) -> PenaltyMatch {
        let mut m = PenaltyMatch::new(MatchSettings::new(GameMode::Shoot, difficulty).with_seed(42));
        m.start();
        m
    }

    /// Step until `done` holds; panics after `max_steps`
    fn run_until(m: &mut PenaltyMatch, max_steps: u32, done: impl Fn(&PenaltyMatch) -> bool) {
        for _ in 0..max_steps {
            if done(m) {
                return;
            }
            m.tick(DT);
        }
        assert!(done(m), "condition not reached, phase {:?}", m.phase());
    }

    fn goal_shot() -> ShotInput {
        ShotInput::new(Vec2::new(0.2, 0.0), 0.3)
    }

    fn wide_shot() -> ShotInput {
        ShotInput::new(Vec2::new(1.0, 0.0), 1.0)
    }

    /// Take a shot and wait until the match is ready for the next one or
    /// has left the shot cycle
    fn take_shot(m: &mut PenaltyMatch, shot: ShotInput) {
        assert!(m.shoot(shot), "shot refused in {:?}", m.phase());
        run_until(m, 2000, |m| {
            matches!(m.phase(), Phase::Ready | Phase::LevelComplete | Phase::GameOver)
        });
    }

    #[test]
    fn test_goal_is_celebrated_then_counted() {
        let mut m = shoot_match(100);
        assert!(m.shoot(goal_shot()));
        run_until(&mut m, 300, |m| m.phase() == Phase::Celebrating);
        assert_eq!(m.last_outcome(), Some(ShotOutcome::Goal));
        assert_eq!(m.state().score, 1);
        assert_eq!(m.state().level_goals, 1);
        assert_eq!(m.state().shots_taken, 0);

        run_until(&mut m, 200, |m| m.phase() == Phase::Ready);
        assert_eq!(m.state().shots_taken, 1);
        assert!(!m.ball().is_moving);
        assert_eq!(m.ball().position, BALL_SPAWN);
    }

    #[test]
    fn test_three_goals_advance_level() {
        let mut m = shoot_match(100);
        for _ in 0..3 {
            take_shot(&mut m, goal_shot());
        }
        assert_eq!(m.phase(), Phase::LevelComplete);
        assert_eq!(m.state().level_goals, 3);

        run_until(&mut m, 400, |m| m.state().current_level == 2);
        assert_eq!(m.phase(), Phase::LevelComplete);
        assert_eq!(m.state().level_goals, 0);
        assert_eq!(m.state().shots_taken, 0);
        assert!(m.prompt().starts_with("Level 2"));

        run_until(&mut m, 200, |m| m.phase() == Phase::Ready);
        assert_eq!(m.state().current_level, 2);
        assert_eq!(m.state().score, 3);
        assert_eq!(m.keeper().difficulty, 100);
    }

    #[test]
    fn test_five_misses_end_the_game() {
        let mut m = shoot_match(100);
        for _ in 0..5 {
            take_shot(&mut m, wide_shot());
            assert_eq!(m.last_outcome(), Some(ShotOutcome::Missed));
        }
        assert_eq!(m.phase(), Phase::GameOver);
        assert_eq!(m.state().game_over, Some(GameOverReason::LevelFailed));
        assert!(m.state().level_goals < 3);
        assert_eq!(m.state().shots_taken, 5);

        // Terminal until an explicit restart
        for _ in 0..600 {
            m.tick(DT);
        }
        assert_eq!(m.phase(), Phase::GameOver);
        assert!(!m.shoot(goal_shot()));
    }

    #[test]
    fn test_stopped_ball_ends_shot() {
        let mut m = shoot_match(100);
        take_shot(&mut m, wide_shot());
        assert_eq!(m.phase(), Phase::Ready);
        assert_eq!(m.state().shots_taken, 1);
    }

    #[test]
    fn test_wide_shot_resolves_at_coarsest_step_rate() {
        let settings = MatchSettings {
            fixed_hz: 30.0,
            ..MatchSettings::new(GameMode::Shoot, 100).with_seed(42)
        };
        let mut m = PenaltyMatch::new(settings);
        assert_eq!(m.settings().fixed_hz, MIN_FIXED_HZ);
        m.start();
        assert!(m.shoot(wide_shot()));

        let dt = m.step_secs();
        for _ in 0..30_000 {
            if m.phase() == Phase::Ready {
                break;
            }
            m.tick(dt);
        }
        assert_eq!(m.phase(), Phase::Ready, "ball velocity {:?}", m.ball().velocity);
        assert_eq!(m.last_outcome(), Some(ShotOutcome::Missed));
        assert_eq!(m.state().shots_taken, 1);
    }

    #[test]
    fn test_clearing_final_level_ends_the_game() {
        let mut m = shoot_match(100);
        m.state.max_level = m.state.current_level;
        for _ in 0..3 {
            take_shot(&mut m, goal_shot());
        }
        assert_eq!(m.phase(), Phase::GameOver);
        assert_eq!(m.state().game_over, Some(GameOverReason::AllLevelsComplete));
        assert_eq!(m.state().score, 3);
        assert_eq!(m.pending_tasks(), 0, "no level advance queued");

        let events = m.drain_events();
        assert!(events.iter().any(|e| matches!(e.event, GameEvent::LevelComplete { level: 1 })));
        assert!(!events.iter().any(|e| matches!(e.event, GameEvent::LevelAdvance { .. })));

        for _ in 0..600 {
            m.tick(DT);
        }
        assert_eq!(m.phase(), Phase::GameOver);
        assert_eq!(m.state().current_level, 1);
        assert!(!m.shoot(goal_shot()));
    }

    #[test]
    fn test_shoot_only_when_ready() {
        let mut m = PenaltyMatch::new(MatchSettings::new(GameMode::Shoot, 50).with_seed(1));
        assert!(!m.shoot(goal_shot()), "not started");
        m.start();
        assert!(m.shoot(goal_shot()));
        assert!(!m.shoot(goal_shot()), "already shooting");
        assert!(!m.dive(DiveInput::Left), "dive is save mode only");
    }

    #[test]
    fn test_keeper_reacts_after_delay() {
        let mut m = shoot_match(100);
        m.shoot(goal_shot());
        // 298 ms at level 1: not yet at step 17, diving by step 19
        for _ in 0..17 {
            m.tick(DT);
        }
        assert!(!m.keeper().is_diving);
        m.tick(DT);
        m.tick(DT);
        assert!(m.keeper().is_diving);
    }

    #[test]
    fn test_restart_cancels_pending_reaction() {
        let mut m = shoot_match(100);
        m.shoot(goal_shot());
        assert_eq!(m.pending_tasks(), 1);
        m.restart_level();
        assert_eq!(m.pending_tasks(), 0);
        for _ in 0..120 {
            m.tick(DT);
        }
        assert!(!m.keeper().is_diving);
        assert_eq!(m.phase(), Phase::Ready);
    }

    #[test]
    fn test_restart_mid_celebration_drops_stale_timer() {
        let mut m = shoot_match(100);
        m.shoot(goal_shot());
        run_until(&mut m, 300, |m| m.phase() == Phase::Celebrating);
        m.restart_level();
        for _ in 0..300 {
            m.tick(DT);
        }
        // The celebration timer would have counted a shot
        assert_eq!(m.state().shots_taken, 0);
        assert_eq!(m.state().level_goals, 0);
        assert_eq!(m.state().score, 1);
        assert_eq!(m.phase(), Phase::Ready);
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut m = shoot_match(100);
        take_shot(&mut m, goal_shot());
        m.new_game();
        let snapshot = m.snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.shots_taken, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.phase, Phase::Ready);
        assert_eq!(m.pending_tasks(), 0);
    }

    #[test]
    fn test_save_mode_countdown_then_auto_shot() {
        let mut m = PenaltyMatch::new(MatchSettings::new(GameMode::Save, 30).with_seed(5));
        m.start();
        assert_eq!(m.countdown(), Some(3));
        assert!(m.prompt().contains("Shot coming in 3"));
        assert!(!m.dive(DiveInput::Left), "no dive before the shot");

        run_until(&mut m, 200, |m| m.phase() == Phase::Saving);
        assert!(m.ball().is_moving);
        assert_eq!(m.countdown(), None);
        // Three one-second ticks
        assert!((m.elapsed_secs() - 3.0).abs() < 0.05);

        assert!(m.dive(DiveInput::Left));
        assert!(!m.dive(DiveInput::Right), "already diving");
        assert!(m.keeper().dive_direction.x < 0.0);

        let events = m.drain_events();
        assert!(events.iter().any(|e| matches!(
            e.event,
            GameEvent::ShotTaken { automatic: true, .. }
        )));
        assert!(events.iter().any(|e| matches!(
            e.event,
            GameEvent::KeeperDive { player_controlled: true, .. }
        )));
    }

    #[test]
    fn test_save_mode_next_countdown_after_shot() {
        let mut m = PenaltyMatch::new(MatchSettings::new(GameMode::Save, 30).with_seed(6));
        m.start();
        run_until(&mut m, 200, |m| m.phase() == Phase::Saving);
        run_until(&mut m, 2000, |m| {
            m.phase() == Phase::Ready && m.state().shots_taken == 1
        });
        assert_eq!(m.countdown(), Some(3));
        assert!(!m.shoot(goal_shot()), "save mode has no player shots");
    }

    #[test]
    fn test_dispose_makes_everything_inert() {
        let mut m = PenaltyMatch::new(MatchSettings::new(GameMode::Save, 30).with_seed(7));
        m.start();
        m.dispose();
        assert!(m.is_disposed());
        assert_eq!(m.pending_tasks(), 0);

        let before = m.snapshot();
        m.tick(DT);
        assert_eq!(m.update(1.0), 0);
        m.restart_level();
        m.new_game();
        m.start();
        assert!(!m.dive(DiveInput::Up));
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn test_update_runs_fixed_steps() {
        let mut m = shoot_match(50);
        let mut total = 0;
        for _ in 0..3 {
            total += m.update(0.02);
        }
        assert_eq!(total, 3);
        assert_eq!(m.step_count(), 3);

        // Long frames are capped
        assert_eq!(m.update(1.0), MAX_STEPS_PER_FRAME);
        assert_eq!(m.update(0.0), 0);
        assert_eq!(m.update(f32::NAN), 0);
    }

    #[test]
    fn test_same_seed_same_match() {
        let run = |seed| {
            let mut m = PenaltyMatch::new(MatchSettings::new(GameMode::Save, 40).with_seed(seed));
            m.start();
            for _ in 0..1500 {
                m.tick(DT);
            }
            m.snapshot()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_events_are_timestamped() {
        let mut m = shoot_match(100);
        m.drain_events();
        m.shoot(goal_shot());
        run_until(&mut m, 300, |m| m.phase() == Phase::Celebrating);
        let events = m.drain_events();
        let goal = events
            .iter()
            .find(|e| matches!(e.event, GameEvent::Goal { .. }))
            .unwrap();
        assert!(goal.step > 0);
        assert!(goal.time_ms > 0);
        assert!(events.iter().any(|e| matches!(
            e.event,
            GameEvent::ShotResolved { outcome: ShotOutcome::Goal, .. }
        )));
    }
}
