//! Bevy integration
//!
//! The match lives in the `ActiveMatch` resource and steps once per
//! `FixedUpdate`. Input layers write into `PendingInputs`; the inputs are
//! applied at the start of the next fixed step. Disposing the match ends the
//! app loop.

use bevy::prelude::*;

use crate::events::{EventLog, LOG_DIR};
use crate::game::{MatchSnapshot, PenaltyMatch};
use crate::settings::MatchSettings;
use crate::shooting::{DiveInput, ShotInput};
use crate::tuning::PhysicsTweaks;

#[derive(Resource)]
pub struct ActiveMatch(pub PenaltyMatch);

impl ActiveMatch {
    pub fn snapshot(&self) -> MatchSnapshot {
        self.0.snapshot()
    }
}

/// Inputs waiting for the next fixed step
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PendingInputs {
    pub shot: Option<ShotInput>,
    pub dive: Option<DiveInput>,
    pub restart_level: bool,
    pub new_game: bool,
    pub dispose: bool,
}

impl PendingInputs {
    pub fn queue_shot(&mut self, shot: ShotInput) {
        self.shot = Some(shot);
    }

    pub fn queue_dive(&mut self, dive: DiveInput) {
        self.dive = Some(dive);
    }

    pub fn is_empty(&self) -> bool {
        self.shot.is_none()
            && self.dive.is_none()
            && !self.restart_level
            && !self.new_game
            && !self.dispose
    }
}

pub struct PenaltyPlugin {
    pub settings: MatchSettings,
    pub tweaks: PhysicsTweaks,
    /// Write the session to a JSON-lines file under logs/
    pub log_to_file: bool,
}

impl PenaltyPlugin {
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            settings,
            tweaks: PhysicsTweaks::default(),
            log_to_file: false,
        }
    }

    pub fn with_tweaks(mut self, tweaks: PhysicsTweaks) -> Self {
        self.tweaks = tweaks;
        self
    }

    pub fn with_event_log(mut self) -> Self {
        self.log_to_file = true;
        self
    }
}

impl Plugin for PenaltyPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone().sanitized();

        app.insert_resource(Time::<Fixed>::from_hz(settings.fixed_hz))
            .insert_resource(self.tweaks.clone())
            .insert_resource(ActiveMatch(PenaltyMatch::with_tweaks(
                settings.clone(),
                self.tweaks.clone(),
            )))
            .insert_resource(settings)
            .init_resource::<PendingInputs>()
            .add_systems(Startup, start_active_match)
            .add_systems(
                FixedUpdate,
                (apply_pending_inputs, step_active_match).chain(),
            )
            .add_systems(Update, (log_match_events, exit_when_disposed).chain());

        if self.log_to_file {
            match EventLog::create(LOG_DIR) {
                Ok(log) => {
                    app.insert_resource(log);
                }
                Err(e) => warn!("Event log disabled: {}", e),
            }
        }
    }
}

pub fn start_active_match(mut active: ResMut<ActiveMatch>) {
    if !active.0.is_started() {
        active.0.start();
    }
}

/// Hand queued inputs to the match. Inputs the match refuses (wrong phase,
/// already diving) are dropped rather than retried.
pub fn apply_pending_inputs(mut pending: ResMut<PendingInputs>, mut active: ResMut<ActiveMatch>) {
    if pending.is_empty() {
        return;
    }
    let inputs = std::mem::take(&mut *pending);
    let game = &mut active.0;

    if inputs.dispose {
        game.dispose();
        return;
    }
    if inputs.new_game {
        game.new_game();
    } else if inputs.restart_level {
        game.restart_level();
    }
    if let Some(shot) = inputs.shot
        && !game.shoot(shot)
    {
        debug!("Shot ignored in phase {}", game.phase().name());
    }
    if let Some(dive) = inputs.dive
        && !game.dive(dive)
    {
        debug!("Dive {} ignored in phase {}", dive.name(), game.phase().name());
    }
}

pub fn step_active_match(time: Res<Time>, mut active: ResMut<ActiveMatch>) {
    active.0.tick(time.delta_secs());
}

/// Drain match events into the log (and the session file if one is open)
pub fn log_match_events(mut active: ResMut<ActiveMatch>, log: Option<ResMut<EventLog>>) {
    let events = active.0.drain_events();
    if events.is_empty() {
        return;
    }
    for e in &events {
        info!("[{:>7}ms] {:?}", e.time_ms, e.event);
    }
    if let Some(mut log) = log {
        log.write_all(&events);
        log.flush();
    }
}

/// A disposed match never steps again, so stop the frame loop too
pub fn exit_when_disposed(active: Res<ActiveMatch>, mut exit: MessageWriter<AppExit>) {
    if active.0.is_disposed() {
        exit.write(AppExit::Success);
    }
}
