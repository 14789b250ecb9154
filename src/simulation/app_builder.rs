//! Headless App Builder
//!
//! Provides a reusable builder for creating headless Bevy apps that run a
//! penalty match. Used by the simulation runner and parallel execution.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::plugin::PenaltyPlugin;
use crate::settings::MatchSettings;
use crate::tuning::PhysicsTweaks;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    settings: MatchSettings,
    tweaks: PhysicsTweaks,
    minimal_threads: bool,
    event_log: bool,
}

impl HeadlessAppBuilder {
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            tweaks: PhysicsTweaks::default(),
            minimal_threads: false,
            event_log: false,
        }
    }

    /// Use these physics tweaks instead of the defaults
    pub fn with_tweaks(mut self, tweaks: PhysicsTweaks) -> Self {
        self.tweaks = tweaks;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Write the match's events to logs/
    pub fn with_event_log(mut self) -> Self {
        self.event_log = true;
        self
    }

    /// Build the app with minimal plugins and the penalty plugin
    ///
    /// Time advances by exactly one fixed step per `app.update()`, so the
    /// match runs one physics step per update regardless of wall time.
    pub fn build(self) -> App {
        let step = Duration::from_secs_f64(1.0 / self.settings.fixed_hz);
        let mut app = App::new();

        if self.minimal_threads {
            app.add_plugins(
                MinimalPlugins
                    .set(ScheduleRunnerPlugin::run_loop(step))
                    .set(TaskPoolPlugin {
                        task_pool_options: TaskPoolOptions::with_num_threads(1),
                    }),
            );
        } else {
            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(step)));
        }

        let mut plugin = PenaltyPlugin::new(self.settings).with_tweaks(self.tweaks);
        if self.event_log {
            plugin = plugin.with_event_log();
        }
        app.add_plugins(plugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(step));

        app
    }
}
