//! Penaltykick - play one headless penalty match
//!
//! A bot takes the human side (shooter in shoot mode, keeper in save mode)
//! and every match event is logged. Settings come from
//! config/match_settings.json, physics from config/gameplay_tuning.json.
//!
//! Usage:
//!   cargo run -- --mode save --difficulty 60 --seed 7
//!   cargo run -- --realtime --event-log

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;

use penaltykick::plugin::{ActiveMatch, PendingInputs, apply_pending_inputs};
use penaltykick::settings::{GameMode, MatchSettings};
use penaltykick::simulation::{BotProfile, HeadlessAppBuilder, SimBots, drive_bots};
use penaltykick::tuning::load_physics_tweaks;

/// Stop after this many simulated minutes even without a game over
const DEFAULT_MINUTES: f64 = 10.0;

struct Options {
    realtime: bool,
    event_log: bool,
    minutes: f64,
    save_settings: bool,
}

fn parse_args(settings: &mut MatchSettings) -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut options = Options {
        realtime: false,
        event_log: false,
        minutes: DEFAULT_MINUTES,
        save_settings: false,
    };

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--mode" => {
                if let Some(mode) = value.and_then(|v| GameMode::from_name(v)) {
                    settings.mode = mode;
                    i += 1;
                }
            }
            "--difficulty" => {
                if let Some(d) = value.and_then(|v| v.parse().ok()) {
                    settings.difficulty = d;
                    i += 1;
                }
            }
            "--country" => {
                if let Some(c) = value {
                    settings.country = c.clone();
                    i += 1;
                }
            }
            "--seed" => {
                if let Some(seed) = value.and_then(|v| v.parse().ok()) {
                    settings.seed = Some(seed);
                    i += 1;
                }
            }
            "--minutes" => {
                if let Some(m) = value.and_then(|v| v.parse().ok()) {
                    options.minutes = m;
                    i += 1;
                }
            }
            "--realtime" => options.realtime = true,
            "--event-log" => options.event_log = true,
            "--save-settings" => options.save_settings = true,
            other => eprintln!("Ignoring unknown argument '{}'", other),
        }
        i += 1;
    }
    options
}

fn main() {
    let mut settings = MatchSettings::load();
    let options = parse_args(&mut settings);
    let settings = settings.sanitized();

    let mut builder = HeadlessAppBuilder::new(settings.clone()).with_tweaks(load_physics_tweaks());
    if options.event_log {
        builder = builder.with_event_log();
    }
    let mut app = builder.build();

    let bots = SimBots::for_match(
        BotProfile::default(),
        &app.world().resource::<ActiveMatch>().0,
    );
    app.add_plugins(LogPlugin {
        filter: "info,penaltykick=debug".to_string(),
        ..default()
    })
    .insert_resource(bots)
    .add_systems(FixedUpdate, drive_bots.before(apply_pending_inputs));

    if options.save_settings
        && let Err(e) = settings.save()
    {
        error!("{}", e);
    }

    let step = Duration::from_secs_f64(1.0 / settings.fixed_hz);
    let max_updates = (options.minutes * 60.0 * settings.fixed_hz).ceil() as u64 + 1;
    let mut last_prompt = String::new();

    for _ in 0..max_updates {
        app.update();

        let game = &app.world().resource::<ActiveMatch>().0;
        let prompt = game.prompt();
        if prompt != last_prompt {
            info!("{}", prompt);
            last_prompt = prompt;
        }
        if app.should_exit().is_some() {
            break;
        }
        if game.state().game_over.is_some() {
            app.world_mut().resource_mut::<PendingInputs>().dispose = true;
        }
        if options.realtime {
            std::thread::sleep(step);
        }
    }

    let snapshot = app.world().resource::<ActiveMatch>().snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Could not serialize final state: {}", e);
            std::process::exit(1);
        }
    }
}
