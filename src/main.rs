use anyhow::{ensure, Result};
use clap::Parser;
use log::info;
use std::time::Duration;

use intersection_signals::simulation::{
    draw_intersection, Approach, CommandOutcome, IntersectionController, IntersectionHost,
    LoopExit, ProcessExiter, TimingConfig, UnsupportedExit, UserCommand, DEFAULT_CYCLE_MS,
    MICRO_PAUSE_MS, PAUSE_RED_MS,
};

#[derive(Parser)]
#[command(name = "intersection_signals")]
#[command(about = "Four-way intersection signal controller with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Time each green is held before the next transition, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CYCLE_MS)]
    cycle_ms: u64,

    /// All-red pause after clearing a green, in milliseconds
    #[arg(long, default_value_t = PAUSE_RED_MS)]
    pause_red_ms: u64,

    /// Pause between the re-asserted all-red and the next green, in milliseconds
    #[arg(long, default_value_t = MICRO_PAUSE_MS)]
    micro_pause_ms: u64,

    /// Simulated time to run in headless mode, in milliseconds
    #[arg(long, default_value = "12000")]
    duration_ms: u64,

    /// Simulated time per tick in headless mode, in milliseconds
    #[arg(long, default_value = "10")]
    tick_ms: u64,

    /// Issue a Reset command at this simulated time (repeatable)
    #[arg(long = "reset-at", value_name = "MS")]
    reset_at: Vec<u64>,

    /// Issue an Exit command at this simulated time
    #[arg(long = "exit-at", value_name = "MS")]
    exit_at: Option<u64>,

    /// Act as a platform without an exit mechanism
    #[arg(long)]
    no_exit: bool,

    /// Sleep for every tick so the headless run follows wall-clock time
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let timing = TimingConfig::from_millis(cli.cycle_ms, cli.pause_red_ms, cli.micro_pause_ms)?;

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(timing, cli.no_exit);
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        run_headless(&cli, timing)?;
    }
    Ok(())
}

fn exiter_for(no_exit: bool) -> Box<dyn ProcessExiter + Send + Sync> {
    if no_exit {
        Box::new(UnsupportedExit::new(std::env::consts::OS))
    } else {
        Box::new(LoopExit)
    }
}

/// Commands scripted on the command line, ordered by the time they are issued
fn command_script(cli: &Cli) -> Vec<(Duration, UserCommand)> {
    let mut script: Vec<(Duration, UserCommand)> = cli
        .reset_at
        .iter()
        .map(|ms| (Duration::from_millis(*ms), UserCommand::Reset))
        .chain(
            cli.exit_at
                .map(|ms| (Duration::from_millis(ms), UserCommand::Exit)),
        )
        .collect();
    script.sort_by_key(|(at, _)| *at);
    script
}

/// Run the intersection in headless mode (no graphics)
fn run_headless(cli: &Cli, timing: TimingConfig) -> Result<()> {
    ensure!(cli.tick_ms > 0, "tick must be positive");

    println!("Running intersection signals in headless mode...");
    println!(
        "Cycle: {}ms, all-red pause: {}ms, micro pause: {}ms",
        timing.cycle.as_millis(),
        timing.pause_red.as_millis(),
        timing.micro_pause.as_millis()
    );
    println!();

    let controller = IntersectionController::started(timing)?;
    let mut host = IntersectionHost::new(controller, exiter_for(cli.no_exit));
    let mut script = command_script(cli).into_iter().peekable();

    let end = Duration::from_millis(cli.duration_ms);
    let tick = Duration::from_millis(cli.tick_ms);

    print!("{}", draw_intersection(&host.controller().current_state(), Duration::ZERO));
    let mut last_revision = host.controller().revision();

    while host.controller().now() < end && !host.exit_requested() {
        let target = (host.controller().now() + tick).min(end);

        while let Some((at, command)) = script.next_if(|(at, _)| *at <= target) {
            host.controller_mut().advance_to(at);
            let outcome = host.handle(command);
            info!("{:?} at {}ms: {:?}", command, at.as_millis(), outcome);
            if outcome == CommandOutcome::Exiting {
                break;
            }
        }
        if host.exit_requested() {
            break;
        }

        host.controller_mut().advance_to(target);

        let controller = host.controller();
        if controller.revision() != last_revision {
            last_revision = controller.revision();
            print!("{}", draw_intersection(&controller.current_state(), controller.now()));
        }

        if cli.realtime {
            std::thread::sleep(tick);
        }
    }

    let controller = host.controller();
    let stats = controller.stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Simulated time (ms): {}", controller.now().as_millis());
    info!("Transitions completed: {}", stats.transitions_completed);
    info!("Resets applied: {}", stats.resets);
    for approach in Approach::ROTATION {
        info!("Greens for {}: {}", approach, stats.greens_for(approach));
    }
    info!("Final state: {}", controller.current_state());
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(timing: TimingConfig, no_exit: bool) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use intersection_signals::ui::IntersectionUiPlugin;

    println!("Starting Intersection Signals UI...");
    println!();
    println!("Controls:");
    println!("  R / Reset button  - Restart the rotation from north");
    println!("  ESC / Exit button - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,intersection_signals=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Intersection Signals".into(),
                        resolution: (900, 900).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(IntersectionUiPlugin {
            timing,
            exiter_unsupported: no_exit,
        })
        .run();
}
