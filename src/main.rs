//! Drop Derby entry point
//!
//! Runs a headless race to completion and prints the standings. Rendering
//! and recording collaborators would consume the same per-tick snapshots
//! this loop produces.

use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use drop_derby::consts::TICK_RATE;
use drop_derby::sim::{RacePhase, RaceState, tick};
use drop_derby::RaceConfig;

/// Give up if nobody finishes within this many ticks (~10 minutes of race)
const MAX_TICKS: u64 = 60 * 60 * 10;

fn main() {
    env_logger::init();

    let mut config = RaceConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().expect("--config requires a path");
                config = match RaceConfig::load(Path::new(&path)) {
                    Ok(c) => c,
                    Err(e) => {
                        log::error!("{e}");
                        std::process::exit(1);
                    }
                };
            }
            "--seed" => {
                let value = args.next().expect("--seed requires a value");
                config.seed = Some(value.parse().expect("seed must be an integer"));
            }
            "--fast" => config.realtime = false,
            "--realtime" => config.realtime = true,
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: drop-derby [--config race.json] [--seed N] [--fast|--realtime]");
                std::process::exit(2);
            }
        }
    }

    let seed = config.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("starting race with seed {seed}");

    let provider = config.provider();
    let mut state = RaceState::new(seed, provider.as_ref(), &config.names, config.num_balls);

    let frame = Duration::from_secs_f64(1.0 / TICK_RATE as f64);
    loop {
        let started = Instant::now();
        tick(&mut state);

        if state.tick % (TICK_RATE as u64 * 5) == 0 {
            if let Some(leader) = state.leader() {
                log::info!(
                    "tick {}: '{}' leads at y={:.0}",
                    state.tick,
                    leader.name,
                    leader.pos.y
                );
            }
        }

        if let RacePhase::Finished { winner } = state.phase {
            let name = &state.balls[winner as usize].name;
            println!("WINNER: {name} (tick {})", state.tick);
            println!("--- standings ---");
            for (place, ball) in state.standings().iter().enumerate() {
                println!("{:>2}. {} (y={:.0})", place + 1, ball.name, ball.pos.y);
            }
            break;
        }

        if state.tick >= MAX_TICKS {
            log::warn!("no winner after {MAX_TICKS} ticks, giving up");
            break;
        }

        if config.realtime {
            if let Some(remaining) = frame.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }
}
