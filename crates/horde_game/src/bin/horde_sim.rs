//! Headless Horde run
//!
//! Builds a level with in-memory collaborators and lets a scripted player
//! shoot at the nearest agent until time runs out or the player dies.
//!
//! Run with: cargo run -p horde_game --bin horde_sim -- [config.json] [seconds]
//! The config path may also come from `HORDE_CONFIG`.

use glam::Vec3;
use horde_combat::FireDecision;
use horde_game::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

const FRAME: f32 = 1.0 / 60.0;
const SHOT_INTERVAL: f32 = 0.25;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().or_else(|| std::env::var("HORDE_CONFIG").ok());
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    let config = match config_path {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    if let Err(e) = run(config, seconds) {
        log::error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: GameConfig, seconds: f32) -> Result<()> {
    let mut assets = ProceduralAssets::new();
    let mut sim = Simulation::new(config, HeadlessScene::new(), HeadlessAudio::new())?;
    let report = sim.build_level(&mut assets)?;
    log::info!(
        "Level {}: {} agents, player at {:?}",
        report.level,
        report.agents.placed(),
        report.player.position
    );

    let kills = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&kills);
    sim.on_agent_killed(move |agent, at| {
        counter.set(counter.get() + 1);
        log::info!("Agent {} down at ({:.1}, {:.1})", agent, at.x, at.z);
    });

    let mut shots = 0u32;
    let mut cooldown = 0.0;
    let frames = (seconds / FRAME).ceil() as u32;
    for _ in 0..frames {
        cooldown -= FRAME;
        if cooldown <= 0.0 {
            cooldown = SHOT_INTERVAL;
            if let Some(aim) = nearest_target(&sim) {
                let eye = sim.player_position();
                match sim.fire(eye, aim - eye) {
                    Ok(shot) if shot.decision == FireDecision::Fired => shots += 1,
                    Ok(shot) if shot.decision == FireDecision::Empty => {
                        sim.reload();
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("Shot skipped: {}", e),
                }
            }
        }

        let tick = sim.tick(FRAME);
        for event in &tick.events {
            match event {
                GameEvent::LevelAdvanced { level, kills_to_win } => {
                    log::info!("Level {} reached, {} kills to win", level, kills_to_win);
                    sim.build_level(&mut assets)?;
                }
                GameEvent::PlayerDied => log::info!("Player died at {:.1}s", tick.time),
                _ => {}
            }
        }
        if sim.is_game_over() {
            break;
        }
    }

    let progress = sim.progress();
    log::info!(
        "Finished at {:.1}s: level {}, {} kills ({} this level), {} shots, life {:.2}",
        sim.clock(),
        progress.level,
        kills.get(),
        progress.kills,
        shots,
        sim.life().current()
    );
    Ok(())
}

/// Head of the closest live agent
fn nearest_target<S: RenderScene, A: AudioSink>(sim: &Simulation<S, A>) -> Option<Vec3> {
    let eye = sim.player_position();
    let head = sim.config().combat.damage.head_height;
    sim.agents()
        .iter()
        .filter(|z| z.is_alive())
        .map(|z| z.position() + Vec3::Y * head)
        .min_by(|a, b| a.distance_squared(eye).total_cmp(&b.distance_squared(eye)))
}
