//! Path Defense entry point
//!
//! Runs the simulation headless in real time. Input comes from an idle/demo
//! driver that "clicks" at seeded pseudo-random spots; the debug overlay is
//! written to the log once per second.
//!
//! Usage: `path-defense [tuning.json]`

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use path_defense::consts::*;
use path_defense::sim::{Command, GameState, TickInput, TowerKind, tick};
use path_defense::{DebugOverlay, RenderSnapshot, Tuning};

/// Wall-clock length of the demo
const DEMO_DURATION: Duration = Duration::from_secs(60);
/// Frame pacing stand-in for vsync
const FRAME_TIME: Duration = Duration::from_millis(16);
const DEMO_SEED: u64 = 0x5eed;

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    last_time: Instant,
    input: TickInput,
    rng: Pcg32,
    frame_counter: u64,
}

impl Game {
    fn new(state: GameState, seed: u64) -> Self {
        Self {
            state,
            accumulator: 0.0,
            last_time: Instant::now(),
            input: TickInput::default(),
            rng: Pcg32::seed_from_u64(seed),
            frame_counter: 0,
        }
    }

    /// Idle mode: occasionally spawn enemies/towers or knock a tower out
    fn poll_demo_input(&mut self) {
        let roll: f32 = self.rng.random();
        let at = Vec2::new(self.rng.random(), self.rng.random());
        let command = if roll < 0.01 {
            Command::SpawnEnemy { at }
        } else if roll < 0.015 {
            Command::SpawnTower {
                at,
                kind: TowerKind::Fire,
            }
        } else if roll < 0.017 {
            Command::DisableTower { at }
        } else {
            return;
        };
        log::debug!("Demo input: {command:?}");
        self.input.commands.push(command);
    }

    /// Run simulation ticks
    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_time).as_secs_f32().min(0.1);
        self.last_time = now;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Commands are one-shot
            self.input.commands.clear();

            for event in &self.state.events {
                log::trace!("{event:?}");
            }
        }

        self.frame_counter += 1;
    }

    fn report(&self) {
        let overlay = DebugOverlay::capture(&self.state);
        for line in overlay.lines() {
            log::info!("{line}");
        }
        let snapshot = RenderSnapshot::capture(&self.state);
        log::info!(
            "Frame {}: {} enemies, {} towers, {} projectiles on screen",
            self.frame_counter,
            snapshot.enemies.len(),
            snapshot.towers.len(),
            snapshot.projectiles.len()
        );
    }
}

fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    match Tuning::load(&path) {
        Ok(tuning) => tuning,
        Err(err) => {
            log::error!("{err}; falling back to default tuning");
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Path Defense (headless) starting...");

    let state = match GameState::new(load_tuning()) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Could not build the simulation: {err}");
            std::process::exit(1);
        }
    };

    let mut game = Game::new(state, DEMO_SEED);
    let started = Instant::now();
    let mut last_report = started;

    while started.elapsed() < DEMO_DURATION && !game.state.is_game_over() {
        game.poll_demo_input();
        game.update();

        if last_report.elapsed() >= Duration::from_secs(1) {
            game.report();
            last_report = Instant::now();
        }

        std::thread::sleep(FRAME_TIME);
    }

    game.report();
    log::info!("Path Defense finished after {} frames", game.frame_counter);
}
