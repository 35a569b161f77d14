mod args;
pub mod renderer;

use std::{
    sync::Mutex,
    thread,
    time::{Duration, Instant},
};

use args::Args;
use boarding_simulator::{
    cabin::CabinConfig,
    shape::{Shape, Style, Tag},
    Simulator, SimulatorOptions,
};
use clap::Parser;
use glam::{vec2, Vec2};
use log::{info, warn};
use once_cell::sync::Lazy;

static SIMULATOR_STATE: Lazy<Mutex<SimulatorState>> =
    Lazy::new(|| Mutex::new(SimulatorState::default()));
static CONTROL_STATE: Mutex<ControlState> = Mutex::new(ControlState {
    paused: false,
    playback_speed: 1.0,
});

/// Seconds per tick at normal speed.
pub const DELTA_TIME: f32 = 0.02;

#[derive(Default)]
pub struct SimulatorState {
    pub canvas: Vec2,
    /// Static cabin shapes, bottom to top.
    pub scene: Vec<(Shape, Style)>,
    pub passengers: Vec<(Shape, Style)>,
    pub tick: u64,
    pub zone: Option<usize>,
    pub seated: usize,
    pub total: usize,
}

#[derive(Clone)]
pub struct ControlState {
    pub paused: bool,
    pub playback_speed: f32,
}

fn passenger_shapes(simulator: &Simulator) -> Vec<(Shape, Style)> {
    simulator
        .surface
        .drawables()
        .filter(|(_, _, _, tags)| tags.contains(&Tag::Passenger))
        .map(|(_, shape, style, _)| (shape.clone(), *style))
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_module("boarding", log::LevelFilter::Info)
        .filter_module("boarding_simulator", log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .parse_default_env()
        .init();

    if cfg!(debug_assertions) {
        warn!("Debug build");
    }

    let args = Args::parse();
    let (width, height) = args.window_size();

    let cabin = CabinConfig::default_cabin()?;
    let options = SimulatorOptions {
        window_width: width as f32,
        seed: fastrand::u64(..),
        ..Default::default()
    };
    let mut simulator = Simulator::new(&cabin, &options)?;

    {
        let mut state = SIMULATOR_STATE.lock().unwrap();
        let fuselage = &simulator.layout.fuselage;
        state.canvas = vec2(fuselage.width, fuselage.height);
        state.scene = simulator
            .surface
            .drawables()
            .map(|(_, shape, style, _)| (shape.clone(), *style))
            .collect();
        state.total = simulator.get_passenger_count();
    }

    ctrlc::set_handler(|| {
        let state = SIMULATOR_STATE.lock().unwrap();
        info!(
            "Interrupted at tick {} in zone {}: {} of {} passengers seated",
            state.tick,
            state.zone.map_or("-".to_string(), |z| z.to_string()),
            state.seated,
            state.total
        );
        std::process::exit(130);
    })?;

    thread::spawn(move || {
        while !simulator.is_finished() {
            let start = Instant::now();
            let control = CONTROL_STATE.lock().unwrap().clone();

            if !control.paused {
                let report = simulator.tick();

                let mut state = SIMULATOR_STATE.lock().unwrap();
                state.passengers = passenger_shapes(&simulator);
                state.tick = report.tick;
                state.zone = report.zone;
                state.seated = simulator.scheduler.seated_count();
            }

            let step_time = Instant::now() - start;
            let min_interval = Duration::from_secs_f32(DELTA_TIME / control.playback_speed);
            if step_time < min_interval {
                thread::sleep(min_interval - step_time);
            }
        }

        let log = simulator.log();
        info!(
            "{} zones, {} passengers, {} ticks, {:.2} s",
            log.zones.len(),
            log.seated(),
            log.total_ticks,
            log.total_time
        );
    });

    renderer::run(width, height);

    Ok(())
}
