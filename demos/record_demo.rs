//! Demonstration of background gaze recording.
//!
//! This example shows how to:
//! 1. Load the recorder configuration
//! 2. Start an acquisition controller on a simulated tracker
//! 3. Feed it a wandering gaze path with occasional tracking loss
//! 4. Stop it and inspect the log that was written
//!
//! Run with: cargo run --example record_demo [seconds]
//!
//! Set RUST_LOG=debug to see every sample as it is written.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gaze_recorder::{AcquisitionController, Config, GazePointData, SimulatedDriver};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let seconds: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(5);

    println!("Gaze Recorder - Record Demo");
    println!("===========================");
    println!();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config, using defaults: {e}");
            Config::default()
        }
    };
    if let Err(e) = config.ensure_directories() {
        eprintln!("Error creating log directory: {e}");
        return;
    }

    let resolution = config.tracker.resolution;
    println!("Log file: {:?}", config.tracker.save_path);
    println!("Display: {}x{}", resolution.width, resolution.height);
    println!("Recording for {seconds} seconds (Ctrl+C to stop early)...");
    println!();

    let (driver, feed) = SimulatedDriver::new(config.simulated_tick);
    let controller = AcquisitionController::new(config.tracker.clone(), Arc::new(driver));

    // Set up stop flag
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    if let Err(e) = controller.start() {
        eprintln!("Error starting acquisition: {e}");
        return;
    }

    // Simulated eyes: a slow Lissajous path over the display, losing
    // tracking every 40th point
    let start = Instant::now();
    let mut emitted: u64 = 0;
    while running.load(Ordering::SeqCst) && start.elapsed() < Duration::from_secs(seconds) {
        let t = start.elapsed().as_secs_f64();
        let x = resolution.width * (0.5 + 0.45 * (TAU * 0.13 * t).sin());
        let y = resolution.height * (0.5 + 0.45 * (TAU * 0.21 * t).cos());

        let point = if emitted % 40 == 39 {
            GazePointData::invalid(x, y)
        } else {
            GazePointData::valid(x, y)
        };
        feed.push(point);
        emitted += 1;

        if !controller.is_worker_alive() {
            eprintln!("Acquisition worker exited unexpectedly");
            break;
        }
        thread::sleep(Duration::from_millis(16));
    }

    feed.wait_for_delivered(emitted, Duration::from_secs(1));

    println!();
    println!("Stopping acquisition...");
    controller.stop();

    let written = std::fs::read_to_string(controller.save_path())
        .map(|content| content.lines().count())
        .unwrap_or(0);

    println!();
    println!("Gaze points emitted: {emitted}");
    println!("Gaze points delivered: {}", feed.delivered());
    println!("Lines in log: {written}");
    println!();
    println!("Demo complete!");
}
