//! Light rig workbench
//!
//! Builds the light rig on a headless backend and runs the render loop at
//! the configured rate. Panel edits, resizes and camera moves are typed on
//! stdin; type `help` for the command list.

mod console;

use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::thread;

use rig_engine::config::{Config, RigConfig};
use rig_engine::foundation::logging;
use rig_engine::foundation::time::SystemClock;
use rig_engine::render::HeadlessBackend;
use rig_engine::{Engine, FixedRateScheduler, LoopEvent, RenderLoop};

use console::Command;

const DEFAULT_CONFIG_PATH: &str = "lights.toml";

/// Forward commands read from `input` until `quit` or end of input
///
/// End of input only drops the sender; it does not stop the loop.
fn forward_commands(input: impl BufRead, events: &Sender<LoopEvent>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Console read failed: {e}");
                break;
            }
        };
        match console::parse(&line) {
            Ok(Command::Event(event)) => {
                let quitting = event == LoopEvent::Cancel;
                if events.send(event).is_err() || quitting {
                    return;
                }
            }
            Ok(Command::Help) => println!("{}", console::USAGE),
            Ok(Command::Empty) => {}
            Err(e) => eprintln!("{e}"),
        }
    }
    log::info!("Console input closed");
}

/// Read commands from stdin on a background thread
fn spawn_console(events: Sender<LoopEvent>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("console".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), &events))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = RigConfig::load_or_default(&config_path)?;

    logging::init_with_level(logging::parse_level(config.log_level()));
    log::info!("Starting light rig workbench ({config_path})");

    let backend = HeadlessBackend::new(config.window.width, config.window.height);
    let mut engine = Engine::new(&config, backend)?;

    let (tx, rx) = mpsc::channel();
    let mut render_loop = RenderLoop::new(
        SystemClock::new(),
        FixedRateScheduler::new(config.frame_loop.target_fps),
    )
    .with_events(rx)
    .with_max_frames(config.frame_loop.max_frames);

    let _console = spawn_console(tx)?;

    let summary = render_loop.run(&mut engine)?;
    log::info!(
        "Finished: {} frames, {} dropped, {:.1}s",
        summary.frames,
        summary.dropped_frames,
        summary.elapsed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_input_does_not_cancel() {
        let (tx, rx) = mpsc::channel();
        forward_commands("orbit 0.1 0\nbogus\n".as_bytes(), &tx);
        drop(tx);
        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events, vec![LoopEvent::Orbit { dx: 0.1, dy: 0.0 }]);
    }

    #[test]
    fn test_quit_stops_forwarding() {
        let (tx, rx) = mpsc::channel();
        forward_commands("quit\npanel\n".as_bytes(), &tx);
        drop(tx);
        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events, vec![LoopEvent::Cancel]);
    }
}
