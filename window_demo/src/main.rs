//! Native window demo
//!
//! Opens one window and polls it until the close button or ESC is pressed.
//! An optional config path (TOML or RON) may be passed as the first argument.

use native_window::prelude::*;
use native_window::{logging, time::{self, FrameClock}};
use thiserror::Error;

const DEFAULT_CONFIG: &str = "window_demo.toml";

#[derive(Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] native_window::config::ConfigError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

fn load_config() -> Result<WindowSystemConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(WindowSystemConfig::load_from_file(&path)?),
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => {
            Ok(WindowSystemConfig::load_from_file(DEFAULT_CONFIG)?)
        }
        None => Ok(WindowSystemConfig::default()),
    }
}

fn run(config: &WindowSystemConfig) -> Result<(), DemoError> {
    let mut system = WindowSystem::new(config);
    let window = system.try_create_window(&config.window.title, config.window.width, config.window.height)?;
    system.show_window(window);

    let mut clock = FrameClock::new();
    while system.poll_events(window) {
        if system.is_key_pressed(KeyCode::Escape.code()) {
            log::info!("Escape pressed, closing");
            break;
        }

        clock.tick();
        if clock.frames() % 60 == 0 {
            let title = format!("{} - frame {} ({:.0} fps)", config.window.title, clock.frames(), clock.average_fps());
            system.set_title(window, &title);
        }

        time::sleep(config.frame_interval_ms);
    }

    if let Some(data) = system.window(window) {
        log::info!("Final size {}x{} after {} polls", data.width(), data.height(), data.polls());
    }
    system.destroy_window(window);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    config.validate()?;
    logging::init(&config.log_level);

    log::info!("Starting window demo on {:?} backend", config.backend);
    run(&config)?;
    log::info!("Window demo finished");
    Ok(())
}
