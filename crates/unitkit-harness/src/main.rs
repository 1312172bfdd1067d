#![forbid(unsafe_code)]

//! Reference session for the unit-value stepper.
//!
//! Mounts a [`UnitValue`], drives it through a short scripted session, and
//! prints the scene after every step.
//!
//! # Running
//!
//! ```sh
//! cargo run -p unitkit-harness
//! cargo run -p unitkit-harness -- path/to/unitkit.toml
//! RUST_LOG=unitkit_widgets=debug cargo run -p unitkit-harness
//! ```

use std::process::ExitCode;

use tracing::{error, info, info_span};
use unitkit_core::event::KeyCode;
use unitkit_core::logging::{self, DEFAULT_FILTER};
use unitkit_harness::{QueryError, Screen};
use unitkit_render::Role;
use unitkit_widgets::UnitValue;
use unitkit_widgets::config::WidgetConfig;

fn main() -> ExitCode {
    if let Err(e) = logging::init(DEFAULT_FILTER) {
        eprintln!("logging disabled: {e}");
    }

    let config = match std::env::args().nth(1) {
        Some(path) => match WidgetConfig::from_file(&path) {
            Ok(config) => {
                info!(path = %path, "loaded widget config");
                config
            }
            Err(e) => {
                error!(path = %path, error = %e, "failed to load widget config");
                eprintln!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => WidgetConfig::default(),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("session failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &WidgetConfig) -> Result<(), QueryError> {
    let _span = info_span!("session").entered();
    let mut screen = Screen::render(UnitValue::from_config(config));
    step(&screen, "mounted");

    let increase = screen.get_by_name(Role::Button, "Increase value")?;
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    let input = screen.textbox()?;

    screen.click(increase)?;
    step(&screen, "increase");

    screen.clear(input)?;
    screen.type_text(input, "12,34")?;
    screen.press(KeyCode::Backspace);
    screen.blur();
    step(&screen, "typed 12,3 and blurred");

    screen.clear(input)?;
    screen.type_text(input, "0")?;
    screen.blur();
    screen.pointer_enter(decrease)?;
    screen.advance_timers(config.tooltip.delay());
    step(&screen, "hovering disabled decrease");

    screen.pointer_leave(decrease)?;
    let px = screen.get_by_name(Role::Button, "px")?;
    screen.click(px)?;
    screen.clear(input)?;
    screen.type_text(input, "150")?;
    let percent = screen.get_by_name(Role::Button, "%")?;
    screen.click(percent)?;
    step(&screen, "150px switched to %");

    screen.unmount();
    Ok(())
}

fn step<C: unitkit_widgets::Component>(screen: &Screen<C>, label: &str) {
    info!(step = label, "scene rendered");
    println!("== {label}");
    print!("{}", screen.snapshot());
}
