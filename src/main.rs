//! Cube Arena entry point
//!
//! Native builds run a headless autopilot session: one run at a fixed 60 Hz
//! frame delta, first offered upgrade on every level-up, final stats printed
//! to stdout as JSON. Pass a tuning JSON file as the first argument to
//! override the default balance.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cube_arena::audio::AudioManager;
    use cube_arena::sim::{Command, GameEvent, GameState, RunStats, autopilot, tick};
    use cube_arena::{Tuning, TuningError};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten minutes of game time
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    pub fn run(tuning_path: Option<String>) -> Result<RunStats, TuningError> {
        let tuning = match tuning_path {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let mut state = GameState::new(tuning)?;
        let mut audio = AudioManager::default();

        for _ in 0..MAX_FRAMES {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_DT);

            let events = state.drain_events();
            audio.play_events(&events);
            for event in events {
                match event {
                    GameEvent::LevelUpMenu { level, choices } => {
                        if let Some(choice) = choices.first() {
                            log::info!("Level {}: taking {}", level, choice.label);
                            state.push_command(Command::SelectUpgrade(choice.option));
                        }
                    }
                    GameEvent::BossWarning { text } => log::warn!("{}", text),
                    GameEvent::GameOver(stats) | GameEvent::Victory(stats) => return Ok(stats),
                    _ => {}
                }
            }
        }

        log::warn!("Run still going after {} frames, stopping", MAX_FRAMES);
        Ok(state.run_stats())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::init();
    log::info!("Cube Arena (headless) starting...");

    let stats = match headless::run(std::env::args().nth(1)) {
        Ok(stats) => stats,
        Err(e) => {
            log::error!("Failed to start run: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&stats) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to encode run stats: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `cube_arena::sim::tick` directly
}
