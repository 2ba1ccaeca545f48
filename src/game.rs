//! The game as a `Scene`: owns the state and the RNG, and wires one frame of
//! `compute` to one frame of `display`.

use log::info;
use rand::Rng;

use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::display;
use crate::engine::{Canvas, Scene};
use crate::entities::{FrameInput, GameState};

pub struct Game<R: Rng> {
    state: GameState,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Self {
            state: init_state(config.window_width, config.window_height, config.fire_rate),
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

impl<R: Rng> Scene for Game<R> {
    fn init(&mut self) {
        self.state = init_state(self.state.width, self.state.height, self.state.fire_rate);
        info!(
            "game initialised: window {}x{}, fire rate {}/s",
            self.state.width, self.state.height, self.state.fire_rate
        );
    }

    fn update<C: Canvas>(&mut self, input: &FrameInput, canvas: &mut C) {
        if input.restart {
            info!("restart at frame {} with score {}", self.state.frame, self.state.score);
        }
        self.state = tick(&self.state, input, &mut self.rng);
        display::render(canvas, &self.state);
    }

    fn exit(&mut self) {
        info!(
            "game over after {} frames, final score {}",
            self.state.frame, self.state.score
        );
    }
}
