//! Animated spinner for the loading state.

use std::time::{Duration, Instant};

/// Spinner animation frames - braille pattern spinner
pub const SPINNER_BRAILLE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const FRAME_DURATION: Duration = Duration::from_millis(80);

pub struct Spinner {
    current_frame: usize,
    last_update: Instant,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            current_frame: 0,
            last_update: Instant::now(),
        }
    }

    /// Advance the animation if enough time has passed and return the
    /// frame to draw.
    pub fn tick(&mut self) -> char {
        if self.last_update.elapsed() >= FRAME_DURATION {
            self.current_frame = (self.current_frame + 1) % SPINNER_BRAILLE.len();
            self.last_update = Instant::now();
        }
        SPINNER_BRAILLE[self.current_frame]
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}
