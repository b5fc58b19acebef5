//! Brave Octothorpe - A letter-collecting snake game on a fixed grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, entity chain, hazards, level flow)
//! - `levels`: Level book loading and lookup
//! - `settings`: Data-driven game configuration

pub mod levels;
pub mod settings;
pub mod sim;

pub use levels::{Level, LevelBook, LevelError};
pub use settings::Settings;

/// Fixed strings shown by the presentation layer
pub mod consts {
    /// Window caption
    pub const TITLE: &str = "Brave Octothorpe";
    /// Shown once the word is complete (deliver the mail!)
    pub const MAILBOX: &str = ":D";
    /// Shown after a lethal collision
    pub const FAILBOX: &str = ">:#";
    /// Life marker
    pub const HEART: &str = "<3";
}

/// Round a coordinate to the nearest multiple of `step` (halves away from zero)
#[inline]
pub fn round_to(value: f32, step: i32) -> i32 {
    let step = step.max(1);
    (value / step as f32).round() as i32 * step
}

/// Floor a dimension to a multiple of `step`
#[inline]
pub fn floor_to(value: i32, step: i32) -> i32 {
    let step = step.max(1);
    value.div_euclid(step) * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_nearest_tile() {
        assert_eq!(round_to(8.6, 32), 0);
        assert_eq!(round_to(17.2, 32), 32);
        assert_eq!(round_to(16.0, 32), 32);
        assert_eq!(round_to(624.0, 32), 640);
        assert_eq!(round_to(-10.0, 32), 0);
        assert_eq!(round_to(-20.0, 32), -32);
    }

    #[test]
    fn test_floor_to_tile() {
        assert_eq!(floor_to(720, 32), 704);
        assert_eq!(floor_to(1280, 32), 1280);
        assert_eq!(floor_to(31, 32), 0);
    }
}
