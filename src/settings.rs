//! Game settings and tuning constants
//!
//! Read-only for the simulation. Loaded from an optional JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{floor_to, round_to};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    /// Play area width in pixels
    pub window_width: i32,
    /// Play area height in pixels
    pub window_height: i32,
    /// Milliseconds between simulation ticks
    pub update_interval_ms: u32,

    // === Grid ===
    /// Side length of a square tile in pixels
    pub tile_size: i32,
    pub margin_left: i32,
    pub margin_right: i32,
    pub margin_top: i32,
    pub margin_bottom: i32,
    /// Every n-th row carries letters
    pub row_stride: i32,

    // === Movement ===
    /// Fraction of a tile moved per step
    pub speed: f32,

    // === Hazards ===
    /// Numerator of the hazard interval (seconds)
    pub hazard_base_secs: u32,
    /// Levels per extra second of hazard interval
    pub hazard_level_divisor: u32,

    // === Level flow ===
    /// Freeze after a lethal collision (seconds)
    pub failure_pause_secs: f32,
    /// Freeze after delivering a completed word (seconds)
    pub completion_pause_secs: f32,
    pub starting_lives: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            update_interval_ms: 60,

            tile_size: 32,
            margin_left: 96,
            margin_right: 1184,
            margin_top: 64,
            margin_bottom: 624,
            row_stride: 3,

            speed: 0.3,

            hazard_base_secs: 10,
            hazard_level_divisor: 3,

            failure_pause_secs: 3.0,
            completion_pause_secs: 2.0,
            starting_lives: 3,
        }
    }
}

impl Settings {
    /// Simulation timestep in seconds
    pub fn tick_seconds(&self) -> f32 {
        self.update_interval_ms as f32 / 1000.0
    }

    /// Seconds between hazard activations on `level`.
    ///
    /// Integer arithmetic: `base / level + level / divisor`. Level 0 is
    /// treated as level 1.
    pub fn hazard_interval(&self, level: u32) -> f32 {
        let level = level.max(1);
        let divisor = self.hazard_level_divisor.max(1);
        (self.hazard_base_secs / level + level / divisor) as f32
    }

    /// Horizontal distance covered by one move
    pub fn step_x(&self) -> f32 {
        (self.tile_size as f32 * self.speed) % self.window_width as f32
    }

    /// Vertical distance covered by one move
    pub fn step_y(&self) -> f32 {
        (self.tile_size as f32 * self.speed) % self.window_height as f32
    }

    /// Rightmost grid-aligned x coordinate
    pub fn max_x(&self) -> i32 {
        floor_to(self.window_width, self.tile_size)
    }

    /// Bottom-most grid-aligned y coordinate
    pub fn max_y(&self) -> i32 {
        floor_to(self.window_height, self.tile_size)
    }

    /// True if a cell may carry a level letter
    pub fn is_writable(&self, x: i32, y: i32) -> bool {
        let stride = self.row_stride.max(1);
        (y / self.tile_size.max(1)) % stride == 0
            && x >= self.margin_left
            && x < self.margin_right
            && y >= self.margin_top
            && y < self.margin_bottom
    }

    /// Row the mailbox sits on
    pub fn goal_row(&self) -> i32 {
        round_to(self.margin_bottom as f32, self.tile_size)
    }

    /// True if a grid cell is the mailbox
    pub fn is_goal(&self, x: i32, y: i32) -> bool {
        y == self.goal_row() && (self.tile_size..=self.tile_size * 2).contains(&x)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
