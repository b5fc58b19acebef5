//! Hazard scheduling
//!
//! While the player moves, one letter class is armed per interval. The
//! rarest letter that is not needed for the word (and not already armed)
//! goes first. Armed letters stay deadly until the level ends.

use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// Countdown between hazard activations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardScheduler {
    /// Seconds since the last activation (or level start)
    elapsed: f32,
}

impl HazardScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Let time pass. Runs every tick, moving or not.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Arm a letter if the interval has passed and the player is moving.
    ///
    /// The timer resets whenever an activation is attempted, even when no
    /// letter was eligible. Returns the armed letter.
    pub fn update(
        &mut self,
        grid: &mut Grid,
        target: &[char],
        moving: bool,
        interval: f32,
    ) -> Option<char> {
        if !moving || self.elapsed <= interval {
            return None;
        }
        self.reset();
        let letter = select_hazard(grid, target)?;
        let armed = grid.mark_deadly(letter);
        log::debug!("Hazard armed: {:?} on {} tiles", letter, armed);
        Some(letter)
    }
}

/// The rarest letter on the board that may become a hazard.
///
/// Eligible letters are on a tile that is not yet deadly, are visible (not
/// blank), and are not among the remaining `target` letters.
pub fn select_hazard(grid: &Grid, target: &[char]) -> Option<char> {
    let eligible: Vec<char> = grid
        .tiles()
        .iter()
        .filter(|tile| tile.has_letter() && !tile.is_deadly)
        .filter_map(|tile| tile.contents)
        .filter(|c| !target.contains(c))
        .collect();

    grid.characters()
        .into_iter()
        .find(|c| eligible.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn grid_with(text: &str) -> Grid {
        let mut grid = Grid::new();
        grid.populate(text, &Settings::default());
        grid
    }

    #[test]
    fn test_rarest_irrelevant_letter_first() {
        // pool: x1, y2, z3, c1
        let grid = grid_with("zyzxyzc");
        assert_eq!(select_hazard(&grid, &['c']), Some('x'));
    }

    #[test]
    fn test_target_letters_are_never_armed() {
        let grid = grid_with("catcat q");
        assert_eq!(select_hazard(&grid, &['c', 'a', 't']), Some('q'));
        assert_eq!(select_hazard(&grid, &['c', 'a', 't', 'q']), None);
    }

    #[test]
    fn test_blank_is_never_armed() {
        let grid = grid_with("a  a");
        assert_eq!(select_hazard(&grid, &[]), Some('a'));
        let grid = grid_with("   ");
        assert_eq!(select_hazard(&grid, &[]), None);
    }

    #[test]
    fn test_armed_letters_are_skipped() {
        let mut grid = grid_with("xyyzzz");
        grid.mark_deadly('x');
        assert_eq!(select_hazard(&grid, &[]), Some('y'));
    }

    #[test]
    fn test_update_waits_for_interval_and_movement() {
        let mut grid = grid_with("xyy");
        let mut scheduler = HazardScheduler::new();

        scheduler.advance(5.0);
        assert_eq!(scheduler.update(&mut grid, &[], true, 10.0), None);

        scheduler.advance(6.0);
        // Standing still never arms, and the timer keeps running
        assert_eq!(scheduler.update(&mut grid, &[], false, 10.0), None);
        assert_eq!(scheduler.elapsed(), 11.0);

        assert_eq!(scheduler.update(&mut grid, &[], true, 10.0), Some('x'));
        assert_eq!(scheduler.elapsed(), 0.0);
        assert!(grid.tile_at(96, 96).unwrap().is_deadly);
        assert!(!grid.tile_at(128, 96).unwrap().is_deadly);
    }

    #[test]
    fn test_update_resets_even_without_candidates() {
        let mut grid = grid_with("cat");
        let mut scheduler = HazardScheduler::new();
        scheduler.advance(11.0);
        assert_eq!(scheduler.update(&mut grid, &['c', 'a', 't'], true, 10.0), None);
        assert_eq!(scheduler.elapsed(), 0.0);
        assert!(grid.tiles().iter().all(|t| !t.is_deadly));
    }
}
