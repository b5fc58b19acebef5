//! Tile grid and letter pool
//!
//! The grid covers the whole window in row-major order. Only writable
//! cells (every third row, inside the margins) carry letters, and the
//! letter pool mirrors the uncollected letters still on the board.

use std::collections::HashMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Grid-aligned pixel coordinates
    pub pos: IVec2,
    /// Letter on the tile (`None` once collected or never written)
    pub contents: Option<char>,
    /// Holds the next letter the player needs
    pub is_edible: bool,
    /// Kills the player on contact
    pub is_deadly: bool,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            contents: None,
            is_edible: false,
            is_deadly: false,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    /// True if the tile carries nothing at all
    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// True if the tile carries a space
    pub fn is_blank(&self) -> bool {
        self.contents == Some(' ')
    }

    /// True if the tile carries a visible letter
    pub fn has_letter(&self) -> bool {
        matches!(self.contents, Some(c) if c != ' ')
    }
}

/// The play surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<Tile>,
    /// Multiset of uncollected letters, in placement order
    pool: Vec<char>,
    columns: usize,
    tile_size: i32,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the window with tiles, writing `text` onto the writable cells
    pub fn populate(&mut self, text: &str, settings: &Settings) {
        self.tiles.clear();
        self.pool.clear();

        let tile = settings.tile_size.max(1);
        let step = tile as usize;
        self.tile_size = tile;
        self.columns = (0..=settings.window_width).step_by(step).count();

        let mut letters = text.chars().flat_map(char::to_lowercase);
        for y in (0..=settings.window_height).step_by(step) {
            for x in (0..=settings.window_width).step_by(step) {
                let mut tile = Tile::new(x, y);
                if settings.is_writable(x, y) {
                    if let Some(c) = letters.next() {
                        self.pool.push(c);
                        tile.contents = Some(c);
                    }
                }
                self.tiles.push(tile);
            }
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// The uncollected letters, in placement order
    pub fn pool(&self) -> &[char] {
        &self.pool
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.tile_size <= 0 || x < 0 || y < 0 {
            return None;
        }
        if x % self.tile_size != 0 || y % self.tile_size != 0 {
            return None;
        }
        let column = (x / self.tile_size) as usize;
        let row = (y / self.tile_size) as usize;
        if column >= self.columns {
            return None;
        }
        let index = row * self.columns + column;
        (index < self.tiles.len()).then_some(index)
    }

    /// Tile at exactly these coordinates
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        let index = self.index_of(x, y)?;
        self.tiles.get(index)
    }

    pub fn tile_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let index = self.index_of(x, y)?;
        self.tiles.get_mut(index)
    }

    /// The letter pool, rarest letters first.
    ///
    /// Duplicates are kept; letters of equal frequency stay in pool order.
    pub fn characters(&self) -> Vec<char> {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for &c in &self.pool {
            *counts.entry(c).or_default() += 1;
        }
        let mut sorted = self.pool.clone();
        sorted.sort_by_key(|c| counts[c]);
        sorted
    }

    /// Remove one occurrence of `c` from the pool.
    ///
    /// Returns false (and changes nothing) if `c` is not in the pool.
    pub fn remove_character_from_pool(&mut self, c: char) -> bool {
        match self.pool.iter().position(|&p| p == c) {
            Some(index) => {
                self.pool.remove(index);
                true
            }
            None => {
                log::debug!("Letter {:?} is not in the pool", c);
                false
            }
        }
    }

    /// Make `c` the only edible letter (`None` clears every flag)
    pub fn mark_edible(&mut self, c: Option<char>) {
        for tile in &mut self.tiles {
            tile.is_edible = c.is_some() && tile.contents == c;
        }
    }

    /// Arm every tile holding `c`. Returns how many tiles were armed.
    pub fn mark_deadly(&mut self, c: char) -> usize {
        let mut armed = 0;
        for tile in self.tiles.iter_mut().filter(|t| t.contents == Some(c)) {
            tile.is_deadly = true;
            armed += 1;
        }
        armed
    }

    /// Number of cells the current settings allow letters on
    pub fn writable_count(settings: &Settings) -> usize {
        let step = settings.tile_size.max(1) as usize;
        (0..=settings.window_height)
            .step_by(step)
            .flat_map(|y| {
                (0..=settings.window_width)
                    .step_by(step)
                    .filter(move |&x| settings.is_writable(x, y))
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn populated(text: &str) -> (Grid, Settings) {
        let settings = Settings::default();
        let mut grid = Grid::new();
        grid.populate(text, &settings);
        (grid, settings)
    }

    fn tile_letters(grid: &Grid) -> Vec<char> {
        let mut letters: Vec<char> = grid.tiles().iter().filter_map(|t| t.contents).collect();
        letters.sort_unstable();
        letters
    }

    fn pool_sorted(grid: &Grid) -> Vec<char> {
        let mut pool = grid.pool().to_vec();
        pool.sort_unstable();
        pool
    }

    #[test]
    fn test_populate_covers_window() {
        let (grid, settings) = populated("abc");
        // 41 columns (0..=1280) by 23 rows (0..=704)
        assert_eq!(grid.tiles().len(), 41 * 23);
        assert_eq!(Grid::writable_count(&settings), 204);
        assert!(grid.tile_at(0, 0).is_some());
        assert!(grid.tile_at(1280, 704).is_some());
    }

    #[test]
    fn test_populate_writes_in_reading_order() {
        let (grid, _) = populated("CtA");
        // First writable row is y=96, first column x=96
        assert_eq!(grid.tile_at(96, 96).unwrap().contents, Some('c'));
        assert_eq!(grid.tile_at(128, 96).unwrap().contents, Some('t'));
        assert_eq!(grid.tile_at(160, 96).unwrap().contents, Some('a'));
        assert_eq!(grid.tile_at(192, 96).unwrap().contents, None);
        assert_eq!(grid.pool(), &['c', 't', 'a']);
    }

    #[test]
    fn test_full_text_fills_every_writable_tile() {
        let settings = Settings::default();
        let text: String = "abcdefghij".chars().cycle().take(204).collect();
        let mut grid = Grid::new();
        grid.populate(&text, &settings);

        let written = grid.tiles().iter().filter(|t| !t.is_empty()).count();
        assert_eq!(written, text.len());
        for tile in grid.tiles() {
            if !settings.is_writable(tile.x(), tile.y()) {
                assert!(tile.is_empty(), "non-writable tile {:?} has contents", tile.pos);
            }
        }
    }

    #[test]
    fn test_populate_clears_previous_level() {
        let (mut grid, settings) = populated("zzz");
        grid.populate("ab", &settings);
        assert_eq!(grid.pool(), &['a', 'b']);
        assert_eq!(grid.tiles().iter().filter(|t| !t.is_empty()).count(), 2);
    }

    #[test]
    fn test_tile_at_off_grid() {
        let (grid, _) = populated("abc");
        assert!(grid.tile_at(-32, 0).is_none());
        assert!(grid.tile_at(0, 736).is_none());
        assert!(grid.tile_at(1312, 0).is_none());
        assert!(grid.tile_at(5, 0).is_none());
    }

    #[test]
    fn test_characters_rarest_first() {
        let (grid, _) = populated("aabbbcd");
        assert_eq!(grid.characters(), vec!['c', 'd', 'a', 'a', 'b', 'b', 'b']);
    }

    #[test]
    fn test_remove_character_removes_exactly_one() {
        let (mut grid, _) = populated("abab");
        assert!(grid.remove_character_from_pool('a'));
        assert_eq!(grid.pool(), &['b', 'a', 'b']);
        assert!(!grid.remove_character_from_pool('z'));
        assert_eq!(grid.pool().len(), 3);
    }

    #[test]
    fn test_mark_edible_is_exclusive() {
        let (mut grid, _) = populated("abca");
        grid.mark_edible(Some('a'));
        assert_eq!(grid.tiles().iter().filter(|t| t.is_edible).count(), 2);
        grid.mark_edible(Some('b'));
        let edible: Vec<_> = grid.tiles().iter().filter(|t| t.is_edible).collect();
        assert_eq!(edible.len(), 1);
        assert_eq!(edible[0].contents, Some('b'));
        grid.mark_edible(None);
        assert!(grid.tiles().iter().all(|t| !t.is_edible));
    }

    #[test]
    fn test_blank_is_not_a_letter() {
        let (grid, _) = populated("a b");
        let blank = grid.tile_at(128, 96).unwrap();
        assert!(blank.is_blank());
        assert!(!blank.has_letter());
        assert!(!blank.is_empty());
        assert_eq!(grid.pool(), &['a', ' ', 'b']);
    }

    proptest! {
        #[test]
        fn prop_pool_mirrors_tiles(
            text in "[a-e ]{0,240}",
            removals in proptest::collection::vec(0usize..240, 0..40),
        ) {
            let settings = Settings::default();
            let mut grid = Grid::new();
            grid.populate(&text, &settings);
            prop_assert_eq!(tile_letters(&grid), pool_sorted(&grid));
            prop_assert_eq!(grid.pool().len(), text.len().min(204));

            // Collect tiles the way the game does: clear contents, drop from pool
            for index in removals {
                let len = grid.tiles().len();
                let tile = &mut grid.tiles_mut()[index % len];
                if let Some(c) = tile.contents.take() {
                    prop_assert!(grid.remove_character_from_pool(c));
                }
                prop_assert_eq!(tile_letters(&grid), pool_sorted(&grid));
            }
        }
    }
}
