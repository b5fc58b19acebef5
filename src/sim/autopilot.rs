//! Demo autopilot
//!
//! Plays the game greedily: chase the nearest edible letter, then head for
//! the mailbox. Never steps onto an armed tile if another turn is free.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::collide;
use super::entity::Direction;
use super::state::GameState;
use super::tick::TickInput;

const TURNS: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Seeded input generator
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Where the player should go next
    fn destination(state: &GameState, from: IVec2) -> Option<IVec2> {
        if state.is_word_complete() {
            let settings = &state.settings;
            return Some(IVec2::new(settings.tile_size, settings.goal_row()));
        }
        state
            .grid
            .tiles()
            .iter()
            .filter(|tile| tile.is_edible)
            .map(|tile| tile.pos)
            .min_by_key(|pos| manhattan(*pos, from))
    }

    /// Choose this tick's input
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if !state.phase.is_playing() {
            return TickInput::default();
        }

        let settings = &state.settings;
        let here = state.player.cell(settings);
        let current = state.player.direction;
        let Some(goal) = Self::destination(state, here) else {
            return TickInput::default();
        };

        let safe: Vec<(Direction, i32)> = TURNS
            .iter()
            .copied()
            .filter(|turn| !turn.reverses(current))
            .filter_map(|turn| {
                let next = here + turn.offset() * settings.tile_size;
                let tile = state.grid.tile_at(next.x, next.y)?;
                (!collide(tile, &state.player)).then_some((turn, manhattan(next, goal)))
            })
            .collect();

        let Some(best) = safe.iter().map(|(_, distance)| *distance).min() else {
            return TickInput::default();
        };
        let options: Vec<Direction> = safe
            .into_iter()
            .filter(|(_, distance)| *distance == best)
            .map(|(turn, _)| turn)
            .collect();
        let choice = options[self.rng.random_range(0..options.len())];

        TickInput {
            direction: Some(choice),
            ..Default::default()
        }
    }
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a - b).abs().element_sum()
}
