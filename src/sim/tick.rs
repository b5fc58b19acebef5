//! Fixed timestep simulation tick
//!
//! Advances the session by one step: collision, hazards, movement, chain
//! propagation, collection, then the completion check.

use serde::{Deserialize, Serialize};

use super::collision::collide;
use super::entity::Direction;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (already debounced)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Requested turn
    pub direction: Option<Direction>,
    /// Stop every moving entity
    pub stop_all: bool,
    /// Leave the game
    pub quit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.quit {
        log::info!("Quit requested on level {}", state.level_number);
        let level = state.level_number;
        state.push_event(GameEvent::QuitRequested { level });
        return;
    }

    state.time_ticks += 1;
    state.hazards.advance(dt);

    // Frozen after a death or a delivery: only the countdown runs
    match state.phase {
        GamePhase::Failed { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.restart_level();
            } else {
                state.phase = GamePhase::Failed { remaining };
            }
            return;
        }
        GamePhase::Completed { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.new_level();
            } else {
                state.phase = GamePhase::Completed { remaining };
            }
            return;
        }
        GamePhase::Playing => {}
    }

    // Lethal collision ends the attempt
    if state.active_tile().is_some_and(|tile| collide(tile, &state.player)) {
        state.player.move_in(Direction::None, &state.settings);
        state.phase = GamePhase::Failed {
            remaining: state.settings.failure_pause_secs,
        };
        log::info!("Level {} failed", state.level_number);
        let level = state.level_number;
        state.push_event(GameEvent::LevelFailed { level });
        return;
    }

    // Periodically arm the rarest irrelevant letter
    let moving = state.player.direction != Direction::None;
    let interval = state.settings.hazard_interval(state.level_number);
    if let Some(letter) = state
        .hazards
        .update(&mut state.grid, &state.progress.target, moving, interval)
    {
        state.push_event(GameEvent::HazardArmed { letter });
    }

    if state.player.within_bounds(&state.settings) {
        state.player.snap(&state.settings);
    }
    state.player.wrap(&state.settings);

    if input.stop_all {
        state.stop_all();
    }
    if let Some(direction) = input.direction {
        state.steer(direction);
    }

    state.player.keep_moving(&state.settings);
    state.move_all();

    if state.player.within_bounds(&state.settings) {
        let cell = state.player.cell(&state.settings);
        state.active_tile = state.grid.tile_at(cell.x, cell.y).map(|tile| tile.pos);
    }

    state.propagate_chain();

    state.collect_active_tile();
    state.grid.mark_edible(state.progress.next_letter());

    // Word done: deliver it to the mailbox to finish the level
    if state.is_word_complete() && state.at_goal() {
        state.player.move_in(Direction::None, &state.settings);
        state.phase = GamePhase::Completed {
            remaining: state.settings.completion_pause_secs,
        };
        log::info!("Level {} complete", state.level_number);
        let level = state.level_number;
        state.push_event(GameEvent::LevelCompleted { level });
    }
}
