//! Game state and level flow
//!
//! `GameState` is the whole session: grid, player, chain, progress and
//! timers all live here and are rebuilt on every level change.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Chain, Direction, Entity, EntityKind};
use super::grid::{Grid, Tile};
use super::hazard::HazardScheduler;
use crate::consts::{FAILBOX, HEART, MAILBOX};
use crate::levels::{Level, LevelBook};
use crate::settings::Settings;

/// Where the player starts every level
pub const START_CELL: IVec2 = IVec2::ZERO;

/// Current phase of the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Hit a hazard; input frozen until the level restarts
    Failed { remaining: f32 },
    /// Mail delivered; input frozen until the next level loads
    Completed { remaining: f32 },
}

impl GamePhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32, message: String },
    LetterCollected { letter: char, completed: String },
    /// Every letter collected; the mailbox is waiting
    WordCompleted { message: String },
    HazardArmed { letter: char },
    LevelFailed { level: u32 },
    LevelCompleted { level: u32 },
    QuitRequested { level: u32 },
}

/// Word progress for the current level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Letters still to collect, in order
    pub target: Vec<char>,
    /// Letters collected so far, in order
    pub completed: String,
}

impl Progress {
    pub fn new(message: &[char]) -> Self {
        Self {
            target: message.to_vec(),
            completed: String::new(),
        }
    }

    /// The next letter to collect
    pub fn next_letter(&self) -> Option<char> {
        self.target.first().copied()
    }

    /// Record the next letter as collected
    pub fn collect(&mut self) -> Option<char> {
        if self.target.is_empty() {
            return None;
        }
        let letter = self.target.remove(0);
        self.completed.push(letter);
        Some(letter)
    }
}

/// Top-of-screen indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    None,
    /// Word complete, carry the mail home
    Mailbox,
    /// Lethal collision
    Failbox,
}

impl Signal {
    pub fn glyph(&self) -> &'static str {
        match self {
            Signal::None => "",
            Signal::Mailbox => MAILBOX,
            Signal::Failbox => FAILBOX,
        }
    }
}

/// Render view of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    /// Grid-aligned draw position
    pub cell: IVec2,
    pub direction: Direction,
    pub glyph: Option<char>,
}

impl EntityView {
    fn of(entity: &Entity, settings: &Settings) -> Self {
        Self {
            cell: entity.cell(settings),
            direction: entity.direction,
            glyph: entity.glyph(),
        }
    }
}

/// Read-only copy of everything the renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub title: String,
    pub target: String,
    pub completed: String,
    /// Tiles that carry something
    pub tiles: Vec<Tile>,
    pub player: EntityView,
    pub lives: u8,
    pub animation: u32,
    /// Visible segments (the head is not drawn)
    pub segments: Vec<EntityView>,
    pub signal: Signal,
}

impl Snapshot {
    /// Lives as a row of hearts
    pub fn lives_text(&self) -> String {
        HEART.repeat(self.lives as usize)
    }
}

/// Complete game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub levels: LevelBook,
    /// Level counter
    pub level_number: u32,
    pub level: Level,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: Entity,
    /// Head tracker and trailing segments
    pub chain: Chain,
    pub progress: Progress,
    /// Cell of the tile under the player
    pub active_tile: Option<IVec2>,
    pub hazards: HazardScheduler,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session and load the first level
    pub fn new(settings: Settings, levels: LevelBook) -> Self {
        let player = Entity::player(settings.starting_lives, START_CELL);
        let level = levels.level(1);
        let mut state = Self {
            settings,
            levels,
            level_number: 0,
            level,
            phase: GamePhase::Playing,
            grid: Grid::new(),
            player,
            chain: Chain::new(),
            progress: Progress::default(),
            active_tile: None,
            hazards: HazardScheduler::new(),
            time_ticks: 0,
            events: Vec::new(),
        };
        state.new_level();
        state
    }

    pub fn next_level(&mut self) {
        self.level_number += 1;
    }

    pub fn lose_level(&mut self) {
        self.level_number = self.level_number.saturating_sub(1);
    }

    /// Advance the level counter and rebuild the level from its data
    pub fn new_level(&mut self) {
        self.next_level();
        self.level = self.levels.level(self.level_number);
        self.progress = Progress::new(&self.level.message);

        self.chain.truncate_for_new_level();
        if self.chain.is_empty() {
            self.chain.create(EntityKind::Head, START_CELL, Direction::None);
        }
        self.chain.rehome(START_CELL);

        self.grid.populate(&self.level.text, &self.settings);
        self.player.rehome(START_CELL, Direction::None);
        self.active_tile = self.grid.tile_at(START_CELL.x, START_CELL.y).map(|t| t.pos);
        self.hazards.reset();
        self.grid.mark_edible(self.progress.next_letter());
        self.phase = GamePhase::Playing;

        let message = self.level.message_string();
        log::info!("Level {}: collect {:?}", self.level_number, message);
        self.events.push(GameEvent::LevelStarted {
            level: self.level_number,
            message,
        });
    }

    /// Replay after a lethal collision
    pub fn restart_level(&mut self) {
        self.lose_level();
        self.new_level();
    }

    /// Path samples kept per entity, and the chain's size limit
    pub fn path_len(&self) -> usize {
        self.level.message.len() + 1
    }

    pub fn active_tile(&self) -> Option<&Tile> {
        self.active_tile.and_then(|pos| self.grid.tile_at(pos.x, pos.y))
    }

    pub fn is_word_complete(&self) -> bool {
        self.progress.completed == self.level.message_string()
    }

    /// True if the player stands on the mailbox
    pub fn at_goal(&self) -> bool {
        self.active_tile()
            .is_some_and(|tile| self.settings.is_goal(tile.x(), tile.y()))
    }

    /// Turn the player, unless off screen or doing a U-turn
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !self.player.within_bounds(&self.settings) || direction.reverses(self.player.direction) {
            return false;
        }
        self.player.move_in(direction, &self.settings);
        true
    }

    /// Player and chain re-apply their directions
    pub fn move_all(&mut self) {
        self.player.keep_moving(&self.settings);
        self.chain.move_all(&self.settings);
    }

    /// Stop every moving entity
    pub fn stop_all(&mut self) {
        self.player.move_in(Direction::None, &self.settings);
        self.chain.stop_all(&self.settings);
    }

    /// Record positions and pull every chain member one step along
    pub fn propagate_chain(&mut self) {
        let path_len = self.path_len();
        self.player.record(&self.settings, path_len);
        if let Some(leader) = self.player.last_sample() {
            self.chain.propagate(leader, &self.settings, path_len);
        }
    }

    /// Collect the active tile if it holds the next letter
    pub fn collect_active_tile(&mut self) -> Option<char> {
        let pos = self.active_tile?;
        let tile = self.grid.tile_at_mut(pos.x, pos.y)?;
        if !tile.is_edible {
            return None;
        }
        let letter = tile.contents.take()?;
        self.grid.remove_character_from_pool(letter);
        self.grid.mark_edible(None);

        let capacity = self.path_len();
        self.chain.grow(letter, capacity);
        self.progress.collect();
        self.events.push(GameEvent::LetterCollected {
            letter,
            completed: self.progress.completed.clone(),
        });
        if self.progress.target.is_empty() {
            self.events.push(GameEvent::WordCompleted {
                message: self.level.message_string(),
            });
        }
        Some(letter)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        let signal = match self.phase {
            GamePhase::Failed { .. } => Signal::Failbox,
            _ if self.is_word_complete() => Signal::Mailbox,
            _ => Signal::None,
        };
        let message = self.level.message_string();
        Snapshot {
            level: self.level_number,
            title: format!("Collect '{}'", message),
            target: self.progress.target.iter().collect(),
            completed: self.progress.completed.clone(),
            tiles: self
                .grid
                .tiles()
                .iter()
                .filter(|t| !t.is_empty())
                .cloned()
                .collect(),
            player: EntityView::of(&self.player, &self.settings),
            lives: self.player.lives().unwrap_or(0),
            animation: match self.player.kind {
                EntityKind::Player { animation, .. } => animation,
                _ => 0,
            },
            segments: self
                .chain
                .segments()
                .map(|e| EntityView::of(e, &self.settings))
                .collect(),
            signal,
        }
    }
}
