//! Moving entities: the player, the invisible head, and trailing segments
//!
//! Every entity keeps a path of grid-snapped samples. Once per tick each
//! chain member records where it is and then takes over the latest sample
//! of the member ahead of it, so followers trail one tick behind.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::round_to;
use crate::settings::Settings;

/// Travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The direction pointing the other way (`None` stays `None`)
    pub fn opposite(self) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// True if turning from `current` to `self` would be a U-turn
    pub fn reverses(self, current: Direction) -> bool {
        self != Direction::None && self == current.opposite()
    }

    /// Unit grid offset (y grows downward)
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::None => IVec2::ZERO,
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
        }
    }
}

/// One recorded path entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSample {
    pub pos: IVec2,
    pub direction: Direction,
}

/// What an entity is, and what it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controllable token
    Player {
        lives: u8,
        /// Ticks spent moving, for the renderer's sprite animation
        animation: u32,
    },
    /// Invisible tracker at the front of the chain
    Head,
    /// Collected letter trailing the player
    Segment { glyph: char },
}

/// A moving object on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Current position in pixels (not necessarily grid-aligned)
    pub pos: Vec2,
    pub direction: Direction,
    /// Recorded samples, oldest first
    pub path: VecDeque<PathSample>,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: IVec2, direction: Direction) -> Self {
        let mut path = VecDeque::new();
        path.push_back(PathSample { pos, direction });
        Self {
            kind,
            pos: pos.as_vec2(),
            direction,
            path,
        }
    }

    pub fn player(lives: u8, pos: IVec2) -> Self {
        Self::new(EntityKind::Player { lives, animation: 0 }, pos, Direction::None)
    }

    /// Glyph carried by a segment
    pub fn glyph(&self) -> Option<char> {
        match self.kind {
            EntityKind::Segment { glyph } => Some(glyph),
            _ => None,
        }
    }

    pub fn lives(&self) -> Option<u8> {
        match self.kind {
            EntityKind::Player { lives, .. } => Some(lives),
            _ => None,
        }
    }

    /// Set the direction and, unless it is `None`, advance one step.
    ///
    /// The step is continuous; snapping to the grid happens separately.
    pub fn move_in(&mut self, direction: Direction, settings: &Settings) {
        self.direction = direction;
        match direction {
            Direction::None => {}
            Direction::Left => self.pos.x -= settings.step_x(),
            Direction::Right => self.pos.x += settings.step_x(),
            Direction::Up => self.pos.y -= settings.step_y(),
            Direction::Down => self.pos.y += settings.step_y(),
        }
        if let EntityKind::Player { animation, .. } = &mut self.kind {
            if direction != Direction::None {
                *animation = animation.wrapping_add(1);
            }
        }
    }

    /// Re-apply the stored direction
    pub fn keep_moving(&mut self, settings: &Settings) {
        self.move_in(self.direction, settings);
    }

    /// Nearest grid cell
    pub fn cell(&self, settings: &Settings) -> IVec2 {
        IVec2::new(
            round_to(self.pos.x, settings.tile_size),
            round_to(self.pos.y, settings.tile_size),
        )
    }

    /// Align the position to the nearest grid cell
    pub fn snap(&mut self, settings: &Settings) {
        self.pos = self.cell(settings).as_vec2();
    }

    /// True if the entity is on screen
    pub fn within_bounds(&self, settings: &Settings) -> bool {
        self.pos.x >= 0.0
            && self.pos.x <= settings.max_x() as f32
            && self.pos.y >= 0.0
            && self.pos.y <= settings.max_y() as f32
    }

    /// Move to the opposite edge after leaving the screen
    pub fn wrap(&mut self, settings: &Settings) {
        let max_x = settings.max_x() as f32;
        let max_y = settings.max_y() as f32;
        if self.pos.x > max_x {
            self.pos.x = 0.0;
        }
        if self.pos.x < 0.0 {
            self.pos.x = max_x;
        }
        if self.pos.y > max_y {
            self.pos.y = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = max_y;
        }
    }

    /// Append the current snapped position, keeping at most `max_len` samples
    pub fn record(&mut self, settings: &Settings, max_len: usize) {
        let sample = PathSample {
            pos: self.cell(settings),
            direction: self.direction,
        };
        self.path.push_back(sample);
        while self.path.len() > max_len.max(1) {
            self.path.pop_front();
        }
    }

    pub fn last_sample(&self) -> Option<PathSample> {
        self.path.back().copied()
    }

    /// Take over a sample's position and direction
    pub fn follow(&mut self, sample: PathSample) {
        self.pos = sample.pos.as_vec2();
        self.direction = sample.direction;
    }

    /// Restart at `pos` with a fresh single-sample path
    pub fn rehome(&mut self, pos: IVec2, direction: Direction) {
        self.pos = pos.as_vec2();
        self.direction = direction;
        self.path.clear();
        self.path.push_back(PathSample { pos, direction });
    }
}

/// The head tracker followed by collected segments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chain {
    members: Vec<Entity>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member
    pub fn create(&mut self, kind: EntityKind, pos: IVec2, direction: Direction) {
        self.members.push(Entity::new(kind, pos, direction));
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn head(&self) -> Option<&Entity> {
        self.members.first()
    }

    pub fn tail(&self) -> Option<&Entity> {
        self.members.last()
    }

    /// Visible members behind the head
    pub fn segments(&self) -> impl Iterator<Item = &Entity> {
        self.members.iter().skip(1)
    }

    /// Every member re-applies its own direction
    pub fn move_all(&mut self, settings: &Settings) {
        for member in &mut self.members {
            member.keep_moving(settings);
        }
    }

    /// Stop every member
    pub fn stop_all(&mut self, settings: &Settings) {
        for member in &mut self.members {
            member.move_in(Direction::None, settings);
        }
    }

    /// Advance the chain by one tick.
    ///
    /// Each member records its snapped position, then takes the latest
    /// sample of the member ahead of it. The head follows `leader`.
    pub fn propagate(&mut self, leader: PathSample, settings: &Settings, max_path: usize) {
        for index in 0..self.members.len() {
            self.members[index].record(settings, max_path);
            let lead = if index == 0 {
                Some(leader)
            } else {
                self.members[index - 1].last_sample()
            };
            if let Some(lead) = lead {
                self.members[index].follow(lead);
            }
        }
    }

    /// Append a segment at the tail's latest sample.
    ///
    /// At `capacity` the glyph behind the head is dropped instead: glyphs
    /// shift one slot forward and the tail takes the new one. Every member
    /// keeps its position, so the trail never skips a cell.
    pub fn grow(&mut self, glyph: char, capacity: usize) {
        let Some(at) = self.tail().and_then(Entity::last_sample) else {
            return;
        };
        let len = self.members.len();
        if len >= capacity.max(2) {
            for index in 1..len - 1 {
                self.members[index].kind = self.members[index + 1].kind;
            }
            self.members[len - 1].kind = EntityKind::Segment { glyph };
            return;
        }
        self.create(EntityKind::Segment { glyph }, at.pos, at.direction);
    }

    /// Drop everything past the head and one carried segment
    pub fn truncate_for_new_level(&mut self) {
        self.members.truncate(2);
    }

    /// Restart every member at `pos`
    pub fn rehome(&mut self, pos: IVec2) {
        for member in &mut self.members {
            member.rehome(pos, Direction::None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_direction_reversal() {
        assert!(Direction::Left.reverses(Direction::Right));
        assert!(Direction::Up.reverses(Direction::Down));
        assert!(!Direction::Left.reverses(Direction::Up));
        assert!(!Direction::Left.reverses(Direction::Left));
        assert!(!Direction::None.reverses(Direction::None));
        assert!(!Direction::Left.reverses(Direction::None));
    }

    #[test]
    fn test_move_is_continuous() {
        let settings = settings();
        let mut entity = Entity::player(3, IVec2::new(64, 64));
        entity.move_in(Direction::Right, &settings);
        assert!((entity.pos.x - 73.6).abs() < 0.001);
        assert_eq!(entity.cell(&settings), IVec2::new(64, 64));

        // A second step crosses the half-tile mark
        entity.keep_moving(&settings);
        assert_eq!(entity.cell(&settings), IVec2::new(96, 64));
        entity.snap(&settings);
        assert_eq!(entity.pos, Vec2::new(96.0, 64.0));
    }

    #[test]
    fn test_move_none_keeps_position() {
        let settings = settings();
        let mut entity = Entity::player(3, IVec2::new(64, 64));
        entity.move_in(Direction::Down, &settings);
        let pos = entity.pos;
        entity.move_in(Direction::None, &settings);
        assert_eq!(entity.pos, pos);
        assert_eq!(entity.direction, Direction::None);
    }

    #[test]
    fn test_wrap_edges() {
        let settings = settings();
        let mut entity = Entity::player(3, IVec2::ZERO);
        entity.pos = Vec2::new(-5.0, 710.0);
        assert!(!entity.within_bounds(&settings));
        entity.wrap(&settings);
        assert_eq!(entity.pos, Vec2::new(1280.0, 0.0));
        assert!(entity.within_bounds(&settings));
    }

    #[test]
    fn test_record_trims_oldest() {
        let settings = settings();
        let mut entity = Entity::new(EntityKind::Head, IVec2::ZERO, Direction::None);
        for x in 1..=5 {
            entity.pos = Vec2::new(x as f32 * 32.0, 0.0);
            entity.record(&settings, 3);
        }
        let xs: Vec<i32> = entity.path.iter().map(|s| s.pos.x).collect();
        assert_eq!(xs, vec![96, 128, 160]);
    }

    #[test]
    fn test_followers_trail_one_tick_behind() {
        let settings = settings();
        let mut chain = Chain::new();
        chain.create(EntityKind::Head, IVec2::ZERO, Direction::None);
        chain.create(EntityKind::Segment { glyph: 'a' }, IVec2::ZERO, Direction::None);
        chain.create(EntityKind::Segment { glyph: 'b' }, IVec2::ZERO, Direction::None);

        let mut history: Vec<Vec<IVec2>> = Vec::new();
        for step in 1..=6 {
            let leader = PathSample {
                pos: IVec2::new(step * 32, 0),
                direction: Direction::Right,
            };
            chain.propagate(leader, &settings, 10);
            history.push(chain.members().iter().map(|m| m.cell(&settings)).collect());
        }

        for t in 1..history.len() {
            for i in 1..chain.len() {
                assert_eq!(history[t][i], history[t - 1][i - 1], "tick {} member {}", t, i);
            }
        }
        assert_eq!(history[5][0], IVec2::new(192, 0));
        assert_eq!(history[5][2], IVec2::new(128, 0));
    }

    #[test]
    fn test_grow_appends_at_tail_sample() {
        let mut chain = Chain::new();
        chain.create(EntityKind::Head, IVec2::new(32, 32), Direction::Left);
        chain.grow('c', 4);
        assert_eq!(chain.len(), 2);
        let tail = chain.tail().unwrap();
        assert_eq!(tail.glyph(), Some('c'));
        assert_eq!(tail.pos, Vec2::new(32.0, 32.0));
        assert_eq!(tail.direction, Direction::Left);
    }

    #[test]
    fn test_grow_respects_capacity() {
        let mut chain = Chain::new();
        chain.create(EntityKind::Head, IVec2::ZERO, Direction::None);
        for glyph in ['s', 'a', 'b', 'c'] {
            chain.grow(glyph, 4);
        }
        assert_eq!(chain.len(), 4);
        let glyphs: Vec<char> = chain.segments().filter_map(Entity::glyph).collect();
        assert_eq!(glyphs, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_grow_at_capacity_keeps_trail_in_step() {
        let settings = settings();
        let mut chain = Chain::new();
        chain.create(EntityKind::Head, IVec2::ZERO, Direction::None);
        chain.grow('s', 4);
        chain.grow('a', 4);
        chain.grow('b', 4);

        let mut previous: Vec<IVec2> = Vec::new();
        for step in 1..=8 {
            let leader = PathSample {
                pos: IVec2::new(step * 32, 0),
                direction: Direction::Right,
            };
            chain.propagate(leader, &settings, 4);
            if step == 5 {
                chain.grow('c', 4);
                assert_eq!(chain.len(), 4);
            }
            let cells: Vec<IVec2> = chain.members().iter().map(|m| m.cell(&settings)).collect();
            if !previous.is_empty() {
                for i in 1..cells.len() {
                    assert_eq!(cells[i], previous[i - 1], "tick {} member {}", step, i);
                }
            }
            previous = cells;
        }

        let glyphs: Vec<char> = chain.segments().filter_map(Entity::glyph).collect();
        assert_eq!(glyphs, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_grow_on_empty_chain_is_noop() {
        let mut chain = Chain::new();
        chain.grow('x', 4);
        assert!(chain.is_empty());
        assert!(chain.head().is_none());
    }

    #[test]
    fn test_truncate_keeps_two() {
        let mut chain = Chain::new();
        chain.create(EntityKind::Head, IVec2::ZERO, Direction::None);
        for glyph in ['a', 'b', 'c'] {
            chain.grow(glyph, 10);
        }
        chain.truncate_for_new_level();
        assert_eq!(chain.len(), 2);
        chain.rehome(IVec2::new(64, 0));
        assert!(chain.members().iter().all(|m| m.path.len() == 1));
        assert!(chain.members().iter().all(|m| m.pos == Vec2::new(64.0, 0.0)));
    }
}
