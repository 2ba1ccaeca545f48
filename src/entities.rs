//! All game entity types: pure data, no game rules.
//!
//! Positions are in logical window units (origin top-left, y grows down).

use glam::Vec2;

// ── Pool capacities ───────────────────────────────────────────────────────────

pub const MAX_BULLETS: usize = 10;
pub const MAX_ENEMIES: usize = 10;
pub const MAX_STARS: usize = 20;

// ── Fixed-capacity slot pool ──────────────────────────────────────────────────

/// A fixed array of slots; `Some` is an active entity, `None` a free slot.
///
/// Identity is the slot index.  Nothing is ever allocated after construction:
/// spawning overwrites the first free slot, and a full pool refuses the spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Pool<T, const N: usize> {
    slots: [Option<T>; N],
}

impl<T, const N: usize> Pool<T, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_active(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    /// Place `entity` in the first free slot.  Returns the slot index, or
    /// `None` when the pool is full (the entity is dropped).
    pub fn spawn(&mut self, entity: T) -> Option<usize> {
        let index = self.first_free()?;
        self.slots[index] = Some(entity);
        Some(index)
    }

    /// Place `entity` in a specific slot, overwriting whatever was there.
    /// An out-of-range index drops the entity.
    pub fn put(&mut self, index: usize, entity: T) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(entity);
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Deactivate a slot.  Clearing a free slot is a no-op.
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub fn clear_all(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Raw slot view, including free slots.
    pub fn slots(&self) -> &[Option<T>; N] {
        &self.slots
    }

    /// Active entities with their slot index, in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|e| (i, e)))
    }
}

impl<T, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Player & projectiles ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    /// Downward movement per frame.
    pub speed: f32,
}

// ── Background stars (decorative) ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Downward movement per frame.
    pub speed: f32,
    /// Degrees.
    pub rotation: f32,
    /// Degrees added per frame.
    pub rotation_speed: f32,
    /// Alpha, 0-255.
    pub transparency: u8,
    /// Scale factor; the drawn triangle spans 20 * size units.
    pub size: f32,
}

// ── Per-frame input ───────────────────────────────────────────────────────────

/// Everything the backend reports for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Pointer X in window units.
    pub pointer_x: f32,
    /// Pointer X movement since the previous frame.
    pub pointer_dx: f32,
    /// Fire button currently held.
    pub fire_held: bool,
    /// Restart was triggered this frame (edge, not level).
    pub restart: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

pub type BulletPool = Pool<Bullet, MAX_BULLETS>;
pub type EnemyPool = Pool<Enemy, MAX_ENEMIES>;
pub type StarPool = Pool<Star, MAX_STARS>;

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub bullets: BulletPool,
    pub enemies: EnemyPool,
    pub stars: StarPool,
    /// Signed: escaped enemies can push it below zero.
    pub score: i32,
    /// Seconds since the last shot.
    pub fire_cooldown: f32,
    /// Seconds since the last star spawn.
    pub star_timer: f32,
    /// Seconds since the last enemy spawn.
    pub enemy_timer: f32,
    /// Shots per second while fire is held.
    pub fire_rate: f32,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}
