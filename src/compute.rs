//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG and logging.

use glam::Vec2;
use log::{debug, trace};
use rand::Rng;

use crate::entities::{
    Bullet, BulletPool, Enemy, EnemyPool, FrameInput, GameState, Player, Star, StarPool,
};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Player X never gets closer than this to either window edge.
pub const EDGE_OFFSET: f32 = 35.0;
pub const PLAYER_START: Vec2 = Vec2::new(0.0, 500.0);

pub const BULLET_SPAWN_Y: f32 = 460.0;
/// Units per frame, upward.
pub const BULLET_SPEED: f32 = 10.0;

pub const ENEMY_SPAWN_INTERVAL: f32 = 0.5;
pub const ENEMY_SPAWN_Y: f32 = -10.0;
pub const ENEMY_SPAWN_MARGIN: f32 = 50.0;
pub const ENEMY_MIN_SPEED: f32 = 10.0;
pub const ENEMY_MAX_SPEED: f32 = 15.0;

pub const STAR_SPAWN_INTERVAL: f32 = 0.5;

/// A bullet and an enemy collide at or below this centre distance.
pub const HIT_RADIUS: f32 = 30.0;
pub const HIT_SCORE: i32 = 50;
pub const ESCAPE_PENALTY: i32 = -25;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a window of the given size.
pub fn init_state(width: f32, height: f32, fire_rate: f32) -> GameState {
    GameState {
        player: Player { pos: PLAYER_START },
        bullets: BulletPool::new(),
        enemies: EnemyPool::new(),
        stars: StarPool::new(),
        score: 0,
        // Starts past any sane cooldown so the first shot is immediate.
        fire_cooldown: 1.0,
        star_timer: 0.0,
        enemy_timer: 0.0,
        fire_rate,
        frame: 0,
        width,
        height,
    }
}

/// Discard all in-flight state, keeping the window and fire rate.
pub fn reset(state: &GameState) -> GameState {
    init_state(state.width, state.height, state.fire_rate)
}

// ── Timers & player ──────────────────────────────────────────────────────────

pub fn advance_timers(state: &GameState, dt: f32) -> GameState {
    GameState {
        fire_cooldown: state.fire_cooldown + dt,
        star_timer: state.star_timer + dt,
        enemy_timer: state.enemy_timer + dt,
        ..state.clone()
    }
}

/// Player X follows the pointer, clamped away from the window edges.
pub fn move_player(state: &GameState, pointer_x: f32) -> GameState {
    let max_x = (state.width - EDGE_OFFSET).max(EDGE_OFFSET);
    let x = pointer_x.clamp(EDGE_OFFSET, max_x);
    GameState {
        player: Player {
            pos: Vec2::new(x, state.player.pos.y),
        },
        ..state.clone()
    }
}

// ── Firing & bullets ─────────────────────────────────────────────────────────

/// Fire from the player's position if the cooldown has elapsed.
///
/// The cooldown resets even when every bullet slot is busy; that shot is lost.
pub fn shoot(state: &GameState) -> GameState {
    if state.fire_cooldown <= 1.0 / state.fire_rate {
        return state.clone();
    }
    let mut bullets = state.bullets.clone();
    let bullet = Bullet {
        pos: Vec2::new(state.player.pos.x, BULLET_SPAWN_Y),
    };
    if bullets.spawn(bullet).is_none() {
        trace!("bullet pool full, shot dropped");
    }
    GameState {
        bullets,
        fire_cooldown: 0.0,
        ..state.clone()
    }
}

/// Move every active bullet up, then cull those past the top edge.
pub fn advance_bullets(state: &GameState) -> GameState {
    let mut bullets = state.bullets.clone();
    for (_, bullet) in bullets.iter_active_mut() {
        bullet.pos.y -= BULLET_SPEED;
    }
    let gone: Vec<usize> = bullets
        .iter_active()
        .filter(|(_, b)| b.pos.y < 0.0)
        .map(|(i, _)| i)
        .collect();
    for i in gone {
        bullets.clear(i);
    }
    GameState {
        bullets,
        ..state.clone()
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// One pass over the enemy slots: active enemies fall (and cost points when
/// they leave the bottom), free slots spawn while the shared timer allows.
///
/// The timer is shared by the whole pool, so at most one enemy spawns per call.
pub fn update_enemies(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut enemies = state.enemies.clone();
    let mut score = state.score;
    let mut enemy_timer = state.enemy_timer;

    for i in 0..enemies.capacity() {
        if let Some(enemy) = enemies.get_mut(i) {
            enemy.pos.y += enemy.speed;
            if enemy.pos.y > state.height {
                debug!("enemy {} escaped at x={:.0}", i, enemy.pos.x);
                enemies.clear(i);
                score += ESCAPE_PENALTY;
            }
        } else if enemy_timer > ENEMY_SPAWN_INTERVAL {
            let max_x = (state.width - ENEMY_SPAWN_MARGIN).max(ENEMY_SPAWN_MARGIN);
            let x = rng.gen_range(ENEMY_SPAWN_MARGIN..=max_x);
            let speed = rng.gen_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED);
            enemies.put(
                i,
                Enemy {
                    pos: Vec2::new(x, ENEMY_SPAWN_Y),
                    speed,
                },
            );
            enemy_timer = 0.0;
        }
    }

    GameState {
        enemies,
        score,
        enemy_timer,
        ..state.clone()
    }
}

// ── Stars ────────────────────────────────────────────────────────────────────

fn new_star(width: f32, rng: &mut impl Rng) -> Star {
    let size_mult = rng.gen_range(0.1..=1.0_f32);
    Star {
        pos: Vec2::new(rng.gen_range(0.0..=width.max(0.0)), 0.0),
        speed: size_mult * rng.gen_range(3.0..=5.0_f32),
        rotation: 0.0,
        rotation_speed: rng.gen_range(1.0..=5.0),
        transparency: rng.gen_range(50..=110),
        size: size_mult * rng.gen_range(0.3..=0.5_f32),
    }
}

/// Same slot pass as enemies.  Stars drift against pointer motion (bigger
/// stars drift more) and spin; they carry no gameplay weight.
pub fn update_stars(state: &GameState, pointer_dx: f32, rng: &mut impl Rng) -> GameState {
    let mut stars = state.stars.clone();
    let mut star_timer = state.star_timer;

    for i in 0..stars.capacity() {
        if let Some(star) = stars.get_mut(i) {
            star.pos.x += pointer_dx * -star.size * 0.5;
            star.pos.y += star.speed;
            star.rotation += star.rotation_speed;
            if star.pos.y > state.height {
                stars.clear(i);
            }
        } else if star_timer > STAR_SPAWN_INTERVAL {
            stars.put(i, new_star(state.width, rng));
            star_timer = 0.0;
        }
    }

    GameState {
        stars,
        star_timer,
        ..state.clone()
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Pairwise bullet/enemy check.  A hit clears both slots and scores.
///
/// There is no early exit once a bullet is spent: its position is still
/// tested against the remaining enemies, so one bullet can take out several
/// enemies bunched within the hit radius.
pub fn resolve_collisions(state: &GameState) -> GameState {
    let mut bullets = state.bullets.clone();
    let mut enemies = state.enemies.clone();
    let mut score = state.score;

    for (bi, bullet) in state.bullets.iter_active() {
        for ei in 0..enemies.capacity() {
            let Some(enemy) = enemies.get(ei) else {
                continue;
            };
            if bullet.pos.distance(enemy.pos) <= HIT_RADIUS {
                debug!("bullet {} hit enemy {}", bi, ei);
                bullets.clear(bi);
                enemies.clear(ei);
                score += HIT_SCORE;
            }
        }
    }

    GameState {
        bullets,
        enemies,
        score,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A restart replaces the whole state with a fresh one for this frame.
pub fn tick(state: &GameState, input: &FrameInput, rng: &mut impl Rng) -> GameState {
    if input.restart {
        return reset(state);
    }

    let s = advance_timers(state, input.dt);
    let s = move_player(&s, input.pointer_x);
    let s = update_enemies(&s, rng);
    let s = if input.fire_held { shoot(&s) } else { s };
    let s = resolve_collisions(&s);
    let s = update_stars(&s, input.pointer_dx, rng);
    let s = advance_bullets(&s);

    GameState {
        frame: state.frame + 1,
        ..s
    }
}
