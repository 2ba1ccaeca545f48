//! Rendering layer: translates state into draw calls.
//!
//! Each function receives a canvas and an immutable view of the game state.
//! No game logic is performed here; motion and culling already happened in
//! `compute`.

pub mod terminal;

use glam::Vec2;

use crate::engine::{Canvas, Rgba};
use crate::entities::{Bullet, Enemy, GameState, Player, Star};

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Rgba = Rgba::BLACK;
pub const C_PLAYER: Rgba = Rgba::rgb(200, 200, 200);
pub const C_ENEMY: Rgba = Rgba::rgb(212, 21, 208);
pub const C_BULLET: Rgba = Rgba::rgb(100, 200, 150);
pub const C_HUD: Rgba = Rgba::WHITE;

// ── Sizes & HUD layout ────────────────────────────────────────────────────────

pub const ENEMY_DIAMETER: f32 = 30.0;
pub const BULLET_DIAMETER: f32 = 10.0;
pub const STAR_HALF_EXTENT: f32 = 10.0;

pub const RESTART_HINT: &str = "Press \"R\" to Restart";
pub const RESTART_HINT_POS: Vec2 = Vec2::new(50.0, 125.0);
pub const RESTART_HINT_SIZE: f32 = 20.0;
pub const SCORE_POS: Vec2 = Vec2::new(50.0, 100.0);
pub const SCORE_SIZE: f32 = 30.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame: background, stars, enemies, player, bullets, HUD.
pub fn render<C: Canvas>(canvas: &mut C, state: &GameState) {
    canvas.clear(C_BACKGROUND);
    canvas.stroke(None);

    for (_, star) in state.stars.iter_active() {
        draw_star(canvas, star);
    }
    for (_, enemy) in state.enemies.iter_active() {
        draw_enemy(canvas, enemy);
    }
    draw_player(canvas, &state.player);
    for (_, bullet) in state.bullets.iter_active() {
        draw_bullet(canvas, bullet);
    }

    draw_hud(canvas, state);
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_star<C: Canvas>(canvas: &mut C, star: &Star) {
    let e = STAR_HALF_EXTENT * star.size;
    let p = star.pos;
    canvas.fill(Rgba::rgba(255, 255, 255, star.transparency));
    canvas.triangle_rotated(
        Vec2::new(p.x, p.y - e),
        Vec2::new(p.x - e, p.y + e),
        Vec2::new(p.x + e, p.y + e),
        star.rotation,
    );
}

fn draw_enemy<C: Canvas>(canvas: &mut C, enemy: &Enemy) {
    canvas.fill(C_ENEMY);
    canvas.circle(enemy.pos, ENEMY_DIAMETER);
}

fn draw_player<C: Canvas>(canvas: &mut C, player: &Player) {
    // Wings, then the fuselage on top.
    let p = player.pos;
    canvas.fill(C_PLAYER);
    canvas.triangle(
        Vec2::new(p.x - 30.0, p.y + 15.0),
        Vec2::new(p.x + 30.0, p.y + 15.0),
        Vec2::new(p.x, p.y - 15.0),
    );
    canvas.rect(p, 20.0, 50.0);
}

fn draw_bullet<C: Canvas>(canvas: &mut C, bullet: &Bullet) {
    canvas.fill(C_BULLET);
    canvas.circle(bullet.pos, BULLET_DIAMETER);
}

// ── HUD ───────────────────────────────────────────────────────────────────────

pub fn score_text(score: i32) -> String {
    format!("SCORE: {}", score)
}

fn draw_hud<C: Canvas>(canvas: &mut C, state: &GameState) {
    canvas.fill(C_HUD);
    canvas.text_size(RESTART_HINT_SIZE);
    canvas.text(RESTART_HINT, RESTART_HINT_POS);

    canvas.fill(C_HUD);
    canvas.text_size(SCORE_SIZE);
    canvas.text(&score_text(state.score), SCORE_POS);
}
