/*
 * Renderer Module
 *
 * This module draws the simulation: one triangle per boid pointing along its
 * velocity, the mouse predator with its perception circle, the FPS counter
 * and the debug overlay.
 *
 * The world uses screen conventions (origin top-left, y down, size of the
 * window); nannou draws around the window centre with y up.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::app::Model;
use crate::boid::Boid;
use crate::ui;
use crate::BOID_SIZE;

// Colour of each boid
pub enum BoidColors {
    RandomHue(Vec<f32>),
    Fixed(Rgb<u8>),
}

impl BoidColors {
    pub fn random_hues<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        BoidColors::RandomHue((0..count).map(|_| rng.gen_range(0.0..1.0)).collect())
    }

    // Keep one hue per boid after the flock was respawned
    pub fn match_len<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        if let BoidColors::RandomHue(hues) = self {
            hues.resize_with(count, || rng.gen_range(0.0..1.0));
        }
    }
}

// Convert a world position to nannou's window coordinates
pub fn world_to_screen(position: Vec2, window_rect: Rect) -> Point2 {
    pt2(window_rect.left() + position.x, window_rect.top() - position.y)
}

// Convert nannou's window coordinates to a world position
pub fn screen_to_world(point: Point2, window_rect: Rect) -> Vec2 {
    vec2(point.x - window_rect.left(), window_rect.top() - point.y)
}

// Rotation of the sprite on screen (y axis flipped)
fn screen_angle(boid: &Boid) -> f32 {
    -boid.heading()
}

fn boid_points() -> [Point2; 4] {
    [
        pt2(BOID_SIZE, 0.0),
        pt2(-BOID_SIZE, BOID_SIZE * 0.8),
        pt2(-BOID_SIZE * 0.5, 0.0),
        pt2(-BOID_SIZE, -BOID_SIZE * 0.8),
    ]
}

fn draw_boid(draw: &Draw, boid: &Boid, window_rect: Rect, colors: &BoidColors, index: usize) {
    let screen_pos = world_to_screen(boid.position, window_rect);
    let polygon = draw
        .polygon()
        .points(boid_points().iter().cloned())
        .xy(screen_pos)
        .rotate(screen_angle(boid));

    match colors {
        BoidColors::RandomHue(hues) => {
            let hue = hues.get(index).copied().unwrap_or(0.0);
            polygon.color(hsv(hue, 0.9, 0.9));
        }
        BoidColors::Fixed(color) => {
            polygon.color(*color);
        }
    }
}

fn draw_predator(draw: &Draw, predator: &Boid, perception: f32, window_rect: Rect) {
    let screen_pos = world_to_screen(predator.position, window_rect);

    draw.ellipse()
        .xy(screen_pos)
        .radius(BOID_SIZE)
        .color(RED);

    draw.ellipse()
        .xy(screen_pos)
        .radius(perception)
        .no_fill()
        .stroke(rgba(1.0, 0.2, 0.2, 0.4))
        .stroke_weight(1.0);
}

// Perception and safe-space circles plus velocity of the first boid
fn draw_first_boid_debug(draw: &Draw, model: &Model, window_rect: Rect) {
    let Some(first_boid) = model.flock.boids().first() else {
        return;
    };
    let screen_pos = world_to_screen(first_boid.position, window_rect);

    draw.ellipse()
        .xy(screen_pos)
        .radius(model.params.safe_space)
        .no_fill()
        .stroke(RED)
        .stroke_weight(1.0);

    draw.ellipse()
        .xy(screen_pos)
        .radius(model.params.perception)
        .no_fill()
        .stroke(GREEN)
        .stroke_weight(1.0);

    let heading = vec2(first_boid.velocity.x, -first_boid.velocity.y);
    draw.arrow()
        .start(screen_pos)
        .end(screen_pos + heading * 5.0)
        .color(YELLOW)
        .stroke_weight(2.0);
}

// Margin band the edge avoidance steers away from
fn draw_margins(draw: &Draw, model: &Model, window_rect: Rect) {
    let inner_w = (model.params.width - 2.0 * model.params.margin).max(0.0);
    let inner_h = (model.params.height - 2.0 * model.params.margin).max(0.0);
    let centre = world_to_screen(vec2(model.params.width / 2.0, model.params.height / 2.0), window_rect);

    draw.rect()
        .xy(centre)
        .w_h(inner_w, inner_h)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    // Clear the background
    draw.background().color(model.background);

    for (i, boid) in model.flock.boids().iter().enumerate() {
        draw_boid(&draw, boid, window_rect, &model.colors, i);
    }

    for predator in model.flock.predators() {
        draw_predator(&draw, predator, model.params.predator_perception, window_rect);
    }

    if model.controls.show_debug {
        draw_margins(&draw, model, window_rect);
        draw_first_boid_debug(&draw, model, window_rect);
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, model.flock.len(), &model.params);
    } else if model.controls.show_fps {
        draw.text(&format!("{}", model.debug_info.fps as u32))
            .x_y(window_rect.left() + 24.0, window_rect.top() - 16.0)
            .color(rgb(0u8, 200, 0))
            .font_size(20);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::error!("Failed to draw frame: {:?}", err);
    }

    // Draw the egui UI
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::error!("Failed to draw UI: {:?}", err);
    }
}
