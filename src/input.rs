/*
 * Input Module
 *
 * This module handles user input events for the boid simulation.
 * The mouse cursor acts as the predator: its position is tracked in world
 * coordinates and its velocity is the distance it moved since the last tick.
 *
 * Keys:
 * - Space: pause / resume
 * - R: respawn the flock
 * - D: toggle the debug overlay
 * - F: toggle the FPS counter
 * - Escape: quit
 */

use nannou::prelude::*;

use crate::app::{self, Model};
use crate::boid::{Boid, Predator};
use crate::renderer;

// Cursor state feeding the predator
#[derive(Clone, Debug, Default)]
pub struct Pointer {
    position: Option<Vec2>,
    last_tick_position: Option<Vec2>,
    velocity: Vec2,
}

impl Pointer {
    // None when the cursor left the window or hovers the UI
    pub fn move_to(&mut self, position: Option<Vec2>) {
        self.position = position;
    }

    // Called once per simulation tick
    pub fn tick(&mut self) {
        self.velocity = match (self.position, self.last_tick_position) {
            (Some(now), Some(before)) => now - before,
            _ => Vec2::ZERO,
        };
        self.last_tick_position = self.position;
    }

    pub fn predator(&self) -> Option<Predator> {
        self.position
            .map(|position| Boid::from_parts(position, self.velocity))
    }
}

// Mouse moved event handler
pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    // The cursor stops hunting while it is over the control panel
    if model.egui.ctx().is_pointer_over_area() {
        model.pointer.move_to(None);
        return;
    }

    let world_pos = renderer::screen_to_world(pos, app.window_rect());
    model.pointer.move_to(Some(world_pos));
}

pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.pointer.move_to(None);
}

pub fn key_pressed(app: &App, model: &mut Model, key: Key) {
    // Keys typed into the panel belong to the panel
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::Space => {
            model.controls.pause_simulation = !model.controls.pause_simulation;
            log::debug!("Paused: {}", model.controls.pause_simulation);
        }
        Key::R => app::reset_flock(model),
        Key::D => model.controls.show_debug = !model.controls.show_debug,
        Key::F => model.controls.show_fps = !model.controls.show_fps,
        Key::Escape => app.quit(),
        _ => {}
    }
}

// Pass raw window events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
