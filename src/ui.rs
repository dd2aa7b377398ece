/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for the flocking parameters and the
 * run controls, and reports what changed so the app can react.
 */

use nannou::prelude::*;
use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{EdgeMode, RunControls, SimulationParams};
use crate::perception::NeighborPolicy;

// What the panel asked for this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiResponse {
    pub reset_requested: bool,
    pub num_boids_changed: bool,
    pub params_changed: bool,
}

// Update the UI and report resets and parameter changes
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    controls: &mut RunControls,
    debug_info: &DebugInfo,
) -> UiResponse {
    let mut response = UiResponse::default();

    // Snapshot for change detection
    let params_before = params.clone();
    let num_boids_before = controls.num_boids;

    let ctx = egui.begin_frame();

    egui::Window::new("Flocking Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(egui::Slider::new(&mut controls.num_boids, RunControls::get_num_boids_range()).text("Number of Boids"));

                if ui.button("Reset Boids").clicked() {
                    response.reset_requested = true;
                }

                ui.add(egui::Slider::new(&mut params.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut controls.ticks_per_second, RunControls::get_ticks_per_second_range()).text("Ticks per Second"));
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut params.perception, SimulationParams::get_radius_range()).text("Perception"));
                ui.add(egui::Slider::new(&mut params.safe_space, SimulationParams::get_radius_range()).text("Safe Space"));
                ui.add(
                    egui::Slider::new(&mut params.cohesion_factor, SimulationParams::get_cohesion_range())
                        .text("Cohesion")
                        .fixed_decimals(4),
                );
                ui.add(egui::Slider::new(&mut params.separation_factor, SimulationParams::get_factor_range()).text("Separation"));
                ui.add(egui::Slider::new(&mut params.alignment_factor, SimulationParams::get_factor_range()).text("Alignment"));

                let mut include_self = params.neighbor_policy == NeighborPolicy::IncludeSelf;
                if ui.checkbox(&mut include_self, "Boids See Themselves").changed() {
                    params.neighbor_policy = if include_self {
                        NeighborPolicy::IncludeSelf
                    } else {
                        NeighborPolicy::ExcludeSelf
                    };
                }
            });

            ui.collapsing("Edges", |ui| {
                let mut wrap = params.edge_mode == EdgeMode::Wrap;
                if ui.checkbox(&mut wrap, "Wrap Around Edges").changed() {
                    params.edge_mode = if wrap { EdgeMode::Wrap } else { EdgeMode::Avoid };
                }

                ui.add_enabled(
                    params.edge_mode == EdgeMode::Avoid,
                    egui::Slider::new(&mut params.margin, SimulationParams::get_margin_range()).text("Margin"),
                );
                ui.add_enabled(
                    params.edge_mode == EdgeMode::Avoid,
                    egui::Slider::new(&mut params.edge_avoid_factor, SimulationParams::get_edge_factor_range()).text("Edge Avoidance"),
                );
            });

            ui.collapsing("Predator", |ui| {
                ui.checkbox(&mut controls.enable_predator, "Mouse Is a Predator");
                ui.add(egui::Slider::new(&mut params.predator_perception, SimulationParams::get_radius_range()).text("Predator Perception"));
                ui.add(egui::Slider::new(&mut params.predator_avoid_factor, SimulationParams::get_factor_range()).text("Predator Avoidance"));
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Enable Parallel Processing");
                ui.checkbox(&mut params.enable_spatial_grid, "Enable Spatial Grid");

                ui.separator();

                // Performance metrics
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Ticks this frame: {}", debug_info.ticks_per_frame));
                ui.label(format!("Total ticks: {}", debug_info.total_ticks));
            });

            ui.checkbox(&mut controls.show_fps, "Show FPS");
            ui.checkbox(&mut controls.show_debug, "Show Debug Info");
            ui.checkbox(&mut controls.pause_simulation, "Pause Simulation");
        });

    response.num_boids_changed = controls.num_boids != num_boids_before;
    response.params_changed = *params != params_before;
    response
}

// Draw debug information on the screen
pub fn draw_debug_info(
    draw: &Draw,
    debug_info: &DebugInfo,
    window_rect: Rect,
    boids_len: usize,
    params: &SimulationParams,
) {
    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
        format!("Total Boids: {}", boids_len),
        format!("Ticks: {} ({} this frame)", debug_info.total_ticks, debug_info.ticks_per_frame),
        format!("Mean speed: {:.2} / {:.1}", debug_info.mean_speed, params.max_speed),
        format!("Predator: {}", if debug_info.predator_active { "hunting" } else { "none" }),
        format!("World: {:.0}x{:.0} ({:?})", params.width, params.height, params.edge_mode),
    ];

    // Background panel in the bottom-left corner, clear of the egui window
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 260.0;
    let panel_height = line_height * debug_texts.len() as f32 + margin;
    let panel_x = window_rect.left() + panel_width / 2.0;
    let panel_y = window_rect.bottom() + panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.bottom() + panel_height - margin;

    for (i, text) in debug_texts.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        // nannou centres text on its position; shift it right to left-align
        draw.text(text)
            .x_y(text_x + panel_width / 2.0 - margin, y)
            .w(panel_width - margin)
            .left_justify()
            .color(WHITE)
            .font_size(14);
    }
}
