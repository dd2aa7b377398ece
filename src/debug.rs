/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and flock statistics to be displayed in the UI and the debug overlay.
 */

use std::time::Duration;

use crate::boid::Boid;

// Debug information to display
#[derive(Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub ticks_per_frame: usize,
    pub total_ticks: u64,
    pub predator_active: bool,
    pub mean_speed: f32,
}

impl DebugInfo {
    pub fn record_flock(&mut self, boids: &[Boid]) {
        self.mean_speed = if boids.is_empty() {
            0.0
        } else {
            boids.iter().map(Boid::speed).sum::<f32>() / boids.len() as f32
        };
    }
}
