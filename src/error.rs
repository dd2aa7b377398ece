/*
 * Error Module
 *
 * Errors raised by the simulation core and the config loader.
 * A tick either succeeds for valid input or reports which precondition
 * the caller broke, before any boid has been written.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlockError {
    /// A radius, speed, factor or world dimension outside its domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("a flock needs at least one boid")]
    EmptyFlock,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FlockError>;
