//! Built-in reference data.

pub mod champions;
pub mod demo;

pub use demo::{generate as generate_demo_world, DemoWorld, DEFAULT_TEAMS_PER_LEAGUE, REGIONS};
