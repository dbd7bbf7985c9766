use crate::geometry::TreeParams;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tree-visualizer",
    version,
    about = "Gesture-driven holiday tree: particles morph between a formed tree and chaos, rendered in the terminal"
)]
pub struct Config {
    /// Where hand input comes from.
    #[arg(long, value_enum, default_value_t = HandSource::Scripted)]
    pub hand: HandSource,

    /// Simulate the camera permission being refused.
    #[arg(long, default_value_t = false)]
    pub deny_camera: bool,

    /// Simulate the landmark model failing to load.
    #[arg(long, default_value_t = false)]
    pub fail_detector: bool,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, default_value_t = 12000)]
    pub foliage_count: usize,

    #[arg(long, default_value_t = 150)]
    pub ornament_count: usize,

    #[arg(long, default_value_t = 300)]
    pub light_count: usize,

    #[arg(long, default_value_t = 80)]
    pub flasher_count: usize,

    #[arg(long, default_value_t = 12.0)]
    pub tree_height: f32,

    #[arg(long, default_value_t = 4.5)]
    pub tree_radius: f32,

    #[arg(long, default_value_t = 25.0)]
    pub chaos_radius: f32,

    /// Time constant of the morph smoothing.
    #[arg(long, default_value_t = 2.5)]
    pub animation_speed: f32,

    /// Photo files for the gallery spiral; loaded as one batch at startup and
    /// reloaded with the `r` key.
    #[arg(long)]
    pub images: Vec<PathBuf>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

impl Config {
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            height: self.tree_height,
            radius: self.tree_radius,
            chaos_radius: self.chaos_radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandSource {
    /// Synthetic hand choreography; no camera or model needed.
    Scripted,
    /// No tracking at all; pointer-only camera control.
    Off,
}
