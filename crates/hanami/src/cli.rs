//! Command-line overrides for the config file.

use std::path::PathBuf;

use clap::Parser;
use hanami_config::Config;
use hanami_core::{AnimationSpeed, VisualTheme};

/// Falling petals, twinkling stars and drifting bubbles in your terminal.
#[derive(Debug, Parser)]
#[command(name = "hanami", version, about)]
pub struct Args {
    /// Visual theme: light, dark or alternate.
    #[arg(short, long)]
    pub theme: Option<VisualTheme>,

    /// Animation speed: slow, medium or fast.
    #[arg(short, long)]
    pub speed: Option<AnimationSpeed>,

    /// Backing-store pixel area per particle.
    #[arg(long)]
    pub density: Option<f32>,

    /// Seed for a reproducible particle field.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the cursor follower.
    #[arg(long)]
    pub no_cursor: bool,

    /// Config file to read and update instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply flags on top of values read from the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(density) = self.density {
            config.density_divisor = density;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_cursor {
            config.cursor = false;
        }
    }
}
