//! Core types shared by the hanami crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual theme of the page behind the particle field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualTheme {
    /// Falling cherry-blossom petals.
    #[default]
    Light,
    /// Twinkling stars over a night sky.
    Dark,
    /// Pale bubbles drifting over a soft gradient.
    Alternate,
}

impl VisualTheme {
    /// All themes, in cycling order.
    pub const ALL: [VisualTheme; 3] = [VisualTheme::Light, VisualTheme::Dark, VisualTheme::Alternate];

    /// Cycle to the next theme.
    pub fn next(self) -> Self {
        match self {
            VisualTheme::Light => VisualTheme::Dark,
            VisualTheme::Dark => VisualTheme::Alternate,
            VisualTheme::Alternate => VisualTheme::Light,
        }
    }

    /// Lowercase name as used in the config file.
    pub fn name(self) -> &'static str {
        match self {
            VisualTheme::Light => "light",
            VisualTheme::Dark => "dark",
            VisualTheme::Alternate => "alternate",
        }
    }
}

impl fmt::Display for VisualTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisualTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualTheme::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme `{s}` (expected light, dark or alternate)"))
    }
}

/// Animation speed setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Multiplier applied to per-frame particle motion.
    pub fn multiplier(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 2.0,
        }
    }

    /// Lowercase name as used in the config file.
    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [AnimationSpeed::Slow, AnimationSpeed::Medium, AnimationSpeed::Fast]
            .into_iter()
            .find(|speed| speed.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown speed `{s}` (expected slow, medium or fast)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_cycle_visits_every_theme() {
        let mut theme = VisualTheme::default();
        let mut seen = Vec::new();
        for _ in 0..VisualTheme::ALL.len() {
            seen.push(theme);
            theme = theme.next();
        }
        assert_eq!(theme, VisualTheme::Light);
        assert_eq!(seen, VisualTheme::ALL.to_vec());
    }

    #[test]
    fn test_speed_multiplier_ordering() {
        assert!(AnimationSpeed::Slow.multiplier() < AnimationSpeed::Medium.multiplier());
        assert!(AnimationSpeed::Medium.multiplier() < AnimationSpeed::Fast.multiplier());
        assert_eq!(AnimationSpeed::Fast.next(), AnimationSpeed::Slow);
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: VisualTheme,
            speed: AnimationSpeed,
        }
        let parsed: Wrapper = toml::from_str("theme = \"alternate\"\nspeed = \"fast\"").unwrap();
        assert_eq!(parsed.theme, VisualTheme::Alternate);
        assert_eq!(parsed.speed, AnimationSpeed::Fast);
        assert_eq!(VisualTheme::Dark.to_string(), "dark");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Dark".parse::<VisualTheme>(), Ok(VisualTheme::Dark));
        assert_eq!("slow".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Slow));
        assert!("sepia".parse::<VisualTheme>().is_err());
    }
}
