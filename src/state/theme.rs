//! Theme preference.

use std::str::FromStr;

/// Light/dark preference; `Unset` defers to the platform default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Unset,
}

impl Theme {
    /// The theme after one toggle. `Unset` counts as the platform default
    /// (light), so the first toggle lands on `Light` explicitly.
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Unset => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "unset" | "system" => Ok(Theme::Unset),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}
