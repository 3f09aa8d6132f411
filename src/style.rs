//! Display tokens for console output.
//!
//! A token is the parameter list of an ANSI SGR sequence (`"1;31"` renders
//! as `ESC[1;31m`). An empty token leaves the text unstyled.

use std::{
    env,
    io::{self, IsTerminal},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::severity::SeverityBand;

const RESET: &str = "\u{1b}[0m";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub minor: String,
    pub light: String,
    pub moderate: String,
    pub severe: String,
    pub header: String,
    pub index: String,
    pub cost: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            minor: "1;36".to_string(),
            light: "1;32".to_string(),
            moderate: "1;33".to_string(),
            severe: "1;31".to_string(),
            header: "1;34".to_string(),
            index: "1;32".to_string(),
            cost: "1;35".to_string(),
        }
    }
}

impl Palette {
    pub fn band(&self, band: SeverityBand) -> &str {
        match band {
            SeverityBand::Minor => &self.minor,
            SeverityBand::Light => &self.light,
            SeverityBand::Moderate => &self.moderate,
            SeverityBand::Severe => &self.severe,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// `Auto` colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
            }
        }
    }
}

/// Palette plus the decision whether to emit escapes at all.
#[derive(Debug, Clone, Default)]
pub struct Style {
    pub palette: Palette,
    pub color: bool,
}

impl Style {
    pub fn new(palette: Palette, color: bool) -> Self {
        Self { palette, color }
    }

    pub fn plain() -> Self {
        Self::new(Palette::default(), false)
    }

    pub fn paint(&self, text: &str, token: &str) -> String {
        if !self.color || token.is_empty() {
            return text.to_string();
        }
        format!("\u{1b}[{token}m{text}{RESET}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_respects_color_switch_and_empty_tokens() {
        let colored = Style::new(Palette::default(), true);
        assert_eq!(colored.paint("5.20", "1;31"), "\u{1b}[1;31m5.20\u{1b}[0m");
        assert_eq!(colored.paint("5.20", ""), "5.20");
        assert_eq!(Style::plain().paint("5.20", "1;31"), "5.20");
    }

    #[test]
    fn palette_maps_every_band() {
        let palette = Palette::default();
        assert_eq!(palette.band(SeverityBand::Severe), "1;31");
        assert_eq!(palette.band(SeverityBand::Minor), "1;36");
    }
}
