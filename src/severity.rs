use std::fmt;

use serde::Serialize;

/// Presentation band for a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Minor,
    Light,
    Moderate,
    Severe,
}

impl SeverityBand {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 5.0 {
            SeverityBand::Severe
        } else if magnitude >= 4.0 {
            SeverityBand::Moderate
        } else if magnitude >= 3.0 {
            SeverityBand::Light
        } else {
            SeverityBand::Minor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Minor => "minor",
            SeverityBand::Light => "light",
            SeverityBand::Moderate => "moderate",
            SeverityBand::Severe => "severe",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_are_inclusive_below() {
        assert_eq!(SeverityBand::from_magnitude(0.1), SeverityBand::Minor);
        assert_eq!(SeverityBand::from_magnitude(2.99), SeverityBand::Minor);
        assert_eq!(SeverityBand::from_magnitude(3.0), SeverityBand::Light);
        assert_eq!(SeverityBand::from_magnitude(4.0), SeverityBand::Moderate);
        assert_eq!(SeverityBand::from_magnitude(4.99), SeverityBand::Moderate);
        assert_eq!(SeverityBand::from_magnitude(5.0), SeverityBand::Severe);
        assert_eq!(SeverityBand::Severe.to_string(), "severe");
    }
}
