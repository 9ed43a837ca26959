//! Theme and threshold color system.
//!
//! Provides:
//! - Two pure band functions (temperature, mold index) with fixed breakpoints
//! - Band and severity colors (same palette in every theme)
//! - Theme struct for chrome colors, with dark/light presets

use ratatui::style::Color;

/// Temperature bucket. Each bucket includes its lower bound:
/// 18.0 is Cool, 26.0 is VeryHot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    Unknown,
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
    VeryHot,
}

/// Band for a temperature reading; None (no reading) maps to Unknown.
pub fn temperature_band(temp: Option<f64>) -> TempBand {
    let Some(t) = temp else {
        return TempBand::Unknown;
    };
    if t < 18.0 {
        TempBand::Cold
    } else if t < 20.0 {
        TempBand::Cool
    } else if t < 22.0 {
        TempBand::Comfortable
    } else if t < 24.0 {
        TempBand::Warm
    } else if t < 26.0 {
        TempBand::Hot
    } else {
        TempBand::VeryHot
    }
}

impl TempBand {
    pub fn color(self) -> Color {
        match self {
            Self::Unknown => Color::Rgb(156, 163, 175), // #9ca3af
            Self::Cold => Color::Rgb(59, 130, 246),     // #3b82f6
            Self::Cool => Color::Rgb(147, 197, 253),    // #93c5fd
            Self::Comfortable => Color::Rgb(34, 197, 94), // #22c55e
            Self::Warm => Color::Rgb(234, 179, 8),      // #eab308
            Self::Hot => Color::Rgb(249, 115, 22),      // #f97316
            Self::VeryHot => Color::Rgb(239, 68, 68),   // #ef4444
        }
    }
}

/// Mold-index severity, lower bound inclusive: 1.0 is Medium, 5.0 is Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoldSeverity {
    Low,
    Medium,
    High,
    Critical,
}

pub fn mold_severity(value: f64) -> MoldSeverity {
    if value < 1.0 {
        MoldSeverity::Low
    } else if value < 3.0 {
        MoldSeverity::Medium
    } else if value < 5.0 {
        MoldSeverity::High
    } else {
        MoldSeverity::Critical
    }
}

impl MoldSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Low => Color::Rgb(34, 197, 94),      // #22c55e
            Self::Medium => Color::Rgb(234, 179, 8),   // #eab308
            Self::High => Color::Rgb(249, 115, 22),    // #f97316
            Self::Critical => Color::Rgb(239, 68, 68), // #ef4444
        }
    }
}

/// Chrome colors for the card UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Background for the selected card
    pub selection_bg: Color,
    /// Text color for the selected card
    pub selection_fg: Color,
    /// Accent color (borders, active tab)
    pub accent: Color,
    /// Dimmed text (captions, secondary info)
    pub dimmed: Color,
    /// More dimmed text (inactive tabs, status bar)
    pub dimmed_alt: Color,
    /// Accent bar for a heating thermostat / running heater
    pub heating: Color,
    /// Accent bar for a cooling thermostat
    pub cooling: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme - default
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(31, 41, 55),      // #1f2937
            foreground: Color::Rgb(243, 244, 246),   // #f3f4f6
            selection_bg: Color::Rgb(55, 65, 81),    // #374151
            selection_fg: Color::Rgb(243, 244, 246), // #f3f4f6
            accent: Color::Rgb(3, 169, 244),         // #03a9f4
            dimmed: Color::Rgb(156, 163, 175),       // #9ca3af
            dimmed_alt: Color::Rgb(107, 114, 128),   // #6b7280
            heating: Color::Rgb(249, 115, 22),       // #f97316
            cooling: Color::Rgb(59, 130, 246),       // #3b82f6
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(255, 255, 255),   // #ffffff
            foreground: Color::Rgb(17, 24, 39),      // #111827
            selection_bg: Color::Rgb(229, 231, 235), // #e5e7eb
            selection_fg: Color::Rgb(17, 24, 39),    // #111827
            accent: Color::Rgb(3, 169, 244),         // #03a9f4
            dimmed: Color::Rgb(75, 85, 99),          // #4b5563
            dimmed_alt: Color::Rgb(107, 114, 128),   // #6b7280
            heating: Color::Rgb(249, 115, 22),       // #f97316
            cooling: Color::Rgb(59, 130, 246),       // #3b82f6
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_band_boundaries() {
        // each bucket is inclusive on its lower end
        assert_eq!(temperature_band(Some(17.9)), TempBand::Cold);
        assert_eq!(temperature_band(Some(18.0)), TempBand::Cool);
        assert_eq!(temperature_band(Some(19.9)), TempBand::Cool);
        assert_eq!(temperature_band(Some(20.0)), TempBand::Comfortable);
        assert_eq!(temperature_band(Some(21.9)), TempBand::Comfortable);
        assert_eq!(temperature_band(Some(22.0)), TempBand::Warm);
        assert_eq!(temperature_band(Some(24.0)), TempBand::Hot);
        assert_eq!(temperature_band(Some(25.9)), TempBand::Hot);
        assert_eq!(temperature_band(Some(26.0)), TempBand::VeryHot);
        assert_eq!(temperature_band(Some(-5.0)), TempBand::Cold);
    }

    #[test]
    fn test_temperature_band_unknown() {
        assert_eq!(temperature_band(None), TempBand::Unknown);
    }

    #[test]
    fn test_mold_severity_boundaries() {
        assert_eq!(mold_severity(0.9), MoldSeverity::Low);
        assert_eq!(mold_severity(1.0), MoldSeverity::Medium);
        assert_eq!(mold_severity(2.9), MoldSeverity::Medium);
        assert_eq!(mold_severity(3.0), MoldSeverity::High);
        assert_eq!(mold_severity(4.9), MoldSeverity::High);
        assert_eq!(mold_severity(5.0), MoldSeverity::Critical);
        assert_eq!(mold_severity(0.0), MoldSeverity::Low);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(mold_severity(0.5).label(), "Low");
        assert_eq!(mold_severity(7.2).label(), "Critical");
    }

    #[test]
    fn test_presets() {
        assert!(Theme::from_preset("dark").is_some());
        assert!(Theme::from_preset("Light").is_some());
        assert!(Theme::from_preset("nonexistent").is_none());
    }
}
