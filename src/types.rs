// =============================================================================
// Shared types used across the indicator pipeline
// =============================================================================

use serde::{Deserialize, Serialize};

/// Output mode for every indicator column.
///
/// `Raw` emits the indicator's natural numeric value. `Trend` discretises it
/// into a ternary {-1, 0, 1} signal intended as a categorical model feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorMode {
    Raw,
    Trend,
}

impl Default for IndicatorMode {
    fn default() -> Self {
        Self::Raw
    }
}

impl IndicatorMode {
    /// Column name for an indicator in this mode: Trend columns carry a
    /// `_td` suffix so both variants can live in one table.
    pub fn column_name(self, base: &str) -> String {
        match self {
            Self::Raw => base.to_string(),
            Self::Trend => format!("{base}_td"),
        }
    }
}

impl std::fmt::Display for IndicatorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "Raw"),
            Self::Trend => write!(f, "Trend"),
        }
    }
}

impl std::str::FromStr for IndicatorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "trend" | "td" => Ok(Self::Trend),
            other => anyhow::bail!("unknown indicator mode '{other}' (expected raw or trend)"),
        }
    }
}
