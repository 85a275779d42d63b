//! Sales region selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the fixed metric columns a chart can plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    /// North America.
    #[serde(rename = "NA_Sales")]
    NorthAmerica,
    /// Europe.
    #[serde(rename = "EU_Sales")]
    Europe,
    /// Japan.
    #[serde(rename = "JP_Sales")]
    Japan,
    /// Rest of the world.
    #[serde(rename = "Other_Sales")]
    Other,
    /// Worldwide total.
    #[default]
    #[serde(rename = "Global_Sales")]
    Global,
}

impl Region {
    /// Get all region variants.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::NorthAmerica,
            Self::Europe,
            Self::Japan,
            Self::Other,
            Self::Global,
        ]
    }

    /// Name of the metric column this region reads.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA_Sales",
            Self::Europe => "EU_Sales",
            Self::Japan => "JP_Sales",
            Self::Other => "Other_Sales",
            Self::Global => "Global_Sales",
        }
    }

    /// Parse from a column name or short name (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "na_sales" | "na" | "north_america" => Some(Self::NorthAmerica),
            "eu_sales" | "eu" | "europe" => Some(Self::Europe),
            "jp_sales" | "jp" | "japan" => Some(Self::Japan),
            "other_sales" | "other" => Some(Self::Other),
            "global_sales" | "global" => Some(Self::Global),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| Error::InvalidRegion(s.to_string()))
    }
}
