//! Serializable snapshot of a pipeline pass.
//!
//! Used by the CLI to export aggregated series as JSON alongside the filter
//! selections and domains that produced them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::Series;
use crate::chart::Domains;
use crate::controller::Controller;
use crate::error::Result;
use crate::platform::FamilyFilter;
use crate::region::Region;

/// Aggregated series plus the context they were computed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesReport {
    /// Region column the values were read from.
    pub region: Region,

    /// Family filter in effect.
    pub family: FamilyFilter,

    /// Series in encounter order.
    pub series: Vec<Series>,

    /// Axis domains over all series.
    pub domains: Domains,

    /// Genre → color.
    pub colors: BTreeMap<String, String>,

    /// Genres hidden at export time, sorted.
    pub hidden: Vec<String>,

    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl SeriesReport {
    /// Snapshot the controller's current state.
    #[must_use]
    pub fn from_controller(controller: &Controller) -> Self {
        Self {
            region: controller.region(),
            family: controller.family(),
            series: controller.series().to_vec(),
            domains: *controller.domains(),
            colors: controller
                .colors()
                .entries()
                .into_iter()
                .map(|(genre, color)| (genre, color.to_string()))
                .collect(),
            hidden: controller
                .visibility()
                .hidden()
                .into_iter()
                .map(String::from)
                .collect(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Sum over every series.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.series.iter().map(Series::total).sum()
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::controller::Trigger;
    use crate::import::RawRecord;

    fn controller() -> Controller {
        let mut controller = Controller::new(ChartConfig::default());
        controller.handle(Trigger::DataReplaced(vec![
            RawRecord::new()
                .with("Year", "2001")
                .with("Genre", "Action")
                .with("Platform", "PS2")
                .with("Global_Sales", "1.5"),
            RawRecord::new()
                .with("Year", "2002")
                .with("Genre", "Puzzle")
                .with("Platform", "GBA")
                .with("Global_Sales", "0.5"),
        ]));
        controller.handle(Trigger::VisibilityToggled("Puzzle".into()));
        controller
    }

    #[test]
    fn test_from_controller() {
        let report = SeriesReport::from_controller(&controller());
        assert_eq!(report.region, Region::Global);
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.hidden, vec!["Puzzle".to_string()]);
        assert_eq!(report.colors.get("Action").map(String::as_str), Some("#4e79a7"));
        assert_eq!(report.grand_total(), 2.0);
    }

    #[test]
    fn test_json_round_trip() {
        let report = SeriesReport::from_controller(&controller());
        let file = tempfile::NamedTempFile::new().unwrap();
        report.write_json(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("\"Global_Sales\""));
        let parsed: SeriesReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.series, report.series);
        assert_eq!(parsed.timestamp.timestamp(), report.timestamp.timestamp());
    }
}
