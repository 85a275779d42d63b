//! Chart layout configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Space reserved around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin.
    pub top: u32,
    /// Right margin (holds the legend).
    pub right: u32,
    /// Bottom margin (holds the year axis).
    pub bottom: u32,
    /// Left margin (holds the value axis).
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 28,
            right: 190,
            bottom: 44,
            left: 60,
        }
    }
}

/// Chart configuration.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart title (empty for none).
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Outer width in pixels.
    pub width: u32,
    /// Outer height in pixels.
    pub height: u32,
    /// Plot margins.
    pub margins: Margins,
    /// Point marker radius.
    pub point_radius: f64,
    /// Line stroke width.
    pub stroke_width: f64,
    /// Vertical distance between legend rows.
    pub legend_row_height: f64,
    /// Legend swatch edge length.
    pub legend_swatch: f64,
    /// Legend swatch opacity for hidden genres.
    pub hidden_opacity: f64,
    /// Approximate number of value-axis ticks.
    pub value_ticks: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: "Year".to_string(),
            y_label: "Sales (millions)".to_string(),
            width: 1100,
            height: 560,
            margins: Margins::default(),
            point_radius: 3.0,
            stroke_width: 2.0,
            legend_row_height: 18.0,
            legend_swatch: 12.0,
            hidden_opacity: 0.25,
            value_ticks: 10,
        }
    }
}

impl ChartConfig {
    /// Creates a new chart configuration with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the X-axis label.
    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Sets the Y-axis label.
    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Sets the chart dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the margins.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the opacity used for hidden legend entries.
    #[must_use]
    pub fn with_hidden_opacity(mut self, opacity: f64) -> Self {
        self.hidden_opacity = opacity;
        self
    }

    /// Width of the plot area.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        let reserved = self.margins.left.saturating_add(self.margins.right);
        f64::from(self.width.saturating_sub(reserved))
    }

    /// Height of the plot area.
    #[must_use]
    pub fn plot_height(&self) -> f64 {
        let reserved = self.margins.top.saturating_add(self.margins.bottom);
        f64::from(self.height.saturating_sub(reserved))
    }

    /// Check the configuration describes a drawable chart.
    pub fn validate(&self) -> Result<()> {
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(Error::Config(format!(
                "margins leave no plot area in a {}x{} chart",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.hidden_opacity) {
            return Err(Error::Config(format!(
                "hidden_opacity must be within 0..=1, got {}",
                self.hidden_opacity
            )));
        }
        if self.value_ticks == 0 {
            return Err(Error::Config("value_ticks must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_plot_area() {
        let config = ChartConfig::default();
        assert_eq!(config.plot_width(), 850.0);
        assert_eq!(config.plot_height(), 488.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ChartConfig::new("Sales by Genre")
            .with_dimensions(800, 400)
            .with_y_label("Units")
            .with_hidden_opacity(0.5);
        assert_eq!(config.title, "Sales by Genre");
        assert_eq!(config.width, 800);
        assert_eq!(config.y_label, "Units");
        assert_eq!(config.hidden_opacity, 0.5);
    }

    #[test]
    fn test_validate_rejects_tiny_chart() {
        let config = ChartConfig::default().with_dimensions(100, 100);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_opacity() {
        let config = ChartConfig::default().with_hidden_opacity(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"title": "EU", "width": 900, "margins": {"top": 10, "right": 150, "bottom": 40, "left": 50}}"#)
            .unwrap();
        let config = ChartConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.title, "EU");
        assert_eq!(config.width, 900);
        assert_eq!(config.height, 560);
        assert_eq!(config.margins.top, 10);
        assert_eq!(config.point_radius, 3.0);
    }

    #[test]
    fn test_partial_margins() {
        let config: ChartConfig = serde_json::from_str(r#"{"margins": {"top": 10}}"#).unwrap();
        assert_eq!(config.margins.top, 10);
        assert_eq!(config.margins.right, Margins::default().right);
        assert_eq!(config.margins.left, Margins::default().left);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_margins_fail_validation() {
        let config = ChartConfig::default().with_margins(Margins {
            top: u32::MAX,
            right: u32::MAX,
            bottom: u32::MAX,
            left: u32::MAX,
        });
        assert_eq!(config.plot_width(), 0.0);
        assert_eq!(config.plot_height(), 0.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
