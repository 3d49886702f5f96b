//! Layout configuration.
//!
//! All layout constants the composer uses live in one struct passed to its
//! constructor — there is no process-wide state. Values are EMUs (914400 per
//! inch). The struct round-trips through YAML so report jobs can ship a
//! config file instead of recompiling.

use crate::common::{Error, Result};
use crate::common::unit::inches;
use crate::deck::ChartKind;
use serde::{Deserialize, Serialize};

/// Layout constants for slide composition, in EMUs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Maximum usable content height; a block that would push the cursor
    /// past this starts a fresh slide
    pub max_content_height: i64,
    /// Cursor position at the top of every new slide
    pub default_top_offset: i64,
    /// Vertical gap between consecutive blocks
    pub element_spacing: i64,
    /// Left edge of all content
    pub left_margin: i64,
    /// Width of the content area (titles and tables span it)
    pub content_width: i64,
    /// Fixed height of a title block
    pub title_height: i64,
    /// Table height base (covers the header row)
    pub table_base_height: i64,
    /// Additional table height per data row
    pub table_row_height: i64,
    /// Left edge of chart frames
    pub chart_left: i64,
    /// Chart frame width
    pub chart_width: i64,
    /// Chart frame height
    pub chart_height: i64,
    /// Height of the annotated summary boxes under an SLA table
    pub summary_box_height: i64,
    /// Default chart type for chart blocks
    pub chart_kind: ChartKind,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_content_height: inches(7.0),
            default_top_offset: inches(0.5),
            element_spacing: inches(0.3),
            left_margin: inches(0.5),
            content_width: inches(9.0),
            title_height: inches(1.0),
            table_base_height: inches(0.5),
            table_row_height: inches(0.3),
            chart_left: inches(1.0),
            chart_width: inches(6.0),
            chart_height: inches(4.0),
            summary_box_height: inches(1.5),
            chart_kind: ChartKind::ColumnClustered,
        }
    }
}

impl LayoutConfig {
    /// Load a configuration from a YAML document.
    ///
    /// Unspecified fields keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Other(format!("Failed to parse layout config: {}", e)))
    }

    /// Serialize the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Other(format!("Failed to serialize layout config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let config = LayoutConfig::default();
        assert!(config.default_top_offset < config.max_content_height);
        assert!(config.title_height + config.default_top_offset <= config.max_content_height);
        assert_eq!(config.chart_kind, ChartKind::ColumnClustered);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = LayoutConfig::from_yaml("chart-kind: pie\nchart-width: 5486400\n").unwrap();
        assert_eq!(config.chart_kind, ChartKind::Pie);
        assert_eq!(config.chart_width, 5_486_400);
        assert_eq!(config.max_content_height, inches(7.0));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = LayoutConfig::default();
        let yaml = config.to_yaml().unwrap();
        let back = LayoutConfig::from_yaml(&yaml).unwrap();
        assert_eq!(back.max_content_height, config.max_content_height);
        assert_eq!(back.chart_kind, config.chart_kind);
    }
}
