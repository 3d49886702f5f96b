/// Relationship ID mapper for tracking relationships during deck generation.
///
/// Relationships are created first, while the package writer lays out parts,
/// and the resulting IDs are handed to slide XML generation so chart frames
/// reference their chart parts by actual ID rather than a placeholder.
use std::collections::HashMap;

/// Maps deck elements to their relationship IDs.
///
/// Organized per-slide, as each slide carries its own relationships file.
#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// Maps (slide_index, chart_index) to relationship ID
    chart_ids: HashMap<(usize, u32), String>,
}

impl RelationshipMapper {
    /// Create a new empty relationship mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chart relationship mapping for a specific slide.
    ///
    /// # Arguments
    /// * `slide_index` - The index of the slide (0-based)
    /// * `chart_idx` - The chart part index on the presentation
    /// * `rel_id` - The relationship ID (e.g., "rId2")
    pub fn add_chart(&mut self, slide_index: usize, chart_idx: u32, rel_id: String) {
        self.chart_ids.insert((slide_index, chart_idx), rel_id);
    }

    /// Get the relationship ID for a chart referenced from a specific slide.
    pub fn get_chart_id(&self, slide_index: usize, chart_idx: u32) -> Option<&str> {
        self.chart_ids
            .get(&(slide_index, chart_idx))
            .map(|s| s.as_str())
    }
}
