/// Presentation model and presentation.xml generation.
use crate::common::Result;
use crate::deck::chart::ChartSpec;
use crate::deck::slide::Slide;
use std::fmt::Write as FmtWrite;

/// A slide deck under construction.
///
/// Owns the ordered slides and the chart parts they reference. Mutated only
/// by appending; persisted by the package writer.
#[derive(Debug, Default)]
pub struct Presentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<Slide>,
    /// Registered chart parts, referenced from slides by index
    pub(crate) charts: Vec<ChartSpec>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
}

impl Presentation {
    /// Create a new empty presentation with default dimensions.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            charts: Vec::new(),
            slide_width: 9_144_000,  // 10 inches
            slide_height: 6_858_000, // 7.5 inches
        }
    }

    /// Add a new slide to the presentation and return it.
    pub fn add_slide(&mut self) -> &mut Slide {
        let slide_id = (self.slides.len() + 256) as u32;
        self.slides.push(Slide::new(slide_id));
        self.slides.last_mut().expect("slide just pushed")
    }

    /// Register a chart part and return its index for slide frames.
    pub fn register_chart(&mut self, chart: ChartSpec) -> u32 {
        self.charts.push(chart);
        (self.charts.len() - 1) as u32
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get the slides in order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Get a mutable reference to the current (last) slide, if any.
    pub fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        self.slides.last_mut()
    }

    /// Registered chart parts in order.
    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Generate presentation.xml content with actual relationship IDs.
    ///
    /// # Arguments
    /// * `slide_rel_ids` - Relationship IDs for slides in order
    ///   (e.g., ["rId2", "rId3", ...])
    pub(crate) fn generate_presentation_xml(&self, slide_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);

        // Slide master ID list
        xml.push_str("<p:sldMasterIdLst>");
        xml.push_str(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#);
        xml.push_str("</p:sldMasterIdLst>");

        // Slide ID list
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (index, slide) in self.slides.iter().enumerate() {
                let rel_id = slide_rel_ids.get(index).map(String::as_str).ok_or_else(|| {
                    crate::common::Error::Xml(format!(
                        "missing relationship ID for slide {}",
                        index
                    ))
                })?;
                write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, slide.slide_id(), rel_id)?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        // Slide size
        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::chart::{ChartKind, ChartSeries};

    #[test]
    fn test_create_presentation() {
        let pres = Presentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 9_144_000);
        assert_eq!(pres.slide_height(), 6_858_000);
    }

    #[test]
    fn test_add_slide_assigns_ids() {
        let mut pres = Presentation::new();
        pres.add_slide();
        pres.add_slide();
        assert_eq!(pres.slide_count(), 2);
        assert_eq!(pres.slides()[0].slide_id(), 256);
        assert_eq!(pres.slides()[1].slide_id(), 257);
    }

    #[test]
    fn test_register_chart_indices() {
        let mut pres = Presentation::new();
        let spec = ChartSpec::new(ChartKind::ColumnClustered, vec!["A".to_string()])
            .add_series(ChartSeries::new("count", vec![1.0]));
        assert_eq!(pres.register_chart(spec.clone()), 0);
        assert_eq!(pres.register_chart(spec), 1);
        assert_eq!(pres.charts().len(), 2);
    }

    #[test]
    fn test_presentation_xml() {
        let mut pres = Presentation::new();
        pres.add_slide();
        pres.add_slide();

        let xml = pres
            .generate_presentation_xml(&["rId2".to_string(), "rId3".to_string()])
            .unwrap();
        assert!(xml.contains("<p:presentation"));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
    }

    #[test]
    fn test_presentation_xml_missing_rel_id() {
        let mut pres = Presentation::new();
        pres.add_slide();
        assert!(pres.generate_presentation_xml(&[]).is_err());
    }
}
