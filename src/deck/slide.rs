/// Slide model and XML generation.
use crate::common::Result;
use crate::deck::relmap::RelationshipMapper;
use crate::deck::shape::{Shape, TableCell, TextFormat};

/// A slide in a deck under construction.
#[derive(Debug, Clone)]
pub struct Slide {
    /// Slide ID (unique identifier within the presentation)
    pub(crate) slide_id: u32,
    /// Shapes on the slide, in placement order
    pub(crate) shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            shapes: Vec::new(),
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    // IDs: 1=group, 2+=user shapes
    fn next_shape_id(&self) -> u32 {
        (self.shapes.len() + 2) as u32
    }

    /// Add a text box to the slide.
    ///
    /// Each entry in `lines` becomes one paragraph. `fill_color` gives the
    /// box a solid background (used by annotated summary boxes).
    #[allow(clippy::too_many_arguments)]
    pub fn add_text_box(
        &mut self,
        lines: Vec<String>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        format: TextFormat,
        fill_color: Option<String>,
    ) {
        let shape = Shape::new_text_box(
            self.next_shape_id(),
            lines,
            x,
            y,
            width,
            height,
            format,
            fill_color,
        );
        self.shapes.push(shape);
    }

    /// Add a table to the slide.
    ///
    /// `rows` is row-major cell content; the first row is styled as the
    /// header row by the table properties.
    #[allow(clippy::too_many_arguments)]
    pub fn add_table(
        &mut self,
        rows: Vec<Vec<TableCell>>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        header_row_height: i64,
        data_row_height: i64,
    ) {
        let shape = Shape::new_table(
            self.next_shape_id(),
            rows,
            x,
            y,
            width,
            height,
            header_row_height,
            data_row_height,
        );
        self.shapes.push(shape);
    }

    /// Add a chart frame referencing a chart part registered on the
    /// presentation.
    ///
    /// Returns the shape ID of the frame. The chart relationship ID is
    /// assigned when the package is written.
    pub fn add_chart_shape(
        &mut self,
        chart_idx: u32,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> u32 {
        let shape_id = self.next_shape_id();
        self.shapes
            .push(Shape::new_chart(shape_id, chart_idx, x, y, width, height));
        shape_id
    }

    /// Get the number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the slide has no shapes yet.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Chart indices referenced by this slide, in shape order.
    pub(crate) fn chart_indices(&self) -> Vec<u32> {
        self.shapes.iter().filter_map(Shape::chart_idx).collect()
    }

    /// Generate slide XML content with relationship IDs from the mapper.
    pub(crate) fn to_xml(
        &self,
        slide_index: usize,
        rel_mapper: &RelationshipMapper,
    ) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");

        // Group shape properties (required)
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        for shape in &self.shapes {
            let chart_rel_id = shape
                .chart_idx()
                .and_then(|idx| rel_mapper.get_chart_id(slide_index, idx));
            shape.to_xml(&mut xml, chart_rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::shape::Alignment;

    #[test]
    fn test_shape_ids_start_after_group() {
        let mut slide = Slide::new(256);
        slide.add_text_box(
            vec!["Title".to_string()],
            0,
            0,
            100,
            100,
            TextFormat::default(),
            None,
        );
        let id = slide.add_chart_shape(0, 0, 0, 100, 100);
        assert_eq!(slide.shape_count(), 2);
        assert_eq!(id, 3);
    }

    #[test]
    fn test_slide_xml_with_chart_relationship() {
        let mut slide = Slide::new(256);
        slide.add_chart_shape(0, 0, 0, 100, 100);

        let mut mapper = RelationshipMapper::new();
        mapper.add_chart(0, 0, "rId2".to_string());

        let xml = slide.to_xml(0, &mapper).unwrap();
        assert!(xml.contains("<p:sld "));
        assert!(xml.contains(r#"r:id="rId2""#));
    }

    #[test]
    fn test_slide_xml_shape_order_preserved() {
        let mut slide = Slide::new(256);
        slide.add_text_box(
            vec!["Header".to_string()],
            0,
            0,
            100,
            100,
            TextFormat::default(),
            None,
        );
        slide.add_table(
            vec![vec![TableCell::new("status", Alignment::Center, 18.0, true)]],
            0,
            0,
            100,
            100,
            50,
            30,
        );

        let xml = slide.to_xml(0, &RelationshipMapper::new()).unwrap();
        let sp_pos = xml.find("<p:sp>").unwrap();
        let tbl_pos = xml.find("<p:graphicFrame>").unwrap();
        assert!(sp_pos < tbl_pos);
    }
}
