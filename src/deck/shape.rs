/// Shape types and XML generation for deck slides.
use crate::common::xml::escape_xml;
use crate::common::{Error, Result};
use crate::common::unit::pt_to_centipoints;
use std::fmt::Write as FmtWrite;

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    fn xml_value(&self) -> &'static str {
        match self {
            Alignment::Left => "l",
            Alignment::Center => "ctr",
            Alignment::Right => "r",
        }
    }
}

/// Text formatting properties for text-box shapes.
#[derive(Debug, Clone, Default)]
pub struct TextFormat {
    /// Font size in points
    pub size: Option<f64>,
    /// Bold text
    pub bold: bool,
    /// Text color in hex RGB (e.g., "FF0000" for red)
    pub color: Option<String>,
    /// Paragraph alignment
    pub align: Alignment,
}

/// One table cell: display text plus per-cell formatting.
#[derive(Debug, Clone)]
pub struct TableCell {
    pub text: String,
    pub align: Alignment,
    /// Font size in points
    pub size: f64,
    pub bold: bool,
}

impl TableCell {
    pub fn new(text: impl Into<String>, align: Alignment, size: f64, bold: bool) -> Self {
        Self {
            text: text.into(),
            align,
            size,
            bold,
        }
    }
}

/// A shape placed on a slide.
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) shape_id: u32,
    pub(crate) kind: ShapeKind,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeKind {
    TextBox {
        /// One entry per paragraph
        lines: Vec<String>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        format: TextFormat,
        /// Solid fill color in hex RGB, for annotated summary boxes
        fill_color: Option<String>,
    },
    Table {
        /// Row-major cells; the first row is the header
        rows: Vec<Vec<TableCell>>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        header_row_height: i64,
        data_row_height: i64,
    },
    Chart {
        /// Index of the registered chart part on the presentation
        chart_idx: u32,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },
}

impl Shape {
    pub(crate) fn new_text_box(
        shape_id: u32,
        lines: Vec<String>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        format: TextFormat,
        fill_color: Option<String>,
    ) -> Self {
        Self {
            shape_id,
            kind: ShapeKind::TextBox {
                lines,
                x,
                y,
                width,
                height,
                format,
                fill_color,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_table(
        shape_id: u32,
        rows: Vec<Vec<TableCell>>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        header_row_height: i64,
        data_row_height: i64,
    ) -> Self {
        Self {
            shape_id,
            kind: ShapeKind::Table {
                rows,
                x,
                y,
                width,
                height,
                header_row_height,
                data_row_height,
            },
        }
    }

    pub(crate) fn new_chart(
        shape_id: u32,
        chart_idx: u32,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Self {
        Self {
            shape_id,
            kind: ShapeKind::Chart {
                chart_idx,
                x,
                y,
                width,
                height,
            },
        }
    }

    /// The registered chart index, if this shape is a chart frame.
    pub(crate) fn chart_idx(&self) -> Option<u32> {
        match &self.kind {
            ShapeKind::Chart { chart_idx, .. } => Some(*chart_idx),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// For chart frames the relationship ID is required; it is assigned when
    /// the package writer wires slide relationships.
    pub(crate) fn to_xml(&self, xml: &mut String, chart_rel_id: Option<&str>) -> Result<()> {
        match &self.kind {
            ShapeKind::TextBox {
                lines,
                x,
                y,
                width,
                height,
                format,
                fill_color,
            } => self.write_text_box(xml, lines, *x, *y, *width, *height, format, fill_color),
            ShapeKind::Table {
                rows,
                x,
                y,
                width,
                height,
                header_row_height,
                data_row_height,
            } => self.write_table(
                xml,
                rows,
                *x,
                *y,
                *width,
                *height,
                *header_row_height,
                *data_row_height,
            ),
            ShapeKind::Chart {
                x,
                y,
                width,
                height,
                ..
            } => {
                let rel_id = chart_rel_id.ok_or_else(|| {
                    Error::Xml(format!(
                        "no chart relationship assigned for shape {}",
                        self.shape_id
                    ))
                })?;
                self.write_chart_frame(xml, *x, *y, *width, *height, rel_id)
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn write_text_box(
        &self,
        xml: &mut String,
        lines: &[String],
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        format: &TextFormat,
        fill_color: &Option<String>,
    ) -> Result<()> {
        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="Text Box {}"/>"#,
            self.shape_id, self.shape_id
        )?;
        xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvSpPr>");

        xml.push_str("<p:spPr>");
        xml.push_str("<a:xfrm>");
        write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
        write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
        xml.push_str("</a:xfrm>");
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
        if let Some(color) = fill_color {
            xml.push_str("<a:solidFill>");
            write!(xml, r#"<a:srgbClr val="{}"/>"#, color)?;
            xml.push_str("</a:solidFill>");
        }
        xml.push_str("</p:spPr>");

        xml.push_str("<p:txBody>");
        // anchor="ctr" centers the text block vertically within its extent
        xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0" anchor="ctr"/>"#);
        xml.push_str("<a:lstStyle/>");

        for line in lines {
            xml.push_str("<a:p>");
            write!(xml, r#"<a:pPr algn="{}"/>"#, format.align.xml_value())?;
            xml.push_str("<a:r>");

            xml.push_str("<a:rPr lang=\"en-US\" dirty=\"0\"");
            if let Some(size) = format.size {
                write!(xml, " sz=\"{}\"", pt_to_centipoints(size))?;
            }
            if format.bold {
                xml.push_str(" b=\"1\"");
            }
            xml.push('>');
            if let Some(ref color) = format.color {
                write!(
                    xml,
                    "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
                    color
                )?;
            }
            xml.push_str("</a:rPr>");

            write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
            xml.push_str("</a:r>");
            xml.push_str("</a:p>");
        }

        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn write_table(
        &self,
        xml: &mut String,
        rows: &[Vec<TableCell>],
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        header_row_height: i64,
        data_row_height: i64,
    ) -> Result<()> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Ok(());
        }

        xml.push_str("<p:graphicFrame>");
        xml.push_str("<p:nvGraphicFramePr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="Table {}"/>"#,
            self.shape_id, self.shape_id
        )?;
        xml.push_str("<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp=\"1\"/></p:cNvGraphicFramePr>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGraphicFramePr>");

        xml.push_str("<p:xfrm>");
        write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
        write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
        xml.push_str("</p:xfrm>");

        xml.push_str("<a:graphic>");
        xml.push_str(
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">"#,
        );
        xml.push_str("<a:tbl>");
        xml.push_str(r#"<a:tblPr firstRow="1" bandRow="1"/>"#);

        // Equal column widths across the table extent
        xml.push_str("<a:tblGrid>");
        let col_width = width / cols as i64;
        for _ in 0..cols {
            write!(xml, r#"<a:gridCol w="{}"/>"#, col_width)?;
        }
        xml.push_str("</a:tblGrid>");

        for (row_idx, row) in rows.iter().enumerate() {
            let row_height = if row_idx == 0 {
                header_row_height
            } else {
                data_row_height
            };
            write!(xml, r#"<a:tr h="{}">"#, row_height)?;
            for cell in row {
                xml.push_str("<a:tc>");
                xml.push_str("<a:txBody>");
                xml.push_str("<a:bodyPr/>");
                xml.push_str("<a:lstStyle/>");
                xml.push_str("<a:p>");
                write!(xml, r#"<a:pPr algn="{}"/>"#, cell.align.xml_value())?;
                xml.push_str("<a:r>");
                write!(
                    xml,
                    "<a:rPr lang=\"en-US\" sz=\"{}\"",
                    pt_to_centipoints(cell.size)
                )?;
                if cell.bold {
                    xml.push_str(" b=\"1\"");
                }
                xml.push_str(" dirty=\"0\"/>");
                write!(xml, "<a:t>{}</a:t>", escape_xml(&cell.text))?;
                xml.push_str("</a:r>");
                xml.push_str("</a:p>");
                xml.push_str("</a:txBody>");
                xml.push_str("<a:tcPr/>");
                xml.push_str("</a:tc>");
            }
            xml.push_str("</a:tr>");
        }

        xml.push_str("</a:tbl>");
        xml.push_str("</a:graphicData>");
        xml.push_str("</a:graphic>");
        xml.push_str("</p:graphicFrame>");

        Ok(())
    }

    fn write_chart_frame(
        &self,
        xml: &mut String,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        rel_id: &str,
    ) -> Result<()> {
        xml.push_str("<p:graphicFrame>");
        xml.push_str("<p:nvGraphicFramePr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="Chart {}"/>"#,
            self.shape_id, self.shape_id
        )?;
        xml.push_str("<p:cNvGraphicFramePr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGraphicFramePr>");

        xml.push_str("<p:xfrm>");
        write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
        write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
        xml.push_str("</p:xfrm>");

        xml.push_str("<a:graphic>");
        xml.push_str(
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">"#,
        );
        write!(
            xml,
            r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="{}"/>"#,
            rel_id
        )?;
        xml.push_str("</a:graphicData>");
        xml.push_str("</a:graphic>");
        xml.push_str("</p:graphicFrame>");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_box_xml() {
        let shape = Shape::new_text_box(
            3,
            vec!["Jobs & Queues".to_string()],
            914_400,
            457_200,
            7_315_200,
            914_400,
            TextFormat {
                size: Some(28.0),
                align: Alignment::Center,
                ..Default::default()
            },
            None,
        );
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains("txBox=\"1\""));
        assert!(xml.contains("algn=\"ctr\""));
        assert!(xml.contains("sz=\"2800\""));
        assert!(xml.contains("Jobs &amp; Queues"));
    }

    #[test]
    fn test_table_xml_row_and_cell_counts() {
        let rows = vec![
            vec![
                TableCell::new("status", Alignment::Center, 18.0, true),
                TableCell::new("count", Alignment::Center, 18.0, true),
            ],
            vec![
                TableCell::new("ERROR", Alignment::Left, 16.0, false),
                TableCell::new("5", Alignment::Center, 16.0, false),
            ],
        ];
        let shape = Shape::new_table(4, rows, 0, 0, 8_229_600, 1_005_840, 457_200, 274_320);
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert_eq!(xml.matches("<a:tr ").count(), 2);
        assert_eq!(xml.matches("<a:tc>").count(), 4);
        assert_eq!(xml.matches("<a:gridCol").count(), 2);
    }

    #[test]
    fn test_chart_frame_requires_rel_id() {
        let shape = Shape::new_chart(5, 0, 0, 0, 5_486_400, 3_657_600);
        let mut xml = String::new();
        assert!(shape.to_xml(&mut xml, None).is_err());
        assert!(shape.to_xml(&mut xml, Some("rId2")).is_ok());
        assert!(xml.contains(r#"r:id="rId2""#));
    }
}
