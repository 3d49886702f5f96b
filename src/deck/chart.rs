//! Chart part generation.
//!
//! Charts are separate package parts (`/ppt/charts/chartN.xml`) referenced
//! from slide graphic frames by relationship ID. Category and value data is
//! written as literal caches (`c:strLit`/`c:numLit`), so no embedded
//! workbook is required for the chart to render.

use crate::common::Result;
use crate::common::xml::escape_xml;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

/// Chart type for a chart part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Vertical clustered bars
    #[default]
    ColumnClustered,
    /// Horizontal clustered bars
    BarClustered,
    /// Line chart
    Line,
    /// Pie chart
    Pie,
}

/// One named series of values, one value per category.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A complete chart: kind, shared categories, and one or more series.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, categories: Vec<String>) -> Self {
        Self {
            kind,
            categories,
            series: Vec::new(),
        }
    }

    /// Builder method: append a series.
    pub fn add_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Generate the chart part XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        xml.push_str(r#"<c:date1904 val="0"/>"#);
        xml.push_str(r#"<c:lang val="en-US"/>"#);
        xml.push_str(r#"<c:roundedCorners val="0"/>"#);

        xml.push_str("<c:chart>");
        xml.push_str(r#"<c:autoTitleDeleted val="1"/>"#);
        xml.push_str("<c:plotArea>");
        xml.push_str("<c:layout/>");

        match self.kind {
            ChartKind::ColumnClustered => self.write_bar_chart(&mut xml, "col")?,
            ChartKind::BarClustered => self.write_bar_chart(&mut xml, "bar")?,
            ChartKind::Line => self.write_line_chart(&mut xml)?,
            ChartKind::Pie => self.write_pie_chart(&mut xml)?,
        }

        if self.kind != ChartKind::Pie {
            self.write_axes(&mut xml)?;
        }

        xml.push_str("</c:plotArea>");

        if self.series.len() > 1 || self.kind == ChartKind::Pie {
            xml.push_str("<c:legend>");
            xml.push_str(r#"<c:legendPos val="b"/>"#);
            xml.push_str(r#"<c:overlay val="0"/>"#);
            xml.push_str("</c:legend>");
        }

        xml.push_str(r#"<c:plotVisOnly val="1"/>"#);
        xml.push_str(r#"<c:dispBlanksAs val="gap"/>"#);
        xml.push_str("</c:chart>");
        xml.push_str("</c:chartSpace>");

        Ok(xml)
    }

    fn write_bar_chart(&self, xml: &mut String, direction: &str) -> Result<()> {
        xml.push_str("<c:barChart>");
        write!(xml, r#"<c:barDir val="{}"/>"#, direction)?;
        xml.push_str(r#"<c:grouping val="clustered"/>"#);
        xml.push_str(r#"<c:varyColors val="0"/>"#);
        self.write_all_series(xml)?;
        xml.push_str(r#"<c:gapWidth val="150"/>"#);
        xml.push_str(r#"<c:axId val="1"/><c:axId val="2"/>"#);
        xml.push_str("</c:barChart>");
        Ok(())
    }

    fn write_line_chart(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<c:lineChart>");
        xml.push_str(r#"<c:grouping val="standard"/>"#);
        xml.push_str(r#"<c:varyColors val="0"/>"#);
        self.write_all_series(xml)?;
        xml.push_str(r#"<c:marker val="1"/>"#);
        xml.push_str(r#"<c:axId val="1"/><c:axId val="2"/>"#);
        xml.push_str("</c:lineChart>");
        Ok(())
    }

    fn write_pie_chart(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<c:pieChart>");
        xml.push_str(r#"<c:varyColors val="1"/>"#);
        self.write_all_series(xml)?;
        xml.push_str(r#"<c:firstSliceAng val="0"/>"#);
        xml.push_str("</c:pieChart>");
        Ok(())
    }

    fn write_all_series(&self, xml: &mut String) -> Result<()> {
        for (idx, series) in self.series.iter().enumerate() {
            self.write_series(xml, idx, series)?;
        }
        Ok(())
    }

    fn write_series(&self, xml: &mut String, idx: usize, series: &ChartSeries) -> Result<()> {
        xml.push_str("<c:ser>");
        write!(xml, r#"<c:idx val="{}"/>"#, idx)?;
        write!(xml, r#"<c:order val="{}"/>"#, idx)?;
        write!(xml, "<c:tx><c:v>{}</c:v></c:tx>", escape_xml(&series.name))?;

        xml.push_str("<c:cat><c:strLit>");
        write!(xml, r#"<c:ptCount val="{}"/>"#, self.categories.len())?;
        for (i, category) in self.categories.iter().enumerate() {
            write!(
                xml,
                r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                i,
                escape_xml(category)
            )?;
        }
        xml.push_str("</c:strLit></c:cat>");

        xml.push_str("<c:val><c:numLit>");
        xml.push_str(r#"<c:formatCode>General</c:formatCode>"#);
        write!(xml, r#"<c:ptCount val="{}"/>"#, series.values.len())?;
        for (i, value) in series.values.iter().enumerate() {
            write!(xml, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, value)?;
        }
        xml.push_str("</c:numLit></c:val>");

        xml.push_str("</c:ser>");
        Ok(())
    }

    fn write_axes(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<c:catAx>");
        xml.push_str(r#"<c:axId val="1"/>"#);
        xml.push_str(r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#);
        xml.push_str(r#"<c:delete val="0"/>"#);
        xml.push_str(r#"<c:axPos val="b"/>"#);
        xml.push_str(r#"<c:crossAx val="2"/>"#);
        xml.push_str("</c:catAx>");

        xml.push_str("<c:valAx>");
        xml.push_str(r#"<c:axId val="2"/>"#);
        xml.push_str(r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#);
        xml.push_str(r#"<c:delete val="0"/>"#);
        xml.push_str(r#"<c:axPos val="l"/>"#);
        xml.push_str(r#"<c:crossAx val="1"/>"#);
        xml.push_str("</c:valAx>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_chart() -> ChartSpec {
        ChartSpec::new(
            ChartKind::ColumnClustered,
            vec!["ERROR".to_string(), "TIMEOUT".to_string()],
        )
        .add_series(ChartSeries::new("count", vec![5.0, 3.0]))
    }

    #[test]
    fn test_column_chart_xml() {
        let xml = status_chart().to_xml().unwrap();
        assert!(xml.contains("<c:barChart>"));
        assert!(xml.contains(r#"<c:barDir val="col"/>"#));
        assert!(xml.contains("<c:v>count</c:v>"));
        assert!(xml.contains("<c:v>ERROR</c:v>"));
        assert!(xml.contains(r#"<c:pt idx="1"><c:v>3</c:v></c:pt>"#));
        assert!(xml.contains("<c:catAx>"));
    }

    #[test]
    fn test_single_series_has_no_legend() {
        let xml = status_chart().to_xml().unwrap();
        assert!(!xml.contains("<c:legend>"));
    }

    #[test]
    fn test_two_series_chart() {
        let spec = ChartSpec::new(
            ChartKind::ColumnClustered,
            vec!["week 1".to_string(), "week 2".to_string()],
        )
        .add_series(ChartSeries::new("jobs", vec![120.0, 80.0]))
        .add_series(ChartSeries::new("cancellations", vec![4.0, 9.0]));
        let xml = spec.to_xml().unwrap();
        assert_eq!(xml.matches("<c:ser>").count(), 2);
        assert!(xml.contains("<c:legend>"));
        assert!(xml.contains(r#"<c:order val="1"/>"#));
    }

    #[test]
    fn test_pie_chart_has_no_axes() {
        let mut spec = status_chart();
        spec.kind = ChartKind::Pie;
        let xml = spec.to_xml().unwrap();
        assert!(xml.contains("<c:pieChart>"));
        assert!(!xml.contains("<c:catAx>"));
    }
}
