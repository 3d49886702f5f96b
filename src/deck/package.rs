//! OPC package assembly.
//!
//! Serializes a [`Presentation`] into the ZIP-based OPC container layout of
//! a .pptx file: content types, package and part relationships, the static
//! master/layout/theme parts, one part per slide and chart, and document
//! properties.
//!
//! Saving is idempotent (a later save overwrites the same path) but not
//! atomic: a crash mid-write may leave a truncated file. Callers needing
//! atomicity should write to a temporary path and rename on success.

use crate::common::{Error, Result};
use crate::common::xml::escape_xml;
use crate::deck::presentation::Presentation;
use crate::deck::relmap::RelationshipMapper;
use crate::deck::template;
use chrono::{DateTime, Utc};
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Document properties written to docProps/core.xml and docProps/app.xml.
#[derive(Debug, Clone, Default)]
pub struct DocProps {
    /// Document title
    pub title: Option<String>,
    /// Document author/creator
    pub author: Option<String>,
    /// Creation time; defaults to the save time
    pub created: Option<DateTime<Utc>>,
    /// Last modification time; defaults to the save time
    pub modified: Option<DateTime<Utc>>,
}

impl DocProps {
    /// Builder method: set the title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Builder method: set the author.
    pub fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }
}

/// Physical package writer that collects parts into an in-memory ZIP archive.
struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PackageWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write one part with Deflate compression.
    fn write_part(&mut self, name: &str, blob: &[u8]) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| Error::Zip(e.to_string()))?;
        self.zip.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    fn finish_to_bytes(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish().map_err(|e| Error::Zip(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Serialize the presentation into .pptx package bytes.
pub fn write_deck(pres: &Presentation, props: &DocProps) -> Result<Vec<u8>> {
    let mut writer = PackageWriter::new();

    writer.write_part("[Content_Types].xml", generate_content_types(pres).as_bytes())?;
    writer.write_part("_rels/.rels", ROOT_RELS.as_bytes())?;

    // Static parts shared by every deck
    writer.write_part(
        "ppt/slideMasters/slideMaster1.xml",
        template::default_slide_master_xml().as_bytes(),
    )?;
    writer.write_part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        MASTER_RELS.as_bytes(),
    )?;
    writer.write_part(
        "ppt/slideLayouts/slideLayout1.xml",
        template::default_slide_layout_xml().as_bytes(),
    )?;
    writer.write_part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        LAYOUT_RELS.as_bytes(),
    )?;
    writer.write_part(
        "ppt/theme/theme1.xml",
        template::default_theme_xml().as_bytes(),
    )?;

    // Slides reference the master via presentation.xml.rels: rId1 is the
    // master, slides follow from rId2.
    let slide_rel_ids: Vec<String> = (0..pres.slide_count())
        .map(|i| format!("rId{}", i + 2))
        .collect();
    writer.write_part(
        "ppt/presentation.xml",
        pres.generate_presentation_xml(&slide_rel_ids)?.as_bytes(),
    )?;
    writer.write_part(
        "ppt/_rels/presentation.xml.rels",
        generate_presentation_rels(pres.slide_count()).as_bytes(),
    )?;

    // Per-slide relationships are created first so slide XML can reference
    // actual chart relationship IDs.
    let mut rel_mapper = RelationshipMapper::new();
    for (slide_index, slide) in pres.slides().iter().enumerate() {
        for (n, chart_idx) in slide.chart_indices().into_iter().enumerate() {
            rel_mapper.add_chart(slide_index, chart_idx, format!("rId{}", n + 2));
        }
    }

    for (slide_index, slide) in pres.slides().iter().enumerate() {
        let xml = slide.to_xml(slide_index, &rel_mapper)?;
        writer.write_part(&format!("ppt/slides/slide{}.xml", slide_index + 1), xml.as_bytes())?;
        writer.write_part(
            &format!("ppt/slides/_rels/slide{}.xml.rels", slide_index + 1),
            generate_slide_rels(&slide.chart_indices()).as_bytes(),
        )?;
    }

    for (chart_idx, chart) in pres.charts().iter().enumerate() {
        writer.write_part(
            &format!("ppt/charts/chart{}.xml", chart_idx + 1),
            chart.to_xml()?.as_bytes(),
        )?;
    }

    writer.write_part("docProps/core.xml", generate_core_props(props).as_bytes())?;
    writer.write_part(
        "docProps/app.xml",
        generate_app_props(pres.slide_count()).as_bytes(),
    )?;

    writer.finish_to_bytes()
}

/// Serialize the presentation and write it to `path`.
///
/// Last write wins: saving again overwrites the same path with the current
/// state of the deck.
pub fn save_deck<P: AsRef<Path>>(pres: &Presentation, props: &DocProps, path: P) -> Result<()> {
    let bytes = write_deck(pres, props)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
</Relationships>"#;

const LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#;

fn generate_content_types(pres: &Presentation) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for i in 0..pres.slide_count() {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            i + 1
        );
    }
    for i in 0..pres.charts().len() {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/charts/chart{}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawingml.chart+xml"/>"#,
            i + 1
        );
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

fn generate_presentation_rels(slide_count: usize) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#);
    for i in 0..slide_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i + 2,
            i + 1
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn generate_slide_rels(chart_indices: &[u32]) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#);
    for (n, chart_idx) in chart_indices.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart{}.xml"/>"#,
            n + 2,
            chart_idx + 1
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn generate_core_props(props: &DocProps) -> String {
    let now = Utc::now();
    let created = props.created.unwrap_or(now).format("%Y-%m-%dT%H:%M:%SZ");
    let modified = props.modified.unwrap_or(now).format("%Y-%m-%dT%H:%M:%SZ");

    let mut xml = String::with_capacity(512);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    if let Some(ref title) = props.title {
        let _ = write!(xml, "<dc:title>{}</dc:title>", escape_xml(title));
    }
    if let Some(ref author) = props.author {
        let _ = write!(xml, "<dc:creator>{}</dc:creator>", escape_xml(author));
    }
    let _ = write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        created
    );
    let _ = write!(
        xml,
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        modified
    );
    xml.push_str("</cp:coreProperties>");
    xml
}

fn generate_app_props(slide_count: usize) -> String {
    let mut xml = String::with_capacity(256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#);
    xml.push_str("<Application>statusdeck</Application>");
    let _ = write!(xml, "<Slides>{}</Slides>", slide_count);
    xml.push_str("</Properties>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::chart::{ChartKind, ChartSeries, ChartSpec};

    fn one_slide_deck() -> Presentation {
        let mut pres = Presentation::new();
        let chart_idx = pres.register_chart(
            ChartSpec::new(ChartKind::ColumnClustered, vec!["A".to_string()])
                .add_series(ChartSeries::new("count", vec![1.0])),
        );
        let slide = pres.add_slide();
        slide.add_chart_shape(chart_idx, 0, 0, 100, 100);
        pres
    }

    #[test]
    fn test_write_deck_produces_zip() {
        let pres = one_slide_deck();
        let bytes = write_deck(&pres, &DocProps::default()).unwrap();
        // ZIP local file header magic
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_content_types_lists_every_part() {
        let pres = one_slide_deck();
        let xml = generate_content_types(&pres);
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/charts/chart1.xml"));
        assert!(xml.contains("/docProps/core.xml"));
    }

    #[test]
    fn test_slide_rels_reference_charts() {
        let xml = generate_slide_rels(&[0]);
        assert!(xml.contains(r#"Target="../charts/chart1.xml""#));
        assert!(xml.contains(r#"Id="rId2""#));
    }

    #[test]
    fn test_core_props_respects_explicit_timestamps() {
        let props = DocProps {
            created: Some("2026-01-15T10:00:00Z".parse().unwrap()),
            modified: Some("2026-02-01T09:30:00Z".parse().unwrap()),
            ..Default::default()
        };
        let xml = generate_core_props(&props);
        assert!(xml.contains("2026-01-15T10:00:00Z"));
        assert!(xml.contains("2026-02-01T09:30:00Z"));
    }

    #[test]
    fn test_save_deck_round_trips_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pptx");
        let pres = one_slide_deck();
        save_deck(&pres, &DocProps::default().with_title("Status"), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");

        // Idempotent: saving again overwrites the same path
        save_deck(&pres, &DocProps::default(), &path).unwrap();
    }
}
