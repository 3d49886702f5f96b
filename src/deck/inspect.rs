//! Structural inspection of saved decks.
//!
//! Reads a .pptx package back and reports its slide structure: how many
//! slides, and which kinds of blocks each slide carries in order. This is a
//! structural view, not a full parse — enough to verify that a composed deck
//! round-trips with the same shape.

use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// The kind of a placed block, as recovered from slide XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A text box (`p:sp`)
    TextBox,
    /// A table graphic frame (`a:tbl`)
    Table,
    /// A chart graphic frame (`c:chart` reference)
    Chart,
}

/// Blocks found on one slide, in document order.
#[derive(Debug, Clone, Default)]
pub struct SlideSummary {
    pub blocks: Vec<BlockKind>,
}

/// Structure of a saved deck.
#[derive(Debug, Clone, Default)]
pub struct DeckSummary {
    /// One entry per slide, in presentation order
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    /// Number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Inspect a saved deck file.
pub fn inspect_deck<P: AsRef<Path>>(path: P) -> Result<DeckSummary> {
    let bytes = std::fs::read(path)?;
    inspect_deck_bytes(&bytes)
}

/// Inspect deck package bytes.
pub fn inspect_deck_bytes(bytes: &[u8]) -> Result<DeckSummary> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let presentation_xml = read_member(&mut archive, "ppt/presentation.xml")?;
    let slide_count = count_slide_ids(&presentation_xml)?;

    let mut slides = Vec::with_capacity(slide_count);
    for i in 1..=slide_count {
        let slide_xml = read_member(&mut archive, &format!("ppt/slides/slide{}.xml", i))?;
        slides.push(SlideSummary {
            blocks: scan_slide_blocks(&slide_xml)?,
        });
    }

    Ok(DeckSummary { slides })
}

fn read_member(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>> {
    let mut member = archive
        .by_name(name)
        .map_err(|_| Error::PartNotFound(name.to_string()))?;
    let mut buf = Vec::with_capacity(member.size() as usize);
    member.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Count the `<p:sldId>` elements in presentation.xml.
fn count_slide_ids(xml: &[u8]) -> Result<usize> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut count = 0;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sldId" {
                    count += 1;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(count)
}

/// Recover block kinds from slide XML in document order.
///
/// Text boxes appear as `p:sp` elements; tables and charts both live inside
/// `p:graphicFrame`, distinguished by the payload element (`a:tbl` vs a
/// `c:chart` reference).
fn scan_slide_blocks(xml: &[u8]) -> Result<Vec<BlockKind>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut blocks = Vec::new();
    let mut buf = Vec::new();
    let mut frame_kind: Option<BlockKind> = None;
    let mut in_frame = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"sp" => blocks.push(BlockKind::TextBox),
                b"graphicFrame" => {
                    in_frame = true;
                    frame_kind = None;
                },
                b"tbl" if in_frame => frame_kind = Some(BlockKind::Table),
                b"chart" if in_frame => frame_kind = Some(BlockKind::Chart),
                _ => {},
            },
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"graphicFrame" {
                    if let Some(kind) = frame_kind.take() {
                        blocks.push(kind);
                    }
                    in_frame = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::chart::{ChartKind, ChartSeries, ChartSpec};
    use crate::deck::package::{DocProps, write_deck};
    use crate::deck::presentation::Presentation;
    use crate::deck::shape::{Alignment, TableCell, TextFormat};

    #[test]
    fn test_round_trip_structure() {
        let mut pres = Presentation::new();
        let chart_idx = pres.register_chart(
            ChartSpec::new(ChartKind::ColumnClustered, vec!["ERROR".to_string()])
                .add_series(ChartSeries::new("count", vec![5.0])),
        );

        let slide = pres.add_slide();
        slide.add_text_box(
            vec!["Exceptions".to_string()],
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

        let slide2 = pres.add_slide();
        slide2.add_chart_shape(chart_idx, 0, 0, 100, 100);

        let bytes = write_deck(&pres, &DocProps::default()).unwrap();
        let summary = inspect_deck_bytes(&bytes).unwrap();

        assert_eq!(summary.slide_count(), 2);
        assert_eq!(
            summary.slides[0].blocks,
            vec![BlockKind::TextBox, BlockKind::Table]
        );
        assert_eq!(summary.slides[1].blocks, vec![BlockKind::Chart]);
    }

    #[test]
    fn test_inspect_rejects_non_package_bytes() {
        assert!(inspect_deck_bytes(b"not a zip archive").is_err());
    }
}
