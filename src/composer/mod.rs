//! The slide composition engine.
//!
//! [`SlideComposer`] owns a deck under construction and a running vertical
//! cursor on the current slide. Add-operations measure their block, ask
//! [`SlideComposer::ensure_space`] for room, place the block at the cursor,
//! and advance the cursor. When a block would not fit, a fresh slide is
//! started and the cursor resets to the configured top offset — the cursor
//! never exceeds the maximum content height on a slide that receives a
//! block.
//!
//! Horizontal layout is static (left margin and widths come from
//! [`LayoutConfig`]); only vertical stacking is dynamic.
//!
//! All operations are synchronous, in-memory composition; the only external
//! resource is the output file touched by [`SlideComposer::save`]. A
//! composer is exclusively owned by one thread of control — it is not safe
//! for concurrent mutation.

mod config;

pub use config::LayoutConfig;

use crate::common::{Error, Result};
use crate::dataset::{Record, group_thousands, numeric_column, text_column, validate_shape};
use crate::deck::package::{DocProps, save_deck};
use crate::deck::{Alignment, ChartSeries, ChartSpec, Presentation, Slide, TableCell, TextFormat};
use std::path::PathBuf;

/// Font size for title blocks, in points.
const TITLE_FONT_PT: f64 = 28.0;
/// Font size for table header cells, in points.
const TABLE_HEADER_FONT_PT: f64 = 18.0;
/// Font size for table data cells, in points.
const TABLE_BODY_FONT_PT: f64 = 16.0;
/// Font size for annotated summary boxes, in points.
const SUMMARY_FONT_PT: f64 = 14.0;

/// Fill color of computed summary boxes (light blue).
const SUMMARY_FILL: &str = "DDEBF7";
/// Fill color of static note boxes (light yellow).
const NOTE_FILL: &str = "FFF2CC";

/// Note shown next to the jobs summary chart.
const JOBS_SUMMARY_NOTE: &str = "Totals cover all runs recorded in the reporting window.";
/// Note shown next to the SLA compliance box.
const SLA_NOTE: &str = "SLA buckets classify completed jobs by turnaround time.";

/// Completed-job totals backing the SLA compliance summary.
#[derive(Debug, Clone, Copy)]
pub struct SlaSummary {
    /// Total number of completed jobs
    pub total_done: u64,
    /// Completed jobs that finished within their SLA bucket
    pub done_within_sla: u64,
}

impl SlaSummary {
    pub fn new(total_done: u64, done_within_sla: u64) -> Self {
        Self {
            total_done,
            done_within_sla,
        }
    }

    /// Completed jobs outside their SLA bucket.
    pub fn outside_sla(&self) -> u64 {
        self.total_done.saturating_sub(self.done_within_sla)
    }

    /// Compliance percentage with two decimal places, e.g. `"80.00%"`.
    ///
    /// A window with no completed jobs reports `"0.00%"` rather than
    /// raising an arithmetic fault.
    pub fn compliance_pct(&self) -> String {
        if self.total_done == 0 {
            return "0.00%".to_string();
        }
        format!(
            "{:.2}%",
            self.done_within_sla as f64 / self.total_done as f64 * 100.0
        )
    }
}

/// Composes report blocks onto slides with automatic overflow.
#[derive(Debug)]
pub struct SlideComposer {
    pres: Presentation,
    config: LayoutConfig,
    props: DocProps,
    /// Output path written by `save`
    output: PathBuf,
    /// Vertical offset of the next free position on the current slide
    cursor: i64,
}

impl SlideComposer {
    /// Create a composer writing to `output` with the given layout.
    pub fn new(output: impl Into<PathBuf>, config: LayoutConfig) -> Self {
        let cursor = config.default_top_offset;
        Self {
            pres: Presentation::new(),
            config,
            props: DocProps::default(),
            output: output.into(),
            cursor,
        }
    }

    /// Builder method: set document properties for the saved deck.
    pub fn with_doc_props(mut self, props: DocProps) -> Self {
        self.props = props;
        self
    }

    /// The deck under construction.
    pub fn presentation(&self) -> &Presentation {
        &self.pres
    }

    /// Number of slides so far.
    pub fn slide_count(&self) -> usize {
        self.pres.slide_count()
    }

    /// Current cursor offset in EMUs.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Start a fresh slide and reset the cursor to the top offset.
    pub fn new_slide(&mut self) {
        self.pres.add_slide();
        self.cursor = self.config.default_top_offset;
    }

    /// Start a fresh slide when the block of `height` would not fit.
    ///
    /// Pure capacity check; never errors. A fresh, still-empty slide is
    /// never abandoned: a block taller than the content budget is placed on
    /// it anyway, since no slide could fit it better.
    pub fn ensure_space(&mut self, height: i64) {
        let needs_new = match self.pres.slides().last() {
            None => true,
            Some(slide) => {
                !slide.is_empty() && self.cursor + height > self.config.max_content_height
            },
        };
        if needs_new {
            self.new_slide();
        }
    }

    fn current_slide(&mut self) -> &mut Slide {
        // ensure_space ran first on every path leading here
        self.pres
            .current_slide_mut()
            .expect("ensure_space placed a slide")
    }

    /// Place a horizontally- and vertically-centered title spanning the
    /// content width.
    pub fn add_title(&mut self, text: &str) {
        let height = self.config.title_height;
        self.ensure_space(height);

        let (x, y) = (self.config.left_margin, self.cursor);
        let width = self.config.content_width;
        self.current_slide().add_text_box(
            vec![text.to_string()],
            x,
            y,
            width,
            height,
            TextFormat {
                size: Some(TITLE_FONT_PT),
                align: Alignment::Center,
                ..Default::default()
            },
            None,
        );
        self.cursor = y + height + self.config.element_spacing;
    }

    /// Place a table: one header row from the first record's keys, one row
    /// per record.
    ///
    /// Numeric cells are formatted as thousands-grouped integers with no
    /// decimals; the second column is center-aligned, all others left. An
    /// empty dataset is a silent no-op. Records with inconsistent or
    /// reordered keys fail with [`Error::MalformedDataset`].
    pub fn add_table(&mut self, data: &[Record]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let headers = validate_shape(data, 1)?;

        let height =
            self.config.table_base_height + self.config.table_row_height * data.len() as i64;
        self.ensure_space(height);

        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(
            headers
                .iter()
                .map(|h| TableCell::new(h.clone(), Alignment::Center, TABLE_HEADER_FONT_PT, true))
                .collect::<Vec<_>>(),
        );
        for record in data {
            rows.push(
                record
                    .values()
                    .enumerate()
                    .map(|(col, value)| {
                        let align = if col == 1 {
                            Alignment::Center
                        } else {
                            Alignment::Left
                        };
                        TableCell::new(value.display_cell(), align, TABLE_BODY_FONT_PT, false)
                    })
                    .collect::<Vec<_>>(),
            );
        }

        let (x, y) = (self.config.left_margin, self.cursor);
        let width = self.config.content_width;
        let (header_h, row_h) = (self.config.table_base_height, self.config.table_row_height);
        self.current_slide()
            .add_table(rows, x, y, width, height, header_h, row_h);
        self.cursor = y + height + self.config.element_spacing;
        Ok(())
    }

    /// Place a chart of the first record's first two keys as (category,
    /// value) over all records.
    ///
    /// An empty dataset is a silent no-op. Fewer than two keys fail with
    /// [`Error::InsufficientColumns`]; a record missing one of the chosen
    /// keys fails with [`Error::MissingKey`].
    pub fn add_chart(&mut self, data: &[Record]) -> Result<()> {
        let Some(first) = data.first() else {
            return Ok(());
        };
        let keys: Vec<String> = first.keys().map(String::from).collect();
        if keys.len() < 2 {
            return Err(Error::InsufficientColumns {
                required: 2,
                found: keys.len(),
            });
        }

        let spec = self.series_chart(data, &keys[0], &[&keys[1]])?;
        self.place_chart(spec);
        Ok(())
    }

    /// Place the combined jobs-summary block: a chart of (category,
    /// primary, secondary) plus an adjacent annotated box with both series
    /// totals and a fixed note.
    ///
    /// The block's natural height equals the full content budget, so it
    /// claims a fresh slide whenever anything is already placed — it goes
    /// through the same overflow check as every other block, and ends up
    /// the sole content of its slide in practice.
    pub fn add_jobs_summary_chart(&mut self, data: &[Record]) -> Result<()> {
        let Some(first) = data.first() else {
            return Ok(());
        };
        let keys: Vec<String> = first.keys().map(String::from).collect();
        if keys.len() < 3 {
            return Err(Error::InsufficientColumns {
                required: 3,
                found: keys.len(),
            });
        }

        let categories = text_column(data, &keys[0])?;
        let primary = numeric_column(data, &keys[1])?;
        let secondary = numeric_column(data, &keys[2])?;

        let height = self.config.max_content_height;
        self.ensure_space(height);

        let spec = ChartSpec::new(self.config.chart_kind, categories)
            .add_series(ChartSeries::new(&keys[1], primary.clone()))
            .add_series(ChartSeries::new(&keys[2], secondary.clone()));
        let chart_idx = self.pres.register_chart(spec);

        let y = self.cursor;
        let (chart_x, chart_w, chart_h) = (
            self.config.left_margin,
            self.config.chart_width,
            self.config.chart_height,
        );
        let box_x = chart_x + chart_w + self.config.element_spacing;
        let box_w = self.config.content_width - chart_w - self.config.element_spacing;

        let total = |values: &[f64]| group_thousands(values.iter().sum::<f64>().round() as i64);
        let lines = vec![
            format!("Total {}: {}", keys[1], total(&primary)),
            format!("Total {}: {}", keys[2], total(&secondary)),
            JOBS_SUMMARY_NOTE.to_string(),
        ];

        let slide = self.current_slide();
        slide.add_chart_shape(chart_idx, chart_x, y, chart_w, chart_h);
        slide.add_text_box(
            lines,
            box_x,
            y,
            box_w,
            chart_h,
            TextFormat {
                size: Some(SUMMARY_FONT_PT),
                ..Default::default()
            },
            Some(SUMMARY_FILL.to_string()),
        );
        self.cursor = y + height + self.config.element_spacing;
        Ok(())
    }

    /// Place a table identical to [`SlideComposer::add_table`], then two
    /// adjacent annotated boxes beneath it: the SLA compliance summary
    /// computed from `summary`, and a static note.
    ///
    /// An empty dataset skips the whole block. A window with
    /// `total_done == 0` reports `0.00%` compliance (see
    /// [`SlaSummary::compliance_pct`]).
    pub fn add_sla_summary_table(&mut self, data: &[Record], summary: SlaSummary) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.add_table(data)?;

        let box_h = self.config.summary_box_height;
        self.ensure_space(box_h);

        let y = self.cursor;
        let half = (self.config.content_width - self.config.element_spacing) / 2;
        let left_x = self.config.left_margin;
        let right_x = left_x + half + self.config.element_spacing;

        let compliance_lines = vec![
            format!("Total completed: {}", group_thousands(summary.total_done as i64)),
            format!(
                "Within SLA: {}",
                group_thousands(summary.done_within_sla as i64)
            ),
            format!("Outside SLA: {}", group_thousands(summary.outside_sla() as i64)),
            format!("Compliance: {}", summary.compliance_pct()),
        ];

        let format = TextFormat {
            size: Some(SUMMARY_FONT_PT),
            ..Default::default()
        };
        let slide = self.current_slide();
        slide.add_text_box(
            compliance_lines,
            left_x,
            y,
            half,
            box_h,
            format.clone(),
            Some(SUMMARY_FILL.to_string()),
        );
        slide.add_text_box(
            vec![SLA_NOTE.to_string()],
            right_x,
            y,
            half,
            box_h,
            format,
            Some(NOTE_FILL.to_string()),
        );
        self.cursor = y + box_h + self.config.element_spacing;
        Ok(())
    }

    /// Place a chart of the first record's first and third keys as
    /// (category, value) over all records.
    ///
    /// `summary` is accepted for symmetry with
    /// [`SlideComposer::add_sla_summary_table`] but only the paired table
    /// consumes it. Fewer than three keys fail with
    /// [`Error::InsufficientColumns`].
    pub fn add_sla_chart(&mut self, data: &[Record], _summary: SlaSummary) -> Result<()> {
        let Some(first) = data.first() else {
            return Ok(());
        };
        let keys: Vec<String> = first.keys().map(String::from).collect();
        if keys.len() < 3 {
            return Err(Error::InsufficientColumns {
                required: 3,
                found: keys.len(),
            });
        }

        let spec = self.series_chart(data, &keys[0], &[&keys[2]])?;
        self.place_chart(spec);
        Ok(())
    }

    /// Serialize the deck to the configured output path.
    ///
    /// Idempotent: calling it again overwrites the same path with the
    /// current deck. Not atomic — callers needing atomicity should write to
    /// a temporary path and rename.
    pub fn save(&self) -> Result<()> {
        save_deck(&self.pres, &self.props, &self.output)
    }

    /// Build a chart spec with one series per value key.
    fn series_chart(
        &self,
        data: &[Record],
        label_key: &str,
        value_keys: &[&str],
    ) -> Result<ChartSpec> {
        let categories = text_column(data, label_key)?;
        let mut spec = ChartSpec::new(self.config.chart_kind, categories);
        for key in value_keys {
            spec = spec.add_series(ChartSeries::new(*key, numeric_column(data, key)?));
        }
        Ok(spec)
    }

    /// Register a chart part and place its frame at the cursor.
    fn place_chart(&mut self, spec: ChartSpec) {
        let chart_idx = self.pres.register_chart(spec);

        let height = self.config.chart_height;
        self.ensure_space(height);

        let (x, y) = (self.config.chart_left, self.cursor);
        let width = self.config.chart_width;
        self.current_slide()
            .add_chart_shape(chart_idx, x, y, width, height);
        self.cursor = y + height + self.config.element_spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::inches;
    use crate::dataset::Dataset;
    use crate::deck::BlockKind;
    use crate::deck::inspect::inspect_deck_bytes;
    use crate::deck::package::write_deck;
    use proptest::prelude::*;

    fn status_dataset() -> Dataset {
        vec![
            Record::new().with("status", "ERROR").with("count", 5i64),
            Record::new().with("status", "TIMEOUT").with("count", 3i64),
        ]
    }

    fn composer() -> SlideComposer {
        SlideComposer::new("unused.pptx", LayoutConfig::default())
    }

    #[test]
    fn test_title_starts_first_slide() {
        let mut c = composer();
        c.add_title("Exceptions Encountered in Jobs Processing");
        assert_eq!(c.slide_count(), 1);
        assert_eq!(c.presentation().slides()[0].shape_count(), 1);
    }

    #[test]
    fn test_table_rows_and_columns() {
        let mut c = composer();
        c.add_table(&status_dataset()).unwrap();

        let bytes = write_deck(c.presentation(), &DocProps::default()).unwrap();
        let summary = inspect_deck_bytes(&bytes).unwrap();
        assert_eq!(summary.slides[0].blocks, vec![BlockKind::Table]);

        // records + header, columns from the first record
        let xml = deck_slide_xml(&c, 0);
        assert_eq!(xml.matches("<a:tr ").count(), 3);
        assert_eq!(xml.matches("<a:gridCol").count(), 2);
        assert!(xml.contains("<a:t>status</a:t>"));
        assert!(xml.contains("<a:t>5</a:t>"));
        assert!(xml.contains("<a:t>3</a:t>"));
    }

    #[test]
    fn test_chart_series_from_first_two_keys() {
        let mut c = composer();
        c.add_chart(&status_dataset()).unwrap();

        let charts = c.presentation().charts();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].categories, vec!["ERROR", "TIMEOUT"]);
        assert_eq!(charts[0].series.len(), 1);
        assert_eq!(charts[0].series[0].name, "count");
        assert_eq!(charts[0].series[0].values, vec![5.0, 3.0]);
    }

    #[test]
    fn test_empty_dataset_is_a_no_op_everywhere() {
        let mut c = composer();
        let empty: Dataset = Vec::new();
        c.add_table(&empty).unwrap();
        c.add_chart(&empty).unwrap();
        c.add_jobs_summary_chart(&empty).unwrap();
        c.add_sla_summary_table(&empty, SlaSummary::new(10, 8)).unwrap();
        c.add_sla_chart(&empty, SlaSummary::new(10, 8)).unwrap();
        assert_eq!(c.slide_count(), 0);
    }

    #[test]
    fn test_chart_requires_two_columns() {
        let mut c = composer();
        let data = vec![Record::new().with("status", "ERROR")];
        assert!(matches!(
            c.add_chart(&data),
            Err(Error::InsufficientColumns {
                required: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_chart_missing_key_names_offender() {
        let mut c = composer();
        let data = vec![
            Record::new().with("status", "ERROR").with("count", 5i64),
            Record::new().with("status", "TIMEOUT").with("total", 3i64),
        ];
        assert!(matches!(
            c.add_chart(&data),
            Err(Error::MissingKey(k)) if k == "count"
        ));
    }

    #[test]
    fn test_table_rejects_reordered_keys() {
        let mut c = composer();
        let data = vec![
            Record::new().with("status", "ERROR").with("count", 5i64),
            Record::new().with("count", 3i64).with("status", "TIMEOUT"),
        ];
        assert!(matches!(
            c.add_table(&data),
            Err(Error::MalformedDataset(_))
        ));
    }

    #[test]
    fn test_overflow_starts_new_slide() {
        let mut c = composer();
        // Each title consumes title_height + spacing from a 6.5" budget
        // below the top offset; five fit, the sixth spills.
        for _ in 0..5 {
            c.add_title("Section");
        }
        assert_eq!(c.slide_count(), 1);
        c.add_title("Overflow");
        assert_eq!(c.slide_count(), 2);
        assert_eq!(c.cursor(), inches(0.5) + inches(1.0) + inches(0.3));
    }

    #[test]
    fn test_jobs_summary_claims_full_slide() {
        let data = vec![
            Record::new()
                .with("week", "W1")
                .with("jobs", 120i64)
                .with("cancellations", 4i64),
            Record::new()
                .with("week", "W2")
                .with("jobs", 80i64)
                .with("cancellations", 9i64),
        ];

        // On a fresh deck the block takes the first slide.
        let mut c = composer();
        c.add_jobs_summary_chart(&data).unwrap();
        assert_eq!(c.slide_count(), 1);
        assert_eq!(c.presentation().slides()[0].shape_count(), 2);

        // Anything already placed forces it onto its own slide.
        let mut c = composer();
        c.add_title("Jobs vs Cancellations");
        c.add_jobs_summary_chart(&data).unwrap();
        assert_eq!(c.slide_count(), 2);
        assert_eq!(c.presentation().slides()[1].shape_count(), 2);

        // And it fills its slide: the next block spills again.
        c.add_title("After");
        assert_eq!(c.slide_count(), 3);
    }

    #[test]
    fn test_jobs_summary_requires_three_columns() {
        let mut c = composer();
        assert!(matches!(
            c.add_jobs_summary_chart(&status_dataset()),
            Err(Error::InsufficientColumns {
                required: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_sla_summary_math() {
        let summary = SlaSummary::new(100, 80);
        assert_eq!(summary.outside_sla(), 20);
        assert_eq!(summary.compliance_pct(), "80.00%");
    }

    #[test]
    fn test_sla_summary_zero_total_reports_zero_percent() {
        let summary = SlaSummary::new(0, 0);
        assert_eq!(summary.outside_sla(), 0);
        assert_eq!(summary.compliance_pct(), "0.00%");
    }

    #[test]
    fn test_sla_summary_table_places_table_and_two_boxes() {
        let data = vec![
            Record::new()
                .with("bucket", "< 1h")
                .with("done", 60i64)
                .with("within", 55i64),
            Record::new()
                .with("bucket", "1-4h")
                .with("done", 40i64)
                .with("within", 25i64),
        ];
        let mut c = composer();
        c.add_sla_summary_table(&data, SlaSummary::new(100, 80)).unwrap();

        let slide = &c.presentation().slides()[0];
        assert_eq!(slide.shape_count(), 3);
        let xml = deck_slide_xml(&c, 0);
        assert!(xml.contains("<a:t>Compliance: 80.00%</a:t>"));
        assert!(xml.contains("<a:t>Outside SLA: 20</a:t>"));
    }

    #[test]
    fn test_sla_chart_uses_first_and_third_keys() {
        let data = vec![
            Record::new()
                .with("bucket", "< 1h")
                .with("done", 60i64)
                .with("within", 55i64),
        ];
        let mut c = composer();
        c.add_sla_chart(&data, SlaSummary::new(100, 80)).unwrap();

        let charts = c.presentation().charts();
        assert_eq!(charts[0].categories, vec!["< 1h"]);
        assert_eq!(charts[0].series[0].name, "within");
        assert_eq!(charts[0].series[0].values, vec![55.0]);
    }

    #[test]
    fn test_save_round_trip_preserves_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status_report.pptx");

        let mut c = SlideComposer::new(&path, LayoutConfig::default())
            .with_doc_props(DocProps::default().with_title("Status Report"));
        c.new_slide();
        c.add_title("Exceptions Encountered in Jobs Processing");
        c.add_table(&status_dataset()).unwrap();
        c.new_slide();
        c.add_title("Exceptions Encountered in Jobs Processing");
        c.add_chart(&status_dataset()).unwrap();
        c.save().unwrap();
        // Idempotent re-save overwrites the same file.
        c.save().unwrap();

        let summary = crate::deck::inspect::inspect_deck(&path).unwrap();
        assert_eq!(summary.slide_count(), 2);
        assert_eq!(
            summary.slides[0].blocks,
            vec![BlockKind::TextBox, BlockKind::Table]
        );
        assert_eq!(
            summary.slides[1].blocks,
            vec![BlockKind::TextBox, BlockKind::Chart]
        );
    }

    /// Render one slide's XML for content assertions.
    fn deck_slide_xml(c: &SlideComposer, index: usize) -> String {
        let mapper = crate::deck::relmap::RelationshipMapper::new();
        // Chart-free slides only; chart slides need relationship IDs.
        c.presentation().slides()[index]
            .to_xml(index, &mapper)
            .unwrap()
    }

    proptest! {
        /// The slide count always equals the number of overflow events plus
        /// one, and the cursor stays within the content budget whenever a
        /// block lands on an existing slide.
        #[test]
        fn prop_overflow_accounting(blocks in proptest::collection::vec(0u8..3, 1..40)) {
            let config = LayoutConfig::default();
            let mut c = SlideComposer::new("unused.pptx", config.clone());
            let data = status_dataset();

            let mut expected_slides = 0usize;
            let mut sim_cursor = 0i64;
            let mut sim_blocks_on_slide = 0usize;

            for &kind in &blocks {
                let height = match kind {
                    0 => config.title_height,
                    1 => config.table_base_height
                        + config.table_row_height * data.len() as i64,
                    _ => config.chart_height,
                };

                // Mirror of ensure_space
                if expected_slides == 0
                    || (sim_blocks_on_slide > 0
                        && sim_cursor + height > config.max_content_height)
                {
                    expected_slides += 1;
                    sim_cursor = config.default_top_offset;
                    sim_blocks_on_slide = 0;
                }
                prop_assert!(
                    sim_blocks_on_slide == 0
                        || sim_cursor + height <= config.max_content_height
                );
                sim_cursor += height + config.element_spacing;
                sim_blocks_on_slide += 1;

                match kind {
                    0 => c.add_title("Section"),
                    1 => c.add_table(&data).unwrap(),
                    _ => c.add_chart(&data).unwrap(),
                }
            }

            prop_assert_eq!(c.slide_count(), expected_slides);
        }
    }
}
