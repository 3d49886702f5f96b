//! Report assembly.
//!
//! Bridges pre-aggregated job statistics and the composer: eagerly
//! evaluated metric lists become datasets, and an ordered list of
//! [`Section`]s is rendered into a deck. Each section is isolated — a
//! section whose dataset is malformed is logged and skipped so one missing
//! metric does not blank the whole deck.

use crate::common::Result;
use crate::composer::{SlaSummary, SlideComposer};
use crate::dataset::{Dataset, Record};
use tracing::warn;

/// One eagerly-computed metric: a display label and its value.
///
/// Metric lists are an explicit enumeration — compute each value up front
/// and collect the pairs; there is no deferred dispatch.
#[derive(Debug, Clone)]
pub struct Metric {
    pub label: String,
    pub value: i64,
}

impl Metric {
    pub fn new(label: &str, value: i64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Build a two-column dataset ("metric", "count") from a metric list.
///
/// # Examples
///
/// ```
/// use statusdeck::report::{Metric, metrics_dataset};
///
/// let data = metrics_dataset(&[
///     Metric::new("Total Files", 1_204),
///     Metric::new("Processed Files", 1_180),
/// ]);
/// assert_eq!(data.len(), 2);
/// assert_eq!(data[0].keys().collect::<Vec<_>>(), vec!["metric", "count"]);
/// ```
pub fn metrics_dataset(metrics: &[Metric]) -> Dataset {
    metrics
        .iter()
        .map(|m| Record::new().with("metric", m.label.as_str()).with("count", m.value))
        .collect()
}

/// Count occurrences of each status, trimming whitespace and dropping
/// excluded statuses. First-seen order is preserved.
///
/// # Examples
///
/// ```
/// use statusdeck::report::count_statuses;
///
/// let counts = count_statuses(
///     ["ERROR ", "TIMEOUT", "DONE", "ERROR"].map(String::from),
///     &["DONE", "PROCESSING", "UNKNOWN"],
/// );
/// assert_eq!(counts, vec![("ERROR".to_string(), 2), ("TIMEOUT".to_string(), 1)]);
/// ```
pub fn count_statuses(
    statuses: impl IntoIterator<Item = String>,
    exclude: &[&str],
) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for status in statuses {
        let status = status.trim();
        if exclude.contains(&status) {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| s == status) {
            Some((_, n)) => *n += 1,
            None => counts.push((status.to_string(), 1)),
        }
    }
    counts
}

/// Build a (status, count) dataset from status counts.
pub fn status_counts_dataset(counts: &[(String, u64)]) -> Dataset {
    counts
        .iter()
        .map(|(status, count)| {
            Record::new()
                .with("status", status.as_str())
                .with("count", *count)
        })
        .collect()
}

/// One report section to be rendered into the deck.
#[derive(Debug, Clone)]
pub enum Section {
    /// A titled table slide.
    Table { title: String, data: Dataset },
    /// A titled table slide followed by a titled chart slide over the same
    /// dataset.
    TableAndChart { title: String, data: Dataset },
    /// The combined jobs-summary chart block on its own slide.
    JobsSummary { title: String, data: Dataset },
    /// SLA table with compliance boxes, followed by a titled chart slide.
    SlaSummary {
        title: String,
        data: Dataset,
        totals: SlaSummary,
    },
}

impl Section {
    /// The section title, for logging.
    pub fn title(&self) -> &str {
        match self {
            Section::Table { title, .. }
            | Section::TableAndChart { title, .. }
            | Section::JobsSummary { title, .. }
            | Section::SlaSummary { title, .. } => title,
        }
    }
}

/// Render every section into the composer, then save the deck.
///
/// A failing section is logged and skipped; the rest of the report still
/// renders. The save itself is not isolated — an unwritable output path is
/// the caller's problem.
pub fn render_report(composer: &mut SlideComposer, sections: &[Section]) -> Result<()> {
    for section in sections {
        if let Err(error) = render_section(composer, section) {
            warn!(section = section.title(), %error, "skipping report section");
        }
    }
    composer.save()
}

fn render_section(composer: &mut SlideComposer, section: &Section) -> Result<()> {
    match section {
        Section::Table { title, data } => {
            composer.new_slide();
            composer.add_title(title);
            composer.add_table(data)?;
        },
        Section::TableAndChart { title, data } => {
            composer.new_slide();
            composer.add_title(title);
            composer.add_table(data)?;
            composer.new_slide();
            composer.add_title(title);
            composer.add_chart(data)?;
        },
        Section::JobsSummary { title, data } => {
            composer.new_slide();
            composer.add_title(title);
            composer.add_jobs_summary_chart(data)?;
        },
        Section::SlaSummary {
            title,
            data,
            totals,
        } => {
            composer.new_slide();
            composer.add_title(title);
            composer.add_sla_summary_table(data, *totals)?;
            composer.new_slide();
            composer.add_title(title);
            composer.add_sla_chart(data, *totals)?;
        },
    }
    Ok(())
}
