//! Statusdeck - a slide-deck composer for file-processing status reports
//!
//! This library turns pre-aggregated job statistics into a PowerPoint
//! (.pptx) slide deck: tables, charts, and annotated summary blocks placed
//! by a positional layout engine that tracks a vertical cursor and spills
//! to a new slide when content would overflow.
//!
//! # Features
//!
//! - **SlideComposer**: cursor-based vertical layout with automatic slide
//!   overflow, configured through a plain [`LayoutConfig`] struct
//! - **Deck writer**: generates a minimal valid OPC package (slides, chart
//!   parts, master/layout/theme, document properties)
//! - **Structural inspection**: reopen a saved deck and verify its slide
//!   and block structure
//! - **Report driver**: render an ordered list of report sections with
//!   per-section failure isolation
//!
//! # Example - Composing a status report
//!
//! ```no_run
//! use statusdeck::composer::{LayoutConfig, SlideComposer};
//! use statusdeck::dataset::Record;
//!
//! # fn main() -> statusdeck::common::Result<()> {
//! let data = vec![
//!     Record::new().with("status", "ERROR").with("count", 5i64),
//!     Record::new().with("status", "TIMEOUT").with("count", 3i64),
//! ];
//!
//! let mut composer = SlideComposer::new("status_report.pptx", LayoutConfig::default());
//! composer.add_title("Exceptions Encountered in Jobs Processing");
//! composer.add_table(&data)?;
//! composer.add_chart(&data)?;
//! composer.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Rendering sections with failure isolation
//!
//! ```no_run
//! use statusdeck::composer::{LayoutConfig, SlideComposer};
//! use statusdeck::report::{Metric, Section, metrics_dataset, render_report};
//!
//! # fn main() -> statusdeck::common::Result<()> {
//! let metrics = metrics_dataset(&[
//!     Metric::new("Total Files", 1_204),
//!     Metric::new("Processed Files", 1_180),
//! ]);
//!
//! let mut composer = SlideComposer::new("status_report.pptx", LayoutConfig::default());
//! render_report(
//!     &mut composer,
//!     &[Section::TableAndChart {
//!         title: "Deduped vs Processed Files".to_string(),
//!         data: metrics,
//!     }],
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Verifying a saved deck
//!
//! ```no_run
//! use statusdeck::deck::inspect_deck;
//!
//! # fn main() -> statusdeck::common::Result<()> {
//! let summary = inspect_deck("status_report.pptx")?;
//! println!("Deck has {} slides", summary.slide_count());
//! # Ok(())
//! # }
//! ```

/// Common types and utilities: errors, EMU units, XML escaping
pub mod common;

/// Tabular input data: records, scalar values, shape validation
pub mod dataset;

/// The deck writing layer: presentation model and OPC packaging
pub mod deck;

/// The slide composition engine: cursor layout and overflow
pub mod composer;

/// Report assembly: metric lists, sections, and the render driver
pub mod report;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use composer::{LayoutConfig, SlaSummary, SlideComposer};
pub use dataset::{Dataset, Record, Value};
pub use deck::{ChartKind, DocProps};
