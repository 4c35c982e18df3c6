#![deny(missing_docs)]
//! Statistics pipeline for instrumented simulation runs.
//!
//! Raw reports are plain text streams of delimited counter blocks. The
//! pipeline splits them ([`parse`]), folds the blocks into per-key series
//! ([`dataset`]), pivots each run into a rectangular CSV table ([`pivot`],
//! [`collect`]), and finally merges tables across runs into one corpus with
//! experiment and benchmark provenance columns ([`corpus`]).

pub mod collect;
pub mod corpus;
pub mod dataset;
pub mod parse;
pub mod pivot;

pub use collect::{collect_experiment, MANIFEST_FILE, REPORT_FILE};
pub use corpus::{merge_corpus, CorpusSelection, CorpusSummary};
pub use dataset::StatDataset;
pub use parse::{blocks, StatsBlock, BEGIN_MARKER, END_MARKER};
pub use pivot::{pivot, ResultTable};
