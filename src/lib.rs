pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod render;

pub use config::{Config, InputSettings, OutputFormat, ReportSettings};
pub use engine::{aggregate, aggregate_now, Aggregation, ColumnMap, ContractSummary, Money, Period};
pub use error::{ReportError, Result};
pub use ingest::{read_csv, read_input, read_table, read_workbook, Cell, Table};
pub use render::{preview_table, render_report};
