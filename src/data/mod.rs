//! Data module - workbook loading, cleaning and trend extraction

pub mod cleaner;
pub mod loader;
pub mod schema;
pub mod trend;

pub use cleaner::{CleanError, CleanReport, CleanedRecord, DataCleaner, Percentages};
pub use loader::{Cell, LoaderError, RawSheet, WorkbookLoader};
pub use schema::{Column, RaceColumn};
pub use trend::{TrendError, TrendExtractor, YearlyRaceRow, YearlyRaceTable};
