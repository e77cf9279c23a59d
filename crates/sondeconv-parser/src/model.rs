use polars::prelude::DataFrame;

/// Describes how a flight log was read, independent of its rows.
#[derive(Debug, Clone)]
pub struct FlightLogMetadata {
    pub parser: &'static str,
    /// Header names as they appeared in the file, or `None` for positional logs.
    pub header: Option<Vec<String>>,
    /// Header columns that are not needed for the conversion.
    pub ignored_columns: Vec<String>,
    pub row_count: usize,
}

/// A parsed flight log: one row per input line, columns named by
/// [`FlightColumn::canonical_name`](crate::FlightColumn::canonical_name) plus
/// [`SOURCE_LINE_COLUMN`](crate::SOURCE_LINE_COLUMN).
#[derive(Debug, Clone)]
pub struct ParsedFlightLog {
    pub metadata: FlightLogMetadata,
    pub df: DataFrame,
}

impl ParsedFlightLog {
    pub fn row_count(&self) -> usize {
        self.df.height()
    }
}
