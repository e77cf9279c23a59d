use super::schema::FLIGHT_COLUMN_COUNT;
use super::{build_flight_dataframe, collect_rows, is_numeric_record, read_records};
use crate::errors::ParserError;
use crate::model::{FlightLogMetadata, ParsedFlightLog};
use crate::registry::FlightLogParser;

/// Headerless logs, read in the fixed order of
/// [`FLIGHT_COLUMNS`](super::schema::FLIGHT_COLUMNS). Extra trailing fields are
/// ignored.
pub struct PositionalParser;

impl Default for PositionalParser {
    fn default() -> Self {
        Self
    }
}

impl PositionalParser {
    const NAME: &'static str = "POSITIONAL";
}

impl FlightLogParser for PositionalParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedFlightLog, ParserError> {
        let records = read_records(Self::NAME, content)?;

        let first = records.first().ok_or(ParserError::FormatMismatch {
            parser: Self::NAME,
            reason: "file is empty".to_string(),
        })?;

        if !is_numeric_record(first) {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "first row is not numeric".to_string(),
            });
        }

        if first.len() < FLIGHT_COLUMN_COUNT {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: format!(
                    "expected at least {FLIGHT_COLUMN_COUNT} fields, found {}",
                    first.len()
                ),
            });
        }

        let indices: [usize; FLIGHT_COLUMN_COUNT] = std::array::from_fn(|idx| idx);

        let columns = collect_rows(Self::NAME, records, &indices)?;
        let row_count = columns.len();
        let df = build_flight_dataframe(Self::NAME, columns)?;

        Ok(ParsedFlightLog {
            metadata: FlightLogMetadata {
                parser: Self::NAME,
                header: None,
                ignored_columns: Vec::new(),
                row_count,
            },
            df,
        })
    }
}
