use csv::StringRecord;

use super::schema::{FlightColumn, FLIGHT_COLUMNS, FLIGHT_COLUMN_COUNT};
use super::{build_flight_dataframe, collect_rows, is_numeric_record, read_records};
use crate::errors::ParserError;
use crate::model::{FlightLogMetadata, ParsedFlightLog};
use crate::registry::FlightLogParser;

/// Logs whose first row names the columns (`Time,Lat/PosX,...`).
pub struct NamedColumnParser;

impl Default for NamedColumnParser {
    fn default() -> Self {
        Self
    }
}

impl NamedColumnParser {
    const NAME: &'static str = "NAMED_COLUMNS";

    fn locate_columns(header: &StringRecord) -> Result<[usize; FLIGHT_COLUMN_COUNT], ParserError> {
        let mut indices = [0usize; FLIGHT_COLUMN_COUNT];
        for (slot, column) in indices.iter_mut().zip(FLIGHT_COLUMNS) {
            *slot = Self::position_of(header, column).ok_or(ParserError::MissingColumn {
                parser: Self::NAME,
                column: column.source_name(),
            })?;
        }
        Ok(indices)
    }

    fn position_of(header: &StringRecord, column: FlightColumn) -> Option<usize> {
        header
            .iter()
            .position(|name| FlightColumn::from_source_name(name) == Some(column))
    }

    fn validate_header(header: &StringRecord) -> Result<(), ParserError> {
        let mut seen: Vec<&str> = Vec::with_capacity(header.len());
        for name in header.iter() {
            if name.is_empty() {
                continue;
            }
            if FlightColumn::from_source_name(name).is_some() && seen.contains(&name) {
                return Err(ParserError::InvalidHeader {
                    parser: Self::NAME,
                    message: format!("column '{name}' appears more than once"),
                });
            }
            seen.push(name);
        }
        Ok(())
    }
}

impl FlightLogParser for NamedColumnParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedFlightLog, ParserError> {
        let mut records = read_records(Self::NAME, content)?.into_iter();

        let header = records.next().ok_or(ParserError::FormatMismatch {
            parser: Self::NAME,
            reason: "file is empty".to_string(),
        })?;

        if is_numeric_record(&header) {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "first row is numeric, not a column header".to_string(),
            });
        }

        Self::validate_header(&header)?;
        let indices = Self::locate_columns(&header)?;

        let columns = collect_rows(Self::NAME, records, &indices)?;
        let row_count = columns.len();
        let df = build_flight_dataframe(Self::NAME, columns)?;

        let header_names: Vec<String> = header.iter().map(str::to_string).collect();
        let ignored_columns = header_names
            .iter()
            .filter(|name| FlightColumn::from_source_name(name).is_none())
            .cloned()
            .collect();

        Ok(ParsedFlightLog {
            metadata: FlightLogMetadata {
                parser: Self::NAME,
                header: Some(header_names),
                ignored_columns,
                row_count,
            },
            df,
        })
    }
}
