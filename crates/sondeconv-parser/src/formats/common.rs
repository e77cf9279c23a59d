use std::borrow::Cow;

use csv::StringRecord;
use polars::prelude::*;

use super::schema::{FlightColumn, FLIGHT_COLUMNS, FLIGHT_COLUMN_COUNT, SOURCE_LINE_COLUMN};
use crate::errors::ParserError;

/// Ground-station exports mix `,` and `*` as field separators; the CSV reader
/// only takes a single delimiter byte, so fold both into a comma.
pub(crate) fn normalize_delimiters(content: &str) -> Cow<'_, str> {
    if content.contains('*') {
        Cow::Owned(content.replace('*', ","))
    } else {
        Cow::Borrowed(content)
    }
}

pub(crate) fn read_records(
    parser: &'static str,
    content: &str,
) -> Result<Vec<StringRecord>, ParserError> {
    let normalized = normalize_delimiters(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(normalized.as_bytes());

    reader
        .records()
        .map(|record| record.map_err(|source| ParserError::Csv { parser, source }))
        .collect()
}

pub(crate) fn is_numeric_record(record: &StringRecord) -> bool {
    !record.is_empty()
        && record
            .iter()
            .all(|field| field.is_empty() || field.parse::<f64>().is_ok())
}

pub(crate) fn parse_optional_f64(
    parser: &'static str,
    value: &str,
    line_index: u64,
    column: FlightColumn,
) -> Result<Option<f64>, ParserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        Ok(_) => Err(ParserError::DataRow {
            parser,
            line_index,
            message: format!("column '{column}' holds non-finite value '{trimmed}'"),
        }),
        Err(err) => Err(ParserError::DataRow {
            parser,
            line_index,
            message: format!("failed to parse column '{column}' value '{trimmed}' as float: {err}"),
        }),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FlightColumns {
    source_line: Vec<i64>,
    values: Vec<Vec<Option<f64>>>,
}

impl FlightColumns {
    pub fn new(capacity: usize) -> Self {
        Self {
            source_line: Vec::with_capacity(capacity),
            values: FLIGHT_COLUMNS
                .iter()
                .map(|_| Vec::with_capacity(capacity))
                .collect(),
        }
    }

    pub fn push_row(&mut self, line_index: u64, row: [Option<f64>; FLIGHT_COLUMN_COUNT]) {
        self.source_line.push(line_index as i64);
        for (column, value) in self.values.iter_mut().zip(row) {
            column.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.source_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_line.is_empty()
    }
}

pub(crate) fn build_flight_dataframe(
    parser: &'static str,
    columns: FlightColumns,
) -> Result<DataFrame, ParserError> {
    let mut cols: Vec<Column> = Vec::with_capacity(FLIGHT_COLUMNS.len() + 1);
    cols.push(Series::new(SOURCE_LINE_COLUMN.into(), columns.source_line).into());

    for (column, values) in FLIGHT_COLUMNS.iter().zip(columns.values) {
        cols.push(Series::new(column.canonical_name().into(), values).into());
    }

    DataFrame::new(cols).map_err(|err| ParserError::Validation {
        parser,
        message: format!("failed to build flight dataframe: {err}"),
    })
}

/// Reads the data rows, taking each required column from the field index the
/// parser resolved for it. Missing trailing fields read as empty cells.
pub(crate) fn collect_rows(
    parser: &'static str,
    records: impl IntoIterator<Item = StringRecord>,
    indices: &[usize; FLIGHT_COLUMN_COUNT],
) -> Result<FlightColumns, ParserError> {
    let records = records.into_iter();
    let mut columns = FlightColumns::new(records.size_hint().0);

    for (row_idx, record) in records.enumerate() {
        let line_index = record
            .position()
            .map(|pos| pos.line())
            .unwrap_or(row_idx as u64 + 1);

        let mut row = [None; FLIGHT_COLUMN_COUNT];
        for ((slot, column), idx) in row.iter_mut().zip(FLIGHT_COLUMNS).zip(indices) {
            let value = record.get(*idx).unwrap_or("");
            *slot = parse_optional_f64(parser, value, line_index, column)?;
        }
        columns.push_row(line_index, row);
    }

    if columns.is_empty() {
        return Err(ParserError::EmptyData { parser });
    }

    Ok(columns)
}
