use polars::prelude::*;
use sondeconv_parser::{FlightColumn, SOURCE_LINE_COLUMN};

use crate::error::{ConversionError, Result};

/// Latitudes above this mark trailer or invalid rows.
pub const MAX_LATITUDE: f64 = 90.0;

/// One sample of the flight log, in the units the sonde reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightRow {
    /// 1-based line in the source file, 0 when built in memory.
    pub line: u64,
    pub time: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub pressure: f64,
    pub air_temperature: f64,
    pub relative_humidity: f64,
}

impl FlightRow {
    pub fn is_trailer(&self) -> bool {
        self.latitude > MAX_LATITUDE
    }
}

/// Iterates a parsed flight log frame row by row, in file order.
pub struct FlightRows<'a> {
    lines: &'a Int64Chunked,
    time: &'a Float64Chunked,
    latitude: &'a Float64Chunked,
    longitude: &'a Float64Chunked,
    altitude: &'a Float64Chunked,
    pressure: &'a Float64Chunked,
    air_temperature: &'a Float64Chunked,
    relative_humidity: &'a Float64Chunked,
    idx: usize,
    len: usize,
}

fn float_column(df: &DataFrame, column: FlightColumn) -> Result<&Float64Chunked> {
    Ok(df.column(column.canonical_name())?.f64()?)
}

pub fn flight_rows(df: &DataFrame) -> Result<FlightRows<'_>> {
    Ok(FlightRows {
        lines: df.column(SOURCE_LINE_COLUMN)?.i64()?,
        time: float_column(df, FlightColumn::Time)?,
        latitude: float_column(df, FlightColumn::Latitude)?,
        longitude: float_column(df, FlightColumn::Longitude)?,
        altitude: float_column(df, FlightColumn::Altitude)?,
        pressure: float_column(df, FlightColumn::Pressure)?,
        air_temperature: float_column(df, FlightColumn::AirTemperature)?,
        relative_humidity: float_column(df, FlightColumn::RelativeHumidity)?,
        idx: 0,
        len: df.height(),
    })
}

impl FlightRows<'_> {
    fn read_row(&self) -> Result<FlightRow> {
        let idx = self.idx;
        let line = self
            .lines
            .get(idx)
            .map(|line| line as u64)
            .unwrap_or(idx as u64 + 1);

        let latitude = self
            .latitude
            .get(idx)
            .ok_or(ConversionError::MissingValue {
                line,
                column: FlightColumn::Latitude.source_name(),
            })?;

        // Trailer rows are dropped by the engine, so their other cells may be blank.
        let trailer = latitude > MAX_LATITUDE;
        let required = |values: &Float64Chunked, column: FlightColumn| -> Result<f64> {
            match values.get(idx) {
                Some(value) => Ok(value),
                None if trailer => Ok(f64::NAN),
                None => Err(ConversionError::MissingValue {
                    line,
                    column: column.source_name(),
                }),
            }
        };

        Ok(FlightRow {
            line,
            time: required(self.time, FlightColumn::Time)?,
            latitude,
            longitude: required(self.longitude, FlightColumn::Longitude)?,
            altitude: required(self.altitude, FlightColumn::Altitude)?,
            pressure: required(self.pressure, FlightColumn::Pressure)?,
            air_temperature: required(self.air_temperature, FlightColumn::AirTemperature)?,
            relative_humidity: required(self.relative_humidity, FlightColumn::RelativeHumidity)?,
        })
    }
}

impl Iterator for FlightRows<'_> {
    type Item = Result<FlightRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.len {
            return None;
        }
        let row = self.read_row();
        self.idx += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.idx;
        (remaining, Some(remaining))
    }
}
