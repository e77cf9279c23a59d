use tracing::{debug, warn};

use crate::dew_point::dew_point;
use crate::error::{ConversionError, Result};
use crate::geodesy::{compute_bearing, haversine};
use crate::rows::FlightRow;

/// Applied to `distance / dt`. With `Time` in milliseconds the speed is in
/// m/s; with `Time` in seconds it comes out in mm/s.
pub const SPEED_SCALE: f64 = 1000.0;

/// Quantities derived for one row relative to the previous valid row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedSample {
    /// Elapsed `Time` since the previous valid row.
    pub dt: f64,
    /// Great-circle distance from the previous valid row, meters.
    pub distance: f64,
    /// Bearing from this row back to the previous one, degrees in `[0, 360)`.
    pub bearing: f64,
    /// `distance * SPEED_SCALE / dt`.
    pub speed: f64,
    /// Dew point, °C.
    pub dew_point: f64,
}

/// What the engine did with a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Latitude above 90°; state untouched.
    Skipped,
    /// First valid row; it only seeds the state.
    Primed,
    /// Same timestamp as the previous valid row.
    Suppressed,
    Emitted(DerivedSample),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub rows_primed: usize,
    pub rows_suppressed: usize,
    pub samples_emitted: usize,
}

#[derive(Debug, Clone, Copy)]
struct Fix {
    time: f64,
    latitude: f64,
    longitude: f64,
}

impl From<&FlightRow> for Fix {
    fn from(row: &FlightRow) -> Self {
        Self {
            time: row.time,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Stateful per-row derivation. Holds the last valid fix between rows.
#[derive(Debug, Default)]
pub struct DerivationEngine {
    last: Option<Fix>,
    stats: EngineStats,
}

impl DerivationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn process(&mut self, row: &FlightRow) -> Result<Step> {
        self.stats.rows_seen += 1;

        if row.is_trailer() {
            self.stats.rows_skipped += 1;
            debug!(line = row.line, latitude = row.latitude, "Skipping row past latitude limit");
            return Ok(Step::Skipped);
        }

        // The position is replaced even when the row ends up suppressed.
        let Some(previous) = self.last.replace(Fix::from(row)) else {
            self.stats.rows_primed += 1;
            return Ok(Step::Primed);
        };

        let dt = row.time - previous.time;
        if dt == 0.0 {
            self.stats.rows_suppressed += 1;
            debug!(line = row.line, time = row.time, "Suppressing row with repeated timestamp");
            return Ok(Step::Suppressed);
        }
        if dt < 0.0 {
            warn!(line = row.line, dt, "Timestamp went backwards");
        }

        let distance = haversine(
            row.latitude,
            row.longitude,
            previous.latitude,
            previous.longitude,
        );
        let bearing = compute_bearing(
            row.latitude,
            row.longitude,
            previous.latitude,
            previous.longitude,
        );
        let speed = distance * SPEED_SCALE / dt;
        let dew_point = dew_point(row.pressure, row.air_temperature, row.relative_humidity)
            .map_err(|source| ConversionError::Domain {
                line: row.line,
                source,
            })?;

        self.stats.samples_emitted += 1;
        Ok(Step::Emitted(DerivedSample {
            dt,
            distance,
            bearing,
            speed,
            dew_point,
        }))
    }

    /// Lazily runs `rows` through the engine, yielding only emitted samples
    /// paired with their source row.
    pub fn derive<I>(&mut self, rows: I) -> DerivedSamples<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Result<FlightRow>>,
    {
        DerivedSamples {
            engine: self,
            rows: rows.into_iter(),
            failed: false,
        }
    }
}

pub struct DerivedSamples<'e, I> {
    engine: &'e mut DerivationEngine,
    rows: I,
    failed: bool,
}

impl<I> Iterator for DerivedSamples<'_, I>
where
    I: Iterator<Item = Result<FlightRow>>,
{
    type Item = Result<(FlightRow, DerivedSample)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for row in self.rows.by_ref() {
            let outcome = row.and_then(|row| self.engine.process(&row).map(|step| (row, step)));
            match outcome {
                Ok((row, Step::Emitted(sample))) => return Some(Ok((row, sample))),
                Ok(_) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
