use std::io::{self, Write};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::engine::DerivedSample;
use crate::rows::FlightRow;

pub const WINDSOND_HEADER: &str =
    "Height[m]  Pressure[hPa]  Temperature[°C]  Dewpoint[°C]  Wind direction[°]  Wind speed[m/s]";

/// Tab-separated atmospheric profile, one line per emitted sample.
pub struct WindsondWriter<W: Write> {
    inner: W,
    lines: usize,
}

impl<W: Write> WindsondWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        writeln!(inner, "{WINDSOND_HEADER}")?;
        Ok(Self { inner, lines: 0 })
    }

    pub fn write_sample(&mut self, row: &FlightRow, sample: &DerivedSample) -> io::Result<()> {
        writeln!(
            self.inner,
            "{:.1}\t{:.1}\t{:.1}\t{:.1}\t{:.1}\t{:.1}",
            row.altitude,
            row.pressure,
            row.air_temperature,
            sample.dew_point,
            sample.bearing,
            sample.speed
        )?;
        self.lines += 1;
        Ok(())
    }

    /// Data lines written so far, excluding the header.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

pub fn sample_properties(row: &FlightRow, sample: &DerivedSample) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("pressure".to_string(), json!(row.pressure));
    properties.insert("hum".to_string(), json!(row.relative_humidity));
    properties.insert("temp".to_string(), json!(row.air_temperature));
    properties.insert("dew_point".to_string(), json!(sample.dew_point));
    properties.insert("dT".to_string(), json!(sample.dt));
    properties.insert("distance".to_string(), json!(sample.distance));
    properties.insert("bearing".to_string(), json!(sample.bearing));
    properties.insert("speed".to_string(), json!(sample.speed));
    properties
}

/// A 3D point feature at `[longitude, latitude, altitude]`.
pub fn sample_feature(row: &FlightRow, sample: &DerivedSample) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            row.longitude,
            row.latitude,
            row.altitude,
        ]))),
        id: None,
        properties: Some(sample_properties(row, sample)),
        foreign_members: None,
    }
}

#[derive(Debug, Default)]
pub struct FeatureSink {
    features: Vec<Feature>,
}

impl FeatureSink {
    pub fn push(&mut self, row: &FlightRow, sample: &DerivedSample) {
        self.features.push(sample_feature(row, sample));
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        }
    }

    /// Serializes the collection with 2-space indentation.
    pub fn write_pretty<W: Write>(self, mut writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.into_collection())?;
        writer.flush().map_err(serde_json::Error::io)
    }
}
