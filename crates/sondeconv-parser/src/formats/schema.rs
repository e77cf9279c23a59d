use std::fmt;

/// Column holding the 1-based line number each row was read from.
pub const SOURCE_LINE_COLUMN: &str = "source_line";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightColumn {
    Time,
    Latitude,
    Longitude,
    Altitude,
    Pressure,
    AirTemperature,
    RelativeHumidity,
}

pub const FLIGHT_COLUMN_COUNT: usize = 7;

/// Required columns, in the positional order used by headerless logs.
pub const FLIGHT_COLUMNS: [FlightColumn; FLIGHT_COLUMN_COUNT] = [
    FlightColumn::Time,
    FlightColumn::Latitude,
    FlightColumn::Longitude,
    FlightColumn::Altitude,
    FlightColumn::Pressure,
    FlightColumn::AirTemperature,
    FlightColumn::RelativeHumidity,
];

impl FlightColumn {
    /// Header name as exported by the sonde ground station.
    pub fn source_name(&self) -> &'static str {
        match self {
            FlightColumn::Time => "Time",
            FlightColumn::Latitude => "Lat/PosX",
            FlightColumn::Longitude => "Long/PosY",
            FlightColumn::Altitude => "Alt/PosZ",
            FlightColumn::Pressure => "Baro",
            FlightColumn::AirTemperature => "AirT",
            FlightColumn::RelativeHumidity => "RH",
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            FlightColumn::Time => "time",
            FlightColumn::Latitude => "latitude_deg",
            FlightColumn::Longitude => "longitude_deg",
            FlightColumn::Altitude => "altitude_m",
            FlightColumn::Pressure => "pressure_hpa",
            FlightColumn::AirTemperature => "air_temperature_c",
            FlightColumn::RelativeHumidity => "relative_humidity_pct",
        }
    }

    pub fn from_source_name(name: &str) -> Option<Self> {
        FLIGHT_COLUMNS
            .iter()
            .copied()
            .find(|column| column.source_name() == name.trim())
    }
}

impl fmt::Display for FlightColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}
