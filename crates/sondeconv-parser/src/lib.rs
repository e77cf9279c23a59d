pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use formats::schema::{FlightColumn, FLIGHT_COLUMNS, SOURCE_LINE_COLUMN};
pub use model::{FlightLogMetadata, ParsedFlightLog};
pub use registry::{parse_flight_log, parse_with_parsers, FlightLogParser};
