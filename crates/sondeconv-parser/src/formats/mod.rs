mod common;
mod named_columns;
mod positional;
pub mod schema;

pub use named_columns::NamedColumnParser;
pub use positional::PositionalParser;

pub(crate) use common::{build_flight_dataframe, collect_rows, is_numeric_record, read_records};
