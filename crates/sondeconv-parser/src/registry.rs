use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{NamedColumnParser, PositionalParser};
use crate::model::ParsedFlightLog;

pub trait FlightLogParser {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<ParsedFlightLog, ParserError>;
}

pub fn parse_flight_log(content: &str) -> Result<ParsedFlightLog, ParserError> {
    let named = NamedColumnParser;
    let positional = PositionalParser;
    let parsers: [&dyn FlightLogParser; 2] = [&named, &positional];
    parse_with_parsers(content, &parsers)
}

pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn FlightLogParser],
) -> Result<ParsedFlightLog, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
