use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sondeconv_parser::{parse_flight_log, ParsedFlightLog};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::engine::{DerivationEngine, EngineStats};
use crate::error::{ConversionError, Result};
use crate::outputs::{FeatureSink, WindsondWriter};
use crate::rows::flight_rows;

pub const WINDSOND_EXTENSION: &str = "windsond";
pub const GEOJSON_EXTENSION: &str = "geojson";

/// Mode of the published outputs. Temporary files are created owner-only.
#[cfg(unix)]
pub const OUTPUT_MODE: u32 = 0o644;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub windsond: PathBuf,
    pub geojson: PathBuf,
}

impl OutputPaths {
    /// Both outputs sit next to the input, with its last extension swapped.
    /// A leading dot in the file name is not treated as an extension.
    pub fn for_input(input: &Path) -> Self {
        Self {
            windsond: input.with_extension(WINDSOND_EXTENSION),
            geojson: input.with_extension(GEOJSON_EXTENSION),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub windsond_path: PathBuf,
    pub geojson_path: PathBuf,
    pub parser: &'static str,
    pub ignored_columns: Vec<String>,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub rows_suppressed: usize,
    pub samples_emitted: usize,
}

/// Runs the parsed log through the engine, streaming profile lines into
/// `windsond` and writing the feature collection to `geojson` at the end.
pub fn convert_log<W1: Write, W2: Write>(
    parsed: &ParsedFlightLog,
    windsond: W1,
    geojson: W2,
) -> Result<EngineStats> {
    let mut engine = DerivationEngine::new();
    let mut table = WindsondWriter::new(windsond)?;
    let mut features = FeatureSink::default();

    for item in engine.derive(flight_rows(&parsed.df)?) {
        let (row, sample) = item?;
        table.write_sample(&row, &sample)?;
        features.push(&row, &sample);
    }

    table.finish()?;
    features.write_pretty(geojson)?;

    Ok(engine.stats())
}

/// Parses `content` and converts it. Used for in-memory conversions.
pub fn convert_content<W1: Write, W2: Write>(
    content: &str,
    windsond: W1,
    geojson: W2,
) -> Result<EngineStats> {
    let parsed = parse_flight_log(content)?;
    convert_log(&parsed, windsond, geojson)
}

/// Converts `input` into `<base>.windsond` and `<base>.geojson`.
///
/// Outputs are written to temporary files in the destination directory and
/// only renamed into place once the whole conversion succeeded. On failure
/// neither final path is left behind.
pub fn convert_file(input: &Path) -> Result<ConversionSummary> {
    let content = fs::read_to_string(input).map_err(|source| ConversionError::ReadInput {
        path: input.to_path_buf(),
        source,
    })?;
    let parsed = parse_flight_log(&content)?;
    debug!(
        parser = parsed.metadata.parser,
        rows = parsed.metadata.row_count,
        ignored = ?parsed.metadata.ignored_columns,
        "Parsed flight log"
    );

    let paths = OutputPaths::for_input(input);
    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut windsond_tmp = NamedTempFile::new_in(dir)?;
    let mut geojson_tmp = NamedTempFile::new_in(dir)?;

    let stats = convert_log(
        &parsed,
        BufWriter::new(windsond_tmp.as_file_mut()),
        BufWriter::new(geojson_tmp.as_file_mut()),
    )?;

    set_output_mode(&windsond_tmp)?;
    set_output_mode(&geojson_tmp)?;
    persist(windsond_tmp, &paths.windsond)?;
    if let Err(err) = persist(geojson_tmp, &paths.geojson) {
        let _ = fs::remove_file(&paths.windsond);
        return Err(err);
    }

    Ok(ConversionSummary {
        input: input.to_path_buf(),
        windsond_path: paths.windsond,
        geojson_path: paths.geojson,
        parser: parsed.metadata.parser,
        ignored_columns: parsed.metadata.ignored_columns,
        rows_read: stats.rows_seen,
        rows_skipped: stats.rows_skipped,
        rows_suppressed: stats.rows_suppressed,
        samples_emitted: stats.samples_emitted,
    })
}

#[cfg(unix)]
fn set_output_mode(file: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.as_file().set_permissions(fs::Permissions::from_mode(OUTPUT_MODE))
}

#[cfg(not(unix))]
fn set_output_mode(_file: &NamedTempFile) -> io::Result<()> {
    Ok(())
}

fn persist(file: NamedTempFile, path: &Path) -> Result<()> {
    file.persist(path)
        .map(|_| ())
        .map_err(|err| ConversionError::Persist {
            path: path.to_path_buf(),
            source: err.error,
        })
}
