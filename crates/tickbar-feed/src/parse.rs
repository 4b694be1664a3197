//! Tick line parsing.

use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;
use tickbar_types::Tick;

/// Errors that can occur during tick parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field is missing or empty.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The price is not a number.
    #[error("line {line}: invalid price '{value}'")]
    InvalidPrice {
        /// 1-based line number.
        line: usize,
        /// The rejected text.
        value: String,
    },

    /// The timestamp is not an integer.
    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// 1-based line number.
        line: usize,
        /// The rejected text.
        value: String,
    },

    /// The line has more fields than a tick carries.
    #[error("line {line}: expected at most 3 fields, found {found}")]
    TooManyFields {
        /// 1-based line number.
        line: usize,
        /// Number of fields found.
        found: usize,
    },

    /// The CSV record could not be read.
    #[error("line {line}: {message}")]
    Csv {
        /// 1-based line number.
        line: usize,
        /// Reader message.
        message: String,
    },

    /// The JSON object could not be decoded.
    #[error("line {line}: {message}")]
    Json {
        /// 1-based line number.
        line: usize,
        /// Decoder message.
        message: String,
    },
}

/// Layout of incoming tick lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFormat {
    /// `instrument,price[,timestamp_ms]`.
    #[default]
    Csv,
    /// One JSON object per line.
    Ndjson,
}

impl InputFormat {
    /// Returns the format as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ndjson => "ndjson",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "ndjson" | "jsonl" | "json" => Ok(Self::Ndjson),
            _ => Err(format!("invalid input format '{s}', expected csv or ndjson")),
        }
    }
}

#[derive(Deserialize)]
struct JsonTick {
    instrument: String,
    price: f64,
    #[serde(default)]
    timestamp_ms: Option<i64>,
}

/// Parses one line of input.
///
/// Blank lines, `#` comments and a CSV header row (first field `instrument`)
/// yield `Ok(None)`.
///
/// # Errors
///
/// Returns an error if the line is not a well-formed tick.
pub fn parse_line(line: &str, line_no: usize, format: InputFormat) -> Result<Option<Tick>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    match format {
        InputFormat::Csv => parse_csv(trimmed, line_no),
        InputFormat::Ndjson => parse_json(trimmed, line_no).map(Some),
    }
}

fn parse_csv(line: &str, line_no: usize) -> Result<Option<Tick>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    let read = reader.read_record(&mut record).map_err(|e| ParseError::Csv {
        line: line_no,
        message: e.to_string(),
    })?;
    if !read {
        return Ok(None);
    }

    if record.len() > 3 {
        return Err(ParseError::TooManyFields {
            line: line_no,
            found: record.len(),
        });
    }

    let instrument = record.get(0).unwrap_or_default();
    if instrument.eq_ignore_ascii_case("instrument") {
        return Ok(None);
    }
    if instrument.is_empty() {
        return Err(ParseError::MissingField {
            line: line_no,
            field: "instrument",
        });
    }

    let price = match record.get(1) {
        Some(value) if !value.is_empty() => {
            value.parse::<f64>().map_err(|_| ParseError::InvalidPrice {
                line: line_no,
                value: value.to_string(),
            })?
        }
        _ => {
            return Err(ParseError::MissingField {
                line: line_no,
                field: "price",
            });
        }
    };

    let timestamp_ms = match record.get(2) {
        Some(value) if !value.is_empty() => {
            Some(value.parse::<i64>().map_err(|_| ParseError::InvalidTimestamp {
                line: line_no,
                value: value.to_string(),
            })?)
        }
        _ => None,
    };

    Ok(Some(Tick {
        instrument: instrument.to_string(),
        price,
        timestamp_ms,
    }))
}

fn parse_json(line: &str, line_no: usize) -> Result<Tick, ParseError> {
    let raw: JsonTick = serde_json::from_str(line).map_err(|e| ParseError::Json {
        line: line_no,
        message: e.to_string(),
    })?;
    if raw.instrument.is_empty() {
        return Err(ParseError::MissingField {
            line: line_no,
            field: "instrument",
        });
    }
    Ok(Tick {
        instrument: raw.instrument,
        price: raw.price,
        timestamp_ms: raw.timestamp_ms,
    })
}

/// Parses every line of `input`, skipping blanks, comments and headers.
pub fn parse_ticks(input: &str, format: InputFormat) -> impl Iterator<Item = Result<Tick, ParseError>> + '_ {
    input
        .lines()
        .enumerate()
        .filter_map(move |(i, line)| parse_line(line, i + 1, format).transpose())
}
