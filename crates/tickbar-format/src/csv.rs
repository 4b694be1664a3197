//! CSV output format.

use std::io::Write;
use tickbar_aggregate::{Bar, ClosedBar};

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Whether to lead each row with the instrument.
    include_instrument: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            include_instrument: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets whether to include the instrument column.
    #[must_use]
    pub const fn with_instrument(mut self, include: bool) -> Self {
        self.include_instrument = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }
}

fn format_start(bar: &Bar) -> String {
    bar.start_time().map_or_else(
        || bar.start.to_string(),
        |ts| ts.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    )
}

impl Formatter for CsvFormatter {
    fn write_bars<W: Write + Send>(
        &self,
        bars: &[ClosedBar],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            if self.include_instrument {
                write!(writer, "instrument{d}")?;
            }
            writeln!(writer, "start{d}open{d}high{d}low{d}close{d}volume")?;
        }

        for closed in bars {
            if self.include_instrument {
                write!(writer, "{}{d}", closed.instrument)?;
            }
            let bar = &closed.bar;
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                format_start(bar),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
