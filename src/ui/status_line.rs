//! Writes the status projection for an external status bar, one line per
//! change.

use std::io::{self, Write};

use tracing::warn;

use crate::common::config::StatusFormat;
use crate::model::status::Status;

pub struct StatusLine {
    format: StatusFormat,
    last: Option<String>,
    out: Box<dyn Write + Send>,
}

impl StatusLine {
    /// `None` when the format is `off`.
    pub fn new(format: StatusFormat, out: Box<dyn Write + Send>) -> Option<StatusLine> {
        (format != StatusFormat::Off).then(|| StatusLine { format, last: None, out })
    }

    pub fn stdout(format: StatusFormat) -> Option<StatusLine> {
        Self::new(format, Box::new(io::stdout()))
    }

    /// Writes `status` unless it renders the same as the last line written.
    pub fn publish(&mut self, status: &Status) {
        let line = match self.format {
            StatusFormat::Off => return,
            StatusFormat::Text => status.to_line(),
            StatusFormat::Json => match serde_json::to_string(status) {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "could not serialize status");
                    return;
                }
            },
        };
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            warn!(%err, "could not write status line");
        }
        self.last = Some(line);
    }
}
