//! Capacity-bounded text output.
//!
//! Reports are built line by line into a [`StatusBuffer`]. The buffer never
//! grows past its capacity. Records must leave a fixed reserve free; once a
//! record does not fit, the buffer writes [`TRUNCATION_MARKER`] a single time
//! and refuses every further record. Footers may still use the reserve.

use std::fmt;

/// Marker written once when output is cut short.
pub const TRUNCATION_MARKER: &str = "More...\n";

/// Default headroom kept free while appending records.
pub const DEFAULT_RESERVE: usize = 200;

/// Outcome of a write into a [`StatusBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum RenderStatus {
    /// The text was appended in full.
    Written,
    /// Nothing was appended; the output is truncated.
    Truncated,
}

impl RenderStatus {
    /// True for [`RenderStatus::Truncated`].
    pub fn is_truncated(self) -> bool {
        self == Self::Truncated
    }
}

/// Text buffer with a hard byte capacity.
#[derive(Debug, Clone)]
pub struct StatusBuffer {
    text: String,
    capacity: usize,
    reserve: usize,
    truncated: bool,
}

impl StatusBuffer {
    /// Create a buffer with the default reserve.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_reserve(capacity, DEFAULT_RESERVE)
    }

    /// Create a buffer that keeps `reserve` bytes free while writing records.
    #[must_use]
    pub fn with_reserve(capacity: usize, reserve: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
            reserve,
            truncated: false,
        }
    }

    /// Bytes that can still be written.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.text.len()
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether record output has been cut short.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Append `line` and a newline as one record.
    ///
    /// A record is refused when the reserve is already in use or when the
    /// record would leave no room for the truncation marker. The first
    /// refusal writes the marker; later ones write nothing.
    pub fn push_record(&mut self, line: &str) -> RenderStatus {
        if self.truncated {
            return RenderStatus::Truncated;
        }
        let needed = line.len() + 1 + TRUNCATION_MARKER.len();
        if self.text.len() + self.reserve >= self.capacity || needed > self.remaining() {
            return self.truncate();
        }
        self.text.push_str(line);
        self.text.push('\n');
        RenderStatus::Written
    }

    /// Write the truncation marker without ending record output.
    ///
    /// Used when a section, rather than the whole buffer, runs out of lines.
    pub fn push_marker(&mut self) -> RenderStatus {
        if self.truncated || TRUNCATION_MARKER.len() > self.remaining() {
            return RenderStatus::Truncated;
        }
        self.text.push_str(TRUNCATION_MARKER);
        RenderStatus::Written
    }

    /// Append closing text, which may use the reserve but never the space
    /// beyond capacity. Text that does not fit is dropped whole.
    pub fn push_footer(&mut self, text: &str) -> RenderStatus {
        if text.len() > self.remaining() {
            return RenderStatus::Truncated;
        }
        self.text.push_str(text);
        RenderStatus::Written
    }

    /// The text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the buffer and return its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    fn truncate(&mut self) -> RenderStatus {
        self.truncated = true;
        if TRUNCATION_MARKER.len() <= self.remaining() {
            self.text.push_str(TRUNCATION_MARKER);
        }
        RenderStatus::Truncated
    }
}

impl fmt::Display for StatusBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
