#![forbid(unsafe_code)]

//! Pointer trace recording and replay.
//!
//! A trace is a JSONL stream of [`TraceRecord`]s. The first line is a
//! `trace_header`, the last a `trace_summary`, and every line between is a
//! `pointer` sample with a microsecond timestamp. Recording a live gesture and
//! feeding it back through [`SlidingPanel`](crate::SlidingPanel) reproduces the
//! same notifications, which is how gesture bugs are captured.
//!
//! ```ignore
//! let mut writer = PointerTraceWriter::new(Vec::new(), "flick-up", extent)?;
//! writer.record(&event)?;
//! let bytes = writer.finish()?;
//! let trace = PointerTrace::from_bytes(&bytes)?;
//! for event in trace.events() { panel.handle_pointer(&event)?; }
//! ```

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::{DragExtent, Point};
use crate::gesture::{PointerEvent, PointerKind};

/// Current schema version for pointer trace files.
pub const SCHEMA_VERSION: &str = "pointer-trace-v1";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum TraceRecord {
    #[serde(rename = "trace_header")]
    Header {
        schema_version: String,
        session_name: String,
        /// `[min, max]` of the drag extent at recording time.
        extent: (f32, f32),
    },

    #[serde(rename = "pointer")]
    Pointer {
        ts_us: u64,
        kind: PointerKind,
        x: f32,
        y: f32,
    },

    #[serde(rename = "trace_summary")]
    Summary {
        total_events: u64,
        total_duration_us: u64,
    },
}

impl TraceRecord {
    #[must_use]
    pub fn from_event(event: &PointerEvent) -> Self {
        Self::Pointer {
            ts_us: u64::try_from(event.timestamp.as_micros()).unwrap_or(u64::MAX),
            kind: event.kind,
            x: event.position.x,
            y: event.position.y,
        }
    }

    /// The pointer event carried by this record, if any.
    #[must_use]
    pub fn to_event(&self) -> Option<PointerEvent> {
        match *self {
            Self::Pointer { ts_us, kind, x, y } => Some(PointerEvent::new(
                kind,
                Point::new(x, y),
                Duration::from_micros(ts_us),
            )),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

pub struct PointerTraceWriter<W: Write> {
    writer: BufWriter<W>,
    event_count: u64,
    first_ts_us: Option<u64>,
    last_ts_us: u64,
}

impl PointerTraceWriter<std::fs::File> {
    /// Create a writer for a JSONL file on disk.
    pub fn create(
        path: impl AsRef<Path>,
        session_name: &str,
        extent: DragExtent,
    ) -> io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Self::new(file, session_name, extent)
    }
}

impl<W: Write> PointerTraceWriter<W> {
    /// Wrap any writer and emit the header line.
    pub fn new(writer: W, session_name: &str, extent: DragExtent) -> io::Result<Self> {
        let mut this = Self {
            writer: BufWriter::new(writer),
            event_count: 0,
            first_ts_us: None,
            last_ts_us: 0,
        };
        this.write_line(&TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_string(),
            session_name: session_name.to_string(),
            extent: (extent.min(), extent.max()),
        })?;
        Ok(this)
    }

    pub fn record(&mut self, event: &PointerEvent) -> io::Result<()> {
        let record = TraceRecord::from_event(event);
        if let TraceRecord::Pointer { ts_us, .. } = record {
            self.first_ts_us.get_or_insert(ts_us);
            self.last_ts_us = ts_us;
        }
        self.write_line(&record)?;
        self.event_count += 1;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Write the summary, flush, and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        let total_duration_us = self
            .first_ts_us
            .map_or(0, |first| self.last_ts_us.saturating_sub(first));
        self.write_line(&TraceRecord::Summary {
            total_events: self.event_count,
            total_duration_us,
        })?;
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn write_line(&mut self, record: &TraceRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// A parsed pointer trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerTrace {
    records: Vec<TraceRecord>,
}

impl PointerTrace {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Parse JSONL bytes. Blank lines are skipped.
    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        let mut records = Vec::new();
        for line in BufReader::new(data).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: TraceRecord = serde_json::from_str(&line).map_err(io::Error::other)?;
            records.push(record);
        }
        Ok(Self { records })
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    #[must_use]
    pub fn session_name(&self) -> Option<&str> {
        self.records.iter().find_map(|r| match r {
            TraceRecord::Header { session_name, .. } => Some(session_name.as_str()),
            _ => None,
        })
    }

    /// Drag extent recorded in the header.
    #[must_use]
    pub fn extent(&self) -> Option<DragExtent> {
        self.records.iter().find_map(|r| match *r {
            TraceRecord::Header {
                extent: (min, max), ..
            } => DragExtent::new(min, max).ok(),
            _ => None,
        })
    }

    /// Pointer events in recorded order.
    #[must_use]
    pub fn events(&self) -> Vec<PointerEvent> {
        self.records.iter().filter_map(TraceRecord::to_event).collect()
    }

    #[must_use]
    pub fn total_events(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary { total_events, .. } => Some(*total_events),
            _ => None,
        })
    }
}
