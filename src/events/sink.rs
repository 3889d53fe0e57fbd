//! Event delivery.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use super::record::BallotEvent;

/// Receives each event synchronously, before the emitting command returns.
///
/// Delivery guarantees beyond "called once per emitted event" are the
/// sink's own concern. Sinks must not call back into the engine: they run
/// with the emitting command still exclusive.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: &BallotEvent) -> io::Result<()>;
}

/// Capacity configuration for [`MemoryEventSink`].
#[derive(Debug, Clone)]
pub struct MemoryEventSinkConfig {
    /// Maximum number of events retained.
    pub capacity: usize,
}

impl Default for MemoryEventSinkConfig {
    fn default() -> Self {
        Self { capacity: 10_000 }
    }
}

/// Bounded in-memory sink.
///
/// Oldest events drop once capacity is reached. Useful for tests and for
/// replaying recent history.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    config: MemoryEventSinkConfig,
    events: RwLock<VecDeque<BallotEvent>>,
}

impl MemoryEventSink {
    pub fn new(config: MemoryEventSinkConfig) -> Self {
        let capacity = config.capacity;
        Self {
            config,
            events: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// All retained events in emission order.
    pub fn events(&self) -> Vec<BallotEvent> {
        self.events
            .read()
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recently emitted event, if any.
    pub fn last(&self) -> Option<BallotEvent> {
        self.events
            .read()
            .ok()
            .and_then(|events| events.back().cloned())
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &BallotEvent) -> io::Result<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink lock poisoned"))?;
        events.push_back(event.clone());
        while events.len() > self.config.capacity {
            events.pop_front();
        }
        Ok(())
    }
}

/// Append-only JSON-lines sink.
///
/// One record per line, flushed per emit.
pub struct FileEventSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileEventSink {
    /// Open or create an event log file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// The event log path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for FileEventSink {
    fn emit(&self, event: &BallotEvent) -> io::Result<()> {
        let json = serde_json::to_string(event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink lock poisoned"))?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}
