//! Debugging host backed by a captured thread snapshot.
//!
//! A snapshot is a JSON document listing every thread of a stopped
//! process with its frames, newest first. Addresses may be written as
//! JSON integers or as hex / decimal strings.

use super::{DebugHost, FrameKind, ThreadInfo};
use crate::utils::error::{HostError, SnapshotError};
use log::{debug, trace};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// Top-level snapshot document
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Process id of the target, informational only
    #[serde(default)]
    pub pid: Option<u64>,

    /// Executable name, informational only
    #[serde(default)]
    pub executable: Option<String>,

    /// Thread number focused when the snapshot was taken
    #[serde(default)]
    pub selected_thread: Option<u64>,

    /// All threads, in enumeration order
    pub threads: Vec<ThreadRecord>,
}

/// One captured thread
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadRecord {
    /// Host-assigned thread number
    pub num: u64,

    /// (pid, lwpid, tid)
    pub ptid: (u64, u64, u64),

    /// Thread name, informational only
    #[serde(default)]
    pub name: Option<String>,

    /// False when the thread exited before it could be inspected
    #[serde(default = "default_valid")]
    pub valid: bool,

    /// Frames, newest first
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
}

/// One captured frame
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    /// Program counter
    #[serde(deserialize_with = "deserialize_address")]
    pub pc: u64,

    /// Resolved function name, if symbolication succeeded
    #[serde(default)]
    pub function: Option<String>,

    /// Frame was produced by inline expansion
    #[serde(default)]
    pub inline: bool,
}

fn default_valid() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAddress {
    Number(u64),
    Text(String),
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawAddress::deserialize(deserializer)? {
        RawAddress::Number(value) => Ok(value),
        RawAddress::Text(text) => parse_address(&text).map_err(serde::de::Error::custom),
    }
}

/// Parse an address from a hex (`0x` prefix) or decimal string
pub fn parse_address(value: &str) -> Result<u64, SnapshotError> {
    let value = value.trim();
    if let Some(hex_str) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| SnapshotError::InvalidFormat(format!("Invalid hex address {value:?}: {e}")))
    } else {
        value.parse::<u64>().map_err(|e| {
            SnapshotError::InvalidFormat(format!("Invalid decimal address {value:?}: {e}"))
        })
    }
}

impl Snapshot {
    /// Load and validate a snapshot file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        debug!("Reading snapshot from: {}", path.display());

        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Check structural constraints serde cannot express
    fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for thread in &self.threads {
            if !seen.insert(thread.num) {
                return Err(SnapshotError::InvalidFormat(format!(
                    "Duplicate thread number {}",
                    thread.num
                )));
            }
        }

        if let Some(selected) = self.selected_thread {
            if !seen.contains(&selected) {
                return Err(SnapshotError::InvalidFormat(format!(
                    "selected_thread {selected} does not name a thread"
                )));
            }
        }

        Ok(())
    }

    /// Total number of frames across all threads
    pub fn frame_count(&self) -> usize {
        self.threads.iter().map(|t| t.frames.len()).sum()
    }

    /// Number of threads marked as no longer valid
    pub fn invalid_thread_count(&self) -> usize {
        self.threads.iter().filter(|t| !t.valid).count()
    }
}

impl FromStr for Snapshot {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let snapshot: Snapshot = serde_json::from_str(s)?;
        snapshot.validate()?;

        debug!(
            "Snapshot loaded: {} threads, {} frames",
            snapshot.threads.len(),
            snapshot.frame_count()
        );
        Ok(snapshot)
    }
}

/// Handle to a snapshot thread (index into `Snapshot::threads`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotThread(usize);

/// Handle to a snapshot frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotFrame {
    thread: usize,
    depth: usize,
}

/// `DebugHost` over an in-memory snapshot
#[derive(Debug, Clone)]
pub struct SnapshotHost {
    snapshot: Snapshot,
    selected: Option<usize>,
}

impl SnapshotHost {
    /// Wrap a snapshot, focusing its `selected_thread` if it names one
    pub fn new(snapshot: Snapshot) -> Self {
        let selected = snapshot
            .selected_thread
            .and_then(|num| snapshot.threads.iter().position(|t| t.num == num));

        Self { snapshot, selected }
    }

    /// Load a snapshot file and wrap it
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Ok(Self::new(Snapshot::from_file(path)?))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn frame_record(&self, frame: &SnapshotFrame) -> Option<&FrameRecord> {
        self.snapshot
            .threads
            .get(frame.thread)
            .and_then(|t| t.frames.get(frame.depth))
    }
}

impl DebugHost for SnapshotHost {
    type Thread = SnapshotThread;
    type Frame = SnapshotFrame;

    fn threads(&self) -> Result<Vec<SnapshotThread>, HostError> {
        if self.snapshot.threads.is_empty() {
            return Err(HostError::Unavailable(
                "snapshot contains no threads".to_string(),
            ));
        }

        Ok((0..self.snapshot.threads.len()).map(SnapshotThread).collect())
    }

    fn is_valid(&self, thread: &SnapshotThread) -> bool {
        self.snapshot
            .threads
            .get(thread.0)
            .is_some_and(|record| record.valid)
    }

    fn thread_info(&self, thread: &SnapshotThread) -> Result<ThreadInfo, HostError> {
        let record = self
            .snapshot
            .threads
            .get(thread.0)
            .ok_or(HostError::UnknownThread(thread.0 as u64))?;

        let (pid, lwpid, tid) = record.ptid;
        Ok(ThreadInfo {
            num: record.num,
            pid,
            lwpid,
            tid,
        })
    }

    fn selected_thread(&self) -> Option<SnapshotThread> {
        self.selected.map(SnapshotThread)
    }

    fn select_thread(&mut self, thread: &SnapshotThread) -> Result<(), HostError> {
        let record = self
            .snapshot
            .threads
            .get(thread.0)
            .ok_or(HostError::UnknownThread(thread.0 as u64))?;

        trace!("Switching to thread {}", record.num);
        self.selected = Some(thread.0);
        Ok(())
    }

    fn newest_frame(&self) -> Result<Option<SnapshotFrame>, HostError> {
        let thread = self.selected.ok_or(HostError::NoSelectedThread)?;
        let frame = SnapshotFrame { thread, depth: 0 };

        Ok(self.frame_record(&frame).map(|_| frame))
    }

    fn older_frame(&self, frame: &SnapshotFrame) -> Option<SnapshotFrame> {
        let older = SnapshotFrame {
            thread: frame.thread,
            depth: frame.depth + 1,
        };
        self.frame_record(&older).map(|_| older)
    }

    fn frame_pc(&self, frame: &SnapshotFrame) -> u64 {
        self.frame_record(frame).map(|f| f.pc).unwrap_or_default()
    }

    fn frame_name(&self, frame: &SnapshotFrame) -> Option<String> {
        self.frame_record(frame).and_then(|f| f.function.clone())
    }

    fn frame_kind(&self, frame: &SnapshotFrame) -> FrameKind {
        match self.frame_record(frame) {
            Some(record) if record.inline => FrameKind::Inline,
            _ => FrameKind::Normal,
        }
    }
}
