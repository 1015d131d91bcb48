//! A single level of a captured call stack.

use crate::host::{DebugHost, FrameKind};
use crate::utils::config::{FRAME_POSITION_WIDTH, INLINE_MARKER};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One frame of a stack trace
///
/// Equality covers `position`, `name` and the comparison mode, plus `pc`
/// unless the frame was built with `ignore_pc`.
#[derive(Debug, Clone)]
pub struct Frame {
    position: usize,
    pc: u64,
    name: String,
    ignore_pc: bool,
}

impl Frame {
    /// Build a frame from already-resolved values
    ///
    /// An unresolved name becomes `[unknown 0x<pc>]`; inline frames get
    /// the `[inlined]` marker appended.
    pub fn new(
        position: usize,
        pc: u64,
        name: Option<String>,
        kind: FrameKind,
        ignore_pc: bool,
    ) -> Self {
        let mut name = name.unwrap_or_else(|| format!("[unknown {pc:#x}]"));
        if kind == FrameKind::Inline {
            name.push_str(INLINE_MARKER);
        }

        Self {
            position,
            pc,
            name,
            ignore_pc,
        }
    }

    /// Resolve a host frame handle into a `Frame`
    pub fn from_host<H: DebugHost>(
        host: &H,
        frame: &H::Frame,
        position: usize,
        ignore_pc: bool,
    ) -> Self {
        Self::new(
            position,
            host.frame_pc(frame),
            host.frame_name(frame),
            host.frame_kind(frame),
            ignore_pc,
        )
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn pc(&self) -> u64 {
        self.pc
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ignore_pc(&self) -> bool {
        self.ignore_pc
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.name == other.name
            && self.ignore_pc == other.ignore_pc
            && (self.ignore_pc || self.pc == other.pc)
    }
}

impl Eq for Frame {}

impl Hash for Frame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.name.hash(state);
        self.ignore_pc.hash(state);
        if !self.ignore_pc {
            self.pc.hash(state);
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ignore_pc {
            write!(
                f,
                "#{:>width$} {}",
                self.position,
                self.name,
                width = FRAME_POSITION_WIDTH
            )
        } else {
            write!(
                f,
                "#{:>width$} {:#x} {}",
                self.position,
                self.pc,
                self.name,
                width = FRAME_POSITION_WIDTH
            )
        }
    }
}
