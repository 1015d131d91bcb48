//! Narrow interface to the debugging host.
//!
//! The host owns the target's threads and frames. We only need to:
//! - Enumerate threads and read their identity
//! - Move the "focused thread" around (backtraces are taken from it)
//! - Walk frames from newest to oldest and resolve pc / name / kind

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotHost};

use crate::utils::error::HostError;
use log::trace;

/// Kind of a stack frame as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameKind {
    /// A genuine call frame
    #[default]
    Normal,

    /// A function body expanded into its caller
    Inline,
}

/// Identity of a thread, copied at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadInfo {
    /// Host-assigned thread number
    pub num: u64,

    /// Process id
    pub pid: u64,

    /// Lightweight-process id
    pub lwpid: u64,

    /// Thread id
    pub tid: u64,
}

/// Capabilities the stack engine consumes from a debugging host
pub trait DebugHost {
    /// Handle to one thread of the target
    type Thread: Clone;

    /// Handle to one frame of the focused thread's stack
    type Frame;

    /// Enumerate the live threads of the target process
    fn threads(&self) -> Result<Vec<Self::Thread>, HostError>;

    /// False once `thread` has exited or otherwise become unusable
    fn is_valid(&self, thread: &Self::Thread) -> bool;

    /// Number and (pid, lwpid, tid) of `thread`
    ///
    /// Only called for threads that `is_valid` accepted.
    fn thread_info(&self, thread: &Self::Thread) -> Result<ThreadInfo, HostError>;

    /// Currently focused thread, if any
    fn selected_thread(&self) -> Option<Self::Thread>;

    /// Move the focus to `thread`
    fn select_thread(&mut self, thread: &Self::Thread) -> Result<(), HostError>;

    /// Newest frame of the focused thread (`None` for an empty stack)
    fn newest_frame(&self) -> Result<Option<Self::Frame>, HostError>;

    /// Next older frame, or `None` at the bottom of the stack
    fn older_frame(&self, frame: &Self::Frame) -> Option<Self::Frame>;

    /// Program counter of `frame`
    fn frame_pc(&self, frame: &Self::Frame) -> u64;

    /// Resolved symbol name of `frame`, if the host knows one
    fn frame_name(&self, frame: &Self::Frame) -> Option<String>;

    /// Whether `frame` is a real call or an inline expansion
    fn frame_kind(&self, frame: &Self::Frame) -> FrameKind;
}

/// Run `body` with `thread` focused, then restore the previous focus.
///
/// The previous focus is restored whether `body` succeeds or fails. When
/// nothing was focused beforehand there is nothing to restore.
pub fn with_focus<H, T, E, F>(host: &mut H, thread: &H::Thread, body: F) -> Result<T, E>
where
    H: DebugHost,
    E: From<HostError>,
    F: FnOnce(&H) -> Result<T, E>,
{
    let previous = host.selected_thread();

    host.select_thread(thread)?;
    let result = body(&*host);

    if let Some(previous) = previous {
        trace!("Restoring previously focused thread");
        let restored = host.select_thread(&previous);
        // A failure inside `body` wins over a failed restore
        if result.is_ok() {
            restored?;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::UniqError;

    const SNAPSHOT: &str = r#"{
        "selected_thread": 2,
        "threads": [
            { "num": 1, "ptid": [10, 11, 0], "frames": [{ "pc": 1, "function": "a" }] },
            { "num": 2, "ptid": [10, 12, 0], "frames": [{ "pc": 2, "function": "b" }] }
        ]
    }"#;

    fn host() -> SnapshotHost {
        SnapshotHost::new(SNAPSHOT.parse::<Snapshot>().unwrap())
    }

    fn selected_num(host: &SnapshotHost) -> Option<u64> {
        host.selected_thread()
            .and_then(|t| host.thread_info(&t).ok())
            .map(|info| info.num)
    }

    #[test]
    fn test_with_focus_switches_and_restores() {
        let mut host = host();
        let threads = host.threads().unwrap();

        let seen: Result<Option<u64>, UniqError> =
            with_focus(&mut host, &threads[0], |h| Ok(selected_num(h)));

        assert_eq!(seen.unwrap(), Some(1));
        assert_eq!(selected_num(&host), Some(2));
    }

    #[test]
    fn test_with_focus_restores_on_error() {
        let mut host = host();
        let threads = host.threads().unwrap();

        let result: Result<(), UniqError> =
            with_focus(&mut host, &threads[0], |_| Err(UniqError::InvalidThread));

        assert!(matches!(result, Err(UniqError::InvalidThread)));
        assert_eq!(selected_num(&host), Some(2));
    }

    #[test]
    fn test_with_focus_without_previous_selection() {
        let mut host = SnapshotHost::new(
            r#"{ "threads": [{ "num": 7, "ptid": [1, 1, 0], "frames": [] }] }"#
                .parse::<Snapshot>()
                .unwrap(),
        );
        let threads = host.threads().unwrap();
        assert!(host.selected_thread().is_none());

        let seen: Result<Option<u64>, UniqError> =
            with_focus(&mut host, &threads[0], |h| Ok(selected_num(h)));

        assert_eq!(seen.unwrap(), Some(7));
        // Nothing to restore: focus stays on the last thread visited
        assert_eq!(selected_num(&host), Some(7));
    }
}
