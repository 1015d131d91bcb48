//! Stack traces: the ordered frames of one thread at one instant.
//!
//! A trace is captured by focusing its thread on the host and walking
//! from the newest frame toward older ones. Two traces are equal when
//! their frame sequences are equal; thread identity is metadata only.

use super::frame::Frame;
use crate::host::{with_focus, DebugHost, ThreadInfo};
use crate::utils::config::{DEFAULT_FRAME_LIMIT, DEFAULT_SKIP_FRAMES};
use crate::utils::error::UniqError;
use log::{debug, trace};
use std::fmt;
use std::hash::{Hash, Hasher};

/// How much of each stack to capture and how to compare frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    /// Frames at positions below this are walked but not recorded
    pub skip_frames: usize,

    /// Deepest position considered (inclusive)
    pub frame_limit: usize,

    /// Compare frames by position and name only
    pub ignore_pc: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            skip_frames: DEFAULT_SKIP_FRAMES,
            frame_limit: DEFAULT_FRAME_LIMIT,
            ignore_pc: false,
        }
    }
}

impl TraceOptions {
    /// `None` when the limit is unbounded
    pub fn limit(&self) -> Option<usize> {
        (self.frame_limit != DEFAULT_FRAME_LIMIT).then_some(self.frame_limit)
    }
}

/// Walk the focused thread's stack from `newest` toward older frames
///
/// Positions count every visited frame, so skipped frames still advance
/// the counter. At most `frame_limit + 1` frames are visited.
pub fn accumulate_backtrace<H: DebugHost>(
    host: &H,
    newest: Option<H::Frame>,
    options: &TraceOptions,
) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut current = newest;
    let mut position = 0usize;

    while let Some(frame) = current {
        if position > options.frame_limit {
            break;
        }

        if position >= options.skip_frames {
            frames.push(Frame::from_host(host, &frame, position, options.ignore_pc));
        }

        current = host.older_frame(&frame);
        position += 1;
    }

    trace!("Visited {} frames, kept {}", position, frames.len());
    frames
}

/// Backtrace of one thread
#[derive(Debug, Clone)]
pub struct StackTrace {
    thread: ThreadInfo,
    frames: Vec<Frame>,
}

impl StackTrace {
    /// Assemble a trace from already-built frames
    pub fn new(thread: ThreadInfo, frames: Vec<Frame>) -> Self {
        Self { thread, frames }
    }

    /// Capture the backtrace of `thread`
    ///
    /// Focuses `thread` for the duration of the walk and restores the
    /// previously focused thread afterwards, also on failure.
    ///
    /// # Errors
    /// * `UniqError::InvalidThread` - the thread is no longer valid
    /// * `UniqError::Host` - the host could not switch threads or unwind
    pub fn capture<H: DebugHost>(
        host: &mut H,
        thread: &H::Thread,
        options: &TraceOptions,
    ) -> Result<Self, UniqError> {
        if !host.is_valid(thread) {
            return Err(UniqError::InvalidThread);
        }
        let info = host.thread_info(thread)?;

        let frames = with_focus(host, thread, |host| -> Result<Vec<Frame>, UniqError> {
            let newest = host.newest_frame()?;
            Ok(accumulate_backtrace(host, newest, options))
        })?;

        debug!("Thread {}: {} frames", info.num, frames.len());
        Ok(Self::new(info, frames))
    }

    /// Host-assigned thread number
    pub fn thread_num(&self) -> u64 {
        self.thread.num
    }

    /// Thread identity copied at capture time
    pub fn thread(&self) -> &ThreadInfo {
        &self.thread
    }

    /// Captured frames, newest first
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl PartialEq for StackTrace {
    fn eq(&self, other: &Self) -> bool {
        self.frames == other.frames
    }
}

impl Eq for StackTrace {}

impl Hash for StackTrace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.frames.hash(state);
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}

/// Capture one trace per live thread, in enumeration order
///
/// Stops at the first thread that fails; no partial result is returned.
pub fn collect_traces<H: DebugHost>(
    host: &mut H,
    options: &TraceOptions,
) -> Result<Vec<StackTrace>, UniqError> {
    let threads = host.threads()?;
    debug!("Capturing backtraces for {} threads", threads.len());

    let mut traces = Vec::with_capacity(threads.len());
    for thread in &threads {
        traces.push(StackTrace::capture(host, thread, options)?);
    }
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FrameKind, Snapshot, SnapshotHost};
    use crate::utils::error::HostError;
    use std::collections::hash_map::DefaultHasher;

    /// Host whose only thread has exited and can no longer be described
    struct ExitedHost;

    impl DebugHost for ExitedHost {
        type Thread = u64;
        type Frame = ();

        fn threads(&self) -> Result<Vec<u64>, HostError> {
            Ok(vec![1])
        }

        fn is_valid(&self, _thread: &u64) -> bool {
            false
        }

        fn thread_info(&self, thread: &u64) -> Result<ThreadInfo, HostError> {
            Err(HostError::UnknownThread(*thread))
        }

        fn selected_thread(&self) -> Option<u64> {
            None
        }

        fn select_thread(&mut self, thread: &u64) -> Result<(), HostError> {
            Err(HostError::UnknownThread(*thread))
        }

        fn newest_frame(&self) -> Result<Option<()>, HostError> {
            Err(HostError::NoSelectedThread)
        }

        fn older_frame(&self, _frame: &()) -> Option<()> {
            None
        }

        fn frame_pc(&self, _frame: &()) -> u64 {
            0
        }

        fn frame_name(&self, _frame: &()) -> Option<String> {
            None
        }

        fn frame_kind(&self, _frame: &()) -> FrameKind {
            FrameKind::Normal
        }
    }

    fn hash_of(trace: &StackTrace) -> u64 {
        let mut hasher = DefaultHasher::new();
        trace.hash(&mut hasher);
        hasher.finish()
    }

    /// One focused thread with a ten-frame stack `f0` (newest) .. `f9`
    fn ten_frame_host() -> SnapshotHost {
        let frames: Vec<String> = (0..10)
            .map(|i| format!(r#"{{ "pc": {}, "function": "f{}" }}"#, 0x1000 + i, i))
            .collect();
        let json = format!(
            r#"{{ "selected_thread": 1, "threads": [{{ "num": 1, "ptid": [1, 1, 0], "frames": [{}] }}] }}"#,
            frames.join(",")
        );
        SnapshotHost::new(json.parse::<Snapshot>().unwrap())
    }

    fn positions(host: &SnapshotHost, skip_frames: usize, frame_limit: usize) -> Vec<usize> {
        let options = TraceOptions {
            skip_frames,
            frame_limit,
            ignore_pc: false,
        };
        accumulate_backtrace(host, host.newest_frame().unwrap(), &options)
            .iter()
            .map(Frame::position)
            .collect()
    }

    fn info(num: u64) -> ThreadInfo {
        ThreadInfo {
            num,
            pid: 100,
            lwpid: 100 + num,
            tid: 0,
        }
    }

    #[test]
    fn test_skip_and_limit_bounds() {
        let host = ten_frame_host();

        assert_eq!(positions(&host, 3, 5), vec![3, 4, 5]);
        assert_eq!(positions(&host, 10, usize::MAX), Vec::<usize>::new());
        assert_eq!(positions(&host, 0, 0), vec![0]);
        assert_eq!(positions(&host, 1, 0), Vec::<usize>::new());
        assert_eq!(positions(&host, 6, 5), Vec::<usize>::new());
        assert_eq!(positions(&host, 5, 5), vec![5]);
        assert_eq!(positions(&host, 0, usize::MAX), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_frames_are_newest_first() {
        let host = ten_frame_host();
        let frames = accumulate_backtrace(&host, host.newest_frame().unwrap(), &TraceOptions::default());

        assert_eq!(frames.first().unwrap().name(), "f0");
        assert_eq!(frames.last().unwrap().name(), "f9");
    }

    #[test]
    fn test_no_frames_yields_empty_sequence() {
        let host = ten_frame_host();
        assert!(accumulate_backtrace(&host, None, &TraceOptions::default()).is_empty());
    }

    #[test]
    fn test_capture_copies_identity_and_restores_focus() {
        let mut host = SnapshotHost::new(
            r#"{
                "selected_thread": 2,
                "threads": [
                    { "num": 1, "ptid": [50, 51, 7], "frames": [{ "pc": 16, "function": "run" }] },
                    { "num": 2, "ptid": [50, 52, 8], "frames": [] }
                ]
            }"#
            .parse::<Snapshot>()
            .unwrap(),
        );
        let threads = host.threads().unwrap();

        let trace = StackTrace::capture(&mut host, &threads[0], &TraceOptions::default()).unwrap();

        assert_eq!(trace.thread_num(), 1);
        assert_eq!(
            *trace.thread(),
            ThreadInfo {
                num: 1,
                pid: 50,
                lwpid: 51,
                tid: 7
            }
        );
        assert_eq!(trace.to_string(), "#  0 0x10 run");
        assert_eq!(host.selected_thread(), Some(threads[1]));
    }

    #[test]
    fn test_capture_invalid_thread() {
        let mut host = SnapshotHost::new(
            r#"{
                "selected_thread": 1,
                "threads": [
                    { "num": 1, "ptid": [1, 1, 0] },
                    { "num": 2, "ptid": [1, 2, 0], "valid": false }
                ]
            }"#
            .parse::<Snapshot>()
            .unwrap(),
        );
        let threads = host.threads().unwrap();

        let result = StackTrace::capture(&mut host, &threads[1], &TraceOptions::default());

        assert!(matches!(result, Err(UniqError::InvalidThread)));
        assert_eq!(host.selected_thread(), Some(threads[0]));
    }

    #[test]
    fn test_capture_exited_thread_is_checked_before_querying() {
        let mut host = ExitedHost;

        let result = StackTrace::capture(&mut host, &1, &TraceOptions::default());
        assert!(matches!(result, Err(UniqError::InvalidThread)));

        let result = collect_traces(&mut host, &TraceOptions::default());
        assert!(matches!(result, Err(UniqError::InvalidThread)));
    }

    #[test]
    fn test_equal_traces_hash_equal() {
        let build = |num, pc, ignore_pc| {
            StackTrace::new(
                info(num),
                vec![
                    Frame::new(0, pc, Some("foo".into()), FrameKind::Normal, ignore_pc),
                    Frame::new(1, 0x20, Some("bar".into()), FrameKind::Normal, ignore_pc),
                ],
            )
        };
        let traces = [
            build(1, 0x10, false),
            build(2, 0x10, false),
            build(3, 0x14, false),
            build(4, 0x10, true),
            build(5, 0x14, true),
            StackTrace::new(info(6), Vec::new()),
        ];

        for a in &traces {
            assert_eq!(a, a);
            for b in &traces {
                assert_eq!(a == b, b == a);
                if a == b {
                    assert_eq!(hash_of(a), hash_of(b));
                }
            }
        }
        assert_eq!(traces[0], traces[1]);
        assert_ne!(traces[0], traces[2]);
        assert_eq!(traces[3], traces[4]);
        assert_ne!(traces[0], traces[3]);
    }

    #[test]
    fn test_equality_ignores_thread_identity() {
        let frames = vec![
            Frame::new(0, 0x10, Some("foo".into()), FrameKind::Normal, false),
            Frame::new(1, 0x20, Some("bar".into()), FrameKind::Normal, false),
        ];

        let a = StackTrace::new(info(1), frames.clone());
        let b = StackTrace::new(info(2), frames);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_trace_never_equals_unknown_frame() {
        let empty = StackTrace::new(info(1), Vec::new());
        let unknown = StackTrace::new(
            info(2),
            vec![Frame::new(0, 0, None, FrameKind::Normal, false)],
        );

        assert!(empty.is_empty());
        assert_ne!(empty, unknown);
    }

    #[test]
    fn test_display_joins_frames() {
        let trace = StackTrace::new(
            info(1),
            vec![
                Frame::new(0, 0x10, Some("foo".into()), FrameKind::Normal, true),
                Frame::new(1, 0x20, Some("bar".into()), FrameKind::Normal, true),
            ],
        );

        assert_eq!(trace.to_string(), "#  0 foo\n#  1 bar");
    }

    #[test]
    fn test_collect_traces_stops_at_invalid_thread() {
        let mut host = SnapshotHost::new(
            r#"{
                "threads": [
                    { "num": 1, "ptid": [1, 1, 0] },
                    { "num": 2, "ptid": [1, 2, 0], "valid": false },
                    { "num": 3, "ptid": [1, 3, 0] }
                ]
            }"#
            .parse::<Snapshot>()
            .unwrap(),
        );

        let result = collect_traces(&mut host, &TraceOptions::default());
        assert!(matches!(result, Err(UniqError::InvalidThread)));
    }
}
