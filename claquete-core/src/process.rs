//! External process execution with line-oriented output streaming.
//!
//! A spawned process gets one drain thread per pipe; both feed a single
//! channel so the consumer sees one ordered, finite stream of lines.
//! `wait()` joins the drain threads before reaping the child, so every
//! buffered line is delivered before the exit status is observed.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// One line of process output, tagged with the pipe it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Stdout(text) | OutputLine::Stderr(text) => text,
        }
    }
}

/// Result of polling for the next line with a timeout.
#[derive(Debug)]
pub enum LinePoll {
    Line(OutputLine),
    /// Nothing arrived within the timeout; the process is still running.
    Idle,
    /// Both pipes are closed; no further lines will arrive.
    Eof,
}

/// Handle to a spawned external process.
///
/// The handle exclusively owns the child; dropping it without calling
/// [`ProcessHandle::wait`] leaks a zombie, so every code path must reap.
pub struct ProcessHandle {
    child: Child,
    rx: Receiver<OutputLine>,
    drains: Vec<JoinHandle<()>>,
}

impl ProcessHandle {
    /// Spawns `program` with `args`, capturing stdout and stderr.
    ///
    /// A missing or unlaunchable binary fails with
    /// [`CoreError::SpawnFailed`].
    pub fn spawn(program: &str, args: &[String]) -> CoreResult<Self> {
        log::debug!("spawning: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CoreError::SpawnFailed {
                tool: program.to_string(),
                source: e,
            })?;

        let (tx, rx) = mpsc::channel();
        let mut drains = Vec::with_capacity(2);

        if let Some(stdout) = child.stdout.take() {
            let tx = tx.clone();
            drains.push(std::thread::spawn(move || {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    if tx.send(OutputLine::Stdout(line)).is_err() {
                        break;
                    }
                }
            }));
        }
        if let Some(stderr) = child.stderr.take() {
            let tx = tx.clone();
            drains.push(std::thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    if tx.send(OutputLine::Stderr(line)).is_err() {
                        break;
                    }
                }
            }));
        }
        // The receiver signals end-of-stream once both drain threads finish.
        drop(tx);

        Ok(Self { child, rx, drains })
    }

    /// Blocks for the next output line; `None` once both pipes are closed.
    pub fn next_line(&mut self) -> Option<OutputLine> {
        self.rx.recv().ok()
    }

    /// Like [`ProcessHandle::next_line`] but bounded, so callers can check a
    /// cancellation signal even while the process is quiet.
    pub fn poll_line(&mut self, timeout: Duration) -> LinePoll {
        match self.rx.recv_timeout(timeout) {
            Ok(line) => LinePoll::Line(line),
            Err(RecvTimeoutError::Timeout) => LinePoll::Idle,
            Err(RecvTimeoutError::Disconnected) => LinePoll::Eof,
        }
    }

    /// Lazy, single-pass view of the remaining output lines.
    pub fn lines(&mut self) -> impl Iterator<Item = OutputLine> + '_ {
        std::iter::from_fn(move || self.next_line())
    }

    /// Terminates the child. Remaining buffered output is still delivered;
    /// callers drain to end-of-stream and then [`ProcessHandle::wait`].
    pub fn kill(&mut self) {
        if let Err(e) = self.child.kill() {
            // Already exited is the common benign case.
            log::debug!("kill failed: {e}");
        }
    }

    /// Reaps the child and returns its exit status. Drain threads are
    /// joined first, so all output has been delivered by the time the
    /// status is returned.
    pub fn wait(mut self) -> CoreResult<ExitStatus> {
        for drain in self.drains.drain(..) {
            let _ = drain.join();
        }
        Ok(self.child.wait()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> ProcessHandle {
        ProcessHandle::spawn("sh", &["-c".to_string(), script.to_string()]).unwrap()
    }

    #[test]
    fn delivers_stdout_lines_in_order() {
        let mut handle = sh("echo one; echo two; echo three");
        let lines: Vec<OutputLine> = handle.lines().collect();
        assert_eq!(
            lines,
            vec![
                OutputLine::Stdout("one".to_string()),
                OutputLine::Stdout("two".to_string()),
                OutputLine::Stdout("three".to_string()),
            ]
        );
        assert!(handle.wait().unwrap().success());
    }

    #[test]
    fn captures_stderr_lines() {
        let mut handle = sh("echo oops >&2");
        let lines: Vec<OutputLine> = handle.lines().collect();
        assert_eq!(lines, vec![OutputLine::Stderr("oops".to_string())]);
        assert!(handle.wait().unwrap().success());
    }

    #[test]
    fn wait_sees_all_output_before_status() {
        // Burst of output right before exit must not be truncated.
        let mut handle = sh("i=0; while [ $i -lt 100 ]; do echo line$i; i=$((i+1)); done");
        let count = handle.lines().count();
        assert_eq!(count, 100);
        assert!(handle.wait().unwrap().success());
    }

    #[test]
    fn nonzero_exit_is_reported() {
        let mut handle = sh("exit 3");
        assert_eq!(handle.lines().count(), 0);
        let status = handle.wait().unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn missing_binary_fails_with_spawn_error() {
        let result = ProcessHandle::spawn("claquete-no-such-binary", &[]);
        assert!(matches!(result, Err(CoreError::SpawnFailed { .. })));
    }

    #[test]
    fn kill_terminates_a_running_process() {
        let mut handle = ProcessHandle::spawn("sleep", &["30".to_string()]).unwrap();
        handle.kill();
        while handle.next_line().is_some() {}
        let status = handle.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn poll_line_reports_idle_then_eof() {
        let mut handle = sh("sleep 1; echo late");
        assert!(matches!(
            handle.poll_line(Duration::from_millis(50)),
            LinePoll::Idle
        ));
        loop {
            match handle.poll_line(Duration::from_secs(5)) {
                LinePoll::Line(line) => {
                    assert_eq!(line.text(), "late");
                }
                LinePoll::Eof => break,
                LinePoll::Idle => {}
            }
        }
        assert!(handle.wait().unwrap().success());
    }
}
