//! Dedicated OS-thread console reader.
//!
//! Reading stdin is a blocking call, so it lives on its own thread rather
//! than inside a tokio task.  The thread:
//!
//! * vectorizes frames and publishes them to the dispatch mailbox, replacing
//!   any frame the dispatch task has not picked up yet;
//! * forwards commands to the control loop with `blocking_send`.
//!
//! At end of input the thread returns and drops both senders, which ends the
//! dispatch task and the control loop in turn.

use std::io::BufRead;
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use crate::dispatch::FrameSender;
use crate::landmark::vectorize;

use super::{parse_line, Command, ConsoleInput};

// ---------------------------------------------------------------------------
// ConsoleReader
// ---------------------------------------------------------------------------

/// Handle to a running console reader thread.
pub struct ConsoleReader {
    thread: JoinHandle<ReaderStats>,
}

/// Line counts gathered by the reader thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub frames: u64,
    /// Frames with a hand, published to the mailbox.
    pub vectors: u64,
    pub commands: u64,
    pub errors: u64,
}

impl ConsoleReader {
    /// Spawn the reader thread over `input` (normally a buffered stdin).
    ///
    /// Returns an error only if the OS refuses to create the thread.
    pub fn start<R>(
        input: R,
        frame_tx: FrameSender,
        command_tx: mpsc::Sender<Command>,
    ) -> std::io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let thread = std::thread::Builder::new()
            .name("console-reader".into())
            .spawn(move || read_lines(input, frame_tx, command_tx))?;

        Ok(Self { thread })
    }

    /// Wait for the reader to reach end of input.
    pub fn join(self) -> ReaderStats {
        self.thread.join().unwrap_or_else(|_| {
            log::error!("console: reader thread panicked");
            ReaderStats::default()
        })
    }
}

fn read_lines<R: BufRead>(
    input: R,
    frame_tx: FrameSender,
    command_tx: mpsc::Sender<Command>,
) -> ReaderStats {
    let mut stats = ReaderStats::default();

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("console: read failed: {e}");
                break;
            }
        };

        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleInput::Frame(frame))) => {
                stats.frames += 1;
                // Zero-hand frames produce nothing to dispatch.
                let Some(vector) = vectorize(&frame) else {
                    continue;
                };
                if frame_tx.send(Some(vector)).is_err() {
                    log::debug!("console: dispatch closed, stopping");
                    break;
                }
                stats.vectors += 1;
            }
            Ok(Some(ConsoleInput::Command(command))) => {
                stats.commands += 1;
                if command_tx.blocking_send(command).is_err() {
                    log::debug!("console: control loop closed, stopping");
                    break;
                }
            }
            Err(e) => {
                stats.errors += 1;
                log::warn!("console: {e}");
            }
        }
    }

    log::info!(
        "console: input closed ({} frames, {} with a hand, {} commands, {} errors)",
        stats.frames,
        stats.vectors,
        stats.commands,
        stats.errors
    );
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::dispatch::frame_mailbox;
    use crate::landmark::LandmarkVector;
    use crate::session::Intent;

    fn hand_frame(x: f32) -> String {
        let point = format!(r#"{{"x":{x},"y":0.5,"z":0.0}}"#);
        let hand = vec![point; 21].join(",");
        format!(r#"{{"hands":[[{hand}]]}}"#)
    }

    /// Run the reader to end of input; returns the stats, the frame still
    /// pending in the mailbox and the forwarded commands.
    fn run(script: String) -> (ReaderStats, Option<LandmarkVector>, Vec<Command>) {
        let (frame_tx, mut frame_rx) = frame_mailbox();
        let (command_tx, mut command_rx) = mpsc::channel(64);

        let reader = ConsoleReader::start(Cursor::new(script), frame_tx, command_tx).unwrap();
        let stats = reader.join();

        let pending = frame_rx.borrow_and_update().clone();
        let mut commands = Vec::new();
        while let Ok(c) = command_rx.try_recv() {
            commands.push(c);
        }
        (stats, pending, commands)
    }

    #[test]
    fn newest_frame_replaces_pending_one() {
        let script = [hand_frame(0.1), hand_frame(0.2), hand_frame(0.3)].join("\n");
        let (stats, pending, _) = run(script);

        assert_eq!(stats.frames, 3);
        assert_eq!(stats.vectors, 3);
        assert_eq!(pending.map(|v| v.as_slice()[0]), Some(0.3));
    }

    #[test]
    fn empty_frames_are_not_dispatched() {
        let (stats, pending, _) = run(r#"{"hands":[]}"#.to_string());
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.vectors, 0);
        assert!(pending.is_none());
    }

    #[test]
    fn commands_are_forwarded_in_order() {
        let script = "/label Hello\n/collect\n\n/status\n".to_string();
        let (stats, _, commands) = run(script);

        assert_eq!(stats.commands, 3);
        assert_eq!(
            commands,
            vec![
                Command::Intent(Intent::SetLabel("Hello".into())),
                Command::Intent(Intent::ToggleCollect),
                Command::Status,
            ]
        );
    }

    #[test]
    fn bad_lines_are_counted_and_skipped() {
        let script = "/jump\nnonsense\n/stop\n".to_string();
        let (stats, _, commands) = run(script);

        assert_eq!(stats.errors, 2);
        assert_eq!(commands, vec![Command::Intent(Intent::Stop)]);
    }

    #[tokio::test]
    async fn senders_are_dropped_at_end_of_input() {
        let (frame_tx, mut frame_rx) = frame_mailbox();
        let (command_tx, mut command_rx) = mpsc::channel(1);

        ConsoleReader::start(Cursor::new(String::new()), frame_tx, command_tx)
            .unwrap()
            .join();

        assert!(frame_rx.changed().await.is_err());
        assert!(command_rx.recv().await.is_none());
    }
}
