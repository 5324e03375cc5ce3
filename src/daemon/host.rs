//! Line-delimited JSON host adapter on stdin/stdout.
//!
//! A tray process (or a person at a terminal) drives the daemon by writing
//! one event per line to its stdin and reading one acknowledgement per line
//! from its stdout:
//!
//! ```text
//! → {"message":"toggleTimer"}
//! ← {"id":"toggleTimer","msgType":"deactivate"}
//! ```
//!
//! Logs go to stderr so they never interleave with the protocol.

use std::io::{self, BufRead, Write};
use std::thread;

use crossbeam_channel::Receiver;
use tokio::sync::mpsc;

use crate::menubar::{MenuBuilder, MenuCommand, MenuConfig, MenuEvent};

/// Parses one inbound line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns an error if the line is not a JSON object with a `message` field.
pub fn parse_event_line(line: &str) -> Result<Option<MenuEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Forwards every well-formed event from `reader` to `tx`.
///
/// Malformed lines are logged and skipped. Returns the number of events
/// forwarded once the reader is exhausted or the receiver is gone.
pub fn read_events<R: BufRead>(reader: R, tx: &mpsc::UnboundedSender<MenuEvent>) -> usize {
    let mut forwarded = 0;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read menu event: {}", e);
                break;
            }
        };

        match parse_event_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).is_err() {
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(line = %line, "Malformed menu event: {}", e),
        }
    }

    forwarded
}

/// Writes each acknowledgement as a JSON line, keeping `menu` in sync.
///
/// Returns the number of commands written once every sender is dropped.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_commands<W: Write>(
    rx: &Receiver<MenuCommand>,
    mut out: W,
    menu: &mut MenuConfig,
) -> io::Result<usize> {
    let mut written = 0;

    for command in rx.iter() {
        match menu.apply(&command) {
            Ok(item) => tracing::debug!(
                id = %item.id,
                text = %item.text,
                selected = item.selected,
                "Menu item updated"
            ),
            Err(e) => tracing::warn!("{}", e),
        }

        serde_json::to_writer(&mut out, &command)?;
        out.write_all(b"\n")?;
        out.flush()?;
        written += 1;
    }

    Ok(written)
}

/// Reads menu events from stdin on a dedicated thread.
///
/// The returned channel closes when stdin reaches end of file.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_stdin_reader() -> io::Result<mpsc::UnboundedReceiver<MenuEvent>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("menu-events".to_string())
        .spawn(move || {
            let forwarded = read_events(io::stdin().lock(), &tx);
            tracing::debug!(forwarded, "Stdin closed");
        })?;
    Ok(rx)
}

/// Writes acknowledgements to stdout on a dedicated thread.
///
/// The thread exits once every sender of `rx` is dropped.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_ack_writer(
    rx: Receiver<MenuCommand>,
) -> io::Result<thread::JoinHandle<io::Result<usize>>> {
    thread::Builder::new()
        .name("menu-acks".to_string())
        .spawn(move || {
            let mut menu = MenuBuilder::new().build();
            write_commands(&rx, io::stdout().lock(), &mut menu)
        })
}

// ============================================================================
// Tests
// ============================================================================
