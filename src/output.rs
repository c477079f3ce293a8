//! Output sinks for the report.
//!
//! A run writes to two streams: the log stream (progress, skips, expected
//! failures, summary) and the error stream (failures). They are either the
//! process' stdout/stderr or caller-provided writers, wrapped into a
//! [`WriteColor`] once the `--color` option is known.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use termcolor::{Ansi, ColorChoice, NoColor, StandardStream, WriteColor};

use crate::cli::ColorMode;

/// Where a run writes its report.
pub enum Streams {
    /// Log to stdout, errors to stderr.
    Standard,
    Custom {
        log: Box<dyn Write>,
        error: Box<dyn Write>,
    },
}

impl Streams {
    pub fn custom(log: impl Write + 'static, error: impl Write + 'static) -> Self {
        Streams::Custom {
            log: Box::new(log),
            error: Box::new(error),
        }
    }

    /// Wraps the streams into color-aware writers.
    ///
    /// `auto` colors the standard streams only when they are terminals and
    /// never colors custom writers.
    pub(crate) fn into_writers(self, color: ColorMode) -> (Box<dyn WriteColor>, Box<dyn WriteColor>) {
        match self {
            Streams::Standard => (
                Box::new(StandardStream::stdout(color_choice(color, atty::Stream::Stdout))),
                Box::new(StandardStream::stderr(color_choice(color, atty::Stream::Stderr))),
            ),
            Streams::Custom { log, error } => match color {
                ColorMode::On => (Box::new(Ansi::new(log)), Box::new(Ansi::new(error))),
                ColorMode::Off | ColorMode::Auto => {
                    (Box::new(NoColor::new(log)), Box::new(NoColor::new(error)))
                }
            },
        }
    }
}

fn color_choice(color: ColorMode, stream: atty::Stream) -> ColorChoice {
    match color {
        ColorMode::On => ColorChoice::Always,
        ColorMode::Off => ColorChoice::Never,
        ColorMode::Auto if atty::is(stream) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

/// An in-memory writer whose clones share one buffer.
///
/// Handing two clones to a run as log and error stream yields the report
/// interleaved exactly as it was written.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Appends a line, for fixtures that log next to the report.
    pub fn line(&self, text: &str) {
        let mut buffer = self.0.borrow_mut();
        buffer.extend_from_slice(text.as_bytes());
        buffer.push(b'\n');
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
