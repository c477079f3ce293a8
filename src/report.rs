//! Renders verdicts as aligned, numbered report lines.
//!
//! Every line starts with a status word right-aligned to six columns and the
//! case id zero-padded to the width of the largest id that is going to run:
//!
//! ```text
//! Starting Suite with 3 test cases...
//!   FAIL [2] false_expression() at suite.rs on line 12
//!         Expression 5 != 5 failed.
//!   SKIP [3] skip()
//!         Not on this platform.
//! Finished Suite with 1 errors out of 2 checks.
//! ```
//!
//! (The `at ... on line N` and the `SKIP` header lines end with a single
//! trailing space, which the report format has always carried.)
//!
//! Failures and unexpected passes go to the error stream, everything else to
//! the log stream. Color is applied through [`WriteColor`]; with a
//! non-coloring writer the output is plain text.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

/// Indentation of message lines below a status line.
const MESSAGE_INDENT: &str = "        ";

/// Width the status words are right-aligned to (`" XFAIL"`).
const STATUS_WIDTH: usize = 6;

/// Classification of a single check or of a whole case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Fail,
    Skip,
    /// A check failed inside an expected-failure scope.
    XFail,
    /// A check passed inside an expected-failure scope.
    XPass,
}

impl Verdict {
    /// `true` for the verdicts that count as errors and abort the case.
    pub fn is_error(self) -> bool {
        matches!(self, Verdict::Fail | Verdict::XPass)
    }
}

/// What a report line announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Verdict(Verdict),
    NoChecks,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Verdict(Verdict::Ok) => "OK",
            Status::Verdict(Verdict::Fail) => "FAIL",
            Status::Verdict(Verdict::Skip) => "SKIP",
            Status::Verdict(Verdict::XFail) => "XFAIL",
            Status::Verdict(Verdict::XPass) => "XPASS",
            Status::NoChecks => "?",
        }
    }

    fn color(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Status::Verdict(Verdict::Fail | Verdict::XPass) => {
                spec.set_fg(Some(Color::Red)).set_bold(true);
            }
            Status::Verdict(Verdict::XFail) => {
                spec.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Status::NoChecks => {
                spec.set_fg(Some(Color::Yellow));
            }
            Status::Verdict(Verdict::Ok | Verdict::Skip) => {
                spec.set_bold(true);
            }
        }
        spec
    }
}

/// Source position of the check that produced a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

/// Totals of one `exec` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cases in the registry.
    pub registered: usize,
    /// Cases left after `--only`/`--skip`.
    pub selected: usize,
    /// Cases that ended in a failure or an unexpected pass.
    pub errors: usize,
    pub checks: usize,
    /// Cases that finished without executing a single check.
    pub empty_cases: usize,
    pub skipped: usize,
}

/// Owns the log and error streams for the duration of a run.
pub(crate) struct Reporter {
    log: Box<dyn WriteColor>,
    error: Box<dyn WriteColor>,
    id_width: usize,
    write_error: Option<io::Error>,
}

impl Reporter {
    pub(crate) fn new(log: Box<dyn WriteColor>, error: Box<dyn WriteColor>) -> Self {
        Reporter {
            log,
            error,
            id_width: 1,
            write_error: None,
        }
    }

    /// Ids are padded to the digit count of `max_id`.
    pub(crate) fn set_max_id(&mut self, max_id: usize) {
        self.id_width = max_id.to_string().len();
    }

    /// The first write failure since the last call, if any.
    pub(crate) fn take_write_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    pub(crate) fn starting(&mut self, test_name: &str, count: usize) {
        let result = writeln!(self.log, "Starting {test_name} with {count} test cases...");
        self.record(result);
    }

    pub(crate) fn no_tests(&mut self, test_name: &str) {
        let result = writeln!(self.error, "No tests to run in {test_name}!");
        self.record(result);
    }

    /// A non-Ok check verdict with the location of the check.
    pub(crate) fn check(
        &mut self,
        verdict: Verdict,
        id: usize,
        name: &str,
        location: &SourceLocation,
        message: &str,
    ) {
        let width = self.id_width;
        let out = if verdict.is_error() {
            &mut self.error
        } else {
            &mut self.log
        };
        let result = write_status(out.as_mut(), Status::Verdict(verdict), id, width, name)
            .and_then(|()| write!(out, " at {} on line {} ", location.file, location.line))
            .and_then(|()| write_message(out.as_mut(), message));
        self.record(result);
    }

    pub(crate) fn skipped(&mut self, id: usize, name: &str, message: &str) {
        let width = self.id_width;
        let out = &mut self.log;
        let result = write_status(out.as_mut(), Status::Verdict(Verdict::Skip), id, width, name)
            .and_then(|()| write!(out, " "))
            .and_then(|()| write_message(out.as_mut(), message));
        self.record(result);
    }

    pub(crate) fn no_checks(&mut self, id: usize, name: &str) {
        let width = self.id_width;
        let out = &mut self.log;
        let result = write_status(out.as_mut(), Status::NoChecks, id, width, name)
            .and_then(|()| writeln!(out));
        self.record(result);
    }

    pub(crate) fn finished(&mut self, test_name: &str, summary: &RunSummary) {
        let out = &mut self.log;
        let mut result = write!(
            out,
            "Finished {test_name} with {} errors out of {} checks.",
            summary.errors, summary.checks
        );
        if summary.empty_cases > 0 {
            result = result.and_then(|()| {
                write!(
                    out,
                    " {} test cases didn't contain any checks!",
                    summary.empty_cases
                )
            });
        }
        let result = result
            .and_then(|()| writeln!(out))
            .and_then(|()| self.log.flush())
            .and_then(|()| self.error.flush());
        self.record(result);
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.write_error.get_or_insert(err);
        }
    }
}

// ============================================================================
// LINE RENDERING
// ============================================================================

fn write_status(
    out: &mut dyn WriteColor,
    status: Status,
    id: usize,
    id_width: usize,
    name: &str,
) -> io::Result<()> {
    out.set_color(&status.color())?;
    write!(out, "{:>STATUS_WIDTH$}", status.label())?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
    write!(out, " [")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "{id:0id_width$}")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
    write!(out, "]")?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, " {name}()")?;
    out.reset()
}

/// Writes `message` on the following line(s), each indented.
fn write_message(out: &mut dyn WriteColor, message: &str) -> io::Result<()> {
    for line in message.split('\n') {
        write!(out, "\n{MESSAGE_INDENT}{line}")?;
    }
    writeln!(out)
}
