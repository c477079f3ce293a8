//! Errors of the runner itself.
//!
//! Check failures are not errors in this sense: they are verdicts, reported
//! inline and tallied in the summary. What ends up here is a bad command line
//! or a report that could not be written.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TesterError {
    /// Bad command line; rendered by clap, nothing runs.
    #[error(transparent)]
    #[diagnostic(code(testsuite::usage))]
    Usage(#[from] clap::Error),

    #[error("failed to write the test report")]
    #[diagnostic(
        code(testsuite::report),
        help("check that the log and error streams are still open")
    )]
    Report(#[source] std::io::Error),
}

/// An `--only`/`--skip` entry that is not a case id.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a test case id")]
#[diagnostic(
    code(testsuite::usage::case_id),
    help("case ids are 1-based numbers separated by spaces, e.g. \"1 4 9\"")
)]
pub struct InvalidCaseId(pub String);
