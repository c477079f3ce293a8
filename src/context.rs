//! The per-case context every check goes through.
//!
//! A case body receives a [`Context`] and runs its checks on it, usually via
//! the `verify!`/`compare!` family of macros. A check that fails (or passes
//! while a failure was expected) returns an [`Abort`]; propagating it with
//! `?` ends the case body right there, the engine then runs teardown and
//! records the verdict.

use std::fmt;
use std::panic::Location;

use tracing::trace;

use crate::compare::{Comparator, Equal, Operand};
use crate::expect::{Expectation, ExpectationSlot, ExpectedFailure};
use crate::registry::CaseInfo;
use crate::report::{Reporter, SourceLocation, Verdict};
use crate::truth::Truth;

/// Result of a case body and of every check.
pub type CaseResult = Result<(), Abort>;

/// Signal that ends the current case early.
///
/// Only a [`Context`] can produce one, so a case can end as failed or
/// skipped only through a reported check or `skip!`.
#[must_use = "return it from the case body, e.g. through skip!"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort(Signal);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Failed,
    Skipped,
}

impl Abort {
    pub fn is_skip(&self) -> bool {
        self.0 == Signal::Skipped
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Signal::Failed => write!(f, "test case failed"),
            Signal::Skipped => write!(f, "test case skipped"),
        }
    }
}

/// Final state of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Unset,
    Ok,
    Fail,
    Skip,
}

/// Bookkeeping of one case while it runs.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub id: usize,
    pub name: &'static str,
    /// Where the last check (or skip) of the case was executed.
    pub location: Option<SourceLocation>,
    pub outcome: Outcome,
    /// Message of the verdict that decided the outcome, if any.
    pub message: Option<String>,
    pub checks: usize,
}

impl TestRun {
    fn new(info: &CaseInfo) -> Self {
        TestRun {
            id: info.id,
            name: info.name,
            location: None,
            outcome: Outcome::Unset,
            message: None,
            checks: 0,
        }
    }
}

/// Check interface handed to a running case.
pub struct Context<'r> {
    reporter: &'r mut Reporter,
    run: TestRun,
    expectation: ExpectationSlot,
    test_filename: Option<&'r str>,
}

impl<'r> Context<'r> {
    pub(crate) fn new(
        reporter: &'r mut Reporter,
        info: &CaseInfo,
        test_filename: Option<&'r str>,
    ) -> Self {
        Context {
            reporter,
            run: TestRun::new(info),
            expectation: ExpectationSlot::default(),
            test_filename,
        }
    }

    /// 1-based id of the running case.
    pub fn test_case_id(&self) -> usize {
        self.run.id
    }

    pub fn test_case_name(&self) -> &'static str {
        self.run.name
    }

    /// Checks executed so far in this case.
    pub fn check_count(&self) -> usize {
        self.run.checks
    }

    /// Verifies that `value` holds. Use through `verify!`.
    #[track_caller]
    pub fn verify<T: Truth + ?Sized>(&mut self, expression: &str, value: &T) -> CaseResult {
        self.begin_check(Location::caller());
        let holds = value.truth();
        match (self.expected_failure(), holds) {
            (None, true) => Ok(()),
            (None, false) => self.fail(Verdict::Fail, format!("Expression {expression} failed.")),
            (Some(reason), false) => {
                self.expected(format!("{reason}Expression {expression} failed."));
                Ok(())
            }
            (Some(_), true) => self.fail(
                Verdict::XPass,
                format!("Expression {expression} was expected to fail."),
            ),
        }
    }

    /// Compares with [`Equal`]. Use through `compare!`.
    #[track_caller]
    pub fn compare<A, E>(
        &mut self,
        actual: &str,
        actual_value: &A,
        expected: &str,
        expected_value: &E,
    ) -> CaseResult
    where
        A: PartialEq<E> + fmt::Debug + ?Sized,
        E: fmt::Debug + ?Sized,
    {
        self.compare_with(Equal, actual, actual_value, expected, expected_value)
    }

    /// Compares with an explicit comparator. Use through `compare_as!` or
    /// `compare_with!`.
    #[track_caller]
    pub fn compare_with<C, A, E>(
        &mut self,
        mut comparator: C,
        actual: &str,
        actual_value: &A,
        expected: &str,
        expected_value: &E,
    ) -> CaseResult
    where
        C: Comparator<A, E>,
        A: ?Sized,
        E: ?Sized,
    {
        self.begin_check(Location::caller());
        let equal = comparator.compare(actual_value, expected_value);
        match (self.expected_failure(), equal) {
            (None, true) => Ok(()),
            (None, false) => {
                let mut message = String::new();
                let described = comparator.describe_failure(
                    &mut message,
                    Operand {
                        expression: actual,
                        value: actual_value,
                    },
                    Operand {
                        expression: expected,
                        value: expected_value,
                    },
                );
                if described.is_err() || message.is_empty() {
                    message = format!("Values {actual} and {expected} are not the same.");
                }
                self.fail(Verdict::Fail, message)
            }
            (Some(reason), false) => {
                self.expected(format!("{reason}{actual} and {expected} are not equal."));
                Ok(())
            }
            (Some(_), true) => self.fail(
                Verdict::XPass,
                format!("{actual} and {expected} are not expected to be equal."),
            ),
        }
    }

    /// Skips the rest of the case. Use through `skip!`.
    #[track_caller]
    pub fn skip(&mut self, message: impl Into<String>) -> Abort {
        self.run.location = Some(self.location_of(Location::caller()));
        let message = message.into();
        self.reporter.skipped(self.run.id, self.run.name, &message);
        self.decide(Outcome::Skip, message);
        Abort(Signal::Skipped)
    }

    /// Expects every following check in the guard's scope to fail.
    pub fn expect_fail(&self, message: impl Into<String>) -> ExpectedFailure {
        ExpectedFailure::enter(&self.expectation, message.into(), true)
    }

    /// Like [`Context::expect_fail`], but only when `condition` holds.
    pub fn expect_fail_if<T: Truth + ?Sized>(
        &self,
        condition: &T,
        message: impl Into<String>,
    ) -> ExpectedFailure {
        ExpectedFailure::enter(&self.expectation, message.into(), condition.truth())
    }

    pub(crate) fn finish(mut self, result: CaseResult) -> TestRun {
        if self.run.outcome == Outcome::Unset {
            self.run.outcome = match result {
                Ok(()) => Outcome::Ok,
                Err(Abort(Signal::Failed)) => Outcome::Fail,
                Err(Abort(Signal::Skipped)) => Outcome::Skip,
            };
        }
        self.run
    }

    fn begin_check(&mut self, caller: &'static Location<'static>) {
        self.run.checks += 1;
        self.run.location = Some(self.location_of(caller));
    }

    fn location_of(&self, caller: &'static Location<'static>) -> SourceLocation {
        SourceLocation {
            file: self.test_filename.unwrap_or(caller.file()).to_string(),
            line: caller.line(),
        }
    }

    /// Message prefix of the active expected failure: the guard's message
    /// followed by a space, or nothing for an empty message.
    fn expected_failure(&self) -> Option<String> {
        match &*self.expectation.borrow() {
            Expectation::Normal => None,
            Expectation::Failure { message } if message.is_empty() => Some(String::new()),
            Expectation::Failure { message } => Some(format!("{message} ")),
        }
    }

    fn expected(&mut self, message: String) {
        trace!(case = self.run.name, "expected failure");
        if let Some(location) = &self.run.location {
            self.reporter
                .check(Verdict::XFail, self.run.id, self.run.name, location, &message);
        }
    }

    fn fail(&mut self, verdict: Verdict, message: String) -> CaseResult {
        if let Some(location) = &self.run.location {
            self.reporter
                .check(verdict, self.run.id, self.run.name, location, &message);
        }
        self.decide(Outcome::Fail, message);
        Err(Abort(Signal::Failed))
    }

    /// The first decisive verdict of a case sticks, except that a reported
    /// failure always outranks a skip.
    fn decide(&mut self, outcome: Outcome, message: String) {
        let overrides = match self.run.outcome {
            Outcome::Unset => true,
            Outcome::Skip => outcome == Outcome::Fail,
            Outcome::Ok | Outcome::Fail => false,
        };
        if overrides {
            self.run.outcome = outcome;
            self.run.message = Some(message);
        }
    }
}
