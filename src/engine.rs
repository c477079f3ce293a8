//! The test execution engine.
//!
//! [`Tester`] owns the suite fixture and the registry of its cases. `exec`
//! parses the command line, narrows the registry with `--only`/`--skip` and
//! runs the remaining cases one after another:
//!
//! 1. the setup hook of the case's group, if any
//! 2. the case body, until it returns or a check aborts it
//! 3. the teardown hook, also after a failure or a skip
//!
//! Execution is strictly sequential. There is no timeout: a case that never
//! returns hangs the whole run.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use tracing::{debug, warn};

use crate::cli::{ColorMode, Options};
use crate::context::{Context, Outcome, TestRun};
use crate::errors::TesterError;
use crate::output::Streams;
use crate::registry::{HookFn, Registry, TestCaseFn};
use crate::report::{Reporter, RunSummary};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Host-application settings of a [`Tester`].
#[derive(Debug, Clone, Default)]
pub struct TesterConfiguration {
    skipped_argument_prefixes: Vec<String>,
}

impl TesterConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Argument prefixes the command line accepts and ignores.
    ///
    /// With prefix `"gpu"`, `--gpu-driver vulkan` and `--gpu-validation=on`
    /// are left for the host application to consume. Prefixes accumulate over
    /// repeated calls.
    pub fn set_skipped_argument_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skipped_argument_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn skipped_argument_prefixes(&self) -> &[String] {
        &self.skipped_argument_prefixes
    }
}

// ============================================================================
// EXIT STATUS
// ============================================================================

/// Overall result of `exec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every case that ran either passed with at least one check or was skipped.
    Passed,
    /// A case failed, or a case finished without executing any check.
    Failed,
    /// Nothing to run: the registry is empty or the filters selected nothing.
    NoTests,
    /// The command line could not be parsed.
    Usage,
}

impl Status {
    pub fn code(self) -> i32 {
        match self {
            Status::Passed => 0,
            Status::Failed | Status::Usage => 1,
            Status::NoTests => 2,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        // codes are 0..=2
        ExitCode::from(status.code() as u8)
    }
}

// ============================================================================
// TESTER
// ============================================================================

/// A suite whose binary entry point is generated by `tester_main!`.
pub trait TestSuite: Sized {
    /// Registers the suite's cases, in the order they are numbered.
    fn register(tester: &mut Tester<Self>);
}

/// Runs the registered cases of a suite fixture `F`.
pub struct Tester<F> {
    fixture: F,
    registry: Registry<F>,
    configuration: TesterConfiguration,
    test_name: String,
    test_filename: Option<String>,
}

impl<F> Tester<F> {
    pub fn new(fixture: F) -> Self {
        Self::with_configuration(fixture, TesterConfiguration::default())
    }

    pub fn with_configuration(fixture: F, configuration: TesterConfiguration) -> Self {
        Tester {
            fixture,
            registry: Registry::default(),
            configuration,
            test_name: default_test_name::<F>(),
            test_filename: None,
        }
    }

    /// Sets the source file reported for every check and the suite name
    /// printed in the header and summary.
    pub fn register_test(&mut self, filename: impl Into<String>, name: impl Into<String>) {
        self.test_filename = Some(filename.into());
        self.test_name = name.into();
    }

    /// Appends cases; use `add_tests!` to derive the names automatically.
    pub fn add_tests<I>(&mut self, cases: I)
    where
        I: IntoIterator<Item = (&'static str, TestCaseFn<F>)>,
    {
        self.registry.add(cases);
    }

    /// Appends cases that run between `setup` and `teardown`.
    pub fn add_tests_with_hooks<I>(&mut self, cases: I, setup: HookFn<F>, teardown: HookFn<F>)
    where
        I: IntoIterator<Item = (&'static str, TestCaseFn<F>)>,
    {
        self.registry.add_with_hooks(cases, setup, teardown);
    }

    pub fn registry(&self) -> &Registry<F> {
        &self.registry
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn fixture(&self) -> &F {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut F {
        &mut self.fixture
    }

    /// Runs with the process arguments, reporting to stdout and stderr.
    pub fn exec(&mut self) -> ExitCode {
        crate::logging::init_tracing();
        let status = self.exec_streams(std::env::args_os(), Streams::Standard);
        ExitCode::from(status)
    }

    /// Runs with explicit arguments (the first one is the program name) and
    /// output streams, returning the exit code.
    pub fn exec_with<I, T>(
        &mut self,
        args: I,
        log: impl Write + 'static,
        error: impl Write + 'static,
    ) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.exec_streams(args, Streams::custom(log, error)).code()
    }

    pub fn exec_streams<I, T>(&mut self, args: I, streams: Streams) -> Status
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            args.push(OsString::from(&self.test_name));
        }

        let options = match Options::parse(args, &self.configuration) {
            Ok(options) => options,
            Err(TesterError::Usage(err)) => {
                let (mut log, mut error) = streams.into_writers(ColorMode::Off);
                let out = if err.use_stderr() { &mut error } else { &mut log };
                if write!(out, "{}", err.render()).is_err() {
                    warn!("could not print usage");
                }
                return if err.use_stderr() {
                    Status::Usage
                } else {
                    Status::Passed
                };
            }
            Err(err) => return fatal(err),
        };

        let (log, error) = streams.into_writers(options.color);
        let mut reporter = Reporter::new(log, error);
        match self.run(&options, &mut reporter) {
            Ok((status, _)) => status,
            Err(err) => fatal(err),
        }
    }

    /// Runs the selected cases, returning the status and the totals.
    fn run(
        &mut self,
        options: &Options,
        reporter: &mut Reporter,
    ) -> Result<(Status, RunSummary), TesterError> {
        let selected = options.filter.select(self.registry.len());
        let mut summary = RunSummary {
            registered: self.registry.len(),
            selected: selected.len(),
            ..RunSummary::default()
        };

        if selected.is_empty() {
            reporter.no_tests(&self.test_name);
            flush_errors(reporter)?;
            return Ok((Status::NoTests, summary));
        }

        let max_id = selected.iter().map(|index| index + 1).max().unwrap_or(1);
        reporter.set_max_id(max_id);
        reporter.starting(&self.test_name, selected.len());
        debug!(
            suite = %self.test_name,
            registered = summary.registered,
            selected = summary.selected,
            "starting test run"
        );

        for index in selected {
            let case = self.registry.cases()[index];
            let info = case.info();
            debug!(id = info.id, case = info.name, "running test case");

            if let Some(setup) = case.setup() {
                setup(&mut self.fixture, &info);
            }

            let mut context = Context::new(reporter, &info, self.test_filename.as_deref());
            let result = (case.entry())(&mut self.fixture, &mut context);
            let run = context.finish(result);

            if run.outcome == Outcome::Ok && run.checks == 0 {
                reporter.no_checks(run.id, run.name);
            }

            if let Some(teardown) = case.teardown() {
                teardown(&mut self.fixture, &info);
            }

            tally(&mut summary, &run);
            flush_errors(reporter)?;
        }

        reporter.finished(&self.test_name, &summary);
        flush_errors(reporter)?;

        let status = if summary.errors > 0 || summary.empty_cases > 0 {
            Status::Failed
        } else {
            Status::Passed
        };
        debug!(?status, errors = summary.errors, checks = summary.checks, "test run finished");
        Ok((status, summary))
    }
}

impl<F: TestSuite> Tester<F> {
    /// A tester with the suite's cases registered.
    pub fn for_suite(fixture: F) -> Self {
        Self::for_suite_with_configuration(fixture, TesterConfiguration::default())
    }

    pub fn for_suite_with_configuration(fixture: F, configuration: TesterConfiguration) -> Self {
        let mut tester = Tester::with_configuration(fixture, configuration);
        F::register(&mut tester);
        tester
    }
}

fn tally(summary: &mut RunSummary, run: &TestRun) {
    summary.checks += run.checks;
    match run.outcome {
        Outcome::Fail => summary.errors += 1,
        Outcome::Skip => summary.skipped += 1,
        Outcome::Ok if run.checks == 0 => summary.empty_cases += 1,
        Outcome::Ok | Outcome::Unset => {}
    }
}

fn flush_errors(reporter: &mut Reporter) -> Result<(), TesterError> {
    match reporter.take_write_error() {
        Some(err) => Err(TesterError::Report(err)),
        None => Ok(()),
    }
}

fn fatal(err: TesterError) -> Status {
    eprintln!("{:?}", miette::Report::new(err));
    Status::Failed
}

/// Last path segment of the fixture's type name.
fn default_test_name<F>() -> String {
    let full = std::any::type_name::<F>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CaseResult;
    use crate::output::SharedBuffer;

    #[derive(Default)]
    struct Counter {
        calls: Vec<String>,
    }

    impl Counter {
        fn passes(&mut self, t: &mut Context<'_>) -> CaseResult {
            self.calls.push(format!("passes {}", t.test_case_id()));
            t.verify("true", &true)
        }

        fn fails(&mut self, t: &mut Context<'_>) -> CaseResult {
            t.verify("false", &false)?;
            self.calls.push("unreachable".into());
            Ok(())
        }

        fn setup(&mut self, info: &crate::registry::CaseInfo) {
            self.calls.push(format!("setup {}", info.id));
        }

        fn teardown(&mut self, info: &crate::registry::CaseInfo) {
            self.calls.push(format!("teardown {}", info.id));
        }
    }

    fn counter_tester() -> Tester<Counter> {
        let mut tester = Tester::new(Counter::default());
        tester.register_test("engine.rs", "Counter");
        tester.add_tests_with_hooks(
            [
                ("passes", Counter::passes as TestCaseFn<Counter>),
                ("fails", Counter::fails as TestCaseFn<Counter>),
            ],
            Counter::setup,
            Counter::teardown,
        );
        tester
    }

    #[test]
    fn teardown_runs_after_failures() {
        let mut tester = counter_tester();
        let buffer = SharedBuffer::default();
        let code = tester.exec_with(["counter"], buffer.clone(), buffer.clone());

        assert_eq!(code, 1);
        assert_eq!(
            tester.fixture().calls,
            ["setup 1", "passes 1", "teardown 1", "setup 2", "teardown 2"]
        );
    }

    #[test]
    fn summary_counts_checks_and_errors() {
        let mut tester = counter_tester();
        let mut reporter = Reporter::new(
            Box::new(termcolor::NoColor::new(std::io::sink())),
            Box::new(termcolor::NoColor::new(std::io::sink())),
        );
        let options = Options::parse(["counter"], &TesterConfiguration::default()).unwrap();
        let (status, summary) = tester.run(&options, &mut reporter).unwrap();

        assert_eq!(status, Status::Failed);
        assert_eq!(
            summary,
            RunSummary {
                registered: 2,
                selected: 2,
                errors: 1,
                checks: 2,
                empty_cases: 0,
                skipped: 0,
            }
        );
    }

    #[test]
    fn empty_args_fall_back_to_the_test_name() {
        let mut tester = counter_tester();
        let buffer = SharedBuffer::default();
        let code = tester.exec_with(Vec::<String>::new(), buffer.clone(), buffer.clone());
        assert_eq!(code, 1);
        assert!(buffer.contents().starts_with("Starting Counter with 2 test cases...\n"));
    }

    #[test]
    fn default_name_is_the_fixture_type() {
        assert_eq!(default_test_name::<Counter>(), "Counter");
        assert_eq!(default_test_name::<Vec<u8>>(), "Vec");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Status::Passed.code(), 0);
        assert_eq!(Status::Failed.code(), 1);
        assert_eq!(Status::NoTests.code(), 2);
        assert_eq!(Status::Usage.code(), 1);
    }
}
