//! A sequential unit-testing core.
//!
//! A suite is a fixture type whose methods are test cases. The [`Tester`]
//! numbers the cases in registration order, runs them one after another and
//! prints one aligned line per noteworthy verdict:
//!
//! ```text
//! Starting MathTest with 3 test cases...
//!   FAIL [2] division() at tests/math.rs on line 31
//!         Values 7 / 2 and 4 are not the same, actual is
//!         3
//!         but expected
//!         4
//!   SKIP [3] simd()
//!         No SIMD on this target.
//! Finished MathTest with 1 errors out of 5 checks.
//! ```
//!
//! ```no_run
//! use testsuite::{add_tests, compare, skip, verify, CaseResult, Context, Tester};
//!
//! #[derive(Default)]
//! struct MathTest;
//!
//! impl MathTest {
//!     fn addition(&mut self, t: &mut Context<'_>) -> CaseResult {
//!         compare!(t, 2 + 2, 4);
//!         verify!(t, 1 < 2);
//!         Ok(())
//!     }
//!
//!     fn simd(&mut self, t: &mut Context<'_>) -> CaseResult {
//!         skip!(t, "No SIMD on this target.");
//!     }
//! }
//!
//! let mut tester = Tester::new(MathTest);
//! add_tests!(tester, [MathTest::addition, MathTest::simd]);
//! std::process::exit(tester.exec_with(std::env::args(), std::io::stdout(), std::io::stderr()));
//! ```

pub mod cli;
pub mod compare;
pub mod context;
pub mod engine;
pub mod errors;
pub mod expect;
pub mod logging;
pub mod output;
pub mod registry;
pub mod report;
pub mod truth;

mod macros;

pub use crate::cli::{CaseFilter, ColorMode, Options};
pub use crate::compare::{Comparator, Operand};
pub use crate::context::{Abort, CaseResult, Context, Outcome, TestRun};
pub use crate::engine::{Status, TestSuite, Tester, TesterConfiguration};
pub use crate::errors::TesterError;
pub use crate::expect::ExpectedFailure;
pub use crate::logging::init_tracing;
pub use crate::output::{SharedBuffer, Streams};
pub use crate::registry::{CaseInfo, HookFn, TestCaseFn};
pub use crate::report::{RunSummary, SourceLocation, Verdict};
pub use crate::truth::Truth;
