//! A suite exercising every verdict, shared by the integration tests.

#![allow(dead_code)]

use std::fmt;

use testsuite::compare::{Comparator, Operand};
use testsuite::{
    add_tests, compare, compare_as, compare_with, expect_fail, expect_fail_if, skip, verify,
    CaseInfo, CaseResult, Context, SharedBuffer, Tester,
};

/// Strings match when their lengths differ by at most `epsilon`.
#[derive(Default)]
pub struct StringLength {
    epsilon: usize,
}

impl StringLength {
    pub fn new(epsilon: usize) -> Self {
        StringLength { epsilon }
    }
}

impl<A, E> Comparator<A, E> for StringLength
where
    A: AsRef<str> + ?Sized,
    E: AsRef<str> + ?Sized,
{
    fn compare(&mut self, actual: &A, expected: &E) -> bool {
        actual.as_ref().len().abs_diff(expected.as_ref().len()) <= self.epsilon
    }

    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, A>,
        expected: Operand<'_, E>,
    ) -> fmt::Result {
        write!(
            out,
            "Length of actual {} doesn't match length of expected {} with epsilon {}",
            actual.expression, expected.expression, self.epsilon
        )
    }
}

pub struct Sample {
    pub out: SharedBuffer,
}

impl Sample {
    fn no_checks(&mut self, _t: &mut Context<'_>) -> CaseResult {
        Ok(())
    }

    fn true_expression(&mut self, t: &mut Context<'_>) -> CaseResult {
        verify!(t, true);
        Ok(())
    }

    fn false_expression(&mut self, t: &mut Context<'_>) -> CaseResult {
        verify!(t, 5 != 5); // line 63
        Ok(())
    }

    fn equal(&mut self, t: &mut Context<'_>) -> CaseResult {
        compare!(t, 3, 3);
        Ok(())
    }

    fn non_equal(&mut self, t: &mut Context<'_>) -> CaseResult {
        let a = 5;
        let b = 3;
        compare!(t, a, b); // line 75
        Ok(())
    }

    fn expect_fail(&mut self, t: &mut Context<'_>) -> CaseResult {
        {
            expect_fail!(t, "The world is not mad yet.");
            compare!(t, 2 + 2, 5); // line 82
            verify!(t, false == true); // line 83
        }

        verify!(t, true);

        {
            expect_fail_if!(t, 6 * 7 == 49, "This is not our universe");
            verify!(t, true);
        }
        Ok(())
    }

    fn unexpected_pass_expression(&mut self, t: &mut Context<'_>) -> CaseResult {
        expect_fail!(t, "Not yet implemented.");
        verify!(t, true == true); // line 97
        Ok(())
    }

    fn unexpected_pass_equal(&mut self, t: &mut Context<'_>) -> CaseResult {
        expect_fail!(t, "Cannot get it right.");
        compare!(t, 2 + 2, 4); // line 103
        Ok(())
    }

    fn compare_as(&mut self, t: &mut Context<'_>) -> CaseResult {
        compare_as!(t, "kill!", "hello", StringLength);
        Ok(())
    }

    fn compare_as_fail(&mut self, t: &mut Context<'_>) -> CaseResult {
        compare_as!(t, "meh", "hello", StringLength); // line 113
        Ok(())
    }

    fn compare_with(&mut self, t: &mut Context<'_>) -> CaseResult {
        compare_with!(t, "You rather GTFO", "hello", StringLength::new(10));
        Ok(())
    }

    fn compare_with_fail(&mut self, t: &mut Context<'_>) -> CaseResult {
        compare_with!(t, "You rather GTFO", "hello", StringLength::new(9)); // line 123
        Ok(())
    }

    fn compare_mixed_types_fail(&mut self, t: &mut Context<'_>) -> CaseResult {
        let hello = String::from("hello");
        compare!(t, "holla", hello); // line 129
        Ok(())
    }

    fn skip(&mut self, t: &mut Context<'_>) -> CaseResult {
        skip!(t, "This testcase is skipped.");
    }

    fn setup_teardown(&mut self, t: &mut Context<'_>) -> CaseResult {
        verify!(t, true);
        Ok(())
    }

    fn setup_teardown_empty(&mut self, _t: &mut Context<'_>) -> CaseResult {
        Ok(())
    }

    fn setup_teardown_error(&mut self, t: &mut Context<'_>) -> CaseResult {
        verify!(t, false); // line 147
        Ok(())
    }

    fn setup_teardown_skip(&mut self, t: &mut Context<'_>) -> CaseResult {
        skip!(t, "Skipped.");
    }

    fn setup(&mut self, info: &CaseInfo) {
        self.out.line(&format!("       [{:02}] setting up...", info.id));
    }

    fn teardown(&mut self, info: &CaseInfo) {
        self.out.line(&format!("       [{:02}] tearing down...", info.id));
    }
}

/// The sample suite, writing its hook output into `out`.
pub fn sample_tester(out: &SharedBuffer) -> Tester<Sample> {
    let mut tester = Tester::new(Sample { out: out.clone() });
    tester.register_test("here.rs", "TesterTest::Test");
    add_tests!(
        tester,
        [
            Sample::no_checks,
            Sample::true_expression,
            Sample::false_expression,
            Sample::equal,
            Sample::non_equal,
            Sample::expect_fail,
            Sample::unexpected_pass_expression,
            Sample::unexpected_pass_equal,
            Sample::compare_as,
            Sample::compare_as_fail,
            Sample::compare_with,
            Sample::compare_with_fail,
            Sample::compare_mixed_types_fail,
            Sample::skip,
        ]
    );
    add_tests!(
        tester,
        [
            Sample::setup_teardown,
            Sample::setup_teardown_empty,
            Sample::setup_teardown_error,
            Sample::setup_teardown_skip,
        ],
        setup = Sample::setup,
        teardown = Sample::teardown,
    );
    tester
}

/// Runs `tester` with `args` after the program name, returning the exit code
/// and everything written to both streams.
pub fn run<F>(tester: &mut Tester<F>, args: &[&str]) -> (i32, String) {
    let out = SharedBuffer::default();
    let argv = std::iter::once("tester").chain(args.iter().copied());
    let code = tester.exec_with(argv, out.clone(), out.clone());
    (code, out.contents())
}
