//! A small suite showing every kind of report line.
//!
//! ```text
//! cargo run --bin testsuite_demo -- --color off
//! cargo run --bin testsuite_demo -- --only "1 2 8"
//! RUST_LOG=testsuite=debug cargo run --bin testsuite_demo
//! ```
//!
//! Arguments starting with `--demo-` are accepted and ignored.

use testsuite::compare::{As, Container, Fuzzy, Lines};
use testsuite::{
    add_tests, compare, compare_as, expect_fail, expect_fail_if, skip, tester_main, verify,
    CaseInfo, CaseResult, Context, TestSuite, Tester, TesterConfiguration,
};
use tracing::debug;

#[derive(Default)]
struct DemoTest {
    stack: Vec<i32>,
}

impl DemoTest {
    fn true_expression(&mut self, t: &mut Context<'_>) -> CaseResult {
        verify!(t, 2 + 2 == 4);
        Ok(())
    }

    fn equal(&mut self, t: &mut Context<'_>) -> CaseResult {
        let answer = 6 * 7;
        compare!(t, answer, 42);
        compare!(t, "forty-two", String::from("forty-two"));
        Ok(())
    }

    fn converted(&mut self, t: &mut Context<'_>) -> CaseResult {
        let small: u8 = 200;
        compare_as!(t, small, 200_i64, As<i64>);
        compare_as!(t, 0.1_f64 + 0.2, 0.3, Fuzzy);
        compare_as!(t, vec![1, 2, 3], [1, 2, 3], Container<i32>);
        Ok(())
    }

    fn expected_failures(&mut self, t: &mut Context<'_>) -> CaseResult {
        {
            expect_fail!(t, "Rounding is not implemented yet.");
            compare!(t, 7 / 2, 4);
        }
        {
            expect_fail_if!(t, usize::BITS < 64, "Needs a 64-bit target.");
            compare!(t, usize::MAX as u128, u64::MAX as u128);
        }
        Ok(())
    }

    fn failing_text(&mut self, t: &mut Context<'_>) -> CaseResult {
        let rendered = "Starting\nFinished\n";
        compare_as!(t, rendered, "Starting\nRunning\nFinished\n", Lines);
        Ok(())
    }

    fn unsupported(&mut self, t: &mut Context<'_>) -> CaseResult {
        if std::env::var_os("DEMO_GPU").is_none() {
            skip!(t, "No GPU available, set DEMO_GPU to run this.");
        }
        verify!(t, false);
        Ok(())
    }

    fn forgotten(&mut self, _t: &mut Context<'_>) -> CaseResult {
        Ok(())
    }

    fn push(&mut self, t: &mut Context<'_>) -> CaseResult {
        self.stack.push(1);
        compare!(t, self.stack.len(), 1);
        Ok(())
    }

    fn pop_empty(&mut self, t: &mut Context<'_>) -> CaseResult {
        verify!(t, self.stack.pop().is_none());
        Ok(())
    }

    fn reset(&mut self, info: &CaseInfo) {
        debug!(id = info.id, case = info.name, "resetting stack");
        self.stack.clear();
    }

    fn check_empty(&mut self, info: &CaseInfo) {
        debug!(id = info.id, left = self.stack.len(), "stack after case");
    }
}

impl TestSuite for DemoTest {
    fn register(tester: &mut Tester<Self>) {
        add_tests!(
            tester,
            [
                DemoTest::true_expression,
                DemoTest::equal,
                DemoTest::converted,
                DemoTest::expected_failures,
                DemoTest::failing_text,
                DemoTest::unsupported,
                DemoTest::forgotten,
            ]
        );
        add_tests!(
            tester,
            [DemoTest::push, DemoTest::pop_empty],
            setup = DemoTest::reset,
            teardown = DemoTest::check_empty,
        );
    }
}

tester_main!(
    DemoTest,
    TesterConfiguration::new().set_skipped_argument_prefixes(["demo"])
);
