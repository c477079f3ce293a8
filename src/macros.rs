//! Check and registration macros.
//!
//! The check macros capture the source text of their operands and expand to a
//! method call on the case's [`Context`](crate::Context) followed by `?`, so a
//! failing check ends the case body on the spot.

/// Verifies that an expression holds (see [`Truth`](crate::Truth)).
///
/// ```ignore
/// verify!(t, !name.is_empty());
/// ```
#[macro_export]
macro_rules! verify {
    ($t:expr, $expression:expr $(,)?) => {
        $t.verify(::core::stringify!($expression), &($expression))?
    };
}

/// Compares two values with `==`.
#[macro_export]
macro_rules! compare {
    ($t:expr, $actual:expr, $expected:expr $(,)?) => {
        $t.compare(
            ::core::stringify!($actual),
            &($actual),
            ::core::stringify!($expected),
            &($expected),
        )?
    };
}

/// Compares two values with a default-constructed comparator type.
///
/// ```ignore
/// compare_as!(t, 0.1 + 0.2, 0.3, Fuzzy);
/// compare_as!(t, small, 3_i64, As<i64>);
/// ```
#[macro_export]
macro_rules! compare_as {
    ($t:expr, $actual:expr, $expected:expr, $comparator:ty $(,)?) => {
        $t.compare_with(
            <$comparator as ::core::default::Default>::default(),
            ::core::stringify!($actual),
            &($actual),
            ::core::stringify!($expected),
            &($expected),
        )?
    };
}

/// Compares two values with a comparator instance.
#[macro_export]
macro_rules! compare_with {
    ($t:expr, $actual:expr, $expected:expr, $comparator:expr $(,)?) => {
        $t.compare_with(
            $comparator,
            ::core::stringify!($actual),
            &($actual),
            ::core::stringify!($expected),
            &($expected),
        )?
    };
}

/// Skips the rest of the case with a message.
#[macro_export]
macro_rules! skip {
    ($t:expr, $message:expr $(,)?) => {
        return ::core::result::Result::Err($t.skip($message))
    };
}

/// Expects all following checks up to the end of the enclosing block to fail.
///
/// ```ignore
/// {
///     expect_fail!(t, "Not implemented.");
///     verify!(t, is_future_clear());
/// }
/// ```
#[macro_export]
macro_rules! expect_fail {
    ($t:expr, $message:expr $(,)?) => {
        let _expected_failure = $t.expect_fail($message);
    };
}

/// Like `expect_fail!`, but only when `condition` holds.
#[macro_export]
macro_rules! expect_fail_if {
    ($t:expr, $condition:expr, $message:expr $(,)?) => {
        let _expected_failure = $t.expect_fail_if(&($condition), $message);
    };
}

/// Registers fixture methods as test cases, named after the method.
///
/// ```ignore
/// add_tests!(tester, [Suite::first, Suite::second]);
/// add_tests!(tester, [Suite::third], setup = Suite::setup, teardown = Suite::teardown);
/// ```
#[macro_export]
macro_rules! add_tests {
    ($tester:expr, [$($case:path),* $(,)?] $(,)?) => {
        $tester.add_tests([$(
            (
                $crate::registry::case_name(::core::stringify!($case)),
                $case as $crate::TestCaseFn<_>,
            ),
        )*])
    };
    ($tester:expr, [$($case:path),* $(,)?], setup = $setup:path, teardown = $teardown:path $(,)?) => {
        $tester.add_tests_with_hooks(
            [$(
                (
                    $crate::registry::case_name(::core::stringify!($case)),
                    $case as $crate::TestCaseFn<_>,
                ),
            )*],
            $setup,
            $teardown,
        )
    };
}

/// Generates `main` for a [`TestSuite`](crate::TestSuite) fixture.
///
/// ```ignore
/// tester_main!(ParserTest);
/// tester_main!(RendererTest, TesterConfiguration::new().set_skipped_argument_prefixes(["gpu"]));
/// ```
#[macro_export]
macro_rules! tester_main {
    ($suite:ty $(,)?) => {
        $crate::tester_main!($suite, $crate::TesterConfiguration::default());
    };
    ($suite:ty, $configuration:expr $(,)?) => {
        fn main() -> ::std::process::ExitCode {
            let mut tester = $crate::Tester::<$suite>::for_suite_with_configuration(
                <$suite as ::core::default::Default>::default(),
                $configuration,
            );
            tester.register_test(::core::file!(), ::core::stringify!($suite));
            tester.exec()
        }
    };
}
