//! Comparators used by `compare!`, `compare_as!` and `compare_with!`.
//!
//! A comparator decides whether an actual value matches an expected one and,
//! when it does not and nobody expected that, explains why. The comparator is
//! always chosen statically at the call site: `compare!` uses [`Equal`],
//! `compare_as!` names a comparator type, `compare_with!` passes an instance
//! carrying its own parameters (e.g. a tolerance).
//!
//! ```
//! use std::fmt;
//! use testsuite::compare::{Comparator, Operand};
//!
//! /// Strings match when their lengths differ by at most `epsilon`.
//! #[derive(Default)]
//! struct StringLength {
//!     epsilon: usize,
//! }
//!
//! impl Comparator<str, str> for StringLength {
//!     fn compare(&mut self, actual: &str, expected: &str) -> bool {
//!         actual.len().abs_diff(expected.len()) <= self.epsilon
//!     }
//!
//!     fn describe_failure(
//!         &self,
//!         out: &mut dyn fmt::Write,
//!         actual: Operand<'_, str>,
//!         expected: Operand<'_, str>,
//!     ) -> fmt::Result {
//!         write!(
//!             out,
//!             "Length of actual {} doesn't match length of expected {} with epsilon {}",
//!             actual.expression, expected.expression, self.epsilon
//!         )
//!     }
//! }
//! ```

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use difference::{Changeset, Difference};

// ============================================================================
// PROTOCOL
// ============================================================================

/// One side of a comparison: the source text of the expression and its value.
pub struct Operand<'a, T: ?Sized> {
    pub expression: &'a str,
    pub value: &'a T,
}

impl<T: ?Sized> Clone for Operand<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Operand<'_, T> {}

/// An equality policy between an actual and an expected value.
pub trait Comparator<A: ?Sized, E: ?Sized = A> {
    /// Returns `true` when the values are considered equal under this policy.
    fn compare(&mut self, actual: &A, expected: &E) -> bool;

    /// Writes a human-readable explanation of why the values differ.
    ///
    /// Only called after [`Comparator::compare`] returned `false` for the same
    /// operands and no expected failure was active.
    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, A>,
        expected: Operand<'_, E>,
    ) -> fmt::Result;
}

// ============================================================================
// EXACT EQUALITY
// ============================================================================

/// Plain `==`. The default comparator of `compare!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Equal;

impl<A, E> Comparator<A, E> for Equal
where
    A: PartialEq<E> + Debug + ?Sized,
    E: Debug + ?Sized,
{
    fn compare(&mut self, actual: &A, expected: &E) -> bool {
        actual == expected
    }

    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, A>,
        expected: Operand<'_, E>,
    ) -> fmt::Result {
        write_not_the_same(out, actual.expression, expected.expression, actual.value, expected.value)
    }
}

/// Converts both operands into `T` before comparing them with `==`.
///
/// `compare_as!(t, 3_i32, 3_i64, As<i64>)` compares two `i64`s.
pub struct As<T>(PhantomData<fn() -> T>);

impl<T> Default for As<T> {
    fn default() -> Self {
        As(PhantomData)
    }
}

impl<A, E, T> Comparator<A, E> for As<T>
where
    A: Clone + Into<T>,
    E: Clone + Into<T>,
    T: PartialEq + Debug,
{
    fn compare(&mut self, actual: &A, expected: &E) -> bool {
        actual.clone().into() == expected.clone().into()
    }

    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, A>,
        expected: Operand<'_, E>,
    ) -> fmt::Result {
        let converted_actual: T = actual.value.clone().into();
        let converted_expected: T = expected.value.clone().into();
        write_not_the_same(
            out,
            actual.expression,
            expected.expression,
            &converted_actual,
            &converted_expected,
        )
    }
}

fn write_not_the_same<A: Debug + ?Sized, E: Debug + ?Sized>(
    out: &mut dyn fmt::Write,
    actual_expression: &str,
    expected_expression: &str,
    actual: &A,
    expected: &E,
) -> fmt::Result {
    writeln!(
        out,
        "Values {actual_expression} and {expected_expression} are not the same, actual is"
    )?;
    writeln!(out, "{actual:?}")?;
    writeln!(out, "but expected")?;
    write!(out, "{expected:?}")
}

// ============================================================================
// FLOATING POINT
// ============================================================================

/// Floating-point types with a comparison epsilon.
pub trait FuzzyFloat: Copy + Debug + PartialEq {
    const EPSILON: Self;

    fn fuzzy_eq(self, other: Self) -> bool;

    fn delta(self, other: Self) -> Self;
}

macro_rules! impl_fuzzy_float {
    ($ty:ty, $epsilon:expr) => {
        impl FuzzyFloat for $ty {
            const EPSILON: Self = $epsilon;

            fn fuzzy_eq(self, other: Self) -> bool {
                if self == other {
                    return true;
                }
                // NaN compares equal only to NaN
                if self.is_nan() || other.is_nan() {
                    return self.is_nan() && other.is_nan();
                }
                let difference = (self - other).abs();
                if self == 0.0 || other == 0.0 || difference < Self::EPSILON {
                    return difference < Self::EPSILON;
                }
                difference / (self.abs() + other.abs()) < Self::EPSILON
            }

            fn delta(self, other: Self) -> Self {
                self - other
            }
        }
    };
}

impl_fuzzy_float!(f32, 1.0e-5);
impl_fuzzy_float!(f64, 1.0e-14);

/// Relative floating-point comparison with a per-type epsilon.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fuzzy;

impl<T: FuzzyFloat> Comparator<T, T> for Fuzzy {
    fn compare(&mut self, actual: &T, expected: &T) -> bool {
        actual.fuzzy_eq(*expected)
    }

    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, T>,
        expected: Operand<'_, T>,
    ) -> fmt::Result {
        write!(
            out,
            "Floating-point values {} and {} are not the same, actual {:?} but {:?} expected (delta {:?}).",
            actual.expression,
            expected.expression,
            actual.value,
            expected.value,
            actual.value.delta(*expected.value),
        )
    }
}

// ============================================================================
// CONTAINERS
// ============================================================================

/// Element-wise comparison of anything that views as a slice of `T`.
pub struct Container<T>(PhantomData<fn() -> T>);

impl<T> Default for Container<T> {
    fn default() -> Self {
        Container(PhantomData)
    }
}

impl<T, A, E> Comparator<A, E> for Container<T>
where
    T: PartialEq + Debug,
    A: AsRef<[T]> + ?Sized,
    E: AsRef<[T]> + ?Sized,
{
    fn compare(&mut self, actual: &A, expected: &E) -> bool {
        actual.as_ref() == expected.as_ref()
    }

    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, A>,
        expected: Operand<'_, E>,
    ) -> fmt::Result {
        let (left, right) = (actual.value.as_ref(), expected.value.as_ref());
        if left.len() != right.len() {
            return write!(
                out,
                "Containers {} and {} have different size, actual {} but {} expected.",
                actual.expression,
                expected.expression,
                left.len(),
                right.len()
            );
        }
        match left.iter().zip(right).position(|(a, e)| a != e) {
            Some(position) => write!(
                out,
                "Containers {} and {} have different contents, actual {:?} but {:?} expected on position {}.",
                actual.expression, expected.expression, left[position], right[position], position
            ),
            None => write!(
                out,
                "Containers {} and {} have different contents.",
                actual.expression, expected.expression
            ),
        }
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Line-by-line comparison of two texts, explained with a line diff.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lines;

impl<A, E> Comparator<A, E> for Lines
where
    A: AsRef<str> + ?Sized,
    E: AsRef<str> + ?Sized,
{
    fn compare(&mut self, actual: &A, expected: &E) -> bool {
        actual.as_ref() == expected.as_ref()
    }

    fn describe_failure(
        &self,
        out: &mut dyn fmt::Write,
        actual: Operand<'_, A>,
        expected: Operand<'_, E>,
    ) -> fmt::Result {
        write!(
            out,
            "Texts {} and {} are different:",
            actual.expression, expected.expression
        )?;
        let changeset = Changeset::new(expected.value.as_ref(), actual.value.as_ref(), "\n");
        for diff in &changeset.diffs {
            let (marker, text) = match diff {
                Difference::Same(text) => (' ', text),
                Difference::Rem(text) => ('-', text),
                Difference::Add(text) => ('+', text),
            };
            for line in text.split('\n') {
                write!(out, "\n{marker}{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe<A: ?Sized, E: ?Sized>(
        comparator: &impl Comparator<A, E>,
        actual: (&str, &A),
        expected: (&str, &E),
    ) -> String {
        let mut out = String::new();
        comparator
            .describe_failure(
                &mut out,
                Operand { expression: actual.0, value: actual.1 },
                Operand { expression: expected.0, value: expected.1 },
            )
            .unwrap();
        out
    }

    #[test]
    fn equal_reports_both_values_on_separate_lines() {
        assert!(!Equal.compare(&5, &3));
        assert_eq!(
            describe(&Equal, ("a", &5), ("b", &3)),
            "Values a and b are not the same, actual is\n5\nbut expected\n3"
        );
    }

    #[test]
    fn equal_accepts_mixed_operand_types() {
        let hello = String::from("hello");
        assert!(Equal.compare(&hello, &"hello"));
        assert!(!Equal.compare(&hello, &"holla"));
    }

    #[test]
    fn as_converts_before_comparing() {
        let mut as_wide = As::<i64>::default();
        assert!(as_wide.compare(&3_i32, &3_i64));
        assert!(!as_wide.compare(&3_u8, &4_i64));
        assert_eq!(
            describe(&As::<f64>::default(), ("x", &1.5_f32), ("y", &2_i32)),
            "Values x and y are not the same, actual is\n1.5\nbut expected\n2.0"
        );
    }

    #[test]
    fn fuzzy_tolerates_rounding_but_not_real_differences() {
        assert!(Fuzzy.compare(&(0.1_f64 + 0.2), &0.3));
        assert!(Fuzzy.compare(&1.0_f32, &1.000_001));
        assert!(!Fuzzy.compare(&1.0_f32, &1.001));
        assert!(Fuzzy.compare(&0.0_f64, &1.0e-15));
        assert!(Fuzzy.compare(&f64::NAN, &f64::NAN));
        assert!(!Fuzzy.compare(&f64::NAN, &1.0));
    }

    #[test]
    fn container_points_at_first_difference() {
        let mut container = Container::<i32>::default();
        assert!(container.compare(&vec![1, 2, 3], &[1, 2, 3]));
        assert_eq!(
            describe(&container, ("a", &vec![1, 2, 3]), ("b", &vec![1, 5, 3])),
            "Containers a and b have different contents, actual 2 but 5 expected on position 1."
        );
        assert_eq!(
            describe(&container, ("a", &vec![1]), ("b", &vec![1, 2])),
            "Containers a and b have different size, actual 1 but 2 expected."
        );
    }

    #[test]
    fn lines_prints_a_line_diff() {
        let text = describe(&Lines, ("out", "one\ntwo\nthree"), ("expected", "one\n2\nthree"));
        assert_eq!(text, "Texts out and expected are different:\n one\n-2\n+two\n three");
    }
}
