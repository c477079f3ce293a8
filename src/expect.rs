//! Expected-failure scopes.
//!
//! While an [`ExpectedFailure`] guard is alive and active, a failing check is
//! logged as `XFAIL` and the case goes on, whereas a passing check is an
//! unexpected pass (`XPASS`) that fails the case. The guard is created by
//! `expect_fail!`/`expect_fail_if!` and lives until the end of the enclosing
//! block, including early exits through `?`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// What checks of the current case are expected to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Expectation {
    #[default]
    Normal,
    Failure { message: String },
}

/// The per-case expectation slot shared between a context and its guards.
pub(crate) type ExpectationSlot = Rc<RefCell<Expectation>>;

/// Scope guard returned by `Context::expect_fail` and `Context::expect_fail_if`.
///
/// Dropping it restores whatever expectation was in place when it was created.
#[must_use = "the expected failure ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ExpectedFailure {
    slot: ExpectationSlot,
    message: String,
    active: bool,
    previous: Option<Expectation>,
}

impl ExpectedFailure {
    pub(crate) fn enter(slot: &ExpectationSlot, message: String, active: bool) -> Self {
        let next = if active {
            Expectation::Failure {
                message: message.clone(),
            }
        } else {
            Expectation::Normal
        };
        let previous = slot.replace(next);
        if previous != Expectation::Normal {
            trace!(message = %message, "expected failure shadows an enclosing one");
        }
        ExpectedFailure {
            slot: Rc::clone(slot),
            message,
            active,
            previous: Some(previous),
        }
    }

    /// The message printed with every `XFAIL` inside this scope.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `false` when the guard's condition did not hold and checks behave normally.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for ExpectedFailure {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.slot.borrow_mut() = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(message: &str) -> Expectation {
        Expectation::Failure {
            message: message.to_string(),
        }
    }

    #[test]
    fn guard_pops_on_drop() {
        let slot = ExpectationSlot::default();
        {
            let guard = ExpectedFailure::enter(&slot, "not yet".into(), true);
            assert!(guard.is_active());
            assert_eq!(*slot.borrow(), failure("not yet"));
        }
        assert_eq!(*slot.borrow(), Expectation::Normal);
    }

    #[test]
    fn inactive_guard_behaves_normally() {
        let slot = ExpectationSlot::default();
        let guard = ExpectedFailure::enter(&slot, "only on big endian".into(), false);
        assert!(!guard.is_active());
        assert_eq!(guard.message(), "only on big endian");
        assert_eq!(*slot.borrow(), Expectation::Normal);
    }

    #[test]
    fn nested_guards_restore_in_reverse_order() {
        let slot = ExpectationSlot::default();
        let outer = ExpectedFailure::enter(&slot, "outer".into(), true);
        {
            let _inner = ExpectedFailure::enter(&slot, "inner".into(), true);
            assert_eq!(*slot.borrow(), failure("inner"));
        }
        assert_eq!(*slot.borrow(), failure("outer"));
        drop(outer);
        assert_eq!(*slot.borrow(), Expectation::Normal);
    }

    #[test]
    fn guard_pops_when_scope_exits_early() {
        fn body(slot: &ExpectationSlot) -> Result<(), ()> {
            let _guard = ExpectedFailure::enter(slot, "bail".into(), true);
            Err::<(), ()>(())?;
            Ok(())
        }

        let slot = ExpectationSlot::default();
        assert!(body(&slot).is_err());
        assert_eq!(*slot.borrow(), Expectation::Normal);
    }
}
