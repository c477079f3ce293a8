//! Explicit boolean coercion for `verify!` and `expect_fail_if!`.
//!
//! A type takes part in a truthiness check only by implementing [`Truth`];
//! there are no implicit conversions.

use std::rc::Rc;
use std::sync::Arc;

/// A value that can be asked whether it holds.
pub trait Truth {
    fn truth(&self) -> bool;
}

impl Truth for bool {
    fn truth(&self) -> bool {
        *self
    }
}

/// `Some(_)` holds.
impl<T> Truth for Option<T> {
    fn truth(&self) -> bool {
        self.is_some()
    }
}

/// `Ok(_)` holds.
impl<T, E> Truth for Result<T, E> {
    fn truth(&self) -> bool {
        self.is_ok()
    }
}

impl<T: Truth + ?Sized> Truth for &T {
    fn truth(&self) -> bool {
        (**self).truth()
    }
}

impl<T: Truth + ?Sized> Truth for &mut T {
    fn truth(&self) -> bool {
        (**self).truth()
    }
}

impl<T: Truth + ?Sized> Truth for Box<T> {
    fn truth(&self) -> bool {
        (**self).truth()
    }
}

impl<T: Truth + ?Sized> Truth for Rc<T> {
    fn truth(&self) -> bool {
        (**self).truth()
    }
}

impl<T: Truth + ?Sized> Truth for Arc<T> {
    fn truth(&self) -> bool {
        (**self).truth()
    }
}
