//! The ordered list of test cases a [`Tester`](crate::Tester) runs.

use crate::context::{CaseResult, Context};

/// Entry point of a test case: a method of the suite fixture.
pub type TestCaseFn<F> = fn(&mut F, &mut Context<'_>) -> CaseResult;

/// Setup or teardown hook shared by a group of cases.
pub type HookFn<F> = fn(&mut F, &CaseInfo);

/// Identity of a registered case, handed to setup/teardown hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseInfo {
    /// 1-based registration index.
    pub id: usize,
    pub name: &'static str,
}

/// A registered test case. Immutable once registered.
pub struct TestCase<F> {
    id: usize,
    name: &'static str,
    entry: TestCaseFn<F>,
    setup: Option<HookFn<F>>,
    teardown: Option<HookFn<F>>,
}

// Manual impls: the derives would needlessly require `F: Clone`.
impl<F> Clone for TestCase<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for TestCase<F> {}

impl<F> TestCase<F> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn info(&self) -> CaseInfo {
        CaseInfo {
            id: self.id,
            name: self.name,
        }
    }

    pub(crate) fn entry(&self) -> TestCaseFn<F> {
        self.entry
    }

    pub(crate) fn setup(&self) -> Option<HookFn<F>> {
        self.setup
    }

    pub(crate) fn teardown(&self) -> Option<HookFn<F>> {
        self.teardown
    }
}

/// Test cases in declaration order.
pub struct Registry<F> {
    cases: Vec<TestCase<F>>,
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Registry { cases: Vec::new() }
    }
}

impl<F> Registry<F> {
    /// Appends cases without setup/teardown hooks.
    pub fn add<I>(&mut self, cases: I)
    where
        I: IntoIterator<Item = (&'static str, TestCaseFn<F>)>,
    {
        self.push_group(cases, None, None);
    }

    /// Appends cases that share a setup and a teardown hook.
    pub fn add_with_hooks<I>(&mut self, cases: I, setup: HookFn<F>, teardown: HookFn<F>)
    where
        I: IntoIterator<Item = (&'static str, TestCaseFn<F>)>,
    {
        self.push_group(cases, Some(setup), Some(teardown));
    }

    fn push_group<I>(&mut self, cases: I, setup: Option<HookFn<F>>, teardown: Option<HookFn<F>>)
    where
        I: IntoIterator<Item = (&'static str, TestCaseFn<F>)>,
    {
        for (name, entry) in cases {
            let id = self.cases.len() + 1;
            self.cases.push(TestCase {
                id,
                name,
                entry,
                setup,
                teardown,
            });
        }
    }

    pub fn cases(&self) -> &[TestCase<F>] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Display name of a case from the path it was registered with:
/// `Suite::true_expression` becomes `true_expression`.
pub fn case_name(path: &'static str) -> &'static str {
    path.rsplit("::").next().map_or(path, str::trim)
}
