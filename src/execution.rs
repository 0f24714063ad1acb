use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use crate::case::{TestCase, TestCaseKind, TestMethod};
use crate::diagnostics::panic_message;
use crate::value::Value;
use crate::{err_ctx, TheoryError};

/// The execution engine that actually calls a test method.
pub trait TestInvoker {
    fn invoke(&self, method: &TestMethod, arguments: &[Value]) -> Result<(), TheoryError>;
}

impl<F> TestInvoker for F
where
    F: Fn(&TestMethod, &[Value]) -> Result<(), TheoryError>,
{
    fn invoke(&self, method: &TestMethod, arguments: &[Value]) -> Result<(), TheoryError> {
        self(method, arguments)
    }
}

/// Outcome of running one test case
#[derive(Debug)]
pub enum TestResult {
    Passed,
    Failed(TheoryError),
    Skipped(String),
}

impl TestResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestResult::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestResult::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TestResult::Skipped(_))
    }

    pub fn error(&self) -> Option<&TheoryError> {
        match self {
            TestResult::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl TestCase {
    /// Runs this case.
    ///
    /// Skipped cases never reach the invoker. Deferred failures run their action instead of the
    /// method. A panicking invoker or action is reported as a failure.
    pub fn run(&self, invoker: &dyn TestInvoker) -> TestResult {
        if let Some(reason) = self.skip_reason() {
            debug!(case = %self.display_name(), reason, "skipping test case");
            return TestResult::Skipped(reason.to_string());
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| match self.kind() {
            TestCaseKind::Standard { arguments } => invoker.invoke(
                self.test_method(),
                arguments.as_deref().unwrap_or_default(),
            ),
            TestCaseKind::DeferredFailure { action } => action(),
        }));

        match outcome {
            Ok(Ok(())) => TestResult::Passed,
            Ok(Err(e)) => TestResult::Failed(e),
            Err(payload) => TestResult::Failed(err_ctx!(
                Invocation,
                format!("panicked: {}", panic_message(payload.as_ref())),
                self.test_method().identity()
            )),
        }
    }
}

/// Test result summary for reporting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TestSummary {
    pub fn record(&mut self, result: &TestResult) {
        match result {
            TestResult::Passed => self.passed += 1,
            TestResult::Failed(_) => self.failed += 1,
            TestResult::Skipped(_) => self.skipped += 1,
        }
    }

    /// Runs every case and tallies the outcomes.
    pub fn run_all<'a>(cases: impl IntoIterator<Item = &'a TestCase>, invoker: &dyn TestInvoker) -> Self {
        let mut summary = Self::default();
        for case in cases {
            summary.record(&case.run(invoker));
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn total_tests(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Percentage of executed (non-skipped) cases that passed.
    pub fn success_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            return 0.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }
}
