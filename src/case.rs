//! Test cases produced by discovery.
//!
//! A test case is either *standard* (the method, optionally bound to one data row) or a
//! *deferred failure* (a placeholder whose only behaviour is to fail with a fixed diagnostic).
//! All cases discovered for one method share a single [`TestMethod`].

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::metadata::{AssemblyInfo, MethodInfo, TheoryDirective, TypeInfo};
use crate::value::DataRow;
use crate::TheoryError;

/// The action run by a deferred-failure case. It is expected to return an error.
pub type FailureAction = Arc<dyn Fn() -> Result<(), TheoryError> + Send + Sync>;

/// Where a test method lives: assembly, declaring type and method.
#[derive(Debug, Clone, PartialEq)]
pub struct TestMethod {
    pub assembly: AssemblyInfo,
    pub class: TypeInfo,
    pub method: MethodInfo,
}

impl TestMethod {
    pub fn new(assembly: AssemblyInfo, class: TypeInfo, method: MethodInfo) -> Self {
        Self {
            assembly,
            class,
            method,
        }
    }

    /// `Type.Method`, as used in diagnostics.
    pub fn identity(&self) -> String {
        format!("{}.{}", self.class.name, self.method.name)
    }
}

/// What a test case does when run.
#[derive(Clone)]
#[non_exhaustive]
pub enum TestCaseKind {
    /// Invokes the method. `arguments` is `None` for a case carrying no data row.
    Standard { arguments: Option<DataRow> },
    /// Runs a fixed action that reports a discovery-time failure.
    DeferredFailure { action: FailureAction },
}

impl fmt::Debug for TestCaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestCaseKind::Standard { arguments } => f
                .debug_struct("Standard")
                .field("arguments", arguments)
                .finish(),
            TestCaseKind::DeferredFailure { .. } => {
                f.debug_struct("DeferredFailure").finish_non_exhaustive()
            }
        }
    }
}

/// A single, independently executable test case.
#[derive(Debug, Clone)]
pub struct TestCase {
    method: Arc<TestMethod>,
    directive: TheoryDirective,
    kind: TestCaseKind,
}

impl TestCase {
    /// A case that invokes `method` with `arguments`.
    pub fn bound(method: Arc<TestMethod>, directive: TheoryDirective, arguments: DataRow) -> Self {
        Self {
            method,
            directive,
            kind: TestCaseKind::Standard {
                arguments: Some(arguments),
            },
        }
    }

    /// A case with no data row. With a skip reason on `directive` it never runs.
    pub fn standard(method: Arc<TestMethod>, directive: TheoryDirective) -> Self {
        Self {
            method,
            directive,
            kind: TestCaseKind::Standard { arguments: None },
        }
    }

    /// A placeholder case whose execution runs `action`.
    pub fn deferred_failure<F>(method: Arc<TestMethod>, directive: TheoryDirective, action: F) -> Self
    where
        F: Fn() -> Result<(), TheoryError> + Send + Sync + 'static,
    {
        Self {
            method,
            directive,
            kind: TestCaseKind::DeferredFailure {
                action: Arc::new(action),
            },
        }
    }

    pub fn test_method(&self) -> &Arc<TestMethod> {
        &self.method
    }

    pub fn directive(&self) -> &TheoryDirective {
        &self.directive
    }

    pub fn kind(&self) -> &TestCaseKind {
        &self.kind
    }

    /// The data row bound to this case, if any.
    pub fn arguments(&self) -> Option<&[crate::value::Value]> {
        match &self.kind {
            TestCaseKind::Standard { arguments } => arguments.as_deref(),
            TestCaseKind::DeferredFailure { .. } => None,
        }
    }

    pub fn is_deferred_failure(&self) -> bool {
        matches!(self.kind, TestCaseKind::DeferredFailure { .. })
    }

    /// The skip reason, for standard cases whose directive carries one.
    pub fn skip_reason(&self) -> Option<&str> {
        match self.kind {
            TestCaseKind::Standard { .. } => self.directive.skip_reason(),
            TestCaseKind::DeferredFailure { .. } => None,
        }
    }

    /// `Type.Method(a: 1, b: "x")`, or the directive's display name in place of `Type.Method`.
    ///
    /// Arguments beyond the declared parameters are named `__argN`; parameters without an
    /// argument show `???`.
    pub fn display_name(&self) -> String {
        let base = self
            .directive
            .display_name
            .clone()
            .unwrap_or_else(|| self.method.identity());

        let Some(arguments) = self.arguments() else {
            return base;
        };

        let parameters = &self.method.method.parameters;
        let rendered: Vec<String> = (0..parameters.len().max(arguments.len()))
            .map(|i| {
                let name = parameters
                    .get(i)
                    .map_or_else(|| format!("__arg{}", i), |p| p.name.clone());
                let value = arguments
                    .get(i)
                    .map_or_else(|| "???".to_string(), ToString::to_string);
                format!("{}: {}", name, value)
            })
            .collect();

        format!("{}({})", base, rendered.join(", "))
    }

    /// Stable hex identifier derived from assembly, type, method, case kind and arguments.
    pub fn unique_id(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            &self.method.assembly.name,
            &self.method.class.name,
            &self.method.method.name,
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        match &self.kind {
            TestCaseKind::Standard { arguments } => {
                hasher.update(b"standard\0");
                if let Some(arguments) = arguments {
                    hasher.update(format!("{:?}", arguments).as_bytes());
                }
            }
            TestCaseKind::DeferredFailure { .. } => hasher.update(b"deferred\0"),
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}
