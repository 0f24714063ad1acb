//! # Theorist
//!
//! Expands data-driven test methods ("theories") into one runnable test case per data row.
//!
//! ```rust
//! use theorist::{row, AssemblyInfo, DataAttribute, MethodInfo, TestDiscoverer, TheoryDirective,
//!     TheoryDiscoverer, TypeInfo};
//!
//! let method = MethodInfo::new("Adds")
//!     .with_parameter("a", "i64")
//!     .with_data(DataAttribute::inline(row![1]))
//!     .with_data(DataAttribute::json("[[2], [3]]"));
//! let cases = TheoryDiscoverer::default().discover(
//!     &AssemblyInfo::new("calc_tests"),
//!     &TypeInfo::new("CalculatorTests"),
//!     &method,
//!     &TheoryDirective::new(),
//! );
//! let names: Vec<_> = cases.iter().map(|c| c.display_name()).collect();
//! assert_eq!(names, [
//!     "CalculatorTests.Adds(a: 1)",
//!     "CalculatorTests.Adds(a: 2)",
//!     "CalculatorTests.Adds(a: 3)",
//! ]);
//! ```

pub use crate::case::{FailureAction, TestCase, TestCaseKind, TestMethod};
pub use crate::config::{DiscoveryConfig, FailureDetail, LoggingConfig, TheoristConfig};
pub use crate::diagnostics::{ErrorContext, ErrorType, TheoryError};
pub use crate::discovery::{TestDiscoverer, TheoryDiscoverer};
pub use crate::execution::{TestInvoker, TestResult, TestSummary};
pub use crate::metadata::{
    AssemblyInfo, DataAttribute, MethodInfo, ParameterInfo, ProviderBinding, ProviderId,
    TheoryDirective, TypeInfo,
};
pub use crate::provider::{DataProvider, ProviderRegistry};
pub use crate::value::{DataRow, Value};

/// Location reported by the built-in providers' identities.
pub const BUILTIN_LOCATION: &str = "theorist";

pub mod diagnostics;
pub mod value;
pub mod metadata;
pub mod provider;
pub mod case;
pub mod execution;
pub mod discovery;
pub mod config;
pub mod logging;
