use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::case::{TestCase, TestMethod};
use crate::config::DiscoveryConfig;
use crate::diagnostics::panic_message;
use crate::metadata::{AssemblyInfo, MethodInfo, ProviderId, TheoryDirective, TypeInfo};
use crate::provider::{default_provider_registry, ProviderRegistry};
use crate::value::DataRow;
use crate::{err_ctx, TheoryError};

/// Finds the test cases for one test method.
///
/// Called once per annotated method by the outer discovery loop. Implementations never fail:
/// problems are reported by the returned cases when they run.
pub trait TestDiscoverer {
    fn discover(
        &self,
        assembly: &AssemblyInfo,
        class: &TypeInfo,
        method: &MethodInfo,
        directive: &TheoryDirective,
    ) -> Vec<TestCase>;
}

/// Expands a theory into one test case per data row.
///
/// The discovery process follows this flow:
/// 1. A theory with a skip reason becomes a single skipped case; no data is looked up
/// 2. Each data attribute, in declaration order, is resolved to a provider through the registry
/// 3. Each row the provider returns becomes one bound case, in the order returned
/// 4. No rows at all yields a single case failing with "No data found for `Type.Method`"
/// 5. Any resolution error discards every row gathered so far and yields a single case
///    failing with the method identity and the cause
///
/// Discovery has no side effects and keeps no state between calls, so a single discoverer can
/// be shared across threads working on different methods.
#[derive(Debug, Clone)]
pub struct TheoryDiscoverer {
    registry: Arc<ProviderRegistry>,
    config: DiscoveryConfig,
}

impl Default for TheoryDiscoverer {
    fn default() -> Self {
        Self::new(default_provider_registry())
    }
}

impl TheoryDiscoverer {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            config: DiscoveryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Pulls every row for `method` from its data attributes, in declaration order.
    ///
    /// Stops at the first error; rows gathered before it are dropped with the partial vector.
    pub fn resolve_rows(&self, method: &MethodInfo) -> Result<Vec<DataRow>, TheoryError> {
        let mut rows = Vec::new();
        for attribute in method.data_attributes() {
            let id = attribute.provider_id()?;
            let provider = guard_panics(&id, || self.registry.create(&id))?;
            let mut provided = guard_panics(&id, || provider.get_data(attribute, method))?;
            trace!(
                method = %method.name,
                attribute = %attribute.name,
                provider = %id,
                rows = provided.len(),
                "resolved data attribute"
            );
            rows.append(&mut provided);
        }
        Ok(rows)
    }

    fn no_data_case(&self, method: Arc<TestMethod>, directive: &TheoryDirective) -> TestCase {
        let identity = method.identity();
        let message = format!("No data found for {}", identity);
        warn!(method = %identity, "theory has no data rows");
        TestCase::deferred_failure(method, directive.clone(), move || {
            Err(err_ctx!(
                NoData,
                message,
                identity,
                "add a data attribute, or make its provider return at least one row"
            ))
        })
    }

    fn resolution_failure_case(
        &self,
        method: Arc<TestMethod>,
        directive: &TheoryDirective,
        cause: &TheoryError,
    ) -> TestCase {
        let identity = method.identity();
        let message = format!(
            "Error while getting data for theory {}: {}",
            identity,
            self.config.describe(cause)
        );
        warn!(method = %identity, error = %cause, "data resolution failed");
        TestCase::deferred_failure(method, directive.clone(), move || {
            Err(err_ctx!(DataResolution, message, identity))
        })
    }
}

impl TestDiscoverer for TheoryDiscoverer {
    fn discover(
        &self,
        assembly: &AssemblyInfo,
        class: &TypeInfo,
        method: &MethodInfo,
        directive: &TheoryDirective,
    ) -> Vec<TestCase> {
        let test_method = Arc::new(TestMethod::new(
            assembly.clone(),
            class.clone(),
            method.clone(),
        ));

        // One skipped case, not one per row; a skipped theory may have no usable data.
        if let Some(reason) = directive.skip_reason() {
            debug!(method = %test_method.identity(), reason, "theory skipped");
            return vec![TestCase::standard(test_method, directive.clone())];
        }

        match self.resolve_rows(method) {
            Ok(rows) if rows.is_empty() => vec![self.no_data_case(test_method, directive)],
            Ok(rows) => {
                debug!(method = %test_method.identity(), rows = rows.len(), "theory expanded");
                rows.into_iter()
                    .map(|row| TestCase::bound(Arc::clone(&test_method), directive.clone(), row))
                    .collect()
            }
            Err(e) => vec![self.resolution_failure_case(test_method, directive, &e)],
        }
    }
}

/// Runs provider code, turning a panic into a `ProviderPanic` error.
fn guard_panics<T>(
    id: &ProviderId,
    f: impl FnOnce() -> Result<T, TheoryError>,
) -> Result<T, TheoryError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(err_ctx!(
            ProviderPanic,
            format!("'{}': {}", id, panic_message(payload.as_ref())),
            id.name
        ))
    })
}
