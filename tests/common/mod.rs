//! Shared fixtures for theory discovery tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use theorist::provider::build_default_provider_registry;
use theorist::{
    err_msg, AssemblyInfo, DataAttribute, MethodInfo, ProviderId, ProviderRegistry, TestCase,
    TestDiscoverer, TestMethod, TheoryDirective, TheoryDiscoverer, TheoryError, TypeInfo, Value,
};

pub const CLASS: &str = "CalculatorTests";
pub const METHOD: &str = "Adds";

pub fn rows_provider() -> ProviderId {
    ProviderId::new("RowsProvider", "calc_tests")
}

pub fn failing_provider() -> ProviderId {
    ProviderId::new("FailingProvider", "calc_tests")
}

pub fn panicking_provider() -> ProviderId {
    ProviderId::new("PanickingProvider", "calc_tests")
}

pub fn unconstructible_provider() -> ProviderId {
    ProviderId::new("UnconstructibleProvider", "calc_tests")
}

/// Registry with the built-ins plus test providers.
///
/// `RowsProvider` returns the JSON table in its attribute's first argument, like the JSON
/// built-in, and counts its calls in `calls`.
pub fn registry(calls: Arc<AtomicUsize>) -> ProviderRegistry {
    let mut registry = build_default_provider_registry();
    registry.register_fn(rows_provider(), move |attr, _method| {
        calls.fetch_add(1, Ordering::SeqCst);
        let table = attr.args.first().and_then(Value::as_str).unwrap_or("[]");
        let rows: Vec<Vec<Value>> = serde_json::from_str(table)
            .map_err(|e| err_msg!(Provider, "bad fixture table").with_source(e))?;
        Ok(rows)
    });
    registry.register_fn(failing_provider(), |_, _| {
        Err(err_msg!(Provider, "connection refused by fixture database"))
    });
    registry.register_fn(panicking_provider(), |_, _| panic!("fixture provider exploded"));
    registry.register(unconstructible_provider(), || {
        Err(err_msg!(Internal, "constructor requires a live connection"))
    });
    registry
}

pub fn discoverer() -> TheoryDiscoverer {
    TheoryDiscoverer::new(Arc::new(registry(Arc::new(AtomicUsize::new(0)))))
}

pub fn rows(table: &str) -> DataAttribute {
    DataAttribute::new("RowsData", &rows_provider(), vec![Value::from(table)])
}

pub fn attr(provider: ProviderId) -> DataAttribute {
    DataAttribute::new("CustomData", &provider, vec![])
}

pub fn method(attributes: Vec<DataAttribute>) -> MethodInfo {
    attributes.into_iter().fold(
        MethodInfo::new(METHOD)
            .with_parameter("a", "i64")
            .with_parameter("b", "i64"),
        MethodInfo::with_data,
    )
}

pub fn discover_with(
    discoverer: &TheoryDiscoverer,
    method: &MethodInfo,
    directive: &TheoryDirective,
) -> Vec<TestCase> {
    discoverer.discover(
        &AssemblyInfo::new("calc_tests"),
        &TypeInfo::new(CLASS),
        method,
        directive,
    )
}

pub fn discover(attributes: Vec<DataAttribute>) -> Vec<TestCase> {
    discover_with(&discoverer(), &method(attributes), &TheoryDirective::new())
}

pub fn arguments(cases: &[TestCase]) -> Vec<Vec<Value>> {
    cases
        .iter()
        .map(|c| c.arguments().map(<[Value]>::to_vec).unwrap_or_default())
        .collect()
}

/// Invoker that always passes.
pub fn passing(_: &TestMethod, _: &[Value]) -> Result<(), TheoryError> {
    Ok(())
}

/// Invoker that fails unless `a + b == 3`.
pub fn sums_to_three(_: &TestMethod, args: &[Value]) -> Result<(), TheoryError> {
    let sum: i64 = args.iter().filter_map(Value::as_int).sum();
    if sum == 3 {
        Ok(())
    } else {
        Err(err_msg!(Invocation, "expected 3, got {}", sum))
    }
}

/// Runs a deferred-failure case and returns its error text.
pub fn failure_text(case: &TestCase) -> String {
    let result = case.run(&passing);
    match result.error() {
        Some(e) => e.to_string(),
        None => panic!("expected {} to fail, got {:?}", case.display_name(), result),
    }
}
