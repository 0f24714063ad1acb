mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::*;
use theorist::{
    row, DataAttribute, DiscoveryConfig, ErrorType, FailureDetail, ProviderBinding, ProviderId,
    TestDiscoverer, TestResult, TheoryDirective, TheoryDiscoverer, Value,
};

#[test]
fn skipped_theory_yields_one_skipped_case_without_resolving_data() {
    let calls = Arc::new(AtomicUsize::new(0));
    let discoverer = TheoryDiscoverer::new(Arc::new(registry(Arc::clone(&calls))));
    let method = method(vec![
        rows("[[1, 2], [3, 4]]"),
        DataAttribute::unbound("Broken", vec![]),
    ]);

    let cases = discover_with(&discoverer, &method, &TheoryDirective::skipped("flaky on CI"));

    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].skip_reason(), Some("flaky on CI"));
    assert_eq!(cases[0].arguments(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(matches!(cases[0].run(&passing), TestResult::Skipped(ref r) if r == "flaky on CI"));
}

#[test]
fn skipped_theory_with_no_data_attributes_is_still_one_case() {
    let cases = discover_with(&discoverer(), &method(vec![]), &TheoryDirective::skipped("later"));
    assert_eq!(cases.len(), 1);
    assert!(!cases[0].is_deferred_failure());
}

#[test]
fn one_attribute_yields_one_case_per_row_in_order() {
    let cases = discover(vec![rows("[[1, 2], [3, 4], [5, 6]]")]);

    assert_eq!(cases.len(), 3);
    assert_eq!(arguments(&cases), vec![row![1, 2], row![3, 4], row![5, 6]]);
    assert!(cases.iter().all(|c| !c.is_deferred_failure()));
}

#[test]
fn two_attributes_concatenate_in_declaration_order() {
    let cases = discover(vec![
        rows("[[1, 1], [2, 2]]"),
        DataAttribute::inline(row![10, 20]),
        DataAttribute::json("[[7, 8], [9, 10]]"),
    ]);

    assert_eq!(
        arguments(&cases),
        vec![row![1, 1], row![2, 2], row![10, 20], row![7, 8], row![9, 10]]
    );
}

#[test]
fn all_cases_share_the_method() {
    let cases = discover(vec![rows("[[1, 2], [3, 4]]")]);
    assert!(Arc::ptr_eq(cases[0].test_method(), cases[1].test_method()));
    assert_eq!(cases[0].test_method().identity(), "CalculatorTests.Adds");
}

#[test]
fn empty_provider_yields_single_no_data_failure() {
    let cases = discover(vec![rows("[]")]);

    assert_eq!(cases.len(), 1);
    assert!(cases[0].is_deferred_failure());
    assert_eq!(failure_text(&cases[0]), "No data found for CalculatorTests.Adds");
    let result = cases[0].run(&passing);
    assert_eq!(result.error().map(|e| e.error_type()), Some(ErrorType::NoData));
}

#[test]
fn no_data_attributes_yields_single_no_data_failure() {
    let cases = discover(vec![]);
    assert_eq!(cases.len(), 1);
    assert!(failure_text(&cases[0]).contains("CalculatorTests.Adds"));
}

#[test]
fn several_empty_providers_still_yield_one_case() {
    let cases = discover(vec![rows("[]"), DataAttribute::json("[]")]);
    assert_eq!(cases.len(), 1);
    assert!(failure_text(&cases[0]).starts_with("No data found"));
}

#[test]
fn unconstructible_provider_discards_earlier_rows() {
    let cases = discover(vec![
        rows("[[1, 2], [3, 4]]"),
        attr(unconstructible_provider()),
        rows("[[5, 6]]"),
    ]);

    assert_eq!(cases.len(), 1);
    assert!(cases[0].is_deferred_failure());
    let text = failure_text(&cases[0]);
    assert!(text.contains("CalculatorTests.Adds"), "{}", text);
    assert!(text.contains("constructor requires a live connection"), "{}", text);
    let result = cases[0].run(&passing);
    assert_eq!(
        result.error().map(|e| e.error_type()),
        Some(ErrorType::DataResolution)
    );
}

#[test]
fn provider_error_is_embedded_in_failure() {
    let cases = discover(vec![attr(failing_provider())]);
    assert_eq!(cases.len(), 1);
    let text = failure_text(&cases[0]);
    assert!(text.starts_with("Error while getting data for theory CalculatorTests.Adds: "));
    assert!(text.contains("connection refused by fixture database"));
}

#[test]
fn unregistered_provider_is_a_resolution_failure() {
    let cases = discover(vec![attr(ProviderId::new("NotThere", "anywhere"))]);
    assert_eq!(cases.len(), 1);
    assert!(failure_text(&cases[0]).contains("no provider registered as 'NotThere, anywhere'"));
}

#[test]
fn missing_binding_is_a_resolution_failure() {
    let cases = discover(vec![
        rows("[[1, 2]]"),
        DataAttribute::unbound("MemberData", vec![Value::from("Cases")]),
    ]);
    assert_eq!(cases.len(), 1);
    assert!(failure_text(&cases[0]).contains("'MemberData' names no data provider"));
}

#[test]
fn malformed_binding_is_a_resolution_failure() {
    let mut attribute = rows("[[1, 2]]");
    attribute.binding = Some(ProviderBinding::from_args(vec![Value::from("RowsProvider")]));
    let cases = discover(vec![attribute]);
    assert_eq!(cases.len(), 1);
    assert!(failure_text(&cases[0]).contains("Malformed provider binding"));
}

#[test]
fn panicking_provider_is_a_resolution_failure() {
    let cases = discover(vec![rows("[[1, 2]]"), attr(panicking_provider())]);
    assert_eq!(cases.len(), 1);
    let text = failure_text(&cases[0]);
    assert!(text.contains("Provider panicked"), "{}", text);
    assert!(text.contains("fixture provider exploded"), "{}", text);
}

#[test]
fn summary_detail_omits_cause_chain() {
    let discoverer = discoverer().with_config(DiscoveryConfig {
        failure_detail: FailureDetail::Summary,
    });
    let cases = discover_with(
        &discoverer,
        &method(vec![attr(unconstructible_provider())]),
        &TheoryDirective::new(),
    );
    let text = failure_text(&cases[0]);
    assert!(text.contains("factory for 'UnconstructibleProvider, calc_tests' failed"));
    assert!(!text.contains("live connection"));
}

#[test]
fn deferred_failure_reports_every_time_it_runs() {
    let cases = discover(vec![attr(failing_provider())]);
    assert_eq!(failure_text(&cases[0]), failure_text(&cases[0]));
}

#[test]
fn discovery_is_idempotent() {
    let discoverer = discoverer();
    let method = method(vec![rows("[[1, 2], [3, 4]]"), DataAttribute::inline(row![5, 6])]);
    let first = discover_with(&discoverer, &method, &TheoryDirective::new());
    let second = discover_with(&discoverer, &method, &TheoryDirective::new());

    assert_eq!(arguments(&first), arguments(&second));
    let ids = |cases: &[theorist::TestCase]| cases.iter().map(|c| c.unique_id()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert!(!Arc::ptr_eq(first[0].test_method(), second[0].test_method()));
}

#[test]
fn each_provider_is_consulted_once_per_attribute() {
    let calls = Arc::new(AtomicUsize::new(0));
    let discoverer = TheoryDiscoverer::new(Arc::new(registry(Arc::clone(&calls))));
    let method = method(vec![rows("[[1, 2]]"), rows("[[3, 4]]")]);
    discover_with(&discoverer, &method, &TheoryDirective::new());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn discoverer_is_shareable_across_threads() {
    let discoverer = discoverer();
    let method = method(vec![rows("[[1, 2], [3, 4]]")]);
    let counts: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| discover_with(&discoverer, &method, &TheoryDirective::new()).len()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![2; 4]);
}

#[test]
fn discoverer_is_usable_as_trait_object() {
    let discoverer: Box<dyn TestDiscoverer> = Box::new(discoverer());
    let cases = discoverer.discover(
        &theorist::AssemblyInfo::new("calc_tests"),
        &theorist::TypeInfo::new(CLASS),
        &method(vec![DataAttribute::inline(row![1, 2])]),
        &TheoryDirective::new(),
    );
    assert_eq!(cases.len(), 1);
}

#[test]
fn default_discoverer_uses_builtin_providers() {
    let cases = discover_with(
        &TheoryDiscoverer::default(),
        &method(vec![DataAttribute::json(r#"[[1, "x"]]"#)]),
        &TheoryDirective::new(),
    );
    assert_eq!(arguments(&cases), vec![vec![Value::Int(1), Value::from("x")]]);
}

#[test]
fn display_name_override_applies_to_every_case() {
    let cases = discover_with(
        &discoverer(),
        &method(vec![rows("[[1, 2], [3, 4]]")]),
        &TheoryDirective::new().with_display_name("adds"),
    );
    let names: Vec<_> = cases.iter().map(|c| c.display_name()).collect();
    assert_eq!(names, ["adds(a: 1, b: 2)", "adds(a: 3, b: 4)"]);
}
