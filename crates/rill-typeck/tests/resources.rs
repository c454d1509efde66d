//! Resource and class checking tests: parameter schemas, assignability
//! violations, and the cases that are deliberately never checked.

use rill_typeck::TypeError;

// ── Helpers ────────────────────────────────────────────────────────────

fn infer_str(src: &str) -> String {
    let program = rill_parser::parse(src).expect("parse failed");
    let ty = rill_typeck::infer(&program)
        .unwrap_or_else(|err| panic!("inference failed for `{src}`: {err}"));
    ty.to_string()
}

fn infer_err(src: &str) -> TypeError {
    let program = rill_parser::parse(src).expect("parse failed");
    rill_typeck::infer(&program).expect_err("expected a type error")
}

// ── Instantiation results ──────────────────────────────────────────────

#[test]
fn instantiation_is_a_resource_reference() {
    assert_eq!(infer_str("notify { hi: }"), "Resource[Notify]");
    assert_eq!(
        infer_str("define a(String $x) {} a { hi: x => 'ok' }"),
        "Resource[A]"
    );
}

#[test]
fn definitions_are_undef() {
    assert_eq!(infer_str("define a(String $x) {}"), "Undef");
    assert_eq!(infer_str("class a(String $x) {}"), "Undef");
}

// ── Checked instantiations ─────────────────────────────────────────────

#[test]
fn conforming_attributes_pass() {
    assert_eq!(
        infer_str("define a(Integer[0, 10] $x) {} a { t: x => 5 }"),
        "Resource[A]"
    );
}

#[test]
fn mismatched_attribute_raises() {
    let err = infer_err("define a(String $x) {} a { t: x => 1 }");
    let TypeError::ParameterMismatch {
        parameter,
        declared,
        inferred,
        ..
    } = &err
    else {
        panic!("expected a parameter mismatch, got {err:?}");
    };
    assert_eq!(parameter, "x");
    assert_eq!(declared.to_string(), "String");
    assert_eq!(inferred.to_string(), "Integer[1, 1]");
    assert_eq!(
        err.to_string(),
        "parameter `x` expected String, got Integer[1, 1]"
    );
}

#[test]
fn mismatch_through_a_variable_raises() {
    let err = infer_err("$v = 1 define a(String $x) {} a { t: x => $v }");
    let TypeError::ParameterMismatch { inferred, .. } = err else {
        panic!("expected a parameter mismatch");
    };
    assert_eq!(inferred.to_string(), "Integer[1, 1]");
}

#[test]
fn out_of_range_bound_raises() {
    let err = infer_err("define a(Integer[0, 10] $x) {} a { t: x => 11 }");
    assert!(matches!(err, TypeError::ParameterMismatch { .. }));
}

#[test]
fn first_violation_in_source_order_wins() {
    let err = infer_err("define a(String $x, String $y) {} a { t: y => 1, x => 2 }");
    let TypeError::ParameterMismatch { parameter, .. } = err else {
        panic!("expected a parameter mismatch");
    };
    assert_eq!(parameter, "y");
}

#[test]
fn unknown_attribute_name_raises() {
    let err = infer_err("define a(String $x) {} a { t: y => 1 }");
    let TypeError::UnknownParameter {
        parameter,
        type_name,
        ..
    } = err
    else {
        panic!("expected an unknown parameter error");
    };
    assert_eq!(parameter, "y");
    assert_eq!(type_name, "a");
}

#[test]
fn untyped_parameters_accept_data_only() {
    assert_eq!(infer_str("define a($x) {} a { t: x => 1 }"), "Resource[A]");
    // Regexes are not data.
    let err = infer_err("define a($x) {} a { t: x => /re/ }");
    assert!(matches!(err, TypeError::ParameterMismatch { .. }));
}

#[test]
fn class_instantiation_is_checked_by_title() {
    assert_eq!(
        infer_str("class a(String $x) {} class { a: x => 'ok' }"),
        "Resource[Class]"
    );
    let err = infer_err("class a(String $x) {} class { a: x => 1 }");
    assert!(matches!(err, TypeError::ParameterMismatch { .. }));
}

// ── Unchecked instantiations ───────────────────────────────────────────

#[test]
fn unknown_resource_types_are_never_checked() {
    assert_eq!(infer_str("b { t: x => 1 }"), "Resource[B]");
}

#[test]
fn forward_references_are_never_checked() {
    // The schema is registered after the instantiation, so the walk sees an
    // unknown type at the point of use.
    assert_eq!(
        infer_str("a { t: x => 'not an integer' } define a(Integer $x) {} a { t: x => 1 }"),
        "Resource[A]"
    );
}

#[test]
fn unknown_class_titles_are_never_checked() {
    assert_eq!(infer_str("class { b: x => 1 }"), "Resource[Class]");
}

#[test]
fn attribute_values_of_unchecked_resources_still_infer() {
    assert_eq!(infer_str("b { t: x => ($v = 1) } $v"), "Integer[1, 1]");
}

// ── Annotation and rule errors ─────────────────────────────────────────

#[test]
fn unknown_annotation_type_raises_at_registration() {
    let err = infer_err("define a(Widget $x) {}");
    let TypeError::UnknownTypeName { name, .. } = err else {
        panic!("expected an unknown type name error");
    };
    assert_eq!(name, "Widget");
}

#[test]
fn malformed_annotation_parameters_raise() {
    let err = infer_err("define a(Hash[String] $x) {}");
    assert!(matches!(err, TypeError::BadTypeParameters { .. }));
}

#[test]
fn comparisons_have_no_inference_rule() {
    let err = infer_err("1 == 2");
    assert!(matches!(err, TypeError::UnsupportedConstruct { .. }));
    assert!(err.to_string().contains("comparison"));
}
