//! Diagnostic rendering tests. Output is rendered without color so the
//! assertions can match on plain substrings.

use rill_typeck::diagnostics::{render_parse_error, render_type_error};

fn render_for(src: &str) -> String {
    let program = rill_parser::parse(src).expect("parse failed");
    let err = rill_typeck::infer(&program).expect_err("expected a type error");
    render_type_error(&err, src, false)
}

#[test]
fn mismatch_report_carries_code_and_both_types() {
    let src = "define a(String $x) {} a { t: x => 1 }";
    let out = render_for(src);
    assert!(out.contains("E0001"), "missing code in:\n{out}");
    assert!(out.contains("expected String, got Integer[1, 1]"));
    assert!(out.contains("x => 1"), "label should point at the attribute:\n{out}");
}

#[test]
fn unknown_parameter_report_names_the_type() {
    let src = "define a(String $x) {} a { t: y => 1 }";
    let out = render_for(src);
    assert!(out.contains("E0002"));
    assert!(out.contains("`a` has no parameter `y`"));
}

#[test]
fn unsupported_construct_report() {
    let out = render_for("1 == 2");
    assert!(out.contains("E0005"));
    assert!(out.contains("cannot infer a type for comparison expressions"));
}

#[test]
fn parse_error_report_includes_related_label() {
    let src = "define a(String $x) { 1";
    let err = rill_parser::parse(src).expect_err("expected a parse error");
    let out = render_parse_error(&err, src, false);
    assert!(out.contains("P0001"));
    assert!(out.contains(&err.message));
}
