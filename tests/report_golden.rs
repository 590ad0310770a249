//! Golden (snapshot) tests for rendered reports and the composed configuration.
//!
//! These tests use insta to capture the exact output for representative
//! result sets. Column padding of the stylish report is collapsed before
//! snapshotting so the snapshots only pin content and order.
//!
//! Run `cargo insta review` to review changes after modifying the code.

use fandl_core::rule_sets::{ComposeOptions, compose};
use fandl_core::{
    JsonFormatter, LintMessage, LintResult, ProjectSettings, ReportFormatter, Severity, StylishFormatter,
};

fn message(rule: Option<&str>, severity: Severity, text: &str, line: u32, column: u32) -> LintMessage {
    LintMessage {
        rule_id: rule.map(String::from),
        severity,
        message: text.to_string(),
        line,
        column,
        fatal: rule.is_none(),
    }
}

fn sample_results() -> Vec<LintResult> {
    vec![
        LintResult::clean("/p/src/clean.js"),
        LintResult {
            file_path: "/p/src/a.js".into(),
            messages: vec![
                message(Some("semi"), Severity::Error, "Missing semicolon.", 3, 7),
                message(Some("no-console"), Severity::Warning, "Unexpected console statement.", 10, 1),
            ],
            output: None,
        },
        LintResult {
            file_path: "/p/src/b.js".into(),
            messages: vec![message(None, Severity::Error, "Parsing error: Unexpected token )", 4, 12)],
            output: None,
        },
    ]
}

/// Collapses runs of whitespace and drops blank lines.
fn collapse(rendered: &str) -> String {
    rendered
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_stylish_report() {
    let output = collapse(&StylishFormatter.format(&sample_results()));
    insta::assert_snapshot!(output, @r"
/p/src/a.js
3:7 error Missing semicolon. semi
10:1 warning Unexpected console statement. no-console
/p/src/b.js
4:12 error Parsing error: Unexpected token )
✖ 3 problems (2 errors, 1 warning)
");
}

#[test]
fn test_stylish_report_single_problem() {
    let results = vec![LintResult {
        file_path: "/p/index.mjs".into(),
        messages: vec![message(Some("no-debugger"), Severity::Error, "Unexpected 'debugger' statement.", 1, 1)],
        output: None,
    }];
    let output = collapse(&StylishFormatter.format(&results));
    insta::assert_snapshot!(output, @r"
/p/index.mjs
1:1 error Unexpected 'debugger' statement. no-debugger
✖ 1 problem (1 error, 0 warnings)
");
}

#[test]
fn test_json_report() {
    let output = JsonFormatter.format(&sample_results()[..2]);
    insta::assert_snapshot!(output, @r#"[{"filePath":"/p/src/a.js","messages":[{"ruleId":"semi","severity":2,"message":"Missing semicolon.","line":3,"column":7},{"ruleId":"no-console","severity":1,"message":"Unexpected console statement.","line":10,"column":1}]}]"#);
}

#[test]
fn test_default_composition_layers() {
    let project = ProjectSettings {
        declares_node_engine: true,
        ..ProjectSettings::default()
    };
    let entries = compose(&ComposeOptions {
        project,
        ..ComposeOptions::default()
    })
    .expect("Failed to compose");
    let output = entries
        .iter()
        .map(|e| format!("{} {}", e.name.as_deref().unwrap_or("-"), e.files.as_ref().map_or(0, Vec::len)))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(output, @r"
fandl/base-recommended 1
fandl/stylistic 1
fandl/standard-js 1
fandl/style 1
fandl/smells 1
fandl/complexity 1
fandl/efficiency 1
fandl/debug 1
fandl/node 1
fandl/jsdoc 1
fandl/base 1
fandl/jsx 1
fandl/test 2
");
}
