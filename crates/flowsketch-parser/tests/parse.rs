use std::collections::HashSet;

use flowsketch_core::{EdgeKind, NodeShape};
use flowsketch_parser::{Direction, ErrorCode, ParseOptions, parse, parse_with_options};
use proptest::prelude::*;

#[test]
fn test_decision_flowchart() {
    let source = r#"
        flowchart TD
        %% order handling
        Start((Start)) --> Check{In stock?}
        Check -->|yes| Ship[Ship order]
        Check -->|no| Backorder[[Backorder]]
        Backorder -.-> Check
        Ship --> Done((Done))
    "#;

    let graph = parse(source).expect("Failed to parse");

    let ids: Vec<_> = graph.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["Start", "Check", "Ship", "Backorder", "Done"]);

    let check = graph.node("Check").unwrap();
    assert_eq!(check.shape(), NodeShape::Diamond);
    assert_eq!(check.label(), "In stock?");
    assert_eq!(graph.node("Backorder").unwrap().label(), "Backorder");
    assert_eq!(graph.node("Done").unwrap().shape(), NodeShape::Circle);

    let edges: Vec<_> = graph
        .edges()
        .iter()
        .map(|e| (e.from(), e.to(), e.label(), e.kind()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("Start", "Check", None, EdgeKind::Arrow),
            ("Check", "Ship", Some("yes"), EdgeKind::Arrow),
            ("Check", "Backorder", Some("no"), EdgeKind::Arrow),
            ("Backorder", "Check", None, EdgeKind::Dashed),
            ("Ship", "Done", None, EdgeKind::Arrow),
        ]
    );
    assert!(graph.edges().iter().all(|e| e.points().is_none()));
}

#[test]
fn test_trailing_label_forms() {
    let graph = parse("A[One] --> B[Two] |both|\nB --> C |plain|\n").expect("Failed to parse");

    assert_eq!(graph.edges()[0].label(), Some("both"));
    assert_eq!(graph.edges()[1].label(), Some("plain"));
}

#[test]
fn test_empty_input_error() {
    let err = parse("").unwrap_err();
    assert_eq!(err.message(), "Empty input");
    assert_eq!(err.line(), None);
    assert_eq!(err.to_string(), "error[E001]: Empty input");
}

#[test]
fn test_strict_warnings_do_not_fail_parse() {
    let source = "graph BT\nA --> B\nclassDef green fill:#9f6\nstyle B fill:#zzz\n";
    let parsed = parse_with_options(source, ParseOptions::new().with_strict(true))
        .expect("Failed to parse");

    assert_eq!(parsed.direction(), Some(Direction::BottomUp));
    let codes: Vec<_> = parsed.warnings().iter().map(|w| w.code()).collect();
    assert_eq!(codes, vec![Some(ErrorCode::E100), Some(ErrorCode::E101)]);

    let lenient = parse(source).expect("Failed to parse");
    assert_eq!(&lenient, parsed.graph());
}

// ===================
// Strategies
// ===================

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,5}"
}

fn label_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ?]{0,8}"
}

fn bracket_strategy() -> impl Strategy<Value = String> {
    (0usize..5, label_strategy()).prop_map(|(form, label)| match form {
        0 => String::new(),
        1 => format!("[{label}]"),
        2 => format!("[[{label}]]"),
        3 => format!("(({label}))"),
        _ => format!("{{{label}}}"),
    })
}

fn line_strategy() -> impl Strategy<Value = String> {
    (
        0usize..6,
        identifier_strategy(),
        bracket_strategy(),
        identifier_strategy(),
        bracket_strategy(),
        label_strategy(),
    )
        .prop_map(|(kind, a, a_shape, b, b_shape, label)| match kind {
            0 => format!("{a}[{label}]"),
            1 => format!("{a}{a_shape} --> {b}{b_shape}"),
            2 => format!("{a} -->|{label}| {b}{b_shape}"),
            3 => format!("{a}{a_shape} -.-> {b}{b_shape}"),
            4 => format!("{a} -.- {b} |{label}|"),
            _ => format!("%% {label}"),
        })
}

fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 1..20).prop_map(|lines| {
        let mut source = String::from("graph TD\n");
        for line in lines {
            source.push_str(&line);
            source.push('\n');
        }
        source
    })
}

// ===================
// Property Test Functions
// ===================

fn check_no_dangling_edges(source: &str) -> Result<(), TestCaseError> {
    let graph = parse(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(graph.dangling_edges().count(), 0);

    let mut seen = HashSet::new();
    for node in graph.nodes() {
        prop_assert!(seen.insert(node.id()), "duplicate node `{}`", node.id());
    }
    for edge in graph.edges() {
        prop_assert_eq!(edge.id(), format!("{}-{}", edge.from(), edge.to()));
    }
    Ok(())
}

fn check_parse_is_idempotent(source: &str) -> Result<(), TestCaseError> {
    let first = parse(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
    let second = parse(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(first, second);
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn no_dangling_edges(source in source_strategy()) {
        check_no_dangling_edges(&source)?;
    }

    #[test]
    fn parse_is_idempotent(source in source_strategy()) {
        check_parse_is_idempotent(&source)?;
    }
}
