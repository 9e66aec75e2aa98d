//! Parse driver: preprocessing, line dispatch and graph assembly.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use log::{debug, trace};

use flowsketch_core::{NodeStyle, color::Color};

use crate::{
    ParseOptions, ParsedDiagram,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Location, ParseError},
    matchers::{LineMatch, StyleProperty, match_line},
    registry::NodeRegistry,
    source::{SourceLine, significant_lines, strip_header},
};

/// Parses `source` into a diagram.
///
/// Empty input is the only user-facing error; anything that panics while
/// the lines are processed is reported as an internal failure instead of
/// unwinding into the caller.
pub(crate) fn parse_source(
    source: &str,
    options: ParseOptions,
) -> Result<ParsedDiagram, ParseError> {
    if source.trim().is_empty() {
        return Err(Diagnostic::error("Empty input")
            .with_code(ErrorCode::E001)
            .with_help("write at least one node or edge, e.g. `A --> B`")
            .into());
    }

    catch_internal_failure(|| build_diagram(source, options))
}

/// Runs `f`, converting a panic into an [`ErrorCode::E002`] error.
fn catch_internal_failure<T>(
    f: impl FnOnce() -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            Err(Diagnostic::error(message)
                .with_code(ErrorCode::E002)
                .into())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "internal parser failure".to_string()
    }
}

fn build_diagram(source: &str, options: ParseOptions) -> Result<ParsedDiagram, ParseError> {
    let lines = significant_lines(source);
    let (direction, body) = strip_header(&lines);
    debug!(direction:?, lines = body.len(); "Preprocessed source");

    let mut registry = NodeRegistry::new();
    let mut collector = DiagnosticCollector::new(options.is_strict());

    for line in body {
        match match_line(line.text()) {
            LineMatch::Node(decl) => registry.declare(decl.id(), decl.shape()),
            LineMatch::Edge(decl) => registry.connect(&decl),
            LineMatch::Style(decl) => {
                let style = style_from_properties(decl.properties(), line, &mut collector);
                registry.style(decl.id(), style);
            }
            LineMatch::NoMatch => {
                trace!(line = line.number(), text = line.text(); "Skipping unrecognized line");
                collector.emit(
                    Diagnostic::warning(format!("unrecognized line `{}`", line.text()))
                        .with_code(ErrorCode::E100)
                        .with_location(line.location())
                        .with_help("edges are written `A --> B`, `A -.-> B` or `A -.- B`"),
                );
            }
        }
    }

    let warnings = collector.finish()?;
    let graph = registry.into_graph();
    debug_assert_eq!(graph.dangling_edges().count(), 0);

    Ok(ParsedDiagram::new(graph, direction, warnings))
}

/// Builds the style overrides of a `style` directive.
///
/// Properties that are unknown or carry an invalid value are skipped, with a
/// warning pointing at the directive.
fn style_from_properties(
    properties: &[StyleProperty<'_>],
    line: &SourceLine<'_>,
    collector: &mut DiagnosticCollector,
) -> NodeStyle {
    let mut style = NodeStyle::default();

    for property in properties {
        let applied = match property.key() {
            "fill" => Color::new(property.value()).map(|color| style.clone().with_fill(color)),
            "stroke" => {
                Color::new(property.value()).map(|color| style.clone().with_stroke(color))
            }
            "stroke-width" => parse_stroke_width(property.value())
                .map(|width| style.clone().with_stroke_width(width)),
            key => Err(format!("unsupported style property `{key}`")),
        };

        match applied {
            Ok(updated) => style = updated,
            Err(reason) => collector.emit(invalid_style_property(property, line.location(), reason)),
        }
    }

    style
}

fn parse_stroke_width(value: &str) -> Result<f32, String> {
    let number = value.trim().trim_end_matches("px").trim_end();
    match number.parse::<f32>() {
        Ok(width) if width.is_finite() && width >= 0.0 => Ok(width),
        _ => Err(format!("invalid stroke width `{value}`")),
    }
}

fn invalid_style_property(
    property: &StyleProperty<'_>,
    location: Location,
    reason: String,
) -> Diagnostic {
    Diagnostic::warning(format!(
        "invalid style property `{}:{}`",
        property.key(),
        property.value()
    ))
    .with_code(ErrorCode::E101)
    .with_location(location)
    .with_help(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_internal_failure_reports_panic_message() {
        let result: Result<(), ParseError> =
            catch_internal_failure(|| panic!("registry exploded"));

        let err = result.unwrap_err();
        assert_eq!(err.message(), "registry exploded");
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_catch_internal_failure_passes_result_through() {
        let result = catch_internal_failure(|| Ok(42));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_panic_message_formats() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");

        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "internal parser failure");
    }

    #[test]
    fn test_parse_stroke_width() {
        assert_eq!(parse_stroke_width("4px"), Ok(4.0));
        assert_eq!(parse_stroke_width("2.5"), Ok(2.5));
        assert!(parse_stroke_width("-1").is_err());
        assert!(parse_stroke_width("wide").is_err());
    }
}
