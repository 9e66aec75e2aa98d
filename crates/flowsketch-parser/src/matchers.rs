//! Line matchers for flowchart statements.
//!
//! Each significant line is offered to an ordered table of recognizers
//! ([`LINE_MATCHERS`]); the first one that accepts the whole line decides
//! what the line means. Matchers never look at more than one line and never
//! fail hard: a line no matcher accepts is reported as [`LineMatch::NoMatch`]
//! and skipped by the caller.
//!
//! The recognizers are small winnow parsers over `&str`. Edge forms share a
//! single grammar
//!
//! ```text
//! edge     := endpoint ws arrow ws ('|' label '|' ws)? endpoint (ws '|' label '|')?
//! endpoint := identifier shape?
//! shape    := '[[' text ']]' | '[' text ']' | '((' text '))' | '{' text '}'
//! ```
//!
//! and differ in which arrow they accept and which endpoint forms they
//! require, so that the table order controls precedence.

use log::trace;
use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::{alt, delimited, opt, preceded, terminated},
    error::{ContextError, ErrMode},
    token::{literal, take_until, take_while},
};

use flowsketch_core::{EdgeKind, NodeShape, graph::is_id_char};

pub(crate) type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Solid arrow
const ARROW: &str = "-->";
/// Dashed arrow
const DASHED_ARROW: &str = "-.->";
/// Dotted link without arrowhead
const DOTTED_LINK: &str = "-.-";

/// A bracket form attached to an identifier: `[text]`, `((text))`...
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShapeDecl {
    shape: NodeShape,
    label: String,
}

impl ShapeDecl {
    fn new(shape: NodeShape, text: &str) -> Self {
        Self {
            shape,
            label: text.trim().to_string(),
        }
    }

    pub(crate) fn shape(&self) -> NodeShape {
        self.shape
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }
}

/// One side of an edge statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint<'s> {
    id: &'s str,
    shape: Option<ShapeDecl>,
}

impl<'s> Endpoint<'s> {
    pub(crate) fn id(&self) -> &'s str {
        self.id
    }

    pub(crate) fn shape(&self) -> Option<&ShapeDecl> {
        self.shape.as_ref()
    }
}

/// `A[Label]` on a line of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeDecl<'s> {
    id: &'s str,
    shape: ShapeDecl,
}

impl<'s> NodeDecl<'s> {
    pub(crate) fn id(&self) -> &'s str {
        self.id
    }

    pub(crate) fn shape(&self) -> &ShapeDecl {
        &self.shape
    }
}

/// An edge statement with both endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EdgeDecl<'s> {
    source: Endpoint<'s>,
    target: Endpoint<'s>,
    kind: EdgeKind,
    label: Option<String>,
}

impl<'s> EdgeDecl<'s> {
    pub(crate) fn source(&self) -> &Endpoint<'s> {
        &self.source
    }

    pub(crate) fn target(&self) -> &Endpoint<'s> {
        &self.target
    }

    pub(crate) fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub(crate) fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A raw `key:value` pair from a style directive, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StyleProperty<'s> {
    key: &'s str,
    value: &'s str,
}

impl<'s> StyleProperty<'s> {
    pub(crate) fn key(&self) -> &'s str {
        self.key
    }

    pub(crate) fn value(&self) -> &'s str {
        self.value
    }
}

/// `style A fill:#f9f,stroke:#333,stroke-width:4px`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StyleDecl<'s> {
    id: &'s str,
    properties: Vec<StyleProperty<'s>>,
}

impl<'s> StyleDecl<'s> {
    pub(crate) fn id(&self) -> &'s str {
        self.id
    }

    pub(crate) fn properties(&self) -> &[StyleProperty<'s>] {
        &self.properties
    }
}

/// Outcome of offering a line to a matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineMatch<'s> {
    NoMatch,
    Node(NodeDecl<'s>),
    Edge(EdgeDecl<'s>),
    Style(StyleDecl<'s>),
}

impl LineMatch<'_> {
    fn is_match(&self) -> bool {
        !matches!(self, LineMatch::NoMatch)
    }
}

/// A named line recognizer.
pub(crate) struct LineMatcher {
    name: &'static str,
    recognize: for<'s> fn(&'s str) -> LineMatch<'s>,
}

impl LineMatcher {
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }
}

/// Recognizers in precedence order; the first match wins.
pub(crate) const LINE_MATCHERS: [LineMatcher; 8] = [
    LineMatcher {
        name: "node_declaration",
        recognize: node_declaration,
    },
    LineMatcher {
        name: "bracketed_edge",
        recognize: bracketed_edge,
    },
    LineMatcher {
        name: "labelled_target_edge",
        recognize: labelled_target_edge,
    },
    LineMatcher {
        name: "plain_edge",
        recognize: plain_edge,
    },
    LineMatcher {
        name: "mixed_edge",
        recognize: mixed_edge,
    },
    LineMatcher {
        name: "dashed_edge",
        recognize: dashed_edge,
    },
    LineMatcher {
        name: "dotted_link",
        recognize: dotted_link,
    },
    LineMatcher {
        name: "style_directive",
        recognize: style_directive,
    },
];

/// Offers `line` to each matcher in order and returns the first match.
pub(crate) fn match_line(line: &str) -> LineMatch<'_> {
    for matcher in &LINE_MATCHERS {
        let outcome = (matcher.recognize)(line);
        if outcome.is_match() {
            trace!(matcher = matcher.name(), line; "Line matched");
            return outcome;
        }
    }
    LineMatch::NoMatch
}

fn node_declaration(line: &str) -> LineMatch<'_> {
    whole_line(line, node_decl).map_or(LineMatch::NoMatch, LineMatch::Node)
}

/// `A[x] --> B[y]`: both endpoints carry a bracket form.
fn bracketed_edge(line: &str) -> LineMatch<'_> {
    edge_matching(line, ARROW, EdgeKind::Arrow, |edge| {
        edge.source.shape.is_some() && edge.target.shape.is_some()
    })
}

/// `A -->|x| B[y]`: bare source, arrow label, bracketed target.
fn labelled_target_edge(line: &str) -> LineMatch<'_> {
    whole_line(line, arrow_labelled_edge)
        .filter(|edge| edge.source.shape.is_none() && edge.target.shape.is_some())
        .map_or(LineMatch::NoMatch, LineMatch::Edge)
}

/// `A --> B`: both endpoints bare.
fn plain_edge(line: &str) -> LineMatch<'_> {
    edge_matching(line, ARROW, EdgeKind::Arrow, |edge| {
        edge.source.shape.is_none() && edge.target.shape.is_none()
    })
}

/// Solid edges with a bracket form on only one side.
fn mixed_edge(line: &str) -> LineMatch<'_> {
    edge_matching(line, ARROW, EdgeKind::Arrow, |_| true)
}

fn dashed_edge(line: &str) -> LineMatch<'_> {
    edge_matching(line, DASHED_ARROW, EdgeKind::Dashed, |_| true)
}

fn dotted_link(line: &str) -> LineMatch<'_> {
    edge_matching(line, DOTTED_LINK, EdgeKind::Dotted, |_| true)
}

fn style_directive(line: &str) -> LineMatch<'_> {
    whole_line(line, style_decl).map_or(LineMatch::NoMatch, LineMatch::Style)
}

/// Runs `parser` on `line` and accepts only if nothing but whitespace is left.
fn whole_line<'s, O>(
    line: &'s str,
    mut parser: impl FnMut(&mut &'s str) -> IResult<O>,
) -> Option<O> {
    let mut input = line;
    let output = parser(&mut input).ok()?;
    input.trim().is_empty().then_some(output)
}

fn edge_matching<'s>(
    line: &'s str,
    arrow: &'static str,
    kind: EdgeKind,
    accept: impl Fn(&EdgeDecl<'s>) -> bool,
) -> LineMatch<'s> {
    whole_line(line, |input: &mut &'s str| edge_decl(input, arrow, kind))
        .filter(|edge| accept(edge))
        .map_or(LineMatch::NoMatch, LineMatch::Edge)
}

fn identifier<'s>(input: &mut &'s str) -> IResult<&'s str> {
    take_while(1.., is_id_char).parse_next(input)
}

fn ws(input: &mut &str) -> IResult<()> {
    space0.void().parse_next(input)
}

fn gap(input: &mut &str) -> IResult<()> {
    space1.void().parse_next(input)
}

fn shape_decl(input: &mut &str) -> IResult<ShapeDecl> {
    alt((
        delimited("[[", take_until(0.., "]]"), "]]")
            .map(|text: &str| ShapeDecl::new(NodeShape::Rectangle, text)),
        delimited('[', take_while(0.., |c: char| c != ']'), ']')
            .map(|text: &str| ShapeDecl::new(NodeShape::Rectangle, text)),
        delimited("((", take_until(0.., "))"), "))")
            .map(|text: &str| ShapeDecl::new(NodeShape::Circle, text)),
        delimited('{', take_while(0.., |c: char| c != '}'), '}')
            .map(|text: &str| ShapeDecl::new(NodeShape::Diamond, text)),
    ))
    .parse_next(input)
}

fn endpoint<'s>(input: &mut &'s str) -> IResult<Endpoint<'s>> {
    let id = identifier(input)?;
    let shape = opt(shape_decl).parse_next(input)?;
    Ok(Endpoint { id, shape })
}

fn node_decl<'s>(input: &mut &'s str) -> IResult<NodeDecl<'s>> {
    let id = identifier(input)?;
    let shape = shape_decl(input)?;
    Ok(NodeDecl { id, shape })
}

fn pipe_label<'s>(input: &mut &'s str) -> IResult<&'s str> {
    delimited('|', take_while(0.., |c: char| c != '|'), '|').parse_next(input)
}

fn arrow_token<'s>(input: &mut &'s str, arrow: &'static str) -> IResult<&'s str> {
    literal(arrow).parse_next(input)
}

/// Parses one edge statement for the given arrow token.
///
/// A label written right after the arrow takes priority over a trailing
/// one; a label that is empty after trimming counts as absent.
fn edge_decl<'s>(
    input: &mut &'s str,
    arrow: &'static str,
    kind: EdgeKind,
) -> IResult<EdgeDecl<'s>> {
    let source = endpoint(input)?;
    ws(input)?;
    arrow_token(input, arrow)?;
    ws(input)?;
    let arrow_label = opt(terminated(pipe_label, space0)).parse_next(input)?;
    let target = endpoint(input)?;
    let trailing_label = opt(preceded(space0, pipe_label)).parse_next(input)?;

    let label = arrow_label
        .or(trailing_label)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string);

    Ok(EdgeDecl {
        source,
        target,
        kind,
        label,
    })
}

/// Solid edge whose label is written right after the arrow.
fn arrow_labelled_edge<'s>(input: &mut &'s str) -> IResult<EdgeDecl<'s>> {
    let source = endpoint(input)?;
    ws(input)?;
    arrow_token(input, ARROW)?;
    ws(input)?;
    let arrow_label = terminated(pipe_label, space0).parse_next(input)?;
    let target = endpoint(input)?;

    let label = Some(arrow_label.trim())
        .filter(|label| !label.is_empty())
        .map(str::to_string);

    Ok(EdgeDecl {
        source,
        target,
        kind: EdgeKind::Arrow,
        label,
    })
}

fn style_keyword<'s>(input: &mut &'s str) -> IResult<&'s str> {
    terminated(literal("style"), space1).parse_next(input)
}

fn rest<'s>(input: &mut &'s str) -> IResult<&'s str> {
    take_while(1.., |_: char| true).parse_next(input)
}

fn style_decl<'s>(input: &mut &'s str) -> IResult<StyleDecl<'s>> {
    style_keyword(input)?;
    let id = identifier(input)?;
    gap(input)?;
    let body = rest(input)?;

    let properties = body
        .split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| match raw.split_once(':') {
            Some((key, value)) => StyleProperty {
                key: key.trim(),
                value: value.trim(),
            },
            None => StyleProperty {
                key: raw,
                value: "",
            },
        })
        .collect();

    Ok(StyleDecl { id, properties })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(line: &str) -> EdgeDecl<'_> {
        match match_line(line) {
            LineMatch::Edge(edge) => edge,
            other => panic!("expected edge for `{line}`, got {other:?}"),
        }
    }

    fn first_matcher(line: &str) -> Option<&'static str> {
        LINE_MATCHERS
            .iter()
            .find(|matcher| (matcher.recognize)(line).is_match())
            .map(LineMatcher::name)
    }

    #[test]
    fn test_node_declaration_shapes() {
        let cases = [
            ("A[Start]", NodeShape::Rectangle, "Start"),
            ("A[[Sub routine]]", NodeShape::Rectangle, "Sub routine"),
            ("A((Hub))", NodeShape::Circle, "Hub"),
            ("A{ Decide? }", NodeShape::Diamond, "Decide?"),
            ("A[]", NodeShape::Rectangle, ""),
        ];

        for (line, shape, label) in cases {
            let LineMatch::Node(decl) = match_line(line) else {
                panic!("expected node declaration for `{line}`");
            };
            assert_eq!(decl.id(), "A");
            assert_eq!(decl.shape().shape(), shape, "{line}");
            assert_eq!(decl.shape().label(), label, "{line}");
        }
    }

    #[test]
    fn test_matcher_precedence() {
        assert_eq!(first_matcher("A[x]"), Some("node_declaration"));
        assert_eq!(first_matcher("A[x] --> B{y}"), Some("bracketed_edge"));
        assert_eq!(first_matcher("A -->|yes| B[y]"), Some("labelled_target_edge"));
        assert_eq!(first_matcher("A --> B"), Some("plain_edge"));
        assert_eq!(first_matcher("A --> B |late|"), Some("plain_edge"));
        assert_eq!(first_matcher("A[x] --> B"), Some("mixed_edge"));
        assert_eq!(first_matcher("A --> B((y))"), Some("mixed_edge"));
        assert_eq!(first_matcher("A -.-> B"), Some("dashed_edge"));
        assert_eq!(first_matcher("A -.- B"), Some("dotted_link"));
        assert_eq!(first_matcher("style A fill:#f9f"), Some("style_directive"));
        assert_eq!(first_matcher("A => B"), None);
    }

    #[test]
    fn test_edge_without_spaces() {
        let edge = edge("A-->B");
        assert_eq!(edge.source().id(), "A");
        assert_eq!(edge.target().id(), "B");
        assert_eq!(edge.kind(), EdgeKind::Arrow);
        assert_eq!(edge.label(), None);
    }

    #[test]
    fn test_arrow_label_beats_trailing_label() {
        assert_eq!(edge("A -->|first| B |second|").label(), Some("first"));
        assert_eq!(edge("A --> B |second|").label(), Some("second"));
        assert_eq!(edge("A -->| spaced | B").label(), Some("spaced"));
    }

    #[test]
    fn test_empty_label_is_absent() {
        assert_eq!(edge("A -->|| B").label(), None);
        assert_eq!(edge("A -->|  | B").label(), None);
    }

    #[test]
    fn test_edge_endpoint_shapes() {
        let edge = edge("A[Start] --> B{Ok?}");
        let source = edge.source().shape().unwrap();
        let target = edge.target().shape().unwrap();
        assert_eq!(source.shape(), NodeShape::Rectangle);
        assert_eq!(source.label(), "Start");
        assert_eq!(target.shape(), NodeShape::Diamond);
        assert_eq!(target.label(), "Ok?");
    }

    #[test]
    fn test_dashed_and_dotted_kinds() {
        assert_eq!(edge("A -.-> B").kind(), EdgeKind::Dashed);
        assert_eq!(edge("A -.->|maybe| B").label(), Some("maybe"));
        assert_eq!(edge("A -.- B").kind(), EdgeKind::Dotted);
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert_eq!(match_line("A --> B C"), LineMatch::NoMatch);
        assert_eq!(match_line("A[x] y"), LineMatch::NoMatch);
        assert_eq!(match_line("A --> "), LineMatch::NoMatch);
        assert_eq!(match_line("subgraph one"), LineMatch::NoMatch);
        assert_eq!(match_line("end"), LineMatch::NoMatch);
    }

    #[test]
    fn test_identifier_characters() {
        let edge = edge("node_1 --> Node2");
        assert_eq!(edge.source().id(), "node_1");
        assert_eq!(edge.target().id(), "Node2");
        assert_eq!(match_line("a-b --> c"), LineMatch::NoMatch);
    }

    #[test]
    fn test_style_directive_properties() {
        let LineMatch::Style(style) = match_line("style A fill:#f9f, stroke:#333,stroke-width:4px")
        else {
            panic!("expected style directive");
        };
        assert_eq!(style.id(), "A");

        let pairs: Vec<_> = style
            .properties()
            .iter()
            .map(|p| (p.key(), p.value()))
            .collect();
        assert_eq!(
            pairs,
            vec![("fill", "#f9f"), ("stroke", "#333"), ("stroke-width", "4px")]
        );
    }

    #[test]
    fn test_style_property_without_value() {
        let LineMatch::Style(style) = match_line("style B bold") else {
            panic!("expected style directive");
        };
        assert_eq!(style.properties()[0].key(), "bold");
        assert_eq!(style.properties()[0].value(), "");
    }
}
