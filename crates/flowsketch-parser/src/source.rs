//! Source preprocessing: significant lines and the optional header.
//!
//! The flowchart language is strictly line oriented. This module turns raw
//! text into [`SourceLine`]s (blank lines and `%%` comments removed, each
//! line trimmed and tagged with its location) and recognizes the leading
//! `graph TD` / `flowchart LR` declaration.

use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::opt,
    token::take_while,
};

use crate::{error::Location, matchers::IResult, span::Span};

/// Marker that starts a comment line.
pub(crate) const COMMENT_MARKER: &str = "%%";

/// Flow direction named in the diagram header.
///
/// Layout is always computed top-down; the direction is reported so callers
/// can decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `TD` or `TB`
    TopDown,
    /// `BT`
    BottomUp,
    /// `LR`
    LeftRight,
    /// `RL`
    RightLeft,
}

impl Direction {
    /// Parses a direction token, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_parser::Direction;
    ///
    /// assert_eq!(Direction::from_token("td"), Some(Direction::TopDown));
    /// assert_eq!(Direction::from_token("TB"), Some(Direction::TopDown));
    /// assert_eq!(Direction::from_token("up"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TD" | "TB" => Some(Direction::TopDown),
            "BT" => Some(Direction::BottomUp),
            "LR" => Some(Direction::LeftRight),
            "RL" => Some(Direction::RightLeft),
            _ => None,
        }
    }
}

/// A trimmed, non-blank, non-comment line of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'src> {
    text: &'src str,
    number: usize,
    column: usize,
    span: Span,
}

impl<'src> SourceLine<'src> {
    /// The line content without surrounding whitespace
    pub(crate) fn text(&self) -> &'src str {
        self.text
    }

    /// 1-based line number
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    /// Location of the trimmed content, for diagnostics
    pub(crate) fn location(&self) -> Location {
        Location::new(self.number, self.column, self.span)
    }
}

/// Splits `source` into its significant lines.
pub(crate) fn significant_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for (index, raw) in source.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw.len();

        let content = raw.trim_end_matches(['\n', '\r']);
        let text = content.trim();
        if text.is_empty() || text.starts_with(COMMENT_MARKER) {
            continue;
        }

        let leading = content.len() - content.trim_start().len();
        let start = line_start + leading;
        lines.push(SourceLine {
            text,
            number: index + 1,
            column: content[..leading].chars().count() + 1,
            span: Span::new(start..start + text.len()),
        });
    }

    lines
}

/// Strips the header declaration if it is the first significant line.
///
/// Returns the declared direction (if a header was found) and the lines
/// that follow it.
pub(crate) fn strip_header<'a, 'src>(
    lines: &'a [SourceLine<'src>],
) -> (Option<Direction>, &'a [SourceLine<'src>]) {
    match lines.split_first() {
        Some((first, rest)) => match parse_header(first.text()) {
            Some(direction) => (Some(direction), rest),
            None => (None, lines),
        },
        None => (None, lines),
    }
}

/// Recognizes `graph TD`, `flowchart lr;` and similar, case-insensitively.
fn parse_header(line: &str) -> Option<Direction> {
    let mut input = line;
    let direction = header(&mut input).ok()?;
    input.is_empty().then_some(direction)
}

fn header(input: &mut &str) -> IResult<Direction> {
    (header_keyword, space1, direction_token, header_terminator)
        .map(|(_, _, direction, _)| direction)
        .parse_next(input)
}

fn header_keyword<'s>(input: &mut &'s str) -> IResult<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic())
        .verify(|word: &str| {
            word.eq_ignore_ascii_case("graph") || word.eq_ignore_ascii_case("flowchart")
        })
        .parse_next(input)
}

fn direction_token(input: &mut &str) -> IResult<Direction> {
    take_while(1.., |c: char| c.is_ascii_alphabetic())
        .verify_map(Direction::from_token)
        .parse_next(input)
}

fn header_terminator(input: &mut &str) -> IResult<()> {
    (space0, opt(';'), space0).void().parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_lines_skip_blank_and_comments() {
        let source = "graph TD\n\n  %% a comment\n  A --> B\r\n\tB[Box]\n";
        let lines = significant_lines(source);

        let texts: Vec<_> = lines.iter().map(SourceLine::text).collect();
        assert_eq!(texts, vec!["graph TD", "A --> B", "B[Box]"]);

        let numbers: Vec<_> = lines.iter().map(SourceLine::number).collect();
        assert_eq!(numbers, vec![1, 4, 5]);
    }

    #[test]
    fn test_source_line_location() {
        let source = "graph TD\n   A --> B\n";
        let lines = significant_lines(source);
        let location = lines[1].location();

        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 4);
        assert_eq!(&source[location.span().start()..location.span().end()], "A --> B");
    }

    #[test]
    fn test_header_forms() {
        assert_eq!(parse_header("graph TD"), Some(Direction::TopDown));
        assert_eq!(parse_header("flowchart LR"), Some(Direction::LeftRight));
        assert_eq!(parse_header("FLOWCHART bt;"), Some(Direction::BottomUp));
        assert_eq!(parse_header("Graph   rl"), Some(Direction::RightLeft));
        assert_eq!(parse_header("graph\tTB ; "), Some(Direction::TopDown));
    }

    #[test]
    fn test_non_headers() {
        assert_eq!(parse_header("graph"), None);
        assert_eq!(parse_header("graphTD"), None);
        assert_eq!(parse_header("graph XY"), None);
        assert_eq!(parse_header("sequenceDiagram LR"), None);
        assert_eq!(parse_header("graph TD A-->B"), None);
        assert_eq!(parse_header("A --> B"), None);
    }

    #[test]
    fn test_strip_header_only_first_line() {
        let lines = significant_lines("A --> B\ngraph TD\n");
        let (direction, rest) = strip_header(&lines);
        assert_eq!(direction, None);
        assert_eq!(rest.len(), 2);

        let lines = significant_lines("%% title\nflowchart TB\nA --> B\n");
        let (direction, rest) = strip_header(&lines);
        assert_eq!(direction, Some(Direction::TopDown));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text(), "A --> B");
    }
}
