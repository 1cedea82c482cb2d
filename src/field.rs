//! Field-name grammar using nom.
//!
//! Keyword arguments name their target with a compact micro-grammar:
//!
//! ```text
//! people.stuff.things__a__0___1__not_in
//! ──┬─── ──┬── ──┬─── ─────┬──── ───┬──
//!   │      │     │         │        └── Operator (optional, `not_` inverts)
//!   │      │     │         └── JSON path segments
//!   │      │     └── Column
//!   │      └── Table
//!   └── Schema
//! ```
//!
//! Path segments are split on `__`. A segment of digits is an array index,
//! a leading `_` makes it negative (`_1` is `-1`), and an empty segment
//! forces the following one to be read as a key (`____2` is the key `"2"`,
//! `_____3` is the key `"-3"`).

use std::fmt;
use std::str::FromStr;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{pair, preceded},
};
use serde::{Deserialize, Serialize};

use crate::error::{SqlError, SqlResult};

/// Separates a column from its JSON path and its operator.
pub const PATH_SEPARATOR: &str = "__";

/// Separates schema, table and column in a raw name.
pub const QUALIFIER: char = '.';

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position, negative counts from the end.
    Index(i64),
    /// Object key.
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for PathSegment {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

/// Split a field spec into its root column name and JSON path.
///
/// The input must already be stripped of schema and table qualifiers.
pub fn split(raw: &str) -> (String, Vec<PathSegment>) {
    let mut pieces = raw.split(PATH_SEPARATOR);
    let root = pieces.next().unwrap_or_default().to_string();

    let mut path = Vec::new();
    let mut forced = false;

    for piece in pieces {
        if forced {
            path.push(PathSegment::Key(escaped_key(piece)));
            forced = false;
        } else if piece.is_empty() {
            forced = true;
        } else {
            path.push(parse_segment(piece));
        }
    }

    if forced {
        path.push(PathSegment::Key(String::new()));
    }

    (root, path)
}

/// Split a dotted name into its qualifiers and final piece.
///
/// `"people.stuff.things"` gives `(Some("people"), Some("stuff"), "things")`.
pub fn qualify(raw: &str) -> (Option<&str>, Option<&str>, &str) {
    let mut pieces = raw.rsplitn(3, QUALIFIER);
    let name = pieces.next().unwrap_or_default();
    let table = pieces.next();
    let schema = pieces.next();
    (schema, table, name)
}

/// Classify one non-empty path piece.
fn parse_segment(piece: &str) -> PathSegment {
    match all_consuming(parse_index)(piece) {
        Ok((_, index)) => PathSegment::Index(index),
        Err(_) => PathSegment::Key(piece.to_string()),
    }
}

/// Parse `N` or `_N` into an index.
fn parse_index(input: &str) -> IResult<&str, i64> {
    alt((
        map_res(preceded(char('_'), digit1), |digits: &str| {
            digits.parse::<i64>().map(|index| -index)
        }),
        map_res(digit1, |digits: &str| digits.parse::<i64>()),
    ))(input)
}

/// A forced key reads a leading `_` as a minus sign.
fn escaped_key(piece: &str) -> String {
    match piece.strip_prefix('_') {
        Some(rest) => format!("-{rest}"),
        None => piece.to_string(),
    }
}

/// Comparison operators reachable from a keyword suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Null,
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Start,
    End,
    In,
    Has,
    Any,
    All,
}

impl Operator {
    /// Every operator, in suffix table order.
    pub const ALL: [Operator; 13] = [
        Operator::Null,
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Like,
        Operator::Start,
        Operator::End,
        Operator::In,
        Operator::Has,
        Operator::Any,
        Operator::All,
    ];

    /// The keyword suffix naming this operator.
    pub fn suffix(self) -> &'static str {
        match self {
            Operator::Null => "null",
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::Start => "start",
            Operator::End => "end",
            Operator::In => "in",
            Operator::Has => "has",
            Operator::Any => "any",
            Operator::All => "all",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Operator {
    type Err = SqlError;

    fn from_str(s: &str) -> SqlResult<Self> {
        all_consuming(parse_operator)(s)
            .map(|(_, operator)| operator)
            .map_err(|_| SqlError::keyword(s, "OP"))
    }
}

/// Parse an operator name.
fn parse_operator(input: &str) -> IResult<&str, Operator> {
    alt((
        value(Operator::Null, tag("null")),
        value(Operator::Eq, tag("eq")),
        value(Operator::Gte, tag("gte")),
        value(Operator::Gt, tag("gt")),
        value(Operator::Lte, tag("lte")),
        value(Operator::Lt, tag("lt")),
        value(Operator::Like, tag("like")),
        value(Operator::Start, tag("start")),
        value(Operator::End, tag("end")),
        value(Operator::In, tag("in")),
        value(Operator::Has, tag("has")),
        value(Operator::Any, tag("any")),
        value(Operator::All, tag("all")),
    ))(input)
}

/// Parse an operator suffix, with its optional `not_` prefix.
fn parse_suffix(input: &str) -> IResult<&str, (bool, Operator)> {
    pair(map(opt(tag("not_")), |not| not.is_some()), parse_operator)(input)
}

/// A keyword resolved into field, operator and inversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, still carrying qualifiers and path.
    pub field: String,
    pub operator: Operator,
    pub invert: bool,
}

impl FieldSpec {
    /// Resolve a keyword such as `stuff__a__not_in`.
    ///
    /// Only the last `__` piece is tested; anything that is not an operator
    /// stays part of the field and the operator defaults to `eq`.
    pub fn parse(key: &str) -> Self {
        if let Some((field, last)) = key.rsplit_once(PATH_SEPARATOR)
            && let Ok((_, (invert, operator))) = all_consuming(parse_suffix)(last)
        {
            return Self {
                field: field.to_string(),
                operator,
                invert,
            };
        }

        Self {
            field: key.to_string(),
            operator: Operator::Eq,
            invert: false,
        }
    }
}
