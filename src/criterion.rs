//! Binary comparisons.

use crate::dialect::{Dialect, fill};
use crate::error::{SqlError, SqlResult};
use crate::expression::{List, Value, as_column, as_value};
use crate::node::{Arg, Expression, Format, Node, Parens, Rendered, express};
use crate::terms::{Flags, Term, Terms};

/// Which side of a LIKE pattern gets a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    /// `%value%`
    Both,
    /// `value%`
    Start,
    /// `%value`
    End,
}

impl Affix {
    fn pattern(self, literal: &serde_json::Value, wildcard: &str) -> String {
        let text = match literal {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        match self {
            Affix::Both => format!("{wildcard}{text}{wildcard}"),
            Affix::Start => format!("{text}{wildcard}"),
            Affix::End => format!("{wildcard}{text}"),
        }
    }
}

/// Comparison operators and their templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Null,
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like(Affix),
    In,
    Contains,
    Lengths,
}

impl Comparison {
    /// Name used in error reports.
    pub fn name(self) -> &'static str {
        match self {
            Comparison::Null => "NULL",
            Comparison::Eq => "EQ",
            Comparison::Gt => "GT",
            Comparison::Gte => "GTE",
            Comparison::Lt => "LT",
            Comparison::Lte => "LTE",
            Comparison::Like(Affix::Both) => "LIKE",
            Comparison::Like(Affix::Start) => "START",
            Comparison::Like(Affix::End) => "END",
            Comparison::In => "IN",
            Comparison::Contains => "CONTAINS",
            Comparison::Lengths => "LENGTHS",
        }
    }

    fn operand(self, dialect: &Dialect) -> &str {
        match self {
            Comparison::Null => "%s IS NULL",
            Comparison::Eq => "%s=%s",
            Comparison::Gt => "%s>%s",
            Comparison::Gte => "%s>=%s",
            Comparison::Lt => "%s<%s",
            Comparison::Lte => "%s<=%s",
            Comparison::Like(_) => "%s LIKE %s",
            Comparison::In => "%s IN %s",
            Comparison::Contains => &dialect.contains,
            Comparison::Lengths => &dialect.lengths,
        }
    }

    fn inverse(self) -> Option<&'static str> {
        match self {
            Comparison::Null => Some("%s IS NOT NULL"),
            Comparison::Eq => Some("%s!=%s"),
            Comparison::Like(_) => Some("%s NOT LIKE %s"),
            Comparison::In => Some("%s NOT IN %s"),
            _ => None,
        }
    }

    /// Whether the operator has its own negative template.
    pub fn invertible(self) -> bool {
        self.inverse().is_some()
    }
}

/// `left <op> right`.
#[derive(Debug, Clone)]
pub struct Criterion {
    comparison: Comparison,
    left: Box<Node>,
    right: Box<Node>,
    invert: bool,
    rendered: Rendered,
}

impl Criterion {
    /// Build a comparison.
    ///
    /// Text on the left is parsed as a column. Literals on the right are
    /// bound as values, as JSON when the left side reads JSON.
    pub fn build(comparison: Comparison, left: Term, right: Term, flags: Flags) -> SqlResult<Self> {
        if flags.invert && !comparison.invertible() {
            return Err(SqlError::Invert {
                node: comparison.name(),
            });
        }

        let left = as_column(left, flags, comparison.name())?;
        let jsonify = flags.jsonify || matches!(&left, Node::Column(column) if column.is_json());

        let right = match (comparison, right) {
            (Comparison::In, Term::Literal(serde_json::Value::Array(items))) => {
                Node::List(List::new(items, jsonify))
            }
            (Comparison::In, Term::Literal(other)) => {
                return Err(SqlError::NotAList {
                    node: comparison.name(),
                    right: other.to_string(),
                });
            }
            (_, right) => as_value(right, jsonify),
        };

        Ok(Self {
            comparison,
            left: Box::new(left),
            right: Box::new(right),
            invert: flags.invert,
            rendered: Rendered::default(),
        })
    }

    /// Build from exactly two positional terms or one keyword pair.
    pub fn from_terms(comparison: Comparison, terms: Terms) -> SqlResult<Self> {
        let flags = terms.flags;
        let (left, right) = terms.pair(comparison.name())?;
        Self::build(comparison, left, right, flags)
    }

    pub fn null(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Null, left.into(), right.into(), Flags::default())
    }

    pub fn eq(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Eq, left.into(), right.into(), Flags::default())
    }

    pub fn gt(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Gt, left.into(), right.into(), Flags::default())
    }

    pub fn gte(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Gte, left.into(), right.into(), Flags::default())
    }

    pub fn lt(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Lt, left.into(), right.into(), Flags::default())
    }

    pub fn lte(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Lte, left.into(), right.into(), Flags::default())
    }

    /// Substring match.
    pub fn like(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Like(Affix::Both), left.into(), right.into(), Flags::default())
    }

    /// Prefix match.
    pub fn start(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Like(Affix::Start), left.into(), right.into(), Flags::default())
    }

    /// Suffix match.
    pub fn end(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Like(Affix::End), left.into(), right.into(), Flags::default())
    }

    pub fn is_in(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::In, left.into(), right.into(), Flags::default())
    }

    pub fn contains(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Contains, left.into(), right.into(), Flags::default())
    }

    pub fn lengths(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(Comparison::Lengths, left.into(), right.into(), Flags::default())
    }

    /// Switch to the negative template.
    pub fn invert(mut self) -> SqlResult<Self> {
        if !self.comparison.invertible() {
            return Err(SqlError::Invert {
                node: self.comparison.name(),
            });
        }
        self.invert = !self.invert;
        Ok(self)
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn left(&self) -> &Node {
        &self.left
    }

    pub fn right(&self) -> &Node {
        &self.right
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    fn template<'a>(&self, dialect: &'a Dialect) -> &'a str {
        match self.comparison.inverse() {
            Some(inverse) if self.invert => inverse,
            _ => self.comparison.operand(dialect),
        }
    }

    /// `IS NULL` when the requested flag and inversion differ.
    fn generate_null(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        express(&mut self.left, &mut sql, &mut args, dialect, format, Parens::Auto);

        let wanted = match self.right.as_ref() {
            Node::Value(value) => truthy(value.value()),
            _ => true,
        };
        let template = if wanted == self.invert {
            "%s IS NOT NULL"
        } else {
            "%s IS NULL"
        };

        self.rendered.set(fill(template, &[&sql.concat()]), args);
    }
}

impl Expression for Criterion {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        if self.comparison == Comparison::Null {
            self.generate_null(dialect, format);
            return;
        }

        if self.comparison == Comparison::In && self.right.is_empty() {
            let mut constant = Value::new(self.invert);
            constant.generate(dialect, format);
            self.rendered
                .set(constant.sql().to_string(), constant.args().to_vec());
            return;
        }

        let nested = format.nested();
        let mut args: Vec<Arg> = Vec::new();

        let mut left = Vec::new();
        express(&mut self.left, &mut left, &mut args, dialect, nested, Parens::Auto);

        let parens = if self.comparison == Comparison::In || !self.right.is_value() {
            Parens::Always
        } else {
            Parens::Never
        };

        let pattern = match (self.comparison, self.right.as_ref()) {
            (Comparison::Like(affix), Node::Value(value)) => Some(Node::Value(Value::with_jsonify(
                affix.pattern(value.value(), &dialect.wildcard),
                value.jsonify(),
            ))),
            _ => None,
        };

        let mut right = Vec::new();
        match pattern {
            Some(mut pattern) => express(&mut pattern, &mut right, &mut args, dialect, nested, parens),
            None => express(&mut self.right, &mut right, &mut args, dialect, nested, parens),
        }

        let sql = fill(self.template(dialect), &[&left.concat(), &right.concat()]);
        self.rendered.set(sql, args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        match self.comparison {
            Comparison::Null => 1,
            _ => self.left.len() + self.right.len(),
        }
    }
}

/// Truthiness of a JSON literal: empty, zero, false and null are false.
pub(crate) fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
    }
}
