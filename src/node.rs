//! The node contract shared by every renderable piece of SQL.
//!
//! Every node owns a [`Rendered`] cache that `generate()` overwrites from the
//! node's current children. Composite nodes build their text through
//! [`express`], which keeps bound arguments in the same left-to-right order
//! as the placeholders in the text.

use crate::clause::Clause;
use crate::criteria::{Criteria, Sets};
use crate::criterion::Criterion;
use crate::dialect::Dialect;
use crate::expression::{As, Assign, ColumnName, List, Name, Not, Order, TableName, Value};
use crate::statement::Statement;

/// A bound parameter.
pub type Arg = serde_json::Value;

/// Layout parameters threaded through `generate()`.
///
/// `indent == 0` renders on a single line. Otherwise `count` is the nesting
/// depth and each level indents by `indent` copies of `pad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub indent: usize,
    pub count: usize,
    pub pad: char,
}

impl Default for Format {
    fn default() -> Self {
        Self::compact()
    }
}

impl Format {
    /// Single-line output.
    pub const fn compact() -> Self {
        Self {
            indent: 0,
            count: 0,
            pad: ' ',
        }
    }

    /// Multi-line output, `indent` pads per level.
    pub const fn pretty(indent: usize) -> Self {
        Self {
            indent,
            count: 0,
            pad: ' ',
        }
    }

    pub const fn with_pad(self, pad: char) -> Self {
        Self { pad, ..self }
    }

    pub const fn is_pretty(&self) -> bool {
        self.indent > 0
    }

    /// One level deeper.
    pub const fn nested(self) -> Self {
        Self {
            count: self.count + 1,
            ..self
        }
    }

    fn margin(&self, depth: usize) -> String {
        self.pad.to_string().repeat(self.indent * depth)
    }

    /// Padding for this depth.
    pub fn current(&self) -> String {
        self.margin(self.count)
    }

    /// Padding for one level.
    pub fn unit(&self) -> String {
        self.margin(1)
    }

    /// Join text for siblings rendered at this depth.
    ///
    /// Pretty mode moves the delimiter's trailing space onto a new line.
    pub fn delimiter(&self, delimiter: &str) -> String {
        if self.is_pretty() {
            format!("{}\n{}", delimiter.trim_end(), self.current())
        } else {
            delimiter.to_string()
        }
    }

    /// Parenthesize a body rendered at this depth.
    ///
    /// The closing parenthesis sits one level shallower than the body.
    pub fn wrap(&self, body: &str) -> String {
        if self.is_pretty() {
            format!(
                "(\n{}{body}\n{})",
                self.current(),
                self.margin(self.count.saturating_sub(1))
            )
        } else {
            format!("({body})")
        }
    }
}

/// Rendered text and bound arguments.
///
/// Cloning yields an empty cache, so copied trees always re-render.
#[derive(Debug, Default, PartialEq)]
pub struct Rendered {
    sql: Option<String>,
    args: Vec<Arg>,
}

impl Clone for Rendered {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl Rendered {
    /// Rendered text, empty before the first `generate()`.
    pub fn sql(&self) -> &str {
        self.sql.as_deref().unwrap_or_default()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Whether `generate()` has run since construction or cloning.
    pub fn is_rendered(&self) -> bool {
        self.sql.is_some()
    }

    pub(crate) fn set(&mut self, sql: String, args: Vec<Arg>) {
        self.sql = Some(sql);
        self.args = args;
    }

    /// Number of placeholders in the rendered text.
    pub fn placeholders(&self, dialect: &Dialect) -> usize {
        self.sql().matches(dialect.placeholder.as_str()).count()
    }

    /// Interpolate arguments into the text for logs and error reports.
    ///
    /// Never execute the result; pass `sql()` and `args()` to the driver.
    pub fn inline(&self, dialect: &Dialect) -> String {
        let mut pieces = self.sql().split(dialect.placeholder.as_str());
        let mut out = pieces.next().unwrap_or_default().to_string();
        let mut args = self.args.iter();
        for piece in pieces {
            match args.next() {
                Some(Arg::String(text)) => out.push_str(&dialect.literal(text)),
                Some(Arg::Null) => out.push_str("NULL"),
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str(&dialect.placeholder),
            }
            out.push_str(piece);
        }
        out
    }
}

/// Rendering behaviour shared by every node.
pub trait Expression {
    /// Recompute `sql` and `args` from the current children.
    fn generate(&mut self, dialect: &Dialect, format: Format);

    fn rendered(&self) -> &Rendered;

    /// Structural length; a zero-length node renders nothing inside its parent.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sql(&self) -> &str {
        self.rendered().sql()
    }

    fn args(&self) -> &[Arg] {
        self.rendered().args()
    }

    /// Render on one line and return the text and arguments.
    fn render(&mut self, dialect: &Dialect) -> (String, Vec<Arg>) {
        self.generate(dialect, Format::compact());
        (self.sql().to_string(), self.args().to_vec())
    }

    /// Render across lines, `indent` spaces per level.
    fn render_pretty(&mut self, dialect: &Dialect, indent: usize) -> (String, Vec<Arg>) {
        self.generate(dialect, Format::pretty(indent));
        (self.sql().to_string(), self.args().to_vec())
    }
}

/// Verbatim SQL with its own arguments.
#[derive(Debug, Clone, Default)]
pub struct Raw {
    text: String,
    values: Vec<Arg>,
    rendered: Rendered,
}

impl Raw {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_args(text, Vec::new())
    }

    pub fn with_args(text: impl Into<String>, values: Vec<Arg>) -> Self {
        Self {
            text: text.into(),
            values,
            rendered: Rendered::default(),
        }
    }
}

impl Expression for Raw {
    fn generate(&mut self, _dialect: &Dialect, _format: Format) {
        self.rendered.set(self.text.clone(), self.values.clone());
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        usize::from(!self.text.is_empty())
    }
}

/// Any node in a SQL tree.
#[derive(Debug, Clone)]
pub enum Node {
    Raw(Raw),
    Value(Value),
    List(List),
    Not(Not),
    Name(Name),
    Table(TableName),
    Column(ColumnName),
    As(As),
    Order(Order),
    Assign(Assign),
    Criterion(Criterion),
    Criteria(Criteria),
    Sets(Sets),
    Clause(Clause),
    Statement(Statement),
}

macro_rules! each_node {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::Raw($inner) => $body,
            Node::Value($inner) => $body,
            Node::List($inner) => $body,
            Node::Not($inner) => $body,
            Node::Name($inner) => $body,
            Node::Table($inner) => $body,
            Node::Column($inner) => $body,
            Node::As($inner) => $body,
            Node::Order($inner) => $body,
            Node::Assign($inner) => $body,
            Node::Criterion($inner) => $body,
            Node::Criteria($inner) => $body,
            Node::Sets($inner) => $body,
            Node::Clause($inner) => $body,
            Node::Statement($inner) => $body,
        }
    };
}

impl Expression for Node {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        each_node!(self, node => node.generate(dialect, format))
    }

    fn rendered(&self) -> &Rendered {
        each_node!(self, node => node.rendered())
    }

    fn len(&self) -> usize {
        each_node!(self, node => node.len())
    }
}

impl Node {
    pub fn is_statement(&self) -> bool {
        matches!(self, Node::Statement(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Node::Value(_))
    }
}

macro_rules! node_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

node_from!(
    Raw(Raw),
    Value(Value),
    List(List),
    Not(Not),
    Name(Name),
    Table(TableName),
    Column(ColumnName),
    As(As),
    Order(Order),
    Assign(Assign),
    Criterion(Criterion),
    Criteria(Criteria),
    Sets(Sets),
    Clause(Clause),
    Statement(Statement),
);

/// Parenthesization requested by a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parens {
    /// Only nested statements.
    Auto,
    Always,
    Never,
}

/// Render `node` at `format` and append its text and arguments.
///
/// Zero-length nodes contribute nothing.
pub fn express(
    node: &mut Node,
    sql: &mut Vec<String>,
    args: &mut Vec<Arg>,
    dialect: &Dialect,
    format: Format,
    parens: Parens,
) {
    if node.is_empty() {
        return;
    }

    node.generate(dialect, format);

    let wrap = match parens {
        Parens::Auto => node.is_statement(),
        Parens::Always => true,
        Parens::Never => false,
    };

    if wrap {
        sql.push(format.wrap(node.sql()));
    } else {
        sql.push(node.sql().to_string());
    }
    args.extend_from_slice(node.args());
}

/// [`express`] over a sequence, in order.
pub fn express_each(
    nodes: &mut [Node],
    sql: &mut Vec<String>,
    args: &mut Vec<Arg>,
    dialect: &Dialect,
    format: Format,
    parens: Parens,
) {
    for node in nodes {
        express(node, sql, args, dialect, format, parens);
    }
}
