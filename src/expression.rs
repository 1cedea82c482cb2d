//! Values, identifiers and pairings.

use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::field::{self, PathSegment};
use crate::node::{Arg, Expression, Format, Node, Parens, Raw, Rendered, express};
use crate::terms::{Flags, Term};

/// A bound literal.
///
/// Anything other than a bool, number or string is bound as JSON text.
#[derive(Debug, Clone)]
pub struct Value {
    value: serde_json::Value,
    jsonify: bool,
    rendered: Rendered,
}

impl Value {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self::with_jsonify(value, false)
    }

    /// Always bind as JSON text.
    pub fn json(value: impl Into<serde_json::Value>) -> Self {
        Self::with_jsonify(value, true)
    }

    pub fn with_jsonify(value: impl Into<serde_json::Value>, jsonify: bool) -> Self {
        let value = value.into();
        let scalar = matches!(
            value,
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) | serde_json::Value::String(_)
        );
        Self {
            value,
            jsonify: jsonify || !scalar,
            rendered: Rendered::default(),
        }
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    pub fn jsonify(&self) -> bool {
        self.jsonify
    }
}

impl Expression for Value {
    /// JSON text is compact serde_json; the dialect's JSON cast normalizes spacing.
    fn generate(&mut self, dialect: &Dialect, _format: Format) {
        if self.jsonify {
            self.rendered.set(
                dialect.json_cast(&dialect.placeholder),
                vec![Arg::String(self.value.to_string())],
            );
        } else {
            self.rendered
                .set(dialect.placeholder.clone(), vec![self.value.clone()]);
        }
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        1
    }
}

/// Comma-joined sequence, for IN lists, VALUES rows and name lists.
#[derive(Debug, Clone, Default)]
pub struct List {
    items: Vec<Node>,
    rendered: Rendered,
}

impl List {
    /// Literals become values sharing `jsonify`; nodes are kept.
    pub fn new<I, T>(items: I, jsonify: bool) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        Self::from_nodes(
            items
                .into_iter()
                .map(|item| as_value(item.into(), jsonify))
                .collect(),
        )
    }

    /// Strings become quoted names; nodes are kept.
    pub fn names<I, T>(items: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        let items = items
            .into_iter()
            .map(|item| as_name(item.into(), "NAMES"))
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(Self::from_nodes(items))
    }

    pub fn from_nodes(items: Vec<Node>) -> Self {
        Self {
            items,
            rendered: Rendered::default(),
        }
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

impl Expression for List {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        for item in &mut self.items {
            express(item, &mut sql, &mut args, dialect, format, Parens::Auto);
        }

        self.rendered.set(sql.join(&format.delimiter(",")), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Negation by prefix.
#[derive(Debug, Clone)]
pub struct Not {
    expression: Box<Node>,
    rendered: Rendered,
}

impl Not {
    /// Literals are negated as values.
    pub fn new(expression: impl Into<Term>) -> Self {
        Self {
            expression: Box::new(as_value(expression.into(), false)),
            rendered: Rendered::default(),
        }
    }

    pub fn expression(&self) -> &Node {
        &self.expression
    }
}

impl Expression for Not {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        express(&mut self.expression, &mut sql, &mut args, dialect, format, Parens::Auto);

        self.rendered.set(format!("NOT {}", sql.concat()), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.expression.len()
    }
}

/// A quoted identifier.
#[derive(Debug, Clone)]
pub struct Name {
    name: String,
    rendered: Rendered,
}

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rendered: Rendered::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expression for Name {
    fn generate(&mut self, dialect: &Dialect, _format: Format) {
        self.rendered.set(dialect.quote(&self.name), Vec::new());
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        usize::from(!self.name.is_empty())
    }
}

/// A table, optionally schema-qualified, optionally led by a keyword.
#[derive(Debug, Clone)]
pub struct TableName {
    name: String,
    schema: Option<Box<Node>>,
    prefix: Option<String>,
    rendered: Rendered,
}

impl TableName {
    /// Parse `table` or `schema.table`.
    pub fn parse(raw: &str) -> Self {
        match raw.rsplit_once(field::QUALIFIER) {
            Some((schema, name)) => Self::new(name).with_schema(Name::new(schema)),
            None => Self::new(raw),
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            prefix: None,
            rendered: Rendered::default(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<Node>) -> Self {
        self.schema = Some(Box::new(schema.into()));
        self
    }

    /// Keyword rendered before the table, such as `INTO`.
    ///
    /// An empty prefix renders nothing but still lays out like a clause.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&Node> {
        self.schema.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl Expression for TableName {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        if let Some(schema) = &mut self.schema {
            express(schema, &mut sql, &mut args, dialect, Format::compact(), Parens::Auto);
        }
        sql.push(dialect.quote(&self.name));

        let table = sql.join(&dialect.separator);

        let text = match self.prefix.as_deref() {
            None => table,
            Some("") if format.is_pretty() => format!("{}{table}", format.unit()),
            Some("") => table,
            Some(prefix) if format.is_pretty() => {
                format!("{prefix}\n{}{table}", format.nested().current())
            }
            Some(prefix) => format!("{prefix} {table}"),
        };

        self.rendered.set(text, args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        usize::from(!self.name.is_empty())
    }
}

/// Construction options for [`ColumnName`].
#[derive(Debug, Clone, Default)]
pub struct ColumnOptions {
    /// Table node, overriding any table in the raw name.
    pub table: Option<Node>,
    /// Schema node for a table taken from the raw name.
    pub schema: Option<Node>,
    /// Cast the whole column to JSON.
    pub jsonify: bool,
    /// Use the name as-is, without path splitting.
    pub extracted: bool,
}

/// A column, optionally qualified, optionally reaching into JSON.
#[derive(Debug, Clone)]
pub struct ColumnName {
    name: String,
    table: Option<Box<Node>>,
    path: Vec<PathSegment>,
    jsonify: bool,
    rendered: Rendered,
}

impl ColumnName {
    /// Parse `[[schema.]table.]column[__path...]`.
    pub fn parse(raw: &str) -> Self {
        Self::with_options(raw, ColumnOptions::default())
    }

    pub fn with_options(raw: &str, options: ColumnOptions) -> Self {
        let (schema, table, column) = field::qualify(raw);

        let (name, path) = if options.extracted {
            (column.to_string(), Vec::new())
        } else {
            field::split(column)
        };

        let table = match (options.table, table) {
            (Some(table), _) => Some(table),
            (None, Some(table)) => {
                let table = TableName::new(table);
                let table = match (options.schema, schema) {
                    (Some(schema), _) => table.with_schema(schema),
                    (None, Some(schema)) => table.with_schema(Name::new(schema)),
                    (None, None) => table,
                };
                Some(Node::Table(table))
            }
            (None, None) => None,
        };

        Self {
            name,
            table: table.map(Box::new),
            path,
            jsonify: options.jsonify,
            rendered: Rendered::default(),
        }
    }

    /// A column with an already split path.
    pub fn with_path(name: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            name: name.into(),
            table: None,
            path,
            jsonify: false,
            rendered: Rendered::default(),
        }
    }

    pub fn with_table(mut self, table: impl Into<Node>) -> Self {
        self.table = Some(Box::new(table.into()));
        self
    }

    pub fn with_jsonify(mut self, jsonify: bool) -> Self {
        self.jsonify = jsonify;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> Option<&Node> {
        self.table.as_deref()
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn jsonify(&self) -> bool {
        self.jsonify
    }

    /// Whether values compared against this column must be JSON.
    pub fn is_json(&self) -> bool {
        self.jsonify || !self.path.is_empty()
    }
}

impl Expression for ColumnName {
    fn generate(&mut self, dialect: &Dialect, _format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        if let Some(table) = &mut self.table {
            express(table, &mut sql, &mut args, dialect, Format::compact(), Parens::Auto);
        }

        if self.name == "*" {
            sql.push(self.name.clone());
        } else {
            sql.push(dialect.quote(&self.name));
        }

        let mut column = sql.join(&dialect.separator);

        if self.jsonify {
            column = dialect.json_cast(&column);
        }

        if !self.path.is_empty() {
            column = dialect.extract(&column);
            args.push(Arg::String(dialect.walk(&self.path)));
        }

        self.rendered.set(column, args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        usize::from(!self.name.is_empty())
    }
}

/// `expression AS label`.
#[derive(Debug, Clone)]
pub struct As {
    label: Box<Node>,
    expression: Box<Node>,
    rendered: Rendered,
}

impl As {
    pub fn new(label: &str, expression: impl Into<Node>) -> Self {
        Self::with_label(Name::new(label), expression)
    }

    pub fn with_label(label: impl Into<Node>, expression: impl Into<Node>) -> Self {
        Self {
            label: Box::new(label.into()),
            expression: Box::new(expression.into()),
            rendered: Rendered::default(),
        }
    }
}

impl Expression for As {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();
        let nested = format.nested();

        express(&mut self.expression, &mut sql, &mut args, dialect, nested, Parens::Auto);
        express(&mut self.label, &mut sql, &mut args, dialect, nested, Parens::Never);

        self.rendered.set(sql.join(" AS "), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.label.len() + self.expression.len()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Accepts `-1`/`1` or `"ASC"`/`"DESC"` in any case.
    pub fn from_literal(literal: &serde_json::Value) -> SqlResult<Self> {
        match literal {
            serde_json::Value::Number(n) if n.as_i64() == Some(-1) => Ok(Direction::Asc),
            serde_json::Value::Number(n) if n.as_i64() == Some(1) => Ok(Direction::Desc),
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("asc") => Ok(Direction::Asc),
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("desc") => Ok(Direction::Desc),
            other => Err(SqlError::Order(other.to_string())),
        }
    }
}

/// An expression with an optional sort direction.
#[derive(Debug, Clone)]
pub struct Order {
    expression: Box<Node>,
    direction: Option<Direction>,
    rendered: Rendered,
}

impl Order {
    /// Strings are parsed as column names.
    pub fn new(expression: impl Into<Term>, direction: Option<Direction>) -> SqlResult<Self> {
        Ok(Self {
            expression: Box::new(as_column(expression.into(), Flags::default(), "ORDER")?),
            direction,
            rendered: Rendered::default(),
        })
    }

    pub fn asc(expression: impl Into<Term>) -> SqlResult<Self> {
        Self::new(expression, Some(Direction::Asc))
    }

    pub fn desc(expression: impl Into<Term>) -> SqlResult<Self> {
        Self::new(expression, Some(Direction::Desc))
    }

    /// Keyword form, `column = direction`.
    pub fn pair(column: &str, direction: Term) -> SqlResult<Self> {
        let direction = match direction {
            Term::Literal(literal) => Direction::from_literal(&literal)?,
            Term::Node(node) => return Err(SqlError::Order(format!("{node:?}"))),
        };
        Self::new(column, Some(direction))
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

impl Expression for Order {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        if !self.expression.is_empty() {
            express(&mut self.expression, &mut sql, &mut args, dialect, format, Parens::Auto);
            if let Some(direction) = self.direction {
                sql.push(direction.keyword().to_string());
            }
        }

        self.rendered.set(sql.join(" "), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.expression.len()
    }
}

/// `column=expression`, for SET.
#[derive(Debug, Clone)]
pub struct Assign {
    column: Box<Node>,
    expression: Box<Node>,
    rendered: Rendered,
}

impl Assign {
    /// Literals are bound as values.
    pub fn new(column: &str, expression: impl Into<Term>) -> Self {
        Self {
            column: Box::new(Node::Name(Name::new(column))),
            expression: Box::new(as_value(expression.into(), false)),
            rendered: Rendered::default(),
        }
    }
}

impl Expression for Assign {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();
        let nested = format.nested();

        express(&mut self.column, &mut sql, &mut args, dialect, nested, Parens::Never);
        express(&mut self.expression, &mut sql, &mut args, dialect, nested, Parens::Auto);

        self.rendered.set(sql.join("="), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.column.len() + self.expression.len()
    }
}

/// Keep nodes, wrap literals as values.
pub(crate) fn as_value(term: Term, jsonify: bool) -> Node {
    match term {
        Term::Node(node) => node,
        Term::Literal(literal) => Node::Value(Value::with_jsonify(literal, jsonify)),
    }
}

/// Keep nodes, parse strings as column names.
pub(crate) fn as_column(term: Term, flags: Flags, node: &'static str) -> SqlResult<Node> {
    match term {
        Term::Node(node) => Ok(node),
        Term::Literal(serde_json::Value::String(raw)) => Ok(Node::Column(ColumnName::with_options(
            &raw,
            ColumnOptions {
                jsonify: flags.jsonify,
                extracted: flags.extracted,
                ..ColumnOptions::default()
            },
        ))),
        Term::Literal(other) => Err(SqlError::field(node, &other)),
    }
}

/// Keep nodes, parse strings as table names.
pub(crate) fn as_table(term: Term, node: &'static str) -> SqlResult<Node> {
    match term {
        Term::Node(node) => Ok(node),
        Term::Literal(serde_json::Value::String(raw)) => Ok(Node::Table(TableName::parse(&raw))),
        Term::Literal(other) => Err(SqlError::field(node, &other)),
    }
}

/// Keep nodes, quote strings as names.
pub(crate) fn as_name(term: Term, node: &'static str) -> SqlResult<Node> {
    match term {
        Term::Node(node) => Ok(node),
        Term::Literal(serde_json::Value::String(raw)) => Ok(Node::Name(Name::new(raw))),
        Term::Literal(other) => Err(SqlError::field(node, &other)),
    }
}

/// Keep nodes, pass strings through as raw SQL.
pub(crate) fn as_raw(term: Term, node: &'static str) -> SqlResult<Node> {
    match term {
        Term::Node(node) => Ok(node),
        Term::Literal(serde_json::Value::String(raw)) => Ok(Node::Raw(Raw::new(raw))),
        Term::Literal(other) => Err(SqlError::field(node, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dialect() -> Dialect {
        Dialect::default()
    }

    #[test]
    fn test_value() {
        let mut value = Value::new("unit");
        assert_eq!(value.len(), 1);
        assert_eq!(value.render(&dialect()), ("%s".to_string(), vec![json!("unit")]));

        let mut value = Value::json("unit");
        assert_eq!(
            value.render(&dialect()),
            ("JSON(%s)".to_string(), vec![json!("\"unit\"")])
        );
    }

    #[test]
    fn test_value_jsonify_default() {
        assert!(!Value::new(true).jsonify());
        assert!(!Value::new(1.5).jsonify());
        assert!(Value::new(json!(null)).jsonify());
        assert!(Value::new(json!({"a": 1})).jsonify());

        let mut value = Value::new(json!(["mai", "goats"]));
        assert_eq!(
            value.render(&dialect()),
            ("JSON(%s)".to_string(), vec![json!("[\"mai\",\"goats\"]")])
        );
    }

    #[test]
    fn test_list() {
        let mut list = List::new(vec![1, 2], false);
        assert_eq!(list.len(), 2);
        assert_eq!(list.render(&dialect()), ("%s,%s".to_string(), vec![json!(1), json!(2)]));

        let mut list = List::new(vec![1, 2], true);
        list.generate(&dialect(), Format::pretty(2).nested());
        assert_eq!(list.sql(), "JSON(%s),\n  JSON(%s)");
        assert_eq!(list.args(), &[json!("1"), json!("2")]);

        list.generate(&dialect(), Format::pretty(2));
        assert_eq!(list.sql(), "JSON(%s),\nJSON(%s)");
    }

    #[test]
    fn test_names() {
        let mut names = List::names(["stuff", "things"]).unwrap();
        assert_eq!(names.render(&dialect()).0, "`stuff`,`things`");

        assert!(List::names(vec![json!(1)]).is_err());
    }

    #[test]
    fn test_not() {
        let mut not = Not::new(Raw::with_args("unit", vec![json!("test")]));
        assert_eq!(not.render(&dialect()), ("NOT unit".to_string(), vec![json!("test")]));

        let mut not = Not::new(true);
        assert_eq!(not.render(&dialect()), ("NOT %s".to_string(), vec![json!(true)]));
        not.generate(&dialect(), Format::pretty(2));
        assert_eq!(not.sql(), "NOT %s");
    }

    #[test]
    fn test_name() {
        let mut name = Name::new("people");
        assert_eq!(name.render(&dialect()).0, "`people`");
        assert_eq!(Name::new("").len(), 0);
    }

    #[test]
    fn test_table_name() {
        let mut table = TableName::parse("people.stuff");
        assert_eq!(table.name(), "stuff");
        assert_eq!(table.render(&dialect()).0, "`people`.`stuff`");

        let mut table = TableName::parse("people.stuff").with_prefix("things");
        assert_eq!(table.render(&dialect()).0, "things `people`.`stuff`");
        table.generate(&dialect(), Format::pretty(2));
        assert_eq!(table.sql(), "things\n  `people`.`stuff`");

        let mut table = TableName::parse("people.stuff").with_prefix("");
        assert_eq!(table.render(&dialect()).0, "`people`.`stuff`");
        table.generate(&dialect(), Format::pretty(2));
        assert_eq!(table.sql(), "  `people`.`stuff`");
    }

    #[test]
    fn test_table_name_schema_node() {
        let mut table = TableName::new("stuff").with_schema(Raw::with_args("test", vec![json!("unit")]));
        assert_eq!(
            table.render(&dialect()),
            ("test.`stuff`".to_string(), vec![json!("unit")])
        );
    }

    #[test]
    fn test_column_name() {
        let mut column = ColumnName::parse("people.stuff.things__a__0___1____2_____3");
        assert_eq!(column.name(), "things");
        assert_eq!(
            column.path(),
            &[
                PathSegment::from("a"),
                PathSegment::from(0),
                PathSegment::from(-1),
                PathSegment::from("2"),
                PathSegment::from("-3"),
            ]
        );
        assert!(column.is_json());
        assert!(!column.jsonify());

        assert_eq!(
            column.render(&dialect()),
            (
                "`people`.`stuff`.`things`#>>%s".to_string(),
                vec![json!("$.\"a\"[0][-1].\"2\".\"-3\"")]
            )
        );
    }

    #[test]
    fn test_column_name_plain() {
        let mut column = ColumnName::parse("stuff.things");
        assert_eq!(column.render(&dialect()).0, "`stuff`.`things`");

        let mut column = ColumnName::parse("*");
        assert_eq!(column.render(&dialect()).0, "*");

        let mut column = ColumnName::parse("people.*");
        assert_eq!(column.render(&dialect()).0, "`people`.*");
    }

    #[test]
    fn test_column_name_jsonify() {
        let mut column = ColumnName::with_options(
            "people.stuff.things",
            ColumnOptions {
                jsonify: true,
                ..ColumnOptions::default()
            },
        );
        assert_eq!(column.render(&dialect()).0, "JSON(`people`.`stuff`.`things`)");
    }

    #[test]
    fn test_column_name_extracted() {
        let mut column = ColumnName::with_options(
            "people.stuff.things__a__0",
            ColumnOptions {
                schema: Some(Node::Raw(Raw::with_args("unit", vec![json!("test")]))),
                extracted: true,
                ..ColumnOptions::default()
            },
        );
        assert_eq!(column.name(), "things__a__0");
        assert!(column.path().is_empty());
        assert_eq!(
            column.render(&dialect()),
            ("unit.`stuff`.`things__a__0`".to_string(), vec![json!("test")])
        );
    }

    #[test]
    fn test_column_name_table_node() {
        let mut column = ColumnName::with_options(
            "things__a",
            ColumnOptions {
                table: Some(Node::Raw(Raw::with_args("test", vec![json!("unit")]))),
                ..ColumnOptions::default()
            },
        );
        assert_eq!(
            column.render(&dialect()),
            (
                "test.`things`#>>%s".to_string(),
                vec![json!("unit"), json!("$.\"a\"")]
            )
        );
    }

    #[test]
    fn test_column_name_with_path() {
        let mut column = ColumnName::with_path("things", vec![PathSegment::from("a"), PathSegment::from(1)]);
        assert_eq!(
            column.render(&Dialect::postgres()),
            ("\"things\"#>>%s".to_string(), vec![json!("{a,1}")])
        );
    }

    #[test]
    fn test_as() {
        let mut label = As::new("people", Raw::with_args("unit", vec![json!("test")]));
        assert_eq!(label.len(), 2);
        assert_eq!(
            label.render(&dialect()),
            ("unit AS `people`".to_string(), vec![json!("test")])
        );
    }

    #[test]
    fn test_order() {
        let mut order = Order::new("people", None).unwrap();
        assert_eq!(order.render(&dialect()).0, "`people`");

        let mut order = Order::asc("people").unwrap();
        assert_eq!(order.render(&dialect()).0, "`people` ASC");

        let mut order = Order::pair("people", Term::from(1)).unwrap();
        assert_eq!(order.render(&dialect()).0, "`people` DESC");

        let mut order = Order::pair("people", Term::from("asc")).unwrap();
        assert_eq!(order.direction(), Some(Direction::Asc));
        assert_eq!(order.render(&dialect()).0, "`people` ASC");
    }

    #[test]
    fn test_order_errors() {
        let err = Order::pair("people", Term::from(2)).unwrap_err();
        assert_eq!(err.to_string(), "ORDER: order 2 must be in [-1, 1] or ASC/DESC");

        assert!(Order::new(5, None).is_err());
    }

    #[test]
    fn test_order_empty() {
        let mut order = Order::new(Raw::new(""), Some(Direction::Asc)).unwrap();
        assert_eq!(order.len(), 0);
        assert_eq!(order.render(&dialect()).0, "");
    }

    #[test]
    fn test_assign() {
        let mut assign = Assign::new("fee", "fie");
        assert_eq!(assign.len(), 2);
        assert_eq!(assign.render(&dialect()), ("`fee`=%s".to_string(), vec![json!("fie")]));
    }
}
