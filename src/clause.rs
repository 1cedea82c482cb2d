//! Statement clauses.
//!
//! A clause is value-owned by its statement. `add()` returns the clause
//! itself for chaining; statements wrap it in their own consuming builders.

use crate::criteria::conditions;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::expression::{
    As, Assign, List, Order, TableName, Value, as_column, as_name, as_raw, as_table, as_value,
};
use crate::node::{Expression, Format, Node, Parens, Rendered, express_each};
use crate::terms::{Term, Terms};

/// The clause slots a statement can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// Bare modifiers such as `DISTINCT`.
    Options,
    /// Selected expressions.
    Fields,
    /// The target table of INSERT, UPDATE and DELETE.
    Table,
    /// Parenthesized INSERT column list.
    Columns,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Set,
    Values,
    /// INSERT ... SELECT source.
    Select,
}

impl ClauseKind {
    /// Label used in error reports.
    pub fn label(self) -> &'static str {
        match self {
            ClauseKind::Options => "OPTIONS",
            ClauseKind::Fields => "FIELDS",
            ClauseKind::Table => "TABLE",
            ClauseKind::Columns => "COLUMNS",
            ClauseKind::From => "FROM",
            ClauseKind::Where => "WHERE",
            ClauseKind::GroupBy => "GROUP_BY",
            ClauseKind::Having => "HAVING",
            ClauseKind::OrderBy => "ORDER_BY",
            ClauseKind::Limit => "LIMIT",
            ClauseKind::Set => "SET",
            ClauseKind::Values => "VALUES",
            ClauseKind::Select => "SELECT",
        }
    }

    /// Keyword rendered before the children, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            ClauseKind::From => Some("FROM"),
            ClauseKind::Where => Some("WHERE"),
            ClauseKind::GroupBy => Some("GROUP BY"),
            ClauseKind::Having => Some("HAVING"),
            ClauseKind::OrderBy => Some("ORDER BY"),
            ClauseKind::Limit => Some("LIMIT"),
            ClauseKind::Set => Some("SET"),
            ClauseKind::Values => Some("VALUES"),
            _ => None,
        }
    }

    fn delimiter(self) -> &'static str {
        match self {
            ClauseKind::Options | ClauseKind::Select => " ",
            ClauseKind::Where | ClauseKind::Having => " AND ",
            _ => ",",
        }
    }
}

/// A named collection of nodes inside a statement.
#[derive(Debug, Clone)]
pub struct Clause {
    kind: ClauseKind,
    expressions: Vec<Node>,
    /// Shared VALUES column list.
    columns: Option<Vec<String>>,
    /// Set for statements whose LIMIT takes only a row count.
    total_only: Option<&'static str>,
    rendered: Rendered,
}

impl Clause {
    pub fn new(kind: ClauseKind) -> Self {
        Self {
            kind,
            expressions: Vec::new(),
            columns: None,
            total_only: None,
            rendered: Rendered::default(),
        }
    }

    /// Table slot holding a single table name.
    pub fn table(table: TableName) -> Self {
        let mut clause = Self::new(ClauseKind::Table);
        clause.expressions.push(Node::Table(table));
        clause
    }

    /// LIMIT that accepts only a total, reporting `node` on violation.
    pub fn limit_total(node: &'static str) -> Self {
        Self {
            total_only: Some(node),
            ..Self::new(ClauseKind::Limit)
        }
    }

    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    pub fn expressions(&self) -> &[Node] {
        &self.expressions
    }

    /// Column names shared by VALUES rows.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Fix the VALUES column list unless one is already set.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        if self.columns.is_none() {
            self.columns = Some(columns);
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) -> &mut Self {
        self.expressions.push(node.into());
        self
    }

    /// Add terms, interpreted according to the clause kind.
    ///
    /// Nothing is added when an error is returned.
    pub fn add(&mut self, terms: Terms) -> SqlResult<&mut Self> {
        match self.kind {
            ClauseKind::Values => self.add_row(terms)?,
            ClauseKind::Limit => self.add_limit(terms)?,
            ClauseKind::Table => self.add_table(terms)?,
            _ => {
                let nodes = self.nodes(terms)?;
                self.expressions.extend(nodes);
            }
        }
        Ok(self)
    }

    fn reject_keywords(&self, terms: &Terms) -> SqlResult<()> {
        match terms.keywords.first() {
            Some((key, _)) => Err(SqlError::keyword(key.clone(), self.kind.label())),
            None => Ok(()),
        }
    }

    fn nodes(&self, terms: Terms) -> SqlResult<Vec<Node>> {
        let label = self.kind.label();

        match self.kind {
            ClauseKind::Where | ClauseKind::Having => return conditions(terms),
            ClauseKind::Options | ClauseKind::GroupBy | ClauseKind::Columns | ClauseKind::Select => {
                self.reject_keywords(&terms)?;
            }
            _ => {}
        }

        let Terms {
            positional,
            keywords,
            flags,
        } = terms;

        let mut nodes = Vec::new();
        for term in Terms::spread(positional) {
            let node = match self.kind {
                ClauseKind::Options => as_raw(term, label)?,
                ClauseKind::Fields | ClauseKind::GroupBy => as_column(term, flags, label)?,
                ClauseKind::Columns => as_name(term, label)?,
                ClauseKind::From => as_table(term, label)?,
                ClauseKind::OrderBy => match term {
                    Term::Node(node) => node,
                    literal => Node::Order(Order::new(literal, None)?),
                },
                ClauseKind::Set | ClauseKind::Select => match term {
                    Term::Node(node) => node,
                    Term::Literal(other) => return Err(SqlError::field(label, &other)),
                },
                ClauseKind::Where
                | ClauseKind::Having
                | ClauseKind::Table
                | ClauseKind::Values
                | ClauseKind::Limit => as_value(term, false),
            };
            nodes.push(node);
        }

        for (key, value) in Terms::sorted(keywords) {
            let node = match self.kind {
                ClauseKind::Fields => Node::As(As::new(&key, as_column(value, flags, label)?)),
                ClauseKind::From => Node::As(As::new(&key, as_table(value, label)?)),
                ClauseKind::OrderBy => Node::Order(Order::pair(&key, value)?),
                ClauseKind::Set => Node::Assign(Assign::new(&key, value)),
                _ => return Err(SqlError::keyword(key, label)),
            };
            nodes.push(node);
        }

        Ok(nodes)
    }

    /// Replace the table, keeping its prefix keyword.
    fn add_table(&mut self, terms: Terms) -> SqlResult<()> {
        self.reject_keywords(&terms)?;
        let mut positional = terms.positional.into_iter();
        let (Some(term), None) = (positional.next(), positional.next()) else {
            return Err(SqlError::Config("TABLE: exactly one table expected".to_string()));
        };

        let prefix = match self.expressions.first() {
            Some(Node::Table(table)) => table.prefix().map(str::to_string),
            _ => None,
        };
        let node = match (as_table(term, "TABLE")?, prefix) {
            (Node::Table(table), Some(prefix)) => Node::Table(table.with_prefix(prefix)),
            (node, _) => node,
        };

        self.expressions = vec![node];
        Ok(())
    }

    /// One VALUES row, positional or keyed by column.
    fn add_row(&mut self, terms: Terms) -> SqlResult<()> {
        let Terms {
            positional,
            keywords,
            ..
        } = terms;

        if !positional.is_empty() && !keywords.is_empty() {
            return Err(SqlError::MixedRow);
        }

        let mut columns = self.columns.clone();
        let row: Vec<Term> = if keywords.is_empty() {
            positional
        } else {
            let mut keywords = Terms::sorted(keywords);
            let keys: Vec<String> = keywords.iter().map(|(key, _)| key.clone()).collect();
            let columns = columns.get_or_insert_with(|| keys.clone());

            if keywords.len() != columns.len() {
                return Err(SqlError::Columns {
                    values: format!("{keys:?}"),
                    columns: columns.clone(),
                });
            }

            let mut row = Vec::with_capacity(columns.len());
            for column in columns.iter() {
                let Some(index) = keywords.iter().position(|(key, _)| key == column) else {
                    return Err(SqlError::MissingColumn {
                        column: column.clone(),
                        row: keys,
                    });
                };
                row.push(keywords.swap_remove(index).1);
            }
            row
        };

        if let Some(columns) = &columns
            && row.len() != columns.len()
        {
            return Err(SqlError::Columns {
                values: format!("{} values", row.len()),
                columns: columns.clone(),
            });
        }

        self.columns = columns;
        self.expressions.push(Node::List(List::new(row, false)));
        Ok(())
    }

    /// `total` then `offset`, positionally or by keyword.
    fn add_limit(&mut self, terms: Terms) -> SqlResult<()> {
        let mut total = None;
        let mut offset = None;
        for (key, value) in terms.keywords {
            match key.as_str() {
                "total" => total = Some(value),
                "offset" => offset = Some(value),
                _ => return Err(SqlError::keyword(key, "LIMIT")),
            }
        }

        if total.is_some() && !self.expressions.is_empty() {
            return Err(SqlError::LimitSet);
        }

        let mut positional = terms.positional.into_iter();
        if self.expressions.is_empty() && total.is_none() {
            total = positional.next();
        }
        if offset.is_none() {
            offset = positional.next();
        }
        if positional.next().is_some() {
            return Err(SqlError::LimitSet);
        }
        if offset.is_some() && total.is_none() && self.expressions.is_empty() {
            return Err(SqlError::LimitOffset);
        }

        let mut values = Vec::new();
        for (part, term) in [("total", total), ("offset", offset)] {
            let Some(term) = term else { continue };
            match term {
                Term::Literal(literal @ serde_json::Value::Number(_))
                    if literal.is_i64() || literal.is_u64() =>
                {
                    values.push(Node::Value(Value::new(literal)));
                }
                _ => return Err(SqlError::LimitType { part }),
            }
        }

        let filled = self.expressions.len() + values.len();
        match self.total_only {
            Some(node) if filled > 1 => return Err(SqlError::LimitTotal { node }),
            None if filled > 2 => return Err(SqlError::LimitSet),
            _ => {}
        }

        self.expressions.extend(values);
        Ok(())
    }

    fn generate_values(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        let nested = format.nested();
        let rows = nested.nested();
        express_each(&mut self.expressions, &mut sql, &mut args, dialect, rows, Parens::Always);

        let text = if format.is_pretty() {
            format!("VALUES\n{}{}", nested.current(), sql.join(","))
        } else {
            format!("VALUES {}", sql.join(","))
        };
        self.rendered.set(text, args);
    }

    fn generate_columns(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        let inner = format.nested().nested();
        express_each(&mut self.expressions, &mut sql, &mut args, dialect, inner, Parens::Auto);

        let body = sql.join(&inner.delimiter(self.kind.delimiter()));
        let text = if format.is_pretty() {
            format!("{}{}", format.unit(), inner.wrap(&body))
        } else {
            inner.wrap(&body)
        };
        self.rendered.set(text, args);
    }
}

impl Expression for Clause {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        if self.is_empty() {
            self.rendered.set(String::new(), Vec::new());
            return;
        }

        let mut sql = Vec::new();
        let mut args = Vec::new();

        match self.kind {
            ClauseKind::Values => return self.generate_values(dialect, format),
            ClauseKind::Columns => return self.generate_columns(dialect, format),
            ClauseKind::Table => {
                express_each(&mut self.expressions, &mut sql, &mut args, dialect, format, Parens::Never);
                self.rendered.set(sql.concat(), args);
                return;
            }
            ClauseKind::Select => {
                express_each(
                    &mut self.expressions,
                    &mut sql,
                    &mut args,
                    dialect,
                    format.nested(),
                    Parens::Never,
                );
                let body = sql.join(" ");
                let text = if format.is_pretty() {
                    format!("{}{body}", format.unit())
                } else {
                    body
                };
                self.rendered.set(text, args);
                return;
            }
            _ => {}
        }

        let nested = format.nested();
        express_each(&mut self.expressions, &mut sql, &mut args, dialect, nested, Parens::Auto);
        let body = sql.join(&nested.delimiter(self.kind.delimiter()));

        let text = match (self.kind.keyword(), format.is_pretty()) {
            (Some(keyword), true) => format!("{keyword}\n{}{body}", nested.current()),
            (Some(keyword), false) => format!("{keyword} {body}"),
            (None, true) => format!("{}{body}", format.unit()),
            (None, false) => body,
        };
        self.rendered.set(text, args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.expressions.iter().map(|node| usize::from(!node.is_empty())).sum()
    }
}
