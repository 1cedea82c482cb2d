//! Whole statements: an ordered set of clause slots behind a verb.
//!
//! Every slot a verb declares exists from construction, empty until filled.
//! Builders consume and return the statement so calls chain with `?`.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clause::{Clause, ClauseKind};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::expression::TableName;
use crate::node::{Arg, Expression, Format, Node, Rendered};
use crate::terms::Terms;

/// Statement verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Select,
    Insert,
    Update,
    Delete,
}

impl Verb {
    pub fn keyword(self) -> &'static str {
        match self {
            Verb::Select => "SELECT",
            Verb::Insert => "INSERT",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE",
        }
    }

    /// Declared clause slots, by name, in render order.
    pub fn clauses(self) -> &'static [(&'static str, ClauseKind)] {
        match self {
            Verb::Select => &[
                ("OPTIONS", ClauseKind::Options),
                ("FIELDS", ClauseKind::Fields),
                ("FROM", ClauseKind::From),
                ("WHERE", ClauseKind::Where),
                ("GROUP_BY", ClauseKind::GroupBy),
                ("HAVING", ClauseKind::Having),
                ("ORDER_BY", ClauseKind::OrderBy),
                ("LIMIT", ClauseKind::Limit),
            ],
            Verb::Insert => &[
                ("OPTIONS", ClauseKind::Options),
                ("TABLE", ClauseKind::Table),
                ("FIELDS", ClauseKind::Columns),
                ("VALUES", ClauseKind::Values),
                ("SELECT", ClauseKind::Select),
            ],
            Verb::Update => &[
                ("OPTIONS", ClauseKind::Options),
                ("TABLE", ClauseKind::Table),
                ("SET", ClauseKind::Set),
                ("WHERE", ClauseKind::Where),
                ("ORDER_BY", ClauseKind::OrderBy),
                ("LIMIT", ClauseKind::Limit),
            ],
            Verb::Delete => &[
                ("OPTIONS", ClauseKind::Options),
                ("TABLE", ClauseKind::Table),
                ("WHERE", ClauseKind::Where),
                ("ORDER_BY", ClauseKind::OrderBy),
                ("LIMIT", ClauseKind::Limit),
            ],
        }
    }

    /// Keyword rendered before the table slot.
    fn prefix(self) -> &'static str {
        match self {
            Verb::Insert => "INTO",
            Verb::Delete => "FROM",
            Verb::Select | Verb::Update => "",
        }
    }

    fn slot(self, kind: ClauseKind) -> Clause {
        match (self, kind) {
            (Verb::Update | Verb::Delete, ClauseKind::Limit) => Clause::limit_total(self.keyword()),
            _ => Clause::new(kind),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Verbs a statement hands off to its bound model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Count,
    Retrieve,
    Labels,
    Update,
    Delete,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Count => "count",
            Action::Retrieve => "retrieve",
            Action::Labels => "labels",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Receiver for verbs a statement delegates.
///
/// Every method defaults to [`SqlError::Unsupported`].
pub trait Model: fmt::Debug + Send + Sync {
    fn create(&self, _query: &Statement) -> SqlResult<Arg> {
        Err(SqlError::Unsupported { verb: "create" })
    }

    fn count(&self, _query: &Statement) -> SqlResult<Arg> {
        Err(SqlError::Unsupported { verb: "count" })
    }

    fn retrieve(&self, _query: &Statement) -> SqlResult<Arg> {
        Err(SqlError::Unsupported { verb: "retrieve" })
    }

    fn labels(&self, _query: &Statement) -> SqlResult<Arg> {
        Err(SqlError::Unsupported { verb: "labels" })
    }

    fn update(&self, _query: &Statement) -> SqlResult<Arg> {
        Err(SqlError::Unsupported { verb: "update" })
    }

    fn delete(&self, _query: &Statement) -> SqlResult<Arg> {
        Err(SqlError::Unsupported { verb: "delete" })
    }
}

/// A SQL statement.
#[derive(Debug, Clone)]
pub struct Statement {
    verb: Verb,
    clauses: Vec<Clause>,
    model: Option<Arc<dyn Model>>,
    rendered: Rendered,
}

impl Statement {
    /// A statement with every declared slot empty.
    pub fn new(verb: Verb) -> Self {
        let clauses = verb
            .clauses()
            .iter()
            .map(|&(_, kind)| verb.slot(kind))
            .collect();

        Self {
            verb,
            clauses,
            model: None,
            rendered: Rendered::default(),
        }
    }

    /// `SELECT` with its field list.
    pub fn select(fields: Terms) -> SqlResult<Self> {
        Self::new(Verb::Select).fields(fields)
    }

    /// `INSERT INTO table`.
    pub fn insert(table: &str) -> Self {
        Self::new(Verb::Insert).with_table(table)
    }

    /// `UPDATE table`.
    pub fn update(table: &str) -> Self {
        Self::new(Verb::Update).with_table(table)
    }

    /// `DELETE FROM table`.
    pub fn delete(table: &str) -> Self {
        Self::new(Verb::Delete).with_table(table)
    }

    fn with_table(mut self, table: &str) -> Self {
        let table = TableName::parse(table).with_prefix(self.verb.prefix());
        if let Some(slot) = self.clause_mut(ClauseKind::Table) {
            *slot = Clause::table(table);
        }
        self
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Fill clauses by declared name, such as `"WHERE"` or `"GROUP_BY"`.
    pub fn with_clauses<I, K>(mut self, clauses: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = (K, Terms)>,
        K: AsRef<str>,
    {
        for (name, terms) in clauses {
            let name = name.as_ref();
            let kind = self
                .verb
                .clauses()
                .iter()
                .find(|(declared, _)| *declared == name)
                .map(|&(_, kind)| kind)
                .ok_or_else(|| SqlError::keyword(name, self.verb.keyword()))?;
            self = self.add(kind, terms)?;
        }
        Ok(self)
    }

    /// Add terms to the slot of `kind`.
    pub fn add(mut self, kind: ClauseKind, terms: Terms) -> SqlResult<Self> {
        match kind {
            ClauseKind::Values => self.add_values(terms)?,
            _ => {
                self.slot_mut(kind)?.add(terms)?;
            }
        }
        Ok(self)
    }

    pub fn options(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Options, terms)
    }

    pub fn fields(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Fields, terms)
    }

    /// Replace the target table of INSERT, UPDATE or DELETE.
    pub fn table(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Table, terms)
    }

    pub fn from(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::From, terms)
    }

    /// WHERE.
    pub fn filter(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Where, terms)
    }

    pub fn group_by(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::GroupBy, terms)
    }

    pub fn having(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Having, terms)
    }

    pub fn order_by(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::OrderBy, terms)
    }

    pub fn limit(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Limit, terms)
    }

    pub fn set(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Set, terms)
    }

    /// One row of INSERT values.
    pub fn values(self, terms: Terms) -> SqlResult<Self> {
        self.add(ClauseKind::Values, terms)
    }

    /// INSERT column list; ignored once set.
    pub fn columns(mut self, terms: Terms) -> SqlResult<Self> {
        if self.slot_mut(ClauseKind::Columns)?.is_empty() {
            self.slot_mut(ClauseKind::Columns)?.add(terms)?;
        }
        Ok(self)
    }

    /// Source query for `INSERT ... SELECT`.
    pub fn from_select(mut self, query: Statement) -> SqlResult<Self> {
        if self.clause(ClauseKind::Values).is_some_and(|values| !values.is_empty()) {
            return Err(SqlError::ValuesAndSelect);
        }
        let slot = self.slot_mut(ClauseKind::Select)?;
        *slot = Clause::new(ClauseKind::Select);
        slot.push(query);
        Ok(self)
    }

    fn add_values(&mut self, terms: Terms) -> SqlResult<()> {
        if self.clause(ClauseKind::Select).is_some_and(|select| !select.is_empty()) {
            return Err(SqlError::ValuesAndSelect);
        }

        let names: Vec<String> = self
            .clause(ClauseKind::Columns)
            .map(|columns| {
                columns
                    .expressions()
                    .iter()
                    .filter_map(|node| match node {
                        Node::Name(name) => Some(name.name().to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let values = self.slot_mut(ClauseKind::Values)?;
        if !names.is_empty() {
            values.set_columns(names);
        }
        values.add(terms)?;

        let columns = values.columns().map(<[String]>::to_vec);
        if let Some(columns) = columns
            && let Some(slot) = self.clause_mut(ClauseKind::Columns)
            && slot.is_empty()
        {
            slot.add(Terms::args(columns))?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, kind: ClauseKind) -> SqlResult<&mut Clause> {
        let verb = self.verb.keyword();
        self.clause_mut(kind)
            .ok_or_else(|| SqlError::keyword(kind.label(), verb))
    }

    /// The slot of `kind`, if this verb declares one.
    pub fn clause(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.iter().find(|clause| clause.kind() == kind)
    }

    pub fn clause_mut(&mut self, kind: ClauseKind) -> Option<&mut Clause> {
        self.clauses.iter_mut().find(|clause| clause.kind() == kind)
    }

    /// The slot declared under `name`.
    pub fn clause_named(&self, name: &str) -> Option<&Clause> {
        let (_, kind) = self.verb.clauses().iter().find(|(declared, _)| *declared == name)?;
        self.clause(*kind)
    }

    /// Swap in a prebuilt clause for its slot.
    pub fn replace(&mut self, clause: Clause) -> SqlResult<Clause> {
        let slot = self.slot_mut(clause.kind())?;
        Ok(std::mem::replace(slot, clause))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn bind(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn model(&self) -> Option<&Arc<dyn Model>> {
        self.model.as_ref()
    }

    /// Hand this statement to the bound model.
    pub fn perform(&self, action: Action) -> SqlResult<Arg> {
        let model = self
            .model
            .as_ref()
            .ok_or(SqlError::NoModel { verb: action.name() })?;

        match action {
            Action::Create => model.create(self),
            Action::Count => model.count(self),
            Action::Retrieve => model.retrieve(self),
            Action::Labels => model.labels(self),
            Action::Update => model.update(self),
            Action::Delete => model.delete(self),
        }
    }
}

impl Expression for Statement {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        for clause in self.clauses.iter_mut().filter(|clause| !clause.is_empty()) {
            clause.generate(dialect, format);
            sql.push(clause.sql().to_string());
            args.extend_from_slice(clause.args());
        }

        let keyword = self.verb.keyword();
        let text = if sql.is_empty() {
            keyword.to_string()
        } else if format.is_pretty() {
            let delimiter = format!("\n{}", format.current());
            format!("{keyword}{delimiter}{}", sql.join(&delimiter))
        } else {
            format!("{keyword} {}", sql.join(" "))
        };

        self.rendered.set(text, args);
        debug!(
            "Rendered {} statement with {} placeholders",
            self.verb,
            self.rendered.placeholders(dialect)
        );
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.clauses.iter().map(Expression::len).sum()
    }
}
