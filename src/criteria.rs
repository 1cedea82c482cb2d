//! Boolean combinators, set membership and the keyword dispatcher.

use tracing::trace;

use crate::criterion::{Affix, Comparison, Criterion};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::expression::{Not, Value, as_value};
use crate::field::{FieldSpec, Operator};
use crate::node::{Expression, Format, Node, Parens, Rendered, express, express_each};
use crate::terms::{Flags, Term, Terms};

/// How [`Criteria`] joins its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn keyword(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }

    fn delimiter(self) -> &'static str {
        match self {
            Logic::And => " AND ",
            Logic::Or => " OR ",
        }
    }
}

/// Parenthesized AND/OR group.
#[derive(Debug, Clone)]
pub struct Criteria {
    logic: Logic,
    expressions: Vec<Node>,
    rendered: Rendered,
}

impl Criteria {
    pub fn new(logic: Logic) -> Self {
        Self {
            logic,
            expressions: Vec::new(),
            rendered: Rendered::default(),
        }
    }

    pub fn and(terms: Terms) -> SqlResult<Self> {
        let mut criteria = Self::new(Logic::And);
        criteria.add(terms)?;
        Ok(criteria)
    }

    pub fn or(terms: Terms) -> SqlResult<Self> {
        let mut criteria = Self::new(Logic::Or);
        criteria.add(terms)?;
        Ok(criteria)
    }

    /// Append positional terms, then keyword pairs in key order.
    ///
    /// Nothing is appended if any pair fails to resolve.
    pub fn add(&mut self, terms: Terms) -> SqlResult<&mut Self> {
        let expressions = conditions(terms)?;
        self.expressions.extend(expressions);
        Ok(self)
    }

    pub fn push(&mut self, node: impl Into<Node>) -> &mut Self {
        self.expressions.push(node.into());
        self
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    pub fn expressions(&self) -> &[Node] {
        &self.expressions
    }
}

impl Expression for Criteria {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        let nested = format.nested();
        express_each(&mut self.expressions, &mut sql, &mut args, dialect, nested, Parens::Auto);

        if sql.is_empty() {
            self.rendered.set(String::new(), args);
            return;
        }

        let body = sql.join(&nested.delimiter(self.logic.delimiter()));
        self.rendered.set(nested.wrap(&body), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        self.expressions.iter().filter(|node| !node.is_empty()).count()
    }
}

/// Resolve terms the way WHERE and AND/OR do.
pub(crate) fn conditions(terms: Terms) -> SqlResult<Vec<Node>> {
    let Terms {
        positional,
        keywords,
        flags,
    } = terms;

    let mut expressions: Vec<Node> = Terms::spread(positional)
        .into_iter()
        .map(|term| as_value(term, false))
        .collect();

    for (key, value) in Terms::sorted(keywords) {
        expressions.push(resolve(&key, value, flags)?);
    }

    Ok(expressions)
}

/// Set membership composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    /// Left contains right.
    Has,
    /// Left contains at least one item of right.
    Any,
    /// Left holds exactly the items of right.
    All,
}

impl SetKind {
    pub fn name(self) -> &'static str {
        match self {
            SetKind::Has => "HAS",
            SetKind::Any => "ANY",
            SetKind::All => "ALL",
        }
    }
}

/// HAS, ANY or ALL over a JSON array column.
#[derive(Debug, Clone)]
pub struct Sets {
    kind: SetKind,
    expression: Box<Node>,
    rendered: Rendered,
}

impl Sets {
    pub fn build(kind: SetKind, left: Term, right: Term, flags: Flags) -> SqlResult<Self> {
        if flags.invert {
            return Err(SqlError::Invert { node: kind.name() });
        }

        let expression = match kind {
            SetKind::Has => Node::Criterion(Criterion::build(Comparison::Contains, left, right, flags)?),
            SetKind::Any => {
                let items = match right {
                    Term::Literal(serde_json::Value::Array(items)) => items,
                    Term::Literal(other) => {
                        return Err(SqlError::NotAList {
                            node: kind.name(),
                            right: other.to_string(),
                        });
                    }
                    Term::Node(node) => {
                        return Err(SqlError::NotAList {
                            node: kind.name(),
                            right: format!("{node:?}"),
                        });
                    }
                };

                // No candidates: nothing can match.
                if items.is_empty() {
                    Node::Value(Value::new(false))
                } else {
                    let mut any = Criteria::new(Logic::Or);
                    for item in items {
                        let single = Term::Literal(serde_json::Value::Array(vec![item]));
                        any.push(Criterion::build(Comparison::Contains, left.clone(), single, flags)?);
                    }
                    Node::Criteria(any)
                }
            }
            SetKind::All => {
                let mut all = Criteria::new(Logic::And);
                all.push(Criterion::build(Comparison::Contains, left.clone(), right.clone(), flags)?);
                all.push(Criterion::build(Comparison::Lengths, left, right, flags)?);
                Node::Criteria(all)
            }
        };

        Ok(Self {
            kind,
            expression: Box::new(expression),
            rendered: Rendered::default(),
        })
    }

    pub fn has(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(SetKind::Has, left.into(), right.into(), Flags::default())
    }

    pub fn any(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(SetKind::Any, left.into(), right.into(), Flags::default())
    }

    pub fn all(left: impl Into<Term>, right: impl Into<Term>) -> SqlResult<Self> {
        Self::build(SetKind::All, left.into(), right.into(), Flags::default())
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    pub fn expression(&self) -> &Node {
        &self.expression
    }
}

impl Expression for Sets {
    fn generate(&mut self, dialect: &Dialect, format: Format) {
        let mut sql = Vec::new();
        let mut args = Vec::new();

        express(&mut self.expression, &mut sql, &mut args, dialect, format, Parens::Never);

        self.rendered.set(sql.concat(), args);
    }

    fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    fn len(&self) -> usize {
        1
    }
}

/// Resolve one `field__operator` keyword pair into a condition.
///
/// Operators without a negative template are negated by wrapping in NOT.
pub fn resolve(key: &str, value: impl Into<Term>, flags: Flags) -> SqlResult<Node> {
    let spec = FieldSpec::parse(key);
    let invert = flags.invert || spec.invert;

    trace!(
        "Resolved {key} to {} {}{}",
        spec.field,
        if invert { "not_" } else { "" },
        spec.operator
    );

    let field = Term::from(spec.field);
    let value = value.into();
    let positive = Flags {
        invert: false,
        ..flags
    };

    let comparison = match spec.operator {
        Operator::Has | Operator::Any | Operator::All => {
            let kind = match spec.operator {
                Operator::Has => SetKind::Has,
                Operator::Any => SetKind::Any,
                _ => SetKind::All,
            };
            let sets = Sets::build(kind, field, value, positive)?;
            return Ok(negate(Node::Sets(sets), invert));
        }
        Operator::Null => Comparison::Null,
        Operator::Eq => Comparison::Eq,
        Operator::Gt => Comparison::Gt,
        Operator::Gte => Comparison::Gte,
        Operator::Lt => Comparison::Lt,
        Operator::Lte => Comparison::Lte,
        Operator::Like => Comparison::Like(Affix::Both),
        Operator::Start => Comparison::Like(Affix::Start),
        Operator::End => Comparison::Like(Affix::End),
        Operator::In => Comparison::In,
    };

    if comparison.invertible() {
        let flags = Flags { invert, ..flags };
        return Ok(Node::Criterion(Criterion::build(comparison, field, value, flags)?));
    }

    let criterion = Criterion::build(comparison, field, value, positive)?;
    Ok(negate(Node::Criterion(criterion), invert))
}

fn negate(node: Node, invert: bool) -> Node {
    if invert {
        Node::Not(Not::new(node))
    } else {
        node
    }
}

/// Dispatch one keyword pair, or two positional terms with the field first.
pub fn op(terms: Terms) -> SqlResult<Node> {
    let flags = terms.flags;
    let (left, right) = terms.pair("OP")?;
    match left {
        Term::Literal(serde_json::Value::String(key)) => resolve(&key, right, flags),
        Term::Literal(other) => Err(SqlError::field("OP", &other)),
        Term::Node(node) => Err(SqlError::Field {
            node: "OP",
            value: format!("{node:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dialect() -> Dialect {
        Dialect::default()
    }

    #[test]
    fn test_and() {
        let mut criteria = Criteria::and(
            Terms::new()
                .arg(Criterion::eq("totes", "maigoats").unwrap())
                .arg(Criterion::eq("toast", "myghost").unwrap().invert().unwrap()),
        )
        .unwrap();

        assert_eq!(
            criteria.render(&dialect()),
            (
                "(`totes`=%s AND `toast`!=%s)".to_string(),
                vec![json!("maigoats"), json!("myghost")]
            )
        );

        criteria.generate(&dialect(), Format::pretty(4));
        assert_eq!(criteria.sql(), "(\n    `totes`=%s AND\n    `toast`!=%s\n)");
    }

    #[test]
    fn test_or_keywords_sorted() {
        let mut criteria =
            Criteria::or(terms![totes = "maigoats", toast__not_eq = "myghost"]).unwrap();
        assert_eq!(
            criteria.render(&dialect()),
            (
                "(`toast`!=%s OR `totes`=%s)".to_string(),
                vec![json!("myghost"), json!("maigoats")]
            )
        );
    }

    #[test]
    fn test_positional_values() {
        let mut criteria = Criteria::and(terms![vec![1, 2]]).unwrap();
        assert_eq!(
            criteria.render(&dialect()),
            ("(%s AND %s)".to_string(), vec![json!(1), json!(2)])
        );
    }

    #[test]
    fn test_empty() {
        let mut criteria = Criteria::new(Logic::And);
        assert!(criteria.is_empty());
        assert_eq!(criteria.render(&dialect()), (String::new(), vec![]));
    }

    #[test]
    fn test_atomic_add() {
        let mut criteria = Criteria::and(terms![a = 1]).unwrap();
        assert!(criteria.add(terms![b = 2, c__gt = vec![1]]).is_ok());
        assert!(criteria.add(terms![d = 1, e__any = 5]).is_err());
        assert_eq!(criteria.len(), 3);
    }

    #[test]
    fn test_has() {
        let mut sets = Sets::has("totes", vec!["mai", "goats"]).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets.render(&dialect()),
            (
                "CONTAINS(`totes`,JSON(%s))".to_string(),
                vec![json!("[\"mai\",\"goats\"]")]
            )
        );
    }

    #[test]
    fn test_any() {
        let mut sets = Sets::any("totes", vec!["mai", "goats"]).unwrap();
        assert_eq!(
            sets.render(&dialect()),
            (
                "(CONTAINS(`totes`,JSON(%s)) OR CONTAINS(`totes`,JSON(%s)))".to_string(),
                vec![json!("[\"mai\"]"), json!("[\"goats\"]")]
            )
        );

        let err = Sets::any("totes", "nope").unwrap_err();
        assert_eq!(err.to_string(), "ANY: right \"nope\" must be list");
    }

    #[test]
    fn test_any_empty() {
        let mut sets = Sets::any("totes", Vec::<i64>::new()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.render(&dialect()), ("%s".to_string(), vec![json!(false)]));

        let mut node = resolve("totes__not_any", Vec::<i64>::new(), Flags::default()).unwrap();
        assert_eq!(node.render(&dialect()), ("NOT %s".to_string(), vec![json!(false)]));
    }

    #[test]
    fn test_len_skips_empty_groups() {
        let mut outer = Criteria::new(Logic::And);
        outer.push(Criteria::new(Logic::Or));
        assert_eq!(outer.len(), 0);
        assert_eq!(outer.render(&dialect()), (String::new(), vec![]));

        outer.add(terms![a = 1]).unwrap();
        assert_eq!(outer.len(), 1);
        assert_eq!(outer.render(&dialect()).0, "(`a`=%s)");
    }

    #[test]
    fn test_all() {
        let mut sets = Sets::all("totes", vec!["mai", "goats"]).unwrap();
        assert_eq!(
            sets.render(&dialect()),
            (
                "(CONTAINS(`totes`,JSON(%s)) AND LENGTHS(`totes`,JSON(%s)))".to_string(),
                vec![json!("[\"mai\",\"goats\"]"), json!("[\"mai\",\"goats\"]")]
            )
        );
    }

    #[test]
    fn test_resolve() {
        let mut node = resolve("stuff__gt", "things", Flags::default()).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff`>%s");

        let mut node = resolve("stuff__not_in", vec![1, 2], Flags::default()).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff` NOT IN (%s,%s)");

        let mut node = resolve("stuff__a__1", 3, Flags::default()).unwrap();
        assert_eq!(
            node.render(&dialect()),
            (
                "`stuff`#>>%s=JSON(%s)".to_string(),
                vec![json!("$.\"a\"[1]"), json!("3")]
            )
        );

        let mut node = resolve("stuff__start", "mai", Flags::default()).unwrap();
        assert_eq!(node.render(&dialect()).1, vec![json!("mai%")]);
    }

    #[test]
    fn test_resolve_negated() {
        let mut node = resolve("stuff__not_gt", 1, Flags::default()).unwrap();
        assert!(matches!(node, Node::Not(_)));
        assert_eq!(node.render(&dialect()).0, "NOT `stuff`>%s");

        let mut node = resolve("stuff__not_has", vec![1], Flags::default()).unwrap();
        assert_eq!(node.render(&dialect()).0, "NOT CONTAINS(`stuff`,JSON(%s))");

        let flags = Flags {
            invert: true,
            ..Flags::default()
        };
        let mut node = resolve("stuff", 1, flags).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff`!=%s");

        let mut node = resolve("stuff__not_null", true, Flags::default()).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff` IS NOT NULL");
    }

    #[test]
    fn test_resolve_flags() {
        let flags = Flags {
            extracted: true,
            ..Flags::default()
        };
        let mut node = resolve("stuff__a", 1, flags).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff__a`=%s");

        let flags = Flags {
            jsonify: true,
            ..Flags::default()
        };
        let mut node = resolve("stuff", vec![1], flags).unwrap();
        assert_eq!(node.render(&dialect()).0, "JSON(`stuff`)=JSON(%s)");
    }

    #[test]
    fn test_op() {
        let mut node = op(terms![stuff__lte = 3]).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff`<=%s");

        let mut node = op(terms!["stuff__like", "mai"]).unwrap();
        assert_eq!(node.render(&dialect()).0, "`stuff` LIKE %s");

        let err = op(terms!["stuff", "mai", "goats"]).unwrap_err();
        assert_eq!(err.to_string(), "OP: need single pair in [] or double in 3");

        let err = op(terms![1, 2]).unwrap_err();
        assert!(matches!(err, SqlError::Field { node: "OP", .. }));
    }
}
