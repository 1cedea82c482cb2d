//! Construction input: positional terms, keyword pairs and control flags.

use serde_json::json;

use crate::clause::Clause;
use crate::criteria::{Criteria, Sets};
use crate::criterion::Criterion;
use crate::error::{SqlError, SqlResult};
use crate::expression::{As, Assign, ColumnName, Direction, List, Name, Not, Order, TableName, Value};
use crate::node::{Node, Raw};
use crate::statement::Statement;

/// A constructor argument: an existing node or a literal to be wrapped.
#[derive(Debug, Clone)]
pub enum Term {
    Node(Node),
    Literal(serde_json::Value),
}

impl Term {
    /// The literal as text, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Term::Literal(serde_json::Value::String(text)) => Some(text),
            _ => None,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Term::Node(node)
    }
}

impl From<serde_json::Value> for Term {
    fn from(literal: serde_json::Value) -> Self {
        Term::Literal(literal)
    }
}

macro_rules! literal_term {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Term {
                fn from(literal: $ty) -> Self {
                    Term::Literal(serde_json::Value::from(literal))
                }
            }
        )*
    };
}

literal_term!(&str, String, bool, i32, i64, u32, u64, f64);

impl<T: Into<serde_json::Value>> From<Vec<T>> for Term {
    fn from(items: Vec<T>) -> Self {
        Term::Literal(serde_json::Value::Array(
            items.into_iter().map(Into::into).collect(),
        ))
    }
}

impl From<Direction> for Term {
    fn from(direction: Direction) -> Self {
        Term::Literal(json!(direction.keyword()))
    }
}

macro_rules! node_term {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Term {
                fn from(node: $ty) -> Self {
                    Term::Node(Node::from(node))
                }
            }
        )*
    };
}

node_term!(
    Raw, Value, List, Not, Name, TableName, ColumnName, As, Order, Assign, Criterion, Criteria,
    Sets, Clause, Statement,
);

/// Dispatcher control flags applied to every keyword pair of a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Negate every resolved comparison.
    pub invert: bool,
    /// Compare whole columns as JSON.
    pub jsonify: bool,
    /// Use field names as-is, without path splitting.
    pub extracted: bool,
}

/// Arguments for a constructor or `add()` call.
///
/// Usually built with [`terms!`](crate::terms!).
#[derive(Debug, Clone, Default)]
pub struct Terms {
    pub positional: Vec<Term>,
    pub keywords: Vec<(String, Term)>,
    pub flags: Flags,
}

impl Terms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional terms only.
    pub fn args<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        Self {
            positional: items.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Keyword pairs only.
    pub fn kwargs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Term>,
    {
        Self {
            keywords: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, term: impl Into<Term>) -> Self {
        self.positional.push(term.into());
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, term: impl Into<Term>) -> Self {
        self.keywords.push((key.into(), term.into()));
        self
    }

    pub fn invert(mut self) -> Self {
        self.flags.invert = true;
        self
    }

    pub fn jsonify(mut self) -> Self {
        self.flags.jsonify = true;
        self
    }

    pub fn extracted(mut self) -> Self {
        self.flags.extracted = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Positional terms, with a lone literal list spread into its items.
    pub(crate) fn spread(positional: Vec<Term>) -> Vec<Term> {
        match <[Term; 1]>::try_from(positional) {
            Ok([Term::Literal(serde_json::Value::Array(items))]) => {
                items.into_iter().map(Term::Literal).collect()
            }
            Ok([single]) => vec![single],
            Err(positional) => positional,
        }
    }

    /// Keyword pairs in key order.
    pub(crate) fn sorted(mut keywords: Vec<(String, Term)>) -> Vec<(String, Term)> {
        keywords.sort_by(|a, b| a.0.cmp(&b.0));
        keywords
    }

    /// Split into `(left, right)`: one keyword pair or exactly two positional.
    pub fn pair(self, node: &'static str) -> SqlResult<(Term, Term)> {
        let error = SqlError::Pair {
            node,
            keywords: self.keys(),
            positional: self.positional.len(),
        };

        match (<[Term; 2]>::try_from(self.positional), <[(String, Term); 1]>::try_from(self.keywords)) {
            (Ok([left, right]), Err(keywords)) if keywords.is_empty() => Ok((left, right)),
            (Err(positional), Ok([(key, right)])) if positional.is_empty() => {
                Ok((Term::from(key), right))
            }
            _ => Err(error),
        }
    }

    /// Keyword names, for error reports.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.keywords.iter().map(|(key, _)| key.clone()).collect()
    }
}

/// Build [`Terms`] from positional terms and keyword pairs.
///
/// ```
/// use relsql::terms;
///
/// let terms = terms!["*", stuff__gt = 5, "people.id__in" => vec![1, 2]];
/// assert_eq!(terms.positional.len(), 1);
/// assert_eq!(terms.keywords.len(), 2);
/// ```
#[macro_export]
macro_rules! terms {
    (@munch $terms:ident;) => {};
    (@munch $terms:ident; $key:ident = $value:expr $(, $($rest:tt)*)?) => {
        $terms = $terms.kwarg(stringify!($key), $value);
        $crate::terms!(@munch $terms; $($($rest)*)?);
    };
    (@munch $terms:ident; $key:literal => $value:expr $(, $($rest:tt)*)?) => {
        $terms = $terms.kwarg($key, $value);
        $crate::terms!(@munch $terms; $($($rest)*)?);
    };
    (@munch $terms:ident; $value:expr $(, $($rest:tt)*)?) => {
        $terms = $terms.arg($value);
        $crate::terms!(@munch $terms; $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut terms = $crate::Terms::new();
        $crate::terms!(@munch terms; $($body)*);
        terms
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_terms_macro() {
        let value = 3;
        let terms = crate::terms!["a", value, stuff__gt = 5, "b.c__in" => vec![1, 2]];
        assert_eq!(terms.positional.len(), 2);
        assert_eq!(terms.keys(), vec!["stuff__gt", "b.c__in"]);
        assert!(crate::terms![].is_empty());
    }

    #[test]
    fn test_spread() {
        let spread = Terms::spread(vec![Term::from(vec!["a", "b"])]);
        assert_eq!(spread.len(), 2);
        assert_eq!(spread[1].as_str(), Some("b"));

        let kept = Terms::spread(vec![Term::from(vec!["a"]), Term::from("b")]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_sorted() {
        let terms = Terms::kwargs([("b", 1), ("a", 2)]);
        let keys: Vec<String> = Terms::sorted(terms.keywords)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_pair() {
        let (left, right) = crate::terms!["a", 1].pair("EQ").unwrap();
        assert_eq!(left.as_str(), Some("a"));
        assert!(matches!(right, Term::Literal(_)));

        let (left, _) = crate::terms![a__gt = 1].pair("EQ").unwrap();
        assert_eq!(left.as_str(), Some("a__gt"));

        let err = crate::terms!["a", b = 1].pair("EQ").unwrap_err();
        assert_eq!(err.to_string(), "EQ: need single pair in [\"b\"] or double in 1");
    }

    #[test]
    fn test_flags() {
        let terms = Terms::new().invert().jsonify();
        assert_eq!(
            terms.flags,
            Flags {
                invert: true,
                jsonify: true,
                extracted: false
            }
        );
    }
}
