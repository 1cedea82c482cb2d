//! # relsql
//!
//! > **Build the tree. Bind the values.**
//!
//! relsql assembles typed SQL nodes and renders them into parameterized SQL
//! text plus an ordered argument list, ready for any placeholder-based
//! driver API.
//!
//! ## Quick Example
//!
//! ```
//! use relsql::prelude::*;
//!
//! let mut query = Statement::select(terms!["*"])?
//!     .from(terms!["people"])?
//!     .filter(terms![stuff__gt = "things"])?;
//!
//! let (sql, args) = query.render(&Dialect::default());
//! assert_eq!(sql, "SELECT * FROM `people` WHERE `stuff`>%s");
//! assert_eq!(args, vec![serde_json::json!("things")]);
//! # Ok::<(), relsql::SqlError>(())
//! ```
//!
//! ## Keyword grammar
//!
//! | Keyword              | Renders                     |
//! |----------------------|-----------------------------|
//! | `name = v`           | `` `name`=%s ``             |
//! | `name__gt = v`       | `` `name`>%s ``             |
//! | `name__not_in = [..]`| `` `name` NOT IN (%s,..) `` |
//! | `doc__a__0 = v`      | `` `doc`#>>%s=JSON(%s) ``   |
//! | `tags__any = [..]`   | `(CONTAINS(..) OR ..)`      |

pub mod clause;
pub mod criteria;
pub mod criterion;
pub mod dialect;
pub mod error;
pub mod expression;
pub mod field;
pub mod node;
pub mod statement;
pub mod terms;

pub use error::{SqlError, SqlResult};
pub use terms::{Flags, Term, Terms};

pub mod prelude {
    pub use crate::clause::{Clause, ClauseKind};
    pub use crate::criteria::{Criteria, Logic, SetKind, Sets, op, resolve};
    pub use crate::criterion::{Affix, Comparison, Criterion};
    pub use crate::dialect::{Dialect, DialectConfig, PathCodec};
    pub use crate::error::*;
    pub use crate::expression::{
        As, Assign, ColumnName, Direction, List, Name, Not, Order, TableName, Value,
    };
    pub use crate::field::{FieldSpec, Operator, PathSegment};
    pub use crate::node::{Arg, Expression, Format, Node, Raw};
    pub use crate::statement::{Action, Model, Statement, Verb};
    pub use crate::terms;
    pub use crate::terms::{Flags, Term, Terms};
}
