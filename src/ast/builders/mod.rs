//! Free-function constructors for the common clauses.
//!
//! ```
//! use dynasql::ast::builders::*;
//! use dynasql::ast::Select;
//! use dynasql::ToSql;
//!
//! let query = Select::new()
//!     .select(field("price").times(value(2)).alias("double"))
//!     .from("items")
//!     .and_where(gt("price", 10));
//! assert_eq!(
//!     query.to_sql().unwrap(),
//!     "SELECT (\"price\" * 2) AS \"double\" FROM \"items\" WHERE (\"price\" > 10)"
//! );
//! ```

mod aggregates;
mod columns;
mod conditions;
mod ext;

pub use aggregates::*;
pub use columns::*;
pub use conditions::*;
pub use ext::ClauseExt;
