//! # DynaSQL
//!
//! A provider-agnostic object model for SQL statements.
//!
//! Statements are trees of clauses. The same tree renders to SQL for any
//! supported dialect and serializes to (and reads back from) XML.
//!
//! ## Quick Example
//!
//! ```
//! use dynasql::prelude::*;
//!
//! let query = Select::new()
//!     .select(Field::new("id"))
//!     .from(Table::new("users"))
//!     .where_(eq("active", true));
//!
//! let sql = query.to_sql_with_dialect(Dialect::SqlServer).unwrap();
//! assert_eq!(sql, "SELECT [id] FROM [users] WHERE ([active] = 1)");
//! ```
//!
//! ## Layout
//!
//! | Module         | Purpose                                      |
//! |----------------|----------------------------------------------|
//! | [`ast`]        | Clause types, statements and scripts         |
//! | [`transpiler`] | Statement builder events and SQL dialects    |
//! | [`xml`]        | XML writer, reader and element factory       |
//! | [`config`]     | TOML settings for dialect and XML namespaces |

pub mod ast;
pub mod config;
pub mod error;
pub mod transpiler;
pub mod xml;

pub use config::DynaConfig;
pub use error::{DynaError, DynaResult};
pub use transpiler::{Dialect, ToSql};

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::DynaConfig;
    pub use crate::error::*;
    pub use crate::transpiler::{Dialect, SqlBuilder, StatementBuilder, ToSql};
    pub use crate::xml::{XmlContext, XmlFactory, from_xml, to_xml};
}
