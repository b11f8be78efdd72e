//! The clause object model.
//!
//! Every node of a statement tree implements [`Clause`]. Value clauses
//! (fields, constants, parameters, expressions) compose into statements
//! (queries, DDL and script commands), and statements compose into scripts.

#[macro_use]
mod named;

pub mod builders;
pub mod clause;
pub mod consts;
pub mod ddl;
pub mod expr;
pub mod fields;
pub mod functions;
pub mod hints;
pub mod joins;
pub mod list;
pub mod operators;
pub mod params;
pub mod query;
pub mod script;
pub mod values;

pub use builders::ClauseExt;
pub use clause::{BoxedClause, Clause};
pub use consts::Const;
pub use ddl::{
    Column, CreateIndex, CreateOptions, CreateProcedure, CreateSequence, CreateTable, CreateView,
    DropStatement, ForeignKey, IndexColumn, PrimaryKey, SequenceOptions, TableItem,
};
pub use expr::{Assign, Between, BooleanExpr, Calc, Comparison, Exists, In, Not, OrderBy};
pub use fields::{AllFields, Field, Table};
pub use functions::{Aggregate, Function, FunctionKind};
pub use hints::{QueryOptionSet, TableHintSet};
pub use joins::{Join, TableSource};
pub use list::{
    ClauseList, ColumnList, CommaList, ListStyle, SpaceList, StatementList, TokenList, WrappedList,
};
pub use operators::*;
pub use params::Param;
pub use query::{Delete, Insert, Select, SubQuery, Top, Update};
pub use script::{Declare, Return, Script, Set, Use};
pub use values::{ColumnFlags, DbType, Value};
