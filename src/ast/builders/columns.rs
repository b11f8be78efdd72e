//! Names, literals and parameters.

use crate::ast::{AllFields, BinaryOp, Calc, Clause, Const, DbType, Field, Param, Table, Value};

/// A column reference
pub fn field(name: &str) -> Field {
    Field::new(name)
}

/// `table.name`
pub fn qualified(table: &str, name: &str) -> Field {
    Field::qualified(table, name)
}

/// `*`
pub fn all() -> AllFields {
    AllFields::new()
}

pub fn table(name: &str) -> Table {
    Table::new(name)
}

/// A literal typed after its value
pub fn value(value: impl Into<Value>) -> Const {
    Const::from_value(value)
}

pub fn typed(db_type: DbType, value: impl Into<Value>) -> Const {
    Const::new(db_type, value)
}

/// An explicit NULL
pub fn null() -> Const {
    Const::null()
}

pub fn param(name: &str, db_type: DbType) -> Param {
    Param::new(name, db_type)
}

/// `left <op> right`
pub fn calculate(left: impl Clause + 'static, op: BinaryOp, right: impl Clause + 'static) -> Calc {
    Calc::new(left, op, right)
}
