//! Predicate builders for WHERE, HAVING and ON.

use crate::ast::{Between, Clause, Compare, Comparison, Const, Exists, Field, In, Not, SubQuery, Value};

fn compare_value(column: &str, op: Compare, value: impl Into<Value>) -> Comparison {
    Comparison::new(Field::new(column), op, Const::from_value(value))
}

pub fn compare(left: impl Clause + 'static, op: Compare, right: impl Clause + 'static) -> Comparison {
    Comparison::new(left, op, right)
}

/// `column = value`
pub fn eq(column: &str, value: impl Into<Value>) -> Comparison {
    compare_value(column, Compare::Equals, value)
}

pub fn ne(column: &str, value: impl Into<Value>) -> Comparison {
    compare_value(column, Compare::NotEqual, value)
}

pub fn gt(column: &str, value: impl Into<Value>) -> Comparison {
    compare_value(column, Compare::GreaterThan, value)
}

pub fn gte(column: &str, value: impl Into<Value>) -> Comparison {
    compare_value(column, Compare::GreaterThanEqual, value)
}

pub fn lt(column: &str, value: impl Into<Value>) -> Comparison {
    compare_value(column, Compare::LessThan, value)
}

pub fn lte(column: &str, value: impl Into<Value>) -> Comparison {
    compare_value(column, Compare::LessThanEqual, value)
}

pub fn like(column: &str, pattern: &str) -> Comparison {
    compare_value(column, Compare::Like, pattern)
}

/// `column IS NULL`
pub fn is_null(column: &str) -> Comparison {
    Comparison::new(Field::new(column), Compare::Is, Const::null())
}

pub fn is_not_null(column: &str) -> Comparison {
    Comparison::new(Field::new(column), Compare::IsNot, Const::null())
}

pub fn between(column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Between {
    Between::new(Field::new(column), Const::from_value(min), Const::from_value(max))
}

/// `column IN (v1, v2, ...)`
pub fn in_list<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> In {
    In::values(Field::new(column), values.into_iter().map(Const::from_value))
}

pub fn not_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> In {
    in_list(column, values).negated()
}

pub fn exists(query: impl Into<SubQuery>) -> Exists {
    Exists::new(query)
}

pub fn not(predicate: impl Clause + 'static) -> Not {
    Not::new(predicate)
}
