//! Aggregate and scalar function builders.

use crate::ast::{Aggregate, AggregateFunction, Clause, Function, FunctionKind};

/// `COUNT(*)`
pub fn count_all() -> Aggregate {
    Aggregate::count_all()
}

pub fn count(inner: impl Clause + 'static) -> Aggregate {
    Aggregate::new(AggregateFunction::Count, inner)
}

pub fn sum(inner: impl Clause + 'static) -> Aggregate {
    Aggregate::new(AggregateFunction::Sum, inner)
}

pub fn avg(inner: impl Clause + 'static) -> Aggregate {
    Aggregate::new(AggregateFunction::Avg, inner)
}

pub fn min(inner: impl Clause + 'static) -> Aggregate {
    Aggregate::new(AggregateFunction::Min, inner)
}

pub fn max(inner: impl Clause + 'static) -> Aggregate {
    Aggregate::new(AggregateFunction::Max, inner)
}

/// Current date and time, spelled per dialect
pub fn now() -> Function {
    Function::new(FunctionKind::GetDate)
}

/// First argument, or `fallback` when it is NULL
pub fn coalesce(value: impl Clause + 'static, fallback: impl Clause + 'static) -> Function {
    Function::new(FunctionKind::IsNull).arg(value).arg(fallback)
}

pub fn upper(value: impl Clause + 'static) -> Function {
    Function::new(FunctionKind::Upper).arg(value)
}

pub fn lower(value: impl Clause + 'static) -> Function {
    Function::new(FunctionKind::Lower).arg(value)
}
