//! Fluent operators on any clause.

use crate::ast::{
    Assign, Between, BinaryOp, BooleanExpr, BooleanOp, Calc, Clause, Compare, Comparison, Const, In, Not, Order,
    OrderBy,
};

/// Operator sugar for every clause. Each method builds the same tree as the
/// corresponding constructor, so `a.plus(b)` and
/// `Calc::new(a, BinaryOp::Add, b)` render identically.
pub trait ClauseExt: Clause + Sized + 'static {
    fn calculate(self, op: BinaryOp, right: impl Clause + 'static) -> Calc {
        Calc::new(self, op, right)
    }

    fn plus(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::Add, right)
    }

    fn minus(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::Subtract, right)
    }

    fn times(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::Multiply, right)
    }

    fn divide(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::Divide, right)
    }

    fn modulo(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::Modulo, right)
    }

    fn bitwise_and(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::BitwiseAnd, right)
    }

    fn bitwise_or(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::BitwiseOr, right)
    }

    fn concat(self, right: impl Clause + 'static) -> Calc {
        self.calculate(BinaryOp::Concat, right)
    }

    fn compare(self, op: Compare, right: impl Clause + 'static) -> Comparison {
        Comparison::new(self, op, right)
    }

    fn equals(self, right: impl Clause + 'static) -> Comparison {
        self.compare(Compare::Equals, right)
    }

    fn not_equals(self, right: impl Clause + 'static) -> Comparison {
        self.compare(Compare::NotEqual, right)
    }

    fn less_than(self, right: impl Clause + 'static) -> Comparison {
        self.compare(Compare::LessThan, right)
    }

    fn less_or_equal(self, right: impl Clause + 'static) -> Comparison {
        self.compare(Compare::LessThanEqual, right)
    }

    fn greater_than(self, right: impl Clause + 'static) -> Comparison {
        self.compare(Compare::GreaterThan, right)
    }

    fn greater_or_equal(self, right: impl Clause + 'static) -> Comparison {
        self.compare(Compare::GreaterThanEqual, right)
    }

    fn like(self, pattern: impl Clause + 'static) -> Comparison {
        self.compare(Compare::Like, pattern)
    }

    fn is_null(self) -> Comparison {
        self.compare(Compare::Is, Const::null())
    }

    fn is_not_null(self) -> Comparison {
        self.compare(Compare::IsNot, Const::null())
    }

    fn between(self, min: impl Clause + 'static, max: impl Clause + 'static) -> Between {
        Between::new(self, min, max)
    }

    fn in_values<I, C>(self, values: I) -> In
    where
        I: IntoIterator<Item = C>,
        C: Clause + 'static,
    {
        In::values(self, values)
    }

    fn and(self, right: impl Clause + 'static) -> BooleanExpr {
        BooleanExpr::new(self, BooleanOp::And, right)
    }

    fn or(self, right: impl Clause + 'static) -> BooleanExpr {
        BooleanExpr::new(self, BooleanOp::Or, right)
    }

    fn xor(self, right: impl Clause + 'static) -> BooleanExpr {
        BooleanExpr::new(self, BooleanOp::XOr, right)
    }

    fn negate(self) -> Not {
        Not::new(self)
    }

    fn asc(self) -> OrderBy {
        OrderBy::new(self, Order::Ascending)
    }

    fn desc(self) -> OrderBy {
        OrderBy::new(self, Order::Descending)
    }

    /// `self = value`, for UPDATE SET
    fn assign(self, value: impl Clause + 'static) -> Assign {
        Assign::new(self, value)
    }
}

impl<T: Clause + 'static> ClauseExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{field, value};
    use crate::ast::{BinaryOp, Field};
    use crate::transpiler::{Dialect, ToSql};

    #[test]
    fn test_sugar_matches_constructors() {
        let pairs = [
            (field("a").plus(value(1)), BinaryOp::Add),
            (field("a").minus(value(1)), BinaryOp::Subtract),
            (field("a").times(value(1)), BinaryOp::Multiply),
            (field("a").divide(value(1)), BinaryOp::Divide),
            (field("a").modulo(value(1)), BinaryOp::Modulo),
            (field("a").bitwise_and(value(1)), BinaryOp::BitwiseAnd),
            (field("a").bitwise_or(value(1)), BinaryOp::BitwiseOr),
            (field("a").concat(value(1)), BinaryOp::Concat),
        ];
        for (sugar, op) in pairs {
            let explicit = Calc::new(Field::new("a"), op, value(1));
            assert_eq!(sugar.to_sql().unwrap(), explicit.to_sql().unwrap());
            assert_eq!(sugar.op(), op);
        }
    }

    #[test]
    fn test_predicate_sugar() {
        let predicate = field("age").greater_or_equal(value(18)).and(field("name").is_not_null());
        assert_eq!(
            predicate.to_sql().unwrap(),
            "((\"age\" >= 18) AND (\"name\" IS NOT NULL))"
        );
        assert_eq!(field("a").negate().to_sql().unwrap(), "(NOT \"a\")");
        assert_eq!(field("d").desc().to_sql().unwrap(), "\"d\" DESC");
    }

    #[test]
    fn test_xor_support() {
        let flags = field("a").equals(value(1)).xor(field("b").equals(value(1)));
        assert!(flags.to_sql_with_dialect(Dialect::MySQL).unwrap().contains(" XOR "));
        assert!(flags.to_sql_with_dialect(Dialect::Postgres).is_err());
    }
}
