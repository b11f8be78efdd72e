//! Expressions and predicates.
//!
//! Composite expressions render inside parentheses so that nesting never
//! depends on operator precedence: `("a" + 1)`, `(("a" = 1) AND ("b" = 2))`.

use super::clause::{
    BoxedClause, Clause, build_required, flag_text, non_empty, parse_flag, read_slot, read_value, write_slot,
};
use super::list::{ClauseList, WrappedList};
use super::operators::{BinaryOp, BooleanOp, Compare, Operator, Order};
use super::query::SubQuery;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter, read_clause};

fn boxed(clause: impl Clause + 'static) -> Option<BoxedClause> {
    Some(Box::new(clause))
}

fn slot(clause: &Option<BoxedClause>) -> Option<&dyn Clause> {
    clause.as_deref()
}

/// Read a `<Left>`/`<Right>`-style slot into `target` if `element` is named
/// `name`.
fn read_named_slot(
    target: &mut Option<BoxedClause>,
    name: &str,
    element: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
) -> DynaResult<bool> {
    if element.name != name {
        return Ok(false);
    }
    *target = read_slot(element, reader, ctx)?;
    Ok(true)
}

/// Arithmetic, bitwise or concatenation of two values.
#[derive(Debug, Default)]
pub struct Calc {
    left: Option<BoxedClause>,
    op: BinaryOp,
    right: Option<BoxedClause>,
    alias: Option<String>,
}

impl Calc {
    pub const ELEMENT: &'static str = "Calc";

    pub fn new(left: impl Clause + 'static, op: BinaryOp, right: impl Clause + 'static) -> Self {
        Self {
            left: boxed(left),
            op,
            right: boxed(right),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_empty(&alias.into());
        self
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }
}

impl Clause for Calc {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        build_required(slot(&self.left), builder, "Calc", "left operand")?;
        builder.write_operator(self.op.into())?;
        build_required(slot(&self.right), builder, "Calc", "right operand")?;
        builder.end_block()?;
        if let Some(alias) = &self.alias {
            builder.write_alias(alias)?;
        }
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Operator", self.op.as_str())?;
        writer.write_optional_attribute(ctx, "Alias", self.alias.as_deref())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Left", slot(&self.left))?;
        write_slot(writer, ctx, "Right", slot(&self.right))
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Operator" => self.op = value.parse()?,
            "Alias" => self.alias = non_empty(value),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        Ok(read_named_slot(&mut self.left, "Left", element, reader, ctx)?
            || read_named_slot(&mut self.right, "Right", element, reader, ctx)?)
    }
}

/// Two predicates joined by AND, OR or XOR.
#[derive(Debug)]
pub struct BooleanExpr {
    left: Option<BoxedClause>,
    op: BooleanOp,
    right: Option<BoxedClause>,
}

impl Default for BooleanExpr {
    fn default() -> Self {
        Self {
            left: None,
            op: BooleanOp::And,
            right: None,
        }
    }
}

impl BooleanExpr {
    pub const ELEMENT: &'static str = "BooleanOp";

    pub fn new(left: impl Clause + 'static, op: BooleanOp, right: impl Clause + 'static) -> Self {
        Self::from_boxed(Box::new(left), op, Box::new(right))
    }

    pub(crate) fn from_boxed(left: BoxedClause, op: BooleanOp, right: BoxedClause) -> Self {
        Self {
            left: Some(left),
            op,
            right: Some(right),
        }
    }

    pub fn and(left: impl Clause + 'static, right: impl Clause + 'static) -> Self {
        Self::new(left, BooleanOp::And, right)
    }

    pub fn or(left: impl Clause + 'static, right: impl Clause + 'static) -> Self {
        Self::new(left, BooleanOp::Or, right)
    }

    pub fn op(&self) -> BooleanOp {
        self.op
    }
}

/// Combine an optional existing predicate with another one.
pub(crate) fn combine(existing: Option<BoxedClause>, op: BooleanOp, next: BoxedClause) -> BoxedClause {
    match existing {
        Some(existing) => Box::new(BooleanExpr::from_boxed(existing, op, next)),
        None => next,
    }
}

impl Clause for BooleanExpr {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        build_required(slot(&self.left), builder, "BooleanOp", "left operand")?;
        builder.write_operator(self.op.into())?;
        build_required(slot(&self.right), builder, "BooleanOp", "right operand")?;
        builder.end_block()?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Operator", self.op.as_str())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Left", slot(&self.left))?;
        write_slot(writer, ctx, "Right", slot(&self.right))
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Operator" {
            self.op = value.parse()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        Ok(read_named_slot(&mut self.left, "Left", element, reader, ctx)?
            || read_named_slot(&mut self.right, "Right", element, reader, ctx)?)
    }
}

/// `left <op> right`
#[derive(Debug)]
pub struct Comparison {
    left: Option<BoxedClause>,
    op: Compare,
    right: Option<BoxedClause>,
}

impl Default for Comparison {
    fn default() -> Self {
        Self {
            left: None,
            op: Compare::Equals,
            right: None,
        }
    }
}

impl Comparison {
    pub const ELEMENT: &'static str = "Compare";

    pub fn new(left: impl Clause + 'static, op: Compare, right: impl Clause + 'static) -> Self {
        Self {
            left: boxed(left),
            op,
            right: boxed(right),
        }
    }

    pub fn op(&self) -> Compare {
        self.op
    }
}

impl Clause for Comparison {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        build_required(slot(&self.left), builder, "Compare", "left operand")?;
        builder.write_operator(self.op.into())?;
        build_required(slot(&self.right), builder, "Compare", "right operand")?;
        builder.end_block()?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Operator", self.op.as_str())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Left", slot(&self.left))?;
        write_slot(writer, ctx, "Right", slot(&self.right))
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Operator" {
            self.op = value.parse()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        Ok(read_named_slot(&mut self.left, "Left", element, reader, ctx)?
            || read_named_slot(&mut self.right, "Right", element, reader, ctx)?)
    }
}

/// `NOT (predicate)`
#[derive(Debug, Default)]
pub struct Not {
    inner: Option<BoxedClause>,
}

impl Not {
    pub const ELEMENT: &'static str = "Not";

    pub fn new(inner: impl Clause + 'static) -> Self {
        Self { inner: boxed(inner) }
    }
}

impl Clause for Not {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        builder.write_operator(Operator::Not)?;
        build_required(slot(&self.inner), builder, "Not", "operand")?;
        builder.end_block()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Operand", slot(&self.inner))
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        read_named_slot(&mut self.inner, "Operand", element, reader, ctx)
    }
}

/// `value BETWEEN min AND max`
#[derive(Debug, Default)]
pub struct Between {
    value: Option<BoxedClause>,
    min: Option<BoxedClause>,
    max: Option<BoxedClause>,
}

impl Between {
    pub const ELEMENT: &'static str = "Between";

    pub fn new(value: impl Clause + 'static, min: impl Clause + 'static, max: impl Clause + 'static) -> Self {
        Self {
            value: boxed(value),
            min: boxed(min),
            max: boxed(max),
        }
    }
}

impl Clause for Between {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        build_required(slot(&self.value), builder, "Between", "value")?;
        builder.write_operator(Operator::Between)?;
        build_required(slot(&self.min), builder, "Between", "lower bound")?;
        builder.write_operator(Operator::BetweenAnd)?;
        build_required(slot(&self.max), builder, "Between", "upper bound")?;
        builder.end_block()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Value", slot(&self.value))?;
        write_slot(writer, ctx, "Min", slot(&self.min))?;
        write_slot(writer, ctx, "Max", slot(&self.max))
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        Ok(read_named_slot(&mut self.value, "Value", element, reader, ctx)?
            || read_named_slot(&mut self.min, "Min", element, reader, ctx)?
            || read_named_slot(&mut self.max, "Max", element, reader, ctx)?)
    }
}

/// `value IN (a, b, c)` or `value IN (SELECT ...)`
#[derive(Debug, Default)]
pub struct In {
    value: Option<BoxedClause>,
    values: ClauseList<WrappedList>,
    query: Option<SubQuery>,
    negate: bool,
}

impl In {
    pub const ELEMENT: &'static str = "In";

    pub fn values<I, C>(value: impl Clause + 'static, values: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Clause + 'static,
    {
        Self {
            value: boxed(value),
            values: values.into_iter().map(|c| Box::new(c) as BoxedClause).collect(),
            query: None,
            negate: false,
        }
    }

    pub fn query(value: impl Clause + 'static, query: impl Into<SubQuery>) -> Self {
        Self {
            value: boxed(value),
            values: ClauseList::new(),
            query: Some(query.into()),
            negate: false,
        }
    }

    /// `NOT IN`
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Append one more candidate value.
    pub fn push(&mut self, value: impl Clause + 'static) {
        self.values.push(Box::new(value));
    }
}

impl Clause for In {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        build_required(slot(&self.value), builder, "In", "value")?;
        builder.write_operator(if self.negate { Operator::NotIn } else { Operator::In })?;
        match &self.query {
            Some(query) => {
                query.build_statement(builder)?;
            }
            None if self.values.is_empty() => return Err(DynaError::missing("In", "values")),
            None => {
                self.values.build_list(builder, false, false)?;
            }
        }
        builder.end_block()?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if self.negate {
            writer.write_attribute(ctx, "Not", flag_text(true))?;
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Value", slot(&self.value))?;
        self.values.write_xml_list(writer, ctx, "Values")?;
        if let Some(query) = &self.query {
            query.write_xml(writer, ctx)?;
        }
        Ok(())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Not" {
            self.negate = parse_flag(name, value)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        match element.name.as_str() {
            "Value" => self.value = read_slot(element, reader, ctx)?,
            "Values" => self.values.read_list_items(element, reader, ctx)?,
            SubQuery::ELEMENT => {
                let mut query = SubQuery::default();
                read_clause(&mut query, element, reader, ctx)?;
                self.query = Some(query);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// `EXISTS (SELECT ...)`
#[derive(Debug, Default)]
pub struct Exists {
    query: Option<SubQuery>,
    negate: bool,
}

impl Exists {
    pub const ELEMENT: &'static str = "Exists";

    pub fn new(query: impl Into<SubQuery>) -> Self {
        Self {
            query: Some(query.into()),
            negate: false,
        }
    }

    /// `NOT EXISTS`
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

impl Clause for Exists {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let query = self.query.as_ref().ok_or_else(|| DynaError::missing("Exists", "query"))?;
        builder.begin_block()?;
        builder.write_operator(if self.negate { Operator::NotExists } else { Operator::Exists })?;
        query.build_statement(builder)?;
        builder.end_block()?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if self.negate {
            writer.write_attribute(ctx, "Not", flag_text(true))?;
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.query {
            Some(query) => query.write_xml(writer, ctx),
            None => Ok(()),
        }
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Not" {
            self.negate = parse_flag(name, value)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if element.name != SubQuery::ELEMENT {
            return Ok(false);
        }
        let mut query = SubQuery::default();
        read_clause(&mut query, element, reader, ctx)?;
        self.query = Some(query);
        Ok(true)
    }
}

/// `item = value`, as used by UPDATE ... SET.
///
/// Unlike the other binary clauses an assignment is not parenthesized.
#[derive(Debug, Default)]
pub struct Assign {
    item: Option<BoxedClause>,
    value: Option<BoxedClause>,
}

impl Assign {
    pub const ELEMENT: &'static str = "Assign";

    pub fn new(item: impl Clause + 'static, value: impl Clause + 'static) -> Self {
        Self {
            item: boxed(item),
            value: boxed(value),
        }
    }
}

impl Clause for Assign {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        build_required(slot(&self.item), builder, "Assign", "item")?;
        builder.write_operator(Operator::Assign)?;
        build_required(slot(&self.value), builder, "Assign", "value")?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Item", slot(&self.item))?;
        write_slot(writer, ctx, "Value", slot(&self.value))
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        Ok(read_named_slot(&mut self.item, "Item", element, reader, ctx)?
            || read_named_slot(&mut self.value, "Value", element, reader, ctx)?)
    }
}

/// One ORDER BY item.
#[derive(Debug, Default)]
pub struct OrderBy {
    clause: Option<BoxedClause>,
    order: Order,
}

impl OrderBy {
    pub const ELEMENT: &'static str = "OrderBy";

    pub fn new(clause: impl Clause + 'static, order: Order) -> Self {
        Self {
            clause: boxed(clause),
            order,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }
}

impl Clause for OrderBy {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_order_clause(self.order)?;
        build_required(slot(&self.clause), builder, "OrderBy", "clause")?;
        builder.end_order_clause(self.order)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if self.order != Order::Default {
            writer.write_attribute(ctx, "Order", self.order.as_str())?;
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.clause {
            Some(clause) => clause.write_xml(writer, ctx),
            None => Ok(()),
        }
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Order" {
            self.order = value.parse()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if let Some(clause) = read_value(element, reader, ctx)? {
            self.clause = Some(clause);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Const, DbType, Field, Select, Table};
    use crate::transpiler::{Dialect, ToSql};

    fn int(n: i64) -> Const {
        Const::new(DbType::Int32, n)
    }

    #[test]
    fn test_calc_parenthesized() {
        let calc = Calc::new(Field::new("a"), BinaryOp::Add, int(1)).alias("next");
        assert_eq!(calc.to_sql().unwrap(), "(\"a\" + 1) AS \"next\"");
    }

    #[test]
    fn test_nested_predicates() {
        let expr = BooleanExpr::or(
            Comparison::new(Field::new("a"), Compare::Equals, int(1)),
            Not::new(Comparison::new(Field::new("b"), Compare::Is, Const::null())),
        );
        assert_eq!(
            expr.to_sql().unwrap(),
            "((\"a\" = 1) OR (NOT (\"b\" IS NULL)))"
        );
    }

    #[test]
    fn test_between_and_in() {
        let between = Between::new(Field::new("n"), int(1), int(5));
        assert_eq!(between.to_sql().unwrap(), "(\"n\" BETWEEN 1 AND 5)");

        let list = In::values(Field::new("n"), [int(1), int(2)]).negated();
        assert_eq!(list.to_sql().unwrap(), "(\"n\" NOT IN (1, 2))");

        let empty = In::values(Field::new("n"), Vec::<Const>::new());
        assert!(matches!(empty.to_sql(), Err(DynaError::MissingClause { .. })));
    }

    #[test]
    fn test_in_subquery_and_exists() {
        let query = Select::new().field("id").from(Table::new("t"));
        let expr = In::query(Field::new("id"), query);
        assert_eq!(
            expr.to_sql().unwrap(),
            "(\"id\" IN (SELECT \"id\" FROM \"t\"))"
        );

        let exists = Exists::new(Select::new().from(Table::new("t"))).negated();
        assert_eq!(exists.to_sql().unwrap(), "(NOT EXISTS (SELECT * FROM \"t\"))");
    }

    #[test]
    fn test_xor_is_dialect_specific() {
        let expr = BooleanExpr::new(
            Comparison::new(Field::new("a"), Compare::Equals, int(1)),
            BooleanOp::XOr,
            Comparison::new(Field::new("b"), Compare::Equals, int(2)),
        );
        assert!(expr.to_sql_with_dialect(Dialect::MySQL).is_ok());
        assert!(matches!(
            expr.to_sql_with_dialect(Dialect::SqlServer),
            Err(DynaError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_assign_and_order() {
        assert_eq!(Assign::new(Field::new("a"), int(1)).to_sql().unwrap(), "\"a\" = 1");
        assert_eq!(
            OrderBy::new(Field::new("a"), Order::Descending).to_sql().unwrap(),
            "\"a\" DESC"
        );
        assert_eq!(OrderBy::new(Field::new("a"), Order::Default).to_sql().unwrap(), "\"a\"");
    }

    #[test]
    fn test_missing_operand() {
        let err = Comparison::default().to_sql().unwrap_err();
        assert!(matches!(err, DynaError::MissingClause { clause: "Compare", .. }));
    }
}
