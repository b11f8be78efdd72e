use crate::ast::clause::{
    BoxedClause, Clause, build_optional, build_section, flag_text, parse_flag, parse_number, read_slot, write_slot,
};
use crate::ast::expr::{OrderBy, combine};
use crate::ast::fields::{AllFields, Field};
use crate::ast::hints::QueryOptionSet;
use crate::ast::joins::{Join, TableSource};
use crate::ast::list::{ClauseList, SpaceList, TokenList};
use crate::ast::operators::{BooleanOp, JoinType, Order, QueryOption};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter, read_child_elements};

use super::Top;

/// A SELECT statement.
///
/// Every part is optional. Without fields the select list is `*`; empty
/// sections such as WHERE or GROUP BY are left out entirely.
#[derive(Debug, Default)]
pub struct Select {
    distinct: bool,
    top: Option<Top>,
    fields: ClauseList,
    from: TokenList<TableSource>,
    joins: TokenList<Join, SpaceList>,
    filter: Option<BoxedClause>,
    group_by: ClauseList,
    having: Option<BoxedClause>,
    order_by: TokenList<OrderBy>,
    options: QueryOptionSet,
}

impl Select {
    pub const ELEMENT: &'static str = "Select";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn top(mut self, top: Top) -> Self {
        self.top = Some(top);
        self
    }

    pub fn top_percent(self, percent: i64) -> Self {
        self.top(Top::percent(percent))
    }

    /// `count` rows after skipping `offset`.
    pub fn top_range(self, offset: i64, count: i64) -> Self {
        self.top(Top::range(offset, count))
    }

    /// Add an item to the select list.
    pub fn select(mut self, clause: impl Clause + 'static) -> Self {
        self.fields.push(Box::new(clause));
        self
    }

    /// Add a column to the select list by name.
    pub fn field(self, name: &str) -> Self {
        self.select(Field::new(name))
    }

    pub fn select_all(self) -> Self {
        self.select(AllFields::new())
    }

    pub fn from(mut self, source: impl Into<TableSource>) -> Self {
        self.from.push(source.into());
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn inner_join(self, target: impl Into<TableSource>, on: impl Clause + 'static) -> Self {
        self.join(Join::new(JoinType::InnerJoin, target).on(on))
    }

    pub fn left_join(self, target: impl Into<TableSource>, on: impl Clause + 'static) -> Self {
        self.join(Join::new(JoinType::LeftOuter, target).on(on))
    }

    pub fn right_join(self, target: impl Into<TableSource>, on: impl Clause + 'static) -> Self {
        self.join(Join::new(JoinType::RightOuter, target).on(on))
    }

    pub fn full_join(self, target: impl Into<TableSource>, on: impl Clause + 'static) -> Self {
        self.join(Join::new(JoinType::FullOuter, target).on(on))
    }

    /// AND a comparison onto the ON clause of the last join.
    pub fn on(mut self, comparison: impl Clause + 'static) -> DynaResult<Self> {
        self.last_join()?.add_comparison(BooleanOp::And, Box::new(comparison));
        Ok(self)
    }

    /// Like [`on`](Self::on), but the last join must already have a comparison.
    pub fn and_on(mut self, comparison: impl Clause + 'static) -> DynaResult<Self> {
        self.last_join()?.extend_comparison(BooleanOp::And, Box::new(comparison))?;
        Ok(self)
    }

    pub fn or_on(mut self, comparison: impl Clause + 'static) -> DynaResult<Self> {
        self.last_join()?.extend_comparison(BooleanOp::Or, Box::new(comparison))?;
        Ok(self)
    }

    fn last_join(&mut self) -> DynaResult<&mut Join> {
        self.joins
            .last_mut()
            .ok_or_else(|| DynaError::invalid("ON needs a join to attach to"))
    }

    /// Replace the WHERE predicate.
    pub fn where_(mut self, predicate: impl Clause + 'static) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Set the WHERE predicate, or AND it to the existing one.
    pub fn and_where(mut self, predicate: impl Clause + 'static) -> Self {
        self.filter = Some(combine(self.filter.take(), BooleanOp::And, Box::new(predicate)));
        self
    }

    /// Set the WHERE predicate, or OR it to the existing one.
    pub fn or_where(mut self, predicate: impl Clause + 'static) -> Self {
        self.filter = Some(combine(self.filter.take(), BooleanOp::Or, Box::new(predicate)));
        self
    }

    pub fn group_by(mut self, clause: impl Clause + 'static) -> Self {
        self.group_by.push(Box::new(clause));
        self
    }

    /// Set the HAVING predicate, or AND it to the existing one.
    pub fn having(mut self, predicate: impl Clause + 'static) -> Self {
        self.having = Some(combine(self.having.take(), BooleanOp::And, Box::new(predicate)));
        self
    }

    pub fn order_by(mut self, clause: impl Clause + 'static, order: Order) -> Self {
        self.order_by.push(OrderBy::new(clause, order));
        self
    }

    /// Add a query option. Each option may appear once.
    pub fn option(mut self, option: QueryOption, value: Option<i64>) -> DynaResult<Self> {
        self.options.insert(option, value)?;
        Ok(self)
    }

    pub fn get_top(&self) -> Option<Top> {
        self.top
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn top_or_default(&self) -> Top {
        self.top.unwrap_or(Top::first(0))
    }
}

impl Clause for Select {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_select_statement()?;
        if self.distinct {
            builder.write_distinct()?;
        }
        if let Some(top) = &self.top {
            builder.write_top_prefix(top)?;
        }
        builder.begin_select_list()?;
        if !self.fields.build_list(builder, false, false)? {
            builder.write_all_fields(None, None)?;
        }
        builder.end_select_list()?;

        build_section(
            builder,
            |b| b.begin_from_list(),
            |b| self.from.build_list(b, false, false),
            |b| b.end_from_list(),
        )?;
        self.joins.build_list(builder, false, false)?;
        build_section(
            builder,
            |b| b.begin_where(),
            |b| build_optional(self.filter.as_deref(), b),
            |b| b.end_where(),
        )?;
        build_section(
            builder,
            |b| b.begin_group_by(),
            |b| self.group_by.build_list(b, false, false),
            |b| b.end_group_by(),
        )?;
        build_section(
            builder,
            |b| b.begin_having(),
            |b| build_optional(self.having.as_deref(), b),
            |b| b.end_having(),
        )?;
        build_section(
            builder,
            |b| b.begin_order_statement(),
            |b| self.order_by.build_list(b, false, false),
            |b| b.end_order_statement(),
        )?;

        if let Some(top) = &self.top {
            builder.write_top_suffix(top)?;
        }
        self.options.build(builder)?;
        builder.end_select_statement()?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if self.distinct {
            writer.write_attribute(ctx, "Distinct", flag_text(true))?;
        }
        if let Some(top) = &self.top {
            writer.write_attribute(ctx, "TopType", top.top_type().as_str())?;
            writer.write_attribute(ctx, "TopValue", &top.count().to_string())?;
            if top.offset() != 0 {
                writer.write_attribute(ctx, "TopOffset", &top.offset().to_string())?;
            }
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.fields.write_xml_list(writer, ctx, "Fields")?;
        self.from.write_xml_list(writer, ctx, "From")?;
        self.joins.write_xml_list(writer, ctx, "Joins")?;
        write_slot(writer, ctx, "Where", self.filter.as_deref())?;
        self.group_by.write_xml_list(writer, ctx, "GroupBy")?;
        write_slot(writer, ctx, "Having", self.having.as_deref())?;
        self.order_by.write_xml_list(writer, ctx, "Order")?;
        self.options.write_xml(writer, ctx)
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        let top = self.top_or_default();
        match name {
            "Distinct" => self.distinct = parse_flag(name, value)?,
            "TopType" => self.top = Some(Top::from_parts(value.parse()?, top.count(), top.offset())),
            "TopValue" => {
                self.top = Some(Top::from_parts(top.top_type(), parse_number(name, value)?, top.offset()))
            }
            "TopOffset" => {
                self.top = Some(Top::from_parts(top.top_type(), top.count(), parse_number(name, value)?))
            }
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
        match element.name.as_str() {
            "Fields" => self.fields.read_list_items(element, reader, ctx)?,
            "From" => {
                let from = &mut self.from;
                read_child_elements(element, reader, ctx, |child, reader, ctx| {
                    if let Some(source) = TableSource::read(child, reader, ctx)? {
                        from.push(source);
                    }
                    Ok(true)
                })?;
            }
            "Joins" => self.joins.read_typed_items(element, reader, ctx)?,
            "Where" => self.filter = read_slot(element, reader, ctx)?,
            "GroupBy" => self.group_by.read_list_items(element, reader, ctx)?,
            "Having" => self.having = read_slot(element, reader, ctx)?,
            "Order" => self.order_by.read_typed_items(element, reader, ctx)?,
            QueryOptionSet::ELEMENT => self.options.read_xml(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Aggregate, Compare, Comparison, Const, DbType, Table};
    use crate::transpiler::{Dialect, SqlBuilder, ToSql};

    fn eq(field: &str, n: i64) -> Comparison {
        Comparison::new(Field::new(field), Compare::Equals, Const::new(DbType::Int32, n))
    }

    #[test]
    fn test_empty_select_is_star() {
        assert_eq!(Select::new().to_sql().unwrap(), "SELECT *");
    }

    #[test]
    fn test_full_select() {
        let query = Select::new()
            .distinct()
            .field("dept")
            .select(Aggregate::count_all().alias("n"))
            .from(Table::new("staff").alias("s"))
            .and_where(eq("active", 1))
            .and_where(eq("grade", 3))
            .group_by(Field::new("dept"))
            .having(Comparison::new(Aggregate::count_all(), Compare::GreaterThan, Const::new(DbType::Int32, 5)))
            .order_by(Field::new("dept"), Order::Ascending)
            .top(Top::first(10));
        assert_eq!(
            query.to_sql().unwrap(),
            "SELECT DISTINCT \"dept\", COUNT(*) AS \"n\" FROM \"staff\" AS \"s\" \
             WHERE ((\"active\" = 1) AND (\"grade\" = 3)) GROUP BY \"dept\" \
             HAVING (COUNT(*) > 5) ORDER BY \"dept\" ASC LIMIT 10"
        );
        assert_eq!(
            query.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "SELECT DISTINCT TOP 10 [dept], COUNT(*) AS [n] FROM [staff] AS [s] \
             WHERE (([active] = 1) AND ([grade] = 3)) GROUP BY [dept] \
             HAVING (COUNT(*) > 5) ORDER BY [dept] ASC"
        );
    }

    #[test]
    fn test_joins_follow_from() {
        let query = Select::new()
            .from(Table::new("users").alias("u"))
            .left_join(
                Table::new("orders").alias("o"),
                Comparison::new(Field::qualified("o", "user_id"), Compare::Equals, Field::qualified("u", "id")),
            );
        assert_eq!(
            query.to_sql().unwrap(),
            "SELECT * FROM \"users\" AS \"u\" LEFT OUTER JOIN \"orders\" AS \"o\" \
             ON (\"o\".\"user_id\" = \"u\".\"id\")"
        );
    }

    #[test]
    fn test_pretty_layout() {
        let query = Select::new().field("a").from(Table::new("t")).and_where(eq("a", 1));
        let mut builder = SqlBuilder::new(Dialect::Postgres).pretty(true);
        query.build_statement(&mut builder).unwrap();
        assert_eq!(builder.finish(), "SELECT \"a\"\nFROM \"t\"\nWHERE (\"a\" = 1)");
    }

    #[test]
    fn test_query_options() {
        let query = Select::new()
            .from(Table::new("t"))
            .option(QueryOption::MaxDop, Some(1))
            .unwrap()
            .option(QueryOption::Recompile, None)
            .unwrap();
        assert_eq!(
            query.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "SELECT * FROM [t] OPTION (MAXDOP 1, RECOMPILE)"
        );
        assert!(matches!(
            query.to_sql_with_dialect(Dialect::Postgres),
            Err(DynaError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_percent_top_unsupported_with_limit() {
        let query = Select::new().from(Table::new("t")).top(Top::percent(10));
        assert_eq!(
            query.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "SELECT TOP 10 PERCENT * FROM [t]"
        );
        assert!(query.to_sql_with_dialect(Dialect::Postgres).is_err());
    }

    #[test]
    fn test_on_extends_last_join() {
        let key = || Comparison::new(Field::qualified("o", "user_id"), Compare::Equals, Field::qualified("u", "id"));
        assert!(matches!(Select::new().on(key()), Err(DynaError::InvalidArgument(_))));

        let query = Select::new()
            .from(Table::new("users").alias("u"))
            .join(Join::new(JoinType::InnerJoin, Table::new("orders").alias("o")));
        assert!(matches!(query.and_on(key()), Err(DynaError::NoExistingComparison)));

        let query = Select::new()
            .from(Table::new("users").alias("u"))
            .join(Join::new(JoinType::InnerJoin, Table::new("orders").alias("o")))
            .on(key())
            .unwrap()
            .or_on(eq("o.flag", 1))
            .unwrap();
        assert!(query.to_sql().unwrap().ends_with("OR (\"o.flag\" = 1))"));
    }

    #[test]
    fn test_top_range_and_where_replace() {
        let query = Select::new()
            .from(Table::new("t"))
            .and_where(eq("a", 1))
            .where_(eq("b", 2))
            .top_range(20, 10);
        assert_eq!(query.to_sql().unwrap(), "SELECT * FROM \"t\" WHERE (\"b\" = 2) LIMIT 10 OFFSET 20");
        assert_eq!(
            query.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "SELECT * FROM [t] WHERE ([b] = 2) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }
}
