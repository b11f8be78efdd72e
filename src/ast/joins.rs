//! Join clauses and the sources they (and FROM) can name.

use super::clause::{BoxedClause, Clause, read_slot, write_slot};
use super::expr::combine;
use super::fields::Table;
use super::operators::{BooleanOp, JoinType};
use super::query::SubQuery;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter, read_child_elements, read_clause};

/// A table or a derived table.
#[derive(Debug)]
pub enum TableSource {
    Table(Table),
    SubQuery(SubQuery),
}

impl Default for TableSource {
    fn default() -> Self {
        TableSource::Table(Table::default())
    }
}

impl TableSource {
    pub fn set_alias(&mut self, alias: &str) {
        match self {
            TableSource::Table(table) => table.set_alias(alias),
            TableSource::SubQuery(query) => query.set_alias(alias),
        }
    }

    fn inner(&self) -> &dyn Clause {
        match self {
            TableSource::Table(table) => table,
            TableSource::SubQuery(query) => query,
        }
    }

    /// Read a `<Table>` or `<SubQuery>` element. Other registered clauses are
    /// a type mismatch; unknown elements are skipped.
    pub(crate) fn read(
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<Option<TableSource>> {
        let mut source = match element.name.as_str() {
            Table::ELEMENT => TableSource::Table(Table::default()),
            SubQuery::ELEMENT => TableSource::SubQuery(SubQuery::default()),
            other if ctx.factory().contains(other) => {
                return Err(DynaError::mismatch("Table or SubQuery", other));
            }
            _ => {
                reader.skip_element(element)?;
                return Ok(None);
            }
        };
        match &mut source {
            TableSource::Table(table) => read_clause(table, element, reader, ctx)?,
            TableSource::SubQuery(query) => read_clause(query, element, reader, ctx)?,
        }
        Ok(Some(source))
    }
}

impl From<Table> for TableSource {
    fn from(table: Table) -> Self {
        TableSource::Table(table)
    }
}

impl From<SubQuery> for TableSource {
    fn from(query: SubQuery) -> Self {
        TableSource::SubQuery(query)
    }
}

impl From<&str> for TableSource {
    fn from(name: &str) -> Self {
        TableSource::Table(Table::new(name))
    }
}

impl Clause for TableSource {
    fn xml_element_name(&self) -> &'static str {
        self.inner().xml_element_name()
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        self.inner().build_statement(builder)
    }

    fn write_xml(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.inner().write_xml(writer, ctx)
    }
}

/// `<type> JOIN target ON comparison`
#[derive(Debug)]
pub struct Join {
    join_type: JoinType,
    target: Option<TableSource>,
    comparison: Option<BoxedClause>,
}

impl Default for Join {
    fn default() -> Self {
        Self {
            join_type: JoinType::InnerJoin,
            target: None,
            comparison: None,
        }
    }
}

impl Join {
    pub const ELEMENT: &'static str = "Join";

    pub fn new(join_type: JoinType, target: impl Into<TableSource>) -> Self {
        Self {
            join_type,
            target: Some(target.into()),
            comparison: None,
        }
    }

    /// Set the ON comparison, AND-ing it to one already present.
    pub fn on(mut self, comparison: impl Clause + 'static) -> Self {
        self.add_comparison(BooleanOp::And, Box::new(comparison));
        self
    }

    /// AND another comparison onto the existing one.
    pub fn and(mut self, comparison: impl Clause + 'static) -> DynaResult<Self> {
        self.extend_comparison(BooleanOp::And, Box::new(comparison))?;
        Ok(self)
    }

    /// OR another comparison onto the existing one.
    pub fn or(mut self, comparison: impl Clause + 'static) -> DynaResult<Self> {
        self.extend_comparison(BooleanOp::Or, Box::new(comparison))?;
        Ok(self)
    }

    /// Alias the joined table or sub-query.
    pub fn alias(mut self, alias: &str) -> Self {
        if let Some(target) = &mut self.target {
            target.set_alias(alias);
        }
        self
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn has_comparison(&self) -> bool {
        self.comparison.is_some()
    }

    pub(crate) fn add_comparison(&mut self, op: BooleanOp, comparison: BoxedClause) {
        self.comparison = Some(combine(self.comparison.take(), op, comparison));
    }

    pub(crate) fn extend_comparison(&mut self, op: BooleanOp, comparison: BoxedClause) -> DynaResult<()> {
        if self.comparison.is_none() {
            return Err(DynaError::NoExistingComparison);
        }
        self.add_comparison(op, comparison);
        Ok(())
    }
}

impl Clause for Join {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let target = self.target.as_ref().ok_or_else(|| DynaError::missing("Join", "target"))?;
        let comparison = self
            .comparison
            .as_ref()
            .ok_or_else(|| DynaError::missing("Join", "comparison"))?;
        builder.begin_join(self.join_type)?;
        target.build_statement(builder)?;
        builder.begin_join_on_list()?;
        comparison.build_statement(builder)?;
        builder.end_join_on_list()?;
        builder.end_join(self.join_type)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Type", self.join_type.as_str())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Target", self.target.as_ref().map(|t| t as &dyn Clause))?;
        write_slot(writer, ctx, "On", self.comparison.as_deref())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Type" {
            self.join_type = value.parse()?;
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
            "Target" => {
                let mut found = None;
                read_child_elements(element, reader, ctx, |child, reader, ctx| {
                    if let Some(source) = TableSource::read(child, reader, ctx)? {
                        found.get_or_insert(source);
                    }
                    Ok(true)
                })?;
                self.target = found;
            }
            "On" => self.comparison = read_slot(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Compare, Comparison, Field};
    use crate::transpiler::ToSql;

    fn key_match() -> Comparison {
        Comparison::new(Field::qualified("o", "user_id"), Compare::Equals, Field::qualified("u", "id"))
    }

    #[test]
    fn test_join_rendering() {
        let join = Join::new(JoinType::LeftOuter, Table::new("orders")).alias("o").on(key_match());
        assert_eq!(
            join.to_sql().unwrap(),
            " LEFT OUTER JOIN \"orders\" AS \"o\" ON (\"o\".\"user_id\" = \"u\".\"id\")"
        );
    }

    #[test]
    fn test_and_requires_existing_comparison() {
        let join = Join::new(JoinType::InnerJoin, Table::new("t"));
        assert!(matches!(join.and(key_match()), Err(DynaError::NoExistingComparison)));

        let join = Join::new(JoinType::InnerJoin, Table::new("t"))
            .on(key_match())
            .or(key_match())
            .unwrap();
        assert!(join.to_sql().unwrap().contains(" OR "));
    }

    #[test]
    fn test_join_without_comparison_fails() {
        let join = Join::new(JoinType::InnerJoin, Table::new("t"));
        assert!(matches!(join.to_sql(), Err(DynaError::MissingClause { part: "comparison", .. })));
    }
}
