use crate::ast::clause::{BoxedClause, Clause, build_optional, build_section, read_slot, read_typed, write_slot};
use crate::ast::expr::combine;
use crate::ast::fields::Table;
use crate::ast::operators::BooleanOp;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

/// `DELETE FROM table WHERE ...`
#[derive(Debug, Default)]
pub struct Delete {
    table: Option<Table>,
    filter: Option<BoxedClause>,
}

impl Delete {
    pub const ELEMENT: &'static str = "Delete";

    pub fn table(table: impl Into<Table>) -> Self {
        Self {
            table: Some(table.into()),
            filter: None,
        }
    }

    pub fn and_where(mut self, predicate: impl Clause + 'static) -> Self {
        self.filter = Some(combine(self.filter.take(), BooleanOp::And, Box::new(predicate)));
        self
    }

    pub fn or_where(mut self, predicate: impl Clause + 'static) -> Self {
        self.filter = Some(combine(self.filter.take(), BooleanOp::Or, Box::new(predicate)));
        self
    }
}

impl Clause for Delete {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let table = self.table.as_ref().ok_or_else(|| DynaError::missing("Delete", "table"))?;
        builder.begin_delete_statement()?;
        table.build_statement(builder)?;
        build_section(
            builder,
            |b| b.begin_where(),
            |b| build_optional(self.filter.as_deref(), b),
            |b| b.end_where(),
        )?;
        builder.end_delete_statement()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if let Some(table) = &self.table {
            table.write_xml(writer, ctx)?;
        }
        write_slot(writer, ctx, "Where", self.filter.as_deref())
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        match element.name.as_str() {
            Table::ELEMENT => self.table = read_typed(element, reader, ctx)?,
            "Where" => self.filter = read_slot(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Compare, Comparison, Const, DbType, Field};
    use crate::transpiler::ToSql;

    #[test]
    fn test_delete() {
        assert_eq!(Delete::table("logs").to_sql().unwrap(), "DELETE FROM \"logs\"");
        let delete = Delete::table("logs").and_where(Comparison::new(
            Field::new("age"),
            Compare::GreaterThan,
            Const::new(DbType::Int32, 30),
        ));
        assert_eq!(delete.to_sql().unwrap(), "DELETE FROM \"logs\" WHERE (\"age\" > 30)");
    }
}
