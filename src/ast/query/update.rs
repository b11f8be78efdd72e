use crate::ast::clause::{BoxedClause, Clause, build_optional, build_section, read_slot, read_typed, write_slot};
use crate::ast::expr::{Assign, combine};
use crate::ast::fields::{Field, Table};
use crate::ast::list::TokenList;
use crate::ast::operators::BooleanOp;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

/// `UPDATE table SET a = 1, b = 2 WHERE ...`
#[derive(Debug, Default)]
pub struct Update {
    table: Option<Table>,
    assignments: TokenList<Assign>,
    filter: Option<BoxedClause>,
}

impl Update {
    pub const ELEMENT: &'static str = "Update";

    pub fn table(table: impl Into<Table>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }

    pub fn set(mut self, field: impl Into<Field>, value: impl Clause + 'static) -> Self {
        self.assignments.push(Assign::new(field.into(), value));
        self
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

impl Clause for Update {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let table = self.table.as_ref().ok_or_else(|| DynaError::missing("Update", "table"))?;
        if self.assignments.is_empty() {
            return Err(DynaError::missing("Update", "assignments"));
        }
        builder.begin_update_statement()?;
        table.build_statement(builder)?;
        builder.begin_set_value_list()?;
        self.assignments.build_list(builder, false, false)?;
        builder.end_set_value_list()?;
        build_section(
            builder,
            |b| b.begin_where(),
            |b| build_optional(self.filter.as_deref(), b),
            |b| b.end_where(),
        )?;
        builder.end_update_statement()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if let Some(table) = &self.table {
            table.write_xml(writer, ctx)?;
        }
        self.assignments.write_xml_list(writer, ctx, "Assignments")?;
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
            "Assignments" => self.assignments.read_typed_items(element, reader, ctx)?,
            "Where" => self.filter = read_slot(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
