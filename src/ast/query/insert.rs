use crate::ast::clause::{Clause, read_typed};
use crate::ast::fields::{Field, Table};
use crate::ast::list::{ClauseList, ColumnList, TokenList};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

use super::Select;

/// `INSERT INTO table (fields) VALUES (...)` or `INSERT INTO table (fields) SELECT ...`
#[derive(Debug, Default)]
pub struct Insert {
    table: Option<Table>,
    fields: TokenList<Field, ColumnList>,
    values: ClauseList,
    select: Option<Box<Select>>,
}

impl Insert {
    pub const ELEMENT: &'static str = "Insert";

    pub fn into_table(table: impl Into<Table>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }

    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn value(mut self, value: impl Clause + 'static) -> Self {
        self.values.push(Box::new(value));
        self
    }

    /// Add a column together with its value.
    pub fn set(self, field: impl Into<Field>, value: impl Clause + 'static) -> Self {
        self.field(field).value(value)
    }

    /// Insert the rows of a select instead of a VALUES list.
    pub fn select(mut self, select: Select) -> Self {
        self.select = Some(Box::new(select));
        self
    }
}

impl Clause for Insert {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let table = self.table.as_ref().ok_or_else(|| DynaError::missing("Insert", "table"))?;
        builder.begin_insert_statement()?;
        table.build_statement(builder)?;
        if !self.fields.is_empty() {
            self.fields.build_list(builder, false, false)?;
        }
        match &self.select {
            Some(select) => {
                builder.begin_new_line()?;
                select.build_statement(builder)?;
            }
            None if self.values.is_empty() => return Err(DynaError::missing("Insert", "values")),
            None => {
                builder.begin_insert_value_list()?;
                self.values.build_list(builder, false, false)?;
                builder.end_insert_value_list()?;
            }
        }
        builder.end_insert_statement()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if let Some(table) = &self.table {
            table.write_xml(writer, ctx)?;
        }
        self.fields.write_xml_list(writer, ctx, "Fields")?;
        self.values.write_xml_list(writer, ctx, "Values")?;
        if let Some(select) = &self.select {
            select.write_xml(writer, ctx)?;
        }
        Ok(())
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        match element.name.as_str() {
            Table::ELEMENT => self.table = read_typed(element, reader, ctx)?,
            Select::ELEMENT => self.select = read_typed::<Select>(element, reader, ctx)?.map(Box::new),
            "Fields" => self.fields.read_typed_items(element, reader, ctx)?,
            "Values" => self.values.read_list_items(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Const, DbType, Param};
    use crate::transpiler::{Dialect, ToSql};

    #[test]
    fn test_insert_values() {
        let insert = Insert::into_table("users")
            .set("name", Param::new("name", DbType::String))
            .set("age", Const::new(DbType::Int32, 30));
        assert_eq!(
            insert.to_sql().unwrap(),
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES ($1, 30)"
        );
        assert_eq!(
            insert.to_sql_with_dialect(Dialect::MySQL).unwrap(),
            "INSERT INTO `users` (`name`, `age`) VALUES (?, 30)"
        );
    }

    #[test]
    fn test_insert_select() {
        let insert = Insert::into_table("archive")
            .field("id")
            .select(Select::new().field("id").from(Table::new("users")));
        assert_eq!(
            insert.to_sql().unwrap(),
            "INSERT INTO \"archive\" (\"id\") SELECT \"id\" FROM \"users\""
        );
    }

    #[test]
    fn test_insert_requires_values() {
        assert!(matches!(
            Insert::into_table("t").field("a").to_sql(),
            Err(DynaError::MissingClause { part: "values", .. })
        ));
        assert!(matches!(
            Insert::default().to_sql(),
            Err(DynaError::MissingClause { part: "table", .. })
        ));
    }
}
