//! Column and table references.

use super::clause::{Clause, non_empty};
use super::hints::TableHintSet;
use super::operators::TableHint;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

/// A column reference, optionally qualified by table and owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    owner: Option<String>,
    table: Option<String>,
    name: String,
    alias: Option<String>,
}

impl Field {
    pub const ELEMENT: &'static str = "Field";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `table.name`
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(name).table(table)
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = non_empty(&table.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = non_empty(&owner.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_empty(&alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl Clause for Field {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.name.is_empty() {
            return Err(DynaError::missing("Field", "name"));
        }
        builder.write_source_field(
            self.owner.as_deref(),
            self.table.as_deref(),
            &self.name,
            self.alias.as_deref(),
        )?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Owner", self.owner.as_deref())?;
        writer.write_optional_attribute(ctx, "Table", self.table.as_deref())?;
        writer.write_attribute(ctx, "Name", &self.name)?;
        writer.write_optional_attribute(ctx, "Alias", self.alias.as_deref())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Owner" => self.owner = non_empty(value),
            "Table" => self.table = non_empty(value),
            "Name" => self.name = value.to_string(),
            "Alias" => self.alias = non_empty(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

/// `*` or `table.*`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllFields {
    owner: Option<String>,
    table: Option<String>,
}

impl AllFields {
    pub const ELEMENT: &'static str = "AllFields";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_table(table: impl Into<String>) -> Self {
        Self {
            owner: None,
            table: non_empty(&table.into()),
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = non_empty(&owner.into());
        self
    }
}

impl Clause for AllFields {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.write_all_fields(self.owner.as_deref(), self.table.as_deref())?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Owner", self.owner.as_deref())?;
        writer.write_optional_attribute(ctx, "Table", self.table.as_deref())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Owner" => self.owner = non_empty(value),
            "Table" => self.table = non_empty(value),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A table reference with optional owner, alias and table hints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    owner: Option<String>,
    name: String,
    alias: Option<String>,
    hints: TableHintSet,
}

impl Table {
    pub const ELEMENT: &'static str = "Table";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = non_empty(&owner.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_empty(&alias.into());
        self
    }

    /// Add a table hint. Each hint may appear once.
    pub fn hint(mut self, hint: TableHint) -> DynaResult<Self> {
        self.hints.insert(hint, Vec::new())?;
        Ok(self)
    }

    /// `WITH (INDEX(...))`
    pub fn index_hint<I, S>(mut self, indexes: I) -> DynaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = indexes.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(DynaError::invalid("an index hint needs at least one index name"));
        }
        self.hints.insert(TableHint::Index, names)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn hints(&self) -> &TableHintSet {
        &self.hints
    }

    pub(crate) fn set_alias(&mut self, alias: &str) {
        self.alias = non_empty(alias);
    }
}

impl Clause for Table {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.name.is_empty() {
            return Err(DynaError::missing("Table", "name"));
        }
        builder.write_source_table(self.owner.as_deref(), &self.name, self.alias.as_deref())?;
        self.hints.build(builder)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Owner", self.owner.as_deref())?;
        writer.write_attribute(ctx, "Name", &self.name)?;
        writer.write_optional_attribute(ctx, "Alias", self.alias.as_deref())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.hints.write_xml(writer, ctx)
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Owner" => self.owner = non_empty(value),
            "Name" => self.name = value.to_string(),
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
        if element.name == TableHintSet::ELEMENT {
            self.hints.read_xml(element, reader, ctx)?;
            return Ok(true);
        }
        Ok(false)
    }
}

impl From<&str> for Table {
    fn from(name: &str) -> Self {
        Table::new(name)
    }
}

impl From<String> for Table {
    fn from(name: String) -> Self {
        Table::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::{Dialect, ToSql};

    #[test]
    fn test_field_rendering() {
        assert_eq!(Field::new("id").to_sql().unwrap(), "\"id\"");
        assert_eq!(
            Field::qualified("u", "id").alias("uid").to_sql().unwrap(),
            "\"u\".\"id\" AS \"uid\""
        );
        assert_eq!(
            Field::new("id").table("users").owner("dbo").to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "[dbo].[users].[id]"
        );
    }

    #[test]
    fn test_field_without_name_fails() {
        assert!(Field::default().to_sql().is_err());
    }

    #[test]
    fn test_all_fields() {
        assert_eq!(AllFields::new().to_sql().unwrap(), "*");
        assert_eq!(AllFields::of_table("u").to_sql().unwrap(), "\"u\".*");
    }

    #[test]
    fn test_table_hints() {
        let table = Table::new("orders")
            .alias("o")
            .hint(TableHint::NoLock)
            .unwrap();
        assert_eq!(
            table.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "[orders] AS [o] WITH (NOLOCK)"
        );
        assert!(table.clone().hint(TableHint::NoLock).is_err());
        assert!(table.to_sql_with_dialect(Dialect::Postgres).is_err());
    }
}
