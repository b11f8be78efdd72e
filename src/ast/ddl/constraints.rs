use super::super::clause::{Clause, non_empty};
use super::super::list::{ColumnList, TokenList};
use super::super::operators::{ConstraintType, FkAction, Order};
use super::column::IndexColumn;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

type KeyColumns = TokenList<IndexColumn, ColumnList>;

/// `[CONSTRAINT name] PRIMARY KEY (a, b)`
#[derive(Debug, Clone, Default)]
pub struct PrimaryKey {
    name: Option<String>,
    columns: KeyColumns,
}

impl PrimaryKey {
    pub const ELEMENT: &'static str = "PrimaryKey";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: non_empty(&name.into()),
            ..Self::default()
        }
    }

    /// Append a key column. Fails when the name is empty.
    pub fn column(mut self, name: impl Into<String>) -> DynaResult<Self> {
        self.add_column(name, Order::Default)?;
        Ok(self)
    }

    pub fn add_column(&mut self, name: impl Into<String>, order: Order) -> DynaResult<()> {
        self.columns.push(IndexColumn::new(name, order)?);
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn columns(&self) -> &[IndexColumn] {
        self.columns.as_slice()
    }
}

impl Clause for PrimaryKey {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.columns.is_empty() {
            return Err(DynaError::missing("PrimaryKey", "columns"));
        }
        builder.begin_constraint(ConstraintType::PrimaryKey, self.name.as_deref())?;
        self.columns.build_list(builder, false, false)?;
        builder.end_constraint(ConstraintType::PrimaryKey)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Name", self.name.as_deref())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.columns.write_xml_list(writer, ctx, "Columns")
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Name" {
            self.name = non_empty(value);
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
        if element.name == "Columns" {
            self.columns.read_typed_items(element, reader, ctx)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// `[CONSTRAINT name] FOREIGN KEY (a) REFERENCES t (b) [ON DELETE ..] [ON UPDATE ..]`
///
/// [`column`](ForeignKey::column) appends to the key's own columns until
/// [`references`](ForeignKey::references) is called; from then on it appends
/// to the referenced columns.
#[derive(Debug, Clone, Default)]
pub struct ForeignKey {
    name: Option<String>,
    columns: KeyColumns,
    referenced_columns: KeyColumns,
    references_owner: Option<String>,
    references_table: Option<String>,
    on_delete: FkAction,
    on_update: FkAction,
    referencing: bool,
}

impl ForeignKey {
    pub const ELEMENT: &'static str = "ForeignKey";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: non_empty(&name.into()),
            ..Self::default()
        }
    }

    pub fn column(mut self, name: impl Into<String>) -> DynaResult<Self> {
        self.add_column(name)?;
        Ok(self)
    }

    /// Append to the key columns, or to the referenced columns once
    /// `references` has been called.
    pub fn add_column(&mut self, name: impl Into<String>) -> DynaResult<()> {
        let column = IndexColumn::new(name, Order::Default)?;
        if self.referencing {
            self.referenced_columns.push(column);
        } else {
            self.columns.push(column);
        }
        Ok(())
    }

    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.references_table = non_empty(&table.into());
        self.referencing = true;
        self
    }

    pub fn references_owned(mut self, owner: impl Into<String>, table: impl Into<String>) -> Self {
        self.references_owner = non_empty(&owner.into());
        self.references(table)
    }

    pub fn on_delete(mut self, action: FkAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: FkAction) -> Self {
        self.on_update = action;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn columns(&self) -> &[IndexColumn] {
        self.columns.as_slice()
    }

    pub fn referenced_columns(&self) -> &[IndexColumn] {
        self.referenced_columns.as_slice()
    }

    pub fn referenced_table(&self) -> Option<&str> {
        self.references_table.as_deref()
    }

    pub fn is_referencing(&self) -> bool {
        self.referencing
    }
}

impl Clause for ForeignKey {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.columns.is_empty() {
            return Err(DynaError::missing("ForeignKey", "columns"));
        }
        let table = self
            .references_table
            .as_deref()
            .ok_or_else(|| DynaError::missing("ForeignKey", "references"))?;
        builder.begin_constraint(ConstraintType::ForeignKey, self.name.as_deref())?;
        self.columns.build_list(builder, false, false)?;
        builder.begin_references(self.references_owner.as_deref(), table)?;
        if !self.referenced_columns.is_empty() {
            self.referenced_columns.build_list(builder, false, false)?;
        }
        builder.end_references()?;
        if self.on_delete != FkAction::Undefined || self.on_update != FkAction::Undefined {
            builder.write_foreign_key_actions(self.on_delete, self.on_update)?;
        }
        builder.end_constraint(ConstraintType::ForeignKey)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Name", self.name.as_deref())?;
        writer.write_optional_attribute(ctx, "ReferencesOwner", self.references_owner.as_deref())?;
        writer.write_optional_attribute(ctx, "References", self.references_table.as_deref())?;
        if self.on_delete != FkAction::Undefined {
            writer.write_attribute(ctx, "OnDelete", self.on_delete.as_str())?;
        }
        if self.on_update != FkAction::Undefined {
            writer.write_attribute(ctx, "OnUpdate", self.on_update.as_str())?;
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.columns.write_xml_list(writer, ctx, "Columns")?;
        self.referenced_columns.write_xml_list(writer, ctx, "ReferencedColumns")
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Name" => self.name = non_empty(value),
            "ReferencesOwner" => self.references_owner = non_empty(value),
            "References" => {
                self.references_table = non_empty(value);
                self.referencing = self.references_table.is_some();
            }
            "OnDelete" => self.on_delete = value.parse()?,
            "OnUpdate" => self.on_update = value.parse()?,
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
            "Columns" => self.columns.read_typed_items(element, reader, ctx)?,
            "ReferencedColumns" => self.referenced_columns.read_typed_items(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::{Dialect, ToSql};

    #[test]
    fn test_primary_key() {
        let key = PrimaryKey::named("pk_orders").column("id").unwrap().column("line").unwrap();
        assert_eq!(
            key.to_sql().unwrap(),
            "CONSTRAINT \"pk_orders\" PRIMARY KEY (\"id\", \"line\")"
        );
        assert!(matches!(PrimaryKey::new().column(""), Err(DynaError::InvalidArgument(_))));
        assert!(PrimaryKey::new().to_sql().is_err());
    }

    #[test]
    fn test_foreign_key_column_routing() {
        let key = ForeignKey::new()
            .column("user_id")
            .unwrap()
            .references("users")
            .column("id")
            .unwrap();
        assert_eq!(key.columns().len(), 1);
        assert_eq!(key.referenced_columns()[0].name(), "id");
        assert_eq!(
            key.to_sql().unwrap(),
            "FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\")"
        );
    }

    #[test]
    fn test_foreign_key_actions() {
        let key = ForeignKey::named("fk_user")
            .column("user_id")
            .unwrap()
            .references_owned("auth", "users")
            .column("id")
            .unwrap()
            .on_delete(FkAction::Cascade);
        assert_eq!(
            key.to_sql_with_dialect(Dialect::MySQL).unwrap(),
            "CONSTRAINT `fk_user` FOREIGN KEY (`user_id`) REFERENCES `auth`.`users` (`id`) ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_foreign_key_requires_target() {
        let key = ForeignKey::new().column("user_id").unwrap();
        assert!(matches!(key.to_sql(), Err(DynaError::MissingClause { part: "references", .. })));
    }
}
