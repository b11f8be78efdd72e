use super::super::clause::{BoxedClause, Clause};
use super::super::list::TokenList;
use super::super::operators::{ExistState, Order, SchemaObjectType};
use super::column::Column;
use super::constraints::{ForeignKey, PrimaryKey};
use super::{CreateOptions, ObjectName};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter, read_child_elements, read_clause};

/// Anything that can be added to a [`CreateTable`].
#[derive(Debug)]
pub enum TableItem {
    Column(Column),
    PrimaryKey(PrimaryKey),
    ForeignKey(ForeignKey),
}

impl TableItem {
    fn inner(&self) -> &dyn Clause {
        match self {
            TableItem::Column(column) => column,
            TableItem::PrimaryKey(key) => key,
            TableItem::ForeignKey(key) => key,
        }
    }
}

impl From<Column> for TableItem {
    fn from(column: Column) -> Self {
        TableItem::Column(column)
    }
}

impl From<PrimaryKey> for TableItem {
    fn from(key: PrimaryKey) -> Self {
        TableItem::PrimaryKey(key)
    }
}

impl From<ForeignKey> for TableItem {
    fn from(key: ForeignKey) -> Self {
        TableItem::ForeignKey(key)
    }
}

impl Clause for TableItem {
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

/// Position of the most recently added item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Column(usize),
    Constraint(usize),
}

/// `CREATE TABLE name (columns, constraints)`
///
/// The table remembers the last item added. A column added right after a
/// key names a column of that key instead of defining a new table column,
/// and [`default_value`](CreateTable::default_value) applies to the last added column:
///
/// ```
/// use dynasql::ast::{Column, CreateTable, DbType, PrimaryKey};
///
/// let table = CreateTable::new("users")
///     .column(Column::new("id", DbType::Int32))
///     .unwrap()
///     .primary_key(PrimaryKey::named("pk_users"))
///     .column(Column::new("id", DbType::Int32))
///     .unwrap();
/// assert_eq!(table.columns().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CreateTable {
    object: ObjectName,
    columns: TokenList<Column>,
    constraints: TokenList<TableItem>,
    last: Option<Cursor>,
}

impl CreateTable {
    pub const ELEMENT: &'static str = "CreateTable";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: ObjectName::new(name),
            ..Default::default()
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.object.owner = Some(owner.into());
        self
    }

    /// `CREATE TABLE IF NOT EXISTS`
    pub fn if_not_exists(mut self) -> Self {
        self.object.exist = ExistState::NotExists;
        self
    }

    pub fn column(mut self, column: Column) -> DynaResult<Self> {
        self.add(column)?;
        Ok(self)
    }

    pub fn primary_key(mut self, key: PrimaryKey) -> Self {
        self.push_constraint(TableItem::PrimaryKey(key));
        self
    }

    pub fn foreign_key(mut self, key: ForeignKey) -> Self {
        self.push_constraint(TableItem::ForeignKey(key));
        self
    }

    /// Set the default value of the last added column.
    pub fn default_value(mut self, value: impl Clause + 'static) -> DynaResult<Self> {
        self.set_default(Box::new(value))?;
        Ok(self)
    }

    /// Add a column or a key.
    ///
    /// A column added while the last item is a key is routed to that key:
    /// its name is appended to the key's columns (for a foreign key, to the
    /// referenced columns once `references` has been called) and the key
    /// stays the last item.
    pub fn add(&mut self, item: impl Into<TableItem>) -> DynaResult<()> {
        match item.into() {
            TableItem::Column(column) => match self.last {
                Some(Cursor::Constraint(index)) => match self.constraints.get_mut(index) {
                    Some(TableItem::PrimaryKey(key)) => key.add_column(column.name(), Order::Default)?,
                    Some(TableItem::ForeignKey(key)) => key.add_column(column.name())?,
                    _ => self.push_column(column),
                },
                _ => self.push_column(column),
            },
            constraint => self.push_constraint(constraint),
        }
        Ok(())
    }

    pub(crate) fn set_default(&mut self, value: BoxedClause) -> DynaResult<()> {
        match self.last {
            Some(Cursor::Column(index)) => match self.columns.get_mut(index) {
                Some(column) => {
                    column.set_default(value);
                    Ok(())
                }
                None => Err(DynaError::LastItemNotColumn),
            },
            _ => Err(DynaError::LastItemNotColumn),
        }
    }

    fn push_column(&mut self, column: Column) {
        self.columns.push(column);
        self.last = Some(Cursor::Column(self.columns.len() - 1));
    }

    fn push_constraint(&mut self, constraint: TableItem) {
        self.constraints.push(constraint);
        self.last = Some(Cursor::Constraint(self.constraints.len() - 1));
    }

    pub fn name(&self) -> &str {
        &self.object.name
    }

    pub fn columns(&self) -> &[Column] {
        self.columns.as_slice()
    }

    pub fn constraints(&self) -> &[TableItem] {
        self.constraints.as_slice()
    }
}

impl Clause for CreateTable {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let name = self.object.require("CreateTable")?;
        if self.columns.is_empty() {
            return Err(DynaError::missing("CreateTable", "columns"));
        }
        builder.begin_create(
            SchemaObjectType::Table,
            self.object.owner(),
            name,
            CreateOptions::default(),
            self.object.exist,
        )?;
        builder.begin_definition_list()?;
        let columns = self.columns.build_list(builder, true, false)?;
        if !self.constraints.is_empty() {
            if columns {
                builder.write_list_separator(true)?;
            }
            self.constraints.build_list(builder, true, false)?;
        }
        builder.end_definition_list()?;
        builder.end_create(SchemaObjectType::Table)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.object.write_attributes(writer, ctx)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.columns.write_xml_list(writer, ctx, "Columns")?;
        self.constraints.write_xml_list(writer, ctx, "Constraints")
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        self.object.read_attribute(name, value)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        match element.name.as_str() {
            "Columns" => {
                self.columns.read_typed_items(element, reader, ctx)?;
                if !self.columns.is_empty() {
                    self.last = Some(Cursor::Column(self.columns.len() - 1));
                }
            }
            "Constraints" => {
                read_child_elements(element, reader, ctx, |child, reader, ctx| {
                    let item = match child.name.as_str() {
                        PrimaryKey::ELEMENT => {
                            let mut key = PrimaryKey::default();
                            read_clause(&mut key, child, reader, ctx)?;
                            TableItem::PrimaryKey(key)
                        }
                        ForeignKey::ELEMENT => {
                            let mut key = ForeignKey::default();
                            read_clause(&mut key, child, reader, ctx)?;
                            TableItem::ForeignKey(key)
                        }
                        other if ctx.factory().contains(other) => {
                            return Err(DynaError::mismatch("PrimaryKey or ForeignKey", other));
                        }
                        _ => return Ok(false),
                    };
                    self.push_constraint(item);
                    Ok(true)
                })?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Const, DbType, FkAction};
    use crate::transpiler::{Dialect, SqlBuilder, ToSql};
    use pretty_assertions::assert_eq;

    fn users() -> CreateTable {
        CreateTable::new("users")
            .column(Column::new("id", DbType::Int32).auto_assign())
            .unwrap()
            .column(Column::new("email", DbType::String).length(120))
            .unwrap()
            .column(Column::new("active", DbType::Boolean))
            .unwrap()
            .default_value(Const::from(true))
            .unwrap()
            .primary_key(PrimaryKey::named("pk_users"))
            .column(Column::new("id", DbType::Int32))
            .unwrap()
    }

    #[test]
    fn test_columns_route_into_last_key() {
        let table = users();
        assert_eq!(table.columns().len(), 3);
        match &table.constraints()[0] {
            TableItem::PrimaryKey(key) => assert_eq!(key.columns()[0].name(), "id"),
            other => panic!("expected a primary key, got {:?}", other),
        }
    }

    #[test]
    fn test_create_table_sql() {
        assert_eq!(
            users().to_sql().unwrap(),
            "CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY, \
             \"email\" VARCHAR(120) NOT NULL, \"active\" BOOLEAN NOT NULL DEFAULT TRUE, \
             CONSTRAINT \"pk_users\" PRIMARY KEY (\"id\"))"
        );
    }

    #[test]
    fn test_create_table_pretty() {
        let table = CreateTable::new("tags")
            .if_not_exists()
            .column(Column::new("name", DbType::String).length(40))
            .unwrap()
            .primary_key(PrimaryKey::new().column("name").unwrap());
        let mut builder = SqlBuilder::new(Dialect::Postgres).pretty(true);
        table.build_statement(&mut builder).unwrap();
        assert_eq!(
            builder.finish(),
            "CREATE TABLE IF NOT EXISTS \"tags\" (\n    \"name\" VARCHAR(40) NOT NULL,\n    PRIMARY KEY (\"name\")\n)"
        );
    }

    #[test]
    fn test_default_requires_column() {
        let table = CreateTable::new("t").primary_key(PrimaryKey::new());
        assert!(matches!(table.default_value(Const::from(1)), Err(DynaError::LastItemNotColumn)));
        assert!(matches!(
            CreateTable::new("t").default_value(Const::from(1)),
            Err(DynaError::LastItemNotColumn)
        ));
    }

    #[test]
    fn test_foreign_key_routing_through_table() {
        let mut table = CreateTable::new("orders");
        table.add(Column::new("user_id", DbType::Int32)).unwrap();
        table.add(ForeignKey::new().on_delete(FkAction::Cascade)).unwrap();
        table.add(Column::new("user_id", DbType::Int32)).unwrap();
        table.add(ForeignKey::new().column("user_id").unwrap().references("users")).unwrap();
        table.add(Column::new("id", DbType::Int32)).unwrap();

        assert_eq!(table.columns().len(), 1);
        match table.constraints() {
            [TableItem::ForeignKey(first), TableItem::ForeignKey(second)] => {
                assert_eq!(first.columns()[0].name(), "user_id");
                assert!(first.referenced_columns().is_empty());
                assert_eq!(second.referenced_columns()[0].name(), "id");
            }
            other => panic!("expected two foreign keys, got {:?}", other),
        }
    }

    #[test]
    fn test_create_table_without_columns() {
        assert!(matches!(
            CreateTable::new("t").to_sql(),
            Err(DynaError::MissingClause { part: "columns", .. })
        ));
        assert!(matches!(
            CreateTable::default().to_sql(),
            Err(DynaError::MissingClause { part: "name", .. })
        ));
    }
}
