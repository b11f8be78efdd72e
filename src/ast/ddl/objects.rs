use super::super::clause::{Clause, flag_text, non_empty, parse_flag, parse_number, read_typed};
use super::super::list::{ColumnList, TokenList};
use super::super::operators::{ExistState, Order, SchemaObjectType};
use super::super::query::Select;
use super::column::IndexColumn;
use super::{CreateOptions, ObjectName, SequenceOptions};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

/// `CREATE VIEW name AS select`
#[derive(Debug, Default)]
pub struct CreateView {
    object: ObjectName,
    select: Option<Box<Select>>,
}

impl CreateView {
    pub const ELEMENT: &'static str = "CreateView";

    pub fn new(name: impl Into<String>, select: Select) -> Self {
        Self {
            object: ObjectName::new(name),
            select: Some(Box::new(select)),
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.object.owner = non_empty(&owner.into());
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.object.exist = ExistState::NotExists;
        self
    }

    pub fn name(&self) -> &str {
        &self.object.name
    }
}

impl Clause for CreateView {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let name = self.object.require("CreateView")?;
        let select = self.select.as_ref().ok_or_else(|| DynaError::missing("CreateView", "select"))?;
        builder.begin_create(
            SchemaObjectType::View,
            self.object.owner(),
            name,
            CreateOptions::default(),
            self.object.exist,
        )?;
        builder.begin_view_definition()?;
        select.build_statement(builder)?;
        builder.end_create(SchemaObjectType::View)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.object.write_attributes(writer, ctx)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.select {
            Some(select) => select.write_xml(writer, ctx),
            None => Ok(()),
        }
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
        if let Some(select) = read_typed::<Select>(element, reader, ctx)? {
            self.select = Some(Box::new(select));
        }
        Ok(true)
    }
}

/// `CREATE [UNIQUE] INDEX name ON table (columns)`
#[derive(Debug, Clone, Default)]
pub struct CreateIndex {
    object: ObjectName,
    table_owner: Option<String>,
    table: String,
    columns: TokenList<IndexColumn, ColumnList>,
    unique: bool,
}

impl CreateIndex {
    pub const ELEMENT: &'static str = "CreateIndex";

    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            object: ObjectName::new(name),
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.object.owner = non_empty(&owner.into());
        self
    }

    pub fn table_owner(mut self, owner: impl Into<String>) -> Self {
        self.table_owner = non_empty(&owner.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.object.exist = ExistState::NotExists;
        self
    }

    pub fn column(self, name: impl Into<String>) -> DynaResult<Self> {
        self.column_ordered(name, Order::Default)
    }

    pub fn column_ordered(mut self, name: impl Into<String>, order: Order) -> DynaResult<Self> {
        self.columns.push(IndexColumn::new(name, order)?);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.object.name
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn columns(&self) -> &[IndexColumn] {
        self.columns.as_slice()
    }
}

impl Clause for CreateIndex {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let name = self.object.require("CreateIndex")?;
        if self.table.is_empty() {
            return Err(DynaError::missing("CreateIndex", "table"));
        }
        if self.columns.is_empty() {
            return Err(DynaError::missing("CreateIndex", "columns"));
        }
        builder.begin_create(
            SchemaObjectType::Index,
            self.object.owner(),
            name,
            CreateOptions { unique: self.unique },
            self.object.exist,
        )?;
        builder.write_index_table(self.table_owner.as_deref(), &self.table)?;
        self.columns.build_list(builder, false, false)?;
        builder.end_create(SchemaObjectType::Index)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.object.write_attributes(writer, ctx)?;
        writer.write_optional_attribute(ctx, "TableOwner", self.table_owner.as_deref())?;
        writer.write_attribute(ctx, "Table", &self.table)?;
        if self.unique {
            writer.write_attribute(ctx, "Unique", flag_text(true))?;
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.columns.write_xml_list(writer, ctx, "Columns")
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "TableOwner" => self.table_owner = non_empty(value),
            "Table" => self.table = value.to_string(),
            "Unique" => self.unique = parse_flag(name, value)?,
            _ => return self.object.read_attribute(name, value),
        }
        Ok(true)
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

/// `CREATE SEQUENCE name [START WITH ..] [INCREMENT BY ..] ...`
#[derive(Debug, Clone, Default)]
pub struct CreateSequence {
    object: ObjectName,
    options: SequenceOptions,
}

impl CreateSequence {
    pub const ELEMENT: &'static str = "CreateSequence";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: ObjectName::new(name),
            options: SequenceOptions::default(),
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.object.owner = non_empty(&owner.into());
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.object.exist = ExistState::NotExists;
        self
    }

    pub fn start(mut self, value: i64) -> Self {
        self.options.start = Some(value);
        self
    }

    pub fn increment(mut self, value: i64) -> Self {
        self.options.increment = Some(value);
        self
    }

    pub fn min_value(mut self, value: i64) -> Self {
        self.options.min_value = Some(value);
        self
    }

    pub fn max_value(mut self, value: i64) -> Self {
        self.options.max_value = Some(value);
        self
    }

    pub fn cycle(mut self) -> Self {
        self.options.cycle = true;
        self
    }

    pub fn cache(mut self, size: i64) -> Self {
        self.options.cache = Some(size);
        self
    }

    pub fn options(&self) -> &SequenceOptions {
        &self.options
    }
}

impl Clause for CreateSequence {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let name = self.object.require("CreateSequence")?;
        builder.begin_create(
            SchemaObjectType::Sequence,
            self.object.owner(),
            name,
            CreateOptions::default(),
            self.object.exist,
        )?;
        builder.write_sequence_options(&self.options)?;
        builder.end_create(SchemaObjectType::Sequence)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.object.write_attributes(writer, ctx)?;
        let numbers = [
            ("Start", self.options.start),
            ("Increment", self.options.increment),
            ("MinValue", self.options.min_value),
            ("MaxValue", self.options.max_value),
            ("Cache", self.options.cache),
        ];
        for (attribute, value) in numbers {
            if let Some(value) = value {
                writer.write_attribute(ctx, attribute, &value.to_string())?;
            }
        }
        if self.options.cycle {
            writer.write_attribute(ctx, "Cycle", flag_text(true))?;
        }
        Ok(())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        let options = &mut self.options;
        match name {
            "Start" => options.start = Some(parse_number(name, value)?),
            "Increment" => options.increment = Some(parse_number(name, value)?),
            "MinValue" => options.min_value = Some(parse_number(name, value)?),
            "MaxValue" => options.max_value = Some(parse_number(name, value)?),
            "Cache" => options.cache = Some(parse_number(name, value)?),
            "Cycle" => options.cycle = parse_flag(name, value)?,
            _ => return self.object.read_attribute(name, value),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Compare, Comparison, Const, Field};
    use crate::transpiler::{Dialect, ToSql};

    #[test]
    fn test_create_view() {
        let select = Select::new()
            .field("id")
            .from("users")
            .and_where(Comparison::new(Field::new("active"), Compare::Equals, Const::from(true)));
        let view = CreateView::new("active_users", select);
        assert_eq!(
            view.to_sql().unwrap(),
            "CREATE VIEW \"active_users\" AS SELECT \"id\" FROM \"users\" WHERE (\"active\" = TRUE)"
        );
        assert!(view.is_statement());
    }

    #[test]
    fn test_create_index() {
        let index = CreateIndex::new("ix_orders_user", "orders")
            .unique()
            .column("user_id")
            .unwrap()
            .column_ordered("created", Order::Descending)
            .unwrap();
        assert_eq!(
            index.to_sql().unwrap(),
            "CREATE UNIQUE INDEX \"ix_orders_user\" ON \"orders\" (\"user_id\", \"created\" DESC)"
        );
        assert!(matches!(
            CreateIndex::new("ix", "t").to_sql(),
            Err(DynaError::MissingClause { part: "columns", .. })
        ));
    }

    #[test]
    fn test_create_sequence() {
        let sequence = CreateSequence::new("order_no").start(1000).increment(1).cache(20);
        assert_eq!(
            sequence.to_sql().unwrap(),
            "CREATE SEQUENCE \"order_no\" START WITH 1000 INCREMENT BY 1 CACHE 20"
        );
        assert!(sequence.to_sql_with_dialect(Dialect::MySQL).is_err());
    }

    #[test]
    fn test_create_guard_support() {
        let view = CreateView::new("v", Select::new().field("a").from("t")).if_not_exists();
        assert!(view.to_sql_with_dialect(Dialect::Postgres).unwrap().starts_with("CREATE VIEW IF NOT EXISTS"));
        assert!(matches!(
            view.to_sql_with_dialect(Dialect::MySQL),
            Err(DynaError::Unsupported { .. })
        ));
    }
}
