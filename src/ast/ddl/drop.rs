use super::super::clause::{Clause, non_empty};
use super::super::operators::{ExistState, SchemaObjectType};
use super::ObjectName;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlWriter};

/// `DROP <object> [IF EXISTS] name`
///
/// One type covers every droppable object; the XML element name follows the
/// kind (`DropTable`, `DropIndex`, ...).
#[derive(Debug, Clone)]
pub struct DropStatement {
    kind: SchemaObjectType,
    object: ObjectName,
    table_owner: Option<String>,
    table: Option<String>,
}

impl DropStatement {
    /// A statement of the given kind with nothing set, ready to be read.
    pub fn empty(kind: SchemaObjectType) -> Self {
        Self {
            kind,
            object: ObjectName::default(),
            table_owner: None,
            table: None,
        }
    }

    pub fn new(kind: SchemaObjectType, name: impl Into<String>) -> Self {
        Self {
            object: ObjectName::new(name),
            ..Self::empty(kind)
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::new(SchemaObjectType::Table, name)
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self::new(SchemaObjectType::View, name)
    }

    /// Some dialects name the table of the index being dropped.
    pub fn index(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            table: non_empty(&table.into()),
            ..Self::new(SchemaObjectType::Index, name)
        }
    }

    pub fn sequence(name: impl Into<String>) -> Self {
        Self::new(SchemaObjectType::Sequence, name)
    }

    pub fn procedure(name: impl Into<String>) -> Self {
        Self::new(SchemaObjectType::StoredProcedure, name)
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.object.owner = non_empty(&owner.into());
        self
    }

    pub fn table_owner(mut self, owner: impl Into<String>) -> Self {
        self.table_owner = non_empty(&owner.into());
        self
    }

    /// `DROP ... IF EXISTS`
    pub fn if_exists(mut self) -> Self {
        self.object.exist = ExistState::Exists;
        self
    }

    pub fn kind(&self) -> SchemaObjectType {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.object.name
    }
}

impl Clause for DropStatement {
    fn xml_element_name(&self) -> &'static str {
        match self.kind {
            SchemaObjectType::Table => "DropTable",
            SchemaObjectType::View => "DropView",
            SchemaObjectType::Index => "DropIndex",
            SchemaObjectType::Sequence => "DropSequence",
            SchemaObjectType::StoredProcedure => "DropProcedure",
        }
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let name = self.object.require(self.xml_element_name())?;
        builder.begin_drop(self.kind, self.object.owner(), name, self.object.exist)?;
        if self.kind == SchemaObjectType::Index {
            let table = self
                .table
                .as_deref()
                .ok_or_else(|| DynaError::missing("DropIndex", "table"))?;
            builder.write_drop_index_table(self.table_owner.as_deref(), table)?;
        }
        builder.end_drop(self.kind)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.object.write_attributes(writer, ctx)?;
        writer.write_optional_attribute(ctx, "TableOwner", self.table_owner.as_deref())?;
        writer.write_optional_attribute(ctx, "Table", self.table.as_deref())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "TableOwner" => self.table_owner = non_empty(value),
            "Table" => self.table = non_empty(value),
            _ => return self.object.read_attribute(name, value),
        }
        Ok(true)
    }
}
