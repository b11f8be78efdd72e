//! Schema definition statements.

mod column;
mod constraints;
mod drop;
mod objects;
mod procedure;
mod table;

pub use column::{Column, IndexColumn};
pub use constraints::{ForeignKey, PrimaryKey};
pub use drop::DropStatement;
pub use objects::{CreateIndex, CreateSequence, CreateView};
pub use procedure::CreateProcedure;
pub use table::{CreateTable, TableItem};

use super::clause::non_empty;
use super::operators::ExistState;
use crate::error::{DynaError, DynaResult};
use crate::xml::{XmlContext, XmlWriter};

/// Modifiers of a CREATE statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// `CREATE UNIQUE INDEX`
    pub unique: bool,
}

/// Options of a CREATE SEQUENCE statement. Unset options are left to the
/// database's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceOptions {
    pub start: Option<i64>,
    pub increment: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub cycle: bool,
    pub cache: Option<i64>,
}

/// Owner, name and existence guard of a schema object.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ObjectName {
    pub owner: Option<String>,
    pub name: String,
    pub exist: ExistState,
}

impl ObjectName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn require(&self, clause: &'static str) -> DynaResult<&str> {
        if self.name.is_empty() {
            return Err(DynaError::missing(clause, "name"));
        }
        Ok(&self.name)
    }

    pub fn write_attributes(&self, writer: &mut XmlWriter, ctx: &XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Owner", self.owner.as_deref())?;
        writer.write_attribute(ctx, "Name", &self.name)?;
        if self.exist != ExistState::Unknown {
            writer.write_attribute(ctx, "Exist", self.exist.as_str())?;
        }
        Ok(())
    }

    pub fn read_attribute(&mut self, name: &str, value: &str) -> DynaResult<bool> {
        match name {
            "Owner" => self.owner = non_empty(value),
            "Name" => self.name = value.to_string(),
            "Exist" => self.exist = value.parse()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
