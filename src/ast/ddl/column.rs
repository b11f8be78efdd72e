use super::super::clause::{BoxedClause, Clause, non_empty, parse_number, read_slot, write_slot};
use super::super::operators::Order;
use super::super::values::{ColumnFlags, DbType};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

/// A column definition of a CREATE TABLE.
///
/// `length` is the size of string and binary types or the total digits of
/// exact numerics; `precision` is the number of decimal places.
#[derive(Debug, Default)]
pub struct Column {
    name: String,
    db_type: DbType,
    other_type: Option<String>,
    length: Option<u32>,
    precision: Option<u32>,
    flags: ColumnFlags,
    default: Option<BoxedClause>,
}

impl Column {
    pub const ELEMENT: &'static str = "Column";

    /// A NOT NULL column of the given type.
    pub fn new(name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            name: name.into(),
            db_type,
            ..Self::default()
        }
    }

    /// A column whose type is written verbatim, for types the dialects do not
    /// map (`geometry`, `citext`, ...).
    pub fn other(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            other_type: non_empty(&type_name.into()),
            ..Self::default()
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, length: u32, scale: u32) -> Self {
        self.length = Some(length);
        self.precision = Some(scale);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.flags.insert(ColumnFlags::NULLABLE);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.flags.insert(ColumnFlags::PRIMARY_KEY);
        self
    }

    /// Identity / auto-increment.
    pub fn auto_assign(mut self) -> Self {
        self.flags.insert(ColumnFlags::AUTO_ASSIGN);
        self
    }

    pub fn unique(mut self) -> Self {
        self.flags.insert(ColumnFlags::UNIQUE);
        self
    }

    pub fn default_value(mut self, value: impl Clause + 'static) -> Self {
        self.set_default(Box::new(value));
        self
    }

    pub(crate) fn set_default(&mut self, value: BoxedClause) {
        self.default = Some(value);
        self.flags.insert(ColumnFlags::HAS_DEFAULT);
    }

    /// Remove the default value and its flag.
    pub fn clear_default(&mut self) {
        self.default = None;
        self.flags.remove(ColumnFlags::HAS_DEFAULT);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    pub fn other_type(&self) -> Option<&str> {
        self.other_type.as_deref()
    }

    pub fn flags(&self) -> ColumnFlags {
        self.flags
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl Clause for Column {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.name.is_empty() {
            return Err(DynaError::missing("Column", "name"));
        }
        builder.write_identifier(&self.name)?;
        builder.write_column_data_type(
            self.db_type,
            self.other_type.as_deref(),
            self.length,
            self.precision,
            self.flags,
        )?;
        builder.write_column_flags(self.flags)?;
        if let Some(default) = &self.default {
            builder.begin_column_default()?;
            default.build_statement(builder)?;
            builder.end_column_default()?;
        }
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Name", &self.name)?;
        writer.write_attribute(ctx, "Type", self.db_type.as_str())?;
        writer.write_optional_attribute(ctx, "OtherType", self.other_type.as_deref())?;
        if let Some(length) = self.length {
            writer.write_attribute(ctx, "Length", &length.to_string())?;
        }
        if let Some(precision) = self.precision {
            writer.write_attribute(ctx, "Precision", &precision.to_string())?;
        }
        if !self.flags.is_empty() {
            writer.write_attribute(ctx, "Flags", &self.flags.to_string())?;
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Default", self.default.as_deref())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Name" => self.name = value.to_string(),
            "Type" => self.db_type = value.parse()?,
            "OtherType" => self.other_type = non_empty(value),
            "Length" => self.length = Some(parse_number(name, value)?),
            "Precision" => self.precision = Some(parse_number(name, value)?),
            "Flags" => self.flags = value.parse()?,
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
        if element.name == "Default" {
            if let Some(value) = read_slot(element, reader, ctx)? {
                self.set_default(value);
            }
            return Ok(true);
        }
        Ok(false)
    }
}

/// A column of a key or index, with an optional sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexColumn {
    name: String,
    order: Order,
}

impl IndexColumn {
    pub const ELEMENT: &'static str = "IndexColumn";

    /// Fails when the name is empty.
    pub fn new(name: impl Into<String>, order: Order) -> DynaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DynaError::invalid("key and index columns need a name"));
        }
        Ok(Self { name, order })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> Order {
        self.order
    }
}

impl Clause for IndexColumn {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.name.is_empty() {
            return Err(DynaError::missing("IndexColumn", "name"));
        }
        builder.begin_order_clause(self.order)?;
        builder.write_identifier(&self.name)?;
        builder.end_order_clause(self.order)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Name", &self.name)?;
        if self.order != Order::Default {
            writer.write_attribute(ctx, "Order", self.order.as_str())?;
        }
        Ok(())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Name" => self.name = value.to_string(),
            "Order" => self.order = value.parse()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
