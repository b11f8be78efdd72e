use super::clause::{Clause, flag_text, parse_flag};
use super::values::{DbType, Value};
use crate::error::DynaResult;
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlWriter};

/// A literal value.
///
/// A constant with no value renders as `NULL`, the same as one holding an
/// explicit [`Value::Null`]; only the XML form tells them apart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Const {
    db_type: DbType,
    value: Option<Value>,
    /// `ValueType` read from XML, pending until the text is converted.
    text_kind: Option<DbType>,
}

impl Const {
    pub const ELEMENT: &'static str = "Const";

    pub fn new(db_type: DbType, value: impl Into<Value>) -> Self {
        Self {
            db_type,
            value: Some(value.into()),
            text_kind: None,
        }
    }

    /// A constant typed by its value.
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self::new(DbType::Object, value)
    }

    pub fn null() -> Self {
        Self::new(DbType::Object, Value::Null)
    }

    /// A typed constant whose value has not been given.
    pub fn unset(db_type: DbType) -> Self {
        Self {
            db_type,
            value: None,
            text_kind: None,
        }
    }

    /// Declared type, or the value's own type for untyped constants.
    pub fn db_type(&self) -> DbType {
        match (&self.value, self.db_type) {
            (Some(value), DbType::Object) => value.natural_db_type(),
            (_, db_type) => db_type,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl Clause for Const {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        match &self.value {
            None | Some(Value::Null) => builder.write_null()?,
            Some(value) => builder.write_literal(self.db_type(), value)?,
        }
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Type", self.db_type().as_str())?;
        match &self.value {
            Some(Value::Null) => writer.write_attribute(ctx, "IsNull", flag_text(true))?,
            // The declared type would read the text back as another kind.
            Some(value) if value.natural_db_type() != self.db_type().text_value_kind() => {
                writer.write_attribute(ctx, "ValueType", value.natural_db_type().as_str())?
            }
            _ => {}
        }
        Ok(())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, _ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.value {
            Some(value) if !value.is_null() => writer.write_text(&value.to_xml_text()),
            _ => Ok(()),
        }
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Type" => self.db_type = value.parse()?,
            "ValueType" => self.text_kind = Some(value.parse()?),
            "IsNull" => {
                if parse_flag(name, value)? {
                    self.value = Some(Value::Null);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn read_text(&mut self, text: &str, _ctx: &mut XmlContext) -> DynaResult<()> {
        match &mut self.value {
            Some(Value::String(buffer)) => buffer.push_str(text),
            Some(Value::Null) => {}
            _ => self.value = Some(Value::String(text.to_string())),
        }
        Ok(())
    }

    /// Text is collected raw and converted to the declared type at the end.
    /// `<Const Type="String"></Const>` is an empty string, while
    /// `<Const Type="String"/>` has no value at all.
    fn read_complete(&mut self, element: &XmlElement, _ctx: &mut XmlContext) -> DynaResult<()> {
        let kind = self.text_kind.take().unwrap_or(self.db_type);
        match self.value.take() {
            Some(Value::String(text)) => {
                self.value = Some(Value::from_xml_text(kind, &text)?);
            }
            None if !element.is_empty => {
                self.value = Some(Value::from_xml_text(kind, "")?);
            }
            other => self.value = other,
        }
        Ok(())
    }
}

impl From<Value> for Const {
    fn from(value: Value) -> Self {
        Const::from_value(value)
    }
}

impl From<i64> for Const {
    fn from(value: i64) -> Self {
        Const::from_value(value)
    }
}

impl From<i32> for Const {
    fn from(value: i32) -> Self {
        Const::from_value(value)
    }
}

impl From<bool> for Const {
    fn from(value: bool) -> Self {
        Const::from_value(value)
    }
}

impl From<&str> for Const {
    fn from(value: &str) -> Self {
        Const::from_value(value)
    }
}
