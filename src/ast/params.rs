use super::clause::{Clause, flag_text, parse_flag, parse_number};
use super::operators::ParameterDirection;
use super::values::{DbType, Value};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlWriter};

/// A named parameter.
///
/// Within one XML document a parameter is written in full the first time it
/// appears and by name only afterwards; reading resolves those references
/// against the earlier definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Param {
    name: String,
    db_type: DbType,
    size: Option<u32>,
    direction: ParameterDirection,
    value: Option<Value>,
    /// `ValueType` read from XML, pending until the text is converted.
    text_kind: Option<DbType>,
}

impl Param {
    pub const ELEMENT: &'static str = "Param";

    pub fn new(name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            name: name.into(),
            db_type,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl Clause for Param {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.name.is_empty() {
            return Err(DynaError::missing("Param", "name"));
        }
        builder.write_parameter(self)?;
        Ok(true)
    }

    fn write_xml(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.begin_element(ctx, Self::ELEMENT)?;
        writer.write_attribute(ctx, "Name", &self.name)?;
        if ctx.register_parameter(self) {
            writer.write_attribute(ctx, "Type", self.db_type.as_str())?;
            if let Some(size) = self.size {
                writer.write_attribute(ctx, "Size", &size.to_string())?;
            }
            if self.direction != ParameterDirection::Input {
                writer.write_attribute(ctx, "Direction", self.direction.as_str())?;
            }
            match &self.value {
                Some(Value::Null) => writer.write_attribute(ctx, "IsNull", flag_text(true))?,
                Some(value) => {
                    let kind = value.natural_db_type();
                    if kind != self.db_type.text_value_kind() {
                        writer.write_attribute(ctx, "ValueType", kind.as_str())?;
                    }
                    writer.write_text(&value.to_xml_text())?;
                }
                None => {}
            }
        }
        writer.end_element()
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Name" => self.name = value.to_string(),
            "Type" => self.db_type = value.parse()?,
            "Size" => self.size = Some(parse_number(name, value)?),
            "Direction" => self.direction = value.parse()?,
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

    fn read_complete(&mut self, element: &XmlElement, ctx: &mut XmlContext) -> DynaResult<()> {
        if element.attribute("Type").is_none() {
            if let Some(definition) = ctx.registered_parameter(&self.name) {
                *self = definition.clone();
            }
            return Ok(());
        }
        let kind = self.text_kind.take().unwrap_or(self.db_type);
        match self.value.take() {
            Some(Value::String(text)) => self.value = Some(Value::from_xml_text(kind, &text)?),
            None if !element.is_empty => self.value = Some(Value::from_xml_text(kind, "")?),
            other => self.value = other,
        }
        ctx.register_parameter(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Script;
    use crate::transpiler::{Dialect, SqlBuilder, ToSql};
    use crate::xml::{from_xml, to_xml};

    #[test]
    fn test_placeholders_per_dialect() {
        let param = Param::new("id", DbType::Int32);
        assert_eq!(param.to_sql().unwrap(), "$1");
        assert_eq!(param.to_sql_with_dialect(Dialect::MySQL).unwrap(), "?");
        assert_eq!(param.to_sql_with_dialect(Dialect::SqlServer).unwrap(), "@id");
        assert_eq!(param.to_sql_with_dialect(Dialect::Oracle).unwrap(), ":id");
    }

    #[test]
    fn test_builder_collects_parameters() {
        let param = Param::new("id", DbType::Int32).with_value(7);
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        param.build_statement(&mut builder).unwrap();
        param.build_statement(&mut builder).unwrap();
        assert_eq!(builder.parameters(), &[param.clone()]);
    }

    #[test]
    fn test_xml_writes_definition_once() {
        let param = Param::new("name", DbType::String).with_size(40).with_value("x");
        let script = Script::new()
            .set(param.clone(), param.clone())
            .then(crate::ast::Select::new().select(param.clone()));
        let mut ctx = XmlContext::default();
        let xml = to_xml(&script, &mut ctx).unwrap();
        assert_eq!(xml.matches("Type=\"String\"").count(), 1);
        assert_eq!(xml.matches("<Param Name=\"name\"/>").count(), 2);

        let read = from_xml(&xml, &mut ctx).unwrap().unwrap();
        assert_eq!(read.to_sql().unwrap(), script.to_sql().unwrap());
        assert_eq!(ctx.registered_parameter("name"), Some(&param));
    }

    #[test]
    fn test_xml_keeps_value_and_null() {
        let dated = Param::new("since", DbType::Date).with_value("last week");
        let missing = Param::new("note", DbType::String).with_value(Value::Null);
        let mut ctx = XmlContext::default();
        for param in [dated, missing] {
            let xml = to_xml(&param, &mut ctx).unwrap();
            from_xml(&xml, &mut ctx).unwrap().unwrap();
            assert_eq!(ctx.registered_parameter(param.name()), Some(&param));
        }
    }
}
