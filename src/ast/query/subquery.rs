use crate::ast::clause::{Clause, non_empty, read_typed};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

use super::Select;

/// A parenthesized select used as a value, a predicate operand or a derived
/// table.
#[derive(Debug, Default)]
pub struct SubQuery {
    select: Option<Box<Select>>,
    alias: Option<String>,
}

impl SubQuery {
    pub const ELEMENT: &'static str = "SubQuery";

    pub fn new(select: Select) -> Self {
        Self {
            select: Some(Box::new(select)),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_empty(&alias.into());
        self
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn set_alias(&mut self, alias: &str) {
        self.alias = non_empty(alias);
    }
}

impl From<Select> for SubQuery {
    fn from(select: Select) -> Self {
        SubQuery::new(select)
    }
}

impl Clause for SubQuery {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let select = self.select.as_ref().ok_or_else(|| DynaError::missing("SubQuery", "select"))?;
        builder.begin_sub_statement()?;
        select.build_statement(builder)?;
        builder.end_sub_statement()?;
        if let Some(alias) = &self.alias {
            builder.write_table_alias(alias)?;
        }
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_optional_attribute(ctx, "Alias", self.alias.as_deref())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.select {
            Some(select) => select.write_xml(writer, ctx),
            None => Ok(()),
        }
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Alias" {
            self.alias = non_empty(value);
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
        if let Some(select) = read_typed::<Select>(element, reader, ctx)? {
            self.select = Some(Box::new(select));
        }
        Ok(true)
    }
}
