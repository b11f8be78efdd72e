//! The clause contract shared by every node of a statement tree.

use std::fmt::Debug;

use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlFactory, XmlReader, XmlWriter, read_child_elements, read_clause};

/// A node of a statement tree.
///
/// A clause renders two ways. [`build_statement`](Clause::build_statement)
/// emits structural events to a [`StatementBuilder`];
/// [`write_xml`](Clause::write_xml) and the `read_*` hooks serialize it as
/// one XML element. Both walks visit children in the same order so a tree
/// read back from XML builds the same statement.
pub trait Clause: Debug {
    /// Stable element name used to write and recognize this clause.
    fn xml_element_name(&self) -> &'static str;

    /// Emit this clause. Returns whether anything was written.
    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool>;

    /// Statements (queries, DDL, script commands) cannot stand where a value
    /// is expected.
    fn is_statement(&self) -> bool {
        false
    }

    fn write_xml(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.begin_element(ctx, self.xml_element_name())?;
        self.write_all_attributes(writer, ctx)?;
        self.write_inner_elements(writer, ctx)?;
        writer.end_element()
    }

    fn write_all_attributes(&self, _writer: &mut XmlWriter, _ctx: &mut XmlContext) -> DynaResult<()> {
        Ok(())
    }

    fn write_inner_elements(&self, _writer: &mut XmlWriter, _ctx: &mut XmlContext) -> DynaResult<()> {
        Ok(())
    }

    /// Returns false for attributes this clause does not know.
    fn read_an_attribute(&mut self, _name: &str, _value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        Ok(false)
    }

    /// Read one child element through its end tag. Returns false, without
    /// consuming anything, for elements this clause does not know.
    fn read_an_inner_element(
        &mut self,
        _element: &XmlElement,
        _reader: &mut XmlReader<'_>,
        _ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        Ok(false)
    }

    fn read_text(&mut self, _text: &str, _ctx: &mut XmlContext) -> DynaResult<()> {
        Ok(())
    }

    /// Called once the element's end tag has been read.
    fn read_complete(&mut self, _element: &XmlElement, _ctx: &mut XmlContext) -> DynaResult<()> {
        Ok(())
    }
}

impl<T: Clause + ?Sized> Clause for Box<T> {
    fn xml_element_name(&self) -> &'static str {
        (**self).xml_element_name()
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        (**self).build_statement(builder)
    }

    fn is_statement(&self) -> bool {
        (**self).is_statement()
    }

    fn write_xml(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        (**self).write_xml(writer, ctx)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        (**self).write_all_attributes(writer, ctx)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        (**self).write_inner_elements(writer, ctx)
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, ctx: &mut XmlContext) -> DynaResult<bool> {
        (**self).read_an_attribute(name, value, ctx)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        (**self).read_an_inner_element(element, reader, ctx)
    }

    fn read_text(&mut self, text: &str, ctx: &mut XmlContext) -> DynaResult<()> {
        (**self).read_text(text, ctx)
    }

    fn read_complete(&mut self, element: &XmlElement, ctx: &mut XmlContext) -> DynaResult<()> {
        (**self).read_complete(element, ctx)
    }
}

/// Owned, type-erased child clause.
pub type BoxedClause = Box<dyn Clause>;

/// Render a child that must be present.
pub(crate) fn build_required(
    child: Option<&dyn Clause>,
    builder: &mut dyn StatementBuilder,
    clause: &'static str,
    part: &'static str,
) -> DynaResult<bool> {
    match child {
        Some(child) => child.build_statement(builder),
        None => Err(DynaError::missing(clause, part)),
    }
}

/// Render a child that may be absent.
pub(crate) fn build_optional(
    child: Option<&dyn Clause>,
    builder: &mut dyn StatementBuilder,
) -> DynaResult<bool> {
    match child {
        Some(child) => child.build_statement(builder),
        None => Ok(false),
    }
}

/// Render `begin`, the section body and `end`, rolling all of it back when
/// the body renders nothing.
pub(crate) fn build_section<B, F, E>(
    builder: &mut dyn StatementBuilder,
    begin: B,
    body: F,
    end: E,
) -> DynaResult<bool>
where
    B: FnOnce(&mut dyn StatementBuilder) -> DynaResult<()>,
    F: FnOnce(&mut dyn StatementBuilder) -> DynaResult<bool>,
    E: FnOnce(&mut dyn StatementBuilder) -> DynaResult<()>,
{
    let mark = builder.mark();
    begin(builder)?;
    if body(builder)? {
        end(builder)?;
        Ok(true)
    } else {
        builder.reset_to(mark);
        Ok(false)
    }
}

/// Write `child` wrapped in an element named `slot`; nothing when absent.
pub(crate) fn write_slot(
    writer: &mut XmlWriter,
    ctx: &mut XmlContext,
    slot: &str,
    child: Option<&dyn Clause>,
) -> DynaResult<()> {
    if let Some(child) = child {
        writer.begin_element(ctx, slot)?;
        child.write_xml(writer, ctx)?;
        writer.end_element()?;
    }
    Ok(())
}

/// Resolve `element` through the factory where a value is expected.
/// Statements are rejected; unknown elements are skipped.
pub(crate) fn read_value(
    element: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
) -> DynaResult<Option<BoxedClause>> {
    match XmlFactory::read(element, reader, ctx)? {
        Some(clause) if clause.is_statement() => Err(DynaError::mismatch(
            "a value clause",
            element.name.clone(),
        )),
        other => Ok(other),
    }
}

/// Read the clause inside a slot element where a value is expected.
pub(crate) fn read_slot(
    slot: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
) -> DynaResult<Option<BoxedClause>> {
    let mut found = None;
    read_child_elements(slot, reader, ctx, |child, reader, ctx| {
        if let Some(clause) = read_value(child, reader, ctx)? {
            found.get_or_insert(clause);
        }
        Ok(true)
    })?;
    Ok(found)
}

/// Read `element` as a `T`. A different registered clause is a type
/// mismatch; an unknown element is skipped and yields `None`.
pub(crate) fn read_typed<T: Clause + Default>(
    element: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
) -> DynaResult<Option<T>> {
    let mut clause = T::default();
    if element.name == clause.xml_element_name() {
        read_clause(&mut clause, element, reader, ctx)?;
        Ok(Some(clause))
    } else if ctx.factory().contains(&element.name) {
        Err(DynaError::mismatch(
            clause.xml_element_name(),
            element.name.clone(),
        ))
    } else {
        reader.skip_element(element)?;
        Ok(None)
    }
}

/// Read the single `T` inside a slot element.
pub(crate) fn read_typed_slot<T: Clause + Default>(
    slot: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
) -> DynaResult<Option<T>> {
    let mut found = None;
    read_child_elements(slot, reader, ctx, |child, reader, ctx| {
        if let Some(clause) = read_typed::<T>(child, reader, ctx)? {
            found.get_or_insert(clause);
        }
        Ok(true)
    })?;
    Ok(found)
}

/// Parse a boolean attribute ("True" / "False").
pub(crate) fn parse_flag(name: &str, value: &str) -> DynaResult<bool> {
    crate::ast::values::parse_bool(value)
        .ok_or_else(|| DynaError::format(format!("attribute {} expects True or False, got '{}'", name, value)))
}

pub(crate) fn flag_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

pub(crate) fn parse_number<N: std::str::FromStr>(name: &str, value: &str) -> DynaResult<N>
where
    N::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DynaError::format(format!("attribute {} has invalid number '{}': {}", name, value, e)))
}

/// `Some(text)` unless the text is empty.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Field, Select};
    use crate::xml::{XmlNode, XmlReader};

    fn first_element(reader: &mut XmlReader<'_>) -> XmlElement {
        match reader.next_node().unwrap() {
            XmlNode::Start(e) => e,
            other => panic!("expected an element, got {:?}", other),
        }
    }

    #[test]
    fn test_read_slot_rejects_statements() {
        let mut ctx = XmlContext::default();
        let mut reader = XmlReader::new("<Left><Select/></Left>");
        let slot = first_element(&mut reader);
        let err = read_slot(&slot, &mut reader, &mut ctx).unwrap_err();
        assert!(matches!(err, DynaError::XmlTypeMismatch { .. }));
    }

    #[test]
    fn test_read_slot_skips_unknown() {
        let mut ctx = XmlContext::default();
        let mut reader = XmlReader::new("<Left><Bogus><X/></Bogus><Field Name=\"a\"/></Left>");
        let slot = first_element(&mut reader);
        let clause = read_slot(&slot, &mut reader, &mut ctx).unwrap().unwrap();
        assert_eq!(clause.xml_element_name(), "Field");
    }

    #[test]
    fn test_read_typed_mismatch() {
        let mut ctx = XmlContext::default();
        let mut reader = XmlReader::new("<Field Name=\"a\"/>");
        let element = first_element(&mut reader);
        assert!(read_typed::<Select>(&element, &mut reader, &mut ctx).is_err());

        let mut reader = XmlReader::new("<Field Name=\"a\"/>");
        let element = first_element(&mut reader);
        let field = read_typed::<Field>(&element, &mut reader, &mut ctx).unwrap();
        assert_eq!(field.unwrap().name(), "a");
    }
}
