//! XML serialization of statement trees.
//!
//! Every clause writes itself as one element named by
//! [`Clause::xml_element_name`]. Reading goes the other way: the
//! [`XmlFactory`] in the context turns an element name back into an empty
//! clause, which then reads its own attributes and children.

pub mod factory;
pub mod reader;
pub mod writer;

use tracing::debug;

use crate::ast::{Clause, Param};
use crate::error::DynaResult;

pub use factory::{ClauseConstructor, XmlFactory};
pub use reader::{XmlElement, XmlNode, XmlReader};
pub use writer::XmlWriter;

/// Namespace policy, registered parameters and the element factory for one
/// read or write pass.
#[derive(Debug)]
pub struct XmlContext {
    namespace: Option<String>,
    prefix: Option<String>,
    qualify_elements: bool,
    qualify_attributes: bool,
    indent: bool,
    parameters: Vec<Param>,
    factory: XmlFactory,
}

impl Default for XmlContext {
    fn default() -> Self {
        Self {
            namespace: None,
            prefix: None,
            qualify_elements: false,
            qualify_attributes: false,
            indent: false,
            parameters: Vec::new(),
            factory: XmlFactory::with_defaults(),
        }
    }
}

impl XmlContext {
    pub fn new(factory: XmlFactory) -> Self {
        Self {
            factory,
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>, prefix: Option<&str>) -> Self {
        self.namespace = Some(namespace.into());
        self.prefix = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    pub fn qualify_elements(mut self, qualify: bool) -> Self {
        self.qualify_elements = qualify;
        self
    }

    pub fn qualify_attributes(mut self, qualify: bool) -> Self {
        self.qualify_attributes = qualify;
        self
    }

    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn qualifies_elements(&self) -> bool {
        self.qualify_elements
    }

    pub fn qualifies_attributes(&self) -> bool {
        self.qualify_attributes
    }

    pub fn factory(&self) -> &XmlFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut XmlFactory {
        &mut self.factory
    }

    /// Element name as written, prefixed when elements are qualified.
    pub fn element_name(&self, local: &str) -> String {
        match (&self.prefix, self.qualify_elements) {
            (Some(prefix), true) => format!("{}:{}", prefix, local),
            _ => local.to_string(),
        }
    }

    /// Attribute name as written, prefixed when attributes are qualified.
    pub fn attribute_name(&self, local: &str) -> String {
        match (&self.prefix, self.qualify_attributes) {
            (Some(prefix), true) => format!("{}:{}", prefix, local),
            _ => local.to_string(),
        }
    }

    /// Remember a parameter definition. Returns false if one with the same
    /// name was already registered.
    pub fn register_parameter(&mut self, param: &Param) -> bool {
        if self.registered_parameter(param.name()).is_some() {
            return false;
        }
        self.parameters.push(param.clone());
        true
    }

    pub fn registered_parameter(&self, name: &str) -> Option<&Param> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn clear_parameters(&mut self) {
        self.parameters.clear();
    }
}

/// Serialize a clause tree to an XML document.
pub fn to_xml(clause: &dyn Clause, ctx: &mut XmlContext) -> DynaResult<String> {
    ctx.clear_parameters();
    let mut writer = if ctx.indent {
        XmlWriter::indented()
    } else {
        XmlWriter::new()
    };
    writer.write_declaration()?;
    clause.write_xml(&mut writer, ctx)?;
    writer.into_string()
}

/// Read the root clause of an XML document. Returns `None` when the root
/// element is not a known clause.
pub fn from_xml(text: &str, ctx: &mut XmlContext) -> DynaResult<Option<Box<dyn Clause>>> {
    ctx.clear_parameters();
    let mut reader = XmlReader::new(text);
    loop {
        match reader.next_node()? {
            XmlNode::Start(root) => return XmlFactory::read(&root, &mut reader, ctx),
            XmlNode::Text(_) => continue,
            XmlNode::End(_) | XmlNode::Eof => return Ok(None),
        }
    }
}

/// Read the attributes, children and text of `element` into `clause`, up to
/// and including the element's end tag.
pub fn read_clause(
    clause: &mut dyn Clause,
    element: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
) -> DynaResult<()> {
    for (name, value) in &element.attributes {
        if !clause.read_an_attribute(name, value, ctx)? {
            debug!(element = %element.name, attribute = %name, "ignoring unknown XML attribute");
        }
    }
    if !element.is_empty {
        loop {
            match reader.next_node()? {
                XmlNode::Start(child) => {
                    if !clause.read_an_inner_element(&child, reader, ctx)? {
                        debug!(parent = %element.name, element = %child.name, "skipping unknown XML element");
                        reader.skip_element(&child)?;
                    }
                }
                XmlNode::Text(text) => clause.read_text(&text, ctx)?,
                XmlNode::End(_) => break,
                XmlNode::Eof => return Err(reader::unexpected_eof(&element.name)),
            }
        }
    }
    clause.read_complete(element, ctx)
}

/// Walk the child elements of `parent` until its end tag, ignoring text.
/// `on_child` returns whether it consumed the child; children it leaves
/// alone are skipped.
pub(crate) fn read_child_elements<C>(
    parent: &XmlElement,
    reader: &mut XmlReader<'_>,
    ctx: &mut XmlContext,
    mut on_child: C,
) -> DynaResult<()>
where
    C: FnMut(&XmlElement, &mut XmlReader<'_>, &mut XmlContext) -> DynaResult<bool>,
{
    if parent.is_empty {
        return Ok(());
    }
    loop {
        match reader.next_node()? {
            XmlNode::Start(child) => {
                if !on_child(&child, reader, ctx)? {
                    debug!(parent = %parent.name, element = %child.name, "skipping unknown XML element");
                    reader.skip_element(&child)?;
                }
            }
            XmlNode::Text(_) => {}
            XmlNode::End(_) => return Ok(()),
            XmlNode::Eof => return Err(reader::unexpected_eof(&parent.name)),
        }
    }
}

/// Text content of `element`, with any child elements skipped.
pub(crate) fn read_element_text(element: &XmlElement, reader: &mut XmlReader<'_>) -> DynaResult<String> {
    let mut text = String::new();
    if element.is_empty {
        return Ok(text);
    }
    loop {
        match reader.next_node()? {
            XmlNode::Start(child) => reader.skip_element(&child)?,
            XmlNode::Text(t) => text.push_str(&t),
            XmlNode::End(_) => return Ok(text),
            XmlNode::Eof => return Err(reader::unexpected_eof(&element.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DbType;

    #[test]
    fn test_qualified_names() {
        let ctx = XmlContext::default()
            .with_namespace("urn:dynasql", Some("d"))
            .qualify_elements(true);
        assert_eq!(ctx.element_name("Select"), "d:Select");
        assert_eq!(ctx.attribute_name("Name"), "Name");
    }

    #[test]
    fn test_register_parameter_once() {
        let mut ctx = XmlContext::default();
        let param = Param::new("id", DbType::Int32);
        assert!(ctx.register_parameter(&param));
        assert!(!ctx.register_parameter(&param));
        assert_eq!(ctx.registered_parameter("id").map(|p| p.db_type()), Some(DbType::Int32));
    }

    #[test]
    fn test_unknown_root_is_none() {
        let mut ctx = XmlContext::default();
        let clause = from_xml("<Mystery><Field Name=\"a\"/></Mystery>", &mut ctx).unwrap();
        assert!(clause.is_none());
    }
}
