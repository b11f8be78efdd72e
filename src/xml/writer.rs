use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::XmlContext;
use crate::error::{DynaError, DynaResult};

/// Streaming XML writer for clause trees.
///
/// The start tag of the current element is held back until a child, text or
/// the end tag is written, so attributes can follow `begin_element`. An
/// element with no content is written as an empty element.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            pending: None,
            open: Vec::new(),
        }
    }

    /// Writer that indents nested elements by two spaces.
    pub fn indented() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            pending: None,
            open: Vec::new(),
        }
    }

    pub fn write_declaration(&mut self) -> DynaResult<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(())
    }

    pub fn begin_element(&mut self, ctx: &XmlContext, local: &str) -> DynaResult<()> {
        self.flush_pending()?;
        let name = ctx.element_name(local);
        let mut start = BytesStart::new(name.clone());
        if self.open.is_empty() {
            if let Some(ns) = ctx.namespace() {
                match ctx.prefix() {
                    Some(prefix) => {
                        start.push_attribute((format!("xmlns:{}", prefix).as_str(), ns))
                    }
                    None if ctx.qualifies_elements() => start.push_attribute(("xmlns", ns)),
                    None => {}
                }
            }
        }
        self.pending = Some(start);
        self.open.push(name);
        Ok(())
    }

    pub fn write_attribute(&mut self, ctx: &XmlContext, local: &str, value: &str) -> DynaResult<()> {
        let name = ctx.attribute_name(local);
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name.as_str(), value));
                Ok(())
            }
            None => Err(DynaError::format(format!(
                "attribute '{}' written outside a start tag",
                local
            ))),
        }
    }

    /// Write an attribute when the value is present and not empty.
    pub fn write_optional_attribute(
        &mut self,
        ctx: &XmlContext,
        local: &str,
        value: Option<&str>,
    ) -> DynaResult<()> {
        match value {
            Some(v) if !v.is_empty() => self.write_attribute(ctx, local, v),
            _ => Ok(()),
        }
    }

    pub fn write_text(&mut self, text: &str) -> DynaResult<()> {
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    pub fn end_element(&mut self) -> DynaResult<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| DynaError::format("end_element without an open element"))?;
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    pub fn into_string(self) -> DynaResult<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| DynaError::format(e.to_string()))
    }

    fn flush_pending(&mut self) -> DynaResult<()> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_nested_elements() {
        let ctx = XmlContext::default();
        let mut writer = XmlWriter::new();
        writer.begin_element(&ctx, "Select").unwrap();
        writer.write_attribute(&ctx, "Distinct", "True").unwrap();
        writer.begin_element(&ctx, "Field").unwrap();
        writer.write_attribute(&ctx, "Name", "id").unwrap();
        writer.end_element().unwrap();
        writer.end_element().unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            r#"<Select Distinct="True"><Field Name="id"/></Select>"#
        );
    }

    #[test]
    fn test_prefixed_root() {
        let ctx = XmlContext::default()
            .with_namespace("urn:test", Some("d"))
            .qualify_elements(true);
        let mut writer = XmlWriter::new();
        writer.begin_element(&ctx, "Const").unwrap();
        writer.write_text("a<b").unwrap();
        writer.end_element().unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            r#"<d:Const xmlns:d="urn:test">a&lt;b</d:Const>"#
        );
    }

    #[test]
    fn test_attribute_after_content_fails() {
        let ctx = XmlContext::default();
        let mut writer = XmlWriter::new();
        writer.begin_element(&ctx, "Const").unwrap();
        writer.write_text("1").unwrap();
        assert!(writer.write_attribute(&ctx, "Type", "Int32").is_err());
    }
}
