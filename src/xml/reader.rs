use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{DynaError, DynaResult};

/// A start (or empty) element with its attributes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name, without any namespace prefix.
    pub name: String,
    /// Attributes by local name, in document order. Namespace declarations
    /// are not included.
    pub attributes: Vec<(String, String)>,
    /// `<Name/>`: there is no matching end node.
    pub is_empty: bool,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Start(XmlElement),
    Text(String),
    End(String),
    Eof,
}

/// Pull reader over an XML document held in memory.
pub struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> XmlReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            reader: Reader::from_str(text),
        }
    }

    /// Next element, text or end node. Declarations, comments and
    /// processing instructions are passed over.
    pub fn next_node(&mut self) -> DynaResult<XmlNode> {
        loop {
            let node = match self.reader.read_event()? {
                Event::Start(e) => XmlNode::Start(decode_element(&e, false)?),
                Event::Empty(e) => XmlNode::Start(decode_element(&e, true)?),
                Event::End(e) => {
                    XmlNode::End(String::from_utf8_lossy(e.local_name().as_ref()).into_owned())
                }
                Event::Text(t) => XmlNode::Text(t.unescape()?.into_owned()),
                Event::CData(c) => XmlNode::Text(String::from_utf8_lossy(&c.into_inner()).into_owned()),
                Event::Eof => XmlNode::Eof,
                _ => continue,
            };
            return Ok(node);
        }
    }

    /// Consume everything up to and including the end of `element`.
    pub fn skip_element(&mut self, element: &XmlElement) -> DynaResult<()> {
        if element.is_empty {
            return Ok(());
        }
        let mut depth = 0usize;
        loop {
            match self.next_node()? {
                XmlNode::Start(child) if !child.is_empty => depth += 1,
                XmlNode::End(_) if depth == 0 => return Ok(()),
                XmlNode::End(_) => depth -= 1,
                XmlNode::Eof => return Err(unexpected_eof(&element.name)),
                _ => {}
            }
        }
    }
}

pub(crate) fn unexpected_eof(name: &str) -> DynaError {
    DynaError::format(format!("unexpected end of document inside <{}>", name))
}

fn decode_element(start: &BytesStart<'_>, is_empty: bool) -> DynaResult<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        attributes.push((local, attr.unescape_value()?.into_owned()));
    }
    Ok(XmlElement {
        name,
        attributes,
        is_empty,
    })
}
