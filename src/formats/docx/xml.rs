//! Minimal element tree over quick-xml events.
//!
//! WordprocessingML parts are small enough to hold in memory, and the extractor walks them
//! in several directions (runs look at their properties, drawings at nested descendants),
//! so a tree is simpler than a streaming pass. Names are stored without their namespace
//! prefix: `w:p` is `p`, `r:id` is `id`.

use crate::error::FormatError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Value of the first attribute with this local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |element| element.name == name)
    }

    /// Follow a path of child names, e.g. `["pPr", "pStyle"]`.
    pub fn path(&self, names: &[&str]) -> Option<&XmlElement> {
        names
            .iter()
            .try_fold(self, |element, name| element.child(name))
    }

    /// `w:val` of a nested property element, e.g. `path_val(&["pPr", "jc"])`.
    pub fn path_val(&self, names: &[&str]) -> Option<&str> {
        self.path(names).and_then(|element| element.attr("val"))
    }

    /// Every descendant element with this name, in document order.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, name: &str, found: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

/// Parse an XML part into its root element.
pub fn parse(content: &str) -> Result<XmlElement, FormatError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FormatError::Container("unbalanced XML end tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape().map_err(xml_error)?;
                    parent.children.push(XmlNode::Text(text.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FormatError::Container(format!(
            "unexpected end of XML inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| FormatError::Container("empty XML part".to_string()))
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, FormatError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn xml_error(error: impl std::fmt::Display) -> FormatError {
    FormatError::Container(format!("XML error: {}", error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prefixes_and_unescapes() {
        let root = parse(
            r#"<?xml version="1.0"?><w:p xmlns:w="x"><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">a &amp; b </w:t></w:r></w:p>"#,
        )
        .unwrap();
        assert_eq!(root.name, "p");
        assert_eq!(root.path_val(&["pPr", "pStyle"]), Some("Heading1"));
        let texts = root.descendants("t");
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].children, vec![XmlNode::Text("a & b ".into())]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = parse("<a><b n='1'><b n='2'/></b><c><b n='3'/></c></a>").unwrap();
        let order: Vec<_> = root
            .descendants("b")
            .iter()
            .filter_map(|b| b.attr("n"))
            .collect();
        assert_eq!(order, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_malformed_xml_is_a_container_error() {
        assert!(matches!(parse("<a><b></a>"), Err(FormatError::Container(_))));
        assert!(matches!(parse("<a>"), Err(FormatError::Container(_))));
        assert!(matches!(parse(""), Err(FormatError::Container(_))));
    }
}
