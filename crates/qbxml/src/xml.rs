//! Minimal element tree over quick-xml events, enough to walk qbXML responses.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::GatewayError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first direct child `name`, empty if absent.
    pub fn child_text(&self, name: &str) -> &str {
        self.child(name).map(|c| c.text.trim()).unwrap_or("")
    }

    /// All descendants (depth-first, document order) named `name`.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// First element in document order (self included) carrying `attr`.
    pub fn find_with_attr(&self, attr: &str) -> Option<&Element> {
        if self.attr(attr).is_some() {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_with_attr(attr))
    }
}

/// Parse a document into its root element.
pub fn parse(xml: &str) -> Result<Element, GatewayError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(start_element(e));
            }
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e);
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| GatewayError::Parse("unbalanced end tag".into()))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&unescape_xml(&String::from_utf8_lossy(e.as_ref())));
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let name = String::from_utf8_lossy(e.as_ref());
                    current.text.push_str(&resolve_entity(&name));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GatewayError::Parse(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(GatewayError::Parse("unexpected end of document".into()));
    }
    root.ok_or_else(|| GatewayError::Parse("document has no root element".into()))
}

fn start_element(e: &quick_xml::events::BytesStart<'_>) -> Element {
    let attributes = e
        .attributes()
        .flatten()
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                unescape_xml(&String::from_utf8_lossy(&attr.value)),
            )
        })
        .collect();
    Element {
        name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
        attributes,
        ..Element::default()
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Replace the predefined entities and numeric character references.
fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) => {
                out.push_str(&resolve_entity(&after[..semi]));
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> String {
    match name {
        "amp" => "&".into(),
        "lt" => "<".into(),
        "gt" => ">".into(),
        "quot" => "\"".into(),
        "apos" => "'".into(),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok()
            } else {
                None
            };
            match code.and_then(char::from_u32) {
                Some(c) => c.to_string(),
                None => format!("&{name};"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_with_text_and_attributes() {
        let doc = parse(
            r#"<?xml version="1.0"?>
<QBXML><QBXMLMsgsRs>
  <VendorQueryRs requestID="1" statusCode="0" statusMessage="Status OK">
    <VendorRet><Name>Smith &amp; Sons</Name><Fax>555-0100</Fax></VendorRet>
    <VendorRet><Name>Beta</Name><IsActive>true</IsActive></VendorRet>
  </VendorQueryRs>
</QBXMLMsgsRs></QBXML>"#,
        )
        .unwrap();

        assert_eq!(doc.name, "QBXML");
        let rets = doc.descendants_named("VendorRet");
        assert_eq!(rets.len(), 2);
        assert_eq!(rets[0].child_text("Name"), "Smith & Sons");
        assert_eq!(rets[0].child_text("Fax"), "555-0100");
        assert_eq!(rets[1].child_text("Fax"), "");

        let status = doc.find_with_attr("statusCode").unwrap();
        assert_eq!(status.name, "VendorQueryRs");
        assert_eq!(status.attr("statusMessage"), Some("Status OK"));
    }

    #[test]
    fn entities_and_char_refs() {
        assert_eq!(unescape_xml("a &lt;b&gt; &#65;&#x42; &bogus;"), "a <b> AB &bogus;");
        assert_eq!(unescape_xml("no refs"), "no refs");
    }

    #[test]
    fn malformed_document() {
        assert!(parse("<QBXML><Open></QBXML>").is_err());
        assert!(parse("").is_err());
    }
}
