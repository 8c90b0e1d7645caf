//! Tag lookup over a small in-memory XML tree.
//!
//! `RunParameters.xml` layouts differ between instrument models and software
//! versions, so fields are located by tag name rather than by a fixed schema.
//! [`XmlDocument::lookup`] finds the first element with a given name anywhere
//! in the document and returns the text of its first descendant with a
//! second name.

use std::io::{BufReader, Read};
use std::path::Path;

use xml::reader::{ParserConfig, XmlEvent};

use crate::core::types::Extracted;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// First descendant with `name` in document order, not including `self`
    fn find_descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }
}

/// A parsed XML document, or the reason it could not be read
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: Result<Element, String>,
}

impl XmlDocument {
    /// Read and parse a file. Failures are kept rather than returned.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        match std::fs::File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)),
            Err(e) => Self {
                root: Err(format!("could not read {}: {e}", path.display())),
            },
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Self {
        Self {
            root: build_tree(reader),
        }
    }

    /// Why the document could not be loaded, if it could not
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.root.as_ref().err().map(String::as_str)
    }

    /// Text of the first `child` inside the first `element` in the document.
    ///
    /// Returns `Absent` if either tag is missing or the child has no text, and
    /// `Malformed` for every lookup on a document that failed to load.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqrun_meta::parsing::xml::XmlDocument;
    ///
    /// let doc = XmlDocument::from_text(
    ///     "<RunParameters><Setup><ApplicationName>MiSeq Control Software</ApplicationName></Setup></RunParameters>",
    /// );
    /// assert_eq!(
    ///     doc.lookup("Setup", "ApplicationName").value().map(String::as_str),
    ///     Some("MiSeq Control Software")
    /// );
    /// assert!(doc.lookup("Setup", "ApplicationVersion").is_absent());
    /// ```
    #[must_use]
    pub fn lookup(&self, element: &str, child: &str) -> Extracted<String> {
        let root = match &self.root {
            Ok(root) => root,
            Err(reason) => return Extracted::Malformed(reason.clone()),
        };

        let outer = if root.name == element {
            Some(root)
        } else {
            root.find_descendant(element)
        };

        match outer.and_then(|e| e.find_descendant(child)) {
            Some(inner) if !inner.text.is_empty() => Extracted::Value(inner.text.clone()),
            _ => Extracted::Absent,
        }
    }
}

fn build_tree<R: Read>(reader: R) -> Result<Element, String> {
    let events = ParserConfig::new().trim_whitespace(true).create_reader(reader);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    for event in events {
        match event.map_err(|e| e.to_string())? {
            XmlEvent::StartElement { name, .. } => stack.push(Element::new(name.local_name)),
            XmlEvent::EndElement { .. } => {
                let Some(element) = stack.pop() else {
                    continue;
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| "document has no root element".to_string())
}
