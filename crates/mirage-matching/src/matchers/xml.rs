//! Canonical XML equality and XPath selection on top of sxd-document.

use sxd_document::dom::{ChildOfElement, Element};
use sxd_document::parser;
use sxd_document::QName;
use sxd_xpath::{evaluate_xpath, Factory, Value};

/// Reduce an XML document to a canonical rendering: attributes sorted by
/// name, whitespace-only text nodes dropped, remaining text trimmed,
/// comments and processing instructions ignored. Two documents are treated
/// as equal iff their canonical renderings are byte-identical.
///
/// Returns `None` when the document is not well-formed.
pub(crate) fn canonical(document: &str) -> Option<String> {
    let package = parser::parse(document).ok()?;
    let document = package.as_document();
    let root = document
        .root()
        .children()
        .into_iter()
        .find_map(|child| child.element())?;

    let mut out = String::new();
    write_element(root, &mut out);
    Some(out)
}

fn write_element(element: Element<'_>, out: &mut String) {
    out.push('<');
    push_name(element.name(), out);

    let mut attributes: Vec<(String, String)> = element
        .attributes()
        .iter()
        .map(|attribute| {
            let mut name = String::new();
            push_name(attribute.name(), &mut name);
            (name, attribute.value().to_string())
        })
        .collect();
    attributes.sort();
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&value);
        out.push('"');
    }
    out.push('>');

    for child in element.children() {
        match child {
            ChildOfElement::Element(child) => write_element(child, out),
            ChildOfElement::Text(text) => {
                let trimmed = text.text().trim();
                if !trimmed.is_empty() {
                    out.push_str(trimmed);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    push_name(element.name(), out);
    out.push('>');
}

fn push_name(name: QName<'_>, out: &mut String) {
    if let Some(namespace) = name.namespace_uri() {
        out.push('{');
        out.push_str(namespace);
        out.push('}');
    }
    out.push_str(name.local_part());
}

/// Validate an XPath expression without evaluating it.
pub(crate) fn validate_xpath(expression: &str) -> Result<(), String> {
    match Factory::new().build(expression) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err("empty XPath expression".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

/// Evaluate an XPath expression against an XML subject. True iff the
/// expression selects at least one node; scalar results map through their
/// truth value. Parse or evaluation failure on either side is a no-match.
pub(crate) fn select(subject: &str, expression: &str) -> bool {
    let package = match parser::parse(subject) {
        Ok(package) => package,
        Err(_) => return false,
    };
    let document = package.as_document();

    match evaluate_xpath(&document, expression) {
        Ok(Value::Nodeset(nodes)) => nodes.size() > 0,
        Ok(Value::Boolean(value)) => value,
        Ok(Value::Number(_)) => true,
        Ok(Value::String(value)) => !value.is_empty(),
        Err(_) => false,
    }
}
