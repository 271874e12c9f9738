// File: crates/linechart-core/src/svg.rs
// Summary: Serialise a document subtree to standalone SVG markup.

use crate::dom::{Document, NodeId};
use crate::error::LinechartResult;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

impl Document {
    /// Markup for `node` and its subtree. An `svg` root gains the SVG namespace.
    pub fn to_svg(&self, node: NodeId) -> LinechartResult<String> {
        self.try_element(node)?;
        let mut out = String::with_capacity(4096);
        self.write_node(node, true, &mut out);
        Ok(out)
    }

    fn write_node(&self, node: NodeId, root: bool, out: &mut String) {
        let Some(el) = self.element(node) else { return };
        out.push('<');
        out.push_str(&el.tag);
        if root && el.tag == "svg" && !el.attrs().contains_key("xmlns") {
            push_attr(out, "xmlns", SVG_NS);
        }
        for (k, v) in el.attrs() {
            push_attr(out, k, v);
        }
        if !el.classes().is_empty() {
            push_attr(out, "class", &el.classes().join(" "));
        }
        if !el.styles().is_empty() {
            let style: String = el.styles().iter().map(|(k, v)| format!("{k}:{v};")).collect();
            push_attr(out, "style", &style);
        }
        if el.children().is_empty() && el.text().is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = el.text() {
            out.push_str(&html_escape::encode_text(text));
        }
        for child in el.children() {
            self.write_node(*child, false, out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}
