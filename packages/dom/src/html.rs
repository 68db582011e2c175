use crate::dom::{MemoryDom, NodeId};
use crate::tags::is_void_tag;
use std::fmt::Write;

/// Options for HTML serialization
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// One node per line, indented by depth
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

impl MemoryDom {
    /// Serialize the children of `id` (or the node itself, when it is not a
    /// container) as HTML. Listeners are not serialized.
    pub fn to_html(&self, id: NodeId) -> String {
        self.to_html_with(id, HtmlOptions::default())
    }

    pub fn to_html_with(&self, id: NodeId, options: HtmlOptions) -> String {
        let mut writer = HtmlWriter {
            dom: self,
            options: &options,
            out: String::new(),
        };

        match self.node(id) {
            Some(node) if node.is_container() => {
                for child in &node.children {
                    writer.write_node(*child, 0);
                }
            }
            Some(_) => writer.write_node(id, 0),
            None => {}
        }

        writer.out
    }
}

/// Depth-first walk over the arena, emitting one line per node in pretty mode
struct HtmlWriter<'a> {
    dom: &'a MemoryDom,
    options: &'a HtmlOptions,
    out: String,
}

impl HtmlWriter<'_> {
    fn write_node(&mut self, id: NodeId, depth: usize) {
        let dom = self.dom;
        let Some(node) = dom.node(id) else {
            return;
        };

        let mut open = format!("<{}", node.tag);
        if let Some(class_name) = &node.class_name {
            let _ = write!(open, " class=\"{}\"", escape_attribute(class_name));
        }
        if !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(open, " style=\"{}\"", escape_attribute(&style));
        }
        for (name, value) in &node.attributes {
            let _ = write!(open, " {}=\"{}\"", name, escape_attribute(value));
        }
        open.push('>');

        if is_void_tag(&node.tag) {
            self.line(depth, &open);
            return;
        }

        // Leaf nodes stay on one line
        if node.children.is_empty() {
            let text = node.text.as_deref().map(escape_text).unwrap_or_default();
            self.line(depth, &format!("{}{}</{}>", open, text, node.tag));
            return;
        }

        self.line(depth, &open);
        for child in &node.children {
            self.write_node(*child, depth + 1);
        }
        self.line(depth, &format!("</{}>", node.tag));
    }

    fn line(&mut self, depth: usize, text: &str) {
        if self.options.pretty {
            self.out.push_str(&self.options.indent.repeat(depth));
            self.out.push_str(text);
            self.out.push('\n');
        } else {
            self.out.push_str(text);
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_common::{HostRenderer, PropValue};

    fn sample() -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let container = dom.create_container();
        let div = dom.create_node("div").unwrap();
        let input = dom.create_node("input").unwrap();
        let span = dom.create_node("span").unwrap();

        dom.set_property(&div, "className", &PropValue::from("a")).unwrap();
        dom.set_property(&input, "value", &PropValue::from("\"x\"")).unwrap();
        dom.set_text_content(&span, "1 < 2").unwrap();
        dom.append_children(&div, &[input, span]).unwrap();
        dom.append_child(&container, &div).unwrap();

        (dom, container)
    }

    #[test]
    fn test_compact_html() {
        let (dom, container) = sample();
        assert_eq!(
            dom.to_html(container),
            "<div class=\"a\"><input value=\"&quot;x&quot;\"><span>1 &lt; 2</span></div>"
        );
    }

    #[test]
    fn test_pretty_html() {
        let (dom, container) = sample();
        let html = dom.to_html_with(
            container,
            HtmlOptions {
                pretty: true,
                ..HtmlOptions::default()
            },
        );

        assert_eq!(
            html,
            "<div class=\"a\">\n  <input value=\"&quot;x&quot;\">\n  <span>1 &lt; 2</span>\n</div>\n"
        );
    }

    #[test]
    fn test_pretty_html_nests_by_depth() {
        let (mut dom, container) = sample();
        let div = dom.children(container)[0];
        let list = dom.create_node("ul").unwrap();
        let item = dom.create_node("li").unwrap();
        dom.set_text_content(&item, "deep").unwrap();
        dom.append_child(&list, &item).unwrap();
        dom.append_child(&div, &list).unwrap();

        let html = dom.to_html_with(
            div,
            HtmlOptions {
                pretty: true,
                indent: "\t".to_string(),
            },
        );

        assert!(html.starts_with("<div class=\"a\">\n\t<input"));
        assert!(html.contains("\t<ul>\n\t\t<li>deep</li>\n\t</ul>\n</div>\n"));
    }

    #[test]
    fn test_unknown_node_is_empty() {
        let (_, container) = sample();
        assert_eq!(MemoryDom::new().to_html(container), "");
    }
}
