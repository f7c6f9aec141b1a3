use std::collections::BTreeMap;

use crate::form::{get_path, FormValue};
use crate::models::parse_date;

/// Site-wide values a printable document needs besides the record itself
/// (school name, logo URL, issue date, signatory).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAssets {
    values: BTreeMap<String, String>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Record,
    Assets,
    This,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Upper,
    Lower,
    Date,
    Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Expr {
    root: Root,
    path: String,
    filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Var(Expr),
    Each { source: Expr, body: Vec<Node> },
}

/// A printable document layout.
///
/// Placeholders are `{{ record.path }}`, `{{ assets.key }}` and, inside
/// `{{#each record.list}} … {{/each}}`, `{{ this.path }}`. Filters follow a
/// pipe: `upper`, `lower`, `date`, `money`. Anything that does not resolve to
/// a scalar renders as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    pub fn new(name: impl Into<String>, body: &str) -> Self {
        Self {
            name: name.into(),
            nodes: parse(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, record: &FormValue, assets: &StaticAssets) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, record, None, assets, &mut out);
        out
    }
}

fn parse(body: &str) -> Vec<Node> {
    // Stack of open blocks; the bottom entry is the document itself.
    let mut stack: Vec<(Option<Expr>, Vec<Node>)> = vec![(None, Vec::new())];
    let mut rest = body;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        push_text(&mut stack, &rest[..start]);
        let tag = rest[start + 2..start + 2 + len].trim();
        rest = &rest[start + 2 + len + 2..];

        if let Some(source) = tag.strip_prefix("#each") {
            if let Some(expr) = parse_expr(source) {
                stack.push((Some(expr), Vec::new()));
            }
        } else if tag == "/each" {
            if stack.len() > 1 {
                if let Some((Some(source), body)) = stack.pop() {
                    if let Some((_, parent)) = stack.last_mut() {
                        parent.push(Node::Each { source, body });
                    }
                }
            }
        } else if let Some(expr) = parse_expr(tag) {
            if let Some((_, nodes)) = stack.last_mut() {
                nodes.push(Node::Var(expr));
            }
        }
    }
    push_text(&mut stack, rest);

    // Unclosed blocks are flattened into their parent.
    while stack.len() > 1 {
        if let Some((_, body)) = stack.pop() {
            if let Some((_, parent)) = stack.last_mut() {
                parent.extend(body);
            }
        }
    }
    stack.pop().map(|(_, nodes)| nodes).unwrap_or_default()
}

fn push_text(stack: &mut [(Option<Expr>, Vec<Node>)], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some((_, nodes)) = stack.last_mut() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn parse_expr(source: &str) -> Option<Expr> {
    let mut parts = source.split('|').map(str::trim);
    let target = parts.next()?;

    let (root, path) = match target.split_once('.') {
        Some(("record", path)) => (Root::Record, path),
        Some(("assets", path)) => (Root::Assets, path),
        Some(("this", path)) => (Root::This, path),
        None if target == "this" => (Root::This, ""),
        _ => return None,
    };

    let filters = parts
        .filter_map(|name| match name {
            "upper" => Some(Filter::Upper),
            "lower" => Some(Filter::Lower),
            "date" => Some(Filter::Date),
            "money" => Some(Filter::Money),
            _ => None,
        })
        .collect();

    Some(Expr {
        root,
        path: path.to_string(),
        filters,
    })
}

fn lookup<'a>(expr: &Expr, record: &'a FormValue, this: Option<&'a FormValue>) -> Option<&'a FormValue> {
    let base = match expr.root {
        Root::Record => record,
        Root::This => this?,
        Root::Assets => return None,
    };
    if expr.path.is_empty() {
        Some(base)
    } else {
        get_path(base, &expr.path)
    }
}

fn render_nodes(
    nodes: &[Node],
    record: &FormValue,
    this: Option<&FormValue>,
    assets: &StaticAssets,
    out: &mut String,
) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(expr) => {
                let raw = match expr.root {
                    Root::Assets => assets.get(&expr.path).map(str::to_string),
                    _ => lookup(expr, record, this).and_then(FormValue::display),
                };
                let value = raw.map(|text| apply_filters(text, &expr.filters)).unwrap_or_default();
                out.push_str(&escape_html(&value));
            }
            Node::Each { source, body } => {
                if let Some(items) = lookup(source, record, this).and_then(FormValue::as_list) {
                    for item in items {
                        render_nodes(body, record, Some(item), assets, out);
                    }
                }
            }
        }
    }
}

fn apply_filters(text: String, filters: &[Filter]) -> String {
    filters.iter().fold(text, |text, filter| match filter {
        Filter::Upper => text.to_uppercase(),
        Filter::Lower => text.to_lowercase(),
        Filter::Date => format_date(&text).unwrap_or(text),
        Filter::Money => text
            .trim()
            .parse::<f64>()
            .map(|amount| format!("{:.2}", amount))
            .unwrap_or(text),
    })
}

fn format_date(text: &str) -> Option<String> {
    parse_date(text).map(|date| date.format("%d %b %Y").to_string())
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
