//! Emitter: `Document` → layer outline text.
//!
//! Output parses back through [`crate::outline::parse_outline`] with the
//! same ids, names, attributes, nesting and selection.

use crate::id::NodeId;
use crate::model::*;
use crate::outline::is_id_char;
use petgraph::graph::NodeIndex;
use std::fmt::Write;

/// Emit a `Document` as outline text.
#[must_use]
pub fn emit_outline(doc: &Document) -> String {
    let mut out = String::with_capacity(1024);

    let page = doc.layer(doc.page);
    writeln!(out, "page {} {}", id_ref(page.id), quote(&page.name)).unwrap();

    for child in doc.top_level() {
        emit_layer(&mut out, doc, child, 0);
    }

    if !doc.selection.is_empty() {
        out.push_str("select");
        for id in doc.selected_ids() {
            write!(out, " {}", id_ref(id)).unwrap();
        }
        out.push('\n');
    }

    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn emit_layer(out: &mut String, doc: &Document, idx: NodeIndex, depth: usize) {
    let layer = doc.layer(idx);

    indent(out, depth);
    write!(
        out,
        "{} {} {}",
        layer.node_type.keyword(),
        id_ref(layer.id),
        quote(&layer.name)
    )
    .unwrap();

    if let Some(w) = layer.width {
        write!(out, " w={}", format_num(w)).unwrap();
    }
    if let Some(h) = layer.height {
        write!(out, " h={}", format_num(h)).unwrap();
    }
    if let Some(mode) = layer.layout_mode {
        write!(out, " layout={}", mode.keyword()).unwrap();
    }
    if let Some(fills) = &layer.fills {
        write!(out, " fill={}", paints(fills)).unwrap();
    }
    if let Some(strokes) = &layer.strokes {
        write!(out, " stroke={}", paints(strokes)).unwrap();
    }
    match layer.is_mask {
        Some(true) => out.push_str(" mask"),
        Some(false) => out.push_str(" mask=false"),
        None => {}
    }
    if let Some(text) = &layer.characters {
        write!(out, " chars={}", quote(text)).unwrap();
    }

    let children = doc.children(idx);
    if children.is_empty() {
        out.push('\n');
        return;
    }

    out.push_str(" {\n");
    for child in children {
        emit_layer(out, doc, child, depth + 1);
    }
    indent(out, depth);
    out.push_str("}\n");
}

fn paints(paints: &Paints) -> String {
    match paints.list() {
        None => MIXED.to_string(),
        Some(list) => {
            let kinds: Vec<&str> = list.iter().map(|p| p.kind.keyword()).collect();
            format!("[{}]", kinds.join(", "))
        }
    }
}

/// `@id`, quoted when the id has characters the parser would stop at.
fn id_ref(id: NodeId) -> String {
    let s = id.as_str();
    if !s.is_empty() && s.chars().all(is_id_char) {
        format!("@{s}")
    } else {
        format!("@{}", quote(s))
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shortest decimal form that parses back to the same `f64`.
fn format_num(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
