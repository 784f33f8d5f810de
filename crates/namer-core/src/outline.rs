//! Parser for the layer outline text format → `Document`.
//!
//! Built on `winnow` 0.7. One layer per line, children in braces:
//!
//! ```text
//! # comments start with '#'
//! page @0:1 "Landing"
//! frame @1:2 "Desktop" w=1680 h=1024 layout=vertical {
//!   rectangle @1:3 "hero" fill=[image] stroke=[]
//!   group "icons" {
//!     vector "mask" mask fill=[solid] stroke=mixed
//!   }
//!   text "Title" chars="Hello \"world\""
//! }
//! select @1:2
//! ```
//!
//! Ids outside `[alnum _ : ; - .]` are quoted: `@"frame one"`. Layers
//! without an `@id` get a generated one that does not clash with any
//! explicit id in the file. The optional `page` line must come first;
//! `select` lines may appear anywhere at the top level.

use crate::id::NodeId;
use crate::model::*;
use std::collections::HashSet;
use winnow::ascii::{digit0, digit1, space0};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

/// Parse an outline document.
///
/// # Errors
/// Returns `line N: ...` describing the first syntax error, unknown
/// keyword, duplicate id, child under a leaf layer, or unknown selection.
#[must_use = "parsing result should be used"]
pub fn parse_outline(input: &str) -> Result<Document, String> {
    OutlineParser::new(input).parse()
}

#[derive(Debug)]
struct ParsedLayer {
    layer: Layer,
    /// The id is a placeholder, replaced on insertion.
    generated: bool,
    children: Vec<ParsedLayer>,
}

struct OutlineParser<'a> {
    source: &'a str,
    rest: &'a str,
    seen: HashSet<NodeId>,
}

impl<'a> OutlineParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            seen: HashSet::new(),
        }
    }

    fn parse(mut self) -> Result<Document, String> {
        let mut doc = Document::new();
        let mut top_level = Vec::new();
        let mut selection = Vec::new();

        skip_ws_and_comments(&mut self.rest);
        if starts_with_keyword(self.rest, "page") {
            let page = self.page_line()?;
            doc = Document::with_page(page);
        }
        self.seen.insert(doc.layer(doc.page).id);

        skip_ws_and_comments(&mut self.rest);
        while !self.rest.is_empty() {
            if starts_with_keyword(self.rest, "select") {
                selection.extend(self.select_line()?);
            } else if starts_with_keyword(self.rest, "page") {
                return Err(self.error("`page` must be the first line"));
            } else {
                top_level.push(self.layer()?);
            }
            skip_ws_and_comments(&mut self.rest);
        }

        let page = doc.page;
        for parsed in top_level {
            insert_recursive(&mut doc, page, parsed, &mut self.seen);
        }
        doc.select(&selection)?;
        Ok(doc)
    }

    // ─── Diagnostics ─────────────────────────────────────────────────────

    fn line(&self) -> usize {
        let consumed = &self.source[..self.source.len() - self.rest.len()];
        consumed.matches('\n').count() + 1
    }

    fn error(&self, message: impl AsRef<str>) -> String {
        format!("line {}: {}", self.line(), message.as_ref())
    }

    /// Run a winnow parser on the remaining input, naming what was expected
    /// on failure.
    fn token<O>(
        &mut self,
        expected: &str,
        mut parser: impl Parser<&'a str, O, ErrMode<ContextError>>,
    ) -> Result<O, String> {
        parser
            .parse_next(&mut self.rest)
            .map_err(|_| self.error(format!("expected {expected}")))
    }

    // ─── Statements ──────────────────────────────────────────────────────

    fn page_line(&mut self) -> Result<Layer, String> {
        self.token("`page`", "page")?;
        skip_space(&mut self.rest);
        let id = self.optional_id()?.unwrap_or_else(|| NodeId::intern("0:1"));
        let name = self.token("quoted page name", parse_quoted_string)?;
        Ok(Layer::new(id, NodeType::Page, name))
    }

    fn select_line(&mut self) -> Result<Vec<NodeId>, String> {
        self.token("`select`", "select")?;
        let mut ids = Vec::new();
        loop {
            skip_space(&mut self.rest);
            if !self.rest.starts_with('@') {
                break;
            }
            ids.push(self.token("layer id", parse_node_id)?);
        }
        if ids.is_empty() {
            return Err(self.error("`select` needs at least one @id"));
        }
        Ok(ids)
    }

    fn layer(&mut self) -> Result<ParsedLayer, String> {
        let keyword = self.token("layer type", parse_identifier)?;
        let node_type = NodeType::from_keyword(keyword)
            .filter(|t| *t != NodeType::Page)
            .ok_or_else(|| self.error(format!("unknown layer type `{keyword}`")))?;
        skip_space(&mut self.rest);

        let explicit = self.optional_id()?;
        if let Some(id) = explicit
            && !self.seen.insert(id)
        {
            return Err(self.error(format!("duplicate layer id {id}")));
        }
        let id = explicit.unwrap_or_else(|| NodeId::with_prefix(keyword));

        let name = self.token("quoted layer name", parse_quoted_string)?;
        let mut layer = Layer::new(id, node_type, name);

        loop {
            skip_space(&mut self.rest);
            if self.rest.is_empty() || self.rest.starts_with(['\n', '\r', '{', '}', '#']) {
                break;
            }
            self.property(&mut layer)?;
        }

        let mut children = Vec::new();
        if self.rest.starts_with('{') {
            if !node_type.is_container() {
                return Err(self.error(format!("`{keyword}` layers cannot contain children")));
            }
            self.rest = &self.rest[1..];
            loop {
                skip_ws_and_comments(&mut self.rest);
                if let Some(after) = self.rest.strip_prefix('}') {
                    self.rest = after;
                    break;
                }
                if self.rest.is_empty() {
                    return Err(self.error(format!("unclosed `{{` for layer {id}")));
                }
                children.push(self.layer()?);
            }
        }

        Ok(ParsedLayer {
            layer,
            generated: explicit.is_none(),
            children,
        })
    }

    fn optional_id(&mut self) -> Result<Option<NodeId>, String> {
        if !self.rest.starts_with('@') {
            return Ok(None);
        }
        let id = self.token("layer id", parse_node_id)?;
        skip_space(&mut self.rest);
        Ok(Some(id))
    }

    // ─── Properties ──────────────────────────────────────────────────────

    fn property(&mut self, layer: &mut Layer) -> Result<(), String> {
        let key = self.token("property", parse_identifier)?;
        let Some(after) = self.rest.strip_prefix('=') else {
            if key == "mask" {
                layer.is_mask = Some(true);
                return Ok(());
            }
            return Err(self.error(format!("property `{key}` needs a value")));
        };
        self.rest = after;

        match key {
            "w" => layer.width = Some(self.token("number", parse_number)?),
            "h" => layer.height = Some(self.token("number", parse_number)?),
            "layout" => {
                let mode = self.token("layout mode", parse_identifier)?;
                layer.layout_mode = Some(
                    LayoutMode::from_keyword(mode)
                        .ok_or_else(|| self.error(format!("unknown layout mode `{mode}`")))?,
                );
            }
            "fill" => layer.fills = Some(self.paints()?),
            "stroke" => layer.strokes = Some(self.paints()?),
            "mask" => {
                let value = self.token("true or false", parse_identifier)?;
                layer.is_mask = Some(match value {
                    "true" => true,
                    "false" => false,
                    _ => return Err(self.error(format!("expected true or false, got `{value}`"))),
                });
            }
            "chars" => layer.characters = Some(self.token("quoted text", parse_quoted_string)?),
            _ => return Err(self.error(format!("unknown property `{key}`"))),
        }
        Ok(())
    }

    fn paints(&mut self) -> Result<Paints, String> {
        if let Some(after) = self.rest.strip_prefix(MIXED) {
            self.rest = after;
            return Ok(Paints::Mixed);
        }
        self.token("`[` or `mixed`", '[')?;

        let mut kinds = Vec::new();
        loop {
            skip_space(&mut self.rest);
            if let Some(after) = self.rest.strip_prefix(']') {
                self.rest = after;
                break;
            }
            if !kinds.is_empty() {
                self.token("`,` or `]`", ',')?;
                skip_space(&mut self.rest);
            }
            let keyword = self.token("paint type", parse_identifier)?;
            kinds.push(
                PaintType::from_keyword(keyword)
                    .ok_or_else(|| self.error(format!("unknown paint type `{keyword}`")))?,
            );
        }
        Ok(Paints::of(&kinds))
    }
}

/// Runs after every explicit id is known, so generated ids can skip them.
fn insert_recursive(
    doc: &mut Document,
    parent: petgraph::graph::NodeIndex,
    parsed: ParsedLayer,
    seen: &mut HashSet<NodeId>,
) {
    let mut layer = parsed.layer;
    if parsed.generated {
        while !seen.insert(layer.id) {
            layer.id = NodeId::with_prefix(layer.node_type.keyword());
        }
    }
    let idx = doc.add_layer(parent, layer);
    for child in parsed.children {
        insert_recursive(doc, idx, child, seen);
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    s.strip_prefix(keyword)
        .is_some_and(|after| after.is_empty() || after.starts_with([' ', '\t', '\n', '\r']))
}

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        *input = input.trim_start();
        if !input.starts_with('#') {
            break;
        }
        *input = match input.find('\n') {
            Some(pos) => &input[pos + 1..],
            None => "",
        };
    }
}

/// Consume optional spaces and tabs (not newlines).
fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = space0.parse_next(input);
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// Characters allowed in an unquoted `@id`.
pub(crate) fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | ';' | '-' | '.')
}

/// `@` followed by a host id such as `12:34` or `I5:6;7:8`, or by a quoted
/// id such as `@"frame one"`.
fn parse_node_id(input: &mut &str) -> ModalResult<NodeId> {
    preceded(
        '@',
        alt((
            parse_quoted_string.map(|id| NodeId::intern(&id)),
            take_while(1.., is_id_char).map(NodeId::intern),
        )),
    )
    .parse_next(input)
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    let _ = opt('-').parse_next(input)?;
    let _ = digit1.parse_next(input)?;
    if let Some(after) = input.strip_prefix('.') {
        *input = after;
        let _ = digit0.parse_next(input)?;
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

/// A double-quoted string with `\"`, `\\` and `\n` escapes.
fn parse_quoted_string(input: &mut &str) -> ModalResult<String> {
    let _ = '"'.parse_next(input)?;
    let mut out = String::new();
    loop {
        let chunk: &str = take_till(0.., ['"', '\\']).parse_next(input)?;
        out.push_str(chunk);
        if any.parse_next(input)? == '"' {
            return Ok(out);
        }
        match any.parse_next(input)? {
            'n' => out.push('\n'),
            escaped => out.push(escaped),
        }
    }
}
