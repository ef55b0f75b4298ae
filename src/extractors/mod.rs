// Symbol Extractor
//
// Lifts a capture stream into typed definitions, references, imports, and doc
// comments. Three passes:
//
//   1. definitions and doc comments (name pairing, parent-of-definition)
//   2. references and imports (namespace derivation, definition suppression)
//   3. documentation association (nearest doc comment within 3 lines)
//
// Output is deterministic for a given input and grammar.

mod context;

use crate::database::types::{DetectedRelation, RelationType, SymbolType};
use crate::parsing::{Capture, ParsedFile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use context::{derive_namespace, nesting_separator};

/// A symbol definition lifted from the capture stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDefinition {
    pub name: String,
    pub kind: SymbolType,
    /// 1-based line of the defining identifier.
    pub line: u32,
    /// 0-based column of the defining identifier.
    pub column: u32,
    /// First line of the definition node, trimmed.
    pub signature: Option<String>,
    /// Index of the enclosing container definition within this result.
    pub parent: Option<usize>,
    /// Name of the enclosing container, when any.
    pub parent_name: Option<String>,
    /// Qualified container path for nested symbols (`Outer::Inner`,
    /// `App\Util`, `Outer.Inner` per language).
    pub nesting_context: Option<String>,
    pub documentation: Option<String>,
    /// The full source line containing the definition.
    pub content: String,
}

/// A non-defining occurrence of a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolReference {
    pub name: String,
    /// Capture subkind: `call`, `class`, `interface`, `type`, `field`.
    pub kind: String,
    pub line: u32,
    pub column: u32,
    /// Member-access chain prefix: for `a.b.c` the namespace is `a.b`.
    pub namespace: Option<String>,
    /// Name of the enclosing class/struct/module definition.
    pub parent: Option<String>,
}

/// An import statement found in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Quoted source string, quotes stripped (`./user`, `fmt`).
    pub source: Option<String>,
    /// Unquoted module path (`com.example.models.User`, `crate::db`).
    pub path: Option<String>,
    /// Imported names (`{ User, Role }`).
    pub names: Vec<String>,
    pub line: u32,
}

/// A documentation comment with its position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocComment {
    pub start_line: u32,
    pub end_line: u32,
    pub text: String,
}

/// Everything extracted from one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub definitions: Vec<SymbolDefinition>,
    pub references: Vec<SymbolReference>,
    pub imports: Vec<ImportStatement>,
    pub doc_comments: Vec<DocComment>,
    #[serde(skip)]
    pub relations: Vec<DetectedRelation>,
}

/// Byte range of a captured node, used to pair captures by containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn of(node: &tree_sitter::Node<'_>) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }

    fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    fn strictly_contains(&self, other: &Span) -> bool {
        self.contains(other) && *self != *other
    }
}

struct PendingDefinition {
    name: String,
    kind: SymbolType,
    line: u32,
    column: u32,
    signature: Option<String>,
    span: Span,
    in_impl_block: bool,
    /// Receiver type name for receiver-bound methods (Go).
    receiver: Option<String>,
}

/// Extract definitions, references, imports, and documentation from a parsed
/// file.
pub fn extract(parsed: &ParsedFile) -> ExtractionResult {
    let captures = parsed.captures();
    let mut result = ExtractionResult::default();

    let doc_comments = collect_doc_comments(parsed, &captures);
    let pending = collect_definitions(parsed, &captures);

    // Resolve parents by innermost strict containment, containers only.
    // Receiver-bound methods (Go) sit outside their struct lexically, so the
    // receiver type supplies their parent by name.
    let mut definitions: Vec<SymbolDefinition> = Vec::with_capacity(pending.len());
    let spans: Vec<Span> = pending.iter().map(|p| p.span).collect();
    for (index, def) in pending.iter().enumerate() {
        let parent = innermost_container(&pending, &spans, index).or_else(|| {
            def.receiver.as_ref().and_then(|receiver| {
                pending
                    .iter()
                    .position(|candidate| candidate.name == *receiver && is_container_kind(candidate.kind))
            })
        });
        let (kind, parent_name, nesting_context) = match parent {
            Some(parent_index) => {
                let container = &pending[parent_index];
                let kind = upgrade_kind(def.kind, Some(container.kind), def.in_impl_block);
                let context = nesting_context_for(&pending, &spans, index, parsed.language());
                (kind, Some(container.name.clone()), context)
            }
            None => (
                upgrade_kind(def.kind, None, def.in_impl_block),
                def.receiver.clone(),
                None,
            ),
        };

        definitions.push(SymbolDefinition {
            name: def.name.clone(),
            kind,
            line: def.line,
            column: def.column,
            signature: def.signature.clone(),
            parent,
            parent_name,
            nesting_context,
            documentation: None,
            content: line_at(parsed.source(), def.line),
        });
    }

    // Pass 2: references and imports.
    let defined_positions: HashSet<(String, u32, u32)> = definitions
        .iter()
        .map(|d| (d.name.clone(), d.line, d.column))
        .collect();

    let mut seen_refs: HashSet<(String, u32, u32)> = HashSet::new();
    for capture in &captures {
        let Some(kind) = capture.name.strip_prefix("name.reference.") else {
            continue;
        };
        let name = parsed.node_text(&capture.node).to_string();
        if name.is_empty() {
            continue;
        }
        let position = capture.node.start_position();
        let line = position.row as u32 + 1;
        let column = position.column as u32;

        if defined_positions.contains(&(name.clone(), line, column)) {
            continue;
        }
        if !seen_refs.insert((name.clone(), line, column)) {
            continue;
        }

        let namespace = derive_namespace(parsed, &capture.node);
        let parent = enclosing_container_name(&pending, &Span::of(&capture.node));

        result.references.push(SymbolReference {
            name,
            kind: kind.to_string(),
            line,
            column,
            namespace,
            parent,
        });
    }

    result.imports = collect_imports(parsed, &captures);
    result.relations = collect_relations(parsed, &captures, &pending);

    // Pass 3: attach the nearest doc comment within 3 lines above.
    for definition in definitions.iter_mut() {
        if definition.documentation.is_some() {
            continue;
        }
        let best = doc_comments
            .iter()
            .filter(|doc| doc.start_line < definition.line)
            .filter(|doc| definition.line - doc.start_line <= 3)
            .max_by_key(|doc| doc.start_line);
        if let Some(doc) = best {
            definition.documentation = Some(doc.text.clone());
        }
    }

    result.definitions = definitions;
    result.doc_comments = doc_comments;
    result
}

fn collect_definitions(parsed: &ParsedFile, captures: &[Capture<'_>]) -> Vec<PendingDefinition> {
    let mut pending: Vec<PendingDefinition> = Vec::new();
    let mut seen: HashSet<(String, u32, u32)> = HashSet::new();

    for capture in captures {
        let Some(kind_str) = capture.name.strip_prefix("definition.") else {
            continue;
        };
        let Some(kind) = SymbolType::parse(kind_str) else {
            continue;
        };
        let def_span = Span::of(&capture.node);

        // The sibling name capture shares the kind suffix and sits inside the
        // definition node.
        let name_capture_name = format!("name.definition.{kind_str}");
        let Some(name_capture) = captures.iter().find(|c| {
            c.name == name_capture_name && def_span.contains(&Span::of(&c.node))
        }) else {
            continue;
        };

        let name = parsed.node_text(&name_capture.node).to_string();
        if name.is_empty() {
            continue;
        }
        let position = name_capture.node.start_position();
        let line = position.row as u32 + 1;
        let column = position.column as u32;
        if !seen.insert((name.clone(), line, column)) {
            continue;
        }

        let signature = parsed
            .node_text(&capture.node)
            .lines()
            .next()
            .map(|first| first.trim().trim_end_matches('{').trim().to_string())
            .filter(|s| !s.is_empty());

        pending.push(PendingDefinition {
            name,
            kind,
            line,
            column,
            signature,
            span: def_span,
            in_impl_block: has_impl_ancestor(&capture.node),
            receiver: receiver_type(parsed, &capture.node),
        });
    }

    pending
}

/// Receiver type name of a method declaration (`func (u *User) GetName()` →
/// `User`), when the definition node has a receiver field.
fn receiver_type(parsed: &ParsedFile, node: &tree_sitter::Node<'_>) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut stack = vec![receiver];
    while let Some(current) = stack.pop() {
        if current.kind() == "type_identifier" {
            return Some(parsed.node_text(&current).to_string());
        }
        let mut cursor = current.walk();
        let children: Vec<_> = current.children(&mut cursor).collect();
        stack.extend(children);
    }
    None
}

/// Innermost strictly-containing definition that can act as a container.
fn innermost_container(
    pending: &[PendingDefinition],
    spans: &[Span],
    index: usize,
) -> Option<usize> {
    let target = spans[index];
    let mut best: Option<usize> = None;
    for (candidate, span) in spans.iter().enumerate() {
        if candidate == index || !span.strictly_contains(&target) {
            continue;
        }
        if !is_container_kind(pending[candidate].kind) {
            continue;
        }
        match best {
            Some(current) if spans[current].contains(span) => best = Some(candidate),
            Some(_) => {}
            None => best = Some(candidate),
        }
    }
    best
}

fn enclosing_container_name(pending: &[PendingDefinition], span: &Span) -> Option<String> {
    let mut best: Option<&PendingDefinition> = None;
    for def in pending {
        if !def.span.strictly_contains(span) || !is_container_kind(def.kind) {
            continue;
        }
        match best {
            Some(current) if current.span.contains(&def.span) => best = Some(def),
            Some(_) => {}
            None => best = Some(def),
        }
    }
    best.map(|d| d.name.clone())
}

fn is_container_kind(kind: SymbolType) -> bool {
    kind.is_class_like() || matches!(kind, SymbolType::Namespace | SymbolType::Module)
}

/// Qualified container path, outermost first, joined by the language's
/// nesting separator.
fn nesting_context_for(
    pending: &[PendingDefinition],
    spans: &[Span],
    index: usize,
    language: crate::parsing::Language,
) -> Option<String> {
    let target = spans[index];
    let mut containers: Vec<&PendingDefinition> = pending
        .iter()
        .enumerate()
        .filter(|(i, def)| {
            *i != index && def.span.strictly_contains(&target) && is_container_kind(def.kind)
        })
        .map(|(_, def)| def)
        .collect();
    if containers.is_empty() {
        return None;
    }
    containers.sort_by_key(|def| def.span.start);
    let names: Vec<&str> = containers.iter().map(|d| d.name.as_str()).collect();
    Some(names.join(nesting_separator(language)))
}

/// Kind adjustments once the enclosing container is known.
fn upgrade_kind(
    kind: SymbolType,
    parent: Option<SymbolType>,
    in_impl_block: bool,
) -> SymbolType {
    use SymbolType::*;
    match (kind, parent) {
        (Function, _) if in_impl_block => Method,
        (Function, Some(Namespace)) | (Function, Some(Module)) => NamespacedFunction,
        (Function, Some(p)) if p.is_class_like() => Method,
        (Method, Some(Interface)) => InterfaceMethod,
        (Method, Some(NestedClass)) | (Method, Some(NestedStruct)) => NestedMethod,
        (Class, Some(Namespace)) | (Class, Some(Module)) => NamespacedClass,
        (Class, Some(p)) if p.is_class_like() => NestedClass,
        (Struct, Some(p)) if p.is_class_like() => NestedStruct,
        (Enum, Some(p)) if p.is_class_like() => NestedEnum,
        _ => kind,
    }
}

fn has_impl_ancestor(node: &tree_sitter::Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.kind() == "impl_item" {
            return true;
        }
        current = ancestor.parent();
    }
    false
}

fn collect_doc_comments(parsed: &ParsedFile, captures: &[Capture<'_>]) -> Vec<DocComment> {
    let mut raw: Vec<(u32, u32, String)> = Vec::new();
    for capture in captures {
        if !capture.name.starts_with("doc.") {
            continue;
        }
        let start = capture.node.start_position().row as u32 + 1;
        let end = capture.node.end_position().row as u32 + 1;
        let text = parsed.node_text(&capture.node).to_string();
        raw.push((start, end, text));
    }
    raw.sort_by_key(|(start, _, _)| *start);
    raw.dedup_by_key(|(start, _, _)| *start);

    // Merge runs of adjacent single-line comments into one block.
    let mut merged: Vec<DocComment> = Vec::new();
    for (start, end, text) in raw {
        if let Some(last) = merged.last_mut() {
            if start == last.end_line + 1 && end == start {
                last.end_line = end;
                last.text.push('\n');
                last.text.push_str(&text);
                continue;
            }
        }
        merged.push(DocComment {
            start_line: start,
            end_line: end,
            text,
        });
    }

    for doc in merged.iter_mut() {
        doc.text = format_doc_comment(&doc.text);
    }
    merged.retain(|doc| !doc.text.is_empty());
    merged
}

/// Strip comment delimiters and trim.
pub fn format_doc_comment(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        let mut text = line.trim();
        text = text
            .trim_start_matches("/**")
            .trim_start_matches("/*")
            .trim_end_matches("*/");
        text = text.trim_start();
        if let Some(rest) = text.strip_prefix("///") {
            text = rest;
        } else if let Some(rest) = text.strip_prefix("//!") {
            text = rest;
        } else if let Some(rest) = text.strip_prefix("//") {
            text = rest;
        } else if let Some(rest) = text.strip_prefix('*') {
            text = rest;
        } else if let Some(rest) = text.strip_prefix('#') {
            text = rest;
        }
        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }
    lines.join("\n")
}

fn collect_imports(parsed: &ParsedFile, captures: &[Capture<'_>]) -> Vec<ImportStatement> {
    // Statement spans first, then assign member captures by containment.
    let mut statements: Vec<(Span, ImportStatement)> = Vec::new();
    let mut seen_spans: HashSet<(usize, usize)> = HashSet::new();

    for capture in captures {
        if capture.name != "import" {
            continue;
        }
        let span = Span::of(&capture.node);
        if !seen_spans.insert((span.start, span.end)) {
            continue;
        }
        statements.push((
            span,
            ImportStatement {
                source: None,
                path: None,
                names: Vec::new(),
                line: capture.node.start_position().row as u32 + 1,
            },
        ));
    }

    for capture in captures {
        let span = Span::of(&capture.node);
        let Some((_, statement)) = statements
            .iter_mut()
            .find(|(stmt_span, _)| stmt_span.contains(&span))
        else {
            continue;
        };
        match capture.name {
            "import.source" => {
                let text = parsed.node_text(&capture.node);
                statement.source = Some(strip_quotes(text).to_string());
            }
            "import.path" => {
                statement.path = Some(parsed.node_text(&capture.node).trim().to_string());
            }
            "import.name" => {
                let name = parsed.node_text(&capture.node).to_string();
                if !name.is_empty() && !statement.names.contains(&name) {
                    statement.names.push(name);
                }
            }
            _ => {}
        }
    }

    statements
        .into_iter()
        .map(|(_, statement)| statement)
        .filter(|s| s.source.is_some() || s.path.is_some() || !s.names.is_empty())
        .collect()
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// Extends/implements edges: each relationship clause names targets, the
/// source is the innermost enclosing container definition.
fn collect_relations(
    parsed: &ParsedFile,
    captures: &[Capture<'_>],
    pending: &[PendingDefinition],
) -> Vec<DetectedRelation> {
    let mut relations: Vec<DetectedRelation> = Vec::new();

    for capture in captures {
        let relation_type = match capture.name {
            "inheritance" => RelationType::Extends,
            "implementation" => RelationType::Implements,
            _ => continue,
        };
        let clause_span = Span::of(&capture.node);

        let source = pending
            .iter()
            .enumerate()
            .filter(|(_, def)| def.span.contains(&clause_span) && is_container_kind(def.kind))
            .min_by_key(|(_, def)| def.span.end - def.span.start)
            .map(|(index, _)| index);
        let Some(source) = source else { continue };

        for name_capture in captures {
            if !name_capture.name.starts_with("name.reference.") {
                continue;
            }
            let name_span = Span::of(&name_capture.node);
            if !clause_span.contains(&name_span) {
                continue;
            }
            let target_name = parsed.node_text(&name_capture.node).to_string();
            if target_name.is_empty() || target_name == pending[source].name {
                continue;
            }
            let exists = relations.iter().any(|r| {
                r.source == source && r.target_name == target_name && r.relation_type == relation_type
            });
            if !exists {
                relations.push(DetectedRelation {
                    source,
                    target_name,
                    relation_type,
                });
            }
        }
    }

    relations
}

/// The full source line (1-based), trimmed of trailing whitespace.
fn line_at(source: &str, line: u32) -> String {
    source
        .lines()
        .nth(line.saturating_sub(1) as usize)
        .unwrap_or("")
        .trim_end()
        .to_string()
}
