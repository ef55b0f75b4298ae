// Namespace and nesting context derivation.

use crate::parsing::{Language, ParsedFile};

/// Node kinds that form member-access / qualification chains across the
/// supported grammars.
const CHAIN_KINDS: &[&str] = &[
    "member_expression",        // TS/JS a.b
    "attribute",                // Python a.b
    "selector_expression",      // Go a.b
    "field_expression",         // Rust/C++ a.b
    "member_access_expression", // C# a.b
    "navigation_expression",    // Swift/Kotlin a.b
    "scoped_identifier",        // Rust/Java a::b / a.b
    "qualified_name",           // C#/PHP A.B / A\B
    "qualified_identifier",     // C++ a::b
    "scope_resolution",         // Ruby A::B
    "member_call_expression",   // PHP $a->b()
];

/// Separator used to join nested container names for a language.
pub fn nesting_separator(language: Language) -> &'static str {
    match language {
        Language::Ruby => "::",
        Language::Php => "\\",
        Language::Rust | Language::Cpp | Language::C => "::",
        _ => ".",
    }
}

/// Derive the namespace of a reference from its surrounding member-access
/// chain: for `a.b.c` the namespace of `c` is `a.b`. Returns None for bare
/// names.
pub fn derive_namespace(parsed: &ParsedFile, node: &tree_sitter::Node<'_>) -> Option<String> {
    // Climb to the topmost chain node so `a.b.c` yields `a.b`, not `b`.
    let mut chain = *node;
    let mut climbed = false;
    while let Some(parent) = chain.parent() {
        if CHAIN_KINDS.contains(&parent.kind()) {
            chain = parent;
            climbed = true;
        } else {
            break;
        }
    }
    if !climbed {
        return None;
    }

    let chain_text = parsed.node_text(&chain);
    let name = parsed.node_text(node);
    let prefix = chain_text.strip_suffix(name)?;
    let prefix = prefix
        .trim_end_matches("->")
        .trim_end_matches("::")
        .trim_end_matches('\\')
        .trim_end_matches('.')
        .trim();
    if prefix.is_empty() {
        return None;
    }
    Some(prefix.to_string())
}
