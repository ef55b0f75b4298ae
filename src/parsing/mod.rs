// Grammar Parser Layer
//
// Produces capture streams from source text per language. Each supported
// language pairs a tree-sitter grammar with a capture-annotated query pattern
// (see `queries/`); running the query over a parsed file yields the ordered
// `(capture_name, node)` sequence the symbol extractor consumes.
//
// Grammar loading is lazy and memoized. A grammar that fails to load (or a
// query that fails to compile) disables only its own language; files in that
// language are skipped with a logged warning.

pub mod queries;

use crate::error::{IndexError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, Once, OnceLock};
use streaming_iterator::StreamingIterator;
use tracing::{debug, warn};
use tree_sitter::{Parser, Query, QueryCursor, Tree};

/// Language identity for a source file. Closed set; anything else is
/// `Plaintext` and skipped by the parser layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Python,
    Java,
    CSharp,
    Php,
    Go,
    Ruby,
    C,
    Cpp,
    Rust,
    Swift,
    Kotlin,
    Plaintext,
}

impl Language {
    /// Detect language from a file extension (lowercase, without dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "ts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "py" => Self::Python,
            "java" => Self::Java,
            "cs" => Self::CSharp,
            "php" => Self::Php,
            "go" => Self::Go,
            "rb" => Self::Ruby,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" => Self::Cpp,
            "rs" => Self::Rust,
            "swift" => Self::Swift,
            "kt" | "kts" => Self::Kotlin,
            _ => Self::Plaintext,
        }
    }

    /// Detect language from a file path.
    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| Self::from_extension(&e.to_lowercase()))
            .unwrap_or(Self::Plaintext)
    }

    /// Store-facing language name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Go => "go",
            Self::Ruby => "ruby",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Rust => "rust",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Plaintext => "plaintext",
        }
    }

    /// Parse a store-facing language name back into a variant.
    pub fn from_name(name: &str) -> Self {
        match name {
            "typescript" => Self::TypeScript,
            "javascript" => Self::JavaScript,
            "python" => Self::Python,
            "java" => Self::Java,
            "csharp" => Self::CSharp,
            "php" => Self::Php,
            "go" => Self::Go,
            "ruby" => Self::Ruby,
            "c" => Self::C,
            "cpp" => Self::Cpp,
            "rust" => Self::Rust,
            "swift" => Self::Swift,
            "kotlin" => Self::Kotlin,
            _ => Self::Plaintext,
        }
    }

    fn grammar(&self) -> Option<tree_sitter::Language> {
        let language = match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Self::C => tree_sitter_c::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Swift => tree_sitter_swift::LANGUAGE.into(),
            Self::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
            Self::Plaintext => return None,
        };
        Some(language)
    }
}

/// A grammar plus its compiled capture query.
struct LoadedGrammar {
    grammar: tree_sitter::Language,
    query: Query,
}

static INIT: Once = Once::new();
static GRAMMARS: OnceLock<Mutex<HashMap<Language, Option<std::sync::Arc<LoadedGrammar>>>>> =
    OnceLock::new();

fn grammar_cache() -> &'static Mutex<HashMap<Language, Option<std::sync::Arc<LoadedGrammar>>>> {
    INIT.call_once(|| {
        debug!("Initializing grammar registry");
    });
    GRAMMARS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Load (or fetch the memoized) grammar and query for a language. `None` means
/// the language is permanently unavailable in this process.
fn load_grammar(language: Language) -> Option<std::sync::Arc<LoadedGrammar>> {
    let cache = grammar_cache();
    let mut map = cache.lock().expect("grammar cache poisoned");
    map.entry(language)
        .or_insert_with(|| {
            let grammar = language.grammar()?;
            let source = queries::query_source(language)?;
            match Query::new(&grammar, source) {
                Ok(query) => {
                    debug!("Loaded grammar and query for {}", language.name());
                    Some(std::sync::Arc::new(LoadedGrammar { grammar, query }))
                }
                Err(e) => {
                    warn!(
                        "Failed to compile capture query for {}: {}; language disabled",
                        language.name(),
                        e
                    );
                    None
                }
            }
        })
        .clone()
}

/// A single named capture over the syntax tree.
pub struct Capture<'a> {
    pub name: &'a str,
    pub node: tree_sitter::Node<'a>,
}

/// A parsed file: syntax tree, source, and the language's compiled query.
/// Trees are transient — consume the captures within one extraction and drop.
pub struct ParsedFile {
    language: Language,
    source: String,
    tree: Tree,
    loaded: std::sync::Arc<LoadedGrammar>,
}

impl ParsedFile {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Text of a node, empty on out-of-range (never panics).
    pub fn node_text(&self, node: &tree_sitter::Node<'_>) -> &str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Run the capture query over the whole tree, yielding captures in tree
    /// order.
    pub fn captures(&self) -> Vec<Capture<'_>> {
        let mut cursor = QueryCursor::new();
        let mut results = Vec::new();
        let mut it = cursor.captures(
            &self.loaded.query,
            self.tree.root_node(),
            self.source.as_bytes(),
        );
        while let Some((query_match, index)) = it.next() {
            let capture = query_match.captures[*index];
            let name = self.loaded.query.capture_names()[capture.index as usize];
            results.push(Capture {
                name,
                node: capture.node,
            });
        }
        results
    }
}

/// Parse a source file into a [`ParsedFile`], or `ParserUnavailable` when the
/// language has no working grammar.
pub fn parse_source(language: Language, source: &str) -> Result<ParsedFile> {
    let loaded = load_grammar(language).ok_or_else(|| IndexError::ParserUnavailable {
        language: language.name().to_string(),
    })?;

    let mut parser = Parser::new();
    parser
        .set_language(&loaded.grammar)
        .map_err(|e| {
            warn!("Failed to set parser language for {}: {}", language.name(), e);
            IndexError::ParserUnavailable {
                language: language.name().to_string(),
            }
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| IndexError::ParserUnavailable {
            language: language.name().to_string(),
        })?;

    Ok(ParsedFile {
        language,
        source: source.to_string(),
        tree,
        loaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_map_is_closed() {
        assert_eq!(Language::from_extension("ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("go"), Language::Go);
        assert_eq!(Language::from_extension("kt"), Language::Kotlin);
        assert_eq!(Language::from_extension("md"), Language::Plaintext);
        assert_eq!(Language::from_extension("png"), Language::Plaintext);
    }

    #[test]
    fn plaintext_has_no_parser() {
        let result = parse_source(Language::Plaintext, "hello world");
        assert!(matches!(
            result,
            Err(IndexError::ParserUnavailable { .. })
        ));
    }

    #[test]
    fn typescript_produces_definition_captures() {
        let source = "export class User {\n  getName(): string { return this.name; }\n}\n";
        let parsed = parse_source(Language::TypeScript, source).unwrap();
        let captures = parsed.captures();
        assert!(captures.iter().any(|c| c.name == "definition.class"));
        assert!(
            captures
                .iter()
                .any(|c| c.name == "name.definition.class" && parsed.node_text(&c.node) == "User")
        );
    }

    #[test]
    fn go_produces_struct_method_captures() {
        let source = r#"
package main

type User struct {
	Name string
}

func (u *User) GetName() string {
	return u.Name
}
"#;
        let parsed = parse_source(Language::Go, source).unwrap();
        let captures = parsed.captures();
        assert!(
            captures
                .iter()
                .any(|c| c.name == "name.definition.struct"
                    && parsed.node_text(&c.node) == "User")
        );
        assert!(
            captures
                .iter()
                .any(|c| c.name == "name.definition.struct.method"
                    && parsed.node_text(&c.node) == "GetName")
        );
    }
}
