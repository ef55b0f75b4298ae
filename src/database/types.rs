// Row types shared by the store and the pipeline stages.

use serde::{Deserialize, Serialize};

/// A source file tracked by the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    /// POSIX-style path relative to the workspace root. Unique.
    pub path: String,
    pub language: String,
    /// Filesystem mtime observed at ingestion, ms since epoch.
    pub last_modified: i64,
    /// When this file was last ingested, ms since epoch.
    pub indexed_at: i64,
    /// Freshness timestamp stored as a string. Historically a content hash;
    /// the diff compares it numerically against scanned mtimes.
    pub content_hash: String,
}

/// Closed vocabulary of symbol types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolType {
    Function,
    Method,
    Class,
    Interface,
    Struct,
    Enum,
    Variable,
    Constant,
    Property,
    Field,
    Namespace,
    Module,
    Type,
    Trait,
    Macro,
    NestedMethod,
    NestedClass,
    NestedStruct,
    NestedEnum,
    NamespacedClass,
    NamespacedFunction,
    StructMethod,
    InterfaceMethod,
    EmbeddedField,
    Constructor,
}

impl SymbolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Property => "property",
            Self::Field => "field",
            Self::Namespace => "namespace",
            Self::Module => "module",
            Self::Type => "type",
            Self::Trait => "trait",
            Self::Macro => "macro",
            Self::NestedMethod => "nested.method",
            Self::NestedClass => "nested.class",
            Self::NestedStruct => "nested.struct",
            Self::NestedEnum => "nested.enum",
            Self::NamespacedClass => "namespaced.class",
            Self::NamespacedFunction => "namespaced.function",
            Self::StructMethod => "struct.method",
            Self::InterfaceMethod => "interface.method",
            Self::EmbeddedField => "embedded.field",
            Self::Constructor => "constructor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let parsed = match value {
            "function" => Self::Function,
            "method" => Self::Method,
            "class" => Self::Class,
            "interface" => Self::Interface,
            "struct" => Self::Struct,
            "enum" => Self::Enum,
            "variable" => Self::Variable,
            "constant" => Self::Constant,
            "property" => Self::Property,
            "field" => Self::Field,
            "namespace" => Self::Namespace,
            "module" => Self::Module,
            "type" => Self::Type,
            "trait" => Self::Trait,
            "macro" => Self::Macro,
            "nested.method" => Self::NestedMethod,
            "nested.class" => Self::NestedClass,
            "nested.struct" => Self::NestedStruct,
            "nested.enum" => Self::NestedEnum,
            "namespaced.class" => Self::NamespacedClass,
            "namespaced.function" => Self::NamespacedFunction,
            "struct.method" => Self::StructMethod,
            "interface.method" => Self::InterfaceMethod,
            "embedded.field" => Self::EmbeddedField,
            "constructor" => Self::Constructor,
            _ => return None,
        };
        Some(parsed)
    }

    /// Whether this type names a callable.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Method
                | Self::NestedMethod
                | Self::NamespacedFunction
                | Self::StructMethod
                | Self::InterfaceMethod
                | Self::Constructor
        )
    }

    /// Whether this type names a container (class-like) entity.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Interface
                | Self::Struct
                | Self::Enum
                | Self::Trait
                | Self::NestedClass
                | Self::NestedStruct
                | Self::NestedEnum
                | Self::NamespacedClass
        )
    }

    /// Whether this type names data (variable-like) rather than code.
    pub fn is_variable_like(&self) -> bool {
        matches!(
            self,
            Self::Variable | Self::Constant | Self::Property | Self::Field | Self::EmbeddedField
        )
    }
}

impl std::fmt::Display for SymbolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub id: i64,
    pub file_id: i64,
    pub name: String,
    pub symbol_type: SymbolType,
    pub signature: Option<String>,
    /// 1-based line of the definition.
    pub line: u32,
    /// 0-based column of the definition.
    pub column: u32,
    pub parent_id: Option<i64>,
}

/// A symbol ready for insertion. `parent` indexes into the same batch; the
/// store maps it to a rowid once the parent row exists.
#[derive(Debug, Clone)]
pub struct NewSymbol {
    pub name: String,
    pub symbol_type: SymbolType,
    pub signature: Option<String>,
    pub line: u32,
    pub column: u32,
    pub parent: Option<usize>,
    /// The line of source containing the definition, kept 1:1 with the symbol
    /// for query-result context.
    pub content: String,
}

/// Relation edge types between symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    Extends,
    Implements,
    Uses,
    Defines,
    Calls,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Uses => "uses",
            Self::Defines => "defines",
            Self::Calls => "calls",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "extends" => Some(Self::Extends),
            "implements" => Some(Self::Implements),
            "uses" => Some(Self::Uses),
            "defines" => Some(Self::Defines),
            "calls" => Some(Self::Calls),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword posting: one normalized word pointing at one symbol.
#[derive(Debug, Clone)]
pub struct KeywordPosting {
    pub keyword: String,
    pub symbol_id: i64,
    /// Relevance in [0, 1].
    pub relevance: f64,
}

/// A relation detected during extraction. The target is matched to a stored
/// symbol by name at insertion time, since it may live in another file.
#[derive(Debug, Clone)]
pub struct DetectedRelation {
    pub source: usize,
    pub target_name: String,
    pub relation_type: RelationType,
}

/// Aggregate counters for `get_index_stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub files_count: i64,
    pub symbols_count: i64,
    pub keywords_count: i64,
    pub relations_count: i64,
    /// Most recent `indexed_at` across files, ms since epoch.
    pub last_indexed: Option<i64>,
}

/// Result of a mutating SQL statement.
#[derive(Debug, Clone, Copy)]
pub struct RunResult {
    pub last_id: i64,
    pub changes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOL_TYPE_NAMES: &[&str] = &[
        "function",
        "method",
        "class",
        "interface",
        "struct",
        "enum",
        "variable",
        "constant",
        "property",
        "field",
        "namespace",
        "module",
        "type",
        "trait",
        "macro",
        "nested.method",
        "nested.class",
        "nested.struct",
        "nested.enum",
        "namespaced.class",
        "namespaced.function",
        "struct.method",
        "interface.method",
        "embedded.field",
        "constructor",
    ];

    #[test]
    fn symbol_type_round_trips() {
        for name in SYMBOL_TYPE_NAMES {
            let parsed = SymbolType::parse(name).unwrap();
            assert_eq!(parsed.as_str(), *name);
        }
        assert!(SymbolType::parse("gadget").is_none());
    }

    #[test]
    fn relation_type_round_trips() {
        for relation in [
            RelationType::Extends,
            RelationType::Implements,
            RelationType::Uses,
            RelationType::Defines,
            RelationType::Calls,
        ] {
            assert_eq!(RelationType::parse(relation.as_str()), Some(relation));
        }
    }

    #[test]
    fn nested_types_classify_correctly() {
        assert!(SymbolType::StructMethod.is_function_like());
        assert!(SymbolType::NamespacedClass.is_class_like());
        assert!(SymbolType::EmbeddedField.is_variable_like());
        assert!(!SymbolType::Namespace.is_class_like());
    }
}
