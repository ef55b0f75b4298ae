// Per-file ingestion
//
// One task: read the source, extract symbols, and replace the file's rows in a
// single coordinated transaction. On any failure the transaction rolls back —
// a file is never half-applied.

use crate::database::{
    DetectedRelation, KeywordPosting, NewSymbol, TransactionCoordinator,
};
use crate::error::{IndexError, Result};
use crate::extractors::{self, SymbolDefinition};
use crate::parsing::{self, Language};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Words carrying no search signal: language keywords and common noise.
const NOISE_WORDS: &[&str] = &[
    "abstract", "async", "await", "begin", "bool", "boolean", "break", "case", "catch", "char",
    "class", "const", "continue", "def", "default", "delete", "double", "else", "elsif", "end",
    "enum", "export", "extends", "false", "final", "float", "func", "function", "implements",
    "import", "int", "interface", "internal", "let", "long", "module", "namespace", "new", "nil",
    "none", "null", "override", "package", "private", "protected", "public", "readonly", "require",
    "return", "self", "short", "static", "string", "struct", "super", "switch", "this", "throw",
    "trait", "true", "type", "using", "var", "virtual", "void", "while",
];

/// Normalize a symbol's name and content line into keyword tokens with
/// relevance scores. Name tokens score 1.0, content tokens 0.5; duplicates
/// keep the higher score.
pub fn generate_keywords(definition: &SymbolDefinition) -> Vec<(String, f64)> {
    let mut scores: HashMap<String, f64> = HashMap::new();

    // The whole name (lowercased) anchors exact-symbol queries; its split
    // parts serve multi-word queries.
    let whole = definition.name.to_lowercase();
    if whole.len() > 2 {
        scores.insert(whole, 1.0);
    }
    for token in tokenize(&definition.name) {
        scores
            .entry(token)
            .and_modify(|s| *s = s.max(1.0))
            .or_insert(1.0);
    }
    for token in tokenize(&definition.content) {
        scores
            .entry(token)
            .and_modify(|s| *s = s.max(0.5))
            .or_insert(0.5);
    }

    let mut keywords: Vec<(String, f64)> = scores.into_iter().collect();
    keywords.sort_by(|a, b| a.0.cmp(&b.0));
    keywords
}

/// Lowercase, strip code punctuation, split on whitespace and identifier
/// boundaries (camelCase, snake_case), keep tokens longer than 2 characters,
/// drop noise words.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw in split_identifiers(text) {
        let token = raw.to_lowercase();
        if token.len() <= 2 {
            continue;
        }
        if NOISE_WORDS.contains(&token.as_str()) {
            continue;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        tokens.push(token);
    }
    tokens
}

/// Split text into identifier-ish words, breaking camelCase humps.
fn split_identifiers(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, words: &mut Vec<String>| {
        if !current.is_empty() {
            words.push(std::mem::take(current));
        }
    };

    let mut previous_lower = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if c.is_uppercase() && previous_lower {
                flush(&mut current, &mut words);
            }
            previous_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        } else {
            previous_lower = false;
            flush(&mut current, &mut words);
        }
    }
    flush(&mut current, &mut words);
    words
}

/// Scheduler priority for a file: 100 when the host is viewing it, 50 under a
/// priority directory, 10 otherwise.
pub fn task_priority(relative: &str, include_dirs: &[String], viewed: bool) -> u8 {
    if viewed {
        return 100;
    }
    let priority_dir = include_dirs
        .iter()
        .any(|dir| relative.starts_with(&format!("{dir}/")));
    if priority_dir { 50 } else { 10 }
}

pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A relation whose target symbol was not in the store at ingestion time,
/// typically because the defining file comes later in the same run. The
/// pipeline retries these once all files are in.
#[derive(Debug, Clone)]
pub struct UnresolvedRelation {
    pub source_id: i64,
    pub target_name: String,
    pub relation_type: crate::database::RelationType,
}

/// Ingest one file end to end: read, extract, and replace its rows inside one
/// coordinated transaction. Returns relations whose targets could not be
/// resolved yet.
pub async fn ingest_file(
    coordinator: &TransactionCoordinator,
    workspace_root: &Path,
    relative: &str,
) -> Result<Vec<UnresolvedRelation>> {
    let absolute = workspace_root.join(relative);
    if !absolute.exists() {
        return Err(IndexError::NotFound { path: absolute });
    }

    let source = std::fs::read_to_string(&absolute).map_err(|source| IndexError::IoFailure {
        path: absolute.clone(),
        source,
    })?;
    let metadata = std::fs::metadata(&absolute).map_err(|source| IndexError::IoFailure {
        path: absolute.clone(),
        source,
    })?;
    let last_modified = super::scanner::mtime_ms(&metadata);
    let language = Language::from_path(&absolute);

    // Unknown extensions keep a file row (language `plaintext`) but carry no
    // symbols.
    let extraction = if language == Language::Plaintext {
        extractors::ExtractionResult::default()
    } else {
        let parsed = parsing::parse_source(language, &source)?;
        extractors::extract(&parsed)
    };

    let symbols: Vec<NewSymbol> = extraction
        .definitions
        .iter()
        .map(|def| NewSymbol {
            name: def.name.clone(),
            symbol_type: def.kind,
            signature: def.signature.clone(),
            line: def.line,
            column: def.column,
            parent: def.parent,
            content: def.content.clone(),
        })
        .collect();
    let keywords: Vec<Vec<(String, f64)>> = extraction
        .definitions
        .iter()
        .map(generate_keywords)
        .collect();
    let relations: Vec<DetectedRelation> = extraction.relations.clone();

    let path = relative.to_string();
    let language_name = language.name().to_string();
    let indexed_at = now_ms();

    coordinator
        .execute_in_transaction(move |store| {
            let file_id = store.upsert_file(
                &path,
                &language_name,
                last_modified,
                indexed_at,
                &last_modified.to_string(),
            )?;
            store.delete_file_dependents(file_id)?;
            let ids = store.insert_symbols(file_id, &symbols)?;

            let mut postings: Vec<KeywordPosting> = Vec::new();
            for (index, symbol_keywords) in keywords.iter().enumerate() {
                for (keyword, relevance) in symbol_keywords {
                    postings.push(KeywordPosting {
                        keyword: keyword.clone(),
                        symbol_id: ids[index],
                        relevance: *relevance,
                    });
                }
            }
            store.insert_keywords(&postings)?;

            let mut unresolved: Vec<UnresolvedRelation> = Vec::new();
            for relation in &relations {
                let Some(&source_id) = ids.get(relation.source) else {
                    continue;
                };
                match store.find_relation_target(&relation.target_name) {
                    Some(target_id) => {
                        store.insert_relation(source_id, target_id, relation.relation_type)?;
                    }
                    None => unresolved.push(UnresolvedRelation {
                        source_id,
                        target_name: relation.target_name.clone(),
                        relation_type: relation.relation_type,
                    }),
                }
            }

            debug!("Ingested {} ({} symbols)", path, ids.len());
            Ok(unresolved)
        })
        .await
}
