// Reference Resolver
//
// Given a symbol at a position, find its references across files under
// language-specific scoping rules. The origin file is re-parsed to recover
// what the position names; matching then runs over the origin file and,
// optionally, the files it imports (transitively, up to `max_depth`).
//
// Matching rules:
// - names are compared case-sensitively (after `.method` suffix stripping)
// - enclosing parent must match when both sides have one
// - namespaces must match exactly when both present; `Utils.Format` does not
//   match `Utils`
// - Go relaxations: interface methods match structurally, embedded fields may
//   be reached through the outer struct
// - nested symbols require the reference's qualified path to share the
//   symbol's nesting context

pub mod cache;
pub mod imports;

use crate::database::SymbolType;
use crate::error::{IndexError, Result};
use crate::extractors::{self, ExtractionResult, SymbolReference};
use crate::parsing::{self, Language};
use crate::utils::paths;
use cache::{DEFAULT_TTL, TtlLruCache};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// A reference site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// Options for reference resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub include_imports: bool,
    pub max_depth: usize,
    pub include_self: bool,
    pub max_results: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_imports: true,
            max_depth: 1,
            include_self: false,
            max_results: 100,
        }
    }
}

impl ResolveOptions {
    fn cache_hash(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.include_imports, self.max_depth, self.include_self, self.max_results
        )
    }
}

/// What a position in a file names, recovered by re-parsing.
#[derive(Debug, Clone, Default)]
pub struct SymbolInfo {
    pub name: String,
    pub parent: Option<String>,
    pub namespace: Option<String>,
    pub parent_context: Option<String>,
    pub is_nested: bool,
    pub kind: Option<SymbolType>,
}

/// Parsed products for one file, cached for an hour.
pub struct FileSymbols {
    pub language: Language,
    pub extraction: ExtractionResult,
}

const RESULTS_CACHE_CAPACITY: usize = 200;
const FILE_CACHE_CAPACITY: usize = 50;
/// At most this many imported files are opened concurrently.
const IMPORT_CONCURRENCY: usize = 5;

pub struct ReferenceResolver {
    workspace_root: PathBuf,
    results_cache: Mutex<TtlLruCache<String, Vec<Location>>>,
    file_cache: Mutex<TtlLruCache<String, Arc<FileSymbols>>>,
}

impl ReferenceResolver {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            results_cache: Mutex::new(TtlLruCache::new(RESULTS_CACHE_CAPACITY, DEFAULT_TTL)),
            file_cache: Mutex::new(TtlLruCache::new(FILE_CACHE_CAPACITY, DEFAULT_TTL)),
        }
    }

    /// Find references to the symbol at `(line, column)` in `file`.
    pub async fn find_references(
        &self,
        symbol_name: &str,
        file: &str,
        line: u32,
        column: u32,
        options: &ResolveOptions,
    ) -> Result<Vec<Location>> {
        if symbol_name.trim().is_empty() {
            return Err(IndexError::invalid_argument("empty symbol name"));
        }
        if line == 0 {
            return Err(IndexError::invalid_argument("line numbers are 1-based"));
        }

        let cache_key = format!(
            "{file}:{line}:{column}:{symbol_name}:{}",
            options.cache_hash()
        );
        if let Some(hit) = self
            .results_cache
            .lock()
            .expect("results cache poisoned")
            .get(&cache_key)
        {
            return Ok(hit);
        }

        let origin_relative = self.relative_key(Path::new(file));
        let origin_absolute = self.absolute_path(file);
        let origin = self.load_file_symbols(&origin_absolute, &origin_relative);
        let info = match &origin {
            Some(origin) => probe_symbol_info(&origin.extraction, symbol_name, line, column),
            None => SymbolInfo {
                name: symbol_name.to_string(),
                ..SymbolInfo::default()
            },
        };

        let mut results: Vec<Location> = Vec::new();
        if let Some(origin) = &origin {
            collect_matches(&info, origin, &origin_relative, &mut results);
        }

        // Follow this file's direct imports breadth-first.
        if options.include_imports && options.max_depth > 0 {
            let mut visited: HashSet<PathBuf> = HashSet::from([origin_absolute.clone()]);
            let mut frontier: Vec<PathBuf> = vec![origin_absolute];

            for _ in 0..options.max_depth {
                let mut next_frontier: Vec<PathBuf> = Vec::new();
                for source in &frontier {
                    for import in imports::direct_imports(source, &self.workspace_root) {
                        if visited.insert(import.clone()) {
                            next_frontier.push(import);
                        }
                    }
                }
                if next_frontier.is_empty() {
                    break;
                }

                for chunk in next_frontier.chunks(IMPORT_CONCURRENCY) {
                    let loads = chunk.iter().map(|path| async {
                        let relative = self.relative_key(path);
                        (relative.clone(), self.load_file_symbols(path, &relative))
                    });
                    for (relative, loaded) in futures::future::join_all(loads).await {
                        if let Some(loaded) = loaded {
                            collect_matches(&info, &loaded, &relative, &mut results);
                        }
                    }
                }

                frontier = next_frontier;
            }
        }

        if !options.include_self {
            results.retain(|location| {
                !(location.file == origin_relative
                    && location.line == line
                    && location.column == column)
            });
        }

        results.truncate(options.max_results);

        self.results_cache
            .lock()
            .expect("results cache poisoned")
            .insert(cache_key, results.clone());
        Ok(results)
    }

    /// Re-parse a file and recover what the position names (probe only).
    pub fn symbol_info_at(
        &self,
        file: &str,
        symbol_name: &str,
        line: u32,
        column: u32,
    ) -> SymbolInfo {
        let relative = self.relative_key(Path::new(file));
        let absolute = self.absolute_path(file);
        match self.load_file_symbols(&absolute, &relative) {
            Some(symbols) => probe_symbol_info(&symbols.extraction, symbol_name, line, column),
            None => SymbolInfo {
                name: symbol_name.to_string(),
                ..SymbolInfo::default()
            },
        }
    }

    /// Drop expired cache entries on demand.
    pub fn clean_expired(&self) {
        self.results_cache
            .lock()
            .expect("results cache poisoned")
            .clean_expired();
        self.file_cache
            .lock()
            .expect("file cache poisoned")
            .clean_expired();
    }

    fn absolute_path(&self, file: &str) -> PathBuf {
        let candidate = Path::new(file);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.workspace_root.join(candidate)
        }
    }

    fn relative_key(&self, path: &Path) -> String {
        paths::to_relative_posix(path, &self.workspace_root)
    }

    fn load_file_symbols(&self, absolute: &Path, relative: &str) -> Option<Arc<FileSymbols>> {
        if let Some(hit) = self
            .file_cache
            .lock()
            .expect("file cache poisoned")
            .get(&relative.to_string())
        {
            return Some(hit);
        }

        let language = Language::from_path(absolute);
        let source = match std::fs::read_to_string(absolute) {
            Ok(source) => source,
            Err(e) => {
                debug!("Cannot read {} for resolution: {}", absolute.display(), e);
                return None;
            }
        };

        let extraction = match parsing::parse_source(language, &source) {
            Ok(parsed) => extractors::extract(&parsed),
            Err(e) => {
                warn!("Cannot parse {}: {}", absolute.display(), e);
                return None;
            }
        };

        let symbols = Arc::new(FileSymbols {
            language,
            extraction,
        });
        self.file_cache
            .lock()
            .expect("file cache poisoned")
            .insert(relative.to_string(), symbols.clone());
        Some(symbols)
    }
}

/// Probe a file's parse products for the position: definitions first,
/// references second, bare name last.
fn probe_symbol_info(
    extraction: &ExtractionResult,
    symbol_name: &str,
    line: u32,
    column: u32,
) -> SymbolInfo {
    let at_position = |item_line: u32, item_column: u32, name: &str| {
        item_line == line && item_column <= column && column < item_column + name.len() as u32
    };

    let definition = extraction
        .definitions
        .iter()
        .filter(|d| d.name == symbol_name)
        .find(|d| at_position(d.line, d.column, &d.name))
        .or_else(|| {
            extraction
                .definitions
                .iter()
                .find(|d| d.name == symbol_name && d.line == line)
        });
    if let Some(definition) = definition {
        return SymbolInfo {
            name: definition.name.clone(),
            parent: definition.parent_name.clone(),
            namespace: None,
            parent_context: definition.nesting_context.clone(),
            is_nested: definition.nesting_context.is_some()
                || definition.kind.as_str().contains('.'),
            kind: Some(definition.kind),
        };
    }

    let reference = extraction
        .references
        .iter()
        .filter(|r| r.name == symbol_name)
        .find(|r| at_position(r.line, r.column, &r.name))
        .or_else(|| {
            extraction
                .references
                .iter()
                .find(|r| r.name == symbol_name && r.line == line)
        });
    if let Some(reference) = reference {
        return SymbolInfo {
            name: reference.name.clone(),
            parent: reference.parent.clone(),
            namespace: reference.namespace.clone(),
            parent_context: None,
            is_nested: false,
            kind: None,
        };
    }

    SymbolInfo {
        name: symbol_name.to_string(),
        ..SymbolInfo::default()
    }
}

fn collect_matches(
    info: &SymbolInfo,
    symbols: &FileSymbols,
    relative: &str,
    results: &mut Vec<Location>,
) {
    for reference in &symbols.extraction.references {
        if reference_matches(info, reference, symbols.language) {
            let location = Location {
                file: relative.to_string(),
                line: reference.line,
                column: reference.column,
            };
            if !results.contains(&location) {
                results.push(location);
            }
        }
    }
}

fn strip_method_suffix(name: &str) -> &str {
    name.strip_suffix(".method").unwrap_or(name)
}

/// Receiver spellings that refer to the enclosing instance rather than a
/// namespace.
fn is_self_receiver(namespace: &str) -> bool {
    matches!(namespace, "this" | "self" | "Self" | "$this" | "@")
}

/// Whether Go's structural rules relax the parent requirement for this
/// symbol: interface methods are satisfied by any struct, embedded fields are
/// reachable through the outer struct.
fn go_relaxation(info: &SymbolInfo, language: Language) -> bool {
    language == Language::Go
        && matches!(
            info.kind,
            Some(SymbolType::InterfaceMethod) | Some(SymbolType::EmbeddedField)
        )
}

/// Apply the matching rules of one candidate reference against the probed
/// symbol.
pub fn reference_matches(
    info: &SymbolInfo,
    reference: &SymbolReference,
    language: Language,
) -> bool {
    if strip_method_suffix(&info.name) != strip_method_suffix(&reference.name) {
        return false;
    }

    // Enclosing parent, when both sides know one.
    if let (Some(symbol_parent), Some(reference_parent)) = (&info.parent, &reference.parent) {
        if symbol_parent != reference_parent && !go_relaxation(info, language) {
            // A method call through a receiver names its parent via the
            // namespace instead; defer to the receiver check below.
            if reference.namespace.is_none() {
                return false;
            }
        }
    }

    // Namespace, when both sides know one: exact equality, no sub-namespace
    // relaxation.
    if let (Some(symbol_ns), Some(reference_ns)) = (&info.namespace, &reference.namespace) {
        if symbol_ns != reference_ns {
            return false;
        }
    }

    // Receiver check: a member reference (`user.GetName()`) must name the
    // symbol's parent, compared on the last path segment, case-insensitively
    // (Go receivers are conventionally lowercase).
    if info.namespace.is_none() {
        if let (Some(symbol_parent), Some(reference_ns)) = (&info.parent, &reference.namespace) {
            if !is_self_receiver(reference_ns) {
                let receiver = reference_ns
                    .rsplit(['.', ':', '\\'])
                    .next()
                    .unwrap_or(reference_ns);
                let parent_matches = receiver.eq_ignore_ascii_case(symbol_parent);
                if !parent_matches && !go_relaxation(info, language) {
                    return false;
                }
            } else if let Some(reference_parent) = &reference.parent {
                // `this.method()` must still sit inside the same class.
                if reference_parent != symbol_parent && !go_relaxation(info, language) {
                    return false;
                }
            }
        }
    }

    // Nested symbols additionally require a shared nesting-context prefix.
    if info.is_nested {
        if let Some(context) = &info.parent_context {
            if let Some(reference_ns) = &reference.namespace {
                let shares_prefix = reference_ns == context
                    || context.ends_with(reference_ns.as_str())
                    || reference_ns.ends_with(context.as_str());
                if !shares_prefix && !is_self_receiver(reference_ns) {
                    return false;
                }
            }
        }
    }

    true
}
