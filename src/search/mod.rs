// Query Engine
//
// Parses a free-form query, joins keywords × symbols × files in the store,
// and ranks results by a weighted combination of keyword score, exact-name
// bonus, and path-class prior (core source > general > tests).

pub mod query;

use crate::database::{SymbolStore, SymbolType};
use crate::error::{IndexError, Result};
use crate::indexer::scanner::has_test_segment;
use crate::utils::path_relevance::PathRelevanceScorer;
use query::{ParsedQuery, QueryIntent, ResultCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Secondary ordering applied after relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Path,
    Modified,
}

/// Search options accepted by the query engine.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub max_results: Option<usize>,
    pub language: Option<String>,
    /// Free-form context text whose tokens join the search terms.
    pub context: Option<String>,
    pub include_tests: bool,
    pub exclude_patterns: Vec<String>,
    pub result_types: Option<Vec<ResultCategory>>,
    pub sort_by: SortBy,
    /// Path prefix restricting where results may come from.
    pub scope: Option<String>,
    pub target_directories: Vec<String>,
}

/// One ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
    /// The source line containing the definition.
    pub context: String,
    /// Final rank in [0, 1].
    pub relevance: f64,
    #[serde(rename = "type")]
    pub symbol_type: String,
    pub symbol: Option<String>,
    pub signature: Option<String>,
    pub language: Option<String>,
}

const DEFAULT_MAX_RESULTS: usize = 50;

/// Rank weights: keyword score, exact-name bonus, path prior.
const WEIGHT_KEYWORDS: f64 = 0.5;
const WEIGHT_EXACT: f64 = 0.3;
const WEIGHT_PATH: f64 = 0.2;

struct KeywordHit {
    symbol_id: i64,
    relevance: f64,
    name: String,
    symbol_type: SymbolType,
    signature: Option<String>,
    line: u32,
    column: u32,
    file: String,
    language: String,
    last_modified: i64,
    content: Option<String>,
}

struct Aggregate {
    hit: KeywordHit,
    keyword_score: f64,
    matched_terms: usize,
}

pub struct QueryEngine {
    store: Arc<Mutex<SymbolStore>>,
}

impl QueryEngine {
    pub fn new(store: Arc<Mutex<SymbolStore>>) -> Self {
        Self { store }
    }

    /// Execute a search. Empty or whitespace-only queries fail with
    /// `InvalidArgument`.
    pub fn search(&self, raw_query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let mut parsed = query::parse_query(raw_query)?;
        if let Some(context) = &options.context {
            for term in query::context_terms(context) {
                if !parsed.terms.contains(&term) {
                    parsed.terms.push(term);
                }
            }
        }
        let hits = self.fetch_keyword_hits(&parsed.terms)?;
        debug!(
            "Query '{}' matched {} keyword rows across {} terms",
            raw_query,
            hits.len(),
            parsed.terms.len()
        );

        // Aggregate per symbol: sum keyword relevance, count distinct terms.
        let mut per_symbol: HashMap<i64, Aggregate> = HashMap::new();
        for hit in hits {
            let symbol_id = hit.symbol_id;
            let relevance = hit.relevance.max(0.0);
            let entry = per_symbol.entry(symbol_id).or_insert_with(|| Aggregate {
                keyword_score: 0.0,
                matched_terms: 0,
                hit,
            });
            entry.keyword_score += relevance;
            entry.matched_terms += 1;
        }

        let mut aggregates: Vec<Aggregate> = per_symbol.into_values().collect();
        self.apply_filters(&mut aggregates, &parsed, options);

        let max_keyword_score = aggregates
            .iter()
            .map(|a| {
                let overlap = a.matched_terms as f64 / parsed.terms.len().max(1) as f64;
                a.keyword_score * overlap
            })
            .fold(0.0_f64, f64::max)
            .max(f64::EPSILON);

        let scorer = PathRelevanceScorer::new(raw_query);
        let mut results: Vec<(SearchResult, i64)> = aggregates
            .into_iter()
            .map(|aggregate| {
                let overlap =
                    aggregate.matched_terms as f64 / parsed.terms.len().max(1) as f64;
                let keyword_score = (aggregate.keyword_score * overlap) / max_keyword_score;

                let exact_bonus = if parsed.exact_symbols.iter().any(|e| *e == aggregate.hit.name)
                {
                    1.0
                } else if parsed
                    .terms
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(&aggregate.hit.name))
                {
                    0.5
                } else {
                    0.0
                };

                let path_prior = f64::from(scorer.calculate_score(&aggregate.hit.file));

                let relevance = (WEIGHT_KEYWORDS * keyword_score
                    + WEIGHT_EXACT * exact_bonus
                    + WEIGHT_PATH * path_prior)
                    .clamp(0.0, 1.0);

                let last_modified = aggregate.hit.last_modified;
                (
                    SearchResult {
                        file: aggregate.hit.file,
                        line: aggregate.hit.line,
                        column: Some(aggregate.hit.column),
                        context: aggregate.hit.content.unwrap_or_default(),
                        relevance,
                        symbol_type: aggregate.hit.symbol_type.as_str().to_string(),
                        symbol: Some(aggregate.hit.name),
                        signature: aggregate.hit.signature,
                        language: Some(aggregate.hit.language),
                    },
                    last_modified,
                )
            })
            .collect();

        // Primary order is relevance; ties break per sort_by.
        results.sort_by(|(a, a_modified), (b, b_modified)| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| match options.sort_by {
                    SortBy::Relevance | SortBy::Path => a.file.cmp(&b.file),
                    SortBy::Modified => b_modified.cmp(a_modified),
                })
                .then_with(|| a.line.cmp(&b.line))
        });

        let max_results = options.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        results.truncate(max_results);
        Ok(results.into_iter().map(|(result, _)| result).collect())
    }

    /// Find class-like symbols whose `implements`/`extends` edges point at the
    /// named interface.
    pub fn find_implementations(&self, interface_name: &str) -> Result<Vec<SearchResult>> {
        if interface_name.trim().is_empty() {
            return Err(IndexError::invalid_argument("empty interface name"));
        }

        let store = self.store.lock().expect("store mutex poisoned");
        let ids = store.find_implementor_ids(interface_name)?;

        let mut results = Vec::new();
        for id in ids {
            let Some(symbol) = store.get_symbol_by_id(id) else {
                continue;
            };
            let Some(file) = store.get_file_by_id(symbol.file_id) else {
                continue;
            };
            let context = store.get_symbol_content(symbol.id).unwrap_or_default();
            results.push(SearchResult {
                file: file.path,
                line: symbol.line,
                column: Some(symbol.column),
                context,
                relevance: 1.0,
                symbol_type: symbol.symbol_type.as_str().to_string(),
                symbol: Some(symbol.name),
                signature: symbol.signature,
                language: Some(file.language),
            });
        }
        results.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.line.cmp(&b.line)));
        Ok(results)
    }

    fn fetch_keyword_hits(&self, terms: &[String]) -> Result<Vec<KeywordHit>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = std::iter::repeat("?")
            .take(terms.len())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT k.symbol_id, k.relevance,
                    s.name, s.type, s.signature, s.line, s.\"column\",
                    f.path, f.language, f.last_modified, c.content
             FROM keywords k
             JOIN symbols s ON s.id = k.symbol_id
             JOIN files f ON f.id = s.file_id
             LEFT JOIN symbol_contents c ON c.symbol_id = s.id
             WHERE k.keyword IN ({placeholders})"
        );

        let store = self.store.lock().expect("store mutex poisoned");
        store.all(
            &sql,
            rusqlite::params_from_iter(terms.iter()),
            |row| {
                let type_str: String = row.get(3)?;
                Ok(KeywordHit {
                    symbol_id: row.get(0)?,
                    relevance: row.get(1)?,
                    name: row.get(2)?,
                    symbol_type: SymbolType::parse(&type_str).unwrap_or(SymbolType::Variable),
                    signature: row.get(4)?,
                    line: row.get::<_, i64>(5)? as u32,
                    column: row.get::<_, i64>(6)? as u32,
                    file: row.get(7)?,
                    language: row.get(8)?,
                    last_modified: row.get(9)?,
                    content: row.get(10)?,
                })
            },
        )
    }

    fn apply_filters(
        &self,
        aggregates: &mut Vec<Aggregate>,
        parsed: &ParsedQuery,
        options: &SearchOptions,
    ) {
        // Forced categories from the query, narrowed further by options.
        let forced = parsed.forced_types.clone();
        let requested: Option<Vec<ResultCategory>> = options.result_types.clone();

        aggregates.retain(|aggregate| {
            let category = ResultCategory::of(aggregate.hit.symbol_type);

            if let Some(forced) = &forced {
                if !forced.contains(&category) {
                    return false;
                }
            }
            if let Some(requested) = &requested {
                if !requested.contains(&category) {
                    return false;
                }
            }
            if parsed.intent == QueryIntent::Implementation
                && !matches!(category, ResultCategory::Class | ResultCategory::Interface)
            {
                return false;
            }

            if let Some(language) = &options.language {
                if !aggregate.hit.language.eq_ignore_ascii_case(language) {
                    return false;
                }
            }

            if !options.include_tests && has_test_segment(&aggregate.hit.file) {
                return false;
            }

            if let Some(scope) = &options.scope {
                if !aggregate.hit.file.starts_with(scope.trim_end_matches('/')) {
                    return false;
                }
            }

            if !options.target_directories.is_empty()
                && !options
                    .target_directories
                    .iter()
                    .any(|dir| aggregate.hit.file.starts_with(dir.trim_end_matches('/')))
            {
                return false;
            }

            if options
                .exclude_patterns
                .iter()
                .any(|pattern| aggregate.hit.file.contains(pattern.as_str()))
            {
                return false;
            }

            true
        });
    }
}
