// Query parsing: tokenization, intent detection, shape hints, quoted exact
// symbols, and synonym expansion.

use crate::database::SymbolType;
use crate::error::{IndexError, Result};
use std::collections::BTreeSet;

/// What the user is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    Search,
    Implementation,
}

/// Coarse result-type buckets used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResultCategory {
    Function,
    Class,
    Interface,
    Variable,
}

impl ResultCategory {
    /// Bucket a concrete symbol type.
    pub fn of(symbol_type: SymbolType) -> Self {
        if symbol_type.is_function_like() {
            Self::Function
        } else if matches!(symbol_type, SymbolType::Interface | SymbolType::Trait) {
            Self::Interface
        } else if symbol_type.is_variable_like() {
            Self::Variable
        } else {
            Self::Class
        }
    }
}

const STOP_WORDS: &[&str] = &["the", "and", "for", "this", "that"];

/// Small static synonym table; expansion adds terms, never replaces them.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("auth", &["authentication", "login", "signin"]),
    ("authentication", &["auth", "login"]),
    ("db", &["database"]),
    ("config", &["configuration", "settings"]),
    ("init", &["initialize", "setup"]),
    ("util", &["utility", "helper"]),
];

/// A parsed search query.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub original: String,
    /// Normalized search terms, synonyms included.
    pub terms: Vec<String>,
    /// Quoted tokens: exact symbol-name candidates.
    pub exact_symbols: Vec<String>,
    pub intent: QueryIntent,
    /// Result categories forced by shape hints or intent.
    pub forced_types: Option<BTreeSet<ResultCategory>>,
}

/// Normalize free-form context text into extra search terms (no intent or
/// shape detection, no error on empty input).
pub fn context_terms(raw: &str) -> Vec<String> {
    raw.split_whitespace()
        .map(|token| {
            token
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|t| t.len() > 2 && !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Parse a free-form query. Empty or whitespace-only input is an error.
pub fn parse_query(raw: &str) -> Result<ParsedQuery> {
    if raw.trim().is_empty() {
        return Err(IndexError::invalid_argument("empty query"));
    }

    // Quoted tokens become exact symbol candidates.
    let mut exact_symbols: Vec<String> = Vec::new();
    let mut rest = raw;
    let mut unquoted = String::new();
    while let Some(open) = rest.find('"') {
        unquoted.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('"') {
            Some(close) => {
                let quoted = &after[..close];
                if !quoted.trim().is_empty() {
                    exact_symbols.push(quoted.trim().to_string());
                }
                rest = &after[close + 1..];
            }
            None => {
                rest = after;
                break;
            }
        }
    }
    unquoted.push_str(rest);

    let raw_tokens: Vec<String> = unquoted
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();

    let mut intent = QueryIntent::Search;
    let mut forced: BTreeSet<ResultCategory> = BTreeSet::new();
    for token in &raw_tokens {
        match token.as_str() {
            "find" | "search" | "where" | "how" | "what" => intent = QueryIntent::Search,
            t if t.starts_with("implement") || t.starts_with("extends") || t.starts_with("inherit") => {
                intent = QueryIntent::Implementation;
                forced.insert(ResultCategory::Class);
            }
            "function" | "method" | "procedure" => {
                forced.insert(ResultCategory::Function);
            }
            "class" | "interface" | "type" | "struct" => {
                forced.insert(ResultCategory::Class);
                forced.insert(ResultCategory::Interface);
            }
            "variable" | "var" | "const" | "let" | "field" | "property" => {
                forced.insert(ResultCategory::Variable);
            }
            _ => {}
        }
    }

    let mut terms: Vec<String> = Vec::new();
    let push_term = |term: String, terms: &mut Vec<String>| {
        if term.len() > 2 && !STOP_WORDS.contains(&term.as_str()) && !terms.contains(&term) {
            terms.push(term);
        }
    };
    for token in &raw_tokens {
        let cleaned: String = token
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        push_term(cleaned.clone(), &mut terms);
        for (word, synonyms) in SYNONYMS {
            if cleaned == *word {
                for synonym in *synonyms {
                    push_term(synonym.to_string(), &mut terms);
                }
            }
        }
    }
    for exact in &exact_symbols {
        push_term(exact.to_lowercase(), &mut terms);
    }

    if terms.is_empty() && exact_symbols.is_empty() {
        return Err(IndexError::invalid_argument(
            "query contains no searchable terms",
        ));
    }

    Ok(ParsedQuery {
        original: raw.to_string(),
        terms,
        exact_symbols,
        intent,
        forced_types: if forced.is_empty() { None } else { Some(forced) },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queries_are_rejected() {
        assert!(parse_query("").is_err());
        assert!(parse_query("   ").is_err());
    }

    #[test]
    fn stop_words_and_short_tokens_drop() {
        let parsed = parse_query("find the user for this session").unwrap();
        assert!(parsed.terms.contains(&"user".to_string()));
        assert!(parsed.terms.contains(&"session".to_string()));
        assert!(!parsed.terms.contains(&"the".to_string()));
        assert!(!parsed.terms.contains(&"for".to_string()));
    }

    #[test]
    fn implementation_intent_forces_class() {
        let parsed = parse_query("implementations of Repository").unwrap();
        assert_eq!(parsed.intent, QueryIntent::Implementation);
        assert!(
            parsed
                .forced_types
                .as_ref()
                .unwrap()
                .contains(&ResultCategory::Class)
        );
    }

    #[test]
    fn shape_hints_force_categories() {
        let parsed = parse_query("user class").unwrap();
        let forced = parsed.forced_types.unwrap();
        assert!(forced.contains(&ResultCategory::Class));
        assert!(forced.contains(&ResultCategory::Interface));

        let parsed = parse_query("login function").unwrap();
        assert!(
            parsed
                .forced_types
                .unwrap()
                .contains(&ResultCategory::Function)
        );
    }

    #[test]
    fn quoted_tokens_become_exact_candidates() {
        let parsed = parse_query("\"getUserData\"").unwrap();
        assert_eq!(parsed.exact_symbols, vec!["getUserData".to_string()]);
        assert!(parsed.terms.contains(&"getuserdata".to_string()));
    }

    #[test]
    fn synonyms_expand() {
        let parsed = parse_query("auth handler").unwrap();
        assert!(parsed.terms.contains(&"auth".to_string()));
        assert!(parsed.terms.contains(&"authentication".to_string()));
        assert!(parsed.terms.contains(&"login".to_string()));
    }

    #[test]
    fn categories_bucket_symbol_types() {
        assert_eq!(
            ResultCategory::of(SymbolType::StructMethod),
            ResultCategory::Function
        );
        assert_eq!(ResultCategory::of(SymbolType::Trait), ResultCategory::Interface);
        assert_eq!(
            ResultCategory::of(SymbolType::EmbeddedField),
            ResultCategory::Variable
        );
        assert_eq!(
            ResultCategory::of(SymbolType::NamespacedClass),
            ResultCategory::Class
        );
    }
}
