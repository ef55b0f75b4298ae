// Per-language capture queries.
//
// Each language supplies one capture-annotated pattern consumed opaquely by
// the parser layer. The capture vocabulary is shared across languages:
//
//   definition.<kind>            the definition node
//   name.definition.<kind>       the identifier naming it
//   reference.<kind>             a non-defining occurrence
//   name.reference[.<subkind>]   the referenced identifier
//   import / import.source / import.path / import.name
//   doc.comment                  documentation comment text
//   inheritance / implementation relationship clauses
//
// Kind suffixes may be dotted (`struct.method`, `embedded.field`,
// `interface.method`) where the grammar distinguishes the nested form
// directly; otherwise the extractor derives nested kinds from context.

mod c;
mod cpp;
mod csharp;
mod go;
mod java;
mod javascript;
mod kotlin;
mod php;
mod python;
mod ruby;
mod rust;
mod swift;
mod typescript;

use crate::parsing::Language;

/// The query string for a language, or None for plaintext.
pub fn query_source(language: Language) -> Option<&'static str> {
    match language {
        Language::TypeScript | Language::Tsx => Some(typescript::QUERY),
        Language::JavaScript => Some(javascript::QUERY),
        Language::Python => Some(python::QUERY),
        Language::Java => Some(java::QUERY),
        Language::CSharp => Some(csharp::QUERY),
        Language::Php => Some(php::QUERY),
        Language::Go => Some(go::QUERY),
        Language::Ruby => Some(ruby::QUERY),
        Language::C => Some(c::QUERY),
        Language::Cpp => Some(cpp::QUERY),
        Language::Rust => Some(rust::QUERY),
        Language::Swift => Some(swift::QUERY),
        Language::Kotlin => Some(kotlin::QUERY),
        Language::Plaintext => None,
    }
}
