// C capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(function_definition
  declarator: (function_declarator
    declarator: (identifier) @name.definition.function)) @definition.function

(struct_specifier
  name: (type_identifier) @name.definition.struct
  body: (field_declaration_list)) @definition.struct

(enum_specifier
  name: (type_identifier) @name.definition.enum
  body: (enumerator_list)) @definition.enum

(type_definition
  declarator: (type_identifier) @name.definition.type) @definition.type

(field_declaration
  declarator: (field_identifier) @name.definition.field) @definition.field

(call_expression
  function: (identifier) @name.reference.call) @reference.call

(preproc_include
  path: (string_literal) @import.source) @import
"#;
