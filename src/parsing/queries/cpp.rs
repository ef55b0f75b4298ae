// C++ capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(function_definition
  declarator: (function_declarator
    declarator: (identifier) @name.definition.function)) @definition.function

(function_definition
  declarator: (function_declarator
    declarator: (field_identifier) @name.definition.method)) @definition.method

(function_definition
  declarator: (function_declarator
    declarator: (qualified_identifier
      name: (identifier) @name.definition.method))) @definition.method

(class_specifier
  name: (type_identifier) @name.definition.class
  body: (field_declaration_list)) @definition.class

(struct_specifier
  name: (type_identifier) @name.definition.struct
  body: (field_declaration_list)) @definition.struct

(enum_specifier
  name: (type_identifier) @name.definition.enum
  body: (enumerator_list)) @definition.enum

(namespace_definition
  name: (namespace_identifier) @name.definition.namespace) @definition.namespace

(type_definition
  declarator: (type_identifier) @name.definition.type) @definition.type

(field_declaration
  declarator: (field_identifier) @name.definition.field) @definition.field

(call_expression
  function: (identifier) @name.reference.call) @reference.call

(call_expression
  function: (field_expression
    field: (field_identifier) @name.reference.call)) @reference.call

(base_class_clause
  (type_identifier) @name.reference.class) @inheritance

(preproc_include
  path: (string_literal) @import.source) @import
"#;
