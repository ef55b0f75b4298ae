// Rust capture query.

pub const QUERY: &str = r#"
(line_comment) @doc.comment
(block_comment) @doc.comment

(function_item
  name: (identifier) @name.definition.function) @definition.function

(struct_item
  name: (type_identifier) @name.definition.struct) @definition.struct

(enum_item
  name: (type_identifier) @name.definition.enum) @definition.enum

(trait_item
  name: (type_identifier) @name.definition.trait) @definition.trait

(mod_item
  name: (identifier) @name.definition.module) @definition.module

(const_item
  name: (identifier) @name.definition.constant) @definition.constant

(static_item
  name: (identifier) @name.definition.constant) @definition.constant

(type_item
  name: (type_identifier) @name.definition.type) @definition.type

(macro_definition
  name: (identifier) @name.definition.macro) @definition.macro

(field_declaration
  name: (field_identifier) @name.definition.field) @definition.field

(let_declaration
  pattern: (identifier) @name.definition.variable) @definition.variable

(call_expression
  function: (identifier) @name.reference.call) @reference.call

(call_expression
  function: (field_expression
    field: (field_identifier) @name.reference.call)) @reference.call

(call_expression
  function: (scoped_identifier
    name: (identifier) @name.reference.call)) @reference.call

(use_declaration
  argument: [
    (identifier) @import.path
    (scoped_identifier) @import.path
    (scoped_use_list) @import.path
    (use_list) @import.path
    (use_wildcard) @import.path
  ]) @import

(mod_item
  !body
  name: (identifier) @import.name) @import
"#;
