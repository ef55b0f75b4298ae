// Go capture query.
//
// Methods carry the `struct.method` kind (receiver-bound), interface method
// specs carry `interface.method`, and a field declaration without a name is an
// embedded field.

pub const QUERY: &str = r#"
(comment) @doc.comment

(package_clause
  (package_identifier) @name.definition.namespace) @definition.namespace

(function_declaration
  name: (identifier) @name.definition.function) @definition.function

(method_declaration
  name: (field_identifier) @name.definition.struct.method) @definition.struct.method

(type_declaration
  (type_spec
    name: (type_identifier) @name.definition.struct
    type: (struct_type))) @definition.struct

(type_declaration
  (type_spec
    name: (type_identifier) @name.definition.interface
    type: (interface_type))) @definition.interface

(method_elem
  name: (field_identifier) @name.definition.interface.method) @definition.interface.method

(field_declaration
  name: (field_identifier) @name.definition.field) @definition.field

(field_declaration
  !name
  type: (type_identifier) @name.definition.embedded.field) @definition.embedded.field

(const_declaration
  (const_spec
    name: (identifier) @name.definition.constant)) @definition.constant

(var_declaration
  (var_spec
    name: (identifier) @name.definition.variable)) @definition.variable

(call_expression
  function: (identifier) @name.reference.call) @reference.call

(call_expression
  function: (selector_expression
    field: (field_identifier) @name.reference.call)) @reference.call

(composite_literal
  type: (type_identifier) @name.reference.class) @reference.class

(import_spec
  path: (interpreted_string_literal) @import.source) @import
"#;
