// TypeScript / TSX capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(function_declaration
  name: (identifier) @name.definition.function) @definition.function

(generator_function_declaration
  name: (identifier) @name.definition.function) @definition.function

(method_definition
  name: (property_identifier) @name.definition.method) @definition.method

(class_declaration
  name: (type_identifier) @name.definition.class) @definition.class

(abstract_class_declaration
  name: (type_identifier) @name.definition.class) @definition.class

(interface_declaration
  name: (type_identifier) @name.definition.interface) @definition.interface

(enum_declaration
  name: (identifier) @name.definition.enum) @definition.enum

(type_alias_declaration
  name: (type_identifier) @name.definition.type) @definition.type

(internal_module
  name: (identifier) @name.definition.namespace) @definition.namespace

(variable_declarator
  name: (identifier) @name.definition.variable) @definition.variable

(public_field_definition
  name: (property_identifier) @name.definition.property) @definition.property

(call_expression
  function: (identifier) @name.reference.call) @reference.call

(call_expression
  function: (member_expression
    property: (property_identifier) @name.reference.call)) @reference.call

(new_expression
  constructor: (identifier) @name.reference.class) @reference.class

(class_heritage
  (extends_clause
    value: (identifier) @name.reference.class)) @inheritance

(class_heritage
  (implements_clause
    (type_identifier) @name.reference.interface)) @implementation

(type_annotation
  (type_identifier) @name.reference.type) @reference.type

(import_statement
  source: (string) @import.source) @import

(import_specifier
  name: (identifier) @import.name)
"#;
