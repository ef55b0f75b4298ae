// Java capture query.

pub const QUERY: &str = r#"
(line_comment) @doc.comment
(block_comment) @doc.comment

(package_declaration
  [
    (identifier) @name.definition.namespace
    (scoped_identifier) @name.definition.namespace
  ]) @definition.namespace

(class_declaration
  name: (identifier) @name.definition.class) @definition.class

(interface_declaration
  name: (identifier) @name.definition.interface) @definition.interface

(enum_declaration
  name: (identifier) @name.definition.enum) @definition.enum

(method_declaration
  name: (identifier) @name.definition.method) @definition.method

(constructor_declaration
  name: (identifier) @name.definition.constructor) @definition.constructor

(field_declaration
  declarator: (variable_declarator
    name: (identifier) @name.definition.field)) @definition.field

(method_invocation
  name: (identifier) @name.reference.call) @reference.call

(object_creation_expression
  type: (type_identifier) @name.reference.class) @reference.class

(superclass
  (type_identifier) @name.reference.class) @inheritance

(super_interfaces
  (type_list
    (type_identifier) @name.reference.interface)) @implementation

(import_declaration
  [
    (identifier) @import.path
    (scoped_identifier) @import.path
  ]) @import
"#;
