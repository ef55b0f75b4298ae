// C# capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(namespace_declaration
  name: [
    (identifier) @name.definition.namespace
    (qualified_name) @name.definition.namespace
  ]) @definition.namespace

(class_declaration
  name: (identifier) @name.definition.class) @definition.class

(interface_declaration
  name: (identifier) @name.definition.interface) @definition.interface

(struct_declaration
  name: (identifier) @name.definition.struct) @definition.struct

(enum_declaration
  name: (identifier) @name.definition.enum) @definition.enum

(method_declaration
  name: (identifier) @name.definition.method) @definition.method

(constructor_declaration
  name: (identifier) @name.definition.constructor) @definition.constructor

(property_declaration
  name: (identifier) @name.definition.property) @definition.property

(field_declaration
  (variable_declaration
    (variable_declarator
      (identifier) @name.definition.field))) @definition.field

(invocation_expression
  function: (identifier) @name.reference.call) @reference.call

(invocation_expression
  function: (member_access_expression
    name: (identifier) @name.reference.call)) @reference.call

(object_creation_expression
  type: (identifier) @name.reference.class) @reference.class

(base_list
  (identifier) @name.reference.class) @inheritance

(using_directive
  [
    (identifier) @import.path
    (qualified_name) @import.path
  ]) @import
"#;
