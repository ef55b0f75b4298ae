// PHP capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(namespace_definition
  name: (namespace_name) @name.definition.namespace) @definition.namespace

(class_declaration
  name: (name) @name.definition.class) @definition.class

(interface_declaration
  name: (name) @name.definition.interface) @definition.interface

(trait_declaration
  name: (name) @name.definition.trait) @definition.trait

(function_definition
  name: (name) @name.definition.function) @definition.function

(method_declaration
  name: (name) @name.definition.method) @definition.method

(const_declaration
  (const_element
    (name) @name.definition.constant)) @definition.constant

(function_call_expression
  function: (name) @name.reference.call) @reference.call

(member_call_expression
  name: (name) @name.reference.call) @reference.call

(object_creation_expression
  (name) @name.reference.class) @reference.class

(base_clause
  (name) @name.reference.class) @inheritance

(class_interface_clause
  (name) @name.reference.interface) @implementation

(namespace_use_clause
  (qualified_name) @import.path) @import
"#;
