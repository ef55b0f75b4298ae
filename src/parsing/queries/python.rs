// Python capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(function_definition
  name: (identifier) @name.definition.function) @definition.function

(class_definition
  name: (identifier) @name.definition.class) @definition.class

(assignment
  left: (identifier) @name.definition.variable) @definition.variable

(call
  function: (identifier) @name.reference.call) @reference.call

(call
  function: (attribute
    attribute: (identifier) @name.reference.call)) @reference.call

(class_definition
  superclasses: (argument_list
    (identifier) @name.reference.class)) @inheritance

(import_statement
  name: (dotted_name) @import.name) @import

(import_from_statement
  module_name: (dotted_name) @import.source) @import

(import_from_statement
  name: (dotted_name) @import.name)
"#;
