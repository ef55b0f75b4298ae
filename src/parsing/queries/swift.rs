// Swift capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment
(multiline_comment) @doc.comment

(class_declaration
  name: (type_identifier) @name.definition.class) @definition.class

(protocol_declaration
  name: (type_identifier) @name.definition.interface) @definition.interface

(function_declaration
  name: (simple_identifier) @name.definition.function) @definition.function

(call_expression
  (simple_identifier) @name.reference.call) @reference.call

(import_declaration
  (identifier) @import.path) @import
"#;
