// Kotlin capture query.

pub const QUERY: &str = r#"
(line_comment) @doc.comment
(multiline_comment) @doc.comment

(package_header
  (identifier) @name.definition.namespace) @definition.namespace

(class_declaration
  name: (type_identifier) @name.definition.class) @definition.class

(object_declaration
  name: (type_identifier) @name.definition.class) @definition.class

(function_declaration
  name: (simple_identifier) @name.definition.function) @definition.function

(property_declaration
  (variable_declaration
    (simple_identifier) @name.definition.property)) @definition.property

(call_expression
  (simple_identifier) @name.reference.call) @reference.call

(import_header
  (identifier) @import.path) @import
"#;
