// Ruby capture query.

pub const QUERY: &str = r#"
(comment) @doc.comment

(class
  name: (constant) @name.definition.class) @definition.class

(module
  name: (constant) @name.definition.module) @definition.module

(method
  name: (identifier) @name.definition.method) @definition.method

(singleton_method
  name: (identifier) @name.definition.method) @definition.method

(assignment
  left: (identifier) @name.definition.variable) @definition.variable

(call
  method: (identifier) @name.reference.call) @reference.call

(superclass
  (constant) @name.reference.class) @inheritance
"#;
