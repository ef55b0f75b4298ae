// Symbol extractor tests across the main languages: definition lifting,
// parent wiring, kind upgrades, doc association, references, imports, and
// relation detection.

#[cfg(test)]
mod typescript_extraction {
    use crate::database::SymbolType;
    use crate::extractors::extract;
    use crate::parsing::{Language, parse_source};

    const SOURCE: &str = r#"
/**
 * Application user.
 */
export class User {
  name: string;

  getName(): string {
    return this.name;
  }
}

export interface Repository {
  findById(id: string): User;
}

import { Role } from './models/role';

export function loadUser(id: string): User {
  const repo = new User();
  return repo;
}
"#;

    #[test]
    fn lifts_classes_methods_and_interfaces() {
        let parsed = parse_source(Language::TypeScript, SOURCE).unwrap();
        let result = extract(&parsed);

        let user = result
            .definitions
            .iter()
            .find(|d| d.name == "User")
            .expect("User definition");
        assert_eq!(user.kind, SymbolType::Class);
        assert!(user.content.contains("class User"));

        let get_name = result
            .definitions
            .iter()
            .find(|d| d.name == "getName")
            .expect("getName definition");
        assert_eq!(get_name.kind, SymbolType::Method);
        assert_eq!(get_name.parent_name.as_deref(), Some("User"));

        let repository = result
            .definitions
            .iter()
            .find(|d| d.name == "Repository")
            .expect("Repository definition");
        assert_eq!(repository.kind, SymbolType::Interface);

        let load_user = result
            .definitions
            .iter()
            .find(|d| d.name == "loadUser")
            .expect("loadUser definition");
        assert_eq!(load_user.kind, SymbolType::Function);
        assert!(load_user.parent.is_none());
    }

    #[test]
    fn positions_are_one_based_lines_and_zero_based_columns() {
        let parsed = parse_source(Language::TypeScript, "class A {}\n").unwrap();
        let result = extract(&parsed);
        let a = &result.definitions[0];
        assert_eq!(a.line, 1);
        assert_eq!(a.column, 6);
    }

    #[test]
    fn docs_attach_to_the_following_definition() {
        let parsed = parse_source(Language::TypeScript, SOURCE).unwrap();
        let result = extract(&parsed);
        let user = result
            .definitions
            .iter()
            .find(|d| d.name == "User")
            .unwrap();
        assert_eq!(user.documentation.as_deref(), Some("Application user."));

        // getName is more than 3 lines below the class doc.
        let get_name = result
            .definitions
            .iter()
            .find(|d| d.name == "getName")
            .unwrap();
        assert!(get_name.documentation.is_none());
    }

    #[test]
    fn imports_carry_source_and_names() {
        let parsed = parse_source(Language::TypeScript, SOURCE).unwrap();
        let result = extract(&parsed);
        let import = result
            .imports
            .iter()
            .find(|i| i.source.as_deref() == Some("./models/role"))
            .expect("role import");
        assert_eq!(import.names, vec!["Role".to_string()]);
    }

    #[test]
    fn references_skip_definition_sites() {
        let parsed = parse_source(Language::TypeScript, SOURCE).unwrap();
        let result = extract(&parsed);
        // `new User()` produces a class reference that is not the definition.
        let user_refs: Vec<_> = result
            .references
            .iter()
            .filter(|r| r.name == "User" && r.kind == "class")
            .collect();
        assert!(!user_refs.is_empty());
        for reference in &user_refs {
            let collides = result
                .definitions
                .iter()
                .any(|d| d.name == "User" && d.line == reference.line && d.column == reference.column);
            assert!(!collides);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let parsed_a = parse_source(Language::TypeScript, SOURCE).unwrap();
        let parsed_b = parse_source(Language::TypeScript, SOURCE).unwrap();
        let a = extract(&parsed_a);
        let b = extract(&parsed_b);
        let names_a: Vec<_> = a.definitions.iter().map(|d| (&d.name, d.line)).collect();
        let names_b: Vec<_> = b.definitions.iter().map(|d| (&d.name, d.line)).collect();
        assert_eq!(names_a, names_b);
        assert_eq!(a.references.len(), b.references.len());
    }
}

#[cfg(test)]
mod go_extraction {
    use crate::database::SymbolType;
    use crate::extractors::extract;
    use crate::parsing::{Language, parse_source};

    const SOURCE: &str = r#"
package main

type Reader interface {
	Read(p []byte) (int, error)
}

type Base struct{}

type User struct {
	Name string
	Base
}

func (u *User) GetName() string {
	return u.Name
}
"#;

    #[test]
    fn package_becomes_namespace() {
        let parsed = parse_source(Language::Go, SOURCE).unwrap();
        let result = extract(&parsed);
        let package = result
            .definitions
            .iter()
            .find(|d| d.name == "main")
            .expect("package symbol");
        assert_eq!(package.kind, SymbolType::Namespace);
    }

    #[test]
    fn interface_methods_carry_their_interface() {
        let parsed = parse_source(Language::Go, SOURCE).unwrap();
        let result = extract(&parsed);
        let read = result
            .definitions
            .iter()
            .find(|d| d.name == "Read")
            .expect("Read method spec");
        assert_eq!(read.kind, SymbolType::InterfaceMethod);
        assert_eq!(read.parent_name.as_deref(), Some("Reader"));
    }

    #[test]
    fn embedded_fields_name_their_type() {
        let parsed = parse_source(Language::Go, SOURCE).unwrap();
        let result = extract(&parsed);
        let embedded = result
            .definitions
            .iter()
            .find(|d| d.kind == SymbolType::EmbeddedField)
            .expect("embedded field");
        assert_eq!(embedded.name, "Base");
        assert_eq!(embedded.parent_name.as_deref(), Some("User"));

        // The named field is a plain field.
        let name_field = result
            .definitions
            .iter()
            .find(|d| d.name == "Name" && d.kind == SymbolType::Field)
            .expect("named field");
        assert_eq!(name_field.parent_name.as_deref(), Some("User"));
    }

    #[test]
    fn receiver_supplies_the_method_parent() {
        let parsed = parse_source(Language::Go, SOURCE).unwrap();
        let result = extract(&parsed);
        let get_name = result
            .definitions
            .iter()
            .find(|d| d.name == "GetName")
            .expect("GetName method");
        assert_eq!(get_name.kind, SymbolType::StructMethod);
        assert_eq!(get_name.parent_name.as_deref(), Some("User"));

        // parent index points at the User struct definition.
        let parent_index = get_name.parent.expect("parent index");
        assert_eq!(result.definitions[parent_index].name, "User");
    }

    #[test]
    fn selector_calls_carry_receiver_namespace() {
        let source = r#"
package main

func run() {
	user := User{}
	user.GetName()
}
"#;
        let parsed = parse_source(Language::Go, source).unwrap();
        let result = extract(&parsed);
        let call = result
            .references
            .iter()
            .find(|r| r.name == "GetName")
            .expect("GetName call reference");
        assert_eq!(call.namespace.as_deref(), Some("user"));
    }
}

#[cfg(test)]
mod python_extraction {
    use crate::database::SymbolType;
    use crate::extractors::extract;
    use crate::parsing::{Language, parse_source};

    #[test]
    fn class_functions_become_methods() {
        let source = r#"
class UserService:
    def get_user(self, user_id):
        return self.users[user_id]

def helper():
    pass
"#;
        let parsed = parse_source(Language::Python, source).unwrap();
        let result = extract(&parsed);

        let get_user = result
            .definitions
            .iter()
            .find(|d| d.name == "get_user")
            .expect("get_user");
        assert_eq!(get_user.kind, SymbolType::Method);
        assert_eq!(get_user.parent_name.as_deref(), Some("UserService"));

        let helper = result
            .definitions
            .iter()
            .find(|d| d.name == "helper")
            .expect("helper");
        assert_eq!(helper.kind, SymbolType::Function);
    }

    #[test]
    fn hash_docs_strip_their_delimiters() {
        let source = "# Fetches one user.\ndef fetch_user(user_id):\n    pass\n";
        let parsed = parse_source(Language::Python, source).unwrap();
        let result = extract(&parsed);
        let fetch = result
            .definitions
            .iter()
            .find(|d| d.name == "fetch_user")
            .unwrap();
        assert_eq!(fetch.documentation.as_deref(), Some("Fetches one user."));
    }
}

#[cfg(test)]
mod relations_extraction {
    use crate::database::types::RelationType;
    use crate::extractors::extract;
    use crate::parsing::{Language, parse_source};

    #[test]
    fn extends_and_implements_edges_are_detected() {
        let source = r#"
interface Repository {
  findAll(): string[];
}

class Base {
}

class UserRepository extends Base implements Repository {
  findAll(): string[] { return []; }
}
"#;
        let parsed = parse_source(Language::TypeScript, source).unwrap();
        let result = extract(&parsed);

        let user_repo_index = result
            .definitions
            .iter()
            .position(|d| d.name == "UserRepository")
            .expect("UserRepository");

        let extends = result
            .relations
            .iter()
            .find(|r| r.relation_type == RelationType::Extends)
            .expect("extends edge");
        assert_eq!(extends.source, user_repo_index);
        assert_eq!(extends.target_name, "Base");

        let implements = result
            .relations
            .iter()
            .find(|r| r.relation_type == RelationType::Implements)
            .expect("implements edge");
        assert_eq!(implements.source, user_repo_index);
        assert_eq!(implements.target_name, "Repository");
    }
}

#[cfg(test)]
mod nested_extraction {
    use crate::database::SymbolType;
    use crate::extractors::extract;
    use crate::parsing::{Language, parse_source};

    #[test]
    fn namespaced_types_get_their_context() {
        let source = r#"
namespace Models {
  export class User {
    getName(): string { return ""; }
  }
}
"#;
        let parsed = parse_source(Language::TypeScript, source).unwrap();
        let result = extract(&parsed);

        let user = result
            .definitions
            .iter()
            .find(|d| d.name == "User")
            .expect("User");
        assert_eq!(user.kind, SymbolType::NamespacedClass);
        assert_eq!(user.parent_name.as_deref(), Some("Models"));
        assert_eq!(user.nesting_context.as_deref(), Some("Models"));

        let get_name = result
            .definitions
            .iter()
            .find(|d| d.name == "getName")
            .expect("getName");
        assert_eq!(get_name.nesting_context.as_deref(), Some("Models.User"));
    }
}
