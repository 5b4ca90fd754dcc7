//! Records accumulated while discovering a supervision graph.

use serde::{Deserialize, Serialize};

/// A person discovered either as a supervisor or as a thesis author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: String,
    pub name: String,
    #[serde(default)]
    pub is_supervisor: bool,
}

impl Person {
    pub fn supervisor(person_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            name: name.into(),
            is_supervisor: true,
        }
    }

    pub fn student(person_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            name: name.into(),
            is_supervisor: false,
        }
    }
}

/// One thesis record, as seen from the supervisor it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thesis {
    pub thesis_id: String,
    pub title: String,
    pub author_name: String,
    /// Absent when the upstream record carries no usable author identifier.
    pub author_id: Option<String>,
    pub defense_date: String,
    pub supervisor_id: String,
    pub supervisor_name: String,
}

/// Directed supervision relationship, serialized as `[supervisor_id, student_id]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub String, pub String);

impl Edge {
    pub fn new(supervisor_id: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self(supervisor_id.into(), student_id.into())
    }

    pub fn supervisor_id(&self) -> &str {
        &self.0
    }

    pub fn student_id(&self) -> &str {
        &self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_serializes_as_pair() {
        let edge = Edge::new("123", "456");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json, serde_json::json!(["123", "456"]));

        let back: Edge = serde_json::from_value(json).unwrap();
        assert_eq!(back.supervisor_id(), "123");
        assert_eq!(back.student_id(), "456");
    }

    #[test]
    fn test_thesis_without_author_serializes_null() {
        let thesis = Thesis {
            thesis_id: "2020XYZ".into(),
            title: "Sans titre".into(),
            author_name: String::new(),
            author_id: None,
            defense_date: String::new(),
            supervisor_id: "123".into(),
            supervisor_name: "Inconnu".into(),
        };
        let json = serde_json::to_value(&thesis).unwrap();
        assert!(json["author_id"].is_null());
        assert_eq!(json["supervisor_name"], "Inconnu");
    }

    #[test]
    fn test_person_missing_flag_defaults_to_student() {
        let person: Person =
            serde_json::from_str(r#"{"person_id":"1","name":"A B"}"#).unwrap();
        assert!(!person.is_supervisor);
    }
}
