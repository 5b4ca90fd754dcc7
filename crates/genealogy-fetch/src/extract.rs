//! Thesis extraction from raw search pages.
//!
//! Every field lookup falls back to an empty string or a placeholder, so a
//! malformed record still yields a `Thesis`.

use serde_json::Value;

use genealogy_core::Thesis;

use crate::fetcher::RawPage;

/// Name used when the supervisor is not among the first record's directors.
pub const UNKNOWN_NAME: &str = "Inconnu";
/// Title used when neither the main nor the English title is present.
pub const UNTITLED: &str = "Sans titre";

/// The theses directed by one supervisor, with the supervisor's resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisedTheses {
    pub supervisor_name: String,
    pub theses: Vec<Thesis>,
}

/// Normalize a page of records fetched for `supervisor_id`.
pub fn extract_theses(page: &RawPage, supervisor_id: &str) -> SupervisedTheses {
    let records = page.records();
    let supervisor_name = resolve_supervisor_name(records, supervisor_id);

    let theses = records
        .iter()
        .map(|record| {
            let (author_name, author_id) = first_author(record);
            Thesis {
                thesis_id: scalar_field(record, "id"),
                title: title_of(record),
                author_name,
                author_id,
                defense_date: scalar_field(record, "dateSoutenance"),
                supervisor_id: supervisor_id.to_string(),
                supervisor_name: supervisor_name.clone(),
            }
        })
        .collect();

    SupervisedTheses {
        supervisor_name,
        theses,
    }
}

/// Look the supervisor up in the director list of the first record only.
fn resolve_supervisor_name(records: &[Value], supervisor_id: &str) -> String {
    records
        .first()
        .and_then(|first| first.get("directeurs"))
        .and_then(|d| d.as_array())
        .and_then(|directors| {
            directors
                .iter()
                .find(|d| d.get("ppn").and_then(|p| p.as_str()) == Some(supervisor_id))
        })
        .map(full_name)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

fn title_of(record: &Value) -> String {
    ["titrePrincipal", "titreEN"]
        .iter()
        .filter_map(|key| record.get(*key).and_then(|t| t.as_str()))
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Name and identifier of the first listed author, if any.
fn first_author(record: &Value) -> (String, Option<String>) {
    let author = match record
        .get("auteurs")
        .and_then(|a| a.as_array())
        .and_then(|a| a.first())
    {
        Some(a) => a,
        None => return (String::new(), None),
    };

    let author_id = author
        .get("ppn")
        .and_then(|p| p.as_str())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from);

    (full_name(author), author_id)
}

fn full_name(person: &Value) -> String {
    let first = person.get("prenom").and_then(|v| v.as_str()).unwrap_or("");
    let last = person.get("nom").and_then(|v| v.as_str()).unwrap_or("");
    format!("{} {}", first, last).trim().to_string()
}

/// String field, or the textual form of a number; empty otherwise.
fn scalar_field(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
