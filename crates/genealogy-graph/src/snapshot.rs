//! Flat graph snapshot and its JSON persistence.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use genealogy_core::{Edge, Person, Result, Thesis};

/// Serialized form of a finished traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub persons: PersonMap,
    pub theses: Vec<Thesis>,
    pub edges: Vec<Edge>,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(alias = "root_person")]
    pub root_person_id: Option<String>,
    pub max_depth: u32,
    pub total_persons: usize,
    pub total_theses: usize,
}

impl GraphSnapshot {
    /// Indented UTF-8 JSON, non-ASCII characters kept as is.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        info!("Snapshot written to {}", path.display());
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}

/// Persons keyed by identifier, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonMap {
    persons: Vec<Person>,
    index: HashMap<String, usize>,
}

impl PersonMap {
    /// Build from persons in order; a repeated identifier keeps its first position
    /// and takes the later value.
    pub fn from_persons(persons: impl IntoIterator<Item = Person>) -> Self {
        let mut map = Self::default();
        for person in persons {
            map.insert(person.person_id.clone(), person);
        }
        map
    }

    fn insert(&mut self, key: String, person: Person) {
        match self.index.get(&key) {
            Some(&pos) => self.persons[pos] = person,
            None => {
                self.index.insert(key, self.persons.len());
                self.persons.push(person);
            }
        }
    }

    pub fn get(&self, person_id: &str) -> Option<&Person> {
        self.index.get(person_id).map(|&pos| &self.persons[pos])
    }

    pub fn first(&self) -> Option<&Person> {
        self.persons.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

impl Serialize for PersonMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.persons.len()))?;
        for person in &self.persons {
            map.serialize_entry(&person.person_id, person)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PersonMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PersonMapVisitor;

        impl<'de> Visitor<'de> for PersonMapVisitor {
            type Value = PersonMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of person_id to person")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<PersonMap, A::Error> {
                let mut map = PersonMap::default();
                while let Some((key, person)) = access.next_entry::<String, Person>()? {
                    map.insert(key, person);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(PersonMapVisitor)
    }
}
