//! Entity fixtures shared by the integration tests.

use coldb::mapper::{parse_bool, parse_float, parse_int, Entity, FieldDef, FieldKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: i64,
    pub score: f64,
    pub active: bool,
}

impl Person {
    pub fn new(name: &str, age: i64, score: f64, active: bool) -> Self {
        Self {
            name: name.to_string(),
            age,
            score,
            active,
        }
    }
}

impl Entity for Person {
    fn fields() -> &'static [FieldDef<Self>] {
        static FIELDS: [FieldDef<Person>; 4] = [
            FieldDef {
                name: "name",
                kind: FieldKind::Text,
                get: |p| p.name.clone(),
                set: |p, raw| {
                    p.name = raw.to_string();
                    Ok(())
                },
            },
            FieldDef {
                name: "age",
                kind: FieldKind::Int,
                get: |p| p.age.to_string(),
                set: |p, raw| {
                    p.age = parse_int("age", raw)?;
                    Ok(())
                },
            },
            FieldDef {
                name: "score",
                kind: FieldKind::Float,
                get: |p| p.score.to_string(),
                set: |p, raw| {
                    p.score = parse_float("score", raw)?;
                    Ok(())
                },
            },
            FieldDef {
                name: "active",
                kind: FieldKind::Bool,
                get: |p| p.active.to_string(),
                set: |p, raw| {
                    p.active = parse_bool("active", raw)?;
                    Ok(())
                },
            },
        ];
        &FIELDS
    }
}

/// Mixed set of people used by the scan tests.
pub fn sample_people() -> Vec<Person> {
    vec![
        Person::new("alice", 30, 91.5, true),
        Person::new("bob", 25, 64.25, false),
        Person::new("carol", 30, 78.0, true),
    ]
}
