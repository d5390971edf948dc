//! Record / cell mapping.
//!
//! Each record type registers its fields once in a static table; both
//! decode paths and the encoder consult that registry instead of any
//! runtime reflection. Qualifier names are field names; the reserved
//! qualifier `"class"` is never mapped.

use crate::core::cell::{Cell, CellWrite};
use crate::core::error::MappingError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

/// Qualifier never mapped onto any field.
pub const RESERVED_QUALIFIER: &str = "class";

/// Wire-level type tag driving read-side coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
        }
    }
}

/// One entry of a record type's field registry.
pub struct FieldDef<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> String,
    pub set: fn(&mut T, &str) -> Result<(), MappingError>,
}

/// A typed record whose fields map 1:1 onto column qualifiers within one
/// column family.
pub trait Entity: Default {
    /// Static field registry, built once per type.
    fn fields() -> &'static [FieldDef<Self>]
    where
        Self: Sized;
}

pub fn parse_int(field: &'static str, raw: &str) -> Result<i64, MappingError> {
    raw.trim().parse().map_err(|_| MappingError::Coercion {
        field: field.to_string(),
        kind: FieldKind::Int.name(),
        value: raw.to_string(),
    })
}

pub fn parse_float(field: &'static str, raw: &str) -> Result<f64, MappingError> {
    raw.trim().parse().map_err(|_| MappingError::Coercion {
        field: field.to_string(),
        kind: FieldKind::Float.name(),
        value: raw.to_string(),
    })
}

pub fn parse_bool(field: &'static str, raw: &str) -> Result<bool, MappingError> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| MappingError::Coercion {
            field: field.to_string(),
            kind: FieldKind::Bool.name(),
            value: raw.to_string(),
        })
}

/// One cell write per declared field whose string form is non-blank; blank
/// fields emit nothing.
pub fn encode<T: Entity + 'static>(record: &T, family: &str) -> Vec<CellWrite> {
    let mut writes = Vec::new();
    for def in T::fields() {
        let value = (def.get)(record);
        if value.trim().is_empty() {
            continue;
        }
        writes.push(CellWrite::new(family, def.name, value.into_bytes()));
    }
    writes
}

/// Flat decode path: assign each cell's text value through the matching
/// field's setter. Unknown qualifiers are dropped; zero cells yield `None`.
pub fn decode<T: Entity + 'static>(cells: &[Cell]) -> Result<Option<T>, MappingError> {
    if cells.is_empty() {
        return Ok(None);
    }
    let mut record = T::default();
    for cell in cells {
        if cell.qualifier == RESERVED_QUALIFIER {
            continue;
        }
        let Some(def) = field_of::<T>(&cell.qualifier) else {
            continue;
        };
        (def.set)(&mut record, &cell.value_str())?;
    }
    Ok(Some(record))
}

/// Strict decode path: accumulate qualifier/value pairs into one ordered
/// JSON map, coercing each value per the registry's type tag, then
/// deserialize the whole shape at once.
///
/// The intermediate map must already match the target's expected shape; a
/// row missing required fields fails with `MappingError::Deserialize`.
/// Zero cells yield `None`, agreeing with the flat path.
pub fn decode_strict<T>(cells: &[Cell]) -> Result<Option<T>, MappingError>
where
    T: Entity + DeserializeOwned + 'static,
{
    if cells.is_empty() {
        return Ok(None);
    }
    let mut object = Map::new();
    for cell in cells {
        if cell.qualifier == RESERVED_QUALIFIER {
            continue;
        }
        let Some(def) = field_of::<T>(&cell.qualifier) else {
            continue;
        };
        object.insert(
            def.name.to_string(),
            coerce(def.kind, def.name, &cell.value_str())?,
        );
    }
    serde_json::from_value(Value::Object(object))
        .map(Some)
        .map_err(|e| MappingError::Deserialize(e.to_string()))
}

fn field_of<T: Entity>(name: &str) -> Option<&'static FieldDef<T>> {
    T::fields().iter().find(|def| def.name == name)
}

fn coerce(kind: FieldKind, field: &'static str, raw: &str) -> Result<Value, MappingError> {
    match kind {
        FieldKind::Text => Ok(Value::String(raw.to_string())),
        FieldKind::Int => Ok(Value::Number(Number::from(parse_int(field, raw)?))),
        FieldKind::Float => {
            let parsed = parse_float(field, raw)?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| MappingError::Coercion {
                    field: field.to_string(),
                    kind: FieldKind::Float.name(),
                    value: raw.to_string(),
                })
        }
        FieldKind::Bool => Ok(Value::Bool(parse_bool(field, raw)?)),
    }
}
