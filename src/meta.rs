//! Vertex metadata and the by-metadata sorter.
//!
//! Graph payloads often carry a bag of named attributes next to the
//! topology. This module gives those attributes a small typed value
//! model and one utility over it: sorting a collection of vertices by
//! the value stored under a given key.

use core::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// A single metadata value attached to a vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl MetaValue {
    /// Name of the carried type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MetaValue::Int(_) => "integer",
            MetaValue::Float(_) => "float",
            MetaValue::Text(_) => "text",
            MetaValue::Bool(_) => "boolean",
        }
    }

    /// Compare two values of the same variant. `None` on a variant
    /// mismatch; floats use their total order.
    fn compare(&self, other: &MetaValue) -> Option<Ordering> {
        match (self, other) {
            (MetaValue::Int(a), MetaValue::Int(b)) => Some(a.cmp(b)),
            (MetaValue::Float(a), MetaValue::Float(b)) => Some(a.total_cmp(b)),
            (MetaValue::Text(a), MetaValue::Text(b)) => Some(a.cmp(b)),
            (MetaValue::Bool(a), MetaValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Metadata attached to one vertex, keyed by attribute name.
pub type Metadata = HashMap<String, MetaValue>;

/// Payloads that carry vertex metadata.
pub trait HasMetadata {
    /// The attribute bag of this vertex.
    fn metadata(&self) -> &Metadata;
}

/// Sort vertices by the metadata value stored under `key`.
///
/// The sort is stable: vertices with equal values keep their input
/// order. All vertices must carry `key`, and every value must have the
/// same type as the first vertex's; violations are argument errors and
/// nothing is sorted.
pub fn sort_by_metadata<V>(vertices: &[V], key: &str, ascending: bool) -> Result<Vec<V>>
where
    V: HasMetadata + Clone,
{
    if key.is_empty() {
        return Err(Error::InvalidArgument {
            name: "key",
            message: "metadata key must be non-empty",
        });
    }

    // Validate up front so the comparator below stays total.
    let mut expected: Option<&'static str> = None;
    for vertex in vertices {
        let value = vertex
            .metadata()
            .get(key)
            .ok_or_else(|| Error::MissingMetadata {
                key: key.to_string(),
            })?;
        match expected {
            None => expected = Some(value.type_name()),
            Some(type_name) if type_name != value.type_name() => {
                return Err(Error::MetadataType {
                    key: key.to_string(),
                    expected: type_name,
                    found: value.type_name(),
                });
            }
            Some(_) => {}
        }
    }

    let mut sorted = vertices.to_vec();
    sorted.sort_by(|x, y| {
        let ordering = match (x.metadata().get(key), y.metadata().get(key)) {
            (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        };
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    Ok(sorted)
}
