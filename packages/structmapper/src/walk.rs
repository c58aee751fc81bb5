//! Field traversal.
//!
//! Embedded records are flattened in place: their fields are visited where
//! the embedding field is declared, depth first. Internal fields are never
//! visited, including internal embedded records and anything inside them.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::{Field, Record, Schema};
use crate::tag::resolve_field;

/// A field reached by the walker, with the index path leading to it from
/// the root record.
#[derive(Clone, Debug)]
pub struct Visited<'s> {
    pub path: Vec<usize>,
    pub field: &'s Field,
}

/// Call `visit` for every visible plain field of `schema`, in declaration
/// order with embedded records flattened.
pub fn walk<'s, F>(schema: &'s Schema, mut visit: F)
where
    F: FnMut(&[usize], &'s Field),
{
    let mut path = Vec::new();
    walk_schema(schema, &mut path, &mut visit);
}

fn walk_schema<'s>(
    schema: &'s Schema,
    path: &mut Vec<usize>,
    visit: &mut dyn FnMut(&[usize], &'s Field),
) {
    for (index, field) in schema.fields().iter().enumerate() {
        if !field.is_exported() {
            continue;
        }
        path.push(index);
        match field.embedded_schema() {
            Some(embedded) => walk_schema(embedded, path, visit),
            None => visit(path, field),
        }
        path.pop();
    }
}

/// Collect the visible fields of `schema` in walk order.
pub fn visible_fields(schema: &Schema) -> Vec<Visited<'_>> {
    let mut fields = Vec::new();
    walk(schema, |path, field| {
        fields.push(Visited {
            path: path.to_vec(),
            field,
        })
    });
    fields
}

/// Check that no two visible fields resolve to the same external key.
pub fn check_keys(schema: &Schema) -> Result<()> {
    let mut seen = BTreeSet::new();
    let mut duplicate = None;
    walk(schema, |_, field| {
        let tag = resolve_field(field);
        if tag.omit || duplicate.is_some() {
            return;
        }
        if !seen.insert(tag.key.clone()) {
            duplicate = Some(tag.key);
        }
    });

    match duplicate {
        Some(key) => Err(Error::DuplicateKey {
            record: schema.name().to_string(),
            key,
        }),
        None => Ok(()),
    }
}

/// Follow `path` through embedded records, returning the record that owns
/// the leaf field and the leaf's index in it.
pub(crate) fn locate<'r>(record: &'r dyn Record, path: &[usize]) -> Result<(&'r dyn Record, usize)> {
    let (leaf, parents) = split_path(path)?;
    let mut current = record;
    for &index in parents {
        current = current
            .embedded(index)
            .ok_or_else(|| not_embedded(&current.schema(), index))?;
    }
    Ok((current, leaf))
}

pub(crate) fn locate_mut<'r>(
    record: &'r mut dyn Record,
    path: &[usize],
) -> Result<(&'r mut dyn Record, usize)> {
    let (leaf, parents) = split_path(path)?;
    let mut current = record;
    for &index in parents {
        let schema = current.schema();
        current = current
            .embedded_mut(index)
            .ok_or_else(|| not_embedded(&schema, index))?;
    }
    Ok((current, leaf))
}

fn split_path(path: &[usize]) -> Result<(usize, &[usize])> {
    path.split_last()
        .map(|(leaf, parents)| (*leaf, parents))
        .ok_or_else(|| Error::invalid_argument("empty field path"))
}

fn not_embedded(schema: &Schema, index: usize) -> Error {
    let name = schema
        .fields()
        .get(index)
        .map(Field::name)
        .unwrap_or("?");
    Error::invalid_argument(format!(
        "field {} of {} is not an embedded record",
        name,
        schema.name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;

    fn nested() -> Schema {
        let inner = Schema::new("T2")
            .field(Field::new("F21", Kind::Integer).tag("f21"))
            .field(Field::new("hidden", Kind::Text).internal())
            .field(Field::new("F22", Kind::list(Kind::Text)).tag("f22"));

        Schema::new("T1")
            .field(Field::embedded("T2", inner))
            .field(Field::new("F11", Kind::Integer).tag("f11"))
            .field(Field::new("F12", Kind::list(Kind::Text)).tag("f12"))
    }

    #[test]
    fn embedded_fields_are_visited_in_place() {
        let schema = nested();
        let visited: Vec<(Vec<usize>, &str)> = visible_fields(&schema)
            .into_iter()
            .map(|v| (v.path, v.field.name()))
            .collect();

        assert_eq!(
            visited,
            vec![
                (vec![0, 0], "F21"),
                (vec![0, 2], "F22"),
                (vec![1], "F11"),
                (vec![2], "F12"),
            ]
        );
    }

    #[test]
    fn internal_embedded_records_are_skipped() {
        let inner = Schema::new("Inner").field(Field::new("x", Kind::Text));
        let schema = Schema::new("Outer")
            .field(Field::embedded("Inner", inner).internal())
            .field(Field::new("y", Kind::Text));

        let names: Vec<&str> = visible_fields(&schema)
            .iter()
            .map(|v| v.field.name())
            .collect();
        assert_eq!(names, ["y"]);
    }

    #[test]
    fn unique_keys_pass() {
        assert!(check_keys(&nested()).is_ok());
    }

    #[test]
    fn colliding_keys_are_reported() {
        let inner = Schema::new("Base").field(Field::new("Id", Kind::Integer).tag("id"));
        let schema = Schema::new("Outer")
            .field(Field::embedded("Base", inner))
            .field(Field::new("Ident", Kind::Text).tag("id"));

        match check_keys(&schema) {
            Err(Error::DuplicateKey { record, key }) => {
                assert_eq!(record, "Outer");
                assert_eq!(key, "id");
            }
            other => panic!("expected duplicate key, got {:?}", other),
        }
    }

    #[test]
    fn omitted_fields_do_not_collide() {
        let schema = Schema::new("Outer")
            .field(Field::new("A", Kind::Text).tag("-"))
            .field(Field::new("B", Kind::Text).tag("-"));
        assert!(check_keys(&schema).is_ok());
    }
}
