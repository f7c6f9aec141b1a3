use std::sync::Arc;

use crate::error::AppError;
use crate::form::path::{FieldPath, Segment};
use crate::form::value::{FormMap, FormValue};

/// Furthest an index may reach past the end of a list; the gap is padded
/// with nulls.
pub const MAX_LIST_GAP: usize = 1024;

/// Returns a copy of `root` with `value` stored at `path`.
///
/// Only the ancestors along `path` are rebuilt; every other branch is the
/// same `Arc` as in `root`. Missing or null intermediates are created as an
/// empty object (key segment) or empty list (index segment). An index more
/// than [`MAX_LIST_GAP`] past the end of its list is an `InvalidPath`.
pub fn set_in(root: &FormValue, path: &FieldPath, value: FormValue) -> Result<FormValue, AppError> {
    assign(root, path, 0, value)
}

/// Parses `path` and applies [`set_in`].
pub fn set_path(root: &FormValue, path: &str, value: FormValue) -> Result<FormValue, AppError> {
    set_in(root, &FieldPath::parse(path)?, value)
}

pub fn get_in<'a>(root: &'a FormValue, path: &FieldPath) -> Option<&'a FormValue> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| match (node, segment) {
            (FormValue::Object(map), Segment::Key(key)) => map.get(key),
            (FormValue::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
            (FormValue::List(items), Segment::Index(index)) => items.get(*index),
            _ => None,
        })
}

pub fn get_path<'a>(root: &'a FormValue, path: &str) -> Option<&'a FormValue> {
    FieldPath::parse(path).ok().and_then(|path| get_in(root, &path))
}

fn assign(node: &FormValue, path: &FieldPath, depth: usize, value: FormValue) -> Result<FormValue, AppError> {
    let Some(segment) = path.segments().get(depth) else {
        return Ok(value);
    };

    match (node, segment) {
        (FormValue::Object(map), segment) => {
            let key = segment.to_string();
            let child = map.get(&key).unwrap_or(&FormValue::Null);
            let updated = assign(child, path, depth + 1, value)?;
            let mut copy: FormMap = (**map).clone();
            copy.insert(key, updated);
            Ok(FormValue::Object(Arc::new(copy)))
        }
        (FormValue::List(items), Segment::Index(index)) => {
            if *index > items.len().saturating_add(MAX_LIST_GAP) {
                return Err(AppError::InvalidPath(path.to_string()));
            }
            let child = items.get(*index).unwrap_or(&FormValue::Null);
            let updated = assign(child, path, depth + 1, value)?;
            let mut copy = (**items).clone();
            if *index >= copy.len() {
                copy.resize(*index + 1, FormValue::Null);
            }
            copy[*index] = updated;
            Ok(FormValue::List(Arc::new(copy)))
        }
        (FormValue::Null, Segment::Key(_)) => assign(&FormValue::empty_object(), path, depth, value),
        (FormValue::Null, Segment::Index(_)) => assign(&FormValue::empty_list(), path, depth, value),
        (_, segment) => Err(AppError::PathConflict {
            path: path.to_string(),
            segment: segment.to_string(),
        }),
    }
}

/// Fills keys missing (or null) in `existing` from `template`, recursing into
/// objects present on both sides. Keys only `existing` has are kept as is, and
/// lists always come from `existing`.
pub fn merge_defaults(template: &FormValue, existing: &FormValue) -> FormValue {
    match (template, existing) {
        (FormValue::Object(defaults), FormValue::Object(values)) => {
            let mut merged: FormMap = (**values).clone();
            for (key, default) in defaults.iter() {
                let entry = match values.get(key) {
                    None | Some(FormValue::Null) => default.clone(),
                    Some(current) => merge_defaults(default, current),
                };
                merged.insert(key.clone(), entry);
            }
            FormValue::Object(Arc::new(merged))
        }
        (template, FormValue::Null) => template.clone(),
        (_, existing) => existing.clone(),
    }
}
