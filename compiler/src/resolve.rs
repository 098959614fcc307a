use std::collections::HashMap;

use proto_source_schema::{FileDescriptor, PathKey, SourceLocation, SourcePath};
use tracing::{debug, trace};

use crate::{error::LocateError, node::Descriptor, path::build_path};

/// First record in `file` whose path equals `path`.
pub fn find_location<'a>(file: &'a FileDescriptor, path: &SourcePath) -> Option<&'a SourceLocation> {
    let key = path.key();
    file.source_locations
        .iter()
        .find(|location| PathKey::new(&location.path) == key)
}

/// Source location recorded for `desc` in its own file.
///
/// `Ok(None)` means the element simply has no record (usually: no comment).
/// Errors only come from building the path.
pub fn resolve_location<'a>(desc: &Descriptor<'a>) -> Result<Option<&'a SourceLocation>, LocateError> {
    let path = build_path(desc)?;
    let location = find_location(desc.parent_file(), &path);
    if location.is_none() {
        trace!(name = desc.name(), path = %path, "no source location");
    }
    Ok(location)
}

/// Hash index over one file's location table, for callers resolving many
/// descriptors of the same file.
pub struct LocationIndex<'a> {
    file:   &'a FileDescriptor,
    by_key: HashMap<PathKey, &'a SourceLocation>,
}

impl<'a> LocationIndex<'a> {
    pub fn new(file: &'a FileDescriptor) -> LocationIndex<'a> {
        let mut by_key = HashMap::with_capacity(file.source_locations.len());
        for location in &file.source_locations {
            // Keep the first of duplicate paths, as the linear scan does.
            by_key.entry(PathKey::new(&location.path)).or_insert(location);
        }
        debug!(
            file = %file.name,
            records = file.source_locations.len(),
            distinct = by_key.len(),
            "indexed source locations"
        );
        LocationIndex { file, by_key }
    }

    pub fn get(&self, path: &SourcePath) -> Option<&'a SourceLocation> {
        self.by_key.get(&path.key()).copied()
    }

    /// Same answer as [`resolve_location`]. Descriptors from another file are
    /// resolved against their own file's table.
    pub fn resolve(&self, desc: &Descriptor<'a>) -> Result<Option<&'a SourceLocation>, LocateError> {
        if !std::ptr::eq(desc.parent_file(), self.file) {
            return resolve_location(desc);
        }
        let path = build_path(desc)?;
        Ok(self.get(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_source_schema::{FieldDescriptor, MessageDescriptor};

    fn location(path: &[i32], trailing: &str) -> SourceLocation {
        SourceLocation {
            path: path.to_vec(),
            trailing_comments: Some(trailing.to_owned()),
            ..Default::default()
        }
    }

    fn sample() -> FileDescriptor {
        FileDescriptor {
            name: "req.proto".to_owned(),
            messages: vec![MessageDescriptor {
                name: "Request".to_owned(),
                fields: vec![
                    FieldDescriptor { name: "id".to_owned(), number: 1, type_name: None },
                    FieldDescriptor { name: "body".to_owned(), number: 2, type_name: None },
                    FieldDescriptor { name: "tag".to_owned(), number: 3, type_name: None },
                ],
                ..Default::default()
            }],
            source_locations: vec![
                location(&[], "file"),
                location(&[4, 0], "message"),
                location(&[4, 0, 2, 1], "body"),
                location(&[4, 0, 2, 1], "duplicate"),
                location(&[4, 0, 2, 1, 5], "type of body"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_resolves_exact_path_only() {
        let file = sample();
        let request = Descriptor::file(&file).message(0).unwrap();

        let body = resolve_location(&request.field(1).unwrap()).unwrap();
        assert_eq!(body.and_then(|l| l.trailing_comments.as_deref()), Some("body"));

        assert!(resolve_location(&request.field(0).unwrap()).unwrap().is_none());
        assert!(resolve_location(&request.field(2).unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let file = sample();
        let body = Descriptor::file(&file).message(0).and_then(|m| m.field(1)).unwrap();

        let scanned = resolve_location(&body).unwrap().unwrap();
        let index = LocationIndex::new(&file);
        let indexed = index.resolve(&body).unwrap().unwrap();

        assert!(std::ptr::eq(scanned, &file.source_locations[2]));
        assert!(std::ptr::eq(indexed, scanned));
    }

    #[test]
    fn test_index_matches_linear_scan() {
        let file = sample();
        let index = LocationIndex::new(&file);
        let root = Descriptor::file(&file);
        let request = root.message(0).unwrap();

        let mut nodes = vec![root.clone(), request.clone()];
        nodes.extend(request.fields());
        for node in &nodes {
            let scanned = resolve_location(node).unwrap();
            let indexed = index.resolve(node).unwrap();
            assert_eq!(scanned, indexed, "mismatch for {}", node.name());
        }
    }

    #[test]
    fn test_lookup_stays_inside_the_node_file() {
        let file = sample();
        let mut other = sample();
        other.name = "other.proto".to_owned();
        other.source_locations = vec![location(&[4, 0, 2, 0], "other id")];

        let index = LocationIndex::new(&file);
        let other_id = Descriptor::file(&other).message(0).and_then(|m| m.field(0)).unwrap();
        let found = index.resolve(&other_id).unwrap();
        assert_eq!(found.and_then(|l| l.trailing_comments.as_deref()), Some("other id"));

        let own_id = Descriptor::file(&file).message(0).and_then(|m| m.field(0)).unwrap();
        assert!(index.resolve(&own_id).unwrap().is_none());
    }
}
