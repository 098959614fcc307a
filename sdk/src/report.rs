use lazy_static::lazy_static;
use proto_source_locator::{
    build_path, file_enums, file_messages, type_name, Descriptor, DescriptorKind, LocateError,
    LocationIndex,
};
use proto_source_schema::FileDescriptor;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

lazy_static! {
    static ref COMMENT_LINE_LEAD: Regex = Regex::new(r"(?m)^ ").unwrap();
}

/// Comments attached to one descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentEntry {
    pub name:             String,
    pub kind:             DescriptorKind,
    pub path:             Vec<i32>,
    pub leading:          Option<String>,
    pub trailing:         Option<String>,
    pub leading_detached: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileComments {
    pub file:    String,
    pub package: Option<String>,
    pub entries: Vec<CommentEntry>,
}

/// Every message of `file` in pre-order, each followed by its fields, then
/// every enum followed by its values. Descriptors without a source location
/// record are left out.
pub fn file_comments(file: &FileDescriptor) -> Result<FileComments, LocateError> {
    let index = LocationIndex::new(file);
    let mut entries = Vec::new();

    for message in file_messages(file) {
        push_entry(&index, &message, &mut entries)?;
        for field in message.fields() {
            push_entry(&index, &field, &mut entries)?;
        }
    }
    for enum_ in file_enums(file) {
        push_entry(&index, &enum_, &mut entries)?;
        for value in enum_.values() {
            push_entry(&index, &value, &mut entries)?;
        }
    }

    debug!(file = %file.name, entries = entries.len(), "collected comments");
    Ok(FileComments {
        file:    file.name.clone(),
        package: file.package.clone(),
        entries,
    })
}

fn push_entry<'a>(
    index: &LocationIndex<'a>,
    desc: &Descriptor<'a>,
    out: &mut Vec<CommentEntry>,
) -> Result<(), LocateError> {
    let path = build_path(desc)?;
    if let Some(location) = index.get(&path) {
        out.push(CommentEntry {
            name:             type_name(desc),
            kind:             desc.kind(),
            path:             path.as_slice().to_vec(),
            leading:          location.leading_comments.clone(),
            trailing:         location.trailing_comments.clone(),
            leading_detached: location.leading_detached_comments.clone(),
        });
    }
    Ok(())
}

/// Keep only entries whose derived name matches `pattern`.
pub fn filter_entries(comments: &mut FileComments, pattern: &Regex) {
    comments.entries.retain(|entry| pattern.is_match(&entry.name));
}

/// Pretty JSON for a list of file reports.
pub fn comments_to_json(files: &[FileComments]) -> Result<String, LocateError> {
    Ok(serde_json::to_string_pretty(files)?)
}

/// protoc keeps the space after `//` on every comment line and ends the
/// text with a newline. Strip both for rendering.
pub fn clean_comment(text: &str) -> String {
    COMMENT_LINE_LEAD
        .replace_all(text, "")
        .trim_end_matches('\n')
        .to_string()
}
