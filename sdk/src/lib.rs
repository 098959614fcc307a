//! proto-source
//!
//! Resolve the comments protoc recorded for protobuf descriptors.
//!
//! - Descriptor handles, path building and location lookup (re-exported from the locator)
//! - Bulk per-file comment reports and their JSON rendering

pub mod report;

pub use proto_source_locator::{
    build_path, decode_code_generator_request, decode_descriptor_set, resolve_location,
    type_name, Descriptor, DescriptorKind, LocateError, LocationIndex,
};
pub use proto_source_schema::{FileDescriptor, FileDescriptorSet, SourceLocation, SourcePath};
pub use report::{clean_comment, comments_to_json, file_comments, CommentEntry, FileComments};

/// Decode a `FileDescriptorSet` buffer into a pretty-printed JSON comment report.
pub fn decode_to_json(buffer: &[u8]) -> Result<String, LocateError> {
    let set = decode_descriptor_set(buffer)?;
    let reports = set
        .files
        .iter()
        .map(file_comments)
        .collect::<Result<Vec<_>, _>>()?;
    comments_to_json(&reports)
}

pub mod error {
    pub use proto_source_locator::error::LocateError;
}

pub mod schema {
    pub use proto_source_schema::{
        EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor,
        SourceLocation,
    };
}
