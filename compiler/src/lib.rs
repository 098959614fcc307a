//! proto-source-locator
//!
//! This crate implements:
//!  1) Borrowed descriptor handles that know their parent and sibling index,
//!  2) `build_path`, the positional source path protoc records for a descriptor,
//!  3) `resolve_location`, the exact-match lookup of that path in the file's source info,
//!  4) Traversal helpers (`fields`, `enum_values`, `file_messages`, `file_enums`),
//!  5) `type_name` for nested names such as `Outer_Inner`,
//!  6) Decoding of `FileDescriptorSet` / `CodeGeneratorRequest` bytes, and
//!  7) The error type (`LocateError`).

pub mod error;
pub mod node;
pub mod path;
pub mod naming;
pub mod resolve;
pub mod traverse;
pub mod decode;

pub use decode::{decode_code_generator_request, decode_descriptor_set, decode_file};
pub use error::LocateError;
pub use naming::type_name;
pub use node::{Descriptor, DescriptorKind, Item};
pub use path::{build_path, relation_tag};
pub use resolve::{find_location, resolve_location, LocationIndex};
pub use traverse::{enum_values, fields, file_enums, file_messages, nested_messages};
