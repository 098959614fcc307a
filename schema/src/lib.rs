//! Plain data types shared by the proto-source crates: the descriptor tree a
//! schema compiler hands over, the positional `SourcePath` of a descriptor and
//! its `PathKey` lookup encoding, and a small protobuf wire reader/writer.
//!
//! ```
//! use proto_source_schema::*;
//!
//! let file = FileDescriptor {
//!     name: "point.proto".to_owned(),
//!     messages: vec![MessageDescriptor { name: "Point".to_owned(), ..Default::default() }],
//!     source_locations: vec![SourceLocation {
//!         path: vec![4, 0],
//!         leading_comments: Some(" A point.\n".to_owned()),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let key = PathKey::new(&[4, 0]);
//! let hit = file.source_locations.iter().find(|loc| PathKey::new(&loc.path) == key);
//! assert_eq!(hit.and_then(|loc| loc.leading_comments.as_deref()), Some(" A point.\n"));
//! ```

pub mod bb;
pub mod descriptor;
pub mod path;

pub use bb::*;
pub use descriptor::*;
pub use path::*;
