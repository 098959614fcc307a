use proto_source_schema::SourcePath;

use crate::{error::LocateError, node::{Descriptor, DescriptorKind}};

// Field numbers of the container fields in descriptor.proto. protoc records
// each hop of a source path as `[field number, index]`.
pub const FILE_MESSAGE_TAG:           i32 = 4;
pub const FILE_ENUM_TAG:              i32 = 5;
pub const MESSAGE_FIELD_TAG:          i32 = 2;
pub const MESSAGE_NESTED_MESSAGE_TAG: i32 = 3;
pub const MESSAGE_NESTED_ENUM_TAG:    i32 = 4;
pub const ENUM_VALUE_TAG:             i32 = 2;

/// Tag for a `child` stored directly inside a `parent`.
pub fn relation_tag(parent: DescriptorKind, child: DescriptorKind) -> Result<i32, LocateError> {
    use DescriptorKind::*;

    match (parent, child) {
        (File,    Message)   => Ok(FILE_MESSAGE_TAG),
        (File,    Enum)      => Ok(FILE_ENUM_TAG),
        (Message, Field)     => Ok(MESSAGE_FIELD_TAG),
        (Message, Message)   => Ok(MESSAGE_NESTED_MESSAGE_TAG),
        (Message, Enum)      => Ok(MESSAGE_NESTED_ENUM_TAG),
        (Enum,    EnumValue) => Ok(ENUM_VALUE_TAG),
        (parent, child)      => Err(LocateError::UnsupportedRelation { parent, child }),
    }
}

/// Build the source path protoc uses for `desc`, root first. The file itself
/// has an empty path.
pub fn build_path(desc: &Descriptor<'_>) -> Result<SourcePath, LocateError> {
    let parent = match desc.parent() {
        Some(parent) => parent,
        None => return Ok(SourcePath::new()),
    };

    let tag = relation_tag(parent.kind(), desc.kind())?;
    let mut path = build_path(parent)?;
    path.push_pair(tag, desc.index() as i32);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_source_schema::{
        EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor,
    };

    fn message(name: &str) -> MessageDescriptor {
        MessageDescriptor { name: name.to_owned(), ..Default::default() }
    }

    fn field(name: &str, number: i32) -> FieldDescriptor {
        FieldDescriptor { name: name.to_owned(), number, type_name: None }
    }

    fn sample() -> FileDescriptor {
        let mut outer = message("Outer");
        outer.fields = vec![field("a", 1), field("b", 2), field("c", 3)];
        let mut inner = message("Inner");
        inner.fields = vec![field("x", 1)];
        inner.enums = vec![EnumDescriptor {
            name: "Mode".to_owned(),
            values: vec![
                EnumValueDescriptor { name: "OFF".to_owned(), number: 0 },
                EnumValueDescriptor { name: "ON".to_owned(), number: 1 },
            ],
        }];
        outer.messages = vec![message("Unused"), inner];
        outer.extensions = vec![field("ext", 100)];

        FileDescriptor {
            name: "sample.proto".to_owned(),
            messages: vec![message("First"), outer],
            enums: vec![EnumDescriptor { name: "Top".to_owned(), values: vec![] }],
            extensions: vec![field("file_ext", 1000)],
            ..Default::default()
        }
    }

    #[test]
    fn test_file_path_is_empty() {
        let file = sample();
        assert!(build_path(&Descriptor::file(&file)).unwrap().is_empty());
    }

    #[test]
    fn test_paths_follow_container_tags() {
        let file = sample();
        let root = Descriptor::file(&file);
        let outer = root.message(1).unwrap();

        assert_eq!(build_path(&outer).unwrap().as_slice(), &[4, 1]);
        assert_eq!(build_path(&root.enum_type(0).unwrap()).unwrap().as_slice(), &[5, 0]);
        assert_eq!(build_path(&outer.field(2).unwrap()).unwrap().as_slice(), &[4, 1, 2, 2]);

        let inner = outer.message(1).unwrap();
        assert_eq!(build_path(&inner).unwrap().as_slice(), &[4, 1, 3, 1]);
        assert_eq!(build_path(&inner.field(0).unwrap()).unwrap().as_slice(), &[4, 1, 3, 1, 2, 0]);

        let mode = inner.enum_type(0).unwrap();
        assert_eq!(build_path(&mode).unwrap().as_slice(), &[4, 1, 3, 1, 4, 0]);
        assert_eq!(
            build_path(&mode.value(1).unwrap()).unwrap().as_slice(),
            &[4, 1, 3, 1, 4, 0, 2, 1]
        );
    }

    #[test]
    fn test_every_non_file_path_is_non_empty_pairs() {
        let file = sample();
        let root = Descriptor::file(&file);
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            stack.extend(node.messages());
            stack.extend(node.enums());
            stack.extend(node.fields());
            stack.extend(node.values());
            let path = build_path(&node).unwrap();
            assert_eq!(path.is_empty(), node.is_file());
            assert_eq!(path.len() % 2, 0);
        }
    }

    #[test]
    fn test_build_path_is_repeatable() {
        let file = sample();
        let value = Descriptor::file(&file)
            .message(1)
            .and_then(|outer| outer.message(1))
            .and_then(|inner| inner.enum_type(0))
            .and_then(|mode| mode.value(0))
            .unwrap();
        let first = build_path(&value).unwrap();
        let second = build_path(&value).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.key(), second.key());
    }

    #[test]
    fn test_extensions_are_rejected() {
        let file = sample();
        let root = Descriptor::file(&file);

        let err = build_path(&root.extension(0).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            LocateError::UnsupportedRelation {
                parent: DescriptorKind::File,
                child:  DescriptorKind::Extension,
            }
        ));

        let nested = root.message(1).and_then(|outer| outer.extension(0)).unwrap();
        assert!(matches!(
            build_path(&nested),
            Err(LocateError::UnsupportedRelation { parent: DescriptorKind::Message, .. })
        ));
    }

    #[test]
    fn test_relation_table() {
        use DescriptorKind::*;
        assert_eq!(relation_tag(File, Message).unwrap(), 4);
        assert_eq!(relation_tag(File, Enum).unwrap(), 5);
        assert_eq!(relation_tag(Message, Field).unwrap(), 2);
        assert_eq!(relation_tag(Message, Message).unwrap(), 3);
        assert_eq!(relation_tag(Message, Enum).unwrap(), 4);
        assert_eq!(relation_tag(Enum, EnumValue).unwrap(), 2);
        assert!(relation_tag(File, Field).is_err());
        assert!(relation_tag(Enum, Message).is_err());
        assert!(relation_tag(EnumValue, Field).is_err());
    }
}
