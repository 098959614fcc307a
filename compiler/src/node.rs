use std::fmt;
use std::sync::Arc;

use proto_source_schema::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DescriptorKind {
    File,
    Message,
    Enum,
    EnumValue,
    Field,
    Extension,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DescriptorKind::File      => "file",
            DescriptorKind::Message   => "message",
            DescriptorKind::Enum      => "enum",
            DescriptorKind::EnumValue => "enum value",
            DescriptorKind::Field     => "field",
            DescriptorKind::Extension => "extension",
        };
        f.write_str(text)
    }
}

/// The descriptor a handle points at.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    File(&'a FileDescriptor),
    Message(&'a MessageDescriptor),
    Enum(&'a EnumDescriptor),
    EnumValue(&'a EnumValueDescriptor),
    Field(&'a FieldDescriptor),
    Extension(&'a FieldDescriptor),
}

/// A borrowed view of one node of a file's descriptor tree.
///
/// The owned descriptor structs have no back links, so a handle carries its
/// lexical parent and its index among same-kind siblings. Handles are only
/// built by walking down from [`Descriptor::file`], which keeps every
/// `(parent, index)` pair consistent with the tree.
#[derive(Debug, Clone)]
pub struct Descriptor<'a> {
    file:   &'a FileDescriptor,
    parent: Option<Arc<Descriptor<'a>>>,
    index:  usize,
    item:   Item<'a>,
}

impl<'a> Descriptor<'a> {
    /// The root handle for `file`.
    pub fn file(file: &'a FileDescriptor) -> Descriptor<'a> {
        Descriptor {
            file,
            parent: None,
            index:  0,
            item:   Item::File(file),
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self.item {
            Item::File(_)      => DescriptorKind::File,
            Item::Message(_)   => DescriptorKind::Message,
            Item::Enum(_)      => DescriptorKind::Enum,
            Item::EnumValue(_) => DescriptorKind::EnumValue,
            Item::Field(_)     => DescriptorKind::Field,
            Item::Extension(_) => DescriptorKind::Extension,
        }
    }

    pub fn item(&self) -> Item<'a> {
        self.item
    }

    /// The lexical container, or `None` for the file itself.
    pub fn parent(&self) -> Option<&Descriptor<'a>> {
        self.parent.as_deref()
    }

    /// Zero-based position among siblings of the same kind.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_file(&self) -> bool {
        self.parent.is_none()
    }

    /// The file this node belongs to.
    pub fn parent_file(&self) -> &'a FileDescriptor {
        self.file
    }

    pub fn name(&self) -> &'a str {
        match self.item {
            Item::File(file)       => &file.name,
            Item::Message(message) => &message.name,
            Item::Enum(enum_)      => &enum_.name,
            Item::EnumValue(value) => &value.name,
            Item::Field(field)     => &field.name,
            Item::Extension(field) => &field.name,
        }
    }

    /// Top-level messages of a file, or nested messages of a message.
    pub fn messages(&self) -> impl Iterator<Item = Descriptor<'a>> + 'a {
        let items: &'a [MessageDescriptor] = match self.item {
            Item::File(file)       => &file.messages,
            Item::Message(message) => &message.messages,
            _ => &[],
        };
        self.children(items, Item::Message)
    }

    /// Top-level enums of a file, or nested enums of a message.
    pub fn enums(&self) -> impl Iterator<Item = Descriptor<'a>> + 'a {
        let items: &'a [EnumDescriptor] = match self.item {
            Item::File(file)       => &file.enums,
            Item::Message(message) => &message.enums,
            _ => &[],
        };
        self.children(items, Item::Enum)
    }

    pub fn fields(&self) -> impl Iterator<Item = Descriptor<'a>> + 'a {
        let items: &'a [FieldDescriptor] = match self.item {
            Item::Message(message) => &message.fields,
            _ => &[],
        };
        self.children(items, Item::Field)
    }

    pub fn values(&self) -> impl Iterator<Item = Descriptor<'a>> + 'a {
        let items: &'a [EnumValueDescriptor] = match self.item {
            Item::Enum(enum_) => &enum_.values,
            _ => &[],
        };
        self.children(items, Item::EnumValue)
    }

    pub fn extensions(&self) -> impl Iterator<Item = Descriptor<'a>> + 'a {
        let items: &'a [FieldDescriptor] = match self.item {
            Item::File(file)       => &file.extensions,
            Item::Message(message) => &message.extensions,
            _ => &[],
        };
        self.children(items, Item::Extension)
    }

    pub fn message(&self, index: usize) -> Option<Descriptor<'a>> {
        self.messages().nth(index)
    }

    pub fn enum_type(&self, index: usize) -> Option<Descriptor<'a>> {
        self.enums().nth(index)
    }

    pub fn field(&self, index: usize) -> Option<Descriptor<'a>> {
        self.fields().nth(index)
    }

    pub fn value(&self, index: usize) -> Option<Descriptor<'a>> {
        self.values().nth(index)
    }

    pub fn extension(&self, index: usize) -> Option<Descriptor<'a>> {
        self.extensions().nth(index)
    }

    fn children<T: 'a>(
        &self,
        items: &'a [T],
        wrap: fn(&'a T) -> Item<'a>,
    ) -> impl Iterator<Item = Descriptor<'a>> + 'a {
        let file = self.file;
        let parent = Arc::new(self.clone());
        items.iter().enumerate().map(move |(index, item)| Descriptor {
            file,
            parent: Some(Arc::clone(&parent)),
            index,
            item: wrap(item),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileDescriptor {
        FileDescriptor {
            name: "shapes.proto".to_owned(),
            messages: vec![MessageDescriptor {
                name: "Shape".to_owned(),
                fields: vec![
                    FieldDescriptor { name: "id".to_owned(), number: 1, type_name: None },
                    FieldDescriptor { name: "kind".to_owned(), number: 2, type_name: None },
                ],
                enums: vec![EnumDescriptor { name: "Kind".to_owned(), values: vec![] }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_handles_carry_parent_and_index() {
        let file = sample();
        let root = Descriptor::file(&file);
        assert!(root.is_file());
        assert_eq!(root.kind(), DescriptorKind::File);

        let shape = root.message(0).unwrap();
        assert_eq!(shape.kind(), DescriptorKind::Message);
        assert_eq!(shape.parent().map(|p| p.kind()), Some(DescriptorKind::File));

        let kind = shape.field(1).unwrap();
        assert_eq!(kind.name(), "kind");
        assert_eq!(kind.index(), 1);
        assert_eq!(kind.parent().map(|p| p.name()), Some("Shape"));
        assert!(std::ptr::eq(kind.parent_file(), &file));

        let nested = shape.enum_type(0).unwrap();
        assert_eq!(nested.kind(), DescriptorKind::Enum);
        assert_eq!(nested.index(), 0);
    }

    #[test]
    fn test_missing_children_are_none() {
        let file = sample();
        let root = Descriptor::file(&file);
        assert!(root.message(1).is_none());
        assert!(root.field(0).is_none());
        assert!(root.message(0).unwrap().value(0).is_none());
    }

    #[test]
    fn test_handles_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Descriptor<'static>>();
    }
}
