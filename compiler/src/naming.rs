use crate::node::Descriptor;

/// Local type name of `desc`, with enclosing message names joined by `_`
/// (`A_B_C` for `C` nested in `B` nested in `A`). The file contributes no
/// segment, so the file itself yields an empty string.
pub fn type_name(desc: &Descriptor<'_>) -> String {
    match desc.parent() {
        None => String::new(),
        Some(parent) if parent.is_file() => desc.name().to_owned(),
        Some(parent) => format!("{}_{}", type_name(parent), desc.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_source_schema::{EnumDescriptor, EnumValueDescriptor, FileDescriptor, MessageDescriptor};

    #[test]
    fn test_nested_names_join_with_underscore() {
        let file = FileDescriptor {
            name: "nest.proto".to_owned(),
            package: Some("pkg".to_owned()),
            messages: vec![MessageDescriptor {
                name: "A".to_owned(),
                messages: vec![MessageDescriptor {
                    name: "B".to_owned(),
                    messages: vec![MessageDescriptor { name: "C".to_owned(), ..Default::default() }],
                    enums: vec![EnumDescriptor {
                        name: "E".to_owned(),
                        values: vec![EnumValueDescriptor { name: "V".to_owned(), number: 0 }],
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let root = Descriptor::file(&file);
        let a = root.message(0).unwrap();
        let b = a.message(0).unwrap();
        let c = b.message(0).unwrap();

        assert_eq!(type_name(&root), "");
        assert_eq!(type_name(&a), "A");
        assert_eq!(type_name(&b), "A_B");
        assert_eq!(type_name(&c), "A_B_C");

        let value = b.enum_type(0).and_then(|e| e.value(0)).unwrap();
        assert_eq!(type_name(&value), "A_B_E_V");
    }
}
