use proto_source_schema::FileDescriptor;

use crate::node::Descriptor;

/// Fields of `message` in declaration order.
pub fn fields<'a>(message: &Descriptor<'a>) -> impl Iterator<Item = Descriptor<'a>> + 'a {
    message.fields()
}

/// Values of `enum_` in declaration order.
pub fn enum_values<'a>(enum_: &Descriptor<'a>) -> impl Iterator<Item = Descriptor<'a>> + 'a {
    enum_.values()
}

/// Every message in `file`, nested ones included, in pre-order.
pub fn file_messages(file: &FileDescriptor) -> NestedMessages<'_> {
    nested_messages(&Descriptor::file(file))
}

/// Every message declared below `container`, in pre-order. `container`
/// itself is not yielded.
pub fn nested_messages<'a>(container: &Descriptor<'a>) -> NestedMessages<'a> {
    let mut stack: Vec<Descriptor<'a>> = container.messages().collect();
    stack.reverse();
    NestedMessages { stack }
}

/// Top-level enums of `file`, then the nested enums of each message in
/// [`file_messages`] order.
pub fn file_enums(file: &FileDescriptor) -> impl Iterator<Item = Descriptor<'_>> + '_ {
    Descriptor::file(file)
        .enums()
        .chain(file_messages(file).flat_map(|message| message.enums()))
}

pub struct NestedMessages<'a> {
    stack: Vec<Descriptor<'a>>,
}

impl<'a> Iterator for NestedMessages<'a> {
    type Item = Descriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let message = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(message.messages());
        self.stack[start..].reverse();
        Some(message)
    }
}
