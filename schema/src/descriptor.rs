use serde::Serialize;

/// A single `.proto` file as handed over by the schema compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileDescriptor {
    pub name:             String,
    pub package:          Option<String>,
    pub messages:         Vec<MessageDescriptor>,
    pub enums:            Vec<EnumDescriptor>,
    pub extensions:       Vec<FieldDescriptor>,
    pub source_locations: Vec<SourceLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageDescriptor {
    pub name:       String,
    pub fields:     Vec<FieldDescriptor>,
    pub messages:   Vec<MessageDescriptor>,
    pub enums:      Vec<EnumDescriptor>,
    pub extensions: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name:      String,
    pub number:    i32,
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumDescriptor {
    pub name:   String,
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumValueDescriptor {
    pub name:   String,
    pub number: i32,
}

/// One record of a file's source code info. The comment text and span are
/// kept exactly as the compiler front end emitted them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceLocation {
    pub path:                      Vec<i32>,
    pub span:                      Vec<i32>,
    pub leading_comments:          Option<String>,
    pub trailing_comments:         Option<String>,
    pub leading_detached_comments: Vec<String>,
}

/// The output of `protoc --descriptor_set_out`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileDescriptorSet {
    pub files: Vec<FileDescriptor>,
}

impl FileDescriptorSet {
    pub fn file(&self, name: &str) -> Option<&FileDescriptor> {
        self.files.iter().find(|file| file.name == name)
    }
}

/// The request protoc writes to a plugin's stdin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeGeneratorRequest {
    pub file_to_generate: Vec<String>,
    pub parameter:        Option<String>,
    pub proto_files:      Vec<FileDescriptor>,
}

impl CodeGeneratorRequest {
    /// The files named in `file_to_generate`, in that order. Names without a
    /// matching descriptor are skipped.
    pub fn files_to_generate(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.file_to_generate
            .iter()
            .filter_map(|name| self.proto_files.iter().find(|file| &file.name == name))
    }
}
