use proto_source_schema::{
    ByteBuffer, CodeGeneratorRequest, EnumDescriptor, EnumValueDescriptor, FieldDescriptor,
    FileDescriptor, FileDescriptorSet, MessageDescriptor, SourceLocation, WireType,
};
use tracing::debug;

use crate::error::LocateError;

/// Decode the bytes written by `protoc --descriptor_set_out`.
/// Source locations are only present if protoc ran with `--include_source_info`.
pub fn decode_descriptor_set(buffer: &[u8]) -> Result<FileDescriptorSet, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut set = FileDescriptorSet::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "FileDescriptorSet")? {
            (1, WireType::LengthDelimited) => {
                set.files.push(decode_file(read_nested(&mut bb, "FileDescriptorSet.file")?)?)
            }
            (_, wire_type) => skip(&mut bb, wire_type, "FileDescriptorSet")?,
        }
    }

    debug!(files = set.files.len(), "decoded descriptor set");
    Ok(set)
}

/// Decode the `CodeGeneratorRequest` protoc writes to a plugin's stdin.
pub fn decode_code_generator_request(buffer: &[u8]) -> Result<CodeGeneratorRequest, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut request = CodeGeneratorRequest::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "CodeGeneratorRequest")? {
            (1, WireType::LengthDelimited) => request
                .file_to_generate
                .push(read_string(&mut bb, "CodeGeneratorRequest.file_to_generate")?),
            (2, WireType::LengthDelimited) => {
                request.parameter = Some(read_string(&mut bb, "CodeGeneratorRequest.parameter")?)
            }
            (15, WireType::LengthDelimited) => request
                .proto_files
                .push(decode_file(read_nested(&mut bb, "CodeGeneratorRequest.proto_file")?)?),
            (_, wire_type) => skip(&mut bb, wire_type, "CodeGeneratorRequest")?,
        }
    }

    debug!(
        files = request.proto_files.len(),
        to_generate = request.file_to_generate.len(),
        "decoded code generator request"
    );
    Ok(request)
}

/// Decode a single serialized `FileDescriptorProto`.
pub fn decode_file(buffer: &[u8]) -> Result<FileDescriptor, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut file = FileDescriptor::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "FileDescriptorProto")? {
            (1, WireType::LengthDelimited) => file.name = read_string(&mut bb, "file name")?,
            (2, WireType::LengthDelimited) => file.package = Some(read_string(&mut bb, "package")?),
            (4, WireType::LengthDelimited) => {
                file.messages.push(decode_message(read_nested(&mut bb, "message_type")?)?)
            }
            (5, WireType::LengthDelimited) => {
                file.enums.push(decode_enum(read_nested(&mut bb, "enum_type")?)?)
            }
            (7, WireType::LengthDelimited) => {
                file.extensions.push(decode_field(read_nested(&mut bb, "extension")?)?)
            }
            (9, WireType::LengthDelimited) => decode_source_code_info(
                read_nested(&mut bb, "source_code_info")?,
                &mut file.source_locations,
            )?,
            (_, wire_type) => skip(&mut bb, wire_type, "FileDescriptorProto")?,
        }
    }

    debug!(
        file = %file.name,
        messages = file.messages.len(),
        enums = file.enums.len(),
        locations = file.source_locations.len(),
        "decoded file descriptor"
    );
    Ok(file)
}

fn decode_message(buffer: &[u8]) -> Result<MessageDescriptor, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut message = MessageDescriptor::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "DescriptorProto")? {
            (1, WireType::LengthDelimited) => message.name = read_string(&mut bb, "message name")?,
            (2, WireType::LengthDelimited) => {
                message.fields.push(decode_field(read_nested(&mut bb, "field")?)?)
            }
            (3, WireType::LengthDelimited) => {
                message.messages.push(decode_message(read_nested(&mut bb, "nested_type")?)?)
            }
            (4, WireType::LengthDelimited) => {
                message.enums.push(decode_enum(read_nested(&mut bb, "enum_type")?)?)
            }
            (6, WireType::LengthDelimited) => {
                message.extensions.push(decode_field(read_nested(&mut bb, "extension")?)?)
            }
            (_, wire_type) => skip(&mut bb, wire_type, "DescriptorProto")?,
        }
    }

    Ok(message)
}

fn decode_field(buffer: &[u8]) -> Result<FieldDescriptor, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut field = FieldDescriptor::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "FieldDescriptorProto")? {
            (1, WireType::LengthDelimited) => field.name = read_string(&mut bb, "field name")?,
            (3, WireType::Varint) => field.number = read_int32(&mut bb, "field number")?,
            (6, WireType::LengthDelimited) => {
                field.type_name = Some(read_string(&mut bb, "type_name")?)
            }
            (_, wire_type) => skip(&mut bb, wire_type, "FieldDescriptorProto")?,
        }
    }

    Ok(field)
}

fn decode_enum(buffer: &[u8]) -> Result<EnumDescriptor, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut enum_ = EnumDescriptor::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "EnumDescriptorProto")? {
            (1, WireType::LengthDelimited) => enum_.name = read_string(&mut bb, "enum name")?,
            (2, WireType::LengthDelimited) => {
                enum_.values.push(decode_enum_value(read_nested(&mut bb, "value")?)?)
            }
            (_, wire_type) => skip(&mut bb, wire_type, "EnumDescriptorProto")?,
        }
    }

    Ok(enum_)
}

fn decode_enum_value(buffer: &[u8]) -> Result<EnumValueDescriptor, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut value = EnumValueDescriptor::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "EnumValueDescriptorProto")? {
            (1, WireType::LengthDelimited) => value.name = read_string(&mut bb, "enum value name")?,
            (2, WireType::Varint) => value.number = read_int32(&mut bb, "enum value number")?,
            (_, wire_type) => skip(&mut bb, wire_type, "EnumValueDescriptorProto")?,
        }
    }

    Ok(value)
}

fn decode_source_code_info(buffer: &[u8], out: &mut Vec<SourceLocation>) -> Result<(), LocateError> {
    let mut bb = ByteBuffer::new(buffer);

    while !bb.is_empty() {
        match read_key(&mut bb, "SourceCodeInfo")? {
            (1, WireType::LengthDelimited) => {
                out.push(decode_location(read_nested(&mut bb, "location")?)?)
            }
            (_, wire_type) => skip(&mut bb, wire_type, "SourceCodeInfo")?,
        }
    }

    Ok(())
}

fn decode_location(buffer: &[u8]) -> Result<SourceLocation, LocateError> {
    let mut bb = ByteBuffer::new(buffer);
    let mut location = SourceLocation::default();

    while !bb.is_empty() {
        match read_key(&mut bb, "Location")? {
            (1, wire_type) => read_int32s(&mut bb, wire_type, "location path", &mut location.path)?,
            (2, wire_type) => read_int32s(&mut bb, wire_type, "location span", &mut location.span)?,
            (3, WireType::LengthDelimited) => {
                location.leading_comments = Some(read_string(&mut bb, "leading_comments")?)
            }
            (4, WireType::LengthDelimited) => {
                location.trailing_comments = Some(read_string(&mut bb, "trailing_comments")?)
            }
            (6, WireType::LengthDelimited) => location
                .leading_detached_comments
                .push(read_string(&mut bb, "leading_detached_comments")?),
            (_, wire_type) => skip(&mut bb, wire_type, "Location")?,
        }
    }

    Ok(location)
}

fn read_key(bb: &mut ByteBuffer, context: &str) -> Result<(u32, WireType), LocateError> {
    let at = bb.index();
    bb.read_key().map_err(|_| {
        LocateError::Decode(format!("Failed to read field key of {} at byte {}", context, at))
    })
}

fn read_nested<'a>(bb: &mut ByteBuffer<'a>, what: &str) -> Result<&'a [u8], LocateError> {
    bb.read_length_delimited()
        .map_err(|_| LocateError::Decode(format!("Failed to read {}: truncated message", what)))
}

fn read_string(bb: &mut ByteBuffer, what: &str) -> Result<String, LocateError> {
    bb.read_string()
        .map(|s| s.into_owned())
        .map_err(|_| LocateError::Decode(format!("Failed to read {}", what)))
}

fn read_int32(bb: &mut ByteBuffer, what: &str) -> Result<i32, LocateError> {
    bb.read_var_int32()
        .map_err(|_| LocateError::Decode(format!("Failed to read {}", what)))
}

/// Repeated int32 fields may arrive packed or one value per key.
fn read_int32s(
    bb: &mut ByteBuffer,
    wire_type: WireType,
    what: &str,
    out: &mut Vec<i32>,
) -> Result<(), LocateError> {
    match wire_type {
        WireType::Varint => out.push(read_int32(bb, what)?),
        WireType::LengthDelimited => {
            let mut packed = ByteBuffer::new(read_nested(bb, what)?);
            while !packed.is_empty() {
                out.push(read_int32(&mut packed, what)?);
            }
        }
        other => {
            return Err(LocateError::Decode(format!(
                "Unexpected wire type {:?} for {}",
                other, what
            )))
        }
    }
    Ok(())
}

fn skip(bb: &mut ByteBuffer, wire_type: WireType, context: &str) -> Result<(), LocateError> {
    bb.skip(wire_type).map_err(|_| {
        LocateError::Decode(format!(
            "Failed to skip {:?} field in {}",
            wire_type, context
        ))
    })
}
