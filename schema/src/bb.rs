use std::borrow::Cow;
use std::str;

/// Protobuf wire types, as carried in the low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint          = 0,
    Fixed64         = 1,
    LengthDelimited = 2,
    StartGroup      = 3,
    EndGroup        = 4,
    Fixed32         = 5,
}

impl WireType {
    pub fn from_bits(bits: u64) -> Result<WireType, ()> {
        match bits {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            _ => Err(()),
        }
    }
}

/// A protobuf byte buffer meant for reading.
///
/// Example usage:
///
/// ```
/// use proto_source_schema::{ByteBuffer, WireType};
/// let mut bb = ByteBuffer::new(&[10, 3, 102, 111, 111]);
/// assert_eq!(bb.read_key(), Ok((1, WireType::LengthDelimited)));
/// assert_eq!(bb.read_string().map(|s| s.into_owned()), Ok("foo".to_owned()));
/// assert!(bb.is_empty());
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. The lifetime
    /// of the returned ByteBuffer must not outlive the lifetime of the byte
    /// slice.
    pub fn new(data: &[u8]) -> ByteBuffer {
        ByteBuffer { data, index: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.index >= self.data.len()
    }

    /// Try to read a byte starting at the current index.
    pub fn read_byte(&mut self) -> Result<u8, ()> {
        if self.index >= self.data.len() {
            Err(())
        } else {
            let value = self.data[self.index];
            self.index = self.index + 1;
            Ok(value)
        }
    }

    /// Try to read `len` bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ()> {
        let end = self.index.checked_add(len).ok_or(())?;
        if end > self.data.len() {
            Err(())
        } else {
            let value = &self.data[self.index..end];
            self.index = end;
            Ok(value)
        }
    }

    /// Try to read a base-128 varint of up to ten bytes starting at the
    /// current index.
    pub fn read_var_uint64(&mut self) -> Result<u64, ()> {
        let mut shift: u32 = 0;
        let mut result: u64 = 0;

        loop {
            let byte = self.read_byte()?;
            result |= ((byte & 127) as u64) << shift;

            if (byte & 128) == 0 {
                return Ok(result);
            }

            shift += 7;
            if shift >= 70 {
                return Err(());
            }
        }
    }

    /// Try to read a varint and truncate it to 32 bits.
    pub fn read_var_uint(&mut self) -> Result<u32, ()> {
        Ok(self.read_var_uint64()? as u32)
    }

    /// Try to read an `int32` field value. Negative values are sent as
    /// sign-extended ten byte varints, so truncation recovers them.
    pub fn read_var_int32(&mut self) -> Result<i32, ()> {
        Ok(self.read_var_uint64()? as i32)
    }

    /// Try to read a field key, returning the field number and wire type.
    pub fn read_key(&mut self) -> Result<(u32, WireType), ()> {
        let key = self.read_var_uint64()?;
        let field = key >> 3;
        if field == 0 || field > u32::MAX as u64 {
            return Err(());
        }
        Ok((field as u32, WireType::from_bits(key & 7)?))
    }

    /// Try to read a length prefix followed by that many bytes.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], ()> {
        let len = self.read_var_uint64()?;
        let len = usize::try_from(len).map_err(|_| ())?;
        self.read_bytes(len)
    }

    /// Try to read a length-delimited UTF-8 string. The string is returned as
    /// a slice of the underlying memory; invalid UTF-8 is an error.
    pub fn read_string(&mut self) -> Result<Cow<'a, str>, ()> {
        let bytes = self.read_length_delimited()?;
        str::from_utf8(bytes).map(Cow::Borrowed).map_err(|_| ())
    }

    /// Skip over a field value of the given wire type.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), ()> {
        match wire_type {
            WireType::Varint => {
                self.read_var_uint64()?;
            }
            WireType::Fixed64 => {
                self.read_bytes(8)?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireType::Fixed32 => {
                self.read_bytes(4)?;
            }
            // Groups are deprecated and never emitted for descriptor protos.
            WireType::StartGroup | WireType::EndGroup => return Err(()),
        }
        Ok(())
    }
}

#[test]
fn read_byte() {
    let read = |bytes| ByteBuffer::new(bytes).read_byte();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[254]), Ok(254));
    assert_eq!(read(&[255]), Ok(255));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[], 1), Err(()));
    assert_eq!(read(&[0], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert_eq!(read(&[0], 2), Err(()));
    assert_eq!(read(&[0], usize::MAX), Err(()));

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(bb.read_bytes(1), Err(()));
}

#[test]
fn read_var_uint64() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_uint64();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[127]), Ok(127));
    assert_eq!(read(&[128]), Err(()));
    assert_eq!(read(&[128, 1]), Ok(128));
    assert_eq!(read(&[172, 2]), Ok(300));
    assert_eq!(read(&[255, 255, 255, 255, 15]), Ok(4294967295));
    assert_eq!(
        read(&[255, 255, 255, 255, 255, 255, 255, 255, 255, 1]),
        Ok(u64::MAX)
    );
    assert_eq!(
        read(&[255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 1]),
        Err(())
    );
}

#[test]
fn read_var_int32() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_int32();
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[4]), Ok(4));
    assert_eq!(read(&[255, 255, 255, 255, 7]), Ok(i32::MAX));
    assert_eq!(
        read(&[255, 255, 255, 255, 255, 255, 255, 255, 255, 1]),
        Ok(-1)
    );
    assert_eq!(
        read(&[128, 128, 128, 128, 248, 255, 255, 255, 255, 1]),
        Ok(i32::MIN)
    );
}

#[test]
fn read_key() {
    let read = |bytes| ByteBuffer::new(bytes).read_key();
    assert_eq!(read(&[8]), Ok((1, WireType::Varint)));
    assert_eq!(read(&[34]), Ok((4, WireType::LengthDelimited)));
    assert_eq!(read(&[122]), Ok((15, WireType::LengthDelimited)));
    assert_eq!(read(&[0]), Err(()));
    assert_eq!(read(&[14]), Err(()));
}

#[test]
fn read_string() {
    let read = |bytes| ByteBuffer::new(bytes).read_string();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(Cow::Borrowed("")));
    assert_eq!(read(&[2, 97, 98]), Ok(Cow::Borrowed("ab")));
    assert_eq!(read(&[3, 97, 98]), Err(()));
    assert_eq!(read(&[4, 240, 159, 141, 149]), Ok(Cow::Borrowed("🍕")));
    assert_eq!(read(&[3, 32, 255, 120]), Err(()));
    assert_eq!(read(&[2, 240, 159]), Err(()));
}

#[test]
fn skip() {
    let mut bb = ByteBuffer::new(&[150, 1, 1, 2, 3, 4, 5, 6, 7, 8, 2, 9, 9, 1, 2, 3, 4, 42]);
    assert_eq!(bb.skip(WireType::Varint), Ok(()));
    assert_eq!(bb.skip(WireType::Fixed64), Ok(()));
    assert_eq!(bb.skip(WireType::LengthDelimited), Ok(()));
    assert_eq!(bb.skip(WireType::Fixed32), Ok(()));
    assert_eq!(bb.read_byte(), Ok(42));
    assert!(bb.is_empty());
    assert_eq!(ByteBuffer::new(&[0]).skip(WireType::StartGroup), Err(()));
}

/// A protobuf byte buffer meant for writing.
///
/// Example usage:
///
/// ```
/// use proto_source_schema::ByteBufferMut;
/// let mut bb = ByteBufferMut::new();
/// bb.write_string(1, "foo");
/// bb.write_var_int32(2, 4);
/// assert_eq!(bb.data(), [10, 3, 102, 111, 111, 16, 4]);
/// ```
///
pub struct ByteBufferMut {
    data: Vec<u8>,
}

impl ByteBufferMut {
    /// Creates an empty ByteBufferMut ready for writing.
    pub fn new() -> ByteBufferMut {
        ByteBufferMut { data: vec![] }
    }

    /// Consumes this buffer and returns the underlying backing store. Use this
    /// to get the data out when you're done writing to the buffer.
    pub fn data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes to the end of the buffer.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
    }

    /// Write a bare base-128 varint to the end of the buffer.
    pub fn write_var_uint64(&mut self, mut value: u64) {
        loop {
            let byte = (value & 127) as u8;
            value >>= 7;

            if value == 0 {
                self.data.push(byte);
                return;
            }

            self.data.push(byte | 128);
        }
    }

    /// Write a field key for `field` with the given wire type.
    pub fn write_key(&mut self, field: u32, wire_type: WireType) {
        self.write_var_uint64(((field as u64) << 3) | wire_type as u64);
    }

    /// Write an `int32` field. Negative values are sign-extended to ten bytes
    /// the way protoc does.
    pub fn write_var_int32(&mut self, field: u32, value: i32) {
        self.write_key(field, WireType::Varint);
        self.write_var_uint64(value as i64 as u64);
    }

    /// Write a length-delimited field holding `value`.
    pub fn write_length_delimited(&mut self, field: u32, value: &[u8]) {
        self.write_key(field, WireType::LengthDelimited);
        self.write_var_uint64(value.len() as u64);
        self.write_bytes(value);
    }

    /// Write a string field.
    pub fn write_string(&mut self, field: u32, value: &str) {
        self.write_length_delimited(field, value.as_bytes());
    }

    /// Write a nested message field built by `build`.
    pub fn write_message(&mut self, field: u32, build: impl FnOnce(&mut ByteBufferMut)) {
        let mut nested = ByteBufferMut::new();
        build(&mut nested);
        self.write_length_delimited(field, &nested.data);
    }

    /// Write a packed repeated `int32` field.
    pub fn write_packed_int32(&mut self, field: u32, values: &[i32]) {
        let mut packed = ByteBufferMut::new();
        for &value in values {
            packed.write_var_uint64(value as i64 as u64);
        }
        self.write_length_delimited(field, &packed.data);
    }
}

impl Default for ByteBufferMut {
    fn default() -> Self {
        ByteBufferMut::new()
    }
}

#[cfg(test)]
fn write_once(cb: fn(&mut ByteBufferMut)) -> Vec<u8> {
    let mut bb = ByteBufferMut::new();
    cb(&mut bb);
    bb.data()
}

#[test]
fn write_var_uint64() {
    assert_eq!(write_once(|bb| bb.write_var_uint64(0)), [0]);
    assert_eq!(write_once(|bb| bb.write_var_uint64(127)), [127]);
    assert_eq!(write_once(|bb| bb.write_var_uint64(128)), [128, 1]);
    assert_eq!(write_once(|bb| bb.write_var_uint64(300)), [172, 2]);
    assert_eq!(
        write_once(|bb| bb.write_var_uint64(u64::MAX)),
        [255, 255, 255, 255, 255, 255, 255, 255, 255, 1]
    );
}

#[test]
fn write_var_int32() {
    assert_eq!(write_once(|bb| bb.write_var_int32(1, 0)), [8, 0]);
    assert_eq!(write_once(|bb| bb.write_var_int32(3, 150)), [24, 150, 1]);
    assert_eq!(
        write_once(|bb| bb.write_var_int32(1, -1)),
        [8, 255, 255, 255, 255, 255, 255, 255, 255, 255, 1]
    );
}

#[test]
fn write_packed_int32() {
    assert_eq!(
        write_once(|bb| bb.write_packed_int32(1, &[4, 0, 2, 1])),
        [10, 4, 4, 0, 2, 1]
    );
    assert_eq!(write_once(|bb| bb.write_packed_int32(2, &[])), [18, 0]);
}

#[test]
fn write_message() {
    let bytes = write_once(|bb| {
        bb.write_message(4, |msg| msg.write_string(1, "A"));
    });
    assert_eq!(bytes, [34, 3, 10, 1, 65]);
}

#[test]
fn write_then_read_sequence() {
    let mut out = ByteBufferMut::new();
    out.write_string(1, "file.proto");
    out.write_var_int32(2, -7);
    out.write_packed_int32(3, &[5, 1, 2, 0]);
    let data = out.data();

    let mut bb = ByteBuffer::new(&data);
    assert_eq!(bb.read_key(), Ok((1, WireType::LengthDelimited)));
    assert_eq!(bb.read_string(), Ok(Cow::Borrowed("file.proto")));
    assert_eq!(bb.read_key(), Ok((2, WireType::Varint)));
    assert_eq!(bb.read_var_int32(), Ok(-7));
    assert_eq!(bb.read_key(), Ok((3, WireType::LengthDelimited)));
    assert_eq!(bb.read_length_delimited(), Ok(vec![5, 1, 2, 0].as_slice()));
    assert!(bb.is_empty());
}
