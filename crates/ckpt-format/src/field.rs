//! Little-endian primitive reads.

use std::io::Read;

use crate::error::{DecodeError, Result};
use crate::format::{Field, FieldType};

/// Read exactly `N` bytes for `field`.
pub(crate) fn read_array<const N: usize, R: Read>(
    reader: &mut R,
    field: &'static str,
) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| DecodeError::from_read(e, field))?;
    Ok(bytes)
}

pub(crate) fn read_u32<R: Read>(reader: &mut R, field: &'static str) -> Result<u32> {
    read_array::<4, _>(reader, field).map(u32::from_le_bytes)
}

pub(crate) fn read_i32<R: Read>(reader: &mut R, field: &'static str) -> Result<i32> {
    read_array::<4, _>(reader, field).map(i32::from_le_bytes)
}

pub(crate) fn read_u64<R: Read>(reader: &mut R, field: &'static str) -> Result<u64> {
    read_array::<8, _>(reader, field).map(u64::from_le_bytes)
}

pub(crate) fn read_f64<R: Read>(reader: &mut R, field: &'static str) -> Result<f64> {
    read_array::<8, _>(reader, field).map(f64::from_le_bytes)
}

/// Walks a declared field sequence, reading each field in order.
///
/// Every read is checked against the declared type so the decoders cannot
/// drift from the layout table.
pub(crate) struct FieldCursor<'a, R> {
    reader: &'a mut R,
    fields: std::slice::Iter<'static, Field>,
}

impl<'a, R: Read> FieldCursor<'a, R> {
    pub(crate) fn new(reader: &'a mut R, fields: &'static [Field]) -> Self {
        Self {
            reader,
            fields: fields.iter(),
        }
    }

    fn expect(&mut self, ty: FieldType) -> Result<&'static str> {
        match self.fields.next() {
            Some(field) if field.ty == ty => Ok(field.name),
            Some(field) => Err(DecodeError::invalid(format!(
                "field {} is {:?}, not {ty:?}",
                field.name, field.ty
            ))),
            None => Err(DecodeError::invalid("read past the declared record layout")),
        }
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        let name = self.expect(FieldType::U32)?;
        read_u32(self.reader, name)
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        let name = self.expect(FieldType::U64)?;
        read_u64(self.reader, name)
    }

    pub(crate) fn f64(&mut self) -> Result<f64> {
        let name = self.expect(FieldType::F64)?;
        read_f64(self.reader, name)
    }

    /// Confirm that the whole declared layout was consumed.
    pub(crate) fn finish(mut self) -> Result<()> {
        match self.fields.next() {
            None => Ok(()),
            Some(field) => Err(DecodeError::invalid(format!(
                "field {} was declared but not read",
                field.name
            ))),
        }
    }
}
