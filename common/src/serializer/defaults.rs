use super::{Reader, ReaderError, Serializer, Writer};

impl Serializer for u64 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u64()
    }

    fn size(&self) -> usize {
        8
    }
}

impl Serializer for bool {
    fn write(&self, writer: &mut Writer) {
        writer.write_bool(*self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bool()
    }

    fn size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_is_big_endian() {
        assert_eq!(258u64.to_bytes(), vec![0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(u64::from_bytes(&[0, 0, 0, 0, 0, 0, 1, 2]), Ok(258));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        assert_eq!(
            u64::from_bytes(&[0, 0, 0, 0, 0, 0, 0, 1, 9]),
            Err(ReaderError::InvalidSize)
        );
        assert_eq!(u64::from_bytes(&[1, 2, 3]), Err(ReaderError::InvalidSize));
    }

    #[test]
    fn test_bool_strict_decoding() {
        assert_eq!(bool::from_bytes(&[1]), Ok(true));
        assert_eq!(bool::from_bytes(&[0]), Ok(false));
        assert_eq!(bool::from_bytes(&[2]), Err(ReaderError::InvalidValue));
    }

    #[test]
    fn test_writer_total_write() {
        let mut buffer = vec![0xff];
        let mut writer = Writer::new(&mut buffer);
        writer.write_u64(&7);
        writer.write_bool(true);
        assert_eq!(writer.total_write(), 9);
        assert_eq!(buffer.len(), 10);
    }
}
