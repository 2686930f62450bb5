use super::ReaderError;

/// Bounds-checked little-endian cursor over an account buffer.
///
/// All field reads funnel through [`Reader::read_bytes_ref`], which is the
/// single place where the remaining length is checked.
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, total: 0 }
    }

    /// Borrow the next `n` bytes and advance the cursor.
    pub fn read_bytes_ref(&mut self, n: usize) -> Result<&'a [u8], ReaderError> {
        let remaining = self.size();
        if n > remaining {
            return Err(ReaderError::InvalidSize {
                needed: n,
                remaining,
            });
        }

        let bytes = &self.bytes[self.total..self.total + n];
        self.total += n;
        Ok(bytes)
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ReaderError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes_ref(N)?);
        Ok(array)
    }

    /// Advance past `n` bytes without interpreting them.
    pub fn skip(&mut self, n: usize) -> Result<(), ReaderError> {
        self.read_bytes_ref(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        Ok(self.read_bytes::<1>()?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        Ok(u32::from_le_bytes(self.read_bytes()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        Ok(u64::from_le_bytes(self.read_bytes()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, ReaderError> {
        Ok(i64::from_le_bytes(self.read_bytes()?))
    }

    /// Strict boolean: only `0` and `1` are accepted.
    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ReaderError::InvalidBool(other)),
        }
    }

    /// Read a `u32` length-prefixed UTF-8 string of at most `max` bytes.
    ///
    /// The length is validated against `max` and against the remaining
    /// buffer before anything is allocated.
    pub fn read_string_with_limit(&mut self, max: usize) -> Result<String, ReaderError> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(ReaderError::ExceedsMaxBytesSize { len, max });
        }

        let bytes = self.read_bytes_ref(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ReaderError::InvalidUtf8)
    }

    /// Bytes consumed so far.
    pub fn total_read(&self) -> usize {
        self.total
    }

    /// Bytes left to read.
    pub fn size(&self) -> usize {
        self.bytes.len() - self.total
    }
}
