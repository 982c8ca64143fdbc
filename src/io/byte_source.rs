use std::fs::File;
use std::io;
#[cfg(all(not(unix), not(windows)))]
use std::io::{Read, Seek, SeekFrom};

/// A thread-safe, random-access source of LRF bytes.
///
/// Objects are fetched one at a time by `(offset, size)` from the object
/// index, so sources never need a cursor.
pub trait ByteSource: Send + Sync {
    /// Returns the total length of the source.
    fn len(&self) -> u64;

    /// Returns true if the source is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads bytes starting at `offset` into the provided buffer.
    /// Returns the number of bytes read (must be exactly `buf.len()` or error).
    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads exactly `len` bytes starting at `offset`.
    fn read_at(&self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let read = self.read_at_into(offset, &mut buf)?;
        if read != len {
            return Err(short_read(offset, len as u64, self.len()));
        }
        Ok(buf)
    }

    /// Reads the byte range of one indexed record, checking it against the
    /// source length first so a corrupt index cannot trigger a huge allocation.
    fn read_range(&self, offset: u64, size: u64) -> io::Result<Vec<u8>> {
        let end = offset.checked_add(size);
        if end.is_none_or(|end| end > self.len()) {
            return Err(short_read(offset, size, self.len()));
        }
        self.read_at(offset, size as usize)
    }
}

fn short_read(offset: u64, size: u64, len: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("range {offset:#x}+{size} runs past the end of the {len} byte source"),
    )
}

// --- Implementation: Local File ---

/// An LRF file on disk, read with positional reads.
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    pub fn new(file: File) -> io::Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }
}

#[cfg(unix)]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)?;
        Ok(buf.len())
    }
}

#[cfg(windows)]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;
        let read = self.file.seek_read(buf, offset)?;
        if read != buf.len() {
            return Err(short_read(offset, buf.len() as u64, self.len));
        }
        Ok(read)
    }
}

#[cfg(all(not(unix), not(windows)))]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut file = self.file.try_clone()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(buf.len())
    }
}

// --- Implementation: In-Memory ---

/// An in-memory book, e.g. bytes handed over from JavaScript.
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at_into(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let Some(slice) = start
            .checked_add(buf.len())
            .and_then(|end| self.data.get(start..end))
        else {
            return Err(short_read(offset, buf.len() as u64, self.len()));
        };
        buf.copy_from_slice(slice);
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_read_at() {
        let source = MemorySource::new(b"L\0R\0F\0\0\0".to_vec());
        assert_eq!(source.read_at(2, 2).unwrap(), b"R\0");
    }

    #[test]
    fn test_memory_source_rejects_range_past_end() {
        let source = MemorySource::new(vec![0u8; 16]);
        assert!(source.read_range(8, 8).is_ok());
        let err = source.read_range(8, 9).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(source.read_range(u64::MAX, 2).is_err());
    }

    #[test]
    fn test_file_source_reads_positionally() {
        use std::io::Write;

        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"\x00\xF5\x01\xF5").unwrap();
        let source = FileSource::new(file).unwrap();
        assert_eq!(source.len(), 4);
        assert_eq!(source.read_range(2, 2).unwrap(), b"\x01\xF5");
        assert_eq!(source.read_range(0, 2).unwrap(), b"\x00\xF5");
    }
}
