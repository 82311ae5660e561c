//! Positional, cursor-free access to an open tile file.
//!
//! Many request threads read from the same tile at once, so reads never go
//! through a shared seek position. On Unix this is `pread(2)`; on Windows
//! `seek_read` moves the handle's cursor, but every read supplies its own
//! offset so concurrent callers still see correct data.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use super::TileError;

/// An open tile file with its byte length captured at open time.
#[derive(Debug)]
pub struct TileFile {
    file: File,
    len: u64,
}

impl TileFile {
    /// Opens `path` read-only and records its size.
    pub fn open(path: &Path) -> Result<Self, TileError> {
        let open_err = |source: io::Error| TileError::Open {
            path: PathBuf::from(path),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();
        Ok(Self { file, len })
    }

    /// File size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true for a zero-byte file.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fills `buf` from `offset`, failing fast if the range leaves the file.
    pub fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<(), TileError> {
        let end = offset.checked_add(buf.len() as u64);
        match end {
            Some(end) if end <= self.len => {}
            _ => {
                return Err(TileError::OutOfBounds {
                    offset,
                    len: self.len,
                })
            }
        }
        read_at(&self.file, buf, offset)?;
        Ok(())
    }
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "failed to fill whole buffer",
                ))
            }
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_records_length() {
        let temp = write_temp(&[1, 2, 3, 4]);
        let tile = TileFile::open(temp.path()).unwrap();
        assert_eq!(tile.len(), 4);
        assert!(!tile.is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let result = TileFile::open(Path::new("/nonexistent/megt_n_512_1.img"));
        assert!(matches!(result, Err(TileError::Open { .. })));
    }

    #[test]
    fn test_read_exact_at_offset() {
        let temp = write_temp(&[0x00, 0x01, 0xAB, 0xCD]);
        let tile = TileFile::open(temp.path()).unwrap();

        let mut buf = [0u8; 2];
        tile.read_exact_at(&mut buf, 2).unwrap();
        assert_eq!(buf, [0xAB, 0xCD]);
    }

    #[test]
    fn test_read_past_end_fails_fast() {
        let temp = write_temp(&[0x00, 0x01, 0xAB, 0xCD]);
        let tile = TileFile::open(temp.path()).unwrap();

        let mut buf = [0u8; 2];
        let err = tile.read_exact_at(&mut buf, 3).unwrap_err();
        assert!(matches!(err, TileError::OutOfBounds { offset: 3, len: 4 }));
    }

    #[test]
    fn test_concurrent_reads_share_handle() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let temp = write_temp(&bytes);
        let tile = TileFile::open(temp.path()).unwrap();

        std::thread::scope(|scope| {
            for start in 0..8u64 {
                let tile = &tile;
                scope.spawn(move || {
                    for round in 0..100u64 {
                        let offset = (start * 31 + round * 7) % 255;
                        let mut buf = [0u8; 1];
                        tile.read_exact_at(&mut buf, offset).unwrap();
                        assert_eq!(buf[0] as u64, offset);
                    }
                });
            }
        });
    }
}
