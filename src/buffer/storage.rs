use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use super::BufferError;

/// ファイル内容へのアクセス
///
/// ビューアはファイル全体を保持せず、必要な範囲だけをこのトレイト経由で読む。
pub trait Storage {
    /// `offset` から最大 `buf.len()` バイトを読み込み、読めたバイト数を返す
    ///
    /// 要求より少ないバイト数が返るのはファイル末尾に達した場合のみ。
    fn read_at(&self, path: &Path, offset: u64, buf: &mut [u8]) -> Result<usize, BufferError>;
}

/// ローカルファイルシステム上のストレージ
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn read_at(&self, path: &Path, offset: u64, buf: &mut [u8]) -> Result<usize, BufferError> {
        // 読み込みごとに開き直す（ハンドルは保持しない）
        let mut file = File::open(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        file.seek(SeekFrom::Start(offset))
            .map_err(|source| BufferError::Seek {
                path: path.to_path_buf(),
                offset,
                source,
            })?;

        // バッファが埋まるかEOFまで読む
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(BufferError::Read {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
        }

        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_from_offset() {
        let file = temp_file(b"0123456789");
        let mut buf = [0u8; 4];

        let n = FsStorage::new().read_at(file.path(), 4, &mut buf).unwrap();

        assert_eq!(n, 4);
        assert_eq!(&buf, b"4567");
    }

    #[test]
    fn short_read_at_end_of_file() {
        let file = temp_file(b"0123456789");
        let mut buf = [0u8; 16];

        let n = FsStorage::new().read_at(file.path(), 8, &mut buf).unwrap();

        assert_eq!(n, 2);
        assert_eq!(&buf[..2], b"89");
    }

    #[test]
    fn offset_past_end_reads_nothing() {
        let file = temp_file(b"abc");
        let mut buf = [0u8; 16];

        let n = FsStorage::new().read_at(file.path(), 100, &mut buf).unwrap();

        assert_eq!(n, 0);
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let mut buf = [0u8; 16];

        let err = FsStorage::new().read_at(&path, 0, &mut buf).unwrap_err();

        assert!(matches!(err, BufferError::Open { .. }));
        assert!(err.to_string().contains("missing.bin"));
    }
}
