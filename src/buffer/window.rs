use std::path::Path;

use super::{BufferError, Storage};
use crate::{BYTES_PER_ROW, WINDOW_SIZE};

/// ファイルの一部を保持する固定長ウィンドウ
///
/// 先頭 `len` バイトだけが有効で、それ以降は常に0。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// バイトデータ
    bytes: [u8; WINDOW_SIZE],
    /// 有効なバイト数
    len: usize,
}

impl Window {
    /// 空のウィンドウを作成
    pub fn new() -> Self {
        Self {
            bytes: [0; WINDOW_SIZE],
            len: 0,
        }
    }

    /// バイト列から作成（WINDOW_SIZEを超える分は切り捨て）
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut window = Self::new();
        let len = data.len().min(WINDOW_SIZE);
        window.bytes[..len].copy_from_slice(&data[..len]);
        window.len = len;
        window
    }

    /// `line` 行目から読み込む
    ///
    /// 失敗した場合は元のウィンドウを変更しない。
    pub fn load<S: Storage>(storage: &S, path: &Path, line: usize) -> Result<Self, BufferError> {
        let mut bytes = [0; WINDOW_SIZE];
        let offset = (line * BYTES_PER_ROW) as u64;
        let len = storage.read_at(path, offset, &mut bytes)?;

        Ok(Self {
            bytes,
            len: len.min(WINDOW_SIZE),
        })
    }

    /// 有効なバイト数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// ウィンドウが埋まっているか（EOFに達していない）
    pub fn is_full(&self) -> bool {
        self.len == WINDOW_SIZE
    }

    /// 有効なバイト列
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// 表示する行数（最終行は端数でも1行）
    pub fn row_count(&self) -> usize {
        self.len.div_ceil(BYTES_PER_ROW)
    }

    /// 指定行のバイト列
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        self.rows().nth(index)
    }

    /// 行ごとのイテレータ
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes().chunks(BYTES_PER_ROW)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}
