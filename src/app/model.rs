use std::path::Path;

use crate::buffer::{BufferError, Storage, Window};
use crate::ui::ViewMode;
use crate::BYTES_PER_ROW;

/// ビューアの表示状態（描画スレッドと共有される）
#[derive(Debug, Clone, Default)]
pub struct ViewerModel {
    /// 読み込み済みのウィンドウ
    window: Window,
    /// 先頭行の行番号
    line: usize,
    /// HEX/ASCIIモード
    mode: ViewMode,
}

impl ViewerModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み込み済みのウィンドウから作成
    pub fn with_window(window: Window, line: usize) -> Self {
        Self {
            window,
            line,
            mode: ViewMode::default(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// ウィンドウ先頭のファイルオフセット
    pub fn offset(&self) -> usize {
        self.line * BYTES_PER_ROW
    }

    /// ウィンドウ内 `row` 行目のファイルアドレス
    pub fn row_address(&self, row: usize) -> usize {
        (self.line + row) * BYTES_PER_ROW
    }

    /// 現在の行から読み直す
    pub fn reload<S: Storage>(&mut self, storage: &S, path: &Path) -> Result<(), BufferError> {
        self.window = Window::load(storage, path, self.line)?;
        Ok(())
    }

    /// 1行戻る（先頭では動かない）
    pub fn scroll_up<S: Storage>(&mut self, storage: &S, path: &Path) -> Result<(), BufferError> {
        if self.line > 0 {
            self.line -= 1;
        }
        self.reload(storage, path)
    }

    /// 1行進む（ウィンドウが埋まっていない＝EOFなら動かない）
    pub fn scroll_down<S: Storage>(&mut self, storage: &S, path: &Path) -> Result<(), BufferError> {
        if self.window.is_full() {
            self.line += 1;
        }
        self.reload(storage, path)
    }

    /// HEX <-> ASCII
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ViewMode::Hex => ViewMode::Ascii,
            ViewMode::Ascii => ViewMode::Hex,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::buffer::FsStorage;

    fn file_with_len(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
        file.write_all(&data).unwrap();
        file
    }

    #[test]
    fn scroll_down_advances_one_row() {
        let file = file_with_len(40);
        let mut model = ViewerModel::new();
        model.reload(&FsStorage, file.path()).unwrap();

        model.scroll_down(&FsStorage, file.path()).unwrap();

        assert_eq!(model.line(), 1);
        assert_eq!(model.offset(), 4);
        assert_eq!(model.window().bytes()[0], 4);
    }

    #[test]
    fn scroll_down_stops_at_short_window() {
        let file = file_with_len(20);
        let mut model = ViewerModel::new();
        model.reload(&FsStorage, file.path()).unwrap();

        for _ in 0..10 {
            model.scroll_down(&FsStorage, file.path()).unwrap();
        }

        // 16バイト読めるのは1行目まで。2行目で12バイトになり止まる
        assert_eq!(model.line(), 2);
        assert_eq!(model.window().len(), 12);
    }

    #[test]
    fn small_file_never_scrolls() {
        let file = file_with_len(5);
        let mut model = ViewerModel::new();
        model.reload(&FsStorage, file.path()).unwrap();

        model.scroll_down(&FsStorage, file.path()).unwrap();

        assert_eq!(model.line(), 0);
        assert_eq!(model.window().row_count(), 2);
    }

    #[test]
    fn scroll_up_at_top_stays() {
        let file = file_with_len(40);
        let mut model = ViewerModel::new();
        model.reload(&FsStorage, file.path()).unwrap();

        model.scroll_up(&FsStorage, file.path()).unwrap();
        assert_eq!(model.line(), 0);

        model.scroll_down(&FsStorage, file.path()).unwrap();
        model.scroll_down(&FsStorage, file.path()).unwrap();
        model.scroll_up(&FsStorage, file.path()).unwrap();
        assert_eq!(model.line(), 1);
        assert_eq!(model.row_address(2), 12);
    }

    #[test]
    fn toggle_mode_keeps_window() {
        let file = file_with_len(8);
        let mut model = ViewerModel::new();
        model.reload(&FsStorage, file.path()).unwrap();
        let before = model.window().clone();

        model.toggle_mode();
        assert_eq!(model.mode(), ViewMode::Ascii);
        model.toggle_mode();
        assert_eq!(model.mode(), ViewMode::Hex);
        assert_eq!(model.window(), &before);
    }

    #[test]
    fn reload_failure_keeps_window() {
        let file = file_with_len(16);
        let mut model = ViewerModel::new();
        model.reload(&FsStorage, file.path()).unwrap();
        let path = file.path().to_path_buf();
        drop(file);

        let result = model.scroll_down(&FsStorage, &path);

        assert!(result.is_err());
        assert_eq!(model.line(), 1);
        assert_eq!(model.window().len(), 16);
    }
}
