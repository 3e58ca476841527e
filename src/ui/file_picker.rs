//! ファイル選択ダイアログ
//!
//! ディレクトリを1階層ずつ辿ってファイルを1つ選ぶ。拡張子フィルタは
//! `"*"` で全ファイル。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
    Terminal,
};

use super::{put_str, Colors};
use crate::app::{Button, HostEvent, InputEvent, InputType};

/// ダイアログの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// 選択中
    Pending,
    Selected(PathBuf),
    Cancelled,
}

/// ディレクトリエントリ
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// ファイル選択ダイアログの状態
#[derive(Debug)]
pub struct FilePicker {
    /// 現在のディレクトリ
    dir: PathBuf,
    /// 拡張子フィルタ（None = 全ファイル）
    extension: Option<String>,
    entries: Vec<Entry>,
    /// 選択中のエントリ
    selected: usize,
    /// エラーメッセージ
    message: Option<String>,
}

impl FilePicker {
    /// `start_dir` を開く
    pub fn new(start_dir: impl AsRef<Path>, extension: &str) -> io::Result<Self> {
        let start_dir = start_dir.as_ref();
        let dir = fs::canonicalize(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());

        let mut picker = Self {
            dir: PathBuf::new(),
            extension: normalize_extension(extension),
            entries: Vec::new(),
            selected: 0,
            message: None,
        };
        picker.change_dir(dir)?;
        Ok(picker)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 選択中のエントリのパス
    pub fn selected_path(&self) -> Option<&Path> {
        self.entries.get(self.selected).map(|e| e.path.as_path())
    }

    /// 表示中のエントリ名
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
        }
    }

    /// ディレクトリを読み込んでエントリを更新
    fn change_dir(&mut self, dir: PathBuf) -> io::Result<()> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in fs::read_dir(&dir)? {
            // 読めないエントリは飛ばす
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = path.is_dir();

            if is_dir {
                dirs.push(Entry { name, path, is_dir });
            } else if self.matches_extension(&path) {
                files.push(Entry { name, path, is_dir });
            }
        }

        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
        if let Some(parent) = dir.parent() {
            entries.push(Entry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }
        entries.extend(dirs);
        entries.extend(files);

        debug!("Listed {} entries in {}", entries.len(), dir.display());
        self.dir = dir;
        self.entries = entries;
        self.selected = 0;
        self.message = None;
        Ok(())
    }

    /// ディレクトリを移動（失敗時はメッセージを表示して留まる）
    fn enter(&mut self, dir: PathBuf) {
        if let Err(e) = self.change_dir(dir.clone()) {
            warn!("Unable to open directory {}: {}", dir.display(), e);
            self.message = Some(format!("Cannot open: {}", e));
        }
    }

    fn go_parent(&mut self) {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.enter(parent);
        }
    }

    /// 入力イベントを処理
    pub fn handle(&mut self, event: InputEvent) -> PickerOutcome {
        // キーリピートでもカーソルは動かす
        if !matches!(event.kind, InputType::Short | InputType::Repeat) {
            return PickerOutcome::Pending;
        }

        match event.button {
            Button::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            Button::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            Button::Left => self.go_parent(),
            Button::Ok | Button::Right => {
                if let Some(entry) = self.entries.get(self.selected).cloned() {
                    if entry.is_dir {
                        self.enter(entry.path);
                    } else {
                        return PickerOutcome::Selected(entry.path);
                    }
                }
            }
            Button::Back if event.kind == InputType::Short => return PickerOutcome::Cancelled,
            Button::Back => {}
        }

        PickerOutcome::Pending
    }

    /// ダイアログを表示してファイルが選ばれるまで待つ
    ///
    /// キャンセルまたは入力が途絶えた場合は `None`。
    pub fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
        events: &Receiver<HostEvent>,
    ) -> Result<Option<PathBuf>> {
        loop {
            terminal
                .draw(|f| f.render_widget(&self, f.area()))
                .context("failed to draw file picker")?;

            let Ok(event) = events.recv() else {
                return Ok(None);
            };

            if let HostEvent::Input(input) = event {
                match self.handle(input) {
                    PickerOutcome::Pending => {}
                    PickerOutcome::Selected(path) => {
                        info!("Selected {}", path.display());
                        return Ok(Some(path));
                    }
                    PickerOutcome::Cancelled => {
                        info!("No file selected");
                        return Ok(None);
                    }
                }
            }
        }
    }
}

impl Widget for &FilePicker {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" {} ", self.dir.display());
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        // メッセージ行を確保
        let list_height = if self.message.is_some() {
            inner.height.saturating_sub(1)
        } else {
            inner.height
        } as usize;

        // 選択行が見えるようにスクロール
        let first = if list_height == 0 {
            0
        } else {
            self.selected.saturating_sub(list_height - 1)
        };

        for (row, (index, entry)) in self
            .entries
            .iter()
            .enumerate()
            .skip(first)
            .take(list_height)
            .enumerate()
        {
            let y = inner.y + row as u16;
            let mut style = if entry.is_dir {
                Style::default().fg(Colors::DIR)
            } else {
                Style::default()
            };
            if index == self.selected {
                style = style.bg(Colors::SELECTION_BG).add_modifier(Modifier::BOLD);
            }

            let label = if entry.is_dir && entry.name != ".." {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            put_str(buf, inner, inner.x, y, &label, style);
        }

        if let Some(ref msg) = self.message {
            let y = inner.bottom().saturating_sub(1);
            put_str(buf, inner, inner.x, y, msg, Style::default().fg(Colors::MESSAGE));
        }
    }
}

/// `"*.bin"` / `".bin"` / `"bin"` -> `Some("bin")`、`"*"` -> `None`
fn normalize_extension(extension: &str) -> Option<String> {
    let ext = extension.trim().trim_start_matches('*').trim_start_matches('.');
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.bin"), b"\x01\x02").unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.bin"), b"x").unwrap();
        dir
    }

    fn press(picker: &mut FilePicker, button: Button) -> PickerOutcome {
        picker.handle(InputEvent::short(button))
    }

    #[test]
    fn normalize_extension_forms() {
        assert_eq!(normalize_extension("*"), None);
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("*.bin").as_deref(), Some("bin"));
        assert_eq!(normalize_extension(".bin").as_deref(), Some("bin"));
        assert_eq!(normalize_extension("bin").as_deref(), Some("bin"));
    }

    #[test]
    fn lists_dirs_first_then_files() {
        let dir = setup();
        let picker = FilePicker::new(dir.path(), "*").unwrap();

        assert_eq!(picker.entry_names(), vec!["..", "sub", "a.txt", "b.bin"]);
    }

    #[test]
    fn extension_filter_keeps_dirs() {
        let dir = setup();
        let picker = FilePicker::new(dir.path(), "*.BIN").unwrap();

        assert_eq!(picker.entry_names(), vec!["..", "sub", "b.bin"]);
    }

    #[test]
    fn select_file() {
        let dir = setup();
        let mut picker = FilePicker::new(dir.path(), "*").unwrap();

        press(&mut picker, Button::Down);
        press(&mut picker, Button::Down);
        press(&mut picker, Button::Down);
        // 末尾で止まる
        press(&mut picker, Button::Down);

        match press(&mut picker, Button::Ok) {
            PickerOutcome::Selected(path) => {
                assert_eq!(path.file_name().unwrap(), "b.bin");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn enter_and_leave_directory() {
        let dir = setup();
        let mut picker = FilePicker::new(dir.path(), "*").unwrap();
        let root = picker.dir().to_path_buf();

        press(&mut picker, Button::Down);
        assert_eq!(press(&mut picker, Button::Right), PickerOutcome::Pending);
        assert_eq!(picker.dir(), root.join("sub"));
        assert_eq!(picker.entry_names(), vec!["..", "inner.bin"]);

        press(&mut picker, Button::Left);
        assert_eq!(picker.dir(), root);

        // ".." でも親に戻る
        press(&mut picker, Button::Down);
        press(&mut picker, Button::Ok);
        press(&mut picker, Button::Ok);
        assert_eq!(picker.dir(), root);
    }

    #[test]
    fn back_cancels_only_on_short_press() {
        let dir = setup();
        let mut picker = FilePicker::new(dir.path(), "*").unwrap();

        assert_eq!(
            picker.handle(InputEvent::new(Button::Back, InputType::Repeat)),
            PickerOutcome::Pending
        );
        assert_eq!(press(&mut picker, Button::Back), PickerOutcome::Cancelled);
    }

    #[test]
    fn missing_start_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FilePicker::new(dir.path().join("nope"), "*").is_err());
    }

    #[test]
    fn run_returns_selection() {
        let dir = setup();
        let picker = FilePicker::new(dir.path(), "bin").unwrap();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let (tx, rx) = mpsc::sync_channel(8);

        tx.send(HostEvent::Resize).unwrap();
        tx.send(HostEvent::Input(InputEvent::short(Button::Down))).unwrap();
        tx.send(HostEvent::Input(InputEvent::short(Button::Down))).unwrap();
        tx.send(HostEvent::Input(InputEvent::short(Button::Ok))).unwrap();

        let path = picker.run(&mut terminal, &rx).unwrap();

        assert_eq!(path.unwrap().file_name().unwrap(), "b.bin");
    }

    #[test]
    fn run_returns_none_when_input_closes() {
        let dir = setup();
        let picker = FilePicker::new(dir.path(), "*").unwrap();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let (tx, rx) = mpsc::sync_channel::<HostEvent>(8);
        drop(tx);

        assert_eq!(picker.run(&mut terminal, &rx).unwrap(), None);
    }

    #[test]
    fn render_highlights_selection() {
        let dir = setup();
        let mut picker = FilePicker::new(dir.path(), "*").unwrap();
        press(&mut picker, Button::Down);

        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        (&picker).render(area, &mut buf);

        let row: String = (1..5)
            .map(|x| buf.cell((x, 2)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        assert_eq!(row, "sub/");
        assert_eq!(buf.cell((1, 2)).unwrap().bg, Colors::SELECTION_BG);
    }
}
