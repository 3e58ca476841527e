mod model;
mod state;

pub use model::ViewerModel;
pub use state::{spawn_input_thread, App, InputThread, INPUT_QUEUE_CAPACITY};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// ハードウェアボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Ok,
    Back,
}

impl Button {
    /// キーコードからボタンに変換
    pub fn from_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        // 修飾キー付きは無視（C-c だけは Back 扱い）
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match key {
                KeyCode::Char('c') => Some(Button::Back),
                _ => None,
            };
        }
        if modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        match key {
            // 矢印キー
            KeyCode::Up | KeyCode::Char('k') => Some(Button::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Button::Down),
            KeyCode::Left | KeyCode::Char('h') => Some(Button::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(Button::Right),

            KeyCode::Enter | KeyCode::Char(' ') => Some(Button::Ok),

            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => Some(Button::Back),

            _ => None,
        }
    }
}

/// 入力イベントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Press,
    Release,
    /// 短押し（通常のキー入力）
    Short,
    /// 長押し
    Long,
    /// キーリピート
    Repeat,
}

/// ボタン入力イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub button: Button,
    pub kind: InputType,
}

impl InputEvent {
    pub fn new(button: Button, kind: InputType) -> Self {
        Self { button, kind }
    }

    /// 短押しイベント
    pub fn short(button: Button) -> Self {
        Self::new(button, InputType::Short)
    }

    /// ターミナルのキーイベントから変換
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        let button = Button::from_key(key.code, key.modifiers)?;
        let kind = match key.kind {
            KeyEventKind::Press => InputType::Short,
            KeyEventKind::Repeat => InputType::Repeat,
            KeyEventKind::Release => InputType::Release,
        };
        Some(Self::new(button, kind))
    }
}

/// 入力キューに流れるイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Input(InputEvent),
    /// 画面サイズ変更（再描画のみ）
    Resize,
}

/// アプリケーションアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    ToggleMode, // HEX <-> ASCII
    None,
}

impl Action {
    /// 入力イベントからアクションに変換（短押しのみ有効）
    pub fn from_input(event: InputEvent) -> Self {
        if event.kind != InputType::Short {
            return Action::None;
        }

        match event.button {
            Button::Back => Action::Quit,
            Button::Up => Action::ScrollUp,
            Button::Down => Action::ScrollDown,
            Button::Left | Button::Right => Action::ToggleMode,
            Button::Ok => Action::None,
        }
    }
}
