mod file_picker;
mod hex_view;

pub use file_picker::{FilePicker, PickerOutcome};
pub use hex_view::{HexView, ViewMode, HEX_COLUMN, TITLE};

use ratatui::{buffer::Buffer, layout::Rect, style::Color, style::Style};

/// 配色
pub struct Colors;

impl Colors {
    pub const TITLE: Color = Color::White;
    pub const ADDR: Color = Color::Cyan;
    pub const TEXT: Color = Color::Green;
    pub const HEX_ZERO: Color = Color::DarkGray;
    pub const HEX_HIGH: Color = Color::Red;
    pub const HEX_PRINTABLE: Color = Color::White;
    pub const HEX_NORMAL: Color = Color::Yellow;
    pub const DIR: Color = Color::Blue;
    pub const SELECTION_BG: Color = Color::DarkGray;
    pub const MESSAGE: Color = Color::Red;
}

/// 領域からはみ出さないように文字列を書き込む
pub(crate) fn put_str(buf: &mut Buffer, area: Rect, x: u16, y: u16, s: &str, style: Style) {
    if y < area.top() || y >= area.bottom() || x < area.left() || x >= area.right() {
        return;
    }
    buf.set_stringn(x, y, s, (area.right() - x) as usize, style);
}
