use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::{put_str, Colors};
use crate::app::ViewerModel;

/// ヘッダーに表示するタイトル
pub const TITLE: &str = "HexViewer";

/// HEX列の開始位置（アドレスが4桁に収まる場合）
pub const HEX_COLUMN: u16 = 6;

/// アドレス列とHEX列の間隔
const COLUMN_GAP: usize = 2;

/// 最初のデータ行（タイトルの下に1行空ける）
const TOP_OFFSET: u16 = 2;

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// アドレス + HEX
    #[default]
    Hex,
    /// 文字 + HEX
    Ascii,
}

/// HEX/ASCII表示ウィジェット
pub struct HexView<'a> {
    model: &'a ViewerModel,
}

impl<'a> HexView<'a> {
    pub fn new(model: &'a ViewerModel) -> Self {
        Self { model }
    }

    /// アドレス文字列を生成（10進数、最低4桁）
    fn format_addr(addr: usize, width: usize) -> String {
        format!("{:0width$}", addr, width = width)
    }

    /// アドレス列の桁数（ウィンドウ内の最大アドレスに合わせる）
    fn addr_width(&self) -> usize {
        let last_row = self.model.window().row_count().saturating_sub(1);
        self.model.row_address(last_row).to_string().len().max(4)
    }

    /// HEX列の開始位置
    ///
    /// ウィンドウ内で最も大きいアドレスの桁数に合わせて広げる。
    fn hex_column(&self) -> usize {
        (self.addr_width() + COLUMN_GAP).max(HEX_COLUMN as usize)
    }

    /// 表示可能な文字以外を '.' に置き換える
    fn format_text(row: &[u8]) -> String {
        row.iter()
            .map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '.' })
            .collect()
    }

    fn format_hex(row: &[u8]) -> String {
        row.iter().map(|b| format!("{:02X} ", b)).collect()
    }

    /// バイト値に応じた色を取得
    fn byte_color(byte: u8) -> Color {
        match byte {
            0x00 => Colors::HEX_ZERO,
            0xFF => Colors::HEX_HIGH,
            0x20..=0x7E => Colors::HEX_PRINTABLE,
            _ => Colors::HEX_NORMAL,
        }
    }

    /// 1行分のデータを描画
    fn render_row(&self, index: usize, row: &[u8], area: Rect, buf: &mut Buffer) {
        let y = area.y + TOP_OFFSET + index as u16;

        // 左列: アドレスまたは文字
        match self.model.mode() {
            ViewMode::Hex => {
                let addr = Self::format_addr(self.model.row_address(index), self.addr_width());
                put_str(buf, area, area.x, y, &addr, Style::default().fg(Colors::ADDR));
            }
            ViewMode::Ascii => {
                let text = Self::format_text(row);
                put_str(buf, area, area.x, y, &text, Style::default().fg(Colors::TEXT));
            }
        }

        // HEX表示（モードに関係なく常に表示）
        let mut x = area.x.saturating_add(self.hex_column() as u16);
        for &byte in row {
            let hex = format!("{:02X} ", byte);
            put_str(buf, area, x, y, &hex, Style::default().fg(Self::byte_color(byte)));
            x += 3; // "XX "
        }
    }

    /// 行をプレーンテキストで生成
    pub fn row_text(&self, index: usize) -> Option<String> {
        let row = self.model.window().row(index)?;
        let left = match self.model.mode() {
            ViewMode::Hex => Self::format_addr(self.model.row_address(index), self.addr_width()),
            ViewMode::Ascii => Self::format_text(row),
        };
        Some(format!(
            "{:<width$}{}",
            left,
            Self::format_hex(row),
            width = self.hex_column()
        ))
    }
}

impl Widget for HexView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // タイトル行
        put_str(
            buf,
            area,
            area.x,
            area.y,
            TITLE,
            Style::default()
                .fg(Colors::TITLE)
                .add_modifier(Modifier::BOLD),
        );

        // データ行を描画
        for (index, row) in self.model.window().rows().enumerate() {
            self.render_row(index, row, area, buf);
        }
    }
}
