use std::io;

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

/// スコープを抜けるときに後処理を1回だけ実行する
///
/// 途中で `?` で抜けても実行される。
pub struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    /// 今すぐ後処理を実行する
    pub fn restore(mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// ターミナルを元に戻す（失敗しても続ける）
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// raw モードに入った直後から後処理を仕掛ける
pub fn terminal_guard() -> RestoreGuard<fn()> {
    RestoreGuard::new(restore_terminal as fn())
}
