//! hexview - Tiny windowed hex viewer
//!
//! This library provides the view model, storage access and widgets used by
//! the `hexview` binary. The viewer holds a 16-byte window of a file and
//! scrolls it one 4-byte row at a time.

pub mod app;
pub mod buffer;
pub mod config;
pub mod logging;
pub mod terminal;
pub mod ui;

/// 1行あたりのバイト数
pub const BYTES_PER_ROW: usize = 4;

/// ウィンドウの行数
pub const ROW_COUNT: usize = 4;

/// ウィンドウ全体のバイト数
pub const WINDOW_SIZE: usize = BYTES_PER_ROW * ROW_COUNT;
