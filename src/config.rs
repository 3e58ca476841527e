use std::path::{Path, PathBuf};

use clap::Parser;

/// Tiny windowed hex viewer
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "hexview")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// File to open (skips the file picker)
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Directory the file picker starts in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Extension filter for the file picker ("*" shows every file)
    #[arg(short, long, value_name = "EXT", default_value = "*")]
    extension: String,

    /// Append logs to this file (RUST_LOG sets the level)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Config {
    /// 直接開くファイル（空文字列は未指定扱い）
    pub fn file(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }

    pub fn start_dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            dir: PathBuf::from("."),
            extension: "*".to_string(),
            log_file: None,
        }
    }
}
