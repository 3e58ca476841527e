use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

/// ログの出力先
///
/// 画面は代替スクリーンで使うので、stderr には書かない。
/// ファイル未指定なら捨てる。
pub fn target(log_file: Option<&Path>) -> Result<Target> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("unable to open log file {}", path.display()))?;
            Ok(Target::Pipe(Box::new(file)))
        }
        None => Ok(Target::Pipe(Box::new(io::sink()))),
    }
}

/// ロガーを初期化
///
/// ログファイル指定時は info 以上を追記する。RUST_LOG でレベルを変えられる。
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(target(log_file)?)
        .try_init()
        .context("failed to initialise logger")
}
