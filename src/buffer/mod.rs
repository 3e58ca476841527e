mod storage;
mod window;

pub use storage::{FsStorage, Storage};
pub use window::Window;

use std::path::PathBuf;

use thiserror::Error;

/// ファイル読み込みのエラー
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to seek {} to {offset}: {source}", path.display())]
    Seek {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
