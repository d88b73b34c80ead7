use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed resolving web root directory {}", path.display())]
    RootDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("web root '{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("failed binding web server on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed configuring listener")]
    Listener(#[source] io::Error),
    #[error("failed installing interrupt handler")]
    Signal(#[source] io::Error),
}
