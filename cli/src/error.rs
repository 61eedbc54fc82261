use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to write bundle {}: {source}", path.display())]
    WriteBundle {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Level(#[from] gobundle_ast::AstError),

    #[error(transparent)]
    Core(#[from] gobundle_core::CoreError),
}
