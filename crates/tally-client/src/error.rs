use std::io;
use std::path::PathBuf;

use thiserror::Error;

use tally_transfer::TransferError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Need to enter address and a port")]
    MissingArguments,

    #[error("cannot read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is empty", .path.display())]
    EmptyFile { path: PathBuf },

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl ClientError {
    /// Errors that end the client instead of returning to the menu.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::Transfer(TransferError::Resolve { .. } | TransferError::Bind { .. })
        )
    }
}
