use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Location [{location}] does not exist")]
    LocationNotFound {
        location: String
    },
    #[error("Object [{key}] was not found")]
    ObjectNotFound {
        key: String
    },
    #[error("I/O error on [{path}]: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error
    }
}

impl StoreError {
    pub fn io(path: impl ToString, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::ObjectNotFound { key: path.to_string() }
        } else {
            Self::Io { path: path.to_string(), source }
        }
    }
}
