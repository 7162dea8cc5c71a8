use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCategoryError {
    #[error("Unknown {kind} code [{value}]")]
    UnknownCode {
        kind: &'static str,
        value: String
    }
}

impl ParseCategoryError {
    pub fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownCode { kind, value: value.to_string() }
    }
}
