use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("required element #{id} is missing from the page")]
    MissingElement { id: &'static str },
}
