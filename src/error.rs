use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network Error: {0}")]
    Network(#[from] reqwest::Error),
}
