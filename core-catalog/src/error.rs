use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Any transport, status, or decode failure while talking to the
    /// catalog service.
    #[error("Catalog fetch failed: {0}")]
    FetchFailed(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
