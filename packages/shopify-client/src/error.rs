use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShopifyError>;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Shopify API error ({status}): {message}")]
    Api { status: u16, message: String },
}
