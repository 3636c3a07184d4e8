use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetsError>;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Token exchange failed: {0}")]
    Auth(String),

    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),
}
