//! Pure Google Sheets v4 REST API client.
//!
//! Authenticates as a Google service account and reads spreadsheet metadata
//! and cell values. Only the read-side of the API is covered.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheets_client::{ServiceAccountKey, SheetsClient};
//!
//! let key = ServiceAccountKey::from_file("excel_credentials.json")?;
//! let client = SheetsClient::from_service_account(key);
//!
//! let records = client.get_all_records("1AbC...", "VOIP").await?;
//! for record in &records {
//!     println!("{:?}", record.get("Part No"));
//! }
//! ```

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{ServiceAccountKey, SPREADSHEETS_SCOPE};
pub use error::{Result, SheetsError};
pub use types::{GridProperties, Record, SheetProperties, Spreadsheet, ValueRange};

use auth::TokenSource;
use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Fields requested from `spreadsheets.get` so we never pull grid data.
const SPREADSHEET_FIELDS: &str =
    "spreadsheetId,spreadsheetUrl,properties(title,timeZone),sheets(properties(sheetId,title,index,gridProperties))";

pub struct SheetsClient {
    client: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
}

impl SheetsClient {
    pub fn from_service_account(key: ServiceAccountKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens: TokenSource::service_account(key),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Use a pre-issued OAuth access token (no refresh).
    pub fn with_static_token(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens: TokenSource::Static(token),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (emulators, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Force a new access token on the next request.
    pub async fn refresh_connection(&self) {
        self.tokens.invalidate().await;
    }

    /// Fetch spreadsheet title, URL and worksheet properties.
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet> {
        let url = format!(
            "{}/spreadsheets/{}?fields={}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(SPREADSHEET_FIELDS)
        );
        self.get_json(&url).await
    }

    /// Fetch cell values for an A1 range, e.g. `'VOIP'!1:1`.
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}?majorDimension=ROWS",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        );
        self.get_json(&url).await
    }

    /// Header row of a worksheet.
    pub async fn get_headers(&self, spreadsheet_id: &str, worksheet: &str) -> Result<Vec<String>> {
        let range = format!("{}!1:1", quote_sheet_title(worksheet));
        let values = self.get_values(spreadsheet_id, &range).await?;
        Ok(values.rows().into_iter().next().unwrap_or_default())
    }

    /// Every data row of a worksheet keyed by header.
    ///
    /// The first row holds the headers. Rows shorter than the header row are
    /// padded with empty strings; cells beyond the last header are dropped.
    /// Blank rows inside the data are kept so callers can number rows.
    pub async fn get_all_records(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<Vec<Record>> {
        let values = self
            .get_values(spreadsheet_id, &quote_sheet_title(worksheet))
            .await?;

        let records = rows_to_records(values.rows());
        tracing::debug!(worksheet, count = records.len(), "Fetched worksheet records");
        Ok(records)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.tokens.access_token(&self.client).await?;
        let resp = self.client.get(url).bearer_auth(&token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.tokens.invalidate().await;
            }
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}

/// Quote a worksheet title for use in A1 notation.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Zip data rows with the header row.
pub fn rows_to_records(rows: Vec<Vec<String>>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let headers = match rows.next() {
        Some(headers) => headers,
        None => return Vec::new(),
    };

    rows.map(|row| {
        let mut cells = row.into_iter();
        headers
            .iter()
            .map(|header| (header.clone(), cells.next().unwrap_or_default()))
            .collect()
    })
    .collect()
}
