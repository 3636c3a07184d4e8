use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One data row keyed by the raw header text, in sheet column order.
pub type Record = IndexMap<String, String>;

/// Spreadsheet resource, restricted to the fields we request.
#[derive(Debug, Clone, Deserialize)]
pub struct Spreadsheet {
    #[serde(rename = "spreadsheetId")]
    pub spreadsheet_id: String,
    #[serde(rename = "spreadsheetUrl", default)]
    pub spreadsheet_url: Option<String>,
    pub properties: SpreadsheetProperties,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Spreadsheet {
    /// Look up a worksheet by its tab title.
    pub fn worksheet(&self, title: &str) -> Option<&SheetProperties> {
        self.sheets
            .iter()
            .map(|s| &s.properties)
            .find(|p| p.title == title)
    }

    /// The first worksheet by tab position.
    pub fn first_worksheet(&self) -> Option<&SheetProperties> {
        self.sheets
            .iter()
            .map(|s| &s.properties)
            .min_by_key(|p| p.index)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpreadsheetProperties {
    pub title: String,
    #[serde(rename = "timeZone", default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetProperties {
    #[serde(rename = "sheetId")]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
    #[serde(rename = "gridProperties", default)]
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridProperties {
    #[serde(rename = "rowCount", default)]
    pub row_count: i64,
    #[serde(rename = "columnCount", default)]
    pub column_count: i64,
}

/// Response of `spreadsheets.values.get`.
///
/// Cells come back as JSON scalars; `values` is omitted entirely when the
/// range is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRange {
    pub range: String,
    #[serde(rename = "majorDimension", default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// Cells rendered as strings. Numbers and booleans keep their JSON text.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect()
    }
}

fn cell_to_string(cell: &serde_json::Value) -> String {
    match cell {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

/// Claims of the JWT bearer assertion sent to the token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}
