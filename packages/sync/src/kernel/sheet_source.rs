//! Google Sheets adapter for `BaseSheetSource`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sheets_client::{ServiceAccountKey, SheetProperties, SheetsClient, SheetsError, Spreadsheet};
use std::path::Path;

use super::{BaseSheetSource, SheetMetadata, SheetRows};

pub struct GoogleSheetSource {
    client: SheetsClient,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetSource {
    pub fn new(client: SheetsClient, spreadsheet_id: String, worksheet: String) -> Self {
        Self {
            client,
            spreadsheet_id,
            worksheet,
        }
    }

    /// Authenticate with the service-account key at `credentials_path`.
    pub fn from_credentials(
        credentials_path: &Path,
        spreadsheet_id: String,
        worksheet: String,
    ) -> Result<Self> {
        let key = ServiceAccountKey::from_file(credentials_path)
            .with_context(|| format!("Failed to load Google credentials from {}", credentials_path.display()))?;
        tracing::info!(client_email = %key.client_email, "Loaded Google service account");
        Ok(Self::new(
            SheetsClient::from_service_account(key),
            spreadsheet_id,
            worksheet,
        ))
    }

    async fn spreadsheet(&self) -> Result<Spreadsheet> {
        self.client
            .get_spreadsheet(&self.spreadsheet_id)
            .await
            .context("Failed to open spreadsheet")
    }

    /// The configured worksheet, or the first tab when it does not exist.
    fn select_worksheet<'a>(&self, spreadsheet: &'a Spreadsheet) -> Result<&'a SheetProperties> {
        if let Some(sheet) = spreadsheet.worksheet(&self.worksheet) {
            return Ok(sheet);
        }
        let fallback = spreadsheet
            .first_worksheet()
            .ok_or_else(|| SheetsError::WorksheetNotFound(self.worksheet.clone()))?;
        tracing::warn!(
            wanted = %self.worksheet,
            using = %fallback.title,
            "Worksheet not found, using the first worksheet"
        );
        Ok(fallback)
    }
}

#[async_trait]
impl BaseSheetSource for GoogleSheetSource {
    async fn metadata(&self) -> Result<SheetMetadata> {
        let spreadsheet = self.spreadsheet().await?;
        let sheet = self.select_worksheet(&spreadsheet)?;

        let headers = self
            .client
            .get_headers(&self.spreadsheet_id, &sheet.title)
            .await
            .context("Failed to read header row")?;

        Ok(SheetMetadata {
            title: spreadsheet.properties.title.clone(),
            worksheet_title: sheet.title.clone(),
            url: spreadsheet.spreadsheet_url.clone(),
            row_count: sheet.grid_properties.row_count,
            col_count: sheet.grid_properties.column_count,
            headers,
        })
    }

    async fn rows(&self) -> Result<SheetRows> {
        let spreadsheet = self.spreadsheet().await?;
        let worksheet = self.select_worksheet(&spreadsheet)?.title.clone();

        let records = self
            .client
            .get_all_records(&self.spreadsheet_id, &worksheet)
            .await
            .with_context(|| format!("Failed to read worksheet '{}'", worksheet))?;

        Ok(SheetRows { worksheet, records })
    }

    async fn refresh(&self) -> Result<()> {
        tracing::info!("Refreshing Google Sheets connection");
        self.client.refresh_connection().await;
        self.spreadsheet().await.map(|_| ())
    }
}
