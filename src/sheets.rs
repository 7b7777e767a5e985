use async_trait::async_trait;
use log::warn;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::config::SheetsConfig;
use crate::record::{HEADER, UserRecord};
use crate::store::{RecordStore, StoreError};

/// Store backed by a worksheet of a remote spreadsheet, reached over the
/// Sheets v4 `values` endpoints
///
/// One row per record, columns in `HEADER` order, row 1 holding the header.
/// Every read fetches the whole table; there is no caching, locking or retry
/// on top of what the remote service provides.
pub struct SheetsStore {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    token: String,
}

impl SheetsStore {
    /// Open the configured worksheet, creating the header row if the sheet
    /// is empty
    ///
    /// Idempotent: reconnecting to a sheet that already carries the header
    /// leaves it untouched, so a partially initialized sheet (header written,
    /// first append failed) converges on the next connect.
    ///
    /// # Arguments
    /// * `config` - Sheet identifiers and the service-account token
    ///
    /// # Returns
    /// * `Result<SheetsStore, StoreError>` - A usable store handle or a
    ///   `Connection` error when credentials are rejected or the service is
    ///   unreachable
    pub async fn connect(config: &SheetsConfig) -> Result<SheetsStore, StoreError> {
        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = SheetsStore {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            token: config.token.clone(),
        };

        store.ensure_header().await?;

        Ok(store)
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, range
        )
    }

    /// Probe row 1 and append the header when the worksheet is empty.
    async fn ensure_header(&self) -> Result<(), StoreError> {
        let range = format!("{}!A1:D1", self.worksheet);
        let response = self
            .client
            .get(self.values_url(&range))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(StoreError::Connection(format!(
                    "credentials rejected ({})",
                    response.status()
                )));
            }
            status if !status.is_success() => {
                return Err(StoreError::Connection(format!(
                    "header probe returned {}",
                    status
                )));
            }
            _ => {}
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let has_header = body
            .get("values")
            .and_then(Value::as_array)
            .map(|rows| !rows.is_empty())
            .unwrap_or(false);

        if !has_header {
            let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
            self.append_row(&header).await.map_err(|e| match e {
                StoreError::Write(message) => StoreError::Connection(message),
                other => other,
            })?;
        }

        Ok(())
    }

    async fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        let range = format!("{}!A1:D1", self.worksheet);
        let url = format!("{}:append", self.values_url(&range));

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Write(format!(
                "append returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    async fn append(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.append_row(&record.to_row()).await
    }

    async fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        // Data rows only; the header stays in row 1
        let range = format!("{}!A2:D", self.worksheet);
        let response = self
            .client
            .get(self.values_url(&range))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Read(format!(
                "read returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        // An empty sheet has no "values" key at all
        let rows = match body.get("values").and_then(Value::as_array) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let cells: Vec<String> = row
                .as_array()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|c| c.as_str().unwrap_or_default().to_string())
                        .collect()
                })
                .unwrap_or_default();

            match UserRecord::from_row(&cells) {
                Some(record) => records.push(record),
                None => warn!("skipping unparseable sheet row: {:?}", cells),
            }
        }

        Ok(records)
    }
}
