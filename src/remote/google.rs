//! Hosted spreadsheet backend over the Google Sheets v4 values API

use super::{a1_reference, check_position, CredentialProvider, SheetBackend};
use crate::error::{TasklyticsError, TasklyticsResult};
use crate::types::{Cell, Table};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Cell>>,
}

#[derive(Debug, Serialize)]
struct ValueUpdate<'a> {
    values: &'a [Vec<Cell>],
}

pub struct GoogleSheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    credentials: Box<dyn CredentialProvider>,
}

impl GoogleSheetsClient {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        credentials: Box<dyn CredentialProvider>,
        timeout: Duration,
    ) -> TasklyticsResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tasklytics/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            credentials,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Quoted worksheet name usable in A1 ranges
    fn sheet_range(&self) -> String {
        format!("'{}'", self.worksheet.replace('\'', "''"))
    }

    fn values_url(&self, range: &str) -> TasklyticsResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TasklyticsError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                TasklyticsError::Config(format!("Base URL '{}' cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn authorized(&self, request: RequestBuilder) -> TasklyticsResult<RequestBuilder> {
        let token = self.credentials.access_token().await?;
        Ok(request.bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder) -> TasklyticsResult<Response> {
        let response = self.authorized(request).await?.send().await.map_err(|e| {
            warn!("spreadsheet request failed: {}", e);
            TasklyticsError::from(e)
        })?;
        check_status(response).await
    }

    async fn put_values(&self, range: &str, rows: &[Vec<Cell>]) -> TasklyticsResult<()> {
        let url = self.values_url(range)?;
        debug!(%range, rows = rows.len(), "writing values");
        let request = self
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueUpdate { values: rows });
        self.send(request).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> TasklyticsResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = format!("{} {}", status, body.trim());
    warn!("spreadsheet API returned {}", status);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TasklyticsError::Auth(message)),
        _ => Err(TasklyticsError::Transport(message)),
    }
}

#[async_trait]
impl SheetBackend for GoogleSheetsClient {
    async fn get_all_values(&self) -> TasklyticsResult<Table> {
        let url = self.values_url(&self.sheet_range())?;
        let request = self
            .http
            .get(url)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")]);
        let response = self.send(request).await?;
        let range: ValueRange = response.json().await?;
        Ok(Table::new(range.values))
    }

    async fn update_cell(&self, row: usize, col: usize, value: &Cell) -> TasklyticsResult<()> {
        check_position(row, col)?;
        let range = format!("{}!{}", self.sheet_range(), a1_reference(row, col));
        self.put_values(&range, &[vec![value.clone()]]).await
    }

    async fn clear(&self) -> TasklyticsResult<()> {
        let url = self.values_url(&format!("{}:clear", self.sheet_range()))?;
        let request = self.http.post(url).json(&serde_json::json!({}));
        self.send(request).await?;
        Ok(())
    }

    async fn update(&self, rows: &[Vec<Cell>]) -> TasklyticsResult<()> {
        let range = format!("{}!A1", self.sheet_range());
        self.put_values(&range, rows).await
    }

    fn describe(&self) -> String {
        format!("spreadsheet {} [{}]", self.spreadsheet_id, self.worksheet)
    }
}
