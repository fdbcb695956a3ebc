//! Roster download

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, RosterError};

/// Handle and fid columns of the shared sheet
pub const DEFAULT_SHEET_RANGE: &str = "A:B";

/// CSV export URL for a range of a public Google Sheet
pub fn sheet_csv_url(sheet_id: &str, range: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&range={}",
        urlencoding::encode(sheet_id),
        urlencoding::encode(range)
    )
}

/// A publicly readable CSV roster
pub struct SheetSource {
    http: reqwest::Client,
    url: String,
}

impl SheetSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Handle and fid columns of a public Google Sheet
    pub fn google_sheet(sheet_id: &str) -> Result<Self> {
        Self::new(sheet_csv_url(sheet_id, DEFAULT_SHEET_RANGE))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the current roster text
    pub async fn fetch(&self) -> Result<String> {
        debug!(url = %self.url, "Fetching roster");
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RosterError::Fetch {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let text = response.text().await?;
        info!(bytes = text.len(), "Fetched roster");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    async fn spawn_stub() -> String {
        let app = Router::new().route("/roster.csv", get(|| async { "username,fid\nalice,7\n" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_sheet_csv_url() {
        assert_eq!(
            sheet_csv_url("abc123", DEFAULT_SHEET_RANGE),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:csv&range=A%3AB"
        );
    }

    #[test]
    fn test_google_sheet_source_url() {
        let source = SheetSource::google_sheet("abc123").unwrap();
        assert!(source.url().contains("/d/abc123/"));
    }

    #[tokio::test]
    async fn test_fetch_roster() {
        let base = spawn_stub().await;

        let source = SheetSource::new(format!("{}/roster.csv", base)).unwrap();
        assert_eq!(source.fetch().await.unwrap(), "username,fid\nalice,7\n");

        let missing = SheetSource::new(format!("{}/missing.csv", base)).unwrap();
        let err = missing.fetch().await.unwrap_err();
        assert!(matches!(err, RosterError::Fetch { status: 404, .. }));
    }
}
