//! HTTP client for the SharePoint Online REST endpoints.

pub mod types;

use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, GET_FILE_API, SITE_PAGES_API};
use crate::utils::error::ClientError;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use types::{ListResponse, RestErrorBody, SitePageItem};

/// Client bound to one site, optionally authenticated with a bearer token
pub struct SiteClient {
    client: Client,
    site_url: String,
    access_token: Option<String>,
}

impl SiteClient {
    /// Create a new client for the given site URL
    pub fn new(
        site_url: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(ClientError::RequestFailed)?;

        Ok(Self {
            client,
            site_url: site_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Look up a page by file name
    pub fn get_page(&self, page_name: &str) -> Result<SitePageItem, ClientError> {
        info!("Looking up page: {}", page_name);

        let url = format!(
            "{}/{}?$filter=Name eq '{}'",
            self.site_url,
            SITE_PAGES_API,
            odata_literal(page_name)
        );

        debug!("GET {}", url);
        let response = self.get(&url)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::AccessDenied);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::PageNotFound(page_name.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                rest_error_text(response)
            )));
        }

        let listing: ListResponse<SitePageItem> =
            response.json().map_err(ClientError::RequestFailed)?;

        listing
            .value
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::PageNotFound(page_name.to_string()))
    }

    /// Download a file by server-relative URL
    pub fn download_file(&self, server_relative_url: &str) -> Result<Vec<u8>, ClientError> {
        debug!("Downloading asset: {}", server_relative_url);

        let url = format!(
            "{}/{}('{}')/$value",
            self.site_url,
            GET_FILE_API,
            odata_literal(server_relative_url)
        );

        let response = self.get(&url)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::AccessDenied);
        }
        if !status.is_success() {
            return Err(ClientError::InvalidResponse(format!(
                "HTTP {} fetching {}",
                status, server_relative_url
            )));
        }

        let bytes = response.bytes().map_err(ClientError::RequestFailed)?;
        Ok(bytes.to_vec())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, ClientError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json;odata=nometadata");

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        request.send().map_err(ClientError::RequestFailed)
    }
}

/// Escape a value for use inside an OData string literal
fn odata_literal(value: &str) -> String {
    // Single quotes double up; spaces must be percent-encoded in the URL
    value.replace('\'', "''").replace(' ', "%20")
}

/// Best-effort extraction of the message from a REST error body
fn rest_error_text(response: reqwest::blocking::Response) -> String {
    let raw = response.text().unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<RestErrorBody>(&raw) {
        if let Some(value) = body
            .error
            .and_then(|e| e.message)
            .and_then(|m| m.value)
        {
            return value;
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_url_trailing_slash_trimmed() {
        let client = SiteClient::new("https://contoso.sharepoint.com/sites/a/", None).unwrap();
        assert_eq!(client.site_url(), "https://contoso.sharepoint.com/sites/a");
    }

    #[test]
    fn test_odata_literal_escapes_quotes_and_spaces() {
        assert_eq!(odata_literal("O'Brien's page.aspx"), "O''Brien''s%20page.aspx");
    }

    #[test]
    fn test_rest_error_body_parses() {
        let raw = r#"{"odata.error":{"message":{"lang":"en-US","value":"File Not Found."}}}"#;
        let body: RestErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(
            body.error.unwrap().message.unwrap().value.as_deref(),
            Some("File Not Found.")
        );
    }
}
