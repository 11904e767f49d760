//! Types for the SharePoint REST responses we consume.
//!
//! Only the fields the extraction needs are modeled; everything else in the
//! responses is ignored.

use serde::Deserialize;

/// OData list envelope (`{"value": [...]}` with nometadata)
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// A site page item from `_api/sitepages/pages`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SitePageItem {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub title: Option<String>,

    /// Server-relative page URL, e.g. `SitePages/Home.aspx`
    #[serde(default)]
    pub url: Option<String>,

    /// Page layout name (Article, Home, ...)
    #[serde(default)]
    pub page_layout_type: Option<String>,

    /// Canvas content: JSON array of control envelopes
    #[serde(default)]
    pub canvas_content1: Option<String>,

    /// Banner image, a branding asset when present
    #[serde(default)]
    pub banner_image_url: Option<String>,

    /// Page author login
    #[serde(default)]
    pub author_byline: Option<Vec<String>>,
}

/// Error body some REST failures carry (`{"odata.error": {"message": ...}}`)
#[derive(Debug, Deserialize)]
pub struct RestErrorBody {
    #[serde(rename = "odata.error", default)]
    pub error: Option<RestErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct RestErrorDetail {
    #[serde(default)]
    pub message: Option<RestErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct RestErrorMessage {
    #[serde(default)]
    pub value: Option<String>,
}
