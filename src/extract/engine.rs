//! Production extraction engine backed by the SharePoint REST client.

use super::canvas::build_sections;
use super::{PageExtractor, TemplateCreationInfo};
use crate::client::SiteClient;
use crate::template::{ClientSidePageEntity, ProvisioningTemplate};
use crate::utils::error::ExtractError;
use crate::utils::scope::MonitoredScope;
use log::{debug, info};

/// Extracts a single client-side page through the site's REST API
pub struct ClientSidePageExtractor {
    client: SiteClient,
}

impl ClientSidePageExtractor {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }
}

impl PageExtractor for ClientSidePageExtractor {
    fn extract_page(
        &self,
        info: &TemplateCreationInfo,
        template: &mut ProvisioningTemplate,
        page_name: &str,
        _scope: &MonitoredScope,
    ) -> Result<(), ExtractError> {
        let page = self.client.get_page(page_name)?;

        let canvas = page.canvas_content1.as_deref().unwrap_or("[]");
        let (sections, mut assets) = build_sections(canvas)?;

        debug!(
            "Page {} has {} sections, {} referenced assets",
            page_name,
            sections.len(),
            assets.len()
        );

        // The banner image is a branding asset too
        if let Some(banner) = &page.banner_image_url {
            if banner.starts_with('/') {
                assets.push(banner.clone());
            }
        }

        let author = if info.exclude_author_information {
            None
        } else {
            page.author_byline.and_then(|byline| byline.into_iter().next())
        };

        template.pages.push(ClientSidePageEntity {
            page_name: page_name.to_string(),
            title: page.title,
            layout: page.page_layout_type.unwrap_or_else(|| "Article".to_string()),
            author,
            overwrite: true,
            sections,
        });

        if info.persist_branding_files {
            match &info.file_connector {
                Some(connector) => {
                    assets.sort();
                    assets.dedup();
                    info!(
                        "Persisting {} branding file(s) to {}",
                        assets.len(),
                        connector.describe()
                    );
                    for url in &assets {
                        let data = self.client.download_file(url)?;
                        connector.save(file_name_of(url), &data)?;
                    }
                }
                // Matches exporting to stdout: nowhere to put the files
                None => debug!("Branding persistence requested without an output directory"),
            }
        }

        Ok(())
    }
}

/// Last path segment of a server-relative URL
fn file_name_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_of_strips_directories() {
        assert_eq!(file_name_of("/sites/a/SiteAssets/hero.jpg"), "hero.jpg");
        assert_eq!(file_name_of("plain.png"), "plain.png");
    }
}
