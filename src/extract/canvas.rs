//! Canvas content parsing.
//!
//! A modern page stores its layout as a JSON array of control envelopes.
//! Each envelope carries a position (zone, section, factor, control index)
//! and either web-part data or raw text. This module turns that flat array
//! into the template's section/column/control tree and collects the
//! server-relative asset URLs the controls reference.

use crate::template::{CanvasColumn, CanvasControl, CanvasSection, ControlType};
use crate::utils::error::ExtractError;
use log::debug;
use serde::Deserialize;

// Control type discriminators used in canvas JSON
const CONTROL_TYPE_WEBPART: u32 = 3;
const CONTROL_TYPE_TEXT: u32 = 4;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ControlEnvelope {
    control_type: Option<u32>,
    position: Option<ControlPosition>,
    web_part_id: Option<String>,
    web_part_data: Option<WebPartData>,
    #[serde(rename = "innerHTML")]
    inner_html: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ControlPosition {
    // Zone and control indexes are fractional so the editor can insert
    // between existing entries without renumbering
    zone_index: Option<f64>,
    section_index: Option<u32>,
    section_factor: Option<u32>,
    control_index: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WebPartData {
    title: Option<String>,
    properties: Option<serde_json::Value>,
    server_processed_content: Option<ServerProcessedContent>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ServerProcessedContent {
    image_sources: Option<serde_json::Map<String, serde_json::Value>>,
}

/// One parsed control, not yet placed into the tree
struct PlacedControl {
    zone: f64,
    section_index: u32,
    factor: u32,
    control_index: f64,
    control: CanvasControl,
}

/// Parse canvas JSON into sections plus referenced asset URLs
pub fn build_sections(
    canvas_json: &str,
) -> Result<(Vec<CanvasSection>, Vec<String>), ExtractError> {
    let envelopes: Vec<ControlEnvelope> = serde_json::from_str(canvas_json)
        .map_err(|e| ExtractError::InvalidCanvas(e.to_string()))?;

    let mut placed = Vec::new();
    let mut assets = Vec::new();

    for envelope in envelopes {
        let Some(position) = &envelope.position else {
            // Page settings envelopes carry no position
            continue;
        };
        let zone = position.zone_index.unwrap_or(1.0);
        let section_index = position.section_index.unwrap_or(1);
        let factor = position.section_factor.unwrap_or(12);
        let control_index = position.control_index.unwrap_or(1.0);

        let control = match envelope.control_type {
            Some(CONTROL_TYPE_WEBPART) => {
                collect_image_sources(&envelope, &mut assets);
                let data = envelope.web_part_data.as_ref();
                CanvasControl {
                    control_type: ControlType::WebPart,
                    order: 0,
                    web_part_id: envelope.web_part_id.clone(),
                    title: data.and_then(|d| d.title.clone()),
                    properties: data
                        .and_then(|d| d.properties.as_ref())
                        .map(|p| p.to_string()),
                    text: None,
                }
            }
            Some(CONTROL_TYPE_TEXT) => CanvasControl {
                control_type: ControlType::Text,
                order: 0,
                web_part_id: None,
                title: None,
                properties: None,
                text: envelope.inner_html.clone(),
            },
            other => {
                debug!("Skipping canvas control of type {:?}", other);
                continue;
            }
        };

        placed.push(PlacedControl {
            zone,
            section_index,
            factor,
            control_index,
            control,
        });
    }

    placed.sort_by(|a, b| {
        (a.zone, a.section_index, a.control_index)
            .partial_cmp(&(b.zone, b.section_index, b.control_index))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok((fold_into_sections(placed), assets))
}

/// Fold the sorted flat list into sections and columns with 1-based orders
fn fold_into_sections(placed: Vec<PlacedControl>) -> Vec<CanvasSection> {
    let mut sections: Vec<CanvasSection> = Vec::new();
    let mut current_zone: Option<f64> = None;
    let mut current_section_index: Option<u32> = None;

    for item in placed {
        let new_section = current_zone != Some(item.zone);
        if new_section {
            current_zone = Some(item.zone);
            current_section_index = None;
            sections.push(CanvasSection {
                order: sections.len() as u32 + 1,
                columns: Vec::new(),
            });
        }

        // sections is never empty here
        let Some(section) = sections.last_mut() else {
            continue;
        };

        if new_section || current_section_index != Some(item.section_index) {
            current_section_index = Some(item.section_index);
            section.columns.push(CanvasColumn {
                order: section.columns.len() as u32 + 1,
                factor: item.factor,
                controls: Vec::new(),
            });
        }

        let Some(column) = section.columns.last_mut() else {
            continue;
        };
        let mut control = item.control;
        control.order = column.controls.len() as u32 + 1;
        column.controls.push(control);
    }

    sections
}

/// Pull server-relative image URLs out of a web part's processed content
fn collect_image_sources(envelope: &ControlEnvelope, assets: &mut Vec<String>) {
    let Some(sources) = envelope
        .web_part_data
        .as_ref()
        .and_then(|d| d.server_processed_content.as_ref())
        .and_then(|c| c.image_sources.as_ref())
    else {
        return;
    };

    for value in sources.values() {
        if let Some(url) = value.as_str() {
            if url.starts_with('/') {
                assets.push(url.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_COLUMN_CANVAS: &str = r#"[
        {
            "controlType": 3,
            "id": "c1",
            "position": {"zoneIndex": 1, "sectionIndex": 1, "sectionFactor": 8, "controlIndex": 1},
            "webPartId": "daf0b71c-6de8-4ef7-b511-faae7c388708",
            "webPartData": {
                "title": "Image",
                "properties": {"imageSource": "/sites/a/SiteAssets/hero.jpg"},
                "serverProcessedContent": {
                    "imageSources": {"imageSource": "/sites/a/SiteAssets/hero.jpg"}
                }
            }
        },
        {
            "controlType": 4,
            "position": {"zoneIndex": 1, "sectionIndex": 2, "sectionFactor": 4, "controlIndex": 1},
            "innerHTML": "<p>Welcome</p>"
        },
        {
            "controlType": 4,
            "position": {"zoneIndex": 2, "sectionIndex": 1, "sectionFactor": 12, "controlIndex": 1.5},
            "innerHTML": "<p>Footer</p>"
        },
        {
            "controlType": 0,
            "pageSettingsSlice": {"isDefaultDescription": true}
        }
    ]"#;

    #[test]
    fn test_build_sections_groups_by_zone_and_column() {
        let (sections, _) = build_sections(TWO_COLUMN_CANVAS).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].order, 1);
        assert_eq!(sections[0].columns.len(), 2);
        assert_eq!(sections[0].columns[0].factor, 8);
        assert_eq!(sections[0].columns[1].factor, 4);
        assert_eq!(sections[1].columns.len(), 1);
        assert_eq!(sections[1].columns[0].controls[0].text.as_deref(), Some("<p>Footer</p>"));
    }

    #[test]
    fn test_build_sections_maps_control_kinds() {
        let (sections, _) = build_sections(TWO_COLUMN_CANVAS).unwrap();

        let image = &sections[0].columns[0].controls[0];
        assert_eq!(image.control_type, ControlType::WebPart);
        assert_eq!(image.web_part_id.as_deref(), Some("daf0b71c-6de8-4ef7-b511-faae7c388708"));
        assert!(image.properties.as_deref().unwrap().contains("hero.jpg"));

        let text = &sections[0].columns[1].controls[0];
        assert_eq!(text.control_type, ControlType::Text);
        assert_eq!(text.text.as_deref(), Some("<p>Welcome</p>"));
    }

    #[test]
    fn test_build_sections_collects_assets() {
        let (_, assets) = build_sections(TWO_COLUMN_CANVAS).unwrap();
        assert_eq!(assets, vec!["/sites/a/SiteAssets/hero.jpg".to_string()]);
    }

    #[test]
    fn test_build_sections_skips_absolute_image_urls() {
        let canvas = r#"[{
            "controlType": 3,
            "position": {"zoneIndex": 1, "sectionIndex": 1, "sectionFactor": 12, "controlIndex": 1},
            "webPartId": "x",
            "webPartData": {
                "serverProcessedContent": {"imageSources": {"a": "https://cdn.example.com/x.png"}}
            }
        }]"#;

        let (_, assets) = build_sections(canvas).unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn test_build_sections_empty_canvas() {
        let (sections, assets) = build_sections("[]").unwrap();
        assert!(sections.is_empty());
        assert!(assets.is_empty());
    }

    #[test]
    fn test_build_sections_rejects_malformed_json() {
        assert!(build_sections("{oops").is_err());
    }
}
