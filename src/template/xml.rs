//! XML serialization for provisioning templates.
//!
//! Writes the `pnp:`-prefixed document the extraction produces and reads it
//! back for validation. The reader walks events and ignores elements it does
//! not recognize, so documents from newer tool versions still load.

use super::model::{
    CanvasColumn, CanvasControl, CanvasSection, ClientSidePageEntity, ControlType,
    ProvisioningTemplate,
};
use crate::utils::config::GENERATOR_NAME;
use crate::utils::error::TemplateError;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

const PNP_NAMESPACE: &str = "http://schemas.dev.office.com/PnP/2021/03/ProvisioningSchema";

/// Serialize a template to an indented XML string
pub fn to_xml(template: &ProvisioningTemplate) -> Result<String, TemplateError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("pnp:Provisioning");
    root.push_attribute(("xmlns:pnp", PNP_NAMESPACE));
    root.push_attribute(("Generator", GENERATOR_NAME));
    root.push_attribute(("Generated", template.generated_at.as_str()));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("pnp:Templates")))?;

    let mut tmpl = BytesStart::new("pnp:ProvisioningTemplate");
    tmpl.push_attribute(("ID", template.id.as_str()));
    tmpl.push_attribute(("Version", template.version.as_str()));
    writer.write_event(Event::Start(tmpl))?;

    writer.write_event(Event::Start(BytesStart::new("pnp:ClientSidePages")))?;
    for page in &template.pages {
        write_page(&mut writer, page)?;
    }
    writer.write_event(Event::End(BytesEnd::new("pnp:ClientSidePages")))?;

    writer.write_event(Event::End(BytesEnd::new("pnp:ProvisioningTemplate")))?;
    writer.write_event(Event::End(BytesEnd::new("pnp:Templates")))?;
    writer.write_event(Event::End(BytesEnd::new("pnp:Provisioning")))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| TemplateError::InvalidDocument(format!("non-UTF8 output: {}", e)))
}

fn write_page<W: std::io::Write>(
    writer: &mut Writer<W>,
    page: &ClientSidePageEntity,
) -> Result<(), TemplateError> {
    let mut el = BytesStart::new("pnp:ClientSidePage");
    el.push_attribute(("PageName", page.page_name.as_str()));
    el.push_attribute(("Layout", page.layout.as_str()));
    el.push_attribute(("Overwrite", if page.overwrite { "true" } else { "false" }));
    if let Some(title) = &page.title {
        el.push_attribute(("Title", title.as_str()));
    }
    if let Some(author) = &page.author {
        el.push_attribute(("Author", author.as_str()));
    }
    writer.write_event(Event::Start(el))?;

    writer.write_event(Event::Start(BytesStart::new("pnp:Sections")))?;
    for section in &page.sections {
        write_section(writer, section)?;
    }
    writer.write_event(Event::End(BytesEnd::new("pnp:Sections")))?;

    writer.write_event(Event::End(BytesEnd::new("pnp:ClientSidePage")))?;
    Ok(())
}

fn write_section<W: std::io::Write>(
    writer: &mut Writer<W>,
    section: &CanvasSection,
) -> Result<(), TemplateError> {
    let mut el = BytesStart::new("pnp:Section");
    el.push_attribute(("Order", section.order.to_string().as_str()));
    writer.write_event(Event::Start(el))?;

    for column in &section.columns {
        write_column(writer, column)?;
    }

    writer.write_event(Event::End(BytesEnd::new("pnp:Section")))?;
    Ok(())
}

fn write_column<W: std::io::Write>(
    writer: &mut Writer<W>,
    column: &CanvasColumn,
) -> Result<(), TemplateError> {
    let mut el = BytesStart::new("pnp:Column");
    el.push_attribute(("Order", column.order.to_string().as_str()));
    el.push_attribute(("Factor", column.factor.to_string().as_str()));
    writer.write_event(Event::Start(el))?;

    for control in &column.controls {
        write_control(writer, control)?;
    }

    writer.write_event(Event::End(BytesEnd::new("pnp:Column")))?;
    Ok(())
}

fn write_control<W: std::io::Write>(
    writer: &mut Writer<W>,
    control: &CanvasControl,
) -> Result<(), TemplateError> {
    let mut el = BytesStart::new("pnp:CanvasControl");
    el.push_attribute(("ControlType", control.control_type.as_str()));
    el.push_attribute(("Order", control.order.to_string().as_str()));
    if let Some(id) = &control.web_part_id {
        el.push_attribute(("WebPartId", id.as_str()));
    }
    if let Some(title) = &control.title {
        el.push_attribute(("Title", title.as_str()));
    }
    writer.write_event(Event::Start(el))?;

    if let Some(properties) = &control.properties {
        writer.write_event(Event::Start(BytesStart::new("pnp:CanvasControlProperties")))?;
        writer.write_event(Event::Text(BytesText::new(properties)))?;
        writer.write_event(Event::End(BytesEnd::new("pnp:CanvasControlProperties")))?;
    }
    if let Some(text) = &control.text {
        writer.write_event(Event::Start(BytesStart::new("pnp:Text")))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("pnp:Text")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("pnp:CanvasControl")))?;
    Ok(())
}

/// Text slot the reader is currently inside
#[derive(PartialEq)]
enum TextSlot {
    None,
    Properties,
    Text,
}

/// Parse a template document back into the object model
pub fn from_xml(xml: &str) -> Result<ProvisioningTemplate, TemplateError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut template: Option<ProvisioningTemplate> = None;
    let mut generated_at = String::new();
    let mut slot = TextSlot::None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"pnp:Provisioning" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"Generated" {
                            generated_at = attr_value(&attr);
                        }
                    }
                }
                b"pnp:ProvisioningTemplate" => {
                    let mut t = ProvisioningTemplate {
                        id: String::new(),
                        version: String::new(),
                        generated_at: generated_at.clone(),
                        pages: Vec::new(),
                    };
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"ID" => t.id = attr_value(&attr),
                            b"Version" => t.version = attr_value(&attr),
                            _ => {}
                        }
                    }
                    template = Some(t);
                }
                b"pnp:ClientSidePage" => {
                    let t = require_template(&mut template)?;
                    t.pages.push(read_page_attrs(&e));
                }
                b"pnp:Section" => {
                    let t = require_template(&mut template)?;
                    if let Some(page) = t.pages.last_mut() {
                        let mut section = CanvasSection {
                            order: 1,
                            columns: Vec::new(),
                        };
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"Order" {
                                section.order = parse_u32(&attr, 1);
                            }
                        }
                        page.sections.push(section);
                    }
                }
                b"pnp:Column" => {
                    let t = require_template(&mut template)?;
                    if let Some(section) = last_section(t) {
                        let mut column = CanvasColumn {
                            order: 1,
                            factor: 12,
                            controls: Vec::new(),
                        };
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"Order" => column.order = parse_u32(&attr, 1),
                                b"Factor" => column.factor = parse_u32(&attr, 12),
                                _ => {}
                            }
                        }
                        section.columns.push(column);
                    }
                }
                b"pnp:CanvasControl" => {
                    let t = require_template(&mut template)?;
                    if let Some(column) = last_column(t) {
                        column.controls.push(read_control_attrs(&e));
                    }
                }
                b"pnp:CanvasControlProperties" => slot = TextSlot::Properties,
                b"pnp:Text" => slot = TextSlot::Text,
                _ => {}
            },
            Event::Text(e) => {
                if slot != TextSlot::None {
                    if let Ok(text) = e.unescape() {
                        if let Some(control) = template.as_mut().and_then(last_control) {
                            match slot {
                                TextSlot::Properties => control.properties = Some(text.into_owned()),
                                TextSlot::Text => control.text = Some(text.into_owned()),
                                TextSlot::None => {}
                            }
                        }
                    }
                }
            }
            Event::End(e) => {
                if matches!(
                    e.name().as_ref(),
                    b"pnp:CanvasControlProperties" | b"pnp:Text"
                ) {
                    slot = TextSlot::None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    template.ok_or_else(|| {
        TemplateError::InvalidDocument("no pnp:ProvisioningTemplate element".to_string())
    })
}

fn require_template(
    template: &mut Option<ProvisioningTemplate>,
) -> Result<&mut ProvisioningTemplate, TemplateError> {
    template.as_mut().ok_or_else(|| {
        TemplateError::InvalidDocument("page content outside pnp:ProvisioningTemplate".to_string())
    })
}

fn read_page_attrs(e: &BytesStart) -> ClientSidePageEntity {
    let mut page = ClientSidePageEntity {
        page_name: String::new(),
        title: None,
        layout: "Article".to_string(),
        author: None,
        overwrite: true,
        sections: Vec::new(),
    };
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"PageName" => page.page_name = attr_value(&attr),
            b"Title" => page.title = Some(attr_value(&attr)),
            b"Layout" => page.layout = attr_value(&attr),
            b"Author" => page.author = Some(attr_value(&attr)),
            b"Overwrite" => page.overwrite = attr_value(&attr) == "true",
            _ => {}
        }
    }
    page
}

fn read_control_attrs(e: &BytesStart) -> CanvasControl {
    let mut control = CanvasControl {
        control_type: ControlType::WebPart,
        order: 1,
        web_part_id: None,
        title: None,
        properties: None,
        text: None,
    };
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"ControlType" => {
                if attr_value(&attr) == "Text" {
                    control.control_type = ControlType::Text;
                }
            }
            b"Order" => control.order = parse_u32(&attr, 1),
            b"WebPartId" => control.web_part_id = Some(attr_value(&attr)),
            b"Title" => control.title = Some(attr_value(&attr)),
            _ => {}
        }
    }
    control
}

fn last_section(t: &mut ProvisioningTemplate) -> Option<&mut CanvasSection> {
    t.pages.last_mut()?.sections.last_mut()
}

fn last_column(t: &mut ProvisioningTemplate) -> Option<&mut CanvasColumn> {
    last_section(t)?.columns.last_mut()
}

fn last_control(t: &mut ProvisioningTemplate) -> Option<&mut CanvasControl> {
    last_column(t)?.controls.last_mut()
}

/// Attribute value with XML entities unescaped
fn attr_value(attr: &Attribute) -> String {
    let raw = String::from_utf8_lossy(&attr.value).to_string();
    match quick_xml::escape::unescape(&raw) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => raw,
    }
}

fn parse_u32(attr: &Attribute, default: u32) -> u32 {
    attr_value(attr).parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::model::new_template_id;
    use pretty_assertions::assert_eq;

    fn sample_template() -> ProvisioningTemplate {
        let mut template = ProvisioningTemplate::new();
        template.pages.push(ClientSidePageEntity {
            page_name: "Home.aspx".to_string(),
            title: Some("Home & Welcome".to_string()),
            layout: "Home".to_string(),
            author: Some("i:0#.f|membership|admin@contoso.com".to_string()),
            overwrite: true,
            sections: vec![CanvasSection {
                order: 1,
                columns: vec![CanvasColumn {
                    order: 1,
                    factor: 8,
                    controls: vec![
                        CanvasControl {
                            control_type: ControlType::WebPart,
                            order: 1,
                            web_part_id: Some("daf0b71c-6de8-4ef7-b511-faae7c388708".to_string()),
                            title: Some("Hero".to_string()),
                            properties: Some(r#"{"imageSource":"/sites/a/SiteAssets/hero.jpg"}"#.to_string()),
                            text: None,
                        },
                        CanvasControl::text(2, "<p>Hello</p>"),
                    ],
                }],
            }],
        });
        template
    }

    #[test]
    fn test_to_xml_contains_id_and_pages() {
        let template = sample_template();
        let xml = to_xml(&template).unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(&template.id));
        assert!(xml.contains("pnp:ClientSidePage"));
        assert!(xml.contains("PageName=\"Home.aspx\""));
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let template = sample_template();
        let xml = to_xml(&template).unwrap();
        let parsed = from_xml(&xml).unwrap();

        assert_eq!(parsed.id, template.id);
        assert_eq!(parsed.version, template.version);
        assert_eq!(parsed.pages, template.pages);
    }

    #[test]
    fn test_round_trip_escapes_title() {
        let template = sample_template();
        let xml = to_xml(&template).unwrap();
        assert!(xml.contains("Home &amp; Welcome"));

        let parsed = from_xml(&xml).unwrap();
        assert_eq!(parsed.pages[0].title.as_deref(), Some("Home & Welcome"));
    }

    #[test]
    fn test_from_xml_rejects_non_template() {
        let result = from_xml("<html><body/></html>");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_xml_ignores_unknown_elements() {
        let id = new_template_id();
        let xml = format!(
            "<pnp:Provisioning xmlns:pnp=\"{}\"><pnp:Templates>\
             <pnp:ProvisioningTemplate ID=\"{}\" Version=\"1.0.0\">\
             <pnp:SiteFields><pnp:Field /></pnp:SiteFields>\
             <pnp:ClientSidePages><pnp:ClientSidePage PageName=\"A.aspx\" Layout=\"Article\" Overwrite=\"false\">\
             <pnp:Sections/></pnp:ClientSidePage></pnp:ClientSidePages>\
             </pnp:ProvisioningTemplate></pnp:Templates></pnp:Provisioning>",
            PNP_NAMESPACE, id
        );

        let parsed = from_xml(&xml).unwrap();
        assert_eq!(parsed.id, id);
        assert_eq!(parsed.pages.len(), 1);
        assert!(!parsed.pages[0].overwrite);
    }
}
