//! Provisioning template object model and XML document handling.

pub mod model;
pub mod xml;

pub use model::{
    CanvasColumn, CanvasControl, CanvasSection, ClientSidePageEntity, ControlType,
    ProvisioningTemplate,
};
pub use xml::{from_xml, to_xml};
