//! # Response Reading
//!
//! Maps a parsed element tree onto the response model.
//!
//! ```text
//! xres:TransportResponse
//! ├── xres:TransportHeader/xcpt:ResponseDetails    id, timestamp, report
//! └── xres:TransportBody/xres:Package*
//!     ├── xres:PackageHeader/xcpt:ResponseDetails
//!     ├── xres:PackagePlugIns                      DataSource, DataTransforms, ...
//!     └── xres:PackageBody/xcpt:Data/xcpt:Base64CharSequence
//! ```
//!
//! A service-side failure arrives instead as an `XMLError` root holding
//! flags, either directly or inside a `Report`.

use shared_types::Flag;

use super::components::{read_data_source, read_flags, read_report, read_response_details, read_transforms};
use super::dom::Element;
use crate::domain::{EnvelopeError, Package, PackagePlugin, ResponseEnvelope};

/// Root element of a regular response.
pub const RESPONSE_ROOT: &str = "TransportResponse";
/// Root element of an error document.
pub const XML_ERROR_ROOT: &str = "XMLError";

/// What a response body turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDocument {
    /// A regular response.
    Response(ResponseEnvelope),
    /// An error document with its flags.
    XmlError(Vec<Flag>),
}

/// Classify and read a parsed response body.
pub fn read_document(root: &Element) -> Result<ResponseDocument, EnvelopeError> {
    match root.name.as_str() {
        XML_ERROR_ROOT => {
            let flags = match root.child("Report") {
                Some(report) => read_report(report)?.1,
                None => read_flags(root)?,
            };
            Ok(ResponseDocument::XmlError(flags))
        }
        RESPONSE_ROOT => read_response(root).map(ResponseDocument::Response),
        other => Err(EnvelopeError::malformed(
            other,
            format!("expected {RESPONSE_ROOT} or {XML_ERROR_ROOT}"),
        )),
    }
}

fn read_response(root: &Element) -> Result<ResponseEnvelope, EnvelopeError> {
    let details = root
        .find(&["TransportHeader", "ResponseDetails"])
        .ok_or_else(|| EnvelopeError::malformed("TransportHeader/ResponseDetails", "missing element"))?;
    let details = read_response_details(details)?;

    let packages = match root.child("TransportBody") {
        Some(body) => body
            .children_named("Package")
            .map(read_package)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(ResponseEnvelope {
        response_id: details.response_id,
        timestamp: details.timestamp,
        highest_weight: details.highest_weight,
        flags: details.flags,
        packages,
    })
}

fn read_package(package: &Element) -> Result<Package, EnvelopeError> {
    let details = package
        .find(&["PackageHeader", "ResponseDetails"])
        .ok_or_else(|| EnvelopeError::malformed("PackageHeader/ResponseDetails", "missing element"))?;
    let details = read_response_details(details)?;

    let plugins = match package.child("PackagePlugIns") {
        Some(plugins) => plugins.children.iter().map(read_plugin).collect(),
        None => Vec::new(),
    };

    let data = package
        .text_at(&["PackageBody", "Data", "Base64CharSequence"])
        .map(str::to_string);

    Ok(Package {
        response_id: details.response_id,
        timestamp: details.timestamp,
        flags: details.flags,
        plugins,
        data,
    })
}

/// Plug-in content that cannot be read stays with its package as
/// `PackagePlugin::Invalid`, so siblings still parse.
fn read_plugin(plugin: &Element) -> PackagePlugin {
    let read = match plugin.name.as_str() {
        "DataSource" => read_data_source(plugin).map(PackagePlugin::DataSource),
        "DataTransforms" => read_transforms(plugin).map(PackagePlugin::DataTransforms),
        other => return PackagePlugin::Other(other.to_string()),
    };
    read.unwrap_or_else(|e| PackagePlugin::Invalid {
        name: plugin.name.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::dom::parse_document;
    use shared_types::FlagWeight;

    #[test]
    fn test_xml_error_with_bare_flags() {
        let root = parse_document(
            br#"<xcpt:XMLError xmlns:xcpt="urn:c">
                 <xcpt:Flag weight="http://www.extra-standard.de/weight/ERROR">
                   <xcpt:Code>E999</xcpt:Code><xcpt:Text>schema</xcpt:Text>
                 </xcpt:Flag>
               </xcpt:XMLError>"#,
        )
        .unwrap();
        assert_eq!(
            read_document(&root).unwrap(),
            ResponseDocument::XmlError(vec![Flag::new("E999", "schema", FlagWeight::Error)])
        );
    }

    #[test]
    fn test_unknown_root() {
        let root = parse_document(b"<html/>").unwrap();
        assert!(matches!(read_document(&root), Err(EnvelopeError::Malformed { .. })));
    }

    #[test]
    fn test_minimal_response_without_body() {
        let root = parse_document(
            b"<TransportResponse><TransportHeader><ResponseDetails>\
              <ResponseID>12</ResponseID></ResponseDetails></TransportHeader></TransportResponse>",
        )
        .unwrap();
        match read_document(&root).unwrap() {
            ResponseDocument::Response(r) => {
                assert_eq!(r.response_id, "12");
                assert!(r.flags.is_empty());
                assert!(r.packages.is_empty());
                assert_eq!(r.highest_weight, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_header() {
        let root = parse_document(b"<TransportResponse/>").unwrap();
        assert!(matches!(read_document(&root), Err(EnvelopeError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_plugin_is_kept() {
        let root = parse_document(
            b"<TransportResponse><TransportHeader><ResponseDetails><ResponseID>1</ResponseID>\
              </ResponseDetails></TransportHeader><TransportBody><Package><PackageHeader>\
              <ResponseDetails><ResponseID>2</ResponseID></ResponseDetails></PackageHeader>\
              <PackagePlugIns><Signatures/></PackagePlugIns></Package></TransportBody>\
              </TransportResponse>",
        )
        .unwrap();
        let ResponseDocument::Response(r) = read_document(&root).unwrap() else {
            panic!("expected response");
        };
        assert_eq!(r.packages.len(), 1);
        assert_eq!(r.packages[0].plugins, vec![PackagePlugin::Other("Signatures".into())]);
        assert_eq!(r.packages[0].data, None);
    }

    #[test]
    fn test_unreadable_plugin_stays_with_its_package() {
        let root = parse_document(
            b"<TransportResponse><TransportHeader><ResponseDetails><ResponseID>1</ResponseID>\
              </ResponseDetails></TransportHeader><TransportBody><Package><PackageHeader>\
              <ResponseDetails><ResponseID>2</ResponseID></ResponseDetails></PackageHeader>\
              <PackagePlugIns><DataTransforms><Compression order=\"x\"><Algorithm id=\"gzip\"/>\
              </Compression></DataTransforms></PackagePlugIns></Package></TransportBody>\
              </TransportResponse>",
        )
        .unwrap();
        let ResponseDocument::Response(r) = read_document(&root).unwrap() else {
            panic!("expected response");
        };
        assert!(matches!(
            &r.packages[0].plugins[0],
            PackagePlugin::Invalid { name, .. } if name == "DataTransforms"
        ));
    }
}
