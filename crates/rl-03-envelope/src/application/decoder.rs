//! # Package Decoder
//!
//! Turns a response package into a [`PackageInfo`]: plug-ins are processed
//! in document order, each DataTransforms plug-in reversing its own steps,
//! and the content is decoded per the announced encoding. Error packages
//! carry no content.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rl_02_transforms::TransformPipeline;
use tracing::{debug, warn};

use crate::domain::{
    DataContainer, EnvelopeError, Package, PackageInfo, PackagePlugin, ResponseEnvelope,
};

/// Decodes response packages.
#[derive(Debug, Clone, Default)]
pub struct PackageDecoder {
    pipeline: TransformPipeline,
}

impl PackageDecoder {
    /// Decoder reversing transforms with `pipeline`.
    pub fn new(pipeline: TransformPipeline) -> Self {
        Self { pipeline }
    }

    /// The transform pipeline.
    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    /// Decode one package.
    ///
    /// An Error package only contributes its DataSource metadata; its other
    /// plug-ins and its data are not looked at.
    ///
    /// # Errors
    ///
    /// - `UnsupportedPlugin` for a plug-in other than DataSource or DataTransforms
    /// - `InvalidPlugin` for a plug-in whose content could not be read
    /// - `Malformed` if a package without Error flag has no data
    /// - `Base64`, `Transform` or `Encoding` if the data cannot be recovered
    pub fn decode_package(&self, package: &Package) -> Result<PackageInfo, EnvelopeError> {
        if package.is_error() {
            let container = package.plugins.iter().find_map(|plugin| match plugin {
                PackagePlugin::DataSource(source) => Some(source),
                _ => None,
            });
            debug!("[rl-03] Package {} rejected by the service", package.response_id);
            return Ok(package_info(package, container, None));
        }

        let data = package.data.as_deref().ok_or_else(|| {
            EnvelopeError::malformed(format!("Package {}", package.response_id), "missing data")
        })?;
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let mut content = BASE64.decode(compact)?;

        let mut container: Option<&DataContainer> = None;
        let mut reversed = 0;
        for plugin in &package.plugins {
            match plugin {
                PackagePlugin::DataSource(source) => container = Some(source),
                PackagePlugin::DataTransforms(steps) => {
                    content = self.pipeline.reverse(&content, steps)?;
                    reversed += steps.len();
                }
                PackagePlugin::Other(name) => {
                    return Err(EnvelopeError::UnsupportedPlugin(name.clone()))
                }
                PackagePlugin::Invalid { name, reason } => {
                    return Err(EnvelopeError::InvalidPlugin {
                        plugin: name.clone(),
                        reason: reason.clone(),
                    })
                }
            }
        }

        debug!(
            "[rl-03] Decoded package {} ({} transforms)",
            package.response_id, reversed
        );
        let mut info = package_info(package, container, None);
        info.text = Some(info.encoding.decode(&content)?);
        info.content = Some(content);
        Ok(info)
    }

    /// Decode every package of `response` independently.
    pub fn decode_response(
        &self,
        response: &ResponseEnvelope,
    ) -> Vec<Result<PackageInfo, EnvelopeError>> {
        response
            .packages
            .iter()
            .map(|package| {
                let decoded = self.decode_package(package);
                if let Err(e) = &decoded {
                    warn!("[rl-03] Package {} not decodable: {}", package.response_id, e);
                }
                decoded
            })
            .collect()
    }
}

fn package_info(
    package: &Package,
    container: Option<&DataContainer>,
    content: Option<Vec<u8>>,
) -> PackageInfo {
    PackageInfo {
        response_id: package.response_id.clone(),
        timestamp: package.timestamp,
        flags: package.flags.clone(),
        is_error: package.is_error(),
        file_name: container.map(|c| c.name.clone()).filter(|n| !n.is_empty()),
        file_created: container.and_then(|c| c.created),
        encoding: container.map(|c| c.encoding).unwrap_or_default(),
        content,
        text: None,
    }
}
