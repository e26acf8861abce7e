//! # Response Fixtures
//!
//! Builders for service response documents, used by tests across the
//! workspace. Compiled for tests and with the `test-fixtures` feature.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use rl_02_transforms::TransformDescriptor;
use shared_types::{Flag, FlagWeight};

use crate::algorithms::components::{
    format_time, write_data_source, write_flags, write_report, write_response_details,
    write_transforms,
};
use crate::algorithms::XmlWriter;
use crate::domain::vocabulary::{ENVELOPE_VERSION, NS_COMPONENTS, NS_PLUGINS, NS_RESPONSE};
use crate::domain::{DataContainer, EnvelopeError};

/// Status code of a still-pending result.
pub const PENDING: &str = "E97";
/// Status code of a completed result.
pub const COMPLETED: &str = "E98";

/// One package of a [`ResponseFixture`].
#[derive(Debug, Clone, Default)]
pub struct PackageFixture {
    response_id: String,
    timestamp: Option<DateTime<Utc>>,
    flags: Vec<Flag>,
    container: Option<DataContainer>,
    transforms: Option<Vec<TransformDescriptor>>,
    other_plugins: Vec<String>,
    data: Option<Vec<u8>>,
}

impl PackageFixture {
    /// Empty package with `response_id`.
    pub fn new(response_id: impl Into<String>) -> Self {
        Self {
            response_id: response_id.into(),
            ..Self::default()
        }
    }

    /// Package timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Add a flag.
    pub fn flag(mut self, code: &str, text: &str, weight: FlagWeight) -> Self {
        self.flags.push(Flag::new(code, text, weight));
        self
    }

    /// Attach a `DataSource` plug-in.
    pub fn data_source(mut self, container: DataContainer) -> Self {
        self.container = Some(container);
        self
    }

    /// Attach a `DataTransforms` plug-in.
    pub fn transforms(mut self, descriptors: Vec<TransformDescriptor>) -> Self {
        self.transforms = Some(descriptors);
        self
    }

    /// Attach an empty plug-in with an arbitrary element name.
    pub fn plugin(mut self, name: impl Into<String>) -> Self {
        self.other_plugins.push(name.into());
        self
    }

    /// Package data, base64-encoded on write.
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    fn write(&self, w: &mut XmlWriter) -> Result<(), EnvelopeError> {
        w.open("xres:Package", &[])?;
        w.open("xres:PackageHeader", &[])?;
        write_response_details(w, &self.response_id, self.timestamp.as_ref(), &self.flags)?;
        w.close("xres:PackageHeader")?;

        if self.container.is_some() || self.transforms.is_some() || !self.other_plugins.is_empty() {
            w.open("xres:PackagePlugIns", &[])?;
            if let Some(container) = &self.container {
                write_data_source(w, container)?;
            }
            if let Some(transforms) = &self.transforms {
                write_transforms(w, transforms)?;
            }
            for name in &self.other_plugins {
                w.empty(&format!("xplg:{name}"), &[("version", "1.0")])?;
            }
            w.close("xres:PackagePlugIns")?;
        }

        if let Some(data) = &self.data {
            w.open("xres:PackageBody", &[])?;
            w.open("xcpt:Data", &[])?;
            w.leaf("xcpt:Base64CharSequence", &[], &BASE64.encode(data))?;
            w.close("xcpt:Data")?;
            w.close("xres:PackageBody")?;
        }
        w.close("xres:Package")
    }
}

/// A service response document.
#[derive(Debug, Clone, Default)]
pub struct ResponseFixture {
    response_id: String,
    timestamp: Option<DateTime<Utc>>,
    highest_weight: Option<FlagWeight>,
    flags: Vec<Flag>,
    packages: Vec<PackageFixture>,
}

impl ResponseFixture {
    /// Response with `response_id` and no flags.
    pub fn new(response_id: impl Into<String>) -> Self {
        Self {
            response_id: response_id.into(),
            ..Self::default()
        }
    }

    /// Deliver acknowledgement: one Info flag.
    pub fn accepted(response_id: impl Into<String>) -> Self {
        Self::new(response_id).flag("C00", "accepted", FlagWeight::Info)
    }

    /// Query answer while results are pending.
    pub fn pending(response_id: impl Into<String>) -> Self {
        Self::new(response_id).flag(PENDING, "processing", FlagWeight::Info)
    }

    /// Query answer with completed results.
    pub fn completed(response_id: impl Into<String>) -> Self {
        Self::new(response_id).flag(COMPLETED, "results available", FlagWeight::Info)
    }

    /// Response timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Add a header flag.
    pub fn flag(mut self, code: &str, text: &str, weight: FlagWeight) -> Self {
        self.flags.push(Flag::new(code, text, weight));
        self
    }

    /// Override the stated aggregate weight.
    pub fn highest_weight(mut self, weight: FlagWeight) -> Self {
        self.highest_weight = Some(weight);
        self
    }

    /// Add a package.
    pub fn package(mut self, package: PackageFixture) -> Self {
        self.packages.push(package);
        self
    }

    /// Serialize as an ISO-8859-1 document.
    pub fn try_to_xml(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut w = XmlWriter::new()?;
        w.open(
            "xres:TransportResponse",
            &[
                ("xmlns:xres", NS_RESPONSE),
                ("xmlns:xcpt", NS_COMPONENTS),
                ("xmlns:xplg", NS_PLUGINS),
                ("version", ENVELOPE_VERSION),
            ],
        )?;

        w.open("xres:TransportHeader", &[])?;
        w.open("xcpt:ResponseDetails", &[])?;
        w.leaf("xcpt:ResponseID", &[], &self.response_id)?;
        if let Some(time) = &self.timestamp {
            w.leaf("xcpt:TimeStamp", &[], &format_time(time))?;
        }
        write_report(&mut w, &self.flags, self.highest_weight)?;
        w.close("xcpt:ResponseDetails")?;
        w.close("xres:TransportHeader")?;

        if !self.packages.is_empty() {
            w.open("xres:TransportBody", &[])?;
            for package in &self.packages {
                package.write(&mut w)?;
            }
            w.close("xres:TransportBody")?;
        }

        w.close("xres:TransportResponse")?;
        w.finish()
    }

    /// Serialize as an ISO-8859-1 document.
    ///
    /// # Panics
    ///
    /// Only if the writer fails, which fixtures built from strings cannot
    /// trigger.
    pub fn to_xml(&self) -> Vec<u8> {
        self.try_to_xml()
            .unwrap_or_else(|e| panic!("fixture serialization failed: {e}"))
    }
}

/// An `XMLError` document holding `flags`.
pub fn xml_error(flags: &[Flag]) -> Vec<u8> {
    let write = || -> Result<Vec<u8>, EnvelopeError> {
        let mut w = XmlWriter::new()?;
        w.open("xcpt:XMLError", &[("xmlns:xcpt", NS_COMPONENTS)])?;
        write_flags(&mut w, flags)?;
        w.close("xcpt:XMLError")?;
        w.finish()
    };
    write().unwrap_or_else(|e| panic!("fixture serialization failed: {e}"))
}
