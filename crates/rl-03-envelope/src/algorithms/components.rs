//! # Shared Components
//!
//! Reports, data containers and transform descriptors appear in both
//! requests and responses; their XML form is read and written here.
//!
//! ```text
//! <xcpt:Report highestWeight="…/weight/INFO">
//!   <xcpt:Flag weight="…/weight/INFO"><xcpt:Code/><xcpt:Text/></xcpt:Flag>
//! </xcpt:Report>
//!
//! <xplg:DataTransforms version="1.2">
//!   <xplg:Compression order="1">
//!     <xplg:Algorithm id="gzip"><xplg:Parameter name="…">…</xplg:Parameter></xplg:Algorithm>
//!     <xplg:InputData bytes="…"/>
//!     <xplg:OutputData bytes="…"/>
//!   </xplg:Compression>
//! </xplg:DataTransforms>
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use rl_02_transforms::{TransformDescriptor, TransformKind, TransformParams};
use shared_types::{highest_weight, Flag, FlagWeight};

use super::dom::Element;
use super::writer::XmlWriter;
use crate::domain::vocabulary::{CONTAINER_FILE, DATA_SOURCE_VERSION, DATA_TRANSFORMS_VERSION};
use crate::domain::{DataContainer, EnvelopeError, TextEncoding};

/// Format a timestamp as `xs:dateTime` in UTC.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an `xs:dateTime` with offset.
pub fn parse_time(element: &str, value: &str) -> Result<DateTime<Utc>, EnvelopeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| EnvelopeError::malformed(element, format!("bad timestamp {value:?}: {e}")))
}

fn optional_time(parent: &Element, name: &str) -> Result<Option<DateTime<Utc>>, EnvelopeError> {
    parent
        .text_at(&[name])
        .map(|value| parse_time(name, value))
        .transpose()
}

// =============================================================================
// REPORTS
// =============================================================================

/// Write a report. The aggregate weight defaults to the highest flag weight.
pub fn write_report(
    w: &mut XmlWriter,
    flags: &[Flag],
    highest: Option<FlagWeight>,
) -> Result<(), EnvelopeError> {
    let highest = highest.or_else(|| highest_weight(flags)).unwrap_or(FlagWeight::Info);
    w.open("xcpt:Report", &[("highestWeight", highest.uri())])?;
    write_flags(w, flags)?;
    w.close("xcpt:Report")
}

/// Write bare flag elements.
pub fn write_flags(w: &mut XmlWriter, flags: &[Flag]) -> Result<(), EnvelopeError> {
    for flag in flags {
        w.open("xcpt:Flag", &[("weight", flag.weight.uri())])?;
        w.leaf("xcpt:Code", &[], &flag.code)?;
        w.leaf("xcpt:Text", &[], &flag.text)?;
        w.close("xcpt:Flag")?;
    }
    Ok(())
}

fn parse_weight(element: &str, uri: &str) -> Result<FlagWeight, EnvelopeError> {
    FlagWeight::from_uri(uri)
        .ok_or_else(|| EnvelopeError::malformed(element, format!("unknown weight {uri:?}")))
}

/// Read the `Flag` children of `parent`.
pub fn read_flags(parent: &Element) -> Result<Vec<Flag>, EnvelopeError> {
    parent
        .children_named("Flag")
        .map(|flag| {
            let weight = parse_weight("Flag", flag.require_attr("weight")?)?;
            let code = flag.require_text(&["Code"])?;
            let text = flag.text_at(&["Text"]).unwrap_or_default();
            Ok(Flag::new(code, text, weight))
        })
        .collect()
}

/// Read a report: aggregate weight and flags.
///
/// The aggregate is the stated `highestWeight` raised to the highest flag
/// weight if a flag outranks it.
pub fn read_report(report: &Element) -> Result<(Option<FlagWeight>, Vec<Flag>), EnvelopeError> {
    let flags = read_flags(report)?;
    let stated = report
        .attr("highestWeight")
        .map(|uri| parse_weight("Report", uri))
        .transpose()?;
    Ok((stated.max(highest_weight(&flags)), flags))
}

// =============================================================================
// DATA SOURCE
// =============================================================================

/// Write a `DataSource` plug-in.
pub fn write_data_source(w: &mut XmlWriter, container: &DataContainer) -> Result<(), EnvelopeError> {
    let created = container.created.as_ref().map(format_time);
    let mut attrs = vec![("type", CONTAINER_FILE)];
    if let Some(created) = created.as_deref() {
        attrs.push(("created", created));
    }
    attrs.push(("encoding", container.encoding.id()));
    attrs.push(("name", container.name.as_str()));

    w.open("xplg:DataSource", &[("version", DATA_SOURCE_VERSION)])?;
    w.empty("xplg:DataContainer", &attrs)?;
    w.close("xplg:DataSource")
}

/// Read a `DataSource` plug-in. A missing encoding means ISO-8859-1.
pub fn read_data_source(source: &Element) -> Result<DataContainer, EnvelopeError> {
    let container = source
        .child("DataContainer")
        .ok_or_else(|| EnvelopeError::malformed("DataSource", "missing DataContainer"))?;
    let encoding = match container.attr("encoding") {
        Some(id) => TextEncoding::from_id(id).ok_or_else(|| EnvelopeError::Encoding {
            encoding: id.to_string(),
            reason: "unknown encoding".to_string(),
        })?,
        None => TextEncoding::default(),
    };
    Ok(DataContainer {
        name: container.attr("name").unwrap_or_default().to_string(),
        created: container
            .attr("created")
            .map(|value| parse_time("DataContainer", value))
            .transpose()?,
        encoding,
    })
}

// =============================================================================
// TRANSFORMS
// =============================================================================

fn kind_element(kind: TransformKind) -> &'static str {
    match kind {
        TransformKind::Compression => "xplg:Compression",
        TransformKind::Encryption => "xplg:Encryption",
    }
}

/// Write a `DataTransforms` plug-in.
pub fn write_transforms(
    w: &mut XmlWriter,
    descriptors: &[TransformDescriptor],
) -> Result<(), EnvelopeError> {
    w.open("xplg:DataTransforms", &[("version", DATA_TRANSFORMS_VERSION)])?;
    for d in descriptors {
        let element = kind_element(d.kind);
        let order = d.order.to_string();
        w.open(element, &[("order", order.as_str())])?;

        if d.params.is_empty() {
            w.empty("xplg:Algorithm", &[("id", d.algorithm_id.as_str())])?;
        } else {
            w.open("xplg:Algorithm", &[("id", d.algorithm_id.as_str())])?;
            for (name, value) in &d.params {
                w.leaf("xplg:Parameter", &[("name", name.as_str())], value)?;
            }
            w.close("xplg:Algorithm")?;
        }

        if let Some(bytes) = d.input_bytes {
            w.empty("xplg:InputData", &[("bytes", bytes.to_string().as_str())])?;
        }
        if let Some(bytes) = d.output_bytes {
            w.empty("xplg:OutputData", &[("bytes", bytes.to_string().as_str())])?;
        }
        w.close(element)?;
    }
    w.close("xplg:DataTransforms")
}

fn parse_number<T: std::str::FromStr>(element: &str, value: &str) -> Result<T, EnvelopeError> {
    value
        .trim()
        .parse()
        .map_err(|_| EnvelopeError::malformed(element, format!("not a number: {value:?}")))
}

fn read_byte_count(step: &Element, name: &str) -> Result<Option<u64>, EnvelopeError> {
    step.child(name)
        .map(|el| parse_number(name, el.require_attr("bytes")?))
        .transpose()
}

/// Read a `DataTransforms` plug-in in document order.
pub fn read_transforms(transforms: &Element) -> Result<Vec<TransformDescriptor>, EnvelopeError> {
    transforms
        .children
        .iter()
        .map(|step| {
            let kind = match step.name.as_str() {
                "Compression" => TransformKind::Compression,
                "Encryption" => TransformKind::Encryption,
                other => {
                    return Err(EnvelopeError::malformed(
                        "DataTransforms",
                        format!("unknown step {other}"),
                    ))
                }
            };
            let algorithm = step
                .child("Algorithm")
                .ok_or_else(|| EnvelopeError::malformed(&step.name, "missing Algorithm"))?;
            let params: TransformParams = algorithm
                .children_named("Parameter")
                .map(|p| Ok((p.require_attr("name")?.to_string(), p.text().to_string())))
                .collect::<Result<_, EnvelopeError>>()?;

            Ok(TransformDescriptor {
                order: parse_number(&step.name, step.require_attr("order")?)?,
                kind,
                algorithm_id: algorithm.require_attr("id")?.to_string(),
                params,
                input_bytes: read_byte_count(step, "InputData")?,
                output_bytes: read_byte_count(step, "OutputData")?,
            })
        })
        .collect()
}

/// `ResponseDetails`-style block: response id, timestamp and report.
pub struct ResponseDetails {
    /// Response id.
    pub response_id: String,
    /// Timestamp, if present.
    pub timestamp: Option<DateTime<Utc>>,
    /// Aggregate weight.
    pub highest_weight: Option<FlagWeight>,
    /// Flags.
    pub flags: Vec<Flag>,
}

/// Read a `ResponseDetails` block. A missing report means no flags.
pub fn read_response_details(details: &Element) -> Result<ResponseDetails, EnvelopeError> {
    let (highest_weight, flags) = match details.child("Report") {
        Some(report) => read_report(report)?,
        None => (None, Vec::new()),
    };
    Ok(ResponseDetails {
        response_id: details.require_text(&["ResponseID"])?.to_string(),
        timestamp: optional_time(details, "TimeStamp")?,
        highest_weight,
        flags,
    })
}

/// Write a `ResponseDetails` block.
pub fn write_response_details(
    w: &mut XmlWriter,
    response_id: &str,
    timestamp: Option<&DateTime<Utc>>,
    flags: &[Flag],
) -> Result<(), EnvelopeError> {
    w.open("xcpt:ResponseDetails", &[])?;
    w.leaf("xcpt:ResponseID", &[], response_id)?;
    if let Some(time) = timestamp {
        w.leaf("xcpt:TimeStamp", &[], &format_time(time))?;
    }
    write_report(w, flags, None)?;
    w.close("xcpt:ResponseDetails")
}
