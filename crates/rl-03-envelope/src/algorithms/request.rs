//! # Request Serialization
//!
//! Writes a [`RequestEnvelope`] as an ISO-8859-1 XML document.
//!
//! ```text
//! xreq:Transport
//! ├── xreq:TransportHeader   sender, receiver, request details
//! ├── xreq:TransportPlugIns  deliver only: DataTransforms, DataSource, Contacts
//! └── xreq:TransportBody     base64 data | DataRequest | ConfirmationOfReceipt
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::components::{format_time, write_data_source, write_transforms};
use super::writer::XmlWriter;
use crate::domain::vocabulary::*;
use crate::domain::{EnvelopeError, RequestBody, RequestEnvelope, RequestHeader};

/// Serialize `envelope`.
pub fn write_request(envelope: &RequestEnvelope) -> Result<Vec<u8>, EnvelopeError> {
    let with_messages = !matches!(envelope.body, RequestBody::Payload { .. });

    let mut attrs = vec![
        ("xmlns:xreq", NS_REQUEST),
        ("xmlns:xcpt", NS_COMPONENTS),
        ("xmlns:xplg", NS_PLUGINS),
    ];
    if with_messages {
        attrs.push(("xmlns:xmsg", NS_MESSAGE));
    }
    attrs.push(("version", ENVELOPE_VERSION));
    attrs.push(("profile", envelope.profile_uri.as_str()));

    let mut w = XmlWriter::new()?;
    w.open("xreq:Transport", &attrs)?;
    write_header(&mut w, &envelope.header)?;

    match &envelope.body {
        RequestBody::Payload {
            data,
            transforms,
            container,
            contact_email,
        } => {
            w.open("xreq:TransportPlugIns", &[])?;
            write_transforms(&mut w, transforms)?;
            write_data_source(&mut w, container)?;
            w.open("xplg:Contacts", &[("version", CONTACTS_VERSION)])?;
            w.open("xplg:SenderContact", &[])?;
            w.leaf("xplg:Endpoint", &[("type", ENDPOINT_SMTP)], contact_email)?;
            w.close("xplg:SenderContact")?;
            w.close("xplg:Contacts")?;
            w.close("xreq:TransportPlugIns")?;

            w.open("xreq:TransportBody", &[])?;
            w.open("xcpt:Data", &[])?;
            w.leaf("xcpt:Base64CharSequence", &[], &BASE64.encode(data))?;
            w.close("xcpt:Data")?;
            w.close("xreq:TransportBody")?;
        }
        RequestBody::Query { cursor, procedure } => {
            open_element_sequence(&mut w)?;
            w.open("xmsg:DataRequest", &[("version", DATA_REQUEST_VERSION)])?;
            w.open("xmsg:Query", &[])?;
            w.open(
                "xmsg:Argument",
                &[
                    ("property", PROPERTY_RESPONSE_ID),
                    ("type", XS_STRING),
                    ("event", EVENT_SEND_DATA),
                ],
            )?;
            w.leaf("xmsg:GT", &[], cursor)?;
            w.close("xmsg:Argument")?;
            w.open("xmsg:Argument", &[("property", PROPERTY_PROCEDURE), ("type", XS_STRING)])?;
            w.leaf("xmsg:EQ", &[], procedure)?;
            w.close("xmsg:Argument")?;
            w.close("xmsg:Query")?;
            w.close("xmsg:DataRequest")?;
            close_element_sequence(&mut w)?;
        }
        RequestBody::Acknowledge { response_ids } => {
            open_element_sequence(&mut w)?;
            w.open("xmsg:ConfirmationOfReceipt", &[("version", CONFIRMATION_VERSION)])?;
            w.open("xmsg:PropertySet", &[("name", PROPERTY_RESPONSE_ID)])?;
            for id in response_ids {
                w.leaf("xmsg:Value", &[], id)?;
            }
            w.close("xmsg:PropertySet")?;
            w.close("xmsg:ConfirmationOfReceipt")?;
            close_element_sequence(&mut w)?;
        }
    }

    w.close("xreq:Transport")?;
    w.finish()
}

fn write_header(w: &mut XmlWriter, header: &RequestHeader) -> Result<(), EnvelopeError> {
    w.open("xreq:TransportHeader", &[])?;
    w.open("xcpt:Sender", &[])?;
    w.leaf("xcpt:SenderID", &[], &header.sender_id)?;
    w.close("xcpt:Sender")?;
    w.open("xcpt:Receiver", &[])?;
    w.leaf("xcpt:ReceiverID", &[], &header.receiver_id)?;
    w.close("xcpt:Receiver")?;

    w.open("xcpt:RequestDetails", &[])?;
    w.leaf("xcpt:RequestID", &[], &header.request_id)?;
    w.leaf("xcpt:TimeStamp", &[], &format_time(&header.timestamp))?;
    w.open("xcpt:Application", &[])?;
    w.leaf("xcpt:Manufacturer", &[], &header.application.manufacturer)?;
    w.leaf("xcpt:Product", &[], &header.application.product)?;
    w.close("xcpt:Application")?;
    w.leaf("xcpt:Procedure", &[], &header.procedure)?;
    w.leaf("xcpt:DataType", &[], &header.data_type)?;
    w.leaf("xcpt:Scenario", &[], &header.scenario)?;
    w.close("xcpt:RequestDetails")?;
    w.close("xreq:TransportHeader")
}

fn open_element_sequence(w: &mut XmlWriter) -> Result<(), EnvelopeError> {
    w.open("xreq:TransportBody", &[])?;
    w.open("xcpt:Data", &[])?;
    w.open("xcpt:ElementSequence", &[])
}

fn close_element_sequence(w: &mut XmlWriter) -> Result<(), EnvelopeError> {
    w.close("xcpt:ElementSequence")?;
    w.close("xcpt:Data")?;
    w.close("xreq:TransportBody")
}
