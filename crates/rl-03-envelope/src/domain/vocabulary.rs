//! # Vocabulary
//!
//! Namespaces and URIs of the envelope format.

/// Request namespace.
pub const NS_REQUEST: &str = "http://www.extra-standard.de/namespace/request/1";
/// Response namespace.
pub const NS_RESPONSE: &str = "http://www.extra-standard.de/namespace/response/1";
/// Shared components namespace.
pub const NS_COMPONENTS: &str = "http://www.extra-standard.de/namespace/components/1";
/// Plug-in namespace.
pub const NS_PLUGINS: &str = "http://www.extra-standard.de/namespace/plugins/1";
/// Message namespace (query and acknowledge bodies).
pub const NS_MESSAGE: &str = "http://www.extra-standard.de/namespace/message/1";

/// Envelope format version.
pub const ENVELOPE_VERSION: &str = "1.4";
/// `DataTransforms` plug-in version.
pub const DATA_TRANSFORMS_VERSION: &str = "1.2";
/// `DataSource` plug-in version.
pub const DATA_SOURCE_VERSION: &str = "1.0";
/// `Contacts` plug-in version.
pub const CONTACTS_VERSION: &str = "1.0";
/// `DataRequest` message version.
pub const DATA_REQUEST_VERSION: &str = "1.0";
/// `ConfirmationOfReceipt` message version.
pub const CONFIRMATION_VERSION: &str = "1.3";

/// Scenario: request answered by an acknowledgement only.
pub const SCENARIO_WITH_ACKNOWLEDGEMENT: &str =
    "http://www.extra-standard.de/scenario/request-with-acknowledgement";
/// Scenario: request answered with data.
pub const SCENARIO_WITH_RESPONSE: &str = "http://www.extra-standard.de/scenario/request-with-response";

/// Data type of query envelopes.
pub const DATA_TYPE_DATA_REQUEST: &str = "http://www.extra-standard.de/datatypes/DataRequest";
/// Data type of acknowledge envelopes.
pub const DATA_TYPE_CONFIRMATION: &str =
    "http://www.extra-standard.de/datatypes/ConfirmationOfReceipt";

/// Query property: response id.
pub const PROPERTY_RESPONSE_ID: &str = "http://www.extra-standard.de/property/ResponseID";
/// Query property: procedure.
pub const PROPERTY_PROCEDURE: &str = "http://www.extra-standard.de/property/Procedure";
/// Query event: data was sent.
pub const EVENT_SEND_DATA: &str = "http://www.extra-standard.de/event/SendData";
/// Type of the response id operand.
pub const XS_STRING: &str = "xs:string";

/// Data container type for file payloads.
pub const CONTAINER_FILE: &str = "http://www.extra-standard.de/container/FILE";

/// Endpoint type of the sender contact.
pub const ENDPOINT_SMTP: &str = "SMTP";
