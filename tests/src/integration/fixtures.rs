//! Shared fixtures: parties, subjects, result files and a scripted server.

use chrono::{NaiveDate, NaiveDateTime};
use rl_01_batch_records::{
    BatchRecordCodec, BatchRequest, EncodedBatch, InboundBatch, LookupStatus, ProductRegistration,
};
use rl_04_registry_client::ClientIdentity;
use shared_types::{Company, Salutation, Sender, Sex, Subject};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// =============================================================================
// PARTIES AND SUBJECTS
// =============================================================================

pub fn sender() -> Sender {
    Sender {
        organization_id: "12345678".into(),
        name: "Lohnbüro Beispiel".into(),
        street: "Hauptstr. 1".into(),
        postal_code: "12345".into(),
        city: "Berlin".into(),
        contact_person: "Erika Mustermann".into(),
        contact_salutation: Salutation::Female,
        phone: "030 123456".into(),
        fax: String::new(),
        email: "lohn@example.org".into(),
    }
}

pub fn company() -> Company {
    Company {
        organization_id: "87654321".into(),
        name: "Beispiel GmbH".into(),
        street: "Nebenweg 2".into(),
        postal_code: "12345".into(),
        city: "Berlin".into(),
    }
}

pub fn identity() -> ClientIdentity {
    ClientIdentity {
        sender: sender(),
        company: company(),
    }
}

pub fn registration() -> ProductRegistration {
    ProductRegistration {
        product_id: "1234567".into(),
        module_id: "7654321".into(),
    }
}

pub fn subject(id: u64) -> Subject {
    Subject {
        id,
        personnel_number: format!("P{id:04}"),
        surname: "Müller".into(),
        given_name: "Jürgen".into(),
        birth_name: None,
        birth_date: NaiveDate::from_ymd_opt(1965, 3, 12).unwrap(),
        birth_place: Some("Köln".into()),
        sex: Sex::Male,
        postal_code: "50667".into(),
        city: "Köln".into(),
    }
}

pub fn subjects(n: u64) -> Vec<Subject> {
    (1..=n).map(subject).collect()
}

pub fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 2)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

pub fn encode_request(codec: &BatchRecordCodec, subjects: &[Subject], file_number: u32) -> EncodedBatch {
    let (sender, company, registration) = (sender(), company(), registration());
    codec
        .encode_outbound(&BatchRequest {
            sender: &sender,
            company: &company,
            receiver_id: "66667777",
            registration: &registration,
            file_number,
            created: created(),
            subjects,
        })
        .unwrap()
}

/// The result file the service would return for `request`: every subject
/// resolved to a unique identifier.
pub fn result_file(codec: &BatchRecordCodec, request: &EncodedBatch) -> InboundBatch {
    let outbound = codec.decode_outbound(&request.records.join("\r\n")).unwrap();

    let mut service_header = outbound.header.clone();
    service_header.procedure_marker = "DSRVT".into();
    let mut service_trailer = outbound.trailer.clone();
    service_trailer.procedure_marker = "DSRVT".into();
    service_trailer.record_count = 2;

    let details = outbound
        .details
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, mut detail)| {
            detail.status = LookupStatus::Unique;
            detail.assigned_id = Some(format!("65120365M{:03}", i + 1));
            detail
        })
        .collect();

    InboundBatch {
        service_header,
        sender_header: outbound.header,
        details,
        sender_trailer: outbound.trailer,
        service_trailer,
    }
}

// =============================================================================
// SCRIPTED HTTP SERVER
// =============================================================================

/// Local HTTP server answering each connection with the next scripted reply.
pub struct ScriptedServer {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    /// Start serving `replies` as `(status line, body)` pairs.
    pub async fn start(replies: Vec<(&'static str, Vec<u8>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            for (status, body) in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);

                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: text/xml; charset=iso-8859-1\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            endpoint: format!("http://{addr}/dsvv/rest"),
            requests,
        }
    }

    /// Request bodies received so far, Latin-1 decoded.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = socket.read(&mut buf).await.unwrap_or(0);
        request.extend_from_slice(&buf[..n]);
        if let Some(end) = find(&request, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                return shared_types::decode_latin1(&request[end + 4..end + 4 + length]);
            }
        }
        if n == 0 {
            return String::new();
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
