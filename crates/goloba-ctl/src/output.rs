//! Block renderers and the serialized output sink.
//!
//! Each agent's answer is rendered into one buffer and handed to a
//! [`ReportSink`] as a single write, so concurrent agents never interleave.

use std::error::Error;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use goloba_api_models::Info;

use crate::decode::Payload;

const STATUS_HEADER: &str = "Prot LocalAddress:Port Scheduler Flags\n";
const STATUS_COLUMNS: &str =
    "  -> RemoteAddress:Port           Forward Weight ActiveConn InActConn Detached Locked\n";

/// Shared writer accepting whole blocks only.
pub(crate) struct ReportSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ReportSink {
    pub(crate) fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub(crate) fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write `block` in one `write_all` while holding the sink.
    pub(crate) fn emit(&self, block: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(block)?;
        writer.flush()
    }
}

/// Render a decoded payload into the bytes emitted for one agent.
pub(crate) fn render_payload(label: &str, payload: &Payload) -> Vec<u8> {
    match payload {
        Payload::Labeled(body) => {
            let mut block = Vec::with_capacity(label.len() + body.len() + 3);
            block.extend_from_slice(label.as_bytes());
            block.extend_from_slice(b":\n");
            block.extend_from_slice(body);
            block.push(b'\n');
            block
        }
        Payload::Verbatim(body) => body.clone(),
        Payload::Report(info) => render_status_table(label, info).into_bytes(),
    }
}

/// Render an `/info` document as an ipvsadm-like table.
pub(crate) fn render_status_table(label: &str, info: &Info) -> String {
    let mut text = String::new();
    text.push_str(&format!("{label}:\n"));
    text.push_str(STATUS_HEADER);
    text.push_str(STATUS_COLUMNS);
    for service in &info.services {
        text.push_str(&format!(
            "{:<4} {} {}\n",
            service.protocol,
            host_port(&service.address, service.port),
            service.schedule
        ));
        for dest in &service.destinations {
            text.push_str(&format!(
                "  -> {:<28} {:<7} {:<6} {:<10} {:<9} {:<8} {}\n",
                host_port(&dest.address, dest.port),
                dest.forward,
                dest.weight,
                dest.active_conn,
                dest.inactive_conn,
                dest.detached,
                dest.locked
            ));
        }
    }
    text.push('\n');
    text
}

/// Diagnostic line describing why an agent produced no report block.
pub(crate) fn render_failure(label: &str, error: &(dyn Error + 'static)) -> Vec<u8> {
    format!("{label}: {}\n", error_chain(error)).into_bytes()
}

/// Display an error followed by its sources, joined with `: `.
pub(crate) fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

fn host_port(address: &str, port: u16) -> String {
    if address.contains(':') {
        format!("[{address}]:{port}")
    } else {
        format!("{address}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TransportError;
    use crate::test_support::SharedBuffer;
    use goloba_api_models::{Destination, Service};

    fn sample_service(destinations: Vec<Destination>) -> Service {
        Service {
            protocol: "tcp".to_string(),
            address: "192.168.122.2".to_string(),
            port: 80,
            schedule: "wrr".to_string(),
            destinations,
        }
    }

    #[test]
    fn status_table_matches_fixed_layout() {
        let info = Info {
            services: vec![sample_service(vec![Destination {
                address: "192.168.122.62".to_string(),
                port: 80,
                forward: "droute".to_string(),
                weight: 100,
                active_conn: 0,
                inactive_conn: 0,
                detached: true,
                locked: false,
            }])],
        };

        let rendered = render_status_table("http://lb01:8880", &info);
        let expected = concat!(
            "http://lb01:8880:\n",
            "Prot LocalAddress:Port Scheduler Flags\n",
            "  -> RemoteAddress:Port           Forward Weight ActiveConn InActConn Detached Locked\n",
            "tcp  192.168.122.2:80 wrr\n",
            "  -> 192.168.122.62:80            droute  100    0          0         true     false\n",
            "\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn service_without_destinations_renders_header_row_only() {
        let info = Info {
            services: vec![sample_service(Vec::new())],
        };
        let rendered = render_status_table("lb", &info);
        let rows: Vec<&str> = rendered.lines().skip(3).collect();
        assert_eq!(rows, ["tcp  192.168.122.2:80 wrr", ""]);
    }

    #[test]
    fn ipv6_service_and_destination_rows_are_bracketed() {
        let mut service = sample_service(vec![Destination {
            address: "2001:db8::62".to_string(),
            port: 443,
            forward: "masq".to_string(),
            weight: 10,
            ..Destination::default()
        }]);
        service.address = "2001:db8::2".to_string();
        service.port = 443;

        let rendered = render_status_table("lb", &Info {
            services: vec![service],
        });
        let rows: Vec<&str> = rendered.lines().skip(3).collect();
        assert_eq!(
            rows,
            [
                "tcp  [2001:db8::2]:443 wrr",
                "  -> [2001:db8::62]:443           masq    10     0          0         false    false",
                "",
            ]
        );
    }

    #[test]
    fn ipv6_addresses_are_bracketed() {
        assert_eq!(host_port("2001:db8::1", 443), "[2001:db8::1]:443");
        assert_eq!(host_port("10.0.0.1", 80), "10.0.0.1:80");
    }

    #[test]
    fn labeled_payload_is_byte_exact() {
        let body = b"{\"services\":[]}\xfe".to_vec();
        let block = render_payload("http://lb02", &Payload::Labeled(body.clone()));
        let mut expected = b"http://lb02:\n".to_vec();
        expected.extend_from_slice(&body);
        expected.push(b'\n');
        assert_eq!(block, expected);
    }

    #[test]
    fn verbatim_payload_has_no_label() {
        let block = render_payload("http://lb02", &Payload::Verbatim(b"unlocked\n".to_vec()));
        assert_eq!(block, b"unlocked\n");
    }

    #[test]
    fn failure_line_includes_error_chain() {
        let err = TransportError::Send {
            source: "connection refused".into(),
        };
        let line = render_failure("http://lb03", &err);
        assert_eq!(line, b"http://lb03: failed to send request: connection refused\n");
    }

    #[test]
    fn sink_emits_each_block_in_one_write() -> io::Result<()> {
        let buffer = SharedBuffer::default();
        let sink = ReportSink::new(buffer.clone());
        sink.emit(b"first\nblock\n")?;
        sink.emit(b"second\n")?;
        assert_eq!(
            buffer.writes(),
            vec![b"first\nblock\n".to_vec(), b"second\n".to_vec()]
        );
        Ok(())
    }
}
