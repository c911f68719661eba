//! In-memory fakes shared by the unit tests.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::client::{AgentResponse, AgentTransport, TransportError};

/// Writer recording every `write` call separately.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl SharedBuffer {
    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.writes().concat()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Canned behaviour for one agent host.
#[derive(Clone)]
pub(crate) enum Script {
    Respond {
        status: u16,
        body: Vec<u8>,
        delay: Duration,
    },
    Refuse,
    Panic,
}

impl Script {
    pub(crate) fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::Respond {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn delayed(self, delay: Duration) -> Self {
        match self {
            Self::Respond { status, body, .. } => Self::Respond {
                status,
                body,
                delay,
            },
            other => other,
        }
    }

    pub(crate) fn with_status(self, status: u16) -> Self {
        match self {
            Self::Respond { body, delay, .. } => Self::Respond {
                status,
                body,
                delay,
            },
            other => other,
        }
    }
}

/// Transport answering from per-host scripts and recording every request.
/// Unknown hosts refuse the connection.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: HashMap<String, Script>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub(crate) fn script(mut self, host: &str, script: Script) -> Self {
        self.scripts.insert(host.to_string(), script);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AgentTransport for ScriptedTransport {
    async fn fetch(&self, url: Url) -> Result<AgentResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());
        let script = url
            .host_str()
            .and_then(|host| self.scripts.get(host))
            .cloned()
            .unwrap_or(Script::Refuse);

        match script {
            Script::Respond {
                status,
                body,
                delay,
            } => {
                tokio::time::sleep(delay).await;
                Ok(AgentResponse { status, body })
            }
            Script::Refuse => Err(TransportError::Send {
                source: "connection refused".into(),
            }),
            Script::Panic => panic!("scripted agent panic"),
        }
    }
}
