pub mod auth;
pub mod google;
pub mod memory;

use crate::{config::ClientConfig, error::Error, error::Result};
use tonic::transport::{Channel, ClientTlsConfig};
use tracing::debug;

/// Where a gRPC channel should connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    /// `scheme://host[:port]`
    pub(crate) uri: String,
    /// Server name for TLS; `None` connects in plaintext.
    pub(crate) tls_domain: Option<String>,
}

impl Target {
    pub(crate) fn tls(domain: &str) -> Self {
        Target {
            uri: ["https://", domain].concat(),
            tls_domain: Some(domain.to_string()),
        }
    }

    pub(crate) fn plaintext(authority: &str) -> Self {
        Target {
            uri: ["http://", authority].concat(),
            tls_domain: None,
        }
    }
}

pub(crate) async fn create_channel(target: &Target, config: &ClientConfig) -> Result<Channel> {
    debug!("Connecting to {}", target.uri);
    let mut endpoint = Channel::from_shared(target.uri.clone())
        .map_err(|e| Error::Connection(format!("invalid endpoint {}: {}", target.uri, e)))?
        .connect_timeout(config.connect_timeout);
    if let Some(timeout) = config.request_timeout {
        endpoint = endpoint.timeout(timeout);
    }
    if let Some(domain) = &target.tls_domain {
        let tls = ClientTlsConfig::new()
            .domain_name(domain.clone())
            .with_native_roots();
        endpoint = endpoint.tls_config(tls)?;
    }
    let channel = endpoint.connect().await?;
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::{create_channel, Target};
    use crate::{config::ClientConfig, error::Error};
    use std::time::Duration;

    #[test]
    fn targets() {
        let target = Target::tls("firestore.googleapis.com");
        assert_eq!(target.uri, "https://firestore.googleapis.com");
        assert_eq!(target.tls_domain.as_deref(), Some("firestore.googleapis.com"));

        let target = Target::plaintext("localhost:8080");
        assert_eq!(target.uri, "http://localhost:8080");
        assert_eq!(target.tls_domain, None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() {
        // Nothing listens on the discard port of the loopback interface.
        let config = ClientConfig::default().with_connect_timeout(Duration::from_millis(500));
        let err = create_channel(&Target::plaintext("127.0.0.1:9"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "{:?}", err);
    }
}
