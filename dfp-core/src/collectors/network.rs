use std::sync::Arc;

use async_trait::async_trait;
use dfp_error::{FingerprintError, Result};
use serde_json::json;

use super::Collector;
use crate::constants::fallback;
use crate::data::{ConnectionInfo, NetworkInfo, Signal, SignalCategory};
use crate::logger::Logger;
use crate::platform::{NetworkSource, Probe};

/// Connection estimate and best-effort IP geolocation
pub struct NetworkCollector {
    source: Arc<dyn NetworkSource>,
    logger: Logger,
}

impl NetworkCollector {
    pub fn new(source: Arc<dyn NetworkSource>, logger: Logger) -> Self {
        Self { source, logger }
    }
}

#[async_trait]
impl Collector for NetworkCollector {
    fn category(&self) -> SignalCategory {
        SignalCategory::Network
    }

    async fn collect(&self) -> Result<Signal> {
        let estimate = self.source.connection().supported().unwrap_or_default();
        let connection = ConnectionInfo {
            effective_type: estimate
                .effective_type
                .unwrap_or_else(|| fallback::EFFECTIVE_TYPE.to_string()),
            downlink: estimate.downlink.unwrap_or(0.0),
            rtt: estimate.rtt.unwrap_or(0.0),
        };

        let ip_info = match self.source.ip_info().await {
            Probe::Supported(info) => Some(info),
            Probe::Unsupported => None,
            Probe::Failed(reason) => {
                let err = FingerprintError::probe("ip_info", reason);
                self.logger
                    .warn("IP info not available", Some(&json!(err.to_string())));
                None
            }
        };

        Ok(NetworkInfo {
            connection,
            ip_info,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::IpInfo;
    use crate::platform::{ConnectionEstimate, MockNetworkSource};

    #[tokio::test]
    async fn test_missing_connection_uses_fallbacks() {
        let mut source = MockNetworkSource::new();
        source
            .expect_connection()
            .return_const(Probe::<ConnectionEstimate>::Unsupported);
        source
            .expect_ip_info()
            .return_const(Probe::<IpInfo>::Failed("timed out".into()));

        let signal = NetworkCollector::new(Arc::new(source), Logger::default())
            .collect()
            .await
            .unwrap();
        assert_eq!(
            signal,
            Signal::Network(NetworkInfo {
                connection: ConnectionInfo {
                    effective_type: "unknown".into(),
                    downlink: 0.0,
                    rtt: 0.0,
                },
                ip_info: None,
            })
        );
    }

    #[tokio::test]
    async fn test_partial_connection_and_ip() {
        let ip = IpInfo {
            ip: "203.0.113.7".into(),
            country: "Germany".into(),
            region: "Berlin".into(),
            city: "Berlin".into(),
        };
        let mut source = MockNetworkSource::new();
        source.expect_connection().return_const(Probe::Supported(ConnectionEstimate {
            effective_type: Some("3g".into()),
            downlink: Some(0.4),
            rtt: None,
        }));
        source.expect_ip_info().return_const(Probe::Supported(ip.clone()));

        match NetworkCollector::new(Arc::new(source), Logger::default())
            .collect()
            .await
            .unwrap()
        {
            Signal::Network(info) => {
                assert_eq!(info.connection.effective_type, "3g");
                assert_eq!(info.connection.downlink, 0.4);
                assert_eq!(info.connection.rtt, 0.0);
                assert_eq!(info.ip_info, Some(ip));
            }
            other => panic!("unexpected signal {:?}", other),
        }
    }
}
