use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;

use crate::collector::{BackendId, CollectError};
use crate::config::CollectorConfig;
use crate::transport::{with_deadline, Endpoint, RpcError, RpcStream, ScopedChannel, Transport};

/// State shared by every backend collector: who it is, where the
/// backend lives, and how to reach it.
pub struct CollectorBase {
    pub id: BackendId,
    pub config: CollectorConfig,
    transport: Arc<dyn Transport>,
}

impl CollectorBase {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            id,
            config,
            transport,
        }
    }

    /// Validates the configuration and opens a channel that closes
    /// itself when dropped.
    pub async fn connect(&self) -> Result<ScopedChannel, CollectError> {
        let address = self.config.service_address.as_str();
        if address.trim().is_empty() {
            return Err(CollectError::Configuration(format!(
                "{} has no service address",
                self.id
            )));
        }

        let endpoint = Endpoint {
            address,
            cert_path: self.config.cert_path.as_deref(),
            key_path: self.config.key_path.as_deref(),
            use_tls: self.config.use_tls,
        };

        with_deadline(
            self.config.call_timeout,
            ScopedChannel::open(self.transport.as_ref(), endpoint),
        )
        .await
        .map_err(|source| CollectError::Connection {
            address: address.to_string(),
            source,
        })
    }

    /// Issues a unary call under the per-call deadline.
    pub async fn call<T, F>(&self, name: &'static str, call: F) -> Result<T, CollectError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        with_deadline(self.config.call_timeout, call)
            .await
            .map_err(CollectError::call(name))
    }

    /// Issues a streaming call and drains it to end-of-stream.
    ///
    /// The deadline covers opening the stream and reading every item.
    /// End-of-stream is success, even with zero items; any item error
    /// fails the whole call.
    pub async fn drain<T, F>(&self, name: &'static str, open: F) -> Result<Vec<T>, CollectError>
    where
        F: Future<Output = Result<RpcStream<T>, RpcError>>,
    {
        let drain = async {
            let mut stream = open.await?;
            let mut items = Vec::new();
            while let Some(item) = stream.next().await {
                items.push(item?);
            }
            Ok::<_, RpcError>(items)
        };

        with_deadline(self.config.call_timeout, drain)
            .await
            .map_err(CollectError::call(name))
    }
}
