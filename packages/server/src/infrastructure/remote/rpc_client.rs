//! Outgoing calls.

use std::time::Duration;

use reqwest::StatusCode;

use super::{TransportConfig, TransportError};
use crate::{
    domain::{EntityRef, Remote, Unreachable},
    infrastructure::dto::{Call, Invocation, Reply, RpcFault, rpc::RPC_PATH},
};

/// Sends [`Invocation`]s to other processes.
///
/// Every way a call can fail to complete (connection refused, timeout, a
/// non-`200` status, an unreadable body) is reported as [`Unreachable`].
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
}

impl RpcClient {
    /// Client for calls a user operation makes.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::build(config.call_timeout, config.connect_timeout)
    }

    /// Client for calls made while serving another call.
    pub fn nested(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::build(config.nested_call_timeout, config.nested_connect_timeout())
    }

    fn build(timeout: Duration, connect_timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            // Each call opens its own connection.
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { http })
    }

    /// Invoke `call` on the object behind `reference`.
    pub async fn invoke(&self, reference: &EntityRef, call: Call) -> Remote<Reply> {
        let op = call.op();
        let invocation = Invocation {
            target: reference.object_id.clone(),
            call,
        };

        let response = self
            .http
            .post(reference.endpoint.join(RPC_PATH))
            .json(&invocation)
            .send()
            .await
            .map_err(|e| Unreachable::new(format!("{op} on {reference}: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let detail = match response.json::<RpcFault>().await {
                Ok(fault) => fault.message,
                Err(_) => status.to_string(),
            };
            tracing::debug!("{} on {} failed with {}: {}", op, reference, status, detail);
            return Err(Unreachable::new(format!(
                "{op} on {reference} failed with {status}: {detail}"
            )));
        }

        response
            .json::<Reply>()
            .await
            .map_err(|e| Unreachable::new(format!("malformed reply to {op} from {reference}: {e}")))
    }
}
