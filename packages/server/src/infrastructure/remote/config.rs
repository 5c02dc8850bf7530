use std::time::Duration;

/// Default bound on a whole call, after which the peer is presumed dead.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Share of the call budget given to each call made while serving another.
///
/// Serving a call makes at most two nested calls in sequence (a registry
/// probing a registrant and then the current occupant, a room delivering and
/// then announcing evictions), and both must finish before the caller gives up.
pub const NESTED_CALL_SHARE: u32 = 3;

/// Default bound on a nested call.
pub const DEFAULT_NESTED_CALL_TIMEOUT: Duration = Duration::from_millis(1500);

/// Timeouts for outgoing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub call_timeout: Duration,
    pub connect_timeout: Duration,
    /// Bound on calls made while serving an incoming call: deliveries to
    /// room members and the registry's liveness probes.
    pub nested_call_timeout: Duration,
}

impl TransportConfig {
    /// Override the call timeout.
    ///
    /// The nested call timeout becomes a [`NESTED_CALL_SHARE`] of it, and the
    /// connect timeout is kept no longer than it.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self.nested_call_timeout = call_timeout / NESTED_CALL_SHARE;
        self.connect_timeout = self.connect_timeout.min(call_timeout);
        self
    }

    /// Connect timeout applied to nested calls.
    pub fn nested_connect_timeout(&self) -> Duration {
        self.connect_timeout.min(self.nested_call_timeout)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            nested_call_timeout: DEFAULT_NESTED_CALL_TIMEOUT,
        }
    }
}
