//! Seams to the network: batch submission and reachability probing.

use core::fmt;

use crate::payload::BatchPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportError {
    Dns,
    Connect,
    Write,
    Read,
    Timeout,
    MalformedResponse,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dns => "dns lookup failed",
            Self::Connect => "connect failed",
            Self::Write => "request write failed",
            Self::Read => "response read failed",
            Self::Timeout => "timed out",
            Self::MalformedResponse => "malformed response",
        })
    }
}

/// Sends one batch and reports the collector's HTTP status.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&mut self, payload: &BatchPayload<'_>) -> Result<u16, TransportError>;
}

/// Upstream reachability check; `true` when the target answered.
#[allow(async_fn_in_trait)]
pub trait Probe {
    async fn probe(&mut self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushSkip {
    LinkDown,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    Skipped(FlushSkip),
    Delivered { events: usize, status: u16 },
    Rejected { status: u16 },
    Failed(TransportError),
}

impl FlushOutcome {
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// The collector was contacted and did not accept the batch.
    pub const fn is_undelivered_attempt(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Failed(_))
    }
}
