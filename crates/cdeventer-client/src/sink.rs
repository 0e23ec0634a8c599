//! The delivery seam.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use cdeventer_events::HttpMessage;

use crate::error::DeliveryError;

/// Result of one delivery attempt.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The sink answered. A non-2xx status is a negative acknowledgement,
    /// but the event still reached the sink.
    Delivered { status: u16 },
    /// The event never reached the sink.
    Undelivered(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn is_undelivered(&self) -> bool {
        !self.is_delivered()
    }

    /// Whether the sink acknowledged the event with a 2xx status.
    pub fn is_ack(&self) -> bool {
        matches!(self, Self::Delivered { status } if (200..300).contains(status))
    }
}

/// Something that can deliver a rendered CloudEvent to a target URL.
///
/// Implementations must be reentrant: the same sink is shared by concurrent
/// reconciliations.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Make exactly one delivery attempt, sending `message` as-is.
    ///
    /// Cancelling `cancel` must resolve the attempt promptly as
    /// [`DeliveryOutcome::Undelivered`].
    async fn send(
        &self,
        target: &Url,
        message: &HttpMessage,
        cancel: &CancellationToken,
    ) -> DeliveryOutcome;
}

/// Shared sink type used by the reconciler.
pub type SharedSink = Arc<dyn Sink>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        let ok = DeliveryOutcome::Delivered { status: 202 };
        assert!(ok.is_delivered());
        assert!(ok.is_ack());

        let nack = DeliveryOutcome::Delivered { status: 503 };
        assert!(nack.is_delivered());
        assert!(!nack.is_ack());

        let lost = DeliveryOutcome::Undelivered(DeliveryError::Cancelled);
        assert!(lost.is_undelivered());
        assert!(!lost.is_ack());
    }
}
