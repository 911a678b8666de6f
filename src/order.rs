//! Caller-side view of an order's lifecycle.
//!
//! The service owns every order; this module classifies the snapshots
//! that collect calls return and tracks which lifecycle phase the
//! caller has observed so far. Nothing here polls or sleeps: pacing
//! the collect loop is the caller's job, with
//! [`RECOMMENDED_COLLECT_INTERVAL`] as the documented cadence.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{Error, IntegrityError, Result};
use crate::qr;
use crate::response::{CollectResponse, CompletionData, HintCode, OrderResponse, OrderStatus};

/// How often the service recommends collecting a pending order.
pub const RECOMMENDED_COLLECT_INTERVAL: Duration = Duration::from_secs(2);

/// Lifecycle phase of an order as observed by the caller.
///
/// `Complete`, `Failed` and `Cancelled` are terminal: once reached, an
/// order never leaves them.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderState {
    /// The order was created but no collect snapshot has been seen yet.
    Initiated,
    /// The latest snapshot reported the order as still in progress.
    Pending { hint: Option<HintCode> },
    /// The order completed and released the user's identity.
    Complete(Box<CompletionData>),
    /// The order ended without completing.
    Failed { hint: Option<HintCode> },
    /// The caller aborted the order.
    Cancelled,
}

impl OrderState {
    /// Classifies one collect snapshot, without transition context.
    ///
    /// The documented contract ties completion data to the `complete`
    /// status in both directions; a snapshot that breaks the tie is an
    /// integrity failure, not a usable state.
    pub fn classify(snapshot: CollectResponse) -> Result<Self> {
        let CollectResponse {
            order_ref: _,
            status,
            hint_code,
            completion_data,
        } = snapshot;

        match (status, completion_data) {
            (OrderStatus::Complete, Some(data)) => Ok(OrderState::Complete(Box::new(data))),
            (OrderStatus::Complete, None) => {
                Err(contract("complete order without completion data"))
            }
            (OrderStatus::Pending, None) => Ok(OrderState::Pending { hint: hint_code }),
            (OrderStatus::Pending, Some(_)) => {
                Err(contract("pending order carries completion data"))
            }
            (OrderStatus::Failed, None) => Ok(OrderState::Failed { hint: hint_code }),
            (OrderStatus::Failed, Some(_)) => {
                Err(contract("failed order carries completion data"))
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Complete(_) | OrderState::Failed { .. } | OrderState::Cancelled
        )
    }

    /// Identity released by a completed order.
    pub fn completion_data(&self) -> Option<&CompletionData> {
        match self {
            OrderState::Complete(data) => Some(data),
            _ => None,
        }
    }

    /// Progress or failure detail, when the phase carries one.
    pub fn hint(&self) -> Option<&HintCode> {
        match self {
            OrderState::Pending { hint } | OrderState::Failed { hint } => hint.as_ref(),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderState::Initiated => "initiated",
            OrderState::Pending { .. } => "pending",
            OrderState::Complete(_) => "complete",
            OrderState::Failed { .. } => "failed",
            OrderState::Cancelled => "cancelled",
        }
    }
}

fn contract(detail: impl Into<String>) -> Error {
    IntegrityError::Contract {
        detail: detail.into(),
    }
    .into()
}

/// Tracks one order from creation to a terminal phase.
///
/// The tracker remembers when the order was initiated, so it can derive
/// the animated QR frame for any instant, and folds collect snapshots
/// into the observed [`OrderState`].
///
/// # Examples
///
/// ```
/// use bankid_client::order::OrderTracker;
/// use bankid_client::response::OrderResponse;
///
/// let tracker = OrderTracker::new(OrderResponse {
///     auto_start_token: "7c40b5c9-fa74-49cf-b98c-bfe651f9a7c6".into(),
///     order_ref: "131daac9-16c6-4618-beb0-365768f37288".into(),
///     qr_start_token: "67df3917-fa0d-44e5-b327-edcc928297f8".into(),
///     qr_start_secret: "d28db9a7-4cde-429e-a983-359be676944c".into(),
/// });
///
/// let frame = tracker.qr_code_content();
/// assert!(frame.starts_with("bankid.67df3917-fa0d-44e5-b327-edcc928297f8."));
/// ```
#[derive(Debug, Clone)]
pub struct OrderTracker {
    order: OrderResponse,
    started_at: DateTime<Utc>,
    state: OrderState,
}

impl OrderTracker {
    /// Starts tracking a freshly created order, timestamped now.
    pub fn new(order: OrderResponse) -> Self {
        Self {
            order,
            started_at: Utc::now(),
            state: OrderState::Initiated,
        }
    }

    pub fn order(&self) -> &OrderResponse {
        &self.order
    }

    pub fn order_ref(&self) -> &str {
        &self.order.order_ref
    }

    pub fn auto_start_token(&self) -> &str {
        &self.order.auto_start_token
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> &OrderState {
        &self.state
    }

    /// Whole seconds since the order was initiated, clamped at zero.
    pub fn elapsed_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }

    /// Animated QR frame for the given instant.
    pub fn qr_code_content_at(&self, now: DateTime<Utc>) -> String {
        qr::qr_code_content(
            &self.order.qr_start_token,
            &self.order.qr_start_secret,
            self.elapsed_seconds_at(now),
        )
    }

    /// Animated QR frame for the current instant.
    pub fn qr_code_content(&self) -> String {
        self.qr_code_content_at(Utc::now())
    }

    /// Folds one collect snapshot into the observed state.
    ///
    /// A snapshot for a different order is rejected, and a terminal
    /// order only accepts snapshots that re-assert its terminal state.
    pub fn observe(&mut self, snapshot: CollectResponse) -> Result<&OrderState> {
        if snapshot.order_ref != self.order.order_ref {
            return Err(contract(format!(
                "collect snapshot for order {} applied to order {}",
                snapshot.order_ref, self.order.order_ref
            )));
        }

        let next = OrderState::classify(snapshot)?;
        if self.state.is_terminal() && next != self.state {
            return Err(contract(format!(
                "{} order reported as {}",
                self.state.label(),
                next.label()
            )));
        }

        self.state = next;
        Ok(&self.state)
    }

    /// Records a caller-initiated cancellation.
    ///
    /// Orders already in a terminal phase keep it, so cancelling twice
    /// or cancelling an order that just completed is not an error.
    pub fn mark_cancelled(&mut self) -> &OrderState {
        if !self.state.is_terminal() {
            self.state = OrderState::Cancelled;
        }
        &self.state
    }
}
