//! Location permission and position sources
//!
//! The host platform owns the actual permission prompt and GPS hardware.
//! This module only defines what the core consumes from them: a stream of
//! permission statuses and a source of position fixes that is read only
//! while permission is granted.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::app::GpsState;
use crate::types::GeoPoint;

/// Permission status as reported by the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Revoked { rationale: PermissionRationale },
}

/// Whether the platform wants an explanation shown before asking again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionRationale {
    Required,
    Optional,
}

/// Stream of permission statuses consumed by the state store
pub type PermissionStream = BoxStream<'static, PermissionStatus>;

/// Sending half of [`permission_channel`]
#[derive(Debug, Clone)]
pub struct PermissionReporter {
    sender: mpsc::UnboundedSender<PermissionStatus>,
}

impl PermissionReporter {
    /// Report a new status
    ///
    /// Returns `false` once the stream side has been dropped.
    pub fn report(&self, status: PermissionStatus) -> bool {
        self.sender.send(status).is_ok()
    }
}

/// Create a reporter/stream pair for hosts that receive permission changes
/// through callbacks
///
/// The stream ends when every reporter has been dropped.
pub fn permission_channel() -> (PermissionReporter, PermissionStream) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let statuses = UnboundedReceiverStream::new(receiver).boxed();

    (PermissionReporter { sender }, statuses)
}

/// Source of position fixes
#[async_trait]
pub trait LocationSource: Send {
    /// Wait for the next fix; `None` when the source has nothing to offer
    async fn next_fix(&mut self) -> Option<GeoPoint>;
}

/// Location source that always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    point: GeoPoint,
}

impl FixedLocation {
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn next_fix(&mut self) -> Option<GeoPoint> {
        Some(self.point)
    }
}

/// Current user position, if permission allows reading one
///
/// The source is only polled while `gps` is `Granted`.
pub async fn resolve_location<S>(gps: &GpsState, source: &mut S) -> Option<GeoPoint>
where
    S: LocationSource + ?Sized,
{
    match gps {
        GpsState::Granted => source.next_fix().await,
        GpsState::Loading | GpsState::Revoked { .. } => None,
    }
}
