use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::trip::{RequestStatus, TripRequest};
use crate::{CoreError, User};

pub const NOTIFICATION_NOT_FOUND: &str = "Notification not found";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TripRequested,
    TripUpdated,
    TripApproved,
    TripRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TripRequested => "TRIP_REQUESTED",
            NotificationKind::TripUpdated => "TRIP_UPDATED",
            NotificationKind::TripApproved => "TRIP_APPROVED",
            NotificationKind::TripRejected => "TRIP_REJECTED",
        }
    }

    /// The notification a requester receives once a decision is made.
    pub fn for_decision(status: RequestStatus) -> Option<Self> {
        match status {
            RequestStatus::Approved => Some(NotificationKind::TripApproved),
            RequestStatus::Rejected => Some(NotificationKind::TripRejected),
            RequestStatus::Pending => None,
        }
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRIP_REQUESTED" => Ok(NotificationKind::TripRequested),
            "TRIP_UPDATED" => Ok(NotificationKind::TripUpdated),
            "TRIP_APPROVED" => Ok(NotificationKind::TripApproved),
            "TRIP_REJECTED" => Ok(NotificationKind::TripRejected),
            other => Err(CoreError::Validation(format!("Unknown notification kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub request_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_id: Uuid, request: &TripRequest, kind: NotificationKind, requester: &User) -> Self {
        let requester_name = format!("{} {}", requester.first_name, requester.last_name);
        let message = match kind {
            NotificationKind::TripRequested => format!(
                "{} requested a trip from {} to {} on {}",
                requester_name, request.origin, request.destination, request.flight_date
            ),
            NotificationKind::TripUpdated => format!(
                "{} updated the trip request from {} to {} on {}",
                requester_name, request.origin, request.destination, request.flight_date
            ),
            NotificationKind::TripApproved => format!(
                "Your trip request from {} to {} on {} was approved",
                request.origin, request.destination, request.flight_date
            ),
            NotificationKind::TripRejected => format!(
                "Your trip request from {} to {} on {} was rejected",
                request.origin, request.destination, request.flight_date
            ),
        };

        Self {
            id: Uuid::new_v4(),
            recipient_id,
            request_id: request.id,
            kind,
            message,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
