use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::validation::{
    check_date_order, parse_date, parse_uuid_field, provided, required, required_message,
    RETURN_DATE_REQUIRED,
};
use crate::{CoreError, CoreResult};

pub const INVALID_REASON: &str =
    "Invalid reason. Allowed values are BUSINESS, VACATION, EXPEDITION";
pub const REQUEST_NOT_FOUND: &str = "Request not found";
pub const NOT_EDITABLE: &str = "Only pending requests can be updated";

/// Purpose of travel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    #[default]
    Business,
    Vacation,
    Expedition,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Business => "BUSINESS",
            Reason::Vacation => "VACATION",
            Reason::Expedition => "EXPEDITION",
        }
    }
}

impl FromStr for Reason {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUSINESS" => Ok(Reason::Business),
            "VACATION" => Ok(Reason::Vacation),
            "EXPEDITION" => Ok(Reason::Expedition),
            _ => Err(CoreError::Validation(INVALID_REASON.to_string())),
        }
    }
}

/// Approval state of a trip request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    pub fn as_past_tense(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "left pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RequestStatus::Pending),
            "Approved" => Ok(RequestStatus::Approved),
            "Rejected" => Ok(RequestStatus::Rejected),
            other => Err(CoreError::Validation(format!("Unknown request status: {}", other))),
        }
    }
}

/// A submitted travel itinerary awaiting (or past) approval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub accommodation_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub flight_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub reason: Reason,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated booking input, ready to become a `TripRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub origin: String,
    pub destination: String,
    pub flight_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub accommodation_id: Uuid,
    pub reason: Reason,
}

impl TripRequest {
    pub fn new(user_id: Uuid, trip: NewTrip) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            accommodation_id: trip.accommodation_id,
            origin: trip.origin,
            destination: trip.destination,
            flight_date: trip.flight_date,
            return_date: trip.return_date,
            reason: trip.reason,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    pub fn ensure_editable(&self) -> CoreResult<()> {
        if self.status != RequestStatus::Pending {
            return Err(CoreError::Validation(NOT_EDITABLE.to_string()));
        }
        Ok(())
    }

    /// Merge the provided fields over this request. The merged dates are
    /// validated as a pair, so moving only the flight date past an existing
    /// return date is rejected too. Returns the new accommodation id when
    /// the update changes it, so the caller can check it exists.
    pub fn apply_update(&mut self, update: &TripUpdate) -> CoreResult<Option<Uuid>> {
        let flight_date = match provided(&update.flight_date) {
            Some(v) => parse_date(v)?,
            None => self.flight_date,
        };
        let return_date = match provided(&update.return_date) {
            Some(v) => Some(parse_date(v)?),
            None => self.return_date,
        };
        check_date_order(flight_date, return_date)?;

        let reason = match provided(&update.reason) {
            Some(v) => v.parse()?,
            None => self.reason,
        };
        let accommodation_id = match provided(&update.accommodation_id) {
            Some(v) => Some(parse_uuid_field(v, "accommodationId")?),
            None => None,
        };

        if let Some(origin) = provided(&update.origin) {
            self.origin = origin.to_string();
        }
        if let Some(destination) = provided(&update.destination) {
            self.destination = destination.to_string();
        }
        self.flight_date = flight_date;
        self.return_date = return_date;
        self.reason = reason;
        let changed = accommodation_id.filter(|id| *id != self.accommodation_id);
        if let Some(id) = changed {
            self.accommodation_id = id;
        }
        self.updated_at = Utc::now();

        Ok(changed)
    }

    /// Pending → Approved | Rejected. Decided requests are final.
    pub fn transition(&mut self, to: RequestStatus) -> CoreResult<()> {
        let allowed = self.status == RequestStatus::Pending && to != RequestStatus::Pending;
        if !allowed {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        tracing::debug!(request_id = %self.id, from = %self.status, to = %to, "request status transition");
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Raw booking body. Every field is optional so that missing keys surface
/// as the per-field messages rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub flight_date: Option<String>,
    pub return_date: Option<String>,
    pub accommodation_id: Option<String>,
    pub reason: Option<String>,
}

impl TripDetails {
    /// One-way booking: any `returnDate` in the body is dropped.
    pub fn validate_one_way(&self) -> CoreResult<NewTrip> {
        self.validate_common(None)
    }

    /// Round trip: `returnDate` is checked before everything else.
    pub fn validate_return(&self) -> CoreResult<NewTrip> {
        let return_date = provided(&self.return_date)
            .ok_or_else(|| CoreError::Validation(RETURN_DATE_REQUIRED.to_string()))?;
        self.validate_common(Some(return_date))
    }

    fn validate_common(&self, return_date: Option<&str>) -> CoreResult<NewTrip> {
        let origin = required(&self.origin, "origin")?;
        let destination = required(&self.destination, "destination")?;
        let flight_date = required(&self.flight_date, "flightDate")?;
        let accommodation_id = required(&self.accommodation_id, "accommodationId")?;

        let flight_date = parse_date(flight_date)?;
        let return_date = return_date.map(parse_date).transpose()?;
        check_date_order(flight_date, return_date)?;

        let accommodation_id = parse_uuid_field(accommodation_id, "accommodationId")?;
        let reason = match provided(&self.reason) {
            Some(v) => v.parse()?,
            None => Reason::default(),
        };

        Ok(NewTrip {
            origin: origin.to_string(),
            destination: destination.to_string(),
            flight_date,
            return_date,
            accommodation_id,
            reason,
        })
    }
}

/// Body of `PATCH /api/v1/request/`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    pub request_id: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub flight_date: Option<String>,
    pub return_date: Option<String>,
    pub accommodation_id: Option<String>,
    pub reason: Option<String>,
}

impl TripUpdate {
    /// A malformed id can never match a row, so it reads as "not found".
    pub fn request_id(&self) -> CoreResult<Uuid> {
        let raw = provided(&self.request_id)
            .ok_or_else(|| CoreError::Validation(required_message("requestId")))?;
        Uuid::parse_str(raw).map_err(|_| CoreError::NotFound(REQUEST_NOT_FOUND.to_string()))
    }
}
