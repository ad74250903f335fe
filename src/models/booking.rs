use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    /// Hour on the booking grid, always `HH:00`.
    pub time: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub service: String,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// Address to notify, if the client left something that looks like one.
    pub fn notification_address(&self) -> Option<&str> {
        self.client_email
            .as_deref()
            .map(str::trim)
            .filter(|e| e.contains('@'))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }
}

/// The two outcomes an admin can give a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn parse(s: &str) -> Option<Self> {
        match BookingStatus::parse(s)? {
            BookingStatus::Approved => Some(Decision::Approve),
            BookingStatus::Rejected => Some(Decision::Reject),
            BookingStatus::Pending => None,
        }
    }

    pub fn status(&self) -> BookingStatus {
        match self {
            Decision::Approve => BookingStatus::Approved,
            Decision::Reject => BookingStatus::Rejected,
        }
    }
}
