pub mod http;

use async_trait::async_trait;

use crate::models::{Booking, Decision};

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEmail {
    pub subject: String,
    pub body: String,
}

impl StatusEmail {
    pub fn render(business_name: &str, booking: &Booking, decision: Decision) -> Self {
        let name = &booking.client_name;
        let date = booking.date.format("%Y-%m-%d");
        let time = &booking.time;
        let service = &booking.service;

        match decision {
            Decision::Approve => Self {
                subject: format!("Booking Confirmed - {business_name}"),
                body: format!(
                    "Hi {name},\n\n\
                     Your appointment has been confirmed!\n\n\
                     Date: {date}\n\
                     Time: {time}\n\
                     Service: {service}\n\n\
                     See you soon!\n\
                     {business_name}"
                ),
            },
            Decision::Reject => Self {
                subject: format!("Booking Update - {business_name}"),
                body: format!(
                    "Hi {name},\n\n\
                     Unfortunately, your appointment for {date} at {time} ({service}) could not be confirmed.\n\n\
                     Please book another time slot.\n\n\
                     {business_name}"
                ),
            },
        }
    }
}

/// Renders the status email for `booking` and hands it to the transport.
pub async fn send_status_email(
    transport: &dyn MailTransport,
    business_name: &str,
    to: &str,
    booking: &Booking,
    decision: Decision,
) -> anyhow::Result<()> {
    let email = StatusEmail::render(business_name, booking, decision);
    transport.send(to, &email.subject, &email.body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::models::BookingStatus;

    fn booking() -> Booking {
        let now = NaiveDateTime::parse_from_str("2024-06-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        Booking {
            id: "b-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            time: "09:00".to_string(),
            client_name: "Marta".to_string(),
            client_phone: "+15553330000".to_string(),
            client_email: Some("marta@example.com".to_string()),
            service: "Beard Trim".to_string(),
            status: BookingStatus::Approved,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_render_approved() {
        let email = StatusEmail::render("Nele Barber Shop", &booking(), Decision::Approve);
        assert_eq!(email.subject, "Booking Confirmed - Nele Barber Shop");
        assert!(email.body.starts_with("Hi Marta,"));
        assert!(email.body.contains("Your appointment has been confirmed!"));
        assert!(email.body.contains("Date: 2024-06-10\nTime: 09:00\nService: Beard Trim"));
        assert!(email.body.ends_with("Nele Barber Shop"));
    }

    #[test]
    fn test_render_rejected() {
        let email = StatusEmail::render("Nele Barber Shop", &booking(), Decision::Reject);
        assert_eq!(email.subject, "Booking Update - Nele Barber Shop");
        assert!(email
            .body
            .contains("your appointment for 2024-06-10 at 09:00 (Beard Trim) could not be confirmed."));
        assert!(email.body.contains("Please book another time slot."));
    }
}
