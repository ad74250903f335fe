use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, Decision};
use crate::services::mail;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationOutcome {
    Sent,
    /// No usable email address on the booking.
    Skipped,
    Failed,
}

/// A committed status change and, separately, what happened to the email.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    #[serde(flatten)]
    pub booking: Booking,
    pub notification: NotificationOutcome,
}

/// Approves or rejects a pending booking, then tries to tell the client.
///
/// Only `approved` and `rejected` are accepted. A booking that has already
/// been decided is left alone and reported as a conflict, so a client never
/// gets a second email for the same booking. The status change is committed
/// before the email is attempted and a failed email does not undo it.
pub async fn set_status(
    state: &AppState,
    id: &str,
    status: Option<&str>,
) -> Result<StatusChange, AppError> {
    let decision = status
        .and_then(Decision::parse)
        .ok_or_else(|| AppError::validation("Invalid status"))?;

    let booking = {
        let db = state.db()?;
        if !queries::decide_booking(&db, id, decision.status())? {
            return Err(match queries::get_booking_by_id(&db, id)? {
                None => AppError::not_found("Booking not found"),
                Some(existing) => AppError::conflict(format!(
                    "Booking has already been {}",
                    existing.status.as_str()
                )),
            });
        }
        queries::get_booking_by_id(&db, id)?
            .ok_or_else(|| anyhow::anyhow!("booking {id} missing after status update"))?
    };

    tracing::info!(
        booking_id = %booking.id,
        status = booking.status.as_str(),
        "booking status changed"
    );

    let notification = notify(state, &booking, decision).await;

    Ok(StatusChange {
        booking,
        notification,
    })
}

async fn notify(state: &AppState, booking: &Booking, decision: Decision) -> NotificationOutcome {
    let Some(to) = booking.notification_address() else {
        return NotificationOutcome::Skipped;
    };

    match mail::send_status_email(
        state.mailer.as_ref(),
        &state.config.business_name,
        to,
        booking,
        decision,
    )
    .await
    {
        Ok(()) => {
            tracing::info!(booking_id = %booking.id, "status email sent");
            NotificationOutcome::Sent
        }
        Err(e) => {
            tracing::warn!(
                booking_id = %booking.id,
                error = %format!("{e:#}"),
                "status email failed"
            );
            NotificationOutcome::Failed
        }
    }
}
