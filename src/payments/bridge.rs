//! Payment-to-Enrollment bridge: converts a verified payment event into an
//! enrollment, exactly once. Idempotency is keyed on the gateway's payment
//! correlation id: the unique index on `payments.gateway_payment_id` plus
//! the row lock taken here make webhook re-deliveries safe.

use chrono::Utc;
use diesel::prelude::*;
use log::info;
use uuid::Uuid;

use crate::enrollment::error::EnrollmentError;
use crate::enrollment::{enrollments, Enrollment};
use crate::payments::{payments, Payment, PaymentStatus};

/// What to do with a verified payment given its current status and the
/// incoming correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettleAction {
    /// Pending payment, first delivery: settle it and unlock the enrollment.
    Settle,
    /// Already settled under this correlation id: re-delivery, apply the
    /// idempotent upsert and return the existing enrollment.
    Replay,
    /// Any other state is a conflict.
    Reject(&'static str),
}

fn settle_action(
    status: PaymentStatus,
    stored_correlation_id: Option<&str>,
    incoming_correlation_id: &str,
) -> SettleAction {
    match status {
        PaymentStatus::Pending => SettleAction::Settle,
        PaymentStatus::Completed if stored_correlation_id == Some(incoming_correlation_id) => {
            SettleAction::Replay
        }
        PaymentStatus::Completed => {
            SettleAction::Reject("Payment already settled under a different correlation id")
        }
        PaymentStatus::Failed | PaymentStatus::Refunded => {
            SettleAction::Reject("Payment is not pending")
        }
    }
}

/// Apply a verified payment. On first delivery the payment transitions to
/// `completed` and an enrollment is created (or relinked, leaving ledger
/// progress untouched). Re-delivery with the same correlation id returns
/// the same enrollment; a different correlation id for an already-settled
/// payment is a conflict.
pub fn on_payment_verified(
    conn: &mut PgConnection,
    gateway_order_id: &str,
    gateway_payment_id: &str,
) -> Result<(Payment, Enrollment), EnrollmentError> {
    conn.transaction::<(Payment, Enrollment), EnrollmentError, _>(|conn| {
        let payment: Option<Payment> = payments::table
            .filter(payments::gateway_order_id.eq(gateway_order_id))
            .for_update()
            .first::<Payment>(conn)
            .optional()?;
        let payment = payment.ok_or_else(|| {
            EnrollmentError::NotFound("No payment for this gateway order".to_string())
        })?;

        let course_id = payment.course_id.ok_or_else(|| {
            EnrollmentError::Validation("Payment is not linked to a course".to_string())
        })?;

        match settle_action(
            payment.current_status(),
            payment.gateway_payment_id.as_deref(),
            gateway_payment_id,
        ) {
            SettleAction::Settle => {}
            SettleAction::Replay => {
                // Webhook retry; everything already applied.
                let enrollment = upsert_enrollment(conn, &payment, course_id)?;
                return Ok((payment, enrollment));
            }
            SettleAction::Reject(reason) => {
                return Err(EnrollmentError::Conflict(reason.to_string()));
            }
        }

        // The same correlation id must not settle two different payments.
        let duplicates: i64 = payments::table
            .filter(payments::gateway_payment_id.eq(gateway_payment_id))
            .filter(payments::id.ne(payment.id))
            .count()
            .get_result(conn)?;
        if duplicates > 0 {
            return Err(EnrollmentError::Conflict(
                "Correlation id already applied to another payment".to_string(),
            ));
        }

        let payment: Payment = diesel::update(
            payments::table.filter(payments::id.eq(payment.id)),
        )
        .set((
            payments::status.eq(PaymentStatus::Completed.to_string()),
            payments::gateway_payment_id.eq(Some(gateway_payment_id.to_string())),
            payments::verified_at.eq(Some(Utc::now())),
        ))
        .get_result::<Payment>(conn)?;

        let enrollment = upsert_enrollment(conn, &payment, course_id)?;
        info!(
            "Payment {} verified; enrollment {} for course {} unlocked",
            payment.id, enrollment.id, course_id
        );

        Ok((payment, enrollment))
    })
}

fn upsert_enrollment(
    conn: &mut PgConnection,
    payment: &Payment,
    course_id: Uuid,
) -> Result<Enrollment, EnrollmentError> {
    let candidate = Enrollment::new(payment.user_id, course_id, Some(payment.id));
    let enrollment: Enrollment = diesel::insert_into(enrollments::table)
        .values(&candidate)
        .on_conflict((enrollments::user_id, enrollments::course_id))
        .do_update()
        .set((
            enrollments::payment_id.eq(Some(payment.id)),
            enrollments::last_accessed_at.eq(Utc::now()),
        ))
        .get_result::<Enrollment>(conn)?;
    Ok(enrollment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_payment_settles() {
        assert_eq!(
            settle_action(PaymentStatus::Pending, None, "pay_1"),
            SettleAction::Settle
        );
    }

    #[test]
    fn test_redelivered_webhook_replays() {
        // Same correlation id delivered twice: the second delivery applies
        // the idempotent upsert instead of settling again.
        assert_eq!(
            settle_action(PaymentStatus::Completed, Some("pay_1"), "pay_1"),
            SettleAction::Replay
        );
    }

    #[test]
    fn test_settled_payment_rejects_other_correlation_id() {
        assert!(matches!(
            settle_action(PaymentStatus::Completed, Some("pay_1"), "pay_2"),
            SettleAction::Reject(_)
        ));
    }

    #[test]
    fn test_terminal_payments_reject_settlement() {
        assert!(matches!(
            settle_action(PaymentStatus::Failed, None, "pay_1"),
            SettleAction::Reject(_)
        ));
        assert!(matches!(
            settle_action(PaymentStatus::Refunded, Some("pay_1"), "pay_1"),
            SettleAction::Reject(_)
        ));
    }
}
