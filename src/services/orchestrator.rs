use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{AuditAction, Booking, BookingDraft, NewBooking, Payment, PaymentDraft};
use crate::services::audit::AuditRecorder;
use crate::services::booking::{validate_new_booking, BOOKINGS_TABLE};
use crate::services::payment::PAYMENTS_TABLE;
use crate::store::{BookingStore, PaymentStore};

#[derive(Debug, Clone, Serialize)]
pub struct BookingWithPayment {
    pub booking: Booking,
    pub payment: Payment,
}

/// Creates a booking together with its opening payment.
pub struct BookingPaymentOrchestrator {
    bookings: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentStore>,
    audit: AuditRecorder,
}

impl BookingPaymentOrchestrator {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentStore>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            bookings,
            payments,
            audit,
        }
    }

    pub async fn create_booking_with_payment(
        &self,
        input: &NewBooking,
        actor: Option<i64>,
    ) -> Result<BookingWithPayment, AppError> {
        let draft = validate_new_booking(input)?;
        let payment_draft = PaymentDraft::opening(draft.total_amount, Utc::now().naive_utc());
        payment_draft.validate().map_err(AppError::InvalidData)?;

        let (booking, payment) = match self
            .bookings
            .create_with_payment(&draft, &payment_draft)
            .await?
        {
            Some(pair) => pair,
            None => self.create_then_compensate(&draft, &payment_draft).await?,
        };

        tracing::info!(
            booking_id = booking.id,
            payment_id = payment.id,
            "booking created with payment"
        );
        self.audit
            .record(AuditAction::Create, BOOKINGS_TABLE, booking.id, actor);
        self.audit
            .record(AuditAction::Create, PAYMENTS_TABLE, payment.id, actor);

        Ok(BookingWithPayment { booking, payment })
    }

    // Two separate writes: if the payment fails the booking is deleted again.
    async fn create_then_compensate(
        &self,
        draft: &BookingDraft,
        payment_draft: &PaymentDraft,
    ) -> Result<(Booking, Payment), AppError> {
        let booking = self.bookings.create(draft).await?;

        match self.payments.create(booking.id, payment_draft).await {
            Ok(payment) => Ok((booking, payment)),
            Err(payment_err) => {
                tracing::warn!(
                    booking_id = booking.id,
                    error = %payment_err,
                    "payment creation failed, removing booking"
                );
                if let Err(delete_err) = self.bookings.delete(booking.id).await {
                    tracing::error!(
                        booking_id = booking.id,
                        error = %delete_err,
                        "compensating delete failed, booking left without payment"
                    );
                }
                Err(AppError::Internal(format!(
                    "failed to create payment for booking {}: {payment_err}",
                    booking.id
                )))
            }
        }
    }
}
