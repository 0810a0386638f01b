use std::sync::Arc;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::{AuditAction, Payment, PaymentDraft, PaymentMethod, PaymentStatus};
use crate::services::audit::AuditRecorder;
use crate::store::PaymentStore;

pub const PAYMENTS_TABLE: &str = "payments";

pub struct PaymentService {
    payments: Arc<dyn PaymentStore>,
    audit: AuditRecorder,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentStore>, audit: AuditRecorder) -> Self {
        Self { payments, audit }
    }

    pub async fn get(&self, id: i64) -> Result<Payment, AppError> {
        self.payments
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::DataNotFound(format!("payment {id}")))
    }

    pub async fn list_for_booking(&self, booking_id: i64) -> Result<Vec<Payment>, AppError> {
        Ok(self.payments.list_for_booking(booking_id).await?)
    }

    /// Completes a pending payment. The method must be a real one.
    pub async fn finalize(
        &self,
        id: i64,
        method: PaymentMethod,
        actor: Option<i64>,
    ) -> Result<Payment, AppError> {
        let current = self.get(id).await?;

        let completed = PaymentDraft {
            amount: current.amount,
            method,
            payment_date: Utc::now().naive_utc(),
            status: PaymentStatus::Completed,
        };
        completed.validate().map_err(AppError::InvalidData)?;

        if current.status == PaymentStatus::Completed && current.method == method {
            return Err(AppError::NoUpdatedData);
        }

        let payment = self.payments.finalize(id, method).await?;

        tracing::info!(
            payment_id = id,
            booking_id = payment.booking_id,
            method = ?method,
            "payment finalized"
        );
        self.audit
            .record(AuditAction::Update, PAYMENTS_TABLE, id, actor);
        Ok(payment)
    }
}
