use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: NaiveDateTime,
    pub status: PaymentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn code(&self) -> i64 {
        match self {
            PaymentStatus::Pending => 1,
            PaymentStatus::Completed => 2,
            PaymentStatus::Failed => 3,
            PaymentStatus::Refunded => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(PaymentStatus::Pending),
            2 => Some(PaymentStatus::Completed),
            3 => Some(PaymentStatus::Failed),
            4 => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    NotSpecified,
    CreditCard,
    DebitCard,
    Cash,
    BankTransfer,
}

impl PaymentMethod {
    pub fn code(&self) -> i64 {
        match self {
            PaymentMethod::NotSpecified => 0,
            PaymentMethod::CreditCard => 1,
            PaymentMethod::DebitCard => 2,
            PaymentMethod::Cash => 3,
            PaymentMethod::BankTransfer => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PaymentMethod::NotSpecified),
            1 => Some(PaymentMethod::CreditCard),
            2 => Some(PaymentMethod::DebitCard),
            3 => Some(PaymentMethod::Cash),
            4 => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }
}

/// A payment not yet written. The booking it belongs to is supplied at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: NaiveDateTime,
    pub status: PaymentStatus,
}

impl PaymentDraft {
    /// The payment opened alongside a new booking: full amount, method
    /// collected later.
    pub fn opening(amount: Decimal, now: NaiveDateTime) -> Self {
        Self {
            amount,
            method: PaymentMethod::NotSpecified,
            payment_date: now,
            status: PaymentStatus::Pending,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.amount <= Decimal::ZERO {
            return Err("payment amount must be positive".to_string());
        }
        if self.status == PaymentStatus::Completed && self.method == PaymentMethod::NotSpecified {
            return Err("a completed payment needs a payment method".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    #[test]
    fn test_opening_payment_is_pending_and_unspecified() {
        let draft = PaymentDraft::opening(dec!(120.50), now());
        assert_eq!(draft.status, PaymentStatus::Pending);
        assert_eq!(draft.method, PaymentMethod::NotSpecified);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(PaymentDraft::opening(dec!(0), now()).validate().is_err());
        assert!(PaymentDraft::opening(dec!(-3), now()).validate().is_err());
    }

    #[test]
    fn test_completed_payment_requires_method() {
        let mut draft = PaymentDraft::opening(dec!(10), now());
        draft.status = PaymentStatus::Completed;
        assert!(draft.validate().is_err());

        draft.method = PaymentMethod::Cash;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_codes_match_storage_values() {
        assert_eq!(PaymentMethod::NotSpecified.code(), 0);
        assert_eq!(PaymentMethod::from_code(4), Some(PaymentMethod::BankTransfer));
        assert_eq!(PaymentStatus::from_code(0), None);
        assert_eq!(PaymentStatus::Refunded.code(), 4);
    }
}
