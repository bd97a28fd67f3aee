//! Payment mode selector: three mutually exclusive settlement forms.
//!
//! Nothing here talks to a payment gateway. A finalized form becomes a
//! [`PaymentSubmission`] that the caller forwards to the regulator's API.

#[cfg(test)]
#[path = "payment_test.rs"]
mod payment_test;

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

/// Mobile-money transaction fee, in basis points (1.5 %).
pub const MOBILE_MONEY_FEE_BPS: u64 = 150;
/// Digits expected after the carrier prefix.
pub const PHONE_DIGITS_AFTER_PREFIX: usize = 9;
/// Minimum normalized length of a wire-transfer account reference.
pub const MIN_WIRE_REFERENCE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("select a mobile money carrier")]
    NoCarrier,
    #[error("{carrier} numbers must start with {prefix}")]
    PhonePrefix { carrier: &'static str, prefix: &'static str },
    #[error("enter exactly 9 digits after the {prefix} prefix")]
    PhoneLength { prefix: &'static str },
    #[error("upload the deposit receipt")]
    MissingReceipt,
    #[error("the account reference must contain at least 10 characters")]
    ReferenceTooShort,
    #[error("upload the proof of transfer")]
    MissingProof,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    MobileMoney,
    BankDeposit,
    WireTransfer,
}

impl PaymentMode {
    pub const ALL: [Self; 3] = [Self::MobileMoney, Self::BankDeposit, Self::WireTransfer];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::MobileMoney => "Mobile money",
            Self::BankDeposit => "Bank deposit",
            Self::WireTransfer => "Wire transfer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Mtn,
    Airtel,
}

impl Carrier {
    pub const ALL: [Self; 2] = [Self::Mtn, Self::Airtel];

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Mtn => "06",
            Self::Airtel => "05",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mtn => "MTN Mobile Money",
            Self::Airtel => "Airtel Money",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mtn" => Some(Self::Mtn),
            "airtel" => Some(Self::Airtel),
            _ => None,
        }
    }
}

/// Amount, fee and total for the selected mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub amount: u64,
    pub fee: u64,
    pub total: u64,
}

impl FeeBreakdown {
    #[must_use]
    pub fn flat(amount: u64) -> Self {
        Self { amount, fee: 0, total: amount }
    }

    #[must_use]
    pub fn mobile_money(amount: u64) -> Self {
        let fee = mobile_money_fee(amount);
        Self { amount, fee, total: amount.saturating_add(fee) }
    }
}

/// 1.5 % of `amount`, rounded half up to the nearest unit.
#[must_use]
pub fn mobile_money_fee(amount: u64) -> u64 {
    let fee = (u128::from(amount) * u128::from(MOBILE_MONEY_FEE_BPS) + 5_000) / 10_000;
    u64::try_from(fee).unwrap_or(u64::MAX)
}

/// `101500` -> `"101 500 FCFA"`.
#[must_use]
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out.push_str(" FCFA");
    out
}

// =============================================================================
// MOBILE MONEY
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MobileMoneyForm {
    pub carrier: Option<Carrier>,
    pub phone: String,
}

impl MobileMoneyForm {
    /// Pick a carrier and seed the phone field with its prefix.
    pub fn select_carrier(&mut self, carrier: Carrier) {
        self.carrier = Some(carrier);
        self.phone = carrier.prefix().to_owned();
    }

    /// Store the typed number, keeping digits only.
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = raw.chars().filter(char::is_ascii_digit).collect();
    }

    /// # Errors
    ///
    /// Returns the first problem with the carrier or phone number.
    pub fn validate(&self) -> Result<Carrier, PaymentError> {
        let carrier = self.carrier.ok_or(PaymentError::NoCarrier)?;
        let prefix = carrier.prefix();
        let Some(rest) = self.phone.strip_prefix(prefix) else {
            return Err(PaymentError::PhonePrefix { carrier: carrier.label(), prefix });
        };
        if rest.len() != PHONE_DIGITS_AFTER_PREFIX || !rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::PhoneLength { prefix });
        }
        Ok(carrier)
    }

    /// Text shown in the confirmation modal before the payment fires.
    #[must_use]
    pub fn confirmation_text(&self, amount: u64) -> String {
        let carrier = self.carrier.map_or("—", Carrier::label);
        let fees = FeeBreakdown::mobile_money(amount);
        format!(
            "Pay {} (fee {}) with {carrier} from {}?",
            format_amount(fees.total),
            format_amount(fees.fee),
            self.phone
        )
    }
}

// =============================================================================
// BANK DEPOSIT
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BankDepositForm {
    pub receipt: Option<Attachment>,
}

impl BankDepositForm {
    #[must_use]
    pub fn can_finalize(&self) -> bool {
        self.receipt.is_some()
    }
}

// =============================================================================
// WIRE TRANSFER
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireTransferForm {
    pub reference: String,
    pub proof: Option<Attachment>,
}

/// Strip whitespace and uppercase, so `"cg39 3001"` and `"CG393001"` compare equal.
#[must_use]
pub fn normalize_reference(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_uppercase).collect()
}

impl WireTransferForm {
    #[must_use]
    pub fn normalized_reference(&self) -> String {
        normalize_reference(&self.reference)
    }

    #[must_use]
    pub fn reference_long_enough(&self) -> bool {
        self.normalized_reference().chars().count() >= MIN_WIRE_REFERENCE_LEN
    }

    /// Whether to warn about interbank fees. Never blocks finalizing.
    #[must_use]
    pub fn reference_mismatch(&self, published: &str) -> bool {
        self.reference_long_enough() && self.normalized_reference() != normalize_reference(published)
    }

    #[must_use]
    pub fn can_finalize(&self) -> bool {
        self.reference_long_enough() && self.proof.is_some()
    }
}

// =============================================================================
// SELECTOR
// =============================================================================

/// The active mode with its sub-form. Switching modes drops the old form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentSelection {
    MobileMoney(MobileMoneyForm),
    BankDeposit(BankDepositForm),
    WireTransfer(WireTransferForm),
}

impl Default for PaymentSelection {
    fn default() -> Self {
        Self::MobileMoney(MobileMoneyForm::default())
    }
}

impl PaymentSelection {
    #[must_use]
    pub fn mode(&self) -> PaymentMode {
        match self {
            Self::MobileMoney(_) => PaymentMode::MobileMoney,
            Self::BankDeposit(_) => PaymentMode::BankDeposit,
            Self::WireTransfer(_) => PaymentMode::WireTransfer,
        }
    }

    /// Switch to `mode` with a fresh form. Re-selecting the current mode keeps it.
    pub fn select(&mut self, mode: PaymentMode) {
        if self.mode() == mode {
            return;
        }
        *self = match mode {
            PaymentMode::MobileMoney => Self::MobileMoney(MobileMoneyForm::default()),
            PaymentMode::BankDeposit => Self::BankDeposit(BankDepositForm::default()),
            PaymentMode::WireTransfer => Self::WireTransfer(WireTransferForm::default()),
        };
    }

    #[must_use]
    pub fn fees(&self, amount: u64) -> FeeBreakdown {
        match self {
            Self::MobileMoney(_) => FeeBreakdown::mobile_money(amount),
            Self::BankDeposit(_) | Self::WireTransfer(_) => FeeBreakdown::flat(amount),
        }
    }

    /// Validate the active form and build what gets sent upstream.
    ///
    /// # Errors
    ///
    /// Returns the first blocking problem in the active sub-form.
    pub fn finalize(&self, amount: u64) -> Result<PaymentSubmission, PaymentError> {
        let fees = self.fees(amount);
        match self {
            Self::MobileMoney(form) => {
                let carrier = form.validate()?;
                Ok(PaymentSubmission {
                    payload: PaymentPayload::MobileMoney { carrier, phone: form.phone.clone(), fees },
                    proof: None,
                })
            }
            Self::BankDeposit(form) => {
                let receipt = form.receipt.clone().ok_or(PaymentError::MissingReceipt)?;
                Ok(PaymentSubmission { payload: PaymentPayload::BankDeposit { fees }, proof: Some(receipt) })
            }
            Self::WireTransfer(form) => {
                if !form.reference_long_enough() {
                    return Err(PaymentError::ReferenceTooShort);
                }
                let proof = form.proof.clone().ok_or(PaymentError::MissingProof)?;
                Ok(PaymentSubmission {
                    payload: PaymentPayload::WireTransfer { reference: form.normalized_reference(), fees },
                    proof: Some(proof),
                })
            }
        }
    }
}

/// JSON body of a payment notification, tagged by `mode`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaymentPayload {
    MobileMoney {
        carrier: Carrier,
        phone: String,
        #[serde(flatten)]
        fees: FeeBreakdown,
    },
    BankDeposit {
        #[serde(flatten)]
        fees: FeeBreakdown,
    },
    WireTransfer {
        reference: String,
        #[serde(flatten)]
        fees: FeeBreakdown,
    },
}

/// A finalized payment: the payload plus the receipt/proof file, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentSubmission {
    pub payload: PaymentPayload,
    pub proof: Option<Attachment>,
}
