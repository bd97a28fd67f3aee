//! Input checks for the login, registration, OTP and profile forms, plus the
//! resend-code countdown.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::types::{LoginRequest, ProfileUpdate, RegisterRequest};
use crate::validation::ValidationReport;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const OTP_LEN: usize = 6;
pub const RESEND_COOLDOWN_SECS: u32 = 60;

fn looks_like_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Trim the email and require both fields.
///
/// # Errors
///
/// Returns the message to show under the form.
pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !looks_like_email(email) {
        return Err("Enter a valid email address.");
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

/// Keep digits only, capped at [`OTP_LEN`].
#[must_use]
pub fn normalize_otp_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).take(OTP_LEN).collect()
}

/// # Errors
///
/// Returns a message unless `code` is exactly six digits.
pub fn validate_otp(code: &str) -> Result<String, &'static str> {
    let code = code.trim();
    if code.len() != OTP_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("Enter the 6-digit code sent to you.");
    }
    Ok(code.to_owned())
}

/// Registration form as typed, including the password confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub company_name: String,
    pub niu: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterForm {
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        required(&mut report, "companyName", &self.company_name, "Company name");
        required(&mut report, "niu", &self.niu, "Tax identification number");
        required(&mut report, "contactName", &self.contact_name, "Contact name");
        check_email(&mut report, &self.email);
        check_phone(&mut report, &self.phone);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            report.insert("password", "Password must contain at least 8 characters.");
        }
        if self.password != self.password_confirmation {
            report.insert("passwordConfirmation", "Passwords do not match.");
        }
        report
    }

    /// The request body, trimmed. Call after [`Self::validate`] passes.
    #[must_use]
    pub fn to_request(&self) -> RegisterRequest {
        let address = self.address.trim();
        RegisterRequest {
            company_name: self.company_name.trim().to_owned(),
            niu: self.niu.trim().to_owned(),
            contact_name: self.contact_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: (!address.is_empty()).then(|| address.to_owned()),
            password: self.password.clone(),
        }
    }
}

/// Every profile field is required except the address.
#[must_use]
pub fn validate_profile(profile: &ProfileUpdate) -> ValidationReport {
    let mut report = ValidationReport::default();
    required(&mut report, "companyName", &profile.company_name, "Company name");
    required(&mut report, "contactName", &profile.contact_name, "Contact name");
    check_email(&mut report, &profile.email);
    check_phone(&mut report, &profile.phone);
    report
}

fn required(report: &mut ValidationReport, key: &'static str, value: &str, label: &str) {
    if value.trim().is_empty() {
        report.insert(key, format!("{label} is required."));
    }
}

fn check_email(report: &mut ValidationReport, email: &str) {
    if email.trim().is_empty() {
        report.insert("email", "Email is required.");
    } else if !looks_like_email(email.trim()) {
        report.insert("email", "Enter a valid email address.");
    }
}

fn check_phone(report: &mut ValidationReport, phone: &str) {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let allowed = phone.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
    if phone.trim().is_empty() {
        report.insert("phone", "Phone number is required.");
    } else if !allowed || digits < 9 {
        report.insert("phone", "Enter a valid phone number.");
    }
}

/// Seconds left before another OTP may be requested. Driven by a 1 s timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResendCountdown {
    remaining: u32,
}

impl Default for ResendCountdown {
    fn default() -> Self {
        Self::started()
    }
}

impl ResendCountdown {
    #[must_use]
    pub fn started() -> Self {
        Self { remaining: RESEND_COOLDOWN_SECS }
    }

    #[must_use]
    pub fn remaining(self) -> u32 {
        self.remaining
    }

    /// One second elapsed.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    #[must_use]
    pub fn can_resend(self) -> bool {
        self.remaining == 0
    }

    pub fn restart(&mut self) {
        self.remaining = RESEND_COOLDOWN_SECS;
    }

    /// `"0:59"`-style label for the resend button.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
