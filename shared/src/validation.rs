//! Form validation
//!
//! Input payloads derive [`validator::Validate`]; the field rules live next to
//! the payload types. This module holds the reusable rule functions and turns
//! [`ValidationErrors`] into an [`AppError`] whose message lists every failed
//! field and whose details map field → message.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Name with at least two non-blank characters
pub fn person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(error("name", "Tên khách hàng phải có ít nhất 2 ký tự"));
    }
    Ok(())
}

/// Mobile number: 10 or 11 digits once whitespace is removed
pub fn phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let valid = (10..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(error("phone", "Số điện thoại không hợp lệ (10-11 số)"));
    }
    Ok(())
}

/// Loyalty points may not be negative
pub fn non_negative_points(points: &Decimal) -> Result<(), ValidationError> {
    if points.is_sign_negative() && !points.is_zero() {
        return Err(error("loyalty_points", "Điểm tích lũy không thể âm"));
    }
    Ok(())
}

/// Total spend may not be negative
pub fn non_negative_spent(spent: &Decimal) -> Result<(), ValidationError> {
    if spent.is_sign_negative() && !spent.is_zero() {
        return Err(error("total_spent", "Tổng chi tiêu không thể âm"));
    }
    Ok(())
}

/// Staff name must not be blank
pub fn staff_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(error("name", "Tên nhân viên không được để trống"));
    }
    Ok(())
}

/// Staff phone: digits, spaces, `+`, `-` and parentheses
pub fn staff_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(error("phone", "Số điện thoại không được để trống"));
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')') || c.is_whitespace();
    if !phone.chars().all(allowed) {
        return Err(error("phone", "Số điện thoại không hợp lệ"));
    }
    Ok(())
}

/// Minimum monthly salary
pub const MIN_SALARY: i64 = 1_000_000;

/// Salary of at least 1.000.000 đ
pub fn salary(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::from(MIN_SALARY) {
        return Err(error("salary", "Lương phải ít nhất 1,000,000 VNĐ"));
    }
    Ok(())
}

/// New password of at least 6 characters
pub fn new_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 6 {
        return Err(error("new_password", "Mật khẩu mới phải có ít nhất 6 ký tự"));
    }
    Ok(())
}

/// Field → message pairs, sorted by field name
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect();
    out.sort();
    out
}

/// Convert validator output into a validation [`AppError`]
pub fn to_app_error(errors: &ValidationErrors) -> AppError {
    let fields = field_messages(errors);
    let message = fields
        .iter()
        .map(|(_, m)| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    fields
        .into_iter()
        .fold(AppError::validation(message), |err, (field, msg)| {
            err.with_detail(field, msg)
        })
}

/// Run the derived rules of `value`
pub fn check<T: Validate>(value: &T) -> AppResult<()> {
    value.validate().map_err(|e| to_app_error(&e))
}
