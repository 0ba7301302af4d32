use std::sync::LazyLock;

use regex::Regex;

use super::Field;
use crate::error::FormError;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub fn is_email(value: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(value))
}

pub fn required(field: Field, value: &str, message: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::validation(field, message));
    }
    Ok(())
}

/// 先检查是否为空（去除首尾空白后），再检查格式；格式检查使用原始值
pub fn email(value: &str) -> Result<(), FormError> {
    required(Field::Email, value, "Email is required")?;
    if !is_email(value) {
        return Err(FormError::validation(
            Field::Email,
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

/// 密码从不去空白，只有空字符串才算缺失
pub fn password_present(value: &str) -> Result<(), FormError> {
    if value.is_empty() {
        return Err(FormError::validation(Field::Password, "Password is required"));
    }
    Ok(())
}

/// 长度按 UTF-16 码元计算，与浏览器报告的一致
pub fn password_strength(value: &str) -> Result<(), FormError> {
    if value.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(FormError::validation(
            Field::Password,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn passwords_match(password: &str, confirm: &str) -> Result<(), FormError> {
    if password != confirm {
        return Err(FormError::validation(
            Field::ConfirmPassword,
            "Passwords do not match",
        ));
    }
    Ok(())
}
