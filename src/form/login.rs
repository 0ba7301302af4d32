use standoff_shared::protocol::{LoginMutation, LoginVariables};

use super::validation;
use super::{AuthForm, Field};
use crate::error::FormError;

pub const CREDENTIALS_MESSAGE: &str =
    "Invalid email or password. Please check your credentials and try again.";

/// 展示凭据错误时，在表单下方显示的提示
pub const CREDENTIALS_HINT: &str =
    "Make sure you're using the email and password you signed up with.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl AuthForm for LoginForm {
    type Operation = LoginMutation;

    const NAME: &'static str = "login";
    const FIELDS: &'static [Field] = &[Field::Email, Field::Password];
    const IDLE_LABEL: &'static str = "Sign in →";
    const BUSY_LABEL: &'static str = "Signing in...";
    const REJECTED: &'static str = "Login failed";
    const NO_PAYLOAD: &'static str = "Login failed. Please try again.";

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email => Some(&self.email),
            Field::Password => Some(&self.password),
            _ => None,
        }
    }

    fn set(&mut self, field: Field, value: String) -> bool {
        match field {
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            _ => return false,
        }
        true
    }

    fn validate(&self) -> Result<(), FormError> {
        validation::email(&self.email)?;
        validation::password_present(&self.password)?;
        Ok(())
    }

    fn variables(&self) -> LoginVariables {
        LoginVariables {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// 账号不存在与密码错误统一为同一条消息
    fn classify_rejection(message: &str) -> FormError {
        let lower = message.to_lowercase();
        if lower.contains("invalid email") || lower.contains("invalid password") {
            FormError::credentials(CREDENTIALS_MESSAGE)
        } else {
            FormError::backend(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormErrorKind;
    use rstest::rstest;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    #[rstest]
    #[case("", "", "Email is required", Field::Email)]
    #[case("  ", "secret", "Email is required", Field::Email)]
    #[case("nope", "secret", "Please enter a valid email address", Field::Email)]
    #[case("a@b.co", "", "Password is required", Field::Password)]
    fn first_failure_wins(
        #[case] email: &str,
        #[case] password: &str,
        #[case] message: &str,
        #[case] field: Field,
    ) {
        let err = form(email, password).validate().unwrap_err();
        assert_eq!(err.message, message);
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn short_password_is_fine_for_login() {
        assert!(form("a@b.co", "x").validate().is_ok());
    }

    #[rstest]
    #[case("Invalid email or password")]
    #[case("INVALID PASSWORD for user")]
    #[case("login: invalid email")]
    fn credential_rejections_are_rewritten(#[case] raw: &str) {
        let err = LoginForm::classify_rejection(raw);
        assert_eq!(err.message, CREDENTIALS_MESSAGE);
        assert_eq!(err.kind, FormErrorKind::Credentials);
    }

    #[test]
    fn other_rejections_pass_through() {
        let err = LoginForm::classify_rejection("account locked");
        assert_eq!(err.message, "account locked");
        assert_eq!(err.kind, FormErrorKind::Backend);
    }

    #[test]
    fn signup_only_fields_are_rejected() {
        let mut f = LoginForm::default();
        assert!(!f.set(Field::FirstName, "Tyler".into()));
        assert!(f.value(Field::ConfirmPassword).is_none());
        assert!(f.set(Field::Email, "a@b.co".into()));
        assert_eq!(f.value(Field::Email), Some("a@b.co"));
    }
}
