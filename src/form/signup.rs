use standoff_shared::protocol::{SignupMutation, SignupVariables};

use super::validation;
use super::{AuthForm, Field};
use crate::error::FormError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AuthForm for SignupForm {
    type Operation = SignupMutation;

    const NAME: &'static str = "signup";
    const FIELDS: &'static [Field] = &[
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Password,
        Field::ConfirmPassword,
    ];
    const IDLE_LABEL: &'static str = "Sign up →";
    const BUSY_LABEL: &'static str = "Signing up...";
    const REJECTED: &'static str = "Signup failed";
    const NO_PAYLOAD: &'static str = "Signup failed. Please try again.";

    fn value(&self, field: Field) -> Option<&str> {
        Some(match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        })
    }

    fn set(&mut self, field: Field, value: String) -> bool {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        };
        *slot = value;
        true
    }

    fn validate(&self) -> Result<(), FormError> {
        validation::required(Field::FirstName, &self.first_name, "First name is required")?;
        validation::required(Field::LastName, &self.last_name, "Last name is required")?;
        validation::email(&self.email)?;
        validation::password_present(&self.password)?;
        validation::password_strength(&self.password)?;
        // 确认密码为空按不一致处理
        validation::passwords_match(&self.password, &self.confirm_password)?;
        Ok(())
    }

    fn variables(&self) -> SignupVariables {
        SignupVariables {
            email: self.email.clone(),
            password: self.password.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid() -> SignupForm {
        SignupForm {
            first_name: "Marla".into(),
            last_name: "Singer".into(),
            email: "marla@fc.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[rstest]
    #[case::first_name(|f: &mut SignupForm| f.first_name = " ".into(), Field::FirstName, "First name is required")]
    #[case::last_name(|f: &mut SignupForm| f.last_name.clear(), Field::LastName, "Last name is required")]
    #[case::email_missing(|f: &mut SignupForm| f.email.clear(), Field::Email, "Email is required")]
    #[case::email_shape(|f: &mut SignupForm| f.email = "marla@fc".into(), Field::Email, "Please enter a valid email address")]
    #[case::password_missing(|f: &mut SignupForm| { f.password.clear(); f.confirm_password.clear(); }, Field::Password, "Password is required")]
    #[case::password_short(|f: &mut SignupForm| { f.password = "12345".into(); f.confirm_password = "12345".into(); }, Field::Password, "Password must be at least 6 characters")]
    #[case::mismatch(|f: &mut SignupForm| f.confirm_password = "secret2".into(), Field::ConfirmPassword, "Passwords do not match")]
    #[case::confirm_missing(|f: &mut SignupForm| f.confirm_password.clear(), Field::ConfirmPassword, "Passwords do not match")]
    fn each_rule_reports_its_field(
        #[case] breakage: fn(&mut SignupForm),
        #[case] field: Field,
        #[case] message: &str,
    ) {
        let mut form = valid();
        breakage(&mut form);
        let err = form.validate().unwrap_err();
        assert_eq!(err.field(), Some(field));
        assert_eq!(err.message, message);
    }

    #[test]
    fn earlier_fields_win() {
        let form = SignupForm {
            email: "bad".into(),
            password: "1".into(),
            ..SignupForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().message,
            "First name is required"
        );
    }

    #[test]
    fn short_password_is_reported_before_mismatch() {
        let form = SignupForm {
            password: "123".into(),
            confirm_password: "456".into(),
            ..valid()
        };
        assert_eq!(form.validate().unwrap_err().field(), Some(Field::Password));
    }

    #[test]
    fn variables_carry_names_camel_cased() {
        let vars = serde_json::to_value(valid().variables()).unwrap();
        assert_eq!(vars["firstName"], "Marla");
        assert_eq!(vars["lastName"], "Singer");
        assert!(vars.get("confirmPassword").is_none());
    }
}
