// Login session facts

use super::Field;

/// Reported when no login-tracking tool produced a record.
pub const LOGIN_UNAVAILABLE: &str = "Login tracking unavailable";
pub const NEVER_LOGGED_IN: &str = "Never logged in";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastLogin {
    pub when: String,
    pub from: Option<String>,
}

impl LastLogin {
    pub fn at(when: impl Into<String>) -> Self {
        Self {
            when: when.into(),
            from: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFacts {
    pub username: Option<Field<String>>,
    pub last_login: Option<Field<LastLogin>>,
    pub shell: Option<Field<String>>,
    pub terminal: Option<Field<String>>,
    pub locale: Option<Field<String>>,
}
