//! Signed-in user and login form

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<u64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Up to two initials for the avatar placeholder
    pub fn initials(&self) -> String {
        let source = if self.name.trim().is_empty() { &self.email } else { &self.name };
        source
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let user = User { name: "dana k reyes".into(), ..User::default() };
        assert_eq!(user.initials(), "DK");
        let user = User { email: "ops@example.com".into(), ..User::default() };
        assert_eq!(user.initials(), "O");
    }
}
