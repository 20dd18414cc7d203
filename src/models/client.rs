//! Client (customer) record

use super::{looks_like_email, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] = [ClientStatus::Active, ClientStatus::Inactive, ClientStatus::Lead];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Lead => "lead",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "inactive" => ClientStatus::Inactive,
            "lead" => ClientStatus::Lead,
            _ => ClientStatus::Active,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
            ClientStatus::Lead => "Lead",
        }
    }
}

/// Client as edited in the customer form.
///
/// Address, payment and tax details are flattened here and regrouped into
/// nested objects when sent to the API.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Client {
    pub id: u64,
    /// Contact person
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub website: String,
    pub status: ClientStatus,

    // Address
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,

    // Payment
    pub payment_terms: String,
    pub payment_method: String,
    pub currency: String,

    // Tax
    pub tax_number: String,
    pub tax_rate: Option<f64>,
    pub tax_exempt: bool,

    pub notes: String,
    pub logo_url: Option<String>,
    /// Pending logo upload, exchanged for permanent storage on save
    pub logo_temp_id: Option<String>,

    // Read-only
    pub jobs_count: u32,
    pub created_at: Option<String>,
}

impl Client {
    pub fn display_name(&self) -> &str {
        if self.company_name.trim().is_empty() {
            &self.name
        } else {
            &self.company_name
        }
    }

    /// One-line address for tables
    pub fn address_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.postal_code, &self.country]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required".to_string());
        }
        if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
            errors.insert("email", "Enter a valid email address".to_string());
        }
        if let Some(rate) = self.tax_rate {
            if !(0.0..=100.0).contains(&rate) {
                errors.insert("tax_rate", "Tax rate must be between 0 and 100".to_string());
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_company() {
        let mut client = Client { name: "Dana Reyes".into(), ..Client::default() };
        assert_eq!(client.display_name(), "Dana Reyes");
        client.company_name = "Reyes Plumbing".into();
        assert_eq!(client.display_name(), "Reyes Plumbing");
    }

    #[test]
    fn test_address_line_skips_blanks() {
        let client = Client {
            street: "12 Dock St".into(),
            city: "Portland".into(),
            country: "US".into(),
            ..Client::default()
        };
        assert_eq!(client.address_line(), "12 Dock St, Portland, US");
    }

    #[test]
    fn test_validate() {
        let client = Client { email: "nope".into(), tax_rate: Some(120.0), ..Client::default() };
        let errors = client.validate();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("tax_rate"));
    }
}
