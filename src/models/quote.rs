//! Quote record

use chrono::NaiveDate;

use super::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Accepted,
        QuoteStatus::Rejected,
        QuoteStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "sent" => QuoteStatus::Sent,
            "accepted" | "approved" => QuoteStatus::Accepted,
            "rejected" | "declined" => QuoteStatus::Rejected,
            "expired" => QuoteStatus::Expired,
            _ => QuoteStatus::Draft,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Draft",
            QuoteStatus::Sent => "Sent",
            QuoteStatus::Accepted => "Accepted",
            QuoteStatus::Rejected => "Rejected",
            QuoteStatus::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineItem {
    pub id: Option<u64>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn amount(&self) -> f64 {
        round_cents(self.quantity * self.unit_price)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quote {
    pub id: u64,
    pub quote_number: String,
    pub title: String,
    pub status: QuoteStatus,
    pub client_id: Option<u64>,
    pub client_name: String,
    pub issue_date: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub notes: String,
    pub line_items: Vec<LineItem>,
    /// Percent
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    /// Set once the quote has been turned into a job
    pub job_id: Option<u64>,
    pub created_at: Option<String>,
}

impl Quote {
    /// Derive subtotal, tax and total from the line items.
    pub fn recalculate(&mut self) {
        self.subtotal = round_cents(self.line_items.iter().map(LineItem::amount).sum());
        self.tax_amount = round_cents(self.subtotal * self.tax_rate / 100.0);
        self.total = round_cents(self.subtotal + self.tax_amount);
    }

    pub fn add_line(&mut self) {
        self.line_items.push(LineItem {
            quantity: 1.0,
            ..LineItem::default()
        });
    }

    pub fn remove_line(&mut self, index: usize) {
        if index < self.line_items.len() {
            self.line_items.remove(index);
            self.recalculate();
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.status, QuoteStatus::Draft | QuoteStatus::Sent) && self.job_id.is_none()
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required".to_string());
        }
        if self.client_id.is_none() {
            errors.insert("client_id", "Select a customer".to_string());
        }
        if self.line_items.is_empty() {
            errors.insert("line_items", "Add at least one line item".to_string());
        } else if self
            .line_items
            .iter()
            .any(|l| l.description.trim().is_empty() || l.quantity <= 0.0 || l.unit_price < 0.0)
        {
            errors.insert("line_items", "Every line needs a description, a positive quantity and a price".to_string());
        }
        if let (Some(issued), Some(valid)) = (self.issue_date, self.valid_until) {
            if valid < issued {
                errors.insert("valid_until", "Expiry cannot be before the issue date".to_string());
            }
        }
        errors
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(description: &str, quantity: f64, unit_price: f64) -> LineItem {
        LineItem { id: None, description: description.into(), quantity, unit_price }
    }

    #[test]
    fn test_recalculate_totals() {
        let mut quote = Quote {
            tax_rate: 8.25,
            line_items: vec![line("Labour", 3.0, 85.0), line("Valve", 2.0, 19.99)],
            ..Quote::default()
        };
        quote.recalculate();
        assert_eq!(quote.subtotal, 294.98);
        assert_eq!(quote.tax_amount, 24.34);
        assert_eq!(quote.total, 319.32);
    }

    #[test]
    fn test_remove_line_recalculates() {
        let mut quote = Quote {
            line_items: vec![line("A", 1.0, 10.0), line("B", 1.0, 5.0)],
            ..Quote::default()
        };
        quote.recalculate();
        quote.remove_line(0);
        assert_eq!(quote.subtotal, 5.0);
        quote.remove_line(7);
        assert_eq!(quote.line_items.len(), 1);
    }

    #[test]
    fn test_validate_line_items() {
        let mut quote = Quote { title: "Repipe".into(), client_id: Some(1), ..Quote::default() };
        assert!(quote.validate().contains_key("line_items"));
        quote.add_line();
        assert!(quote.validate().contains_key("line_items"), "blank description");
        quote.line_items[0].description = "Copper pipe".into();
        assert!(quote.validate().is_empty());
    }

    #[test]
    fn test_converted_quote_is_not_editable() {
        let quote = Quote { status: QuoteStatus::Accepted, ..Quote::default() };
        assert!(!quote.is_editable());
        let draft = Quote { job_id: Some(4), ..Quote::default() };
        assert!(!draft.is_editable());
    }
}
