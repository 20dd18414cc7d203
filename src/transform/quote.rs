//! Quote transformers

use rest_resource::RestResource;
use serde::{Deserialize, Serialize};

use super::{format_date, non_empty, number_or_string, parse_date};
use crate::models::{LineItem, Quote, QuoteStatus};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineItemApi {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string", alias = "price")]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuoteClientApi {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuoteApi {
    pub id: u64,
    #[serde(default)]
    pub quote_number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client: Option<QuoteClientApi>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default, alias = "expiry_date")]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "line_items")]
    pub items: Vec<LineItemApi>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub tax_rate: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub subtotal: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub tax_amount: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub total: Option<f64>,
    #[serde(default)]
    pub job_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotePayload {
    pub title: String,
    pub status: String,
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<LineItemPayload>,
    pub tax_rate: f64,
}

pub fn transform_quote_from_api(api: QuoteApi) -> Quote {
    let client_id = api.client_id.or(api.client.as_ref().map(|c| c.id));
    let client_name = api
        .client
        .as_ref()
        .and_then(|c| c.company_name.clone().filter(|n| !n.is_empty()).or(c.name.clone()))
        .unwrap_or_default();

    let mut quote = Quote {
        id: api.id,
        quote_number: api.quote_number.unwrap_or_default(),
        title: api.title.unwrap_or_default(),
        status: api.status.as_deref().map(QuoteStatus::from_str).unwrap_or_default(),
        client_id,
        client_name,
        issue_date: parse_date(api.issue_date.as_deref()),
        valid_until: parse_date(api.valid_until.as_deref()),
        notes: api.notes.unwrap_or_default(),
        line_items: api
            .items
            .into_iter()
            .map(|item| LineItem {
                id: item.id,
                description: item.description.unwrap_or_default(),
                quantity: item.quantity.unwrap_or(1.0),
                unit_price: item.unit_price.unwrap_or(0.0),
            })
            .collect(),
        tax_rate: api.tax_rate.unwrap_or(0.0),
        subtotal: 0.0,
        tax_amount: 0.0,
        total: 0.0,
        job_id: api.job_id,
        created_at: api.created_at,
    };
    quote.recalculate();

    // The server's figures win when present.
    if let Some(subtotal) = api.subtotal {
        quote.subtotal = subtotal;
    }
    if let Some(tax_amount) = api.tax_amount {
        quote.tax_amount = tax_amount;
    }
    if let Some(total) = api.total {
        quote.total = total;
    }
    quote
}

/// Totals are derived server-side and never sent.
pub fn transform_quote_for_api(quote: &Quote) -> QuotePayload {
    QuotePayload {
        title: quote.title.trim().to_string(),
        status: quote.status.as_str().to_string(),
        client_id: quote.client_id,
        issue_date: format_date(quote.issue_date),
        valid_until: format_date(quote.valid_until),
        notes: non_empty(&quote.notes),
        items: quote
            .line_items
            .iter()
            .map(|line| LineItemPayload {
                id: line.id,
                description: line.description.trim().to_string(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect(),
        tax_rate: quote.tax_rate,
    }
}

impl RestResource for Quote {
    type Api = QuoteApi;
    type Payload = QuotePayload;
    const PATH: &'static str = "quotes";
    const LABEL: &'static str = "Quote";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_api(api: QuoteApi) -> Self {
        transform_quote_from_api(api)
    }

    fn to_payload(&self) -> QuotePayload {
        transform_quote_for_api(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_amounts_and_line_items_alias() {
        let api: QuoteApi = serde_json::from_value(json!({
            "id": 7,
            "quote_number": "Q-0007",
            "title": "Bathroom refit",
            "status": "approved",
            "client_id": 2,
            "line_items": [
                {"id": 1, "description": "Labour", "quantity": "4", "unit_price": "60.00"},
                {"description": "Tiles", "quantity": 12, "price": 4.5}
            ],
            "tax_rate": "10"
        }))
        .unwrap();

        let quote = transform_quote_from_api(api);
        assert_eq!(quote.status, QuoteStatus::Accepted);
        assert_eq!(quote.line_items.len(), 2);
        assert_eq!(quote.subtotal, 294.0);
        assert_eq!(quote.tax_amount, 29.4);
        assert_eq!(quote.total, 323.4);
    }

    #[test]
    fn test_server_totals_take_precedence() {
        let api: QuoteApi = serde_json::from_value(json!({
            "id": 1,
            "items": [{"description": "A", "quantity": 1, "unit_price": 10}],
            "total": "11.50"
        }))
        .unwrap();
        let quote = transform_quote_from_api(api);
        assert_eq!(quote.subtotal, 10.0);
        assert_eq!(quote.total, 11.5);
    }

    #[test]
    fn test_payload_shape() {
        let quote = Quote {
            title: " Repipe ".into(),
            client_id: Some(4),
            line_items: vec![LineItem { id: None, description: "Pipe".into(), quantity: 2.0, unit_price: 15.0 }],
            ..Quote::default()
        };
        let body = serde_json::to_value(transform_quote_for_api(&quote)).unwrap();
        assert_eq!(body["title"], "Repipe");
        assert_eq!(body["items"], json!([{"description": "Pipe", "quantity": 2.0, "unit_price": 15.0}]));
        assert!(body.get("total").is_none());
    }
}
