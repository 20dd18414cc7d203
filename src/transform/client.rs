//! Client transformers
//!
//! The API nests `address`, `payment` and `tax`; the form keeps them flat.
//! Outgoing payloads drop blank strings and omit nested objects that end up
//! empty.

use rest_resource::RestResource;
use serde::{Deserialize, Serialize};

use super::{non_empty, number_or_string};
use crate::models::{Client, ClientStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(default, deserialize_with = "number_or_string", skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_exempt: Option<bool>,
}

/// Client as returned by `GET /vendors/clients`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientApi {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<AddressApi>,
    #[serde(default)]
    pub payment: Option<PaymentApi>,
    #[serde(default)]
    pub tax: Option<TaxApi>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub jobs_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressApi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentApi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<TaxApi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_temp_id: Option<String>,
}

pub fn transform_client_from_api(api: ClientApi) -> Client {
    let address = api.address.unwrap_or_default();
    let payment = api.payment.unwrap_or_default();
    let tax = api.tax.unwrap_or_default();

    Client {
        id: api.id,
        name: api.name.unwrap_or_default(),
        company_name: api.company_name.unwrap_or_default(),
        email: api.email.unwrap_or_default(),
        phone: api.phone.unwrap_or_default(),
        mobile: api.mobile.unwrap_or_default(),
        website: api.website.unwrap_or_default(),
        status: api
            .status
            .as_deref()
            .map(ClientStatus::from_str)
            .unwrap_or_default(),
        street: address.street.unwrap_or_default(),
        city: address.city.unwrap_or_default(),
        state: address.state.unwrap_or_default(),
        postal_code: address.postal_code.unwrap_or_default(),
        country: address.country.unwrap_or_default(),
        payment_terms: payment.terms.unwrap_or_default(),
        payment_method: payment.method.unwrap_or_default(),
        currency: payment.currency.unwrap_or_default(),
        tax_number: tax.tax_number.unwrap_or_default(),
        tax_rate: tax.tax_rate,
        tax_exempt: tax.tax_exempt.unwrap_or(false),
        notes: api.notes.unwrap_or_default(),
        logo_url: api.logo_url.filter(|u| !u.is_empty()),
        logo_temp_id: None,
        jobs_count: api.jobs_count.unwrap_or(0),
        created_at: api.created_at,
    }
}

pub fn transform_client_for_api(client: &Client) -> ClientPayload {
    let address = AddressApi {
        street: non_empty(&client.street),
        city: non_empty(&client.city),
        state: non_empty(&client.state),
        postal_code: non_empty(&client.postal_code),
        country: non_empty(&client.country),
    };
    let payment = PaymentApi {
        terms: non_empty(&client.payment_terms),
        method: non_empty(&client.payment_method),
        currency: non_empty(&client.currency),
    };
    let tax = TaxApi {
        tax_number: non_empty(&client.tax_number),
        tax_rate: client.tax_rate,
        tax_exempt: client.tax_exempt.then_some(true),
    };

    ClientPayload {
        name: client.name.trim().to_string(),
        company_name: non_empty(&client.company_name),
        email: non_empty(&client.email),
        phone: non_empty(&client.phone),
        mobile: non_empty(&client.mobile),
        website: non_empty(&client.website),
        status: client.status.as_str().to_string(),
        address: prune(address),
        payment: prune(payment),
        tax: prune(tax),
        notes: non_empty(&client.notes),
        logo_temp_id: client.logo_temp_id.clone(),
    }
}

/// `None` for an object with every field unset
fn prune<T: Default + PartialEq>(value: T) -> Option<T> {
    if value == T::default() {
        None
    } else {
        Some(value)
    }
}

impl RestResource for Client {
    type Api = ClientApi;
    type Payload = ClientPayload;
    const PATH: &'static str = "clients";
    const LABEL: &'static str = "Customer";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_api(api: ClientApi) -> Self {
        transform_client_from_api(api)
    }

    fn to_payload(&self) -> ClientPayload {
        transform_client_for_api(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_client() -> ClientApi {
        serde_json::from_value(json!({
            "id": 42,
            "name": "Dana Reyes",
            "company_name": "Reyes Plumbing",
            "email": "dana@reyes.example",
            "phone": "555-0100",
            "mobile": "555-0101",
            "website": "https://reyes.example",
            "status": "lead",
            "address": {"street": "12 Dock St", "city": "Portland", "state": "OR", "postal_code": "97201", "country": "US"},
            "payment": {"terms": "net_30", "method": "bank_transfer", "currency": "USD"},
            "tax": {"tax_number": "TX-9", "tax_rate": "8.25", "tax_exempt": false},
            "notes": "Gate code 4411",
            "logo_url": "https://cdn.example/logo.png",
            "jobs_count": 7
        }))
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_scalars() {
        let api = api_client();
        let payload = transform_client_for_api(&transform_client_from_api(api.clone()));

        assert_eq!(Some(payload.name.clone()), api.name);
        assert_eq!(payload.company_name, api.company_name);
        assert_eq!(payload.email, api.email);
        assert_eq!(payload.phone, api.phone);
        assert_eq!(payload.mobile, api.mobile);
        assert_eq!(payload.website, api.website);
        assert_eq!(Some(payload.status.clone()), api.status);
        assert_eq!(payload.notes, api.notes);
        assert_eq!(payload.address, api.address);
        assert_eq!(payload.payment, api.payment);
    }

    #[test]
    fn test_from_api_flattens_nested_objects() {
        let client = transform_client_from_api(api_client());
        assert_eq!(client.city, "Portland");
        assert_eq!(client.payment_terms, "net_30");
        assert_eq!(client.tax_rate, Some(8.25));
        assert_eq!(client.status, ClientStatus::Lead);
        assert_eq!(client.jobs_count, 7);
    }

    #[test]
    fn test_from_api_tolerates_missing_nested_objects() {
        let api: ClientApi = serde_json::from_value(json!({"id": 1, "name": "Solo"})).unwrap();
        let client = transform_client_from_api(api);
        assert_eq!(client.street, "");
        assert_eq!(client.status, ClientStatus::Active);
        assert!(!client.tax_exempt);
    }

    #[test]
    fn test_empty_nested_objects_are_pruned() {
        let client = Client {
            name: " Walk-in ".into(),
            city: "   ".into(),
            logo_temp_id: Some("tmp_123".into()),
            ..Client::default()
        };
        let body = serde_json::to_value(transform_client_for_api(&client)).unwrap();

        assert_eq!(body["name"], "Walk-in");
        assert!(body.get("address").is_none());
        assert!(body.get("payment").is_none());
        assert!(body.get("tax").is_none());
        assert!(body.get("email").is_none());
        assert_eq!(body["logo_temp_id"], "tmp_123");
    }

    #[test]
    fn test_partial_nested_object_keeps_only_set_fields() {
        let client = Client { name: "A".into(), city: "Austin".into(), tax_exempt: true, ..Client::default() };
        let body = serde_json::to_value(transform_client_for_api(&client)).unwrap();
        assert_eq!(body["address"], json!({"city": "Austin"}));
        assert_eq!(body["tax"], json!({"tax_exempt": true}));
    }
}
