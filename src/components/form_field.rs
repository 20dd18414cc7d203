//! Form Building Blocks
//!
//! Labelled inputs plus the error state a form page keeps: local
//! validation messages and the last failed save.

use chrono::NaiveDate;
use leptos::prelude::*;
use rest_resource::ApiError;

use crate::models::FieldErrors;

/// Per-form error state. Local messages win over server ones for the same
/// field.
#[derive(Clone, Copy)]
pub struct FormErrors {
    local: RwSignal<FieldErrors>,
    server: RwSignal<Option<ApiError>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self {
            local: RwSignal::new(FieldErrors::new()),
            server: RwSignal::new(None),
        }
    }

    pub fn field(&self, name: &'static str) -> Signal<Option<String>> {
        let local = self.local;
        let server = self.server;
        Signal::derive(move || {
            local
                .with(|l| l.get(name).cloned())
                .or_else(|| server.with(|s| s.as_ref().and_then(|e| e.field_error(name))))
        })
    }

    pub fn server(&self) -> Signal<Option<ApiError>> {
        self.server.into()
    }

    /// Store local messages; `true` when there are none.
    pub fn check(&self, errors: FieldErrors) -> bool {
        let ok = errors.is_empty();
        self.local.set(errors);
        ok
    }

    pub fn set_server(&self, error: ApiError) {
        self.server.try_set(Some(error));
    }

    pub fn clear_server(&self) {
        self.server.set(None);
    }
}

impl Default for FormErrors {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty or unparsable input reads as `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Accepts `"12.5"`, `"12,5"` and `" 12 "`.
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim().replace(',', ".");
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_id(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Getter and setter for one string field of a draft held in a signal.
pub fn bind_text<T: Send + Sync + 'static>(
    draft: RwSignal<T>,
    get: fn(&T) -> String,
    set: fn(&mut T, String),
) -> (Signal<String>, Callback<String>) {
    (
        Signal::derive(move || draft.with(get)),
        Callback::new(move |value: String| draft.update(|d| set(d, value))),
    )
}

/// Label, control and inline error
#[component]
pub fn FormField(
    label: &'static str,
    #[prop(optional, into)] error: Signal<Option<String>>,
    #[prop(optional)] required: bool,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="form-field" class:has-error=move || error.with(Option::is_some)>
            <label>
                <span class="field-label">
                    {label}
                    {required.then(|| view! { <span class="required">" *"</span> })}
                </span>
                {children()}
            </label>
            {move || error.get().map(|e| view! { <p class="field-error">{e}</p> })}
        </div>
    }
}

/// Single-line text input bound to a string getter and setter
#[component]
pub fn TextField(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(optional, into)] error: Signal<Option<String>>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <FormField label=label error=error required=required>
            <input
                type=input_type
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </FormField>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_dates_and_ids() {
        let date = parse_date("2026-03-01");
        assert_eq!(format_date(date), "2026-03-01");
        assert_eq!(parse_date("03/01/2026"), None);
        assert_eq!(format_date(None), "");
        assert_eq!(parse_id("7"), Some(7));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id(""), None);
    }
}
