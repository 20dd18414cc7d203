//! Customer Form Page
//!
//! Create and edit. The logo goes up as a temp file while the form is open
//! and is attached by sending its `temp_id` with the save.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::form_field::{bind_text, parse_number, FormErrors};
use crate::components::{ErrorDialog, FileUploader, FormField, NavLink, TextField};
use crate::context::use_app_context;
use crate::controllers::{use_resource, use_upload};
use crate::models::{Client, ClientStatus};
use crate::route::{use_navigator, Route};

#[component]
pub fn CustomerFormPage(#[prop(optional)] id: Option<u64>) -> impl IntoView {
    let ctx = use_app_context();
    let navigator = use_navigator();
    let clients = use_resource::<Client>();
    let logo = use_upload(ctx.config().logo_upload);

    let draft = RwSignal::new(Client::default());
    let errors = FormErrors::new();
    let (saving, set_saving) = signal(false);
    let loading = clients.detail_loading();

    if let Some(id) = id {
        spawn_local(async move {
            if let Ok(client) = clients.load_one(id).await {
                draft.try_set(client);
            }
        });
    }

    let submit = move || {
        if saving.get_untracked() || logo.slot().with_untracked(|s| s.is_uploading()) {
            return;
        }
        let mut record = draft.get_untracked();
        if !errors.check(record.validate()) {
            return;
        }
        record.logo_temp_id = logo.temp_id();
        errors.clear_server();
        set_saving.set(true);
        spawn_local(async move {
            let result = match id {
                Some(id) => clients.update(id, record).await,
                None => clients.create(record).await,
            };
            set_saving.try_set(false);
            match result {
                Ok(_) => {
                    logo.commit();
                    navigator.navigate(Route::Customers);
                }
                Err(e) => errors.set_server(e),
            }
        });
    };

    let (name, set_name) = bind_text(draft, |c| c.name.clone(), |c, v| c.name = v);
    let (company, set_company) = bind_text(draft, |c| c.company_name.clone(), |c, v| c.company_name = v);
    let (email, set_email) = bind_text(draft, |c| c.email.clone(), |c, v| c.email = v);
    let (phone, set_phone) = bind_text(draft, |c| c.phone.clone(), |c, v| c.phone = v);
    let (mobile, set_mobile) = bind_text(draft, |c| c.mobile.clone(), |c, v| c.mobile = v);
    let (website, set_website) = bind_text(draft, |c| c.website.clone(), |c, v| c.website = v);
    let (street, set_street) = bind_text(draft, |c| c.street.clone(), |c, v| c.street = v);
    let (city, set_city) = bind_text(draft, |c| c.city.clone(), |c, v| c.city = v);
    let (state, set_state) = bind_text(draft, |c| c.state.clone(), |c, v| c.state = v);
    let (postal, set_postal) = bind_text(draft, |c| c.postal_code.clone(), |c, v| c.postal_code = v);
    let (country, set_country) = bind_text(draft, |c| c.country.clone(), |c, v| c.country = v);
    let (terms, set_terms) = bind_text(draft, |c| c.payment_terms.clone(), |c, v| c.payment_terms = v);
    let (method, set_method) = bind_text(draft, |c| c.payment_method.clone(), |c, v| c.payment_method = v);
    let (currency, set_currency) = bind_text(draft, |c| c.currency.clone(), |c, v| c.currency = v);
    let (tax_number, set_tax_number) = bind_text(draft, |c| c.tax_number.clone(), |c, v| c.tax_number = v);

    let existing_logo = Signal::derive(move || draft.with(|c| c.logo_url.clone()));
    let title = if id.is_some() { "Edit customer" } else { "New customer" };

    view! {
        <section class="form-page">
            <header class="page-header">
                <h1>{title}</h1>
                <NavLink route=Route::Customers class="btn btn-link">"Back to customers"</NavLink>
            </header>

            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading…"</p> }>
                <form
                    class="record-form"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        submit();
                    }
                >
                    <fieldset>
                        <legend>"Contact"</legend>
                        <TextField label="Name" value=name on_input=set_name error=errors.field("name") required=true />
                        <TextField label="Company" value=company on_input=set_company error=errors.field("company_name") />
                        <TextField label="Email" value=email on_input=set_email error=errors.field("email") input_type="email" />
                        <TextField label="Phone" value=phone on_input=set_phone error=errors.field("phone") input_type="tel" />
                        <TextField label="Mobile" value=mobile on_input=set_mobile error=errors.field("mobile") input_type="tel" />
                        <TextField label="Website" value=website on_input=set_website error=errors.field("website") input_type="url" />
                        <FormField label="Status" error=errors.field("status")>
                            <select
                                prop:value=move || draft.with(|c| c.status.as_str())
                                on:change=move |ev| draft.update(|c| c.status = ClientStatus::from_str(&event_target_value(&ev)))
                            >
                                {ClientStatus::ALL
                                    .into_iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </select>
                        </FormField>
                        <FileUploader
                            controller=logo
                            label="Logo"
                            existing_url=existing_logo
                            hint="PNG, JPEG, WebP or SVG up to 2 MB"
                        />
                    </fieldset>

                    <fieldset>
                        <legend>"Address"</legend>
                        <TextField label="Street" value=street on_input=set_street error=errors.field("address.street") />
                        <TextField label="City" value=city on_input=set_city error=errors.field("address.city") />
                        <TextField label="State" value=state on_input=set_state error=errors.field("address.state") />
                        <TextField label="Postal code" value=postal on_input=set_postal error=errors.field("address.postal_code") />
                        <TextField label="Country" value=country on_input=set_country error=errors.field("address.country") />
                    </fieldset>

                    <fieldset>
                        <legend>"Billing"</legend>
                        <TextField label="Payment terms" value=terms on_input=set_terms />
                        <TextField label="Payment method" value=method on_input=set_method />
                        <TextField label="Currency" value=currency on_input=set_currency />
                        <TextField label="Tax number" value=tax_number on_input=set_tax_number error=errors.field("tax.tax_number") />
                        <FormField label="Tax rate (%)" error=errors.field("tax_rate")>
                            <input
                                type="number"
                                step="0.01"
                                min="0"
                                max="100"
                                prop:value=move || draft.with(|c| c.tax_rate.map(|r| r.to_string()).unwrap_or_default())
                                on:input=move |ev| draft.update(|c| c.tax_rate = parse_number(&event_target_value(&ev)))
                            />
                        </FormField>
                        <label class="checkbox">
                            <input
                                type="checkbox"
                                prop:checked=move || draft.with(|c| c.tax_exempt)
                                on:change=move |ev| draft.update(|c| c.tax_exempt = event_target_checked(&ev))
                            />
                            "Tax exempt"
                        </label>
                    </fieldset>

                    <FormField label="Notes">
                        <textarea
                            rows="4"
                            prop:value=move || draft.with(|c| c.notes.clone())
                            on:input=move |ev| draft.update(|c| c.notes = event_target_value(&ev))
                        ></textarea>
                    </FormField>

                    <div class="form-actions">
                        <NavLink route=Route::Customers class="btn btn-secondary">"Cancel"</NavLink>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving…" } else { "Save customer" }}
                        </button>
                    </div>
                </form>
            </Show>

            <ErrorDialog
                error=errors.server()
                on_close=move |_| errors.clear_server()
                on_retry=Callback::new(move |_| submit())
            />
        </section>
    }
}
