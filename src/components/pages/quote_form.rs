//! Quote Form Page
//!
//! Line items recalculate the totals as they are typed. An accepted quote
//! can be turned into a job from here.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::form_field::{bind_text, format_date, format_money, parse_date, parse_id, parse_number, FormErrors};
use crate::components::{ErrorDialog, FormField, NavLink, TextField};
use crate::context::use_app_context;
use crate::controllers::use_resource;
use crate::models::{Quote, QuoteStatus};
use crate::route::{use_navigator, Route};
use crate::services::{clients::client_options, quotes::convert_to_job, ClientService};

#[component]
pub fn QuoteFormPage(#[prop(optional)] id: Option<u64>) -> impl IntoView {
    let ctx = use_app_context();
    let navigator = use_navigator();
    let quotes = use_resource::<Quote>();

    let draft = RwSignal::new(Quote::default());
    let errors = FormErrors::new();
    let (saving, set_saving) = signal(false);
    let (converting, set_converting) = signal(false);
    let customers = RwSignal::new(Vec::<(u64, String)>::new());
    let loading = quotes.detail_loading();

    let service = ClientService::new(ctx.api());
    spawn_local(async move {
        match client_options(&service, "").await {
            Ok(options) => {
                customers.try_set(options);
            }
            Err(e) => tracing::warn!("[QUOTES] customer options failed: {}", e),
        }
    });

    match id {
        Some(id) => spawn_local(async move {
            if let Ok(quote) = quotes.load_one(id).await {
                draft.try_set(quote);
            }
        }),
        None => draft.update(|q| {
            q.issue_date = Some(chrono::Local::now().date_naive());
            q.add_line();
        }),
    }

    let editable = Signal::derive(move || draft.with(Quote::is_editable));

    let submit = move || {
        if saving.get_untracked() {
            return;
        }
        let mut record = draft.get_untracked();
        record.recalculate();
        if !errors.check(record.validate()) {
            return;
        }
        errors.clear_server();
        set_saving.set(true);
        spawn_local(async move {
            let result = match id {
                Some(id) => quotes.update(id, record).await,
                None => quotes.create(record).await,
            };
            set_saving.try_set(false);
            match result {
                Ok(_) => navigator.navigate(Route::Quotes),
                Err(e) => errors.set_server(e),
            }
        });
    };

    let convert = move |_| {
        let Some(quote_id) = id else {
            return;
        };
        set_converting.set(true);
        let api = ctx.api();
        let toasts = ctx.toasts;
        spawn_local(async move {
            match convert_to_job(&api, quote_id).await {
                Ok(job) => {
                    toasts.success(format!("Job {} created", job.job_number));
                    navigator.navigate(Route::JobDetail(job.id));
                }
                Err(e) => {
                    toasts.error(e.message.clone());
                    errors.set_server(e);
                }
            }
            set_converting.try_set(false);
        });
    };
    let can_convert = move || id.is_some() && draft.with(|q| q.status == QuoteStatus::Accepted && q.job_id.is_none());

    let (title, set_title) = bind_text(draft, |q| q.title.clone(), |q, v| q.title = v);
    let line_count = move || draft.with(|q| q.line_items.len());
    let line_error = errors.field("line_items");

    view! {
        <section class="form-page">
            <header class="page-header">
                <h1>
                    {move || match id {
                        Some(_) => format!("Quote {}", draft.with(|q| q.quote_number.clone())),
                        None => "New quote".to_string(),
                    }}
                </h1>
                <div class="header-actions">
                    {move || draft.with(|q| q.job_id).map(|job_id| view! {
                        <NavLink route=Route::JobDetail(job_id) class="btn btn-secondary">"View job"</NavLink>
                    })}
                    <Show when=can_convert>
                        <button type="button" class="btn btn-primary" disabled=move || converting.get() on:click=convert>
                            {move || if converting.get() { "Converting…" } else { "Convert to job" }}
                        </button>
                    </Show>
                    <NavLink route=Route::Quotes class="btn btn-link">"Back to quotes"</NavLink>
                </div>
            </header>

            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading…"</p> }>
                <form
                    class="record-form"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        submit();
                    }
                >
                    <fieldset prop:disabled=move || !editable.get()>
                        <TextField label="Title" value=title on_input=set_title error=errors.field("title") required=true />
                        <FormField label="Customer" error=errors.field("client_id") required=true>
                            <select
                                prop:value=move || draft.with(|q| q.client_id.map(|c| c.to_string()).unwrap_or_default())
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    let name = customers.with(|cs| {
                                        cs.iter()
                                            .find(|(cid, _)| Some(*cid) == parse_id(&value))
                                            .map(|(_, n)| n.clone())
                                    });
                                    draft.update(|q| {
                                        q.client_id = parse_id(&value);
                                        q.client_name = name.unwrap_or_default();
                                    });
                                }
                            >
                                <option value="">"Select a customer"</option>
                                {move || customers
                                    .get()
                                    .into_iter()
                                    .map(|(cid, name)| view! { <option value=cid.to_string()>{name}</option> })
                                    .collect_view()}
                            </select>
                        </FormField>
                        <FormField label="Status">
                            <select
                                prop:value=move || draft.with(|q| q.status.as_str())
                                on:change=move |ev| draft.update(|q| q.status = QuoteStatus::from_str(&event_target_value(&ev)))
                            >
                                {QuoteStatus::ALL
                                    .into_iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </select>
                        </FormField>
                        <FormField label="Issue date" error=errors.field("issue_date")>
                            <input
                                type="date"
                                prop:value=move || draft.with(|q| format_date(q.issue_date))
                                on:change=move |ev| draft.update(|q| q.issue_date = parse_date(&event_target_value(&ev)))
                            />
                        </FormField>
                        <FormField label="Valid until" error=errors.field("valid_until")>
                            <input
                                type="date"
                                prop:value=move || draft.with(|q| format_date(q.valid_until))
                                on:change=move |ev| draft.update(|q| q.valid_until = parse_date(&event_target_value(&ev)))
                            />
                        </FormField>

                        <table class="line-items">
                            <thead>
                                <tr>
                                    <th>"Description"</th>
                                    <th class="numeric">"Qty"</th>
                                    <th class="numeric">"Unit price"</th>
                                    <th class="numeric">"Amount"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || 0..line_count()
                                    key=|index| *index
                                    children=move |index| {
                                        let line = move |f: fn(&crate::models::LineItem) -> String| {
                                            draft.with(|q| q.line_items.get(index).map(f).unwrap_or_default())
                                        };
                                        view! {
                                            <tr>
                                                <td>
                                                    <input
                                                        type="text"
                                                        prop:value=move || line(|l| l.description.clone())
                                                        on:input=move |ev| draft.update(|q| {
                                                            if let Some(l) = q.line_items.get_mut(index) {
                                                                l.description = event_target_value(&ev);
                                                            }
                                                        })
                                                    />
                                                </td>
                                                <td class="numeric">
                                                    <input
                                                        type="number"
                                                        step="any"
                                                        min="0"
                                                        prop:value=move || line(|l| l.quantity.to_string())
                                                        on:input=move |ev| draft.update(|q| {
                                                            if let Some(l) = q.line_items.get_mut(index) {
                                                                l.quantity = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                                                            }
                                                            q.recalculate();
                                                        })
                                                    />
                                                </td>
                                                <td class="numeric">
                                                    <input
                                                        type="number"
                                                        step="0.01"
                                                        min="0"
                                                        prop:value=move || line(|l| l.unit_price.to_string())
                                                        on:input=move |ev| draft.update(|q| {
                                                            if let Some(l) = q.line_items.get_mut(index) {
                                                                l.unit_price = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                                                            }
                                                            q.recalculate();
                                                        })
                                                    />
                                                </td>
                                                <td class="numeric">{move || line(|l| format_money(l.amount()))}</td>
                                                <td>
                                                    <button
                                                        type="button"
                                                        class="btn-icon danger"
                                                        title="Remove line"
                                                        on:click=move |_| draft.update(|q| q.remove_line(index))
                                                    >
                                                        "×"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                        {move || line_error.get().map(|e| view! { <p class="field-error">{e}</p> })}
                        <button type="button" class="btn btn-secondary" on:click=move |_| draft.update(|q| q.add_line())>
                            "Add line"
                        </button>

                        <div class="quote-totals">
                            <FormField label="Tax rate (%)" error=errors.field("tax_rate")>
                                <input
                                    type="number"
                                    step="0.01"
                                    min="0"
                                    prop:value=move || draft.with(|q| q.tax_rate.to_string())
                                    on:input=move |ev| draft.update(|q| {
                                        q.tax_rate = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                                        q.recalculate();
                                    })
                                />
                            </FormField>
                            <dl>
                                <dt>"Subtotal"</dt>
                                <dd>{move || draft.with(|q| format_money(q.subtotal))}</dd>
                                <dt>"Tax"</dt>
                                <dd>{move || draft.with(|q| format_money(q.tax_amount))}</dd>
                                <dt>"Total"</dt>
                                <dd class="grand-total">{move || draft.with(|q| format_money(q.total))}</dd>
                            </dl>
                        </div>

                        <FormField label="Notes">
                            <textarea
                                rows="3"
                                prop:value=move || draft.with(|q| q.notes.clone())
                                on:input=move |ev| draft.update(|q| q.notes = event_target_value(&ev))
                            ></textarea>
                        </FormField>
                    </fieldset>

                    <div class="form-actions">
                        <NavLink route=Route::Quotes class="btn btn-secondary">"Cancel"</NavLink>
                        <Show when=move || editable.get()>
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() { "Saving…" } else { "Save quote" }}
                            </button>
                        </Show>
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
