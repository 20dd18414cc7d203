//! Employee Form Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::RequestGeneration;

use crate::components::form_field::{bind_text, format_date, parse_date, parse_id, FormErrors};
use crate::components::{ErrorDialog, FormField, NavLink, TextField};
use crate::context::use_app_context;
use crate::controllers::use_resource;
use crate::models::{Employee, EmployeeRole, ManagerOption};
use crate::route::{use_navigator, Route};
use crate::services::employees::get_managers;

#[component]
pub fn EmployeeFormPage(#[prop(optional)] id: Option<u64>) -> impl IntoView {
    let ctx = use_app_context();
    let navigator = use_navigator();
    let employees = use_resource::<Employee>();

    let draft = RwSignal::new(Employee {
        is_active: true,
        ..Employee::default()
    });
    let errors = FormErrors::new();
    let (saving, set_saving) = signal(false);
    let loading = employees.detail_loading();

    let managers = RwSignal::new(Vec::<ManagerOption>::new());
    let (managers_failed, set_managers_failed) = signal(false);
    let manager_requests = StoredValue::new(RequestGeneration::default());

    // Only the latest lookup may fill the picker.
    let load_managers = move || {
        let Some(generation) = manager_requests.try_update_value(|g| g.issue()) else {
            return;
        };
        set_managers_failed.set(false);
        let api = ctx.api();
        spawn_local(async move {
            let result = get_managers(&api, id).await;
            let current = manager_requests
                .try_with_value(|g| g.is_current(generation))
                .unwrap_or(false);
            if !current {
                return;
            }
            match result {
                Ok(options) => {
                    managers.try_set(options);
                }
                Err(e) => {
                    tracing::warn!("[EMPLOYEES] manager lookup failed: {}", e);
                    set_managers_failed.try_set(true);
                }
            }
        });
    };
    load_managers();
    on_cleanup(move || {
        manager_requests.try_update_value(|g| g.invalidate());
    });

    if let Some(id) = id {
        spawn_local(async move {
            if let Ok(employee) = employees.load_one(id).await {
                draft.try_set(employee);
            }
        });
    }

    let submit = move || {
        if saving.get_untracked() {
            return;
        }
        let record = draft.get_untracked();
        if !errors.check(record.validate()) {
            return;
        }
        errors.clear_server();
        set_saving.set(true);
        spawn_local(async move {
            let result = match id {
                Some(id) => employees.update(id, record).await,
                None => employees.create(record).await,
            };
            set_saving.try_set(false);
            match result {
                Ok(_) => navigator.navigate(Route::Employees),
                Err(e) => errors.set_server(e),
            }
        });
    };

    let (first_name, set_first_name) = bind_text(draft, |e| e.first_name.clone(), |e, v| e.first_name = v);
    let (last_name, set_last_name) = bind_text(draft, |e| e.last_name.clone(), |e, v| e.last_name = v);
    let (email, set_email) = bind_text(draft, |e| e.email.clone(), |e, v| e.email = v);
    let (phone, set_phone) = bind_text(draft, |e| e.phone.clone(), |e, v| e.phone = v);
    let (position, set_position) = bind_text(draft, |e| e.position.clone(), |e, v| e.position = v);
    let (department, set_department) = bind_text(draft, |e| e.department.clone(), |e, v| e.department = v);

    let title = if id.is_some() { "Edit employee" } else { "New employee" };

    view! {
        <section class="form-page">
            <header class="page-header">
                <h1>{title}</h1>
                <NavLink route=Route::Employees class="btn btn-link">"Back to employees"</NavLink>
            </header>

            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading…"</p> }>
                <form
                    class="record-form"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        submit();
                    }
                >
                    <TextField label="First name" value=first_name on_input=set_first_name error=errors.field("first_name") required=true />
                    <TextField label="Last name" value=last_name on_input=set_last_name error=errors.field("last_name") required=true />
                    <TextField label="Email" value=email on_input=set_email error=errors.field("email") input_type="email" required=true />
                    <TextField label="Phone" value=phone on_input=set_phone error=errors.field("phone") input_type="tel" />
                    <FormField label="Role" error=errors.field("role")>
                        <select
                            prop:value=move || draft.with(|e| e.role.as_str())
                            on:change=move |ev| draft.update(|e| e.role = EmployeeRole::from_str(&event_target_value(&ev)))
                        >
                            {EmployeeRole::ALL
                                .into_iter()
                                .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                                .collect_view()}
                        </select>
                    </FormField>
                    <TextField label="Position" value=position on_input=set_position />
                    <TextField label="Department" value=department on_input=set_department />
                    <FormField label="Manager" error=errors.field("manager_id")>
                        <select
                            prop:value=move || draft.with(|e| e.manager_id.map(|m| m.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                let manager_id = parse_id(&event_target_value(&ev));
                                let name = managers.with(|ms| {
                                    ms.iter().find(|m| Some(m.id) == manager_id).map(|m| m.name.clone())
                                });
                                draft.update(|e| {
                                    e.manager_id = manager_id;
                                    e.manager_name = name.unwrap_or_default();
                                });
                            }
                        >
                            <option value="">"No manager"</option>
                            {move || managers
                                .get()
                                .into_iter()
                                .map(|m| view! { <option value=m.id.to_string()>{m.name}</option> })
                                .collect_view()}
                        </select>
                        <Show when=move || managers_failed.get()>
                            <button type="button" class="btn btn-link" on:click=move |_| load_managers()>
                                "Couldn't load managers. Retry"
                            </button>
                        </Show>
                    </FormField>
                    <FormField label="Hire date" error=errors.field("hire_date")>
                        <input
                            type="date"
                            prop:value=move || draft.with(|e| format_date(e.hire_date))
                            on:change=move |ev| draft.update(|e| e.hire_date = parse_date(&event_target_value(&ev)))
                        />
                    </FormField>
                    <label class="checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || draft.with(|e| e.is_active)
                            on:change=move |ev| draft.update(|e| e.is_active = event_target_checked(&ev))
                        />
                        "Active"
                    </label>

                    <div class="form-actions">
                        <NavLink route=Route::Employees class="btn btn-secondary">"Cancel"</NavLink>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving…" } else { "Save employee" }}
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
