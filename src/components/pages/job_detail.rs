//! Job Detail Page
//!
//! Summary, status, and the job's tasks, attachments and instructions.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::form_field::{format_date, parse_date};
use crate::components::{DeleteConfirmButton, NavLink, PageError, StatusBadge};
use crate::controllers::upload::picked_file;
use crate::controllers::{use_job_detail, JobDetailController};
use crate::markdown::{render_markdown, render_markdown_inline};
use crate::models::{InstructionDraft, JobStatus, TaskDraft};
use crate::route::Route;

#[component]
pub fn JobDetailPage(id: u64) -> impl IntoView {
    let controller = use_job_detail();
    let job = controller.job();
    let jobs = controller.jobs();
    let loading = jobs.detail_loading();

    spawn_local(async move { controller.load(id).await });

    let field = move |f: fn(&crate::models::Job) -> String| move || job.with(|j| j.as_ref().map(f).unwrap_or_default());

    view! {
        <section class="detail-page">
            <header class="page-header">
                <div>
                    <h1>{field(|j| j.title.clone())}</h1>
                    <p class="page-sub">{field(|j| j.job_number.clone())}</p>
                </div>
                <div class="header-actions">
                    <select
                        prop:value=move || job.with(|j| j.as_ref().map(|j| j.status.as_str()).unwrap_or_default())
                        on:change=move |ev| {
                            let status = JobStatus::from_str(&event_target_value(&ev));
                            spawn_local(async move { controller.change_status(status).await });
                        }
                    >
                        {JobStatus::ALL
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                            .collect_view()}
                    </select>
                    <NavLink route=Route::Jobs class="btn btn-link">"Back to jobs"</NavLink>
                </div>
            </header>

            <PageError error=jobs.error() on_dismiss=move |_| jobs.clear_error() />

            <Show
                when=move || job.with(Option::is_some)
                fallback=move || view! {
                    <p class="loading">{move || if loading.get() { "Loading…" } else { "Job not available" }}</p>
                }
            >
                <div class="detail-grid">
                    <dl class="job-summary">
                        <dt>"Status"</dt>
                        <dd>
                            {move || job.with(|j| j.as_ref().map(|j| view! {
                                <StatusBadge status=j.status.as_str() label=j.status.label() />
                            }))}
                        </dd>
                        <dt>"Priority"</dt>
                        <dd>{field(|j| j.priority.label().to_string())}</dd>
                        <dt>"Customer"</dt>
                        <dd>
                            {move || job.with(|j| j.as_ref().and_then(|j| j.client_id.map(|cid| (cid, j.client_name.clone()))))
                                .map(|(cid, name)| view! { <NavLink route=Route::CustomerEdit(cid)>{name}</NavLink> })}
                        </dd>
                        <dt>"Location"</dt>
                        <dd>{field(|j| j.location.clone())}</dd>
                        <dt>"Scheduled"</dt>
                        <dd>{field(|j| format_date(j.scheduled_date))}</dd>
                        <dt>"Due"</dt>
                        <dd>{field(|j| format_date(j.due_date))}</dd>
                        <dt>"Assigned"</dt>
                        <dd>{field(|j| j.assigned_employee_names.join(", "))}</dd>
                        <dt>"Quote"</dt>
                        <dd>
                            {move || job.with(|j| j.as_ref().and_then(|j| j.quote_id))
                                .map(|qid| view! { <NavLink route=Route::QuoteEdit(qid)>"View quote"</NavLink> })}
                        </dd>
                    </dl>
                    <div class="job-description">
                        <h2>"Description"</h2>
                        <p>{field(|j| j.description.clone())}</p>
                        <h2>"Notes"</h2>
                        <p>{field(|j| j.notes.clone())}</p>
                    </div>
                </div>

                <TasksPanel controller=controller />
                <AttachmentsPanel controller=controller />
                <InstructionsPanel controller=controller />
            </Show>
        </section>
    }
}

#[component]
fn TasksPanel(controller: JobDetailController) -> impl IntoView {
    let job = controller.job();
    let tasks = move || job.with(|j| j.as_ref().map(|j| j.tasks.clone()).unwrap_or_default());
    let progress = move || job.with(|j| j.as_ref().map(|j| (j.completed_tasks(), j.tasks.len(), j.progress())));

    let draft = RwSignal::new(TaskDraft::default());
    let (adding, set_adding) = signal(false);

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if adding.get_untracked() {
            return;
        }
        set_adding.set(true);
        let task = draft.get_untracked();
        spawn_local(async move {
            if controller.add_task(task).await {
                draft.try_set(TaskDraft::default());
            }
            set_adding.try_set(false);
        });
    };

    view! {
        <section class="panel tasks-panel">
            <header class="panel-header">
                <h2>"Tasks"</h2>
                {move || progress().map(|(done, total, percent)| view! {
                    <span class="task-progress">
                        {format!("{}/{} done", done, total)}
                        <progress max="100" value=percent></progress>
                    </span>
                })}
            </header>
            <ul class="task-list">
                <For
                    each=tasks
                    key=|t| (t.id, t.completed, t.name.clone())
                    children=move |task| {
                        let id = task.id;
                        let toggled = task.clone();
                        view! {
                            <li class:completed=task.completed>
                                <label>
                                    <input
                                        type="checkbox"
                                        prop:checked=task.completed
                                        disabled=move || controller.is_task_busy(id)
                                        on:change=move |_| {
                                            let task = toggled.clone();
                                            spawn_local(async move { controller.toggle_task(task).await });
                                        }
                                    />
                                    <span class="task-name">{task.name.clone()}</span>
                                </label>
                                {task.due_date.map(|d| view! { <span class="task-due">{d.to_string()}</span> })}
                                {task.description.clone().map(|d| view! { <p class="task-description" inner_html=render_markdown_inline(&d)></p> })}
                                <DeleteConfirmButton
                                    button_class="btn-icon danger"
                                    what="task"
                                    disabled=Signal::derive(move || controller.is_task_busy(id))
                                    on_confirm=move |_| {
                                        spawn_local(async move { controller.delete_task(id).await });
                                    }
                                />
                            </li>
                        }
                    }
                />
            </ul>
            <form class="inline-form" on:submit=on_add>
                <input
                    type="text"
                    placeholder="New task"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                />
                <input
                    type="date"
                    prop:value=move || draft.with(|d| format_date(d.due_date))
                    on:change=move |ev| draft.update(|d| d.due_date = parse_date(&event_target_value(&ev)))
                />
                <button
                    type="submit"
                    class="btn btn-secondary"
                    disabled=move || adding.get() || draft.with(|d| d.name.trim().is_empty())
                >
                    "Add task"
                </button>
            </form>
        </section>
    }
}

#[component]
fn AttachmentsPanel(controller: JobDetailController) -> impl IntoView {
    let job = controller.job();
    let attachments = move || job.with(|j| j.as_ref().map(|j| j.attachments.clone()).unwrap_or_default());
    let uploading = controller.uploading();

    view! {
        <section class="panel attachments-panel">
            <header class="panel-header">
                <h2>"Attachments"</h2>
                <label class="btn btn-secondary" class:disabled=move || uploading.get()>
                    {move || if uploading.get() { "Uploading…" } else { "Upload file" }}
                    <input
                        type="file"
                        class="visually-hidden"
                        accept=controller.attachment_accept()
                        disabled=move || uploading.get()
                        on:change=move |ev| {
                            if let Some(file) = picked_file(&ev) {
                                spawn_local(async move { controller.upload_attachment(file).await });
                            }
                        }
                    />
                </label>
            </header>
            <ul class="attachment-list">
                <For
                    each=attachments
                    key=|a| a.id
                    children=move |attachment| {
                        let id = attachment.id;
                        view! {
                            <li>
                                {attachment.is_image().then(|| view! {
                                    <img class="attachment-thumb" src=attachment.url.clone() alt="" loading="lazy" />
                                })}
                                <a href=attachment.url.clone() target="_blank" rel="noopener">{attachment.file_name.clone()}</a>
                                <span class="attachment-size">{attachment.formatted_size.clone()}</span>
                                <DeleteConfirmButton
                                    button_class="btn-icon danger"
                                    what="file"
                                    on_confirm=move |_| {
                                        spawn_local(async move { controller.delete_attachment(id).await });
                                    }
                                />
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}

#[component]
fn InstructionsPanel(controller: JobDetailController) -> impl IntoView {
    let job = controller.job();
    let instructions = move || job.with(|j| j.as_ref().map(|j| j.instructions.clone()).unwrap_or_default());

    let draft = RwSignal::new(InstructionDraft::default());
    let (preview, set_preview) = signal(false);
    let (adding, set_adding) = signal(false);

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if adding.get_untracked() {
            return;
        }
        set_adding.set(true);
        let instruction = draft.get_untracked();
        spawn_local(async move {
            if controller.add_instruction(instruction).await {
                draft.try_set(InstructionDraft::default());
                set_preview.try_set(false);
            }
            set_adding.try_set(false);
        });
    };

    view! {
        <section class="panel instructions-panel">
            <header class="panel-header">
                <h2>"Instructions"</h2>
            </header>
            <For
                each=instructions
                key=|i| i.id
                children=move |instruction| {
                    let id = instruction.id;
                    view! {
                        <article class="instruction">
                            <header>
                                <h3>{instruction.title.clone()}</h3>
                                {instruction.created_at.clone().map(|at| view! { <time>{at}</time> })}
                                <DeleteConfirmButton
                                    button_class="btn-icon danger"
                                    what="instruction"
                                    on_confirm=move |_| {
                                        spawn_local(async move { controller.delete_instruction(id).await });
                                    }
                                />
                            </header>
                            <div class="markdown" inner_html=render_markdown(&instruction.content)></div>
                        </article>
                    }
                }
            />
            <form class="instruction-form" on:submit=on_add>
                <input
                    type="text"
                    placeholder="Title"
                    prop:value=move || draft.with(|d| d.title.clone())
                    on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                />
                <div class="editor-tabs">
                    <button type="button" class:active=move || !preview.get() on:click=move |_| set_preview.set(false)>
                        "Write"
                    </button>
                    <button type="button" class:active=move || preview.get() on:click=move |_| set_preview.set(true)>
                        "Preview"
                    </button>
                </div>
                <Show
                    when=move || preview.get()
                    fallback=move || view! {
                        <textarea
                            rows="5"
                            placeholder="Markdown supported. Use %r%text%r% for red, %g% green, %b% blue, %o% orange."
                            prop:value=move || draft.with(|d| d.content.clone())
                            on:input=move |ev| draft.update(|d| d.content = event_target_value(&ev))
                        ></textarea>
                    }
                >
                    <div class="markdown preview" inner_html=move || draft.with(|d| render_markdown(&d.content))></div>
                </Show>
                <button type="submit" class="btn btn-secondary" disabled=move || adding.get()>
                    "Add instruction"
                </button>
            </form>
        </section>
    }
}
