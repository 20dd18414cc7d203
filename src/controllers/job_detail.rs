//! Job Detail Controller
//!
//! Tasks, attachments, instructions and status on a loaded job. Every edit
//! goes to the server first; the returned item is then patched into the
//! job held by the jobs controller, so order and unrelated items stay put.

use std::collections::BTreeSet;

use leptos::prelude::*;
use rest_resource::{validate_file, ApiError, UploadRules};

use crate::context::use_app_context;
use crate::controllers::upload::{file_meta, read_file_bytes};
use crate::controllers::{use_resource, ResourceController, Toasts};
use crate::models::{InstructionDraft, Job, JobStatus, Task, TaskDraft};
use crate::services::{jobs, Api};

#[derive(Clone, Copy)]
pub struct JobDetailController {
    jobs: ResourceController<Job>,
    api: StoredValue<Api, LocalStorage>,
    toasts: Toasts,
    attachment_rules: StoredValue<UploadRules>,
    /// Tasks with a toggle/delete in flight
    busy_tasks: RwSignal<BTreeSet<u64>>,
    uploading: RwSignal<bool>,
}

pub fn use_job_detail() -> JobDetailController {
    let ctx = use_app_context();
    JobDetailController {
        jobs: use_resource::<Job>(),
        api: StoredValue::new_local(ctx.api()),
        toasts: ctx.toasts,
        attachment_rules: StoredValue::new(ctx.config().attachment_upload),
        busy_tasks: RwSignal::new(BTreeSet::new()),
        uploading: RwSignal::new(false),
    }
}

impl JobDetailController {
    pub fn jobs(&self) -> ResourceController<Job> {
        self.jobs
    }

    pub fn job(&self) -> Signal<Option<Job>> {
        self.jobs.current()
    }

    pub fn is_task_busy(&self, task_id: u64) -> bool {
        self.busy_tasks.with(|b| b.contains(&task_id))
    }

    pub fn uploading(&self) -> ReadSignal<bool> {
        self.uploading.read_only()
    }

    pub fn attachment_accept(&self) -> String {
        self.attachment_rules.with_value(|r| r.accept_attr())
    }

    pub async fn load(&self, id: u64) {
        if let Err(e) = self.jobs.load_one(id).await {
            self.toasts.error(e.message);
        }
    }

    fn job_id(&self) -> Option<u64> {
        self.jobs.state().with_untracked(|s| s.current_item.as_ref().map(|j| j.id))
    }

    fn api(&self) -> Option<Api> {
        self.api.try_get_value()
    }

    fn report(&self, what: &str, err: &ApiError) {
        tracing::warn!("[JOBS] {} failed: {}", what, err);
        self.toasts.error(err.message.clone());
    }

    // ========================
    // Tasks
    // ========================

    pub async fn add_task(&self, draft: TaskDraft) -> bool {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return false;
        };
        if draft.name.trim().is_empty() {
            return false;
        }
        match jobs::add_task(&api, job_id, &draft).await {
            Ok(task) => {
                self.jobs.patch_current(|job| job.push_task(task));
                true
            }
            Err(e) => {
                self.report("add task", &e);
                false
            }
        }
    }

    /// Ignored while the same task already has a request in flight.
    pub async fn toggle_task(&self, task: Task) {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return;
        };
        let claimed = self.busy_tasks.try_update(|b| b.insert(task.id)).unwrap_or(false);
        if !claimed {
            return;
        }
        match jobs::toggle_task(&api, job_id, &task).await {
            Ok(updated) => self.jobs.patch_current(|job| {
                job.replace_task(updated);
            }),
            Err(e) => self.report("toggle task", &e),
        }
        self.busy_tasks.try_update(|b| b.remove(&task.id));
    }

    pub async fn delete_task(&self, task_id: u64) {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return;
        };
        match jobs::delete_task(&api, job_id, task_id).await {
            Ok(()) => {
                self.jobs.patch_current(|job| job.remove_task(task_id));
                self.toasts.success("Task removed");
            }
            Err(e) => self.report("delete task", &e),
        }
    }

    // ========================
    // Attachments
    // ========================

    pub async fn upload_attachment(&self, file: web_sys::File) {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return;
        };
        let meta = file_meta(&file);
        let validation = validate_file(&meta, &self.attachment_rules.get_value());
        if !validation.is_valid {
            self.toasts.error(validation.errors.join("; "));
            return;
        }

        self.uploading.try_set(true);
        let result = match read_file_bytes(&file).await {
            Ok(bytes) => jobs::upload_attachment(&api, job_id, &meta, bytes).await.map_err(|e| e.message),
            Err(e) => Err(e),
        };
        self.uploading.try_set(false);

        match result {
            Ok(attachment) => {
                self.jobs.patch_current(|job| job.push_attachment(attachment));
                self.toasts.success(format!("{} uploaded", meta.name));
            }
            Err(message) => {
                tracing::warn!("[JOBS] upload {} failed: {}", meta.name, message);
                self.toasts.error(message);
            }
        }
    }

    pub async fn delete_attachment(&self, attachment_id: u64) {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return;
        };
        match jobs::delete_attachment(&api, job_id, attachment_id).await {
            Ok(()) => self.jobs.patch_current(|job| job.remove_attachment(attachment_id)),
            Err(e) => self.report("delete attachment", &e),
        }
    }

    // ========================
    // Instructions
    // ========================

    pub async fn add_instruction(&self, draft: InstructionDraft) -> bool {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return false;
        };
        if draft.title.trim().is_empty() && draft.content.trim().is_empty() {
            return false;
        }
        match jobs::add_instruction(&api, job_id, &draft).await {
            Ok(instruction) => {
                self.jobs.patch_current(|job| job.push_instruction(instruction));
                true
            }
            Err(e) => {
                self.report("add instruction", &e);
                false
            }
        }
    }

    pub async fn delete_instruction(&self, instruction_id: u64) {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return;
        };
        match jobs::delete_instruction(&api, job_id, instruction_id).await {
            Ok(()) => self.jobs.patch_current(|job| job.remove_instruction(instruction_id)),
            Err(e) => self.report("delete instruction", &e),
        }
    }

    // ========================
    // Status
    // ========================

    pub async fn change_status(&self, status: JobStatus) {
        let (Some(job_id), Some(api)) = (self.job_id(), self.api()) else {
            return;
        };
        match jobs::update_status(&api, job_id, status).await {
            Ok(updated) => {
                // Keep sub-collections if the endpoint returned a bare job.
                self.jobs.patch_current(|job| {
                    job.status = updated.status;
                });
                self.toasts.success(format!("Job marked {}", status.label()));
            }
            Err(e) => self.report("status change", &e),
        }
    }
}
