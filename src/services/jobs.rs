//! Job Sub-resources
//!
//! Tasks, attachments and instructions belong to a job and are created,
//! changed and removed through their own endpoints under
//! `vendors/jobs/{job_id}/...`. Each call returns the server's copy of the
//! item so the detail view can patch it in place.

use rest_resource::{ApiClient, ApiError, FileMeta, FormPart, RestResource, Transport, DEFAULT_PREFIX};
use serde_json::json;

use crate::models::{Attachment, Instruction, InstructionDraft, Job, JobStatus, Task, TaskDraft};
use crate::transform::{
    transform_attachment, transform_instruction, transform_task, AttachmentApi, InstructionApi, JobApi, TaskApi,
};

fn job_path(job_id: u64) -> String {
    format!("{}/{}/{}", DEFAULT_PREFIX, Job::PATH, job_id)
}

// ========================
// Tasks
// ========================

pub async fn add_task<T: Transport>(api: &ApiClient<T>, job_id: u64, draft: &TaskDraft) -> Result<Task, ApiError> {
    let body = json!({
        "name": draft.name.trim(),
        "description": draft.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
        "due_date": draft.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
    });
    let task: TaskApi = api.post(&format!("{}/tasks", job_path(job_id)), body).await?.into_data()?;
    tracing::debug!("[JOBS] task {} added to job {}", task.id, job_id);
    Ok(transform_task(task))
}

/// Flip completion on the server; returns the updated task.
pub async fn toggle_task<T: Transport>(api: &ApiClient<T>, job_id: u64, task: &Task) -> Result<Task, ApiError> {
    let path = format!("{}/tasks/{}", job_path(job_id), task.id);
    let updated: TaskApi = api
        .patch(&path, json!({ "completed": !task.completed }))
        .await?
        .into_data()?;
    Ok(transform_task(updated))
}

pub async fn delete_task<T: Transport>(api: &ApiClient<T>, job_id: u64, task_id: u64) -> Result<(), ApiError> {
    api.delete(&format!("{}/tasks/{}", job_path(job_id), task_id)).await?.into_ack()?;
    Ok(())
}

// ========================
// Attachments
// ========================

pub async fn upload_attachment<T: Transport>(
    api: &ApiClient<T>,
    job_id: u64,
    file: &FileMeta,
    bytes: Vec<u8>,
) -> Result<Attachment, ApiError> {
    let part = FormPart::File {
        name: "file".to_string(),
        file_name: file.name.clone(),
        mime: file
            .effective_mime()
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        bytes,
    };
    let attachment: AttachmentApi = api
        .post_multipart(&format!("{}/attachments", job_path(job_id)), vec![part])
        .await?
        .into_data()?;
    tracing::info!("[JOBS] attachment {} uploaded to job {}", file.name, job_id);
    Ok(transform_attachment(attachment))
}

pub async fn delete_attachment<T: Transport>(
    api: &ApiClient<T>,
    job_id: u64,
    attachment_id: u64,
) -> Result<(), ApiError> {
    api.delete(&format!("{}/attachments/{}", job_path(job_id), attachment_id))
        .await?
        .into_ack()?;
    Ok(())
}

// ========================
// Instructions
// ========================

pub async fn add_instruction<T: Transport>(
    api: &ApiClient<T>,
    job_id: u64,
    draft: &InstructionDraft,
) -> Result<Instruction, ApiError> {
    let body = json!({ "title": draft.title.trim(), "content": draft.content });
    let instruction: InstructionApi = api
        .post(&format!("{}/instructions", job_path(job_id)), body)
        .await?
        .into_data()?;
    Ok(transform_instruction(instruction))
}

pub async fn delete_instruction<T: Transport>(
    api: &ApiClient<T>,
    job_id: u64,
    instruction_id: u64,
) -> Result<(), ApiError> {
    api.delete(&format!("{}/instructions/{}", job_path(job_id), instruction_id))
        .await?
        .into_ack()?;
    Ok(())
}

// ========================
// Status
// ========================

pub async fn update_status<T: Transport>(api: &ApiClient<T>, job_id: u64, status: JobStatus) -> Result<Job, ApiError> {
    let job: JobApi = api
        .patch(&format!("{}/status", job_path(job_id)), json!({ "status": status.as_str() }))
        .await?
        .into_data()?;
    tracing::info!("[JOBS] job {} -> {}", job_id, status.as_str());
    Ok(Job::from_api(job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_resource::{ErrorKind, Method, MockTransport, RequestBody};

    #[tokio::test]
    async fn test_toggle_sends_inverse_and_returns_server_copy() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"success":true,"data":{"id":2,"name":"Fit unit","is_completed":true}}"#);
        let api = crate::services::testing::signed_in_api(&mock);
        let task = Task { id: 2, name: "Fit unit".into(), completed: false, ..Task::default() };

        let updated = toggle_task(&api, 12, &task).await.unwrap();
        assert!(updated.completed);

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Patch);
        assert!(sent.url.ends_with("/vendors/jobs/12/tasks/2"));
        assert_eq!(sent.body, RequestBody::Json(json!({"completed": true})));
    }

    #[tokio::test]
    async fn test_add_task_trims_and_omits_blank_description() {
        let mock = MockTransport::new();
        mock.respond(201, r#"{"success":true,"data":{"id":9,"name":"Survey"}}"#);
        let api = crate::services::testing::signed_in_api(&mock);
        let draft = TaskDraft { name: " Survey ".into(), description: Some("  ".into()), due_date: None };

        let task = add_task(&api, 3, &draft).await.unwrap();
        assert_eq!(task.id, 9);
        let RequestBody::Json(body) = &mock.requests()[0].body else {
            panic!("expected json body");
        };
        assert_eq!(body["name"], "Survey");
        assert!(body["description"].is_null());
    }

    #[tokio::test]
    async fn test_upload_attachment_is_multipart() {
        let mock = MockTransport::new();
        mock.respond(
            201,
            r#"{"success":true,"data":{"id":5,"file_name":"plan.pdf","file_type":"application/pdf","url":"https://cdn/plan.pdf","formatted_size":"2 MB"}}"#,
        );
        let api = crate::services::testing::signed_in_api(&mock);
        let meta = FileMeta { name: "plan.pdf".into(), size: 2 * 1024 * 1024, mime: String::new() };

        let attachment = upload_attachment(&api, 12, &meta, vec![1, 2, 3]).await.unwrap();
        assert_eq!(attachment.formatted_size, "2 MB");

        match &mock.requests()[0].body {
            RequestBody::Multipart(parts) => match &parts[0] {
                FormPart::File { mime, file_name, .. } => {
                    assert_eq!(mime, "application/pdf");
                    assert_eq!(file_name, "plan.pdf");
                }
                other => panic!("unexpected part {:?}", other),
            },
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_status_validation_error_surfaces_fields() {
        let mock = MockTransport::new();
        mock.respond(
            422,
            r#"{"success":false,"message":"The given data was invalid.","errors":{"status":["Cannot complete a job with open tasks"]}}"#,
        );
        let api = crate::services::testing::signed_in_api(&mock);

        let err = update_status(&api, 12, JobStatus::Completed).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field_error("status").as_deref(), Some("Cannot complete a job with open tasks"));
    }

    #[tokio::test]
    async fn test_delete_instruction_path() {
        let mock = MockTransport::new();
        mock.respond(204, "");
        let api = crate::services::testing::signed_in_api(&mock);

        delete_instruction(&api, 12, 4).await.unwrap();
        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Delete);
        assert!(sent.url.ends_with("/vendors/jobs/12/instructions/4"));
    }
}
