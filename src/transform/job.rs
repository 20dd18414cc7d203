//! Job transformers
//!
//! Jobs come back with their tasks, attachments and instructions embedded.
//! The sub-collection transformers are public because the job services
//! also decode single items returned by the task/attachment/instruction
//! endpoints.

use rest_resource::{format_file_size, RestResource};
use serde::{Deserialize, Serialize};

use super::{format_date, non_empty, parse_date};
use crate::models::{Attachment, Instruction, Job, JobPriority, JobStatus, Task};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskApi {
    pub id: u64,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "is_completed")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttachmentApi {
    pub id: u64,
    #[serde(default, alias = "original_name", alias = "name")]
    pub file_name: Option<String>,
    #[serde(default, alias = "mime_type")]
    pub file_type: Option<String>,
    #[serde(default, alias = "file_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub formatted_size: Option<String>,
    #[serde(default, alias = "file_size")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstructionApi {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "body")]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientRefApi {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeRefApi {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl EmployeeRefApi {
    fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!(
                "{} {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobApi {
    pub id: u64,
    #[serde(default)]
    pub job_number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client: Option<ClientRefApi>,
    #[serde(default)]
    pub quote_id: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_employees: Vec<EmployeeRefApi>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskApi>,
    #[serde(default)]
    pub attachments: Vec<AttachmentApi>,
    #[serde(default)]
    pub instructions: Vec<InstructionApi>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub assigned_employee_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub fn transform_task(api: TaskApi) -> Task {
    Task {
        id: api.id,
        name: api.name.unwrap_or_default(),
        description: api.description.filter(|d| !d.trim().is_empty()),
        completed: api.completed.unwrap_or(false),
        due_date: parse_date(api.due_date.as_deref()),
    }
}

pub fn transform_attachment(api: AttachmentApi) -> Attachment {
    let formatted_size = api
        .formatted_size
        .filter(|s| !s.is_empty())
        .or_else(|| api.size.map(format_file_size))
        .unwrap_or_default();

    Attachment {
        id: api.id,
        file_name: api.file_name.unwrap_or_default(),
        file_type: api.file_type.unwrap_or_default(),
        url: api.url.unwrap_or_default(),
        formatted_size,
    }
}

pub fn transform_instruction(api: InstructionApi) -> Instruction {
    Instruction {
        id: api.id,
        title: api.title.unwrap_or_default(),
        content: api.content.unwrap_or_default(),
        created_at: api.created_at,
    }
}

pub fn transform_job_from_api(api: JobApi) -> Job {
    let client_id = api.client_id.or(api.client.as_ref().map(|c| c.id));
    let client_name = api
        .client
        .as_ref()
        .and_then(|c| c.company_name.clone().filter(|n| !n.is_empty()).or(c.name.clone()))
        .unwrap_or_default();

    Job {
        id: api.id,
        job_number: api.job_number.unwrap_or_default(),
        title: api.title.unwrap_or_default(),
        description: api.description.unwrap_or_default(),
        status: api.status.as_deref().map(JobStatus::from_str).unwrap_or_default(),
        priority: api.priority.as_deref().map(JobPriority::from_str).unwrap_or_default(),
        client_id,
        client_name,
        quote_id: api.quote_id,
        location: api.location.unwrap_or_default(),
        scheduled_date: parse_date(api.scheduled_date.as_deref()),
        due_date: parse_date(api.due_date.as_deref()),
        assigned_employee_ids: api.assigned_employees.iter().map(|e| e.id).collect(),
        assigned_employee_names: api.assigned_employees.iter().map(EmployeeRefApi::display_name).collect(),
        notes: api.notes.unwrap_or_default(),
        tasks: api.tasks.into_iter().map(transform_task).collect(),
        attachments: api.attachments.into_iter().map(transform_attachment).collect(),
        instructions: api.instructions.into_iter().map(transform_instruction).collect(),
        created_at: api.created_at,
    }
}

/// Sub-collections are managed through their own endpoints and are not sent.
pub fn transform_job_for_api(job: &Job) -> JobPayload {
    JobPayload {
        title: job.title.trim().to_string(),
        description: non_empty(&job.description),
        status: job.status.as_str().to_string(),
        priority: job.priority.as_str().to_string(),
        client_id: job.client_id,
        quote_id: job.quote_id,
        location: non_empty(&job.location),
        scheduled_date: format_date(job.scheduled_date),
        due_date: format_date(job.due_date),
        assigned_employee_ids: job.assigned_employee_ids.clone(),
        notes: non_empty(&job.notes),
    }
}

impl RestResource for Job {
    type Api = JobApi;
    type Payload = JobPayload;
    const PATH: &'static str = "jobs";
    const LABEL: &'static str = "Job";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_api(api: JobApi) -> Self {
        transform_job_from_api(api)
    }

    fn to_payload(&self) -> JobPayload {
        transform_job_for_api(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_job_from_api_with_children() {
        let api: JobApi = serde_json::from_value(json!({
            "id": 12,
            "job_number": "JOB-0012",
            "title": "Replace water heater",
            "status": "in_progress",
            "priority": "high",
            "client": {"id": 3, "name": "Dana Reyes", "company_name": "Reyes Plumbing"},
            "scheduled_date": "2024-06-03T00:00:00Z",
            "assigned_employees": [{"id": 5, "first_name": "Lee", "last_name": "Park"}, {"id": 6, "name": "Ana Gomez"}],
            "tasks": [
                {"id": 1, "name": "Drain tank", "is_completed": true},
                {"id": 2, "title": "Fit unit"}
            ],
            "attachments": [{"id": 8, "original_name": "site.jpg", "mime_type": "image/jpeg", "file_url": "https://cdn/site.jpg", "file_size": 1536}],
            "instructions": [{"id": 4, "title": "Access", "body": "Use **side** gate"}]
        }))
        .unwrap();

        let job = transform_job_from_api(api);
        assert_eq!(job.client_id, Some(3));
        assert_eq!(job.client_name, "Reyes Plumbing");
        assert_eq!(job.status, JobStatus::InProgress);
        assert_eq!(job.priority, JobPriority::High);
        assert_eq!(job.scheduled_date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(job.assigned_employee_ids, vec![5, 6]);
        assert_eq!(job.assigned_employee_names, vec!["Lee Park", "Ana Gomez"]);
        assert!(job.tasks[0].completed);
        assert_eq!(job.tasks[1].name, "Fit unit");
        assert!(!job.tasks[1].completed);
        assert_eq!(job.attachments[0].formatted_size, "1.5 KB");
        assert!(job.attachments[0].is_image());
        assert_eq!(job.instructions[0].content, "Use **side** gate");
    }

    #[test]
    fn test_payload_omits_children() {
        let job = Job {
            title: "Service".into(),
            client_id: Some(1),
            tasks: vec![Task { id: 1, name: "x".into(), ..Task::default() }],
            ..Job::default()
        };
        let body = serde_json::to_value(transform_job_for_api(&job)).unwrap();
        assert!(body.get("tasks").is_none());
        assert_eq!(body["status"], "pending");
        assert_eq!(body["assigned_employee_ids"], json!([]));
    }
}
