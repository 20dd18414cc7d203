//! Job record and its owned sub-collections

use chrono::NaiveDate;

use super::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Pending,
        JobStatus::Scheduled,
        JobStatus::InProgress,
        JobStatus::OnHold,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::OnHold => "on_hold",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "scheduled" => JobStatus::Scheduled,
            "in_progress" | "in-progress" => JobStatus::InProgress,
            "on_hold" | "on-hold" => JobStatus::OnHold,
            "completed" => JobStatus::Completed,
            "cancelled" | "canceled" => JobStatus::Cancelled,
            _ => JobStatus::Pending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Scheduled => "Scheduled",
            JobStatus::InProgress => "In Progress",
            JobStatus::OnHold => "On Hold",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl JobPriority {
    pub const ALL: [JobPriority; 4] = [JobPriority::Low, JobPriority::Medium, JobPriority::High, JobPriority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Low => "low",
            JobPriority::Medium => "medium",
            JobPriority::High => "high",
            JobPriority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "low" => JobPriority::Low,
            "high" => JobPriority::High,
            "urgent" => JobPriority::Urgent,
            _ => JobPriority::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobPriority::Low => "Low",
            JobPriority::Medium => "Medium",
            JobPriority::High => "High",
            JobPriority::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}

/// New task as typed into the task panel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attachment {
    pub id: u64,
    pub file_name: String,
    pub file_type: String,
    pub url: String,
    pub formatted_size: String,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }
}

/// Markdown note for the crew
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instruction {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstructionDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Job {
    pub id: u64,
    pub job_number: String,
    pub title: String,
    pub description: String,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub client_id: Option<u64>,
    pub client_name: String,
    pub quote_id: Option<u64>,
    pub location: String,
    pub scheduled_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assigned_employee_ids: Vec<u64>,
    pub assigned_employee_names: Vec<String>,
    pub notes: String,
    pub tasks: Vec<Task>,
    pub attachments: Vec<Attachment>,
    pub instructions: Vec<Instruction>,
    pub created_at: Option<String>,
}

impl Job {
    /// Swap in the server's copy of a task, leaving order and the other
    /// tasks untouched. Returns false if the task is not on this job.
    pub fn replace_task(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn push_task(&mut self, task: Task) {
        if !self.replace_task(task.clone()) {
            self.tasks.push(task);
        }
    }

    pub fn remove_task(&mut self, task_id: u64) {
        self.tasks.retain(|t| t.id != task_id);
    }

    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Completed share of tasks in percent; 0 when there are none
    pub fn progress(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        ((self.completed_tasks() * 100) / self.tasks.len()) as u8
    }

    pub fn push_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn remove_attachment(&mut self, attachment_id: u64) {
        self.attachments.retain(|a| a.id != attachment_id);
    }

    pub fn push_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn remove_instruction(&mut self, instruction_id: u64) {
        self.instructions.retain(|i| i.id != instruction_id);
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required".to_string());
        }
        if self.client_id.is_none() {
            errors.insert("client_id", "Select a customer".to_string());
        }
        if let (Some(start), Some(due)) = (self.scheduled_date, self.due_date) {
            if due < start {
                errors.insert("due_date", "Due date cannot be before the scheduled date".to_string());
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, name: &str, completed: bool) -> Task {
        Task { id, name: name.into(), completed, ..Task::default() }
    }

    fn job_with_tasks() -> Job {
        Job {
            id: 1,
            tasks: vec![task(1, "Survey", false), task(2, "Quote parts", true), task(3, "Install", false)],
            ..Job::default()
        }
    }

    #[test]
    fn test_toggle_updates_only_that_task() {
        let mut job = job_with_tasks();
        let before = job.tasks.clone();

        let mut toggled = job.tasks[0].clone();
        toggled.completed = !toggled.completed;
        assert!(job.replace_task(toggled));

        assert!(job.tasks[0].completed);
        assert_eq!(job.tasks[1], before[1]);
        assert_eq!(job.tasks[2], before[2]);
        let ids: Vec<u64> = job.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_replace_unknown_task_is_noop() {
        let mut job = job_with_tasks();
        assert!(!job.replace_task(task(99, "Ghost", true)));
        assert_eq!(job.tasks.len(), 3);
    }

    #[test]
    fn test_progress() {
        let mut job = job_with_tasks();
        assert_eq!(job.progress(), 33);
        job.remove_task(1);
        job.remove_task(3);
        assert_eq!(job.progress(), 100);
        assert_eq!(Job::default().progress(), 0);
    }

    #[test]
    fn test_validate_dates() {
        let job = Job {
            title: "Boiler service".into(),
            client_id: Some(3),
            scheduled_date: NaiveDate::from_ymd_opt(2024, 5, 10),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Job::default()
        };
        let errors = job.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("due_date"));
    }

    #[test]
    fn test_status_round_trip() {
        for status in JobStatus::ALL {
            assert_eq!(JobStatus::from_str(status.as_str()), status);
        }
        assert_eq!(JobStatus::from_str("canceled"), JobStatus::Cancelled);
    }
}
