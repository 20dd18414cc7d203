//! Employee record

use chrono::NaiveDate;

use super::{looks_like_email, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmployeeRole {
    Admin,
    Manager,
    #[default]
    Technician,
    Office,
}

impl EmployeeRole {
    pub const ALL: [EmployeeRole; 4] = [
        EmployeeRole::Admin,
        EmployeeRole::Manager,
        EmployeeRole::Technician,
        EmployeeRole::Office,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Admin => "admin",
            EmployeeRole::Manager => "manager",
            EmployeeRole::Technician => "technician",
            EmployeeRole::Office => "office",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => EmployeeRole::Admin,
            "manager" | "supervisor" => EmployeeRole::Manager,
            "office" | "staff" => EmployeeRole::Office,
            _ => EmployeeRole::Technician,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmployeeRole::Admin => "Admin",
            EmployeeRole::Manager => "Manager",
            EmployeeRole::Technician => "Technician",
            EmployeeRole::Office => "Office",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Employee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: EmployeeRole,
    pub position: String,
    pub department: String,
    pub manager_id: Option<u64>,
    pub manager_name: String,
    pub hire_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.first_name.trim().is_empty() {
            errors.insert("first_name", "First name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            errors.insert("last_name", "Last name is required".to_string());
        }
        if !looks_like_email(&self.email) {
            errors.insert("email", "Enter a valid email address".to_string());
        }
        if self.id != 0 && self.manager_id == Some(self.id) {
            errors.insert("manager_id", "An employee cannot manage themselves".to_string());
        }
        errors
    }
}

/// Entry in the manager picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOption {
    pub id: u64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_trims() {
        let e = Employee { first_name: " Sam ".into(), last_name: "".into(), ..Employee::default() };
        assert_eq!(e.full_name(), "Sam");
    }

    #[test]
    fn test_cannot_manage_self() {
        let e = Employee {
            id: 4,
            first_name: "Sam".into(),
            last_name: "Ortiz".into(),
            email: "sam@example.com".into(),
            manager_id: Some(4),
            ..Employee::default()
        };
        let errors = e.validate();
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec!["manager_id"]);
    }
}
