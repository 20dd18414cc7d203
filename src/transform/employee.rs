//! Employee transformers

use rest_resource::RestResource;
use serde::{Deserialize, Serialize};

use super::{format_date, non_empty, parse_date};
use crate::models::{Employee, EmployeeRole, ManagerOption};

/// `{ id, name }` reference embedded in an employee
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManagerApi {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl ManagerApi {
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn into_option(self) -> ManagerOption {
        ManagerOption { id: self.id, name: self.display_name() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeApi {
    pub id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub manager_id: Option<u64>,
    #[serde(default)]
    pub manager: Option<ManagerApi>,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeePayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Always sent so that clearing the manager is persisted
    pub manager_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    pub is_active: bool,
}

pub fn transform_employee_from_api(api: EmployeeApi) -> Employee {
    let manager_id = api.manager_id.or(api.manager.as_ref().map(|m| m.id));
    let manager_name = api.manager.as_ref().map(ManagerApi::display_name).unwrap_or_default();

    Employee {
        id: api.id,
        first_name: api.first_name.unwrap_or_default(),
        last_name: api.last_name.unwrap_or_default(),
        email: api.email.unwrap_or_default(),
        phone: api.phone.unwrap_or_default(),
        role: api.role.as_deref().map(EmployeeRole::from_str).unwrap_or_default(),
        position: api.position.unwrap_or_default(),
        department: api.department.unwrap_or_default(),
        manager_id,
        manager_name,
        hire_date: parse_date(api.hire_date.as_deref()),
        is_active: api.is_active.unwrap_or(true),
    }
}

pub fn transform_employee_for_api(employee: &Employee) -> EmployeePayload {
    EmployeePayload {
        first_name: employee.first_name.trim().to_string(),
        last_name: employee.last_name.trim().to_string(),
        email: employee.email.trim().to_string(),
        phone: non_empty(&employee.phone),
        role: employee.role.as_str().to_string(),
        position: non_empty(&employee.position),
        department: non_empty(&employee.department),
        manager_id: employee.manager_id,
        hire_date: format_date(employee.hire_date),
        is_active: employee.is_active,
    }
}

impl RestResource for Employee {
    type Api = EmployeeApi;
    type Payload = EmployeePayload;
    const PATH: &'static str = "employees";
    const LABEL: &'static str = "Employee";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_api(api: EmployeeApi) -> Self {
        transform_employee_from_api(api)
    }

    fn to_payload(&self) -> EmployeePayload {
        transform_employee_for_api(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_manager_reference_is_flattened() {
        let api: EmployeeApi = serde_json::from_value(json!({
            "id": 9,
            "first_name": "Lee",
            "last_name": "Park",
            "email": "lee@example.com",
            "role": "supervisor",
            "manager": {"id": 2, "first_name": "Ana", "last_name": "Gomez"},
            "hire_date": "2021-03-15T00:00:00Z"
        }))
        .unwrap();

        let employee = transform_employee_from_api(api);
        assert_eq!(employee.manager_id, Some(2));
        assert_eq!(employee.manager_name, "Ana Gomez");
        assert_eq!(employee.role, EmployeeRole::Manager);
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2021, 3, 15));
        assert!(employee.is_active);
    }

    #[test]
    fn test_payload_sends_null_manager() {
        let employee = Employee {
            first_name: "Lee".into(),
            last_name: "Park".into(),
            email: "lee@example.com".into(),
            is_active: true,
            ..Employee::default()
        };
        let body = serde_json::to_value(transform_employee_for_api(&employee)).unwrap();
        assert_eq!(body["manager_id"], serde_json::Value::Null);
        assert_eq!(body["role"], "technician");
        assert!(body.get("phone").is_none());
        assert!(body.get("hire_date").is_none());
    }

    #[test]
    fn test_manager_option_prefers_name() {
        let m = ManagerApi { id: 1, name: Some("Chief".into()), first_name: Some("X".into()), last_name: None };
        assert_eq!(m.into_option(), ManagerOption { id: 1, name: "Chief".into() });
    }
}
