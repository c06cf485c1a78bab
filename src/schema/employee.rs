use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::{now, timestamp_opt},
    model::employee::{AccountStatus, Employee},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    pub page: u32,
    pub page_size: u32,
}

impl EmployeeSearchQuery {
    /// Blank search terms are left out of the query string entirely.
    pub fn new(search: &str, status: Option<AccountStatus>, page: u32, page_size: u32) -> Self {
        let search = search.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_string()),
            status,
            page: page.max(1),
            page_size,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSearchResponse {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub total_employees: u32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: String,
    pub account_status: AccountStatus,
    #[serde(with = "timestamp_opt")]
    pub date_created: Option<DateTime<FixedOffset>>,
    #[serde(with = "timestamp_opt")]
    pub date_modified: Option<DateTime<FixedOffset>>,
}

/// Editable profile fields, as held by the add and edit dialogs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: String,
    pub account_status: AccountStatus,
}

impl EmployeeForm {
    pub fn new(first_name: &str, last_name: &str, email: &str, job_title: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            job_title: job_title.to_string(),
            account_status: AccountStatus::Active,
        }
    }

    /// Pre-fills the form with the employee's current values.
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            job_title: employee.job_title.clone(),
            account_status: employee.account_status,
        }
    }

    /// True when the form differs from `employee` in `account_status` only.
    pub fn is_status_only_change(&self, employee: &Employee) -> bool {
        let original = Self::from_employee(employee);
        self.account_status != original.account_status
            && Self {
                account_status: original.account_status,
                ..self.clone()
            } == original
    }

    /// Full-record overwrite body for `PUT /employees/{id}`.
    pub fn apply_to(&self, employee: &Employee) -> Employee {
        Employee {
            employee_id: employee.employee_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
            account_status: self.account_status,
            date_created: employee.date_created,
            date_modified: employee.date_modified,
        }
    }

    pub fn to_create_request(&self) -> EmployeeCreateRequest {
        let now = now();
        EmployeeCreateRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
            account_status: self.account_status,
            date_created: Some(now),
            date_modified: Some(now),
        }
    }
}
