use crate::{
    core::{
        error::{ClientError, ClientResult},
        http::ApiClient,
    },
    model::{
        access::Access,
        employee::{AccountStatus, Employee},
    },
    repository::{
        access::{delete_access, get_accesses_by_employee},
        employee::{get_employee_by_id, update_employee, update_employee_status},
    },
    schema::employee::EmployeeForm,
};

use super::{
    access_assignment::{AccessAssignment, GrantReport},
    notice::{Notice, Notices},
};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch employee details. Please try again later.";

#[derive(Clone, Debug, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded {
        employee: Employee,
        accesses: Vec<Access>,
    },
    NotFound,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    StatusOnly,
    FullProfile,
}

/// Single employee profile plus its access grants.
pub struct EmployeeDetail {
    api: ApiClient,
    employee_id: i64,
    state: DetailState,
    pub notices: Notices,
}

impl EmployeeDetail {
    pub fn new(api: &ApiClient, employee_id: i64) -> Self {
        Self {
            api: api.clone(),
            employee_id,
            state: DetailState::Loading,
            notices: Notices::default(),
        }
    }

    pub async fn open(api: &ApiClient, employee_id: i64) -> Self {
        let mut detail = Self::new(api, employee_id);
        detail.load().await;
        detail
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading)
    }

    pub fn employee(&self) -> Option<&Employee> {
        match &self.state {
            DetailState::Loaded { employee, .. } => Some(employee),
            _ => None,
        }
    }

    pub fn accesses(&self) -> &[Access] {
        match &self.state {
            DetailState::Loaded { accesses, .. } => accesses,
            _ => &[],
        }
    }

    /// Quick status toggle offered for the status the employee is not in.
    pub fn status_action(&self) -> Option<AccountStatus> {
        self.employee().map(|x| x.account_status.toggled())
    }

    /// Fetches profile and grants together; a failure of either discards both.
    pub async fn load(&mut self) {
        self.state = DetailState::Loading;
        let (employee, accesses) = tokio::join!(
            get_employee_by_id(&self.api, self.employee_id),
            get_accesses_by_employee(&self.api, self.employee_id)
        );
        self.state = match (employee, accesses) {
            (Ok(employee), Ok(accesses)) => DetailState::Loaded { employee, accesses },
            (Err(ClientError::NotFound(_)), _) => {
                tracing::warn!("employee {} not found", self.employee_id);
                DetailState::NotFound
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(
                    "error fetching employee details for {}: {}",
                    self.employee_id,
                    err
                );
                DetailState::Failed(FETCH_FAILED_MESSAGE.to_string())
            }
        };
    }

    pub fn edit_form(&self) -> Option<EmployeeForm> {
        self.employee().map(EmployeeForm::from_employee)
    }

    /// Saves the edit dialog. A change to `account_status` alone goes through the
    /// status endpoint, anything else overwrites the full record.
    pub async fn submit_edit(&mut self, form: &EmployeeForm) -> ClientResult<EditKind> {
        let Some(employee) = self.employee().cloned() else {
            return Err(ClientError::NotFound(format!(
                "employee {} is not loaded",
                self.employee_id
            )));
        };
        let (kind, result) = if form.is_status_only_change(&employee) {
            let result =
                update_employee_status(&self.api, employee.employee_id, form.account_status).await;
            (EditKind::StatusOnly, result)
        } else {
            let result = update_employee(&self.api, &form.apply_to(&employee)).await;
            (EditKind::FullProfile, result)
        };
        match result {
            Ok(_) => {
                if kind == EditKind::StatusOnly {
                    self.notices.push(Notice::success(
                        format!("Status updated to {}!", form.account_status),
                        "",
                    ));
                } else {
                    self.notices
                        .push(Notice::success("Employee Updated", employee.full_name()));
                }
                self.load().await;
                Ok(kind)
            }
            Err(err) => {
                tracing::error!("error updating employee {}: {}", employee.employee_id, err);
                self.notices.push(update_failure_notice(&err));
                Err(err)
            }
        }
    }

    pub async fn set_status(&mut self, status: AccountStatus) -> ClientResult<EditKind> {
        let Some(mut form) = self.edit_form() else {
            return Err(ClientError::NotFound(format!(
                "employee {} is not loaded",
                self.employee_id
            )));
        };
        form.account_status = status;
        self.submit_edit(&form).await
    }

    /// Removes a grant from the local list once the server confirms deletion.
    pub async fn remove_access(&mut self, access_id: i64) -> ClientResult<()> {
        match delete_access(&self.api, self.employee_id, access_id).await {
            Ok(()) => {
                if let DetailState::Loaded { accesses, .. } = &mut self.state {
                    accesses.retain(|x| x.access_id != access_id);
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!("error removing access {}: {}", access_id, err);
                self.notices.push(Notice::error(
                    "Failed to Remove Access",
                    "Failed to remove the access right. Please try again.",
                ));
                Err(err)
            }
        }
    }

    pub async fn open_access_assignment(&self) -> AccessAssignment {
        AccessAssignment::open(&self.api, self.employee_id).await
    }

    /// Submits the dialog and refreshes this view afterwards.
    pub async fn submit_access_assignment(
        &mut self,
        assignment: &mut AccessAssignment,
    ) -> Option<GrantReport> {
        let report = assignment.submit().await?;
        self.load().await;
        Some(report)
    }
}

pub fn update_failure_notice(err: &ClientError) -> Notice {
    match err {
        ClientError::Conflict(body) => Notice::error(
            "Failed to update employee",
            format!("Email is already in use. {}", body).trim().to_string(),
        ),
        ClientError::Validation(body) => {
            Notice::error("Failed to update employee", body.to_string())
        }
        _ => Notice::error(
            "Failed to update employee",
            "Please try again later.",
        ),
    }
}
