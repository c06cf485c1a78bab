use futures::future::join_all;

use crate::{
    core::{error::ClientError, http::ApiClient},
    model::{access::Access, application::Application},
    repository::{
        access::{create_access, get_accesses_by_employee},
        application::get_all_application,
    },
};

use super::notice::{Notice, Notices};

#[derive(Clone, Debug, PartialEq)]
pub enum GrantOutcome {
    Granted(Access),
    Duplicate,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GrantResult {
    pub application_name: String,
    pub outcome: GrantOutcome,
}

/// Per-application results of one grant batch. Partial success is a valid outcome.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrantReport {
    pub results: Vec<GrantResult>,
}

impl GrantReport {
    fn names_where(&self, predicate: fn(&GrantOutcome) -> bool) -> Vec<&str> {
        self.results
            .iter()
            .filter(|x| predicate(&x.outcome))
            .map(|x| x.application_name.as_str())
            .collect()
    }

    pub fn granted(&self) -> Vec<&str> {
        self.names_where(|x| matches!(x, GrantOutcome::Granted(_)))
    }

    pub fn duplicates(&self) -> Vec<&str> {
        self.names_where(|x| matches!(x, GrantOutcome::Duplicate))
    }

    pub fn failures(&self) -> Vec<&str> {
        self.names_where(|x| matches!(x, GrantOutcome::Failed(_)))
    }

    pub fn is_complete_success(&self) -> bool {
        self.duplicates().is_empty() && self.failures().is_empty()
    }

    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = vec![];
        let duplicates = self.duplicates();
        if !duplicates.is_empty() {
            notices.push(Notice::error(
                "Duplicate Accesses",
                format!(
                    "The following accesses already exist: {}.",
                    duplicates.join(", ")
                ),
            ));
        }
        let failures = self.failures();
        if !failures.is_empty() {
            notices.push(Notice::error(
                "Failed to Add Access",
                format!(
                    "Failed to add the following accesses: {}.",
                    failures.join(", ")
                ),
            ));
        }
        if duplicates.is_empty() && failures.is_empty() {
            notices.push(Notice::success(
                "Accesses Added Successfully",
                "The selected accesses have been added.",
            ));
        }
        notices
    }
}

/// Issues one grant request per application concurrently and reconciles each
/// response on its own.
pub async fn grant_accesses(
    api: &ApiClient,
    employee_id: i64,
    application_names: &[String],
) -> GrantReport {
    let requests = application_names.iter().map(|name| async move {
        let outcome = match create_access(api, employee_id, name).await {
            Ok(access) => GrantOutcome::Granted(access),
            Err(ClientError::Conflict(_)) => {
                tracing::warn!("access {} already granted to {}", name, employee_id);
                GrantOutcome::Duplicate
            }
            Err(err) => {
                tracing::error!("failed to grant {} to {}: {}", name, employee_id, err);
                GrantOutcome::Failed(err.to_string())
            }
        };
        GrantResult {
            application_name: name.clone(),
            outcome,
        }
    });
    GrantReport {
        results: join_all(requests).await,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    AlreadyGranted,
    NotInCatalog,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PickerRow<'a> {
    pub application: &'a Application,
    pub is_selected: bool,
    pub is_granted: bool,
}

/// State of the "add application access" dialog for one employee.
pub struct AccessAssignment {
    api: ApiClient,
    employee_id: i64,
    catalog: Vec<Application>,
    granted: Vec<String>,
    selected: Vec<String>,
    filter: String,
    is_open: bool,
    pub notices: Notices,
}

impl AccessAssignment {
    /// Loads the application catalog and the employee's current grants together.
    pub async fn open(api: &ApiClient, employee_id: i64) -> Self {
        let mut assignment = Self {
            api: api.clone(),
            employee_id,
            catalog: vec![],
            granted: vec![],
            selected: vec![],
            filter: String::new(),
            is_open: true,
            notices: Notices::default(),
        };
        match tokio::try_join!(
            get_all_application(api),
            get_accesses_by_employee(api, employee_id)
        ) {
            Ok((catalog, accesses)) => {
                assignment.catalog = catalog;
                assignment.granted = accesses.into_iter().map(|x| x.application_name).collect();
            }
            Err(err) => {
                tracing::error!("failed to load access assignment data: {}", err);
                assignment.notices.push(Notice::error(
                    "Failed to Load Data",
                    "Could not fetch applications or accesses. Please try again later.",
                ));
            }
        }
        assignment
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn catalog(&self) -> &[Application] {
        &self.catalog
    }

    pub fn is_granted(&self, application_name: &str) -> bool {
        self.granted
            .iter()
            .any(|x| x.eq_ignore_ascii_case(application_name))
    }

    pub fn is_selected(&self, application_name: &str) -> bool {
        self.selected.iter().any(|x| x == application_name)
    }

    pub fn set_filter(&mut self, term: &str) {
        self.filter = term.to_string();
    }

    /// Catalog entries whose name contains the filter text, ignoring case.
    pub fn visible_applications(&self) -> Vec<PickerRow<'_>> {
        let term = self.filter.trim().to_lowercase();
        self.catalog
            .iter()
            .filter(|x| x.application_name.to_lowercase().contains(&term))
            .map(|x| PickerRow {
                application: x,
                is_selected: self.is_selected(&x.application_name),
                is_granted: self.is_granted(&x.application_name),
            })
            .collect()
    }

    fn find_application(&self, application_name: &str) -> Option<&Application> {
        let name = application_name.trim();
        self.catalog
            .iter()
            .find(|x| x.application_name == name)
            .or_else(|| {
                self.catalog
                    .iter()
                    .find(|x| x.application_name.eq_ignore_ascii_case(name))
            })
    }

    pub fn toggle(&mut self, application_name: &str) -> ToggleOutcome {
        let Some(name) = self
            .find_application(application_name)
            .map(|x| x.application_name.clone())
        else {
            self.notices.push(Notice::error(
                "Unknown Application",
                format!("{} is not in the application catalog.", application_name),
            ));
            return ToggleOutcome::NotInCatalog;
        };
        if self.is_granted(&name) {
            self.notices.push(Notice::info(
                "Duplicate Access",
                format!("{} is already assigned to this employee.", name),
            ));
            return ToggleOutcome::AlreadyGranted;
        }
        if self.is_selected(&name) {
            self.selected.retain(|x| x != &name);
            ToggleOutcome::Deselected
        } else {
            self.selected.push(name);
            ToggleOutcome::Selected
        }
    }

    pub fn can_submit(&self) -> bool {
        self.is_open && !self.selected.is_empty()
    }

    /// Grants every pending selection, then closes the dialog. Returns `None`
    /// without sending anything when the selection is empty.
    pub async fn submit(&mut self) -> Option<GrantReport> {
        if self.selected.is_empty() {
            self.notices.push(Notice::info(
                "No Applications Selected",
                "Please select at least one application before submitting.",
            ));
            return None;
        }
        let report = grant_accesses(&self.api, self.employee_id, &self.selected).await;
        for notice in report.notices() {
            self.notices.push(notice);
        }
        self.granted
            .extend(report.granted().into_iter().map(|x| x.to_string()));
        self.close();
        Some(report)
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.is_open = false;
        self.selected.clear();
        self.filter.clear();
    }
}
