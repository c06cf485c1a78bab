use crate::{
    core::{
        error::{ClientError, ClientResult},
        http::ApiClient,
    },
    model::employee::{AccountStatus, Employee},
    repository::employee::{create_employee, delete_employee, search_employees, update_employee},
    schema::employee::{EmployeeForm, EmployeeSearchQuery},
};

use super::{
    access_assignment::{grant_accesses, GrantReport},
    detail::update_failure_notice,
    notice::{Notice, Notices},
};

pub fn page_count(total_employees: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    total_employees.div_ceil(page_size)
}

/// Pending delete dialog for one row. Dropping it is the cancel path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub employee_id: i64,
    pub employee_name: String,
}

impl DeleteConfirmation {
    pub fn message(&self) -> String {
        format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            self.employee_name
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeCreated {
    pub employee: Employee,
    pub grants: Option<GrantReport>,
}

/// Paginated, searchable list of employees.
pub struct EmployeeDirectory {
    api: ApiClient,
    search: String,
    status: Option<AccountStatus>,
    page: u32,
    page_size: u32,
    employees: Vec<Employee>,
    total_employees: u32,
    total_pages: u32,
    is_loading: bool,
    pub notices: Notices,
}

impl EmployeeDirectory {
    pub fn new(api: &ApiClient, page_size: u32) -> Self {
        Self {
            api: api.clone(),
            search: String::new(),
            status: None,
            page: 1,
            page_size: page_size.max(1),
            employees: vec![],
            total_employees: 0,
            total_pages: 1,
            is_loading: false,
            notices: Notices::default(),
        }
    }

    /// Presets filters and page without loading.
    pub fn with_query(mut self, search: &str, status: Option<AccountStatus>, page: u32) -> Self {
        self.search = search.to_string();
        self.status = status;
        self.page = page.max(1);
        self
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_employees(&self) -> u32 {
        self.total_employees
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> Option<AccountStatus> {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn query(&self) -> EmployeeSearchQuery {
        EmployeeSearchQuery::new(&self.search, self.status, self.page, self.page_size)
    }

    /// Requests the current page. Failure degrades to an empty list.
    pub async fn load(&mut self) {
        self.fetch_page().await;
        // the page can fall off the end after deletions elsewhere
        let last_page = self.total_pages.max(1);
        if self.page > last_page {
            self.page = last_page;
            self.fetch_page().await;
        }
    }

    async fn fetch_page(&mut self) {
        self.is_loading = true;
        let query = self.query();
        match search_employees(&self.api, &query).await {
            Ok(res) => {
                self.employees = res.employees;
                self.total_employees = res.total_employees;
                self.total_pages = page_count(res.total_employees, self.page_size);
            }
            Err(err) => {
                tracing::error!("error fetching employees: {}", err);
                self.employees = vec![];
                self.total_employees = 0;
                self.total_pages = 1;
            }
        }
        self.is_loading = false;
    }

    pub async fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 1;
        self.load().await;
    }

    pub async fn set_status(&mut self, status: Option<AccountStatus>) {
        self.status = status;
        self.page = 1;
        self.load().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.load().await;
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        self.load().await;
        true
    }

    pub async fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        self.load().await;
        true
    }

    /// Creates an employee, puts it at the top of the visible list, then grants
    /// any selected applications.
    pub async fn create_employee(
        &mut self,
        form: &EmployeeForm,
        grants: &[String],
    ) -> ClientResult<EmployeeCreated> {
        let request = form.to_create_request();
        let employee = match create_employee(&self.api, &request).await {
            Ok(val) => val,
            Err(err) => {
                tracing::error!("error adding employee: {}", err);
                self.notices.push(Notice::error(
                    format!(
                        "{} {} Failed to be Added",
                        request.first_name, request.last_name
                    ),
                    create_failure_description(&err),
                ));
                return Err(err);
            }
        };
        self.employees.insert(0, employee.clone());
        self.total_employees += 1;
        self.total_pages = page_count(self.total_employees, self.page_size);
        self.notices.push(Notice::success(
            format!("{} Added Successfully", employee.full_name()),
            "The employee has been added successfully and is now active.",
        ));

        let mut report = None;
        if !grants.is_empty() {
            let res = grant_accesses(&self.api, employee.employee_id, grants).await;
            for notice in res.notices() {
                self.notices.push(notice);
            }
            report = Some(res);
        }
        Ok(EmployeeCreated {
            employee,
            grants: report,
        })
    }

    pub fn find(&self, employee_id: i64) -> Option<&Employee> {
        self.employees.iter().find(|x| x.employee_id == employee_id)
    }

    pub fn edit_form(&self, employee_id: i64) -> Option<EmployeeForm> {
        self.find(employee_id).map(EmployeeForm::from_employee)
    }

    /// Writes the row's edit dialog back as a full-record update, then reloads.
    pub async fn update_employee(
        &mut self,
        employee_id: i64,
        form: &EmployeeForm,
    ) -> ClientResult<Employee> {
        let Some(employee) = self.find(employee_id).cloned() else {
            return Err(ClientError::NotFound(format!(
                "employee {employee_id} is not on this page"
            )));
        };
        match update_employee(&self.api, &form.apply_to(&employee)).await {
            Ok(updated) => {
                self.load().await;
                Ok(updated)
            }
            Err(err) => {
                tracing::error!("error updating employee {}: {}", employee_id, err);
                self.notices.push(update_failure_notice(&err));
                Err(err)
            }
        }
    }

    pub fn confirm_delete(&self, employee_id: i64) -> Option<DeleteConfirmation> {
        self.find(employee_id).map(|x| DeleteConfirmation {
            employee_id: x.employee_id,
            employee_name: x.full_name(),
        })
    }

    /// Runs a confirmed delete, then reloads the page.
    pub async fn delete_employee(&mut self, confirmation: DeleteConfirmation) -> ClientResult<()> {
        match delete_employee(&self.api, confirmation.employee_id).await {
            Ok(()) => {
                self.notices.push(Notice::success(
                    "Employee Deleted",
                    format!("{} has been deleted.", confirmation.employee_name),
                ));
                self.load().await;
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    "error deleting employee {}: {}",
                    confirmation.employee_id,
                    err
                );
                self.notices.push(Notice::error(
                    "Failed to Delete Employee",
                    format!("{} could not be deleted.", confirmation.employee_name),
                ));
                Err(err)
            }
        }
    }
}

fn create_failure_description(err: &ClientError) -> String {
    match err {
        ClientError::Conflict(_) => "An employee with this email already exists.".to_string(),
        ClientError::Validation(body) if !body.is_empty() => body.clone(),
        _ => "Failed to add employee".to_string(),
    }
}
