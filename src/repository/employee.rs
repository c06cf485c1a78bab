use crate::{
    core::{error::ClientResult, http::ApiClient},
    model::employee::{AccountStatus, Employee},
    schema::employee::{EmployeeCreateRequest, EmployeeSearchQuery, EmployeeSearchResponse},
};

pub async fn search_employees(
    api: &ApiClient,
    query: &EmployeeSearchQuery,
) -> ClientResult<EmployeeSearchResponse> {
    api.get_with_query("employees/search", query).await
}

pub async fn get_employee_by_id(api: &ApiClient, employee_id: i64) -> ClientResult<Employee> {
    api.get(&format!("employees/{employee_id}")).await
}

pub async fn create_employee(
    api: &ApiClient,
    request: &EmployeeCreateRequest,
) -> ClientResult<Employee> {
    api.post("employees", request).await
}

pub async fn update_employee(api: &ApiClient, employee: &Employee) -> ClientResult<Employee> {
    api.put(&format!("employees/{}", employee.employee_id), employee)
        .await
}

pub async fn update_employee_status(
    api: &ApiClient,
    employee_id: i64,
    status: AccountStatus,
) -> ClientResult<Employee> {
    api.patch(&format!("employees/{employee_id}/status"), &status)
        .await
}

pub async fn delete_employee(api: &ApiClient, employee_id: i64) -> ClientResult<()> {
    api.delete(&format!("employees/{employee_id}")).await
}
