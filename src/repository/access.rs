use crate::{
    core::{error::ClientResult, http::ApiClient},
    model::access::Access,
    schema::access::AccessCreateRequest,
};

pub async fn get_accesses_by_employee(
    api: &ApiClient,
    employee_id: i64,
) -> ClientResult<Vec<Access>> {
    api.get(&format!("employees/{employee_id}/accesses")).await
}

pub async fn create_access(
    api: &ApiClient,
    employee_id: i64,
    application_name: &str,
) -> ClientResult<Access> {
    let request = AccessCreateRequest {
        application_name: application_name.to_string(),
    };
    api.post(&format!("employees/{employee_id}/accesses"), &request)
        .await
}

pub async fn delete_access(api: &ApiClient, employee_id: i64, access_id: i64) -> ClientResult<()> {
    api.delete(&format!("employees/{employee_id}/accesses/{access_id}"))
        .await
}
