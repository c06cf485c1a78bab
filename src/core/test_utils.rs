use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::anyhow;
use poem::{
    delete, get, handler,
    http::StatusCode,
    listener::{Acceptor, Listener, TcpListener},
    patch, post,
    web::{Data, Json, Path, Query},
    EndpointExt, IntoResponse, Request, Response, Route, Server,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    core::{http::ApiClient, utils::now},
    model::{
        access::Access,
        application::Application,
        employee::{AccountStatus, Employee},
    },
};

/// In-memory backing data of the mock employee API.
#[derive(Default)]
pub struct MockStore {
    pub employees: Vec<Employee>,
    pub accesses: HashMap<i64, Vec<Access>>,
    pub applications: Vec<Application>,
    /// Every request line received, `METHOD /path?query`
    pub requests: Vec<String>,
    /// `METHOD /path` entries answered with 500
    pub failing: HashSet<String>,
    next_employee_id: i64,
    next_access_id: i64,
    next_application_id: i64,
}

impl MockStore {
    pub fn insert_employee(&mut self, mut employee: Employee) -> Employee {
        self.next_employee_id += 1;
        employee.employee_id = self.next_employee_id;
        self.employees.push(employee.clone());
        employee
    }

    pub fn insert_access(&mut self, employee_id: i64, mut access: Access) -> Access {
        self.next_access_id += 1;
        access.access_id = self.next_access_id;
        self.accesses
            .entry(employee_id)
            .or_default()
            .push(access.clone());
        access
    }

    pub fn insert_application(&mut self, application_name: &str) -> Application {
        self.next_application_id += 1;
        let application = Application {
            application_id: self.next_application_id,
            application_name: application_name.to_string(),
        };
        self.applications.push(application.clone());
        application
    }

    pub fn employee(&self, employee_id: i64) -> Option<&Employee> {
        self.employees.iter().find(|x| x.employee_id == employee_id)
    }

    pub fn accesses_of(&self, employee_id: i64) -> Vec<Access> {
        self.accesses.get(&employee_id).cloned().unwrap_or_default()
    }

    fn intercept(&mut self, req: &Request) -> Option<Response> {
        let path = req.uri().path().to_string();
        let line = match req.uri().query() {
            Some(query) => format!("{} {}?{}", req.method(), path, query),
            None => format!("{} {}", req.method(), path),
        };
        self.requests.push(line);
        if self.failing.contains(&format!("{} {}", req.method(), path)) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response());
        }
        None
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.employees
            .iter()
            .any(|x| x.email.eq_ignore_ascii_case(email) && Some(x.employee_id) != except)
    }
}

#[derive(Clone, Default)]
pub struct MockState(Arc<Mutex<MockStore>>);

impl MockState {
    pub fn lock(&self) -> MutexGuard<'_, MockStore> {
        self.0.lock().unwrap()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    search: Option<String>,
    status: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewEmployee {
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    account_status: Option<AccountStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewAccess {
    application_name: String,
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
}

#[handler]
async fn search_employees_api(
    req: &Request,
    Query(params): Query<SearchParams>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    let term = params.search.unwrap_or_default().trim().to_lowercase();
    let matched: Vec<Employee> = store
        .employees
        .iter()
        .filter(|x| {
            term.is_empty()
                || [&x.first_name, &x.last_name, &x.email, &x.job_title]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
        })
        .filter(|x| match params.status.as_deref() {
            Some(status) => x.account_status.as_str() == status,
            None => true,
        })
        .cloned()
        .collect();
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(10).max(1);
    let total = matched.len();
    let employees: Vec<Employee> = matched
        .into_iter()
        .skip(((page - 1) * page_size) as usize)
        .take(page_size as usize)
        .collect();
    Json(json!({ "employees": employees, "totalEmployees": total })).into_response()
}

#[handler]
async fn get_employee_api(
    req: &Request,
    Path(id): Path<i64>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    match store.employee(id) {
        Some(employee) => Json(employee.clone()).into_response(),
        None => not_found("employee"),
    }
}

#[handler]
async fn create_employee_api(
    req: &Request,
    Json(body): Json<NewEmployee>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    if body.first_name.is_empty() || body.last_name.is_empty() || body.email.is_empty() {
        return (StatusCode::BAD_REQUEST, "first name, last name and email are required")
            .into_response();
    }
    if store.email_taken(&body.email, None) {
        return (StatusCode::CONFLICT, "email already exists").into_response();
    }
    let now = now();
    let employee = store.insert_employee(Employee {
        employee_id: 0,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        job_title: body.job_title.unwrap_or_default(),
        account_status: body.account_status.unwrap_or_default(),
        date_created: Some(now),
        date_modified: Some(now),
    });
    (StatusCode::CREATED, Json(employee)).into_response()
}

#[handler]
async fn update_employee_api(
    req: &Request,
    Path(id): Path<i64>,
    Json(body): Json<Employee>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    if body.employee_id != id {
        return (StatusCode::BAD_REQUEST, "employee id mismatch").into_response();
    }
    if body.first_name.is_empty() || body.last_name.is_empty() || body.email.is_empty() {
        return (StatusCode::BAD_REQUEST, "first name, last name and email are required")
            .into_response();
    }
    if store.email_taken(&body.email, Some(id)) {
        return (StatusCode::CONFLICT, "email already exists").into_response();
    }
    let Some(employee) = store.employees.iter_mut().find(|x| x.employee_id == id) else {
        return not_found("employee");
    };
    employee.first_name = body.first_name;
    employee.last_name = body.last_name;
    employee.email = body.email;
    employee.job_title = body.job_title;
    employee.account_status = body.account_status;
    employee.date_modified = Some(now());
    Json(employee.clone()).into_response()
}

#[handler]
async fn update_status_api(
    req: &Request,
    Path(id): Path<i64>,
    Json(status): Json<AccountStatus>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    let Some(employee) = store.employees.iter_mut().find(|x| x.employee_id == id) else {
        return not_found("employee");
    };
    employee.account_status = status;
    employee.date_modified = Some(now());
    Json(employee.clone()).into_response()
}

#[handler]
async fn delete_employee_api(
    req: &Request,
    Path(id): Path<i64>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    if store.employee(id).is_none() {
        return not_found("employee");
    }
    store.employees.retain(|x| x.employee_id != id);
    store.accesses.remove(&id);
    StatusCode::NO_CONTENT.into_response()
}

#[handler]
async fn get_accesses_api(
    req: &Request,
    Path(id): Path<i64>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    if store.employee(id).is_none() {
        return not_found("employee");
    }
    Json(store.accesses_of(id)).into_response()
}

#[handler]
async fn create_access_api(
    req: &Request,
    Path(id): Path<i64>,
    Json(body): Json<NewAccess>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    if store.employee(id).is_none() {
        return not_found("employee");
    }
    if store
        .accesses_of(id)
        .iter()
        .any(|x| x.application_name == body.application_name)
    {
        return (StatusCode::CONFLICT, "access already granted").into_response();
    }
    let access = store.insert_access(
        id,
        Access {
            access_id: 0,
            application_name: body.application_name,
            date_granted: Some(now()),
        },
    );
    (StatusCode::CREATED, Json(access)).into_response()
}

#[handler]
async fn delete_access_api(
    req: &Request,
    Path((id, access_id)): Path<(i64, i64)>,
    state: Data<&MockState>,
) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    let Some(accesses) = store.accesses.get_mut(&id) else {
        return not_found("access");
    };
    let before = accesses.len();
    accesses.retain(|x| x.access_id != access_id);
    if accesses.len() == before {
        return not_found("access");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[handler]
async fn get_applications_api(req: &Request, state: Data<&MockState>) -> Response {
    let mut store = state.lock();
    if let Some(resp) = store.intercept(req) {
        return resp;
    }
    Json(store.applications.clone()).into_response()
}

pub fn mock_routes() -> Route {
    Route::new()
        .at("/employees", post(create_employee_api))
        .at("/employees/search", get(search_employees_api))
        .at(
            "/employees/:id",
            get(get_employee_api)
                .put(update_employee_api)
                .delete(delete_employee_api),
        )
        .at("/employees/:id/status", patch(update_status_api))
        .at(
            "/employees/:id/accesses",
            get(get_accesses_api).post(create_access_api),
        )
        .at(
            "/employees/:id/accesses/:access_id",
            delete(delete_access_api),
        )
        .at("/applications", get(get_applications_api))
}

/// A running mock API plus a client pointed at it.
pub struct MockApi {
    pub base_url: String,
    pub state: MockState,
    pub client: ApiClient,
}

impl MockApi {
    pub fn store(&self) -> MutexGuard<'_, MockStore> {
        self.state.lock()
    }

    pub fn fail(&self, method: &str, path: &str) {
        self.store().failing.insert(format!("{method} {path}"));
    }

    pub fn requests(&self) -> Vec<String> {
        self.store().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.store().requests.clear();
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.store()
            .requests
            .iter()
            .filter(|x| x.starts_with(prefix))
            .count()
    }

    pub fn seed_applications(&self, names: &[&str]) -> Vec<Application> {
        let mut store = self.store();
        names.iter().map(|x| store.insert_application(x)).collect()
    }
}

pub async fn spawn_mock_api() -> anyhow::Result<MockApi> {
    let state = MockState::default();
    let app = mock_routes().data(state.clone());
    let acceptor = TcpListener::bind("127.0.0.1:0").into_acceptor().await?;
    let addr = acceptor
        .local_addr()
        .into_iter()
        .find_map(|x| x.0.as_socket_addr().cloned())
        .ok_or_else(|| anyhow!("mock api is not bound to a socket address"))?;
    tokio::spawn(async move {
        let _ = Server::new_with_acceptor(acceptor).run(app).await;
    });
    let base_url = format!("http://{addr}");
    let client = ApiClient::new(base_url.clone(), Duration::from_secs(5))?;
    Ok(MockApi {
        base_url,
        state,
        client,
    })
}

/// Client pointed at a port nothing listens on.
pub fn unreachable_client() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap()
}

#[cfg(test)]
mod tests {
    use crate::{
        core::error::ClientError,
        repository::{application::get_all_application, employee::get_employee_by_id},
    };

    use super::*;

    #[tokio::test]
    async fn test_spawn_mock_api() -> anyhow::Result<()> {
        // Given
        let api = spawn_mock_api().await?;
        api.seed_applications(&["Jira", "Slack"]);

        // When
        let applications = get_all_application(&api.client).await?;
        let missing = get_employee_by_id(&api.client, 99).await;

        // Expect
        assert_eq!(applications.len(), 2);
        assert_eq!(applications[0].application_name, "Jira");
        assert!(matches!(missing, Err(ClientError::NotFound(_))));
        assert_eq!(
            api.requests(),
            vec!["GET /applications".to_string(), "GET /employees/99".to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_injected_failure() -> anyhow::Result<()> {
        let api = spawn_mock_api().await?;
        api.fail("GET", "/applications");

        let res = get_all_application(&api.client).await;

        assert!(matches!(res, Err(ClientError::Status { .. })));
        Ok(())
    }
}
