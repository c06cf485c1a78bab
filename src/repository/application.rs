use crate::{
    core::{error::ClientResult, http::ApiClient},
    model::application::Application,
};

pub async fn get_all_application(api: &ApiClient) -> ClientResult<Vec<Application>> {
    api.get("applications").await
}
