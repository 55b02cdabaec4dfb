//! University, faculty and department pickers for signup

use crate::client::api::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::models::resources::{ResourceEntry, ResourceListResponse};

pub async fn universities(api: &ApiClient) -> Result<Vec<ResourceEntry>, ClientError> {
    fetch(api, "/resources/universities", &[]).await
}

pub async fn faculties(api: &ApiClient, university_id: &str) -> Result<Vec<ResourceEntry>, ClientError> {
    fetch(api, "/resources/faculties", &[("universityId", university_id)]).await
}

pub async fn departments(
    api: &ApiClient,
    university_id: &str,
    faculty_id: &str,
) -> Result<Vec<ResourceEntry>, ClientError> {
    fetch(
        api,
        "/resources/departments",
        &[("universityId", university_id), ("facultyId", faculty_id)],
    )
    .await
}

async fn fetch(
    api: &ApiClient,
    path: &str,
    query: &[(&str, &str)],
) -> Result<Vec<ResourceEntry>, ClientError> {
    let reply: ResourceListResponse = api.get(path, query).await.inspect_err(|e| e.log(path))?;
    Ok(reply.data)
}
