use contracts::domain::a002_dref::dto::{DrefRequest, DrefResponse};

use crate::shared::api_utils::{post_json, ApiError};

const API_PATH: &str = "/api/v2/dref/";

/// Create a DREF application
pub async fn create_dref(request: &DrefRequest) -> Result<DrefResponse, ApiError> {
    post_json(API_PATH, request).await
}
