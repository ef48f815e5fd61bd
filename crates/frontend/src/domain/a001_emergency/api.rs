use contracts::domain::a001_emergency::dto::{EmergencyDto, EmergencyFilter};
use contracts::shared::list::{ListQuery, ListResponse};

use crate::shared::api_utils::{fetch_list, ApiError};

const API_PATH: &str = "/api/v2/event/";

/// One page of emergencies
pub async fn fetch_emergencies(
    query: &ListQuery<EmergencyFilter>,
) -> Result<ListResponse<EmergencyDto>, ApiError> {
    fetch_list(API_PATH, query).await
}
