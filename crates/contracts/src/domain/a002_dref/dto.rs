use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One planned intervention row of a DREF application.
///
/// `client_id` is assigned in the browser and keeps a row addressable while
/// rows are added and removed; the server only knows positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedInterventionInput {
    pub client_id: Uuid,
    pub title: String,
    pub budget: Option<i64>,
    pub description: String,
}

impl PlannedInterventionInput {
    pub fn new_row() -> Self {
        Self {
            client_id: Uuid::new_v4(),
            title: String::new(),
            budget: None,
            description: String::new(),
        }
    }
}

/// Body of `POST /api/v2/dref/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrefRequest {
    pub title: String,
    pub country: Option<i64>,
    pub num_affected: Option<i64>,
    #[serde(default)]
    pub planned_interventions: Vec<PlannedInterventionInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrefResponse {
    pub id: i64,
    pub title: String,
}
