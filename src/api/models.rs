use serde::Deserialize;

use crate::models::FieldMapping;

/// Public submission body. Required fields are validated by hand so the
/// endpoint can answer with its own 400 shape instead of a rejection.
#[derive(Deserialize)]
pub struct SubmitRequest {
    pub form_key: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub ip: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateFormRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateFormRequest {
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct UpsertIntegrationRequest {
    pub connection_id: String,
    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub passed_min: u8,
    pub borderline_min: u8,
    pub block_rejected: bool,
    pub rejection_message: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub status: Option<String>,
}
