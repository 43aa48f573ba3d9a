use serde::{Deserialize, Serialize};

use crate::models::manager::ManagerResponse;

// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
    pub manager: Option<ManagerResponse>,
}

impl LoginResponse {
    pub fn success(token: String, manager: ManagerResponse) -> Self {
        Self {
            success: true,
            token: Some(token),
            message: None,
            manager: Some(manager),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            token: None,
            message: Some(message),
            manager: None,
        }
    }
}
