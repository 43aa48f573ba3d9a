//! Repositorio de gestores
//!
//! Acceso a la tabla managers. El hash de la contraseña llega ya calculado
//! desde el controller.

use sqlx::PgPool;
use uuid::Uuid;
use chrono::Utc;

use crate::models::manager::{
    CreateManagerRequest, Manager, ManagerFilters, ManagerRole, ManagerStatus, UpdateManagerRequest,
};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};

pub struct ManagerRepository {
    pool: PgPool,
}

impl ManagerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: &CreateManagerRequest,
        password_hash: String,
    ) -> Result<Manager, AppError> {
        let id = Uuid::new_v4();
        let role = match request.role.as_deref() {
            Some(raw) => ManagerRole::parse(raw).ok_or_else(|| bad_request_error("Unknown role"))?,
            None => ManagerRole::Manager,
        };

        let manager = sqlx::query_as::<_, Manager>(
            r#"
            INSERT INTO managers (id, first_name, last_name, email, password_hash, phone, role, manager_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(password_hash)
        .bind(&request.phone)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(manager)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Manager>, AppError> {
        let manager = sqlx::query_as::<_, Manager>("SELECT * FROM managers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(manager)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Manager>, AppError> {
        let manager = sqlx::query_as::<_, Manager>("SELECT * FROM managers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(manager)
    }

    pub async fn find_all(&self, filters: &ManagerFilters) -> Result<Vec<Manager>, AppError> {
        let role = match filters.role.as_deref() {
            Some(raw) => Some(ManagerRole::parse(raw).ok_or_else(|| bad_request_error("Unknown role"))?),
            None => None,
        };
        let manager_status = match filters.manager_status.as_deref() {
            Some(raw) => {
                Some(ManagerStatus::parse(raw).ok_or_else(|| bad_request_error("Unknown status"))?)
            }
            None => None,
        };

        let managers = sqlx::query_as::<_, Manager>(
            r#"
            SELECT * FROM managers
            WHERE ($1::manager_role IS NULL OR role = $1)
              AND ($2::manager_status IS NULL OR manager_status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(role)
        .bind(manager_status)
        .bind(filters.limit.unwrap_or(100))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(managers)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM managers WHERE email = $1)"
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn count_active_admins(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM managers WHERE role = 'admin' AND manager_status = 'active'"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateManagerRequest,
        new_password_hash: Option<String>,
    ) -> Result<Manager, AppError> {
        // Obtener gestor actual
        let current = self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Manager", &id.to_string()))?;

        let role = match request.role.as_deref() {
            Some(raw) => ManagerRole::parse(raw).ok_or_else(|| bad_request_error("Unknown role"))?,
            None => current.role,
        };
        let manager_status = match request.manager_status.as_deref() {
            Some(raw) => {
                ManagerStatus::parse(raw).ok_or_else(|| bad_request_error("Unknown status"))?
            }
            None => current.manager_status,
        };

        let manager = sqlx::query_as::<_, Manager>(
            r#"
            UPDATE managers
            SET first_name = $2, last_name = $3, email = $4, password_hash = $5,
                phone = $6, role = $7, manager_status = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.first_name.clone().unwrap_or(current.first_name))
        .bind(request.last_name.clone().unwrap_or(current.last_name))
        .bind(request.email.clone().unwrap_or(current.email))
        .bind(new_password_hash.unwrap_or(current.password_hash))
        .bind(request.phone.clone().or(current.phone))
        .bind(role)
        .bind(manager_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(manager)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Manager", &id.to_string()))?;

        sqlx::query("DELETE FROM managers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
