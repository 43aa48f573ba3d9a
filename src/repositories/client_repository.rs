//! Repositorio de clientes
//!
//! Acceso a la tabla clients. La dirección viaja como JSONB.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use chrono::Utc;

use crate::models::client::{Client, ClientFilters, CreateClientRequest, UpdateClientRequest};
use crate::utils::errors::{not_found_error, AppError};

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateClientRequest) -> Result<Client, AppError> {
        let id = Uuid::new_v4();

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, first_name, last_name, email, phone, address, license_category, license_number, license_expires_on, id_card_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(Json(request.address.clone()))
        .bind(&request.license_category)
        .bind(&request.license_number)
        .bind(request.license_expires_on)
        .bind(&request.id_card_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn find_all(&self, filters: &ClientFilters) -> Result<Vec<Client>, AppError> {
        let last_name_pattern = filters.last_name.as_ref().map(|name| format!("%{}%", name));

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE ($1::text IS NULL OR last_name ILIKE $1)
              AND ($2::text IS NULL OR email = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(last_name_pattern)
        .bind(&filters.email)
        .bind(filters.limit.unwrap_or(100))
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE email = $1)"
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateClientRequest) -> Result<Client, AppError> {
        // Obtener cliente actual
        let current = self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Client", &id.to_string()))?;

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET first_name = $2, last_name = $3, email = $4, phone = $5, address = $6,
                license_category = $7, license_number = $8, license_expires_on = $9, id_card_number = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.first_name.clone().unwrap_or(current.first_name))
        .bind(request.last_name.clone().unwrap_or(current.last_name))
        .bind(request.email.clone().unwrap_or(current.email))
        .bind(request.phone.clone().unwrap_or(current.phone))
        .bind(request.address.clone().map(Json).unwrap_or(current.address))
        .bind(request.license_category.clone().unwrap_or(current.license_category))
        .bind(request.license_number.clone().unwrap_or(current.license_number))
        .bind(request.license_expires_on.or(current.license_expires_on))
        .bind(request.id_card_number.clone().unwrap_or(current.id_card_number))
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    /// Borra el cliente y, por cascade, todas sus reservas.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id).await?
            .ok_or_else(|| not_found_error("Client", &id.to_string()))?;

        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
