use crate::dto::api_response::ApiResponse;
use crate::models::client::{ClientFilters, ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::repositories::ClientRepository;
use crate::utils::errors::{conflict_error, AppError};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct ClientController {
    repository: ClientRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        // Validar campos
        request.validate()?;

        // Verificar que el email no exista
        if self.repository.email_exists(&request.email).await? {
            return Err(conflict_error("Client", "email", &request.email));
        }

        let client = self.repository.create(&request).await?;

        Ok(ApiResponse::success_with_message(
            ClientResponse::from(client),
            "Cliente creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ClientResponse, AppError> {
        let client = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        Ok(ClientResponse::from(client))
    }

    pub async fn list(&self, filters: ClientFilters) -> Result<Vec<ClientResponse>, AppError> {
        let clients = self.repository.find_all(&filters).await?;
        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        request.validate()?;

        // Si cambia el email, comprobar que no pertenezca a otro cliente
        if let Some(email) = &request.email {
            let current = self
                .repository
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
            if *email != current.email && self.repository.email_exists(email).await? {
                return Err(conflict_error("Client", "email", email));
            }
        }

        let client = self.repository.update(id, &request).await?;

        Ok(ApiResponse::success_with_message(
            ClientResponse::from(client),
            "Cliente actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        Ok(())
    }
}
