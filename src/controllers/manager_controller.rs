use crate::dto::api_response::ApiResponse;
use crate::models::manager::{
    CreateManagerRequest, ManagerFilters, ManagerResponse, UpdateManagerRequest,
};
use crate::repositories::ManagerRepository;
use crate::utils::errors::{conflict_error, AppError};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct ManagerController {
    repository: ManagerRepository,
}

impl ManagerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ManagerRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateManagerRequest,
    ) -> Result<ApiResponse<ManagerResponse>, AppError> {
        // Validar campos
        request.validate()?;

        // Verificar que el email no exista
        if self.repository.email_exists(&request.email).await? {
            return Err(conflict_error("Manager", "email", &request.email));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let manager = self.repository.create(&request, password_hash).await?;

        Ok(ApiResponse::success_with_message(
            ManagerResponse::from(manager),
            "Gestor creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ManagerResponse, AppError> {
        let manager = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gestor no encontrado".to_string()))?;

        Ok(ManagerResponse::from(manager))
    }

    pub async fn list(&self, filters: ManagerFilters) -> Result<Vec<ManagerResponse>, AppError> {
        let managers = self.repository.find_all(&filters).await?;
        Ok(managers.into_iter().map(ManagerResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateManagerRequest,
    ) -> Result<ApiResponse<ManagerResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gestor no encontrado".to_string()))?;

        if let Some(email) = &request.email {
            if *email != current.email && self.repository.email_exists(email).await? {
                return Err(conflict_error("Manager", "email", email));
            }
        }

        // El último admin activo no puede quedarse sin permisos ni inactivo
        let loses_admin = request.role.as_deref() == Some("manager")
            || request.manager_status.as_deref() == Some("inactive");
        if current.is_admin() && current.is_active() && loses_admin {
            if self.repository.count_active_admins().await? <= 1 {
                return Err(AppError::Conflict(
                    "Cannot demote or deactivate the last active admin".to_string(),
                ));
            }
        }

        let new_password_hash = match &request.password {
            Some(password) => Some(
                bcrypt::hash(password, bcrypt::DEFAULT_COST)
                    .map_err(|e| AppError::Hash(e.to_string()))?,
            ),
            None => None,
        };

        let manager = self.repository.update(id, &request, new_password_hash).await?;

        Ok(ApiResponse::success_with_message(
            ManagerResponse::from(manager),
            "Gestor actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, acting_manager_id: Uuid) -> Result<(), AppError> {
        if id == acting_manager_id {
            return Err(AppError::Forbidden(
                "No puedes eliminar tu propia cuenta".to_string(),
            ));
        }

        let target = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gestor no encontrado".to_string()))?;

        if target.is_admin() && target.is_active() {
            if self.repository.count_active_admins().await? <= 1 {
                return Err(AppError::Conflict(
                    "Cannot delete the last active admin".to_string(),
                ));
            }
        }

        self.repository.delete(id).await?;
        Ok(())
    }
}
