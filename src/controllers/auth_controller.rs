use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::manager::ManagerResponse;
use crate::repositories::ManagerRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use sqlx::PgPool;
use uuid::Uuid;

pub struct AuthController {
    repository: ManagerRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: ManagerRepository::new(pool),
            jwt,
        }
    }

    /// Autentica a un gestor por email y contraseña. Las credenciales
    /// incorrectas y las cuentas desconocidas responden el mismo mensaje.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let manager = match self.repository.find_by_email(&request.email).await? {
            Some(manager) => manager,
            None => {
                return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
            }
        };

        if !manager.is_active() {
            return Err(AppError::Unauthorized(
                "Cuenta inactiva o suspendida".to_string(),
            ));
        }

        let valid = bcrypt::verify(&request.password, &manager.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let token = generate_token(manager.id, &manager.email, manager.role.as_str(), &self.jwt)?;

        Ok(LoginResponse::success(token, ManagerResponse::from(manager)))
    }

    /// Perfil del gestor autenticado, releído de base de datos.
    pub async fn me(&self, manager_id: Uuid) -> Result<ManagerResponse, AppError> {
        let manager = self
            .repository
            .find_by_id(manager_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gestor no encontrado".to_string()))?;

        Ok(ManagerResponse::from(manager))
    }
}
