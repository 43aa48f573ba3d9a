//! Controllers de la API
//!
//! Orquestan validación, reglas de negocio y repositorios. Los handlers de
//! routes/ los construyen por request con el pool compartido.

pub mod auth_controller;
pub mod car_controller;
pub mod client_controller;
pub mod dashboard_controller;
pub mod image_controller;
pub mod manager_controller;
pub mod reservation_controller;

pub use auth_controller::AuthController;
pub use car_controller::CarController;
pub use client_controller::ClientController;
pub use dashboard_controller::DashboardController;
pub use image_controller::ImageController;
pub use manager_controller::ManagerController;
pub use reservation_controller::ReservationController;
