//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las consultas SQL de su tabla y devuelve
//! modelos tipados.

pub mod car_repository;
pub mod client_repository;
pub mod dashboard_repository;
pub mod image_repository;
pub mod manager_repository;
pub mod reservation_repository;

pub use car_repository::CarRepository;
pub use client_repository::ClientRepository;
pub use dashboard_repository::DashboardRepository;
pub use image_repository::ImageRepository;
pub use manager_repository::ManagerRepository;
pub use reservation_repository::{NewReservation, ReservationChanges, ReservationRepository};
