//! SeaORM repository implementations

pub mod repository_provider;
pub mod reservation_repository;
pub mod station_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use reservation_repository::SeaOrmReservationRepository;
pub use station_repository::SeaOrmStationRepository;
pub use user_repository::SeaOrmUserRepository;
