//! Database entities module

pub mod connector;
pub mod favorite;
pub mod reservation;
pub mod station;
pub mod user;

pub use connector::Entity as Connector;
pub use favorite::Entity as Favorite;
pub use reservation::Entity as Reservation;
pub use station::Entity as Station;
pub use user::Entity as User;
