// Worked DTO families and the plain DTOs that carry them.
pub mod backup;
pub mod chaos;
pub mod enums;
pub mod events;
pub mod placement;
pub mod property;
pub mod registry;
pub mod scaling;
pub mod secret;
