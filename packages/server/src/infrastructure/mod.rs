//! Infrastructure layer: shared registries, collaborator implementations
//! and transport DTOs.

pub mod dto;
pub mod registry;
pub mod repository;
