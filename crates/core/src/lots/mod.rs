//! Purchase lots module - domain models, services, and traits.

mod lots_model;
mod lots_service;
mod lots_traits;

pub use lots_model::{NewPurchaseLot, Position, PurchaseLot, PurchaseLotUpdate};
pub use lots_service::LotService;
pub use lots_traits::{LotRepositoryTrait, LotServiceTrait};
