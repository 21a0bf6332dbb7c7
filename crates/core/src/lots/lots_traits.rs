use crate::errors::Result;
use crate::lots::lots_model::{NewPurchaseLot, PurchaseLot, PurchaseLotUpdate};
use async_trait::async_trait;

/// Trait for purchase lot repository operations
#[async_trait]
pub trait LotRepositoryTrait: Send + Sync {
    /// Lots ordered by trade date descending, then id descending.
    /// When `ticker_id` is set only that ticker's lots are returned.
    fn list(&self, ticker_id: Option<i32>) -> Result<Vec<PurchaseLot>>;
    fn get_by_id(&self, lot_id: i32) -> Result<PurchaseLot>;
    async fn create(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot>;
    async fn update(&self, lot_update: PurchaseLotUpdate) -> Result<PurchaseLot>;
    async fn delete(&self, lot_id: i32) -> Result<usize>;
}

/// Trait for purchase lot service operations
#[async_trait]
pub trait LotServiceTrait: Send + Sync {
    fn get_lots(&self, ticker_id: Option<i32>) -> Result<Vec<PurchaseLot>>;
    async fn create_lot(&self, new_lot: NewPurchaseLot) -> Result<PurchaseLot>;
    async fn update_lot(&self, lot_update: PurchaseLotUpdate) -> Result<PurchaseLot>;
    async fn delete_lot(&self, lot_id: i32) -> Result<()>;
}
