use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::sectors_model::{normalize_sector_name, NewSector, Sector, SectorUpdate};
use super::sectors_traits::{SectorRepositoryTrait, SectorServiceTrait};
use crate::errors::{Error, Result};

pub struct SectorService {
    repository: Arc<dyn SectorRepositoryTrait>,
}

impl SectorService {
    pub fn new(repository: Arc<dyn SectorRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_unique(&self, name: &str, current_id: Option<i32>) -> Result<()> {
        match self.repository.find_by_name(name)? {
            Some(existing) if Some(existing.id) != current_id => Err(Error::field(
                "name",
                "Sector with this name already exists",
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SectorServiceTrait for SectorService {
    fn get_sectors(&self) -> Result<Vec<Sector>> {
        self.repository.list()
    }

    fn get_sector(&self, sector_id: i32) -> Result<Sector> {
        self.repository.get_by_id(sector_id)
    }

    async fn create_sector(&self, new_sector: NewSector) -> Result<Sector> {
        let name = normalize_sector_name(&new_sector.name)?;
        self.ensure_unique(&name, None)?;
        debug!("Creating sector '{}'", name);
        self.repository.create(NewSector { name }).await
    }

    async fn update_sector(&self, sector_update: SectorUpdate) -> Result<Sector> {
        self.repository.get_by_id(sector_update.id)?;
        let name = normalize_sector_name(&sector_update.name)?;
        self.ensure_unique(&name, Some(sector_update.id))?;
        self.repository
            .update(SectorUpdate {
                id: sector_update.id,
                name,
            })
            .await
    }

    async fn delete_sector(&self, sector_id: i32) -> Result<()> {
        let deleted = self.repository.delete(sector_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Sector {}", sector_id)));
        }
        debug!("Deleted sector {}", sector_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStore;

    fn service(store: &InMemoryStore) -> SectorService {
        SectorService::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_create_normalizes_name() {
        let store = InMemoryStore::default();
        let sector = service(&store)
            .create_sector(NewSector {
                name: "  health care ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(sector.name, "Health Care");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_case_insensitive() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        svc.create_sector(NewSector {
            name: "Energy".to_string(),
        })
        .await
        .unwrap();

        let err = svc
            .create_sector(NewSector {
                name: "ENERGY".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let sector = svc
            .create_sector(NewSector {
                name: "Energy".to_string(),
            })
            .await
            .unwrap();

        let renamed = svc
            .update_sector(SectorUpdate {
                id: sector.id,
                name: "energy".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Energy");
    }

    #[tokio::test]
    async fn test_sectors_are_listed_by_name() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        for name in ["Utilities", "Energy", "Materials"] {
            svc.create_sector(NewSector {
                name: name.to_string(),
            })
            .await
            .unwrap();
        }
        let names: Vec<_> = svc
            .get_sectors()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Energy", "Materials", "Utilities"]);
    }

    #[tokio::test]
    async fn test_delete_missing_sector_is_not_found() {
        let store = InMemoryStore::default();
        let err = service(&store).delete_sector(42).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
