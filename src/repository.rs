use log::{info, warn};

use crate::client::DesignApi;
use crate::error::ConsoleError;
use crate::models::design::{DesignFields, RecordId, SavedDesign};
use crate::models::style::StyleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    NotLoaded,
    Loading,
    Loaded,
}

/// Saved designs of one QR code, mirrored from the persistence API.
///
/// The local list only changes after the API confirms a fetch; create and
/// delete are followed by a refresh rather than an optimistic edit.
pub struct DesignRepository<A> {
    api: A,
    qr_id: RecordId,
    designs: Vec<SavedDesign>,
    state: FetchState,
}

impl<A: DesignApi> DesignRepository<A> {
    pub fn new(api: A, qr_id: RecordId) -> Self {
        Self {
            api,
            qr_id,
            designs: Vec::new(),
            state: FetchState::NotLoaded,
        }
    }

    pub fn qr_id(&self) -> &RecordId {
        &self.qr_id
    }

    pub fn designs(&self) -> &[SavedDesign] {
        &self.designs
    }

    /// Whether the list reflects a completed fetch and can be acted on.
    pub fn is_loaded(&self) -> bool {
        self.state == FetchState::Loaded
    }

    pub fn find(&self, design_id: &RecordId) -> Option<&SavedDesign> {
        self.designs.iter().find(|d| &d.id == design_id)
    }

    pub async fn list(&mut self) -> Result<&[SavedDesign], ConsoleError> {
        let previous = self.state;
        self.state = FetchState::Loading;
        match self.api.list_designs(&self.qr_id).await {
            Ok(records) => {
                self.designs = records
                    .iter()
                    .filter_map(|record| {
                        let design = SavedDesign::from_record(record);
                        if design.is_none() {
                            warn!("Skipping design without id for QR {}", self.qr_id);
                        }
                        design
                    })
                    .collect();
                self.state = FetchState::Loaded;
                Ok(&self.designs)
            }
            Err(e) => {
                self.state = previous;
                Err(e)
            }
        }
    }

    /// Save `style` under `name`. Names are labels, duplicates are allowed.
    pub async fn create(
        &mut self,
        name: &str,
        style: &StyleConfig,
    ) -> Result<SavedDesign, ConsoleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConsoleError::validation("Enter a design name"));
        }

        let fields = DesignFields::new(name, style);
        let record = self.api.create_design(&self.qr_id, &fields).await?;
        let id = record
            .id
            .ok_or_else(|| ConsoleError::UpstreamStatus {
                status: 200,
                message: "created design has no id".to_string(),
            })?;
        info!("Saved design '{}' ({}) for QR {}", name, id, self.qr_id);

        if let Err(e) = self.list().await {
            warn!("Design saved but the list could not be refreshed: {}", e);
        }

        Ok(SavedDesign {
            id,
            name: name.to_string(),
            style: style.clone(),
        })
    }

    pub async fn delete(&mut self, design_id: &RecordId) -> Result<(), ConsoleError> {
        self.api.delete_design(design_id).await?;
        info!("Deleted design {} of QR {}", design_id, self.qr_id);
        if let Err(e) = self.list().await {
            warn!("Design deleted but the list could not be refreshed: {}", e);
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeDesignApi;
    use super::*;
    use crate::models::style::ExportQuality;

    fn repository(api: &FakeDesignApi) -> DesignRepository<FakeDesignApi> {
        DesignRepository::new(api.clone(), RecordId::Number(1))
    }

    #[actix_web::test]
    async fn list_loads_designs() {
        let api = FakeDesignApi::default();
        api.seed("Plain", &StyleConfig::default());
        let mut repo = repository(&api);
        assert!(!repo.is_loaded());

        let designs = repo.list().await.unwrap();
        assert_eq!(designs.len(), 1);
        assert_eq!(designs[0].name, "Plain");
        assert!(repo.is_loaded());
    }

    #[actix_web::test]
    async fn empty_name_never_reaches_the_api() {
        let api = FakeDesignApi::default();
        let mut repo = repository(&api);
        let err = repo.create("   ", &StyleConfig::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a design name");
        assert_eq!(api.calls.get(), 0);
    }

    #[actix_web::test]
    async fn create_refreshes_and_allows_duplicate_names() {
        let api = FakeDesignApi::default();
        let mut repo = repository(&api);
        let mut style = StyleConfig::default();
        style.export_quality = ExportQuality::Print;

        let first = repo.create(" Print ", &style).await.unwrap();
        let second = repo.create("Print", &StyleConfig::default()).await.unwrap();
        assert_eq!(first.name, "Print");
        assert_ne!(first.id, second.id);
        assert_eq!(repo.designs().len(), 2);
        assert_eq!(repo.find(&first.id).unwrap().style, style);
    }

    #[actix_web::test]
    async fn failed_create_keeps_the_list() {
        let api = FakeDesignApi::default();
        api.seed("Keep me", &StyleConfig::default());
        let mut repo = repository(&api);
        repo.list().await.unwrap();

        api.failing.set(true);
        let err = repo.create("New", &StyleConfig::default()).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(repo.designs().len(), 1);
        assert!(repo.is_loaded());
    }

    #[actix_web::test]
    async fn delete_refreshes() {
        let api = FakeDesignApi::default();
        let id = api.seed("Old", &StyleConfig::default());
        api.seed("Current", &StyleConfig::default());
        let mut repo = repository(&api);
        repo.list().await.unwrap();

        repo.delete(&id).await.unwrap();
        assert_eq!(repo.designs().len(), 1);
        assert!(repo.find(&id).is_none());
    }

    #[actix_web::test]
    async fn failed_delete_is_not_applied_locally() {
        let api = FakeDesignApi::default();
        api.seed("Only", &StyleConfig::default());
        let mut repo = repository(&api);
        repo.list().await.unwrap();

        let err = repo.delete(&RecordId::Number(99)).await.unwrap_err();
        assert!(matches!(err, ConsoleError::UpstreamStatus { status: 404, .. }));
        assert_eq!(repo.designs().len(), 1);
    }

    #[actix_web::test]
    async fn failed_first_fetch_stays_unloaded() {
        let api = FakeDesignApi::default();
        api.failing.set(true);
        let mut repo = repository(&api);
        assert!(repo.list().await.is_err());
        assert!(!repo.is_loaded());
    }
}
