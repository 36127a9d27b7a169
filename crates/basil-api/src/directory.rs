use basil_core::{DefaultOrganization, Directory, Organization};

use crate::client::{ApiError, PlantBackend};

pub const FALLBACK_STATUSES: [&str; 5] = ["active", "dormant", "harvested", "transit", "diseased"];

/// Fetch the organization directory and apply the access rules.
pub fn fetch_directory<B: PlantBackend + ?Sized>(
    backend: &B,
    default_org: &DefaultOrganization,
) -> Result<Directory, ApiError> {
    let fetched = backend.fetch_organizations()?;
    log::debug!("Fetched {} organizations", fetched.len());
    Ok(Directory::from_fetched(default_org.clone(), fetched))
}

/// Status options from the backend, or the built-in list.
pub fn statuses_or_fallback<B: PlantBackend + ?Sized>(backend: &B) -> Vec<String> {
    backend.fetch_statuses().unwrap_or_else(|e| {
        log::warn!("{e}; using built-in statuses");
        FALLBACK_STATUSES.iter().map(|s| s.to_string()).collect()
    })
}

/// Station types from the backend. Without them the station is free text,
/// so the fallback is empty.
pub fn station_types_or_fallback<B: PlantBackend + ?Sized>(backend: &B) -> Vec<String> {
    backend.fetch_station_types().unwrap_or_else(|e| {
        log::warn!("{e}; station will be entered as free text");
        Vec::new()
    })
}

/// The current directory snapshot and the organization acting on it.
///
/// The snapshot is fetched on first use and only again on [`refresh`].
/// Every refresh replaces the whole list before the selection is checked
/// against it.
///
/// [`refresh`]: DirectoryCache::refresh
pub struct DirectoryCache {
    default_org: DefaultOrganization,
    snapshot: Option<Directory>,
    selection: String,
}

impl DirectoryCache {
    /// `selection` defaults to the default organization.
    pub fn new(default_org: DefaultOrganization, selection: Option<String>) -> Self {
        let selection = selection.unwrap_or_else(|| default_org.id.clone());
        Self {
            default_org,
            snapshot: None,
            selection,
        }
    }

    /// The cached snapshot, fetching it if there is none yet.
    pub fn directory<B: PlantBackend + ?Sized>(&mut self, backend: &B) -> &Directory {
        if self.snapshot.is_none() {
            self.refresh(backend);
        }
        self.snapshot
            .get_or_insert_with(|| Directory::fallback(self.default_org.clone()))
    }

    /// Re-fetch the directory. Falls back to the built-in list when the
    /// backend is unavailable.
    pub fn refresh<B: PlantBackend + ?Sized>(&mut self, backend: &B) -> &Directory {
        let directory = match fetch_directory(backend, &self.default_org) {
            Ok(directory) => directory,
            Err(e) => {
                log::warn!("{e}; using built-in organization list");
                Directory::fallback(self.default_org.clone())
            }
        };
        let selection = directory.resolve_selection(&self.selection);
        if selection != self.selection {
            log::info!("Switched organization from '{}' to '{}'", self.selection, selection);
            self.selection = selection;
        }
        self.snapshot.insert(directory)
    }

    /// Drop the snapshot so the next [`directory`](Self::directory) call
    /// fetches again.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Switch organization. An id missing from the loaded snapshot is
    /// repaired right away.
    pub fn select(&mut self, org_id: &str) {
        self.selection = match &self.snapshot {
            Some(directory) => directory.resolve_selection(org_id),
            None => org_id.to_string(),
        };
    }

    /// The acting organization, after the snapshot is loaded and the
    /// selection repaired.
    pub fn current<B: PlantBackend + ?Sized>(&mut self, backend: &B) -> Option<Organization> {
        self.directory(backend);
        self.snapshot
            .as_ref()
            .and_then(|directory| directory.get(&self.selection))
            .cloned()
    }

    pub fn has_full_access<B: PlantBackend + ?Sized>(&mut self, backend: &B) -> bool {
        self.current(backend).is_some_and(|org| org.full_access)
    }

    pub fn resolve_name<B: PlantBackend + ?Sized>(&mut self, backend: &B, org_id: &str) -> String {
        self.directory(backend).resolve_name(org_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::PlantRecord;
    use serde_json::Value;
    use std::cell::{Cell, RefCell};

    /// In-memory backend that counts directory requests and records
    /// created plants.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub organizations: Option<Vec<Organization>>,
        pub statuses: Option<Vec<String>>,
        pub reject_create: bool,
        pub directory_requests: Cell<usize>,
        pub created: RefCell<Vec<Value>>,
    }

    impl FakeBackend {
        pub fn with_orgs(orgs: Vec<Organization>) -> Self {
            Self {
                organizations: Some(orgs),
                ..Default::default()
            }
        }
    }

    impl PlantBackend for FakeBackend {
        fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError> {
            self.directory_requests.set(self.directory_requests.get() + 1);
            self.organizations
                .clone()
                .ok_or_else(|| ApiError::DirectoryUnavailable {
                    resource: "Organization directory",
                    reason: "request timed out after 5s".to_string(),
                })
        }

        fn fetch_statuses(&self) -> Result<Vec<String>, ApiError> {
            self.statuses
                .clone()
                .ok_or_else(|| ApiError::DirectoryUnavailable {
                    resource: "Status list",
                    reason: "server returned 503 Service Unavailable".to_string(),
                })
        }

        fn fetch_station_types(&self) -> Result<Vec<String>, ApiError> {
            Err(ApiError::DirectoryUnavailable {
                resource: "Station type list",
                reason: "server returned 404 Not Found".to_string(),
            })
        }

        fn list_plants(&self) -> Result<Vec<PlantRecord>, ApiError> {
            Ok(Vec::new())
        }

        fn create_plant(&self, payload: &Value) -> Result<Option<Value>, ApiError> {
            if self.reject_create {
                return Err(ApiError::SubmissionFailed(
                    "server returned 500 Internal Server Error".to_string(),
                ));
            }
            self.created.borrow_mut().push(payload.clone());
            Ok(None)
        }
    }

    fn producer_and_retailer() -> Vec<Organization> {
        vec![
            Organization::new("Pittaluga", "").with_type("producer"),
            Organization::new("supermarket", "").with_type("retailer"),
        ]
    }

    #[test]
    fn test_directory_is_fetched_once() {
        let backend = FakeBackend::with_orgs(producer_and_retailer());
        let mut cache = DirectoryCache::new(DefaultOrganization::default(), None);
        cache.directory(&backend);
        cache.directory(&backend);
        assert!(cache.has_full_access(&backend));
        assert_eq!(backend.directory_requests.get(), 1);

        cache.refresh(&backend);
        assert_eq!(backend.directory_requests.get(), 2);

        cache.invalidate();
        cache.directory(&backend);
        assert_eq!(backend.directory_requests.get(), 3);
    }

    #[test]
    fn test_unknown_selection_is_repaired_on_load() {
        let backend = FakeBackend::with_orgs(producer_and_retailer());
        let mut cache =
            DirectoryCache::new(DefaultOrganization::default(), Some("unknown".to_string()));
        cache.directory(&backend);
        assert_eq!(cache.selection(), "Pittaluga");
        assert!(cache.has_full_access(&backend));
    }

    #[test]
    fn test_unavailable_directory_uses_fallback() {
        let backend = FakeBackend::default();
        let mut cache =
            DirectoryCache::new(DefaultOrganization::default(), Some("supermarket".to_string()));
        let directory = cache.directory(&backend);
        assert!(directory.is_fallback());
        assert_eq!(
            directory.organizations(),
            DefaultOrganization::default().fallback_directory().as_slice()
        );
        assert_eq!(cache.selection(), "supermarket");
        assert!(!cache.has_full_access(&backend));
    }

    #[test]
    fn test_refresh_replaces_whole_list() {
        let mut backend = FakeBackend::with_orgs(producer_and_retailer());
        let mut cache =
            DirectoryCache::new(DefaultOrganization::default(), Some("supermarket".to_string()));
        cache.directory(&backend);

        backend.organizations = Some(vec![Organization::new("kiosk", "Kiosk").with_type("retailer")]);
        let directory = cache.refresh(&backend);
        assert_eq!(directory.organizations().len(), 1);
        assert_eq!(cache.selection(), "kiosk");
    }

    #[test]
    fn test_select_repairs_against_loaded_snapshot() {
        let backend = FakeBackend::with_orgs(producer_and_retailer());
        let mut cache = DirectoryCache::new(DefaultOrganization::default(), None);
        cache.select("supermarket");
        assert!(!cache.has_full_access(&backend));
        cache.select("nobody");
        assert_eq!(cache.selection(), "Pittaluga");
    }

    #[test]
    fn test_lookup_fallbacks() {
        let backend = FakeBackend::default();
        assert_eq!(statuses_or_fallback(&backend), FALLBACK_STATUSES);
        assert!(station_types_or_fallback(&backend).is_empty());

        let backend = FakeBackend {
            statuses: Some(vec!["growing".to_string()]),
            ..Default::default()
        };
        assert_eq!(statuses_or_fallback(&backend), vec!["growing"]);
    }
}
