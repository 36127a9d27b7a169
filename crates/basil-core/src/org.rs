//! Organization directory rules
//!
//! A directory is always replaced as a whole: either a freshly fetched list
//! that went through [`DefaultOrganization::normalize`], or the built-in
//! fallback list. Entries are never merged across snapshots.

use serde::{Deserialize, Serialize};

/// A single organization as the backend reports it, plus the derived
/// access flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub full_access: bool,
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: None,
            full_access: false,
        }
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_full_access(mut self, full_access: bool) -> Self {
        self.full_access = full_access;
        self
    }

    /// Name shown to users; entries reported without a name show their id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// The one organization that keeps full access whatever type the backend
/// reports for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DefaultOrganizationFields")]
pub struct DefaultOrganization {
    pub id: String,
    pub name: String,
}

/// `name` may be omitted in config, in which case it is the id.
#[derive(Deserialize)]
struct DefaultOrganizationFields {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

impl From<DefaultOrganizationFields> for DefaultOrganization {
    fn from(fields: DefaultOrganizationFields) -> Self {
        let name = fields.name.unwrap_or_else(|| fields.id.clone());
        Self {
            id: fields.id,
            name,
        }
    }
}

impl Default for DefaultOrganization {
    fn default() -> Self {
        Self {
            id: "Pittaluga".to_string(),
            name: "Pittaluga".to_string(),
        }
    }
}

impl DefaultOrganization {
    /// True if `org` denotes the default organization: same id ignoring
    /// case, or a name containing the default name ignoring case.
    pub fn matches(&self, org: &Organization) -> bool {
        self.matches_id(org) || self.matches_name(org)
    }

    fn matches_id(&self, org: &Organization) -> bool {
        org.id.to_lowercase() == self.id.to_lowercase()
    }

    fn matches_name(&self, org: &Organization) -> bool {
        !self.name.is_empty() && org.name.to_lowercase().contains(&self.name.to_lowercase())
    }

    /// Apply the access rules to one fetched entry.
    ///
    /// The default organization gets the canonical id and full access. Any
    /// other entry with a `type` is full access only for producers. Entries
    /// without a `type` keep the flag they arrived with.
    pub fn normalize(&self, org: Organization) -> Organization {
        if self.matches(&org) {
            self.promote(org)
        } else {
            apply_type_access(org)
        }
    }

    fn promote(&self, mut org: Organization) -> Organization {
        org.id = self.id.clone();
        org.full_access = true;
        org
    }

    /// Static two-entry list used before the first fetch and whenever the
    /// directory endpoint is unavailable.
    pub fn fallback_directory(&self) -> Vec<Organization> {
        vec![
            Organization::new(self.id.clone(), self.name.clone()).with_full_access(true),
            Organization::new("supermarket", "Supermarket").with_full_access(false),
        ]
    }
}

/// Entries with a `type` are full access only for producers. Entries
/// without one keep the flag they arrived with.
fn apply_type_access(mut org: Organization) -> Organization {
    if let Some(kind) = &org.kind {
        org.full_access = kind.to_lowercase() == "producer";
    }
    org
}

/// One snapshot of the organization directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    #[serde(skip)]
    default_org: DefaultOrganization,
    organizations: Vec<Organization>,
    fallback: bool,
}

impl Directory {
    /// Build a snapshot from entries returned by the backend.
    ///
    /// At most one entry becomes the default organization: the first whose
    /// id matches, else the first whose name matches. Every other entry is
    /// judged by its type alone, so the canonical id is never duplicated.
    pub fn from_fetched(default_org: DefaultOrganization, fetched: Vec<Organization>) -> Self {
        let default_index = fetched
            .iter()
            .position(|org| default_org.matches_id(org))
            .or_else(|| fetched.iter().position(|org| default_org.matches_name(org)));
        let organizations = fetched
            .into_iter()
            .enumerate()
            .map(|(index, org)| {
                if Some(index) == default_index {
                    default_org.promote(org)
                } else {
                    apply_type_access(org)
                }
            })
            .collect();
        Self {
            default_org,
            organizations,
            fallback: false,
        }
    }

    pub fn fallback(default_org: DefaultOrganization) -> Self {
        let organizations = default_org.fallback_directory();
        Self {
            default_org,
            organizations,
            fallback: true,
        }
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn default_org(&self) -> &DefaultOrganization {
        &self.default_org
    }

    /// Whether this snapshot is the built-in list rather than fetched data.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn get(&self, org_id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.id == org_id)
    }

    pub fn contains(&self, org_id: &str) -> bool {
        self.get(org_id).is_some()
    }

    /// Display name for `org_id`, or the id itself when it is unknown.
    pub fn resolve_name(&self, org_id: &str) -> String {
        self.get(org_id)
            .map(|org| org.display_name().to_string())
            .unwrap_or_else(|| org_id.to_string())
    }

    pub fn has_full_access(&self, org_id: &str) -> bool {
        self.get(org_id).is_some_and(|org| org.full_access)
    }

    /// The selection to use against this snapshot.
    ///
    /// A selection present in the list is kept. Otherwise the default id
    /// wins, then the first full access entry, then the first entry. An
    /// empty directory keeps the current selection.
    pub fn resolve_selection(&self, current: &str) -> String {
        if self.contains(current) {
            return current.to_string();
        }
        let repaired = self
            .get(&self.default_org.id)
            .or_else(|| self.organizations.iter().find(|org| org.full_access))
            .or_else(|| self.organizations.first());
        match repaired {
            Some(org) => {
                log::debug!("Selection '{}' not in directory, using '{}'", current, org.id);
                org.id.clone()
            }
            None => current.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(entries: &[(&str, &str, Option<&str>)]) -> Vec<Organization> {
        entries
            .iter()
            .map(|(id, name, kind)| {
                let org = Organization::new(*id, *name);
                match kind {
                    Some(kind) => org.with_type(*kind),
                    None => org,
                }
            })
            .collect()
    }

    #[test]
    fn test_default_org_always_has_full_access() {
        let default_org = DefaultOrganization::default();
        for kind in ["retailer", "producer", "carrier", ""] {
            let org = Organization::new("pittaluga", "").with_type(kind);
            let normalized = default_org.normalize(org);
            assert!(normalized.full_access, "type '{kind}' must not limit the default org");
            assert_eq!(normalized.id, "Pittaluga");
        }
    }

    #[test]
    fn test_default_org_matched_by_name_substring() {
        let default_org = DefaultOrganization::default();
        let org = Organization::new("org-17", "Fratelli PITTALUGA s.r.l.").with_type("retailer");
        let normalized = default_org.normalize(org);
        assert_eq!(normalized.id, "Pittaluga");
        assert!(normalized.full_access);
    }

    #[test]
    fn test_type_decides_access_for_other_orgs() {
        let default_org = DefaultOrganization::default();
        let producer = default_org.normalize(Organization::new("farm", "Farm").with_type("Producer"));
        let retailer = default_org.normalize(
            Organization::new("shop", "Shop")
                .with_type("retailer")
                .with_full_access(true),
        );
        let carrier = default_org.normalize(Organization::new("truck", "Truck").with_type("carrier"));
        assert!(producer.full_access);
        assert!(!retailer.full_access);
        assert!(!carrier.full_access);
    }

    #[test]
    fn test_missing_type_keeps_reported_access() {
        let default_org = DefaultOrganization::default();
        let full = default_org.normalize(Organization::new("a", "A").with_full_access(true));
        let limited = default_org.normalize(Organization::new("b", "B"));
        assert!(full.full_access);
        assert!(!limited.full_access);
    }

    #[test]
    fn test_empty_default_name_does_not_match_everything() {
        let default_org = DefaultOrganization {
            id: "hq".to_string(),
            name: String::new(),
        };
        let org = default_org.normalize(Organization::new("shop", "Shop").with_type("retailer"));
        assert_eq!(org.id, "shop");
        assert!(!org.full_access);
    }

    #[test]
    fn test_unknown_selection_is_repaired_to_default() {
        let directory = Directory::from_fetched(
            DefaultOrganization::default(),
            fetched(&[
                ("Pittaluga", "", Some("producer")),
                ("supermarket", "", Some("retailer")),
            ]),
        );
        assert_eq!(directory.resolve_selection("unknown"), "Pittaluga");
        assert!(directory.has_full_access("Pittaluga"));
        assert!(!directory.has_full_access("supermarket"));
    }

    #[test]
    fn test_selection_repair_prefers_full_access_then_first() {
        let default_org = DefaultOrganization::default();
        let directory = Directory::from_fetched(
            default_org.clone(),
            fetched(&[
                ("shop", "Shop", Some("retailer")),
                ("farm", "Farm", Some("producer")),
            ]),
        );
        assert_eq!(directory.resolve_selection("gone"), "farm");

        let directory = Directory::from_fetched(
            default_org,
            fetched(&[
                ("shop", "Shop", Some("retailer")),
                ("kiosk", "Kiosk", Some("retailer")),
            ]),
        );
        assert_eq!(directory.resolve_selection("gone"), "shop");
    }

    #[test]
    fn test_present_selection_is_kept() {
        let directory = Directory::fallback(DefaultOrganization::default());
        assert_eq!(directory.resolve_selection("supermarket"), "supermarket");
    }

    #[test]
    fn test_empty_directory_keeps_selection() {
        let directory = Directory::from_fetched(DefaultOrganization::default(), Vec::new());
        assert_eq!(directory.resolve_selection("shop"), "shop");
    }

    #[test]
    fn test_resolve_name_falls_back_to_id() {
        let directory = Directory::from_fetched(
            DefaultOrganization::default(),
            fetched(&[("shop", "Corner Shop", None), ("anon", "", None)]),
        );
        assert_eq!(directory.resolve_name("shop"), "Corner Shop");
        assert_eq!(directory.resolve_name("anon"), "anon");
        assert_eq!(directory.resolve_name("missing"), "missing");
    }

    #[test]
    fn test_fallback_directory() {
        let directory = Directory::fallback(DefaultOrganization::default());
        assert!(directory.is_fallback());
        let ids: Vec<_> = directory
            .organizations()
            .iter()
            .map(|org| (org.id.as_str(), org.full_access))
            .collect();
        assert_eq!(ids, vec![("Pittaluga", true), ("supermarket", false)]);
    }

    #[test]
    fn test_only_one_entry_becomes_default() {
        let directory = Directory::from_fetched(
            DefaultOrganization::default(),
            fetched(&[
                ("Pittaluga", "Pittaluga", Some("producer")),
                ("pitt-retail", "Pittaluga Retail", Some("retailer")),
            ]),
        );
        let entries: Vec<_> = directory
            .organizations()
            .iter()
            .map(|org| (org.id.as_str(), org.full_access))
            .collect();
        assert_eq!(entries, vec![("Pittaluga", true), ("pitt-retail", false)]);
        assert_eq!(directory.resolve_name("pitt-retail"), "Pittaluga Retail");
    }

    #[test]
    fn test_id_match_wins_over_earlier_name_match() {
        let directory = Directory::from_fetched(
            DefaultOrganization::default(),
            fetched(&[
                ("pitt-retail", "Pittaluga Retail", Some("retailer")),
                ("PITTALUGA", "Head Office", Some("retailer")),
            ]),
        );
        assert_eq!(directory.resolve_name("Pittaluga"), "Head Office");
        assert!(directory.has_full_access("Pittaluga"));
        assert!(!directory.has_full_access("pitt-retail"));
    }

    #[test]
    fn test_default_org_name_defaults_to_id() {
        let default_org: DefaultOrganization = serde_json::from_str(r#"{"id":"hq"}"#).unwrap();
        assert_eq!(
            default_org,
            DefaultOrganization {
                id: "hq".to_string(),
                name: "hq".to_string(),
            }
        );
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let orgs: Vec<Organization> = serde_json::from_str(
            r#"[{"id":"farm","name":"Farm","type":"producer"},{"id":"shop","fullAccess":true}]"#,
        )
        .unwrap();
        assert_eq!(orgs[0].kind.as_deref(), Some("producer"));
        assert!(!orgs[0].full_access);
        assert_eq!(orgs[1].name, "");
        assert!(orgs[1].full_access);
    }
}
