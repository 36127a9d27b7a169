use serde::Serialize;

pub const CREATE_PLANT_TRACKING: &str = "Create Plant Tracking";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub title: &'static str,
    pub description: &'static str,
    pub requires_full_access: bool,
}

impl Operation {
    /// Limited access organizations can only run operations that do not
    /// require full access.
    pub fn is_enabled(&self, full_access: bool) -> bool {
        !self.requires_full_access || full_access
    }
}

pub static OPERATIONS: [Operation; 6] = [
    Operation {
        title: CREATE_PLANT_TRACKING,
        description: "Create a new plant with QR code and organization ownership",
        requires_full_access: false,
    },
    Operation {
        title: "Stop Plant Tracking",
        description: "Delete plant tracking for existing QR code",
        requires_full_access: false,
    },
    Operation {
        title: "Update Plant State",
        description: "Update the state and GPS of an existing plant",
        requires_full_access: true,
    },
    Operation {
        title: "Get Plant State",
        description: "View the current state of a plant",
        requires_full_access: false,
    },
    Operation {
        title: "Get Plant History",
        description: "View the complete history of a plant",
        requires_full_access: false,
    },
    Operation {
        title: "Transfer Ownership",
        description: "Transfer plant ownership to another organization",
        requires_full_access: true,
    },
];

/// An operation as shown to the current organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationCard {
    #[serde(flatten)]
    pub operation: Operation,
    pub enabled: bool,
}

pub fn find(title: &str) -> Option<&'static Operation> {
    OPERATIONS
        .iter()
        .find(|op| op.title.eq_ignore_ascii_case(title.trim()))
}

pub fn cards(full_access: bool) -> Vec<OperationCard> {
    OPERATIONS
        .iter()
        .map(|op| OperationCard {
            operation: *op,
            enabled: op.is_enabled(full_access),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_titles(full_access: bool) -> Vec<&'static str> {
        cards(full_access)
            .into_iter()
            .filter(|card| card.enabled)
            .map(|card| card.operation.title)
            .collect()
    }

    #[test]
    fn test_full_access_enables_everything() {
        assert_eq!(enabled_titles(true).len(), OPERATIONS.len());
    }

    #[test]
    fn test_limited_access_disables_mutations() {
        insta::assert_snapshot!(
            enabled_titles(false).join(", "),
            @"Create Plant Tracking, Stop Plant Tracking, Get Plant State, Get Plant History"
        );
    }

    #[test]
    fn test_find_ignores_case() {
        let op = find("  transfer ownership").unwrap();
        assert!(op.requires_full_access);
        assert_eq!(find(CREATE_PLANT_TRACKING).unwrap().title, CREATE_PLANT_TRACKING);
        assert!(find("Water Plant").is_none());
    }
}
