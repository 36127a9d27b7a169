//! # basil-core
//!
//! The decision logic behind the basil plant tracker, independent of any
//! transport or terminal: which organizations get full access, which
//! operations they may run, how QR codes are issued, and how a filled-in
//! plant form turns into a create request body.
//!
//! ```rust
//! use basil_core::{CodeGenerator, DefaultOrganization, Directory, Organization};
//!
//! let directory = Directory::from_fetched(
//!     DefaultOrganization::default(),
//!     vec![
//!         Organization::new("Pittaluga", "Pittaluga").with_type("producer"),
//!         Organization::new("supermarket", "Supermarket").with_type("retailer"),
//!     ],
//! );
//! assert_eq!(directory.resolve_selection("unknown"), "Pittaluga");
//!
//! let mut codes = CodeGenerator::new();
//! assert_eq!(codes.generate().len(), 5);
//! ```

pub mod catalog;
pub mod code;
pub mod org;
pub mod plant;

pub use catalog::{Operation, OperationCard, CREATE_PLANT_TRACKING, OPERATIONS};
pub use code::{CodeGenerator, CODE_MAX, CODE_MIN, CODE_SPACE};
pub use org::{DefaultOrganization, Directory, Organization};
pub use plant::{
    DraftError, DraftField, Owner, PayloadStrategy, PlantDraft, TransportRecord,
};
