//! The "Create Plant Tracking" form.
//!
//! Opening the form issues a fresh QR code and stamps the draft with the
//! acting organization. A failed submission keeps every field so the same
//! draft can be sent again. A successful one discards the draft and closes
//! the form, so a code is never posted twice.

use basil_core::{CodeGenerator, DraftField, Owner, PayloadStrategy, PlantDraft};
use rand::Rng;
use serde_json::Value;

use crate::client::{ApiError, PlantBackend};
use crate::directory::{statuses_or_fallback, DirectoryCache};

pub struct PlantForm {
    draft: PlantDraft,
    status_options: Vec<String>,
    submitted: bool,
}

impl PlantForm {
    pub fn open<R, B>(codes: &mut CodeGenerator<R>, cache: &mut DirectoryCache, backend: &B) -> Self
    where
        R: Rng,
        B: PlantBackend + ?Sized,
    {
        let code = codes.generate();
        // Loading the directory may repair the selection.
        cache.directory(backend);
        let org_id = cache.selection().to_string();
        let owner = Owner {
            name: cache.resolve_name(backend, &org_id),
            org_id,
        };
        let status_options = statuses_or_fallback(backend);
        log::debug!("Opened plant form with code {} for {}", code, owner.org_id);

        let mut form = Self {
            draft: PlantDraft::new(code, owner),
            status_options,
            submitted: false,
        };
        form.apply_default_status();
        form
    }

    pub fn draft(&self) -> &PlantDraft {
        &self.draft
    }

    pub fn code(&self) -> &str {
        &self.draft.code
    }

    pub fn owner(&self) -> &Owner {
        &self.draft.owner
    }

    pub fn status_options(&self) -> &[String] {
        &self.status_options
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Whether the draft has been registered and the form closed.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Send the draft to the backend.
    ///
    /// On success the draft is cleared, the form is closed, and the created
    /// record (if the backend returned one) is handed back. On any error the
    /// draft is left exactly as it was. A closed form refuses to submit.
    pub fn submit<B: PlantBackend + ?Sized>(
        &mut self,
        backend: &B,
        strategy: PayloadStrategy,
    ) -> Result<Option<Value>, ApiError> {
        if self.submitted {
            return Err(ApiError::FormClosed(self.draft.code.clone()));
        }
        let timestamp = chrono::Utc::now().timestamp_millis();
        let payload = self.draft.to_payload(strategy, timestamp)?;
        let created = backend.create_plant(&payload)?;
        log::info!("Registered plant {} to {}", self.draft.code, self.draft.owner.name);
        self.draft.clear();
        self.submitted = true;
        Ok(created)
    }

    /// Close the form without submitting.
    pub fn cancel(self) -> PlantDraft {
        self.draft
    }

    fn apply_default_status(&mut self) {
        if self.draft.status.is_empty() {
            if let Some(first) = self.status_options.first() {
                self.draft.status = first.clone();
            }
        }
    }
}
