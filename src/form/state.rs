//! Form state and its transitions.
//!
//! Nothing here performs I/O. Each async operation is split into a `begin_*` step that
//! validates and flips the busy flag, and a `finish_*` step that applies the result, so
//! the owner of the state can run the network part wherever it likes.

use crate::error::{ApiError, FormError};
use crate::model::{
    listing_route, CreateListingRequest, CreateListingResponse, FieldId, FieldUpdate, InputValue,
    ListingDraft, MAX_IMAGES,
};
use crate::session::CurrentUser;

#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: ListingDraft,
    uploading: bool,
    loading: bool,
    error: Option<FormError>,
    image_upload_error: Option<FormError>,
    navigated: Option<String>,
    created: Option<serde_json::Value>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn uploading(&self) -> bool {
        self.uploading
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    pub fn image_upload_error(&self) -> Option<&FormError> {
        self.image_upload_error.as_ref()
    }

    /// Route of the created listing once submission succeeded.
    pub fn navigated(&self) -> Option<&str> {
        self.navigated.as_deref()
    }

    /// The listing as stored by the backend, once created.
    pub fn created_listing(&self) -> Option<&serde_json::Value> {
        self.created.as_ref()
    }

    /// Mirrors the disabled states of the upload and submit buttons.
    pub fn can_upload(&self) -> bool {
        !self.uploading && self.navigated.is_none()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.uploading && self.navigated.is_none()
    }

    /// Parse raw input for `field` and apply it. Invalid input leaves the draft untouched.
    pub fn change(&mut self, field: FieldId, input: InputValue) -> Result<(), FormError> {
        let update = field.parse(input)?;
        self.apply(update);
        Ok(())
    }

    pub fn apply(&mut self, update: FieldUpdate) {
        self.draft.apply(update);
    }

    /// Check a batch of `count` files against the image limit and mark the form as uploading.
    pub fn begin_upload(&mut self, count: usize) -> Result<(), FormError> {
        let err = if count == 0 {
            Some(FormError::NoFilesSelected)
        } else if count + self.draft.image_urls.len() > MAX_IMAGES {
            Some(FormError::TooManyImages)
        } else {
            None
        };
        if let Some(e) = err {
            self.image_upload_error = Some(e.clone());
            return Err(e);
        }
        self.uploading = true;
        self.image_upload_error = None;
        Ok(())
    }

    /// Apply a finished batch. A failed batch contributes nothing.
    pub fn finish_upload(&mut self, result: Result<Vec<String>, FormError>) {
        self.uploading = false;
        match result {
            Ok(urls) => {
                tracing::info!(added = urls.len(), "images uploaded");
                self.draft.image_urls.extend(urls);
            }
            Err(e) => self.image_upload_error = Some(e),
        }
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.draft.image_urls.len() {
            self.draft.image_urls.remove(index);
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        let d = &self.draft;
        if d.image_urls.is_empty() {
            return Err(FormError::NoImages);
        }
        if d.discount_price > d.regular_price {
            return Err(FormError::DiscountAboveRegular);
        }
        for field in [FieldId::Name, FieldId::Description, FieldId::Address] {
            if d.text(field).trim().is_empty() {
                return Err(FormError::MissingField {
                    label: field.label(),
                });
            }
        }
        Ok(())
    }

    /// Validate the draft and, if it passes, enter the loading state and return the request body.
    pub fn begin_submit(&mut self, user: &CurrentUser) -> Result<CreateListingRequest, FormError> {
        if let Err(e) = self.validate() {
            self.error = Some(e.clone());
            return Err(e);
        }
        self.loading = true;
        self.error = None;
        Ok(CreateListingRequest {
            listing: self.draft.clone(),
            user_ref: user.id.clone(),
        })
    }

    /// Apply the backend's answer. Returns the route to navigate to on success.
    pub fn finish_submit(
        &mut self,
        result: Result<CreateListingResponse, ApiError>,
    ) -> Result<String, FormError> {
        self.loading = false;
        let err = match result {
            Ok(CreateListingResponse::Created { id, body }) => {
                let route = listing_route(&id);
                tracing::info!(%route, "listing created");
                self.navigated = Some(route.clone());
                self.created = Some(body);
                return Ok(route);
            }
            Ok(CreateListingResponse::Rejected { message }) => {
                tracing::warn!(%message, "listing rejected by server");
                FormError::Rejected(message)
            }
            Err(e) => {
                tracing::warn!(error = %e, "listing request failed");
                FormError::Transport(e.to_string())
            }
        };
        self.error = Some(err.clone());
        Err(err)
    }
}
