//! The "Create a Listing" form.
//!
//! `FormState` holds the draft and UI flags. `upload_batch` is the parallel image upload.
//! `FormController` ties both to the image host, listing API and current user for callers
//! that drive the whole flow from one task.

mod state;

pub use state::FormState;

use crate::client::{ImageHost, ListingApi};
use crate::error::FormError;
use crate::model::{FieldId, ImageFile, InputValue};
use crate::session::CurrentUser;
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// Upload every file concurrently. URLs come back in input order; the first failure fails
/// the whole batch and its cause is logged before being collapsed into `UploadFailed`.
pub async fn upload_batch<H: ImageHost>(
    host: &H,
    files: Vec<ImageFile>,
) -> Result<Vec<String>, FormError> {
    let uploads = files.into_iter().map(|f| host.upload(f));
    try_join_all(uploads).await.map_err(|e| {
        tracing::warn!(error = %e, "image upload failed");
        FormError::UploadFailed
    })
}

/// Read local files then upload them as one batch. An unreadable file fails the batch.
pub async fn upload_paths<H: ImageHost>(
    host: &H,
    paths: Vec<PathBuf>,
) -> Result<Vec<String>, FormError> {
    let reads = paths.into_iter().map(|p| async move {
        ImageFile::read(&p).await.map_err(|source| {
            tracing::warn!(path = %p.display(), error = %source, "could not read image");
            FormError::UploadFailed
        })
    });
    let files = try_join_all(reads).await?;
    upload_batch(host, files).await
}

/// Owns the form state together with its collaborators.
pub struct FormController<H, A> {
    state: FormState,
    host: Arc<H>,
    api: Arc<A>,
    user: CurrentUser,
}

impl<H: ImageHost, A: ListingApi> FormController<H, A> {
    pub fn new(host: Arc<H>, api: Arc<A>, user: CurrentUser) -> Self {
        Self {
            state: FormState::new(),
            host,
            api,
            user,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn change(&mut self, field: FieldId, input: InputValue) -> Result<(), FormError> {
        self.state.change(field, input)
    }

    #[cfg(test)]
    pub async fn upload_images(&mut self, files: Vec<ImageFile>) -> Result<(), FormError> {
        self.state.begin_upload(files.len())?;
        let result = upload_batch(self.host.as_ref(), files).await;
        self.finish_upload(result)
    }

    pub async fn upload_image_paths(&mut self, paths: Vec<PathBuf>) -> Result<(), FormError> {
        self.state.begin_upload(paths.len())?;
        let result = upload_paths(self.host.as_ref(), paths).await;
        self.finish_upload(result)
    }

    fn finish_upload(&mut self, result: Result<Vec<String>, FormError>) -> Result<(), FormError> {
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.state.finish_upload(result);
        outcome
    }

    /// Validate, post the listing and return the route of the new listing.
    pub async fn submit(&mut self) -> Result<String, FormError> {
        let req = self.state.begin_submit(&self.user)?;
        let result = self.api.create(&req).await;
        self.state.finish_submit(result)
    }
}
