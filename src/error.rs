//! Error types for the form and its two HTTP clients.
//!
//! `UploadError` and `ApiError` keep the transport cause; `FormError` is what the
//! form shows to the user.

use thiserror::Error;

/// Everything the form can report to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("You must upload at least one image")]
    NoImages,
    #[error("Discount price must be lower than regular price")]
    DiscountAboveRegular,
    #[error("{label} is required")]
    MissingField { label: &'static str },
    #[error("Select at least one image to upload")]
    NoFilesSelected,
    #[error("You can only upload 6 images per listing")]
    TooManyImages,
    #[error("Image upload failed (2 MB max per image)")]
    UploadFailed,
    /// `success: false` from the backend; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(String),
    #[error("{label} must be a number")]
    InvalidNumber { label: &'static str },
    #[error("{label} is out of range")]
    OutOfRange { label: &'static str },
    #[error("Invalid value for {label}")]
    InvalidInput { label: &'static str },
}

/// Failure of a single image upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("image host returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("image host response had no secure_url")]
    MissingUrl,
}

/// Failure of a create-listing call below the application level.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error("listing response did not include an id")]
    MissingId,
}
