use super::ImageHost;
use crate::error::UploadError;
use crate::model::ImageFile;
use reqwest::multipart::{Form, Part};

const CLOUD_NAME: &str = "dxv0d8lce";
const UPLOAD_PRESET: &str = "mern-state";

/// Unsigned uploads to the Cloudinary account backing the listing site.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CloudinaryClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_endpoint(
            http,
            format!("https://api.cloudinary.com/v1_1/{CLOUD_NAME}/image/upload"),
        )
    }

    pub(crate) fn with_endpoint(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ImageHost for CloudinaryClient {
    async fn upload(&self, file: ImageFile) -> Result<String, UploadError> {
        let size = file.bytes.len();
        tracing::debug!(
            file = %file.file_name,
            size,
            endpoint = self.endpoint(),
            "uploading image"
        );

        let part = Part::stream_with_length(file.bytes, size as u64).file_name(file.file_name);
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", UPLOAD_PRESET)
            .text("cloud_name", CLOUD_NAME);

        let resp = self.http.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: serde_json::Value = resp.json().await?;
        secure_url(&body)
    }
}

/// Pull `secure_url` out of an upload response.
fn secure_url(body: &serde_json::Value) -> Result<String, UploadError> {
    body.get("secure_url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(UploadError::MissingUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_server::serve_once;
    use serde_json::json;

    #[tokio::test]
    async fn upload_posts_multipart_form_to_endpoint() {
        let (base, server) =
            serve_once(200, r#"{"secure_url":"https://res.cloudinary.com/x.jpg"}"#).await;
        let c = CloudinaryClient::with_endpoint(
            reqwest::Client::new(),
            format!("{base}/v1_1/dxv0d8lce/image/upload"),
        );

        let url = c
            .upload(ImageFile::new("house.jpg", b"JPEGDATA".to_vec()))
            .await
            .unwrap();
        assert_eq!(url, "https://res.cloudinary.com/x.jpg");

        let seen = server.await.unwrap();
        assert!(seen.head.starts_with("post /v1_1/dxv0d8lce/image/upload "));
        assert!(seen.head.contains("content-type: multipart/form-data; boundary="));
        let body = seen.body_text().to_ascii_lowercase();
        assert!(body.contains(r#"name="file"; filename="house.jpg""#));
        assert!(body.contains("jpegdata"));
        assert!(body.contains("name=\"upload_preset\"\r\n\r\nmern-state\r\n"));
        assert!(body.contains("name=\"cloud_name\"\r\n\r\ndxv0d8lce\r\n"));
    }

    #[tokio::test]
    async fn non_success_status_fails_upload() {
        let (base, server) =
            serve_once(400, r#"{"error":{"message":"File size too large"}}"#).await;
        let c = CloudinaryClient::with_endpoint(reqwest::Client::new(), base);

        let err = c
            .upload(ImageFile::new("big.jpg", vec![0u8; 16]))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Status { status: 400, .. }));
        server.await.unwrap();
    }

    #[test]
    fn endpoint_targets_fixed_cloud() {
        let c = CloudinaryClient::new(reqwest::Client::new());
        assert_eq!(
            c.endpoint(),
            "https://api.cloudinary.com/v1_1/dxv0d8lce/image/upload"
        );
    }

    #[test]
    fn secure_url_is_extracted() {
        let body = json!({
            "public_id": "abc",
            "url": "http://res.cloudinary.com/x.jpg",
            "secure_url": "https://res.cloudinary.com/x.jpg"
        });
        assert_eq!(
            secure_url(&body).unwrap(),
            "https://res.cloudinary.com/x.jpg"
        );
    }

    #[test]
    fn missing_secure_url_is_an_error() {
        let body = json!({ "error": { "message": "File size too large" } });
        assert!(matches!(secure_url(&body), Err(UploadError::MissingUrl)));
        assert!(matches!(
            secure_url(&json!({ "secure_url": "" })),
            Err(UploadError::MissingUrl)
        ));
    }
}
