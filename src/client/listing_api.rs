use super::ListingApi;
use crate::error::ApiError;
use crate::model::{CreateListingRequest, CreateListingResponse};
use reqwest::header::COOKIE;

const CREATE_PATH: &str = "/api/listing/create";

/// Client for the estate backend's listing API.
#[derive(Clone)]
pub struct ListingApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ListingApiClient {
    pub fn new(http: reqwest::Client, base_url: &str, access_token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    pub fn create_url(&self) -> String {
        format!("{}{}", self.base_url, CREATE_PATH)
    }
}

impl ListingApi for ListingApiClient {
    async fn create(&self, req: &CreateListingRequest) -> Result<CreateListingResponse, ApiError> {
        let url = self.create_url();
        tracing::debug!(%url, images = req.listing.image_urls.len(), "creating listing");

        let mut builder = self.http.post(&url).json(req);
        if let Some(token) = self.access_token.as_deref() {
            builder = builder.header(COOKIE, format!("access_token={token}"));
        }
        let resp = builder.send().await?;
        // The backend reports failures in the body; the status code is not consulted.
        let status = resp.status();
        let bytes = resp.bytes().await?;
        tracing::debug!(status = status.as_u16(), "listing response received");
        parse_create_response(&bytes)
    }
}

/// Interpret a create response body: `success: false` is a rejection, otherwise `_id` is required.
pub(crate) fn parse_create_response(body: &[u8]) -> Result<CreateListingResponse, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if value.get("success").and_then(|v| v.as_bool()) == Some(false) {
        let message = value
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Listing creation failed")
            .to_string();
        return Ok(CreateListingResponse::Rejected { message });
    }
    let id = match value.get("_id") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(ApiError::MissingId),
    };
    Ok(CreateListingResponse::Created { id, body: value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_server::serve_once;
    use crate::model::ListingDraft;

    fn request() -> CreateListingRequest {
        CreateListingRequest {
            listing: ListingDraft {
                name: "Loft".into(),
                description: "Bright".into(),
                address: "1 Main St".into(),
                image_urls: vec!["https://res.cloudinary.com/a.jpg".into()],
                ..ListingDraft::default()
            },
            user_ref: "u1".into(),
        }
    }

    #[tokio::test]
    async fn create_posts_json_with_session_cookie() {
        let (base, server) = serve_once(201, r#"{"_id":"abc123","name":"Loft"}"#).await;
        let c = ListingApiClient::new(reqwest::Client::new(), &base, Some("tok".into()));

        let resp = c.create(&request()).await.unwrap();
        assert!(matches!(resp, CreateListingResponse::Created { ref id, .. } if id == "abc123"));

        let seen = server.await.unwrap();
        assert!(seen.head.starts_with("post /api/listing/create "));
        assert!(seen.head.contains("content-type: application/json"));
        assert!(seen.head.contains("cookie: access_token=tok"));

        let body: serde_json::Value = serde_json::from_slice(&seen.body).unwrap();
        let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "address",
                "bathrooms",
                "bedrooms",
                "description",
                "discountPrice",
                "furnished",
                "imageUrls",
                "name",
                "offer",
                "parking",
                "regularPrice",
                "type",
                "userRef",
            ]
        );
        assert_eq!(body["type"], "rent");
        assert_eq!(body["userRef"], "u1");
        assert_eq!(body["imageUrls"][0], "https://res.cloudinary.com/a.jpg");
    }

    #[tokio::test]
    async fn rejection_wins_over_status_and_no_cookie_without_token() {
        let (base, server) =
            serve_once(401, r#"{"success":false,"message":"Unauthorized"}"#).await;
        let c = ListingApiClient::new(reqwest::Client::new(), &base, None);

        let resp = c.create(&request()).await.unwrap();
        assert_eq!(
            resp,
            CreateListingResponse::Rejected {
                message: "Unauthorized".into()
            }
        );
        let seen = server.await.unwrap();
        assert!(!seen.head.contains("cookie:"));
    }

    #[test]
    fn numeric_id_is_accepted() {
        match parse_create_response(br#"{"_id":42}"#).unwrap() {
            CreateListingResponse::Created { id, .. } => assert_eq!(id, "42"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decode_error_keeps_parser_message() {
        let raw = b"<html>502</html>";
        let expected = serde_json::from_slice::<serde_json::Value>(raw)
            .unwrap_err()
            .to_string();
        let err = parse_create_response(raw).unwrap_err();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn rejection_carries_server_message() {
        let body = br#"{"success":false,"statusCode":401,"message":"Unauthorized"}"#;
        let r = parse_create_response(body).unwrap();
        assert_eq!(
            r,
            CreateListingResponse::Rejected {
                message: "Unauthorized".into()
            }
        );
    }

    #[test]
    fn created_listing_yields_id() {
        let r = parse_create_response(br#"{"_id":"abc123","name":"Loft"}"#).unwrap();
        match r {
            CreateListingResponse::Created { id, body } => {
                assert_eq!(id, "abc123");
                assert_eq!(body["name"], "Loft");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_id_and_bad_json_are_errors() {
        assert!(matches!(
            parse_create_response(br#"{"name":"Loft"}"#),
            Err(ApiError::MissingId)
        ));
        assert!(matches!(
            parse_create_response(b"<html>502</html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn create_url_joins_base() {
        let c = ListingApiClient::new(reqwest::Client::new(), "http://localhost:3000/", None);
        assert_eq!(c.create_url(), "http://localhost:3000/api/listing/create");
    }
}
