//! HTTP clients for the two services the form talks to.
//!
//! Both sit behind small traits so the form logic can run against fakes in tests.

mod cloudinary;
mod listing_api;

pub use cloudinary::CloudinaryClient;
pub use listing_api::ListingApiClient;

use crate::error::{ApiError, UploadError};
use crate::model::{CreateListingRequest, CreateListingResponse, ImageFile};
use anyhow::{Context, Result};
use std::future::Future;

/// Stores one image and returns the public URL it is served from.
pub trait ImageHost: Send + Sync + 'static {
    fn upload(&self, file: ImageFile) -> impl Future<Output = Result<String, UploadError>> + Send;
}

/// The application's listing endpoint.
pub trait ListingApi: Send + Sync + 'static {
    fn create(
        &self,
        req: &CreateListingRequest,
    ) -> impl Future<Output = Result<CreateListingResponse, ApiError>> + Send;
}

/// Build the shared reqwest client used by both services.
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("create-listing/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build http client")
}

/// One-shot HTTP server that records the request it receives.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    pub struct Captured {
        /// Request line and headers, lowercased.
        pub head: String,
        pub body: Vec<u8>,
    }

    impl Captured {
        pub fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// Answer a single request with `status` and a JSON body; returns the base URL.
    pub async fn serve_once(
        status: u16,
        response_body: &'static str,
    ) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            while !request_complete(&buf) {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{response_body}",
                response_body.len()
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();

            let end = header_end(&buf).unwrap_or(buf.len());
            Captured {
                head: String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase(),
                body: buf[(end + 4).min(buf.len())..].to_vec(),
            }
        });
        (format!("http://{addr}"), handle)
    }

    fn header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(end) = header_end(buf) else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let body = &buf[end + 4..];
        if let Some(len) = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
        {
            return len
                .trim()
                .parse::<usize>()
                .map_or(true, |n| body.len() >= n);
        }
        if head.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        true
    }
}
