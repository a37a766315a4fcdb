use axum::http::{HeaderMap, header};

use crate::services::LinkService;

#[derive(Clone)]
pub struct AppState {
    pub links: LinkService,
    pub public_base_url: Option<String>,
}

impl AppState {
    pub fn new(links: LinkService, public_base_url: Option<String>) -> Self {
        Self {
            links,
            public_base_url,
        }
    }

    /// Base for short URLs: the configured public URL, else `http://{Host}`.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.public_base_url {
            return base.clone();
        }
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{host}")
    }
}
