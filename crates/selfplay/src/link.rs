//! A [`RelayLink`] that speaks the relay's HTTP API to an in-process router.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use game_core::{Action, PlayerId, Push, Reply};
use serde::de::DeserializeOwned;
use session::{LinkError, RelayLink};
use tower::ServiceExt;

const MAX_BODY: usize = 1 << 20;

#[derive(Clone)]
pub struct RouterLink {
    app: Router,
}

impl RouterLink {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    async fn call<T: DeserializeOwned>(&self, request: Request<Body>) -> Result<T, LinkError> {
        let response = match self.app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY)
            .await
            .map_err(|e| LinkError::Unreachable(e.to_string()))?;
        if !status.is_success() {
            return Err(rejection(status, &bytes));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| LinkError::Unreachable(format!("bad response body: {e}")))
    }
}

fn rejection(status: StatusCode, bytes: &[u8]) -> LinkError {
    match serde_json::from_slice::<Reply>(bytes) {
        Ok(Reply::Error { code, message }) => LinkError::Rejected { code, message },
        _ => LinkError::Unreachable(format!("relay answered {status}")),
    }
}

fn bad_request(e: impl std::fmt::Display) -> LinkError {
    LinkError::Unreachable(format!("could not build request: {e}"))
}

#[async_trait]
impl RelayLink for RouterLink {
    async fn request(&self, action: Action) -> Result<Reply, LinkError> {
        let body = serde_json::to_vec(&action).map_err(bad_request)?;
        let request = Request::post("/action")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(bad_request)?;
        match self.call::<Reply>(request).await? {
            Reply::Error { code, message } => Err(LinkError::Rejected { code, message }),
            reply => Ok(reply),
        }
    }

    async fn poll(&self, player: &PlayerId) -> Result<Vec<Push>, LinkError> {
        let request = Request::get(format!("/messages/{player}"))
            .body(Body::empty())
            .map_err(bad_request)?;
        self.call(request).await
    }
}
