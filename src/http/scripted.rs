//! In-memory transport for unit tests

use super::transport::{PageRequest, PageResponse, Transport};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

struct Route {
    path: String,
    start_at: Option<String>,
    response: PageResponse,
}

/// Answers requests from a fixed table keyed by URL path and `startAt`
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Respond to `path` (first page) with a JSON body
    pub(crate) fn page(self, path: &str, body: Value) -> Self {
        self.route(path, None, PageResponse::ok_json(&body))
    }

    /// Respond to `path` at `startAt = start_at` with a JSON body
    pub(crate) fn page_at(self, path: &str, start_at: u64, body: Value) -> Self {
        self.route(path, Some(start_at), PageResponse::ok_json(&body))
    }

    pub(crate) fn route(mut self, path: &str, start_at: Option<u64>, response: PageResponse) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            start_at: start_at.map(|n| n.to_string()),
            response,
        });
        self
    }

    /// Requests received so far
    pub(crate) fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `path[?startAt=n]` of every request, in order
    pub(crate) fn request_log(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|req| {
                let path = url::Url::parse(&req.url).unwrap().path().to_string();
                match req.query_value("startAt") {
                    Some(start_at) => format!("{path}?startAt={start_at}"),
                    None => path,
                }
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let path = url::Url::parse(&request.url)?.path().to_string();
        let start_at = request.query_value("startAt").map(ToString::to_string);
        Ok(self
            .routes
            .iter()
            .find(|r| r.path == path && r.start_at == start_at)
            .map_or_else(
                || PageResponse::new(404, format!("no route for {path}")),
                |r| r.response.clone(),
            ))
    }
}
