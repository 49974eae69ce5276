use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Url};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::HandlerError;
use crate::handler::models::{self, ScriptRequest};

use super::super::AccessHandler;
use super::connection::{endpoint, parse_base_url};
use super::protocol::{decode, encode, join_ids, parse_api_error};

/// Flow Access API client over HTTP(S).
///
/// Each handler call issues exactly one request. Nothing is retried or
/// cached; cancellation is honored by racing the request against the
/// caller's token.
pub struct HttpHandler {
    client: reqwest::Client,
    base_url: Url,
    /// Log request and response bodies at `debug` instead of `trace`.
    debug: bool,
}

impl HttpHandler {
    /// Create a handler bound to an Access API base URL, e.g.
    /// `https://rest-testnet.onflow.org/v1/`.
    pub fn new(base_url: &str, debug: bool) -> Result<Self, HandlerError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            debug,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder, HandlerError> {
        let url = endpoint(&self.base_url, segments)?;
        let mut builder = self.client.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder)
    }

    async fn send(
        &self,
        ctx: &CancellationToken,
        route: &str,
        builder: RequestBuilder,
    ) -> Result<String, HandlerError> {
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, HandlerError>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                debug!(http.route = route, "request cancelled");
                return Err(HandlerError::Cancelled);
            }
            result = exchange => result?,
        };

        debug!(http.route = route, %status, body_len = body.len(), "access api response");
        if self.debug {
            debug!(http.route = route, body = %body, "access api response body");
        } else {
            trace!(http.route = route, body = %body, "access api response body");
        }

        if !status.is_success() {
            return Err(parse_api_error(status, &body));
        }
        Ok(body)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        ctx: &CancellationToken,
        route: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, HandlerError> {
        debug!(http.method = "GET", http.route = route, "access api call");
        let builder = self.request(Method::GET, segments, query)?;
        let body = self.send(ctx, route, builder).await?;
        decode(route, &body)
    }

    async fn post(
        &self,
        ctx: &CancellationToken,
        route: &str,
        segments: &[&str],
        query: &[(&str, &str)],
        payload: Vec<u8>,
    ) -> Result<String, HandlerError> {
        debug!(
            http.method = "POST",
            http.route = route,
            payload_len = payload.len(),
            "access api call"
        );
        if self.debug {
            debug!(
                http.route = route,
                payload = %String::from_utf8_lossy(&payload),
                "access api request body"
            );
        }
        let builder = self
            .request(Method::POST, segments, query)?
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(ctx, route, builder).await
    }

    async fn execute_script(
        &self,
        ctx: &CancellationToken,
        selector: (&str, &str),
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError> {
        let payload = encode("scripts", &ScriptRequest { script, arguments })?;
        let body = self
            .post(ctx, "scripts", &["scripts"], &[selector], payload)
            .await?;
        decode("scripts", &body)
    }
}

#[async_trait]
impl AccessHandler for HttpHandler {
    async fn get_block_by_id(
        &self,
        ctx: &CancellationToken,
        id: &str,
    ) -> Result<models::Block, HandlerError> {
        let blocks: Vec<models::Block> = self
            .get(ctx, "blocks", &["blocks", id], &[("expand", "payload")])
            .await?;
        blocks.into_iter().next().ok_or_else(|| {
            HandlerError::InvalidResponse(format!("no block returned for id {id}"))
        })
    }

    async fn get_block_by_height(
        &self,
        ctx: &CancellationToken,
        height: &str,
    ) -> Result<Vec<models::Block>, HandlerError> {
        self.get(
            ctx,
            "blocks",
            &["blocks"],
            &[("height", height), ("expand", "payload")],
        )
        .await
    }

    async fn get_account(
        &self,
        ctx: &CancellationToken,
        address: &str,
        height: &str,
    ) -> Result<models::Account, HandlerError> {
        self.get(
            ctx,
            "accounts",
            &["accounts", address],
            &[("block_height", height), ("expand", "contracts,keys")],
        )
        .await
    }

    async fn get_collection(
        &self,
        ctx: &CancellationToken,
        id: &str,
    ) -> Result<models::Collection, HandlerError> {
        self.get(
            ctx,
            "collections",
            &["collections", id],
            &[("expand", "transactions")],
        )
        .await
    }

    async fn execute_script_at_block_height(
        &self,
        ctx: &CancellationToken,
        height: &str,
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError> {
        self.execute_script(ctx, ("block_height", height), script, arguments)
            .await
    }

    async fn execute_script_at_block_id(
        &self,
        ctx: &CancellationToken,
        id: &str,
        script: &str,
        arguments: &[String],
    ) -> Result<String, HandlerError> {
        self.execute_script(ctx, ("block_id", id), script, arguments)
            .await
    }

    async fn get_transaction(
        &self,
        ctx: &CancellationToken,
        id: &str,
        include_result: bool,
    ) -> Result<models::Transaction, HandlerError> {
        let query: &[(&str, &str)] = if include_result {
            &[("expand", "result")]
        } else {
            &[]
        };
        self.get(ctx, "transactions", &["transactions", id], query)
            .await
    }

    async fn send_transaction(
        &self,
        ctx: &CancellationToken,
        transaction: &[u8],
    ) -> Result<(), HandlerError> {
        self.post(
            ctx,
            "transactions",
            &["transactions"],
            &[],
            transaction.to_vec(),
        )
        .await?;
        Ok(())
    }

    async fn get_events(
        &self,
        ctx: &CancellationToken,
        event_type: &str,
        start: Option<&str>,
        end: Option<&str>,
        block_ids: &[String],
    ) -> Result<Vec<models::BlockEvents>, HandlerError> {
        let ids = join_ids(block_ids);
        let mut query = vec![("type", event_type)];
        if let Some(start) = start {
            query.push(("start_height", start));
        }
        if let Some(end) = end {
            query.push(("end_height", end));
        }
        if !block_ids.is_empty() {
            query.push(("block_ids", ids.as_str()));
        }
        self.get(ctx, "events", &["events"], &query).await
    }
}
