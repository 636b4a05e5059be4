//! Pusher Channels HTTP API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use dsasocio_core::{ChannelName, SocketId};

use super::signature::signed_query;
use super::{Broadcaster, BrokerError, MAX_EVENT_BYTES};
use crate::config::PusherConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of `POST /apps/{app_id}/events`
#[derive(Serialize)]
struct TriggerBody<'a> {
    name: &'a str,
    channels: [&'a str; 1],
    /// Event data, JSON-encoded a second time as the API expects
    data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    socket_id: Option<&'a str>,
}

pub struct PusherClient {
    http: Client,
    config: PusherConfig,
}

impl PusherClient {
    pub fn new(config: PusherConfig) -> Result<Self, BrokerError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    fn events_path(&self) -> String {
        format!("/apps/{}/events", self.config.app_id)
    }
}

#[async_trait]
impl Broadcaster for PusherClient {
    async fn trigger(
        &self,
        channel: &ChannelName,
        event: &str,
        data: &Value,
        exclude: Option<&SocketId>,
    ) -> Result<(), BrokerError> {
        let data = serde_json::to_string(data)?;
        if data.len() > MAX_EVENT_BYTES {
            return Err(BrokerError::PayloadTooLarge {
                size: data.len(),
                max: MAX_EVENT_BYTES,
            });
        }

        let body = serde_json::to_vec(&TriggerBody {
            name: event,
            channels: [channel.as_str()],
            data: &data,
            socket_id: exclude.map(SocketId::as_str),
        })?;

        let path = self.events_path();
        let query = signed_query(
            &self.config.key,
            &self.config.secret,
            "POST",
            &path,
            &body,
            chrono::Utc::now().timestamp(),
        );
        let url = format!("{}{}?{}", self.config.base_url(), path, query);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrokerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(%channel, event, excluded = exclude.is_some(), "event triggered");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pusher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> PusherConfig {
        PusherConfig {
            app_id: "3".into(),
            key: "key".into(),
            secret: "secret".into(),
            cluster: "eu".into(),
            use_tls: true,
            host: Some("http://127.0.0.1:1".into()),
        }
    }

    #[test]
    fn trigger_body_shape() {
        let body = serde_json::to_value(TriggerBody {
            name: "new-message",
            channels: ["private-chat-a_b"],
            data: r#"{"id":"1"}"#,
            socket_id: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "name": "new-message",
                "channels": ["private-chat-a_b"],
                "data": "{\"id\":\"1\"}"
            })
        );
    }

    #[test]
    fn events_path_uses_app_id() {
        let client = PusherClient::new(config()).unwrap();
        assert_eq!(client.events_path(), "/apps/3/events");
    }

    #[tokio::test]
    async fn oversized_payload_is_refused_before_sending() {
        let client = PusherClient::new(config()).unwrap();
        let channel = ChannelName::parse("private-chat-a_b").unwrap();
        let data = json!({ "message": "x".repeat(MAX_EVENT_BYTES) });

        let err = client
            .trigger(&channel, "new-message", &data, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::PayloadTooLarge { .. }));
    }
}
