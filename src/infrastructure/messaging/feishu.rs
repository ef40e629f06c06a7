use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    application::services::platform::{
        ApiStatus, CODE_OK, CODE_TOKEN_INVALID, LookupStatus, OutboundMessage, PlatformApi,
        UserLookup,
    },
    domain::{
        errors::DispatchError,
        models::{Credentials, IssuedToken, UserIdType},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::Transport(err.to_string())
    }
}

pub struct FeishuClient {
    http: Client,
    base_url: String,
}

impl FeishuClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent("feishu-dispatch")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The platform reports failures with non-2xx statuses and a JSON body,
    /// so the body is decoded whatever the status.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DispatchError> {
        let status = response.status();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            DispatchError::Transport(format!("unexpected response (HTTP {status}): {err}"))
        })
    }
}

#[async_trait]
impl PlatformApi for FeishuClient {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<IssuedToken, DispatchError> {
        let response = self
            .http
            .post(self.url("/auth/v3/tenant_access_token/internal"))
            .json(&TokenRequest {
                app_id: &credentials.app_id,
                app_secret: &credentials.app_secret,
            })
            .send()
            .await?;

        let payload: TokenResponse = Self::read_json(response).await?;
        if payload.code != CODE_OK {
            return Err(DispatchError::Auth(format!(
                "code {}: {}",
                payload.code, payload.msg
            )));
        }

        let value = payload
            .tenant_access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DispatchError::Auth("response carried no tenant_access_token".to_string()))?;

        Ok(IssuedToken {
            value,
            expires_in: payload.expire.map(Duration::from_secs),
        })
    }

    async fn send_message(
        &self,
        token: &str,
        request: OutboundMessage<'_>,
    ) -> Result<ApiStatus, DispatchError> {
        let response = self
            .http
            .post(self.url("/im/v1/messages"))
            .query(&[
                ("receive_id_type", request.recipient.id_type.as_str()),
                ("uuid", request.nonce),
            ])
            .bearer_auth(token)
            .json(&SendRequest {
                receive_id: &request.recipient.id,
                msg_type: request.message.kind.as_str(),
                content: &request.message.content,
            })
            .send()
            .await?;

        let payload: Envelope<serde_json::Value> = Self::read_json(response).await?;
        Ok(ApiStatus::from_code(payload.code, payload.msg))
    }

    async fn lookup_users(
        &self,
        token: &str,
        emails: &[String],
        user_id_type: UserIdType,
    ) -> Result<LookupStatus, DispatchError> {
        let response = self
            .http
            .post(self.url("/contact/v3/users/batch_get_id"))
            .query(&[("user_id_type", user_id_type.as_str())])
            .bearer_auth(token)
            .json(&BatchGetIdRequest {
                emails,
                include_resigned: false,
            })
            .send()
            .await?;

        let payload: Envelope<BatchGetIdData> = Self::read_json(response).await?;
        match payload.code {
            CODE_OK => {
                let users = payload
                    .data
                    .map(|data| data.user_list)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|user| {
                        let email = user.email?;
                        Some(UserLookup {
                            email,
                            is_activated: user.status.map(|s| s.is_activated).unwrap_or(true),
                            user_id: user.user_id,
                        })
                    })
                    .collect();
                Ok(LookupStatus::Found(users))
            }
            CODE_TOKEN_INVALID => Ok(LookupStatus::TokenInvalid),
            code => Ok(LookupStatus::Rejected {
                code,
                msg: payload.msg,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    expire: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    receive_id: &'a str,
    msg_type: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchGetIdRequest<'a> {
    emails: &'a [String],
    include_resigned: bool,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct BatchGetIdData {
    #[serde(default)]
    user_list: Vec<FeishuUser>,
}

#[derive(Debug, Deserialize)]
struct FeishuUser {
    email: Option<String>,
    user_id: Option<String>,
    status: Option<FeishuUserStatus>,
}

#[derive(Debug, Deserialize)]
struct FeishuUserStatus {
    #[serde(default)]
    is_activated: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::models::{EncodedMessage, MessageKind, Recipient};

    fn client(server: &MockServer) -> FeishuClient {
        FeishuClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn exchanges_credentials_for_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v3/tenant_access_token/internal"))
            .and(body_json(json!({ "app_id": "cli_test", "app_secret": "secret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "ok",
                "tenant_access_token": "t-g1044ghJRUIJJ5ELPPRIWRSVX",
                "expire": 7200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client(&server)
            .fetch_token(&Credentials::new("cli_test", "secret"))
            .await
            .unwrap();

        assert_eq!(token.value, "t-g1044ghJRUIJJ5ELPPRIWRSVX");
        assert_eq!(token.expires_in, Some(Duration::from_secs(7200)));
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v3/tenant_access_token/internal"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 10014,
                "msg": "app secret invalid"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_token(&Credentials::new("cli_test", "wrong"))
            .await
            .unwrap_err();

        match err {
            DispatchError::Auth(reason) => assert!(reason.contains("10014")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sends_message_with_bearer_token_and_nonce() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/im/v1/messages"))
            .and(query_param("receive_id_type", "email"))
            .and(query_param("uuid", "nonce-1"))
            .and(header("authorization", "Bearer t-1"))
            .and(body_json(json!({
                "receive_id": "a@example.com",
                "msg_type": "text",
                "content": "{\"text\":\"hi\"}"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": { "message_id": "om_dc13264520392913993dd051dba21dcf" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let recipient = Recipient::email("a@example.com");
        let message = EncodedMessage {
            kind: MessageKind::Text,
            content: r#"{"text":"hi"}"#.to_string(),
        };
        let status = client(&server)
            .send_message(
                "t-1",
                OutboundMessage {
                    recipient: &recipient,
                    message: &message,
                    nonce: "nonce-1",
                },
            )
            .await
            .unwrap();

        assert_eq!(status, ApiStatus::Ok);
    }

    #[tokio::test]
    async fn maps_expiry_and_rejection_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/im/v1/messages"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 99991663,
                "msg": "Invalid access token for authorization. Please make a request with token attached."
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/im/v1/messages"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 230001,
                "msg": "Your request contains an invalid request parameter, ext=invalid receive_id"
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let recipient = Recipient::email("ghost@example.com");
        let message = EncodedMessage {
            kind: MessageKind::Text,
            content: r#"{"text":"hi"}"#.to_string(),
        };
        let request = || OutboundMessage {
            recipient: &recipient,
            message: &message,
            nonce: "n",
        };

        assert_eq!(
            client.send_message("stale", request()).await.unwrap(),
            ApiStatus::TokenInvalid
        );
        match client.send_message("fresh", request()).await.unwrap() {
            ApiStatus::Rejected { code, .. } => assert_eq!(code, 230001),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_response_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/im/v1/messages"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let recipient = Recipient::email("a@example.com");
        let message = EncodedMessage {
            kind: MessageKind::Text,
            content: r#"{"text":"hi"}"#.to_string(),
        };
        let err = client(&server)
            .send_message(
                "t-1",
                OutboundMessage {
                    recipient: &recipient,
                    message: &message,
                    nonce: "n",
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Transport(_)));
    }

    #[tokio::test]
    async fn looks_up_users_by_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contact/v3/users/batch_get_id"))
            .and(query_param("user_id_type", "open_id"))
            .and(body_json(json!({
                "emails": ["a@example.com", "b@example.com", "c@example.com"],
                "include_resigned": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": {
                    "user_list": [
                        { "email": "a@example.com", "user_id": "ou_a", "status": { "is_activated": true } },
                        { "email": "b@example.com", "user_id": "ou_b", "status": { "is_activated": false } },
                        { "email": "c@example.com" }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let emails = vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
            "c@example.com".to_string(),
        ];
        let status = client(&server)
            .lookup_users("t-1", &emails, UserIdType::OpenId)
            .await
            .unwrap();

        let users = match status {
            LookupStatus::Found(users) => users,
            other => panic!("expected users, got {other:?}"),
        };
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].user_id.as_deref(), Some("ou_a"));
        assert!(users[0].is_activated);
        assert!(!users[1].is_activated);
        assert_eq!(users[2].user_id, None);
    }
}
