use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::NewSalary;
use crate::services::salary_mail_parser::parse_salary_mail;
use crate::services::ServiceError;
use crate::utils::config::GmailConfig;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Gmail sends base64url and may or may not pad it.
const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum GmailError {
    #[error("Gmail credentials are not configured (GMAIL_CLIENT_ID / GMAIL_CLIENT_SECRET / GMAIL_REFRESH_TOKEN)")]
    MissingCredentials,
    #[error("gmail http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("message body is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("message body is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct LabelList {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    id: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Message {
    pub id: Option<String>,
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    pub mime_type: Option<String>,
    pub body: Option<MessagePartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagePartBody {
    pub data: Option<String>,
}

pub fn decode_base64_url(data: &str) -> Result<String, GmailError> {
    let bytes = BASE64_URL_LENIENT.decode(data.trim())?;
    Ok(String::from_utf8(bytes)?)
}

fn find_plain_text(part: &MessagePart) -> Option<&str> {
    if part.mime_type.as_deref() == Some("text/plain") {
        if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
            return Some(data);
        }
    }
    part.parts.iter().find_map(find_plain_text)
}

/// First `text/plain` part anywhere in the tree, else the payload's own body.
/// A message without either has an empty body.
pub fn extract_body(message: &Message) -> Result<String, GmailError> {
    let payload = match &message.payload {
        Some(p) => p,
        None => return Ok(String::new()),
    };
    let data = find_plain_text(payload).or_else(|| payload.body.as_ref().and_then(|b| b.data.as_deref()));
    match data {
        Some(d) => decode_base64_url(d),
        None => Ok(String::new()),
    }
}

/// Read-only client for the salary mail label.
pub struct GmailClient<'a> {
    http: &'a Client,
    cfg: &'a GmailConfig,
}

impl<'a> GmailClient<'a> {
    pub fn new(http: &'a Client, cfg: &'a GmailConfig) -> Result<Self, GmailError> {
        if !cfg.has_credentials() {
            return Err(GmailError::MissingCredentials);
        }
        Ok(Self { http, cfg })
    }

    async fn access_token(&self) -> Result<String, GmailError> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.cfg.client_id.as_str()),
                ("client_secret", self.cfg.client_secret.as_str()),
                ("refresh_token", self.cfg.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(token.access_token)
    }

    async fn label_id(&self, token: &str) -> Result<Option<String>, GmailError> {
        let list: LabelList = self
            .http
            .get(format!("{}/labels", GMAIL_API_BASE))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let wanted = self.cfg.target_label.as_str();
        Ok(list.labels.into_iter().find(|l| l.name == wanted).map(|l| l.id))
    }

    async fn message_ids(&self, token: &str, label_id: &str) -> Result<Vec<String>, GmailError> {
        let max_results = self.cfg.max_results.to_string();
        let list: MessageList = self
            .http
            .get(format!("{}/messages", GMAIL_API_BASE))
            .bearer_auth(token)
            .query(&[("labelIds", label_id), ("maxResults", max_results.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    async fn message(&self, token: &str, id: &str) -> Result<Message, GmailError> {
        Ok(self
            .http
            .get(format!("{}/messages/{}", GMAIL_API_BASE, id))
            .bearer_auth(token)
            .query(&[("format", "full")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Bodies of the newest messages under the configured label, newest first.
    pub async fn latest_bodies(&self) -> Result<Vec<String>, GmailError> {
        let token = self.access_token().await?;
        let label_id = match self.label_id(&token).await? {
            Some(id) => id,
            None => {
                tracing::warn!("gmail label '{}' not found", self.cfg.target_label);
                return Ok(Vec::new());
            }
        };

        let ids = self.message_ids(&token, &label_id).await?;
        tracing::info!("found {} messages with label '{}'", ids.len(), self.cfg.target_label);

        let mut bodies = Vec::with_capacity(ids.len());
        for id in ids {
            let message = self.message(&token, &id).await?;
            bodies.push(extract_body(&message)?);
        }
        Ok(bodies)
    }
}

/// 最新の給与メールを取得して解析する
pub async fn fetch_latest_salaries(
    http: &Client,
    cfg: &GmailConfig,
    created_by: &str,
) -> Result<Vec<NewSalary>, ServiceError> {
    let client = GmailClient::new(http, cfg)?;
    let mut salaries = Vec::new();
    for body in client.latest_bodies().await? {
        salaries.extend(parse_salary_mail(&body, created_by)?);
    }
    Ok(salaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(text)
    }

    fn part(mime: &str, data: Option<String>, parts: Vec<MessagePart>) -> MessagePart {
        MessagePart {
            mime_type: Some(mime.to_string()),
            body: Some(MessagePartBody { data }),
            parts,
        }
    }

    #[test]
    fn decodes_with_and_without_padding() {
        assert_eq!(decode_base64_url("5bmz5oiQ").unwrap(), "平成");
        assert_eq!(decode_base64_url("YQ").unwrap(), "a");
        assert_eq!(decode_base64_url("YQ==").unwrap(), "a");
        assert!(decode_base64_url("@@@").is_err());
    }

    #[test]
    fn prefers_nested_plain_text_part() {
        let message = Message {
            id: Some("m1".to_string()),
            payload: Some(part(
                "multipart/mixed",
                None,
                vec![
                    part(
                        "multipart/alternative",
                        None,
                        vec![
                            part("text/html", Some(encode("<p>html</p>")), vec![]),
                            part("text/plain", Some(encode("[ 振込日 ] 2025/06/25")), vec![]),
                        ],
                    ),
                    part("application/pdf", Some(encode("%PDF")), vec![]),
                ],
            )),
        };
        assert_eq!(extract_body(&message).unwrap(), "[ 振込日 ] 2025/06/25");
    }

    #[test]
    fn falls_back_to_payload_body() {
        let message = Message {
            id: None,
            payload: Some(part("text/html", Some(encode("body?")), vec![])),
        };
        assert_eq!(extract_body(&message).unwrap(), "body?");
        assert_eq!(extract_body(&Message::default()).unwrap(), "");
    }

    #[test]
    fn gmail_json_shape_deserializes() {
        let raw = r#"{"id":"abc","payload":{"mimeType":"multipart/alternative","body":{"size":0},
            "parts":[{"mimeType":"text/plain","body":{"size":1,"data":"YQ"}}]}}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_body(&message).unwrap(), "a");
    }

    #[test]
    fn client_requires_credentials() {
        let http = Client::new();
        let cfg = GmailConfig {
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            target_label: "INBOX".to_string(),
            max_results: 1,
        };
        assert!(matches!(GmailClient::new(&http, &cfg), Err(GmailError::MissingCredentials)));
    }
}
