//! Tencent Cloud machine translation (TMT) binding

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::Engine;
use crate::core::translator::Translator;
use crate::providers::signing::{hmac_sha256, host_of, sha256_hex};

const DEFAULT_ENDPOINT: &str = "https://tmt.tencentcloudapi.com/";
const DEFAULT_REGION: &str = "ap-beijing";
const SERVICE: &str = "tmt";
const VERSION: &str = "2018-03-21";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const ALGORITHM: &str = "TC3-HMAC-SHA256";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    code: String,
    message: String,
}

/// Tencent TMT client signing requests with TC3-HMAC-SHA256
pub struct TencentTranslator {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    host: String,
    region: String,
    secret_id: String,
    secret_key: String,
}

impl TencentTranslator {
    pub fn new(http: reqwest::Client, config: &ServiceConfig) -> Result<Self> {
        if !config.has_credentials() {
            return Err(TranslationError::ConfigError {
                message: "Tencent secretId/secretKey not configured".to_string(),
            });
        }

        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| TranslationError::ConfigError {
            message: format!("Invalid Tencent endpoint {}: {}", endpoint, e),
        })?;
        let host = host_of(&endpoint)?;
        let region = if config.region.trim().is_empty() {
            DEFAULT_REGION.to_string()
        } else {
            config.region.trim().to_string()
        };

        Ok(Self {
            http,
            endpoint,
            host,
            region,
            secret_id: config.secret_id.trim().to_string(),
            secret_key: config.secret_key.trim().to_string(),
        })
    }

    /// `Authorization` header for `payload` sent at `timestamp`
    fn authorization(&self, payload: &str, timestamp: i64) -> Result<String> {
        let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .ok_or_else(|| {
                TranslationError::InternalError(format!("Timestamp out of range: {}", timestamp))
            })?
            .format("%Y-%m-%d")
            .to_string();

        let signed_headers = "content-type;host";
        let canonical_request = format!(
            "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
            CONTENT_TYPE,
            self.host,
            signed_headers,
            sha256_hex(payload.as_bytes())
        );

        let scope = format!("{}/{}/tc3_request", date, SERVICE);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            timestamp,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let secret_date = hmac_sha256(format!("TC3{}", self.secret_key).as_bytes(), date.as_bytes())?;
        let secret_service = hmac_sha256(&secret_date, SERVICE.as_bytes())?;
        let secret_signing = hmac_sha256(&secret_service, b"tc3_request")?;
        let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes())?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.secret_id, scope, signed_headers, signature
        ))
    }

    /// Call `action` and return the `Response` object
    async fn call(&self, action: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let payload = body.to_string();
        let timestamp = Utc::now().timestamp();
        let authorization = self.authorization(&payload, timestamp)?;

        debug!("Tencent {} request", action);
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", VERSION)
            .header("X-TC-Region", self.region.as_str())
            .body(payload)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            })?;

        if let Some(error) = envelope.response.get("Error") {
            let error: ApiErrorBody = serde_json::from_value(error.clone())?;
            return Err(TranslationError::ProviderError {
                code: error.code,
                message: error.message,
            });
        }

        Ok(envelope.response)
    }

    fn field(response: &serde_json::Value, name: &str) -> Result<String> {
        response[name]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: format!("Tencent response missing {}", name),
            })
    }
}

#[async_trait]
impl Translator for TencentTranslator {
    fn engine(&self) -> Engine {
        Engine::Tencent
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let response = self
            .call(
                "TextTranslate",
                json!({
                    "SourceText": text,
                    "Source": source,
                    "Target": target,
                    "ProjectId": 0
                }),
            )
            .await?;
        Self::field(&response, "TargetText")
    }

    async fn detect_language(&self, text: &str) -> Result<String> {
        let response = self
            .call("LanguageDetect", json!({ "Text": text, "ProjectId": 0 }))
            .await?;
        Self::field(&response, "Lang")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, header_exists, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: Option<String>) -> ServiceConfig {
        ServiceConfig {
            secret_id: "AKIDtest".to_string(),
            secret_key: "secret".to_string(),
            region: String::new(),
            endpoint,
        }
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = TencentTranslator::new(reqwest::Client::new(), &ServiceConfig::default());
        assert!(matches!(result, Err(TranslationError::ConfigError { .. })));
    }

    #[test]
    fn test_new_defaults_region_and_endpoint() {
        let translator = TencentTranslator::new(reqwest::Client::new(), &config(None)).unwrap();
        assert_eq!(translator.region, "ap-beijing");
        assert_eq!(translator.host, "tmt.tencentcloudapi.com");
    }

    #[test]
    fn test_authorization_signature() {
        let translator = TencentTranslator::new(reqwest::Client::new(), &config(None)).unwrap();
        let payload = r#"{"ProjectId":0,"Source":"en","SourceText":"hello","Target":"zh"}"#;

        let authorization = translator.authorization(payload, 1700000000).unwrap();
        assert_eq!(
            authorization,
            "TC3-HMAC-SHA256 Credential=AKIDtest/2023-11-14/tmt/tc3_request, \
             SignedHeaders=content-type;host, \
             Signature=b580eff8794ee19223b36ba5470972abf115095ae13147818797d1ec1de97433"
        );
    }

    #[tokio::test]
    async fn test_translate_reads_target_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("X-TC-Action", "TextTranslate"))
            .and(header("X-TC-Version", "2018-03-21"))
            .and(header("X-TC-Region", "ap-beijing"))
            .and(header_exists("Authorization"))
            .and(body_json(json!({
                "SourceText": "hello",
                "Source": "en",
                "Target": "zh",
                "ProjectId": 0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": {
                    "TargetText": "你好",
                    "Source": "en",
                    "Target": "zh",
                    "RequestId": "req-1"
                }
            })))
            .mount(&server)
            .await;

        let translator =
            TencentTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        assert_eq!(translator.translate("hello", "en", "zh").await.unwrap(), "你好");
    }

    #[tokio::test]
    async fn test_detect_language_reads_lang() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("X-TC-Action", "LanguageDetect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": { "Lang": "ja", "RequestId": "req-2" }
            })))
            .mount(&server)
            .await;

        let translator =
            TencentTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        assert_eq!(translator.detect_language("こんにちは").await.unwrap(), "ja");
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": {
                    "Error": {
                        "Code": "AuthFailure.SignatureFailure",
                        "Message": "The provided credentials could not be validated."
                    },
                    "RequestId": "req-3"
                }
            })))
            .mount(&server)
            .await;

        let translator =
            TencentTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        let err = translator.translate("hello", "en", "zh").await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::ProviderError { ref code, .. } if code == "AuthFailure.SignatureFailure"
        ));
    }

    #[tokio::test]
    async fn test_http_failure_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let translator =
            TencentTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        let err = translator.detect_language("hello").await.unwrap_err();
        assert!(matches!(err, TranslationError::ApiError { status: 503, .. }));
    }
}
