//! Aliyun machine translation (alimt) binding

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::Engine;
use crate::core::translator::Translator;
use crate::providers::signing::{hmac_sha256, host_of, sha256_hex};

const DEFAULT_HOST: &str = "mt.cn-hangzhou.aliyuncs.com";
const VERSION: &str = "2018-10-12";
const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const ALGORITHM: &str = "ACS3-HMAC-SHA256";

/// Aliyun alimt client using RPC-style calls signed with ACS3-HMAC-SHA256
pub struct AliyunTranslator {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    host: String,
    access_key_id: String,
    access_key_secret: String,
}

/// Endpoint URL for a service config.
///
/// `region` may also hold a bare endpoint host.
fn endpoint_url(config: &ServiceConfig) -> String {
    if let Some(endpoint) = &config.endpoint {
        return endpoint.clone();
    }
    let region = config.region.trim();
    let host = if region.is_empty() {
        DEFAULT_HOST.to_string()
    } else if region.contains('.') {
        region.to_string()
    } else {
        format!("mt.{}.aliyuncs.com", region)
    };
    format!("https://{}/", host)
}

fn form_encode(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl AliyunTranslator {
    pub fn new(http: reqwest::Client, config: &ServiceConfig) -> Result<Self> {
        if !config.has_credentials() {
            return Err(TranslationError::ConfigError {
                message: "Aliyun AccessKey id/secret not configured".to_string(),
            });
        }

        let endpoint = endpoint_url(config);
        let endpoint = reqwest::Url::parse(&endpoint).map_err(|e| TranslationError::ConfigError {
            message: format!("Invalid Aliyun endpoint {}: {}", endpoint, e),
        })?;
        let host = host_of(&endpoint)?;

        Ok(Self {
            http,
            endpoint,
            host,
            access_key_id: config.secret_id.trim().to_string(),
            access_key_secret: config.secret_key.trim().to_string(),
        })
    }

    /// Signed request headers, `Authorization` last
    fn signed_headers(
        &self,
        action: &str,
        body: &str,
        date: &str,
        nonce: &str,
    ) -> Result<Vec<(&'static str, String)>> {
        // sorted by name, as the canonical form requires
        let mut headers: Vec<(&'static str, String)> = vec![
            ("content-type", CONTENT_TYPE.to_string()),
            ("host", self.host.clone()),
            ("x-acs-action", action.to_string()),
            ("x-acs-content-sha256", sha256_hex(body.as_bytes())),
            ("x-acs-date", date.to_string()),
            ("x-acs-signature-nonce", nonce.to_string()),
            ("x-acs-version", VERSION.to_string()),
        ];

        let canonical_headers: String = headers
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v.trim()))
            .collect();
        let signed = headers
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "POST\n/\n\n{}\n{}\n{}",
            canonical_headers,
            signed,
            sha256_hex(body.as_bytes())
        );
        let string_to_sign = format!("{}\n{}", ALGORITHM, sha256_hex(canonical_request.as_bytes()));
        let signature = hex::encode(hmac_sha256(
            self.access_key_secret.as_bytes(),
            string_to_sign.as_bytes(),
        )?);

        headers.push((
            "authorization",
            format!(
                "{} Credential={},SignedHeaders={},Signature={}",
                ALGORITHM, self.access_key_id, signed, signature
            ),
        ));
        Ok(headers)
    }

    /// Call `action` with form parameters and return the JSON body
    async fn call(&self, action: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let body = form_encode(params);
        let date = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        debug!("Aliyun {} request", action);
        let mut request = self.http.post(self.endpoint.clone());
        for (name, value) in self.signed_headers(action, &body, &date, &nonce)? {
            // reqwest derives Host from the URL
            if name != "host" {
                request = request.header(name, value);
            }
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| TranslationError::NetworkError {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v["Message"].as_str().map(|s| s.to_string()))
                .unwrap_or(text);
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            })?;

        // Code arrives as either "200" or 200
        let code = match &json["Code"] {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        };
        if let Some(code) = code {
            if code != "200" {
                return Err(TranslationError::ProviderError {
                    code,
                    message: json["Message"].as_str().unwrap_or_default().to_string(),
                });
            }
        }

        Ok(json)
    }
}

#[async_trait]
impl Translator for AliyunTranslator {
    fn engine(&self) -> Engine {
        Engine::Aliyun
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let json = self
            .call(
                "TranslateGeneral",
                &[
                    ("FormatType", "text"),
                    ("SourceLanguage", source),
                    ("TargetLanguage", target),
                    ("SourceText", text),
                    ("Scene", "general"),
                ],
            )
            .await?;

        json["Data"]["Translated"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: "Aliyun response missing Data.Translated".to_string(),
            })
    }

    async fn detect_language(&self, text: &str) -> Result<String> {
        let json = self
            .call("GetDetectLanguage", &[("SourceText", text)])
            .await?;

        json["DetectedLanguage"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: "Aliyun response missing DetectedLanguage".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, header_exists, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: Option<String>) -> ServiceConfig {
        ServiceConfig {
            secret_id: "LTAItest".to_string(),
            secret_key: "secret".to_string(),
            region: String::new(),
            endpoint,
        }
    }

    #[test]
    fn test_endpoint_from_region() {
        let mut config = config(None);
        assert_eq!(endpoint_url(&config), "https://mt.cn-hangzhou.aliyuncs.com/");

        config.region = "cn-shanghai".to_string();
        assert_eq!(endpoint_url(&config), "https://mt.cn-shanghai.aliyuncs.com/");

        config.region = "mt.aliyuncs.com".to_string();
        assert_eq!(endpoint_url(&config), "https://mt.aliyuncs.com/");
    }

    #[test]
    fn test_form_encode_escapes_reserved_characters() {
        assert_eq!(
            form_encode(&[("SourceText", "a b&c=你"), ("Scene", "general")]),
            "SourceText=a%20b%26c%3D%E4%BD%A0&Scene=general"
        );
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = AliyunTranslator::new(reqwest::Client::new(), &ServiceConfig::default());
        assert!(matches!(result, Err(TranslationError::ConfigError { .. })));
    }

    #[test]
    fn test_authorization_signature() {
        let translator = AliyunTranslator::new(reqwest::Client::new(), &config(None)).unwrap();
        let headers = translator
            .signed_headers(
                "GetDetectLanguage",
                "SourceText=hello",
                "2023-11-14T22:13:20Z",
                "3f8e6e2a-0000-4000-8000-000000000000",
            )
            .unwrap();

        let (name, authorization) = headers.last().unwrap();
        assert_eq!(*name, "authorization");
        assert_eq!(
            authorization,
            "ACS3-HMAC-SHA256 Credential=LTAItest,\
             SignedHeaders=content-type;host;x-acs-action;x-acs-content-sha256;x-acs-date;x-acs-signature-nonce;x-acs-version,\
             Signature=79d5ff35c5f64a7fec240ca83dec08c1715d896180d2aef7b3da0d7ac57d04da"
        );
    }

    #[tokio::test]
    async fn test_translate_reads_data_translated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-acs-action", "TranslateGeneral"))
            .and(header("x-acs-version", "2018-10-12"))
            .and(header_exists("authorization"))
            .and(body_string_contains("SourceText=hello"))
            .and(body_string_contains("TargetLanguage=zh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Code": "200",
                "Data": { "Translated": "你好", "WordCount": "5" },
                "RequestId": "req-1"
            })))
            .mount(&server)
            .await;

        let translator =
            AliyunTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        assert_eq!(translator.translate("hello", "en", "zh").await.unwrap(), "你好");
    }

    #[tokio::test]
    async fn test_detect_language_reads_detected_language() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-acs-action", "GetDetectLanguage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "DetectedLanguage": "en",
                "LanguageProbabilities": "en:0.99",
                "RequestId": "req-2"
            })))
            .mount(&server)
            .await;

        let translator =
            AliyunTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        assert_eq!(translator.detect_language("hello").await.unwrap(), "en");
    }

    #[tokio::test]
    async fn test_non_200_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "Code": "InvalidAccessKeyId.NotFound",
                "Message": "Specified access key is not found.",
                "RequestId": "req-3"
            })))
            .mount(&server)
            .await;

        let translator =
            AliyunTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        let err = translator.translate("hello", "en", "zh").await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::ApiError { status: 404, ref message }
                if message == "Specified access key is not found."
        ));
    }

    #[tokio::test]
    async fn test_error_code_in_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Code": 10001,
                "Message": "The request has timed out",
                "RequestId": "req-4"
            })))
            .mount(&server)
            .await;

        let translator =
            AliyunTranslator::new(reqwest::Client::new(), &config(Some(server.uri()))).unwrap();
        let err = translator.translate("hello", "en", "zh").await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::ProviderError { ref code, .. } if code == "10001"
        ));
    }
}
