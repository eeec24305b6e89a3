//! HTTP implementation of the directory seam.

use std::time::Duration;

use async_trait::async_trait;
use idgate_crypto::RsaPublicKeyParts;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{DirectoryError, Result};
use crate::traits::DirectoryApi;
use crate::types::{
    AvailabilityReply, JwtKeyReply, LiteProfile, RegistrationReceipt, RegistrationReply,
    SearchPage, Tenant, TenantRouting, DIRECTORY_SUCCESS_CODE,
};

/// Stateless request/response mapper for the directory's accounts API.
///
/// Each call is a form-encoded POST to
/// `<api_base>/<method>` carrying the tenant's credentials, mirroring the
/// directory's REST convention. The client holds routing for the primary
/// tenant and, when the environment provides one, the secondary.
pub struct HttpDirectoryClient {
    http: reqwest::Client,
    primary: TenantRouting,
    secondary: Option<TenantRouting>,
}

impl HttpDirectoryClient {
    /// Build a client with the default 30 second request timeout.
    pub fn new(primary: TenantRouting, secondary: Option<TenantRouting>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            primary,
            secondary,
        })
    }

    fn routing(&self, tenant: Tenant) -> Result<&TenantRouting> {
        match tenant {
            Tenant::Primary => Ok(&self.primary),
            Tenant::Secondary => self
                .secondary
                .as_ref()
                .ok_or(DirectoryError::TenantNotConfigured(Tenant::Secondary)),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        tenant: Tenant,
        method: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T> {
        let routing = self.routing(tenant)?;
        let url = format!("{}/{}", routing.api_base.trim_end_matches('/'), method);

        let mut form: Vec<(&str, String)> = vec![
            ("apiKey", routing.api_key.clone()),
            ("secret", routing.secret.clone()),
        ];
        form.extend(params);

        let reply = self.http.post(&url).form(&form).send().await?.json().await?;
        Ok(reply)
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn search(&self, query: &str, tenant: Tenant) -> Result<SearchPage> {
        let context = format!("search/{}", Uuid::new_v4());
        tracing::info!("accounts.search triggered. Context: {context}");

        let page: SearchPage = self
            .call(
                tenant,
                "accounts.search",
                vec![
                    ("accountTypes", "full,lite".to_string()),
                    ("query", query.to_string()),
                    ("context", context),
                ],
            )
            .await?;

        if page.error_code != DIRECTORY_SUCCESS_CODE {
            tracing::error!(
                "[directory error] accounts.search failed. Tenant: {tenant:?}. Code: {}. Message: {:?}. Query: {query}",
                page.error_code,
                page.error_message,
            );
            return Err(DirectoryError::Upstream {
                code: page.error_code,
                message: upstream_message(page.error_message, &page.status_reason),
            });
        }

        Ok(page)
    }

    async fn is_login_id_available(&self, login_id: &str, tenant: Tenant) -> Result<bool> {
        let context = format!("isAvailableLoginId/{}", Uuid::new_v4());
        tracing::info!("accounts.isAvailableLoginID triggered. Context: {context}");

        let reply: AvailabilityReply = self
            .call(
                tenant,
                "accounts.isAvailableLoginID",
                vec![("loginID", login_id.to_string()), ("context", context)],
            )
            .await?;

        if reply.error_code != DIRECTORY_SUCCESS_CODE {
            tracing::error!(
                "[directory error] accounts.isAvailableLoginID failed. Tenant: {tenant:?}. Code: {}. Message: {:?}",
                reply.error_code,
                reply.error_message,
            );
            return Err(DirectoryError::Upstream {
                code: reply.error_code,
                message: upstream_message(reply.error_message, ""),
            });
        }

        Ok(reply.is_available)
    }

    async fn register_lite(&self, profile: &LiteProfile) -> Result<RegistrationReceipt> {
        let init: RegistrationReply = self
            .call(
                Tenant::Primary,
                "accounts.initRegistration",
                vec![("isLite", "true".to_string())],
            )
            .await?;

        if init.error_code != DIRECTORY_SUCCESS_CODE {
            tracing::error!(
                "[directory error] accounts.initRegistration failed. Code: {}. Message: {:?}",
                init.error_code,
                init.error_message,
            );
            return Err(DirectoryError::Upstream {
                code: init.error_code,
                message: format!(
                    "Error during lite registration. Error code: {}",
                    init.error_code
                ),
            });
        }

        let Some(reg_token) = init.reg_token else {
            return Err(DirectoryError::Upstream {
                code: 500,
                message: "Registration init reply carried no regToken.".to_string(),
            });
        };

        let reply: RegistrationReply = self
            .call(
                Tenant::Primary,
                "accounts.setAccountInfo",
                vec![
                    ("regToken", reg_token),
                    ("profile", profile_document(profile).to_string()),
                    ("data", data_document(profile).to_string()),
                ],
            )
            .await?;

        if reply.error_code != DIRECTORY_SUCCESS_CODE {
            let validation_errors =
                serde_json::to_string(&reply.validation_errors).unwrap_or_default();
            tracing::error!(
                "[directory error] lite registration failed. Email: {}. Code: {}. Message: {:?}. Validation errors: {validation_errors}",
                profile.email,
                reply.error_code,
                reply.error_message,
            );
            return Err(DirectoryError::Upstream {
                code: reply.error_code,
                message: format!("Validation errors: {validation_errors}"),
            });
        }

        let Some(uid) = reply.uid else {
            return Err(DirectoryError::Upstream {
                code: 500,
                message: "Registration reply carried no UID.".to_string(),
            });
        };

        tracing::info!("New lite registration for {}", profile.email);
        Ok(RegistrationReceipt { uid })
    }

    async fn jwt_public_key(&self) -> Result<RsaPublicKeyParts> {
        tracing::info!("accounts.getJWTPublicKey triggered.");

        let reply: JwtKeyReply = self
            .call(Tenant::Primary, "accounts.getJWTPublicKey", vec![])
            .await?;

        if reply.error_code != DIRECTORY_SUCCESS_CODE {
            tracing::error!(
                "[directory error] accounts.getJWTPublicKey failed. Code: {}. Message: {:?}",
                reply.error_code,
                reply.error_message,
            );
            return Err(DirectoryError::Upstream {
                code: reply.error_code,
                message: upstream_message(reply.error_message, &reply.status_reason),
            });
        }

        Ok(RsaPublicKeyParts {
            n: reply.n,
            e: reply.e,
        })
    }
}

/// Profile document written by the lite registration flow.
fn profile_document(profile: &LiteProfile) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    fields.insert("email".to_string(), json!(profile.email));

    if let Some(first_name) = &profile.first_name {
        fields.insert("firstName".to_string(), json!(first_name));
    }
    if let Some(last_name) = &profile.last_name {
        fields.insert("lastName".to_string(), json!(last_name));
    }
    if let Some(location) = &profile.location {
        fields.insert("country".to_string(), json!(location));
    }

    serde_json::Value::Object(fields)
}

/// Data document written alongside the lite profile.
fn data_document(profile: &LiteProfile) -> serde_json::Value {
    match &profile.inviter_email {
        Some(inviter_email) => json!({ "inviterEmail": inviter_email }),
        None => json!({}),
    }
}

fn upstream_message(error_message: Option<String>, status_reason: &str) -> String {
    match error_message {
        Some(message) if !message.is_empty() => message,
        _ => status_reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn routed_client(server: &MockServer) -> HttpDirectoryClient {
        let routing = TenantRouting {
            api_base: server.base_url(),
            api_key: "test-api-key".to_string(),
            secret: "test-secret".to_string(),
        };
        HttpDirectoryClient::new(routing.clone(), Some(routing)).unwrap()
    }

    #[tokio::test]
    async fn test_search_parses_matching_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.search");
            then.status(200).json_body(json!({
                "errorCode": 0,
                "statusCode": 200,
                "statusReason": "OK",
                "totalCount": 1,
                "results": [{
                    "UID": "abc123",
                    "isRegistered": true,
                    "isActive": false,
                    "profile": {"username": "jdoe", "email": "jdoe@example.com"}
                }]
            }));
        });

        let client = routed_client(&server);
        let page = client
            .search("SELECT * FROM accounts", Tenant::Primary)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.results[0].uid, "abc123");
    }

    #[tokio::test]
    async fn test_search_error_code_surfaces_as_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.search");
            then.status(200).json_body(json!({
                "errorCode": 500001,
                "errorMessage": "General Server Error",
                "statusCode": 500,
                "statusReason": "Internal Server Error",
                "results": []
            }));
        });

        let client = routed_client(&server);
        let err = client
            .search("SELECT * FROM accounts", Tenant::Primary)
            .await
            .unwrap_err();

        match err {
            DirectoryError::Upstream { code, message } => {
                assert_eq!(code, 500001);
                assert_eq!(message, "General Server Error");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_availability_check() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.isAvailableLoginID");
            then.status(200)
                .json_body(json!({"errorCode": 0, "isAvailable": true}));
        });

        let client = routed_client(&server);
        let available = client
            .is_login_id_available("jdoe@example.com", Tenant::Secondary)
            .await
            .unwrap();

        assert!(available);
    }

    #[tokio::test]
    async fn test_register_lite_runs_two_step_flow() {
        let server = MockServer::start();
        let init = server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.initRegistration");
            then.status(200)
                .json_body(json!({"errorCode": 0, "regToken": "tok-1"}));
        });
        let set_info = server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.setAccountInfo");
            then.status(200)
                .json_body(json!({"errorCode": 0, "UID": "new-uid-1"}));
        });

        let client = routed_client(&server);
        let receipt = client
            .register_lite(&LiteProfile {
                email: "new@example.com".to_string(),
                ..LiteProfile::default()
            })
            .await
            .unwrap();

        init.assert();
        set_info.assert();
        assert_eq!(receipt.uid, "new-uid-1");
    }

    #[tokio::test]
    async fn test_register_lite_reports_validation_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.initRegistration");
            then.status(200)
                .json_body(json!({"errorCode": 0, "regToken": "tok-2"}));
        });
        server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.setAccountInfo");
            then.status(200).json_body(json!({
                "errorCode": 400009,
                "errorMessage": "Validation error",
                "validationErrors": [
                    {"errorCode": 400003, "message": "Unallowed value", "fieldName": "profile.email"}
                ]
            }));
        });

        let client = routed_client(&server);
        let err = client
            .register_lite(&LiteProfile {
                email: "bad@example.com".to_string(),
                ..LiteProfile::default()
            })
            .await
            .unwrap_err();

        match err {
            DirectoryError::Upstream { code, message } => {
                assert_eq!(code, 400009);
                assert!(message.contains("profile.email"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_jwt_public_key() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/accounts.getJWTPublicKey");
            then.status(200)
                .json_body(json!({"errorCode": 0, "n": "base64url-n", "e": "AQAB"}));
        });

        let client = routed_client(&server);
        let key = client.jwt_public_key().await.unwrap();

        assert_eq!(key.n, "base64url-n");
        assert_eq!(key.e, "AQAB");
    }

    #[tokio::test]
    async fn test_unconfigured_secondary_tenant_is_an_error() {
        let server = MockServer::start();
        let routing = TenantRouting {
            api_base: server.base_url(),
            api_key: "k".to_string(),
            secret: "s".to_string(),
        };
        let client = HttpDirectoryClient::new(routing, None).unwrap();

        let err = client
            .search("SELECT * FROM accounts", Tenant::Secondary)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DirectoryError::TenantNotConfigured(Tenant::Secondary)
        ));
    }
}
