//! The batch lite-registration pipeline.

use std::sync::Arc;

use idgate_directory::{
    DirectoryApi, DirectoryError, IdentityResolver, SearchHit, Tenant, TenantTopology,
};

use crate::errors::BatchError;
use crate::types::{
    LiteRegistrationOutcome, LiteRegistrationRequest, GENERIC_ERROR_MESSAGE,
    RESPONSE_CODE_GENERIC_ERROR,
};
use crate::validation;

/// Pipeline configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum accepted batch size; larger batches are rejected wholesale.
    pub request_limit: usize,
    /// Whether the email-list endpoints apply the per-item format check.
    pub email_validation_enabled: bool,
    /// Password-setup URL template with `{clientId}` and `{uid}`
    /// placeholders, substituted for newly registered v3 items.
    pub password_setup_template: Option<String>,
    /// Wire label of the primary tenant (e.g. `us`).
    pub primary_label: String,
    /// Wire label of the secondary tenant (e.g. `cn`).
    pub secondary_label: String,
}

/// Processes bounded batches of registration requests: cross-tenant
/// dedup first, lite registration for the misses, one outcome per item
/// in input order.
///
/// Items are processed sequentially on the calling task. Each item is
/// independent; a failing item is converted to an outcome value at the
/// item boundary and never aborts its siblings.
pub struct LiteRegistrationPipeline<A> {
    api: Arc<A>,
    resolver: IdentityResolver<A>,
    config: PipelineConfig,
}

impl<A: DirectoryApi> LiteRegistrationPipeline<A> {
    pub fn new(api: Arc<A>, topology: TenantTopology, config: PipelineConfig) -> Self {
        let resolver = IdentityResolver::new(api.clone(), topology);
        Self {
            api,
            resolver,
            config,
        }
    }

    /// Process an email-only batch (v1/v2 shape).
    ///
    /// Batch-wide preconditions, checked before any network call: the
    /// batch is non-empty, within the limit, and every entry is
    /// non-blank — one blank entry rejects the whole batch. When enabled,
    /// the address-format check runs per item and a failing item yields
    /// an invalid outcome for that item only.
    pub async fn register_email_batch(
        &self,
        emails: &[String],
    ) -> Result<Vec<LiteRegistrationOutcome>, BatchError> {
        tracing::info!("Lite registration initiated. {} users requested.", emails.len());
        self.check_batch_size(emails.len())?;

        if emails.iter().any(|email| email.trim().is_empty()) {
            return Err(BatchError::BlankEmail);
        }

        let mut outcomes = Vec::with_capacity(emails.len());
        for email in emails {
            let email = email.trim();

            if self.config.email_validation_enabled && !validation::is_valid_email(email) {
                tracing::error!("Error with email: {email}. Cause: Email is invalid.");
                outcomes.push(LiteRegistrationOutcome::InvalidInput {
                    email: Some(email.to_string()),
                    message: "Email is invalid.".to_string(),
                });
                continue;
            }

            let request = LiteRegistrationRequest::email_only(email);
            outcomes.push(self.process_item(&request, false).await);
        }

        tracing::info!("{} lite registration users processed.", outcomes.len());
        Ok(outcomes)
    }

    /// Process a full lite-profile batch (v3 shape).
    ///
    /// Batch-wide preconditions: non-empty and within the limit. Unlike
    /// the email-list shape, a blank or malformed email here yields an
    /// invalid outcome for that item only; the rest of the batch
    /// proceeds.
    pub async fn register_lite_batch(
        &self,
        requests: &[LiteRegistrationRequest],
    ) -> Result<Vec<LiteRegistrationOutcome>, BatchError> {
        tracing::info!("Lite registration initiated. {} users requested.", requests.len());
        self.check_batch_size(requests.len())?;

        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            let email = request.email.trim();

            if email.is_empty() {
                tracing::error!("Error with email: {email}. Cause: Email is null or empty.");
                outcomes.push(LiteRegistrationOutcome::InvalidInput {
                    email: Some(request.email.clone()),
                    message: "Email is null or empty.".to_string(),
                });
                continue;
            }
            if !validation::is_valid_email(email) {
                tracing::error!("Error with email: {email}. Cause: Email is invalid.");
                outcomes.push(LiteRegistrationOutcome::InvalidInput {
                    email: Some(email.to_string()),
                    message: "Email is invalid.".to_string(),
                });
                continue;
            }
            if let Err(message) = validation::validate_profile_fields(request) {
                tracing::error!("Error with email: {email}. Cause: {message}");
                outcomes.push(LiteRegistrationOutcome::InvalidInput {
                    email: Some(email.to_string()),
                    message,
                });
                continue;
            }

            outcomes.push(self.process_item(request, true).await);
        }

        tracing::info!("{} lite registration users processed.", outcomes.len());
        Ok(outcomes)
    }

    fn check_batch_size(&self, len: usize) -> Result<(), BatchError> {
        if len == 0 {
            tracing::error!("No users requested.");
            return Err(BatchError::Empty);
        }
        if len > self.config.request_limit {
            tracing::error!(
                "Requested users exceed request limit: {}.",
                self.config.request_limit
            );
            return Err(BatchError::LimitExceeded(self.config.request_limit));
        }
        Ok(())
    }

    /// Process one item, converting every failure into an outcome value.
    async fn process_item(
        &self,
        request: &LiteRegistrationRequest,
        with_password_link: bool,
    ) -> LiteRegistrationOutcome {
        let email = request.email.trim();

        match self.resolve_or_register(request, with_password_link).await {
            Ok(outcome) => outcome,
            Err(DirectoryError::Upstream { code, message }) => {
                tracing::error!(
                    "Error with email: {email}. Directory error code: {code}. Directory error message: {message}"
                );
                LiteRegistrationOutcome::UpstreamError {
                    email: Some(email.to_string()),
                    code,
                    message,
                }
            }
            Err(err) => {
                tracing::error!("Error with email: {email}. Cause: {err}");
                LiteRegistrationOutcome::UpstreamError {
                    email: Some(email.to_string()),
                    code: RESPONSE_CODE_GENERIC_ERROR,
                    message: GENERIC_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }

    async fn resolve_or_register(
        &self,
        request: &LiteRegistrationRequest,
        with_password_link: bool,
    ) -> idgate_directory::Result<LiteRegistrationOutcome> {
        let email = request.email.trim();

        if let Some(hit) = self.resolver.find_in_any_tenant(email).await? {
            tracing::info!("{email} already exists, resolving registered account, lite otherwise.");
            return Ok(self.existing_outcome(hit));
        }

        tracing::info!("Registering lite account: {email}");
        let receipt = self.api.register_lite(&request.to_profile()).await?;

        let password_setup_link = if with_password_link {
            self.password_setup_link(request, &receipt.uid)
        } else {
            None
        };

        Ok(LiteRegistrationOutcome::NewlyRegistered {
            uid: receipt.uid,
            email: email.to_string(),
            data_center: self.config.primary_label.clone(),
            password_setup_link,
        })
    }

    fn existing_outcome(&self, hit: SearchHit) -> LiteRegistrationOutcome {
        let data_center = self.tenant_label(hit.tenant);
        LiteRegistrationOutcome::ExistingAccount {
            uid: hit.record.uid,
            username: hit.record.username,
            email: hit.record.email,
            is_registered: hit.record.is_registered,
            is_active: hit.record.is_active,
            tenant: hit.tenant,
            data_center,
        }
    }

    fn tenant_label(&self, tenant: Tenant) -> String {
        match tenant {
            Tenant::Primary => self.config.primary_label.clone(),
            Tenant::Secondary => self.config.secondary_label.clone(),
        }
    }

    fn password_setup_link(
        &self,
        request: &LiteRegistrationRequest,
        uid: &str,
    ) -> Option<String> {
        self.config.password_setup_template.as_ref().map(|template| {
            template
                .replace("{clientId}", request.client_id.as_deref().unwrap_or_default())
                .replace("{uid}", uid)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use idgate_crypto::RsaPublicKeyParts;
    use idgate_directory::{
        AccountEntry, LiteProfile, RegistrationReceipt, Result as DirectoryResult, SearchPage,
    };
    use std::sync::Mutex;

    /// Per-email scripted behavior for the fake directory.
    #[derive(Clone)]
    enum Scripted {
        Found(AccountEntry),
        NotFound,
        SearchFails { code: i32, message: String },
        RegistrationFails { code: i32, message: String },
    }

    struct FakeDirectory {
        scripts: Vec<(String, Scripted)>,
        registrations: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        fn new(scripts: Vec<(&str, Scripted)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(email, script)| (email.to_string(), script))
                    .collect(),
                registrations: Mutex::new(Vec::new()),
            }
        }

        fn script_for(&self, query: &str) -> Scripted {
            self.scripts
                .iter()
                .find(|(email, _)| query.contains(email.as_str()))
                .map(|(_, script)| script.clone())
                .unwrap_or(Scripted::NotFound)
        }

        fn registered_emails(&self) -> Vec<String> {
            self.registrations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DirectoryApi for FakeDirectory {
        async fn search(&self, query: &str, _tenant: Tenant) -> DirectoryResult<SearchPage> {
            match self.script_for(query) {
                Scripted::Found(entry) => Ok(SearchPage {
                    error_code: 0,
                    error_message: None,
                    status_code: 200,
                    status_reason: "OK".to_string(),
                    total_count: 1,
                    results: vec![entry],
                }),
                Scripted::SearchFails { code, message } => {
                    Err(DirectoryError::Upstream { code, message })
                }
                _ => Ok(SearchPage {
                    error_code: 0,
                    error_message: None,
                    status_code: 200,
                    status_reason: "OK".to_string(),
                    total_count: 0,
                    results: vec![],
                }),
            }
        }

        async fn is_login_id_available(
            &self,
            _login_id: &str,
            _tenant: Tenant,
        ) -> DirectoryResult<bool> {
            unimplemented!("pipeline tests never check availability")
        }

        async fn register_lite(
            &self,
            profile: &LiteProfile,
        ) -> DirectoryResult<RegistrationReceipt> {
            if let Scripted::RegistrationFails { code, message } = self.script_for(&profile.email) {
                return Err(DirectoryError::Upstream { code, message });
            }
            self.registrations.lock().unwrap().push(profile.email.clone());
            Ok(RegistrationReceipt {
                uid: format!("uid-{}", profile.email),
            })
        }

        async fn jwt_public_key(&self) -> DirectoryResult<RsaPublicKeyParts> {
            unimplemented!("pipeline tests never fetch keys")
        }
    }

    fn existing_entry(uid: &str, email: &str, is_registered: bool, is_active: bool) -> AccountEntry {
        serde_json::from_value(serde_json::json!({
            "UID": uid,
            "isRegistered": is_registered,
            "isActive": is_active,
            "profile": {"username": "jdoe", "email": email}
        }))
        .unwrap()
    }

    fn pipeline_with(
        scripts: Vec<(&str, Scripted)>,
        request_limit: usize,
    ) -> (LiteRegistrationPipeline<FakeDirectory>, Arc<FakeDirectory>) {
        let api = Arc::new(FakeDirectory::new(scripts));
        let pipeline = LiteRegistrationPipeline::new(
            api.clone(),
            TenantTopology {
                secondary_supported: false,
            },
            PipelineConfig {
                request_limit,
                email_validation_enabled: true,
                password_setup_template: Some(
                    "https://identity.example.com/setup?client_id={clientId}&uid={uid}".to_string(),
                ),
                primary_label: "us".to_string(),
                secondary_label: "cn".to_string(),
            },
        );
        (pipeline, api)
    }

    fn emails(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[tokio::test]
    async fn test_new_email_registers_lite_account() {
        let (pipeline, api) = pipeline_with(vec![], 10);

        let outcomes = pipeline
            .register_email_batch(&emails(&["new@x.com"]))
            .await
            .unwrap();

        assert_eq!(
            outcomes,
            vec![LiteRegistrationOutcome::NewlyRegistered {
                uid: "uid-new@x.com".to_string(),
                email: "new@x.com".to_string(),
                data_center: "us".to_string(),
                password_setup_link: None,
            }]
        );
        assert_eq!(api.registered_emails(), vec!["new@x.com"]);
    }

    #[tokio::test]
    async fn test_existing_account_skips_registration() {
        let (pipeline, api) = pipeline_with(
            vec![(
                "existing@x.com",
                Scripted::Found(existing_entry("uid-1", "existing@x.com", true, true)),
            )],
            10,
        );

        let outcomes = pipeline
            .register_email_batch(&emails(&["existing@x.com"]))
            .await
            .unwrap();

        match &outcomes[0] {
            LiteRegistrationOutcome::ExistingAccount {
                uid,
                is_registered,
                is_active,
                tenant,
                data_center,
                ..
            } => {
                assert_eq!(uid, "uid-1");
                assert!(*is_registered);
                assert!(*is_active);
                assert_eq!(*tenant, Tenant::Primary);
                assert_eq!(data_center, "us");
            }
            other => panic!("expected existing account, got {other:?}"),
        }
        // Dedup: the registration primitive is never invoked for a hit.
        assert!(api.registered_emails().is_empty());
    }

    #[tokio::test]
    async fn test_blank_entry_rejects_whole_email_batch() {
        let (pipeline, api) = pipeline_with(vec![], 10);

        let err = pipeline
            .register_email_batch(&emails(&["a@x.com", "", "b@x.com"]))
            .await
            .unwrap_err();

        assert_eq!(err, BatchError::BlankEmail);
        // Fail-fast: nothing was registered, valid entries included.
        assert!(api.registered_emails().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let (pipeline, _) = pipeline_with(vec![], 10);

        let err = pipeline.register_email_batch(&[]).await.unwrap_err();
        assert_eq!(err, BatchError::Empty);
    }

    #[tokio::test]
    async fn test_batch_limit_boundary() {
        let (pipeline, _) = pipeline_with(vec![], 3);
        let at_limit = emails(&["a@x.com", "b@x.com", "c@x.com"]);
        let over_limit = emails(&["a@x.com", "b@x.com", "c@x.com", "d@x.com"]);

        assert!(pipeline.register_email_batch(&at_limit).await.is_ok());
        assert_eq!(
            pipeline.register_email_batch(&over_limit).await.unwrap_err(),
            BatchError::LimitExceeded(3)
        );
    }

    #[tokio::test]
    async fn test_failing_item_is_isolated_and_order_preserved() {
        let (pipeline, _) = pipeline_with(
            vec![(
                "broken@x.com",
                Scripted::SearchFails {
                    code: 500001,
                    message: "General Server Error".to_string(),
                },
            )],
            10,
        );

        let outcomes = pipeline
            .register_email_batch(&emails(&["first@x.com", "broken@x.com", "third@x.com"]))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            &outcomes[0],
            LiteRegistrationOutcome::NewlyRegistered { email, .. } if email == "first@x.com"
        ));
        assert!(matches!(
            &outcomes[1],
            LiteRegistrationOutcome::UpstreamError { code: 500001, .. }
        ));
        assert!(matches!(
            &outcomes[2],
            LiteRegistrationOutcome::NewlyRegistered { email, .. } if email == "third@x.com"
        ));
    }

    #[tokio::test]
    async fn test_registration_failure_carries_upstream_code() {
        let (pipeline, _) = pipeline_with(
            vec![(
                "rejected@x.com",
                Scripted::RegistrationFails {
                    code: 400009,
                    message: "Validation errors: [profile.email]".to_string(),
                },
            )],
            10,
        );

        let outcomes = pipeline
            .register_email_batch(&emails(&["rejected@x.com"]))
            .await
            .unwrap();

        assert_eq!(
            outcomes,
            vec![LiteRegistrationOutcome::UpstreamError {
                email: Some("rejected@x.com".to_string()),
                code: 400009,
                message: "Validation errors: [profile.email]".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_malformed_email_invalidates_item_only() {
        let (pipeline, _) = pipeline_with(vec![], 10);

        let outcomes = pipeline
            .register_email_batch(&emails(&["not-an-email", "fine@x.com"]))
            .await
            .unwrap();

        assert_eq!(
            outcomes[0],
            LiteRegistrationOutcome::InvalidInput {
                email: Some("not-an-email".to_string()),
                message: "Email is invalid.".to_string(),
            }
        );
        assert!(matches!(
            &outcomes[1],
            LiteRegistrationOutcome::NewlyRegistered { .. }
        ));
    }

    #[tokio::test]
    async fn test_lite_batch_blank_email_is_per_item() {
        let (pipeline, _) = pipeline_with(vec![], 10);
        let requests = vec![
            LiteRegistrationRequest::email_only("ok@x.com"),
            LiteRegistrationRequest::email_only("  "),
        ];

        let outcomes = pipeline.register_lite_batch(&requests).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            &outcomes[0],
            LiteRegistrationOutcome::NewlyRegistered { .. }
        ));
        assert_eq!(
            outcomes[1],
            LiteRegistrationOutcome::InvalidInput {
                email: Some("  ".to_string()),
                message: "Email is null or empty.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_lite_batch_builds_password_setup_link() {
        let (pipeline, _) = pipeline_with(vec![], 10);
        let mut request = LiteRegistrationRequest::email_only("new@x.com");
        request.client_id = Some("client-7".to_string());

        let outcomes = pipeline.register_lite_batch(&[request]).await.unwrap();

        match &outcomes[0] {
            LiteRegistrationOutcome::NewlyRegistered {
                password_setup_link,
                ..
            } => {
                assert_eq!(
                    password_setup_link.as_deref(),
                    Some("https://identity.example.com/setup?client_id=client-7&uid=uid-new@x.com")
                );
            }
            other => panic!("expected new registration, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lite_batch_field_caps_invalidate_item() {
        let (pipeline, _) = pipeline_with(vec![], 10);
        let mut request = LiteRegistrationRequest::email_only("long@x.com");
        request.location = Some("USA".to_string());

        let outcomes = pipeline.register_lite_batch(&[request]).await.unwrap();

        assert!(matches!(
            &outcomes[0],
            LiteRegistrationOutcome::InvalidInput { message, .. } if message.contains("location")
        ));
    }
}
