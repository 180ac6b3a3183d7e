use std::sync::Arc;

use kbase_core::{
    CreateKnowledgeBaseRequest, CreatedKnowledgeBase, KnowledgeBase, KnowledgeBaseIdRequest,
    KnowledgeBaseList, KnowledgeGraph, ListKnowledgeBasesQuery, ListKnowledgeBasesRequest,
    LoginRequest, RegisterRequest, RemoveTagsRequest, RenameTagRequest, TenantInfo,
    TenantInfoRequest, UpdateKnowledgeBaseRequest, UserProfile, UserSettingRequest, API_VERSION,
};
use kbase_crypto::{CredentialEncoder, CryptoError, RsaCredentialEncoder};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::navigation::NavigationCoordinator;
use crate::notifier::Notifier;
use crate::pipeline::{ApiResponse, RequestEnvelope, RequestPipeline};
use crate::session::SessionStore;
use crate::transport::ReqwestTransport;

fn api_path(path: &str) -> String {
    format!("/{API_VERSION}{path}")
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Typed endpoints of the knowledge-base service over a [`RequestPipeline`].
pub struct KbClient {
    pipeline: RequestPipeline,
    encoder: Arc<dyn CredentialEncoder>,
}

impl KbClient {
    #[must_use]
    pub fn new(pipeline: RequestPipeline, encoder: Arc<dyn CredentialEncoder>) -> Self {
        Self { pipeline, encoder }
    }

    /// Wires the reqwest transport and the RSA encoder from `config`.
    pub fn from_config(
        config: &ClientConfig,
        session: Arc<dyn SessionStore>,
        navigator: Arc<NavigationCoordinator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        let encoder = match config.public_key_pem.as_deref() {
            Some(pem) => RsaCredentialEncoder::from_pem(pem),
            None => RsaCredentialEncoder::bundled(),
        };
        let pipeline = RequestPipeline::new(config, Arc::new(transport), session, navigator, notifier);
        Ok(Self::new(pipeline, Arc::new(encoder)))
    }

    #[must_use]
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    pub fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.pipeline.session().is_present()?)
    }

    #[must_use]
    pub fn encryption_supported(&self) -> bool {
        self.encoder.is_supported()
    }

    fn encode_password(&self, secret: &str) -> Result<String, ClientError> {
        if !self.encoder.is_supported() {
            return Err(ClientError::CryptoUnavailable(CryptoError::EncodingUnavailable));
        }
        Ok(self.encoder.encode(secret)?)
    }

    /// Logs in with an encrypted password and stores the issued credential.
    /// A non-zero `code` is returned as-is and leaves the session untouched.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<UserProfile>, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: self.encode_password(password)?,
        };
        let envelope = RequestEnvelope::post(api_path("/user/login")).with_json(&payload)?;
        let response = self.pipeline.send(envelope).await?;
        if response.is_success() {
            let token = response
                .authorization()
                .ok_or(ClientError::MissingCredential)?;
            self.pipeline.session().set(token)?;
            info!(email = %email, "logged in");
        } else {
            debug!(code = response.payload.code, "login refused");
        }
        Ok(ApiResponse {
            payload: response.payload.decode_data()?,
            headers: response.headers,
        })
    }

    /// Ends the session. Without a credential this is a no-op; otherwise the
    /// credential is dropped whatever the server answers.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if !self.pipeline.session().is_present()? {
            debug!("logout without session");
            return Ok(());
        }
        let result = self
            .pipeline
            .send(RequestEnvelope::get(api_path("/user/logout")))
            .await;
        self.pipeline.session().clear()?;
        info!("logged out");
        match result {
            Ok(_) | Err(ClientError::AuthRejected { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub async fn register(
        &self,
        nickname: &str,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<UserProfile>, ClientError> {
        let payload = RegisterRequest {
            nickname: nickname.to_string(),
            email: email.to_string(),
            password: self.encode_password(password)?,
        };
        let envelope = RequestEnvelope::post(api_path("/user/register")).with_json(&payload)?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn user_info(&self) -> Result<ApiResponse<UserProfile>, ClientError> {
        self.pipeline
            .send_as(RequestEnvelope::get(api_path("/user/info")))
            .await
    }

    /// Passwords are encrypted the same way as on login.
    pub async fn update_user_setting(
        &self,
        nickname: Option<String>,
        password: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<ApiResponse<bool>, ClientError> {
        let payload = UserSettingRequest {
            nickname,
            password: password
                .map(|value| self.encode_password(value))
                .transpose()?,
            new_password: new_password
                .map(|value| self.encode_password(value))
                .transpose()?,
        };
        let envelope = RequestEnvelope::post(api_path("/user/setting")).with_json(&payload)?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn tenant_info(&self) -> Result<ApiResponse<TenantInfo>, ClientError> {
        self.pipeline
            .send_as(RequestEnvelope::get(api_path("/user/tenant_info")))
            .await
    }

    pub async fn set_tenant_info(
        &self,
        payload: &TenantInfoRequest,
    ) -> Result<ApiResponse<bool>, ClientError> {
        let envelope =
            RequestEnvelope::post(api_path("/user/set_tenant_info")).with_json(payload)?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn create_kb(
        &self,
        payload: &CreateKnowledgeBaseRequest,
    ) -> Result<ApiResponse<CreatedKnowledgeBase>, ClientError> {
        let envelope = RequestEnvelope::post(api_path("/kb/create")).with_json(payload)?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn update_kb(
        &self,
        payload: &UpdateKnowledgeBaseRequest,
    ) -> Result<ApiResponse<KnowledgeBase>, ClientError> {
        let envelope = RequestEnvelope::post(api_path("/kb/update")).with_json(payload)?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn get_kb(&self, kb_id: &str) -> Result<ApiResponse<KnowledgeBase>, ClientError> {
        let envelope = RequestEnvelope::get(api_path("/kb/detail"))
            .with_query(vec![("kb_id".to_string(), kb_id.to_string())]);
        self.pipeline.send_as(envelope).await
    }

    pub async fn list_kbs(
        &self,
        query: &ListKnowledgeBasesQuery,
        payload: &ListKnowledgeBasesRequest,
    ) -> Result<ApiResponse<KnowledgeBaseList>, ClientError> {
        let envelope = RequestEnvelope::post(api_path("/kb/list"))
            .with_query(query.to_pairs())
            .with_json(payload)?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn delete_kb(&self, kb_id: &str) -> Result<ApiResponse<bool>, ClientError> {
        let payload = KnowledgeBaseIdRequest {
            kb_id: kb_id.to_string(),
        };
        let envelope = RequestEnvelope::post(api_path("/kb/rm")).with_json(&payload)?;
        self.pipeline.send_as(envelope).await
    }

    /// Document and chunk statistics of one knowledge base.
    pub async fn basic_info(
        &self,
        kb_id: &str,
    ) -> Result<ApiResponse<serde_json::Value>, ClientError> {
        let envelope = RequestEnvelope::get(api_path("/kb/basic_info"))
            .with_query(vec![("kb_id".to_string(), kb_id.to_string())]);
        self.pipeline.send_as(envelope).await
    }

    /// Document metadata values across the given knowledge bases.
    pub async fn get_meta(
        &self,
        kb_ids: &[String],
    ) -> Result<ApiResponse<serde_json::Value>, ClientError> {
        let envelope = RequestEnvelope::get(api_path("/kb/get_meta"))
            .with_query(vec![("kb_ids".to_string(), kb_ids.join(","))]);
        self.pipeline.send_as(envelope).await
    }

    pub async fn knowledge_graph(
        &self,
        kb_id: &str,
    ) -> Result<ApiResponse<KnowledgeGraph>, ClientError> {
        let path = api_path(&format!("/kb/{}/knowledge_graph", segment(kb_id)));
        self.pipeline.send_as(RequestEnvelope::get(path)).await
    }

    pub async fn delete_knowledge_graph(
        &self,
        kb_id: &str,
    ) -> Result<ApiResponse<bool>, ClientError> {
        let path = api_path(&format!("/kb/{}/knowledge_graph", segment(kb_id)));
        self.pipeline.send_as(RequestEnvelope::delete(path)).await
    }

    pub async fn list_tags(
        &self,
        kb_id: &str,
    ) -> Result<ApiResponse<Vec<serde_json::Value>>, ClientError> {
        let path = api_path(&format!("/kb/{}/tags", segment(kb_id)));
        self.pipeline.send_as(RequestEnvelope::get(path)).await
    }

    pub async fn list_tags_for_kbs(
        &self,
        kb_ids: &[String],
    ) -> Result<ApiResponse<Vec<serde_json::Value>>, ClientError> {
        let envelope = RequestEnvelope::get(api_path("/kb/tags"))
            .with_query(vec![("kb_ids".to_string(), kb_ids.join(","))]);
        self.pipeline.send_as(envelope).await
    }

    pub async fn remove_tags(
        &self,
        kb_id: &str,
        tags: Vec<String>,
    ) -> Result<ApiResponse<bool>, ClientError> {
        let path = api_path(&format!("/kb/{}/rm_tags", segment(kb_id)));
        let envelope = RequestEnvelope::post(path).with_json(&RemoveTagsRequest { tags })?;
        self.pipeline.send_as(envelope).await
    }

    pub async fn rename_tag(
        &self,
        kb_id: &str,
        from_tag: &str,
        to_tag: &str,
    ) -> Result<ApiResponse<bool>, ClientError> {
        let path = api_path(&format!("/kb/{}/rename_tag", segment(kb_id)));
        let payload = RenameTagRequest {
            from_tag: from_tag.to_string(),
            to_tag: to_tag.to_string(),
        };
        let envelope = RequestEnvelope::post(path).with_json(&payload)?;
        self.pipeline.send_as(envelope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_versioned_and_escaped() {
        assert_eq!(api_path("/kb/list"), "/v1/kb/list");
        assert_eq!(segment("kb 1/a"), "kb%201%2Fa");
    }
}
