//! Bitbucket Cloud pull request comments API.

use async_trait::async_trait;

use super::{CommentPoster, PublishError};
use crate::config::BitbucketConfig;
use crate::models::ReviewComment;

/// Posts comments with app-password basic auth.
pub struct BitbucketPoster {
    client: reqwest::Client,
    api_base: String,
    username: String,
    app_password: String,
}

impl BitbucketPoster {
    pub fn new(
        api_base: impl Into<String>,
        username: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            username: username.into(),
            app_password: app_password.into(),
        }
    }

    /// Fails when the username or app password is missing.
    pub fn from_config(config: &BitbucketConfig) -> Result<Self, PublishError> {
        let (username, app_password) = config.credentials().ok_or_else(|| {
            PublishError::MissingCredentials(format!(
                "set {} and {}",
                crate::constants::ENV_BITBUCKET_USERNAME,
                crate::constants::ENV_BITBUCKET_APP_PASSWORD
            ))
        })?;
        Ok(Self::new(&config.api_base, username, app_password))
    }

    fn comments_url(&self, full_name: &str, pr_id: u64) -> String {
        format!(
            "{}/repositories/{full_name}/pullrequests/{pr_id}/comments",
            self.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CommentPoster for BitbucketPoster {
    async fn post(
        &self,
        full_name: &str,
        pr_id: u64,
        comment: &ReviewComment,
    ) -> Result<(), PublishError> {
        let response = self
            .client
            .post(self.comments_url(full_name, pr_id))
            .basic_auth(&self.username, Some(&self.app_password))
            .json(comment)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
