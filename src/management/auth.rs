use std::{path::PathBuf, sync::Arc};

use crate::{
    config,
    error::{Error, Result},
    spotify::auth::{self, SpotifyAuth},
    types::Token,
};

/// Holds the user's token and refreshes it when it is about to expire.
pub struct TokenManager {
    token: Token,
    identity: Arc<SpotifyAuth>,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, identity: Arc<SpotifyAuth>) -> Self {
        TokenManager {
            token,
            identity,
            path: Self::token_path(),
        }
    }

    pub async fn load(identity: Arc<SpotifyAuth>) -> Result<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            Error::Auth(format!(
                "no stored token at {} ({}), run `vibemix auth` first",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| Error::Auth(format!("stored token is unreadable: {}", e)))?;
        Ok(Self {
            token,
            identity,
            path,
        })
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Removes the stored token so the next run has to authenticate again.
    pub async fn forget(&self) -> Result<()> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns an access token, refreshing it first when it is about to expire.
    ///
    /// A failed refresh is an [`Error::Auth`]; the caller must authenticate again.
    pub async fn get_valid_token(&mut self) -> Result<String> {
        if auth::is_expired(&self.token) {
            log::debug!("access token expired, refreshing");
            self.token = self.identity.refresh(&self.token.refresh_token).await?;
            if let Err(e) = self.persist().await {
                log::warn!("failed to persist refreshed token: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("token.json")
    }
}
