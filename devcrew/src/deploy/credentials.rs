//! Push credentials and the authentication strategy derived from them.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const USERNAME_ENV: &str = "GITHUB_USERNAME";
pub const REMOTE_URL_ENV: &str = "GITHUB_REPO_URL";

const REDACTED: &str = "***";

/// Optional bundle read from the environment. Any field may be missing.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub token: Option<SecretString>,
    pub username: Option<String>,
    pub remote_url: Option<String>,
}

/// Where credentials come from. Read once per deployment attempt.
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> Option<Credentials>;
}

/// Reads `GITHUB_TOKEN`, `GITHUB_USERNAME` and `GITHUB_REPO_URL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credentials(&self) -> Option<Credentials> {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let creds = Credentials {
            token: read(TOKEN_ENV).map(SecretString::from),
            username: read(USERNAME_ENV),
            remote_url: read(REMOTE_URL_ENV),
        };
        if creds.token.is_none() && creds.username.is_none() && creds.remote_url.is_none() {
            None
        } else {
            Some(creds)
        }
    }
}

/// Fixed credentials, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub Option<Credentials>);

impl CredentialSource for StaticCredentials {
    fn credentials(&self) -> Option<Credentials> {
        self.0.clone()
    }
}

/// How the push authenticates, resolved once per deployment.
#[derive(Debug, Clone)]
pub enum PushTarget {
    /// Push to an explicit URL with `username:token` embedded.
    Token {
        url: SecretString,
        display_url: String,
        token: SecretString,
    },
    /// Push to a remote alias configured in the working tree.
    Remote { name: String },
}

impl PushTarget {
    /// Token strategy when the bundle is complete and the URL parses,
    /// otherwise the default remote.
    pub fn resolve(creds: Option<&Credentials>, default_remote: &str) -> Self {
        let fallback = || PushTarget::Remote {
            name: default_remote.to_string(),
        };
        let Some(creds) = creds else {
            return fallback();
        };
        let (Some(token), Some(username), Some(remote_url)) =
            (&creds.token, &creds.username, &creds.remote_url)
        else {
            tracing::debug!("Credentials incomplete, using default remote");
            return fallback();
        };
        if token.expose_secret().is_empty() || username.is_empty() {
            return fallback();
        }

        match authenticated_url(remote_url, username, token.expose_secret()) {
            Some(url) => PushTarget::Token {
                url: SecretString::from(url),
                display_url: remote_url.clone(),
                token: token.clone(),
            },
            None => {
                tracing::warn!(remote_url = %remote_url, "Remote URL is not a valid URL, using default remote");
                fallback()
            }
        }
    }

    /// The repository argument passed to `git push`.
    pub fn repository_arg(&self) -> String {
        match self {
            PushTarget::Token { url, .. } => url.expose_secret().to_string(),
            PushTarget::Remote { name } => name.clone(),
        }
    }

    /// Loggable description of the target. Never contains the token.
    pub fn describe(&self) -> String {
        match self {
            PushTarget::Token { display_url, .. } => format!("token-authenticated {display_url}"),
            PushTarget::Remote { name } => format!("remote {name}"),
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            PushTarget::Token { .. } => "token",
            PushTarget::Remote { .. } => "default",
        }
    }

    /// Strip the token from text derived from a push attempt.
    pub fn redact(&self, text: &str) -> String {
        match self {
            PushTarget::Token { token, .. } => {
                let raw = token.expose_secret();
                let mut out = text.replace(raw, REDACTED);
                // git may echo the token percent-encoded inside a URL.
                let encoded = encode_userinfo(raw);
                if encoded != raw {
                    out = out.replace(&encoded, REDACTED);
                }
                out
            }
            PushTarget::Remote { .. } => text.to_string(),
        }
    }
}

fn authenticated_url(remote_url: &str, username: &str, token: &str) -> Option<String> {
    let mut url = Url::parse(remote_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_username(username).ok()?;
    url.set_password(Some(token)).ok()?;
    Some(url.to_string())
}

fn encode_userinfo(raw: &str) -> String {
    let mut scratch = match Url::parse("https://host/") {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };
    if scratch.set_password(Some(raw)).is_err() {
        return raw.to_string();
    }
    scratch.password().unwrap_or(raw).to_string()
}
