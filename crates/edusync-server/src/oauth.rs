//! GitHub OAuth web flow.
//!
//! `/github` sends the user agent to GitHub's authorize page; GitHub calls back
//! with a `code` which is exchanged for an access token and then for the user's
//! profile. Only the profile is kept, in the session.

use reqwest::{Client, Url, header};
use serde::{Deserialize, Serialize};

use crate::config::GithubCredentials;

/// Scope requested from GitHub.
pub const OAUTH_SCOPE: &str = "user:email";

const USER_AGENT: &str = concat!("edusync-api/", env!("CARGO_PKG_VERSION"));

/// OAuth flow errors. None of them are shown to the user agent.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid OAuth endpoint: {0}")]
    Endpoint(String),

    #[error("GitHub rejected the authorization: {0}")]
    Rejected(String),

    #[error("GitHub returned no access token")]
    MissingToken,
}

/// GitHub endpoints, overridable for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Default for GithubEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            api_url: "https://api.github.com".to_string(),
        }
    }
}

/// The subset of the GitHub profile kept in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl GithubUser {
    /// Profile name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// GitHub OAuth client.
#[derive(Debug, Clone)]
pub struct GithubOAuth {
    credentials: GithubCredentials,
    endpoints: GithubEndpoints,
    http: Client,
}

impl GithubOAuth {
    pub fn new(credentials: GithubCredentials) -> Self {
        Self {
            credentials,
            endpoints: GithubEndpoints::default(),
            http: Client::new(),
        }
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: GithubEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Where to send the user agent to start a login.
    pub fn authorize_url(&self) -> Result<Url, OAuthError> {
        Url::parse_with_params(
            &self.endpoints.authorize_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.credentials.callback_url.as_str()),
                ("scope", OAUTH_SCOPE),
            ],
        )
        .map_err(|e| OAuthError::Endpoint(format!("{}: {}", self.endpoints.authorize_url, e)))
    }

    /// Exchange a callback `code` for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response: TokenResponse = self
            .http
            .post(&self.endpoints.token_url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .json(&TokenRequest {
                client_id: &self.credentials.client_id,
                client_secret: &self.credentials.client_secret,
                code,
                redirect_uri: &self.credentials.callback_url,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            let detail = response
                .error_description
                .map(|d| format!("{error}: {d}"))
                .unwrap_or(error);
            return Err(OAuthError::Rejected(detail));
        }

        response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingToken)
    }

    /// Fetch the profile of the token's owner.
    pub async fn fetch_user(&self, access_token: &str) -> Result<GithubUser, OAuthError> {
        let url = format!("{}/user", self.endpoints.api_url.trim_end_matches('/'));

        let user = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(user)
    }

    /// Run the whole callback exchange.
    pub async fn complete_login(&self, code: &str) -> Result<GithubUser, OAuthError> {
        let token = self.exchange_code(code).await?;
        self.fetch_user(&token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> GithubCredentials {
        GithubCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            callback_url: "http://localhost:3000/github/callback".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> GithubOAuth {
        GithubOAuth::new(credentials()).with_endpoints(GithubEndpoints {
            authorize_url: format!("{}/login/oauth/authorize", server.uri()),
            token_url: format!("{}/login/oauth/access_token", server.uri()),
            api_url: server.uri(),
        })
    }

    #[test]
    fn test_authorize_url() {
        let url = GithubOAuth::new(credentials()).authorize_url().unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
        assert_eq!(url.path(), "/login/oauth/authorize");

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(query.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:3000/github/callback".to_string()
        )));
        assert!(query.contains(&("scope".to_string(), "user:email".to_string())));
    }

    #[test]
    fn test_display_name_falls_back_to_login() {
        let mut user = GithubUser {
            id: 1,
            login: "octocat".to_string(),
            name: None,
            avatar_url: None,
            html_url: None,
        };
        assert_eq!(user.display_name(), "octocat");
        user.name = Some("Mona".to_string());
        assert_eq!(user.display_name(), "Mona");
    }

    #[tokio::test]
    async fn test_complete_login() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(body_json(json!({
                "client_id": "client-id",
                "client_secret": "client-secret",
                "code": "abc",
                "redirect_uri": "http://localhost:3000/github/callback"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "gho_token",
                "token_type": "bearer",
                "scope": "user:email"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header_is("authorization", "Bearer gho_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 583231,
                "login": "octocat",
                "name": "The Octocat",
                "avatar_url": "https://github.com/images/error/octocat_happy.gif",
                "html_url": "https://github.com/octocat",
                "public_repos": 8
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client_for(&server).complete_login("abc").await.unwrap();
        assert_eq!(user.id, 583231);
        assert_eq!(user.login, "octocat");
        assert_eq!(user.display_name(), "The Octocat");
    }

    #[tokio::test]
    async fn test_rejected_code() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).exchange_code("stale").await.unwrap_err();
        assert!(matches!(err, OAuthError::Rejected(ref d) if d.starts_with("bad_verification_code")));
    }

    #[tokio::test]
    async fn test_missing_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).exchange_code("abc").await.unwrap_err();
        assert!(matches!(err, OAuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_profile_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_user("revoked").await.unwrap_err();
        assert!(matches!(err, OAuthError::Http(_)));
    }
}
