//! Remote catalog provider: a pluggable source of live challenges and skills.
//!
//! One protocol only: JSON POST to `{base}/challenges` or `{base}/skills`,
//! bearer token auth, JSON body back. Calls are bounded (per-attempt timeout,
//! fixed number of attempts with fixed backoff). Callers treat every error
//! as "use the static catalog".
//!
//! NOTE: We never log the token and we truncate response bodies in logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::domain::{Challenge, ChallengeExample, ChallengeSource, Difficulty, Skill, SkillCategory};
use crate::util::trunc_for_log;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/v1";

#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("transport error: {0}")]
  Transport(String),
  #[error("request timed out")]
  Timeout,
  #[error("provider HTTP {status}: {body}")]
  Status { status: u16, body: String },
  #[error("malformed provider payload: {0}")]
  Decode(String),
  #[error("provider returned no usable records")]
  Empty,
}

impl ProviderError {
  /// Only transient failures are worth another attempt.
  fn is_retryable(&self) -> bool {
    match self {
      ProviderError::Transport(_) | ProviderError::Timeout => true,
      ProviderError::Status { status, .. } => *status >= 500,
      ProviderError::Decode(_) | ProviderError::Empty => false,
    }
  }
}

impl From<reqwest::Error> for ProviderError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      ProviderError::Timeout
    } else if e.is_decode() {
      ProviderError::Decode(e.to_string())
    } else {
      ProviderError::Transport(e.to_string())
    }
  }
}

/// Source of live catalog data. Implementations must not panic; every failure is a `ProviderError`.
#[async_trait]
pub trait CatalogProvider: Send + Sync + 'static {
  /// Short label for logs and the health endpoint.
  fn name(&self) -> &str;

  async fn fetch_challenges(&self, difficulty: Difficulty, limit: usize) -> Result<Vec<Challenge>, ProviderError>;

  async fn fetch_skills(&self, category: SkillCategory, limit: usize) -> Result<Vec<Skill>, ProviderError>;
}

/// Connection settings, read once at startup.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
  pub base_url: String,
  pub token: String,
  pub timeout: Duration,
  pub max_attempts: u32,
  pub backoff: Duration,
}

impl ProviderSettings {
  pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      token: token.into(),
      timeout: Duration::from_secs(10),
      max_attempts: 3,
      backoff: Duration::from_millis(500),
    }
  }

  /// Returns None when CATALOG_API_TOKEN is absent: remote path disabled.
  pub fn from_env() -> Option<Self> {
    let token = std::env::var("CATALOG_API_TOKEN").ok().filter(|t| !t.trim().is_empty())?;
    let base_url = std::env::var("CATALOG_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let mut s = Self::new(base_url, token);
    if let Some(secs) = env_parse::<u64>("CATALOG_API_TIMEOUT_SECS") {
      s.timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(n) = env_parse::<u32>("CATALOG_API_MAX_ATTEMPTS") {
      s.max_attempts = n.clamp(1, 3);
    }
    if let Some(ms) = env_parse::<u64>("CATALOG_API_BACKOFF_MS") {
      s.backoff = Duration::from_millis(ms);
    }
    Some(s)
  }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
  std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[derive(Clone)]
pub struct HttpCatalogProvider {
  client: reqwest::Client,
  settings: ProviderSettings,
}

impl HttpCatalogProvider {
  pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
    let client = reqwest::Client::builder()
      .timeout(settings.timeout)
      .build()
      .map_err(|e| ProviderError::Transport(e.to_string()))?;
    Ok(Self { client, settings })
  }

  pub fn base_url(&self) -> &str {
    &self.settings.base_url
  }

  /// Fixed-backoff retry loop around `post_once`.
  #[instrument(level = "info", skip(self, body), fields(%route, max_attempts = self.settings.max_attempts))]
  async fn post_json<B, T>(&self, route: &str, body: &B) -> Result<T, ProviderError>
  where
    B: Serialize + Sync,
    T: for<'a> Deserialize<'a>,
  {
    let attempts = self.settings.max_attempts.max(1);
    let mut attempt = 1;
    loop {
      match self.post_once::<B, T>(route, body).await {
        Ok(v) => return Ok(v),
        Err(e) if e.is_retryable() && attempt < attempts => {
          warn!(target: "canvas", %route, attempt, error = %e, "Provider call failed; retrying");
          tokio::time::sleep(self.settings.backoff).await;
          attempt += 1;
        }
        Err(e) => {
          error!(target: "canvas", %route, attempt, error = %e, "Provider call failed");
          return Err(e);
        }
      }
    }
  }

  async fn post_once<B, T>(&self, route: &str, body: &B) -> Result<T, ProviderError>
  where
    B: Serialize + Sync,
    T: for<'a> Deserialize<'a>,
  {
    let url = format!("{}/{}", self.settings.base_url, route);
    let res = self.client.post(&url)
      .header(USER_AGENT, "professor-algorithm-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(ACCEPT, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.settings.token))
      .json(body).send().await?;

    let status = res.status();
    let text = res.text().await?;
    debug!(target: "canvas", %route, status = status.as_u16(), body = %trunc_for_log(&text, 200), "Provider response");

    if !status.is_success() {
      return Err(ProviderError::Status { status: status.as_u16(), body: trunc_for_log(&text, 200) });
    }
    serde_json::from_str::<T>(&text).map_err(|e| ProviderError::Decode(e.to_string()))
  }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
  fn name(&self) -> &str {
    "http"
  }

  #[instrument(level = "info", skip(self), fields(%difficulty, limit))]
  async fn fetch_challenges(&self, difficulty: Difficulty, limit: usize) -> Result<Vec<Challenge>, ProviderError> {
    let req = ChallengesRequest { difficulty, limit };
    let body: ChallengesResponse = self.post_json("challenges", &req).await?;
    let out: Vec<Challenge> = body
      .challenges
      .into_iter()
      .filter_map(|r| r.into_challenge(difficulty))
      .take(limit)
      .collect();
    if out.is_empty() {
      return Err(ProviderError::Empty);
    }
    Ok(out)
  }

  #[instrument(level = "info", skip(self), fields(%category, limit))]
  async fn fetch_skills(&self, category: SkillCategory, limit: usize) -> Result<Vec<Skill>, ProviderError> {
    let req = SkillsRequest { category, limit };
    let body: SkillsResponse = self.post_json("skills", &req).await?;
    let out: Vec<Skill> = body
      .skills
      .into_iter()
      .filter_map(|r| r.into_skill(category))
      .take(limit)
      .collect();
    if out.is_empty() {
      return Err(ProviderError::Empty);
    }
    Ok(out)
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct ChallengesRequest {
  difficulty: Difficulty,
  limit: usize,
}

#[derive(Serialize)]
struct SkillsRequest {
  category: SkillCategory,
  limit: usize,
}

#[derive(Deserialize)]
struct ChallengesResponse {
  #[serde(default)] challenges: Vec<ChallengeRecord>,
}

#[derive(Deserialize)]
struct ChallengeRecord {
  #[serde(default)] id: Option<String>,
  #[serde(default)] name: String,
  #[serde(default)] description: String,
  #[serde(default)] skills: Vec<String>,
  #[serde(default)] difficulty: Option<String>,
  #[serde(default)] examples: Vec<ChallengeExample>,
}

impl ChallengeRecord {
  /// Records without a name, or labelled with another difficulty, are unusable.
  /// A missing difficulty takes the requested one.
  fn into_challenge(self, requested: Difficulty) -> Option<Challenge> {
    let name = self.name.trim();
    if name.is_empty() {
      return None;
    }
    let difficulty = self.difficulty.as_deref().map(Difficulty::from_name).unwrap_or(requested);
    if difficulty != requested {
      debug!(target: "canvas", %name, %difficulty, %requested, "Dropping provider challenge of another difficulty");
      return None;
    }
    Some(Challenge {
      id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
      name: name.to_string(),
      description: self.description.trim().to_string(),
      skills: self.skills,
      difficulty,
      examples: self.examples,
      source: ChallengeSource::Remote,
    })
  }
}

#[derive(Deserialize)]
struct SkillsResponse {
  #[serde(default)] skills: Vec<SkillRecord>,
}

#[derive(Deserialize)]
struct SkillRecord {
  #[serde(default)] name: String,
  #[serde(default)] description: String,
  #[serde(default)] category: Option<String>,
}

impl SkillRecord {
  fn into_skill(self, requested: SkillCategory) -> Option<Skill> {
    let name = self.name.trim();
    if name.is_empty() {
      return None;
    }
    let category = self.category.as_deref().map(SkillCategory::from_name).unwrap_or(requested);
    if category != requested {
      debug!(target: "canvas", %name, %category, %requested, "Dropping provider skill of another category");
      return None;
    }
    Some(Skill {
      name: name.to_string(),
      description: self.description.trim().to_string(),
      category,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{body_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn provider_for(server: &MockServer) -> HttpCatalogProvider {
    let mut s = ProviderSettings::new(server.uri(), "secret-token");
    s.backoff = Duration::from_millis(5);
    s.timeout = Duration::from_secs(2);
    HttpCatalogProvider::new(s).expect("client")
  }

  #[tokio::test]
  async fn fetches_and_maps_challenges() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/challenges"))
      .and(header("authorization", "Bearer secret-token"))
      .and(body_json(json!({ "difficulty": "medium", "limit": 2 })))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "challenges": [
          { "name": "Rotate Image", "description": "Rotate a matrix in-place.", "skills": ["arrays"],
            "difficulty": "medium", "examples": [{ "input": "[[1,2],[3,4]]", "output": "[[3,1],[4,2]]" }] },
          { "name": "  ", "description": "nameless records are dropped" },
          { "name": "Median of Two Sorted Arrays", "description": "wrong difficulty", "difficulty": "hard" },
          { "name": "Jump Game", "description": "Can you reach the end?" }
        ]
      })))
      .expect(1)
      .mount(&server)
      .await;

    let got = provider_for(&server).fetch_challenges(Difficulty::Medium, 2).await.expect("challenges");
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].name, "Rotate Image");
    assert_eq!(got[0].examples.len(), 1);
    assert_eq!(got[0].source, ChallengeSource::Remote);
    assert_eq!(got[1].name, "Jump Game");
    assert_eq!(got[1].difficulty, Difficulty::Medium);
  }

  #[tokio::test]
  async fn server_errors_are_retried_up_to_the_attempt_bound() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/challenges"))
      .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
      .expect(3)
      .mount(&server)
      .await;

    let err = provider_for(&server).fetch_challenges(Difficulty::Easy, 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 500, .. }), "got {err:?}");
  }

  #[tokio::test]
  async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/skills"))
      .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
      .expect(1)
      .mount(&server)
      .await;

    let err = provider_for(&server).fetch_skills(SkillCategory::Algorithms, 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 401, .. }), "got {err:?}");
  }

  #[tokio::test]
  async fn malformed_and_empty_payloads_are_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/challenges"))
      .respond_with(ResponseTemplate::new(200).set_body_string("event: message\ndata: {}"))
      .mount(&server)
      .await;
    Mock::given(method("POST"))
      .and(path("/skills"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "skills": [] })))
      .mount(&server)
      .await;

    let p = provider_for(&server);
    assert!(matches!(p.fetch_challenges(Difficulty::Easy, 5).await, Err(ProviderError::Decode(_))));
    assert!(matches!(p.fetch_skills(SkillCategory::DataStructures, 5).await, Err(ProviderError::Empty)));
  }

  #[tokio::test]
  async fn skills_default_to_requested_category() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/skills"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "skills": [
          { "name": "Tries", "description": "Prefix trees" },
          { "name": "Big-O", "description": "Asymptotic bounds", "category": "complexity_analysis" }
        ]
      })))
      .mount(&server)
      .await;

    let got = provider_for(&server).fetch_skills(SkillCategory::DataStructures, 10).await.expect("skills");
    assert_eq!(got, vec![Skill {
      name: "Tries".into(),
      description: "Prefix trees".into(),
      category: SkillCategory::DataStructures,
    }]);
  }

  #[tokio::test]
  async fn records_of_another_difficulty_only_are_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/challenges"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "challenges": [{ "name": "N-Queens", "description": "Place n queens.", "difficulty": "hard" }]
      })))
      .mount(&server)
      .await;

    let err = provider_for(&server).fetch_challenges(Difficulty::Easy, 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Empty), "got {err:?}");
  }

  #[tokio::test]
  async fn slow_responses_time_out_and_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/challenges"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({ "challenges": [{ "name": "Two Sum", "description": "late" }] }))
          .set_delay(Duration::from_millis(500)),
      )
      .expect(3)
      .mount(&server)
      .await;

    let mut s = ProviderSettings::new(server.uri(), "secret-token");
    s.backoff = Duration::from_millis(5);
    s.timeout = Duration::from_millis(50);
    let err = HttpCatalogProvider::new(s).expect("client").fetch_challenges(Difficulty::Easy, 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout), "got {err:?}");
  }
}
