//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Challenge, DataSource, DetectionResult, Phase, Skill, SkillCategory};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    SetChallenge {
        title: String,
        description: String,
    },
    LoadChallenges {
        #[serde(default)]
        difficulty: Option<String>,
        #[serde(default)]
        limit: Option<i64>,
    },
    SelectChallenge {
        index: i64,
    },
    Guide {
        phase: String,
        content: String,
    },
    Skills {
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        limit: Option<i64>,
    },
    Analyze {
        title: String,
        description: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    ChallengeSet {
        ok: bool,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        challenge: Option<Challenge>,
    },
    Challenges {
        challenges: Vec<Challenge>,
        source: DataSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        notice: Option<String>,
    },
    Guidance {
        ok: bool,
        phase: Phase,
        feedback: String,
    },
    Skills {
        category: SkillCategory,
        skills: Vec<Skill>,
        source: DataSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        notice: Option<String>,
    },
    Analysis {
        result: DetectionResult,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub provider: String,
    pub sessions: usize,
}

#[derive(Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetChallengeIn {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectChallengeIn {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    pub index: i64,
}

/// Reply to both set and select.
#[derive(Serialize)]
pub struct ChallengeOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<Challenge>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengesQuery {
    pub difficulty: Option<String>,
    pub limit: Option<i64>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// `sessionId` is present only when the request named a session; it is the id
/// the listing was offered to, which differs from the request when that was unknown.
#[derive(Serialize)]
pub struct ChallengesOut {
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub challenges: Vec<Challenge>,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillsQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct SkillsOut {
    pub category: SkillCategory,
    pub skills: Vec<Skill>,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CanvasIn {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    pub phase: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct CanvasOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub ok: bool,
    pub phase: Phase,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeIn {
    pub title: String,
    pub description: String,
}
