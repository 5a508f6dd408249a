use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

/// Program flavour carried on the job; selects which destination tree gets written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Strength,
    Cardio,
}

impl ProgramType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgramType::Strength => "strength",
            ProgramType::Cardio => "cardio",
        }
    }
}

impl std::fmt::Display for ProgramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to copy one published program into a user's account.
///
/// Field names on the wire match the enqueuer's payload, not the Rust names.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CloneJob {
    #[serde(rename = "communityProgramId")]
    pub snapshot_id: Uuid,
    #[serde(rename = "programId")]
    pub destination_program_id: Uuid,
    #[serde(rename = "userId")]
    pub owner_user_id: String,
    #[serde(rename = "programType")]
    pub program_type: ProgramType,
}

pub const REQUIRED_FIELDS: [&str; 4] = ["communityProgramId", "programId", "userId", "programType"];

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("request body is not a push envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),
    #[error("missing message.data")]
    MissingData,
    #[error("message data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("message data is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("job payload is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("job payload has an invalid field: {0}")]
    InvalidField(#[source] serde_json::Error),
}

#[derive(Debug, Default, serde::Deserialize)]
struct PushEnvelope {
    message: Option<PushMessage>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct PushMessage {
    data: Option<String>,
}

/// Decode a broker push body: `{ "message": { "data": "<base64 json>" } }`.
pub fn decode_push_body(body: &[u8]) -> Result<CloneJob, JobError> {
    let envelope: PushEnvelope = serde_json::from_slice(body).map_err(JobError::InvalidEnvelope)?;
    let data = envelope
        .message
        .and_then(|m| m.data)
        .filter(|d| !d.trim().is_empty())
        .ok_or(JobError::MissingData)?;
    decode_message_data(&data)
}

/// Decode the base64 `data` attribute shared by push and pull deliveries.
pub fn decode_message_data(data: &str) -> Result<CloneJob, JobError> {
    let raw = STANDARD.decode(data.trim())?;
    let value: serde_json::Value = serde_json::from_slice(&raw).map_err(JobError::InvalidJson)?;

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| value.get(field).is_none_or(|v| v.is_null()))
        .collect();
    if !missing.is_empty() {
        return Err(JobError::MissingFields(missing));
    }

    serde_json::from_value(value).map_err(JobError::InvalidField)
}

impl CloneJob {
    /// Base64 JSON as published on the transport.
    pub fn to_message_data(&self) -> String {
        // Serializing a struct of plain strings/uuids cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(json)
    }
}
