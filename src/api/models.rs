//! Response models for the consumed operations.

use serde::Deserialize;

/// A full identity record for an authenticated user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable user id.
    pub id: String,
    /// Account username.
    pub username: String,
    /// Contact email, when the service exposes it.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, when set.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Marker body returned when primary credentials were accepted but a second
/// factor is required before a session is granted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorChallenge {
    /// Discriminator field; its presence is what identifies the challenge.
    pub factor_required: bool,
    /// Factor kinds the account has enrolled, when the service lists them.
    #[serde(default)]
    pub available_factors: Vec<String>,
}

/// Body of the identity endpoint: either a challenge or the real record.
///
/// Variant order matters for the untagged representation: the challenge is
/// tried first so its discriminator field wins over a partial identity match.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CurrentUser {
    /// A second factor is required.
    FactorRequired(FactorChallenge),
    /// The authenticated identity.
    Identity(Identity),
}

/// Outcome of one factor-verification call.
#[derive(Debug, Clone, Copy)]
pub struct FactorVerification {
    /// Whether the service accepted the code.
    pub verified: bool,
    /// Transport status of the verification response.
    pub status: u16,
}
