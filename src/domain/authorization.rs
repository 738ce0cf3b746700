use super::order::PaymentId;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const APPROVED: &str = "approved";
pub const DENIED: &str = "denied";

#[derive(Deserialize)]
struct RawAuthorization {
    status: String,
    #[serde(default)]
    payment_id: Option<PaymentId>,
}

/// Status of a declined authorization. Never `"approved"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclineStatus(String);

impl DeclineStatus {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeclineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer of a `PaymentGateway` to an authorization request.
///
/// Only an exact `"approved"` status is an approval, and an approval always
/// carries a payment id. Any other status is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAuthorization", into = "RawAuthorizationOut")]
pub enum AuthorizationResult {
    Approved { payment_id: PaymentId },
    Declined { status: DeclineStatus },
}

impl AuthorizationResult {
    pub fn approved(payment_id: impl Into<PaymentId>) -> Self {
        Self::Approved {
            payment_id: payment_id.into(),
        }
    }

    pub fn denied() -> Self {
        Self::Declined {
            status: DeclineStatus(DENIED.to_string()),
        }
    }

    /// A decline carrying `status` verbatim, or `None` for `"approved"`,
    /// which is only reachable through [`AuthorizationResult::approved`].
    pub fn declined(status: impl Into<String>) -> Option<Self> {
        let status = status.into();
        if status == APPROVED {
            return None;
        }
        Some(Self::Declined {
            status: DeclineStatus(status),
        })
    }

    pub fn status(&self) -> &str {
        match self {
            Self::Approved { .. } => APPROVED,
            Self::Declined { status } => status.as_str(),
        }
    }

    pub fn payment_id(&self) -> Option<&PaymentId> {
        match self {
            Self::Approved { payment_id } => Some(payment_id),
            Self::Declined { .. } => None,
        }
    }
}

impl TryFrom<RawAuthorization> for AuthorizationResult {
    type Error = String;

    fn try_from(raw: RawAuthorization) -> Result<Self, Self::Error> {
        // Payment ids on non-approved answers carry no meaning.
        if raw.status != APPROVED {
            return Ok(Self::Declined {
                status: DeclineStatus(raw.status),
            });
        }
        raw.payment_id
            .map(|payment_id| Self::Approved { payment_id })
            .ok_or_else(|| "approved authorization without payment_id".to_string())
    }
}

#[derive(Serialize)]
struct RawAuthorizationOut {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<PaymentId>,
}

impl From<AuthorizationResult> for RawAuthorizationOut {
    fn from(auth: AuthorizationResult) -> Self {
        match auth {
            AuthorizationResult::Approved { payment_id } => Self {
                status: APPROVED.to_string(),
                payment_id: Some(payment_id),
            },
            AuthorizationResult::Declined { status } => Self {
                status: status.0,
                payment_id: None,
            },
        }
    }
}
