//! The signer session value

use neynar_client::{Fid, SignerRecord, SignerStatus};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Where a session is in the approval handshake
///
/// The approval URL only exists while approval is pending and the account
/// id only once approved, so a session can never carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Created,
    PendingApproval { approval_url: String },
    Approved { account_id: Fid },
}

/// One signer handshake
///
/// Persisted as the signer service's JSON record, so a stored session reads
/// back exactly as the service returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignerRecord", into = "SignerRecord")]
pub struct Session {
    credential_id: String,
    public_key: String,
    status: SessionStatus,
}

impl Session {
    pub fn credential_id(&self) -> &str {
        &self.credential_id
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn approval_url(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::PendingApproval { approval_url } => Some(approval_url),
            _ => None,
        }
    }

    pub fn account_id(&self) -> Option<Fid> {
        match self.status {
            SessionStatus::Approved { account_id } => Some(account_id),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, SessionStatus::PendingApproval { .. })
    }

    pub fn is_approved(&self) -> bool {
        matches!(self.status, SessionStatus::Approved { .. })
    }

    /// The same handshake, now approved for `account_id`
    pub(crate) fn approve(self, account_id: Fid) -> Self {
        Self {
            status: SessionStatus::Approved { account_id },
            ..self
        }
    }
}

impl TryFrom<SignerRecord> for Session {
    type Error = SessionError;

    fn try_from(record: SignerRecord) -> Result<Self, Self::Error> {
        let status = match record.status {
            SignerStatus::Generated => SessionStatus::Created,
            SignerStatus::PendingApproval => {
                let approval_url = record.signer_approval_url.ok_or_else(|| {
                    SessionError::InvalidRecord(format!(
                        "signer {} is pending approval without an approval URL",
                        record.signer_uuid
                    ))
                })?;
                SessionStatus::PendingApproval { approval_url }
            }
            SignerStatus::Approved => {
                let account_id = record.fid.ok_or_else(|| {
                    SessionError::InvalidRecord(format!(
                        "signer {} is approved without a fid",
                        record.signer_uuid
                    ))
                })?;
                SessionStatus::Approved { account_id }
            }
        };

        Ok(Self {
            credential_id: record.signer_uuid,
            public_key: record.public_key,
            status,
        })
    }
}

impl From<Session> for SignerRecord {
    fn from(session: Session) -> Self {
        let (status, signer_approval_url, fid) = match session.status {
            SessionStatus::Created => (SignerStatus::Generated, None, None),
            SessionStatus::PendingApproval { approval_url } => {
                (SignerStatus::PendingApproval, Some(approval_url), None)
            }
            SessionStatus::Approved { account_id } => {
                (SignerStatus::Approved, None, Some(account_id))
            }
        };

        SignerRecord {
            signer_uuid: session.credential_id,
            public_key: session.public_key,
            status,
            signer_approval_url,
            fid,
        }
    }
}
