//! Friend requests and the friendships they turn into

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::non_blank;
use super::ValidationError;
use crate::error::{Result, SocioError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row from `friend_requests`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `friend_requests`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFriendRequest {
    pub sender_id: String,
    pub receiver_id: String,
    pub status: RequestStatus,
}

impl NewFriendRequest {
    pub fn new(sender_id: &str, receiver_id: &str) -> Result<Self> {
        let sender_id = non_blank("sender_id", sender_id)?;
        let receiver_id = non_blank("receiver_id", receiver_id)?;
        if sender_id == receiver_id {
            return Err(ValidationError::InvalidFormat {
                field: "receiver_id",
                reason: "cannot send a partner request to yourself",
            }
            .into());
        }
        Ok(Self {
            sender_id,
            receiver_id,
            status: RequestStatus::Pending,
        })
    }
}

impl FriendRequest {
    /// Accept or reject on behalf of `actor`.
    ///
    /// Only the receiver may respond and only while the request is pending.
    /// Accepting returns the friendship row to insert.
    pub fn respond(&mut self, actor: &str, accept: bool) -> Result<Option<NewFriendship>> {
        if actor != self.receiver_id {
            return Err(SocioError::forbidden(
                "only the receiver can respond to a partner request",
            ));
        }

        let to = if accept {
            RequestStatus::Accepted
        } else {
            RequestStatus::Rejected
        };
        if self.status != RequestStatus::Pending {
            return Err(SocioError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        tracing::debug!(request = %self.id, status = %to, "partner request answered");

        Ok(accept.then(|| NewFriendship::between(&self.sender_id, &self.receiver_id)))
    }

    /// Whether `user` sent or received this request.
    pub fn involves(&self, user: &str) -> bool {
        self.sender_id == user || self.receiver_id == user
    }
}

/// Row from `friends`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: String,
    pub user_id_1: String,
    pub user_id_2: String,
    pub accepted_at: DateTime<Utc>,
}

impl Friendship {
    pub fn involves(&self, user: &str) -> bool {
        self.user_id_1 == user || self.user_id_2 == user
    }

    /// The other member of the pair, if `user` is one of them.
    pub fn partner_of(&self, user: &str) -> Option<&str> {
        if self.user_id_1 == user {
            Some(&self.user_id_2)
        } else if self.user_id_2 == user {
            Some(&self.user_id_1)
        } else {
            None
        }
    }
}

/// Insert payload for `friends`. Ids are stored sorted so a pair has one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFriendship {
    pub user_id_1: String,
    pub user_id_2: String,
}

impl NewFriendship {
    pub fn between(a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self {
            user_id_1: lo.to_owned(),
            user_id_2: hi.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(sender: &str, receiver: &str) -> FriendRequest {
        FriendRequest {
            id: "r1".into(),
            sender_id: sender.into(),
            receiver_id: receiver.into(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn receiver_accepts() {
        let mut req = pending("bob", "alice");
        let friendship = req.respond("alice", true).unwrap().unwrap();
        assert_eq!(req.status, RequestStatus::Accepted);
        assert_eq!(friendship.user_id_1, "alice");
        assert_eq!(friendship.user_id_2, "bob");
    }

    #[test]
    fn reject_creates_no_friendship() {
        let mut req = pending("bob", "alice");
        assert!(req.respond("alice", false).unwrap().is_none());
        assert_eq!(req.status, RequestStatus::Rejected);
    }

    #[test]
    fn sender_cannot_respond() {
        let mut req = pending("bob", "alice");
        let err = req.respond("bob", true).unwrap_err();
        assert!(matches!(err, SocioError::Forbidden { .. }));
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn answered_request_is_final() {
        let mut req = pending("bob", "alice");
        req.respond("alice", false).unwrap();
        let err = req.respond("alice", true).unwrap_err();
        assert!(matches!(
            err,
            SocioError::InvalidTransition {
                from: RequestStatus::Rejected,
                to: RequestStatus::Accepted
            }
        ));
    }

    #[test]
    fn no_self_requests() {
        assert!(NewFriendRequest::new("alice", "alice").is_err());
        let req = NewFriendRequest::new("alice", "bob").unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn partner_of() {
        let f = Friendship {
            id: "f1".into(),
            user_id_1: "a".into(),
            user_id_2: "b".into(),
            accepted_at: Utc::now(),
        };
        assert_eq!(f.partner_of("a"), Some("b"));
        assert_eq!(f.partner_of("b"), Some("a"));
        assert_eq!(f.partner_of("c"), None);
    }
}
