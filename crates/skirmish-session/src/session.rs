//! Session types: the persisted game session and the requests that change it.
//!
//! A [`GameSession`] is one sitting of a campaign: who runs it, who plays
//! in it, and whether a fight is on. The backend owns it; this client
//! keeps a copy that is replaced wholesale whenever a newer one arrives.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use skirmish_protocol::{CampaignId, PlayerId, SessionId};

// ---------------------------------------------------------------------------
// DirectoryConfig
// ---------------------------------------------------------------------------

/// Configuration for the session directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Shown in place of an error that arrived with no message.
    pub generic_error: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            generic_error: Self::GENERIC_ERROR.to_string(),
        }
    }
}

impl DirectoryConfig {
    pub const GENERIC_ERROR: &'static str = "An unexpected error occurred";

    /// Clamp values to valid ranges.
    pub fn validated(mut self) -> Self {
        if self.generic_error.trim().is_empty() {
            tracing::warn!("generic_error is blank, using the built-in message");
            self.generic_error = Self::GENERIC_ERROR.to_string();
        }
        self
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// A persisted game session, as last seen by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,

    /// The Dungeon Master running the session.
    pub dm_id: PlayerId,

    /// Players seated at the table. A set: joining twice is one seat.
    pub player_ids: BTreeSet<PlayerId>,

    #[serde(default)]
    pub campaign_id: Option<CampaignId>,

    /// Projection of whether combat is running. Owned by the combat layer;
    /// the directory only mirrors it.
    #[serde(default)]
    pub combat_active: bool,

    #[serde(default)]
    pub session_notes: String,

    /// Unix milliseconds.
    pub created_at: u64,
    pub updated_at: u64,
}

impl GameSession {
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.player_ids.contains(&player)
    }

    /// Whether `player` is the DM or seated at the table.
    pub fn is_member(&self, player: PlayerId) -> bool {
        self.dm_id == player || self.has_player(player)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// What a DM submits to open a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub dm_id: PlayerId,
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    #[serde(default)]
    pub session_notes: String,
}

impl SessionDraft {
    pub fn new(dm_id: PlayerId) -> Self {
        Self {
            dm_id,
            campaign_id: None,
            session_notes: String::new(),
        }
    }

    pub fn in_campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }
}

/// A partial update. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<CampaignId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat_active: Option<bool>,
}

impl SessionUpdate {
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            session_notes: Some(notes.into()),
            ..Self::default()
        }
    }

    pub fn combat_active(active: bool) -> Self {
        Self {
            combat_active: Some(active),
            ..Self::default()
        }
    }

    /// Applies the update to `session` and stamps `updated_at`.
    ///
    /// Backends that keep sessions in memory (tests, the demo) use this to
    /// produce the entity they return.
    pub fn apply_to(&self, session: &mut GameSession, now: u64) {
        if let Some(notes) = &self.session_notes {
            session.session_notes = notes.clone();
        }
        if let Some(campaign_id) = self.campaign_id {
            session.campaign_id = Some(campaign_id);
        }
        if let Some(active) = self.combat_active {
            session.combat_active = active;
        }
        session.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Broadcasts from the backend about sessions other clients changed.
///
/// Tagged so the JSON looks like:
/// `{ "type": "player_joined", "session_id": 3, "player_id": 7 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A newer copy of a session. Ignored if the session isn't known here.
    SessionUpdated { session: GameSession },
    PlayerJoined { session_id: SessionId, player_id: PlayerId },
    PlayerLeft { session_id: SessionId, player_id: PlayerId },
    CombatStarted { session_id: SessionId },
    CombatEnded { session_id: SessionId },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession {
            id: SessionId(1),
            dm_id: PlayerId(1),
            player_ids: BTreeSet::from([PlayerId(2)]),
            campaign_id: None,
            combat_active: false,
            session_notes: String::new(),
            created_at: 100,
            updated_at: 100,
        }
    }

    #[test]
    fn test_is_member_includes_dm() {
        let s = session();
        assert!(s.is_member(PlayerId(1)));
        assert!(s.is_member(PlayerId(2)));
        assert!(!s.is_member(PlayerId(3)));
        assert!(!s.has_player(PlayerId(1)));
    }

    #[test]
    fn test_draft_in_campaign_sets_campaign() {
        let draft = SessionDraft::new(PlayerId(1)).in_campaign(CampaignId(4));
        assert_eq!(draft.campaign_id, Some(CampaignId(4)));
        assert!(draft.session_notes.is_empty());
    }

    #[test]
    fn test_update_apply_to_touches_only_given_fields() {
        let mut s = session();
        s.session_notes = "old".into();

        SessionUpdate::combat_active(true).apply_to(&mut s, 200);

        assert!(s.combat_active);
        assert_eq!(s.session_notes, "old");
        assert_eq!(s.updated_at, 200);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = SessionEvent::PlayerJoined {
            session_id: SessionId(3),
            player_id: PlayerId(7),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "player_joined");
        assert_eq!(json["session_id"], 3);
    }

    #[test]
    fn test_config_validated_restores_blank_message() {
        let config = DirectoryConfig {
            generic_error: "  ".into(),
        }
        .validated();
        assert_eq!(config.generic_error, DirectoryConfig::GENERIC_ERROR);
    }
}
