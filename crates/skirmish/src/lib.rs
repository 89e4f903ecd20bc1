//! # Skirmish
//!
//! Shared combat state for tabletop sessions.
//!
//! Skirmish keeps a Dungeon Master and their players looking at the same
//! encounter: initiative, turns, hit points and conditions, with undo and
//! redo for every change. Around the combat core it tracks the game
//! sessions a client belongs to and the real-time rooms it is connected to.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skirmish::prelude::*;
//!
//! # async fn run(api: impl SessionApi) -> Result<(), SkirmishError> {
//! skirmish::init_tracing();
//!
//! let mut table = Table::new(api, TableConfig::default());
//! table.join_session(SessionId(1), PlayerId(7)).await?;
//! table
//!     .start_combat(vec![
//!         CombatParticipant::new(ParticipantId(1), "Aria", Category::PlayerCharacter, 24),
//!         CombatParticipant::new(ParticipantId(2), "Goblin", Category::Npc, 7),
//!     ])
//!     .await?;
//!
//! if let Some(current) = table.combat().current_participant_id() {
//!     table.execute_combat_action(CombatAction::new(ActionKind::Attack, current))?;
//! }
//! table.undo().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod op;
mod table;
mod telemetry;

pub use config::TableConfig;
pub use error::SkirmishError;
pub use op::{NotesEdit, TableOp, TableState};
pub use table::Table;
pub use telemetry::init_tracing;

pub use skirmish_combat as combat;
pub use skirmish_ledger as ledger;
pub use skirmish_protocol as protocol;
pub use skirmish_room as room;
pub use skirmish_session as session;
pub use skirmish_transport as transport;

/// The types most programs need.
pub mod prelude {
    pub use crate::{SkirmishError, Table, TableConfig, TableOp, init_tracing};
    pub use skirmish_combat::{
        ActionKind, Category, CombatAction, CombatConfig, CombatError, CombatOp,
        CombatParticipant, CombatStore, Condition, DamageType, MovementPolicy, RandomRoller,
        Roller, SeededRoller,
    };
    pub use skirmish_ledger::{Ledger, LedgerConfig, UndoableAction};
    pub use skirmish_protocol::{
        CampaignId, Codec, JsonCodec, ParticipantId, PlayerId, RoomId, SessionId,
    };
    pub use skirmish_room::{ConnectionManager, Room, RoomEvent, RoomFeed};
    pub use skirmish_session::{
        DirectoryConfig, GameSession, SessionApi, SessionDirectory, SessionDraft, SessionEvent,
        SessionOp, SessionUpdate,
    };
}
