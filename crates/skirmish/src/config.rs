//! Table configuration.

use serde::{Deserialize, Serialize};
use skirmish_combat::CombatConfig;
use skirmish_ledger::LedgerConfig;
use skirmish_session::DirectoryConfig;

/// Settings for a [`Table`](crate::Table), one section per layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub combat: CombatConfig,
    pub ledger: LedgerConfig,
    pub directory: DirectoryConfig,

    /// Also write `combat_active` to the backend when combat starts or
    /// ends. When off, only the local copy is flipped.
    pub persist_combat_flag: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            ledger: LedgerConfig::default(),
            directory: DirectoryConfig::default(),
            persist_combat_flag: true,
        }
    }
}

impl TableConfig {
    /// Clamp every section to valid ranges.
    pub fn validated(self) -> Self {
        Self {
            combat: self.combat.validated(),
            ledger: self.ledger.validated(),
            directory: self.directory.validated(),
            persist_combat_flag: self.persist_combat_flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: TableConfig =
            serde_json::from_str(r#"{ "ledger": { "capacity": 10 } }"#).unwrap();
        assert_eq!(config.ledger.capacity, 10);
        assert!(config.persist_combat_flag);
        assert_eq!(config.directory, DirectoryConfig::default());
    }

    #[test]
    fn test_validated_clamps_sections() {
        let config = TableConfig {
            ledger: LedgerConfig::with_capacity(0),
            ..TableConfig::default()
        }
        .validated();
        assert_eq!(config.ledger.capacity, 1);
    }
}
