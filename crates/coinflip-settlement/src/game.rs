//! Game type resolution

use alloy_primitives::U256;

use crate::error::SettlementError;

/// Game variants the settlement contract understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    /// Two outcomes, heads or tails
    CoinFlip = 1,
    /// Six outcomes, one per die face
    DiceRoll = 2,
}

impl GameKind {
    /// Returns the string representation of the game kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CoinFlip => "coin_flip",
            Self::DiceRoll => "dice_roll",
        }
    }

    /// Returns the on-chain game type identifier.
    pub const fn as_u64(&self) -> u64 {
        *self as u64
    }
}

/// Inclusive outcome bounds for one game variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Game variant
    pub kind: GameKind,
    /// Smallest outcome
    pub min: U256,
    /// Largest outcome
    pub max: U256,
}

impl GameConfig {
    const fn new(kind: GameKind, min: u64, max: u64) -> Self {
        Self {
            kind,
            min: U256::from_limbs([min, 0, 0, 0]),
            max: U256::from_limbs([max, 0, 0, 0]),
        }
    }
}

/// Registered game variants. Adding a variant is one more row.
const GAME_TABLE: &[GameConfig] = &[
    GameConfig::new(GameKind::CoinFlip, 1, 2),
    GameConfig::new(GameKind::DiceRoll, 1, 6),
];

/// Look up the outcome bounds for `game_type`.
pub fn resolve_game_config(game_type: U256) -> Result<GameConfig, SettlementError> {
    u64::try_from(game_type)
        .ok()
        .and_then(|id| GAME_TABLE.iter().find(|config| config.kind.as_u64() == id))
        .copied()
        .ok_or(SettlementError::UnknownGameType(game_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_game_types() {
        let coin = resolve_game_config(U256::from(1)).unwrap();
        assert_eq!(coin.kind, GameKind::CoinFlip);
        assert_eq!((coin.min, coin.max), (U256::from(1), U256::from(2)));

        let dice = resolve_game_config(U256::from(2)).unwrap();
        assert_eq!(dice.kind, GameKind::DiceRoll);
        assert_eq!((dice.min, dice.max), (U256::from(1), U256::from(6)));
        assert_eq!(dice.kind.as_str(), "dice_roll");
    }

    #[test]
    fn test_unknown_game_types() {
        for game_type in [U256::ZERO, U256::from(3), U256::from(1_000_000), U256::MAX] {
            assert_eq!(
                resolve_game_config(game_type),
                Err(SettlementError::UnknownGameType(game_type))
            );
        }
    }

    #[test]
    fn test_high_limbs_are_not_truncated() {
        // Low limb is 1, but the value is far outside u64.
        let game_type = U256::from_limbs([1, 0, 0, 1]);
        assert!(resolve_game_config(game_type).is_err());
    }

    #[test]
    fn test_unknown_game_type_message() {
        let err = resolve_game_config(U256::from(3)).unwrap_err();
        assert_eq!(err.to_string(), "failed to find game config for gameType (3)");
    }
}
