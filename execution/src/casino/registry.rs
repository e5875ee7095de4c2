//! Game registry for managing available games and their odds configurations.
//!
//! The registry provides:
//! - Centralized listing of supported games
//! - Per-game configuration with house defaults, validated on every update
//! - Active/inactive game filtering
//! - Metadata for display (names, descriptions, categories, bet limits, house edge)
//!
//! # Example
//! ```rust
//! use casino_execution::{GameCategory, GameRegistry};
//! use casino_types::GameKind;
//!
//! let registry = GameRegistry::default();
//! assert!(registry.is_active(GameKind::Blackjack));
//! let info = GameRegistry::get_info(GameKind::Blackjack);
//! assert_eq!(info.name, "Blackjack");
//! assert_eq!(info.category, GameCategory::Cards);
//! ```

use super::blackjack::{self, BlackjackStrategy};
use super::horse_race::{default_horses, HorseSpec};
use super::slots::{Paytable, SymbolSpec, DEFAULT_SYMBOLS};
use crate::rng::WeightedTable;
use casino_types::{
    ConfigError, GameKind, BLACKJACK_ALLOWED_DECKS, BLACKJACK_DEFAULT_DECKS,
    COIN_FLIP_HOUSE_EDGE, CRASH_GROWTH_RATE, CRASH_HOUSE_EDGE, HORSE_RACE_HOUSE_EDGE,
    ROULETTE_POCKETS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-game configuration values.
///
/// Each variant holds the game-specific rules that can be customized.
/// All variants implement `Default` to provide the house configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum GameConfig {
    Roulette(RouletteConfig),
    Blackjack(BlackjackConfig),
    Slots(SlotsConfig),
    CoinFlip(CoinFlipConfig),
    HorseRace(HorseRaceConfig),
    Crash(CrashConfig),
}

impl GameConfig {
    /// Create a default configuration for a game.
    pub fn default_for(kind: GameKind) -> Self {
        match kind {
            GameKind::Roulette => Self::Roulette(RouletteConfig::default()),
            GameKind::Blackjack => Self::Blackjack(BlackjackConfig::default()),
            GameKind::Slots => Self::Slots(SlotsConfig::default()),
            GameKind::CoinFlip => Self::CoinFlip(CoinFlipConfig::default()),
            GameKind::HorseRace => Self::HorseRace(HorseRaceConfig::default()),
            GameKind::Crash => Self::Crash(CrashConfig::default()),
        }
    }

    /// Get the game this configuration belongs to.
    pub fn game_kind(&self) -> GameKind {
        match self {
            Self::Roulette(_) => GameKind::Roulette,
            Self::Blackjack(_) => GameKind::Blackjack,
            Self::Slots(_) => GameKind::Slots,
            Self::CoinFlip(_) => GameKind::CoinFlip,
            Self::HorseRace(_) => GameKind::HorseRace,
            Self::Crash(_) => GameKind::Crash,
        }
    }

    /// Reject degenerate odds tables before any round is played.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Roulette(_) => Ok(()),
            Self::Blackjack(c) => c.validate(),
            Self::Slots(c) => c.validate(),
            Self::CoinFlip(c) => c.validate(),
            Self::HorseRace(c) => c.validate(),
            Self::Crash(c) => c.validate(),
        }
    }

    /// Designed house edge (`1 - RTP`) for this configuration.
    ///
    /// Blackjack reports the edge against the default stand-on-17 player.
    pub fn house_edge(&self) -> Result<f64, ConfigError> {
        self.validate()?;
        let edge = match self {
            Self::Roulette(_) => 1.0 / f64::from(ROULETTE_POCKETS),
            Self::Blackjack(c) => 1.0 - blackjack::theoretical_rtp(c, BlackjackStrategy::default()),
            Self::Slots(c) => 1.0 - Paytable::from_config(c)?.exact_rtp(),
            Self::CoinFlip(c) => c.house_edge,
            Self::HorseRace(c) => c.house_edge,
            Self::Crash(c) => c.house_edge,
        };
        Ok(edge)
    }
}

fn validate_house_edge(house_edge: f64) -> Result<(), ConfigError> {
    // NaN fails the range check too.
    if !(0.0..1.0).contains(&house_edge) {
        return Err(ConfigError::HouseEdgeOutOfRange { got: house_edge });
    }
    Ok(())
}

// ============================================================================
// Per-game configuration structs
// ============================================================================

/// Roulette configuration. Only the European single-zero wheel is offered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteConfig {}

/// Blackjack configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackjackConfig {
    /// Number of decks in the shoe (1, 2, 4, 6, or 8).
    pub decks: u8,
    /// Dealer hits on soft 17.
    pub dealer_hits_soft_17: bool,
    /// Winnings on a natural, per unit staked (1.5 = 3:2).
    pub blackjack_payout: f64,
}

impl Default for BlackjackConfig {
    fn default() -> Self {
        Self {
            decks: BLACKJACK_DEFAULT_DECKS,
            dealer_hits_soft_17: false,
            blackjack_payout: 1.5,
        }
    }
}

impl BlackjackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !BLACKJACK_ALLOWED_DECKS.contains(&self.decks) {
            return Err(ConfigError::UnsupportedDecks { got: self.decks });
        }
        if !self.blackjack_payout.is_finite() || self.blackjack_payout < 0.0 {
            return Err(ConfigError::PayoutBelowStake {
                key: "blackjack".to_string(),
                multiplier: 1.0 + self.blackjack_payout,
            });
        }
        Ok(())
    }
}

/// Slot machine reel strip and paytable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    pub symbols: Vec<SymbolSpec>,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.to_vec(),
        }
    }
}

impl SlotsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Paytable::from_config(self).map(|_| ())
    }
}

/// Coin flip configuration. The edge is taken from the payout, never the odds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinFlipConfig {
    pub house_edge: f64,
}

impl Default for CoinFlipConfig {
    fn default() -> Self {
        Self {
            house_edge: COIN_FLIP_HOUSE_EDGE,
        }
    }
}

impl CoinFlipConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_house_edge(self.house_edge)
    }
}

/// Horse race field and house edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorseRaceConfig {
    pub house_edge: f64,
    pub horses: Vec<HorseSpec>,
}

impl Default for HorseRaceConfig {
    fn default() -> Self {
        Self {
            house_edge: HORSE_RACE_HOUSE_EDGE,
            horses: default_horses(),
        }
    }
}

impl HorseRaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_house_edge(self.house_edge)?;
        if self.horses.len() < 2 {
            return Err(ConfigError::TooFewHorses {
                got: self.horses.len(),
            });
        }
        let table = WeightedTable::new(
            self.horses
                .iter()
                .map(|h| (h.name.clone(), h.weight))
                .collect(),
        )?;
        // A favourite priced below evens would return less than the stake on a win.
        for horse in &self.horses {
            let multiplier = (1.0 - self.house_edge) / table.probability(&horse.name);
            if multiplier < 1.0 {
                return Err(ConfigError::PayoutBelowStake {
                    key: horse.name.clone(),
                    multiplier,
                });
            }
        }
        Ok(())
    }
}

/// Crash game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashConfig {
    pub house_edge: f64,
    /// Exponential growth rate of the live multiplier, per second.
    pub growth_rate: f64,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            house_edge: CRASH_HOUSE_EDGE,
            growth_rate: CRASH_GROWTH_RATE,
        }
    }
}

impl CrashConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_house_edge(self.house_edge)?;
        if !self.growth_rate.is_finite() || self.growth_rate <= 0.0 {
            return Err(ConfigError::InvalidGrowthRate {
                got: self.growth_rate,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Game metadata
// ============================================================================

/// Category of game for display grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    /// Wheel games.
    Table,
    /// Card games played against the dealer.
    Cards,
    /// Reel games.
    Reels,
    /// Single-draw instant games.
    Instant,
    /// Weighted race games.
    Racing,
}

/// Static metadata about a game.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameInfo {
    pub kind: GameKind,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    pub category: GameCategory,
    /// Minimum bet (in chips).
    pub min_bet: u64,
    /// Maximum bet (in chips).
    pub max_bet: u64,
    /// House edge in basis points (e.g., 270 = 2.70%).
    pub house_edge_bps: u16,
    /// Whether the game is currently active.
    pub active: bool,
}

impl GameInfo {
    const fn new(
        kind: GameKind,
        name: &'static str,
        description: &'static str,
        category: GameCategory,
        min_bet: u64,
        max_bet: u64,
        house_edge_bps: u16,
    ) -> Self {
        Self {
            kind,
            name,
            description,
            category,
            min_bet,
            max_bet,
            house_edge_bps,
            active: true,
        }
    }
}

fn to_bps(edge: f64) -> u16 {
    (edge * 10_000.0).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

// ============================================================================
// Game registry
// ============================================================================

/// Registry of available games and their configurations.
///
/// The registry maintains:
/// - Static game metadata (names, descriptions, categories)
/// - Per-game configurations (validated whenever they change)
/// - Active/inactive status for each game
///
/// Maps are ordered so listings always come out in [`GameKind::ALL`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRegistry {
    configs: BTreeMap<GameKind, GameConfig>,
    active: BTreeMap<GameKind, bool>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    /// Create a new registry with all games using default configurations.
    pub fn new() -> Self {
        let mut configs = BTreeMap::new();
        let mut active = BTreeMap::new();

        for &kind in Self::all_game_kinds() {
            configs.insert(kind, GameConfig::default_for(kind));
            active.insert(kind, true);
        }

        Self { configs, active }
    }

    /// List all supported games.
    pub fn all_game_kinds() -> &'static [GameKind] {
        &GameKind::ALL
    }

    /// Get static metadata for a game (house edge at the default configuration).
    pub fn get_info(kind: GameKind) -> GameInfo {
        match kind {
            GameKind::Roulette => GameInfo::new(
                GameKind::Roulette,
                "Roulette",
                "European single-zero wheel. Bet on numbers, colors or groups.",
                GameCategory::Table,
                1,
                10_000,
                270, // 1/37
            ),
            GameKind::Blackjack => GameInfo::new(
                GameKind::Blackjack,
                "Blackjack",
                "Beat the dealer to 21 without going bust.",
                GameCategory::Cards,
                1,
                5_000,
                533, // standing on 17
            ),
            GameKind::Slots => GameInfo::new(
                GameKind::Slots,
                "Slots",
                "Three weighted reels with a fixed paytable.",
                GameCategory::Reels,
                1,
                1_000,
                808,
            ),
            GameKind::CoinFlip => GameInfo::new(
                GameKind::CoinFlip,
                "Coin Flip",
                "Call heads or tails.",
                GameCategory::Instant,
                1,
                10_000,
                200,
            ),
            GameKind::HorseRace => GameInfo::new(
                GameKind::HorseRace,
                "Horse Race",
                "Back a horse; longer odds pay more.",
                GameCategory::Racing,
                1,
                5_000,
                500,
            ),
            GameKind::Crash => GameInfo::new(
                GameKind::Crash,
                "Crash",
                "Cash out before the multiplier crashes.",
                GameCategory::Instant,
                1,
                5_000,
                400,
            ),
        }
    }

    /// Check if a game is active.
    pub fn is_active(&self, kind: GameKind) -> bool {
        self.active.get(&kind).copied().unwrap_or(false)
    }

    /// Set a game's active status.
    pub fn set_active(&mut self, kind: GameKind, active: bool) {
        self.active.insert(kind, active);
    }

    /// Get all active games.
    pub fn active_games(&self) -> Vec<GameKind> {
        Self::all_game_kinds()
            .iter()
            .copied()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    /// Get configuration for a game.
    pub fn get_config(&self, kind: GameKind) -> Option<&GameConfig> {
        self.configs.get(&kind)
    }

    /// Replace a game's configuration. Invalid configurations are rejected and the
    /// previous one is kept.
    pub fn set_config(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.configs.insert(config.game_kind(), config);
        Ok(())
    }

    /// Validate every configuration held by the registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.configs.values().try_for_each(GameConfig::validate)
    }

    /// House edge for a game under its current configuration.
    pub fn house_edge(&self, kind: GameKind) -> Result<f64, ConfigError> {
        match self.configs.get(&kind) {
            Some(config) => config.house_edge(),
            None => GameConfig::default_for(kind).house_edge(),
        }
    }

    /// Get all game info with current active status and configured house edge.
    pub fn all_games_info(&self) -> Vec<GameInfo> {
        Self::all_game_kinds()
            .iter()
            .map(|&kind| {
                let mut info = Self::get_info(kind);
                info.active = self.is_active(kind);
                if let Ok(edge) = self.house_edge(kind) {
                    info.house_edge_bps = to_bps(edge);
                }
                info
            })
            .collect()
    }

    /// Get games by category.
    pub fn games_by_category(&self, category: GameCategory) -> Vec<GameKind> {
        Self::all_game_kinds()
            .iter()
            .copied()
            .filter(|&kind| Self::get_info(kind).category == category)
            .collect()
    }

    pub fn blackjack(&self) -> BlackjackConfig {
        match self.configs.get(&GameKind::Blackjack) {
            Some(GameConfig::Blackjack(c)) => c.clone(),
            _ => BlackjackConfig::default(),
        }
    }

    pub fn slots(&self) -> SlotsConfig {
        match self.configs.get(&GameKind::Slots) {
            Some(GameConfig::Slots(c)) => c.clone(),
            _ => SlotsConfig::default(),
        }
    }

    pub fn coin_flip(&self) -> CoinFlipConfig {
        match self.configs.get(&GameKind::CoinFlip) {
            Some(GameConfig::CoinFlip(c)) => c.clone(),
            _ => CoinFlipConfig::default(),
        }
    }

    pub fn horse_race(&self) -> HorseRaceConfig {
        match self.configs.get(&GameKind::HorseRace) {
            Some(GameConfig::HorseRace(c)) => c.clone(),
            _ => HorseRaceConfig::default(),
        }
    }

    pub fn crash(&self) -> CrashConfig {
        match self.configs.get(&GameKind::Crash) {
            Some(GameConfig::Crash(c)) => c.clone(),
            _ => CrashConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_default() {
        let registry = GameRegistry::default();

        // All games should be active by default
        for kind in GameRegistry::all_game_kinds() {
            assert!(registry.is_active(*kind), "{:?} should be active", kind);
        }

        // All games should have valid configs
        for kind in GameRegistry::all_game_kinds() {
            assert!(
                registry.get_config(*kind).is_some(),
                "{:?} should have config",
                kind
            );
        }
        assert_eq!(registry.validate(), Ok(()));
    }

    #[test]
    fn test_set_active() {
        let mut registry = GameRegistry::new();

        assert!(registry.is_active(GameKind::Crash));
        registry.set_active(GameKind::Crash, false);
        assert!(!registry.is_active(GameKind::Crash));
        registry.set_active(GameKind::Crash, true);
        assert!(registry.is_active(GameKind::Crash));
    }

    #[test]
    fn test_active_games() {
        let mut registry = GameRegistry::new();
        assert_eq!(registry.active_games().len(), 6);

        registry.set_active(GameKind::Blackjack, false);
        registry.set_active(GameKind::Roulette, false);

        let active = registry.active_games();
        assert_eq!(
            active,
            vec![GameKind::Slots, GameKind::CoinFlip, GameKind::HorseRace, GameKind::Crash]
        );
    }

    #[test]
    fn test_games_by_category() {
        let registry = GameRegistry::new();
        assert_eq!(
            registry.games_by_category(GameCategory::Instant),
            vec![GameKind::CoinFlip, GameKind::Crash]
        );
        assert_eq!(
            registry.games_by_category(GameCategory::Cards),
            vec![GameKind::Blackjack]
        );
        assert_eq!(
            registry.games_by_category(GameCategory::Racing),
            vec![GameKind::HorseRace]
        );
    }

    #[test]
    fn test_static_edges_match_default_configs() {
        let registry = GameRegistry::new();
        for info in registry.all_games_info() {
            assert_eq!(
                info.house_edge_bps,
                GameRegistry::get_info(info.kind).house_edge_bps,
                "{:?}",
                info.kind
            );
        }
    }

    #[test]
    fn test_set_config_validates() {
        let mut registry = GameRegistry::new();

        let custom = GameConfig::Crash(CrashConfig {
            house_edge: 0.01,
            ..Default::default()
        });
        registry.set_config(custom.clone()).unwrap();
        assert_eq!(registry.get_config(GameKind::Crash), Some(&custom));
        assert_eq!(registry.crash().house_edge, 0.01);

        let bad = GameConfig::CoinFlip(CoinFlipConfig { house_edge: 1.0 });
        assert_eq!(
            registry.set_config(bad),
            Err(ConfigError::HouseEdgeOutOfRange { got: 1.0 })
        );
        assert_eq!(registry.coin_flip(), CoinFlipConfig::default());
    }

    #[test]
    fn test_invalid_configs() {
        let blackjack = BlackjackConfig {
            decks: 3,
            ..Default::default()
        };
        assert_eq!(blackjack.validate(), Err(ConfigError::UnsupportedDecks { got: 3 }));

        let crash = CrashConfig {
            growth_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            crash.validate(),
            Err(ConfigError::InvalidGrowthRate { .. })
        ));

        let nan_edge = CoinFlipConfig {
            house_edge: f64::NAN,
        };
        assert!(nan_edge.validate().is_err());

        let slots = SlotsConfig { symbols: vec![] };
        assert_eq!(slots.validate(), Err(ConfigError::EmptyWeights));
    }

    #[test]
    fn test_horse_race_validation() {
        let mut config = HorseRaceConfig::default();
        config.horses.truncate(1);
        assert_eq!(config.validate(), Err(ConfigError::TooFewHorses { got: 1 }));

        let mut config = HorseRaceConfig::default();
        config.horses[2].weight = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWeight { .. })));

        // A 97% favourite at a 5% edge would pay 0.979x.
        let config = HorseRaceConfig {
            house_edge: 0.05,
            horses: vec![
                HorseSpec::new("Favourite", 97),
                HorseSpec::new("Outsider", 3),
            ],
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PayoutBelowStake { .. })
        ));
    }

    #[test]
    fn test_house_edges() {
        let registry = GameRegistry::new();
        let edge = |kind| registry.house_edge(kind).unwrap();
        assert!((edge(GameKind::Roulette) - 1.0 / 37.0).abs() < 1e-12);
        assert!((edge(GameKind::Slots) - 0.08077).abs() < 1e-9);
        assert_eq!(edge(GameKind::CoinFlip), 0.02);
        assert_eq!(edge(GameKind::HorseRace), 0.05);
        assert_eq!(edge(GameKind::Crash), 0.04);
        let blackjack = edge(GameKind::Blackjack);
        assert!(blackjack > 0.05 && blackjack < 0.056, "{blackjack}");
    }

    #[test]
    fn test_game_config_game_kind() {
        for kind in GameRegistry::all_game_kinds() {
            let config = GameConfig::default_for(*kind);
            assert_eq!(config.game_kind(), *kind);
        }
    }

    #[test]
    fn test_config_yaml_roundtrip_and_partial_fields() {
        let config = GameConfig::default_for(GameKind::HorseRace);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let decoded: GameConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(decoded, config);

        let partial: CrashConfig = serde_yaml::from_str("house_edge: 0.03").unwrap();
        assert_eq!(partial.house_edge, 0.03);
        assert_eq!(partial.growth_rate, CRASH_GROWTH_RATE);
    }
}
