//! YAML configuration for simulation runs.
//!
//! ```yaml
//! seed: 7
//! rounds: 100000
//! bet_amount: 100
//! disabled: [slots]
//! games:
//!   crash:
//!     house_edge: 0.03
//!   blackjack:
//!     decks: 2
//!     dealer_hits_soft_17: true
//! ```
//!
//! Every key is optional; game sections replace that game's house configuration and
//! omitted fields within a section keep their defaults.

use crate::SimulationError;
use casino_execution::{
    BlackjackConfig, CoinFlipConfig, CrashConfig, GameConfig, GameRegistry, HorseRaceConfig,
    RouletteConfig, SlotsConfig,
};
use casino_types::GameKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub seed: Option<u64>,
    pub rounds: Option<u64>,
    pub bet_amount: Option<u64>,
    /// Games switched off in the registry.
    pub disabled: Vec<GameKind>,
    pub games: GameOverrides,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameOverrides {
    pub roulette: Option<RouletteConfig>,
    pub blackjack: Option<BlackjackConfig>,
    pub slots: Option<SlotsConfig>,
    #[serde(alias = "coin-flip")]
    pub coin_flip: Option<CoinFlipConfig>,
    #[serde(alias = "horse-race")]
    pub horse_race: Option<HorseRaceConfig>,
    pub crash: Option<CrashConfig>,
}

impl GameOverrides {
    fn into_configs(self) -> Vec<GameConfig> {
        let Self {
            roulette,
            blackjack,
            slots,
            coin_flip,
            horse_race,
            crash,
        } = self;
        [
            roulette.map(GameConfig::Roulette),
            blackjack.map(GameConfig::Blackjack),
            slots.map(GameConfig::Slots),
            coin_flip.map(GameConfig::CoinFlip),
            horse_race.map(GameConfig::HorseRace),
            crash.map(GameConfig::Crash),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded simulation config");
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// House registry with this file's overrides applied and validated.
    pub fn registry(&self) -> Result<GameRegistry, SimulationError> {
        let mut registry = GameRegistry::new();
        for config in self.games.clone().into_configs() {
            registry.set_config(config)?;
        }
        for &game in &self.disabled {
            registry.set_active(game, false);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_types::ConfigError;
    use std::io::Write;

    #[test]
    fn test_empty_file_is_house_defaults() {
        let config = SimConfig::parse("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.registry().unwrap(), GameRegistry::new());
    }

    #[test]
    fn test_overrides_apply() {
        let config = SimConfig::parse(
            "seed: 7\nrounds: 5000\ndisabled: [slots]\ngames:\n  crash:\n    house_edge: 0.03\n  coin-flip:\n    house_edge: 0.05\n",
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rounds, Some(5000));
        assert_eq!(config.bet_amount, None);

        let registry = config.registry().unwrap();
        assert_eq!(registry.crash().house_edge, 0.03);
        assert_eq!(registry.crash().growth_rate, CrashConfig::default().growth_rate);
        assert_eq!(registry.coin_flip().house_edge, 0.05);
        assert!(!registry.is_active(GameKind::Slots));
        assert!(registry.is_active(GameKind::Crash));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let config = SimConfig::parse("games:\n  horse_race:\n    horses: []\n").unwrap();
        assert!(matches!(
            config.registry(),
            Err(SimulationError::Config(ConfigError::TooFewHorses { got: 0 }))
        ));
        assert!(matches!(
            SimConfig::parse("sed: 1\n"),
            Err(SimulationError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bet_amount: 250").unwrap();
        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.bet_amount, Some(250));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            SimConfig::load(&missing),
            Err(SimulationError::Io { path, .. }) if path == missing
        ));
    }
}
