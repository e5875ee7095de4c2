//! Integration tests for casino game execution.
//!
//! These tests drive every game through the shared [`CasinoGame`] seam and check the
//! cross-module guarantees: seeded replay, isolation of random sources, closed-form
//! returns and void handling.

#[cfg(test)]
mod tests {
    use crate::casino::blackjack::{Blackjack, BlackjackStrategy};
    use crate::casino::coin_flip::{CoinFlip, CoinSide};
    use crate::casino::crash::{CashOutTarget, CrashGame};
    use crate::casino::horse_race::{HorsePick, HorseRace};
    use crate::casino::roulette::{Roulette, RouletteBet};
    use crate::casino::slots::SlotMachine;
    use crate::{CasinoGame, CoinFlipConfig, CrashConfig, GameRegistry, PlayedRound, RandomSource};
    use casino_types::{Bet, GameKind, Outcome};
    use proptest::prelude::*;

    /// Play `rounds` rounds and collect payouts.
    fn payouts<G: CasinoGame>(
        game: &mut G,
        selection: G::Selection,
        rounds: usize,
        rng: &mut RandomSource,
    ) -> Vec<u64> {
        let bet = Bet::new(selection, 100);
        (0..rounds)
            .map(|_| game.play(&bet, rng).settlement().payout)
            .collect()
    }

    fn observed_rtp<G: CasinoGame>(
        game: &mut G,
        selection: G::Selection,
        rounds: usize,
        seed: u64,
    ) -> f64 {
        let mut rng = RandomSource::seeded(seed);
        let total: u64 = payouts(game, selection, rounds, &mut rng).iter().sum();
        total as f64 / (rounds as f64 * 100.0)
    }

    #[test]
    fn test_every_game_replays_from_seed() {
        let seed = 0x5eed;
        macro_rules! replay {
            ($make:expr, $selection:expr) => {{
                let a = payouts(&mut $make, $selection, 500, &mut RandomSource::seeded(seed));
                let b = payouts(&mut $make, $selection, 500, &mut RandomSource::seeded(seed));
                assert_eq!(a, b);
            }};
        }
        replay!(Roulette, RouletteBet::Red);
        replay!(Blackjack::default(), BlackjackStrategy::default());
        replay!(SlotMachine::default(), ());
        replay!(CoinFlip::default(), CoinSide::Heads);
        replay!(HorseRace::default(), HorsePick(2));
        replay!(CrashGame::default(), CashOutTarget::new(2.0).unwrap());
    }

    #[test]
    fn test_simulation_source_does_not_perturb_live_source() {
        let mut live = RandomSource::seeded(1);
        let mut reference = RandomSource::seeded(1);
        let mut game = CoinFlip::default();
        let bet = Bet::new(CoinSide::Tails, 10);

        let first = game.play(&bet, &mut live);
        assert_eq!(first, game.play(&bet, &mut reference));

        // An unrelated simulation source drawing heavily in between.
        let mut simulation = RandomSource::seeded(1);
        let _ = payouts(&mut SlotMachine::default(), (), 10_000, &mut simulation);

        assert_eq!(game.play(&bet, &mut live), game.play(&bet, &mut reference));
    }

    #[test]
    fn test_closed_form_returns() {
        let registry = GameRegistry::new();
        for kind in GameKind::ALL {
            let edge = registry.house_edge(kind).unwrap();
            assert!((0.0..0.1).contains(&edge), "{kind}: {edge}");
        }

        for edge in [0.0, 0.02, 0.05] {
            let coin = CoinFlip::new(CoinFlipConfig { house_edge: edge });
            assert!((coin.theoretical_rtp(&CoinSide::Heads) - (1.0 - edge)).abs() < 1e-12);

            let crash = CrashGame::new(CrashConfig {
                house_edge: edge,
                ..Default::default()
            })
            .unwrap();
            for target in [1.0, 1.25, 3.0, 50.0] {
                let rtp = crash.theoretical_rtp(&CashOutTarget::new(target).unwrap());
                assert!((rtp - (1.0 - edge)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_observed_returns_converge() {
        let rounds = 200_000;
        let cases = [
            (observed_rtp(&mut Roulette, RouletteBet::Dozen(1), rounds, 1), 36.0 / 37.0, 0.02),
            (observed_rtp(&mut CoinFlip::default(), CoinSide::Heads, rounds, 2), 0.98, 0.01),
            (observed_rtp(&mut HorseRace::default(), HorsePick(0), rounds, 3), 0.95, 0.015),
            (
                observed_rtp(&mut CrashGame::default(), CashOutTarget::new(2.0).unwrap(), rounds, 4),
                0.96,
                0.01,
            ),
        ];
        for (observed, expected, tolerance) in cases {
            assert!(
                (observed - expected).abs() < tolerance,
                "observed {observed}, expected {expected}"
            );
        }

        // Slots have a heavy right tail; give them more rounds.
        let observed = observed_rtp(&mut SlotMachine::default(), (), 1_000_000, 5);
        assert!((observed - 0.91923).abs() < 0.02, "slots observed {observed}");
    }

    #[test]
    fn test_zero_stake_is_void_everywhere() {
        let mut rng = RandomSource::seeded(77);
        let outcomes = [
            Roulette.play(&Bet::new(RouletteBet::Straight(0), 0), &mut rng).settlement,
            Blackjack::default()
                .play(&Bet::new(BlackjackStrategy::default(), 0), &mut rng)
                .settlement,
            SlotMachine::default().play(&Bet::new((), 0), &mut rng).settlement,
            CoinFlip::default().play(&Bet::new(CoinSide::Heads, 0), &mut rng).settlement,
            HorseRace::default().play(&Bet::new(HorsePick(0), 0), &mut rng).settlement,
            CrashGame::default()
                .play(&Bet::new(CashOutTarget::new(1.01).unwrap(), 0), &mut rng)
                .settlement,
        ];
        for settlement in outcomes {
            assert_eq!(settlement.payout, 0);
            assert_eq!(settlement.outcome(), Outcome::Void);
        }
    }

    #[test]
    fn test_game_kinds() {
        assert_eq!(Roulette.kind(), GameKind::Roulette);
        assert_eq!(Blackjack::default().kind(), GameKind::Blackjack);
        assert_eq!(SlotMachine::default().kind(), GameKind::Slots);
        assert_eq!(CoinFlip::default().kind(), GameKind::CoinFlip);
        assert_eq!(HorseRace::default().kind(), GameKind::HorseRace);
        assert_eq!(CrashGame::default().kind(), GameKind::Crash);
    }

    proptest! {
        #[test]
        fn prop_payout_never_exceeds_max_multiplier(seed in any::<u64>(), stake in 1u64..1_000_000) {
            let mut rng = RandomSource::seeded(seed);
            let spin = SlotMachine::default().play(&Bet::new((), stake), &mut rng);
            prop_assert!(spin.settlement.payout <= stake * 750);

            let race = HorseRace::default().play(&Bet::new(HorsePick(1), stake), &mut rng);
            prop_assert!(race.settlement.payout == 0 || race.settlement.payout > stake);
        }

        #[test]
        fn prop_blackjack_hands_stay_bounded(seed in any::<u64>(), stand_on in 2u8..=21) {
            let mut rng = RandomSource::seeded(seed);
            let mut table = Blackjack::default();
            let strategy = BlackjackStrategy::stand_on(stand_on).unwrap();
            for _ in 0..20 {
                let result = table.play(&Bet::new(strategy, 10), &mut rng);
                prop_assert!(result.player.value() <= 30);
                prop_assert!(result.dealer.value() <= 26);
                prop_assert!(result.settlement.payout <= 25);
            }
        }
    }
}
