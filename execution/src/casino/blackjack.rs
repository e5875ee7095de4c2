//! Blackjack game implementation.
//!
//! House rules (defaults, see [`BlackjackConfig`]):
//! - 6-deck shoe, reshuffled before a deal once fewer than 52 cards remain
//! - Dealer stands on soft 17 (S17), configurable to H17
//! - Natural pays 3:2
//! - No dealer peek, no splits, doubles, insurance or surrender
//!
//! Resolution order:
//! 1. player bust: lose
//! 2. player natural, dealer not: pay the natural
//! 3. both natural: push
//! 4. dealer bust: pay 1:1
//! 5. compare totals (a dealer natural counts as 21): higher wins 1:1, equal pushes
//!
//! Rounds are a two-state machine. [`Blackjack::deal`] returns either a [`PlayerTurn`]
//! (the only state accepting hit/stand, each consuming it) or an already settled round
//! when the player is dealt a natural.

use super::cards::{format_card_list, standard_deck, Card, CARDS_PER_DECK};
use super::{CasinoGame, GameError, PlayedRound};
use crate::rng::RandomSource;
use crate::BlackjackConfig;
use casino_types::{Bet, BetError, ConfigError, GameKind, Settlement, BLACKJACK_STAND_TOTAL};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Dealer stands on this total (and on soft 17 under S17).
const DEALER_STAND: u8 = 17;

/// Calculate hand value and whether it is soft.
///
/// Aces count 11, then drop to 1 one at a time while the total exceeds 21.
pub fn hand_value(cards: &[Card]) -> (u8, bool) {
    let mut value: u16 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        value += u16::from(card.points());
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= 21;
    (value.min(255) as u8, is_soft)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn value(&self) -> u8 {
        hand_value(&self.cards).0
    }

    pub fn is_soft(&self) -> bool {
        hand_value(&self.cards).1
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    /// 21 on exactly the first two cards.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.value() == 21
    }
}

/// Multi-deck shoe. Cards are drawn from the back.
#[derive(Clone, Debug)]
pub struct Shoe {
    decks: u8,
    cards: Vec<Card>,
}

impl Shoe {
    /// A shoe with no cards; the first deal fills and shuffles it.
    pub fn empty(decks: u8) -> Self {
        Self {
            decks,
            cards: Vec::new(),
        }
    }

    pub fn new(decks: u8, rng: &mut RandomSource) -> Self {
        let mut shoe = Self::empty(decks);
        shoe.reshuffle(rng);
        shoe
    }

    /// Restore all `decks * 52` cards and shuffle.
    pub fn reshuffle(&mut self, rng: &mut RandomSource) {
        self.cards.clear();
        for _ in 0..self.decks {
            self.cards.extend(standard_deck());
        }
        rng.shuffle(&mut self.cards);
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn capacity(&self) -> usize {
        usize::from(self.decks) * CARDS_PER_DECK
    }

    /// Fewer than one full deck left.
    pub fn needs_reshuffle(&self) -> bool {
        self.remaining() < CARDS_PER_DECK
    }

    /// Draw one card, reshuffling first if the shoe is exhausted.
    pub fn draw(&mut self, rng: &mut RandomSource) -> Card {
        loop {
            if let Some(card) = self.cards.pop() {
                return card;
            }
            debug!(decks = self.decks, "shoe exhausted mid-round, reshuffling");
            self.reshuffle(rng);
        }
    }
}

/// Player policy for automatic play: hit while the hand total is below `stand_on`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BlackjackStrategy {
    stand_on: u8,
}

impl BlackjackStrategy {
    pub fn stand_on(threshold: u8) -> Result<Self, BetError> {
        if !(2..=21).contains(&threshold) {
            return Err(BetError::InvalidStandThreshold { got: threshold });
        }
        Ok(Self {
            stand_on: threshold,
        })
    }

    pub fn threshold(self) -> u8 {
        self.stand_on
    }

    pub fn should_hit(self, hand: &Hand) -> bool {
        hand.value() < self.stand_on
    }
}

impl Default for BlackjackStrategy {
    fn default() -> Self {
        Self {
            stand_on: BLACKJACK_STAND_TOTAL,
        }
    }
}

impl TryFrom<u8> for BlackjackStrategy {
    type Error = BetError;

    fn try_from(threshold: u8) -> Result<Self, Self::Error> {
        Self::stand_on(threshold)
    }
}

impl From<BlackjackStrategy> for u8 {
    fn from(strategy: BlackjackStrategy) -> Self {
        strategy.stand_on
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    PlayerBust,
    PlayerBlackjack,
    BothBlackjack,
    DealerBust,
    PlayerHigher,
    DealerHigher,
    Tie,
}

impl Resolution {
    pub fn resolve(player: &Hand, dealer: &Hand) -> Self {
        if player.is_bust() {
            return Self::PlayerBust;
        }
        match (player.is_blackjack(), dealer.is_blackjack()) {
            (true, false) => return Self::PlayerBlackjack,
            (true, true) => return Self::BothBlackjack,
            _ => {}
        }
        if dealer.is_bust() {
            return Self::DealerBust;
        }
        match player.value().cmp(&dealer.value()) {
            std::cmp::Ordering::Greater => Self::PlayerHigher,
            std::cmp::Ordering::Less => Self::DealerHigher,
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }

    /// Total-return multiplier, stake included.
    pub fn multiplier(self, blackjack_payout: f64) -> f64 {
        match self {
            Self::PlayerBust | Self::DealerHigher => 0.0,
            Self::BothBlackjack | Self::Tie => 1.0,
            Self::DealerBust | Self::PlayerHigher => 2.0,
            Self::PlayerBlackjack => 1.0 + blackjack_payout,
        }
    }
}

/// A settled blackjack round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlackjackResult {
    pub player: Hand,
    pub dealer: Hand,
    pub resolution: Resolution,
    pub settlement: Settlement,
}

impl PlayedRound for BlackjackResult {
    fn settlement(&self) -> &Settlement {
        &self.settlement
    }
}

/// The player is to act. Only [`Blackjack::deal`] creates one.
#[derive(Debug)]
pub struct PlayerTurn {
    stake: u64,
    player: Hand,
    dealer: Hand,
}

impl PlayerTurn {
    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer_upcard(&self) -> Option<Card> {
        self.dealer.cards().first().copied()
    }

    /// Take a card. Busting settles the round; reaching 21 stands automatically.
    pub fn hit(mut self, table: &mut Blackjack, rng: &mut RandomSource) -> BlackjackRound {
        let card = table.shoe.draw(rng);
        self.player.push(card);
        if self.player.is_bust() {
            // Dealer does not draw against a busted player.
            return BlackjackRound::Settled(table.finish(self));
        }
        if self.player.value() == 21 {
            return BlackjackRound::Settled(self.stand(table, rng));
        }
        BlackjackRound::PlayerTurn(self)
    }

    /// Stand: the dealer plays out and the round settles.
    pub fn stand(mut self, table: &mut Blackjack, rng: &mut RandomSource) -> BlackjackResult {
        table.play_dealer(&mut self.dealer, rng);
        table.finish(self)
    }
}

/// Dynamic round state.
#[derive(Debug)]
pub enum BlackjackRound {
    PlayerTurn(PlayerTurn),
    Settled(BlackjackResult),
}

impl BlackjackRound {
    pub fn hit(
        self,
        table: &mut Blackjack,
        rng: &mut RandomSource,
    ) -> Result<BlackjackRound, GameError> {
        match self {
            Self::PlayerTurn(turn) => Ok(turn.hit(table, rng)),
            Self::Settled(_) => Err(GameError::RoundSettled),
        }
    }

    pub fn stand(
        self,
        table: &mut Blackjack,
        rng: &mut RandomSource,
    ) -> Result<BlackjackResult, GameError> {
        match self {
            Self::PlayerTurn(turn) => Ok(turn.stand(table, rng)),
            Self::Settled(_) => Err(GameError::RoundSettled),
        }
    }

    pub fn result(&self) -> Option<&BlackjackResult> {
        match self {
            Self::PlayerTurn(_) => None,
            Self::Settled(result) => Some(result),
        }
    }
}

/// A blackjack table: rules plus the exclusively owned shoe.
#[derive(Clone, Debug)]
pub struct Blackjack {
    config: BlackjackConfig,
    shoe: Shoe,
}

impl Default for Blackjack {
    fn default() -> Self {
        let config = BlackjackConfig::default();
        let shoe = Shoe::empty(config.decks);
        Self { config, shoe }
    }
}

impl Blackjack {
    pub fn new(config: BlackjackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shoe = Shoe::empty(config.decks);
        Ok(Self { config, shoe })
    }

    pub fn config(&self) -> &BlackjackConfig {
        &self.config
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Deal two cards each. A player natural settles immediately.
    pub fn deal(&mut self, stake: u64, rng: &mut RandomSource) -> BlackjackRound {
        if self.shoe.needs_reshuffle() {
            debug!(
                remaining = self.shoe.remaining(),
                decks = self.config.decks,
                "reshuffling shoe"
            );
            self.shoe.reshuffle(rng);
        }

        let mut player = Hand::new();
        let mut dealer = Hand::new();
        player.push(self.shoe.draw(rng));
        dealer.push(self.shoe.draw(rng));
        player.push(self.shoe.draw(rng));
        dealer.push(self.shoe.draw(rng));

        let turn = PlayerTurn {
            stake,
            player,
            dealer,
        };
        if turn.player.is_blackjack() {
            return BlackjackRound::Settled(self.finish(turn));
        }
        BlackjackRound::PlayerTurn(turn)
    }

    fn dealer_hits(&self, dealer: &Hand) -> bool {
        let (value, soft) = hand_value(dealer.cards());
        value < DEALER_STAND || (value == DEALER_STAND && soft && self.config.dealer_hits_soft_17)
    }

    fn play_dealer(&mut self, dealer: &mut Hand, rng: &mut RandomSource) {
        while self.dealer_hits(dealer) {
            dealer.push(self.shoe.draw(rng));
        }
    }

    fn finish(&self, turn: PlayerTurn) -> BlackjackResult {
        let resolution = Resolution::resolve(&turn.player, &turn.dealer);
        let multiplier = resolution.multiplier(self.config.blackjack_payout);
        let result = BlackjackResult {
            settlement: Settlement::new(turn.stake, multiplier),
            player: turn.player,
            dealer: turn.dealer,
            resolution,
        };
        trace!(
            player = %format_card_list(result.player.cards()),
            dealer = %format_card_list(result.dealer.cards()),
            resolution = ?result.resolution,
            payout = result.settlement.payout,
            "blackjack settled"
        );
        result
    }
}

impl CasinoGame for Blackjack {
    type Selection = BlackjackStrategy;
    type Round = BlackjackResult;

    fn kind(&self) -> GameKind {
        GameKind::Blackjack
    }

    fn play(&mut self, bet: &Bet<BlackjackStrategy>, rng: &mut RandomSource) -> BlackjackResult {
        let mut round = self.deal(bet.amount, rng);
        loop {
            match round {
                BlackjackRound::Settled(result) => return result,
                BlackjackRound::PlayerTurn(turn) => {
                    if bet.selection.should_hit(turn.player()) {
                        round = turn.hit(self, rng);
                    } else {
                        return turn.stand(self, rng);
                    }
                }
            }
        }
    }

    fn theoretical_rtp(&self, selection: &BlackjackStrategy) -> f64 {
        theoretical_rtp(&self.config, *selection)
    }
}

// ============================================================================
// Exact return under an infinite deck
// ============================================================================

/// Final-total distribution: index `t` (`0..=21`) is standing on `t`, [`BUST`] is bust.
type Distribution = [f64; 23];

const BUST: usize = 22;

/// Largest hard total reachable: 21 plus a ten.
const MAX_HARD: usize = 31;

/// Card values 1 (ace) ..= 10 with their infinite-deck probabilities.
fn card_probabilities() -> impl Iterator<Item = (usize, f64)> {
    (1..=10).map(|value| {
        let weight = if value == 10 { 4.0 } else { 1.0 };
        (value, weight / 13.0)
    })
}

/// Best total and softness for a hand with hard total `hard` (aces counted 1).
fn total_of(hard: usize, has_ace: bool) -> (usize, bool) {
    if has_ace && hard + 10 <= 21 {
        (hard + 10, true)
    } else {
        (hard, false)
    }
}

/// Final distribution from every `(hard, has_ace)` state under a hit policy.
///
/// Every draw raises the hard total, so states are filled from the top down.
fn final_totals(hits: impl Fn(usize, bool) -> bool) -> Vec<[Distribution; 2]> {
    let mut table = vec![[[0.0; 23]; 2]; MAX_HARD + 1];
    for hard in (2..=MAX_HARD).rev() {
        for has_ace in [false, true] {
            let (total, soft) = total_of(hard, has_ace);
            let mut dist = [0.0; 23];
            if total > 21 {
                dist[BUST] = 1.0;
            } else if !hits(total, soft) {
                dist[total] = 1.0;
            } else {
                for (value, p) in card_probabilities() {
                    let next = table[hard + value][usize::from(has_ace || value == 1)];
                    for (slot, q) in dist.iter_mut().zip(next.iter()) {
                        *slot += p * q;
                    }
                }
            }
            table[hard][usize::from(has_ace)] = dist;
        }
    }
    table
}

/// Two-card starting states with their probabilities.
fn opening_hands() -> impl Iterator<Item = (usize, bool, f64)> {
    card_probabilities().flat_map(|(a, pa)| {
        card_probabilities().map(move |(b, pb)| (a + b, a == 1 || b == 1, pa * pb))
    })
}

/// Exact expected return per unit staked for `strategy` against `config`'s dealer,
/// drawing from an infinite deck (no card removal).
///
/// Finite shoes differ from this by a few thousandths.
pub fn theoretical_rtp(config: &BlackjackConfig, strategy: BlackjackStrategy) -> f64 {
    let stand_on = usize::from(strategy.threshold());
    let player = final_totals(|total, _| total < stand_on);
    let dealer_table = final_totals(|total, soft| {
        total < usize::from(DEALER_STAND)
            || (total == usize::from(DEALER_STAND) && soft && config.dealer_hits_soft_17)
    });

    let mut dealer = [0.0; 23];
    let mut dealer_natural = 0.0;
    for (hard, has_ace, p) in opening_hands() {
        if has_ace && hard == 11 {
            dealer_natural += p;
        }
        for (slot, q) in dealer.iter_mut().zip(dealer_table[hard][usize::from(has_ace)].iter()) {
            *slot += p * q;
        }
    }

    let natural_return = dealer_natural + (1.0 - dealer_natural) * (1.0 + config.blackjack_payout);
    let mut rtp = 0.0;
    for (hard, has_ace, p) in opening_hands() {
        if has_ace && hard == 11 {
            rtp += p * natural_return;
            continue;
        }
        let finals = &player[hard][usize::from(has_ace)];
        for (total, q) in finals.iter().enumerate().take(22) {
            if *q == 0.0 {
                continue;
            }
            let beaten: f64 = dealer[..total].iter().sum();
            let versus = 2.0 * (dealer[BUST] + beaten) + dealer[total];
            rtp += p * q * versus;
        }
    }
    rtp
}
