//! Pure rule functions: deck construction, dealing, legality, and scoring.
//!
//! Nothing in this module touches a `Session`; everything here is a free
//! function over plain data so it can be exercised and tested without an
//! engine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::cards::{Card, Rank, Suit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Twenty8,
    Fifty6,
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Mode::from_str(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid mode: {s}")))
    }
}

impl Mode {
    pub fn from_str(s: &str) -> Option<Mode> {
        match s {
            "28" => Some(Mode::Twenty8),
            "56" => Some(Mode::Fifty6),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Twenty8 => "28",
            Mode::Fifty6 => "56",
        }
    }

    pub fn seats(self) -> usize {
        match self {
            Mode::Twenty8 => 4,
            Mode::Fifty6 => 6,
        }
    }

    pub fn min_bid(self) -> u8 {
        match self {
            Mode::Twenty8 => 14,
            Mode::Fifty6 => 28,
        }
    }

    /// The mode's name doubles as its point ceiling: the deck carries exactly
    /// that many points, so a bid can never legally exceed it.
    pub fn max_bid(self) -> u8 {
        match self {
            Mode::Twenty8 => 28,
            Mode::Fifty6 => 56,
        }
    }

    pub fn deck_copies(self) -> u8 {
        match self {
            Mode::Twenty8 => 1,
            Mode::Fifty6 => 2,
        }
    }
}

/// Builds the full, unshuffled deck for `mode`: 32 cards for 28 (one copy of
/// each suit/rank pair), 64 cards for 56 (two copies, tagged by deck_index).
pub fn make_deck(mode: Mode) -> Vec<Card> {
    let mut deck = Vec::with_capacity(32 * mode.deck_copies() as usize);
    for deck_index in 1..=mode.deck_copies() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                deck.push(Card::new(suit, rank, deck_index));
            }
        }
    }
    deck
}

/// Splits `deck` evenly across `seats` players; any remainder (when the deck
/// does not divide evenly) goes to the kitty.
pub fn deal(deck: &[Card], seats: usize) -> (Vec<Vec<Card>>, Vec<Card>) {
    let per_player = deck.len() / seats;
    let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(per_player); seats];
    let mut iter = deck.iter().copied();
    for hand in hands.iter_mut() {
        for _ in 0..per_player {
            if let Some(card) = iter.next() {
                hand.push(card);
            }
        }
    }
    let kitty: Vec<Card> = iter.collect();
    (hands, kitty)
}

/// Cards in `hand` legal to play given the trick's lead suit (`None` if this
/// seat is leading), the trump suit, and whether trump has been revealed.
pub fn playable_cards(
    hand: &[Card],
    lead_suit: Option<Suit>,
    trump: Option<Suit>,
    trump_revealed: bool,
) -> Vec<Card> {
    let Some(lead) = lead_suit else {
        return hand.to_vec();
    };
    let following: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead).collect();
    if !following.is_empty() {
        return following;
    }
    if trump_revealed {
        if let Some(trump_suit) = trump {
            let trumps: Vec<Card> = hand
                .iter()
                .copied()
                .filter(|c| c.suit == trump_suit)
                .collect();
            if !trumps.is_empty() {
                return trumps;
            }
        }
    }
    hand.to_vec()
}

/// Determines the winning seat of a completed trick.
///
/// `trick` is the ordered list of `(seat, card)` plays. If any trump card was
/// played and trump is revealed, the highest trump wins; otherwise the
/// highest card of the lead suit wins. Ties (only possible in 56, where the
/// same card can be played twice from the two decks) are broken in favor of
/// the earlier-played card.
pub fn trick_winner(trick: &[(usize, Card)], trump: Option<Suit>, trump_revealed: bool) -> usize {
    assert!(!trick.is_empty(), "trick_winner called on empty trick");
    let lead_suit = trick[0].1.suit;
    let trump_in_play = trump_revealed && trump.is_some();

    let candidates: Vec<&(usize, Card)> = if trump_in_play {
        let trump_suit = trump.unwrap();
        let trumped: Vec<&(usize, Card)> =
            trick.iter().filter(|(_, c)| c.suit == trump_suit).collect();
        if !trumped.is_empty() {
            trumped
        } else {
            trick.iter().filter(|(_, c)| c.suit == lead_suit).collect()
        }
    } else {
        trick.iter().filter(|(_, c)| c.suit == lead_suit).collect()
    };

    let mut best = candidates[0];
    for cand in &candidates[1..] {
        if cand.1.rank.strength() > best.1.rank.strength() {
            best = cand;
        }
    }
    best.0
}

/// Sum of per-card point values in a trick.
pub fn trick_points(trick: &[(usize, Card)]) -> u32 {
    trick.iter().map(|(_, c)| c.points() as u32).sum()
}

/// Sums per-seat points into the two teams: even seats vs odd seats.
pub fn team_scores(points_by_seat: &[u32]) -> (u32, u32) {
    let mut team0 = 0u32;
    let mut team1 = 0u32;
    for (seat, points) in points_by_seat.iter().enumerate() {
        if seat % 2 == 0 {
            team0 += points;
        } else {
            team1 += points;
        }
    }
    (team0, team1)
}

/// Whether the bidding team made its bid: the bid winner's team's points
/// must meet or exceed the bid value.
pub fn bid_outcome(bid_winner: usize, bid_value: u8, points_by_seat: &[u32]) -> bool {
    let (team0, team1) = team_scores(points_by_seat);
    let team_points = if bid_winner % 2 == 0 { team0 } else { team1 };
    team_points >= bid_value as u32
}
