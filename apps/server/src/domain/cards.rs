//! Card identity, ranking, and point values for 28 and 56.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn code(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    pub fn from_code(c: char) -> Option<Suit> {
        match c {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        };
        write!(f, "{symbol}")
    }
}

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.code().to_string())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let c = s.chars().next().ok_or_else(|| serde::de::Error::custom("empty suit"))?;
        Suit::from_code(c).ok_or_else(|| serde::de::Error::custom(format!("invalid suit: {s}")))
    }
}

/// The 8 ranks used in 28/56. Declaration order is NOT play-strength order;
/// see `Rank::strength` for the game's rank hierarchy (Jack highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Trick-resolution strength: 7<8<Q<K<10<A<9<J, Jack highest.
    /// Not the same as point value (`Rank::points`) or declaration order above.
    pub fn strength(self) -> u8 {
        match self {
            Rank::Seven => 0,
            Rank::Eight => 1,
            Rank::Queen => 2,
            Rank::King => 3,
            Rank::Ten => 4,
            Rank::Ace => 5,
            Rank::Nine => 6,
            Rank::Jack => 7,
        }
    }

    pub fn points(self) -> u8 {
        match self {
            Rank::Jack => 3,
            Rank::Nine => 2,
            Rank::Ace | Rank::Ten => 1,
            _ => 0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    pub fn from_code(s: &str) -> Option<Rank> {
        match s {
            "7" => Some(Rank::Seven),
            "8" => Some(Rank::Eight),
            "9" => Some(Rank::Nine),
            "10" => Some(Rank::Ten),
            "J" => Some(Rank::Jack),
            "Q" => Some(Rank::Queen),
            "K" => Some(Rank::King),
            "A" => Some(Rank::Ace),
            _ => None,
        }
    }
}

/// A single card. Identity is `rank+suit+"#"+deck_index`, unique within a
/// session's live deck. `deck_index` is always 1 in mode 28; 1 or 2 in 56,
/// where the game shuffles two 32-card decks together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub deck_index: u8,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank, deck_index: u8) -> Self {
        Card {
            suit,
            rank,
            deck_index,
        }
    }

    pub fn id(&self) -> String {
        format!("{}{}#{}", self.rank.code(), self.suit.code(), self.deck_index)
    }

    pub fn points(&self) -> u8 {
        self.rank.points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.id())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_card_id(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid card id: {s}")))
    }
}

/// Parses a card id of the form `"{rank}{suit}#{deck_index}"`, e.g. `"JS#1"`.
pub fn parse_card_id(s: &str) -> Option<Card> {
    let (body, deck_str) = s.split_once('#')?;
    let deck_index: u8 = deck_str.parse().ok()?;
    if deck_index != 1 && deck_index != 2 {
        return None;
    }
    if body.len() < 2 {
        return None;
    }
    let suit_char = body.chars().last()?;
    let rank_str = &body[..body.len() - suit_char.len_utf8()];
    let suit = Suit::from_code(suit_char)?;
    let rank = Rank::from_code(rank_str)?;
    Some(Card::new(suit, rank, deck_index))
}

/// Whether `hand` holds any card of `suit`.
pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_id_roundtrip() {
        let c = Card::new(Suit::Spades, Rank::Jack, 2);
        assert_eq!(c.id(), "JS#2");
        assert_eq!(parse_card_id(&c.id()), Some(c));
    }

    #[test]
    fn ten_is_two_characters() {
        let c = Card::new(Suit::Hearts, Rank::Ten, 1);
        assert_eq!(c.id(), "10H#1");
        assert_eq!(parse_card_id("10H#1"), Some(c));
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "ZZ#1", "JS#3", "JS", "JSH#1"] {
            assert_eq!(parse_card_id(bad), None, "expected {bad} to be rejected");
        }
    }

    #[test]
    fn jack_outranks_nine_and_ace() {
        assert!(Rank::Jack.strength() > Rank::Nine.strength());
        assert!(Rank::Nine.strength() > Rank::Ace.strength());
        assert!(Rank::Ace.strength() > Rank::Ten.strength());
    }

    #[test]
    fn points_match_point_table() {
        assert_eq!(Rank::Jack.points(), 3);
        assert_eq!(Rank::Nine.points(), 2);
        assert_eq!(Rank::Ace.points(), 1);
        assert_eq!(Rank::Ten.points(), 1);
        assert_eq!(Rank::King.points(), 0);
        assert_eq!(Rank::Queen.points(), 0);
        assert_eq!(Rank::Eight.points(), 0);
        assert_eq!(Rank::Seven.points(), 0);
    }

    #[test]
    fn hand_has_suit_detects_membership() {
        let hand = vec![Card::new(Suit::Hearts, Rank::King, 1)];
        assert!(hand_has_suit(&hand, Suit::Hearts));
        assert!(!hand_has_suit(&hand, Suit::Spades));
    }
}
