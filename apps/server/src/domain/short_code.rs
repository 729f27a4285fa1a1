//! Human-friendly session join codes: `{adjective}-{noun}-{NN}`.

use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::OsRng;

const ADJECTIVES: &[&str] = &[
    "brave", "quiet", "lucky", "royal", "swift", "golden", "silent", "clever",
    "bold", "happy", "calm", "mighty", "gentle", "fierce", "humble", "jolly",
    "proud", "steady", "sunny", "vivid",
];

const NOUNS: &[&str] = &[
    "falcon", "otter", "turtle", "heron", "badger", "panther", "sparrow",
    "dolphin", "fox", "wolf", "rabbit", "eagle", "tiger", "lynx", "raven",
    "beetle", "koala", "cobra", "gecko", "bison",
];

/// Generates a code like `brave-falcon-42`: memorable enough to read over
/// voice chat, random enough that guessing a live session is impractical.
pub fn generate_short_code() -> String {
    let mut rng = OsRng;
    let adjective = ADJECTIVES[Uniform::from(0..ADJECTIVES.len()).sample(&mut rng)];
    let noun = NOUNS[Uniform::from(0..NOUNS.len()).sample(&mut rng)];
    let suffix: u8 = Uniform::from(0..100u16).sample(&mut rng) as u8;
    format!("{adjective}-{noun}-{suffix:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_the_expected_shape() {
        let code = generate_short_code();
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(ADJECTIVES.contains(&parts[0]));
        assert!(NOUNS.contains(&parts[1]));
        assert_eq!(parts[2].len(), 2);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn successive_codes_usually_differ() {
        let a = generate_short_code();
        let b = generate_short_code();
        // Not a hard guarantee (collisions are possible), but astronomically
        // unlikely across two draws from a ~40000-value space.
        assert_ne!(a, b);
    }
}
