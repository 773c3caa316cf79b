// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., G_K7NP3X for games)

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Length of session ids and OAuth state values
pub const TOKEN_LENGTH: usize = 32;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Game posting (G_)
    Game,
    /// Join record (P_) - P for Player
    GamePlayer,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Game => "G",
            EntityPrefix::GamePlayer => "P",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a Game ID (G_XXXXXX)
pub fn generate_game_id() -> String {
    generate_id(EntityPrefix::Game)
}

/// Generate a join record ID (P_XXXXXX)
pub fn generate_game_player_id() -> String {
    generate_id(EntityPrefix::GamePlayer)
}

/// Session ids and OAuth states: 160 random bits, no prefix
pub fn generate_token() -> String {
    generate_raw_id(TOKEN_LENGTH)
}
