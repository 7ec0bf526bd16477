use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card - Collectible identity, unique on (set_code, number)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub rarity: Option<String>,
}

// ---------------------------------------------------------------------------
// CardKey - The (name, set_code, number) triple used by CSV inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardKey {
    pub name: String,
    pub set_code: String,
    pub number: String,
}

impl CardKey {
    pub fn new(
        name: impl Into<String>,
        set_code: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            set_code: set_code.into(),
            number: number.into(),
        }
    }
}
