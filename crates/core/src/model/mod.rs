mod card;
mod deck;
mod ids;
mod progress;

pub use ids::{CardId, DeckId, ParseIdError};

pub use card::{Card, CardError};
pub use deck::{Deck, DeckError};
pub use progress::{CardProgress, LeitnerBox, ProgressSet};
