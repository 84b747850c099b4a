use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

pub const DECK_SIZE: usize = 52;

/// The shared draw pile for one hand. Cards are taken from the top
/// (index 0) and never returned.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// An unshuffled 52-card deck.
    pub fn new() -> Self {
        Self::from_cards(full_deck())
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::new_shuffled(&mut rng)
    }

    pub fn new_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::new();
        deck.shuffle(rng);
        deck
    }

    /// A pile in exactly the given order, top card first. Used to stack
    /// the deck for reproducible scenarios.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards = full_deck();
        self.cards.shuffle(rng);
        self.position = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Takes `n` cards off the top, or none at all if fewer remain.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let out = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(out)
    }

    /// Deals `per_player` cards to each of `players` hands, one block per player.
    pub fn deal(&mut self, players: usize, per_player: usize) -> Result<Vec<Vec<Card>>, GameError> {
        let needed = players * per_player;
        let remaining = self.remaining();
        if needed > remaining {
            return Err(GameError::DeckExhausted {
                requested: needed,
                remaining,
            });
        }
        (0..players).map(|_| self.draw(per_player)).collect()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
