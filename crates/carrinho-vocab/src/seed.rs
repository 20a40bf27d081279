//! Fixed seed vocabulary: common grocery items with their glyphs.

use crate::known::KnownItem;

/// Seed entries as (name, emoji) pairs. Names are lowercase by
/// construction; the merge rule relies on that.
pub const SEED: &[(&str, &str)] = &[
    ("arroz", "🍚"),
    ("feijão", "🫘"),
    ("açúcar", "🍬"),
    ("sal", "🧂"),
    ("óleo", "🫗"),
    ("café", "☕"),
    ("leite", "🥛"),
    ("pão", "🍞"),
    ("manteiga", "🧈"),
    ("ovos", "🥚"),
    ("queijo", "🧀"),
    ("presunto", "🥓"),
    ("frango", "🍗"),
    ("carne", "🥩"),
    ("peixe", "🐟"),
    ("banana", "🍌"),
    ("maçã", "🍎"),
    ("laranja", "🍊"),
    ("tomate", "🍅"),
    ("cebola", "🧅"),
    ("alho", "🧄"),
    ("batata", "🥔"),
    ("cenoura", "🥕"),
    ("alface", "🥬"),
    ("macarrão", "🍝"),
    ("molho de tomate", "🥫"),
    ("biscoito", "🍪"),
    ("chocolate", "🍫"),
    ("refrigerante", "🥤"),
    ("suco", "🧃"),
    ("água", "💧"),
    ("papel higiênico", "🧻"),
    ("sabonete", "🧼"),
    ("detergente", "🧴"),
    ("amaciante", "🧺"),
];

/// Number of seed entries.
pub const SEED_LEN: usize = SEED.len();

/// Materialize the seed list, in seed order.
pub fn seed_items() -> Vec<KnownItem> {
    SEED.iter()
        .map(|(name, emoji)| KnownItem::new(*name, *emoji))
        .collect()
}
