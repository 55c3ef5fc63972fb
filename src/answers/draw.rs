//! Shuffle-without-repetition draws over the answer table

use super::{AnswerTable, DataError};
use rand::seq::SliceRandom;
use rand::Rng;

/// All phrases of `table` in random order
pub fn draw_pool_init<R: Rng + ?Sized>(table: &AnswerTable, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<String> = table.phrases().map(String::from).collect();
    pool.shuffle(rng);
    pool
}

/// Take the next phrase from `pool`.
///
/// An empty pool is reshuffled from the whole table first. When the draw
/// exhausts the pool it is refilled straight away, leaving out the phrase
/// just drawn so it cannot come up twice in a row.
pub fn draw_next<R: Rng + ?Sized>(
    mut pool: Vec<String>,
    table: &AnswerTable,
    rng: &mut R,
) -> Result<(String, Vec<String>), DataError> {
    if pool.is_empty() {
        pool = draw_pool_init(table, rng);
    }

    let phrase = pool.pop().ok_or(DataError::Empty)?;

    if pool.is_empty() {
        pool = draw_pool_init(table, rng);
        if pool.len() > 1 {
            pool.retain(|p| *p != phrase);
        }
    }

    Ok((phrase, pool))
}
