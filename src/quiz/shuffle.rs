//! Fisher–Yates shuffle for answer options
//!
//! Runs once per problem presentation so answer positions cannot be memorized.

use rand::Rng;

use crate::consts::OPTION_COUNT;

/// Shuffle a slice in place, uniformly over all permutations
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Return a shuffled copy of a problem's option set
pub fn shuffle_options<R: Rng + ?Sized>(
    options: [i32; OPTION_COUNT],
    rng: &mut R,
) -> [i32; OPTION_COUNT] {
    let mut shuffled = options;
    shuffle_in_place(&mut shuffled, rng);
    shuffled
}
