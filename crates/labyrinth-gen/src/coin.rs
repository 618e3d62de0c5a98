use rand::Rng;

/// Source of the binary decisions made while carving a maze.
///
/// The generator never touches the random number generator directly, so a
/// test can swap in a scripted coin and get a fully predictable maze.
pub trait Coin {
    /// Flip once. `true` means "put a wall here".
    fn flip(&mut self, rng: &mut impl Rng) -> bool;
}

/// An unbiased coin backed by the generator's RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct FairCoin;

impl Coin for FairCoin {
    fn flip(&mut self, rng: &mut impl Rng) -> bool {
        rng.random_bool(0.5)
    }
}
