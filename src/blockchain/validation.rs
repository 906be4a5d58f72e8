use super::block::{Block, hash_is_valid};

/// Whether `candidate` may follow `previous`: linkage, index, and a
/// recomputed digest that meets the target. The candidate's declared
/// `hash` field is not compared against the recomputed digest.
pub fn block_can_be_appended(previous: &Block, candidate: &Block) -> bool {
    candidate.previous_block_hash == previous.hash
        && candidate.index == previous.index + 1
        && hash_is_valid(&candidate.compute_hash())
}

/// A chain is valid iff it starts with `genesis` and every adjacent pair
/// passes [`block_can_be_appended`].
pub fn chain_is_valid(genesis: &Block, chain: &[Block]) -> bool {
    match chain.first() {
        Some(first) if first == genesis => chain
            .windows(2)
            .all(|pair| block_can_be_appended(&pair[0], &pair[1])),
        _ => false,
    }
}
