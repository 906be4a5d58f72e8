use super::model::LedgerSnapshot;

/// Pick the candidate a node should consider adopting: the first one, in
/// enumeration order, among those with the greatest length strictly above
/// `local_len`. Length is the only criterion; accumulated work is ignored.
pub fn longest_candidate(
    local_len: usize,
    candidates: &[LedgerSnapshot],
) -> Option<&LedgerSnapshot> {
    let mut best: Option<&LedgerSnapshot> = None;
    let mut best_len = local_len;
    for candidate in candidates {
        if candidate.chain.len() > best_len {
            best_len = candidate.chain.len();
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Block;

    fn snapshot(url: &str, len: usize) -> LedgerSnapshot {
        LedgerSnapshot {
            node_url: url.into(),
            chain: vec![Block::genesis(); len],
            pending_transactions: Vec::new(),
            network: Vec::new(),
        }
    }

    #[test]
    fn nothing_longer_means_no_candidate() {
        let candidates = vec![snapshot("a", 1), snapshot("b", 2)];
        assert!(longest_candidate(2, &candidates).is_none());
        assert!(longest_candidate(1, &[]).is_none());
    }

    #[test]
    fn picks_the_longest() {
        let candidates = vec![snapshot("a", 2), snapshot("b", 4), snapshot("c", 3)];
        let best = longest_candidate(1, &candidates).expect("candidate");
        assert_eq!(best.node_url, "b");
    }

    #[test]
    fn tie_goes_to_first_encountered() {
        let candidates = vec![snapshot("a", 3), snapshot("b", 3)];
        let best = longest_candidate(1, &candidates).expect("candidate");
        assert_eq!(best.node_url, "a");
    }
}
