/// Known peer addresses in registration order. Never contains this
/// node's own address, never shrinks.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    own_url: String,
    peers: Vec<String>,
}

impl PeerRegistry {
    pub fn new(own_url: impl Into<String>) -> Self {
        Self {
            own_url: own_url.into(),
            peers: Vec::new(),
        }
    }

    /// Register `address`. Returns false (and changes nothing) for this
    /// node's own address, a blank address, or one already known.
    pub fn add(&mut self, address: &str) -> bool {
        if address.trim().is_empty() || address == self.own_url || self.contains(address) {
            return false;
        }
        self.peers.push(address.to_string());
        true
    }

    pub fn contains(&self, address: &str) -> bool {
        self.peers.iter().any(|p| p == address)
    }

    pub fn own_url(&self) -> &str {
        &self.own_url
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.peers.clone()
    }
}
