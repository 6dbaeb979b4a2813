//! Node behavior strategies.

/// How a node treats data packets it is asked to relay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeBehavior {
    #[default]
    Normal,
    /// Adversarial relay.  When listed as a candidate it immediately
    /// broadcasts a hop-advanced packet with no candidates, which silences
    /// the honest candidates waiting behind it, and then discards the data.
    BlackHole,
}

impl NodeBehavior {
    pub fn is_malicious(self) -> bool {
        matches!(self, NodeBehavior::BlackHole)
    }
}
