use tandem_core::UserId;

/// Which side of the pair creates the offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Offerer,
    Answerer,
}

impl Role {
    /// The lexicographically smaller user id offers.
    ///
    /// Messages carrying our own user id never reach role resolution, so the
    /// two ids always differ here.
    pub fn resolve(local: &UserId, remote: &UserId) -> Self {
        if local < remote {
            Self::Offerer
        } else {
            Self::Answerer
        }
    }
}
