//! Access-control predicates.
//!
//! Pure evaluation against current state; no side effects. Every mutating
//! command runs exactly one of these before touching anything.

use crate::identity::IdentityToken;

use super::errors::{BallotError, BallotResult};
use super::registry::VoterRegistry;

/// Require that `caller` is the engine owner.
pub(crate) fn require_owner(owner: &IdentityToken, caller: &IdentityToken) -> BallotResult<()> {
    if caller == owner {
        Ok(())
    } else {
        Err(BallotError::NotOwner)
    }
}

/// Require that `caller` is a registered voter.
pub(crate) fn require_registered_voter(
    voters: &VoterRegistry,
    caller: &IdentityToken,
) -> BallotResult<()> {
    if voters.is_registered(caller) {
        Ok(())
    } else {
        Err(BallotError::NotRegisteredVoter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes_owner_check() {
        let owner = IdentityToken::new();
        assert!(require_owner(&owner, &owner).is_ok());
    }

    #[test]
    fn test_non_owner_fails_owner_check() {
        let owner = IdentityToken::new();
        let other = IdentityToken::new();
        assert!(matches!(
            require_owner(&owner, &other).unwrap_err(),
            BallotError::NotOwner
        ));
    }

    #[test]
    fn test_registered_voter_passes() {
        let voter = IdentityToken::new();
        let mut voters = VoterRegistry::new();
        voters.register(voter);

        assert!(require_registered_voter(&voters, &voter).is_ok());
    }

    #[test]
    fn test_unknown_identity_fails_voter_check() {
        let voters = VoterRegistry::new();
        assert!(matches!(
            require_registered_voter(&voters, &IdentityToken::new()).unwrap_err(),
            BallotError::NotRegisteredVoter
        ));
    }
}
