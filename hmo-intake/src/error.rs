use thiserror::Error;

use crate::hmo::{Hmo, MembershipTier};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("no medical context for {hmo} / {tier}")]
    NotFound { hmo: Hmo, tier: MembershipTier },

    #[error("failed to read medical context: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContextError>;
