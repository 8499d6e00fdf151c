//! Governance configuration with TOML file support.

use plenum_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::call::AmendmentCall;
use crate::error::GovernanceError;

/// Deployment configuration for a governance engine.
///
/// Can be loaded from a TOML file via [`GovernanceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The two addresses are required;
/// quorum and debating period fall back to the standard deployment values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// The only account allowed to submit proposals.
    pub chairperson: Address,

    /// The token ledger holding members' real balances.
    pub token: Address,

    /// Minimum total weight a proposal must attract, in whole tokens.
    #[serde(default = "default_minimum_quorum_tokens")]
    pub minimum_quorum_tokens: u64,

    /// Seconds from proposal creation to its voting deadline.
    #[serde(default = "default_debating_period_secs")]
    pub debating_period_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_minimum_quorum_tokens() -> u64 {
    150
}

fn default_debating_period_secs() -> u64 {
    24 * 60 * 60
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    /// A configuration with the standard quorum and debating period.
    pub fn new(chairperson: Address, token: Address) -> Self {
        Self {
            chairperson,
            token,
            minimum_quorum_tokens: default_minimum_quorum_tokens(),
            debating_period_secs: default_debating_period_secs(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GovernanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let config: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("GovernanceConfig is always serializable to TOML")
    }

    fn validate(&self) -> Result<(), GovernanceError> {
        if !self.chairperson.is_valid() {
            return Err(GovernanceError::Config(format!(
                "invalid chairperson address: {}",
                self.chairperson
            )));
        }
        if !self.token.is_valid() {
            return Err(GovernanceError::Config(format!(
                "invalid token address: {}",
                self.token
            )));
        }
        Ok(())
    }
}

/// Live governance parameters.
///
/// Built from a [`GovernanceConfig`] at engine construction. Afterwards they
/// change only when a confirmed proposal addressed to the engine itself
/// carries an [`AmendmentCall`]; there is no public setter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceParams {
    pub chairperson: Address,
    pub token: Address,
    pub minimum_quorum: TokenAmount,
    pub debating_period_secs: u64,
}

impl GovernanceParams {
    /// Apply a confirmed self-amendment.
    pub(crate) fn apply(&mut self, amendment: AmendmentCall) {
        match amendment {
            AmendmentCall::SetChairperson(address) => {
                tracing::info!(chairperson = %address, "amendment: chairperson changed");
                self.chairperson = address;
            }
            AmendmentCall::SetMinimumQuorum(amount) => {
                tracing::info!(minimum_quorum = %amount, "amendment: minimum quorum changed");
                self.minimum_quorum = amount;
            }
            AmendmentCall::SetDebatingPeriod(secs) => {
                tracing::info!(debating_period_secs = secs, "amendment: debating period changed");
                self.debating_period_secs = secs;
            }
        }
    }
}

impl From<GovernanceConfig> for GovernanceParams {
    fn from(config: GovernanceConfig) -> Self {
        Self {
            chairperson: config.chairperson,
            token: config.token,
            minimum_quorum: TokenAmount::from_whole(config.minimum_quorum_tokens as u128),
            debating_period_secs: config.debating_period_secs,
        }
    }
}
