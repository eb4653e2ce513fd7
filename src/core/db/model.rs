use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Draft,
    Active,
    Ended,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Draft => "Draft",
            ContractStatus::Active => "Active",
            ContractStatus::Ended => "Ended",
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, ContractStatus::Active)
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ContractStatus {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Draft" => Ok(ContractStatus::Draft),
            "Active" => Ok(ContractStatus::Active),
            "Ended" => Ok(ContractStatus::Ended),
            _ => Err(anyhow::anyhow!("Invalid ContractStatus value: {}", value)),
        }
    }
}
