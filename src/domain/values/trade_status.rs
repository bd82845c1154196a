use std::fmt;
use std::str::FromStr;

/// Conventional trade statuses. The stored status column is free text;
/// only exact `success` / `failed` values close a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Success,
    Failed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Success => "success",
            TradeStatus::Failed => "failed",
        }
    }

    /// True when patching to `status` must stamp `closed_at`.
    pub fn is_closing(status: &str) -> bool {
        matches!(
            status.parse::<TradeStatus>(),
            Ok(TradeStatus::Success) | Ok(TradeStatus::Failed)
        )
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Exact match, unlike TradeDirection: "Success" is not a closing status.
impl FromStr for TradeStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TradeStatus::Open),
            "success" => Ok(TradeStatus::Success),
            "failed" => Ok(TradeStatus::Failed),
            _ => Err(format!("Unknown trade status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_statuses_are_exact() {
        assert!(TradeStatus::is_closing("success"));
        assert!(TradeStatus::is_closing("failed"));
        assert!(!TradeStatus::is_closing("open"));
        assert!(!TradeStatus::is_closing("Success"));
        assert!(!TradeStatus::is_closing("cancelled"));
    }
}
