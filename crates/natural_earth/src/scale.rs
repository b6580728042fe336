use std::fmt;
use std::str::FromStr;

use crate::error::PlanError;

/// Natural Earth dataset resolution tier (1:N,000,000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scale {
    Ten,
    Fifty,
    OneTen,
}

impl Scale {
    /// All tiers, largest scale (most detail) first.
    pub const ALL: [Scale; 3] = [Scale::Ten, Scale::Fifty, Scale::OneTen];

    /// Denominator in millions.
    pub fn millions(self) -> u32 {
        match self {
            Scale::Ten => 10,
            Scale::Fifty => 50,
            Scale::OneTen => 110,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scale::Ten => "10",
            Scale::Fifty => "50",
            Scale::OneTen => "110",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scale::Ten => "1:10,000,000, largest scale, greatest detail",
            Scale::Fifty => "1:50,000,000, intermediate scale, moderate detail",
            Scale::OneTen => "1:110,000,000, smallest scale, least detail",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::ALL
            .into_iter()
            .find(|scale| scale.as_str() == s)
            .ok_or_else(|| PlanError::InvalidScale(s.to_string()))
    }
}
