use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum DurationType {
    #[default]
    Day,
    Month,
    Year,
}

impl Display for DurationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration_type = match self {
            DurationType::Day => "day",
            DurationType::Month => "month",
            DurationType::Year => "year",
        };
        write!(f, "{}", duration_type)
    }
}

impl DurationType {
    pub fn from_str(value: &str) -> Self {
        match value {
            "month" => DurationType::Month,
            "year" => DurationType::Year,
            _ => DurationType::Day,
        }
    }
}
