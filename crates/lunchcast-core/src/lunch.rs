use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scenario::{Scenario, SkyBucket, TemperatureBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunchSuggestion {
    Quesadilla,
    BeanAndCheeseBurrito,
    HummusSandwich,
    Pasta,
    SurpriseMe,
}

impl LunchSuggestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quesadilla => "Quesadilla",
            Self::BeanAndCheeseBurrito => "Bean and cheese burrito",
            Self::HummusSandwich => "Hummus sandwich",
            Self::Pasta => "Pasta",
            Self::SurpriseMe => "Surprise me",
        }
    }
}

impl fmt::Display for LunchSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a scenario to a lunch. Anything not listed falls back to "Surprise me".
pub fn select_lunch(scenario: Scenario) -> LunchSuggestion {
    use SkyBucket::*;
    use TemperatureBucket::*;

    match (scenario.temperature, scenario.sky) {
        (Mild, ClearPartlyCloudy) => LunchSuggestion::BeanAndCheeseBurrito,
        (Warm, ClearPartlyCloudy) => LunchSuggestion::HummusSandwich,
        (Cool, ClearPartlyCloudy | OvercastMarine) => LunchSuggestion::Quesadilla,
        (Mild, OvercastMarine) => LunchSuggestion::Pasta,
        (Mild, Rain) => LunchSuggestion::SurpriseMe,
        // Warm + Overcast, Warm + Rain, Cool + Rain
        _ => LunchSuggestion::SurpriseMe,
    }
}
