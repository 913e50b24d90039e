/// Every inline-keyboard payload the bot emits. Encoding is a short
/// prefix plus, where needed, a value; decoding takes everything after
/// the first delimiter as the value, so option labels containing the
/// delimiter survive the round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    GetRecommendation,
    UpdatePreferences,
    AdminPanel,
    SelectGender(String),
    ToggleFragrance(String),
    NextFragrancePage(usize),
    FinishFragrances,
    SelectLocation(String),
    SelectLocationOther,
    SubmitFeedback(u8),
    AdminStats,
    AdminSupport,
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::GetRecommendation => "menu:recommend".to_string(),
            CallbackAction::UpdatePreferences => "menu:update".to_string(),
            CallbackAction::AdminPanel => "menu:admin".to_string(),
            CallbackAction::SelectGender(value) => format!("gender:{}", value),
            CallbackAction::ToggleFragrance(value) => format!("frag:{}", value),
            CallbackAction::NextFragrancePage(page) => format!("fragpage:{}", page),
            CallbackAction::FinishFragrances => "fragdone".to_string(),
            CallbackAction::SelectLocation(value) => format!("loc:{}", value),
            CallbackAction::SelectLocationOther => "locother".to_string(),
            CallbackAction::SubmitFeedback(score) => format!("fb:{}", score),
            CallbackAction::AdminStats => "admin:stats".to_string(),
            CallbackAction::AdminSupport => "admin:support".to_string(),
        }
    }

    pub fn decode(data: &str) -> Option<CallbackAction> {
        match data {
            "menu:recommend" => return Some(CallbackAction::GetRecommendation),
            "menu:update" => return Some(CallbackAction::UpdatePreferences),
            "menu:admin" => return Some(CallbackAction::AdminPanel),
            "fragdone" => return Some(CallbackAction::FinishFragrances),
            "locother" => return Some(CallbackAction::SelectLocationOther),
            "admin:stats" => return Some(CallbackAction::AdminStats),
            "admin:support" => return Some(CallbackAction::AdminSupport),
            _ => {}
        }

        if let Some(value) = data.strip_prefix("gender:") {
            return Some(CallbackAction::SelectGender(value.to_string()));
        }
        if let Some(value) = data.strip_prefix("frag:") {
            return Some(CallbackAction::ToggleFragrance(value.to_string()));
        }
        if let Some(raw) = data.strip_prefix("fragpage:") {
            return raw.parse().ok().map(CallbackAction::NextFragrancePage);
        }
        if let Some(value) = data.strip_prefix("loc:") {
            return Some(CallbackAction::SelectLocation(value.to_string()));
        }
        if let Some(raw) = data.strip_prefix("fb:") {
            return raw
                .parse()
                .ok()
                .filter(|score| (1..=5).contains(score))
                .map(CallbackAction::SubmitFeedback);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_round_trip() {
        let actions = [
            CallbackAction::GetRecommendation,
            CallbackAction::UpdatePreferences,
            CallbackAction::AdminPanel,
            CallbackAction::SelectGender("женский".to_string()),
            CallbackAction::ToggleFragrance("Цветочные".to_string()),
            CallbackAction::NextFragrancePage(2),
            CallbackAction::FinishFragrances,
            CallbackAction::SelectLocation("Санкт-Петербург".to_string()),
            CallbackAction::SelectLocationOther,
            CallbackAction::SubmitFeedback(5),
            CallbackAction::AdminStats,
            CallbackAction::AdminSupport,
        ];

        for action in actions {
            assert_eq!(CallbackAction::decode(&action.encode()), Some(action));
        }
    }

    #[test]
    fn values_containing_the_delimiter_survive() {
        let action = CallbackAction::SelectLocation("Ростов-на-Дону: центр".to_string());
        assert_eq!(CallbackAction::decode(&action.encode()), Some(action));

        let action = CallbackAction::ToggleFragrance("frag:with:colons".to_string());
        assert_eq!(CallbackAction::decode(&action.encode()), Some(action));
    }

    #[test]
    fn malformed_payloads_decode_to_none() {
        assert_eq!(CallbackAction::decode(""), None);
        assert_eq!(CallbackAction::decode("unknown:thing"), None);
        assert_eq!(CallbackAction::decode("fragpage:abc"), None);
        assert_eq!(CallbackAction::decode("fb:9"), None);
        assert_eq!(CallbackAction::decode("fb:0"), None);
        assert_eq!(CallbackAction::decode("fb:"), None);
    }
}
