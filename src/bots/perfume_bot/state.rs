use parfumbot::db::SqlitePool;

/// Explicit per-user survey state, persisted in `conversation_states`.
/// Every inbound update is dispatched on this instead of guessing from
/// which profile fields happen to be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitAge,
    AwaitGender,
    AwaitFragrances,
    AwaitLocation,
    AwaitCustomLocation,
    AwaitFeedback,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::AwaitAge => "await_age",
            ConversationState::AwaitGender => "await_gender",
            ConversationState::AwaitFragrances => "await_fragrances",
            ConversationState::AwaitLocation => "await_location",
            ConversationState::AwaitCustomLocation => "await_custom_location",
            ConversationState::AwaitFeedback => "await_feedback",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "idle" => Some(ConversationState::Idle),
            "await_age" => Some(ConversationState::AwaitAge),
            "await_gender" => Some(ConversationState::AwaitGender),
            "await_fragrances" => Some(ConversationState::AwaitFragrances),
            "await_location" => Some(ConversationState::AwaitLocation),
            "await_custom_location" => Some(ConversationState::AwaitCustomLocation),
            "await_feedback" => Some(ConversationState::AwaitFeedback),
            _ => None,
        }
    }
}

/// An absent or unrecognized stored state reads as Idle.
pub fn current_state(pool: &SqlitePool, user_id: i64) -> ConversationState {
    match parfumbot::get_conversation_state(pool, user_id) {
        Ok(Some(raw)) => ConversationState::parse(&raw).unwrap_or(ConversationState::Idle),
        Ok(None) => ConversationState::Idle,
        Err(e) => {
            tracing::error!("Failed to load conversation state for {}: {}", user_id, e);
            ConversationState::Idle
        }
    }
}

/// State persistence failures must not break the user's turn; the flow
/// continues from whatever the store still holds.
pub fn transition(pool: &SqlitePool, user_id: i64, state: ConversationState) {
    if let Err(e) = parfumbot::set_conversation_state(pool, user_id, state.as_str()) {
        tracing::error!(
            "Failed to persist state {} for {}: {}",
            state.as_str(),
            user_id,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_storage_string() {
        let states = [
            ConversationState::Idle,
            ConversationState::AwaitAge,
            ConversationState::AwaitGender,
            ConversationState::AwaitFragrances,
            ConversationState::AwaitLocation,
            ConversationState::AwaitCustomLocation,
            ConversationState::AwaitFeedback,
        ];

        for state in states {
            assert_eq!(ConversationState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn unknown_stored_state_reads_as_none() {
        assert_eq!(ConversationState::parse("await_shoe_size"), None);
        assert_eq!(ConversationState::parse(""), None);
    }
}
