mod callbacks;
mod commands;
mod messages;

pub use callbacks::callback_handler;
pub use commands::{command_handler, Command};
pub use messages::message_handler;

use parfumbot::models::User;
use teloxide::prelude::*;

use super::keyboards::{
    build_feedback_keyboard, build_fragrance_keyboard, build_gender_keyboard,
    build_location_keyboard,
};
use super::state::{transition, ConversationState};
use super::texts;
use super::BotContext;

pub(super) async fn ask_age(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::ASK_AGE).await?;
    Ok(())
}

pub(super) async fn ask_gender(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::ASK_GENDER)
        .reply_markup(build_gender_keyboard())
        .await?;
    Ok(())
}

pub(super) async fn ask_fragrances(bot: &Bot, chat_id: ChatId, page: usize) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::ASK_FRAGRANCES)
        .reply_markup(build_fragrance_keyboard(page))
        .await?;
    Ok(())
}

pub(super) async fn ask_location(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::ASK_LOCATION)
        .reply_markup(build_location_keyboard())
        .await?;
    Ok(())
}

pub(super) async fn ask_feedback(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::ASK_FEEDBACK)
        .reply_markup(build_feedback_keyboard())
        .await?;
    Ok(())
}

/// Restarting the survey always begins at the age step, regardless of
/// how far an earlier pass got.
pub(super) async fn start_preferences_flow(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    user_id: i64,
) -> ResponseResult<()> {
    transition(&ctx.pool, user_id, ConversationState::AwaitAge);
    ask_age(bot, chat_id).await
}

/// The shared tail of every recommendation path: delay notice, generate,
/// send, then the feedback keyboard. Generation never fails by contract,
/// so this only errors on the Telegram sends.
pub(super) async fn deliver_recommendation(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    user: &User,
    extra_context: Option<&str>,
    survey_finish: bool,
    log_result: bool,
) -> ResponseResult<()> {
    bot.send_message(chat_id, texts::GENERATING).await?;

    let recommendation = ctx.recommender.generate(user, extra_context).await;

    let reply = if survey_finish {
        texts::survey_finished(&recommendation)
    } else {
        recommendation.clone()
    };
    bot.send_message(chat_id, reply).await?;

    if log_result {
        if let Err(e) = parfumbot::add_recommendation(&ctx.pool, user.id, &recommendation) {
            tracing::error!("Failed to log recommendation for {}: {}", user.id, e);
        }
    }

    ask_feedback(bot, chat_id).await?;
    transition(&ctx.pool, user.id, ConversationState::AwaitFeedback);

    Ok(())
}

pub(super) fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize_first;

    #[test]
    fn capitalizes_multibyte_first_letter() {
        assert_eq!(capitalize_first("женский"), "Женский");
        assert_eq!(capitalize_first("other"), "Other");
        assert_eq!(capitalize_first(""), "");
    }
}
