use std::sync::Arc;

use teloxide::prelude::*;

use super::super::state::{current_state, transition, ConversationState};
use super::super::texts;
use super::super::BotContext;
use super::{
    ask_fragrances, ask_gender, ask_location, deliver_recommendation, start_preferences_flow,
};

pub async fn message_handler(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let user = match msg.from() {
        Some(u) => u,
        None => return Ok(()),
    };

    // Never react to bot accounts, including our own sends.
    if user.is_bot {
        return Ok(());
    }

    let text = match msg.text() {
        Some(t) => t.trim().to_string(),
        None => return Ok(()),
    };

    // Unknown slash commands fall through the command branch; they are
    // not survey answers.
    if text.starts_with('/') {
        return Ok(());
    }

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    match current_state(&ctx.pool, user_id) {
        ConversationState::AwaitAge => handle_age_input(&bot, &ctx, user_id, chat_id, &text).await,
        ConversationState::AwaitCustomLocation => {
            handle_custom_location_input(&bot, &ctx, user_id, chat_id, &text).await
        }
        // Mid-survey text that belongs to a keyboard step: repeat the
        // step instead of guessing.
        ConversationState::AwaitGender => ask_gender(&bot, chat_id).await,
        ConversationState::AwaitFragrances => ask_fragrances(&bot, chat_id, 0).await,
        ConversationState::AwaitLocation => ask_location(&bot, chat_id).await,
        ConversationState::Idle | ConversationState::AwaitFeedback => {
            handle_free_text(&bot, &ctx, user_id, chat_id, &text).await
        }
    }
}

async fn handle_age_input(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    let is_numeric = !text.is_empty() && text.chars().all(|c| c.is_ascii_digit());
    if !is_numeric {
        bot.send_message(chat_id, texts::AGE_NOT_NUMERIC).await?;
        return Ok(());
    }

    if let Err(e) = parfumbot::update_user_age(&ctx.pool, user_id, text) {
        tracing::error!("Failed to store age for {}: {}", user_id, e);
        bot.send_message(chat_id, texts::PROFILE_FETCH_ERROR).await?;
        return Ok(());
    }

    bot.send_message(chat_id, texts::age_saved(text)).await?;
    ask_gender(bot, chat_id).await?;
    transition(&ctx.pool, user_id, ConversationState::AwaitGender);

    Ok(())
}

async fn handle_custom_location_input(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    if let Err(e) = parfumbot::update_user_location(&ctx.pool, user_id, text) {
        tracing::error!("Failed to store location for {}: {}", user_id, e);
    }

    let user = match parfumbot::find_user_by_telegram_id(&ctx.pool, user_id) {
        Ok(Some(user)) => user,
        _ => {
            bot.send_message(chat_id, texts::PROFILE_FETCH_ERROR).await?;
            return Ok(());
        }
    };

    deliver_recommendation(bot, ctx, chat_id, &user, None, true, false).await
}

/// Out-of-flow text: with a complete profile it is an ad-hoc
/// recommendation request carrying the message as extra context;
/// otherwise the user is sent back into the survey.
async fn handle_free_text(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    let user = parfumbot::find_user_by_telegram_id(&ctx.pool, user_id)
        .ok()
        .flatten();

    match user {
        Some(user) if user.has_complete_profile() => {
            deliver_recommendation(bot, ctx, chat_id, &user, Some(text), false, true).await
        }
        _ => {
            bot.send_message(chat_id, texts::INCOMPLETE_PROFILE).await?;
            start_preferences_flow(bot, ctx, chat_id, user_id).await
        }
    }
}
