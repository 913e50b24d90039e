use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

use crate::services::stats::{get_bot_statistics, get_support_requests_list};

use super::super::actions::CallbackAction;
use super::super::keyboards::build_admin_keyboard;
use super::super::state::{transition, ConversationState};
use super::super::texts;
use super::super::BotContext;
use super::{
    ask_fragrances, ask_location, capitalize_first, deliver_recommendation,
    start_preferences_flow,
};

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let data = match &q.data {
        Some(d) => d.clone(),
        None => return Ok(()),
    };

    let user_id = q.from.id.0 as i64;

    let action = match CallbackAction::decode(&data) {
        Some(action) => action,
        None => {
            tracing::warn!("Undecodable callback payload from {}: {}", user_id, data);
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        }
    };

    // Every action except the toast-only ones needs somewhere to reply.
    let chat_id = match q.message.as_ref() {
        Some(message) => message.chat.id,
        None => {
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        }
    };

    match action {
        CallbackAction::GetRecommendation => {
            handle_get_recommendation(&bot, &ctx, user_id, chat_id).await?;
        }
        CallbackAction::UpdatePreferences => {
            start_preferences_flow(&bot, &ctx, chat_id, user_id).await?;
        }
        CallbackAction::SelectGender(gender) => {
            handle_gender_select(&bot, &ctx, &q, user_id, chat_id, &gender).await?;
        }
        CallbackAction::ToggleFragrance(fragrance) => {
            // Answer with a toast and keep the keyboard up for more taps.
            match parfumbot::add_preferred_fragrance(&ctx.pool, user_id, &fragrance) {
                Ok(_) => {
                    bot.answer_callback_query(&q.id)
                        .text(texts::fragrance_selected(&fragrance))
                        .await?;
                }
                Err(e) => {
                    tracing::error!("Failed to store fragrance for {}: {}", user_id, e);
                    bot.answer_callback_query(&q.id).await?;
                }
            }
            return Ok(());
        }
        CallbackAction::NextFragrancePage(page) => {
            ask_fragrances(&bot, chat_id, page).await?;
        }
        CallbackAction::FinishFragrances => {
            remove_keyboard(&bot, &q).await;
            bot.send_message(chat_id, texts::FRAGRANCES_DONE).await?;
            ask_location(&bot, chat_id).await?;
            transition(&ctx.pool, user_id, ConversationState::AwaitLocation);
        }
        CallbackAction::SelectLocation(location) => {
            handle_location_select(&bot, &ctx, &q, user_id, chat_id, &location).await?;
        }
        CallbackAction::SelectLocationOther => {
            bot.send_message(chat_id, texts::ASK_CUSTOM_LOCATION).await?;
            transition(&ctx.pool, user_id, ConversationState::AwaitCustomLocation);
        }
        CallbackAction::SubmitFeedback(score) => {
            if let Err(e) = parfumbot::save_feedback(&ctx.pool, user_id, i32::from(score)) {
                tracing::error!("Failed to store feedback from {}: {}", user_id, e);
            }
            transition(&ctx.pool, user_id, ConversationState::Idle);
            bot.answer_callback_query(&q.id)
                .text(texts::FEEDBACK_THANKS)
                .await?;
            bot.send_message(chat_id, texts::FEEDBACK_FOLLOWUP).await?;
            return Ok(());
        }
        CallbackAction::AdminPanel => {
            if ctx.is_admin(user_id) {
                bot.send_message(chat_id, texts::ADMIN_CHOOSE_ACTION)
                    .reply_markup(build_admin_keyboard())
                    .await?;
            }
        }
        CallbackAction::AdminStats => {
            if ctx.is_admin(user_id) {
                match get_bot_statistics(&ctx.pool) {
                    Ok(stats) => {
                        bot.send_message(chat_id, stats).await?;
                    }
                    Err(e) => tracing::error!("Failed to gather statistics: {}", e),
                }
            }
        }
        CallbackAction::AdminSupport => {
            if ctx.is_admin(user_id) {
                match get_support_requests_list(&ctx.pool) {
                    Ok(list) => {
                        bot.send_message(chat_id, list).await?;
                    }
                    Err(e) => tracing::error!("Failed to list support requests: {}", e),
                }
            }
        }
    }

    bot.answer_callback_query(&q.id).await?;

    Ok(())
}

async fn handle_get_recommendation(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
) -> ResponseResult<()> {
    let user = parfumbot::find_user_by_telegram_id(&ctx.pool, user_id)
        .ok()
        .flatten();

    match user {
        Some(user) if user.has_complete_profile() => {
            deliver_recommendation(bot, ctx, chat_id, &user, None, false, false).await
        }
        _ => {
            bot.send_message(chat_id, texts::INCOMPLETE_PROFILE).await?;
            start_preferences_flow(bot, ctx, chat_id, user_id).await
        }
    }
}

async fn handle_gender_select(
    bot: &Bot,
    ctx: &BotContext,
    q: &CallbackQuery,
    user_id: i64,
    chat_id: ChatId,
    gender: &str,
) -> ResponseResult<()> {
    if let Err(e) = parfumbot::update_user_gender(&ctx.pool, user_id, gender) {
        tracing::error!("Failed to store gender for {}: {}", user_id, e);
        bot.send_message(chat_id, texts::PROFILE_FETCH_ERROR).await?;
        return Ok(());
    }

    remove_keyboard(bot, q).await;

    bot.send_message(chat_id, texts::gender_saved(&capitalize_first(gender)))
        .await?;
    ask_fragrances(bot, chat_id, 0).await?;
    transition(&ctx.pool, user_id, ConversationState::AwaitFragrances);

    Ok(())
}

async fn handle_location_select(
    bot: &Bot,
    ctx: &BotContext,
    q: &CallbackQuery,
    user_id: i64,
    chat_id: ChatId,
    location: &str,
) -> ResponseResult<()> {
    if let Err(e) = parfumbot::update_user_location(&ctx.pool, user_id, location) {
        tracing::error!("Failed to store location for {}: {}", user_id, e);
    }

    remove_keyboard(bot, q).await;

    let user = match parfumbot::find_user_by_telegram_id(&ctx.pool, user_id) {
        Ok(Some(user)) => user,
        _ => {
            bot.send_message(chat_id, texts::PROFILE_FETCH_ERROR).await?;
            return Ok(());
        }
    };

    deliver_recommendation(bot, ctx, chat_id, &user, None, true, false).await
}

/// Strips the inline keyboard from the tapped message. Editing can fail
/// on stale messages; that is logged and the flow continues.
async fn remove_keyboard(bot: &Bot, q: &CallbackQuery) {
    if let Some(message) = q.message.as_ref() {
        if let Err(e) = bot
            .edit_message_reply_markup(message.chat.id, message.id)
            .await
        {
            tracing::warn!("Failed to remove keyboard: {}", e);
        }
    }
}
