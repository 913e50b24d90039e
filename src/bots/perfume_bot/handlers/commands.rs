use std::sync::Arc;

use teloxide::macros::BotCommands;
use teloxide::prelude::*;

use crate::services::broadcast::broadcast_to_users;

use super::super::keyboards::{build_admin_keyboard, build_menu_keyboard};
use super::super::texts;
use super::super::BotContext;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
pub enum Command {
    #[command(description = "Начать работу с ботом")]
    Start,
    #[command(description = "Открыть админ-панель")]
    Admin,
    #[command(description = "Написать в поддержку")]
    Support(String),
    #[command(description = "Рассылка всем пользователям (только для администраторов)")]
    Broadcast(String),
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    command: Command,
    ctx: Arc<BotContext>,
) -> ResponseResult<()> {
    let user = match msg.from() {
        Some(u) => u,
        None => return Ok(()),
    };

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    match command {
        Command::Start => handle_start(&bot, user, &ctx, user_id, chat_id).await?,
        Command::Admin => handle_admin(&bot, &ctx, user_id, chat_id).await?,
        Command::Support(text) => handle_support(&bot, &ctx, user_id, chat_id, &text).await?,
        Command::Broadcast(text) => handle_broadcast(&bot, &ctx, user_id, chat_id, &text).await?,
    }

    Ok(())
}

async fn handle_start(
    bot: &Bot,
    from: &teloxide::types::User,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
) -> ResponseResult<()> {
    let first_name = from.first_name.clone();

    match parfumbot::find_user_by_telegram_id(&ctx.pool, user_id) {
        Ok(Some(_)) => tracing::info!("Existing user: {}", user_id),
        Ok(None) => {
            if let Err(e) = parfumbot::create_user(
                &ctx.pool,
                user_id,
                Some(&first_name),
                from.last_name.as_deref(),
            ) {
                tracing::error!("Failed to create user {}: {}", user_id, e);
            } else {
                tracing::info!("New user added: {}", user_id);
            }
        }
        Err(e) => tracing::error!("Failed to look up user {}: {}", user_id, e),
    }

    if let Err(e) = parfumbot::clear_conversation_state(&ctx.pool, user_id) {
        tracing::error!("Failed to reset state for {}: {}", user_id, e);
    }

    bot.send_message(chat_id, texts::greeting(&first_name))
        .reply_markup(build_menu_keyboard(ctx.is_admin(user_id)))
        .await?;

    Ok(())
}

async fn handle_admin(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
) -> ResponseResult<()> {
    if !ctx.is_admin(user_id) {
        bot.send_message(chat_id, texts::NO_ADMIN_ACCESS).await?;
        return Ok(());
    }

    bot.send_message(chat_id, texts::ADMIN_CHOOSE_ACTION)
        .reply_markup(build_admin_keyboard())
        .await?;

    Ok(())
}

async fn handle_support(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    let text = text.trim();
    if text.is_empty() {
        bot.send_message(chat_id, texts::SUPPORT_USAGE).await?;
        return Ok(());
    }

    match parfumbot::add_support_request(&ctx.pool, user_id, text, None) {
        Ok(()) => {
            bot.send_message(chat_id, texts::SUPPORT_SAVED).await?;
        }
        Err(e) => {
            tracing::error!("Failed to store support request from {}: {}", user_id, e);
            bot.send_message(chat_id, texts::PROFILE_FETCH_ERROR).await?;
        }
    }

    Ok(())
}

async fn handle_broadcast(
    bot: &Bot,
    ctx: &BotContext,
    user_id: i64,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    if !ctx.is_admin(user_id) {
        bot.send_message(chat_id, texts::NO_ADMIN_ACCESS).await?;
        return Ok(());
    }

    let text = text.trim();
    if text.is_empty() {
        bot.send_message(chat_id, texts::BROADCAST_USAGE).await?;
        return Ok(());
    }

    let users = match parfumbot::get_all_users(&ctx.pool) {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Failed to load broadcast targets: {}", e);
            bot.send_message(chat_id, texts::PROFILE_FETCH_ERROR).await?;
            return Ok(());
        }
    };

    let targets: Vec<i64> = users.iter().map(|u| u.id).collect();
    let message = text.to_string();

    let outcome = broadcast_to_users(&targets, |target_id| {
        let bot = bot.clone();
        let message = message.clone();
        async move {
            bot.send_message(ChatId(target_id), message)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
    })
    .await;

    tracing::info!(
        "Broadcast by admin {}: {} of {} delivered",
        user_id,
        outcome.success_count,
        outcome.total()
    );
    bot.send_message(chat_id, outcome.summary()).await?;

    Ok(())
}
