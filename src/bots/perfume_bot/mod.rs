use std::sync::Arc;

use parfumbot::db::DbPool;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

mod actions;
mod handlers;
mod keyboards;
mod state;
mod texts;

use crate::services::recommendation::RecommendationService;
use handlers::{callback_handler, command_handler, message_handler, Command};

pub struct BotContext {
    pub pool: DbPool,
    pub admin_user_ids: Vec<i64>,
    pub recommender: Arc<RecommendationService>,
}

impl BotContext {
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_user_ids.contains(&user_id)
    }
}

pub async fn run_bot(ctx: Arc<BotContext>, token: String) {
    tracing::info!("Starting perfume bot...");

    let bot = Bot::new(token);

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint({
                    let ctx = ctx.clone();
                    move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx.clone();
                        async move { command_handler(bot, msg, cmd, ctx).await }
                    }
                }),
        )
        .branch(Update::filter_message().endpoint({
            let ctx = ctx.clone();
            move |bot: Bot, msg: Message| {
                let ctx = ctx.clone();
                async move { message_handler(bot, msg, ctx).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let ctx = ctx.clone();
            move |bot: Bot, q: CallbackQuery| {
                let ctx = ctx.clone();
                async move { callback_handler(bot, q, ctx).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
