use std::sync::Arc;
use std::time::Duration;

use parfumbot::db::DbPool;
use teloxide::prelude::*;

use super::broadcast::BroadcastOutcome;
use super::recommendation::RecommendationService;
use super::sheets::SheetsClient;

// Fixed daily interval, no jitter and no catch-up after a restart.
const TICK_INTERVAL: Duration = Duration::from_secs(86_400);

pub async fn run_daily_scheduler(
    pool: DbPool,
    recommender: Arc<RecommendationService>,
    token: String,
    sheets: Option<SheetsClient>,
) {
    tracing::info!("Starting daily scheduler...");

    let bot = Bot::new(token);

    loop {
        tokio::time::sleep(TICK_INTERVAL).await;

        send_recommendations(&pool, &bot, &recommender).await;
        update_analytics(&pool, sheets.as_ref()).await;
    }
}

/// Best-effort push to every known user; a failed delivery is logged
/// and skipped. Users who updated their profile mid-run may get a
/// recommendation based on the data as it was when their turn came.
async fn send_recommendations(pool: &DbPool, bot: &Bot, recommender: &RecommendationService) {
    let users = match parfumbot::get_all_users(pool) {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Failed to load users for scheduled push: {}", e);
            return;
        }
    };

    let mut outcome = BroadcastOutcome::default();

    for user in users {
        let recommendation = recommender.generate(&user, None).await;
        let message = format!("Новая рекомендация для вас:\n\n{}", recommendation);

        match bot.send_message(ChatId(user.id), message).await {
            Ok(_) => outcome.record_success(),
            Err(e) => {
                tracing::error!("Failed to send recommendation to user {}: {}", user.id, e);
                outcome.record_failure(user.id, e.to_string());
            }
        }
    }

    tracing::info!(
        "Scheduled recommendations: {} of {} delivered",
        outcome.success_count,
        outcome.total()
    );
}

async fn update_analytics(pool: &DbPool, sheets: Option<&SheetsClient>) {
    let Some(sheets) = sheets else {
        tracing::debug!("Google Sheets not configured, skipping analytics export");
        return;
    };

    let stats = match parfumbot::get_feedback_stats(pool) {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Failed to compute feedback stats: {}", e);
            return;
        }
    };

    if let Err(e) = sheets.update_feedback_metrics(&stats).await {
        tracing::error!("Failed to push feedback metrics to sheets: {}", e);
    }
}
