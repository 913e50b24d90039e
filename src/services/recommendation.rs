use parfumbot::db::DbPool;
use parfumbot::models::{Product, User};

use super::openai::OpenAiClient;

pub const INSUFFICIENT_DATA_MESSAGE: &str = "Извините, но для получения рекомендации \
     нужно указать пол и предпочитаемые ароматы. Пожалуйста, обновите ваши предпочтения.";
pub const GENERATION_FAILED_MESSAGE: &str = "Извините, произошла ошибка при генерации \
     рекомендации. Пожалуйста, попробуйте позже.";
pub const PROMO_FOOTER: &str =
    "\n\nВы можете приобрести любой из парфюмов у нас на сайте: edp.by";

const SYSTEM_PROMPT: &str =
    "Вы - эксперт по парфюмерии, который дает персонализированные рекомендации.";
const MATCH_LIMIT: i64 = 5;

/// Produces the recommendation text shown to a user. Infallible by
/// contract: preconditions and external failures all collapse into
/// fixed messages.
pub struct RecommendationService {
    pool: DbPool,
    openai: OpenAiClient,
}

impl RecommendationService {
    pub fn new(pool: DbPool, openai: OpenAiClient) -> Self {
        Self { pool, openai }
    }

    pub async fn generate(&self, user: &User, extra_context: Option<&str>) -> String {
        let gender = user.gender.clone().unwrap_or_default();
        let preferences = user.fragrance_list();

        if gender.is_empty() || preferences.is_empty() {
            tracing::warn!("Insufficient profile data for user {}", user.id);
            return INSUFFICIENT_DATA_MESSAGE.to_string();
        }

        let products =
            match parfumbot::find_products_by_preferences(&self.pool, &gender, &preferences, MATCH_LIMIT)
            {
                Ok(products) => products,
                Err(e) => {
                    tracing::error!("Product lookup failed for user {}: {}", user.id, e);
                    Vec::new()
                }
            };

        let prompt = if products.is_empty() {
            build_generic_prompt(&gender, &preferences, extra_context)
        } else {
            build_product_prompt(&gender, &preferences, &products, extra_context)
        };

        match self.openai.chat_completion(SYSTEM_PROMPT, &prompt).await {
            Ok(text) => {
                tracing::info!("Recommendation generated for user {}", user.id);
                format!("{}{}", text, PROMO_FOOTER)
            }
            Err(e) => {
                tracing::error!("Recommendation generation failed for user {}: {}", user.id, e);
                GENERATION_FAILED_MESSAGE.to_string()
            }
        }
    }
}

fn profile_block(gender: &str, preferences: &[String], extra_context: Option<&str>) -> String {
    let mut block = format!(
        "Пользователь:\nПол: {}\nПредпочитаемые ароматы: {}\n",
        gender,
        preferences.join(", ")
    );

    if let Some(context) = extra_context.filter(|c| !c.trim().is_empty()) {
        block.push_str(&format!("Сообщение пользователя: {}\n", context.trim()));
    }

    block
}

fn build_product_prompt(
    gender: &str,
    preferences: &[String],
    products: &[Product],
    extra_context: Option<&str>,
) -> String {
    let product_info = products
        .iter()
        .map(|p| {
            format!(
                "- {} ({}): {}",
                p.name,
                p.category,
                p.description.as_deref().unwrap_or("Нет описания")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\nНа основе этой информации и следующих продуктов, предоставьте \
         персонализированную рекомендацию:\n\n{}\n\nОпишите, почему эти ароматы \
         подходят пользователю, учитывая его предпочтения и пол. Дайте краткое \
         описание каждого аромата и объясните, почему он может понравиться пользователю.",
        profile_block(gender, preferences, extra_context),
        product_info
    )
}

fn build_generic_prompt(gender: &str, preferences: &[String], extra_context: Option<&str>) -> String {
    format!(
        "{}\nПредоставьте общую рекомендацию по выбору парфюма, основываясь на \
         предпочтениях пользователя и его поле. Опишите, какие ароматы могут \
         подойти, и почему они могут понравиться пользователю.",
        profile_block(gender, preferences, extra_context)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::SqliteConnection;
    use diesel_migrations::MigrationHarness;
    use std::sync::Arc;

    fn service() -> RecommendationService {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("in-memory pool");
        pool.get()
            .expect("connection")
            .run_pending_migrations(parfumbot::db::MIGRATIONS)
            .expect("migrations");

        RecommendationService::new(
            Arc::new(pool),
            OpenAiClient::new("test-key".to_string()),
        )
    }

    fn user_with(gender: Option<&str>, fragrances: Option<&str>) -> User {
        User {
            id: 1,
            first_name: Some("Анна".to_string()),
            last_name: None,
            age: Some("29".to_string()),
            gender: gender.map(str::to_string),
            preferred_fragrances: fragrances.map(str::to_string),
            location: Some("Москва".to_string()),
        }
    }

    #[tokio::test]
    async fn incomplete_profile_short_circuits_without_external_call() {
        let svc = service();

        let no_gender = user_with(None, Some(r#"["Цветочные"]"#));
        assert_eq!(
            svc.generate(&no_gender, None).await,
            INSUFFICIENT_DATA_MESSAGE
        );

        let no_fragrances = user_with(Some("женский"), None);
        assert_eq!(
            svc.generate(&no_fragrances, None).await,
            INSUFFICIENT_DATA_MESSAGE
        );

        let empty_fragrances = user_with(Some("женский"), Some("[]"));
        assert_eq!(
            svc.generate(&empty_fragrances, None).await,
            INSUFFICIENT_DATA_MESSAGE
        );
    }

    #[test]
    fn product_prompt_embeds_profile_and_catalog() {
        let products = vec![Product {
            id: "p1".to_string(),
            name: "Chanel No 5".to_string(),
            url: "https://edp.by/shop/floral/p1".to_string(),
            category: "Цветочные".to_string(),
            description: None,
        }];

        let prompt = build_product_prompt(
            "женский",
            &["Цветочные".to_string(), "Древесные".to_string()],
            &products,
            None,
        );

        assert!(prompt.contains("Пол: женский"));
        assert!(prompt.contains("Цветочные, Древесные"));
        assert!(prompt.contains("- Chanel No 5 (Цветочные): Нет описания"));
    }

    #[test]
    fn prompts_embed_ad_hoc_context_when_present() {
        let prompt = build_generic_prompt(
            "мужской",
            &["Кожаные".to_string()],
            Some("хочу что-то для зимы"),
        );
        assert!(prompt.contains("Сообщение пользователя: хочу что-то для зимы"));

        let without = build_generic_prompt("мужской", &["Кожаные".to_string()], Some("   "));
        assert!(!without.contains("Сообщение пользователя"));
    }
}
