use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Double, Integer, Nullable};
use diesel::sqlite::Sqlite;
use diesel::BoxableExpression;

pub mod catalog;
pub mod db;
pub mod models;
pub mod schema;

use self::models::*;
use db::{DbError, SqlitePool};

pub fn create_user(
    pool: &SqlitePool,
    user_id: i64,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<(), DbError> {
    use self::schema::users;

    let conn = &mut pool.get()?;

    let new_user = NewUser {
        id: user_id,
        first_name,
        last_name,
    };

    diesel::insert_or_ignore_into(users::table)
        .values(&new_user)
        .execute(conn)?;

    Ok(())
}

pub fn find_user_by_telegram_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;

    Ok(users
        .filter(id.eq(user_id))
        .first::<User>(conn)
        .optional()?)
}

pub fn get_all_users(pool: &SqlitePool) -> Result<Vec<User>, DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;

    Ok(users.load::<User>(conn)?)
}

// A profile row must exist before any field update; the bot may see a
// field callback for a user whose /start never reached the database.
fn ensure_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), DbError> {
    use self::schema::users;

    let placeholder = NewUser {
        id: user_id,
        first_name: None,
        last_name: None,
    };

    diesel::insert_or_ignore_into(users::table)
        .values(&placeholder)
        .execute(conn)?;

    Ok(())
}

pub fn update_user_age(pool: &SqlitePool, user_id: i64, new_age: &str) -> Result<(), DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;
    ensure_user(conn, user_id)?;

    diesel::update(users.filter(id.eq(user_id)))
        .set(age.eq(new_age))
        .execute(conn)?;

    Ok(())
}

pub fn update_user_gender(
    pool: &SqlitePool,
    user_id: i64,
    new_gender: &str,
) -> Result<(), DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;
    ensure_user(conn, user_id)?;

    diesel::update(users.filter(id.eq(user_id)))
        .set(gender.eq(new_gender))
        .execute(conn)?;

    Ok(())
}

pub fn update_user_location(
    pool: &SqlitePool,
    user_id: i64,
    new_location: &str,
) -> Result<(), DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;
    ensure_user(conn, user_id)?;

    diesel::update(users.filter(id.eq(user_id)))
        .set(location.eq(new_location))
        .execute(conn)?;

    Ok(())
}

/// Appends a fragrance category to the user's preference list unless it
/// is already present. First-occurrence order is preserved; the list is
/// stored as a JSON array. Returns the list after the update.
pub fn add_preferred_fragrance(
    pool: &SqlitePool,
    user_id: i64,
    fragrance: &str,
) -> Result<Vec<String>, DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;
    ensure_user(conn, user_id)?;

    let current: Option<Option<String>> = users
        .filter(id.eq(user_id))
        .select(preferred_fragrances)
        .first(conn)
        .optional()?;

    let mut list: Vec<String> = current
        .flatten()
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    if !list.iter().any(|f| f == fragrance) {
        list.push(fragrance.to_string());
    }

    let encoded = serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string());

    diesel::update(users.filter(id.eq(user_id)))
        .set(preferred_fragrances.eq(encoded))
        .execute(conn)?;

    Ok(list)
}

pub fn upsert_product(pool: &SqlitePool, product: &NewProduct) -> Result<(), DbError> {
    use self::schema::products;

    let conn = &mut pool.get()?;

    diesel::replace_into(products::table)
        .values(product)
        .execute(conn)?;

    Ok(())
}

pub fn get_all_products(pool: &SqlitePool) -> Result<Vec<Product>, DbError> {
    use self::schema::products::dsl::*;

    let conn = &mut pool.get()?;

    Ok(products.load::<Product>(conn)?)
}

type ProductPredicate =
    Box<dyn BoxableExpression<schema::products::table, Sqlite, SqlType = Nullable<Bool>>>;

fn keyword_predicate(keyword: &str) -> ProductPredicate {
    use self::schema::products::dsl::*;

    let pattern = format!("%{}%", keyword);
    Box::new(
        name.like(pattern.clone())
            .nullable()
            .or(category.like(pattern.clone()).nullable())
            .or(description.like(pattern)),
    )
}

/// Selects up to `limit` catalog entries whose name, category or
/// description mentions any preferred fragrance or the gender string,
/// in random order. Falls back to a uniform random sample of the whole
/// catalog when nothing matches, so the result is empty only for an
/// empty catalog.
pub fn find_products_by_preferences(
    pool: &SqlitePool,
    gender: &str,
    fragrances: &[String],
    limit: i64,
) -> Result<Vec<Product>, DbError> {
    use self::schema::products::dsl::*;

    let conn = &mut pool.get()?;

    if !fragrances.is_empty() {
        let mut predicate = keyword_predicate(&fragrances[0]);
        for fragrance in &fragrances[1..] {
            predicate = Box::new(predicate.or(keyword_predicate(fragrance)));
        }
        predicate = Box::new(predicate.or(keyword_predicate(gender)));

        let matched = products
            .filter(predicate)
            .order(sql::<Integer>("RANDOM()"))
            .limit(limit)
            .load::<Product>(conn)?;

        if !matched.is_empty() {
            return Ok(matched);
        }
    }

    Ok(products
        .order(sql::<Integer>("RANDOM()"))
        .limit(limit)
        .load::<Product>(conn)?)
}

pub fn save_feedback(pool: &SqlitePool, user_id: i64, score: i32) -> Result<(), DbError> {
    use self::schema::feedback;

    let conn = &mut pool.get()?;

    let new_feedback = NewFeedback { user_id, score };

    diesel::insert_into(feedback::table)
        .values(&new_feedback)
        .execute(conn)?;

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackStats {
    pub average_score: Option<f64>,
    pub total_feedback: i64,
}

pub fn get_feedback_stats(pool: &SqlitePool) -> Result<FeedbackStats, DbError> {
    use self::schema::feedback::dsl::*;

    let conn = &mut pool.get()?;

    let (average_score, total_feedback) = feedback
        .select((
            sql::<Nullable<Double>>("AVG(score)"),
            sql::<BigInt>("COUNT(*)"),
        ))
        .get_result::<(Option<f64>, i64)>(conn)?;

    Ok(FeedbackStats {
        average_score,
        total_feedback,
    })
}

pub fn add_support_request(
    pool: &SqlitePool,
    user_id: i64,
    message: &str,
    photo_id: Option<&str>,
) -> Result<(), DbError> {
    use self::schema::support_requests;

    let conn = &mut pool.get()?;

    let new_request = NewSupportRequest {
        user_id,
        message,
        photo_id,
    };

    diesel::insert_into(support_requests::table)
        .values(&new_request)
        .execute(conn)?;

    Ok(())
}

pub const SUPPORT_REQUEST_WINDOW: i64 = 10;

pub fn get_recent_support_requests(pool: &SqlitePool) -> Result<Vec<SupportRequest>, DbError> {
    use self::schema::support_requests::dsl::*;

    let conn = &mut pool.get()?;

    Ok(support_requests
        .order((timestamp.desc(), id.desc()))
        .limit(SUPPORT_REQUEST_WINDOW)
        .load::<SupportRequest>(conn)?)
}

pub fn add_recommendation(pool: &SqlitePool, user_id: i64, text: &str) -> Result<(), DbError> {
    use self::schema::recommendations;

    let conn = &mut pool.get()?;

    let new_recommendation = NewRecommendation {
        user_id,
        recommendation: text,
    };

    diesel::insert_into(recommendations::table)
        .values(&new_recommendation)
        .execute(conn)?;

    Ok(())
}

pub fn get_user_count(pool: &SqlitePool) -> Result<i64, DbError> {
    use self::schema::users::dsl::*;

    let conn = &mut pool.get()?;

    Ok(users.count().get_result(conn)?)
}

pub fn get_support_request_count(pool: &SqlitePool) -> Result<i64, DbError> {
    use self::schema::support_requests::dsl::*;

    let conn = &mut pool.get()?;

    Ok(support_requests.count().get_result(conn)?)
}

pub fn get_recommendation_count(pool: &SqlitePool) -> Result<i64, DbError> {
    use self::schema::recommendations::dsl::*;

    let conn = &mut pool.get()?;

    Ok(recommendations.count().get_result(conn)?)
}

pub fn get_conversation_state(
    pool: &SqlitePool,
    telegram_user_id: i64,
) -> Result<Option<String>, DbError> {
    use self::schema::conversation_states::dsl::*;

    let conn = &mut pool.get()?;

    Ok(conversation_states
        .filter(user_id.eq(telegram_user_id))
        .select(state)
        .first::<String>(conn)
        .optional()?)
}

pub fn set_conversation_state(
    pool: &SqlitePool,
    telegram_user_id: i64,
    new_state: &str,
) -> Result<(), DbError> {
    use self::schema::conversation_states::dsl::*;

    let conn = &mut pool.get()?;

    let existing: Option<ConversationStateRow> = conversation_states
        .filter(user_id.eq(telegram_user_id))
        .first::<ConversationStateRow>(conn)
        .optional()?;

    if existing.is_some() {
        diesel::update(conversation_states.filter(user_id.eq(telegram_user_id)))
            .set((state.eq(new_state), updated_at.eq(diesel::dsl::now)))
            .execute(conn)?;
    } else {
        let new_row = NewConversationState {
            user_id: telegram_user_id,
            state: new_state,
        };

        diesel::insert_into(conversation_states)
            .values(&new_row)
            .execute(conn)?;
    }

    Ok(())
}

pub fn clear_conversation_state(pool: &SqlitePool, telegram_user_id: i64) -> Result<bool, DbError> {
    use self::schema::conversation_states::dsl::*;

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(conversation_states.filter(user_id.eq(telegram_user_id)))
        .execute(conn)?;

    Ok(deleted > 0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::test_pool;

    fn seed_product(pool: &SqlitePool, id: &str, name: &str, category: &str, description: Option<&str>) {
        upsert_product(
            pool,
            &NewProduct {
                id,
                name,
                url: &format!("https://edp.by/shop/{}/{}", category, id),
                category,
                description,
            },
        )
        .expect("insert product");
    }

    #[test]
    fn field_update_auto_creates_user() {
        let pool = test_pool();

        update_user_age(&pool, 42, "29").expect("update age");

        let user = find_user_by_telegram_id(&pool, 42)
            .expect("query")
            .expect("user exists");
        assert_eq!(user.age.as_deref(), Some("29"));
        assert!(user.first_name.is_none());
        assert!(user.gender.is_none());
    }

    #[test]
    fn preference_list_dedupes_and_keeps_first_occurrence_order() {
        let pool = test_pool();

        add_preferred_fragrance(&pool, 1, "Цветочные").expect("add");
        add_preferred_fragrance(&pool, 1, "Древесные").expect("add");
        add_preferred_fragrance(&pool, 1, "Цветочные").expect("repeat tap");
        let list = add_preferred_fragrance(&pool, 1, "Цитрусовые").expect("add");

        assert_eq!(list, vec!["Цветочные", "Древесные", "Цитрусовые"]);

        // Round-trip through the stored JSON column.
        let user = find_user_by_telegram_id(&pool, 1)
            .expect("query")
            .expect("user");
        assert_eq!(user.fragrance_list(), vec!["Цветочные", "Древесные", "Цитрусовые"]);
    }

    #[test]
    fn gender_and_location_are_overwritten() {
        let pool = test_pool();

        update_user_gender(&pool, 7, "мужской").expect("set");
        update_user_gender(&pool, 7, "женский").expect("overwrite");
        update_user_location(&pool, 7, "Москва").expect("set");
        update_user_location(&pool, 7, "Казань").expect("overwrite");

        let user = find_user_by_telegram_id(&pool, 7)
            .expect("query")
            .expect("user");
        assert_eq!(user.gender.as_deref(), Some("женский"));
        assert_eq!(user.location.as_deref(), Some("Казань"));
    }

    #[test]
    fn matcher_returns_empty_for_empty_catalog() {
        let pool = test_pool();

        let found =
            find_products_by_preferences(&pool, "женский", &["Цветочные".to_string()], 5)
                .expect("query");
        assert!(found.is_empty());
    }

    #[test]
    fn matcher_never_exceeds_limit() {
        let pool = test_pool();
        for i in 0..10 {
            seed_product(&pool, &format!("p{}", i), "Аромат Цветочные", "floral", None);
        }

        let found =
            find_products_by_preferences(&pool, "женский", &["Цветочные".to_string()], 5)
                .expect("query");
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn matcher_falls_back_to_random_sample_of_min_size() {
        let pool = test_pool();
        seed_product(&pool, "p1", "Dior Sauvage", "woody", None);
        seed_product(&pool, "p2", "Chanel No 5", "floral", None);
        seed_product(&pool, "p3", "Bleu de Chanel", "woody", None);

        let found = find_products_by_preferences(
            &pool,
            "nomatch",
            &["Гурманские".to_string()],
            5,
        )
        .expect("query");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn matcher_matches_keyword_in_category_and_description() {
        let pool = test_pool();
        seed_product(&pool, "p1", "parfum one", "Цветочные", None);
        seed_product(&pool, "p2", "parfum two", "other", Some("Древесные ноты"));
        seed_product(&pool, "p3", "parfum three", "other", None);

        let found = find_products_by_preferences(
            &pool,
            "nomatch",
            &["Цветочные".to_string(), "Древесные".to_string()],
            5,
        )
        .expect("query");

        let mut ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn matcher_with_no_keywords_samples_the_catalog() {
        let pool = test_pool();
        seed_product(&pool, "p1", "parfum one", "floral", None);
        seed_product(&pool, "p2", "parfum two", "woody", None);

        let found = find_products_by_preferences(&pool, "женский", &[], 1).expect("query");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn reimport_overwrites_product_by_id() {
        let pool = test_pool();
        seed_product(&pool, "p1", "old name", "floral", None);
        seed_product(&pool, "p1", "new name", "woody", None);

        let all = get_all_products(&pool).expect("query");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "new name");
        assert_eq!(all[0].category, "woody");
    }

    #[test]
    fn feedback_stats_aggregate_scores() {
        let pool = test_pool();

        let empty = get_feedback_stats(&pool).expect("stats");
        assert_eq!(empty.total_feedback, 0);
        assert!(empty.average_score.is_none());

        save_feedback(&pool, 1, 5).expect("save");
        save_feedback(&pool, 2, 3).expect("save");

        let stats = get_feedback_stats(&pool).expect("stats");
        assert_eq!(stats.total_feedback, 2);
        assert_eq!(stats.average_score, Some(4.0));
    }

    #[test]
    fn counts_match_literal_row_counts() {
        let pool = test_pool();

        create_user(&pool, 1, Some("Анна"), None).expect("user");
        create_user(&pool, 2, Some("Борис"), None).expect("user");
        add_support_request(&pool, 1, "помогите", None).expect("support");
        add_recommendation(&pool, 1, "рекомендация").expect("rec");
        add_recommendation(&pool, 2, "рекомендация").expect("rec");
        add_recommendation(&pool, 2, "ещё одна").expect("rec");

        assert_eq!(get_user_count(&pool).expect("count"), 2);
        assert_eq!(get_support_request_count(&pool).expect("count"), 1);
        assert_eq!(get_recommendation_count(&pool).expect("count"), 3);
    }

    #[test]
    fn support_request_window_is_bounded_and_newest_first() {
        let pool = test_pool();
        for i in 0..12 {
            add_support_request(&pool, i, &format!("запрос {}", i), None).expect("insert");
        }

        let recent = get_recent_support_requests(&pool).expect("query");
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].message, "запрос 11");
        assert_eq!(recent[9].message, "запрос 2");
    }

    #[test]
    fn conversation_state_set_get_clear() {
        let pool = test_pool();

        assert!(get_conversation_state(&pool, 5).expect("get").is_none());

        set_conversation_state(&pool, 5, "await_age").expect("set");
        assert_eq!(
            get_conversation_state(&pool, 5).expect("get").as_deref(),
            Some("await_age")
        );

        set_conversation_state(&pool, 5, "await_gender").expect("overwrite");
        assert_eq!(
            get_conversation_state(&pool, 5).expect("get").as_deref(),
            Some("await_gender")
        );

        assert!(clear_conversation_state(&pool, 5).expect("clear"));
        assert!(get_conversation_state(&pool, 5).expect("get").is_none());
        assert!(!clear_conversation_state(&pool, 5).expect("already cleared"));
    }
}
