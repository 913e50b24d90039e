use crate::schema::{conversation_states, feedback, products, recommendations, support_requests, users};
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub preferred_fragrances: Option<String>,
    pub location: Option<String>,
}

impl User {
    /// Preference list as stored: a JSON array of category labels.
    /// An absent or unreadable column reads as an empty list.
    pub fn fragrance_list(&self) -> Vec<String> {
        self.preferred_fragrances
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    /// A recommendation can only be generated once gender and at least
    /// one preferred fragrance are known.
    pub fn has_complete_profile(&self) -> bool {
        let has_gender = self.gender.as_deref().is_some_and(|g| !g.is_empty());
        has_gender && !self.fragrance_list().is_empty()
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewUser<'a> {
    pub id: i64,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub url: String,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewProduct<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub category: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Debug, Queryable, Identifiable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feedback {
    pub id: i32,
    pub user_id: i64,
    pub score: i32,
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewFeedback {
    pub user_id: i64,
    pub score: i32,
}

#[derive(Debug, Queryable, Identifiable)]
#[diesel(table_name = support_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SupportRequest {
    pub id: i32,
    pub user_id: i64,
    pub message: String,
    pub photo_id: Option<String>,
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = support_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewSupportRequest<'a> {
    pub user_id: i64,
    pub message: &'a str,
    pub photo_id: Option<&'a str>,
}

#[derive(Debug, Queryable, Identifiable)]
#[diesel(table_name = recommendations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recommendation {
    pub id: i32,
    pub user_id: i64,
    pub recommendation: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = recommendations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewRecommendation<'a> {
    pub user_id: i64,
    pub recommendation: &'a str,
}

#[derive(Debug, Queryable, Identifiable)]
#[diesel(table_name = conversation_states)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConversationStateRow {
    pub user_id: i64,
    pub state: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = conversation_states)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewConversationState<'a> {
    pub user_id: i64,
    pub state: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_user() -> User {
        User {
            id: 1,
            first_name: None,
            last_name: None,
            age: None,
            gender: None,
            preferred_fragrances: None,
            location: None,
        }
    }

    #[test]
    fn fragrance_list_reads_json_column() {
        let mut user = bare_user();
        assert!(user.fragrance_list().is_empty());

        user.preferred_fragrances = Some(r#"["Цветочные","Древесные"]"#.to_string());
        assert_eq!(user.fragrance_list(), vec!["Цветочные", "Древесные"]);

        user.preferred_fragrances = Some("not json".to_string());
        assert!(user.fragrance_list().is_empty());
    }

    #[test]
    fn profile_complete_requires_gender_and_fragrances() {
        let mut user = bare_user();
        assert!(!user.has_complete_profile());

        user.gender = Some("женский".to_string());
        assert!(!user.has_complete_profile());

        user.preferred_fragrances = Some(r#"["Цветочные"]"#.to_string());
        assert!(user.has_complete_profile());

        user.gender = Some(String::new());
        assert!(!user.has_complete_profile());
    }
}
