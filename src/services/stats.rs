use parfumbot::db::{DbError, SqlitePool};
use parfumbot::models::SupportRequest;

pub fn get_bot_statistics(pool: &SqlitePool) -> Result<String, DbError> {
    let total_users = parfumbot::get_user_count(pool)?;
    let total_support_requests = parfumbot::get_support_request_count(pool)?;
    let total_recommendations = parfumbot::get_recommendation_count(pool)?;

    Ok(format_statistics(
        total_users,
        total_support_requests,
        total_recommendations,
    ))
}

pub fn get_support_requests_list(pool: &SqlitePool) -> Result<String, DbError> {
    let requests = parfumbot::get_recent_support_requests(pool)?;
    Ok(format_support_requests(&requests))
}

fn format_statistics(users: i64, support_requests: i64, recommendations: i64) -> String {
    format!(
        "Статистика бота:\n\nВсего пользователей: {}\nВсего обращений в поддержку: {}\n\
         Всего выданных рекомендаций: {}",
        users, support_requests, recommendations
    )
}

fn format_support_requests(requests: &[SupportRequest]) -> String {
    let mut message = String::from("Последние обращения в поддержку:\n\n");

    for request in requests {
        message.push_str(&format!("От: {}\n", request.user_id));
        message.push_str(&format!("Сообщение: {}\n", request.message));
        if request.photo_id.is_some() {
            message.push_str("Прикреплено фото\n");
        }
        message.push_str(&format!("Дата: {}\n\n", request.timestamp));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn statistics_text_carries_the_raw_counts() {
        let text = format_statistics(12, 3, 40);
        assert!(text.contains("Всего пользователей: 12"));
        assert!(text.contains("Всего обращений в поддержку: 3"));
        assert!(text.contains("Всего выданных рекомендаций: 40"));
    }

    #[test]
    fn support_list_marks_photo_attachments() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let requests = vec![
            SupportRequest {
                id: 2,
                user_id: 10,
                message: "не приходит код".to_string(),
                photo_id: Some("photo123".to_string()),
                timestamp,
            },
            SupportRequest {
                id: 1,
                user_id: 11,
                message: "вопрос по доставке".to_string(),
                photo_id: None,
                timestamp,
            },
        ];

        let text = format_support_requests(&requests);
        assert!(text.contains("От: 10"));
        assert!(text.contains("Сообщение: не приходит код"));
        assert_eq!(text.matches("Прикреплено фото").count(), 1);
        assert!(text.contains("От: 11"));
    }
}
