//! User-facing strings. The bot ships in Russian, matching the store
//! it recommends for.

pub const FRAGRANCE_PAGES: [[&str; 5]; 3] = [
    ["Цветочные", "Древесные", "Цитрусовые", "Восточные", "Фужерные"],
    ["Шипровые", "Кожаные", "Гурманские", "Акватические", "Зеленые"],
    ["Пряные", "Фруктовые", "Альдегидные", "Мускусные", "Табачные"],
];

/// (button label, stored value) pairs.
pub const GENDERS: [(&str, &str); 3] = [
    ("Мужской", "мужской"),
    ("Женский", "женский"),
    ("Другой", "другой"),
];

pub const LOCATIONS: [&str; 5] = [
    "Москва",
    "Санкт-Петербург",
    "Новосибирск",
    "Екатеринбург",
    "Казань",
];

pub const BTN_GET_RECOMMENDATION: &str = "Получить рекомендацию";
pub const BTN_UPDATE_PREFERENCES: &str = "Обновить предпочтения";
pub const BTN_ADMIN_PANEL: &str = "Админ-панель";
pub const BTN_NEXT_PAGE: &str = "Следующая страница";
pub const BTN_FINISH_FRAGRANCES: &str = "Завершить выбор";
pub const BTN_OTHER_CITY: &str = "Другой город";
pub const BTN_ADMIN_STATS: &str = "Статистика";
pub const BTN_ADMIN_SUPPORT: &str = "Обращения в поддержку";

pub const ASK_AGE: &str = "Пожалуйста, введите ваш возраст:";
pub const AGE_NOT_NUMERIC: &str = "Пожалуйста, введите числовое значение для возраста.";
pub const ASK_GENDER: &str = "Выберите ваш пол:";
pub const ASK_FRAGRANCES: &str =
    "Выберите предпочитаемые ароматы (можно выбрать несколько):";
pub const FRAGRANCES_DONE: &str = "Спасибо за ваши предпочтения!";
pub const ASK_LOCATION: &str = "Выберите ваше местоположение:";
pub const ASK_CUSTOM_LOCATION: &str = "Пожалуйста, введите название вашего города:";
pub const GENERATING: &str =
    "Генерирую рекомендацию, это может занять несколько секунд...";
pub const ASK_FEEDBACK: &str = "Оцените мои рекомендации (от 1 до 5):";
pub const FEEDBACK_THANKS: &str = "Спасибо за ваш отзыв!";
pub const FEEDBACK_FOLLOWUP: &str =
    "Мы продолжим работу над улучшением рекомендаций для вас!";
pub const INCOMPLETE_PROFILE: &str = "Для получения рекомендации нужно указать пол и \
     предпочитаемые ароматы. Пожалуйста, обновите ваши предпочтения.";
pub const PROFILE_FETCH_ERROR: &str = "Произошла ошибка при получении данных \
     пользователя. Пожалуйста, попробуйте обновить предпочтения.";
pub const NO_ADMIN_ACCESS: &str = "У вас нет доступа к админ-панели.";
pub const ADMIN_CHOOSE_ACTION: &str = "Выберите действие:";
pub const SUPPORT_SAVED: &str = "Ваше обращение передано в поддержку. Спасибо!";
pub const SUPPORT_USAGE: &str = "Использование: /support <текст обращения>";
pub const BROADCAST_USAGE: &str = "Использование: /broadcast <текст рассылки>";

pub fn greeting(first_name: &str) -> String {
    format!(
        "Привет, {}! Я ваш персональный консультант по парфюмерии. \
         Что бы вы хотели сделать?\nРекомендую для начала обновить предпочтения!",
        first_name
    )
}

pub fn age_saved(age: &str) -> String {
    format!(
        "Ваш возраст ({}) сохранен. Пожалуйста, продолжите выбор предпочтений.",
        age
    )
}

pub fn gender_saved(gender_label: &str) -> String {
    format!("Вы выбрали: {}.\nСпасибо за ваш выбор!", gender_label)
}

pub fn fragrance_selected(fragrance: &str) -> String {
    format!(
        "Вы выбрали: {}. Можете выбрать ещё или завершить выбор.",
        fragrance
    )
}

pub fn survey_finished(recommendation: &str) -> String {
    format!(
        "Спасибо за ответы! Вот моя рекомендация для вас:\n\n{}",
        recommendation
    )
}

pub fn star_button(score: u8) -> String {
    format!("{} звезд", score)
}
