use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::actions::CallbackAction;
use super::texts::{
    star_button, BTN_ADMIN_PANEL, BTN_ADMIN_STATS, BTN_ADMIN_SUPPORT, BTN_FINISH_FRAGRANCES,
    BTN_GET_RECOMMENDATION, BTN_NEXT_PAGE, BTN_OTHER_CITY, BTN_UPDATE_PREFERENCES,
    FRAGRANCE_PAGES, GENDERS, LOCATIONS,
};

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), action.encode())
}

pub fn build_menu_keyboard(is_admin: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![button(BTN_GET_RECOMMENDATION, CallbackAction::GetRecommendation)],
        vec![button(BTN_UPDATE_PREFERENCES, CallbackAction::UpdatePreferences)],
    ];

    if is_admin {
        rows.push(vec![button(BTN_ADMIN_PANEL, CallbackAction::AdminPanel)]);
    }

    InlineKeyboardMarkup::new(rows)
}

pub fn build_gender_keyboard() -> InlineKeyboardMarkup {
    let rows = GENDERS
        .iter()
        .map(|(label, value)| {
            vec![button(*label, CallbackAction::SelectGender(value.to_string()))]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

/// One fragrance page: five categories, a "next page" control while
/// further pages exist, and the finish control. An out-of-range page
/// index falls back to the first page.
pub fn build_fragrance_keyboard(page: usize) -> InlineKeyboardMarkup {
    let page = if page < FRAGRANCE_PAGES.len() { page } else { 0 };

    let mut rows = FRAGRANCE_PAGES[page]
        .iter()
        .map(|fragrance| {
            vec![button(
                *fragrance,
                CallbackAction::ToggleFragrance(fragrance.to_string()),
            )]
        })
        .collect::<Vec<_>>();

    if page + 1 < FRAGRANCE_PAGES.len() {
        rows.push(vec![button(
            BTN_NEXT_PAGE,
            CallbackAction::NextFragrancePage(page + 1),
        )]);
    }

    rows.push(vec![button(
        BTN_FINISH_FRAGRANCES,
        CallbackAction::FinishFragrances,
    )]);

    InlineKeyboardMarkup::new(rows)
}

pub fn build_location_keyboard() -> InlineKeyboardMarkup {
    let mut rows = LOCATIONS
        .iter()
        .map(|city| {
            vec![button(*city, CallbackAction::SelectLocation(city.to_string()))]
        })
        .collect::<Vec<_>>();

    rows.push(vec![button(
        BTN_OTHER_CITY,
        CallbackAction::SelectLocationOther,
    )]);

    InlineKeyboardMarkup::new(rows)
}

pub fn build_feedback_keyboard() -> InlineKeyboardMarkup {
    let rows = (1..=5)
        .map(|score| vec![button(star_button(score), CallbackAction::SubmitFeedback(score))])
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

pub fn build_admin_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button(BTN_ADMIN_STATS, CallbackAction::AdminStats),
        button(BTN_ADMIN_SUPPORT, CallbackAction::AdminSupport),
    ]])
}
