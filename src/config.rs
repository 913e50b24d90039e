use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub openai_api_key: String,
    pub database_url: String,
    // Loaded for parity with the deployment environment; nothing in the
    // bot reads it yet.
    pub encryption_key: Option<String>,
    pub google_sheets_token: Option<String>,
    pub google_sheets_id: Option<String>,
    pub admin_user_ids: Vec<i64>,
    pub catalog_csv_path: String,
}

#[derive(Debug)]
pub struct ConfigError {
    pub missing_vars: Vec<String>,
    pub invalid_vars: Vec<(String, String)>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.missing_vars.is_empty() {
            writeln!(f, "Missing required environment variables:")?;
            for var in &self.missing_vars {
                writeln!(f, "  - {}", var)?;
            }
        }
        if !self.invalid_vars.is_empty() {
            writeln!(f, "Invalid environment variables:")?;
            for (var, err) in &self.invalid_vars {
                writeln!(f, "  - {}: {}", var, err)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

fn get_required(name: &str, missing: &mut Vec<String>) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(name.to_string());
            None
        }
    }
}

fn get_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().map_err(|e| format!("{}: {}", part, e)))
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        let telegram_token = get_required("TELOXIDE_TOKEN", &mut missing);
        let openai_api_key = get_required("OPENAI_API_KEY", &mut missing);
        let database_url = get_required("DATABASE_URL", &mut missing);

        let admin_user_ids = get_optional("ADMIN_USER_IDS")
            .map(|raw| {
                parse_admin_ids(&raw).unwrap_or_else(|e| {
                    invalid.push(("ADMIN_USER_IDS".into(), e));
                    Vec::new()
                })
            })
            .unwrap_or_default();

        let catalog_csv_path =
            env::var("CATALOG_CSV_PATH").unwrap_or_else(|_| "edpby.csv".into());

        if !missing.is_empty() || !invalid.is_empty() {
            return Err(ConfigError {
                missing_vars: missing,
                invalid_vars: invalid,
            });
        }

        Ok(Self {
            telegram_token: telegram_token.unwrap(),
            openai_api_key: openai_api_key.unwrap(),
            database_url: database_url.unwrap(),
            encryption_key: get_optional("ENCRYPTION_KEY"),
            google_sheets_token: get_optional("GOOGLE_SHEETS_TOKEN"),
            google_sheets_id: get_optional("GOOGLE_SHEETS_ID"),
            admin_user_ids,
            catalog_csv_path,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_user_ids.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_admin_ids() {
        assert_eq!(
            parse_admin_ids("6306428168, 42").expect("valid"),
            vec![6306428168, 42]
        );
        assert_eq!(parse_admin_ids("").expect("empty"), Vec::<i64>::new());
        assert!(parse_admin_ids("abc").is_err());
    }
}
