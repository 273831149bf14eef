use std::fmt::Display;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Server settings read from the environment at startup.
///
/// | Env Var                 | Default                 |
/// |-------------------------|-------------------------|
/// | `HOST`                  | `0.0.0.0`               |
/// | `PORT`                  | `3000`                  |
/// | `CORS_ORIGINS`          | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
/// | `APP_URL`               | `http://localhost:3000` |
/// | `COOKIE_SECURE`         | `false`                 |
///
/// JWT settings come from [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS; comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Public base URL for links in verification emails, without a trailing slash.
    pub app_url: String,
    /// Whether the auth cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics when a variable is set but does not parse, or when the JWT
    /// secret is missing.
    pub fn from_env() -> Self {
        let cors_origins = env_string("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_string("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            app_url: env_string("APP_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            cookie_secure: env_parse("COOKIE_SECURE", false),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse `name` from the environment, falling back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set to something that does not parse.
pub(crate) fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_when_unset() {
        std::env::remove_var("ANTREAN_TEST_UNSET_PORT");
        assert_eq!(env_parse("ANTREAN_TEST_UNSET_PORT", 3000u16), 3000);
    }

    #[test]
    fn env_parse_reads_trimmed_value() {
        std::env::set_var("ANTREAN_TEST_COOKIE_SECURE", " true ");
        assert!(env_parse("ANTREAN_TEST_COOKIE_SECURE", false));
    }

    #[test]
    #[should_panic(expected = "ANTREAN_TEST_BAD_TIMEOUT has an invalid value")]
    fn env_parse_panics_on_garbage() {
        std::env::set_var("ANTREAN_TEST_BAD_TIMEOUT", "soon");
        let _: u64 = env_parse("ANTREAN_TEST_BAD_TIMEOUT", 30);
    }
}
