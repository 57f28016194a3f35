use std::env;
use std::time::Duration;

/// 首页标签页的默认类目名称（与线上运营数据一致）
const DEFAULT_INDEX_TABS: [&str; 2] = ["酒水饮料", "粮油副食"];

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub jwt_secret: String,
    pub throttle_window_secs: u64,
    pub throttle_anon_requests: u32,
    pub throttle_user_requests: u32,
    pub index_tab_names: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI")?,
            jwt_secret: env::var("JWT_SECRET")?,
            throttle_window_secs: env::var("THROTTLE_WINDOW")?.parse().unwrap_or(60),
            throttle_anon_requests: env::var("THROTTLE_ANON_REQUESTS")?.parse().unwrap_or(100),
            throttle_user_requests: env::var("THROTTLE_USER_REQUESTS")?.parse().unwrap_or(1000),
            index_tab_names: parse_index_tabs(env::var("INDEX_TAB_NAMES").ok()),
        })
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_secs(self.throttle_window_secs)
    }
}

/// 解析首页标签类目配置，逗号分隔；缺省时退回默认运营类目
fn parse_index_tabs(raw: Option<String>) -> Vec<String> {
    let names: Vec<String> = raw
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        DEFAULT_INDEX_TABS.iter().map(|s| s.to_string()).collect()
    } else {
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_tabs_fall_back_to_defaults() {
        assert_eq!(parse_index_tabs(None), vec!["酒水饮料", "粮油副食"]);
        assert_eq!(
            parse_index_tabs(Some("  ,, ".to_string())),
            vec!["酒水饮料", "粮油副食"]
        );
    }

    #[test]
    fn index_tabs_split_and_trim() {
        assert_eq!(
            parse_index_tabs(Some("生鲜食品, 进口食品".to_string())),
            vec!["生鲜食品", "进口食品"]
        );
    }

    #[test]
    fn throttle_window_converts_seconds() {
        let config = Config {
            database_url: String::new(),
            redis_url: String::new(),
            server_host: String::new(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
            jwt_secret: String::new(),
            throttle_window_secs: 90,
            throttle_anon_requests: 100,
            throttle_user_requests: 1000,
            index_tab_names: vec![],
        };
        assert_eq!(config.throttle_window(), Duration::from_secs(90));
    }
}
