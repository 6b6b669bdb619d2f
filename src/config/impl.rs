use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    ///
    /// 顺序：`config.toml` → `config.{APP_ENV}.toml` → `INTERNHUB_*` 环境变量 → 单独的覆盖变量
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{app_env}")).required(false))
            .add_source(
                Environment::with_prefix("INTERNHUB")
                    .separator("_")
                    .try_parsing(true),
            );

        let builder = Self::apply_env_overrides(builder)?;
        Self::from_config(builder.build()?)
    }

    fn apply_env_overrides<St: config::builder::BuilderState>(
        builder: config::builder::ConfigBuilder<St>,
    ) -> Result<config::builder::ConfigBuilder<St>, ConfigError> {
        const OVERRIDES: &[(&str, &str)] = &[
            ("app.environment", "APP_ENV"),
            ("app.log_level", "RUST_LOG"),
            ("server.host", "SERVER_HOST"),
            ("server.port", "SERVER_PORT"),
            ("server.unix_socket_path", "UNIX_SOCKET"),
            ("server.workers", "CPU_COUNT"),
            ("jwt.secret", "JWT_SECRET"),
            ("database.url", "DATABASE_URL"),
            ("cache.redis.url", "REDIS_URL"),
            ("cache.redis.key_prefix", "REDIS_KEY_PREFIX"),
            ("cache.default_ttl", "CACHE_TTL"),
            ("bootstrap.seed_file", "SEED_FILE"),
        ];

        OVERRIDES.iter().try_fold(builder, |b, (key, var)| {
            b.set_override_option(*key, std::env::var(var).ok())
        })
    }

    /// 反序列化并补全派生值
    pub(crate) fn from_config(config: Config) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.normalize();
        app_config.validate()?;
        Ok(app_config)
    }

    fn normalize(&mut self) {
        // workers 为 0 时按 CPU 数量，且不超过 max_workers
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers).max(1);
        }

        // 作业默认文件上限不能超过全局上传上限
        let hard_cap = self.upload.max_size as i64;
        if self.workflow.default_max_file_size > hard_cap {
            self.workflow.default_max_file_size = hard_cap;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.upload.max_size == 0 {
            return Err(ConfigError::Message("upload.max_size must be positive".into()));
        }
        if self.workflow.default_max_file_size < 1 {
            return Err(ConfigError::Message(
                "workflow.default_max_file_size must be positive".into(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const DEFAULTS: &str = include_str!("../../config.toml");

    fn build(extra: &str) -> Result<AppConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .add_source(File::from_str(extra, FileFormat::Toml))
            .build()?;
        AppConfig::from_config(config)
    }

    #[test]
    fn shipped_defaults_load() {
        let config = build("").unwrap();
        assert_eq!(config.app.system_name, "InternHub");
        assert_eq!(config.workflow.default_max_file_size, 1_048_576);
        assert!(config.server.workers >= 1);
        assert!(config.bootstrap.seed_file.is_empty());
    }

    #[test]
    fn default_file_size_is_capped_by_upload_limit() {
        let config = build("[upload]\nmax_size = 1000\n").unwrap();
        assert_eq!(config.workflow.default_max_file_size, 1000);
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(build("[jwt]\nsecret = \"\"\n").is_err());
    }
}
