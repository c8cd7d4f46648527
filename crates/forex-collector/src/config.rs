//! 환경변수 기반 설정 모듈.
//!
//! 설정은 프로세스 시작 시 한 번 로드되어 참조로 전달됩니다.
//! 작업 모듈은 환경변수를 직접 읽지 않습니다.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use forex_data::{DatabaseConfig, MaeForexClient, MaeHistoricoClient};
use secrecy::SecretString;

use crate::error::CollectorError;
use crate::Result;

/// 로컬 DB 기본 포트
pub const DEFAULT_LOCAL_PORT: u16 = 5432;
/// 원격(GCloud) DB 기본 포트
pub const DEFAULT_REMOTE_PORT: u16 = 15432;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 로컬 데이터베이스 (모든 작업의 적재 대상, 동기화 원본)
    pub local_db: DatabaseConfig,
    /// 원격 데이터베이스 (동기화 대상, 미설정 가능)
    pub remote_db: Option<DatabaseConfig>,
    /// MAE API 키 (현재 시세 작업에만 필요)
    pub api_key: Option<SecretString>,
    /// API 엔드포인트
    pub endpoints: EndpointConfig,
    /// "오늘" 계산에 사용하는 시장 시간대
    pub market_timezone: Tz,
}

/// API 엔드포인트 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// 현재 시세 API
    pub forex_url: String,
    /// 레거시 시세 API (공개 기본값 없음, 레거시 수집에만 필요)
    pub legacy_url: Option<String>,
    /// 과거 이력 API
    pub historico_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            forex_url: MaeForexClient::DEFAULT_URL.to_string(),
            legacy_url: None,
            historico_url: MaeHistoricoClient::DEFAULT_URL.to_string(),
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 주어진 조회 함수로 설정 로드
    ///
    /// 빈 문자열은 미설정으로 취급합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let connect_timeout_secs = env_var_parse(
            &get,
            "DB_CONNECT_TIMEOUT_SECS",
            DatabaseConfig::DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;

        let local_db = database_from(
            &get,
            "local",
            "POSTGRES",
            DEFAULT_LOCAL_PORT,
            connect_timeout_secs,
        )?;

        let remote_db = if get("GCLOUD_POSTGRES_HOST").is_some() {
            Some(database_from(
                &get,
                "gcloud",
                "GCLOUD_POSTGRES",
                DEFAULT_REMOTE_PORT,
                connect_timeout_secs,
            )?)
        } else {
            None
        };

        let defaults = EndpointConfig::default();
        let endpoints = EndpointConfig {
            forex_url: get("MAE_FOREX_URL").unwrap_or(defaults.forex_url),
            legacy_url: get("MAE_LEGACY_URL"),
            historico_url: get("MAE_HISTORICO_URL").unwrap_or(defaults.historico_url),
        };

        let market_timezone = match get("MARKET_TIMEZONE") {
            Some(zone) => zone.trim().parse::<Tz>().map_err(|e| {
                CollectorError::Config(format!("MARKET_TIMEZONE 값이 잘못되었습니다: {}", e))
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            local_db,
            remote_db,
            api_key: get("MAE_API_KEY").map(SecretString::from),
            endpoints,
            market_timezone,
        })
    }

    /// API 키를 반환합니다. 없으면 설정 에러.
    pub fn require_api_key(&self) -> Result<&SecretString> {
        self.api_key
            .as_ref()
            .ok_or_else(|| CollectorError::missing_var("MAE_API_KEY"))
    }

    /// 레거시 API 주소를 반환합니다. 없으면 설정 에러.
    pub fn require_legacy_url(&self) -> Result<&str> {
        self.endpoints
            .legacy_url
            .as_deref()
            .ok_or_else(|| CollectorError::missing_var("MAE_LEGACY_URL"))
    }

    /// 원격 DB 설정을 반환합니다. 없으면 설정 에러.
    pub fn require_remote(&self) -> Result<&DatabaseConfig> {
        self.remote_db
            .as_ref()
            .ok_or_else(|| CollectorError::missing_var("GCLOUD_POSTGRES_HOST"))
    }

    /// 시장 시간대 기준 오늘 날짜
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.market_timezone).date_naive()
    }
}

/// `<PREFIX>_USER`, `<PREFIX>_PASSWORD`, `<PREFIX>_HOST`, `<PREFIX>_PORT`, `<PREFIX>_DB`
fn database_from<F>(
    get: &F,
    label: &str,
    prefix: &str,
    default_port: u16,
    connect_timeout_secs: u64,
) -> Result<DatabaseConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |suffix: &str| {
        let key = format!("{}_{}", prefix, suffix);
        get(&key).ok_or_else(|| CollectorError::missing_var(&key))
    };

    Ok(DatabaseConfig {
        label: label.to_string(),
        user: required("USER")?,
        host: required("HOST")?,
        database: required("DB")?,
        port: env_var_parse(get, &format!("{}_PORT", prefix), default_port)?,
        password: SecretString::from(get(&format!("{}_PASSWORD", prefix)).unwrap_or_default()),
        connect_timeout_secs,
    })
}

/// 환경변수에서 값을 파싱 (미설정 시 기본값, 파싱 실패 시 설정 에러)
fn env_var_parse<F, T>(get: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CollectorError::Config(format!("{} 값이 잘못되었습니다: {}", key, raw))),
        None => Ok(default),
    }
}
