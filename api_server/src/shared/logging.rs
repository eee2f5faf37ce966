use std::io;
use tracing_subscriber::{fmt, EnvFilter};

use crate::shared::config::LogFormat;

const DEFAULT_FILTER: &str = "info,tower_http=info,sqlx=warn";

/// 로깅 초기화
/// Initialize the global tracing subscriber.
///
/// - `RUST_LOG`이 설정되어 있으면 우선 적용
/// - Falls back to `info,tower_http=info,sqlx=warn`
/// - Safe to call more than once (later calls are no-ops)
pub fn init_logging(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);

    let _ = match format {
        LogFormat::Pretty => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
