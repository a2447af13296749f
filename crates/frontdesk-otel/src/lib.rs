use once_cell::sync::OnceCell;
use tracing_appender::rolling::{self, InitError, RollingFileAppender};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Target used for one-line-per-relay access records.
pub const ACCESS_TARGET: &str = "http.access";

static ACCESS_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Rolling access-log settings, read from `FRONTDESK_ACCESS_LOG_*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessLogConfig {
    pub dir: String,
    pub prefix: String,
    pub rotation: Rotation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Minutely,
    Hourly,
    Daily,
}

impl Rotation {
    pub fn from_slug(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hourly" => Rotation::Hourly,
            "minutely" => Rotation::Minutely,
            _ => Rotation::Daily,
        }
    }
}

impl AccessLogConfig {
    /// `None` unless `FRONTDESK_ACCESS_LOG_ROLL=1`.
    pub fn from_env() -> Option<Self> {
        if std::env::var("FRONTDESK_ACCESS_LOG_ROLL").ok().as_deref() != Some("1") {
            return None;
        }
        Some(Self {
            dir: std::env::var("FRONTDESK_ACCESS_LOG_DIR").unwrap_or_else(|_| "logs".into()),
            prefix: std::env::var("FRONTDESK_ACCESS_LOG_PREFIX")
                .unwrap_or_else(|_| "http-access".into()),
            rotation: Rotation::from_slug(
                &std::env::var("FRONTDESK_ACCESS_LOG_ROTATION").unwrap_or_default(),
            ),
        })
    }
}

/// Install the global subscriber: console output filtered by `RUST_LOG`
/// (default `info`), plus an optional rolling file for access records.
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with_default("info");
}

/// Same as [`init`] with a different fallback filter when `RUST_LOG` is unset.
///
/// An access log that cannot be opened is skipped with a warning; console
/// logging still comes up.
pub fn init_with_default(directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let mut failure = None;
    let access_layer = AccessLogConfig::from_env().and_then(|access| match access_writer(&access) {
        Ok(writer) => {
            let (nb, guard) = tracing_appender::non_blocking(writer);
            let _ = ACCESS_GUARD.set(guard);
            let targets = Targets::new().with_target(ACCESS_TARGET, tracing::Level::INFO);
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(nb)
                    .with_filter(targets),
            )
        }
        Err(err) => {
            failure = Some((access.dir, err));
            None
        }
    });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .with(access_layer)
        .try_init();
    if let Some((dir, err)) = failure {
        tracing::warn!(dir = %dir, error = %err, "access log disabled; cannot open log directory");
    }
}

fn access_writer(access: &AccessLogConfig) -> Result<RollingFileAppender, InitError> {
    let rotation = match access.rotation {
        Rotation::Minutely => rolling::Rotation::MINUTELY,
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
    };
    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(access.prefix.clone())
        .build(&access.dir)
}
