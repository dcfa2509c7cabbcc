#![deny(clippy::all)]

pub mod bones;
pub mod config;
pub mod hand_pose;
pub mod pose;
mod puppet;
pub mod scene;
pub mod source;

pub use bones::{BoneCollection, BoneId, BoneMap, HandMap, Handedness};
pub use config::{ConfigError, PuppetConfig, RigDescription, TickDriver};
pub use hand_pose::{BoneRotation, HandPose};
pub use pose::Pose;
pub use puppet::{HandPuppet, PuppetEvent, TrackingState};
pub use scene::{NodeKey, Scene, SceneGraph};
pub use source::{HandBone, SkeletonFrame, SkeletonSource};

macro_rules! warn_once {
    ($literal:literal $(,$($tt:tt)*)?) => {{
        static ONCE: std::sync::Once = std::sync::Once::new();
        ONCE.call_once(|| {
            log::warn!(concat!("[ONCE] ", $literal) $(,$($tt)*)?);
        });
    }}
}
use warn_once;

#[cfg(feature = "tracing")]
macro_rules! tracy_span {
    ($($tt:tt)*) => {
        let _span = tracy_client::span!($($tt)*);
    }
}

#[cfg(not(feature = "tracing"))]
macro_rules! tracy_span {
    ($($tt:tt)*) => {};
}
use tracy_span;

#[cfg(feature = "tracing")]
tracy_client::register_demangler!();

/// Sets up `env_logger` at info level (overridable through `RUST_LOG`). Safe to call repeatedly.
pub fn init_logging() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .is_test(cfg!(test))
            .format(|buf, record| {
                use std::io::Write;
                use time::macros::format_description;

                let style = buf.default_level_style(record.level());
                let now = time::OffsetDateTime::now_utc()
                    .format(format_description!(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
                    ))
                    .unwrap_or_default();

                write!(buf, "[{now} {style}{:5}{style:#}", record.level())?;
                if let Some(path) = record.module_path() {
                    write!(buf, " {}", path)?;
                }
                writeln!(buf, " {:?}] {}", std::thread::current().id(), record.args())
            })
            .try_init();

        log::info!("Initializing handpuppet");
    });
}
