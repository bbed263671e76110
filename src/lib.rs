pub mod capture;
pub mod config;
pub mod convert;
pub mod export;
pub mod relay;
pub mod tcx;
pub mod util;
pub mod visibility;
pub mod web;
pub mod workout;

pub use capture::{CapturingClient, ExchangeProxy, ResponseHook, WorkoutInterceptor};
pub use config::Config;
pub use convert::{convert_file, ConvertError, ConvertReport};
pub use export::{DirectorySink, DownloadSink, ExportError, ExportTrigger, TcxArtifact};
pub use relay::{CapturedPayload, RelayChannel, RelayReceiver, RelaySender};
pub use tcx::{TcxError, TcxExport, TcxOptions, TcxSerializer, TcxWarning};
pub use visibility::{ControlState, ExportControl, LocationWatcher, VisibilityPolicy};
pub use web::{build_router, run_server, ServerConfig, WebAppState};
pub use workout::{is_workout_record, HeartRateSample, WorkoutRecord};
