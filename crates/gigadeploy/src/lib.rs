//! gigadeploy - Core Library
//!
//! Moves the gigagen native library and its generated C# binding into the
//! Unity project, either as a release (both desktop platforms) or as a dev
//! hot-reload (one platform, renamed so the editor loads it fresh).

pub mod binding;
pub mod config;
pub mod error;
pub mod layout;
pub mod lock;
pub mod platform;
pub mod receipt;
pub mod release;
pub mod reload;
pub mod reload_id;
pub mod staging;

pub use config::{DeployConfig, IdStrategy, ReloadConfig};
pub use error::{DeployError, Result, SourceKind};
pub use layout::Layout;
pub use platform::Platform;
pub use receipt::{DeployReceipt, DeployedFile};
pub use release::{PublishOptions, ReleasePublisher};
pub use reload::{DevReloader, ReloadOptions};
pub use reload_id::{id_source_for, CounterIdSource, FixedIdSource, IdSource, RandomIdSource, ReloadId};
