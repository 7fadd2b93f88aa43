pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod tunables;

pub use capture::{EventFilter, EventPoster, RawEvent, ScrollSample, Verdict};
pub use config::AppConfig;
pub use engine::SyntheticScroll;
pub use error::{Error, Result};
pub use service::{EngineHandle, ScrollEngine};
pub use tunables::{SharedTunables, TunableSource, Tunables};
