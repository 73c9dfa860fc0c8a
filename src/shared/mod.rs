// This is free and unencumbered software released into the public domain.

mod catalog;
pub use catalog::*;

mod config;
pub use config::*;

pub mod drivers {
    #[cfg(all(feature = "android", target_os = "android"))]
    pub mod android;
}

mod error;
pub use error::*;

mod event;
pub use event::*;

mod manager;
pub use manager::*;

mod monitor;
pub use monitor::*;

mod pipeline;
pub use pipeline::*;

mod platform;
pub use platform::*;

#[cfg(test)]
pub(crate) mod testing;
