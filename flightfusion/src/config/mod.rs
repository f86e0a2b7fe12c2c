//! Configuration file for FlightFusion.
//!
//! Settings are read from `~/.flightfusion/config.ini`. Every key is optional;
//! missing keys take the defaults in [`defaults`].
//!
//! # Example
//!
//! ```no_run
//! use flightfusion::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let primary = config.primary_config();
//! println!("primary host: {}", primary.host);
//! # Ok::<(), flightfusion::config::ConfigFileError>(())
//! ```

mod controls;
pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use controls::FileControls;
pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, ControlsSettings, FetchSettings, LoggingSettings, PrimarySettings,
    SecondarySettings,
};
