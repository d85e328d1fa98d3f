//! Lang file synchronization library.
//!
//! This library parses `.lang` translation files (`key=value` lines, `#`
//! comments) without losing any line, and reconciles every language file of a
//! folder against a model language file. It's designed for translation folders
//! where one language defines the canonical keys and the others must follow it
//! without losing their own translations.
//!
//! # Features
//!
//! - **Lossless parsing**: every line round-trips, malformed ones included
//! - **Target-wins merging**: existing translations are never overwritten
//! - **Comment relocation**: comments the model lacks move to the end of the file
//! - **Missing-key reports**: which keys a file lacks and which files define them
//! - **Optional tracing**: Detailed logging when the `tracing` feature is enabled
//!
//! # Example
//!
//! ```rust,no_run
//! use lang_sync::folder::{DEFAULT_EXTENSION, LangFolder};
//!
//! let mut folder = LangFolder::load("assets/lang", DEFAULT_EXTENSION).unwrap();
//! folder.apply_model_to_file("en_us.lang", "fr_fr.lang", true).unwrap();
//!
//! for missing in folder.missing_keys("fr_fr.lang").unwrap() {
//!     println!("{} (from {})", missing.key, missing.sources.join(", "));
//! }
//! ```

pub mod file;
pub mod folder;
pub mod index;
pub mod parse;
pub mod report;
pub mod sync;
