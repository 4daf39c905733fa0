//! Configuration management for webfm.
//!
//! User preferences ([`settings::Config`]) are stored as a TOML file and
//! loaded at startup. Every field has a default, so a missing file is not
//! an error for frontends that choose to fall back.

pub mod settings;
