//! Bootstrap configuration for a CMS site.
//!
//! [`config`] turns environment variables and an optional overrides file
//! into an immutable [`config::SiteConfiguration`]. [`localization`] reads
//! the editor's single-language string tables.

pub mod config;
pub mod localization;
