//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn email() -> String {
        "user@noreply.papyr".into()
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use super::super::build::SlugCollision;
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn theme() -> String {
        "paper".into()
    }

    pub fn page_size() -> usize {
        10
    }

    pub fn timeout() -> u64 {
        120
    }

    pub fn slug_collision() -> SlugCollision {
        SlugCollision::default()
    }
}

// ============================================================================
// [outputs] Section Defaults
// ============================================================================

pub mod outputs {
    use super::super::outputs::OutputFormat;

    pub fn home() -> Vec<OutputFormat> {
        vec![OutputFormat::Html, OutputFormat::Rss, OutputFormat::Json]
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        1313
    }
}
