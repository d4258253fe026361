// Full pages and routing between them

pub mod landing;
pub mod practice;

use serde::{Deserialize, Serialize};

const PAGE_BACKGROUND: &str = r#"<div class="fixed inset-0 grid-bg opacity-20 pointer-events-none"></div>"#;

/// Top-level pages of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Practice,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Practice => "/yoga",
        }
    }

    /// Resolve a link target. In-page anchors and query strings stay on the page they point into.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['#', '?']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Some(Route::Landing),
            "/yoga" => Some(Route::Practice),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(Route::Practice.path(), "/yoga");
        assert_eq!(Route::from_path("/"), Some(Route::Landing));
        assert_eq!(Route::from_path("/yoga"), Some(Route::Practice));
        assert_eq!(Route::from_path("/yoga/"), Some(Route::Practice));
        assert_eq!(Route::from_path("#features"), Some(Route::Landing));
        assert_eq!(Route::from_path("/#how-it-works"), Some(Route::Landing));
        assert_eq!(Route::from_path("/admin"), None);
    }
}
