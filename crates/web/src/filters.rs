//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Prefix under which `ServeDir` serves the static directory.
const STATIC_PREFIX: &str = "/static";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Map a stored image path to a servable URL.
///
/// Inventory rows often hold site-relative paths such as
/// `/images/vehicles/camaro.jpg`; those resolve under `/static`. Paths
/// already under `/static` and anything not starting with `/` are left as is.
///
/// Usage in templates: `{{ vehicle.image|asset_url }}`
#[askama::filter_fn]
pub fn asset_url(path: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(resolve_asset(&path.to_string()))
}

fn resolve_asset(path: &str) -> String {
    let path = path.trim();
    if !path.starts_with('/') || path.starts_with("//") || path.starts_with("/static/") {
        path.to_owned()
    } else {
        format!("{STATIC_PREFIX}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_relative_paths_move_under_static() {
        assert_eq!(
            resolve_asset("/images/vehicles/camaro.jpg"),
            "/static/images/vehicles/camaro.jpg"
        );
    }

    #[test]
    fn test_static_and_other_paths_are_unchanged() {
        assert_eq!(
            resolve_asset("/static/images/vehicles/no-image.svg"),
            "/static/images/vehicles/no-image.svg"
        );
        assert_eq!(resolve_asset("//cdn.example.com/a.png"), "//cdn.example.com/a.png");
        assert_eq!(resolve_asset("relative.png"), "relative.png");
    }
}
