//! Naming conventions for controllers and their templates.

/// Derive a controller name from a Rust type name.
///
/// The module path and generic parameters are dropped, then a trailing
/// `Controller` suffix:
/// - `my_app::controllers::PostsController` → `Posts`
/// - `Mock` → `Mock`
pub fn controller_name_from_type(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    let short = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);

    match short.strip_suffix("Controller") {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => short.to_string(),
    }
}

/// Humanize an identifier for display.
///
/// A space goes before every uppercase letter or digit that directly follows
/// a lowercase letter, digit or underscore; then underscores are dropped.
/// A leading run of capitals stays together.
/// - `UserProfile` → `User Profile`
/// - `My_Thing` → `My Thing`
/// - `HTTPServer2` → `HTTPServer 2`
pub fn humanize(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;

    for c in s.chars() {
        let starts_word = c.is_ascii_uppercase() || c.is_ascii_digit();
        let after_word = prev.map_or(false, |p| {
            p.is_ascii_lowercase() || p.is_ascii_digit() || p == '_'
        });
        if starts_word && after_word {
            result.push(' ');
        }
        result.push(c);
        prev = Some(c);
    }

    result.replace('_', "")
}

/// The template rendered for an action when none was set explicitly.
pub fn default_template(controller: &str, action: &str) -> String {
    format!("{}/{}", controller, action)
}
