/// Path utilities turning file locations into URL fragments
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
use std::borrow::Cow;

/// Collapse every run of `/` into a single `/`
///
/// Returns `Cow::Borrowed` when the input has no doubled slashes.
///
/// # Examples
///
/// ```
/// use auto_routes::path::collapse_slashes;
///
/// assert_eq!(collapse_slashes("/api//users///list"), "/api/users/list");
/// assert_eq!(collapse_slashes("/api/users"), "/api/users");
/// ```
pub fn collapse_slashes(path: &str) -> Cow<'_, str> {
    if !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                out.push(c);
            }
            previous_slash = true;
        } else {
            out.push(c);
            previous_slash = false;
        }
    }
    Cow::Owned(out)
}

/// Convert a route file location into its URL fragment
///
/// The fragment is lower-case and always starts and ends with `/`:
///
/// - `routes/api/users.json` → `/api/users/`
/// - `routes/root.json` → `/`
///
/// The first literal `root` left after stripping the folder and extension is
/// removed, which is what maps `root.json` onto the bare root. A `root` found
/// anywhere else in the relative path (`/uproot/`) is removed as well.
///
/// # Arguments
///
/// * `root_folder` - Routes root the walk started from
/// * `absolute_file_path` - File path under `root_folder`
/// * `ext` - File extension including the dot, e.g. `.json`
///
/// # Examples
///
/// ```
/// use auto_routes::path::clean_relative_path;
///
/// let fragment = clean_relative_path("/srv/app/routes", "/srv/app/routes/api/users.json", ".json");
/// assert_eq!(fragment, "/api/users/");
///
/// let fragment = clean_relative_path("/srv/app/routes", "/srv/app/routes/root.json", ".json");
/// assert_eq!(fragment, "/");
/// ```
pub fn clean_relative_path(root_folder: &str, absolute_file_path: &str, ext: &str) -> String {
    let root = root_folder.to_lowercase();
    let ext = ext.to_lowercase();

    let mut relative = absolute_file_path.to_lowercase();
    relative.push('/');

    let relative = match relative.strip_prefix(root.as_str()) {
        Some(rest) => rest.to_string(),
        None => relative.replacen(root.as_str(), "", 1),
    };

    let with_ext = format!("{}/", ext);
    let relative = match relative.strip_suffix(with_ext.as_str()) {
        Some(rest) if !ext.is_empty() => format!("{}/", rest),
        _ => relative.replacen(ext.as_str(), "", 1),
    };

    let relative = relative.replacen("root", "", 1).replace('\\', "/");
    let relative = collapse_slashes(&relative);

    if relative.starts_with('/') {
        relative.into_owned()
    } else {
        format!("/{}", relative)
    }
}

/// Join a path fragment with a route's declared URL
///
/// Doubled slashes are collapsed and the trailing slash is dropped. A join
/// that collapses to nothing yields `/`.
///
/// # Examples
///
/// ```
/// use auto_routes::path::fix_url;
///
/// assert_eq!(fix_url("/:id", "/api/users/"), "/api/users/:id");
/// assert_eq!(fix_url("/", "/api/"), "/api");
/// assert_eq!(fix_url("", "/"), "/");
/// ```
pub fn fix_url(url: &str, relative_file_path: &str) -> String {
    let joined = format!("{}{}", relative_file_path, url);
    let joined = collapse_slashes(&joined);
    let trimmed = joined.strip_suffix('/').unwrap_or(&joined);

    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Case-insensitive check that a declared URL already carries its fragment
pub fn starts_with_fragment(url: &str, relative_file_path: &str) -> bool {
    url.to_lowercase().starts_with(relative_file_path)
}
