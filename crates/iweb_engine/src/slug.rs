use std::path::Path;

/// Post slug from an entry file name: the day-of-month prefix up to and
/// including the first underscore is dropped, as is the extension.
///
/// `4_My_Trip.html` becomes `My_Trip`. Names without an underscore give
/// `None` and the platform derives a slug from the title.
pub fn entry_slug(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let (_, rest) = file_name.split_once('_')?;
    let slug = match rest.rfind('.') {
        Some(dot) if dot > 0 => &rest[..dot],
        _ => rest,
    };
    (!slug.is_empty()).then(|| slug.to_string())
}
