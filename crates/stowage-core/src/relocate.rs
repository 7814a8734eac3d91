//! Relocation of storages and artifacts under a new base path

/// Result of a base relocation.
///
/// `Generic` means the relocated value is still of the plain local kind and
/// a specialized caller should re-wrap the uri in its own kind.
/// `AlreadySpecialized` carries a value of a more specific kind that must be
/// passed through as is.
#[derive(Debug)]
pub enum Relocation<T: ?Sized> {
    Generic(String),
    AlreadySpecialized(Box<T>),
}

/// Join `path` onto `base` with POSIX semantics.
///
/// An absolute `path` (leading `/` or a `scheme://` prefix) replaces `base`;
/// an empty or `.` side is the identity.
pub fn join_uri(base: &str, path: &str) -> String {
    if path.is_empty() || path == "." {
        return base.to_string();
    }
    if base.is_empty() || base == "." || is_absolute(path) {
        return path.to_string();
    }

    let path = path.strip_prefix("./").unwrap_or(path);
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.contains("://")
}

/// Last path segment of a uri
pub fn base_name(uri: &str) -> &str {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_uri() {
        assert_eq!(join_uri("models", "a.bin"), "models/a.bin");
        assert_eq!(join_uri("models/", "a.bin"), "models/a.bin");
        assert_eq!(join_uri("models", "./a.bin"), "models/a.bin");
        assert_eq!(join_uri("", "a.bin"), "a.bin");
        assert_eq!(join_uri(".", "a.bin"), "a.bin");
        assert_eq!(join_uri("models", ""), "models");
        assert_eq!(join_uri("models", "."), "models");
    }

    #[test]
    fn test_join_uri_absolute_wins() {
        assert_eq!(join_uri("models", "/data/a.bin"), "/data/a.bin");
        assert_eq!(join_uri("models", "memory://x/a.bin"), "memory://x/a.bin");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/c.bin"), "c.bin");
        assert_eq!(base_name("c.bin"), "c.bin");
        assert_eq!(base_name("github://o:r@main/dir/"), "dir");
    }
}
