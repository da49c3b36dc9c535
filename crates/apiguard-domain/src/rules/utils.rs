use globset::{Glob, GlobSet, GlobSetBuilder};

pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // Treat entries as glob patterns (case-sensitive).
        let glob =
            Glob::new(pattern).expect("rule patterns must be validated in apiguard-settings");
        builder.add(glob);
    }
    Some(
        builder
            .build()
            .expect("rule patterns must be validated in apiguard-settings"),
    )
}

pub fn is_match(set: Option<&GlobSet>, value: &str) -> bool {
    set.map(|s| s.is_match(value)).unwrap_or(false)
}
