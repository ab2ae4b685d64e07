use sea_orm::sea_query::LikeExpr;

const ESCAPE: char = '\\';

fn escaped_contains(query: &str) -> String {
    let mut pattern = String::from("%");
    for c in query.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            pattern.push(ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring `LIKE` pattern. `%`, `_` and `\` in the query
/// match literally.
pub(crate) fn contains_pattern(query: &str) -> LikeExpr {
    LikeExpr::new(escaped_contains(query)).escape(ESCAPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escaped_contains(" Sea "), "%sea%");
        assert_eq!(escaped_contains("100%_Off"), r"%100\%\_off%");
        assert_eq!(escaped_contains(r"a\b"), r"%a\\b%");
    }
}
