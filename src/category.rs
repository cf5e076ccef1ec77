//! The colors used to display transaction categories.

/// The badge color for categories that are not in [CATEGORY_COLORS].
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// Category keys and their badge colors.
const CATEGORY_COLORS: &[(&str, &str)] = &[
    // Income
    ("salary", "#22c55e"),
    ("freelance", "#06b6d4"),
    ("investments", "#6366f1"),
    ("business", "#ec4899"),
    ("rental", "#f59e0b"),
    ("other-income", "#64748b"),
    // Expenses
    ("housing", "#ef4444"),
    ("transportation", "#f97316"),
    ("groceries", "#84cc16"),
    ("utilities", "#06b6d4"),
    ("entertainment", "#8b5cf6"),
    ("food", "#f43f5e"),
    ("shopping", "#ec4899"),
    ("healthcare", "#14b8a6"),
    ("education", "#6366f1"),
    ("personal", "#d946ef"),
    ("travel", "#0ea5e9"),
    ("insurance", "#64748b"),
    ("gifts", "#f472b6"),
    ("bills", "#fb7185"),
    ("other-expense", "#94a3b8"),
];

/// Get the badge color for `category`, ignoring case.
pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(category))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CATEGORY_COLOR, category_color};

    #[test]
    fn known_category_has_color() {
        assert_eq!(category_color("groceries"), "#84cc16");
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(category_color("Food"), category_color("food"));
        assert_ne!(category_color("Food"), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn unknown_category_uses_default_color() {
        assert_eq!(category_color("pets"), DEFAULT_CATEGORY_COLOR);
    }
}
