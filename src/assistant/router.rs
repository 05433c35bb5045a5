/// Ordered keyword table. Groups are checked top to bottom and the first group
/// with a keyword contained in the message wins; nothing matching yields the
/// fallback route.
pub struct KeywordRouter<R: 'static> {
    groups: &'static [(&'static [&'static str], R)],
    fallback: R,
}

impl<R: Copy + 'static> KeywordRouter<R> {
    pub const fn new(groups: &'static [(&'static [&'static str], R)], fallback: R) -> Self {
        Self { groups, fallback }
    }

    pub fn route(&self, message: &str) -> R {
        let message = message.to_lowercase();
        self.groups
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| message.contains(keyword)))
            .map(|(_, route)| *route)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Route {
        First,
        Second,
        Other,
    }

    const FIRST: &[&str] = &["alpha", "beta"];
    const SECOND: &[&str] = &["gamma"];

    const ROUTER: KeywordRouter<Route> =
        KeywordRouter::new(&[(FIRST, Route::First), (SECOND, Route::Second)], Route::Other);

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(ROUTER.route("GAMMA rays"), Route::Second);
    }

    #[test]
    fn earlier_group_wins() {
        assert_eq!(ROUTER.route("gamma then beta"), Route::First);
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        assert_eq!(ROUTER.route("delta"), Route::Other);
        assert_eq!(ROUTER.route(""), Route::Other);
    }
}
