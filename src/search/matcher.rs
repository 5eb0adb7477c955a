//! 検索用マッチャー

use regex::{Regex, RegexBuilder};

/// 1つのテキスト内でのマッチ範囲（バイトオフセット）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// 検索語を準備する。空の検索語なら `None`
    fn compile(&self, query: &str) -> Option<CompiledQuery>;
}

/// 準備済みの検索語
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    regex: Regex,
}

impl CompiledQuery {
    /// テキスト内の重ならないマッチを左から順に返す
    pub fn find_in(&self, text: &str) -> Vec<MatchRange> {
        self.regex
            .find_iter(text)
            .filter(|m| m.start() < m.end())
            .map(|m| MatchRange {
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}

/// リテラル一致マッチャー
///
/// 検索語はエスケープしてから正規表現エンジンへ渡すので、
/// `.` や `*` などはそのままの文字として扱われる。
#[derive(Debug, Default, Clone)]
pub struct LiteralMatcher {
    case_sensitive: bool,
}

impl LiteralMatcher {
    /// 大文字小文字を区別しないマッチャーを作成
    pub fn new() -> Self {
        Self {
            case_sensitive: false,
        }
    }

    /// 大文字小文字の区別を設定
    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl StringMatcher for LiteralMatcher {
    fn compile(&self, query: &str) -> Option<CompiledQuery> {
        if query.trim().is_empty() {
            return None;
        }

        let regex = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(!self.case_sensitive)
            .build();

        match regex {
            Ok(regex) => Some(CompiledQuery { regex }),
            Err(err) => {
                // エスケープ済みなので通常は起きない（サイズ上限超過など）
                log::warn!("failed to compile search query: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LiteralMatcher, MatchRange, StringMatcher};

    fn ranges(text: &str, query: &str) -> Vec<MatchRange> {
        LiteralMatcher::new()
            .compile(query)
            .map(|q| q.find_in(text))
            .unwrap_or_default()
    }

    #[test]
    fn finds_case_insensitive_matches() {
        let found = ranges("The quick Fox jumps over the lazy fox", "fox");
        assert_eq!(
            found,
            vec![
                MatchRange { start: 10, end: 13 },
                MatchRange { start: 34, end: 37 }
            ]
        );
    }

    #[test]
    fn metacharacters_are_literal() {
        let text = "Rated 3.5 stars, not 345";
        let found = ranges(text, "3.5");
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "3.5");

        assert!(ranges("a+b (c)", "(c)").len() == 1);
        assert!(ranges("axb", "a.b").is_empty());
    }

    #[test]
    fn overlapping_occurrences_are_leftmost_non_overlapping() {
        assert_eq!(ranges("aaa", "aa"), vec![MatchRange { start: 0, end: 2 }]);
        assert_eq!(ranges("aaaa", "aa").len(), 2);
    }

    #[test]
    fn blank_query_compiles_to_nothing() {
        let matcher = LiteralMatcher::new();
        assert!(matcher.compile("").is_none());
        assert!(matcher.compile("   ").is_none());
    }

    #[test]
    fn case_sensitive_mode() {
        let matcher = LiteralMatcher::new().with_case_sensitivity(true);
        let query = matcher.compile("Fox").unwrap();
        assert_eq!(query.find_in("fox Fox FOX").len(), 1);
    }

    #[test]
    fn multibyte_offsets_are_byte_based() {
        let text = "東京とキョウト、東京";
        let found = ranges(text, "東京");
        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[1].start..found[1].end], "東京");
    }
}
