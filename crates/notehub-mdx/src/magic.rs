//! Magic comments: marker lines that highlight other lines in a code sample.
//!
//! ```text
//! // highlight-next-line
//! let x = 1;          <- highlighted
//! // highlight-start
//! let y = 2;          <- highlighted
//! // highlight-end
//! ```
//!
//! Marker lines are removed from the output. A `{1,3-5}` range in the fence
//! metastring takes precedence: the listed lines get the first rule's class and
//! markers are left untouched.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use notehub_config::MagicCommentRule;

/// A whole-line comment in any of the common comment syntaxes.
static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?:",
        r"(?://|#|--|;|%)\s*(?P<a>.+?)",
        r"|/\*\s*(?P<b>.+?)\s*\*/",
        r"|\{/\*\s*(?P<c>.+?)\s*\*/\}",
        r"|<!--\s*(?P<d>.+?)\s*-->",
        r")\s*$",
    ))
    .expect("comment pattern is valid")
});

static LINE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([\d,\s-]+)\}").expect("range pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    NextLine,
    BlockStart,
    BlockEnd,
}

/// Something in a code sample the highlighter cannot honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MagicCommentIssue {
    /// A block start marker with no matching end (0-indexed source line)
    UnclosedBlock { marker: String, line: usize },

    /// A metastring range line past the end of the code
    LineOutOfRange { line: usize, line_count: usize },
}

impl fmt::Display for MagicCommentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedBlock { marker, .. } => {
                write!(f, "'{}' is never closed", marker)
            }
            Self::LineOutOfRange { line, line_count } => {
                write!(
                    f,
                    "highlighted line {} is out of range (block has {} lines)",
                    line, line_count
                )
            }
        }
    }
}

/// Code with marker lines stripped and per-line classes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightedCode {
    pub code: String,

    /// Class names by 0-indexed output line
    pub line_classes: BTreeMap<usize, Vec<String>>,

    pub issues: Vec<MagicCommentIssue>,
}

impl HighlightedCode {
    /// Output lines (0-indexed) carrying `class_name`.
    pub fn lines_with(&self, class_name: &str) -> Vec<usize> {
        self.line_classes
            .iter()
            .filter(|(_, classes)| classes.iter().any(|c| c == class_name))
            .map(|(line, _)| *line)
            .collect()
    }
}

/// Inclusive, 1-indexed line ranges from a `{1,3-5}` metastring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRanges(Vec<(usize, usize)>);

impl LineRanges {
    pub fn contains(&self, line: usize) -> bool {
        self.0.iter().any(|(start, end)| (*start..=*end).contains(&line))
    }

    /// Highest line named by any range.
    pub fn max_line(&self) -> Option<usize> {
        self.0.iter().map(|(_, end)| *end).max()
    }

    /// Named lines that exist in a block of `line_count` lines, in order.
    pub fn lines(&self, line_count: usize) -> Vec<usize> {
        (1..=line_count).filter(|line| self.contains(*line)).collect()
    }
}

/// Compiled set of magic comment rules.
#[derive(Debug, Clone)]
pub struct MagicComments {
    rules: Vec<MagicCommentRule>,
    markers: HashMap<String, (usize, Directive)>,
}

impl MagicComments {
    pub fn new(rules: &[MagicCommentRule]) -> Self {
        let mut markers = HashMap::new();

        for (idx, rule) in rules.iter().enumerate() {
            markers
                .entry(rule.line.clone())
                .or_insert((idx, Directive::NextLine));
            if let Some(block) = &rule.block {
                markers
                    .entry(block.start.clone())
                    .or_insert((idx, Directive::BlockStart));
                markers
                    .entry(block.end.clone())
                    .or_insert((idx, Directive::BlockEnd));
            }
        }

        Self {
            rules: rules.to_vec(),
            markers,
        }
    }

    /// Apply the rules to `code`.
    pub fn apply(&self, code: &str, metastring: &str) -> HighlightedCode {
        if let Some(ranges) = parse_line_ranges(metastring) {
            return self.apply_ranges(code, &ranges);
        }

        let mut lines: Vec<&str> = Vec::new();
        let mut hits: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut pending: Vec<usize> = Vec::new();
        // Source lines of the currently open start markers, per rule
        let mut open: Vec<Vec<usize>> = vec![Vec::new(); self.rules.len()];

        for (source_line, line) in code.lines().enumerate() {
            if let Some((rule, directive)) = self.directive(line) {
                match directive {
                    Directive::NextLine => pending.push(rule),
                    Directive::BlockStart => open[rule].push(source_line),
                    Directive::BlockEnd => {
                        open[rule].pop();
                    }
                }
                continue;
            }

            let idx = lines.len();
            let mut rules: Vec<usize> = pending.drain(..).collect();
            rules.extend((0..open.len()).filter(|r| !open[*r].is_empty()));
            if !rules.is_empty() {
                rules.sort_unstable();
                rules.dedup();
                hits.insert(idx, rules);
            }
            lines.push(line);
        }

        let mut issues = Vec::new();
        for (rule, starts) in open.iter().enumerate() {
            let Some(block) = &self.rules[rule].block else {
                continue;
            };
            for line in starts {
                issues.push(MagicCommentIssue::UnclosedBlock {
                    marker: block.start.clone(),
                    line: *line,
                });
            }
        }
        issues.sort_by_key(|issue| match issue {
            MagicCommentIssue::UnclosedBlock { line, .. } => *line,
            MagicCommentIssue::LineOutOfRange { line, .. } => *line,
        });

        let mut output = lines.join("\n");
        if code.ends_with('\n') && !lines.is_empty() {
            output.push('\n');
        }

        HighlightedCode {
            code: output,
            line_classes: hits
                .into_iter()
                .map(|(line, rules)| {
                    let classes = rules
                        .into_iter()
                        .map(|r| self.rules[r].class_name.clone())
                        .collect();
                    (line, classes)
                })
                .collect(),
            issues,
        }
    }

    fn apply_ranges(&self, code: &str, ranges: &LineRanges) -> HighlightedCode {
        let line_count = code.lines().count();

        let mut issues = Vec::new();
        if let Some(max) = ranges.max_line().filter(|max| *max > line_count) {
            issues.push(MagicCommentIssue::LineOutOfRange {
                line: max,
                line_count,
            });
        }

        let line_classes = match self.rules.first() {
            Some(first) => ranges
                .lines(line_count)
                .into_iter()
                .map(|line| (line - 1, vec![first.class_name.clone()]))
                .collect(),
            None => BTreeMap::new(),
        };

        HighlightedCode {
            code: code.to_string(),
            line_classes,
            issues,
        }
    }

    fn directive(&self, line: &str) -> Option<(usize, Directive)> {
        let caps = COMMENT_LINE.captures(line)?;
        let marker = ["a", "b", "c", "d"]
            .iter()
            .find_map(|name| caps.name(name))?
            .as_str();
        self.markers.get(marker).copied()
    }
}

/// Parse a `{1,3-5}` metastring range.
///
/// Returns `None` when there is no range or when any part of it is malformed:
/// not a number, line `0`, or a range whose start is past its end.
pub fn parse_line_ranges(metastring: &str) -> Option<LineRanges> {
    let caps = LINE_RANGE.captures(metastring)?;
    let mut ranges = Vec::new();

    for part in caps[1].split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (start.trim().parse().ok()?, end.trim().parse().ok()?),
            None => {
                let line: usize = part.parse().ok()?;
                (line, line)
            }
        };
        if start == 0 || start > end {
            return None;
        }
        ranges.push((start, end));
    }

    ranges.sort_unstable();
    ranges.dedup();
    Some(LineRanges(ranges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_config::BlockMarkers;
    use pretty_assertions::assert_eq;

    const HIGHLIGHT: &str = "theme-code-block-highlighted-line";
    const ERROR: &str = "code-block-error-line";

    fn rules() -> MagicComments {
        MagicComments::new(&[
            MagicCommentRule::default_highlight(),
            MagicCommentRule {
                class_name: ERROR.to_string(),
                line: "This will error".to_string(),
                block: None,
            },
        ])
    }

    #[test]
    fn highlights_next_line() {
        let code = "a = 1\n# highlight-next-line\nb = 2\nc = 3";
        let out = rules().apply(code, "");

        assert_eq!(out.code, "a = 1\nb = 2\nc = 3");
        assert_eq!(out.lines_with(HIGHLIGHT), vec![1]);
    }

    #[test]
    fn highlights_blocks() {
        let code = concat!(
            "fn main() {\n",
            "    // highlight-start\n",
            "    let x = 1;\n",
            "    let y = 2;\n",
            "    // highlight-end\n",
            "}",
        );
        let out = rules().apply(code, "rust");

        assert_eq!(out.code, "fn main() {\n    let x = 1;\n    let y = 2;\n}");
        assert_eq!(out.lines_with(HIGHLIGHT), vec![1, 2]);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn unterminated_block_runs_to_end() {
        let code = "<!-- highlight-start -->\n<p>one</p>\n<p>two</p>";
        let out = rules().apply(code, "");

        assert_eq!(out.lines_with(HIGHLIGHT), vec![0, 1]);
        assert_eq!(
            out.issues,
            vec![MagicCommentIssue::UnclosedBlock {
                marker: "highlight-start".to_string(),
                line: 0
            }]
        );
    }

    #[test]
    fn custom_rule_with_spaces_in_marker() {
        let code = "x = 1\n// This will error\ny = undefined";
        let out = rules().apply(code, "");

        assert_eq!(out.code, "x = 1\ny = undefined");
        assert_eq!(out.lines_with(ERROR), vec![1]);
        assert!(out.lines_with(HIGHLIGHT).is_empty());
    }

    #[test]
    fn rules_stack_on_one_line() {
        let code = "/* highlight-start */\n// This will error\nboom()\n/* highlight-end */";
        let out = rules().apply(code, "");

        assert_eq!(out.code, "boom()");
        assert_eq!(
            out.line_classes.get(&0),
            Some(&vec![HIGHLIGHT.to_string(), ERROR.to_string()])
        );
    }

    #[test]
    fn leaves_ordinary_comments() {
        let code = "# just a comment\nprint('hi')";
        let out = rules().apply(code, "");

        assert_eq!(out.code, code);
        assert!(out.line_classes.is_empty());
    }

    #[test]
    fn metastring_range_wins() {
        let code = "one\n// highlight-next-line\nthree\nfour";
        let out = rules().apply(code, "title=\"x\" {1,3-4,9}");

        assert_eq!(out.code, code);
        assert_eq!(out.lines_with(HIGHLIGHT), vec![0, 2, 3]);
    }

    #[test]
    fn parses_ranges() {
        let ranges = parse_line_ranges("{1,3-5}").unwrap();
        assert_eq!(ranges.lines(10), vec![1, 3, 4, 5]);
        assert_eq!(parse_line_ranges("{ 2, 2 }").unwrap().lines(10), vec![2]);
        assert_eq!(parse_line_ranges("title=\"a\""), None);
    }

    #[test]
    fn huge_ranges_stay_bounded() {
        let ranges = parse_line_ranges("{1-18446744073709551615}").unwrap();
        assert_eq!(ranges.lines(3), vec![1, 2, 3]);
        assert_eq!(ranges.max_line(), Some(usize::MAX));

        let out = rules().apply("a\nb", "{2-20000000}");
        assert_eq!(out.lines_with(HIGHLIGHT), vec![1]);
        assert_eq!(
            out.issues,
            vec![MagicCommentIssue::LineOutOfRange {
                line: 20000000,
                line_count: 2
            }]
        );
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert_eq!(parse_line_ranges("{0}"), None);
        assert_eq!(parse_line_ranges("{0-2}"), None);
        assert_eq!(parse_line_ranges("{5-2}"), None);
        assert_eq!(parse_line_ranges("{1-99999999999999999999999}"), None);
    }

    #[test]
    fn keeps_trailing_newline() {
        let out = rules().apply("# highlight-next-line\nimport boto3\n", "python");
        assert_eq!(out.code, "import boto3\n");
        assert_eq!(out.lines_with(HIGHLIGHT), vec![0]);

        assert_eq!(rules().apply("import boto3", "").code, "import boto3");
    }

    #[test]
    fn first_rule_owns_shared_marker() {
        let comments = MagicComments::new(&[
            MagicCommentRule {
                class_name: "first".to_string(),
                line: "mark".to_string(),
                block: None,
            },
            MagicCommentRule {
                class_name: "second".to_string(),
                line: "mark".to_string(),
                block: Some(BlockMarkers {
                    start: "s".to_string(),
                    end: "e".to_string(),
                }),
            },
        ]);

        let out = comments.apply("// mark\nx", "");
        assert_eq!(out.lines_with("first"), vec![0]);
        assert!(out.lines_with("second").is_empty());
    }
}
