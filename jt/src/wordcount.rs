//! Word counting that tracks iA Writer's counter
//!
//! The editor does not split on whitespace alone: checkbox bullets, decoration
//! arrows and indented blocks after a blank line are not counted, decimals are
//! one word, and slashes, em-dashes and glued sentences separate words. The
//! rewrites below reproduce those rules before a plain whitespace split.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Default number of words to write on top of what the template already holds
pub const DEFAULT_WORDCOUNT_GOAL: usize = 750;

const EM_DASH: char = '—';
const ELLIPSIS: char = '…';
const RIGHT_SINGLE_QUOTE: char = '’';

static RE_CHECKBOX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"- \[[^\]\n]\]").expect("valid checkbox regex"));
static RE_BOUNDARY_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_:<>/=]").expect("valid boundary regex"));
static RE_DROPPED_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[&—-]").expect("valid dropped regex"));
static RE_SPACED_ELLIPSIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +(?:\.+|[…?])").expect("valid ellipsis regex"));
static RE_ARROWS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[↑↓]").expect("valid arrow regex"));
static RE_INDENTED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n\t[^\t\n]+(?:\n\t[^\t\n]+)*").expect("valid indent regex"));

/// What to do with a character whose neighbours satisfy a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
    Space,
    Delete,
}

/// Rewrite every `target` whose previous and next characters satisfy `pred`.
///
/// Neighbours are read from the input, not the partially rewritten output, so
/// `1.2.3` sees a digit on both sides of each dot.
fn rewrite_between(text: &str, target: char, rewrite: Rewrite, pred: impl Fn(char, char) -> bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == target && i > 0 && i + 1 < chars.len() && pred(chars[i - 1], chars[i + 1]) {
            if rewrite == Rewrite::Space {
                out.push(' ');
            }
            continue;
        }
        out.push(c);
    }

    out
}

fn is_ascii_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn not_space(c: char) -> bool {
    !c.is_whitespace()
}

/// One pass of the rewrite rules, in the order the editor's behavior needs
fn normalize_once(text: &str) -> String {
    // Checkbox bullets vanish without leaving a gap
    let text = RE_CHECKBOX.replace_all(text, "");
    let text = RE_BOUNDARY_CHARS.replace_all(&text, " ");
    let text = rewrite_between(&text, '/', Rewrite::Space, |a, b| is_ascii_letter(a) && is_ascii_letter(b));
    // Decimals and version strings collapse into one token
    let text = rewrite_between(&text, '.', Rewrite::Delete, |a, b| a.is_ascii_digit() && b.is_ascii_digit());
    let text = rewrite_between(&text, EM_DASH, Rewrite::Space, |a, b| not_space(a) && not_space(b));
    let text = RE_DROPPED_CHARS.replace_all(&text, "");
    let text = rewrite_between(&text, RIGHT_SINGLE_QUOTE, Rewrite::Space, |a, b| {
        a.is_ascii_digit() && is_ascii_letter(b)
    });
    let text = RE_SPACED_ELLIPSIS.replace_all(&text, ELLIPSIS.to_string());
    let text = rewrite_between(&text, ELLIPSIS, Rewrite::Space, |a, b| not_space(a) && not_space(b));
    let text = rewrite_between(&text, '.', Rewrite::Space, |a, b| {
        a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric() && !(a.is_ascii_digit() && b.is_ascii_digit())
    });
    let text = RE_ARROWS.replace_all(&text, "");
    RE_INDENTED_BLOCK.replace_all(&text, "").into_owned()
}

/// Rewrite `text` into the form whose whitespace tokens are the counted words.
///
/// Later rules can expose patterns for earlier ones (deleting an arrow may
/// glue `a.b` back together), so passes repeat until nothing changes. Every
/// rewrite either shortens the text or turns a non-space into a space, which
/// bounds the number of passes.
pub fn normalize(text: &str) -> String {
    normalize_with_passes(text).0
}

/// Normalized text and the number of passes it took to settle
fn normalize_with_passes(text: &str) -> (String, usize) {
    let mut current = normalize_once(text);
    let mut passes = 1;
    loop {
        let next = normalize_once(&current);
        passes += 1;
        if next == current {
            return (current, passes);
        }
        current = next;
    }
}

/// Count words the way iA Writer does
pub fn wordcount(text: &str) -> usize {
    let count = normalize(text).split_whitespace().count();
    debug!(chars = text.len(), count, "wordcount: counted");
    count
}

/// Word count to aim for when starting from `text`
pub fn goal_wordcount(text: &str, goal: usize) -> usize {
    wordcount(text) + goal
}
