//! `**bold**` runs in coach replies.
//!
//! Only paired double asterisks on the same line count. Anything else,
//! including an unclosed `**` while a reply is still streaming in, is shown
//! as typed.

use std::ops::Range;

/// Text with every `**…**` pair removed, plus the byte ranges of the
/// stripped text that were inside a pair. Ranges are sorted and disjoint.
pub fn split_bold(text: &str) -> (String, Vec<Range<usize>>) {
    let mut plain = String::with_capacity(text.len());
    let mut bold = Vec::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            plain.push('\n');
        }
        let mut rest = line;
        while let Some(open) = rest.find("**") {
            let inner = &rest[open + 2..];
            let Some(close) = inner.find("**") else {
                break;
            };
            plain.push_str(&rest[..open]);
            let start = plain.len();
            plain.push_str(&inner[..close]);
            if close > 0 {
                bold.push(start..plain.len());
            }
            rest = &inner[close + 2..];
        }
        plain.push_str(rest);
    }

    (plain, bold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold_parts(text: &str) -> (String, Vec<String>) {
        let (plain, bold) = split_bold(text);
        let parts = bold.iter().map(|r| plain[r.clone()].to_string()).collect();
        (plain, parts)
    }

    #[test]
    fn paired_markers_become_bold_ranges() {
        assert_eq!(
            bold_parts("先**休息三天**再騎"),
            ("先休息三天再騎".to_string(), vec!["休息三天".to_string()])
        );
        assert_eq!(
            bold_parts("**注意：**膝蓋外側痛，**先冰敷**"),
            (
                "注意：膝蓋外側痛，先冰敷".to_string(),
                vec!["注意：".to_string(), "先冰敷".to_string()]
            )
        );
    }

    #[test]
    fn unpaired_or_multiline_markers_stay_literal() {
        assert_eq!(bold_parts("先**休息"), ("先**休息".to_string(), vec![]));
        assert_eq!(
            bold_parts("**一\n二**"),
            ("**一\n二**".to_string(), vec![])
        );
        assert_eq!(bold_parts("a****b"), ("ab".to_string(), vec![]));
    }
}
