use crate::error::{PdfLinkError, Result};
use std::fmt;

/// Inclusive, 1-based page span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parse a split expression such as `1-3,5,7-10`.
///
/// Whitespace around items is ignored. Empty items, page 0 and descending
/// spans are rejected.
pub fn parse_page_ranges(expr: &str) -> Result<Vec<PageRange>> {
    if expr.trim().is_empty() {
        return Err(invalid(expr, "no page ranges given"));
    }

    expr.split(',')
        .map(|item| parse_item(expr, item.trim()))
        .collect()
}

/// Parse and re-render in canonical form (no whitespace).
pub fn normalize_page_ranges(expr: &str) -> Result<String> {
    let ranges = parse_page_ranges(expr)?;
    Ok(ranges
        .iter()
        .map(PageRange::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

fn parse_item(expr: &str, item: &str) -> Result<PageRange> {
    if item.is_empty() {
        return Err(invalid(expr, "empty range"));
    }

    let (start, end) = match item.split_once('-') {
        Some((start, end)) => (parse_page(expr, start)?, parse_page(expr, end)?),
        None => {
            let page = parse_page(expr, item)?;
            (page, page)
        }
    };

    if start > end {
        return Err(invalid(expr, &format!("range {}-{} is descending", start, end)));
    }
    Ok(PageRange { start, end })
}

fn parse_page(expr: &str, raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let page: u32 = raw
        .parse()
        .map_err(|_| invalid(expr, &format!("'{}' is not a page number", raw)))?;
    if page == 0 {
        return Err(invalid(expr, "pages are numbered from 1"));
    }
    Ok(page)
}

fn invalid(expr: &str, reason: &str) -> PdfLinkError {
    PdfLinkError::ValidationError(format!("invalid page ranges '{}': {}", expr, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_ranges() {
        let ranges = parse_page_ranges("1-3,5,7-10").unwrap();
        assert_eq!(
            ranges,
            vec![
                PageRange { start: 1, end: 3 },
                PageRange { start: 5, end: 5 },
                PageRange { start: 7, end: 10 },
            ]
        );
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize_page_ranges(" 1 - 3 , 5 ").unwrap(), "1-3,5");
        assert_eq!(normalize_page_ranges("4-4").unwrap(), "4");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "   ", "0", "3-1", "1,,2", "1,", "a-b", "1-", "-3", "1-2-3", "1;2"] {
            assert!(
                matches!(parse_page_ranges(bad), Err(PdfLinkError::ValidationError(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }
}
