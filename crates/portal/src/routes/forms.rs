//! Parsing helpers for free-form inputs.

use freshwash_core::ItemId;

use crate::api::types::ProcessOrderLine;

/// Parse item counts written one per line as `item_id=quantity`.
///
/// Blank lines are skipped. At least one line is required.
pub(crate) fn parse_item_lines(input: &str) -> Result<Vec<ProcessOrderLine>, String> {
    let mut lines = Vec::new();
    for (number, line) in input.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        if line.is_empty() {
            continue;
        }
        let (item, quantity) = line
            .split_once('=')
            .ok_or_else(|| format!("Line {number}: expected item_id=quantity."))?;
        let item_id = item
            .trim()
            .parse::<ItemId>()
            .map_err(|_| format!("Line {number}: {:?} is not an item id.", item.trim()))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| format!("Line {number}: quantity must be a positive number."))?;
        lines.push(ProcessOrderLine { item_id, quantity });
    }

    if lines.is_empty() {
        return Err("Add at least one item line.".to_string());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_lines_and_skips_blanks() {
        let lines = parse_item_lines("1=3\n\n 4 = 2 \n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_id, ItemId::new(1));
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[1].item_id, ItemId::new(4));
        assert_eq!(lines[1].quantity, 2);
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(parse_item_lines("").is_err());
        assert!(parse_item_lines("shirt").unwrap_err().contains("Line 1"));
        assert!(parse_item_lines("1=0").is_err());
        assert!(parse_item_lines("1=2\nx=2").unwrap_err().contains("Line 2"));
    }
}
