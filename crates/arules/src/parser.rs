//! Text-format parsers implemented with nom.
//!
//! Two line-oriented formats are supported:
//!
//! - transaction lines: whitespace-separated item identifiers (`1 5 9`)
//! - rule lines: `1 5 ==> 9 #SUP: 12 #CONF: 0.75`

use nom::{
    bytes::complete::tag,
    character::complete::{space0, space1, u32 as item_id},
    combinator::{all_consuming, map},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{FormatError, FormatResult};
use crate::itemset;
use crate::rule::AssociationRule;
use crate::{Item, MAX_ITEM};

/// Parses a whole transaction file, one transaction per line.
///
/// Blank lines and lines starting with `#`, `%` or `@` are skipped. Items of
/// each transaction are returned sorted ascending without duplicates.
///
/// # Examples
///
/// ```rust
/// use arules::parse_transactions;
///
/// let transactions = parse_transactions("3 1 2\n\n@meta\n2 1").unwrap();
/// assert_eq!(transactions, vec![vec![1, 2, 3], vec![1, 2]]);
/// ```
pub fn parse_transactions(input: &str) -> FormatResult<Vec<Vec<Item>>> {
    let mut transactions = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }
        transactions.push(parse_numbered_transaction(line, idx + 1)?);
    }
    Ok(transactions)
}

/// Parses a single transaction line.
///
/// # Errors
///
/// Returns [`FormatError::EmptyInput`] for a blank line,
/// [`FormatError::ReservedItem`] if item `0` appears and
/// [`FormatError::ItemOutOfRange`] for items above [`MAX_ITEM`].
pub fn parse_transaction_line(line: &str) -> FormatResult<Vec<Item>> {
    if line.trim().is_empty() {
        return Err(FormatError::EmptyInput);
    }
    parse_numbered_transaction(line, 1)
}

/// Parses a single rendered rule line.
///
/// # Examples
///
/// ```rust
/// use arules::parse_rule;
///
/// let rule = parse_rule("1 2 ==> 3 #SUP: 2 #CONF: 1.0").unwrap();
/// assert_eq!(rule.antecedent, vec![1, 2]);
/// assert_eq!(rule.consequent, vec![3]);
/// assert_eq!(rule.confidence, 1.0);
/// ```
pub fn parse_rule(line: &str) -> FormatResult<AssociationRule> {
    if line.trim().is_empty() {
        return Err(FormatError::EmptyInput);
    }
    parse_numbered_rule(line, 1)
}

/// Parses every non-blank line of `input` as a rule.
pub fn parse_rules(input: &str) -> FormatResult<Vec<AssociationRule>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_numbered_rule(line, idx + 1))
        .collect()
}

fn is_skippable(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#') || line.starts_with('%') || line.starts_with('@')
}

fn parse_numbered_transaction(line: &str, line_no: usize) -> FormatResult<Vec<Item>> {
    let trimmed = line.trim();
    let items = match all_consuming(itemset_list)(trimmed) {
        Ok((_, items)) => items,
        Err(e) => return Err(to_format_error(trimmed, line_no, e)),
    };
    check_items(&items, line_no)?;
    Ok(itemset::normalize(items))
}

fn parse_numbered_rule(line: &str, line_no: usize) -> FormatResult<AssociationRule> {
    let trimmed = line.trim();
    let mut rule = match all_consuming(rule_line)(trimmed) {
        Ok((_, rule)) => rule,
        Err(e) => return Err(to_format_error(trimmed, line_no, e)),
    };
    check_items(&rule.antecedent, line_no)?;
    check_items(&rule.consequent, line_no)?;
    rule.antecedent = itemset::normalize(std::mem::take(&mut rule.antecedent));
    rule.consequent = itemset::normalize(std::mem::take(&mut rule.consequent));
    Ok(rule)
}

fn check_items(items: &[Item], line: usize) -> FormatResult<()> {
    if items.contains(&0) {
        return Err(FormatError::ReservedItem { line });
    }
    if let Some(&item) = items.iter().find(|&&item| item > MAX_ITEM) {
        return Err(FormatError::ItemOutOfRange { line, item });
    }
    Ok(())
}

fn to_format_error(line: &str, line_no: usize, err: nom::Err<nom::error::Error<&str>>) -> FormatError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => FormatError::ParseError {
            line: line_no,
            position: line.len() - e.input.len(),
            message: format!("unexpected input at: '{}'", truncate(e.input, 20)),
        },
        nom::Err::Incomplete(_) => FormatError::ParseError {
            line: line_no,
            position: line.len(),
            message: "incomplete input".to_string(),
        },
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ============================================================================
// Grammar
// ============================================================================

fn itemset_list(input: &str) -> IResult<&str, Vec<Item>> {
    separated_list1(space1, item_id)(input)
}

fn arrow(input: &str) -> IResult<&str, &str> {
    delimited(space0, tag("==>"), space0)(input)
}

fn rule_line(input: &str) -> IResult<&str, AssociationRule> {
    map(
        tuple((
            itemset_list,
            arrow,
            itemset_list,
            preceded(space0, tag("#SUP:")),
            preceded(space0, item_id),
            preceded(space0, tag("#CONF:")),
            preceded(space0, double),
        )),
        |(antecedent, _, consequent, _, support, _, confidence)| {
            AssociationRule::new(antecedent, consequent, support, confidence)
        },
    )(input)
}
