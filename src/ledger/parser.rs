//! Line-oriented reader for the beancount subset the budget ledger uses
//!
//! Supported: transactions (`*`, `!`, `txn`) with payee/narration strings,
//! tags and links; postings with an explicit amount or a single elided amount;
//! `pushtag`/`poptag`; `plugin` declarations. Other dated directives and
//! `option`/`include` lines are accepted and skipped. Every problem is
//! collected with its line number so the caller can show them all at once.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{AccountPath, Currencies, Entry, Money, Posting};

static DATED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+(\S+)(.*)$").unwrap());

static POSTING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s+(?:[*!]\s+)?([A-Za-z][A-Za-z0-9:_\-]*)(?:\s+(\S+)\s+([A-Z][A-Z0-9'._\-]*))?\s*(?:;.*)?$",
    )
    .unwrap()
});

static METADATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+[a-z][A-Za-z0-9_\-]*:(\s|$)").unwrap());

static TAG_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(pushtag|poptag)\s+#([A-Za-z0-9_\-/.]+)\s*(?:;.*)?$").unwrap());

static PLUGIN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^plugin\s+"([^"]+)""#).unwrap());

const SKIPPED_DIRECTIVES: &[&str] = &[
    "open", "close", "balance", "pad", "commodity", "price", "note", "event", "document",
    "custom", "query",
];

/// A parsed ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// Transactions in file order
    pub entries: Vec<Entry>,
    /// Plugin names declared with `plugin "..."`
    pub plugins: Vec<String>,
}

impl Ledger {
    /// Whether the ledger declares a plugin
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p == name)
    }
}

/// One problem found in the ledger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// All problems found in the ledger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    /// Number of errors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no errors
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for ParseErrors {}

/// Transaction being read, with at most one posting waiting for an amount
struct Pending {
    entry: Entry,
    elided: Option<AccountPath>,
    broken: bool,
}

/// What indented lines currently belong to
enum Context {
    TopLevel,
    Transaction(Pending),
    Skipped,
}

struct Parser<'a> {
    currencies: &'a Currencies,
    ledger: Ledger,
    errors: Vec<ParseError>,
    tag_stack: BTreeSet<String>,
    context: Context,
}

/// Parse ledger text
pub fn parse(text: &str, currencies: &Currencies) -> Result<Ledger, ParseErrors> {
    let mut parser = Parser {
        currencies,
        ledger: Ledger::default(),
        errors: Vec::new(),
        tag_stack: BTreeSet::new(),
        context: Context::TopLevel,
    };

    for (index, raw) in text.lines().enumerate() {
        parser.line(index + 1, raw);
    }
    parser.close_context();

    if parser.errors.is_empty() {
        Ok(parser.ledger)
    } else {
        Err(ParseErrors(parser.errors))
    }
}

impl<'a> Parser<'a> {
    fn error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(ParseError {
            line,
            message: message.into(),
        });
    }

    fn line(&mut self, number: usize, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }

        let indented = raw.starts_with(' ') || raw.starts_with('\t');
        if indented {
            self.indented_line(number, raw, trimmed);
            return;
        }

        self.close_context();

        if trimmed.starts_with(';') || trimmed.starts_with('*') || trimmed.starts_with('#') {
            return;
        }

        if let Some(caps) = DATED_LINE.captures(trimmed) {
            self.dated_line(number, &caps[1], &caps[2], &caps[3]);
            return;
        }

        if let Some(caps) = PLUGIN_LINE.captures(trimmed) {
            self.ledger.plugins.push(caps[1].to_string());
            return;
        }

        if let Some(caps) = TAG_DIRECTIVE.captures(trimmed) {
            let tag = caps[2].to_string();
            if &caps[1] == "pushtag" {
                self.tag_stack.insert(tag);
            } else if !self.tag_stack.remove(&tag) {
                self.error(number, format!("poptag #{} without pushtag", tag));
            }
            return;
        }

        let keyword = trimmed.split_whitespace().next().unwrap_or_default();
        if matches!(keyword, "option" | "include") {
            return;
        }

        self.error(number, format!("unexpected line: {}", trimmed));
    }

    fn indented_line(&mut self, number: usize, raw: &str, trimmed: &str) {
        if trimmed.starts_with(';') {
            return;
        }

        match self.context {
            Context::Skipped => return,
            Context::TopLevel => {
                self.error(number, "indented line outside of a transaction");
                return;
            }
            Context::Transaction(_) => {}
        }

        if METADATA_LINE.is_match(raw) {
            return;
        }

        let Some(caps) = POSTING_LINE.captures(raw) else {
            self.error(number, format!("invalid posting: {}", trimmed));
            self.mark_broken();
            return;
        };

        let account: AccountPath = match caps[1].parse() {
            Ok(account) => account,
            Err(e) => {
                self.error(number, e.to_string());
                self.mark_broken();
                return;
            }
        };

        let amount = match (caps.get(2), caps.get(3)) {
            (Some(amount), Some(currency)) => match Money::parse(amount.as_str()) {
                Ok(money) => Some((money, self.currencies.kind_of(currency.as_str()))),
                Err(e) => {
                    self.error(number, e.to_string());
                    self.mark_broken();
                    return;
                }
            },
            _ => None,
        };

        let mut duplicate_elision = false;
        if let Context::Transaction(pending) = &mut self.context {
            match amount {
                Some((money, kind)) => pending
                    .entry
                    .postings
                    .push(Posting::new(account, money, kind)),
                None if pending.elided.is_some() => {
                    duplicate_elision = true;
                    pending.broken = true;
                }
                None => pending.elided = Some(account),
            }
        }
        if duplicate_elision {
            self.error(number, "only one posting may omit its amount");
        }
    }

    fn mark_broken(&mut self) {
        if let Context::Transaction(pending) = &mut self.context {
            pending.broken = true;
        }
    }

    fn dated_line(&mut self, number: usize, date: &str, keyword: &str, rest: &str) {
        let date = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                self.error(number, format!("invalid date: {}", date));
                self.context = Context::Skipped;
                return;
            }
        };

        let flag = match keyword {
            "*" | "txn" => '*',
            "!" => '!',
            k if SKIPPED_DIRECTIVES.contains(&k) => {
                self.context = Context::Skipped;
                return;
            }
            other => {
                self.error(number, format!("unknown directive: {}", other));
                self.context = Context::Skipped;
                return;
            }
        };

        match parse_header(rest) {
            Ok(header) => {
                let (payee, narration) = match header.strings.len() {
                    0 => (String::new(), String::new()),
                    1 => (String::new(), header.strings[0].clone()),
                    _ => (header.strings[0].clone(), header.strings[1].clone()),
                };
                let mut entry = Entry::new(date, payee, narration);
                entry.flag = flag;
                entry.line = number;
                entry.tags = header.tags;
                entry.tags.extend(self.tag_stack.iter().cloned());
                self.context = Context::Transaction(Pending {
                    entry,
                    elided: None,
                    broken: false,
                });
            }
            Err(message) => {
                self.error(number, message);
                self.context = Context::Skipped;
            }
        }
    }

    fn close_context(&mut self) {
        let context = std::mem::replace(&mut self.context, Context::TopLevel);
        let Context::Transaction(pending) = context else {
            return;
        };
        if pending.broken {
            return;
        }

        let Pending {
            mut entry, elided, ..
        } = pending;
        let line = entry.line;

        if let Some(account) = elided {
            let imbalances = entry.imbalances();
            match imbalances.as_slice() {
                [(kind, sum)] => entry
                    .postings
                    .push(Posting::new(account, -*sum, kind.clone())),
                [] => {
                    self.error(line, format!("nothing to balance for {}", account));
                    return;
                }
                _ => {
                    self.error(
                        line,
                        format!("cannot infer amount for {} across currencies", account),
                    );
                    return;
                }
            }
        }

        if entry.postings.len() < 2 {
            self.error(line, "transaction needs at least two postings");
            return;
        }

        let imbalances = entry.imbalances();
        if let Some((kind, sum)) = imbalances.first() {
            let currency = self.currencies.code(kind).to_string();
            self.error(
                line,
                format!("transaction does not balance: {} {}", sum, currency),
            );
            return;
        }

        self.ledger.entries.push(entry);
    }
}

struct Header {
    strings: Vec<String>,
    tags: BTreeSet<String>,
}

fn parse_header(rest: &str) -> Result<Header, String> {
    let mut header = Header {
        strings: Vec::new(),
        tags: BTreeSet::new(),
    };
    let mut chars = rest.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ';' => break,
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => value.push(other),
                    }
                }
                if !closed {
                    return Err("unterminated string".to_string());
                }
                if header.strings.len() == 2 {
                    return Err("too many strings in transaction header".to_string());
                }
                header.strings.push(value);
            }
            '#' | '^' => {
                chars.next();
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || matches!(c, '-' | '_' | '/' | '.') {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(format!("empty {} in transaction header", c));
                }
                if c == '#' {
                    header.tags.insert(name);
                }
            }
            other => return Err(format!("unexpected character '{}' in transaction header", other)),
        }
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostingKind;

    fn currencies() -> Currencies {
        Currencies::default()
    }

    const SAMPLE: &str = r#"option "title" "Budget"
plugin "budget_eur"

2024-01-01 open Assets:NL:ING:Checking59 EUR
  description: "main account"

; salary
2024-06-01 * "Fung" "Salary June" #work
    Income:NL:Fung:Salary  -2500.00 EUR
    Assets:NL:ING:Checking59

2024-06-02 * "Assign groceries" #budget
  Expenses:Variable:Groceries  200 BGT_EUR
  Income:Available  -200 BGT_EUR

2024-06-03 ! "AH" "Weekly shop"
  Expenses:Variable:Groceries  42.50 EUR ; cheese
    note: "receipt"
  Assets:NL:ING:Checking59  -42.50 EUR
"#;

    #[test]
    fn test_parse_sample() {
        let ledger = parse(SAMPLE, &currencies()).unwrap();
        assert_eq!(ledger.plugins, vec!["budget_eur".to_string()]);
        assert!(ledger.has_plugin("budget_eur"));
        assert_eq!(ledger.entries.len(), 3);

        let salary = &ledger.entries[0];
        assert_eq!(salary.payee, "Fung");
        assert_eq!(salary.narration, "Salary June");
        assert!(salary.has_tag("work"));
        assert_eq!(salary.postings[1].amount, Money::from_cents(250000));
        assert_eq!(salary.postings[1].kind, PostingKind::Cash);

        let assign = &ledger.entries[1];
        assert!(assign.has_tag("budget"));
        assert_eq!(assign.postings[0].kind, PostingKind::Allocation);

        let shop = &ledger.entries[2];
        assert_eq!(shop.flag, '!');
        assert_eq!(shop.line, 16);
        assert_eq!(shop.postings.len(), 2);
    }

    #[test]
    fn test_single_string_is_narration() {
        let text = "2024-06-01 * \"Coffee\"\n  Expenses:Variable:EatOut 3 EUR\n  Assets:Cash\n";
        let ledger = parse(text, &currencies()).unwrap();
        assert_eq!(ledger.entries[0].payee, "");
        assert_eq!(ledger.entries[0].narration, "Coffee");
    }

    #[test]
    fn test_pushtag_applies_to_enclosed_entries() {
        let text = "pushtag #budget\n2024-06-01 * \"\" \"\"\n  Expenses:Variable:Groceries 10 BGT_EUR\n  Income:Available -10 BGT_EUR\npoptag #budget\n2024-06-02 * \"\" \"\"\n  Expenses:Variable:Groceries 1 EUR\n  Assets:Cash -1 EUR\n";
        let ledger = parse(text, &currencies()).unwrap();
        assert!(ledger.entries[0].has_tag("budget"));
        assert!(!ledger.entries[1].has_tag("budget"));
    }

    #[test]
    fn test_unbalanced_transaction_is_reported() {
        let text = "2024-06-01 * \"\" \"\"\n  Expenses:Variable:Groceries 10 EUR\n  Assets:Cash -9 EUR\n";
        let err = parse(text, &currencies()).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.0[0].line, 1);
        assert!(err.0[0].message.contains("does not balance: 1.00 EUR"));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let text = "2024-06-01 * \"\" \"\"\n  expenses:food 10 EUR\n  Assets:Cash -10 EUR\n\n2024-13-01 * \"x\"\n  Assets:Cash 1 EUR\n\ngarbage here\n";
        let err = parse(text, &currencies()).unwrap_err();
        let lines: Vec<usize> = err.0.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 5, 8]);
        let rendered = err.to_string();
        assert!(rendered.contains("line 8: unexpected line: garbage here"));
    }

    #[test]
    fn test_single_posting_is_rejected() {
        let text = "2024-06-01 * \"\" \"\"\n  Assets:Cash 0 EUR\n";
        let err = parse(text, &currencies()).unwrap_err();
        assert!(err.0[0].message.contains("at least two postings"));
    }

    #[test]
    fn test_two_elided_postings_are_rejected() {
        let text = "2024-06-01 * \"\" \"\"\n  Expenses:Variable:Groceries 5 EUR\n  Assets:Cash\n  Assets:Bank\n";
        let err = parse(text, &currencies()).unwrap_err();
        assert_eq!(err.0[0].line, 4);
    }

    #[test]
    fn test_too_precise_amount_is_rejected() {
        let text = "2024-06-01 * \"\" \"\"\n  Expenses:Variable:Groceries 5.001 EUR\n  Assets:Cash\n";
        assert!(parse(text, &currencies()).is_err());
    }

    #[test]
    fn test_oversized_amounts_are_line_errors() {
        let entry = "2024-06-01 * \"\" \"\"\n  Expenses:Variable:Groceries 90000000000000000 EUR\n  Assets:Cash -90000000000000000 EUR\n";
        let text = format!("{}\n{}", entry, entry);

        let err = parse(&text, &currencies()).unwrap_err();
        assert!(!err.is_empty());
        assert!(err.0.iter().all(|e| e.message.contains("exceeds")), "{}", err);
        assert_eq!(err.0[0].line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let text = "2024-06-01 * \"AH\n  Expenses:Variable:Groceries 5 EUR\n  Assets:Cash -5 EUR\n";
        let err = parse(text, &currencies()).unwrap_err();
        assert!(err.0[0].message.contains("unterminated string"));
    }

    #[test]
    fn test_empty_text() {
        let ledger = parse("", &currencies()).unwrap();
        assert!(ledger.entries.is_empty());
    }
}
