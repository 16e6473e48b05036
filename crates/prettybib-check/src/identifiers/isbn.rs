use crate::error::{CheckError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn {
    pub raw: String,
    pub kind: IsbnKind,
    /// Digits only (plus a trailing `X` for ISBN-10).
    pub compact: String,
    pub isbn13: String,
    /// ISBN-13 values are recognized by shape; a wrong check digit is kept
    /// here instead of failing the parse.
    pub checksum_valid: bool,
}

fn strip_isbn(input: &str) -> Option<String> {
    let mut compact = String::with_capacity(13);
    for c in input.trim().chars() {
        match c {
            '-' | ' ' => {}
            c if c.is_ascii_digit() => compact.push(c),
            'x' | 'X' => compact.push('X'),
            _ => return None,
        }
    }
    Some(compact)
}

fn check_isbn10(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| (10 - i as u32) * d)
        .sum();
    sum % 11 == 0
}

fn isbn13_check_digit(first12: &[u32]) -> u32 {
    let sum: u32 = first12
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();
    (10 - (sum % 10)) % 10
}

fn isbn10_to_isbn13(digits10: &[u32]) -> String {
    let mut d13: Vec<u32> = vec![9, 7, 8];
    d13.extend_from_slice(&digits10[..9]);
    let check = isbn13_check_digit(&d13);
    d13.push(check);
    d13.iter().map(|d| d.to_string()).collect()
}

fn default_mask(compact: &str) -> String {
    match compact.len() {
        13 => format!(
            "{}-{}-{}-{}-{}",
            &compact[0..3],
            &compact[3..4],
            &compact[4..8],
            &compact[8..12],
            &compact[12..13]
        ),
        10 => format!(
            "{}-{}-{}-{}",
            &compact[0..1],
            &compact[1..5],
            &compact[5..9],
            &compact[9..10]
        ),
        _ => compact.to_string(),
    }
}

impl Isbn {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || CheckError::InvalidIsbn(input.to_string());
        let compact = strip_isbn(input).ok_or_else(invalid)?;

        if compact.len() == 13 {
            if !compact.chars().all(|c| c.is_ascii_digit())
                || !(compact.starts_with("978") || compact.starts_with("979"))
            {
                return Err(invalid());
            }
            let digits: Vec<u32> = compact.chars().filter_map(|c| c.to_digit(10)).collect();
            let checksum_valid = isbn13_check_digit(&digits[..12]) == digits[12];
            return Ok(Self {
                raw: input.to_string(),
                kind: IsbnKind::Isbn13,
                isbn13: compact.clone(),
                compact,
                checksum_valid,
            });
        }

        if compact.len() == 10 {
            let mut digits: Vec<u32> = Vec::with_capacity(10);
            for (i, c) in compact.chars().enumerate() {
                match c.to_digit(10) {
                    Some(d) => digits.push(d),
                    None if i == 9 && c == 'X' => digits.push(10),
                    None => return Err(invalid()),
                }
            }
            if !check_isbn10(&digits) {
                return Err(invalid());
            }
            return Ok(Self {
                raw: input.to_string(),
                kind: IsbnKind::Isbn10,
                isbn13: isbn10_to_isbn13(&digits),
                compact,
                checksum_valid: true,
            });
        }

        Err(invalid())
    }

    /// Hyphenated form. Hyphenation already present in the input is kept when
    /// it has the right number of groups; otherwise a fixed grouping is used.
    pub fn masked(&self) -> String {
        let groups: Vec<&str> = self.raw.trim().split('-').collect();
        let expected_groups = match self.kind {
            IsbnKind::Isbn10 => 4,
            IsbnKind::Isbn13 => 5,
        };
        if groups.len() == expected_groups && groups.iter().all(|g| !g.is_empty() && !g.contains(' ')) {
            return self.raw.trim().to_uppercase();
        }
        default_mask(&self.compact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_isbn13() {
        let isbn = Isbn::parse("9780306406157").unwrap();
        assert_eq!(isbn.kind, IsbnKind::Isbn13);
        assert!(isbn.checksum_valid);
        assert_eq!(isbn.masked(), "978-0-3064-0615-7");
    }

    #[test]
    fn isbn13_with_hyphens_keeps_them() {
        let isbn = Isbn::parse("978-0-306-40615-7").unwrap();
        assert_eq!(isbn.compact, "9780306406157");
        assert_eq!(isbn.masked(), "978-0-306-40615-7");
    }

    #[test]
    fn valid_isbn10_converts_to_isbn13() {
        let isbn = Isbn::parse("0-19-853453-1").unwrap();
        assert_eq!(isbn.kind, IsbnKind::Isbn10);
        assert_eq!(isbn.isbn13, "9780198534532");
        assert_eq!(isbn.masked(), "0-19-853453-1");
    }

    #[test]
    fn isbn10_with_x_check() {
        let isbn = Isbn::parse("007462542x").unwrap();
        assert_eq!(isbn.compact, "007462542X");
        assert_eq!(isbn.masked(), "0-0746-2542-X");
    }

    #[test]
    fn isbn13_with_wrong_check_digit_is_flagged() {
        let isbn = Isbn::parse("978-0-19-853453-6").unwrap();
        assert_eq!(isbn.kind, IsbnKind::Isbn13);
        assert!(!isbn.checksum_valid);
    }

    #[test]
    fn isbn10_with_wrong_check_digit_is_rejected() {
        assert!(Isbn::parse("0198534530").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Isbn::parse("not an isbn").is_err());
        assert!(Isbn::parse("1234567890123").is_err());
        assert!(Isbn::parse("").is_err());
    }
}
