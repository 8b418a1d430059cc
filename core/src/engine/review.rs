// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Review content rendered by the approval gate

use heapless::{String, Vec};

use super::Error;

/// Maximum review header length
pub const HEADER_LEN: usize = 32;

/// Maximum field label length
pub const LABEL_LEN: usize = 24;

/// Maximum rendered value length (fits the hex encoding of a 96 byte key)
pub const VALUE_LEN: usize = 192;

/// Maximum number of fields per review
pub const MAX_FIELDS: usize = 16;

static_assertions::const_assert!(VALUE_LEN >= 2 * crate::apdu::baker::AGGREGATION_KEY_LEN);

/// Labelled review value
#[derive(Clone, PartialEq, Debug)]
pub struct Field {
    label: String<LABEL_LEN>,
    value: String<VALUE_LEN>,
}

impl Field {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Review content, a header and a list of labelled values
#[derive(Clone, PartialEq, Debug)]
pub struct Review {
    header: String<HEADER_LEN>,
    fields: Vec<Field, MAX_FIELDS>,
}

impl Default for Review {
    fn default() -> Self {
        Self::new()
    }
}

impl Review {
    pub const fn new() -> Self {
        Self {
            header: String::new(),
            fields: Vec::new(),
        }
    }

    /// Start a new review, discarding any previous content
    pub fn start(&mut self, header: &str) -> Result<(), Error> {
        self.clear();
        self.header
            .push_str(header)
            .map_err(|_| Error::DisplayOverflow)
    }

    /// Append a labelled value
    pub fn push(&mut self, label: &str, value: &str) -> Result<(), Error> {
        let label = String::try_from(label).map_err(|_| Error::DisplayOverflow)?;
        let value = String::try_from(value).map_err(|_| Error::DisplayOverflow)?;

        self.fields
            .push(Field { label, value })
            .map_err(|_| Error::DisplayOverflow)
    }

    /// Append a value rendered by `f` into a scratch buffer
    pub fn push_with<F>(&mut self, label: &str, f: F) -> Result<(), Error>
    where
        F: for<'a> FnOnce(&'a mut [u8]) -> Result<&'a str, Error>,
    {
        let mut buff = [0u8; VALUE_LEN];
        let value = f(&mut buff)?;
        self.push(label, value)
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fetch a value by label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label() == label)
            .map(|f| f.value())
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.header.clear();
        self.fields.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::helpers::fmt_amount;

    #[test]
    fn review_fields() {
        let mut r = Review::new();
        assert!(r.is_empty());

        r.start("Transfer").unwrap();
        r.push("Sender", "abc").unwrap();
        r.push_with("Amount (GTU)", |b| fmt_amount(1_500, b)).unwrap();

        assert_eq!(r.header(), "Transfer");
        assert_eq!(r.fields().len(), 2);
        assert_eq!(r.get("Amount (GTU)"), Some("0.0015"));

        // Restarting discards previous fields
        r.start("Memo").unwrap();
        assert_eq!(r.get("Sender"), None);
    }

    #[test]
    fn review_overflow() {
        let mut r = Review::new();

        assert_eq!(
            r.start("A review header longer than the limit"),
            Err(Error::DisplayOverflow)
        );

        assert_eq!(
            r.push("A field label longer than the limit", "value"),
            Err(Error::DisplayOverflow)
        );

        r.start("Overflow").unwrap();
        for _ in 0..MAX_FIELDS {
            r.push("Field", "value").unwrap();
        }
        assert_eq!(r.push("Field", "value"), Err(Error::DisplayOverflow));
    }
}
