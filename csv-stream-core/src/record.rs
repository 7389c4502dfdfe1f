use core::ops;
use core::slice;
use std::iter::FromIterator;
use std::vec;

/// A single CSV record: an ordered sequence of fields.
///
/// Records handed out by the parser are owned snapshots. The parser never
/// keeps a reference to a record after emitting it.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Record(Vec<String>);

impl Record {
    /// Create a new empty record.
    pub fn new() -> Record {
        Record(Vec::new())
    }

    /// Create a new empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Record {
        Record(Vec::with_capacity(capacity))
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(|f| f.as_str())
    }

    /// Returns true if and only if this record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields in this record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Add a new field to the end of this record.
    pub fn push_field<S: Into<String>>(&mut self, field: S) {
        self.0.push(field.into());
    }

    /// Returns an iterator over all fields in this record.
    pub fn iter(&self) -> RecordIter {
        RecordIter(self.0.iter())
    }

    /// Return the fields as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Convert this record into its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Record {
        Record(fields)
    }
}

impl<'a> From<&'a [&'a str]> for Record {
    fn from(fields: &'a [&'a str]) -> Record {
        fields.iter().collect()
    }
}

impl<T: AsRef<str>> FromIterator<T> for Record {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Record {
        Record(iter.into_iter().map(|f| f.as_ref().to_string()).collect())
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Record {
    fn eq(&self, other: &[T]) -> bool {
        self.0.len() == other.len()
            && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Record {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == other[..]
    }
}

impl ops::Index<usize> for Record {
    type Output = str;
    fn index(&self, i: usize) -> &str {
        &self.0[i]
    }
}

impl IntoIterator for Record {
    type Item = String;
    type IntoIter = vec::IntoIter<String>;
    fn into_iter(self) -> vec::IntoIter<String> {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a str;
    type IntoIter = RecordIter<'a>;
    fn into_iter(self) -> RecordIter<'a> {
        self.iter()
    }
}

/// An iterator over the fields in a record.
#[derive(Clone, Debug)]
pub struct RecordIter<'a>(slice::Iter<'a, String>);

impl<'a> Iterator for RecordIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.0.next().map(|f| f.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> DoubleEndedIterator for RecordIter<'a> {
    fn next_back(&mut self) -> Option<&'a str> {
        self.0.next_back().map(|f| f.as_str())
    }
}

impl<'a> ExactSizeIterator for RecordIter<'a> {}

#[cfg(test)]
mod tests {
    use super::Record;

    #[test]
    fn fields() {
        let mut rec = Record::new();
        assert!(rec.is_empty());
        rec.push_field("a");
        rec.push_field(String::from("b"));
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get(0), Some("a"));
        assert_eq!(rec.get(2), None);
        assert_eq!(&rec[1], "b");
        assert_eq!(rec.iter().rev().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn compare_with_vec() {
        let rec: Record = vec!["x", "", "z"].into_iter().collect();
        assert_eq!(rec, vec!["x", "", "z"]);
        assert_ne!(rec, vec!["x", "z"]);
        assert_eq!(rec.into_fields(), vec!["x", "", "z"]);
    }
}
