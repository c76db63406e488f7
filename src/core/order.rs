//! Purpose: Book order systems: named canon orderings over book codes.
//! Exports: `BookOrderSystem`, `BookOrders`, `OrderMatch`.
//! Role: Serves the code→index and index→code directions of the order tables.
//! Invariants: Index numbers are 1-based and contiguous within a system.
//! Invariants: A system never lists the same book code twice.

use crate::core::code::BookCode;
use crate::core::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOrderSystem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub books: Vec<BookCode>,
}

impl BookOrderSystem {
    /// 1-based position of `code` in this order, if present.
    pub fn position_of(&self, code: BookCode) -> Option<u16> {
        self.books
            .iter()
            .position(|book| *book == code)
            .map(|idx| (idx + 1) as u16)
    }

    /// Book at 1-based `index`, if in range.
    pub fn book_at(&self, index: u16) -> Option<BookCode> {
        if index == 0 {
            return None;
        }
        self.books.get(usize::from(index) - 1).copied()
    }

    pub fn contains(&self, code: BookCode) -> bool {
        self.books.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// How a probe ordering relates to one known system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderMatch {
    Exact,
    /// Same length, first divergence at this 1-based position.
    DiffersAt {
        index: u16,
        expected: BookCode,
        found: BookCode,
    },
    /// Different book counts.
    LengthMismatch {
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Debug, Default)]
pub struct BookOrders {
    systems: Vec<BookOrderSystem>,
    by_name: HashMap<String, usize>,
}

impl BookOrders {
    pub fn from_systems(systems: Vec<BookOrderSystem>) -> Result<Self, Error> {
        let mut registry = Self {
            systems,
            ..Self::default()
        };
        for (idx, system) in registry.systems.iter().enumerate() {
            if registry.by_name.insert(system.name.clone(), idx).is_some() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message(format!("duplicate book order system '{}'", system.name))
                    .with_table("orders"));
            }
            let mut seen: HashMap<BookCode, u16> = HashMap::new();
            for (pos, code) in system.books.iter().enumerate() {
                let index = (pos + 1) as u16;
                if let Some(first) = seen.insert(*code, index) {
                    return Err(Error::new(ErrorKind::Invalid)
                        .with_message(format!(
                            "book listed twice in '{}' (positions {first} and {index})",
                            system.name
                        ))
                        .with_table("orders")
                        .with_code(code.as_str()));
                }
            }
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&BookOrderSystem> {
        self.by_name.get(name).map(|idx| &self.systems[*idx])
    }

    pub fn require(&self, name: &str) -> Result<&BookOrderSystem, Error> {
        self.get(name).ok_or_else(|| {
            Error::new(ErrorKind::NotFound)
                .with_message("unknown book order system")
                .with_table("orders")
                .with_code(name)
                .with_hint("Use `canonkit order list` to see known systems.")
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookOrderSystem> {
        self.systems.iter()
    }

    /// Compare a probe ordering against every known system, in dataset
    /// order. Exact matches come back with `OrderMatch::Exact`.
    pub fn identify(&self, probe: &[BookCode]) -> Vec<(String, OrderMatch)> {
        self.systems
            .iter()
            .map(|system| (system.name.clone(), compare_order(&system.books, probe)))
            .collect()
    }
}

fn compare_order(expected: &[BookCode], found: &[BookCode]) -> OrderMatch {
    if expected.len() != found.len() {
        return OrderMatch::LengthMismatch {
            expected: expected.len(),
            found: found.len(),
        };
    }
    for (pos, (want, got)) in expected.iter().zip(found).enumerate() {
        if want != got {
            return OrderMatch::DiffersAt {
                index: (pos + 1) as u16,
                expected: *want,
                found: *got,
            };
        }
    }
    OrderMatch::Exact
}
