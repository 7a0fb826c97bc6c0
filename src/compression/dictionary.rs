//! Trie-backed LZW dictionary.
//!
//! Every node of the trie stands for one byte sequence: the bytes on the path
//! from the root down to it. Nodes live in an arena indexed by their code, so
//! a code *is* the node handle. A node keeps the byte that extends its parent's
//! sequence and a non-owning back-reference to the parent, which is all
//! [`Dictionary::resolve`] needs to spell a sequence out. The downward edges
//! (parent, next byte) -> child sit in one table owned by the dictionary
//! instead of one map per node, which keeps insertion allocation-free in the
//! common case.
//!
//! The root is the empty sequence and has no code. Its 256 children are the
//! single-byte seeds, whose codes equal their byte values, so the root needs
//! no edge table of its own.

use crate::compression::config::LzwConfig;
use crate::compression::{Code, Result};
use crate::error::Error;
use std::collections::HashMap;

/// Number of single-byte seed entries.
const SEED_COUNT: usize = 256;

/// First code handed out by [`Dictionary::insert`].
pub const FIRST_CODE: Code = SEED_COUNT as Code;

/// One trie node.
#[derive(Debug, Clone, Copy)]
struct Node {
    /// Byte appended to the parent's sequence
    byte: u8,
    /// `None` for the seeds, whose parent is the code-less root
    parent: Option<Code>,
    /// Length of the sequence this node spells
    len: u32,
}

/// Outcome of [`Dictionary::insert`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    /// A new entry was created with this code.
    Added(Code),
    /// Every code is taken; nothing was inserted.
    Full,
}

/// Longest match found by [`Dictionary::lookup_longest_prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Code of the matched sequence
    pub code: Code,
    /// Offset of the first matched byte
    pub start: usize,
    /// Offset one past the last matched byte
    pub end: usize,
}

impl Match {
    /// Number of input bytes the match covers
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: the shortest match is one byte
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Mapping between byte sequences and codes.
#[derive(Debug, Clone)]
pub struct Dictionary {
    nodes: Vec<Node>,
    children: HashMap<(Code, u8), Code>,
    limit: Code,
}

impl Dictionary {
    /// Creates a seeded dictionary that grows up to the configured maximum code.
    pub fn new(config: &LzwConfig) -> Self {
        Self::with_limit(config.code_limit())
    }

    /// Creates a seeded dictionary whose codes stay below `limit`.
    ///
    /// Limits below 257 are raised to 257 so at least one entry can be added.
    pub fn with_limit(limit: Code) -> Self {
        let mut dict = Dictionary {
            nodes: Vec::with_capacity(SEED_COUNT),
            children: HashMap::new(),
            limit: limit.max(FIRST_CODE + 1),
        };
        dict.reset();
        dict
    }

    /// Drops every learned entry and restores the 256 single-byte seeds.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.children.clear();
        self.nodes.extend((0..SEED_COUNT).map(|byte| Node {
            byte: byte as u8,
            parent: None,
            len: 1,
        }));
    }

    /// Number of entries, seeds included
    pub fn entry_count(&self) -> usize {
        self.nodes.len()
    }

    /// Code the next successful [`insert`](Self::insert) will return, or the
    /// limit itself once the dictionary is full.
    pub fn next_code(&self) -> Code {
        self.nodes.len() as Code
    }

    /// First code value this dictionary will never assign
    pub fn limit(&self) -> Code {
        self.limit
    }

    /// True once every code below the limit is assigned.
    pub fn is_full(&self) -> bool {
        self.next_code() >= self.limit
    }

    /// True if `code` has been assigned.
    pub fn contains(&self, code: Code) -> bool {
        (code as usize) < self.nodes.len()
    }

    /// Length of the sequence behind `code`, if assigned.
    pub fn sequence_len(&self, code: Code) -> Option<usize> {
        self.nodes.get(code as usize).map(|node| node.len as usize)
    }

    /// Code of the sequence `code` extended by `byte`, if that entry exists.
    pub fn child(&self, code: Code, byte: u8) -> Option<Code> {
        self.children.get(&(code, byte)).copied()
    }

    /// Walks the trie from `bytes[start]` for as long as a child exists.
    ///
    /// Returns `None` only when `start` is past the end of `bytes`; otherwise
    /// the match is at least the single byte at `start`, which is always seeded.
    ///
    /// # Example
    ///
    /// ```
    /// use lzw_trie::compression::{Dictionary, Insert, LzwConfig};
    ///
    /// let mut dict = Dictionary::new(&LzwConfig::default());
    /// assert_eq!(dict.insert(b'a' as u32, b'b'), Insert::Added(256));
    ///
    /// let m = dict.lookup_longest_prefix(b"abc", 0).unwrap();
    /// assert_eq!((m.code, m.end), (256, 2));
    /// ```
    pub fn lookup_longest_prefix(&self, bytes: &[u8], start: usize) -> Option<Match> {
        let mut code = Code::from(*bytes.get(start)?);
        let mut end = start + 1;

        while let Some(&byte) = bytes.get(end) {
            match self.child(code, byte) {
                Some(child) => {
                    code = child;
                    end += 1;
                }
                None => break,
            }
        }

        Some(Match { code, start, end })
    }

    /// Adds the sequence of `parent_code` extended by `next_byte`.
    ///
    /// Returns [`Insert::Full`] without touching the dictionary once the code
    /// space is exhausted.
    ///
    /// # Panics
    ///
    /// Panics if `parent_code` has not been assigned.
    pub fn insert(&mut self, parent_code: Code, next_byte: u8) -> Insert {
        let parent_len = match self.nodes.get(parent_code as usize) {
            Some(parent) => parent.len,
            None => panic!("insert under unassigned code {}", parent_code),
        };
        if self.is_full() {
            return Insert::Full;
        }

        let code = self.next_code();
        self.nodes.push(Node {
            byte: next_byte,
            parent: Some(parent_code),
            len: parent_len + 1,
        });
        self.children.insert((parent_code, next_byte), code);

        Insert::Added(code)
    }

    /// Returns the byte sequence behind `code`.
    pub fn resolve(&self, code: Code) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.resolve_into(code, &mut out)?;
        Ok(out)
    }

    /// Appends the byte sequence behind `code` to `out`.
    ///
    /// On error `out` is left untouched.
    pub fn resolve_into(&self, code: Code, out: &mut Vec<u8>) -> Result<()> {
        let len = self
            .sequence_len(code)
            .ok_or(Error::UnknownCode { code, offset: None })?;

        // The parent walk yields the sequence back to front, so fill the
        // reserved tail from its end instead of reversing afterwards.
        let start = out.len();
        out.resize(start + len, 0);
        let mut pos = out.len();
        let mut cursor = Some(code);
        while let Some(current) = cursor {
            let node = &self.nodes[current as usize];
            pos -= 1;
            out[pos] = node.byte;
            cursor = node.parent;
        }
        debug_assert_eq!(pos, start);

        Ok(())
    }
}
