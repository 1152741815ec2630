//! Write/read caches for repeated cacheable strings.
//!
//! The writer assigns `^`-prefixed codes to cacheable strings in emission
//! order; the reader rebuilds the same table in consumption order. The two
//! counters stay synchronized without any handshake as long as both sides
//! wrap at the same limit.

use std::collections::HashMap;

use crate::error::Error;

/// Number of code digits in the cache alphabet. Wire-compatibility
/// parameter: peers must agree on this and on [`BASE_CHAR_INDEX`].
pub const CACHE_CODE_DIGITS: usize = 44;

/// First character of the code alphabet (`'0'`).
pub const BASE_CHAR_INDEX: usize = 48;

/// Maximum number of live cache entries per stream; reaching it discards
/// the table and restarts from index 0.
pub const MAX_CACHE_ENTRIES: usize = CACHE_CODE_DIGITS * CACHE_CODE_DIGITS;

/// Minimum string length (in bytes) for a string to be cacheable.
pub const MIN_SIZE_CACHEABLE: usize = 4;

/// Code prefix character.
pub const SUB_CHAR: u8 = b'^';

/// First element of an array-rendered map in compact JSON. Never a cache
/// code: `' '` is below the code alphabet.
pub const MAP_AS_ARRAY_MARKER: &str = "^ ";

/// Cacheable strings are tag strings, keyword and symbol reps, and any
/// string in map-key position — when long enough.
pub fn is_cacheable(s: &str, as_map_key: bool) -> bool {
    let b = s.as_bytes();
    b.len() >= MIN_SIZE_CACHEABLE
        && (as_map_key || (b[0] == b'~' && matches!(b[1], b':' | b'$' | b'#')))
}

/// True for strings that are cache codes on the wire (`^` prefix, but not
/// the map marker).
pub fn is_cache_code(s: &str) -> bool {
    let b = s.as_bytes();
    matches!(b.len(), 2 | 3) && b[0] == SUB_CHAR && s != MAP_AS_ARRAY_MARKER
}

fn index_to_code(index: usize) -> String {
    let hi = index / CACHE_CODE_DIGITS;
    let lo = index % CACHE_CODE_DIGITS;
    let mut code = String::with_capacity(3);
    code.push(SUB_CHAR as char);
    if hi != 0 {
        code.push((BASE_CHAR_INDEX + hi) as u8 as char);
    }
    code.push((BASE_CHAR_INDEX + lo) as u8 as char);
    code
}

fn digit(b: u8) -> Option<usize> {
    let d = (b as usize).checked_sub(BASE_CHAR_INDEX)?;
    (d < CACHE_CODE_DIGITS).then_some(d)
}

fn code_to_index(code: &str) -> Option<usize> {
    let b = code.as_bytes();
    match b.len() {
        2 => digit(b[1]),
        3 => Some(digit(b[1])? * CACHE_CODE_DIGITS + digit(b[2])?),
        _ => None,
    }
}

/// Write-side cache: string → code, owned by exactly one encode stream.
#[derive(Debug, Default)]
pub struct WriteCache {
    codes: HashMap<String, String>,
    index: usize,
}

impl WriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `s` if it was already emitted in this stream.
    /// Otherwise registers it (when eligible) and returns `None`, meaning
    /// the literal string goes on the wire.
    pub fn convert(&mut self, s: &str, as_map_key: bool) -> Option<String> {
        if !is_cacheable(s, as_map_key) {
            return None;
        }
        if let Some(code) = self.codes.get(s) {
            return Some(code.clone());
        }
        if self.index == MAX_CACHE_ENTRIES {
            self.codes.clear();
            self.index = 0;
        }
        self.codes.insert(s.to_owned(), index_to_code(self.index));
        self.index += 1;
        None
    }
}

/// Read-side cache: index → string, owned by exactly one decode stream.
#[derive(Debug, Default)]
pub struct ReadCache {
    entries: Vec<String>,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a literal wire string at the next index, mirroring the
    /// write side.
    pub fn cache(&mut self, s: &str, as_map_key: bool) {
        if !is_cacheable(s, as_map_key) {
            return;
        }
        if self.entries.len() == MAX_CACHE_ENTRIES {
            self.entries.clear();
        }
        self.entries.push(s.to_owned());
    }

    /// Resolves a cache code back to the wire string it stands for.
    ///
    /// A code pointing past the table means the stream and the cache have
    /// desynchronized — that is stream corruption, not recoverable.
    pub fn resolve(&self, code: &str) -> Result<&str, Error> {
        code_to_index(code)
            .and_then(|idx| self.entries.get(idx))
            .map(String::as_str)
            .ok_or_else(|| Error::CacheDesync(code.to_owned()))
    }
}
