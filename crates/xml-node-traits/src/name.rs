//! Name registry and document number allocation.
//!
//! The registry interns (prefix, URI, local-name) triples into small
//! integer name codes. Two nodes with the same name code have the same
//! prefix, namespace URI and local name. Masking a code with
//! [`FINGERPRINT_MASK`] yields a fingerprint: two nodes with the same
//! fingerprint have the same namespace URI and local name, regardless
//! of prefix.

use std::collections::HashMap;

/// Coded form of a node name
pub type NameCode = i32;

/// Name code reported by unnamed node kinds
pub const NO_NAME: NameCode = -1;

/// Mask extracting the (URI, local-name) fingerprint from a name code
pub const FINGERPRINT_MASK: NameCode = 0xf_ffff;

const PREFIX_SHIFT: u32 = 20;

/// Trait for name registries consumed by node adapters.
///
/// Implementations must be idempotent and consistent: the same triple
/// always yields the same code.
pub trait NameRegistry {
    /// Intern a (prefix, URI, local-name) triple into a name code
    fn allocate(&mut self, prefix: &str, uri: &str, local: &str) -> NameCode;
}

/// Trait for allocators handing out document numbers
pub trait DocumentNumberAllocator {
    /// Allocate the next document number; strictly increasing
    fn allocate_document_number(&mut self) -> u64;
}

/// Interning name registry.
///
/// Fingerprints occupy the low 20 bits of a code and identify the
/// (URI, local-name) pair; the prefix index is held in the bits above.
#[derive(Debug, Default)]
pub struct NamePool {
    fingerprints: HashMap<(String, String), NameCode>,
    prefixes: Vec<String>,
    prefix_index: HashMap<String, NameCode>,
}

impl NamePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the (URI, local-name) fingerprint from a name code
    pub fn fingerprint(code: NameCode) -> NameCode {
        if code == NO_NAME {
            NO_NAME
        } else {
            code & FINGERPRINT_MASK
        }
    }

    fn prefix_code(&mut self, prefix: &str) -> NameCode {
        if let Some(&idx) = self.prefix_index.get(prefix) {
            return idx;
        }
        let idx = self.prefixes.len() as NameCode;
        self.prefixes.push(prefix.to_string());
        self.prefix_index.insert(prefix.to_string(), idx);
        idx
    }

    /// Look up the prefix string held at a code's prefix index
    pub fn prefix_for_code(&self, code: NameCode) -> Option<&str> {
        let idx = (code >> PREFIX_SHIFT) as usize;
        self.prefixes.get(idx).map(String::as_str)
    }
}

impl NameRegistry for NamePool {
    /// # Panics
    ///
    /// Panics when more than [`FINGERPRINT_MASK`] + 1 distinct
    /// (URI, local-name) pairs have been interned; a code past that
    /// point would corrupt the prefix bits.
    fn allocate(&mut self, prefix: &str, uri: &str, local: &str) -> NameCode {
        let key = (uri.to_string(), local.to_string());
        let fp = match self.fingerprints.get(&key) {
            Some(&fp) => fp,
            None => {
                let next = self.fingerprints.len() as NameCode;
                assert!(
                    next <= FINGERPRINT_MASK,
                    "name pool fingerprint space exhausted"
                );
                self.fingerprints.insert(key, next);
                next
            }
        };
        let pidx = self.prefix_code(prefix);
        (pidx << PREFIX_SHIFT) | fp
    }
}

/// Engine-side configuration consumed by wrapped documents: the name
/// pool plus the document number allocator.
#[derive(Debug, Default)]
pub struct Configuration {
    name_pool: NamePool,
    next_document_number: u64,
}

impl Configuration {
    /// Create a fresh configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access to the name pool
    pub fn name_pool(&self) -> &NamePool {
        &self.name_pool
    }

    /// Mutable access to the name pool
    pub fn name_pool_mut(&mut self) -> &mut NamePool {
        &mut self.name_pool
    }
}

impl NameRegistry for Configuration {
    fn allocate(&mut self, prefix: &str, uri: &str, local: &str) -> NameCode {
        self.name_pool.allocate(prefix, uri, local)
    }
}

impl DocumentNumberAllocator for Configuration {
    fn allocate_document_number(&mut self) -> u64 {
        let n = self.next_document_number;
        self.next_document_number += 1;
        n
    }
}
