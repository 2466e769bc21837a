// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Fresh name generation for engine temporaries
//!
//! One counter is shared by every prefix (`__arg`, `__fbound`, `__fdir`,
//! `__fstep`), so names are unique within one run but not stable across runs.

#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused name with the given prefix, e.g. `__arg3`
    pub fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.next);
        self.next += 1;
        name
    }
}
