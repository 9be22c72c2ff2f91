//! Curated keyword groups
//!
//! A keyword group maps a canonical display term to the surface forms that
//! count toward it. "ปลูกต้นไม้" and "ปลูกไผ่" both show up in the word cloud
//! as "ปลูก".

use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Air-quality keyword groups, in display-priority order
const DEFAULT_KEYWORD_GROUPS: &[(&str, &[&str])] = &[
    ("ปลูก", &["ปลูกต้นไม้", "ปลูกไผ่", "ปลูกพืช"]),
    ("กรอง", &["กรองอากาศ", "เครื่องกรอง", "กรองฝุ่น"]),
    ("ลด", &["ลดฝุ่น", "ลดมลพิษ", "ลดการเผา"]),
    ("เผา", &["ไม่เผา", "เผาใส", "เผาขยะ"]),
    ("รณรงค์", &["รณรงค์"]),
    ("DIY", &["DIY", "ทำเอง"]),
    ("HEPA", &["HEPA", "ไส้กรอง"]),
    ("พัดลม", &["พัดลม"]),
    ("ไผ่", &["ไผ่", "ต้นไผ่"]),
    ("ปุ่ย", &["ปุ่ยหมัก", "ปุ่ยชีวภาพ"]),
    ("หมัก", &["หมัก", "ย่อยสลาย"]),
    ("น้ำ", &["น้ำพ่น", "พ่นน้ำ"]),
    ("ถนน", &["ถนน", "ท้องถนน"]),
];

/// One canonical term and its recognized variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub term: String,
    pub variants: Vec<String>,
}

impl KeywordGroup {
    pub fn new<S: Into<String>>(term: S, variants: Vec<String>) -> Self {
        Self { term: term.into(), variants }
    }
}

#[derive(Debug, Clone)]
struct CompiledGroup {
    group: KeywordGroup,
    folded_variants: Vec<String>,
}

/// Ordered, immutable keyword table with variants pre-folded for matching
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    groups: Vec<CompiledGroup>,
}

impl KeywordTable {
    pub fn new(groups: Vec<KeywordGroup>) -> Self {
        let groups = groups
            .into_iter()
            .map(|group| {
                let folded_variants = group
                    .variants
                    .iter()
                    .map(|v| v.to_lowercase())
                    .filter(|v| !v.is_empty())
                    .collect();
                CompiledGroup { group, folded_variants }
            })
            .collect();
        Self { groups }
    }

    pub fn thai_default() -> Self {
        Self::new(
            DEFAULT_KEYWORD_GROUPS
                .iter()
                .map(|(term, variants)| {
                    KeywordGroup::new(*term, variants.iter().map(|v| v.to_string()).collect())
                })
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `[{"term": "...", "variants": ["..."]}]`, keeping file order
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword file {}", path.display()))?;
        let groups: Vec<KeywordGroup> = serde_json::from_str(&raw)
            .with_context(|| format!("Keyword file {} is not a list of keyword groups", path.display()))?;
        info!("Loaded {} keyword groups from {}", groups.len(), path.display());
        Ok(Self::new(groups))
    }

    pub fn groups(&self) -> impl Iterator<Item = &KeywordGroup> {
        self.groups.iter().map(|g| &g.group)
    }

    /// Canonical term paired with its case-folded variants
    pub(crate) fn folded(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|g| (g.group.term.as_str(), g.folded_variants.as_slice()))
    }

    /// True when `folded_token` and some variant contain one another.
    /// Such tokens are already represented by a canonical term.
    pub fn overlaps_variant(&self, folded_token: &str) -> bool {
        self.groups
            .iter()
            .flat_map(|g| g.folded_variants.iter())
            .any(|v| v.contains(folded_token) || folded_token.contains(v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
