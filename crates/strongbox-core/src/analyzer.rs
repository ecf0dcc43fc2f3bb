//! Password health analysis over decrypted records.
//!
//! Pure data analysis: it takes already-decrypted records and never touches
//! keys or ciphertext.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::storage::DecryptedRecord;

/// Records not updated for this many days are stale.
pub const STALE_AFTER_DAYS: i64 = 180;

const WEAK_PENALTY: f64 = 40.0;
const REUSED_PENALTY: f64 = 30.0;
const STALE_PENALTY: f64 = 15.0;
const STRONG_BONUS: f64 = 5.0;
const STRONG_BONUS_RATIO: f64 = 0.8;

/// Strength band of a single password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=39 => PasswordStrength::Weak,
            40..=59 => PasswordStrength::Medium,
            60..=74 => PasswordStrength::Strong,
            _ => PasswordStrength::VeryStrong,
        }
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, PasswordStrength::Strong | PasswordStrength::VeryStrong)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "weak",
            PasswordStrength::Medium => "medium",
            PasswordStrength::Strong => "strong",
            PasswordStrength::VeryStrong => "very-strong",
        }
    }
}

/// Deterministic 0..=100 strength score.
///
/// - +10 each for length >= 8, >= 12, >= 16
/// - +10 for each class present: lowercase, uppercase, digit, other
/// - up to +20 for the ratio of distinct characters to length
pub fn password_score(password: &str) -> u32 {
    let chars: Vec<char> = password.chars().collect();
    if chars.is_empty() {
        return 0;
    }

    let length = chars.len();
    let mut score = 0u32;
    for threshold in [8, 12, 16] {
        if length >= threshold {
            score += 10;
        }
    }

    let classes = [
        chars.iter().any(|c| c.is_lowercase()),
        chars.iter().any(|c| c.is_uppercase()),
        chars.iter().any(|c| c.is_ascii_digit()),
        chars.iter().any(|c| !c.is_alphanumeric()),
    ];
    score += 10 * classes.iter().filter(|present| **present).count() as u32;

    let unique = chars.iter().collect::<HashSet<_>>().len();
    score += (unique * 20 / length) as u32;

    score.min(100)
}

/// Strength band of `password`.
pub fn classify_password(password: &str) -> PasswordStrength {
    PasswordStrength::from_score(password_score(password))
}

/// What kind of problem an issue describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    WeakPassword { strength: PasswordStrength },
    ReusedPassword,
    StalePassword { age_days: i64 },
}

/// A finding, listing the affected records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityIssue {
    #[serde(flatten)]
    pub kind: IssueKind,
    pub record_ids: Vec<Uuid>,
}

/// Per-record strength.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordStrength {
    pub id: Uuid,
    pub score: u32,
    pub strength: PasswordStrength,
}

/// Aggregate result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    /// Overall 0..=100 health score
    pub score: u8,
    pub total_passwords: usize,
    pub weak_passwords: usize,
    /// Records whose password is shared with at least one other record
    pub reused_passwords: usize,
    pub stale_passwords: usize,
    pub strong_passwords: usize,
    pub strengths: Vec<RecordStrength>,
    pub issues: Vec<SecurityIssue>,
}

impl SecurityReport {
    pub fn issues_of(&self, predicate: impl Fn(&IssueKind) -> bool) -> Vec<&SecurityIssue> {
        self.issues.iter().filter(|issue| predicate(&issue.kind)).collect()
    }
}

/// Analyze a decrypted collection as of `now`.
///
/// Records with an empty password (secure notes, for example) are skipped.
pub fn analyze(records: &[DecryptedRecord], now: DateTime<Utc>) -> SecurityReport {
    let scored: Vec<&DecryptedRecord> = records
        .iter()
        .filter(|entry| !entry.record.password.is_empty())
        .collect();
    let total = scored.len();

    let mut strengths = Vec::with_capacity(total);
    let mut issues = Vec::new();
    let mut weak = 0usize;
    let mut strong = 0usize;

    for entry in &scored {
        let score = password_score(&entry.record.password);
        let strength = PasswordStrength::from_score(score);
        if strength == PasswordStrength::Weak {
            weak += 1;
            issues.push(SecurityIssue {
                kind: IssueKind::WeakPassword { strength },
                record_ids: vec![entry.id],
            });
        }
        if strength.is_strong() {
            strong += 1;
        }
        strengths.push(RecordStrength {
            id: entry.id,
            score,
            strength,
        });
    }

    // BTreeMap keeps issue order independent of hashing.
    let mut groups: BTreeMap<&str, Vec<Uuid>> = BTreeMap::new();
    for entry in &scored {
        groups
            .entry(entry.record.password.as_str())
            .or_default()
            .push(entry.id);
    }
    let mut reused = 0usize;
    for ids in groups.into_values().filter(|ids| ids.len() >= 2) {
        reused += ids.len();
        issues.push(SecurityIssue {
            kind: IssueKind::ReusedPassword,
            record_ids: ids,
        });
    }

    let stale_cutoff = Duration::days(STALE_AFTER_DAYS);
    let mut stale = 0usize;
    for entry in &scored {
        let age = now.signed_duration_since(entry.updated_at);
        if age > stale_cutoff {
            stale += 1;
            issues.push(SecurityIssue {
                kind: IssueKind::StalePassword {
                    age_days: age.num_days(),
                },
                record_ids: vec![entry.id],
            });
        }
    }

    SecurityReport {
        score: overall_score(total, weak, reused, stale, strong),
        total_passwords: total,
        weak_passwords: weak,
        reused_passwords: reused,
        stale_passwords: stale,
        strong_passwords: strong,
        strengths,
        issues,
    }
}

fn overall_score(total: usize, weak: usize, reused: usize, stale: usize, strong: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let total = total as f64;
    let mut score = 100.0;
    score -= WEAK_PENALTY * (weak as f64 / total);
    score -= REUSED_PENALTY * (reused as f64 / total);
    score -= STALE_PENALTY * (stale as f64 / total);
    if strong as f64 / total >= STRONG_BONUS_RATIO {
        score += STRONG_BONUS;
    }
    score.clamp(0.0, 100.0).round() as u8
}
