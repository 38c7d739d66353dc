//! Master-key strength policy.
//!
//! The score is 0-100: four character-class requirements plus a length
//! requirement each carry an equal share.  Every unmet requirement costs
//! one share, and the score never drops below 10.  The vault refuses
//! master keys scoring below the configured minimum (default 50), so a
//! client that skips its own meter still cannot create a weak vault.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{PassVaultError, Result};

/// Default minimum score a master key needs.
pub const DEFAULT_MIN_STRENGTH: u8 = 50;

/// Minimum length (exclusive) before the length requirement is met.
const LENGTH_THRESHOLD: usize = 7;

/// Lowest score ever reported.
const SCORE_FLOOR: f64 = 10.0;

struct Requirement {
    re: Regex,
    label: &'static str,
}

static REQUIREMENTS: LazyLock<Vec<Requirement>> = LazyLock::new(|| {
    [
        (r"[0-9]", "Includes number"),
        (r"[a-z]", "Includes lowercase letter"),
        (r"[A-Z]", "Includes uppercase letter"),
        (r"[$&+,:;=?@#|'<>.^*()%!-]", "Includes special symbol"),
    ]
    .into_iter()
    .map(|(pattern, label)| Requirement {
        // Patterns are compile-time constants.
        re: Regex::new(pattern).unwrap_or_else(|e| panic!("bad requirement regex: {e}")),
        label,
    })
    .collect()
});

/// One line of a strength report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: &'static str,
    pub met: bool,
}

/// Full breakdown of a master key's strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthReport {
    pub score: u8,
    pub checks: Vec<Check>,
}

impl StrengthReport {
    /// Meter colour bucket: `"teal"` at 100, `"yellow"` above 50, else `"red"`.
    pub fn band(&self) -> &'static str {
        match self.score {
            100 => "teal",
            s if s > 50 => "yellow",
            _ => "red",
        }
    }
}

/// Score a candidate master key.
pub fn strength(master_key: &str) -> u8 {
    report(master_key).score
}

/// Score a candidate master key and list each requirement.
pub fn report(master_key: &str) -> StrengthReport {
    // Length in UTF-16 code units, as the desktop meter measures it.
    let long_enough = master_key.encode_utf16().count() > LENGTH_THRESHOLD;

    let mut checks = Vec::with_capacity(REQUIREMENTS.len() + 1);
    checks.push(Check {
        label: "Includes at least 8 characters",
        met: long_enough,
    });
    for requirement in REQUIREMENTS.iter() {
        checks.push(Check {
            label: requirement.label,
            met: requirement.re.is_match(master_key),
        });
    }

    let unmet = checks.iter().filter(|c| !c.met).count();
    let share = 100.0 / checks.len() as f64;
    let score = (100.0 - share * unmet as f64).max(SCORE_FLOOR);

    StrengthReport {
        score: score.round() as u8,
        checks,
    }
}

/// Refuse a master key whose score is below `min_strength`.
pub fn enforce(master_key: &str, min_strength: u8) -> Result<()> {
    let score = strength(master_key);
    if score < min_strength {
        return Err(PassVaultError::WeakMasterKey {
            score,
            required: min_strength,
        });
    }
    Ok(())
}
