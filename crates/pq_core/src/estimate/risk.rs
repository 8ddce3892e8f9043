//! Risk buffer derivation from project flags.

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationConfig;
use crate::error::Result;

use super::apply_override;

/// Project risk flags reported by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlags {
    #[serde(default)]
    pub safety_critical: bool,
    #[serde(default)]
    pub has_ai: bool,
    #[serde(default)]
    pub custom_pcb: bool,
    #[serde(default)]
    pub large_scale: bool,
}

/// Derived risk buffer with its itemized breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Buffer as a fraction of the labor subtotal (0.08 = 8%).
    pub risk_buffer_pct: f64,
    pub breakdown: Vec<RiskLine>,
    pub capped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLine {
    pub label: String,
    pub amount: f64,
}

fn line(label: &str, amount: f64) -> RiskLine {
    RiskLine {
        label: label.to_string(),
        amount,
    }
}

/// Resolve the risk buffer: a positive override wins, otherwise the
/// buffer accumulates from the flag weights and is capped.
pub fn derive_risk_buffer(
    cal: &CalibrationConfig,
    flags: &RiskFlags,
    override_pct: f64,
) -> Result<RiskAssessment> {
    let w = &cal.risk_flags;
    let pct = apply_override("risk_buffer_pct", override_pct, || {
        let mut pct = w.base;
        if flags.safety_critical {
            pct += w.safety_critical;
        }
        if flags.has_ai {
            pct += w.has_ai;
        }
        if flags.custom_pcb {
            pct += w.custom_pcb;
        }
        if flags.large_scale {
            pct += w.large_scale;
        }
        Ok(pct.min(w.cap))
    })?;

    let mut breakdown = vec![line("base", w.base)];
    if override_pct > 0.0 {
        breakdown = vec![line("override", pct)];
    } else {
        if flags.safety_critical {
            breakdown.push(line("safety_critical", w.safety_critical));
        }
        if flags.has_ai {
            breakdown.push(line("has_ai", w.has_ai));
        }
        if flags.custom_pcb {
            breakdown.push(line("custom_pcb", w.custom_pcb));
        }
        if flags.large_scale {
            breakdown.push(line("large_scale", w.large_scale));
        }
    }

    Ok(RiskAssessment {
        risk_buffer_pct: pct,
        capped: override_pct <= 0.0 && pct >= w.cap,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only() {
        let cal = CalibrationConfig::default();
        let risk = derive_risk_buffer(&cal, &RiskFlags::default(), 0.0).unwrap();
        assert!((risk.risk_buffer_pct - 0.08).abs() < 1e-12);
        assert!(!risk.capped);
        assert_eq!(risk.breakdown.len(), 1);
    }

    #[test]
    fn test_all_flags_accumulate() {
        let cal = CalibrationConfig::default();
        let flags = RiskFlags {
            safety_critical: true,
            has_ai: true,
            custom_pcb: true,
            large_scale: true,
        };
        let risk = derive_risk_buffer(&cal, &flags, 0.0).unwrap();
        assert!((risk.risk_buffer_pct - 0.23).abs() < 1e-12);
        assert_eq!(risk.breakdown.len(), 5);
    }

    #[test]
    fn test_cap_applies() {
        let mut cal = CalibrationConfig::default();
        cal.risk_flags.base = 0.30;
        let flags = RiskFlags {
            safety_critical: true,
            has_ai: true,
            ..RiskFlags::default()
        };
        let risk = derive_risk_buffer(&cal, &flags, 0.0).unwrap();
        assert_eq!(risk.risk_buffer_pct, cal.risk_flags.cap);
        assert!(risk.capped);
    }

    #[test]
    fn test_override_wins() {
        let cal = CalibrationConfig::default();
        let flags = RiskFlags {
            safety_critical: true,
            ..RiskFlags::default()
        };
        let risk = derive_risk_buffer(&cal, &flags, 0.12).unwrap();
        assert_eq!(risk.risk_buffer_pct, 0.12);
        assert!(!risk.capped);
    }
}
