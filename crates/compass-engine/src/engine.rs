//! Rule evaluation.
//!
//! `evaluate` is a pure function from a household profile and a reference
//! table vintage to an eligibility report. Identical inputs always produce
//! identical output. Programs whose gates or rules cannot be decided from
//! the available profile fields are omitted rather than guessed.

use compass_core::types::{EligibilityReport, EligibilityResult, HouseholdProfile, Likelihood};

use crate::error::EngineError;
use crate::programs::{catalog, Gate, Program, ProgramRule};
use crate::tables::{normalize_state, ReferenceTables};
use crate::values::{estimated_value, group_digits};

/// Tunable evaluation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    /// Width of the near-threshold band in percentage points. Incomes in
    /// `(threshold - margin, threshold]` report Medium rather than High, to
    /// reflect estimation uncertainty near the line.
    pub near_margin_pct: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            near_margin_pct: 10.0,
        }
    }
}

/// A single program judgment before it is joined with catalog metadata.
struct Judgment {
    likelihood: Likelihood,
    margin_pct: f64,
    reason: String,
}

/// Evaluate every catalog program against the profile.
///
/// Requires `annual_income` and `household_size`; all other profile fields
/// gate individual programs. Returns one result per program whose rule is
/// satisfiable from the available fields.
pub fn evaluate(
    profile: &HouseholdProfile,
    tables: &ReferenceTables,
    params: &EngineParams,
) -> Result<EligibilityReport, EngineError> {
    let income = profile
        .annual_income
        .ok_or(EngineError::MissingField("annual_income"))?;
    let household_size = profile
        .household_size
        .ok_or(EngineError::MissingField("household_size"))?;

    if income < 0.0 {
        return Err(EngineError::NegativeIncome(income));
    }
    if household_size < 1 {
        return Err(EngineError::InvalidHouseholdSize);
    }

    let state = profile.state.as_deref().and_then(normalize_state);
    let fpl = tables.fpl.guideline(household_size);
    let pct_fpl = income / fpl as f64 * 100.0;

    let mut results = Vec::new();
    let mut monthly_total: u32 = 0;

    for program in catalog() {
        if !gates_pass(program.gates, profile, household_size) {
            continue;
        }
        let judgment = match program.rule {
            ProgramRule::PovertyPct {
                primary_pct,
                secondary_pct,
            } => eval_poverty_pct(program, pct_fpl, primary_pct, secondary_pct, params),
            ProgramRule::PhaseCurve {
                phase_in_end,
                plateau_end,
                cutoff,
            } => eval_phase_curve(program, income, phase_in_end, plateau_end, cutoff),
            ProgramRule::FixedCap { ceiling } => eval_fixed_cap(program, income, ceiling),
            ProgramRule::AmiPct { pct } => {
                eval_ami_pct(program, income, household_size, state.as_deref(), tables, pct, params)
            }
            ProgramRule::StateConditional {
                expansion_pct,
                fallback_pct,
            } => eval_state_conditional(
                program,
                pct_fpl,
                state.as_deref(),
                tables,
                expansion_pct,
                fallback_pct,
                params,
            ),
        };

        if let Some(judgment) = judgment {
            let (value, monthly) = estimated_value(program.id, income, household_size);
            monthly_total += monthly;
            results.push(EligibilityResult {
                program_id: program.id.to_string(),
                name: program.name.to_string(),
                short_name: program.short_name.to_string(),
                category: program.category.to_string(),
                likelihood: judgment.likelihood,
                margin_pct: round_tenth(judgment.margin_pct),
                estimated_value: value,
                reason: judgment.reason,
                apply_url: program.apply_url.to_string(),
            });
        }
    }

    let summary = format!(
        "Based on your income of ${}/year for a household of {}, you are at {:.0}% \
         of the federal poverty guideline. You likely qualify for {} program(s). \
         Estimated combined value: ${}/month.",
        group_digits(income.round() as u32),
        household_size,
        pct_fpl,
        results.len(),
        group_digits(monthly_total),
    );

    Ok(EligibilityReport {
        results,
        income_pct_fpl: round_tenth(pct_fpl),
        fpl_threshold: fpl,
        estimated_monthly_value: monthly_total,
        summary,
    })
}

/// True when every gate is decidable and satisfied.
fn gates_pass(gates: &[Gate], profile: &HouseholdProfile, household_size: u32) -> bool {
    gates.iter().all(|gate| match gate {
        Gate::MinHouseholdSize(n) => household_size >= *n,
        Gate::DisabledOrElderly => {
            profile.disabled == Some(true) || profile.age.is_some_and(|a| a >= 65)
        }
        Gate::MinAge(n) => profile.age.is_some_and(|a| a >= *n),
        // Unknown status does not exclude; only a known non-earning status does.
        Gate::ExcludeIfNotWorking => profile
            .employment_status
            .map_or(true, |s| s.is_working()),
        Gate::AnyCircumstance(set) => set.iter().any(|c| profile.has_circumstance(*c)),
    })
}

fn eval_poverty_pct(
    program: &Program,
    pct_fpl: f64,
    primary_pct: f64,
    secondary_pct: Option<f64>,
    params: &EngineParams,
) -> Option<Judgment> {
    if pct_fpl <= primary_pct {
        let near = pct_fpl > primary_pct - params.near_margin_pct;
        Some(Judgment {
            likelihood: if near {
                Likelihood::Medium
            } else {
                Likelihood::High
            },
            margin_pct: pct_fpl,
            reason: if near {
                format!(
                    "Income is near the {}'s {:.0}% guideline limit",
                    program.short_name, primary_pct
                )
            } else {
                format!(
                    "Income is within the {}'s {:.0}% guideline limit",
                    program.short_name, primary_pct
                )
            },
        })
    } else if secondary_pct.is_some_and(|s| pct_fpl <= s) {
        Some(Judgment {
            likelihood: Likelihood::Medium,
            margin_pct: pct_fpl,
            reason: format!(
                "May qualify for {} under broader state rules (up to {:.0}% of the guideline)",
                program.short_name,
                secondary_pct.unwrap_or(primary_pct)
            ),
        })
    } else {
        None
    }
}

fn eval_phase_curve(
    program: &Program,
    income: f64,
    phase_in_end: f64,
    plateau_end: f64,
    cutoff: f64,
) -> Option<Judgment> {
    if income >= cutoff {
        return None;
    }
    let (likelihood, band) = if income > phase_in_end && income < plateau_end {
        (Likelihood::High, "maximum-credit")
    } else if income <= phase_in_end {
        (Likelihood::Medium, "phase-in")
    } else {
        (Likelihood::Medium, "phase-out")
    };
    Some(Judgment {
        likelihood,
        margin_pct: income / cutoff * 100.0,
        reason: format!(
            "Income is in the {}'s {} range",
            program.short_name, band
        ),
    })
}

fn eval_fixed_cap(program: &Program, income: f64, ceiling: f64) -> Option<Judgment> {
    if income >= ceiling {
        return None;
    }
    let likelihood = if income <= ceiling / 2.0 {
        Likelihood::High
    } else {
        Likelihood::Medium
    };
    Some(Judgment {
        likelihood,
        margin_pct: income / ceiling * 100.0,
        reason: format!(
            "Income is below the {}'s ${} ceiling",
            program.short_name,
            group_digits(ceiling as u32)
        ),
    })
}

fn eval_ami_pct(
    program: &Program,
    income: f64,
    household_size: u32,
    state: Option<&str>,
    tables: &ReferenceTables,
    pct: f64,
    params: &EngineParams,
) -> Option<Judgment> {
    // Region-relative thresholds are indeterminate without a state.
    let state = state?;
    let ami = tables.ami.median_income(state, household_size);
    let pct_ami = income / ami as f64 * 100.0;
    if pct_ami > pct {
        return None;
    }
    let near = pct_ami > pct - params.near_margin_pct;
    Some(Judgment {
        likelihood: if near {
            Likelihood::Medium
        } else {
            Likelihood::High
        },
        margin_pct: pct_ami,
        reason: format!(
            "Income is {} {:.0}% of your area's median income",
            if near { "near" } else { "within" },
            pct
        ),
    })
}

fn eval_state_conditional(
    program: &Program,
    pct_fpl: f64,
    state: Option<&str>,
    tables: &ReferenceTables,
    expansion_pct: f64,
    fallback_pct: f64,
    params: &EngineParams,
) -> Option<Judgment> {
    // Membership is indeterminate without a state; omit rather than guess.
    let state = state?;
    if tables.is_expansion_state(state) {
        if pct_fpl > expansion_pct {
            return None;
        }
        let near = pct_fpl > expansion_pct - params.near_margin_pct;
        Some(Judgment {
            likelihood: if near {
                Likelihood::Medium
            } else {
                Likelihood::High
            },
            margin_pct: pct_fpl,
            reason: format!(
                "Income qualifies for {} in your expansion state",
                program.short_name
            ),
        })
    } else if pct_fpl <= fallback_pct {
        // Non-participating states cap the achievable likelihood.
        Some(Judgment {
            likelihood: Likelihood::Medium,
            margin_pct: pct_fpl,
            reason: format!(
                "Income is within your state's {} limit; non-expansion states cover fewer adults",
                program.short_name
            ),
        })
    } else {
        None
    }
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::types::{Circumstance, EmploymentStatus};

    fn tables() -> &'static ReferenceTables {
        ReferenceTables::default_2024()
    }

    fn params() -> EngineParams {
        EngineParams::default()
    }

    fn profile(income: f64, household_size: u32, state: Option<&str>) -> HouseholdProfile {
        HouseholdProfile {
            annual_income: Some(income),
            household_size: Some(household_size),
            state: state.map(|s| s.to_string()),
            ..HouseholdProfile::default()
        }
    }

    fn result_for<'a>(
        report: &'a EligibilityReport,
        program_id: &str,
    ) -> Option<&'a EligibilityResult> {
        report.results.iter().find(|r| r.program_id == program_id)
    }

    fn fpl(household_size: u32) -> f64 {
        tables().fpl.guideline(household_size) as f64
    }

    // ---- Validation ----

    #[test]
    fn test_missing_income_is_error() {
        let p = HouseholdProfile {
            household_size: Some(2),
            ..HouseholdProfile::default()
        };
        assert_eq!(
            evaluate(&p, tables(), &params()).unwrap_err(),
            EngineError::MissingField("annual_income")
        );
    }

    #[test]
    fn test_missing_household_size_is_error() {
        let p = HouseholdProfile {
            annual_income: Some(10_000.0),
            ..HouseholdProfile::default()
        };
        assert_eq!(
            evaluate(&p, tables(), &params()).unwrap_err(),
            EngineError::MissingField("household_size")
        );
    }

    #[test]
    fn test_negative_income_is_error() {
        let p = profile(-1.0, 2, Some("CA"));
        assert!(matches!(
            evaluate(&p, tables(), &params()).unwrap_err(),
            EngineError::NegativeIncome(_)
        ));
    }

    #[test]
    fn test_zero_household_size_is_error() {
        let p = profile(10_000.0, 0, Some("CA"));
        assert_eq!(
            evaluate(&p, tables(), &params()).unwrap_err(),
            EngineError::InvalidHouseholdSize
        );
    }

    // ---- Income-threshold programs (SNAP) ----

    #[test]
    fn test_snap_exactly_at_threshold_is_medium() {
        let income = fpl(4) * 1.30;
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        let snap = result_for(&report, "snap").expect("snap included at threshold");
        assert_eq!(snap.likelihood, Likelihood::Medium);
    }

    #[test]
    fn test_snap_below_margin_is_high() {
        let income = fpl(4) * 1.15;
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(result_for(&report, "snap").unwrap().likelihood, Likelihood::High);
    }

    #[test]
    fn test_snap_secondary_band_is_medium() {
        let income = fpl(4) * 1.5;
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "snap").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    #[test]
    fn test_snap_at_secondary_limit_included() {
        let income = fpl(4) * 2.0;
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&report, "snap").is_some());
    }

    #[test]
    fn test_snap_above_secondary_excluded() {
        let income = fpl(4) * 2.01;
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&report, "snap").is_none());
    }

    #[test]
    fn test_snap_at_twice_primary_threshold_excluded() {
        let income = fpl(4) * 2.60;
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&report, "snap").is_none());
    }

    #[test]
    fn test_snap_zero_income_high() {
        let report = evaluate(&profile(0.0, 4, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(result_for(&report, "snap").unwrap().likelihood, Likelihood::High);
    }

    // ---- State-conditional program (Medicaid) ----

    #[test]
    fn test_medicaid_expansion_within_limit() {
        let income = fpl(1) * 1.0;
        let report = evaluate(&profile(income, 1, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "medicaid").unwrap().likelihood,
            Likelihood::High
        );
    }

    #[test]
    fn test_medicaid_expansion_at_limit_is_medium() {
        let income = fpl(1) * 1.38;
        let report = evaluate(&profile(income, 1, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "medicaid").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    #[test]
    fn test_medicaid_expansion_above_limit_excluded() {
        let income = fpl(1) * 1.39;
        let report = evaluate(&profile(income, 1, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&report, "medicaid").is_none());
    }

    #[test]
    fn test_medicaid_non_expansion_capped_at_medium() {
        let income = fpl(1) * 0.50;
        let report = evaluate(&profile(income, 1, Some("TX")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "medicaid").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    #[test]
    fn test_medicaid_non_expansion_above_fallback_excluded() {
        let income = fpl(1) * 0.66;
        let report = evaluate(&profile(income, 1, Some("TX")), tables(), &params()).unwrap();
        assert!(result_for(&report, "medicaid").is_none());
    }

    #[test]
    fn test_medicaid_missing_state_omitted() {
        let report = evaluate(&profile(5_000.0, 1, None), tables(), &params()).unwrap();
        assert!(result_for(&report, "medicaid").is_none());
        // Non-regional programs are still evaluated.
        assert!(result_for(&report, "snap").is_some());
    }

    #[test]
    fn test_state_conditional_never_higher_in_non_expansion_state() {
        // Identical inputs differing only in state membership must never
        // favor the non-participating state.
        for pct in [0.2, 0.5, 0.65, 0.9, 1.2, 1.38, 1.5] {
            let income = fpl(2) * pct;
            let expansion =
                evaluate(&profile(income, 2, Some("CA")), tables(), &params()).unwrap();
            let non_expansion =
                evaluate(&profile(income, 2, Some("TX")), tables(), &params()).unwrap();
            let e = result_for(&expansion, "medicaid").map(|r| r.likelihood);
            let n = result_for(&non_expansion, "medicaid").map(|r| r.likelihood);
            assert!(
                n.unwrap_or(Likelihood::Low) <= e.unwrap_or(Likelihood::Low),
                "non-expansion likelihood exceeded expansion at {}% income",
                pct * 100.0
            );
        }
    }

    // ---- Phase-curve program (EITC) ----

    #[test]
    fn test_credit_high_only_inside_plateau() {
        let report = evaluate(&profile(15_000.0, 2, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(result_for(&report, "eitc").unwrap().likelihood, Likelihood::High);
    }

    #[test]
    fn test_credit_medium_at_band_boundaries() {
        for income in [10_000.0, 20_000.0] {
            let report = evaluate(&profile(income, 2, Some("CA")), tables(), &params()).unwrap();
            assert_eq!(
                result_for(&report, "eitc").unwrap().likelihood,
                Likelihood::Medium,
                "income {} should sit on a band boundary",
                income
            );
        }
    }

    #[test]
    fn test_credit_phase_out_is_medium() {
        let report = evaluate(&profile(24_000.0, 3, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "eitc").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    #[test]
    fn test_credit_omitted_at_cutoff_and_above() {
        for income in [30_000.0, 45_000.0] {
            let report = evaluate(&profile(income, 2, Some("CA")), tables(), &params()).unwrap();
            assert!(result_for(&report, "eitc").is_none());
        }
    }

    #[test]
    fn test_credit_zero_income_phase_in_medium() {
        let report = evaluate(&profile(0.0, 2, Some("CA")), tables(), &params()).unwrap();
        let eitc = result_for(&report, "eitc").unwrap();
        assert_eq!(eitc.likelihood, Likelihood::Medium);
        assert!(eitc.reason.contains("phase-in"));
    }

    #[test]
    fn test_credit_excluded_when_known_not_working() {
        let mut p = profile(15_000.0, 2, Some("CA"));
        p.employment_status = Some(EmploymentStatus::Unemployed);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert!(result_for(&report, "eitc").is_none());
    }

    #[test]
    fn test_credit_included_for_self_employed() {
        let mut p = profile(18_000.0, 2, Some("FL"));
        p.employment_status = Some(EmploymentStatus::SelfEmployed);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert!(result_for(&report, "eitc").is_some());
    }

    // ---- Fixed-cap program (SSI) ----

    #[test]
    fn test_ssi_disabled_low_income_high() {
        let mut p = profile(8_000.0, 1, Some("CA"));
        p.disabled = Some(true);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert_eq!(result_for(&report, "ssi").unwrap().likelihood, Likelihood::High);
    }

    #[test]
    fn test_ssi_upper_half_of_ceiling_medium() {
        let mut p = profile(15_000.0, 1, Some("CA"));
        p.disabled = Some(true);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "ssi").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    #[test]
    fn test_ssi_at_ceiling_excluded() {
        let mut p = profile(20_000.0, 1, Some("CA"));
        p.disabled = Some(true);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert!(result_for(&report, "ssi").is_none());
    }

    #[test]
    fn test_ssi_elderly_qualifies_without_disability() {
        let mut p = profile(9_000.0, 1, Some("FL"));
        p.age = Some(65);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert!(result_for(&report, "ssi").is_some());
    }

    #[test]
    fn test_ssi_omitted_when_indeterminate() {
        // Neither disability nor age known: omit, do not guess.
        let report = evaluate(&profile(9_000.0, 1, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&report, "ssi").is_none());
    }

    // ---- AMI-relative program (Section 8) ----

    #[test]
    fn test_section8_well_below_threshold_high() {
        let report = evaluate(&profile(24_000.0, 4, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "section8").unwrap().likelihood,
            Likelihood::High
        );
    }

    #[test]
    fn test_section8_at_threshold_medium() {
        let ami = tables().ami.median_income("CA", 4) as f64;
        let report =
            evaluate(&profile(ami * 0.50, 4, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&report, "section8").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    #[test]
    fn test_section8_above_threshold_excluded() {
        let ami = tables().ami.median_income("CA", 4) as f64;
        let report =
            evaluate(&profile(ami * 0.51, 4, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&report, "section8").is_none());
    }

    #[test]
    fn test_section8_missing_state_omitted() {
        let report = evaluate(&profile(10_000.0, 4, None), tables(), &params()).unwrap();
        assert!(result_for(&report, "section8").is_none());
    }

    // ---- Gated programs ----

    #[test]
    fn test_tanf_requires_household_of_two() {
        let income = fpl(3) * 0.50;
        let with_family = evaluate(&profile(income, 3, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(
            result_for(&with_family, "tanf").unwrap().likelihood,
            Likelihood::High
        );

        let single = evaluate(&profile(5_000.0, 1, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&single, "tanf").is_none());
    }

    #[test]
    fn test_wic_requires_qualifying_circumstance() {
        let income = fpl(2) * 1.0;
        let without = evaluate(&profile(income, 2, Some("CA")), tables(), &params()).unwrap();
        assert!(result_for(&without, "wic").is_none());

        let mut p = profile(income, 2, Some("CA"));
        p.circumstances = vec![Circumstance::Pregnant];
        let with = evaluate(&p, tables(), &params()).unwrap();
        assert_eq!(result_for(&with, "wic").unwrap().likelihood, Likelihood::High);
    }

    #[test]
    fn test_medicare_savings_requires_age() {
        let income = fpl(1) * 1.0;

        let mut senior = profile(income, 1, Some("TX"));
        senior.age = Some(65);
        let report = evaluate(&senior, tables(), &params()).unwrap();
        assert!(result_for(&report, "medicare_savings").is_some());

        let mut younger = profile(income, 1, Some("TX"));
        younger.age = Some(64);
        let report = evaluate(&younger, tables(), &params()).unwrap();
        assert!(result_for(&report, "medicare_savings").is_none());

        // Age unknown: omitted.
        let report = evaluate(&profile(income, 1, Some("TX")), tables(), &params()).unwrap();
        assert!(result_for(&report, "medicare_savings").is_none());
    }

    #[test]
    fn test_medicare_savings_above_limit_excluded() {
        let mut p = profile(fpl(1) * 1.36, 1, Some("TX"));
        p.age = Some(66);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert!(result_for(&report, "medicare_savings").is_none());
    }

    // ---- High income: nothing matches ----

    #[test]
    fn test_high_income_no_programs() {
        let mut p = profile(120_000.0, 4, Some("TX"));
        p.age = Some(40);
        p.employment_status = Some(EmploymentStatus::Employed);
        let report = evaluate(&p, tables(), &params()).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.estimated_monthly_value, 0);
    }

    // ---- Determinism ----

    #[test]
    fn test_evaluation_is_deterministic() {
        let mut p = profile(17_500.0, 3, Some("NY"));
        p.age = Some(34);
        p.disabled = Some(false);
        p.circumstances = vec![Circumstance::HasYoungChildren];

        let a = evaluate(&p, tables(), &params()).unwrap();
        let b = evaluate(&p, tables(), &params()).unwrap();
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    // ---- End-to-end scenarios ----

    #[test]
    fn test_scenario_family_of_three_non_expansion_state() {
        // household_size=3, $24,000, non-expansion state: food assistance
        // High, state-conditional health program excluded, credit in the
        // phase-out band at Medium.
        let report = evaluate(&profile(24_000.0, 3, Some("TX")), tables(), &params()).unwrap();

        assert_eq!(result_for(&report, "snap").unwrap().likelihood, Likelihood::High);
        assert!(result_for(&report, "medicaid").is_none());
        let eitc = result_for(&report, "eitc").unwrap();
        assert_eq!(eitc.likelihood, Likelihood::Medium);
        assert!(eitc.reason.contains("phase-out"));
    }

    #[test]
    fn test_scenario_single_person_zero_income() {
        // household_size=1, $0: income-threshold programs maximal, the
        // AMI-relative program maximal, the credit in phase-in at Medium.
        let report = evaluate(&profile(0.0, 1, Some("CA")), tables(), &params()).unwrap();

        for id in ["snap", "liheap", "lifeline"] {
            assert_eq!(
                result_for(&report, id).unwrap().likelihood,
                Likelihood::High,
                "{} should be High at zero income",
                id
            );
        }
        assert_eq!(
            result_for(&report, "section8").unwrap().likelihood,
            Likelihood::High
        );
        assert_eq!(
            result_for(&report, "medicaid").unwrap().likelihood,
            Likelihood::High
        );
        assert_eq!(
            result_for(&report, "eitc").unwrap().likelihood,
            Likelihood::Medium
        );
    }

    // ---- Report fields ----

    #[test]
    fn test_report_summary_and_percent() {
        let income = fpl(4);
        let report = evaluate(&profile(income, 4, Some("CA")), tables(), &params()).unwrap();
        assert_eq!(report.income_pct_fpl, 100.0);
        assert_eq!(report.fpl_threshold, 31_200);
        assert!(report.summary.contains("100%"));
        assert!(report.summary.contains("household of 4"));
    }

    #[test]
    fn test_report_monthly_total_sums_components() {
        let report = evaluate(&profile(0.0, 3, Some("CA")), tables(), &params()).unwrap();
        // SNAP contributes its full allotment at zero income.
        assert!(report.estimated_monthly_value >= 766);
    }

    #[test]
    fn test_unrecognized_state_treated_as_missing() {
        let report =
            evaluate(&profile(5_000.0, 1, Some("Atlantis")), tables(), &params()).unwrap();
        assert!(result_for(&report, "medicaid").is_none());
        assert!(result_for(&report, "section8").is_none());
        assert!(result_for(&report, "snap").is_some());
    }
}
