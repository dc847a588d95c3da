//! Static program catalog.
//!
//! Each program carries its eligibility rule as typed parameters rather
//! than code, so threshold revisions are catalog edits. Loaded once at
//! first use and immutable afterwards; safe for unsynchronized concurrent
//! reads.

use compass_core::types::Circumstance;

/// How a program's income test is expressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgramRule {
    /// Income compared against a percentage of the poverty guideline.
    /// At or below `primary_pct` qualifies; a `secondary_pct`, when present,
    /// extends a looser Medium band above the primary limit.
    PovertyPct {
        primary_pct: f64,
        secondary_pct: Option<f64>,
    },
    /// Earned-income style credit with phase-in, plateau, and phase-out
    /// bands. High only strictly inside the plateau; omitted at or above
    /// the cutoff.
    PhaseCurve {
        phase_in_end: f64,
        plateau_end: f64,
        cutoff: f64,
    },
    /// A single dollar income ceiling; strictly below qualifies.
    FixedCap { ceiling: f64 },
    /// Income compared against a percentage of the region's area median
    /// income for the household size.
    AmiPct { pct: f64 },
    /// Poverty-percentage test whose limit depends on whether the state
    /// adopted the expansion. Non-participating states use `fallback_pct`
    /// and cap the achievable likelihood at Medium.
    StateConditional {
        expansion_pct: f64,
        fallback_pct: f64,
    },
}

/// Preconditions a program declares beyond its income rule.
///
/// A gate that cannot be decided from the available profile fields omits
/// the program rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Household must have at least this many members.
    MinHouseholdSize(u32),
    /// Applicant must be disabled or at least 65.
    DisabledOrElderly,
    /// Applicant must be at least this age.
    MinAge(u32),
    /// Excluded only when the applicant is known not to have earned income.
    /// An unknown employment status does not exclude.
    ExcludeIfNotWorking,
    /// At least one of the listed circumstances must be present.
    AnyCircumstance(&'static [Circumstance]),
}

/// A single government assistance offering.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub category: &'static str,
    pub rule: ProgramRule,
    pub gates: &'static [Gate],
    pub apply_url: &'static str,
    pub how_to_apply: &'static str,
    pub timeline: &'static str,
}

/// The full program catalog, in evaluation (and output) order.
pub fn catalog() -> &'static [Program] {
    static CATALOG: &[Program] = &[
        Program {
            id: "snap",
            name: "SNAP (Supplemental Nutrition Assistance Program)",
            short_name: "SNAP / Food Stamps",
            category: "food",
            rule: ProgramRule::PovertyPct {
                primary_pct: 130.0,
                secondary_pct: Some(200.0),
            },
            gates: &[],
            apply_url: "https://www.benefits.gov/benefit/361",
            how_to_apply: "Apply at your state SNAP office, online via your state benefits portal, or by calling 1-800-221-5689",
            timeline: "Decision typically within 30 days; expedited 7-day processing for very low income",
        },
        Program {
            id: "medicaid",
            name: "Medicaid",
            short_name: "Medicaid",
            category: "healthcare",
            rule: ProgramRule::StateConditional {
                expansion_pct: 138.0,
                fallback_pct: 65.0,
            },
            gates: &[],
            apply_url: "https://www.healthcare.gov/medicaid-chip/",
            how_to_apply: "Apply at Healthcare.gov, your state Medicaid office, or call 1-877-267-2323",
            timeline: "Eligibility determined within 45 days (90 days for disability-based)",
        },
        Program {
            id: "chip",
            name: "CHIP (Children's Health Insurance Program)",
            short_name: "CHIP",
            category: "healthcare",
            rule: ProgramRule::PovertyPct {
                primary_pct: 200.0,
                secondary_pct: Some(300.0),
            },
            gates: &[Gate::MinHouseholdSize(2)],
            apply_url: "https://www.insurekidsnow.gov/",
            how_to_apply: "Apply at InsureKidsNow.gov or call 1-877-543-7669",
            timeline: "Decision typically within 45 days",
        },
        Program {
            id: "tanf",
            name: "TANF (Temporary Assistance for Needy Families)",
            short_name: "TANF / Cash Assistance",
            category: "cash",
            rule: ProgramRule::PovertyPct {
                primary_pct: 60.0,
                secondary_pct: Some(100.0),
            },
            gates: &[Gate::MinHouseholdSize(2)],
            apply_url: "https://www.benefits.gov/benefit/613",
            how_to_apply: "Apply at your county or state human services office",
            timeline: "Decision typically within 30-45 days",
        },
        Program {
            id: "wic",
            name: "WIC (Women, Infants, and Children)",
            short_name: "WIC",
            category: "food",
            rule: ProgramRule::PovertyPct {
                primary_pct: 185.0,
                secondary_pct: None,
            },
            gates: &[Gate::AnyCircumstance(&[
                Circumstance::Pregnant,
                Circumstance::HasYoungChildren,
            ])],
            apply_url: "https://www.fns.usda.gov/wic",
            how_to_apply: "Contact your local WIC clinic to schedule a certification appointment",
            timeline: "Appointments often available within 1-2 weeks",
        },
        Program {
            id: "liheap",
            name: "LIHEAP (Low Income Home Energy Assistance Program)",
            short_name: "LIHEAP",
            category: "utilities",
            rule: ProgramRule::PovertyPct {
                primary_pct: 150.0,
                secondary_pct: Some(200.0),
            },
            gates: &[],
            apply_url: "https://www.acf.hhs.gov/ocs/programs/liheap",
            how_to_apply: "Apply through your state LIHEAP office; call 2-1-1 for the local contact",
            timeline: "Apply early in the season; funds run out",
        },
        Program {
            id: "lifeline",
            name: "Lifeline Phone and Internet Discount",
            short_name: "Lifeline",
            category: "connectivity",
            rule: ProgramRule::PovertyPct {
                primary_pct: 135.0,
                secondary_pct: None,
            },
            gates: &[],
            apply_url: "https://www.lifelinesupport.org/",
            how_to_apply: "Apply online at lifelinesupport.org or through a participating carrier",
            timeline: "Approval usually within days",
        },
        Program {
            id: "ssi",
            name: "SSI (Supplemental Security Income)",
            short_name: "SSI",
            category: "income",
            rule: ProgramRule::FixedCap { ceiling: 20_000.0 },
            gates: &[Gate::DisabledOrElderly],
            apply_url: "https://www.ssa.gov/ssi/",
            how_to_apply: "Apply online at ssa.gov/ssi or call 1-800-772-1213",
            timeline: "Initial decisions take 3-6 months; payments are retroactive to application",
        },
        Program {
            id: "section8",
            name: "Section 8 Housing Choice Voucher",
            short_name: "Section 8",
            category: "housing",
            rule: ProgramRule::AmiPct { pct: 50.0 },
            gates: &[],
            apply_url: "https://www.hud.gov/topics/housing_choice_voucher_program_section_8",
            how_to_apply: "Apply through your local public housing authority",
            timeline: "Waitlists are common but worth joining",
        },
        Program {
            id: "eitc",
            name: "Earned Income Tax Credit",
            short_name: "EITC",
            category: "tax_credit",
            rule: ProgramRule::PhaseCurve {
                phase_in_end: 10_000.0,
                plateau_end: 20_000.0,
                cutoff: 30_000.0,
            },
            gates: &[Gate::ExcludeIfNotWorking],
            apply_url: "https://www.irs.gov/credits-deductions/individuals/earned-income-tax-credit-eitc",
            how_to_apply: "File a federal tax return and claim the credit; free VITA tax prep at 1-800-906-9887",
            timeline: "Refund with your tax return, typically within 21 days of filing",
        },
        Program {
            id: "medicare_savings",
            name: "Medicare Savings Programs",
            short_name: "Medicare Savings",
            category: "healthcare",
            rule: ProgramRule::PovertyPct {
                primary_pct: 135.0,
                secondary_pct: None,
            },
            gates: &[Gate::MinAge(65)],
            apply_url: "https://www.medicare.gov/basics/costs/help/medicare-savings-programs",
            how_to_apply: "Apply through your state Medicaid office",
            timeline: "Decision typically within 45 days",
        },
    ];
    CATALOG
}

/// Look up a program by id.
pub fn program_by_id(id: &str) -> Option<&'static Program> {
    catalog().iter().find(|p| p.id == id)
}
