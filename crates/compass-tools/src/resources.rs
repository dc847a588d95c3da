//! Local resource lookup tool.
//!
//! Deterministic composition over a static directory of community
//! resources, matched from free-form need keywords. Results are
//! name-deduplicated and always accompanied by the universal hotlines.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use compass_core::types::{Hotline, Resource};

use crate::error::ToolError;
use crate::registry::{ParamKind, ParamSpec, ToolHandler, ToolSpec};

static SPEC: ToolSpec = ToolSpec {
    name: "find_local_resources",
    description: "Find nearby community resources such as food banks, free health clinics, \
                  emergency shelters, legal aid, childcare assistance, and employment services \
                  based on the user's location and needs.",
    params: &[
        ParamSpec {
            name: "zip_code",
            kind: ParamKind::String,
            required: true,
            non_negative: false,
            description: "User's zip code or city/state for finding nearby resources.",
        },
        ParamSpec {
            name: "needs_list",
            kind: ParamKind::StringArray,
            required: true,
            non_negative: false,
            description: "List of needs, e.g. ['food', 'healthcare', 'housing', 'utilities', \
                          'childcare', 'employment', 'mental_health', 'legal'].",
        },
        ParamSpec {
            name: "language",
            kind: ParamKind::String,
            required: false,
            non_negative: false,
            description: "Preferred language code (e.g., 'en', 'es'). Default 'en'.",
        },
    ],
};

/// One directory entry before category tagging.
struct Entry {
    name: &'static str,
    kind: &'static str,
    services: &'static [&'static str],
    phone: &'static str,
    website: &'static str,
    hours: &'static str,
    notes: &'static str,
}

/// Directory of representative resources by category.
static DIRECTORY: &[(&str, &[Entry])] = &[
    (
        "food",
        &[
            Entry {
                name: "City Food Bank",
                kind: "food_bank",
                services: &["groceries", "hot_meals", "produce"],
                phone: "211",
                website: "https://www.feedingamerica.org/find-your-local-foodbank",
                hours: "Mon-Fri 9am-5pm, Sat 9am-1pm",
                notes: "No ID required. Serves all zip codes in the metro area.",
            },
            Entry {
                name: "Community Kitchen & Pantry",
                kind: "pantry",
                services: &["groceries", "baby_formula", "diapers"],
                phone: "2-1-1",
                website: "https://www.feedingamerica.org",
                hours: "Tue, Thu 10am-3pm",
                notes: "Brings food directly to families with young children.",
            },
            Entry {
                name: "SNAP Enrollment Assistance",
                kind: "benefits_navigator",
                services: &["snap_enrollment", "benefits_screening"],
                phone: "1-800-221-5689",
                website: "https://www.benefits.gov/benefit/361",
                hours: "Mon-Fri 8am-6pm",
                notes: "Free help applying for food assistance in your language.",
            },
        ],
    ),
    (
        "healthcare",
        &[
            Entry {
                name: "Community Health Center",
                kind: "clinic",
                services: &["primary_care", "dental", "mental_health", "prenatal"],
                phone: "1-877-464-4772",
                website: "https://findahealthcenter.hrsa.gov/",
                hours: "Mon-Fri 8am-6pm, some evening/weekend hours",
                notes: "Federally Qualified Health Center; sliding-scale fees. Nobody turned away.",
            },
            Entry {
                name: "Free & Charitable Clinics",
                kind: "free_clinic",
                services: &["primary_care", "prescriptions", "lab_work"],
                phone: "1-800-955-5765",
                website: "https://www.nafcclinics.org/find-clinic",
                hours: "Varies by location",
                notes: "Over 1,400 free clinics nationwide. Income eligibility applies.",
            },
            Entry {
                name: "Medicaid Enrollment Help",
                kind: "benefits_navigator",
                services: &["medicaid_enrollment", "chip_enrollment", "marketplace"],
                phone: "1-877-267-2323",
                website: "https://www.healthcare.gov/find-assistance/",
                hours: "24/7 helpline",
                notes: "Free navigators can help you enroll in Medicaid or marketplace plans.",
            },
        ],
    ),
    (
        "housing",
        &[
            Entry {
                name: "Local Housing Authority",
                kind: "public_housing",
                services: &["section8_applications", "public_housing", "waitlist"],
                phone: "1-800-569-4287",
                website: "https://www.hud.gov/program_offices/public_indian_housing",
                hours: "Mon-Fri 9am-5pm",
                notes: "Apply for Section 8 housing vouchers and public housing.",
            },
            Entry {
                name: "Emergency Shelter Network",
                kind: "shelter",
                services: &["emergency_shelter", "transitional_housing", "meals"],
                phone: "2-1-1",
                website: "https://www.211.org",
                hours: "24/7",
                notes: "Call 2-1-1 anytime for immediate shelter referrals.",
            },
            Entry {
                name: "Legal Aid Housing Help",
                kind: "legal_aid",
                services: &["eviction_defense", "tenant_rights", "security_deposit"],
                phone: "1-800-342-5297",
                website: "https://www.lawhelp.org",
                hours: "Mon-Fri 9am-5pm",
                notes: "Free legal help if facing eviction or housing discrimination.",
            },
            Entry {
                name: "Rental Assistance Program",
                kind: "financial_assistance",
                services: &["rent_assistance", "security_deposit", "utility_deposit"],
                phone: "2-1-1",
                website: "https://www.consumerfinance.gov/renthelp/",
                hours: "Mon-Fri 9am-5pm",
                notes: "Emergency rental assistance may be available through local programs.",
            },
        ],
    ),
    (
        "utilities",
        &[
            Entry {
                name: "LIHEAP Energy Assistance",
                kind: "energy_assistance",
                services: &["heating_bill", "cooling_bill", "crisis_assistance"],
                phone: "2-1-1",
                website: "https://www.acf.hhs.gov/ocs/programs/liheap",
                hours: "Mon-Fri 8am-5pm",
                notes: "Apply early; funds run out. Priority for elderly and disabled.",
            },
            Entry {
                name: "Utility Company Assistance",
                kind: "utility_program",
                services: &["bill_reduction", "payment_plans", "shutoff_prevention"],
                phone: "On your utility bill",
                website: "https://www.benefits.gov/benefit/623",
                hours: "Business hours",
                notes: "Ask your utility company about income-based programs and payment plans.",
            },
        ],
    ),
    (
        "mental_health",
        &[
            Entry {
                name: "Crisis Text Line",
                kind: "crisis_support",
                services: &["crisis_counseling", "mental_health_support"],
                phone: "Text HOME to 741741",
                website: "https://www.crisistextline.org",
                hours: "24/7",
                notes: "Free, confidential crisis support via text. Any crisis, any time.",
            },
            Entry {
                name: "SAMHSA National Helpline",
                kind: "mental_health",
                services: &["mental_health", "substance_use", "referrals"],
                phone: "1-800-662-4357",
                website: "https://www.samhsa.gov/find-help/national-helpline",
                hours: "24/7, 365 days",
                notes: "Free, confidential treatment referral in English and Spanish.",
            },
        ],
    ),
    (
        "legal",
        &[
            Entry {
                name: "Legal Aid Society",
                kind: "legal_aid",
                services: &["immigration", "family_law", "housing", "benefits_appeals"],
                phone: "1-800-342-5297",
                website: "https://www.lawhelp.org",
                hours: "Mon-Fri 9am-5pm",
                notes: "Free civil legal services for low-income individuals and families.",
            },
            Entry {
                name: "Immigration Legal Help",
                kind: "immigration",
                services: &["visa_help", "asylum", "citizenship"],
                phone: "1-800-375-5283",
                website: "https://www.immigrationadvocates.org",
                hours: "Mon-Fri 9am-5pm",
                notes: "Find accredited immigration legal help near you.",
            },
        ],
    ),
    (
        "employment",
        &[
            Entry {
                name: "American Job Centers",
                kind: "employment",
                services: &["job_search", "resume_help", "training", "unemployment"],
                phone: "1-877-872-5627",
                website: "https://www.careeronestop.org",
                hours: "Mon-Fri 8am-5pm",
                notes: "Free job search help, resume workshops, skills training.",
            },
            Entry {
                name: "Unemployment Insurance Office",
                kind: "benefits",
                services: &["unemployment_claims", "job_search_assistance"],
                phone: "Your state UI office",
                website: "https://www.careeronestop.org/LocalHelp/UnemploymentBenefits/find-unemployment-benefits.aspx",
                hours: "Mon-Fri business hours",
                notes: "Apply for unemployment benefits through your state if recently laid off.",
            },
        ],
    ),
    (
        "childcare",
        &[
            Entry {
                name: "Child Care Subsidy Program",
                kind: "childcare",
                services: &["childcare_assistance", "after_school", "preschool"],
                phone: "1-800-424-2246",
                website: "https://www.benefits.gov/categories/Childcare",
                hours: "Mon-Fri 9am-5pm",
                notes: "Subsidized childcare for low-income working families.",
            },
            Entry {
                name: "Head Start / Early Head Start",
                kind: "education",
                services: &["free_preschool", "childcare", "family_support"],
                phone: "1-866-763-6481",
                website: "https://www.acf.hhs.gov/ohs",
                hours: "School hours",
                notes: "Free comprehensive early childhood programs for children 0-5.",
            },
        ],
    ),
];

/// User vocabulary to directory categories.
static NEEDS_MAPPING: &[(&str, &str)] = &[
    ("food", "food"),
    ("groceries", "food"),
    ("hungry", "food"),
    ("eating", "food"),
    ("meals", "food"),
    ("snap", "food"),
    ("ebt", "food"),
    ("healthcare", "healthcare"),
    ("doctor", "healthcare"),
    ("medical", "healthcare"),
    ("hospital", "healthcare"),
    ("sick", "healthcare"),
    ("medicine", "healthcare"),
    ("prescription", "healthcare"),
    ("dental", "healthcare"),
    ("health", "healthcare"),
    ("insurance", "healthcare"),
    ("medicaid", "healthcare"),
    ("housing", "housing"),
    ("rent", "housing"),
    ("homeless", "housing"),
    ("shelter", "housing"),
    ("eviction", "housing"),
    ("apartment", "housing"),
    ("electricity", "utilities"),
    ("electric", "utilities"),
    ("gas", "utilities"),
    ("utilities", "utilities"),
    ("heat", "utilities"),
    ("cooling", "utilities"),
    ("energy", "utilities"),
    ("bill", "utilities"),
    ("mental", "mental_health"),
    ("depression", "mental_health"),
    ("anxiety", "mental_health"),
    ("counseling", "mental_health"),
    ("therapy", "mental_health"),
    ("crisis", "mental_health"),
    ("substance", "mental_health"),
    ("addiction", "mental_health"),
    ("legal", "legal"),
    ("lawyer", "legal"),
    ("immigration", "legal"),
    ("deportation", "legal"),
    ("visa", "legal"),
    ("asylum", "legal"),
    ("citizenship", "legal"),
    ("job", "employment"),
    ("work", "employment"),
    ("employment", "employment"),
    ("unemployed", "employment"),
    ("fired", "employment"),
    ("laid off", "employment"),
    ("resume", "employment"),
    ("training", "employment"),
    ("childcare", "childcare"),
    ("daycare", "childcare"),
    ("preschool", "childcare"),
    ("babysitter", "childcare"),
    ("kids", "childcare"),
    ("children", "childcare"),
];

/// Structured output of a resource lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLookup {
    pub location: String,
    pub resources: Vec<Resource>,
    pub hotlines: Vec<Hotline>,
    pub total_resources: usize,
    pub categories_found: Vec<String>,
    pub summary: String,
}

/// Resolve needs to directory categories and collect matching resources.
pub fn find_local_resources(zip_code: &str, needs: &[String], language: &str) -> ResourceLookup {
    let mut categories: BTreeSet<&str> = BTreeSet::new();
    for need in needs {
        let lowered = need.to_lowercase();
        let need_lower = lowered.trim();
        if let Some((cat, _)) = DIRECTORY.iter().find(|(cat, _)| *cat == need_lower) {
            categories.insert(*cat);
            continue;
        }
        for (keyword, category) in NEEDS_MAPPING {
            if need_lower.contains(keyword) || keyword.contains(need_lower) {
                categories.insert(*category);
            }
        }
    }

    // Baseline when nothing matched.
    if categories.is_empty() {
        categories.insert("food");
        categories.insert("healthcare");
    }

    let mut resources = Vec::new();
    let mut seen = BTreeSet::new();
    for category in &categories {
        let Some((_, entries)) = DIRECTORY.iter().find(|(cat, _)| cat == category) else {
            continue;
        };
        for entry in *entries {
            if !seen.insert(entry.name) {
                continue;
            }
            resources.push(Resource {
                name: entry.name.to_string(),
                category: category.to_string(),
                kind: entry.kind.to_string(),
                services: entry.services.iter().map(|s| s.to_string()).collect(),
                phone: entry.phone.to_string(),
                website: entry.website.to_string(),
                hours: entry.hours.to_string(),
                notes: entry.notes.to_string(),
                language_note: if language == "es" {
                    Some("Spanish-speaking staff available at most locations".to_string())
                } else {
                    None
                },
            });
        }
    }

    let mut hotlines = vec![
        Hotline {
            name: "2-1-1 Helpline".to_string(),
            description: "Free, confidential referrals for food, housing, healthcare, and crisis services".to_string(),
            contact: "Call or text 2-1-1".to_string(),
            available: "24/7".to_string(),
            languages: "200+ languages".to_string(),
        },
        Hotline {
            name: "Benefits.gov".to_string(),
            description: "Find all federal benefit programs you may qualify for".to_string(),
            contact: "https://www.benefits.gov".to_string(),
            available: "24/7 online".to_string(),
            languages: "English and Spanish".to_string(),
        },
    ];
    let crisis_flagged = needs.iter().any(|n| n.to_lowercase().contains("crisis"));
    if categories.contains("mental_health") || crisis_flagged {
        hotlines.push(Hotline {
            name: "988 Suicide & Crisis Lifeline".to_string(),
            description: "Free, confidential mental health crisis support".to_string(),
            contact: "Call or text 9-8-8".to_string(),
            available: "24/7".to_string(),
            languages: "English, Spanish, and more".to_string(),
        });
    }

    let location = if zip_code.is_empty() {
        "your area".to_string()
    } else {
        zip_code.to_string()
    };
    let category_names: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
    let summary = format!(
        "Found {} resources near {} covering {}. You can also call 2-1-1 anytime for \
         immediate local referrals.",
        resources.len(),
        location,
        category_names.join(", ")
    );

    ResourceLookup {
        location,
        total_resources: resources.len(),
        resources,
        hotlines,
        categories_found: category_names,
        summary,
    }
}

/// Handler exposing the resource directory lookup.
pub struct ResourceTool;

#[async_trait]
impl ToolHandler for ResourceTool {
    fn spec(&self) -> &'static ToolSpec {
        &SPEC
    }

    async fn execute(&self, input: &Value) -> Result<Value, ToolError> {
        let zip_code = input["zip_code"].as_str().unwrap_or_default();
        let needs: Vec<String> = input["needs_list"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        let language = input["language"].as_str().unwrap_or("en");

        let lookup = find_local_resources(zip_code, &needs, language);
        serde_json::to_value(&lookup).map_err(|e| ToolError::Handler(e.to_string()))
    }
}
