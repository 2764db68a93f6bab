//! Step-by-step roadmap shown when a priority card is opened.

use super::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roadmap {
    pub steps: &'static [&'static str],
    pub tip: Option<&'static str>,
}

impl Roadmap {
    /// Generic guidance for ids without a dedicated roadmap.
    pub fn fallback() -> Self {
        Self {
            steps: &[
                "Start with the first small step you can take today.",
                "Reach out to a trusted adult or support worker if you need help with next steps.",
            ],
            tip: None,
        }
    }
}

pub fn roadmap_for(id: ActionId) -> Roadmap {
    match id {
        ActionId::Id => Roadmap {
            steps: &[
                "Gather documents: birth certificate or passport, proof of residency (lease, utility bill, or letter).",
                "Book an appointment at the DMV (or walk in; some locations offer free ID for foster youth).",
                "Bring your foster youth verification letter if you have one - it can waive the fee.",
                "Pick up your ID when ready. You'll need it for jobs, housing, and benefits.",
            ],
            tip: Some("Many DMVs have a \"foster youth\" process - ask when you arrive."),
        },
        ActionId::Healthcare => Roadmap {
            steps: &[
                "You qualify for Medicaid until age 26 - no cost.",
                "Apply at CoveredCA.com or your county social services office.",
                "Have your ID and Social Security number ready; the form takes about 10 minutes.",
                "Choose a health plan and a primary care doctor once approved.",
            ],
            tip: Some("If you're in school or working, you still qualify. Don't wait."),
        },
        ActionId::Food => Roadmap {
            steps: &[
                "Open the Resources tab and use your zip code to find nearby food banks and pantries.",
                "Call or visit during open hours - many don't require proof of need.",
                "Some offer fresh produce, canned goods, and sometimes hot meals.",
            ],
            tip: Some("Local pantries and food banks are there for you."),
        },
        ActionId::Mental => Roadmap {
            steps: &[
                "Log how you're doing in the wellbeing check-in - no judgment, just for you.",
                "Consider a short daily practice: a walk, 5 minutes of quiet, or one thing you're grateful for.",
                "If you want to talk to someone, reach out to a school counselor, foster care worker, or a hotline (e.g. 988).",
            ],
            tip: Some("Your mental health matters. Small steps count."),
        },
        ActionId::Legal => Roadmap {
            steps: &[
                "Open the Resources tab and check the Legal section for your rights.",
                "Extended foster care, education rights, and housing support are available until 21 (and sometimes 22).",
                "Free legal aid organizations can help with specific issues.",
            ],
            tip: Some("You don't have to figure it out alone. Legal aid is free and confidential."),
        },
        ActionId::Housing => Roadmap {
            steps: &[
                "Extended foster care can include housing support - ask your worker or ILP about options.",
                "Use the Resources tab to find shelters and transitional housing near you.",
                "Reach out to local youth shelters for immediate help.",
            ],
            tip: Some("Stable housing is a right. Start with one call or one visit."),
        },
    }
}

/// Looks up a roadmap by the card id string a caller handed around.
pub fn roadmap_for_key(key: &str) -> Roadmap {
    ActionId::parse(key)
        .map(roadmap_for)
        .unwrap_or_else(Roadmap::fallback)
}
