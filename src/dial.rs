//! The Mythology Dial: how much fantasy a security story can carry for a
//! given audience.
//!
//! Scoring starts from a neutral conservatism of 50, blends in the audience's
//! industry (40%) and mean role conservatism (30%), applies fixed adjustments
//! for culture, risk tolerance, creativity and urgency, shifts by the story
//! archetype's intensity, then clamps to 0..=100. The dial position shown to
//! the user is the inverse: `100 - conservatism`.
use clap::ValueEnum;
use serde::Serialize;

// ============================================================================
// Lookup tables
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Banking,
    Insurance,
    Government,
    Healthcare,
    Legal,
    Manufacturing,
    Retail,
    Technology,
    Consulting,
    Gaming,
    Startup,
    Creative,
}

impl Industry {
    pub fn label(self) -> &'static str {
        match self {
            Self::Banking => "Banking & Financial Services",
            Self::Insurance => "Insurance",
            Self::Government => "Government & Public Sector",
            Self::Healthcare => "Healthcare",
            Self::Legal => "Legal Services",
            Self::Manufacturing => "Manufacturing",
            Self::Retail => "Retail & E-commerce",
            Self::Technology => "Technology",
            Self::Consulting => "Consulting",
            Self::Gaming => "Gaming & Entertainment",
            Self::Startup => "Startup/Scale-up",
            Self::Creative => "Creative/Advertising Agency",
        }
    }

    pub fn conservatism(self) -> f64 {
        match self {
            Self::Banking => 90.0,
            Self::Insurance => 85.0,
            Self::Government => 95.0,
            Self::Healthcare => 80.0,
            Self::Legal => 85.0,
            Self::Manufacturing => 60.0,
            Self::Retail => 50.0,
            Self::Technology => 40.0,
            Self::Consulting => 45.0,
            Self::Gaming => 20.0,
            Self::Startup => 25.0,
            Self::Creative => 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Ceo,
    Board,
    Chairman,
    Cfo,
    Coo,
    Cto,
    Ciso,
    Cio,
    Legal,
    Hr,
    Marketing,
    Engineering,
    Developers,
    Vendors,
    Customers,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ceo => "CEO/President",
            Self::Board => "Board Members",
            Self::Chairman => "Chairman/Board Chair",
            Self::Cfo => "CFO/Finance",
            Self::Coo => "COO/Operations",
            Self::Cto => "CTO/Technology",
            Self::Ciso => "CISO/Security Leadership",
            Self::Cio => "CIO/IT Leadership",
            Self::Legal => "Legal/Compliance",
            Self::Hr => "HR/People",
            Self::Marketing => "Marketing/Communications",
            Self::Engineering => "Engineering Leadership",
            Self::Developers => "System Developers/Architects",
            Self::Vendors => "External Vendors/Partners",
            Self::Customers => "External Customers/Clients",
        }
    }

    pub fn conservatism(self) -> f64 {
        match self {
            Self::Ceo => 70.0,
            Self::Board => 85.0,
            Self::Chairman => 90.0,
            Self::Cfo => 75.0,
            Self::Coo => 65.0,
            Self::Cto => 45.0,
            Self::Ciso => 50.0,
            Self::Cio => 55.0,
            Self::Legal => 80.0,
            Self::Hr => 55.0,
            Self::Marketing => 35.0,
            Self::Engineering => 40.0,
            Self::Developers => 30.0,
            Self::Vendors => 60.0,
            Self::Customers => 75.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Siege,
    Prophet,
    Dragon,
    Quest,
    Merchant,
    Alliance,
    Succession,
}

impl Archetype {
    pub fn label(self) -> &'static str {
        match self {
            Self::Siege => "The Siege Narrative",
            Self::Prophet => "The Prophet's Warning",
            Self::Dragon => "The Dragon's Awakening",
            Self::Quest => "Quest for Sacred Artifact",
            Self::Merchant => "The Merchant's Journey",
            Self::Alliance => "The Alliance Formation",
            Self::Succession => "The Succession Crisis",
        }
    }

    pub fn intensity(self) -> f64 {
        match self {
            Self::Siege => 70.0,
            Self::Prophet => 60.0,
            Self::Dragon => 85.0,
            Self::Quest => 75.0,
            Self::Merchant => 50.0,
            Self::Alliance => 45.0,
            Self::Succession => 55.0,
        }
    }

    pub fn use_case(self) -> &'static str {
        match self {
            Self::Siege => "APT campaigns, regulatory compliance, legacy system vulnerabilities",
            Self::Prophet => "Risk assessments, vulnerability scans, threat landscape briefings",
            Self::Dragon => "Post-incident briefings, breach analysis, crisis communication",
            Self::Quest => "Zero Trust projects, SIEM implementations, security transformations",
            Self::Merchant => "Cloud migrations, digital transformation, business expansion",
            Self::Alliance => "Vendor assessments, M&A security, partnership evaluations",
            Self::Succession => "Leadership transitions, knowledge transfer, team succession planning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Culture {
    Traditional,
    Moderate,
    Innovative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Creativity {
    Skeptical,
    Neutral,
    Embracing,
}

// ============================================================================
// Inputs and result
// ============================================================================

/// Who the story is for. Every answer is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    pub industry: Option<Industry>,
    pub roles: Vec<Role>,
    pub culture: Option<Culture>,
    pub risk_tolerance: Option<Degree>,
    pub creativity: Option<Creativity>,
}

/// What the story is about. `complexity` and `stakes` are recorded but do not
/// move the dial.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub archetype: Option<Archetype>,
    pub urgency: Option<Degree>,
    pub complexity: Option<Degree>,
    pub stakes: Option<Degree>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialLevel {
    Conservative,
    Moderate,
    Fantasy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Clamped to 0..=100; higher means a more conservative audience.
    pub conservatism: f64,
    pub level: DialLevel,
    /// `100 - conservatism`; higher means more fantasy.
    pub dial_position: f64,
}

/// Scores an audience and scenario.
pub fn recommend(audience: &Audience, scenario: &Scenario) -> Recommendation {
    let mut score = 50.0;

    if let Some(industry) = audience.industry {
        score = score * 0.6 + industry.conservatism() * 0.4;
    }

    if !audience.roles.is_empty() {
        let total: f64 = audience.roles.iter().map(|r| r.conservatism()).sum();
        let mean = total / audience.roles.len() as f64;
        score = score * 0.7 + mean * 0.3;
    }

    score += match audience.culture {
        Some(Culture::Traditional) => 15.0,
        Some(Culture::Innovative) => -15.0,
        Some(Culture::Moderate) | None => 0.0,
    };
    score += match audience.risk_tolerance {
        Some(Degree::Low) => 10.0,
        Some(Degree::High) => -10.0,
        Some(Degree::Medium) | None => 0.0,
    };
    score += match audience.creativity {
        Some(Creativity::Skeptical) => 20.0,
        Some(Creativity::Embracing) => -20.0,
        Some(Creativity::Neutral) | None => 0.0,
    };

    if let Some(archetype) = scenario.archetype {
        // High-intensity archetypes need a less conservative room
        score += (archetype.intensity() - 60.0) * 0.3;
    }

    score += match scenario.urgency {
        Some(Degree::Low) => 5.0,
        Some(Degree::High) => -10.0,
        Some(Degree::Medium) | None => 0.0,
    };

    let conservatism = score.clamp(0.0, 100.0);
    let level = if conservatism >= 70.0 {
        DialLevel::Conservative
    } else if conservatism >= 40.0 {
        DialLevel::Moderate
    } else {
        DialLevel::Fantasy
    };

    tracing::debug!(conservatism, ?level, "Mythology dial scored");
    Recommendation {
        conservatism,
        level,
        dial_position: 100.0 - conservatism,
    }
}

/// Band label for a dial position.
pub fn dial_label(position: f64) -> &'static str {
    if position <= 30.0 {
        "CONSERVATIVE"
    } else if position <= 70.0 {
        "MODERATE"
    } else {
        "FULL FANTASY"
    }
}

/// Presentation advice for a recommended level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Guidance {
    pub title: &'static str,
    pub description: &'static str,
    pub techniques: &'static [&'static str],
    pub example_opening: &'static str,
}

impl DialLevel {
    pub fn guidance(self) -> Guidance {
        match self {
            Self::Conservative => Guidance {
                title: "Conservative Approach Recommended",
                description: "Your audience prefers subtle metaphors and traditional business language.",
                techniques: &[
                    "Use minimal fantasy elements - think \"strategic metaphors\" not \"epic tales\"",
                    "Focus on phrases like \"strategic assessment\" and \"systematic approach\"",
                    "Bridge with: \"If we think of our network as having defensive perimeters...\"",
                    "Keep mythology dial at 20% - mostly business language with subtle comparisons",
                    "Prepare traditional backup slides for complete fallback if needed",
                ],
                example_opening: "Our network security posture faces sustained pressure from \
                    advanced threat actors. If we consider our infrastructure as having defensive \
                    perimeters...",
            },
            Self::Moderate => Guidance {
                title: "Balanced Approach Recommended",
                description: "Your audience will appreciate clear mythological elements with business translations.",
                techniques: &[
                    "Use full mythological metaphors with immediate business translation",
                    "Bridge phrases: \"Just as a kingdom requires..., our organization needs...\"",
                    "Include both mythological narrative and business reality check",
                    "Keep mythology dial at 50% - balanced fantasy and professional language",
                    "Use visual metaphors that clearly map to technical concepts",
                ],
                example_opening: "Our digital kingdom faces a siege from the Shadow Guild. In \
                    business terms, this advanced persistent threat has been targeting our \
                    infrastructure for six months...",
            },
            Self::Fantasy => Guidance {
                title: "Full Fantasy Approach Recommended",
                description: "Your audience will embrace rich narrative immersion and creative storytelling.",
                techniques: &[
                    "Use complete story arcs with detailed character development",
                    "Embrace emotional engagement and dramatic tension",
                    "Create immersive world-building with consistent mythology",
                    "Keep mythology dial at 80% - primarily narrative with data anchors",
                    "Include heroic character archetypes and epic quest structures",
                ],
                example_opening: "The ancient dragon stirred in the depths of our northern \
                    servers, its eyes glowing with malicious intent...",
            },
        }
    }
}
