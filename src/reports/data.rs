//! Literal report datasets. Rendered verbatim; nothing here is computed.

use super::{Category, Issue, Report, ReportKind, Severity};

// =============================================================================
// COMPLIANCE
// =============================================================================

pub static COMPLIANCE: Report = Report {
    kind: ReportKind::Compliance,
    title: "Compliance Standards",
    categories: &[
        Category {
            id: "gdpr",
            display_name: "GDPR",
            score: 72,
            issues: &[
                Issue {
                    severity: Severity::High,
                    title: "Consent checkbox pre-selected",
                    description: "The marketing consent checkbox on the sign-up form is checked by default.",
                    reference: "GDPR Art. 7 / Recital 32",
                    location: "Sign Up > Form > Marketing opt-in",
                    recommendation: "Leave consent controls unchecked until the user actively opts in.",
                },
                Issue {
                    severity: Severity::Medium,
                    title: "Privacy notice not linked",
                    description: "Personal data is collected before a link to the privacy notice is shown.",
                    reference: "GDPR Art. 13",
                    location: "Sign Up > Form",
                    recommendation: "Place a privacy notice link next to the first personal data field.",
                },
                Issue {
                    severity: Severity::Low,
                    title: "No data export entry point",
                    description: "Account settings do not expose a way to request a copy of personal data.",
                    reference: "GDPR Art. 20",
                    location: "Settings > Account",
                    recommendation: "Add a 'Download my data' action to account settings.",
                },
            ],
        },
        Category {
            id: "ccpa",
            display_name: "CCPA",
            score: 85,
            issues: &[Issue {
                severity: Severity::Medium,
                title: "Missing 'Do Not Sell' link",
                description: "The footer has no link for opting out of the sale or sharing of personal information.",
                reference: "Cal. Civ. Code § 1798.135",
                location: "Global > Footer",
                recommendation: "Add a 'Do Not Sell or Share My Personal Information' link to the footer.",
            }],
        },
        Category {
            id: "coppa",
            display_name: "COPPA",
            score: 94,
            issues: &[Issue {
                severity: Severity::Low,
                title: "Age gate wording is ambiguous",
                description: "The birth date prompt does not explain why age is requested.",
                reference: "16 CFR Part 312",
                location: "Onboarding > Age check",
                recommendation: "Add a neutral explanation and avoid hinting at the minimum age.",
            }],
        },
        Category {
            id: "pci-dss",
            display_name: "PCI DSS",
            score: 58,
            issues: &[
                Issue {
                    severity: Severity::Critical,
                    title: "Full card number displayed",
                    description: "The order confirmation screen shows the full primary account number.",
                    reference: "PCI DSS v4.0 Req. 3.4.1",
                    location: "Checkout > Confirmation",
                    recommendation: "Mask the PAN so at most the first six and last four digits are visible.",
                },
                Issue {
                    severity: Severity::High,
                    title: "CVV stored in saved cards",
                    description: "The saved card component includes a populated security code field.",
                    reference: "PCI DSS v4.0 Req. 3.3.1.2",
                    location: "Settings > Payment methods",
                    recommendation: "Never display or retain the card verification code after authorization.",
                },
            ],
        },
    ],
};

// =============================================================================
// SECURITY
// =============================================================================

pub static SECURITY: Report = Report {
    kind: ReportKind::Security,
    title: "Security Findings",
    categories: &[
        Category {
            id: "authentication",
            display_name: "Authentication",
            score: 64,
            issues: &[
                Issue {
                    severity: Severity::Critical,
                    title: "Password shown in plain text",
                    description: "The login password field has no masking and no visibility toggle.",
                    reference: "OWASP ASVS 2.1.12",
                    location: "Login > Password field",
                    recommendation: "Mask the password by default and offer an explicit show/hide toggle.",
                },
                Issue {
                    severity: Severity::Medium,
                    title: "No multi-factor option",
                    description: "Account security settings offer no second factor.",
                    reference: "OWASP ASVS 2.8",
                    location: "Settings > Security",
                    recommendation: "Offer TOTP or WebAuthn as a second factor.",
                },
            ],
        },
        Category {
            id: "data-exposure",
            display_name: "Sensitive Data Exposure",
            score: 70,
            issues: &[
                Issue {
                    severity: Severity::High,
                    title: "API key visible in settings mock",
                    description: "A developer settings screen renders a full API key without masking.",
                    reference: "OWASP Top 10 A02:2021",
                    location: "Settings > Developer > API keys",
                    recommendation: "Show only the last four characters and require re-authentication to reveal.",
                },
                Issue {
                    severity: Severity::Low,
                    title: "Email addresses in shared view",
                    description: "Collaborator email addresses are listed on a publicly shareable page.",
                    reference: "OWASP Top 10 A01:2021",
                    location: "Project > Share > Public link",
                    recommendation: "Show display names only on public views.",
                },
            ],
        },
        Category {
            id: "session",
            display_name: "Session Management",
            score: 88,
            issues: &[Issue {
                severity: Severity::Medium,
                title: "No sign-out on shared devices",
                description: "There is no visible sign-out action on the mobile navigation.",
                reference: "OWASP ASVS 3.3.1",
                location: "Mobile > Navigation drawer",
                recommendation: "Add a sign-out entry to every navigation surface.",
            }],
        },
        Category {
            id: "input-validation",
            display_name: "Input Validation",
            score: 91,
            issues: &[],
        },
    ],
};

// =============================================================================
// ACCESSIBILITY
// =============================================================================

pub static ACCESSIBILITY: Report = Report {
    kind: ReportKind::Accessibility,
    title: "Accessibility Findings",
    categories: &[
        Category {
            id: "perceivable",
            display_name: "Perceivable",
            score: 66,
            issues: &[
                Issue {
                    severity: Severity::High,
                    title: "Insufficient text contrast",
                    description: "Secondary button text is #9E9E9E on white, a contrast ratio of 2.7:1.",
                    reference: "WCAG 2.2 SC 1.4.3",
                    location: "Home > Hero > Secondary CTA",
                    recommendation: "Raise contrast to at least 4.5:1 for normal text.",
                },
                Issue {
                    severity: Severity::Medium,
                    title: "Images without text alternatives",
                    description: "Product thumbnails have no alt text annotations.",
                    reference: "WCAG 2.2 SC 1.1.1",
                    location: "Catalog > Product grid",
                    recommendation: "Annotate each informative image with alternative text.",
                },
            ],
        },
        Category {
            id: "operable",
            display_name: "Operable",
            score: 74,
            issues: &[
                Issue {
                    severity: Severity::High,
                    title: "Touch targets too small",
                    description: "Icon buttons in the toolbar are 18×18 px.",
                    reference: "WCAG 2.2 SC 2.5.8",
                    location: "Editor > Toolbar",
                    recommendation: "Make targets at least 24×24 CSS px or add spacing.",
                },
                Issue {
                    severity: Severity::Low,
                    title: "Focus order not annotated",
                    description: "The modal has no documented keyboard focus order.",
                    reference: "WCAG 2.2 SC 2.4.3",
                    location: "Checkout > Address modal",
                    recommendation: "Annotate the intended tab order in the handoff notes.",
                },
            ],
        },
        Category {
            id: "understandable",
            display_name: "Understandable",
            score: 83,
            issues: &[Issue {
                severity: Severity::Medium,
                title: "Error message relies on color",
                description: "Invalid fields are indicated by a red border only.",
                reference: "WCAG 2.2 SC 1.4.1 / 3.3.1",
                location: "Sign Up > Form",
                recommendation: "Pair the color change with an icon and a text message.",
            }],
        },
        Category {
            id: "robust",
            display_name: "Robust",
            score: 90,
            issues: &[Issue {
                severity: Severity::Critical,
                title: "Custom control without role",
                description: "The custom toggle component has no role or state annotation.",
                reference: "WCAG 2.2 SC 4.1.2",
                location: "Settings > Notifications > Toggle",
                recommendation: "Specify the switch role and its on/off state for implementation.",
            }],
        },
    ],
};
