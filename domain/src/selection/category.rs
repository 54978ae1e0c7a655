//! Business-domain buckets used to keep selections diverse.

use crate::candidate::Candidate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowDomain {
    FinancialProcessing,
    DocumentAnalysis,
    DataProcessing,
    ComplianceRisk,
    Communication,
    Analytics,
    WorkflowMgmt,
    Integration,
    Other,
}

/// Checked in order; the first domain with a matching keyword wins.
const DOMAIN_KEYWORDS: &[(WorkflowDomain, &[&str])] = &[
    (
        WorkflowDomain::FinancialProcessing,
        &[
            "invoice", "payment", "billing", "expense", "accounting", "payroll", "financial",
            "reconcil", "budget",
        ],
    ),
    (
        WorkflowDomain::DocumentAnalysis,
        &["document", "contract", "pdf", "ocr", "extract", "summariz", "paperwork"],
    ),
    (
        WorkflowDomain::DataProcessing,
        &["data entry", "data", "spreadsheet", "etl", "database", "records", "migration"],
    ),
    (
        WorkflowDomain::ComplianceRisk,
        &["compliance", "audit", "risk", "regulat", "fraud", "policy"],
    ),
    (
        WorkflowDomain::Communication,
        &["email", "chat", "customer", "support", "inquir", "message", "notification"],
    ),
    (
        WorkflowDomain::Analytics,
        &["analytic", "dashboard", "forecast", "insight", "reporting", "trend", "predict"],
    ),
    (
        WorkflowDomain::WorkflowMgmt,
        &["workflow", "approval", "schedul", "task", "onboarding", "project"],
    ),
    (
        WorkflowDomain::Integration,
        &["integration", "sync", "api", "connect", "crm", "erp"],
    ),
];

impl WorkflowDomain {
    /// Classify a candidate by its name, objective and description
    pub fn classify(candidate: &Candidate) -> Self {
        Self::classify_text(&candidate.summary_text())
    }

    pub fn classify_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        DOMAIN_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
            .map_or(WorkflowDomain::Other, |(domain, _)| *domain)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowDomain::FinancialProcessing => "financial_processing",
            WorkflowDomain::DocumentAnalysis => "document_analysis",
            WorkflowDomain::DataProcessing => "data_processing",
            WorkflowDomain::ComplianceRisk => "compliance_risk",
            WorkflowDomain::Communication => "communication",
            WorkflowDomain::Analytics => "analytics",
            WorkflowDomain::WorkflowMgmt => "workflow_mgmt",
            WorkflowDomain::Integration => "integration",
            WorkflowDomain::Other => "other",
        }
    }
}

impl std::fmt::Display for WorkflowDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_first_match_wins() {
        // Mentions both invoices and email; financial comes first
        let candidate = Candidate::new("Invoice Mailer").with_objective("Email invoices");
        assert_eq!(
            WorkflowDomain::classify(&candidate),
            WorkflowDomain::FinancialProcessing
        );
    }

    #[test]
    fn test_classify_domains() {
        assert_eq!(
            WorkflowDomain::classify_text("Contract clause extractor"),
            WorkflowDomain::DocumentAnalysis
        );
        assert_eq!(
            WorkflowDomain::classify_text("Customer support chatbot"),
            WorkflowDomain::Communication
        );
        assert_eq!(
            WorkflowDomain::classify_text("Sales forecast dashboard"),
            WorkflowDomain::Analytics
        );
        assert_eq!(
            WorkflowDomain::classify_text("Social post writer"),
            WorkflowDomain::Other
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkflowDomain::WorkflowMgmt.to_string(), "workflow_mgmt");
    }
}
