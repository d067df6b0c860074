use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_listings: usize,
    pub open_listings: usize,
    pub total_applications: usize,
    pub pending_applications: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStats {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardStats {
    Admin(AdminStats),
    Candidate(CandidateStats),
}
