pub const FORAGE_STATUS_HEADER: &str = "X-Forage-Status";
pub const FORAGE_STATUS_HEALTHY: &str = "healthy";
pub const FORAGE_STATUS_READY: &str = "ready";
pub const FORAGE_STATUS_NOT_READY: &str = "not_ready";
pub const FORAGE_STATUS_ERROR: &str = "error";

/// Tier that produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOrigin {
    Exact,
    Fuzzy,
    Semantic,
}

impl MatchOrigin {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOrigin::Exact => "exact",
            MatchOrigin::Fuzzy => "fuzzy",
            MatchOrigin::Semantic => "semantic",
        }
    }

    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            MatchOrigin::Exact => "HIT_EXACT",
            MatchOrigin::Fuzzy => "HIT_FUZZY",
            MatchOrigin::Semantic => "RESOLVED_SEMANTIC",
        }
    }

    /// `true` for tiers served from the cache.
    #[inline]
    pub fn is_cache_hit(&self) -> bool {
        !matches!(self, MatchOrigin::Semantic)
    }
}

impl std::fmt::Display for MatchOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a single resolution through the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    NotStarted,
    ExactTried,
    FuzzyTried,
    SemanticTried,
    Resolved,
    Failed,
}

impl std::fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolutionStage::NotStarted => "not_started",
            ResolutionStage::ExactTried => "exact_tried",
            ResolutionStage::FuzzyTried => "fuzzy_tried",
            ResolutionStage::SemanticTried => "semantic_tried",
            ResolutionStage::Resolved => "resolved",
            ResolutionStage::Failed => "failed",
        };
        f.write_str(name)
    }
}
