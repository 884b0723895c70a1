use petgraph::graph::NodeIndex;

use crate::error::AnalysisError;
use crate::flags::SummaryFlags;

/// A variable name or property name, sharing one key space.
///
/// Property names carry a `.` prefix to keep them apart from variables; of
/// a qualified property path only the last segment is retained.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortName(String);

impl ShortName {
    pub fn for_var(name: &str) -> Result<Self, AnalysisError> {
        if name.is_empty() {
            return Err(AnalysisError::EmptyName);
        }
        Ok(Self(name.to_string()))
    }

    pub fn for_prop(name: &str) -> Result<Self, AnalysisError> {
        let last = name.rsplit('.').next().unwrap_or_default();
        if last.is_empty() {
            return Err(AnalysisError::EmptyName);
        }
        Ok(Self(format!(".{last}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_property(&self) -> bool {
        self.0.starts_with('.')
    }
}

impl std::fmt::Debug for ShortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ShortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The union of observed side-effects across every function that may be
/// bound to any reference with one short name.
#[derive(Clone, Debug)]
pub struct AmbiguatedSummary {
    name: ShortName,
    flags: SummaryFlags,
    graph_id: NodeIndex,
}

impl AmbiguatedSummary {
    pub(crate) fn new(name: ShortName) -> Self {
        Self {
            name,
            flags: SummaryFlags::empty(),
            graph_id: NodeIndex::end(),
        }
    }

    pub fn name(&self) -> &ShortName {
        &self.name
    }

    pub fn flags(&self) -> SummaryFlags {
        self.flags
    }

    pub fn graph_id(&self) -> NodeIndex {
        self.graph_id
    }

    pub(crate) fn set_graph_id(&mut self, id: NodeIndex) {
        self.graph_id = id;
    }

    /// Set bits; returns whether anything changed. Bits are never cleared.
    pub(crate) fn add_flags(&mut self, flags: SummaryFlags) -> bool {
        self.flags.insert(flags)
    }

    pub fn mutates_global_state(&self) -> bool {
        self.flags.contains(SummaryFlags::MUTATES_GLOBAL_STATE)
    }

    pub fn mutates_this(&self) -> bool {
        self.flags.contains(SummaryFlags::MUTATES_THIS)
    }

    pub fn throws(&self) -> bool {
        self.flags.contains(SummaryFlags::THROWS)
    }

    pub fn escaped_return(&self) -> bool {
        self.flags.contains(SummaryFlags::ESCAPED_RETURN)
    }

    /// May this function mutate its arguments? A function that mutates
    /// global state is assumed to be allowed to mutate arguments too, since
    /// the arguments may alias globals.
    pub fn mutates_arguments(&self) -> bool {
        self.flags.contains(SummaryFlags::MUTATES_ARGUMENTS)
            || self.flags.contains(SummaryFlags::MUTATES_GLOBAL_STATE)
    }
}
