use purist_ast::{Node, Program};
use purist_resolve::{ReferenceMap, ScopeTable};

use crate::annotate::annotate;
use crate::body::BodyAnalyzer;
use crate::convention::{CodingConvention, DefaultConvention};
use crate::error::AnalysisError;
use crate::externs::analyze_externs;
use crate::flags::SummaryFlags;
use crate::graph::SummaryGraph;
use crate::propagate::propagate;
use crate::seed::seed;
use crate::summary::ShortName;

/// Receives a notification for every invocation whose flags changed.
pub trait ChangeReporter {
    fn report_change_to_enclosing_scope(&mut self, node: Node);
}

/// Remembers every changed invocation, in annotation order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub changed: Vec<Node>,
}

impl ChangeReporter for RecordingReporter {
    fn report_change_to_enclosing_scope(&mut self, node: Node) {
        self.changed.push(node);
    }
}

/// The whole-program purity analysis.
///
/// Seeds one ambiguated summary per short name from the reference map,
/// scans externs and function bodies, runs the reverse-call-graph fixed
/// point, and writes a [`purist_ast::SideEffects`] mask onto every
/// invocation node. Single-shot: a second [`process`](Self::process) on the
/// same instance is a wiring bug and fails fast.
pub struct PurityPass<C = DefaultConvention, R = RecordingReporter> {
    convention: C,
    reporter: R,
    graph: SummaryGraph,
    all_calls: Vec<Node>,
    processed: bool,
}

#[bon::bon]
impl<C: CodingConvention, R: ChangeReporter> PurityPass<C, R> {
    /// Build a pass.
    ///
    /// ```ignore
    /// let mut pass = PurityPass::builder()
    ///     .convention(DefaultConvention)
    ///     .reporter(RecordingReporter::default())
    ///     .build();
    /// pass.process(&mut program)?;
    /// ```
    #[builder]
    pub fn new(convention: C, reporter: R) -> Self {
        Self {
            convention,
            reporter,
            graph: SummaryGraph::new(),
            all_calls: Vec::new(),
            processed: false,
        }
    }

    /// Run the analysis over `program` and annotate its invocation nodes.
    pub fn process(&mut self, program: &mut Program) -> Result<(), AnalysisError> {
        if self.processed {
            return Err(AnalysisError::AlreadyProcessed);
        }
        self.processed = true;

        let scopes = ScopeTable::build(&program.ast, program.root);
        let refs = ReferenceMap::collect(&program.ast, &[program.externs, program.root]);

        seed(&program.ast, &refs, &mut self.graph)?;
        analyze_externs(&program.ast, program.externs, &mut self.graph);

        let analyzer = BodyAnalyzer::new(&program.ast, &scopes, &mut self.graph, &self.convention);
        self.all_calls = analyzer.analyze(program.root)?;

        propagate(&mut self.graph);
        annotate(
            &mut program.ast,
            &self.graph,
            &self.convention,
            &self.all_calls,
            &mut self.reporter,
        )
    }
}

impl PurityPass {
    /// A pass with the default convention and a recording reporter.
    pub fn with_defaults() -> Self {
        Self {
            convention: DefaultConvention,
            reporter: RecordingReporter::default(),
            graph: SummaryGraph::new(),
            all_calls: Vec::new(),
            processed: false,
        }
    }
}

impl<C, R> PurityPass<C, R> {
    /// Fixed-point flags of the summary for `name`, if it exists.
    pub fn summary_flags(&self, name: &ShortName) -> Option<SummaryFlags> {
        self.graph
            .summary_for_name(name)
            .map(|idx| self.graph.summary(idx).flags())
    }

    /// The summary store and reverse call graph.
    pub fn graph(&self) -> &SummaryGraph {
        &self.graph
    }

    /// Every invocation node found, in visit order.
    pub fn calls(&self) -> &[Node] {
        &self.all_calls
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
